//! Evaluation framework: relevance judgments, metrics (MRR, NDCG@K, Recall@K), reports, and demo data.

pub mod demo;
pub mod metrics;
pub mod query;
pub mod report;

pub use metrics::{
    dcg_at_k, mrr, ndcg, ndcg_at_k, ndcg_at_k_with_ideal, query_recall_at_k, recall_at_k,
    recall_at_ks, reciprocal_rank,
};
pub use query::{load_queries, parse_queries, QueryResult, QuerySpec};
pub use report::{EvalReport, RecallAtCutoff};
