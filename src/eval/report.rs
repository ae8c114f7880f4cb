//! Aggregate scores for one judgment set, and threshold checks against them.

use crate::config::ThresholdConfig;
use crate::error::Result;
use crate::eval::{metrics, QueryResult};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallAtCutoff {
    pub k: usize,
    pub recall: f64,
}

/// MRR, NDCG@K, Recall@K and a Recall sweep over one set of queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub queries: usize,
    pub k: usize,
    pub mrr: f64,
    pub ndcg: f64,
    pub recall: f64,
    pub recall_sweep: Vec<RecallAtCutoff>,
}

impl EvalReport {
    pub fn evaluate(queries: &[QueryResult], k: usize, cutoffs: &[usize]) -> Result<Self> {
        let recall_sweep = metrics::recall_at_ks(queries, cutoffs)?
            .into_iter()
            .map(|(k, recall)| RecallAtCutoff { k, recall })
            .collect();

        Ok(Self {
            queries: queries.len(),
            k,
            mrr: metrics::mrr(queries)?,
            ndcg: metrics::ndcg(queries, k)?,
            recall: metrics::recall_at_k(queries, k)?,
            recall_sweep,
        })
    }

    /// Descriptions of every configured threshold this report misses, scores printed
    /// with `precision` decimal places.
    pub fn failures(&self, thresholds: &ThresholdConfig, precision: usize) -> Vec<String> {
        let checks = [
            ("MRR".to_string(), self.mrr, thresholds.mrr),
            (format!("NDCG@{}", self.k), self.ndcg, thresholds.ndcg),
            (format!("Recall@{}", self.k), self.recall, thresholds.recall),
        ];
        checks
            .into_iter()
            .filter_map(|(name, score, min)| {
                min.filter(|&min| score < min)
                    .map(|min| {
                        format!("{} {:.*} < {:.*}", name, precision, score, precision, min)
                    })
            })
            .collect()
    }

    /// Plain-text report with `precision` decimal places per score.
    pub fn render(&self, precision: usize) -> String {
        let mut out = format!("=== Evaluation Results ({} queries) ===\n", self.queries);
        out.push_str(&format!("MRR:       {:.*}\n", precision, self.mrr));
        out.push_str(&format!("NDCG@{:<5} {:.*}\n", self.k, precision, self.ndcg));
        out.push_str(&format!("Recall@{:<3} {:.*}\n", self.k, precision, self.recall));
        for entry in &self.recall_sweep {
            out.push_str(&format!(
                "  Recall@{:<3} {:.*}\n",
                entry.k, precision, entry.recall
            ));
        }
        out
    }
}
