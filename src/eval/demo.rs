//! Built-in demonstration scenarios for the `eval demo` command.

use crate::error::Result;
use crate::eval::{metrics, QueryResult};
use std::collections::BTreeMap;
use std::fmt;

/// Which metric a scenario reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mrr,
    Ndcg { k: usize },
    Recall { k: usize },
}

impl Metric {
    pub fn evaluate(&self, queries: &[QueryResult]) -> Result<f64> {
        match *self {
            Metric::Mrr => metrics::mrr(queries),
            Metric::Ndcg { k } => metrics::ndcg(queries, k),
            Metric::Recall { k } => metrics::recall_at_k(queries, k),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Mrr => write!(f, "MRR"),
            Metric::Ndcg { k } => write!(f, "NDCG@{}", k),
            Metric::Recall { k } => write!(f, "Recall@{}", k),
        }
    }
}

/// A named set of queries scored with one metric.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub metric: Metric,
    pub queries: Vec<QueryResult>,
}

impl Scenario {
    pub fn evaluate(&self) -> Result<f64> {
        self.metric.evaluate(&self.queries)
    }
}

fn ids(docs: &[&str]) -> Vec<String> {
    docs.iter().map(|d| d.to_string()).collect()
}

fn binary(retrieved: &[&str], relevant: &[&str]) -> Result<QueryResult> {
    let judgments: BTreeMap<String, f64> = relevant.iter().map(|d| (d.to_string(), 1.0)).collect();
    QueryResult::from_documents(&ids(retrieved), &judgments)
}

fn graded(retrieved: &[&str], judgments: &[(&str, f64)]) -> Result<QueryResult> {
    let judgments: BTreeMap<String, f64> =
        judgments.iter().map(|(d, g)| (d.to_string(), *g)).collect();
    QueryResult::from_documents(&ids(retrieved), &judgments)
}

const GRADES_A: [(&str, f64); 4] = [("doc1", 3.0), ("doc2", 2.0), ("doc3", 1.0), ("doc4", 0.0)];
const GRADES_B: [(&str, f64); 4] = [("doc1", 2.0), ("doc2", 3.0), ("doc3", 0.0), ("doc4", 1.0)];

/// Queries and cutoffs for the recall sweep printed after the scenarios.
pub fn recall_sweep() -> Result<(Vec<QueryResult>, Vec<usize>)> {
    let queries = vec![
        binary(&["doc1", "doc2", "doc3", "doc4"], &["doc1", "doc3"])?,
        binary(&["doc5", "doc6", "doc7", "doc8"], &["doc5", "doc7", "doc8"])?,
    ];
    Ok((queries, vec![1, 2, 3, 4]))
}

/// All demonstration scenarios, in display order.
pub fn scenarios() -> Result<Vec<Scenario>> {
    Ok(vec![
        Scenario {
            name: "Mixed first-relevant ranks",
            metric: Metric::Mrr,
            queries: vec![
                QueryResult::new(vec![0.0, 0.0, 1.0])?,
                QueryResult::new(vec![1.0, 0.0, 0.0])?,
                QueryResult::new(vec![0.0, 0.0, 0.0])?,
            ],
        },
        Scenario {
            name: "Perfect retrieval",
            metric: Metric::Mrr,
            queries: vec![
                binary(&["doc1", "doc2", "doc3"], &["doc1"])?,
                binary(&["doc4", "doc5", "doc6"], &["doc4"])?,
            ],
        },
        Scenario {
            name: "Imperfect retrieval",
            metric: Metric::Mrr,
            queries: vec![
                binary(&["doc2", "doc1", "doc3"], &["doc1"])?,
                binary(&["doc5", "doc6", "doc4"], &["doc4"])?,
            ],
        },
        Scenario {
            name: "Multiple relevant documents",
            metric: Metric::Mrr,
            queries: vec![
                binary(&["doc1", "doc2", "doc3", "doc4"], &["doc2", "doc3"])?,
                binary(&["doc5", "doc2", "doc1", "doc6"], &["doc1", "doc2"])?,
                binary(&["doc7", "doc8", "doc9", "doc1"], &["doc1", "doc9"])?,
            ],
        },
        Scenario {
            name: "Graded relevance",
            metric: Metric::Ndcg { k: 4 },
            queries: vec![QueryResult::new(vec![3.0, 2.0, 0.0, 1.0])?],
        },
        Scenario {
            name: "Perfect ranking",
            metric: Metric::Ndcg { k: 3 },
            queries: vec![graded(&["doc1", "doc2", "doc3"], &GRADES_A)?],
        },
        Scenario {
            name: "Best document ranked last",
            metric: Metric::Ndcg { k: 3 },
            queries: vec![graded(&["doc2", "doc3", "doc1"], &GRADES_A)?],
        },
        Scenario {
            name: "Best document ranked last, top 2",
            metric: Metric::Ndcg { k: 2 },
            queries: vec![graded(&["doc2", "doc3", "doc1"], &GRADES_A)?],
        },
        Scenario {
            name: "Average across queries",
            metric: Metric::Ndcg { k: 3 },
            queries: vec![
                graded(&["doc1", "doc2", "doc3"], &GRADES_A)?,
                graded(&["doc2", "doc1", "doc4"], &GRADES_B)?,
            ],
        },
        Scenario {
            name: "Partial recall",
            metric: Metric::Recall { k: 3 },
            queries: vec![QueryResult::with_total_relevant(
                vec![1.0, 0.0, 1.0, 0.0, 0.0],
                3,
            )?],
        },
        Scenario {
            name: "Average across queries",
            metric: Metric::Recall { k: 2 },
            queries: recall_sweep()?.0,
        },
        Scenario {
            name: "Perfect recall",
            metric: Metric::Recall { k: 3 },
            queries: vec![binary(&["doc1", "doc3", "doc2"], &["doc1", "doc3"])?],
        },
    ])
}
