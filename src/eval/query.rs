//! Query result type and judgment-file loading for the evaluation framework.

use crate::error::{MetricsError, Result};
use crate::eval::metrics::validate_relevance;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Relevance values of one query's retrieved items, in rank order.
///
/// Values are validated on construction (finite and non-negative) and cannot be
/// changed afterwards. An item counts as relevant when its value is > 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "QuerySpec")]
pub struct QueryResult {
    relevance: Vec<f64>,
    total_relevant: usize,
    /// Judged grades used for IDCG; `None` means the retrieved values themselves.
    ideal: Option<Vec<f64>>,
}

fn count_relevant(grades: &[f64]) -> usize {
    grades.iter().filter(|&&g| g > 0.0).count()
}

impl QueryResult {
    /// Builds a query whose relevant items are exactly the retrieved ones with value > 0.
    pub fn new(relevance: Vec<f64>) -> Result<Self> {
        validate_relevance(&relevance)?;
        Ok(Self {
            total_relevant: count_relevant(&relevance),
            relevance,
            ideal: None,
        })
    }

    /// Builds a query that has `total_relevant` relevant items overall, some of
    /// which may not have been retrieved.
    pub fn with_total_relevant(relevance: Vec<f64>, total_relevant: usize) -> Result<Self> {
        validate_relevance(&relevance)?;
        let retrieved = count_relevant(&relevance);
        if total_relevant < retrieved {
            return Err(MetricsError::InvalidInput(format!(
                "total_relevant is {} but {} relevant items were retrieved",
                total_relevant, retrieved
            )));
        }
        Ok(Self {
            relevance,
            total_relevant,
            ideal: None,
        })
    }

    /// Builds a query from retrieved document IDs and graded judgments.
    ///
    /// Unjudged documents get grade 0. A document retrieved more than once keeps
    /// its grade only at its first position. Every judged grade goes into the ideal
    /// pool, so relevant documents that were never retrieved still lower NDCG.
    pub fn from_documents(retrieved: &[String], judgments: &BTreeMap<String, f64>) -> Result<Self> {
        for (doc, &grade) in judgments {
            if !grade.is_finite() || grade < 0.0 {
                return Err(MetricsError::InvalidInput(format!(
                    "judgment for {} must be a non-negative number, got {}",
                    doc, grade
                )));
            }
        }

        let mut seen = HashSet::new();
        let relevance: Vec<f64> = retrieved
            .iter()
            .map(|doc| {
                if seen.insert(doc.as_str()) {
                    judgments.get(doc).copied().unwrap_or(0.0)
                } else {
                    0.0
                }
            })
            .collect();
        let ideal: Vec<f64> = judgments.values().copied().collect();

        Ok(Self {
            relevance,
            total_relevant: count_relevant(&ideal),
            ideal: Some(ideal),
        })
    }

    /// Relevance values in rank order.
    pub fn relevance(&self) -> &[f64] {
        &self.relevance
    }

    pub fn total_relevant(&self) -> usize {
        self.total_relevant
    }

    /// Grades IDCG is computed from.
    pub fn ideal_grades(&self) -> &[f64] {
        self.ideal.as_deref().unwrap_or(&self.relevance)
    }

    pub fn len(&self) -> usize {
        self.relevance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relevance.is_empty()
    }
}

/// One query as written in a judgment file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuerySpec {
    /// Relevance values in rank order, with an optional count of all relevant items.
    Graded {
        relevance: Vec<f64>,
        #[serde(default)]
        total_relevant: Option<usize>,
    },
    /// Retrieved document IDs plus binary (`relevant`) and/or graded (`judgments`) labels.
    /// A graded judgment wins over a binary one for the same document.
    Documents {
        retrieved: Vec<String>,
        #[serde(default)]
        relevant: Vec<String>,
        #[serde(default)]
        judgments: BTreeMap<String, f64>,
    },
}

impl TryFrom<QuerySpec> for QueryResult {
    type Error = MetricsError;

    fn try_from(spec: QuerySpec) -> Result<Self> {
        match spec {
            QuerySpec::Graded {
                relevance,
                total_relevant: Some(total),
            } => QueryResult::with_total_relevant(relevance, total),
            QuerySpec::Graded {
                relevance,
                total_relevant: None,
            } => QueryResult::new(relevance),
            QuerySpec::Documents {
                retrieved,
                relevant,
                mut judgments,
            } => {
                for doc in relevant {
                    judgments.entry(doc).or_insert(1.0);
                }
                QueryResult::from_documents(&retrieved, &judgments)
            }
        }
    }
}

impl TryFrom<Vec<f64>> for QueryResult {
    type Error = MetricsError;

    fn try_from(relevance: Vec<f64>) -> Result<Self> {
        QueryResult::new(relevance)
    }
}

/// Parses a judgment file: either a JSON array of queries or `{"queries": [...]}`.
pub fn parse_queries(json: &str) -> Result<Vec<QueryResult>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let list = match value {
        serde_json::Value::Object(mut map) => map.remove("queries").ok_or_else(|| {
            MetricsError::InvalidInput(
                "expected an array of queries or an object with a \"queries\" field".to_string(),
            )
        })?,
        other => other,
    };
    let specs: Vec<QuerySpec> = serde_json::from_value(list)?;

    specs
        .into_iter()
        .enumerate()
        .map(|(idx, spec)| {
            QueryResult::try_from(spec).map_err(|e| {
                log::warn!("query {} rejected: {}", idx + 1, e);
                e
            })
        })
        .collect()
}

/// Reads and parses a judgment file from disk.
pub fn load_queries(path: &Path) -> Result<Vec<QueryResult>> {
    let json = std::fs::read_to_string(path)?;
    let queries = parse_queries(&json)?;
    log::info!("Loaded {} queries from {}", queries.len(), path.display());
    Ok(queries)
}
