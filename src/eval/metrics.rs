//! Evaluation metrics: Mean Reciprocal Rank (MRR), NDCG@K, and Recall@K.
//!
//! Per-query functions take a relevance sequence in rank order. Aggregates take a
//! slice of [`QueryResult`] and return the arithmetic mean of the per-query scores,
//! or 0.0 for an empty slice.

use crate::error::{MetricsError, Result};
use crate::eval::QueryResult;

/// Rejects NaN, infinite and negative relevance values. Positions are 1-indexed.
pub(crate) fn validate_relevance(relevance: &[f64]) -> Result<()> {
    for (idx, &value) in relevance.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidRelevance {
                position: idx + 1,
                value,
            });
        }
    }
    Ok(())
}

fn validate_cutoff(k: usize) -> Result<()> {
    if k == 0 {
        return Err(MetricsError::InvalidCutoff(k));
    }
    Ok(())
}

fn is_relevant(value: f64) -> bool {
    value > 0.0
}

/// Mean of the scores, 0.0 when there are none.
fn mean(scores: impl IntoIterator<Item = Result<f64>>) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for score in scores {
        sum += score?;
        count += 1;
    }
    if count == 0 {
        return Ok(0.0);
    }
    Ok(sum / count as f64)
}

/// Unchecked DCG over the first `k` grades, each divided by `scale`.
fn dcg(grades: &[f64], k: usize, scale: f64) -> f64 {
    grades
        .iter()
        .take(k)
        .enumerate()
        .map(|(idx, &rel)| (rel / scale) / ((idx + 2) as f64).log2())
        .sum()
}

/// Reciprocal rank of one query: 1/rank of the first item with relevance > 0.
/// Returns 0.0 when there is no relevant item, including for an empty sequence.
pub fn reciprocal_rank(relevance: &[f64]) -> Result<f64> {
    validate_relevance(relevance)?;
    Ok(relevance
        .iter()
        .position(|&rel| is_relevant(rel))
        .map(|idx| 1.0 / (idx + 1) as f64)
        .unwrap_or(0.0))
}

/// Discounted cumulative gain: sum of rel_i / log2(i + 1) for i = 1..=min(k, len).
///
/// Grades large enough for the sum to overflow are rejected.
pub fn dcg_at_k(grades: &[f64], k: usize) -> Result<f64> {
    validate_cutoff(k)?;
    validate_relevance(grades)?;
    let sum = dcg(grades, k, 1.0);
    if !sum.is_finite() {
        return Err(MetricsError::InvalidInput(format!(
            "DCG@{} overflows for the given grades",
            k
        )));
    }
    Ok(sum)
}

/// NDCG@K for one query, with the ideal ordering taken from the same values.
///
/// Returns 0.0 when IDCG@K is 0 (no relevant items).
pub fn ndcg_at_k(relevance: &[f64], k: usize) -> Result<f64> {
    ndcg_at_k_with_ideal(relevance, relevance, k)
}

/// NDCG@K for one query, with IDCG computed from a separate pool of judged grades.
///
/// `ideal` must hold every grade that appears in `relevance`; a pool that scores
/// below the retrieved ranking is rejected.
pub fn ndcg_at_k_with_ideal(relevance: &[f64], ideal: &[f64], k: usize) -> Result<f64> {
    validate_cutoff(k)?;
    validate_relevance(relevance)?;
    validate_relevance(ideal)?;

    let mut sorted = ideal.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    // NDCG is scale-invariant; dividing by the top ideal grade keeps both sums finite.
    let scale = sorted.first().copied().unwrap_or(0.0);
    if scale == 0.0 {
        return Ok(0.0);
    }
    let idcg = dcg(&sorted, k, scale);

    let score = dcg(relevance, k, scale) / idcg;
    if !score.is_finite() || score > 1.0 + 1e-9 {
        return Err(MetricsError::InvalidInput(format!(
            "ideal grades do not cover the retrieved grades (NDCG {:.4} > 1)",
            score
        )));
    }
    Ok(score.min(1.0))
}

/// Recall@K for one query: relevant items in the top `k` divided by `total_relevant`.
///
/// Returns 0.0 when `total_relevant` is 0. `k` past the end of the sequence is clamped.
pub fn query_recall_at_k(relevance: &[f64], total_relevant: usize, k: usize) -> Result<f64> {
    validate_cutoff(k)?;
    validate_relevance(relevance)?;

    let retrieved_relevant = relevance.iter().filter(|&&rel| is_relevant(rel)).count();
    if retrieved_relevant > total_relevant {
        return Err(MetricsError::InvalidInput(format!(
            "total_relevant is {} but {} relevant items were retrieved",
            total_relevant, retrieved_relevant
        )));
    }
    if total_relevant == 0 {
        return Ok(0.0);
    }

    let found = relevance
        .iter()
        .take(k)
        .filter(|&&rel| is_relevant(rel))
        .count();
    Ok(found as f64 / total_relevant as f64)
}

/// Mean Reciprocal Rank across queries. Returns 0.0 if `queries` is empty.
pub fn mrr(queries: &[QueryResult]) -> Result<f64> {
    mean(queries.iter().map(|q| reciprocal_rank(q.relevance())))
}

/// Mean NDCG@K across queries. Returns 0.0 if `queries` is empty.
pub fn ndcg(queries: &[QueryResult], k: usize) -> Result<f64> {
    validate_cutoff(k)?;
    mean(
        queries
            .iter()
            .map(|q| ndcg_at_k_with_ideal(q.relevance(), q.ideal_grades(), k)),
    )
}

/// Mean Recall@K across queries. Returns 0.0 if `queries` is empty.
///
/// Queries without any relevant item score 0.0 and are still counted in the mean.
pub fn recall_at_k(queries: &[QueryResult], k: usize) -> Result<f64> {
    validate_cutoff(k)?;
    mean(queries.iter().enumerate().map(|(idx, q)| {
        if q.total_relevant() == 0 {
            log::debug!("query {} has no relevant items, Recall@{} = 0", idx + 1, k);
        }
        query_recall_at_k(q.relevance(), q.total_relevant(), k)
    }))
}

/// Mean Recall@K for each cutoff, as `(k, recall)` pairs in the order given.
pub fn recall_at_ks(queries: &[QueryResult], ks: &[usize]) -> Result<Vec<(usize, f64)>> {
    ks.iter()
        .map(|&k| recall_at_k(queries, k).map(|recall| (k, recall)))
        .collect()
}
