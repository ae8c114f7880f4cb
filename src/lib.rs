pub mod config;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{MetricsError, Result};
pub use eval::{mrr, ndcg, recall_at_k, EvalReport, QueryResult};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send_sync::<QueryResult>();
        assert_send_sync::<EvalReport>();
        assert_send_sync::<MetricsError>();
        assert_send_sync::<Config>();
        assert_send_sync::<eval::QuerySpec>();
        assert_send_sync::<eval::demo::Scenario>();
    }
}
