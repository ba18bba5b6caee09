//! Database metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record how long a usage store query took.
pub fn record_query_duration(query_name: &'static str, outcome: &'static str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name,
        "outcome" => outcome
    )
    .record(duration_secs);
}

/// Record connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one query and records it when finished.
///
/// ```ignore
/// let timer = QueryTimer::new("usage_query_by_device");
/// let result = sqlx::query_as::<_, UsageIntervalEntity>(...).fetch_all(&pool).await;
/// timer.finish(&result)
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time, labelled by whether `result` succeeded.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        record_query_duration(self.query_name, outcome, self.start.elapsed().as_secs_f64());
        result
    }
}
