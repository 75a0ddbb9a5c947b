//! Optional observability: OpenTelemetry instruments (`metrics` feature) and
//! `tracing` spans (`tracing` feature).

#[cfg(feature = "metrics")]
pub use otel::{CatalogMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
        KeyValue,
    };
    use std::time::Duration;

    pub static METRICS: Lazy<CatalogMetrics> = Lazy::new(CatalogMetrics::init);

    pub struct CatalogMetrics {
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub connection_wait_duration: Histogram<f64>,
        pub ids_allocated_total: Counter<u64>,
    }

    impl CatalogMetrics {
        pub fn init() -> Self {
            let meter = global::meter("catalog_options");

            let queries_total = meter
                .u64_counter("catalog_queries_total")
                .with_description("Total statements executed")
                .build();

            let query_errors_total = meter
                .u64_counter("catalog_query_errors_total")
                .with_description("Statements that returned an error")
                .build();

            let query_duration = meter
                .f64_histogram("catalog_query_duration_seconds")
                .with_description("Duration of statements")
                .build();

            let connection_wait_duration = meter
                .f64_histogram("catalog_connection_wait_seconds")
                .with_description("Time spent establishing connections")
                .build();

            let ids_allocated_total = meter
                .u64_counter("catalog_ids_allocated_total")
                .with_description("Identifiers reserved by id generators")
                .build();

            Self {
                queries_total,
                query_errors_total,
                query_duration,
                connection_wait_duration,
                ids_allocated_total,
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors_total.add(1, &[]);
        }

        pub fn record_connection_wait(&self, elapsed: Duration) {
            self.connection_wait_duration
                .record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_ids_allocated(&self, segment: &str, count: u64) {
            self.ids_allocated_total
                .add(count, &[KeyValue::new("segment", segment.to_string())]);
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    pub fn execute_query_span(query: &str) -> Span {
        info_span!("catalog.execute_query", db.statement = %query)
    }

    pub fn acquire_connection_span() -> Span {
        info_span!("catalog.acquire_connection")
    }

    pub fn begin_transaction_span() -> Span {
        info_span!("catalog.begin_transaction")
    }

    pub fn commit_transaction_span() -> Span {
        info_span!("catalog.commit_transaction")
    }

    pub fn rollback_transaction_span() -> Span {
        info_span!("catalog.rollback_transaction")
    }

    pub fn repository_span(operation: &'static str, option_id: Option<i64>) -> Span {
        info_span!("catalog.repository", operation, option_id = ?option_id)
    }
}
