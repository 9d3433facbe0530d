use std::net::SocketAddr;
use std::time::Instant;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total HTTP requests handled. Labels: route, status.
pub const REQUESTS_TOTAL: &str = "testdrive_requests_total";

/// Histogram: request latency in seconds. Labels: route.
pub const REQUEST_DURATION_SECONDS: &str = "testdrive_request_duration_seconds";

// ── Ledger metrics ──────────────────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "testdrive_bookings_created_total";

/// Counter: booking requests rejected by the validator. Labels: reason.
pub const BOOKINGS_REJECTED_TOTAL: &str = "testdrive_bookings_rejected_total";

/// Counter: bookings cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "testdrive_bookings_cancelled_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: dealers in the loaded dataset.
pub const DATASET_DEALERS: &str = "testdrive_dataset_dealers";

/// Gauge: bookings (active and cancelled) in the loaded dataset.
pub const DATASET_BOOKINGS: &str = "testdrive_dataset_bookings";

/// Histogram: dataset write-back duration in seconds.
pub const PERSIST_DURATION_SECONDS: &str = "testdrive_persist_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> anyhow::Result<()> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Record one handled request against its matched route template.
pub fn record_request(route: &str, status: u16, started: Instant) {
    let route = route.to_string();
    metrics::counter!(REQUESTS_TOTAL, "route" => route.clone(), "status" => status.to_string())
        .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "route" => route)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_dataset_size(dealers: usize, bookings: usize) {
    metrics::gauge!(DATASET_DEALERS).set(dealers as f64);
    metrics::gauge!(DATASET_BOOKINGS).set(bookings as f64);
}
