// SPDX-License-Identifier: Apache-2.0

use mixfolio_store::{CatalogSource, ResolveError};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default)]
pub struct ServerMetrics {
    pub assets_served: AtomicU64,
    pub asset_bytes_served: AtomicU64,
    pub asset_not_found: AtomicU64,
    pub asset_invalid_path: AtomicU64,
    pub asset_io_failures: AtomicU64,
    pub asset_timeouts: AtomicU64,
    pub catalog_document_loads: AtomicU64,
    pub catalog_fallback_loads: AtomicU64,
    pub catalog_dropped_records: AtomicU64,
    requests: Mutex<BTreeMap<(&'static str, u16), u64>>,
}

impl ServerMetrics {
    pub async fn observe_request(&self, route: &'static str, status: u16) {
        let mut requests = self.requests.lock().await;
        *requests.entry((route, status)).or_insert(0) += 1;
    }

    pub fn observe_asset_served(&self, bytes: usize) {
        self.assets_served.fetch_add(1, Ordering::Relaxed);
        self.asset_bytes_served
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn observe_resolve_error(&self, err: &ResolveError) {
        let counter = match err {
            ResolveError::InvalidPath { .. } => &self.asset_invalid_path,
            ResolveError::NotFound { .. } => &self.asset_not_found,
            ResolveError::Storage { .. } => &self.asset_io_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_catalog(&self, source: &CatalogSource) {
        match source {
            CatalogSource::Document { dropped_records } => {
                self.catalog_document_loads.fetch_add(1, Ordering::Relaxed);
                self.catalog_dropped_records
                    .fetch_add(*dropped_records as u64, Ordering::Relaxed);
            }
            CatalogSource::Fallback { .. } => {
                self.catalog_fallback_loads.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Prometheus text exposition.
    pub async fn render(&self, backend: &str) -> String {
        let mut body = String::new();
        let _ = writeln!(
            body,
            "mixfolio_build_info{{version=\"{METRIC_VERSION}\",backend=\"{backend}\"}} 1"
        );
        for (name, counter) in [
            ("mixfolio_assets_served_total", &self.assets_served),
            ("mixfolio_asset_bytes_served_total", &self.asset_bytes_served),
            ("mixfolio_asset_not_found_total", &self.asset_not_found),
            ("mixfolio_asset_invalid_path_total", &self.asset_invalid_path),
            ("mixfolio_asset_io_failures_total", &self.asset_io_failures),
            ("mixfolio_asset_timeouts_total", &self.asset_timeouts),
            (
                "mixfolio_catalog_dropped_records_total",
                &self.catalog_dropped_records,
            ),
        ] {
            let _ = writeln!(body, "{name} {}", counter.load(Ordering::Relaxed));
        }
        for (source, counter) in [
            ("document", &self.catalog_document_loads),
            ("fallback", &self.catalog_fallback_loads),
        ] {
            let _ = writeln!(
                body,
                "mixfolio_catalog_loads_total{{source=\"{source}\"}} {}",
                counter.load(Ordering::Relaxed)
            );
        }
        for ((route, status), count) in self.requests.lock().await.iter() {
            let _ = writeln!(
                body,
                "mixfolio_http_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}"
            );
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixfolio_store::CatalogLoadFailure;

    #[tokio::test]
    async fn render_lists_counters_and_request_series() {
        let metrics = ServerMetrics::default();
        metrics.observe_asset_served(1024);
        metrics.observe_resolve_error(&ResolveError::NotFound {
            logical_id: "Comet".to_string(),
            tried: Vec::new(),
        });
        metrics.observe_catalog(&CatalogSource::Fallback {
            reason: CatalogLoadFailure::Missing,
        });
        metrics.observe_request("/files/*path", 200).await;
        metrics.observe_request("/files/*path", 200).await;

        let text = metrics.render("localfs").await;
        assert!(text.contains("mixfolio_asset_bytes_served_total 1024\n"));
        assert!(text.contains("mixfolio_asset_not_found_total 1\n"));
        assert!(text.contains("mixfolio_asset_io_failures_total 0\n"));
        assert!(text.contains("mixfolio_catalog_loads_total{source=\"fallback\"} 1\n"));
        assert!(text
            .contains("mixfolio_http_requests_total{route=\"/files/*path\",status=\"200\"} 2\n"));
        assert!(text.contains("backend=\"localfs\""));
    }
}
