use std::time::Duration;

use parking_lot::Mutex;
use storeline_components::ReportQuery;
use tracing::info;

/// Totals returned by the report endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub orders: u64,
    pub revenue_cents: u64,
    pub hours: i64,
}

/// Stand-in for the REST report endpoint.
pub struct StubBackend {
    latency: Duration,
    requests: Mutex<Vec<ReportQuery>>,
}

impl StubBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn sales(&self, query: ReportQuery) -> SalesSummary {
        let params = query.params();
        info!(start = %params[0].1, end = %params[1].1, "GET /reports/sales");
        self.requests.lock().push(query);
        tokio::time::sleep(self.latency).await;

        let hours = (query.end - query.start).num_hours().max(0);
        SalesSummary {
            orders: hours as u64 * 12,
            revenue_cents: hours as u64 * 12 * 1_450,
            hours,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}
