//! Fixtures shared by the tool tests.

use shellcache_client::worker::testing::FakeNetwork;
use shellcache_client::{OfflineController, WorkerSettings};
use shellcache_core::{AppConfig, CacheDb};

pub(crate) async fn worker() -> OfflineController<CacheDb, FakeNetwork> {
    let network = FakeNetwork::new();
    network.serve("/weekly-meals/", "<h1>This week</h1>");
    network.serve("/weekly-meals/meals/", "<ul>meals</ul>");
    network.serve("/weekly-meals/weekly-plan/", "<table>plan</table>");
    network.serve("/weekly-meals/extra/", "<p>extra</p>");
    network.serve("/about/", "<p>about</p>");

    let db = CacheDb::open_in_memory().await.unwrap();
    let settings = WorkerSettings::from_config(&AppConfig::default()).unwrap();
    OfflineController::new(db.into(), network.into(), settings)
}

/// The JSON payload of a successful tool result.
pub(crate) fn payload(result: &rmcp::model::CallToolResult) -> serde_json::Value {
    let text = result.content[0].as_text().unwrap().text.clone();
    serde_json::from_str(&text).unwrap()
}
