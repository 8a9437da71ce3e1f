use serde_json::Value;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_check() {
    let server = TestContext::new().server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_version_reports_package() {
    let server = TestContext::new().server();

    let body = server.get("/version").await.json::<Value>();

    assert_eq!(body["name"], "signage-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
