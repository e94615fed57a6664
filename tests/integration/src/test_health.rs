//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use crate::{endpoint_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running_on_health() {
        let client = http_client();

        let resp = client
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .expect("health request failed");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(
            resp.headers().get("server").and_then(|v| v.to_str().ok()),
            Some("Hookgate"),
        );

        let text = resp.text().await.expect("read body");
        let body: serde_json::Value = serde_json::from_str(&text).expect("json body");
        assert_eq!(body["status"], "running");
        assert_eq!(body["service"], "hookgate");
    }
}
