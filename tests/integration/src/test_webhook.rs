//! Signed webhook integration tests.

#[cfg(test)]
mod tests {
    use crate::{http_client, post_webhook, sign_webhook, test_token, webhook_url};

    const PARAMS: &[(&str, &str)] = &[
        ("From", "+14158675310"),
        ("To", "+18005550100"),
        ("Body", "hello from the integration suite"),
    ];

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_correctly_signed_webhook() {
        let client = http_client();
        let url = webhook_url("/sms");
        let signature = sign_webhook(&url, PARAMS, &test_token());

        let resp = post_webhook(&client, &url, PARAMS, Some(&signature)).await;

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_regardless_of_param_order() {
        let client = http_client();
        let url = webhook_url("/sms");
        let signature = sign_webhook(&url, PARAMS, &test_token());

        let mut reversed = PARAMS.to_vec();
        reversed.reverse();
        let resp = post_webhook(&client, &url, &reversed, Some(&signature)).await;

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_every_failure_identically() {
        let client = http_client();
        let url = webhook_url("/sms");
        let wrong_key = sign_webhook(&url, PARAMS, "not-a-configured-secret");

        let missing = post_webhook(&client, &url, PARAMS, None).await;
        let garbled = post_webhook(&client, &url, PARAMS, Some("%%% not base64 %%%")).await;
        let mismatched = post_webhook(&client, &url, PARAMS, Some(&wrong_key)).await;

        let mut bodies = Vec::new();
        for resp in [missing, garbled, mismatched] {
            assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
            bodies.push(resp.text().await.expect("read body"));
        }
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_tampered_params() {
        let client = http_client();
        let url = webhook_url("/sms");
        let signature = sign_webhook(&url, PARAMS, &test_token());

        let mut tampered = PARAMS.to_vec();
        tampered[2] = ("Body", "hello from someone else");
        let resp = post_webhook(&client, &url, &tampered, Some(&signature)).await;

        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_signature_for_other_path() {
        let client = http_client();
        let signature = sign_webhook(&webhook_url("/voice"), PARAMS, &test_token());

        let resp = post_webhook(&client, &webhook_url("/sms"), PARAMS, Some(&signature)).await;

        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_duplicate_param_names() {
        let client = http_client();
        let url = webhook_url("/sms");
        let params = [("Body", "one"), ("Body", "two")];
        let signature = sign_webhook(&url, &params[..1], &test_token());

        let resp = post_webhook(&client, &url, &params, Some(&signature)).await;

        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
