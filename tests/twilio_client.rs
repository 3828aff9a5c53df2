use httpmock::prelude::*;
use voice_broadcast_api::config::TwilioConfig;
use voice_broadcast_api::gateway::{CallGateway, GatewayError, TwilioClient};

const CALLS_PATH: &str = "/2010-04-01/Accounts/AC123/Calls.json";
const AUDIO_URL: &str = "https://voice.example.com/uploads/1700000000000-deadbeef.mp3?v=1&k=2";
// Form-encoded play_twiml(AUDIO_URL); the `&` arrives XML-escaped as `&amp;`.
const ENCODED_TWIML: &str = "Twiml=%3CResponse%3E%3CPlay%3Ehttps%3A%2F%2Fvoice.example.com%2Fuploads%2F1700000000000-deadbeef.mp3%3Fv%3D1%26amp%3Bk%3D2%3C%2FPlay%3E%3C%2FResponse%3E";

fn client(server: &MockServer) -> TwilioClient {
    TwilioClient::new(&TwilioConfig {
        account_sid: "AC123".into(),
        auth_token: "secret".into(),
        from_number: "+15550009999".into(),
        api_base: server.base_url(),
    })
    .unwrap()
}

#[tokio::test]
async fn creates_call_and_returns_sid() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CALLS_PATH)
                // base64("AC123:secret")
                .header("Authorization", "Basic QUMxMjM6c2VjcmV0")
                .body_contains("To=%2B15550001111")
                .body_contains("From=%2B15550009999")
                .body_contains(ENCODED_TWIML);
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"sid": "CA0123456789", "status": "queued"}));
        })
        .await;

    let sid = client(&server)
        .place_call(AUDIO_URL, "+15550001111")
        .await
        .unwrap();

    assert_eq!(sid, "CA0123456789");
    mock.assert_async().await;
}

#[tokio::test]
async fn provider_rejection_carries_its_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CALLS_PATH);
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "code": 21211,
                    "message": "The 'To' number 123 is not a valid phone number.",
                    "status": 400
                }));
        })
        .await;

    let err = client(&server).place_call(AUDIO_URL, "123").await.unwrap_err();

    match &err {
        GatewayError::Rejected { status, message } => {
            assert_eq!(*status, 400);
            assert!(message.contains("not a valid phone number"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn response_without_sid_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CALLS_PATH);
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"status": "queued"}));
        })
        .await;

    let err = client(&server)
        .place_call(AUDIO_URL, "+15550001111")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let client = TwilioClient::new(&TwilioConfig {
        account_sid: "AC123".into(),
        auth_token: "secret".into(),
        from_number: "+15550009999".into(),
        api_base: "http://127.0.0.1:1".into(),
    })
    .unwrap();

    let err = client.place_call(AUDIO_URL, "+15550001111").await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(!err.to_string().is_empty());
}
