//! Telegram delivery against a mocked Bot API

use funding_rate_alert::{
    alert::{Notifier, TelegramNotifier},
    config::TelegramConfig,
};
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn telegram_config(server: &MockServer) -> TelegramConfig {
    TelegramConfig {
        api_url: server.uri(),
        bot_token: "123:abc".to_string(),
        chat_id: "42".to_string(),
    }
}

#[tokio::test]
async fn test_send_message_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_string_contains("chat_id=42"))
        .and(body_string_contains("parse_mode=Markdown"))
        .and(body_string_contains("funding"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"result":{"message_id":7}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new(&telegram_config(&server)).unwrap();
    notifier.send("funding").await.unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#),
        )
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new(&telegram_config(&server)).unwrap();
    let err = notifier.send("funding").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("400"));
    assert!(!message.contains("123:abc"));
}
