//! Configuration loading from disk

use funding_rate_alert::config::AlertConfig;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_sample_config() {
    let config = AlertConfig::from_file("config/alert.toml").unwrap();
    assert_eq!(config.alert.poll_interval_secs, 300);
    assert_eq!(config.alert.alert_window_secs, 1800);
    assert_eq!(config.alert.top_n, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_expands_telegram_credentials() {
    std::env::set_var("FUNDING_ALERT_IT_CHAT", "-100123");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[binance]
rest_api_url = "https://fapi.binance.com"

[gate]
rest_api_url = "https://api.gateio.ws/api/v4"

[telegram]
bot_token = "token"
chat_id = "${{FUNDING_ALERT_IT_CHAT}}"
"#
    )
    .unwrap();

    let config = AlertConfig::from_file(file.path()).unwrap();
    assert_eq!(config.telegram.chat_id, "-100123");
    assert_eq!(config.telegram.api_url, "https://api.telegram.org");
    assert!(config.telegram.validate_credentials().is_ok());
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = AlertConfig::from_file("config/does-not-exist.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
