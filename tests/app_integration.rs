use std::fs;
use std::io::Write;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_quote_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        let currency_response = r#"{
            "Realtime Currency Exchange Rate": {
                "1. From_Currency Code": "USD",
                "3. To_Currency Code": "RUB",
                "5. Exchange Rate": "75.50"
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "CURRENCY_EXCHANGE_RATE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(currency_response))
            .mount(&mock_server)
            .await;

        let stock_response = r#"{
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "150.6500"
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "GLOBAL_QUOTE"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_settings_file() -> tempfile::NamedTempFile {
    let mut settings_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    settings_file
        .write_all(br#"{"user_currencies": ["USD"], "user_stocks": ["AAPL"]}"#)
        .expect("Failed to write settings file");
    settings_file
}

#[test_log::test(tokio::test)]
async fn test_dashboard_merges_mocked_quotes() {
    use finsight::core::dashboard;
    use finsight::core::settings::UserSettings;
    use finsight::providers::AlphaVantageProvider;
    use finsight::statement::ExcelStatementSource;

    let mock_server = test_utils::create_quote_mock_server().await;

    let settings_file = write_settings_file();
    let settings = UserSettings::load_from_path(settings_file.path());

    // A missing statement file degrades to an empty batch.
    let source = ExcelStatementSource::new("no_such_operations.xlsx");
    let provider = AlphaVantageProvider::new(&mock_server.uri(), "test-key", "RUB")
        .expect("Failed to build provider");

    let response = dashboard::build(
        "2023-05-20 12:00:00",
        &source,
        &settings,
        &provider,
        &provider,
        &|| {},
    )
    .await;

    let value = serde_json::to_value(&response).expect("Failed to serialize dashboard");
    assert_eq!(value["greeting"], "Good afternoon");
    assert!(value["cards"].as_array().expect("cards missing").is_empty());
    assert!(
        value["top_transactions"]
            .as_array()
            .expect("top_transactions missing")
            .is_empty()
    );
    assert_eq!(value["currency_rates"][0]["currency"], "USD");
    assert_eq!(value["currency_rates"][0]["rate"], 75.5);
    assert_eq!(value["stock_prices"][0]["stock"], "AAPL");
    assert_eq!(value["stock_prices"][0]["price"], 150.65);
}

#[test_log::test(tokio::test)]
async fn test_full_home_flow_with_mock() {
    let mock_server = test_utils::create_quote_mock_server().await;
    let settings_file = write_settings_file();

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
        statement_path: "no_such_operations.xlsx"
        settings_path: {:?}
        providers:
          alpha_vantage:
            base_url: {:?}
            api_key: "test-key"
        base_currency: "RUB"
    "#,
        settings_file.path(),
        mock_server.uri()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = finsight::run_command(
        finsight::AppCommand::Home {
            datetime: "2023-05-20 12:00:00".to_string(),
        },
        Some(config_file.path().to_str().expect("non-utf8 temp path")),
    )
    .await;
    assert!(
        result.is_ok(),
        "Home command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_cashback_flow_with_missing_statement() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = r#"
        statement_path: "no_such_operations.xlsx"
        settings_path: "no_such_settings.json"
        base_currency: "RUB"
    "#;
    fs::write(config_file.path(), config_content).expect("Failed to write config file");

    let result = finsight::run_command(
        finsight::AppCommand::Cashback {
            year: 2023,
            month: 10,
        },
        Some(config_file.path().to_str().expect("non-utf8 temp path")),
    )
    .await;
    assert!(
        result.is_ok(),
        "Cashback command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_report_rejects_malformed_date() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = r#"
        statement_path: "no_such_operations.xlsx"
        settings_path: "no_such_settings.json"
        base_currency: "RUB"
    "#;
    fs::write(config_file.path(), config_content).expect("Failed to write config file");

    let result = finsight::run_command(
        finsight::AppCommand::Report {
            category: "Groceries".to_string(),
            date: Some("15.05.2023".to_string()),
        },
        Some(config_file.path().to_str().expect("non-utf8 temp path")),
    )
    .await;
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Invalid date")
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_config_fails_with_context() {
    let result = finsight::run_command(
        finsight::AppCommand::Cashback { year: 2023, month: 1 },
        Some("no_such_config.yaml"),
    )
    .await;
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}
