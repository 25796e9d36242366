//! Mock Google API server for testing
//!
//! Simulates the OAuth token endpoint, Drive file search and the Sheets
//! metadata and append endpoints with wiremock.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path, path_regex, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const TEST_SPREADSHEET_ID: &str = "sheet-123";

/// Mock Google API server
pub struct GoogleApiMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub custom_response: Option<Value>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
            custom_response: None,
        }
    }
}

impl MockResponseConfig {
    pub fn error(status: u16) -> Self {
        Self {
            status,
            delay_ms: None,
            custom_response: Some(json!({
                "error": { "code": status, "message": format!("mock error {}", status), "status": "ERROR" }
            })),
        }
    }

    fn respond(self, default_body: Value) -> ResponseTemplate {
        let mut response = ResponseTemplate::new(self.status)
            .set_body_json(self.custom_response.unwrap_or(default_body));
        if let Some(delay) = self.delay_ms {
            response = response.set_delay(std::time::Duration::from_millis(delay));
        }
        response
    }
}

impl GoogleApiMockServer {
    /// Start a new mock server
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Token endpoint accepting a JWT bearer assertion
    pub async fn mock_token(&self, config: MockResponseConfig) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .respond_with(config.respond(json!({
                "access_token": TEST_ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(&self.server)
            .await;
    }

    /// Drive search returning `ids` as matching spreadsheets
    pub async fn mock_drive_search(&self, ids: &[&str]) {
        let files: Vec<Value> = ids.iter().map(|id| json!({ "id": id, "name": "Семейный бюджет" })).collect();
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
            .mount(&self.server)
            .await;
    }

    /// Spreadsheet metadata listing worksheets as (title, index)
    pub async fn mock_metadata(&self, sheets: &[(&str, i64)]) {
        let sheets: Vec<Value> = sheets
            .iter()
            .map(|(title, index)| json!({ "properties": { "title": title, "index": index } }))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/v4/spreadsheets/{}", TEST_SPREADSHEET_ID)))
            .and(query_param("fields", "sheets.properties(title,index)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": sheets })))
            .mount(&self.server)
            .await;
    }

    /// Append endpoint; `max_calls` limits how many requests this mock answers
    pub async fn mock_append(&self, config: MockResponseConfig, max_calls: Option<u64>) {
        let mut mock = Mock::given(method("POST"))
            .and(path_regex(format!(r"^/v4/spreadsheets/{}/values/.+:append$", TEST_SPREADSHEET_ID)))
            .and(query_param("valueInputOption", "RAW"))
            .and(query_param("insertDataOption", "INSERT_ROWS"))
            .respond_with(config.respond(json!({
                "spreadsheetId": TEST_SPREADSHEET_ID,
                "updates": { "updatedRows": 1 }
            })));
        if let Some(n) = max_calls {
            mock = mock.up_to_n_times(n);
        }
        mock.mount(&self.server).await;
    }

    /// Token, a single Drive match and one worksheet named "Лист1"
    pub async fn setup_default_mocks(&self) {
        self.mock_token(MockResponseConfig::default()).await;
        self.mock_drive_search(&[TEST_SPREADSHEET_ID]).await;
        self.mock_metadata(&[("Лист1", 0)]).await;
    }

    /// Requests received for paths ending in `suffix`
    pub async fn requests_to(&self, suffix: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with(suffix))
            .collect()
    }
}
