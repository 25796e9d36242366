//! Google Sheets service implementation
//!
//! Appends finished records as rows to the configured worksheet. The target
//! spreadsheet can be given by id or by exact title, in which case it is
//! looked up through the Drive API; without an explicit worksheet the first
//! one is used.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;
use crate::config::SheetsConfig;
use crate::models::FinalizedRecord;
use crate::state::RecordSink;
use crate::utils::errors::{Result, SheetsError, SheetsResult};
use crate::utils::logging;
use super::google_auth::ServiceAccountAuth;

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Resolved spreadsheet and worksheet rows are appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub worksheet: String,
}

impl SheetTarget {
    /// A1 range covering the worksheet, quoted for titles with spaces
    pub fn range(&self) -> String {
        format!("'{}'!A1", self.worksheet.replace('\'', "''"))
    }
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: i64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google Sheets row appender
pub struct GoogleSheetsService {
    config: SheetsConfig,
    auth: Arc<ServiceAccountAuth>,
    http_client: reqwest::Client,
    target: OnceCell<SheetTarget>,
}

impl GoogleSheetsService {
    /// Create a new GoogleSheetsService instance
    pub fn new(config: SheetsConfig, auth: Arc<ServiceAccountAuth>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            auth,
            http_client,
            target: OnceCell::new(),
        }
    }

    /// Resolve the spreadsheet and worksheet once; later calls reuse the result
    pub async fn connect(&self) -> SheetsResult<&SheetTarget> {
        self.target.get_or_try_init(|| self.resolve_target()).await
    }

    async fn resolve_target(&self) -> SheetsResult<SheetTarget> {
        let spreadsheet_id = match self.config.spreadsheet_id.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let name = self.config.spreadsheet_name.as_deref().unwrap_or_default();
                self.find_spreadsheet_by_name(name).await?
            }
        };

        let titles = self.worksheet_titles(&spreadsheet_id).await?;
        let worksheet = match self.config.worksheet.as_deref().filter(|s| !s.is_empty()) {
            Some(wanted) => titles.into_iter().find(|t| t == wanted)
                .ok_or_else(|| SheetsError::WorksheetNotFound(wanted.to_string()))?,
            None => titles.into_iter().next()
                .ok_or_else(|| SheetsError::WorksheetNotFound(format!("no worksheets in {}", spreadsheet_id)))?,
        };

        info!(spreadsheet_id = %spreadsheet_id, worksheet = %worksheet, as_account = %self.auth.client_email(),
              "Connected to spreadsheet");
        Ok(SheetTarget { spreadsheet_id, worksheet })
    }

    /// Look a spreadsheet up by its exact title among files shared with the service account
    pub async fn find_spreadsheet_by_name(&self, name: &str) -> SheetsResult<String> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );

        let mut url = self.endpoint(&self.config.drive_api_url, "files")?;
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("fields", "files(id,name)")
            .append_pair("pageSize", "10")
            .append_pair("supportsAllDrives", "true")
            .append_pair("includeItemsFromAllDrives", "true");

        debug!(name = %name, "Searching spreadsheet by name");
        let response = self.authorized(self.http_client.get(url)).await?.send().await?;
        let list: DriveFileList = parse_json(check_status(response).await?).await?;

        list.files.into_iter().next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    /// Worksheet titles ordered by their position in the spreadsheet
    pub async fn worksheet_titles(&self, spreadsheet_id: &str) -> SheetsResult<Vec<String>> {
        let mut url = self.endpoint(
            &self.config.sheets_api_url,
            &format!("spreadsheets/{}", urlencoding::encode(spreadsheet_id)),
        )?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties(title,index)");

        let response = self.authorized(self.http_client.get(url)).await?.send().await?;
        let metadata: SpreadsheetMetadata = parse_json(check_status(response).await?).await?;

        let mut sheets: Vec<SheetProperties> = metadata.sheets.into_iter().map(|s| s.properties).collect();
        sheets.sort_by_key(|p| p.index);
        Ok(sheets.into_iter().map(|p| p.title).collect())
    }

    /// Append one row.
    ///
    /// Appending is not idempotent, so only attempts Google refused or that
    /// never reached it are retried, with exponential backoff. A timeout or a
    /// server error surfaces as [`SheetsError::WriteUncertain`].
    pub async fn append_values(&self, row: Vec<Value>) -> SheetsResult<()> {
        let target = self.connect().await?;
        let body = json!({
            "majorDimension": "ROWS",
            "values": [row],
        });

        let mut attempt: u32 = 0;
        loop {
            match self.try_append(target, &body).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.config.max_retries && e.is_safe_to_resend() => {
                    if is_unauthorized(&e) {
                        self.auth.invalidate().await;
                    }
                    let delay = self.backoff(attempt);
                    warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, error = %e,
                          "Append failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    logging::log_api_error("sheets.append", &e.to_string(), Some(&target.spreadsheet_id));
                    return Err(e);
                }
            }
        }
    }

    async fn try_append(&self, target: &SheetTarget, body: &Value) -> SheetsResult<()> {
        let mut url = self.endpoint(
            &self.config.sheets_api_url,
            &format!(
                "spreadsheets/{}/values/{}:append",
                urlencoding::encode(&target.spreadsheet_id),
                urlencoding::encode(&target.range())
            ),
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let request = self.authorized(self.http_client.post(url)).await?.json(body);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => return Err(e.into()),
            // Sent, but no answer: Google may have committed the row
            Err(e) => return Err(SheetsError::WriteUncertain(e.to_string())),
        };

        match check_status(response).await {
            Ok(_) => {}
            Err(SheetsError::Api { status, message }) if status >= 500 => {
                return Err(SheetsError::WriteUncertain(format!("{}: {}", status, message)));
            }
            Err(e) => return Err(e),
        }
        debug!(spreadsheet_id = %target.spreadsheet_id, worksheet = %target.worksheet, "Row appended");
        Ok(())
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> SheetsResult<reqwest::RequestBuilder> {
        let token = self.auth.access_token().await?;
        Ok(request.bearer_auth(token))
    }

    fn endpoint(&self, base: &str, path: &str) -> SheetsResult<Url> {
        let raw = format!("{}/{}", base.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| SheetsError::InvalidResponse(format!("bad endpoint {}: {}", raw, e)))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(1u64 << attempt.min(16)))
    }
}

#[async_trait]
impl RecordSink for GoogleSheetsService {
    async fn append_row(&self, record: &FinalizedRecord) -> Result<()> {
        Ok(self.append_values(record.to_row()).await?)
    }
}

impl std::fmt::Debug for GoogleSheetsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsService")
            .field("target", &self.target.get())
            .finish_non_exhaustive()
    }
}

fn is_unauthorized(e: &SheetsError) -> bool {
    matches!(e, SheetsError::Api { status: 401, .. })
}

/// Turn a non-2xx response into an API error carrying Google's message
async fn check_status(response: reqwest::Response) -> SheetsResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    Err(SheetsError::Api { status: status.as_u16(), message })
}

async fn parse_json<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> SheetsResult<T> {
    response.json::<T>().await.map_err(|e| SheetsError::InvalidResponse(e.to_string()))
}
