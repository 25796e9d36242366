//! Services module
//!
//! This module contains the external collaborators of the conversation
//! engine: Google authentication and the spreadsheet row sink.

pub mod google_auth;
pub mod sheets;

// Re-export commonly used services
pub use google_auth::{ServiceAccountAuth, ServiceAccountKey};
pub use sheets::{GoogleSheetsService, SheetTarget};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::state::RecordSink;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth: Arc<ServiceAccountAuth>,
    pub sheets_service: Arc<GoogleSheetsService>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub async fn new(settings: &Settings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.sheets.timeout_seconds))
            .user_agent("LedgerBuddy-Bot/1.0")
            .build()?;

        let key = ServiceAccountKey::from_config(&settings.sheets).await?;
        let auth = Arc::new(ServiceAccountAuth::new(key, http_client.clone())?);
        let sheets_service = Arc::new(GoogleSheetsService::new(
            settings.sheets.clone(),
            auth.clone(),
            http_client,
        ));

        Ok(Self {
            auth,
            sheets_service,
        })
    }

    /// Resolve the spreadsheet up front so a bad setup stops the bot at startup
    pub async fn connect(&self) -> Result<SheetTarget> {
        Ok(self.sheets_service.connect().await?.clone())
    }

    /// The sink the conversation engine writes finished records to
    pub fn record_sink(&self) -> Arc<dyn RecordSink> {
        self.sheets_service.clone()
    }
}
