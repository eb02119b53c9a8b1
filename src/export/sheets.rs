//! Google Sheets sink: append rows through the Sheets API v4.
//!
//! Authentication is a bearer token read from an environment variable named
//! in configuration, at export time. When no worksheet is configured the
//! spreadsheet's first worksheet is used.

use std::{env, time::Duration};

use reqwest::{StatusCode, Url, blocking::Client};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::SheetsConfig;

use super::{ExportError, ExportRow, Exporter, Result};

/// Appends rows to a Google spreadsheet.
pub struct SheetsExporter {
    config: SheetsConfig,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

impl SheetsExporter {
    pub fn new(config: SheetsConfig) -> Self {
        Self { config }
    }

    fn spreadsheet_id(&self) -> Result<&str> {
        match self.config.spreadsheet_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ExportError::NotConfigured(
                "set export.sheets.spreadsheet-id in the config file".into(),
            )),
        }
    }

    fn token(&self) -> Result<String> {
        match env::var(&self.config.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ExportError::MissingToken(self.config.token_env.clone())),
        }
    }

    fn client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?)
    }

    /// Title of the first worksheet in the spreadsheet.
    fn primary_worksheet(&self, client: &Client, id: &str, token: &str) -> Result<String> {
        let mut url = spreadsheet_url(&self.config.endpoint, id)?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let response = client.get(url).bearer_auth(token).send()?;
        let status = response.status();
        let body = response.text()?;
        check_status(status, &body, &format!("spreadsheet {id}"))?;

        let meta: SpreadsheetMeta = serde_json::from_str(&body)?;
        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| ExportError::NotFound(format!("spreadsheet {id} has no worksheets")))
    }

    /// Resolve the worksheet and append one row to it.
    fn send_row(&self, client: &Client, id: &str, token: &str, row: &ExportRow) -> Result<()> {
        let worksheet = match &self.config.worksheet {
            Some(name) => name.clone(),
            None => self.primary_worksheet(client, id, token)?,
        };
        debug!(worksheet = %worksheet, cells = row.cells().len(), "appending row");

        let url = append_url(&self.config.endpoint, id, &worksheet)?;
        let response = client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row.cells()] }))
            .send()?;
        let status = response.status();
        let body = response.text()?;
        check_status(status, &body, &format!("worksheet '{worksheet}' in {id}"))
    }
}

impl Exporter for SheetsExporter {
    fn describe(&self) -> String {
        match &self.config.spreadsheet_id {
            Some(id) => format!("Google Sheets ({id})"),
            None => "Google Sheets".to_string(),
        }
    }

    fn append_row(&self, row: &ExportRow) -> Result<()> {
        let id = self.spreadsheet_id()?;
        let token = self.token()?;
        let client = self.client()?;
        self.send_row(&client, id, &token, row)
    }
}

/// `{endpoint}/spreadsheets/{id}`, with each segment percent-encoded.
fn spreadsheet_url(endpoint: &str, id: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| ExportError::NotConfigured(format!("invalid endpoint '{endpoint}': {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ExportError::NotConfigured(format!("invalid endpoint '{endpoint}'")))?
        .pop_if_empty()
        .extend(["spreadsheets", id]);
    Ok(url)
}

/// The `values:append` URL for a worksheet, with its fixed query options.
fn append_url(endpoint: &str, id: &str, worksheet: &str) -> Result<Url> {
    let mut url = spreadsheet_url(endpoint, id)?;
    let range = format!("'{}'!A1:append", worksheet.replace('\'', "''"));
    url.path_segments_mut()
        .map_err(|()| ExportError::NotConfigured(format!("invalid endpoint '{endpoint}'")))?
        .extend(["values", range.as_str()]);
    url.query_pairs_mut()
        .append_pair("valueInputOption", "RAW")
        .append_pair("insertDataOption", "INSERT_ROWS");
    Ok(url)
}

/// Map an HTTP status to the export failure it represents.
fn check_status(status: StatusCode, body: &str, resource: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ExportError::Unauthorized(format!("{status} for {resource}")))
        }
        StatusCode::NOT_FOUND => Err(ExportError::NotFound(resource.to_string())),
        _ => Err(ExportError::Remote {
            status: status.as_u16(),
            message: remote_message(body),
        }),
    }
}

/// Pull `error.message` out of a Google API error body, or fall back to the
/// first line of the raw body.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.lines().next().unwrap_or_default().to_string())
}
