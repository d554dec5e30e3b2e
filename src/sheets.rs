#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::future::Future;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{auth::Token, error::SheetsError, types::StudentRow};

/// How written values are interpreted by the sheet.
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Reads and writes student rows in a spreadsheet range.
pub trait SheetService {
    /// Fetches every row in `range`. An empty range yields no rows.
    fn fetch_range(
        &self,
        range: &str,
    ) -> impl Future<Output = Result<Vec<StudentRow>, SheetsError>> + Send;

    /// Overwrites `range` with `rows`, one sheet row per entry.
    fn write_range(
        &self,
        range: &str,
        rows: &[StudentRow],
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;
}

/// Wire form of a block of cell values.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    /// A1 range the values cover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range:           Option<String>,
    /// Always `ROWS` here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    /// Absent when the range is empty.
    #[serde(default)]
    values:          Vec<Vec<Value>>,
}

/// Sheets values API client bound to one spreadsheet and token.
#[derive(Clone)]
pub struct SheetsClient {
    /// Shared HTTP client.
    http:           Client,
    /// API base URL, without a trailing slash.
    api_base:       String,
    /// Spreadsheet identifier.
    spreadsheet_id: String,
    /// Token sent with every request.
    token:          Token,
}

impl SheetsClient {
    /// Creates a client for `spreadsheet_id` authorized by `token`.
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        token: Token,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            token,
        }
    }

    /// URL of the values resource for `range`.
    fn values_url(&self, range: &str) -> Result<Url, SheetsError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|_| SheetsError::InvalidUrl(self.api_base.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    /// Turns a non-success response into [`SheetsError::Status`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SheetsError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl SheetService for SheetsClient {
    async fn fetch_range(&self, range: &str) -> Result<Vec<StudentRow>, SheetsError> {
        let url = self.values_url(range)?;
        tracing::debug!(%url, "Fetching range");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.token.bearer())
            .send()
            .await?;
        let body: ValueRange = Self::check(response).await?.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(StudentRow::from)
            .collect())
    }

    async fn write_range(&self, range: &str, rows: &[StudentRow]) -> Result<(), SheetsError> {
        let mut url = self.values_url(range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION);
        tracing::debug!(%url, rows = rows.len(), "Writing range");

        let body = ValueRange {
            range:           Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values:          rows
                .iter()
                .cloned()
                .map(Vec::<Value>::from)
                .collect(),
        };

        let response = self
            .http
            .put(url)
            .header(reqwest::header::AUTHORIZATION, self.token.bearer())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
