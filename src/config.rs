#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, time::Duration};

use bon::Builder;

/// Spreadsheet graded when none is configured.
pub const DEFAULT_SPREADSHEET_ID: &str = "1Z5fE9Bgu8BPkI7opjLjwjQZcVzt7oSTaL08QD8zkUuA";
/// Range the student rows are read from.
pub const DEFAULT_READ_RANGE: &str = "C4:H27";
/// Range the graded rows are written to.
pub const DEFAULT_WRITE_RANGE: &str = "engenharia_de_software!C4:H27";
/// OAuth scope needed to read and write sheet values.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
/// Installed-app client secret file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
/// Where the authorized token is cached between runs.
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
/// Sheets API endpoint.
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
/// Per-request HTTP timeout, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Everything a grading run needs to know about where its data lives.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct Config {
    /// Identifier of the spreadsheet holding the student rows.
    #[builder(default = DEFAULT_SPREADSHEET_ID.to_string())]
    spreadsheet_id:   String,
    /// A1 range the rows are fetched from.
    #[builder(default = DEFAULT_READ_RANGE.to_string())]
    read_range:       String,
    /// A1 range the graded rows are written to.
    #[builder(default = DEFAULT_WRITE_RANGE.to_string())]
    write_range:      String,
    /// OAuth scopes requested during consent.
    #[builder(default = vec![DEFAULT_SCOPE.to_string()])]
    scopes:           Vec<String>,
    /// Path to the installed-app client secret file.
    #[builder(into, default = PathBuf::from(DEFAULT_CREDENTIALS_PATH))]
    credentials_path: PathBuf,
    /// Path to the cached token file.
    #[builder(into, default = PathBuf::from(DEFAULT_TOKEN_PATH))]
    token_path:       PathBuf,
    /// Base URL of the Sheets API.
    #[builder(default = DEFAULT_API_BASE.to_string())]
    api_base:         String,
    /// Timeout applied to every HTTP request.
    #[builder(default = Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))]
    http_timeout:     Duration,
    /// Grade and report without writing back.
    #[builder(default)]
    dry_run:          bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Reads configuration from `GRADESHEET_*` environment variables, falling
    /// back to the defaults for anything unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from `lookup`, which maps a `GRADESHEET_*`
    /// variable name to its value.
    ///
    /// Values are trimmed and blank ones count as unset. Scopes are split on
    /// whitespace, a trailing `/` is dropped from the API base, and a timeout
    /// that is not a whole number of seconds keeps the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let or_default =
            |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let scopes = var("GRADESHEET_SCOPES")
            .map(|s| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
            .unwrap_or_else(|| vec![DEFAULT_SCOPE.to_string()]);
        let api_base = var("GRADESHEET_API_BASE")
            .map(|s| s.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout_secs = var("GRADESHEET_HTTP_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self::builder()
            .spreadsheet_id(or_default("GRADESHEET_SPREADSHEET_ID", DEFAULT_SPREADSHEET_ID))
            .read_range(or_default("GRADESHEET_READ_RANGE", DEFAULT_READ_RANGE))
            .write_range(or_default("GRADESHEET_WRITE_RANGE", DEFAULT_WRITE_RANGE))
            .scopes(scopes)
            .credentials_path(or_default("GRADESHEET_CREDENTIALS", DEFAULT_CREDENTIALS_PATH))
            .token_path(or_default("GRADESHEET_TOKEN", DEFAULT_TOKEN_PATH))
            .api_base(api_base)
            .http_timeout(Duration::from_secs(timeout_secs))
            .build()
    }

    /// Returns the spreadsheet identifier.
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Returns the range rows are read from.
    pub fn read_range(&self) -> &str {
        &self.read_range
    }

    /// Returns the range graded rows are written to.
    pub fn write_range(&self) -> &str {
        &self.write_range
    }

    /// Returns the OAuth scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the client secret file path.
    pub fn credentials_path(&self) -> &std::path::Path {
        &self.credentials_path
    }

    /// Returns the cached token path.
    pub fn token_path(&self) -> &std::path::Path {
        &self.token_path
    }

    /// Returns the Sheets API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns whether the write-back is skipped.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Overrides the spreadsheet identifier.
    pub fn set_spreadsheet_id(&mut self, id: impl Into<String>) {
        self.spreadsheet_id = id.into();
    }

    /// Overrides the client secret file path.
    pub fn set_credentials_path(&mut self, path: impl Into<PathBuf>) {
        self.credentials_path = path.into();
    }

    /// Overrides the cached token path.
    pub fn set_token_path(&mut self, path: impl Into<PathBuf>) {
        self.token_path = path.into();
    }

    /// Enables or disables the write-back.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }
}
