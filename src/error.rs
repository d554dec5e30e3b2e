#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

/// Failures while obtaining an access token.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// The client secret file could not be read.
    #[error("Error loading client secret file `{path}`: {source}")]
    CredentialsUnreadable {
        /// Path that was read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The client secret file is not an installed-app secret.
    #[error("Client secret file `{path}` is malformed: {reason}")]
    CredentialsMalformed {
        /// Path that was read.
        path:   PathBuf,
        /// What was wrong with it.
        reason: String,
    },
    /// The consent prompt could not be shown or answered.
    #[error("Could not read the authorization code: {0}")]
    Prompt(#[source] std::io::Error),
    /// The token endpoint rejected the request or could not be reached.
    #[error("Error while trying to retrieve access token: {0}")]
    TokenExchange(String),
}

/// Failures talking to the spreadsheet values endpoint.
#[derive(thiserror::Error, Debug)]
pub enum SheetsError {
    /// The request never produced a response.
    #[error("The API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("The API returned an error (HTTP {status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a JSON error object.
        body:   String,
    },
    /// The configured API base is not a usable URL.
    #[error("Invalid API URL `{0}`")]
    InvalidUrl(String),
}
