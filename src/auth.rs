#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Installed-app OAuth for the Sheets API.
//!
//! The first run prints a consent URL and waits for the authorization code to
//! be pasted back. The resulting token is cached on disk and reused, and
//! refreshed when it has expired.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{config::Config, error::AuthError};

/// Google's consent endpoint, used when the secret file does not name one.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
/// Google's token endpoint, used when the secret file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// Shape of the client secret file downloaded from the cloud console.
#[derive(Deserialize)]
struct CredentialsFile {
    /// Only installed (desktop) applications are supported.
    installed: Option<InstalledApp>,
}

/// OAuth client registration for an installed application.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledApp {
    /// OAuth client identifier.
    pub client_id:     String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Registered redirect URIs; the first one is used.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// Consent endpoint.
    #[serde(default = "default_auth_uri")]
    pub auth_uri:      String,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri:     String,
}

/// Serde default for [`InstalledApp::auth_uri`].
fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

/// Serde default for [`InstalledApp::token_uri`].
fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl InstalledApp {
    /// Reads an installed-app client secret file.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| AuthError::CredentialsUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content).map_err(|reason| AuthError::CredentialsMalformed {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses the JSON content of a client secret file.
    pub fn parse(content: &str) -> Result<Self, String> {
        let file: CredentialsFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let app = file
            .installed
            .ok_or_else(|| "missing `installed` client section".to_string())?;
        if app.redirect_uris.is_empty() {
            return Err("no redirect URIs registered".to_string());
        }
        Ok(app)
    }

    /// Redirect URI used for consent and code exchange.
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris.first().map(String::as_str).unwrap_or_default()
    }
}

/// An authorized token, in the same shape the cache file stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer token sent with API requests.
    pub access_token:  String,
    /// Long-lived token used to obtain new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Space separated scopes granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope:         Option<String>,
    /// Usually `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type:    String,
    /// Expiry as milliseconds since the Unix epoch, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date:   Option<i64>,
}

/// Serde default for [`Token::token_type`].
fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Expiry instant, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_date.and_then(DateTime::from_timestamp_millis)
    }

    /// Whether the token should be refreshed before use at `now`.
    ///
    /// Tokens without an expiry are assumed valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at - Duration::minutes(EXPIRY_MARGIN_MINUTES),
            None => false,
        }
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Body returned by the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    /// New access token.
    access_token:  String,
    /// Lifetime of the access token, in seconds.
    expires_in:    Option<i64>,
    /// Present on the first exchange, usually absent on refresh.
    refresh_token: Option<String>,
    /// Granted scopes.
    scope:         Option<String>,
    /// Usually `Bearer`.
    token_type:    Option<String>,
}

impl TokenResponse {
    /// Converts the response into a cacheable token, stamping its expiry.
    fn into_token(self, now: DateTime<Utc>) -> Token {
        Token {
            access_token:  self.access_token,
            refresh_token: self.refresh_token,
            scope:         self.scope,
            token_type:    self.token_type.unwrap_or_else(default_token_type),
            expiry_date:   self
                .expires_in
                .map(|secs| (now + Duration::seconds(secs)).timestamp_millis()),
        }
    }
}

/// Hands out access tokens for the configured scopes.
pub struct Authority {
    /// Client registration.
    app:        InstalledApp,
    /// Scopes requested during consent.
    scopes:     Vec<String>,
    /// Token cache location.
    token_path: PathBuf,
    /// Client used for token endpoint calls.
    http:       Client,
}

impl Authority {
    /// Creates an authority from an already loaded client registration.
    pub fn new(
        app: InstalledApp,
        scopes: Vec<String>,
        token_path: impl Into<PathBuf>,
        http: Client,
    ) -> Self {
        Self {
            app,
            scopes,
            token_path: token_path.into(),
            http,
        }
    }

    /// Loads the client secret file named by `config`.
    pub fn from_config(config: &Config, http: Client) -> Result<Self, AuthError> {
        let app = InstalledApp::load(config.credentials_path())?;
        Ok(Self::new(app, config.scopes().to_vec(), config.token_path(), http))
    }

    /// URL the user visits to grant access.
    pub fn consent_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.app.auth_uri,
            &[
                ("access_type", "offline"),
                ("scope", self.scopes.join(" ").as_str()),
                ("response_type", "code"),
                ("client_id", self.app.client_id.as_str()),
                ("redirect_uri", self.app.redirect_uri()),
            ],
        )
        .map_err(|e| AuthError::TokenExchange(format!("invalid auth URI: {e}")))
    }

    /// Returns a usable token, prompting on stdin when nothing is cached.
    pub async fn authorize(&self) -> Result<Token, AuthError> {
        self.authorize_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Returns a usable token, reading the authorization code from `input`
    /// when nothing is cached.
    pub async fn authorize_with<R>(&self, input: R) -> Result<Token, AuthError>
    where
        R: AsyncBufRead + Unpin,
    {
        match self.load_cached() {
            Some(token) if !token.is_expired(Utc::now()) => {
                tracing::debug!("Using cached token from {}", self.token_path.display());
                Ok(token)
            }
            Some(Token {
                refresh_token: Some(refresh_token),
                ..
            }) => {
                tracing::info!("Cached token expired, refreshing");
                let token = self.refresh(&refresh_token).await?;
                self.store(&token);
                Ok(token)
            }
            _ => {
                let token = self.request_consent(input).await?;
                self.store(&token);
                Ok(token)
            }
        }
    }

    /// Prints the consent URL and exchanges the pasted code for a token.
    async fn request_consent<R>(&self, input: R) -> Result<Token, AuthError>
    where
        R: AsyncBufRead + Unpin,
    {
        let url = self.consent_url()?;
        println!("Authorize this app by visiting this url: {url}");
        print!("Enter the code from that page here: ");
        std::io::stdout().flush().map_err(AuthError::Prompt)?;

        let code = input
            .lines()
            .next_line()
            .await
            .map_err(AuthError::Prompt)?
            .map(|line| line.trim().to_owned())
            .unwrap_or_default();

        if code.is_empty() {
            return Err(AuthError::TokenExchange("no authorization code entered".into()));
        }

        self.exchange_code(&code).await
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, AuthError> {
        tracing::debug!("Exchanging authorization code for token");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
            ("redirect_uri", self.app.redirect_uri()),
        ])
        .await
    }

    /// Obtains a fresh access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, AuthError> {
        let mut token = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.app.client_id.as_str()),
                ("client_secret", self.app.client_secret.as_str()),
            ])
            .await?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    /// Posts a form to the token endpoint and decodes the answer.
    async fn token_request(&self, params: &[(&str, &str)]) -> Result<Token, AuthError> {
        let response = self
            .http
            .post(&self.app.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthError::TokenExchange(format!("HTTP {status}: {body}")));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::TokenExchange(format!("invalid token response: {e}")))?;
        Ok(parsed.into_token(Utc::now()))
    }

    /// Reads the token cache, if there is a readable one.
    fn load_cached(&self) -> Option<Token> {
        let content = std::fs::read_to_string(&self.token_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Ignoring unreadable token cache {}: {e}", self.token_path.display());
                None
            }
        }
    }

    /// Writes the token cache. Failures are logged; the token is still used.
    fn store(&self, token: &Token) {
        let written = serde_json::to_string(token)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.token_path, json));

        match written {
            Ok(()) => tracing::info!("Token stored to {}", self.token_path.display()),
            Err(e) => tracing::error!("Could not store token to {}: {e}", self.token_path.display()),
        }
    }
}
