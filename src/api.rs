// API client module: a small blocking HTTP client for the registry service.
//
// Two entry points matter:
// - `issue_token` swaps the admin password for a bearer token (Basic auth).
// - `execute` runs one item operation with that token and classifies the
//   response. It never retries; refreshing tokens is the session's job.

use crate::config::{normalize_base_url, CLIENT_ID};
use crate::error::ClientError;
use crate::model::{Claim, ItemList, Operation, Outcome, Payload, Token};
use anyhow::Context;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const AUTHORIZE_PATH: &str = "/api/v1/authorize/admin";

/// What the session and command adapters need from the registry.
///
/// The HTTP implementation is `ApiClient`; tests plug in an in-memory one.
pub trait RegistryApi {
    /// Exchange the admin password for a fresh bearer token.
    fn issue_token(&self, password: &str) -> Result<Token, ClientError>;

    /// Run a single operation with the given token.
    fn execute(&self, token: &Token, operation: &Operation) -> Outcome;
}

/// How a status code is treated for item operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    AuthExpired,
    Failure,
}

/// 401 is the one status the server uses to say "token no longer valid".
pub fn classify(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status == StatusCode::UNAUTHORIZED {
        StatusClass::AuthExpired
    } else {
        StatusClass::Failure
    }
}

/// Blocking reqwest client bound to one service root.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, token: &Token, operation: &Operation) -> RequestBuilder {
        let url = self.url(&operation.path());
        let builder = match operation {
            Operation::ListItems => self.client.get(url),
            Operation::CreateItem(item) => self.client.post(url).json(item),
            Operation::SetAssignment {
                assigned: Some(who),
                ..
            } => self.client.post(url).json(&Claim { assigned: who }),
            Operation::SetAssignment { assigned: None, .. } | Operation::DeleteItem { .. } => {
                self.client.post(url)
            }
        };
        builder.bearer_auth(token.expose())
    }

    fn decode(operation: &Operation, res: Response) -> Outcome {
        match operation {
            Operation::ListItems => {
                let body = match res.text() {
                    Ok(body) => body,
                    Err(e) => return Outcome::Failed(format!("could not read item list: {e}")),
                };
                match serde_json::from_str::<ItemList>(&body) {
                    Ok(list) => Outcome::Success(Payload::Items(list.data)),
                    Err(e) => Outcome::Failed(format!("could not parse item list: {e}")),
                }
            }
            _ => Outcome::Success(Payload::Done),
        }
    }
}

/// Read the body for an error message. An unreadable body is not worth
/// failing over, so it collapses to an empty string.
fn failure_detail(status: StatusCode, res: Response) -> String {
    let txt = res.text().unwrap_or_default();
    if txt.trim().is_empty() {
        status.to_string()
    } else {
        format!("{} - {}", status, txt.trim())
    }
}

impl RegistryApi for ApiClient {
    fn issue_token(&self, password: &str) -> Result<Token, ClientError> {
        let url = self.url(AUTHORIZE_PATH);
        debug!(path = AUTHORIZE_PATH, "requesting admin token");
        let res = self
            .client
            .get(&url)
            .basic_auth(CLIENT_ID, Some(password))
            .send()
            .map_err(|e| ClientError::authentication(format!("token request failed: {e}")))?;
        let status = res.status();
        debug!(path = AUTHORIZE_PATH, %status, "token response");
        if !status.is_success() {
            return Err(ClientError::authentication(format!(
                "server refused token request: {}",
                failure_detail(status, res)
            )));
        }
        // The body is the token itself, not JSON.
        let raw = res
            .text()
            .map_err(|e| ClientError::authentication(format!("could not read token: {e}")))?;
        Ok(Token::new(raw))
    }

    fn execute(&self, token: &Token, operation: &Operation) -> Outcome {
        let path = operation.path();
        debug!(op = operation.label(), %path, "sending request");
        let res = match self.request(token, operation).send() {
            Ok(res) => res,
            Err(e) => {
                warn!(op = operation.label(), error = %e, "request failed");
                return Outcome::Failed(format!("{} failed: {e}", operation.label()));
            }
        };
        let status = res.status();
        debug!(op = operation.label(), %status, "response");
        match classify(status) {
            StatusClass::Success => Self::decode(operation, res),
            StatusClass::AuthExpired => Outcome::AuthExpired,
            StatusClass::Failure => Outcome::Failed(format!(
                "{} failed: {}",
                operation.label(),
                failure_detail(status, res)
            )),
        }
    }
}
