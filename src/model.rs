// Wire types shared by the HTTP client, the command adapters and the UI.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registry entry as returned by `GET /api/v1/items`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub colour: String,
    pub link: String,
    /// `None` means nobody has claimed the item.
    pub assigned: Option<String>,
}

/// Envelope the server wraps the item list in.
#[derive(Serialize, Deserialize, Debug)]
pub struct ItemList {
    pub data: Vec<Item>,
}

/// Payload for `POST /api/v1/items/add`. `assigned` is sent as `null`
/// when absent rather than omitted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub colour: String,
    pub link: String,
    pub assigned: Option<String>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Claim<'a> {
    pub assigned: &'a str,
}

/// One remote operation. The executor dispatches on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListItems,
    CreateItem(NewItem),
    /// `Some` claims the item for someone, `None` releases it.
    SetAssignment { id: u64, assigned: Option<String> },
    DeleteItem { id: u64 },
}

impl Operation {
    /// Path relative to the service root.
    pub fn path(&self) -> String {
        match self {
            Operation::ListItems => "/api/v1/items".to_string(),
            Operation::CreateItem(_) => "/api/v1/items/add".to_string(),
            Operation::SetAssignment {
                id,
                assigned: Some(_),
            } => format!("/api/v1/items/{id}/claim"),
            Operation::SetAssignment { id, assigned: None } => {
                format!("/api/v1/items/{id}/unclaim")
            }
            Operation::DeleteItem { id } => format!("/api/v1/items/{id}/delete"),
        }
    }

    /// Short human label used in log lines and failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ListItems => "list items",
            Operation::CreateItem(_) => "add item",
            Operation::SetAssignment {
                assigned: Some(_), ..
            } => "claim item",
            Operation::SetAssignment { assigned: None, .. } => "unassign item",
            Operation::DeleteItem { .. } => "delete item",
        }
    }
}

/// Decoded body of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Items(Vec<Item>),
    Done,
}

/// Classified result of a single authenticated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Payload),
    /// The server answered 401: the bearer token is no longer accepted.
    AuthExpired,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Bearer credential handed out by the authorize endpoint.
///
/// Opaque on purpose: it is never parsed, persisted or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Token(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}
