//! Test doubles for the session and command adapters.
//!
//! - `FakeRegistry`: in-memory `RegistryApi` that hands out numbered tokens,
//!   can expire them all at once, and can start rejecting the password.
//! - `ScriptedTerminal`: replays queued answers and records what was shown.
//!   Running out of answers behaves like Ctrl-C.

use crate::api::RegistryApi;
use crate::error::ClientError;
use crate::model::{Item, Operation, Outcome, Payload, Token};
use crate::ui::{MenuChoice, Terminal};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

pub struct FakeRegistry {
    items: RefCell<Vec<Item>>,
    calls: RefCell<Vec<Operation>>,
    issued: Cell<u32>,
    /// Tokens numbered below this are rejected with a 401.
    oldest_valid: Cell<u32>,
    rejecting: Cell<bool>,
}

impl FakeRegistry {
    pub const PASSWORD: &'static str = "hunter2";

    pub fn new() -> Self {
        FakeRegistry {
            items: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            issued: Cell::new(0),
            oldest_valid: Cell::new(1),
            rejecting: Cell::new(false),
        }
    }

    pub fn with_items(seed: &[(u64, Option<&str>)]) -> Self {
        let registry = Self::new();
        registry.items.replace(
            seed.iter()
                .map(|(id, assigned)| Item {
                    id: *id,
                    name: format!("item-{id}"),
                    colour: "grey".into(),
                    link: format!("http://registry.test/{id}"),
                    assigned: assigned.map(str::to_string),
                })
                .collect(),
        );
        registry
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.borrow().clone()
    }

    pub fn tokens_issued(&self) -> u32 {
        self.issued.get()
    }

    /// Every token issued so far now gets a 401.
    pub fn expire_tokens(&self) {
        self.oldest_valid.set(self.issued.get() + 1);
    }

    pub fn reject_passwords(&self) {
        self.rejecting.set(true);
    }

    fn token_valid(&self, token: &Token) -> bool {
        token
            .expose()
            .strip_prefix("token-")
            .and_then(|n| n.parse::<u32>().ok())
            .map_or(false, |n| n >= self.oldest_valid.get() && n <= self.issued.get())
    }
}

impl RegistryApi for FakeRegistry {
    fn issue_token(&self, password: &str) -> Result<Token, ClientError> {
        if self.rejecting.get() || password != Self::PASSWORD {
            return Err(ClientError::authentication(
                "server refused token request: 401 Unauthorized",
            ));
        }
        let n = self.issued.get() + 1;
        self.issued.set(n);
        Ok(Token::new(format!("token-{n}")))
    }

    fn execute(&self, token: &Token, operation: &Operation) -> Outcome {
        self.calls.borrow_mut().push(operation.clone());
        if !self.token_valid(token) {
            return Outcome::AuthExpired;
        }
        let mut items = self.items.borrow_mut();
        match operation {
            Operation::ListItems => Outcome::Success(Payload::Items(items.clone())),
            Operation::CreateItem(new) => {
                let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
                items.push(Item {
                    id,
                    name: new.name.clone(),
                    colour: new.colour.clone(),
                    link: new.link.clone(),
                    assigned: new.assigned.clone(),
                });
                Outcome::Success(Payload::Done)
            }
            Operation::SetAssignment { id, assigned } => {
                match items.iter_mut().find(|i| i.id == *id) {
                    Some(item) => {
                        item.assigned = assigned.clone();
                        Outcome::Success(Payload::Done)
                    }
                    None => Outcome::Failed(format!("no item with id {id}")),
                }
            }
            Operation::DeleteItem { id } => {
                let before = items.len();
                items.retain(|i| i.id != *id);
                if items.len() == before {
                    Outcome::Failed(format!("no item with id {id}"))
                } else {
                    Outcome::Success(Payload::Done)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Success(String),
    Failure(String),
    Notice(String),
}

#[derive(Default)]
pub struct ScriptedTerminal {
    choices: VecDeque<MenuChoice>,
    texts: VecDeque<String>,
    ids: VecDeque<u64>,
    prompts: Vec<String>,
    offered: Vec<Vec<u64>>,
    rejected: Vec<u64>,
    shown: Vec<usize>,
    messages: Vec<Message>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choices(mut self, choices: impl IntoIterator<Item = MenuChoice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn with_texts<'s>(mut self, texts: impl IntoIterator<Item = &'s str>) -> Self {
        self.texts.extend(texts.into_iter().map(str::to_string));
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.ids.extend(ids);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.clone()
    }

    pub fn offered_ids(&self) -> Vec<Vec<u64>> {
        self.offered.clone()
    }

    pub fn rejected_ids(&self) -> Vec<u64> {
        self.rejected.clone()
    }

    /// Number of items in each table shown, in order.
    pub fn shown_items(&self) -> Vec<usize> {
        self.shown.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    fn next_text(&mut self, prompt: &str) -> Result<String, ClientError> {
        self.prompts.push(prompt.to_string());
        self.texts.pop_front().ok_or(ClientError::Interrupted)
    }
}

impl Terminal for ScriptedTerminal {
    fn choose_action(&mut self) -> Result<MenuChoice, ClientError> {
        self.choices.pop_front().ok_or(ClientError::Interrupted)
    }

    fn text(&mut self, prompt: &str) -> Result<String, ClientError> {
        self.next_text(prompt)
    }

    fn optional_text(&mut self, prompt: &str) -> Result<Option<String>, ClientError> {
        let value = self.next_text(prompt)?;
        Ok(Some(value).filter(|v| !v.trim().is_empty()))
    }

    fn pick_id(&mut self, _prompt: &str, ids: &[u64]) -> Result<u64, ClientError> {
        self.offered.push(ids.to_vec());
        loop {
            let id = self.ids.pop_front().ok_or(ClientError::Interrupted)?;
            if ids.contains(&id) {
                return Ok(id);
            }
            self.rejected.push(id);
        }
    }

    fn show_items(&mut self, items: &[Item]) {
        self.shown.push(items.len());
    }

    fn success(&mut self, message: &str) {
        self.messages.push(Message::Success(message.to_string()));
    }

    fn failure(&mut self, message: &str) {
        self.messages.push(Message::Failure(message.to_string()));
    }

    fn notice(&mut self, message: &str) {
        self.messages.push(Message::Notice(message.to_string()));
    }
}
