// Library root
// -----------
// The binary (`main.rs`) only parses arguments, resolves the password and
// hands over to `session`. Everything else lives here.
//
// Module responsibilities:
// - `config`: password resolution (flag, environment, .env files) and
//   fixed service constants.
// - `api`: blocking HTTP client; swaps the password for a bearer token and
//   runs item operations, classifying each response.
// - `commands`: one adapter per operation; prompts for missing fields.
// - `session`: the interactive loop and its token-refresh policy.
// - `ui`: terminal prompts and the item table.
// - `cli`, `logging`, `error`, `model`: argument surface, tracing setup,
//   error taxonomy and wire types.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testing;
