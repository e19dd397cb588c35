// Session controller: owns the current token and drives the menu loop.
//
// State flow:
//
//   Ready -> AwaitingChoice -> Executing(choice) -> Ready
//                  |                  |
//                  |                  +-- 401 --> Reauthenticating(Expired) --+
//                  +-- Token ---------> Reauthenticating(Requested) ----------+--> AwaitingChoice
//                  +-- Exit / Ctrl-C -> Terminated
//
// A 401 never replays the action that hit it; the operator picks again from
// the menu with the new token. If re-authentication itself fails the
// session ends with the authentication error.

use crate::api::RegistryApi;
use crate::commands::{self, AddArgs, Command, Invocation};
use crate::error::ClientError;
use crate::model::{Outcome, Payload, Token};
use crate::ui::{MenuChoice, Terminal, INTERRUPT_MESSAGE};
use tracing::{debug, info, warn};

const EXPIRED_MESSAGE: &str = "Token expired, try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reauth {
    /// The server rejected the token with a 401.
    Expired,
    /// The operator picked "Token" from the menu.
    Requested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ready,
    AwaitingChoice,
    Executing(MenuChoice),
    Reauthenticating(Reauth),
    Terminated,
}

pub struct Session<'a, A: ?Sized, T: ?Sized> {
    api: &'a A,
    term: &'a mut T,
    password: String,
    token: Token,
    state: State,
    reauthentications: u32,
}

impl<'a, A, T> Session<'a, A, T>
where
    A: RegistryApi + ?Sized,
    T: Terminal + ?Sized,
{
    /// Obtain the first token and enter `Ready`.
    ///
    /// The password is kept for the lifetime of the session and reused for
    /// every re-authentication.
    pub fn start(api: &'a A, term: &'a mut T, password: String) -> Result<Self, ClientError> {
        term.busy("Requesting token");
        let issued = api.issue_token(&password);
        term.done();
        let token = issued?;
        info!("session started");
        Ok(Session {
            api,
            term,
            password,
            token,
            state: State::Ready,
            reauthentications: 0,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// How many times a new token has been obtained after `start`.
    pub fn reauthentications(&self) -> u32 {
        self.reauthentications
    }

    /// Loop until the operator exits or interrupts.
    pub fn run(&mut self) -> Result<(), ClientError> {
        while self.state != State::Terminated {
            self.step()?;
        }
        Ok(())
    }

    /// Perform one transition and return the state entered.
    ///
    /// A fatal error also moves the session to `Terminated`.
    pub fn step(&mut self) -> Result<State, ClientError> {
        let next = match self.advance() {
            Ok(next) => next,
            Err(ClientError::Interrupted) => {
                self.term.done();
                self.term.notice(INTERRUPT_MESSAGE);
                State::Terminated
            }
            Err(e) => {
                self.state = State::Terminated;
                return Err(e);
            }
        };
        debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(next)
    }

    fn advance(&mut self) -> Result<State, ClientError> {
        match self.state {
            State::Ready => Ok(State::AwaitingChoice),
            State::AwaitingChoice => Ok(match self.term.choose_action()? {
                MenuChoice::Exit => State::Terminated,
                MenuChoice::RefreshToken => State::Reauthenticating(Reauth::Requested),
                choice => State::Executing(choice),
            }),
            State::Executing(choice) => {
                let Some(command) = menu_command(choice) else {
                    return Ok(State::Ready);
                };
                let outcome = commands::run(
                    self.api,
                    &mut *self.term,
                    &self.token,
                    command.clone(),
                    Invocation::Menu,
                )?;
                if outcome == Outcome::AuthExpired {
                    warn!(?choice, "token rejected by server");
                    self.term.failure(EXPIRED_MESSAGE);
                    return Ok(State::Reauthenticating(Reauth::Expired));
                }
                report(&mut *self.term, &command, outcome);
                Ok(State::Ready)
            }
            State::Reauthenticating(reason) => {
                self.term.busy("Refreshing token");
                let issued = self.api.issue_token(&self.password);
                self.term.done();
                self.token = issued?;
                self.reauthentications += 1;
                info!(?reason, "token refreshed");
                if reason == Reauth::Requested {
                    self.term.success("Successfully refreshed token");
                }
                Ok(State::AwaitingChoice)
            }
            State::Terminated => Ok(State::Terminated),
        }
    }
}

fn menu_command(choice: MenuChoice) -> Option<Command> {
    match choice {
        MenuChoice::View => Some(Command::View),
        MenuChoice::Add => Some(Command::Add(AddArgs::default())),
        MenuChoice::Assign => Some(Command::Assign {
            id: None,
            assigned: None,
        }),
        MenuChoice::Delete => Some(Command::Delete { id: None }),
        MenuChoice::Unassign => Some(Command::Unassign { id: None }),
        MenuChoice::RefreshToken | MenuChoice::Exit => None,
    }
}

/// Print the outcome of a finished command.
pub fn report<T: Terminal + ?Sized>(term: &mut T, command: &Command, outcome: Outcome) {
    match outcome {
        Outcome::Success(Payload::Items(items)) => term.show_items(&items),
        Outcome::Success(Payload::Done) => {
            if let Some(message) = command.success_message() {
                term.success(message);
            }
        }
        Outcome::AuthExpired => term.failure(EXPIRED_MESSAGE),
        Outcome::Failed(detail) => term.failure(&detail),
    }
}

/// Subcommand mode: one token, one command, no menu.
///
/// There is no recovery loop here; a 401 is reported like any failure.
pub fn run_one_shot<A, T>(
    api: &A,
    term: &mut T,
    password: &str,
    command: Command,
) -> Result<Outcome, ClientError>
where
    A: RegistryApi + ?Sized,
    T: Terminal + ?Sized,
{
    term.busy("Requesting token");
    let issued = api.issue_token(password);
    term.done();
    let token = issued?;
    let outcome = commands::run(api, term, &token, command.clone(), Invocation::OneShot)?;
    report(term, &command, outcome.clone());
    Ok(outcome)
}
