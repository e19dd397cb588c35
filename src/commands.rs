// Command adapters: turn a (possibly partial) request into exactly one
// primary `Operation`, prompting for whatever is missing.
//
// Adapters never translate outcomes. Whatever the executor says comes back
// to the caller unchanged; reporting and re-authentication happen upstream.

use crate::api::RegistryApi;
use crate::error::ClientError;
use crate::model::{NewItem, Operation, Outcome, Payload, Token};
use crate::ui::Terminal;

/// Whether the command came from a subcommand or from the menu loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    OneShot,
    Menu,
}

/// Fields for `add`. Anything `None` is asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddArgs {
    pub name: Option<String>,
    pub colour: Option<String>,
    pub link: Option<String>,
    pub assigned: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View,
    Add(AddArgs),
    Assign {
        id: Option<u64>,
        assigned: Option<String>,
    },
    Unassign {
        id: Option<u64>,
    },
    Delete {
        id: Option<u64>,
    },
}

impl Command {
    /// Message printed after the primary operation succeeds. `View` has
    /// none: its success is the item table itself.
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            Command::View => None,
            Command::Add(_) => Some("Successfully added item"),
            Command::Assign { .. } => Some("Successfully claimed item"),
            Command::Unassign { .. } => Some("Successfully unassigned item"),
            Command::Delete { .. } => Some("Successfully deleted item"),
        }
    }
}

/// Run one command against the registry.
///
/// `Err` is reserved for terminal problems (including Ctrl-C). Remote
/// results, good or bad, are in the returned `Outcome`.
pub fn run<A, T>(
    api: &A,
    term: &mut T,
    token: &Token,
    command: Command,
    invocation: Invocation,
) -> Result<Outcome, ClientError>
where
    A: RegistryApi + ?Sized,
    T: Terminal + ?Sized,
{
    let operation = match command {
        Command::View => Operation::ListItems,
        Command::Add(args) => Operation::CreateItem(collect_new_item(term, args, invocation)?),
        Command::Assign { id, assigned } => {
            let id = match resolve_id(api, term, token, id)? {
                Ok(id) => id,
                Err(outcome) => return Ok(outcome),
            };
            let assigned = match assigned {
                Some(who) => Some(who),
                None => term.optional_text("Enter item assigned, or leave empty for unassigned")?,
            };
            Operation::SetAssignment { id, assigned }
        }
        Command::Unassign { id } => match resolve_id(api, term, token, id)? {
            Ok(id) => Operation::SetAssignment { id, assigned: None },
            Err(outcome) => return Ok(outcome),
        },
        Command::Delete { id } => match resolve_id(api, term, token, id)? {
            Ok(id) => Operation::DeleteItem { id },
            Err(outcome) => return Ok(outcome),
        },
    };
    Ok(execute(api, term, token, &operation))
}

fn execute<A, T>(api: &A, term: &mut T, token: &Token, operation: &Operation) -> Outcome
where
    A: RegistryApi + ?Sized,
    T: Terminal + ?Sized,
{
    term.busy(operation.label());
    let outcome = api.execute(token, operation);
    term.done();
    outcome
}

fn collect_new_item<T>(
    term: &mut T,
    args: AddArgs,
    invocation: Invocation,
) -> Result<NewItem, ClientError>
where
    T: Terminal + ?Sized,
{
    let name = match args.name {
        Some(v) => v,
        None => term.text("Enter item name")?,
    };
    let colour = match args.colour {
        Some(v) => v,
        None => term.text("Enter item colour")?,
    };
    let link = match args.link {
        Some(v) => v,
        None => term.text("Enter item link")?,
    };
    let assigned = match (args.assigned, invocation) {
        (Some(v), _) => Some(v),
        (None, Invocation::Menu) => term.optional_text("Enter item assigned")?,
        (None, Invocation::OneShot) => None,
    };
    Ok(NewItem {
        name,
        colour,
        link,
        assigned,
    })
}

/// Use the given id, or fetch the live item list and make the operator
/// pick one of its ids. A failed fetch is handed back as the outcome.
fn resolve_id<A, T>(
    api: &A,
    term: &mut T,
    token: &Token,
    id: Option<u64>,
) -> Result<Result<u64, Outcome>, ClientError>
where
    A: RegistryApi + ?Sized,
    T: Terminal + ?Sized,
{
    if let Some(id) = id {
        return Ok(Ok(id));
    }
    let items = match execute(api, term, token, &Operation::ListItems) {
        Outcome::Success(Payload::Items(items)) => items,
        Outcome::Success(Payload::Done) => Vec::new(),
        other => return Ok(Err(other)),
    };
    let ids: Vec<u64> = items.iter().map(|item| item.id).collect();
    if ids.is_empty() {
        return Ok(Err(Outcome::Failed("no items to choose from".to_string())));
    }
    Ok(Ok(term.pick_id("Enter item id", &ids)?))
}
