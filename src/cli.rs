// Command-line surface. Parsing only: everything here is turned into a
// `commands::Command` (or the interactive menu) by `main`.

use crate::commands::{AddArgs, Command};
use crate::config::DEFAULT_URL;
use clap::{Args, Parser, Subcommand};

/// Terminal frontend for the item registry.
///
/// Without a subcommand an interactive menu is started. Any field a
/// subcommand needs but was not given is asked for at the prompt.
///
/// The admin password comes from --password, else ADMIN_PASSWORD in the
/// environment, ./.env or the per-user .env file.
#[derive(Parser, Debug)]
#[command(name = "registry-frontend", version)]
pub struct Cli {
    /// Password used to get a token from the server
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Server url to use
    #[arg(short, long, global = true, default_value = DEFAULT_URL)]
    pub url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show all items
    View,
    /// Add a new item
    Add(AddCmd),
    /// Assign an item to someone
    Assign(AssignCmd),
    /// Delete an item
    Delete(IdCmd),
    /// Mark an item as unassigned
    Unassign(IdCmd),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddCmd {
    /// Item name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Item colour
    #[arg(short, long)]
    pub colour: Option<String>,
    /// Item link
    #[arg(short, long)]
    pub link: Option<String>,
    /// Who the item is assigned to
    #[arg(short, long)]
    pub assigned: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AssignCmd {
    /// Item id
    #[arg(short, long)]
    pub id: Option<u64>,
    /// Who the item is assigned to
    #[arg(short, long)]
    pub assigned: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct IdCmd {
    /// Item id
    #[arg(short, long)]
    pub id: Option<u64>,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::View => Command::View,
            Commands::Add(a) => Command::Add(AddArgs {
                name: a.name,
                colour: a.colour,
                link: a.link,
                assigned: a.assigned,
            }),
            Commands::Assign(a) => Command::Assign {
                id: a.id,
                assigned: a.assigned,
            },
            Commands::Delete(a) => Command::Delete { id: a.id },
            Commands::Unassign(a) => Command::Unassign { id: a.id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["registry-frontend"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.url, DEFAULT_URL);
        assert_eq!(cli.password, None);
        assert_eq!(cli.timeout, 30);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "registry-frontend",
            "view",
            "-p",
            "secret",
            "--url",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.password.as_deref(), Some("secret"));
        assert_eq!(cli.url, "http://localhost:8080");
        assert_eq!(cli.command, Some(Commands::View));
    }

    #[test]
    fn add_flags_map_to_command() {
        let cli = Cli::try_parse_from([
            "registry-frontend",
            "add",
            "-n",
            "box",
            "-c",
            "red",
            "-l",
            "http://x",
        ])
        .unwrap();
        let command: Command = cli.command.unwrap().into();
        assert_eq!(
            command,
            Command::Add(AddArgs {
                name: Some("box".into()),
                colour: Some("red".into()),
                link: Some("http://x".into()),
                assigned: None,
            })
        );
    }

    #[test]
    fn assign_takes_id_and_assignee() {
        let cli =
            Cli::try_parse_from(["registry-frontend", "assign", "-i", "3", "-a", "alice"]).unwrap();
        let command: Command = cli.command.unwrap().into();
        assert_eq!(
            command,
            Command::Assign {
                id: Some(3),
                assigned: Some("alice".into())
            }
        );
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(Cli::try_parse_from(["registry-frontend", "delete", "--id", "three"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["registry-frontend", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
