// Entrypoint for the CLI application.
// - Keeps `main` small: parse args, resolve the password, build an API
//   client and hand over to either the menu loop or a single command.

use anyhow::Context;
use clap::Parser;
use registry_frontend::api::ApiClient;
use registry_frontend::cli::Cli;
use registry_frontend::config::{default_sources, resolve_with};
use registry_frontend::error::ClientError;
use registry_frontend::logging::init_logging;
use registry_frontend::session::{run_one_shot, Session};
use registry_frontend::ui::{ConsoleTerminal, Terminal, INTERRUPT_MESSAGE};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Resolved once; every re-authentication reuses it. The .env chain is
    // only read when --password is absent.
    let password = resolve_with(cli.password, default_sources)?;
    let api = ApiClient::new(&cli.url, Duration::from_secs(cli.timeout))?;
    let mut term = ConsoleTerminal::new();

    // Prompts read Ctrl-C as a key in raw mode; this covers the rest,
    // chiefly a request blocked in `send()`.
    let on_interrupt = term.interrupt_hook();
    ctrlc::set_handler(move || {
        on_interrupt();
        std::process::exit(0);
    })
    .context("Failed to install Ctrl-C handler")?;

    let result = match cli.command {
        None => Session::start(&api, &mut term, password)
            .and_then(|mut session| session.run())
            .map(|()| ExitCode::SUCCESS),
        Some(command) => {
            run_one_shot(&api, &mut term, &password, command.into()).map(|outcome| {
                if outcome.is_success() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            })
        }
    };

    match result {
        Ok(code) => Ok(code),
        Err(ClientError::Interrupted) => {
            term.done();
            term.notice(INTERRUPT_MESSAGE);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e.into()),
    }
}
