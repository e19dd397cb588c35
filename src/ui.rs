// UI layer: prompts and output for the interactive frontend.
//
// `Terminal` is the seam between the session logic and the real console.
// `ConsoleTerminal` implements it with `dialoguer` prompts, an `indicatif`
// spinner while requests are in flight, and `crossterm` colours.

use crate::error::ClientError;
use crate::model::Item;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Printed when the operator presses Ctrl-C, at a prompt or mid-request.
pub const INTERRUPT_MESSAGE: &str = "Received keyboard interrupt";

/// The seven entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    View,
    Add,
    Assign,
    Delete,
    Unassign,
    RefreshToken,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::View,
        MenuChoice::Add,
        MenuChoice::Assign,
        MenuChoice::Delete,
        MenuChoice::Unassign,
        MenuChoice::RefreshToken,
        MenuChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::View => "View",
            MenuChoice::Add => "Add",
            MenuChoice::Assign => "Assign",
            MenuChoice::Delete => "Delete",
            MenuChoice::Unassign => "Unassign",
            MenuChoice::RefreshToken => "Token",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Everything the session and command adapters need from the operator.
///
/// Every prompt blocks. A Ctrl-C while waiting surfaces as
/// `ClientError::Interrupted`.
pub trait Terminal {
    fn choose_action(&mut self) -> Result<MenuChoice, ClientError>;

    /// Ask for a value that must be supplied.
    fn text(&mut self, prompt: &str) -> Result<String, ClientError>;

    /// Ask for a value that may be left empty; empty means `None`.
    fn optional_text(&mut self, prompt: &str) -> Result<Option<String>, ClientError>;

    /// Ask for one of `ids`. Anything else is rejected and asked again.
    fn pick_id(&mut self, prompt: &str, ids: &[u64]) -> Result<u64, ClientError>;

    fn show_items(&mut self, items: &[Item]);
    fn success(&mut self, message: &str);
    fn failure(&mut self, message: &str);
    fn notice(&mut self, message: &str);

    /// Show that a request is in flight until `done` is called.
    fn busy(&mut self, _message: &str) {}
    fn done(&mut self) {}
}

/// Real console implementation.
///
/// The spinner slot is shared so a Ctrl-C handler running on another
/// thread can clear it before the process exits.
#[derive(Default)]
pub struct ConsoleTerminal {
    spinner: Arc<Mutex<Option<ProgressBar>>>,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback for a SIGINT handler: clears any active spinner and prints
    /// the interrupt notice. Exiting is left to the caller.
    pub fn interrupt_hook(&self) -> impl Fn() + Send + 'static {
        let spinner = Arc::clone(&self.spinner);
        move || {
            if let Ok(mut slot) = spinner.lock() {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
            println!();
            println!("{}", INTERRUPT_MESSAGE.blue());
        }
    }
}

impl Terminal for ConsoleTerminal {
    fn choose_action(&mut self) -> Result<MenuChoice, ClientError> {
        let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
        // `Select` is keyboard-driven, so an out-of-range choice cannot be entered.
        let selection = Select::new()
            .with_prompt("Choose action")
            .items(&labels)
            .default(0)
            .interact()?;
        Ok(MenuChoice::ALL[selection])
    }

    fn text(&mut self, prompt: &str) -> Result<String, ClientError> {
        let value: String = Input::new()
            .with_prompt(prompt.yellow().to_string())
            .interact_text()?;
        Ok(value)
    }

    fn optional_text(&mut self, prompt: &str) -> Result<Option<String>, ClientError> {
        let value: String = Input::new()
            .with_prompt(prompt.yellow().to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(value).filter(|v| !v.trim().is_empty()))
    }

    fn pick_id(&mut self, prompt: &str, ids: &[u64]) -> Result<u64, ClientError> {
        let choices = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let id: u64 = Input::new()
            .with_prompt(format!("{} [{}]", prompt.yellow(), choices))
            .validate_with(|id: &u64| -> Result<(), String> {
                if ids.contains(id) {
                    Ok(())
                } else {
                    Err(format!("{id} is not one of the current items"))
                }
            })
            .interact_text()?;
        Ok(id)
    }

    fn show_items(&mut self, items: &[Item]) {
        println!("{}", render_items(items, true));
    }

    fn success(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn failure(&mut self, message: &str) {
        println!("{}", message.red());
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message.blue());
    }

    fn busy(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn done(&mut self) {
        let active = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(spinner) = active {
            spinner.finish_and_clear();
        }
    }
}

const HEADERS: [&str; 5] = ["ID", "Name", "Colour", "Link", "Assigned"];
const UNASSIGNED: &str = "unassigned";

/// Render items as a plain-text table.
///
/// With `styled` set, ids are bold yellow, links become OSC-8 hyperlinks
/// and unassigned items are shown in reverse video. Column widths are
/// computed from the unstyled text so escapes don't skew alignment.
pub fn render_items(items: &[Item], styled: bool) -> String {
    let rows: Vec<[String; 5]> = items
        .iter()
        .map(|item| {
            [
                item.id.to_string(),
                item.name.clone(),
                item.colour.clone(),
                item.link.clone(),
                item.assigned
                    .clone()
                    .unwrap_or_else(|| UNASSIGNED.to_string()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let title = "Items";
    out.push_str(&if styled {
        title.bold().to_string()
    } else {
        title.to_string()
    });
    out.push('\n');

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (row, item) in rows.iter().zip(items) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (cell, w))| {
                let padding = " ".repeat(w - cell.chars().count());
                if !styled {
                    return format!("{cell}{padding}");
                }
                let shown = match col {
                    0 => cell.as_str().bold().yellow().to_string(),
                    3 => hyperlink(&item.link).cyan().to_string(),
                    4 if item.assigned.is_none() => cell.as_str().bold().reverse().to_string(),
                    _ => cell.clone(),
                };
                format!("{shown}{padding}")
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Wrap a URL in an OSC-8 escape so supporting terminals make it clickable.
fn hyperlink(url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{url}\x1b]8;;\x1b\\")
}
