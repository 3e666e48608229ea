//! Interactive operator shell.
//!
//! Keeps one [`Dashboard`] alive across commands so the last result set can
//! be re-sorted and re-shown without another search round trip.

use crate::error::{CliError, CliResult};
use crate::render;
use respond_client::{Dashboard, SearchRequest};
use respond_core::{IncidentStatus, ResultSet, SortKey};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const PROMPT: &str = "respond> ";

const HELP: &str = "\
Commands:
  search <query>          Search incidents and show results
  sort <key>              Re-sort shown results (final_score, confidence_score, age_seconds)
  show                    Show the current results again
  ack <id>                Acknowledge a pending incident
  status <id> <status>    Set status (pending, acknowledged, resolved)
  recommend [query]       Recommend actions for a query or the last search
  recent                  List incidents submitted this session
  help                    Show this help
  quit                    Leave the shell
";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Search(String),
    Sort(String),
    Show,
    Ack(String),
    Status(String, IncidentStatus),
    Recommend(Option<String>),
    Recent,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> CliResult<Self> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let command = match command {
            "" => ShellCommand::Empty,
            "search" | "s" => {
                if rest.is_empty() {
                    return Err(CliError::invalid_argument("usage: search <query>"));
                }
                ShellCommand::Search(rest.to_string())
            }
            "sort" => {
                if rest.is_empty() {
                    return Err(CliError::invalid_argument("usage: sort <key>"));
                }
                ShellCommand::Sort(rest.to_string())
            }
            "show" | "ls" => ShellCommand::Show,
            "ack" => {
                if rest.is_empty() {
                    return Err(CliError::invalid_argument("usage: ack <id>"));
                }
                ShellCommand::Ack(rest.to_string())
            }
            "status" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next(), args.next()) {
                    (Some(id), Some(status), None) => {
                        ShellCommand::Status(id.to_string(), status.parse()?)
                    }
                    _ => {
                        return Err(CliError::invalid_argument("usage: status <id> <status>"));
                    }
                }
            }
            "recommend" => {
                ShellCommand::Recommend(Some(rest.to_string()).filter(|q| !q.is_empty()))
            }
            "recent" => ShellCommand::Recent,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => {
                return Err(CliError::invalid_argument(format!(
                    "unknown command '{}', type 'help'",
                    other
                )));
            }
        };
        Ok(command)
    }
}

/// Expand a short id to the full id of a shown result when unambiguous
pub fn resolve_id(results: Option<&ResultSet>, input: &str) -> String {
    let Some(results) = results else {
        return input.to_string();
    };
    if results.find(input).is_some() {
        return input.to_string();
    }

    let mut matches = results.results.iter().filter(|r| r.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(only), None) => only.id.clone(),
        _ => input.to_string(),
    }
}

/// Run the shell until `quit` or end of input
pub async fn run(dashboard: Dashboard) -> CliResult<()> {
    println!("🚨 RESPOND shell on {}", dashboard.client().base_url());
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("Error: {}", err);
                continue;
            }
        };
        debug!(?command, "Shell command");

        if command == ShellCommand::Quit {
            break;
        }
        if let Err(err) = execute(&dashboard, command).await {
            eprintln!("Error: {}", err);
        }
    }
    Ok(())
}

async fn execute(dashboard: &Dashboard, command: ShellCommand) -> CliResult<()> {
    match command {
        ShellCommand::Search(query) => {
            let limit = dashboard.client().config().default_search_limit;
            let results = dashboard.search(&SearchRequest::new(query, limit)).await?;
            print!("{}", render::render_results(&results, &dashboard.sort_key()));
        }
        ShellCommand::Sort(key) => {
            if key.parse::<SortKey>().is_err() {
                let known: Vec<&str> = SortKey::ALL.iter().map(|k| k.as_str()).collect();
                eprintln!(
                    "Unknown sort key '{}', results keep server order (known: {})",
                    key,
                    known.join(", ")
                );
            }
            dashboard.set_sort_key(key);
            show(dashboard);
        }
        ShellCommand::Show => show(dashboard),
        ShellCommand::Ack(id) => {
            let id = resolve_id(dashboard.results().current().as_deref(), &id);
            let response = dashboard.acknowledge(&id).await?;
            print!("{}", render::render_status_update(&response));
            show(dashboard);
        }
        ShellCommand::Status(id, status) => {
            let id = resolve_id(dashboard.results().current().as_deref(), &id);
            let response = dashboard.update_status(&id, status).await?;
            print!("{}", render::render_status_update(&response));
            show(dashboard);
        }
        ShellCommand::Recommend(query) => {
            let response = dashboard.recommend(query.as_deref()).await?;
            print!("{}", render::render_recommendations(&response));
        }
        ShellCommand::Recent => print!("{}", render::render_recent(&dashboard.recent_incidents())),
        ShellCommand::Help => print!("{}", HELP),
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
    Ok(())
}

fn show(dashboard: &Dashboard) {
    match dashboard.results().current() {
        Some(results) => print!("{}", render::render_results(&results, &dashboard.sort_key())),
        None => println!("No results yet, run 'search <query>' first"),
    }
}
