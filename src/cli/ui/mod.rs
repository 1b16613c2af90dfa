//! UI command - line-oriented terminal front end over the phonebook API

use std::io::BufRead;
use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::client::{PhonebookClient, PhonebookState};
use crate::config::AppConfig;
use crate::infrastructure::logging;

const HELP: &str = "\
Commands:
  list                     show all persons
  filter <text>            show persons whose name contains <text> (empty clears)
  add <name> <number>      add a person, or update the number of an existing name
  delete <id>              delete a person after confirmation
  help                     show this help
  quit                     exit
";

/// Arguments for the UI command
#[derive(Args, Clone)]
pub struct UiArgs {
    /// Root URL of the phonebook API
    #[arg(long, default_value = "http://localhost:3001")]
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiCommand {
    List,
    Filter(String),
    Add { name: String, number: String },
    Delete(String),
    Help,
    Quit,
}

/// Parse one input line. The last token of `add` is the number, everything before it the name.
fn parse_command(line: &str) -> Result<UiCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "list" | "ls" => Ok(UiCommand::List),
        "filter" | "find" => Ok(UiCommand::Filter(rest.to_string())),
        "add" => match rest.rsplit_once(char::is_whitespace) {
            Some((name, number)) if !name.trim().is_empty() => Ok(UiCommand::Add {
                name: name.trim().to_string(),
                number: number.to_string(),
            }),
            _ => Err("usage: add <name> <number>".to_string()),
        },
        "delete" | "rm" if !rest.is_empty() => Ok(UiCommand::Delete(rest.to_string())),
        "delete" | "rm" => Err("usage: delete <id>".to_string()),
        "help" | "?" => Ok(UiCommand::Help),
        "quit" | "exit" | "q" => Ok(UiCommand::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{}', type 'help'", other)),
    }
}

fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

struct Console {
    input: mpsc::Receiver<String>,
    output: Stdout,
}

impl Console {
    fn new() -> Self {
        // Blocking stdin on its own thread, tokio's stdin keeps the runtime alive on exit
        let (tx, rx) = mpsc::channel(16);
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            let mut reader = stdin.lock();

            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Error reading line from stdin: {e}");
                        break;
                    }
                }
            }
        });

        Self {
            input: rx,
            output: tokio::io::stdout(),
        }
    }

    async fn print(&mut self, text: &str) -> anyhow::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Print `text` and wait for the next line. `None` once stdin is closed.
    async fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        self.print(text).await?;
        Ok(self.input.recv().await)
    }
}

/// Run the terminal front end
pub async fn run(args: UiArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    info!("Connecting terminal front end to {}", args.api_url);

    let api = Arc::new(PhonebookClient::new(args.api_url));
    let mut state = PhonebookState::new(api);
    let mut console = Console::new();

    let handle = state.unmount_handle();
    tokio::select! {
        _ = state.load() => {}
        _ = signal::ctrl_c() => {
            handle.unmount();
            return Ok(());
        }
    }

    console.print(&state.render()).await?;
    console.print(HELP).await?;

    while let Some(line) = console.prompt("> ").await? {
        state.clear_expired_notification();

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) if message.is_empty() => continue,
            Err(message) => {
                console.print(&format!("{}\n", message)).await?;
                continue;
            }
        };

        match command {
            UiCommand::List => {}
            UiCommand::Filter(text) => state.set_search(text),
            UiCommand::Add { name, number } => {
                state.set_new_name(name);
                state.set_new_number(number);
                state.submit().await;
            }
            UiCommand::Delete(id) => match state.request_delete(&id) {
                Some(pending) => {
                    let question = format!("{} [y/N] ", pending.prompt());
                    let answer = console.prompt(&question).await?.unwrap_or_default();

                    if is_confirmed(&answer) {
                        state.confirm_delete(pending).await;
                    }
                }
                None => {
                    console.print(&format!("no person with ID: {}\n", id)).await?;
                    continue;
                }
            },
            UiCommand::Help => {
                console.print(HELP).await?;
                continue;
            }
            UiCommand::Quit => break,
        }

        console.print(&state.render()).await?;
    }

    state.unmount();

    Ok(())
}
