//! CLI module for the phonebook
//!
//! - `serve`: HTTP API server
//! - `ui`: terminal front end talking to a running API

pub mod serve;
pub mod ui;

use clap::{Parser, Subcommand};

/// Phonebook - contact CRUD API and terminal front end
#[derive(Parser)]
#[command(name = "phonebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Run the terminal front end against an API server
    Ui(ui::UiArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["phonebook", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_ui_default_url() {
        let cli = Cli::try_parse_from(["phonebook", "ui"]).unwrap();

        match cli.command {
            Command::Ui(args) => assert_eq!(args.api_url, "http://localhost:3001"),
            Command::Serve => panic!("expected ui command"),
        }
    }

    #[test]
    fn test_parse_ui_custom_url() {
        let cli =
            Cli::try_parse_from(["phonebook", "ui", "--api-url", "http://10.0.0.5:8080"]).unwrap();

        match cli.command {
            Command::Ui(args) => assert_eq!(args.api_url, "http://10.0.0.5:8080"),
            Command::Serve => panic!("expected ui command"),
        }
    }
}
