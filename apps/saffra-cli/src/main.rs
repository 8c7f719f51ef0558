//! # saffra-cli
//!
//! Operator tool for the catering inquiry flow.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu                      list available items, grouped by category   │
//! │  submit contact <file>     validate + send a catering inquiry          │
//! │  submit careers <file>     validate + send a job application           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - `0` - success
//! - `1` - delivery or configuration failure
//! - `2` - the form failed validation (field errors on stderr)

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use saffra_core::SubmissionStatus;
use saffra_relay::{
    Dispatcher, MenuSource, RelayConfig, RelayError, RelayResult, Web3FormsTransport,
    GENERIC_MESSAGE,
};

use crate::commands::{CliMenu, ContactFile};

#[derive(Parser)]
#[command(name = "saffra-cli", about = "Saffra catering inquiry tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available menu
    Menu {
        /// JSON menu file instead of the configured menu database
        #[arg(long)]
        menu_file: Option<PathBuf>,
    },
    /// Validate and send a form file
    Submit {
        form: FormArg,
        /// JSON form file
        file: PathBuf,
        /// JSON menu file used to resolve contact `items`
        #[arg(long)]
        menu_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormArg {
    Contact,
    Careers,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = RelayConfig::load()?;

    match cli.command {
        Commands::Menu { menu_file } => {
            let menu = CliMenu::resolve(menu_file.as_deref(), &config)?;
            let items = menu.list_available_menu_items().await?;
            info!(count = items.len(), "Menu loaded");
            print!("{}", commands::render_menu(&items));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Submit {
            form,
            file,
            menu_file,
        } => {
            let dispatcher = Dispatcher::new(Web3FormsTransport::new(&config.relay_url), &config);
            match form {
                FormArg::Contact => {
                    let contact: ContactFile = commands::read_json(&file)?;
                    let menu = if contact.items.is_empty() {
                        Vec::new()
                    } else {
                        CliMenu::resolve(menu_file.as_deref(), &config)?
                            .list_available_menu_items()
                            .await?
                    };

                    let mut session = commands::contact_session(contact, &menu, config.pricing())?;
                    debug!(lines = session.cart().line_count(), "Contact session ready");

                    let result = dispatcher.submit_contact(&mut session).await;
                    Ok(report(result, session.errors(), session.status()))
                }
                FormArg::Careers => {
                    let mut session = commands::careers_session(commands::read_json(&file)?);
                    let result = dispatcher.submit_careers(&mut session).await;
                    Ok(report(result, session.errors(), session.status()))
                }
            }
        }
    }
}

/// Prints the outcome the way the website would show it.
fn report(
    result: RelayResult<()>,
    errors: &saffra_core::FieldErrors,
    status: &SubmissionStatus,
) -> ExitCode {
    match result {
        Ok(()) => {
            println!("{}", status.message().unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(RelayError::Invalid(_)) => {
            eprintln!("The form has errors:");
            eprint!("{}", commands::render_field_errors(errors));
            ExitCode::from(2)
        }
        Err(_) => {
            // Details were logged by the dispatcher.
            eprintln!("{}", status.message().unwrap_or(GENERIC_MESSAGE));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=saffra_relay=trace` - Trace the relay crate only
/// - Default: INFO, DEBUG for saffra crates
///
/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,saffra=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
