pub mod config;
pub mod dashboard;
pub mod export;
pub mod list;
pub mod onboarding;
pub mod settings;
pub mod signin;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "facturas",
    about = "Terminal dashboard for invoices digitized by a Telegram bot.",
    long_about = "Browse, search, edit, and export the invoice records the bot's \
ingestion pipeline created from your photos. Running without a subcommand opens \
the interactive dashboard."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in against the identity provider and cache the session.
    Signin {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the cached session.
    Signout,
    /// List invoices as a table.
    List {
        /// Case-insensitive vendor substring filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Export invoices in a date range to a spreadsheet.
    Export {
        /// Start date, inclusive: YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// End date, inclusive: YYYY-MM-DD
        #[arg(long)]
        to: String,
        /// Write CSV instead of XLSX
        #[arg(long)]
        csv: bool,
        /// Output directory (default: current directory)
        #[arg(long)]
        output: Option<String>,
    },
    /// View or update profile settings (Telegram handle, custom prompt).
    Settings {
        /// Telegram handle the bot associates your invoices with
        #[arg(long)]
        telegram: Option<String>,
        /// Extra instructions for the ingestion pipeline
        #[arg(long)]
        prompt: Option<String>,
        /// Clear the stored custom prompt
        #[arg(long, conflicts_with = "prompt")]
        clear_prompt: bool,
    },
    /// Show or set the store and identity endpoints.
    Config {
        /// Record store base URL
        #[arg(long)]
        store_url: Option<String>,
        /// Identity provider base URL
        #[arg(long)]
        identity_url: Option<String>,
    },
    /// Show session, endpoints, and linked handle.
    Status,
}
