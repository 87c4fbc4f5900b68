mod auth;
mod cli;
mod editor;
mod error;
mod export;
mod fmt;
mod models;
mod settings;
mod store;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::dashboard::run(),
        Some(Commands::Signin { email }) => cli::signin::run(email),
        Some(Commands::Signout) => cli::signin::signout(),
        Some(Commands::List { search }) => cli::list::run(search.as_deref()),
        Some(Commands::Export {
            from,
            to,
            csv,
            output,
        }) => cli::export::run(&from, &to, csv, output),
        Some(Commands::Settings {
            telegram,
            prompt,
            clear_prompt,
        }) => cli::settings::run(telegram, prompt, clear_prompt),
        Some(Commands::Config {
            store_url,
            identity_url,
        }) => cli::config::run(store_url, identity_url),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
