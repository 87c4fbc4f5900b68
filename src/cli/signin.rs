use std::io::Write;

use colored::Colorize;
use zeroize::Zeroize;

use crate::auth;
use crate::error::Result;
use crate::settings::load_settings;

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn run(email: Option<String>) -> Result<()> {
    let settings = load_settings();
    let email = match email {
        Some(e) => e,
        None => prompt_line("Email: ")?,
    };
    let mut password = rpassword::prompt_password("Password: ")?;
    let result = auth::sign_in(&settings.identity_url, &email, &password);
    password.zeroize();
    let session = result?;
    auth::save_session(&session)?;

    if session.display_name.is_empty() {
        println!("{} Signed in as {}.", "✓".green(), session.email);
    } else {
        println!(
            "{} Signed in as {} <{}>.",
            "✓".green(),
            session.display_name,
            session.email
        );
    }
    Ok(())
}

pub fn signout() -> Result<()> {
    if auth::clear_session()? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}
