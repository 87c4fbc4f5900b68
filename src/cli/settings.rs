use colored::Colorize;
use serde_json::{Map, Value};

use crate::auth;
use crate::cli::onboarding::validate_handle;
use crate::error::Result;
use crate::settings::load_settings;
use crate::store::{HttpStore, RecordStore};

/// With no flags, show the profile. With flags, merge-write the given
/// fields. A cleared prompt is written as an explicit `null`, which removes
/// the stored field; an omitted flag leaves the stored value alone.
pub fn run(telegram: Option<String>, prompt: Option<String>, clear_prompt: bool) -> Result<()> {
    let session = auth::require_session()?;
    let settings = load_settings();
    let store = HttpStore::new(&settings.store_url, &session.token);

    if telegram.is_none() && prompt.is_none() && !clear_prompt {
        return show(&store, &session.uid);
    }

    let mut fields = Map::new();
    if let Some(handle) = telegram {
        let handle = handle.trim().to_string();
        validate_handle(&handle)?;
        fields.insert("telegramId".to_string(), Value::String(handle));
    }
    if clear_prompt {
        fields.insert("customPrompt".to_string(), Value::Null);
    } else if let Some(p) = prompt {
        let p = p.trim().to_string();
        if p.is_empty() {
            // The empty string is never stored.
            fields.insert("customPrompt".to_string(), Value::Null);
        } else {
            fields.insert("customPrompt".to_string(), Value::String(p));
        }
    }

    store.upsert_profile(&session.uid, &Value::Object(fields))?;
    println!("{} Settings saved.", "✓".green());
    Ok(())
}

fn show(store: &dyn RecordStore, uid: &str) -> Result<()> {
    match store.get_profile(uid)? {
        None => {
            println!("No profile yet. Run `facturas` to link your Telegram handle.");
        }
        Some(profile) => {
            println!("Email:      {}", profile.email);
            println!(
                "Name:       {}",
                if profile.display_name.is_empty() {
                    "(not set)"
                } else {
                    &profile.display_name
                }
            );
            println!(
                "Telegram:   {}",
                profile.telegram_id.as_deref().unwrap_or("(not linked)")
            );
            println!(
                "Prompt:     {}",
                profile.custom_prompt.as_deref().unwrap_or("(none)")
            );
        }
    }
    Ok(())
}
