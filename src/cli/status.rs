use crate::auth;
use crate::error::Result;
use crate::settings::load_settings;
use crate::store::{HttpStore, RecordStore};

pub fn run() -> Result<()> {
    let settings = load_settings();
    println!("Store:      {}", settings.store_url);
    println!("Identity:   {}", settings.identity_url);

    let Some(session) = auth::load_session() else {
        println!("Session:    (not signed in)");
        return Ok(());
    };

    if session.display_name.is_empty() {
        println!("Session:    {}", session.email);
    } else {
        println!("Session:    {} <{}>", session.display_name, session.email);
    }

    let store = HttpStore::new(&settings.store_url, &session.token);
    match store.get_profile(&session.uid) {
        Ok(Some(profile)) if profile.has_linked_handle() => {
            println!("Telegram:   {}", profile.telegram_id.unwrap_or_default());
        }
        Ok(_) => println!("Telegram:   (not linked)"),
        Err(e) => println!("Telegram:   (unavailable: {e})"),
    }
    Ok(())
}
