use crate::error::Result;
use crate::settings::{load_settings, save_settings};

pub fn run(store_url: Option<String>, identity_url: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if store_url.is_none() && identity_url.is_none() {
        println!("Store:      {}", settings.store_url);
        println!("Identity:   {}", settings.identity_url);
        return Ok(());
    }
    if let Some(url) = store_url {
        settings.store_url = url;
    }
    if let Some(url) = identity_url {
        settings.identity_url = url;
    }
    save_settings(&settings)?;
    println!("Settings saved.");
    Ok(())
}
