use std::path::PathBuf;

use crate::auth;
use crate::error::Result;
use crate::export;
use crate::settings::load_settings;
use crate::store::{HttpStore, RecordStore};

pub fn run(from: &str, to: &str, as_csv: bool, output: Option<String>) -> Result<()> {
    // Validate the range before touching the session or the store.
    export::parse_range_date(from)?;
    export::parse_range_date(to)?;

    let session = auth::require_session()?;
    let settings = load_settings();
    let store = HttpStore::new(&settings.store_url, &session.token);
    let invoices = store.list_invoices(&session.uid)?;

    let dir = output.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let path = export::export_to_dir(&invoices, from, to, &dir, as_csv)?;
    println!("Wrote {}", path.display());
    Ok(())
}
