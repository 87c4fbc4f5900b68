use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::auth;
use crate::error::Result;
use crate::fmt;
use crate::models::{display_date, filter_by_vendor};
use crate::settings::load_settings;
use crate::store::{HttpStore, RecordStore};

pub fn run(search: Option<&str>) -> Result<()> {
    let session = auth::require_session()?;
    let settings = load_settings();
    let store = HttpStore::new(&settings.store_url, &session.token);
    let invoices = store.list_invoices(&session.uid)?;

    let term = search.unwrap_or("");
    let visible = filter_by_vendor(&invoices, term);
    if visible.is_empty() {
        if term.is_empty() {
            println!("No invoices yet. Send an invoice photo to the Telegram bot to see it here.");
        } else {
            println!("No invoices match \"{term}\".");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Fecha", "Proveedor", "N° Factura", "Tipo", "Total"]);
    for inv in &visible {
        table.add_row(vec![
            display_date(inv.fecha.as_ref()),
            inv.proveedor.clone(),
            inv.n_factura.clone(),
            inv.doc_type.clone().unwrap_or_default(),
            fmt::currency(inv.total, &inv.moneda),
        ]);
    }
    println!("{table}");
    println!("{} invoice(s)", visible.len());
    Ok(())
}
