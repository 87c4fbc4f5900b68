use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use crate::error::{FacturaError, Result};
use crate::models::{display_date, Invoice};

pub const SHEET_NAME: &str = "Facturas";
pub const PRODUCT_DELIMITER: &str = ", ";

const HEADERS: [&str; 7] = [
    "Fecha",
    "Proveedor",
    "N° Factura",
    "Tipo",
    "Total",
    "Moneda",
    "Productos",
];

/// One spreadsheet row. `total` stays numeric; everything else is already
/// display text.
pub struct ExportRow {
    pub fecha: String,
    pub proveedor: String,
    pub n_factura: String,
    pub tipo: String,
    pub total: f64,
    pub moneda: String,
    pub productos: String,
}

pub fn parse_range_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FacturaError::InvalidDate(value.to_string()))
}

/// Keep invoices whose date resolves to a calendar date within
/// `[start, end]` inclusive. Unresolvable dates are excluded.
pub fn select_range<'a>(
    invoices: &'a [Invoice],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|inv| {
            inv.fecha
                .as_ref()
                .and_then(|f| f.resolve())
                .is_some_and(|d| d >= start && d <= end)
        })
        .collect()
}

pub fn project_rows(invoices: &[&Invoice]) -> Vec<ExportRow> {
    invoices
        .iter()
        .map(|inv| ExportRow {
            fecha: display_date(inv.fecha.as_ref()),
            proveedor: inv.proveedor.clone(),
            n_factura: inv.n_factura.clone(),
            tipo: inv.doc_type.clone().unwrap_or_default(),
            total: inv.total,
            moneda: inv.moneda.clone(),
            productos: inv.products.join(PRODUCT_DELIMITER),
        })
        .collect()
}

/// File name embeds the literal start and end date strings.
pub fn file_name(start: &str, end: &str, as_csv: bool) -> String {
    let ext = if as_csv { "csv" } else { "xlsx" };
    format!("facturas_{start}_{end}.{ext}")
}

fn write_xlsx(rows: &[ExportRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, &row.fecha)?;
        sheet.write_string(r, 1, &row.proveedor)?;
        sheet.write_string(r, 2, &row.n_factura)?;
        sheet.write_string(r, 3, &row.tipo)?;
        sheet.write_number(r, 4, row.total)?;
        sheet.write_string(r, 5, &row.moneda)?;
        sheet.write_string(r, 6, &row.productos)?;
    }
    workbook.save(path)?;
    Ok(())
}

fn write_csv(rows: &[ExportRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for row in rows {
        let total = row.total.to_string();
        writer.write_record([
            row.fecha.as_str(),
            row.proveedor.as_str(),
            row.n_factura.as_str(),
            row.tipo.as_str(),
            total.as_str(),
            row.moneda.as_str(),
            row.productos.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Filter the already-loaded list by the inclusive range and write the
/// spreadsheet into `dir`. Zero matches is an error and no file is
/// produced. Never re-queries the store.
pub fn export_to_dir(
    invoices: &[Invoice],
    start: &str,
    end: &str,
    dir: &Path,
    as_csv: bool,
) -> Result<PathBuf> {
    let start_date = parse_range_date(start)?;
    let end_date = parse_range_date(end)?;
    let kept = select_range(invoices, start_date, end_date);
    if kept.is_empty() {
        return Err(FacturaError::EmptyExport);
    }
    let rows = project_rows(&kept);
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name(start, end, as_csv));
    if as_csv {
        write_csv(&rows, &path)?;
    } else {
        write_xlsx(&rows, &path)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceDate;

    fn invoice(id: &str, fecha: Option<InvoiceDate>) -> Invoice {
        Invoice {
            id: id.to_string(),
            user_id: "u1".to_string(),
            doc_type: None,
            fecha,
            proveedor: "Coto".to_string(),
            n_factura: "0001".to_string(),
            total: 100.0,
            moneda: "ARS".to_string(),
            created_at: 0,
            products: vec!["Pan".to_string(), "Leche".to_string()],
        }
    }

    fn january() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_select_range_inclusion() {
        let invoices = vec![
            invoice("in-slash", Some(InvoiceDate::Text("15/01/2024".into()))),
            invoice("in-edge", Some(InvoiceDate::Text("31/01/2024".into()))),
            invoice("out-after", Some(InvoiceDate::Text("2024-02-01".into()))),
            invoice("unparseable", Some(InvoiceDate::Text("mid january".into()))),
            invoice("no-date", None),
        ];
        let (start, end) = january();
        let kept = select_range(&invoices, start, end);
        let ids: Vec<&str> = kept.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["in-slash", "in-edge"]);
    }

    #[test]
    fn test_project_rows() {
        let mut inv = invoice("a", Some(InvoiceDate::Text("15/01/2024".into())));
        inv.doc_type = Some("Ticket".into());
        let with_type = inv.clone();
        inv.doc_type = None;
        let rows = project_rows(&[&with_type, &inv]);
        assert_eq!(rows[0].tipo, "Ticket");
        assert_eq!(rows[1].tipo, "");
        assert_eq!(rows[0].fecha, "15/01/2024");
        assert_eq!(rows[0].productos, "Pan, Leche");
        assert_eq!(rows[0].total, 100.0);
    }

    #[test]
    fn test_export_zero_matches_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let invoices = vec![invoice("a", Some(InvoiceDate::Text("15/06/2024".into())))];
        let result = export_to_dir(&invoices, "2024-01-01", "2024-01-31", dir.path(), false);
        assert!(matches!(result, Err(FacturaError::EmptyExport)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_rejects_bad_date_input() {
        let dir = tempfile::tempdir().unwrap();
        let invoices = vec![invoice("a", Some(InvoiceDate::Text("15/01/2024".into())))];
        let result = export_to_dir(&invoices, "01/01/2024", "2024-01-31", dir.path(), false);
        assert!(matches!(result, Err(FacturaError::InvalidDate(_))));
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let invoices = vec![invoice("a", Some(InvoiceDate::Text("15/01/2024".into())))];
        let path = export_to_dir(&invoices, "2024-01-01", "2024-01-31", dir.path(), true).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "facturas_2024-01-01_2024-01-31.csv"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Fecha,Proveedor"));
        assert!(content.contains("15/01/2024,Coto,0001,,100,ARS,\"Pan, Leche\""));
    }

    #[test]
    fn test_export_writes_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let invoices = vec![invoice("a", Some(InvoiceDate::Text("15/01/2024".into())))];
        let path = export_to_dir(&invoices, "2024-01-01", "2024-01-31", dir.path(), false).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "facturas_2024-01-01_2024-01-31.xlsx"
        );
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
