use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacturaError {
    #[error("Store error: {0}")]
    Store(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not signed in. Run `facturas signin` first.")]
    NotSignedIn,

    #[error("Sign-in failed: {0}")]
    SignIn(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid Telegram handle: {0}")]
    InvalidHandle(String),

    #[error("No invoices in the selected date range")]
    EmptyExport,

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, FacturaError>;
