use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Marker shown when a record has no usable date.
pub const DATE_NOT_AVAILABLE: &str = "N/A";

/// A stored invoice date. The ingestion pipeline writes either free text
/// (usually `DD/MM/YYYY` or `YYYY-MM-DD`, occasionally something else) or a
/// provider timestamp in milliseconds since the Unix epoch. On the wire a
/// JSON number is a timestamp and a JSON string is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvoiceDate {
    Timestamp(i64),
    Text(String),
}

impl InvoiceDate {
    fn timestamp_date(millis: i64) -> Option<NaiveDate> {
        Local
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.date_naive())
    }

    /// Display form. Free text passes through verbatim, malformed or not;
    /// a timestamp renders as a local `DD/MM/YYYY` date.
    pub fn display(&self) -> String {
        match self {
            InvoiceDate::Text(s) => s.clone(),
            InvoiceDate::Timestamp(ms) => Self::timestamp_date(*ms)
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string()),
        }
    }

    /// `YYYY-MM-DD` form for a date input field. Slash text is reordered
    /// from `DD/MM/YYYY` with zero-padding; slash-free text is assumed
    /// already `YYYY-MM-DD` and passed through unchanged, which means an
    /// odd shape may fail to populate the field. Accepted limitation.
    pub fn to_editable(&self) -> String {
        match self {
            InvoiceDate::Text(s) => {
                if s.contains('/') {
                    let parts: Vec<&str> = s.split('/').collect();
                    if parts.len() == 3 {
                        return format!("{}-{:0>2}-{:0>2}", parts[2], parts[1], parts[0]);
                    }
                }
                s.clone()
            }
            InvoiceDate::Timestamp(ms) => Self::timestamp_date(*ms)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    /// Resolve to a calendar date for range filtering. Slash text parses as
    /// `DD/MM/YYYY`, other text as `YYYY-MM-DD`, a timestamp via the local
    /// calendar. Looser free-text shapes deliberately resolve to `None` and
    /// are excluded from range exports.
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            InvoiceDate::Text(s) => {
                if s.contains('/') {
                    let parts: Vec<&str> = s.split('/').collect();
                    if parts.len() != 3 {
                        return None;
                    }
                    let day: u32 = parts[0].trim().parse().ok()?;
                    let month: u32 = parts[1].trim().parse().ok()?;
                    let year: i32 = parts[2].trim().parse().ok()?;
                    NaiveDate::from_ymd_opt(year, month, day)
                } else {
                    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
                }
            }
            InvoiceDate::Timestamp(ms) => Self::timestamp_date(*ms),
        }
    }
}

/// Display form of an optional date; absence renders the fixed marker.
pub fn display_date(fecha: Option<&InvoiceDate>) -> String {
    fecha
        .map(InvoiceDate::display)
        .unwrap_or_else(|| DATE_NOT_AVAILABLE.to_string())
}

/// Editable form of an optional date; absence yields the empty string.
pub fn editable_date(fecha: Option<&InvoiceDate>) -> String {
    fecha.map(InvoiceDate::to_editable).unwrap_or_default()
}

/// One digitized invoice. Created only by the ingestion pipeline; this
/// application reads, field-merges, and deletes. Field names follow the
/// store schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Store-assigned document id; stripped from merge patches.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<InvoiceDate>,
    #[serde(default)]
    pub proveedor: String,
    #[serde(default)]
    pub n_factura: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub moneda: String,
    /// Set at ingestion, never user-editable.
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    #[serde(default)]
    pub products: Vec<String>,
}

/// One profile per signed-in identity, keyed by identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "telegramId", default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<String>,
    #[serde(rename = "customPrompt", default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

impl UserProfile {
    /// A non-empty linked handle is the sole gate that unlocks the
    /// invoice views; absence routes to onboarding.
    pub fn has_linked_handle(&self) -> bool {
        self.telegram_id
            .as_deref()
            .is_some_and(|h| !h.trim().is_empty())
    }
}

/// Case-insensitive substring filter over vendor names. An empty term
/// returns the full list in its original order.
pub fn filter_by_vendor<'a>(invoices: &'a [Invoice], term: &str) -> Vec<&'a Invoice> {
    let needle = term.to_lowercase();
    invoices
        .iter()
        .filter(|inv| inv.proveedor.to_lowercase().contains(&needle))
        .collect()
}
