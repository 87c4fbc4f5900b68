use serde_json::Value;

use crate::error::Result;
use crate::models::{Invoice, InvoiceDate};

/// The one in-flight edit: a shallow copy of the selected invoice, mutated
/// field by field until submit. Nothing is persisted until the merge patch
/// from [`InvoiceDraft::patch`] is accepted by the store.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    invoice: Invoice,
}

impl InvoiceDraft {
    pub fn new(invoice: &Invoice) -> Self {
        Self {
            invoice: invoice.clone(),
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn id(&self) -> &str {
        &self.invoice.id
    }

    pub fn set_proveedor(&mut self, value: &str) {
        self.invoice.proveedor = value.to_string();
    }

    /// Takes the `YYYY-MM-DD` value of a date field. The draft stores it as
    /// free text, same as the original record format; empty clears the date.
    pub fn set_editable_date(&mut self, value: &str) {
        self.invoice.fecha = if value.is_empty() {
            None
        } else {
            Some(InvoiceDate::Text(value.to_string()))
        };
    }

    pub fn set_n_factura(&mut self, value: &str) {
        self.invoice.n_factura = value.to_string();
    }

    /// Always stored, even when empty, so clearing the type survives the
    /// merge-write instead of leaving the old value behind.
    pub fn set_doc_type(&mut self, value: &str) {
        self.invoice.doc_type = Some(value.to_string());
    }

    pub fn set_moneda(&mut self, value: &str) {
        self.invoice.moneda = value.to_string();
    }

    pub fn set_total(&mut self, value: f64) {
        self.invoice.total = value;
    }

    /// Append an empty product row.
    pub fn add_product(&mut self) {
        self.invoice.products.push(String::new());
    }

    /// Delete the product at `index`, preserving the order of the rest.
    pub fn remove_product(&mut self, index: usize) {
        if index < self.invoice.products.len() {
            self.invoice.products.remove(index);
        }
    }

    pub fn set_product(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.invoice.products.get_mut(index) {
            *slot = value.to_string();
        }
    }

    /// Merge patch for the store: every field except the store-assigned id.
    /// Cleared optional fields travel as explicit `null`, since a merge-write
    /// leaves absent keys untouched.
    pub fn patch(&self) -> Result<Value> {
        let mut value = serde_json::to_value(&self.invoice)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("id");
            if self.invoice.fecha.is_none() {
                obj.insert("fecha".to_string(), Value::Null);
            }
            if self.invoice.doc_type.is_none() {
                obj.insert("type".to_string(), Value::Null);
            }
        }
        Ok(value)
    }
}
