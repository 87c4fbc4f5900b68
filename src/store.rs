use log::{debug, error};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Invoice, UserProfile};

/// The one seam between the views and the remote document store. Every
/// query shape and every per-user scope lives behind this trait; no view
/// talks to the store directly.
///
/// Absence on a point read is a normal branch (`Ok(None)`), distinct from
/// a read failure. No operation retries; a failure is terminal for that
/// one call and the caller reports it once.
pub trait RecordStore {
    /// All invoices owned by `user_id`, newest first by creation timestamp.
    fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>>;
    fn get_invoice(&self, id: &str) -> Result<Option<Invoice>>;
    /// Merge the fields of `patch` into the document. A JSON `null` clears
    /// a field; unspecified fields are left alone.
    fn update_invoice(&self, id: &str, patch: &Value) -> Result<()>;
    fn delete_invoice(&self, id: &str) -> Result<()>;
    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
    /// Merge-write profile fields without clobbering unspecified ones.
    fn upsert_profile(&self, user_id: &str, fields: &Value) -> Result<()>;
}

/// Blocking JSON-over-HTTPS implementation against the configured store
/// endpoint, bearer-authenticated with the session token.
pub struct HttpStore {
    base_url: String,
    token: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        match req.bearer_auth(&self.token).send().and_then(|r| r.error_for_status()) {
            Ok(resp) => Ok(resp),
            Err(e) => {
                error!("{what}: {e}");
                Err(e.into())
            }
        }
    }

    /// Point read: 404 is `None`, any other non-success is an error.
    fn get_opt<T: serde::de::DeserializeOwned>(&self, path: &str, what: &str) -> Result<Option<T>> {
        debug!("GET {path}");
        let resp = self.client.get(self.url(path)).bearer_auth(&self.token).send();
        match resp {
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => Ok(None),
            Ok(resp) => match resp.error_for_status() {
                Ok(resp) => Ok(Some(resp.json()?)),
                Err(e) => {
                    error!("{what}: {e}");
                    Err(e.into())
                }
            },
            Err(e) => {
                error!("{what}: {e}");
                Err(e.into())
            }
        }
    }
}

impl RecordStore for HttpStore {
    fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>> {
        debug!("GET invoices for {user_id}");
        let req = self
            .client
            .get(self.url("invoices"))
            .query(&[("userId", user_id)]);
        let resp = self.send(req, "listing invoices")?;
        let mut invoices: Vec<Invoice> = resp.json()?;
        // Newest first, enforced here so every caller sees one contract.
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        self.get_opt(&format!("invoices/{id}"), "reading invoice")
    }

    fn update_invoice(&self, id: &str, patch: &Value) -> Result<()> {
        debug!("PATCH invoices/{id}");
        let req = self.client.patch(self.url(&format!("invoices/{id}"))).json(patch);
        self.send(req, "updating invoice")?;
        Ok(())
    }

    fn delete_invoice(&self, id: &str) -> Result<()> {
        debug!("DELETE invoices/{id}");
        let req = self.client.delete(self.url(&format!("invoices/{id}")));
        self.send(req, "deleting invoice")?;
        Ok(())
    }

    fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.get_opt(&format!("users/{user_id}"), "reading profile")
    }

    fn upsert_profile(&self, user_id: &str, fields: &Value) -> Result<()> {
        debug!("PATCH users/{user_id}");
        let req = self.client.patch(self.url(&format!("users/{user_id}"))).json(fields);
        self.send(req, "writing profile")?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::{Cell, RefCell};

    use serde_json::Value;

    use crate::error::{FacturaError, Result};
    use crate::models::{Invoice, UserProfile};

    use super::RecordStore;

    /// Shallow merge with `null` meaning "clear the field", matching the
    /// store's merge-write semantics.
    pub fn merge_fields(doc: &mut Value, patch: &Value) {
        let (Some(doc), Some(patch)) = (doc.as_object_mut(), patch.as_object()) else {
            return;
        };
        for (key, value) in patch {
            if value.is_null() {
                doc.remove(key);
            } else {
                doc.insert(key.clone(), value.clone());
            }
        }
    }

    /// In-memory store for tests: records every write call and can be
    /// switched to fail all writes.
    #[derive(Default)]
    pub struct MemStore {
        pub invoices: RefCell<Vec<Invoice>>,
        pub profile: RefCell<Option<UserProfile>>,
        pub update_calls: RefCell<Vec<String>>,
        pub delete_calls: RefCell<Vec<String>>,
        pub fail_writes: Cell<bool>,
    }

    impl MemStore {
        pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
            let store = Self::default();
            *store.invoices.borrow_mut() = invoices;
            store
        }

        fn write_error(&self) -> FacturaError {
            FacturaError::Settings("simulated store failure".to_string())
        }
    }

    impl RecordStore for MemStore {
        fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>> {
            let mut invoices: Vec<Invoice> = self
                .invoices
                .borrow()
                .iter()
                .filter(|i| i.user_id == user_id)
                .cloned()
                .collect();
            invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(invoices)
        }

        fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
            Ok(self.invoices.borrow().iter().find(|i| i.id == id).cloned())
        }

        fn update_invoice(&self, id: &str, patch: &Value) -> Result<()> {
            if self.fail_writes.get() {
                return Err(self.write_error());
            }
            self.update_calls.borrow_mut().push(id.to_string());
            let mut invoices = self.invoices.borrow_mut();
            if let Some(inv) = invoices.iter_mut().find(|i| i.id == id) {
                let mut doc = serde_json::to_value(&*inv).unwrap();
                merge_fields(&mut doc, patch);
                let mut merged: Invoice = serde_json::from_value(doc).unwrap();
                merged.id = id.to_string();
                *inv = merged;
            }
            Ok(())
        }

        fn delete_invoice(&self, id: &str) -> Result<()> {
            if self.fail_writes.get() {
                return Err(self.write_error());
            }
            self.delete_calls.borrow_mut().push(id.to_string());
            self.invoices.borrow_mut().retain(|i| i.id != id);
            Ok(())
        }

        fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
            Ok(self
                .profile
                .borrow()
                .clone()
                .filter(|p| p.uid == user_id))
        }

        fn upsert_profile(&self, user_id: &str, fields: &Value) -> Result<()> {
            if self.fail_writes.get() {
                return Err(self.write_error());
            }
            let mut slot = self.profile.borrow_mut();
            let mut doc = match slot.take() {
                Some(p) => serde_json::to_value(p).unwrap(),
                None => serde_json::json!({ "uid": user_id }),
            };
            merge_fields(&mut doc, fields);
            *slot = Some(serde_json::from_value(doc).unwrap());
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_point_read_absence_is_not_an_error() {
            let store = MemStore::default();
            assert!(store.get_invoice("missing").unwrap().is_none());
            assert!(store.get_profile("missing").unwrap().is_none());
        }

        #[test]
        fn test_merge_fields_null_clears() {
            let mut doc = json!({"a": 1, "b": "x"});
            merge_fields(&mut doc, &json!({"b": null, "c": true}));
            assert_eq!(doc, json!({"a": 1, "c": true}));
        }

        #[test]
        fn test_upsert_profile_preserves_unspecified_fields() {
            let store = MemStore::default();
            store
                .upsert_profile(
                    "u1",
                    &json!({"uid": "u1", "email": "a@b.c", "telegramId": "@ana"}),
                )
                .unwrap();
            store
                .upsert_profile("u1", &json!({"customPrompt": "always Transporte"}))
                .unwrap();
            let profile = store.get_profile("u1").unwrap().unwrap();
            assert_eq!(profile.telegram_id.as_deref(), Some("@ana"));
            assert_eq!(profile.custom_prompt.as_deref(), Some("always Transporte"));
        }
    }
}
