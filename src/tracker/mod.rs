//! Domain-level view of the bug tracker.
//!
//! [`Tracker`] wraps the [`BugTracker`] port with the lookups commands
//! need (field values filtered for a bug, unique user matches) and caches
//! field metadata for the rest of the invocation.

pub mod bug;
pub mod record;

use std::cell::OnceCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::ports::BugTracker;

pub use bug::BugHandle;
pub use record::{BugId, BugRecord, Comment, FieldDescriptor, FieldValue, Product, User};

/// Tracker handle for one command invocation.
pub struct Tracker<'a> {
    api: &'a dyn BugTracker,
    fields: OnceCell<Vec<FieldDescriptor>>,
}

impl<'a> Tracker<'a> {
    /// Wrap a port implementation.
    #[must_use]
    pub fn new(api: &'a dyn BugTracker) -> Self {
        Self {
            api,
            fields: OnceCell::new(),
        }
    }

    /// The underlying port.
    #[must_use]
    pub fn api(&self) -> &'a dyn BugTracker {
        self.api
    }

    /// A handle on one bug. Nothing is fetched until it is needed.
    #[must_use]
    pub fn bug(&self, id: BugId) -> BugHandle<'_> {
        BugHandle::new(self, id)
    }

    /// Field metadata, fetched on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the metadata cannot be retrieved.
    pub fn fields(&self) -> Result<&[FieldDescriptor]> {
        if let Some(fields) = self.fields.get() {
            return Ok(fields);
        }
        tracing::debug!("fetching field metadata");
        let fetched = self.api.fields().map_err(|e| Error::remote("fields", &e))?;
        Ok(self.fields.get_or_init(|| fetched))
    }

    /// Permitted values of `name`, in display order.
    ///
    /// Placeholder values without a name are omitted. When `visible_for`
    /// holds bug data containing the field's controlling field, only values
    /// visible for that controlling value are returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unknown field and
    /// [`Error::Remote`] if metadata cannot be fetched.
    pub fn field_values(
        &self,
        name: &str,
        visible_for: Option<&BTreeMap<String, serde_json::Value>>,
    ) -> Result<Vec<FieldValue>> {
        let field = self
            .fields()?
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::Validation(format!("unknown field: {name}")))?;

        let mut values: Vec<FieldValue> = field
            .values
            .iter()
            .flatten()
            .filter(|v| !v.name.is_empty())
            .cloned()
            .collect();

        let controlling = field
            .value_field
            .as_deref()
            .zip(visible_for)
            .and_then(|(value_field, data)| data.get(value_field))
            .map(value_text);
        if let Some(controlling) = controlling {
            values.retain(|v| v.visibility_values.contains(&controlling));
        }

        values.sort_by_key(|v| v.sort_key);
        Ok(values)
    }

    /// Products open to the current user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the list cannot be retrieved.
    pub fn products(&self) -> Result<Vec<Product>> {
        self.api
            .products()
            .map_err(|e| Error::remote("products", &e))
    }

    /// The single account matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when zero or several accounts match.
    pub fn match_one_user(&self, query: &str) -> Result<User> {
        let mut users = self
            .api
            .match_users(query)
            .map_err(|e| Error::remote(format!("user lookup '{query}'"), &e))?;
        match users.len() {
            0 => Err(Error::Validation(format!("no users matching '{query}'"))),
            1 => Ok(users.remove(0)),
            _ => {
                let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
                Err(Error::Validation(format!(
                    "multiple users matching '{query}': {}",
                    names.join(", ")
                )))
            }
        }
    }

    /// File a new bug from field values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the tracker refuses the bug.
    pub fn create_bug(&self, data: &BTreeMap<String, serde_json::Value>) -> Result<BugId> {
        let id = self
            .api
            .create_bug(data)
            .map_err(|e| Error::remote("create bug", &e))?;
        tracing::info!(bug = %id, "bug created");
        Ok(id)
    }
}

/// Render a field value as display text.
///
/// Strings print bare, lists are comma separated, everything else uses
/// its JSON form.
#[must_use]
pub fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(items) => {
            items.iter().map(value_text).collect::<Vec<_>>().join(", ")
        }
        other => other.to_string(),
    }
}
