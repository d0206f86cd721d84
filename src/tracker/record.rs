//! Bug records and the metadata that describes them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bug number.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BugId(pub u32);

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BugId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// The data of one bug as returned by the tracker.
///
/// Fields every tracker has are typed; custom fields land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    /// Bug number.
    pub id: BugId,
    /// One-line summary.
    #[serde(default)]
    pub summary: String,
    /// Current status (`NEW`, `RESOLVED`, ...).
    #[serde(default)]
    pub status: String,
    /// Current resolution; empty while the bug is open.
    #[serde(default)]
    pub resolution: String,
    /// Whether the current status counts as open.
    #[serde(default)]
    pub is_open: bool,
    /// Product the bug is filed against.
    #[serde(default)]
    pub product: String,
    /// Component within the product.
    #[serde(default)]
    pub component: String,
    /// Product version.
    #[serde(default)]
    pub version: String,
    /// Login of the assignee.
    #[serde(default)]
    pub assigned_to: String,
    /// Priority.
    #[serde(default)]
    pub priority: String,
    /// Severity.
    #[serde(default)]
    pub severity: String,
    /// Bugs this bug blocks.
    #[serde(default)]
    pub blocks: Vec<BugId>,
    /// Bugs this bug depends on.
    #[serde(default)]
    pub depends_on: Vec<BugId>,
    /// Logins on the CC list.
    #[serde(default)]
    pub cc: Vec<String>,
    /// Bug this one duplicates, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dupe_of: Option<BugId>,
    /// Tracker-specific fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BugRecord {
    /// Drop extension entries that do not name a known field.
    pub fn retain_known(&mut self, fields: &[FieldDescriptor]) {
        let known: BTreeSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        self.extra.retain(|name, _| {
            let keep = known.contains(name.as_str());
            if !keep {
                tracing::debug!(bug = %self.id, field = %name, "dropping unknown field");
            }
            keep
        });
    }

    /// Flatten the record into a field-name keyed map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// Metadata about one bug field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Internal field name.
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Whether a value is required when filing a bug.
    #[serde(default)]
    pub is_mandatory: bool,
    /// Field whose value controls which of our values are visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Permitted values, for select-like fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FieldValue>>,
}

/// One permitted value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Value name; empty for placeholder entries.
    #[serde(default)]
    pub name: String,
    /// Display ordering.
    #[serde(default, alias = "sortkey")]
    pub sort_key: i64,
    /// Values of the controlling field for which this value applies.
    #[serde(default)]
    pub visibility_values: Vec<String>,
    /// For status values: whether bugs in this status are open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

/// A product bugs can be filed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A tracker account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    pub name: String,
    /// Full name, when public.
    #[serde(default)]
    pub real_name: String,
}

/// One entry of a bug's comment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Tracker-wide comment id; increases with time.
    pub id: u64,
    /// Position within the bug; 0 is the description.
    #[serde(default)]
    pub count: u32,
    /// Author login.
    pub creator: String,
    /// When the comment was made.
    pub time: DateTime<Utc>,
    /// Comment body.
    pub text: String,
}

/// Body of an update to an existing bug.
///
/// Serializes directly to the tracker's update payload; absent parts are
/// omitted so only the named fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BugUpdate {
    /// New assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New resolution; an empty string clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Mark as duplicate of this bug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dupe_of: Option<BugId>,
    /// Changes to the blocked-bugs list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<ListDelta<BugId>>,
    /// Changes to the dependency list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<ListDelta<BugId>>,
    /// Changes to the CC list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<ListDelta<String>>,
    /// Comment attached to the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentBody>,
}

impl BugUpdate {
    /// Attach a comment, if there is one.
    #[must_use]
    pub fn with_comment(mut self, comment: Option<&str>) -> Self {
        self.comment = comment.map(|body| CommentBody {
            body: body.to_string(),
        });
        self
    }
}

/// Elements to add to and remove from a list-valued field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDelta<T> {
    /// Elements to add.
    pub add: Vec<T>,
    /// Elements to remove.
    pub remove: Vec<T>,
}

/// A comment as sent with an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBody {
    /// Comment text.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            display_name: name.into(),
            is_mandatory: false,
            value_field: None,
            values: None,
        }
    }

    #[test]
    fn unknown_extension_fields_are_dropped_on_validation() {
        let mut record: BugRecord = serde_json::from_value(json!({
            "id": 7,
            "summary": "crash on start",
            "cf_fixed_in": "2.1",
            "is_cc_accessible": true
        }))
        .unwrap();

        record.retain_known(&[descriptor("cf_fixed_in"), descriptor("bug_status")]);

        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.extra["cf_fixed_in"], json!("2.1"));
    }

    #[test]
    fn update_omits_untouched_fields() {
        let update = BugUpdate {
            status: Some("RESOLVED".into()),
            ..BugUpdate::default()
        }
        .with_comment(Some("done"));


        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "RESOLVED", "comment": {"body": "done"}})
        );
    }

    #[test]
    fn field_values_accept_legacy_sortkey() {
        let value: FieldValue =
            serde_json::from_value(json!({"name": "P1", "sortkey": 3})).unwrap();
        assert_eq!(value.sort_key, 3);
        assert!(value.visibility_values.is_empty());
    }
}
