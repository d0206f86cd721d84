//! Bug tracker port.

use std::collections::BTreeMap;

use crate::error::PortError;
use crate::tracker::record::{
    BugId, BugRecord, BugUpdate, Comment, FieldDescriptor, Product, User,
};

/// Remote bug tracker operations.
///
/// Every call blocks until the tracker answers. Abstracting the tracker
/// allows deterministic replay and testing without a live server.
pub trait BugTracker: Send + Sync {
    /// Fetches the current data of one bug.
    ///
    /// # Errors
    ///
    /// Returns an error if the bug does not exist or cannot be read.
    fn get_bug(&self, id: BugId) -> Result<BugRecord, PortError>;

    /// Fetches metadata for every bug field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field list cannot be retrieved.
    fn fields(&self) -> Result<Vec<FieldDescriptor>, PortError>;

    /// Lists the products the current user may file bugs against.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be retrieved.
    fn products(&self) -> Result<Vec<Product>, PortError>;

    /// Finds accounts matching a login or name fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    fn match_users(&self, query: &str) -> Result<Vec<User>, PortError>;

    /// Applies an update to one bug.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the change.
    fn update_bug(&self, id: BugId, update: &BugUpdate) -> Result<(), PortError>;

    /// Appends a comment to one bug.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment is rejected.
    fn add_comment(&self, id: BugId, text: &str) -> Result<(), PortError>;

    /// Fetches the comment history of one bug, description included.
    ///
    /// # Errors
    ///
    /// Returns an error if the comments cannot be read.
    fn comments(&self, id: BugId) -> Result<Vec<Comment>, PortError>;

    /// Files a new bug and returns its number.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker refuses the new bug.
    fn create_bug(&self, data: &BTreeMap<String, serde_json::Value>) -> Result<BugId, PortError>;
}
