//! Handle on a single bug.

use std::collections::BTreeSet;

use super::record::{BugId, BugRecord, BugUpdate, Comment};
use super::Tracker;
use crate::error::{Error, Result};
use crate::relations::{delta, ListChange, Relation};

/// One bug on the tracker.
///
/// Data is fetched on first read and dropped after every successful
/// update, so a later read sees the tracker's view.
pub struct BugHandle<'t> {
    tracker: &'t Tracker<'t>,
    id: BugId,
    record: Option<BugRecord>,
}

impl<'t> BugHandle<'t> {
    pub(super) fn new(tracker: &'t Tracker<'t>, id: BugId) -> Self {
        Self {
            tracker,
            id,
            record: None,
        }
    }

    /// The bug number.
    #[must_use]
    pub fn id(&self) -> BugId {
        self.id
    }

    /// Fetch the bug's data from the tracker, replacing anything cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the bug cannot be read.
    pub fn read(&mut self) -> Result<&BugRecord> {
        let record = self.fetch()?;
        Ok(self.record.insert(record))
    }

    /// The bug's data, fetching it if this handle has none yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the bug cannot be read.
    pub fn record(&mut self) -> Result<&BugRecord> {
        let record = match self.record.take() {
            Some(record) => record,
            None => self.fetch()?,
        };
        Ok(self.record.insert(record))
    }

    /// Whether the bug's current status is an open one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the bug cannot be read.
    pub fn is_open(&mut self) -> Result<bool> {
        Ok(self.record()?.is_open)
    }

    /// Reassign the bug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the tracker rejects the change.
    pub fn set_assigned_to(&mut self, user: &str, comment: Option<&str>) -> Result<()> {
        let update = BugUpdate {
            assigned_to: Some(user.to_string()),
            ..BugUpdate::default()
        };
        self.update(&update.with_comment(comment), "assign")
    }

    /// Change status and, optionally, resolution.
    ///
    /// `resolution` of `Some("")` clears the resolution; `None` leaves it alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the tracker rejects the change.
    pub fn set_status(
        &mut self,
        status: &str,
        resolution: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let update = BugUpdate {
            status: Some(status.to_string()),
            resolution: resolution.map(str::to_string),
            ..BugUpdate::default()
        };
        self.update(&update.with_comment(comment), "set status")
    }

    /// Mark the bug as a duplicate; the tracker picks status and resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the tracker rejects the change.
    pub fn set_dupe_of(&mut self, original: BugId, comment: Option<&str>) -> Result<()> {
        let update = BugUpdate {
            dupe_of: Some(original),
            ..BugUpdate::default()
        };

        self.update(&update.with_comment(comment), "mark duplicate")
    }

    /// Edit a list-valued relationship and return the list as written.
    ///
    /// The current list is read first; the tracker receives the difference
    /// between it and the list computed from `change`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the bug cannot be read or the tracker
    /// rejects the change.
    pub fn update_relation<R: Relation>(
        &mut self,
        change: &ListChange<R::Item>,
        comment: Option<&str>,
    ) -> Result<BTreeSet<R::Item>> {
        let current = R::current(self.record()?);
        let next = change.apply(&current);
        let update = R::update(delta(&current, &next)).with_comment(comment);
        self.update(&update, &format!("update {}", R::NAME))?;
        Ok(next)
    }

    /// Append a comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the tracker rejects the comment.
    pub fn add_comment(&self, text: &str) -> Result<()> {
        tracing::debug!(bug = %self.id, "adding comment");
        self.tracker
            .api()
            .add_comment(self.id, text)
            .map_err(|e| Error::remote(format!("bug {}: add comment", self.id), &e))
    }

    /// The bug's comment history as the tracker returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the comments cannot be read.
    pub fn comments(&self) -> Result<Vec<Comment>> {
        self.tracker
            .api()
            .comments(self.id)
            .map_err(|e| Error::remote(format!("bug {}: read comments", self.id), &e))
    }

    fn fetch(&self) -> Result<BugRecord> {
        tracing::debug!(bug = %self.id, "reading bug");
        let mut record = self
            .tracker
            .api()
            .get_bug(self.id)
            .map_err(|e| Error::remote(format!("bug {}: read", self.id), &e))?;
        record.retain_known(self.tracker.fields()?);
        Ok(record)
    }

    fn update(&mut self, update: &BugUpdate, what: &str) -> Result<()> {
        self.tracker
            .api()
            .update_bug(self.id, update)
            .map_err(|e| Error::remote(format!("bug {}: {what}", self.id), &e))?;
        tracing::info!(bug = %self.id, "{what}");
        self.record = None;
        Ok(())
    }
}
