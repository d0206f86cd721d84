//! List-valued relationships between bugs and people.
//!
//! A [`ListChange`] describes what the user asked for; [`ListChange::apply`]
//! turns it into the list to write:
//!
//! 1. a non-empty `set` replaces the list outright, `add`/`remove` ignored;
//! 2. otherwise the result is `(current ∪ add) \ remove`, so an element
//!    named in both ends up removed;
//! 3. a change with nothing in it is not a change, and commands show the
//!    current lists instead of writing.

use std::collections::BTreeSet;
use std::fmt::Display;

use crate::error::Result;
use crate::ports::Ui;
use crate::tracker::record::{BugId, BugRecord, BugUpdate, ListDelta};
use crate::tracker::Tracker;

/// Requested edits to one list-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChange<T> {
    /// Elements to add.
    pub add: Vec<T>,
    /// Elements to remove.
    pub remove: Vec<T>,
    /// Replacement list; wins over `add` and `remove`.
    pub set: Option<Vec<T>>,
}

impl<T> Default for ListChange<T> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            remove: Vec::new(),
            set: None,
        }
    }
}

impl<T: Ord + Clone> ListChange<T> {
    /// True when the user asked for no edit at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty()
            && self.remove.is_empty()
            && self.set.as_ref().map_or(true, Vec::is_empty)
    }

    /// The list to write, given the list as it is now.
    #[must_use]
    pub fn apply(&self, current: &BTreeSet<T>) -> BTreeSet<T> {
        if let Some(set) = self.set.as_ref().filter(|set| !set.is_empty()) {
            return set.iter().cloned().collect();
        }
        let mut next = current.clone();
        next.extend(self.add.iter().cloned());
        for item in &self.remove {
            next.remove(item);
        }
        next
    }
}

/// What must be added and removed to turn `current` into `next`.
#[must_use]
pub fn delta<T: Ord + Clone>(current: &BTreeSet<T>, next: &BTreeSet<T>) -> ListDelta<T> {
    ListDelta {
        add: next.difference(current).cloned().collect(),
        remove: current.difference(next).cloned().collect(),
    }
}

/// A list-valued field of a bug.
pub trait Relation {
    /// Element type: bug numbers or user logins.
    type Item: Ord + Clone + Display;

    /// Lower-case name used in logs and errors.
    const NAME: &'static str;
    /// Heading shown before a non-empty list.
    const HEADING: &'static str;
    /// Line shown for an empty list.
    const EMPTY: &'static str;

    /// The field's current elements.
    fn current(record: &BugRecord) -> BTreeSet<Self::Item>;

    /// An update carrying `delta` for this field.
    fn update(delta: ListDelta<Self::Item>) -> BugUpdate;
}

/// Bugs blocked by a bug.
pub struct Blocks;

impl Relation for Blocks {
    type Item = BugId;
    const NAME: &'static str = "blocked bugs";
    const HEADING: &'static str = "Blocked bugs";
    const EMPTY: &'static str = "No blocked bugs";

    fn current(record: &BugRecord) -> BTreeSet<BugId> {
        record.blocks.iter().copied().collect()
    }

    fn update(delta: ListDelta<BugId>) -> BugUpdate {
        BugUpdate {
            blocks: Some(delta),
            ..BugUpdate::default()
        }
    }
}

/// Bugs a bug depends on.
pub struct DependsOn;

impl Relation for DependsOn {
    type Item = BugId;
    const NAME: &'static str = "dependencies";
    const HEADING: &'static str = "Dependencies";
    const EMPTY: &'static str = "No dependencies";

    fn current(record: &BugRecord) -> BTreeSet<BugId> {
        record.depends_on.iter().copied().collect()
    }

    fn update(delta: ListDelta<BugId>) -> BugUpdate {
        BugUpdate {
            depends_on: Some(delta),
            ..BugUpdate::default()
        }
    }
}

/// Users copied on a bug.
pub struct CcList;

impl Relation for CcList {
    type Item = String;
    const NAME: &'static str = "CC list";
    const HEADING: &'static str = "CC list";
    const EMPTY: &'static str = "No users on CC list";

    fn current(record: &BugRecord) -> BTreeSet<String> {
        record.cc.iter().cloned().collect()
    }

    fn update(delta: ListDelta<String>) -> BugUpdate {
        BugUpdate {
            cc: Some(delta),
            ..BugUpdate::default()
        }
    }
}

/// Print the current list of each bug, in order.
///
/// # Errors
///
/// Stops at the first bug that cannot be read.
pub fn show<R: Relation>(tracker: &Tracker<'_>, ui: &dyn Ui, bugs: &[BugId]) -> Result<()> {
    for &id in bugs {
        let mut bug = tracker.bug(id);
        let items = R::current(bug.read()?);
        ui.show(&format!("Bug {id}:"));
        if items.is_empty() {
            ui.show(&format!("  {}", R::EMPTY));
        } else {
            let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
            ui.show(&format!("  {}: {}", R::HEADING, joined.join(", ")));
        }
    }
    Ok(())
}

/// Apply the same change to each bug, in order.
///
/// Fails fast: the first rejected bug ends the run and later bugs are
/// not touched. Bugs already updated stay updated.
///
/// # Errors
///
/// Returns the first read or update failure.
pub fn mutate<R: Relation>(
    tracker: &Tracker<'_>,
    bugs: &[BugId],
    change: &ListChange<R::Item>,
    comment: Option<&str>,
) -> Result<()> {
    for &id in bugs {
        let written = tracker.bug(id).update_relation::<R>(change, comment)?;
        tracing::debug!(bug = %id, count = written.len(), "{} written", R::NAME);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u32]) -> BTreeSet<u32> {
        items.iter().copied().collect()
    }

    fn change(add: &[u32], remove: &[u32], set: Option<&[u32]>) -> ListChange<u32> {
        ListChange {
            add: add.to_vec(),
            remove: remove.to_vec(),
            set: set.map(<[u32]>::to_vec),
        }
    }

    #[test]
    fn add_then_remove() {
        let change = change(&[4, 5], &[1], None);
        assert_eq!(change.apply(&set(&[1, 2])), set(&[2, 4, 5]));
    }

    #[test]
    fn element_in_add_and_remove_ends_up_removed() {
        let change = change(&[3, 9], &[9], None);
        assert_eq!(change.apply(&set(&[1])), set(&[1, 3]));
    }

    #[test]
    fn removing_an_absent_element_is_harmless() {
        let change = change(&[], &[42], None);
        assert_eq!(change.apply(&set(&[1, 2])), set(&[1, 2]));
    }

    #[test]
    fn set_overrides_add_and_remove() {
        let change = change(&[1], &[7], Some(&[7, 8]));
        assert_eq!(change.apply(&set(&[1, 2, 3])), set(&[7, 8]));
    }

    #[test]
    fn empty_set_counts_as_absent() {
        let edit = change(&[5], &[], Some(&[]));
        assert_eq!(edit.apply(&set(&[1])), set(&[1, 5]));

        assert!(change(&[], &[], Some(&[])).is_empty());
    }

    #[test]
    fn any_part_makes_a_change() {
        assert!(ListChange::<u32>::default().is_empty());
        assert!(!change(&[1], &[], None).is_empty());
        assert!(!change(&[], &[1], None).is_empty());
        assert!(!change(&[], &[], Some(&[1])).is_empty());
    }

    #[test]
    fn delta_lists_additions_and_removals() {
        let d = delta(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert_eq!(d.add, vec![4]);
        assert_eq!(d.remove, vec![1]);
    }
}
