//! Status and resolution changes.
//!
//! Planning happens once for the whole batch and touches nothing; only
//! [`apply`] writes. An invalid status or resolution therefore fails
//! before any bug is changed.

use crate::error::{Error, Result};
use crate::ports::Ui;
use crate::tracker::{BugHandle, BugId, Tracker};

/// Field holding bug statuses.
const STATUS_FIELD: &str = "bug_status";
/// Field holding resolutions.
const RESOLUTION_FIELD: &str = "resolution";

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRequest {
    /// Target status, any case.
    pub status: Option<String>,
    /// Target resolution, any case.
    pub resolution: Option<String>,
    /// Bug the targets duplicate; overrides status and resolution.
    pub dupe_of: Option<BugId>,
}

/// Effect of a transition on the resolution field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Leave whatever the bug has.
    Unchanged,
    /// Set to this value.
    Set(String),
    /// Clear it; the target status is open.
    Cleared,
}

impl Resolution {
    /// The value sent to the tracker, if any.
    #[must_use]
    pub fn as_update(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Set(value) => Some(value),
            Self::Cleared => Some(""),
        }
    }
}

/// A fully decided transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Mark as duplicate; the tracker decides status and resolution.
    Duplicate(BugId),
    /// Move to `status` with the given resolution effect.
    Status {
        /// Final status name.
        status: String,
        /// Resolution effect.
        resolution: Resolution,
    },
}

/// The duplicate-marking transition.
#[must_use]
pub fn plan_duplicate(original: BugId) -> Transition {
    Transition::Duplicate(original)
}

/// Decide the transition for `bugs`.
///
/// Prompts for a status when none was given. Leaving an open status
/// without an explicit resolution prompts for one only when at least one
/// of the bugs is currently open; otherwise the resolution is left alone.
/// Entering an open status always clears the resolution.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming an unknown status or resolution,
/// [`Error::Cancelled`] if a required choice is not made, and
/// [`Error::Remote`] if metadata or bugs cannot be read.
pub fn plan(
    request: &StatusRequest,
    tracker: &Tracker<'_>,
    ui: &dyn Ui,
    bugs: &mut [BugHandle<'_>],
) -> Result<Transition> {
    if let Some(original) = request.dupe_of {
        return Ok(plan_duplicate(original));
    }

    let statuses = tracker.field_values(STATUS_FIELD, None)?;
    let status = match &request.status {
        Some(status) => status.to_uppercase(),
        None => {
            let names: Vec<String> = statuses.iter().map(|v| v.name.clone()).collect();
            ui.choose("Choose a status", &names)
                .map_err(|e| Error::Cancelled(format!("status selection: {e}")))?
        }
    };

    let value = statuses
        .iter()
        .find(|v| v.name == status)
        .ok_or_else(|| Error::Validation(format!("invalid status: {status}")))?;
    let is_open = value.is_open.ok_or_else(|| {
        Error::Validation(format!(
            "status {status} is not classified as open or closed"
        ))
    })?;

    if is_open {
        return Ok(Transition::Status {
            status,
            resolution: Resolution::Cleared,
        });
    }

    let resolution = if let Some(resolution) = &request.resolution {
        let resolution = resolution.to_uppercase();
        let known = tracker.field_values(RESOLUTION_FIELD, None)?;
        if !known.iter().any(|v| v.name == resolution) {
            return Err(Error::Validation(format!(
                "invalid resolution: {resolution}"
            )));
        }
        Resolution::Set(resolution)
    } else if any_open(bugs)? {
        let names: Vec<String> = tracker
            .field_values(RESOLUTION_FIELD, None)?
            .into_iter()
            .map(|v| v.name)
            .collect();
        let chosen = ui
            .choose("Choose a resolution", &names)
            .map_err(|e| Error::Cancelled(format!("resolution selection: {e}")))?;
        Resolution::Set(chosen)
    } else {
        Resolution::Unchanged
    };

    Ok(Transition::Status { status, resolution })
}

/// Write `transition` to each bug in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first [`Error::Remote`]; bugs before it stay changed.
pub fn apply(
    transition: &Transition,
    bugs: &mut [BugHandle<'_>],
    comment: Option<&str>,
) -> Result<()> {
    for bug in bugs {
        match transition {
            Transition::Duplicate(original) => bug.set_dupe_of(*original, comment)?,
            Transition::Status { status, resolution } => {
                bug.set_status(status, resolution.as_update(), comment)?;
            }
        }
    }
    Ok(())
}

fn any_open(bugs: &mut [BugHandle<'_>]) -> Result<bool> {
    for bug in bugs {
        if bug.is_open()? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use crate::context::ServiceContext;
    use serde_json::{json, Value};

    fn fields() -> Value {
        json!({"Ok": [
            {
                "name": "bug_status",
                "values": [
                    {"name": "NEW", "sort_key": 1, "is_open": true},
                    {"name": "ASSIGNED", "sort_key": 2, "is_open": true},
                    {"name": "RESOLVED", "sort_key": 3, "is_open": false},
                    {"name": "VERIFIED", "sort_key": 4, "is_open": false}
                ]
            },
            {
                "name": "resolution",
                "values": [
                    {"name": "", "sort_key": 0},
                    {"name": "FIXED", "sort_key": 1},
                    {"name": "WONTFIX", "sort_key": 2}
                ]
            }
        ]})
    }

    fn bug(id: u32, is_open: bool) -> Value {
        let status = if is_open { "NEW" } else { "RESOLVED" };
        json!({"Ok": {"id": id, "status": status, "is_open": is_open}})
    }

    fn context(tracker: &[(&str, Value)], ui: &[(&str, Value)]) -> ServiceContext {
        let mut recorder = CassetteRecorder::new("unused.yaml", "transition-test", "test");
        for (method, output) in tracker.iter().cloned() {
            recorder.record("tracker", method, Value::Null, output);
        }
        for (method, output) in ui.iter().cloned() {
            recorder.record("ui", method, Value::Null, output);
        }
        ServiceContext::from_cassette(&recorder.into_cassette())
    }

    fn request(status: Option<&str>, resolution: Option<&str>) -> StatusRequest {
        StatusRequest {
            status: status.map(str::to_string),
            resolution: resolution.map(str::to_string),
            dupe_of: None,
        }
    }

    fn plan_for(ctx: &ServiceContext, ids: &[u32], req: &StatusRequest) -> Result<Transition> {
        let tracker = Tracker::new(ctx.tracker.as_ref());
        let mut bugs: Vec<_> = ids.iter().map(|&id| tracker.bug(BugId(id))).collect();
        plan(req, &tracker, ctx.ui.as_ref(), &mut bugs)
    }

    fn moved(status: &str, resolution: Resolution) -> Transition {
        Transition::Status {
            status: status.into(),
            resolution,
        }
    }

    #[test]
    fn duplicate_consults_nothing() {
        // An empty cassette panics on any tracker or ui call.
        let ctx = context(&[], &[]);
        let req = StatusRequest {
            status: Some("bogus".into()),
            resolution: Some("bogus".into()),
            dupe_of: Some(BugId(5)),
        };

        let plan = plan_for(&ctx, &[1], &req).unwrap();
        assert_eq!(plan, Transition::Duplicate(BugId(5)));
    }

    #[test]
    fn explicit_status_is_upper_cased() {
        let ctx = context(&[("fields", fields())], &[]);

        let plan = plan_for(&ctx, &[1], &request(Some("assigned"), None));
        assert_eq!(plan.unwrap(), moved("ASSIGNED", Resolution::Cleared));
    }

    #[test]
    fn open_status_clears_supplied_resolution() {
        let ctx = context(&[("fields", fields())], &[]);

        let plan = plan_for(&ctx, &[1], &request(Some("NEW"), Some("FIXED")));
        assert_eq!(plan.unwrap(), moved("NEW", Resolution::Cleared));
    }

    #[test]
    fn unknown_status_fails_and_names_it() {
        let ctx = context(&[("fields", fields())], &[]);

        let err = plan_for(&ctx, &[1], &request(Some("badstatus"), None)).unwrap_err();
        assert_eq!(err.to_string(), "invalid status: BADSTATUS");
    }

    #[test]
    fn closing_an_open_bug_prompts_for_resolution() {
        let ctx = context(
            &[
                ("fields", fields()),
                ("get_bug", bug(1, false)),
                ("get_bug", bug(2, true)),
            ],
            &[("choose", json!({"Ok": "WONTFIX"}))],
        );

        let plan = plan_for(&ctx, &[1, 2], &request(Some("resolved"), None));
        let wontfix = Resolution::Set("WONTFIX".into());
        assert_eq!(plan.unwrap(), moved("RESOLVED", wontfix));
    }

    #[test]
    fn closed_bugs_keep_their_resolution() {
        let ctx = context(&[("fields", fields()), ("get_bug", bug(1, false))], &[]);

        let plan = plan_for(&ctx, &[1], &request(Some("VERIFIED"), None));
        assert_eq!(plan.unwrap(), moved("VERIFIED", Resolution::Unchanged));
    }

    #[test]
    fn explicit_resolution_skips_bug_reads() {
        let ctx = context(&[("fields", fields())], &[]);

        let plan = plan_for(&ctx, &[1], &request(Some("RESOLVED"), Some("fixed")));
        let fixed = Resolution::Set("FIXED".into());
        assert_eq!(plan.unwrap(), moved("RESOLVED", fixed));
    }

    #[test]
    fn unknown_resolution_fails() {
        let ctx = context(&[("fields", fields())], &[]);

        let req = request(Some("RESOLVED"), Some("sorta"));
        let err = plan_for(&ctx, &[1], &req).unwrap_err();
        assert_eq!(err.to_string(), "invalid resolution: SORTA");
    }

    #[test]
    fn missing_status_is_chosen_interactively() {
        let ctx = context(
            &[("fields", fields())],
            &[("choose", json!({"Ok": "ASSIGNED"}))],
        );

        let plan = plan_for(&ctx, &[1], &request(None, None));
        assert_eq!(plan.unwrap(), moved("ASSIGNED", Resolution::Cleared));
    }

    #[test]
    fn resolution_update_values() {
        assert_eq!(Resolution::Unchanged.as_update(), None);
        assert_eq!(Resolution::Cleared.as_update(), Some(""));
        let fixed = Resolution::Set("FIXED".into());
        assert_eq!(fixed.as_update(), Some("FIXED"));
    }
}
