//! Replaying adapter for the `BugTracker` port.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::calls::{
    AddCommentInput, BugInput, CreateBugInput, MatchUsersInput, NoInput, UpdateBugInput,
};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::BugTracker;
use crate::tracker::record::{
    BugId, BugRecord, BugUpdate, Comment, FieldDescriptor, Product, User,
};

const PORT: &str = "tracker";

/// Serves recorded tracker results from a cassette.
pub struct ReplayingBugTracker {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingBugTracker {
    /// Create a replaying tracker backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// Create a replaying tracker with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn call<I: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        input: &I,
    ) -> Result<T, PortError> {
        replay_result(next_output(self.replayer.as_ref(), PORT, method, input))
    }
}

impl BugTracker for ReplayingBugTracker {
    fn get_bug(&self, id: BugId) -> Result<BugRecord, PortError> {
        self.call("get_bug", &BugInput { id })
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, PortError> {
        self.call("fields", &NoInput {})
    }

    fn products(&self) -> Result<Vec<Product>, PortError> {
        self.call("products", &NoInput {})
    }

    fn match_users(&self, query: &str) -> Result<Vec<User>, PortError> {
        self.call("match_users", &MatchUsersInput { query })
    }

    fn update_bug(&self, id: BugId, update: &BugUpdate) -> Result<(), PortError> {
        self.call("update_bug", &UpdateBugInput { id, update })
    }

    fn add_comment(&self, id: BugId, text: &str) -> Result<(), PortError> {
        self.call("add_comment", &AddCommentInput { id, text })
    }

    fn comments(&self, id: BugId) -> Result<Vec<Comment>, PortError> {
        self.call("comments", &BugInput { id })
    }

    fn create_bug(&self, data: &BTreeMap<String, serde_json::Value>) -> Result<BugId, PortError> {
        self.call("create_bug", &CreateBugInput { data })
    }
}
