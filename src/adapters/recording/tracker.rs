//! Recording adapter for the `BugTracker` port.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::adapters::calls::{
    AddCommentInput, BugInput, CreateBugInput, MatchUsersInput, NoInput, UpdateBugInput,
};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::BugTracker;
use crate::tracker::record::{
    BugId, BugRecord, BugUpdate, Comment, FieldDescriptor, Product, User,
};

const PORT: &str = "tracker";

/// Records tracker interactions while delegating to an inner implementation.
pub struct RecordingBugTracker {
    inner: Box<dyn BugTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBugTracker {
    /// Creates a new recording tracker wrapping the given implementation.
    pub fn new(inner: Box<dyn BugTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<I, T>(&self, method: &str, input: &I, result: &Result<T, PortError>)
    where
        I: Serialize,
        T: Serialize,
    {
        record_result(&self.recorder, PORT, method, input, result);
    }
}

impl BugTracker for RecordingBugTracker {
    fn get_bug(&self, id: BugId) -> Result<BugRecord, PortError> {
        let result = self.inner.get_bug(id);
        self.record("get_bug", &BugInput { id }, &result);
        result
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, PortError> {
        let result = self.inner.fields();
        self.record("fields", &NoInput {}, &result);
        result
    }

    fn products(&self) -> Result<Vec<Product>, PortError> {
        let result = self.inner.products();
        self.record("products", &NoInput {}, &result);
        result
    }

    fn match_users(&self, query: &str) -> Result<Vec<User>, PortError> {
        let result = self.inner.match_users(query);
        self.record("match_users", &MatchUsersInput { query }, &result);
        result
    }

    fn update_bug(&self, id: BugId, update: &BugUpdate) -> Result<(), PortError> {
        let result = self.inner.update_bug(id, update);
        self.record("update_bug", &UpdateBugInput { id, update }, &result);
        result
    }

    fn add_comment(&self, id: BugId, text: &str) -> Result<(), PortError> {
        let result = self.inner.add_comment(id, text);
        self.record("add_comment", &AddCommentInput { id, text }, &result);
        result
    }

    fn comments(&self, id: BugId) -> Result<Vec<Comment>, PortError> {
        let result = self.inner.comments(id);
        self.record("comments", &BugInput { id }, &result);
        result
    }

    fn create_bug(&self, data: &BTreeMap<String, serde_json::Value>) -> Result<BugId, PortError> {
        let result = self.inner.create_bug(data);
        self.record("create_bug", &CreateBugInput { data }, &result);
        result
    }
}
