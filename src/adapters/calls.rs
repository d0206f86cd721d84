//! Call inputs as they appear in cassettes.
//!
//! Recording and replaying adapters serialize the same structs, so a
//! recorded input can be compared with a replayed call.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tracker::record::{BugId, BugUpdate};

#[derive(Serialize)]
pub(crate) struct NoInput {}

#[derive(Serialize)]
pub(crate) struct BugInput {
    pub id: BugId,
}

#[derive(Serialize)]
pub(crate) struct MatchUsersInput<'a> {
    pub query: &'a str,
}

#[derive(Serialize)]
pub(crate) struct UpdateBugInput<'a> {
    pub id: BugId,
    pub update: &'a BugUpdate,
}

#[derive(Serialize)]
pub(crate) struct AddCommentInput<'a> {
    pub id: BugId,
    pub text: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CreateBugInput<'a> {
    pub data: &'a BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize)]
pub(crate) struct PromptInput<'a> {
    pub prompt: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ChooseInput<'a> {
    pub prompt: &'a str,
    pub options: &'a [String],
}

#[derive(Serialize)]
pub(crate) struct ChooseManyInput<'a> {
    pub prompt: &'a str,
    pub options: &'a [String],
    pub default: &'a [String],
}
