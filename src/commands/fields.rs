//! `bugz fields`: permitted values of every select field.

use std::collections::BTreeMap;

use clap::ArgMatches;

use super::args::ArgFragment;
use super::{Command, CommandDef, Session};
use crate::error::Result;
use crate::tracker::{FieldDescriptor, FieldValue};

/// List valid values for bug fields.
#[derive(Debug)]
pub struct Fields;

impl CommandDef for Fields {
    const NAME: &'static str = "fields";
    const ABOUT: &'static str = "List valid values for bug fields";

    fn fragments() -> Vec<ArgFragment> {
        Vec::new()
    }

    fn from_matches(_matches: &ArgMatches) -> Result<Self> {
        Ok(Self)
    }
}

/// Lines describing one field: values grouped by visibility, ungrouped first.
///
/// Every value is listed, including the tracker's nameless placeholder.
fn describe(field: &FieldDescriptor, values: &[FieldValue]) -> Vec<String> {
    let mut groups: BTreeMap<String, Vec<&FieldValue>> = BTreeMap::new();
    for value in values {
        groups
            .entry(value.visibility_values.join(","))
            .or_default()
            .push(value);
    }

    let mut lines = vec![format!("{}:", field.name)];
    for (group, mut members) in groups {
        members.sort_by_key(|v| v.sort_key);
        let names: Vec<&str> = members.iter().map(|v| v.name.as_str()).collect();
        if group.is_empty() {
            lines.push(format!("  {}", names.join(",")));
        } else {
            lines.push(format!("  {group}: {}", names.join(",")));
        }
    }
    lines
}

impl Command for Fields {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        for field in session.tracker.fields()? {
            if let Some(values) = &field.values {
                for line in describe(field, values) {
                    session.ui().show(&line);
                }
            }
        }
        Ok(())
    }
}
