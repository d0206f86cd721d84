//! `bugz new`: file a bug interactively.

use std::collections::BTreeMap;

use clap::ArgMatches;
use serde_json::Value;

use super::args::ArgFragment;
use super::{Command, CommandDef, Session};
use crate::error::{Error, Result};
use crate::tracker::FieldDescriptor;

/// Prompt for the description.
const DESCRIPTION_PROMPT: &str = "Enter a description of the problem.";

/// Fields the tracker accepts when creating a bug, beyond the mandatory ones.
const CREATE_FIELDS: &[&str] = &[
    "component",
    "summary",
    "version",
    "op_sys",
    "platform",
    "priority",
    "severity",
    "alias",
    "assigned_to",
    "cc",
    "qa_contact",
    "status",
    "target_milestone",
];

/// File a new bug.
///
/// Prompts for the product, every mandatory field and a description, then
/// offers the other fields that can be set at creation.
#[derive(Debug)]
pub struct New;

impl CommandDef for New {
    const NAME: &'static str = "new";
    const ABOUT: &'static str = "File a new bug";

    fn fragments() -> Vec<ArgFragment> {
        Vec::new()
    }

    fn from_matches(_matches: &ArgMatches) -> Result<Self> {
        Ok(Self)
    }
}

fn cancelled(what: &str) -> impl FnOnce(crate::error::PortError) -> Error + '_ {
    move |e| Error::Cancelled(format!("{what}: {e}"))
}

/// Ask for one field: a choice when it has permitted values, else text.
fn prompt_field(
    session: &Session<'_>,
    field: &FieldDescriptor,
    data: &BTreeMap<String, Value>,
) -> Result<Value> {
    let label = if field.display_name.is_empty() {
        &field.name
    } else {
        &field.display_name
    };
    let ui = session.ui();
    let answer = if field.values.is_some() {
        let names: Vec<String> = session
            .tracker
            .field_values(&field.name, Some(data))?
            .into_iter()
            .map(|v| v.name)
            .collect();
        ui.choose(&format!("Choose the {label}"), &names)
            .map_err(cancelled(label))?
    } else {
        ui.text(&format!("Enter the {label}"))
            .map_err(cancelled(label))?
    };
    Ok(Value::String(answer))
}

impl Command for New {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let fields = session.tracker.fields()?.to_vec();
        let mut data = BTreeMap::new();

        let products: Vec<String> = session
            .tracker
            .products()?
            .into_iter()
            .map(|p| p.name)
            .collect();
        let product = session
            .ui()
            .choose("Choose a product", &products)
            .map_err(cancelled("product"))?;
        data.insert("product".to_string(), Value::String(product));

        for field in fields.iter().filter(|f| f.is_mandatory) {
            if !data.contains_key(&field.name) {
                let value = prompt_field(session, field, &data)?;
                data.insert(field.name.clone(), value);
            }
        }

        if !data.contains_key("comment") {
            let description = session
                .ctx
                .editor
                .input(DESCRIPTION_PROMPT)
                .map_err(|e| Error::remote("editor", &e))?;
            data.insert("comment".to_string(), Value::String(description));
        }

        let optional: Vec<String> = fields
            .iter()
            .filter(|f| {
                CREATE_FIELDS.contains(&f.name.as_str()) && !data.contains_key(&f.name)
            })
            .map(|f| f.display_name.clone())
            .collect();
        let chosen = if optional.is_empty() {
            Vec::new()
        } else {
            session
                .ui()
                .choose_many("Set values for other fields?", &optional, &[])
                .map_err(cancelled("optional fields"))?
        };

        for field in fields.iter().filter(|f| chosen.contains(&f.display_name)) {
            if !data.contains_key(&field.name) {
                let value = prompt_field(session, field, &data)?;
                data.insert(field.name.clone(), value);
            }
        }

        let id = session.tracker.create_bug(&data)?;
        session.ui().show(&format!("Created Bug {id}"));
        Ok(())
    }
}
