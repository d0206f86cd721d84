//! `bugz products`: what bugs can be filed against.

use clap::ArgMatches;

use super::args::ArgFragment;
use super::{Command, CommandDef, Session};
use crate::error::Result;

/// List the products of the tracker.
#[derive(Debug)]
pub struct Products;

impl CommandDef for Products {
    const NAME: &'static str = "products";
    const ABOUT: &'static str = "List the products of the tracker";

    fn fragments() -> Vec<ArgFragment> {
        Vec::new()
    }

    fn from_matches(_matches: &ArgMatches) -> Result<Self> {
        Ok(Self)
    }
}

impl Command for Products {
    fn run(&self, session: &Session<'_>) -> Result<()> {
        let products = session.tracker.products()?;
        let width = products.iter().map(|p| p.name.len() + 1).max().unwrap_or(0);
        let ui = session.ui();
        for product in &products {
            let label = format!("{}:", product.name);
            ui.show(&format!("{label:width$} {}", product.description));
        }

        Ok(())
    }
}
