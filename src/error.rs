//! Error type shared across the crate.

use thiserror::Error;

use crate::models::Item;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid recipe data: {0}")]
    Data(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unknown item: {0}")]
    UnknownItem(Item),
    #[error("Recipe graph contains a cycle through {0}")]
    CyclicRecipes(Item),
    #[error("Malformed bus: {0} is listed more than once")]
    MalformedBus(Item),
    #[error("Goal can not be supplied by the starting bus, unreachable items: {}", .missing.join(", "))]
    GoalUnreachable { missing: Vec<Item> },
    #[error("Path can not be trimmed: {0}")]
    TrimPrecondition(String),
    #[error("No predecessor path reaches {0} from the bus")]
    Unscorable(Item),
    #[error("Path is empty")]
    EmptyPath,
}

pub type Result<T> = std::result::Result<T, Error>;
