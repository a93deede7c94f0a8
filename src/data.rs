//! Data loading functionality for busplan.
//!
//! This module handles loading recipe data from the CSV table located in
//! the `data/` directory. Each row is one recipe with up to three ingredients.

use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Ingredient, Recipe, RecipeRow};

/// Default location of the recipe table, relative to the project root.
pub const DEFAULT_RECIPES: &str = "data/recipes.csv";

/// Turns one (child, amount) column pair into an ingredient.
///
/// Both cells empty means the slot is unused.
fn parse_ingredient(
    parent: &str,
    child: Option<String>,
    amount: Option<f64>,
) -> Result<Option<Ingredient>> {
    match (child, amount) {
        (None, None) => Ok(None),
        (Some(item), Some(amount)) if !item.is_empty() => {
            if amount <= 0.0 {
                return Err(Error::Data(format!(
                    "{} requires a non-positive amount of {}",
                    parent, item
                )));
            }
            Ok(Some(Ingredient { item, amount }))
        }
        (Some(item), None) => Err(Error::Data(format!(
            "{} lists ingredient {} without an amount",
            parent, item
        ))),
        _ => Err(Error::Data(format!(
            "{} has an amount without an ingredient",
            parent
        ))),
    }
}

/// Parses recipes from any CSV source.
///
/// # CSV Format
///
/// Expected columns: `Parent, Time, Output, Child 1, Amount 1, Child 2, Amount 2, Child 3, Amount 3`
///
/// # Errors
///
/// Fails on malformed rows, on an ingredient without an amount, and when the
/// same product appears in more than one row.
pub fn parse_recipes<R: Read>(reader: R) -> Result<Vec<Recipe>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut recipes = Vec::new();
    for result in rdr.deserialize() {
        let row: RecipeRow = result?;
        if !seen.insert(row.parent.clone()) {
            return Err(Error::Data(format!("duplicate recipe for {}", row.parent)));
        }
        if row.time <= 0.0 || row.output <= 0.0 {
            return Err(Error::Data(format!(
                "{} needs a positive time and output",
                row.parent
            )));
        }

        let mut ingredients = Vec::new();
        for (child, amount) in [
            (row.child_1, row.amount_1),
            (row.child_2, row.amount_2),
            (row.child_3, row.amount_3),
        ] {
            if let Some(ingredient) = parse_ingredient(&row.parent, child, amount)? {
                ingredients.push(ingredient);
            }
        }

        recipes.push(Recipe {
            product: row.parent,
            time: row.time,
            output: row.output,
            ingredients,
        });
    }
    Ok(recipes)
}

/// Loads recipes from a CSV file.
///
/// # Arguments
///
/// * `path` - Path to the recipe CSV file
///
/// # Returns
///
/// A vector of [`Recipe`], or an error if the file cannot be read or parsed.
pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>> {
    let file = File::open(path)?;
    parse_recipes(file)
}
