use std::path::Path;

use mealfit_core::{Error, NutritionRecord, Result};

/// Read the catalog JSON (an array of rows produced by the spreadsheet
/// ingestion) and apply the load-time invariant: a trimmed non-empty name
/// and at least one finite nutrient. Rows violating it are dropped; an
/// all-empty result fails the load.
pub fn load_catalog(path: &Path) -> Result<Vec<NutritionRecord>> {
    let raw = std::fs::read_to_string(path)?;
    let rows: Vec<NutritionRecord> =
        serde_json::from_str(&raw).map_err(|e| Error::Serialization(e.to_string()))?;

    let cleaned: Vec<NutritionRecord> = rows.into_iter().filter_map(clean_row).collect();
    if cleaned.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok(cleaned)
}

/// Normalize one raw row: trim the name, map non-finite numbers to `None`,
/// and reject rows with no name or no usable nutrient.
fn clean_row(mut row: NutritionRecord) -> Option<NutritionRecord> {
    row.name = row.name.trim().to_string();
    if row.name.is_empty() {
        return None;
    }
    for field in [
        &mut row.kcal,
        &mut row.protein,
        &mut row.fat,
        &mut row.carbs,
        &mut row.sugar,
        &mut row.fiber,
        &mut row.sodium,
        &mut row.sat_fat,
    ] {
        if matches!(*field, Some(v) if !v.is_finite()) {
            *field = None;
        }
    }
    if !row.has_nutrient() {
        return None;
    }
    Some(row)
}
