use crate::plan::SlotKind;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Day of the month reserved for the dumpling tradition.
const DUMPLING_DAY_OF_MONTH: u32 = 29;

/// Traditional hot beverage expected at breakfast and snack time.
const HOT_BEVERAGE_TOKEN: &str = "mate";

/// Dish names that carry cultural weight. A recipe whose name contains one of
/// these earns the cultural bonus.
const TRADITIONAL_DISHES: &[&str] = &[
    "asado",
    "milanesa",
    "empanada",
    "locro",
    "ñoquis",
    "noquis",
    "gnocchi",
    "pastel de papa",
    "guiso",
    "humita",
];

/// Protein keyword groups used by variety scoring. Two recipe names that each
/// contain a token from the same group count as similar meals.
const PROTEIN_GROUPS: &[&[&str]] = &[
    &["beef", "carne", "asado", "bife", "steak"],
    &["chicken", "pollo"],
    &["pork", "cerdo", "bondiola"],
    &["fish", "pescado", "merluza", "salmon"],
    &["vegetable", "verdura", "veggie", "vegetariano"],
];

/// A calendar tradition that protects a day from rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tradition {
    /// Sunday family roast lunch.
    SundayRoast,
    /// Dumplings on the 29th of the month.
    MonthEndDumplings,
}

/// Return the tradition protecting this date, if any.
///
/// Protected days are excluded from recipe rewriting entirely: their lunch
/// and dinner slots must come back from the optimizer exactly as they went
/// in, in every mode. This check runs before any slot is touched and no mode
/// weight overrides it.
pub fn protection(date: NaiveDate) -> Option<Tradition> {
    if date.weekday() == Weekday::Sun {
        return Some(Tradition::SundayRoast);
    }
    if date.day() == DUMPLING_DAY_OF_MONTH {
        return Some(Tradition::MonthEndDumplings);
    }
    None
}

/// Is this recipe the traditional hot beverage for a breakfast/snack slot?
pub fn is_hot_beverage_slot(kind: SlotKind, recipe_name: &str) -> bool {
    matches!(kind, SlotKind::Breakfast | SlotKind::Snack)
        && recipe_name.to_lowercase().contains(HOT_BEVERAGE_TOKEN)
}

/// Does the recipe name mention a traditional dish?
pub fn is_traditional_dish(recipe_name: &str) -> bool {
    let name = recipe_name.to_lowercase();
    TRADITIONAL_DISHES.iter().any(|dish| name.contains(dish))
}

/// Protein group index for a recipe name, if any token matches.
pub fn protein_group(recipe_name: &str) -> Option<usize> {
    let name = recipe_name.to_lowercase();
    PROTEIN_GROUPS
        .iter()
        .position(|group| group.iter().any(|token| name.contains(token)))
}

/// Are two recipe names "similar" for variety purposes?
///
/// Similar means: identical (case-insensitive), one contains the other, or
/// both mention a protein keyword from the same group.
pub fn similar_meals(a: &str, b: &str) -> bool {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    if a_lower == b_lower || a_lower.contains(&b_lower) || b_lower.contains(&a_lower) {
        return true;
    }
    match (protein_group(a), protein_group(b)) {
        (Some(ga), Some(gb)) => ga == gb,
        _ => false,
    }
}
