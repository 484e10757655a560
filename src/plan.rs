use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single ingredient line within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f32,
    pub unit: String,
    /// Aisle category used by shopping-list grouping (e.g. "produce", "dairy").
    pub aisle: String,
}

/// Whole-recipe nutrition totals. Per-serving values are derived by dividing
/// by the serving count (minimum 1), never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f32,
    pub protein_g: f32,
    pub carbs_g: f32,
    pub fat_g: f32,
}

/// Cultural annotation for recipes tied to a tradition or occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalInfo {
    pub is_traditional: bool,
    pub occasion: Option<String>,
    pub significance: Option<String>,
}

/// Recipe data needed by the optimizer.
///
/// Recipes are immutable once scored: replacing a slot's recipe always swaps
/// in a new `Recipe` value, never mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub prep_time_min: u32,
    pub cook_time_min: u32,
    pub servings: u32,
    pub nutrition: Option<Nutrition>,
    pub tags: Vec<String>,
    pub cultural: Option<CulturalInfo>,
}

impl Recipe {
    /// Serving count clamped to at least 1 for per-serving math.
    pub fn servings_for_analysis(&self) -> f32 {
        self.servings.max(1) as f32
    }

    /// Per-serving nutrition, if nutrition data is present.
    pub fn nutrition_per_serving(&self) -> Option<Nutrition> {
        let total = self.nutrition.as_ref()?;
        let servings = self.servings_for_analysis();
        Some(Nutrition {
            calories: total.calories / servings,
            protein_g: total.protein_g / servings,
            carbs_g: total.carbs_g / servings,
            fat_g: total.fat_g / servings,
        })
    }
}

/// Read-only pantry snapshot entry, valid for one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub amount: f32,
    pub unit: String,
    pub location: String,
}

/// Meal position within a day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SlotKind {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl SlotKind {
    pub fn as_str(&self) -> &str {
        match self {
            SlotKind::Breakfast => "breakfast",
            SlotKind::Lunch => "lunch",
            SlotKind::Snack => "snack",
            SlotKind::Dinner => "dinner",
        }
    }

    /// Slots that may have their recipe swapped by the optimizer.
    /// Breakfast and snack are scored when occupied but never replaced.
    pub fn replaceable(&self) -> bool {
        matches!(self, SlotKind::Lunch | SlotKind::Dinner)
    }
}

/// A meal slot: a position in a day, optionally holding a recipe, and after
/// optimization an overall score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    pub kind: SlotKind,
    pub scheduled_at: NaiveTime,
    pub recipe: Option<Recipe>,
    pub recipe_id: Option<String>,
    pub score: Option<f32>,
}

impl MealSlot {
    pub fn empty(kind: SlotKind, scheduled_at: NaiveTime) -> Self {
        MealSlot {
            kind,
            scheduled_at,
            recipe: None,
            recipe_id: None,
            score: None,
        }
    }

    pub fn with_recipe(kind: SlotKind, scheduled_at: NaiveTime, recipe: Recipe) -> Self {
        let recipe_id = Some(recipe.id.clone());
        MealSlot {
            kind,
            scheduled_at,
            recipe: Some(recipe),
            recipe_id,
            score: None,
        }
    }

    /// Swap in a replacement recipe, keeping the slot's position and time.
    pub fn replace_recipe(&mut self, recipe: Recipe) {
        self.recipe_id = Some(recipe.id.clone());
        self.recipe = Some(recipe);
    }
}

/// Cultural annotation for a day (holidays, family occasions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOccasion {
    pub is_special_day: bool,
    pub occasion: Option<String>,
    pub notes: Option<String>,
}

/// One calendar day of the plan: a date plus a slot-kind keyed meal map.
///
/// The meal map's keys are stable across optimization: slots are never added
/// or removed, only their `recipe` / `score` fields change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub occasion: Option<DayOccasion>,
    pub meals: BTreeMap<SlotKind, MealSlot>,
}

impl DayPlan {
    pub fn new(date: NaiveDate) -> Self {
        DayPlan {
            date,
            occasion: None,
            meals: BTreeMap::new(),
        }
    }

    /// Weekday derived from the date, never stored separately.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn slot(&self, kind: SlotKind) -> Option<&MealSlot> {
        self.meals.get(&kind)
    }
}

/// A user's plan for one week (or longer: `days` is simply calendar-ordered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub user_id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayPlan>,
}

impl WeeklyPlan {
    /// Serialize to JSON for storage; the caller owns durability.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
