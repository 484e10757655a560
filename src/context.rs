use crate::mode::Mode;
use crate::plan::PantryItem;
use serde::{Deserialize, Serialize};

/// Season used for pricing and in-season catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Optional per-serving nutrient targets. Any absent target falls back to the
/// scoring engine's documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTargets {
    pub calories: Option<f32>,
    pub protein_g: Option<f32>,
    pub carbs_g: Option<f32>,
    pub fat_g: Option<f32>,
}

/// User preferences for plan optimization.
///
/// Every field is optional: absence degrades to neutral scoring, it never
/// fails a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub dietary_restrictions: Option<Vec<String>>,
    pub targets: Option<NutrientTargets>,
    pub budget: Option<f32>,
}

/// Everything one optimization run reads besides the plan itself.
/// Read-only for the duration of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationContext {
    pub preferences: UserPreferences,
    pub pantry: Vec<PantryItem>,
    pub mode: Mode,
    pub region: String,
    pub season: Season,
    pub budget_ceiling: Option<f32>,
}

impl OptimizationContext {
    pub fn new(mode: Mode, region: impl Into<String>, season: Season) -> Self {
        OptimizationContext {
            preferences: UserPreferences::default(),
            pantry: Vec::new(),
            mode,
            region: region.into(),
            season,
            budget_ceiling: None,
        }
    }
}
