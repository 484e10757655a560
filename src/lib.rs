//! Weekly meal plan optimizer.
//!
//! Takes an already-materialized [`WeeklyPlan`] plus an
//! [`OptimizationContext`] and runs a greedy, per-slot, threshold-triggered
//! improvement pass over it: six objective sub-scores (cost, nutrition,
//! pantry usage, seasonality, variety, cultural) folded by a mode-dependent
//! weight vector, with tradition-protected calendar days excluded from
//! rewriting. External collaborators (seasonal catalog, ingredient pricing,
//! budget substitution, alternative recipes) plug in through the traits in
//! [`providers`].
//!
//! The optimizer never persists anything and never mutates its input; the
//! caller owns durability.

pub mod context;
pub mod error;
pub mod mode;
pub mod optimizer;
pub mod plan;
pub mod providers;
pub mod scoring;
pub mod traditions;

pub use context::{NutrientTargets, OptimizationContext, Season, UserPreferences};
pub use error::OptimizerError;
pub use mode::{Mode, ModeWeights};
pub use optimizer::{
    BudgetSummary, OptimizationOutcome, PlanOptimizer, REPLACEMENT_THRESHOLD,
};
pub use plan::{
    CulturalInfo, DayOccasion, DayPlan, Ingredient, MealSlot, Nutrition, PantryItem, Recipe,
    SlotKind, WeeklyPlan,
};
pub use providers::{
    AlternativeSource, BudgetOutcome, BudgetPlanner, NoAlternatives, PricingProvider,
    SeasonalityProvider, StaticPricing, StaticSeasonality,
};
pub use scoring::{OptimizationScore, ScoringEngine, NEUTRAL_SCORE};
pub use traditions::Tradition;
