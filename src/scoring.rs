use crate::context::OptimizationContext;
use crate::mode::{Mode, ModeWeights};
use crate::plan::{PantryItem, Recipe, SlotKind, WeeklyPlan};
use crate::providers::PricingProvider;
use crate::traditions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Sub-score substituted whenever there is not enough data to compute one
/// meaningfully. Absence of data is not evidence of a bad fit.
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Calendar days scanned on each side of a slot for repetition.
const VARIETY_WINDOW_DAYS: usize = 3;

/// Flat penalty per similar meal found inside the variety window.
const REPETITION_PENALTY: f32 = 0.25;

/// The six per-objective scores for one recipe in one slot, each in [0, 1],
/// plus the mode-weighted total.
///
/// `cost` is stored raw (lower is better); the total folds it in inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScore {
    pub cost: f32,
    pub nutrition: f32,
    pub pantry_usage: f32,
    pub seasonality: f32,
    pub variety: f32,
    pub cultural: f32,
    pub total: f32,
}

impl OptimizationScore {
    /// Fold the six sub-scores into a weighted total. Weights sum to 1; no
    /// renormalization happens when a sub-score was neutral-defaulted.
    pub fn weighted(
        cost: f32,
        nutrition: f32,
        pantry_usage: f32,
        seasonality: f32,
        variety: f32,
        cultural: f32,
        weights: &ModeWeights,
    ) -> Self {
        let total = (1.0 - cost) * weights.cost
            + nutrition * weights.nutrition
            + pantry_usage * weights.pantry
            + seasonality * weights.seasonality
            + variety * weights.variety
            + cultural * weights.cultural;
        OptimizationScore {
            cost,
            nutrition,
            pantry_usage,
            seasonality,
            variety,
            cultural,
            total,
        }
    }
}

/// Scores candidate recipes against the six objectives.
///
/// Holds the pricing provider and a per-run snapshot of the seasonal catalog.
/// The snapshot is fetched once at optimizer entry and treated as read-only
/// reference data, so scoring is pure given its inputs.
pub struct ScoringEngine<'a> {
    pricing: &'a dyn PricingProvider,
    seasonal_catalog: &'a HashSet<String>,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(pricing: &'a dyn PricingProvider, seasonal_catalog: &'a HashSet<String>) -> Self {
        ScoringEngine {
            pricing,
            seasonal_catalog,
        }
    }

    /// Score one recipe for one slot. Never fails: missing optional data and
    /// collaborator errors degrade to [`NEUTRAL_SCORE`] for the affected
    /// sub-score.
    pub async fn score(
        &self,
        recipe: &Recipe,
        ctx: &OptimizationContext,
        plan: &WeeklyPlan,
        day_index: usize,
        kind: SlotKind,
    ) -> OptimizationScore {
        let cost = self.cost_score(recipe, ctx).await;
        let nutrition = nutrition_score(recipe, ctx);
        let pantry_usage = pantry_usage_score(recipe, &ctx.pantry);
        let seasonality = self.seasonality_score(recipe);
        let variety = variety_score(plan, day_index, kind, &recipe.name);
        let cultural = cultural_score(kind, &recipe.name);

        OptimizationScore::weighted(
            cost,
            nutrition,
            pantry_usage,
            seasonality,
            variety,
            cultural,
            &ctx.mode.weights(),
        )
    }

    /// Normalized per-serving cost in [0, 1], lower is better.
    ///
    /// Sums price × quantity over the ingredients, divides by servings, then
    /// by the mode ceiling. A failed price lookup degrades the whole
    /// sub-score to neutral rather than aborting the run.
    async fn cost_score(&self, recipe: &Recipe, ctx: &OptimizationContext) -> f32 {
        if recipe.ingredients.is_empty() {
            return NEUTRAL_SCORE;
        }

        let mut total = 0.0;
        for ingredient in &recipe.ingredients {
            match self
                .pricing
                .ingredient_price(&ingredient.name, ctx.season)
                .await
            {
                Ok(price) => total += price * ingredient.quantity,
                Err(err) => {
                    warn!(
                        ingredient = %ingredient.name,
                        error = %err,
                        "price lookup failed, cost sub-score degraded to neutral"
                    );
                    return NEUTRAL_SCORE;
                }
            }
        }

        let per_serving = total / recipe.servings_for_analysis();
        (per_serving / ctx.mode.cost_ceiling()).clamp(0.0, 1.0)
    }

    /// Fraction of ingredients that are in season.
    ///
    /// An empty catalog means missing reference data and scores neutral; a
    /// non-empty catalog with zero matches is a genuine mismatch and scores 0.
    fn seasonality_score(&self, recipe: &Recipe) -> f32 {
        if self.seasonal_catalog.is_empty() || recipe.ingredients.is_empty() {
            return NEUTRAL_SCORE;
        }

        let matches = recipe
            .ingredients
            .iter()
            .filter(|ingredient| {
                self.seasonal_catalog
                    .iter()
                    .any(|entry| names_match(&ingredient.name, entry))
            })
            .count();

        matches as f32 / recipe.ingredients.len() as f32
    }
}

/// Case-insensitive substring match in either direction.
fn names_match(a: &str, b: &str) -> bool {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    a_lower.contains(&b_lower) || b_lower.contains(&a_lower)
}

/// Nutrition fit in [0, 1] per the operating mode.
///
/// Diet mode blends low calories, high protein, low carbs and low fat at
/// fixed 0.3/0.4/0.2/0.1 weights, against the user's per-serving targets
/// where set (defaults: 600 kcal, 30 g protein, 60 g carbs, 20 g fat). Other
/// modes reward a 400–800 kcal band, protein above a 20 g floor, and macro
/// balance. Missing nutrition data scores neutral.
pub fn nutrition_score(recipe: &Recipe, ctx: &OptimizationContext) -> f32 {
    let Some(per_serving) = recipe.nutrition_per_serving() else {
        return NEUTRAL_SCORE;
    };
    let targets = ctx.preferences.targets.clone().unwrap_or_default();

    if ctx.mode == Mode::Diet {
        let cal_ceiling = targets.calories.unwrap_or(600.0);
        let protein_target = targets.protein_g.unwrap_or(30.0);
        let carb_ceiling = targets.carbs_g.unwrap_or(60.0);
        let fat_ceiling = targets.fat_g.unwrap_or(20.0);

        let cal = under_ceiling(per_serving.calories, cal_ceiling);
        let protein = (per_serving.protein_g / protein_target).clamp(0.0, 1.0);
        let carbs = under_ceiling(per_serving.carbs_g, carb_ceiling);
        let fat = under_ceiling(per_serving.fat_g, fat_ceiling);

        return cal * 0.3 + protein * 0.4 + carbs * 0.2 + fat * 0.1;
    }

    let cal = if (400.0..=800.0).contains(&per_serving.calories) {
        1.0
    } else {
        NEUTRAL_SCORE
    };
    let protein = (per_serving.protein_g / 20.0).clamp(0.0, 1.0);
    let balance = macro_balance(&per_serving);

    (cal + protein + balance) / 3.0
}

/// 1.0 at or under the ceiling, linear decay beyond it.
fn under_ceiling(value: f32, ceiling: f32) -> f32 {
    if value <= ceiling {
        1.0
    } else {
        (ceiling / value).clamp(0.0, 1.0)
    }
}

/// Penalize skewed macro distributions: 1.0 when protein/carb/fat calorie
/// shares are even, falling toward 0 as one macro dominates.
fn macro_balance(per_serving: &crate::plan::Nutrition) -> f32 {
    let protein_cal = per_serving.protein_g * 4.0;
    let carb_cal = per_serving.carbs_g * 4.0;
    let fat_cal = per_serving.fat_g * 9.0;
    let total = protein_cal + carb_cal + fat_cal;
    if total <= 0.0 {
        return NEUTRAL_SCORE;
    }

    let shares = [protein_cal / total, carb_cal / total, fat_cal / total];
    let max = shares.iter().cloned().fold(f32::MIN, f32::max);
    let min = shares.iter().cloned().fold(f32::MAX, f32::min);
    (1.0 - (max - min)).max(0.0)
}

/// Fraction of ingredients already covered by the pantry.
///
/// Matching is a case-insensitive substring test in either direction. An
/// empty pantry scores neutral, not zero: no snapshot is not the same as no
/// match.
pub fn pantry_usage_score(recipe: &Recipe, pantry: &[PantryItem]) -> f32 {
    if pantry.is_empty() || recipe.ingredients.is_empty() {
        return NEUTRAL_SCORE;
    }

    let matches = recipe
        .ingredients
        .iter()
        .filter(|ingredient| {
            pantry
                .iter()
                .any(|item| names_match(&ingredient.name, &item.name))
        })
        .count();

    matches as f32 / recipe.ingredients.len() as f32
}

/// Repetition penalty over a symmetric window of neighboring days.
///
/// Every occupied slot within ±3 calendar days (clipped to plan bounds),
/// excluding the slot under evaluation, that holds a similar meal costs a
/// flat 0.25, floored at 0. Similarity is defined in [`traditions`].
pub fn variety_score(
    plan: &WeeklyPlan,
    day_index: usize,
    kind: SlotKind,
    recipe_name: &str,
) -> f32 {
    let start = day_index.saturating_sub(VARIETY_WINDOW_DAYS);
    let end = (day_index + VARIETY_WINDOW_DAYS).min(plan.days.len().saturating_sub(1));

    let mut repetitions = 0u32;
    for (index, day) in plan.days.iter().enumerate().take(end + 1).skip(start) {
        for slot in day.meals.values() {
            if index == day_index && slot.kind == kind {
                continue;
            }
            if let Some(recipe) = &slot.recipe {
                if traditions::similar_meals(recipe_name, &recipe.name) {
                    repetitions += 1;
                }
            }
        }
    }

    (1.0 - repetitions as f32 * REPETITION_PENALTY).max(0.0)
}

/// Cultural fit: every meal starts at 0.8. The traditional hot beverage in a
/// breakfast or snack slot scores 1.0, and a traditional dish name earns a
/// 0.2 bonus capped at 1.0.
pub fn cultural_score(kind: SlotKind, recipe_name: &str) -> f32 {
    if traditions::is_hot_beverage_slot(kind, recipe_name) {
        return 1.0;
    }
    if traditions::is_traditional_dish(recipe_name) {
        return (0.8_f32 + 0.2).min(1.0);
    }
    0.8
}
