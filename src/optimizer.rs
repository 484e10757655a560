use crate::context::OptimizationContext;
use crate::error::OptimizerError;
use crate::mode::Mode;
use crate::plan::{DayPlan, SlotKind, WeeklyPlan};
use crate::providers::{
    AlternativeSource, BudgetPlanner, PricingProvider, SeasonalityProvider,
};
use crate::scoring::ScoringEngine;
use crate::traditions;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Incumbent recipes scoring at or above this keep their slot; only
/// below-threshold slots consult the alternative source.
pub const REPLACEMENT_THRESHOLD: f32 = 0.7;

/// Slot processing order within a day. Breakfast and snack are scored only;
/// lunch and dinner additionally go through the replacement decision.
const SLOT_ORDER: [SlotKind; 4] = [
    SlotKind::Breakfast,
    SlotKind::Snack,
    SlotKind::Lunch,
    SlotKind::Dinner,
];

/// Budget substitution side artifact, carried in the outcome for the caller.
/// Not part of the returned plan shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    pub change_count: u32,
    pub savings: f32,
}

/// Result of one optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub plan: WeeklyPlan,
    /// Present only when the economy pre-pass ran.
    pub budget: Option<BudgetSummary>,
}

/// Greedy, per-slot, threshold-triggered improvement pass over an existing
/// plan.
///
/// The traversal is single-threaded and sequential by design: variety scoring
/// reads a snapshot of already-decided neighboring slots inside a ±3-day
/// window, so day and slot order must be deterministic for scores to be
/// reproducible. The only suspension points are the provider calls.
pub struct PlanOptimizer<'a> {
    seasonality: &'a dyn SeasonalityProvider,
    pricing: &'a dyn PricingProvider,
    budget_planner: &'a dyn BudgetPlanner,
    alternatives: &'a dyn AlternativeSource,
}

impl<'a> PlanOptimizer<'a> {
    pub fn new(
        seasonality: &'a dyn SeasonalityProvider,
        pricing: &'a dyn PricingProvider,
        budget_planner: &'a dyn BudgetPlanner,
        alternatives: &'a dyn AlternativeSource,
    ) -> Self {
        PlanOptimizer {
            seasonality,
            pricing,
            budget_planner,
            alternatives,
        }
    }

    /// Optimize a weekly plan against the context's mode and objectives.
    ///
    /// The input plan is never mutated; the returned plan is structurally
    /// identical, with evaluated slots annotated with their score and
    /// possibly a replacement recipe. Protected tradition days come back
    /// exactly as they went in, in every mode.
    ///
    /// The only fatal error is a malformed weight table, rejected before any
    /// scoring. Collaborator failures degrade per call and never abort the
    /// run.
    pub async fn optimize_weekly_plan(
        &self,
        plan: &WeeklyPlan,
        ctx: &OptimizationContext,
    ) -> Result<OptimizationOutcome, OptimizerError> {
        ctx.mode.weights().validate(ctx.mode)?;

        let mut working = plan.clone();
        let mut budget = None;

        if ctx.mode == Mode::Economy {
            budget = self.run_budget_pre_pass(&mut working).await;
        }

        let seasonal_catalog = self.fetch_seasonal_catalog(ctx).await;
        let engine = ScoringEngine::new(self.pricing, &seasonal_catalog);

        for day_index in 0..working.days.len() {
            let date = working.days[day_index].date;
            if let Some(tradition) = traditions::protection(date) {
                debug!(%date, ?tradition, "protected day, skipping");
                continue;
            }

            for kind in SLOT_ORDER {
                self.process_slot(&engine, &mut working, ctx, day_index, kind)
                    .await;
            }
        }

        Ok(OptimizationOutcome {
            plan: working,
            budget,
        })
    }

    /// Economy pre-pass: hand the whole plan to the budget planner once, then
    /// restore protected days so the rewrite can never touch them. A planner
    /// failure degrades to keeping the plan as-is.
    async fn run_budget_pre_pass(&self, working: &mut WeeklyPlan) -> Option<BudgetSummary> {
        let snapshot: Vec<DayPlan> = working
            .days
            .iter()
            .filter(|day| traditions::protection(day.date).is_some())
            .cloned()
            .collect();

        match self.budget_planner.optimize_plan_for_budget(working).await {
            Ok(outcome) => {
                *working = outcome.plan;
                for protected in snapshot {
                    if let Some(day) = working
                        .days
                        .iter_mut()
                        .find(|day| day.date == protected.date)
                    {
                        for kind in [SlotKind::Lunch, SlotKind::Dinner] {
                            if let Some(original) = protected.meals.get(&kind) {
                                day.meals.insert(kind, original.clone());
                            }
                        }
                    }
                }
                debug!(
                    change_count = outcome.change_count,
                    savings = outcome.savings,
                    "budget substitution applied"
                );
                Some(BudgetSummary {
                    change_count: outcome.change_count,
                    savings: outcome.savings,
                })
            }
            Err(err) => {
                warn!(error = %err, "budget substitution failed, keeping plan unchanged");
                None
            }
        }
    }

    /// Seasonal catalog snapshot for this run. A provider failure degrades to
    /// an empty catalog, which scores neutral.
    async fn fetch_seasonal_catalog(&self, ctx: &OptimizationContext) -> HashSet<String> {
        match self
            .seasonality
            .seasonal_ingredients(&ctx.region, ctx.season)
            .await
        {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "seasonal catalog lookup failed, scoring neutral");
                HashSet::new()
            }
        }
    }

    /// Score one slot and, for lunch/dinner below the threshold, try to
    /// improve it. A slot without a recipe passes through untouched.
    async fn process_slot(
        &self,
        engine: &ScoringEngine<'_>,
        working: &mut WeeklyPlan,
        ctx: &OptimizationContext,
        day_index: usize,
        kind: SlotKind,
    ) {
        let Some(incumbent) = working.days[day_index]
            .meals
            .get(&kind)
            .and_then(|slot| slot.recipe.clone())
        else {
            return;
        };

        let incumbent_score = engine
            .score(&incumbent, ctx, working, day_index, kind)
            .await;

        if !kind.replaceable() || incumbent_score.total >= REPLACEMENT_THRESHOLD {
            annotate(working, day_index, kind, incumbent_score.total);
            return;
        }

        debug!(
            day_index,
            slot = kind.as_str(),
            score = incumbent_score.total,
            "below threshold, querying alternative source"
        );

        let candidate = match self
            .alternatives
            .suggest(&incumbent, ctx, working, day_index, kind)
            .await
        {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(error = %err, "alternative lookup failed, keeping incumbent");
                None
            }
        };

        let Some(candidate) = candidate else {
            annotate(working, day_index, kind, incumbent_score.total);
            return;
        };

        let candidate_score = engine
            .score(&candidate, ctx, working, day_index, kind)
            .await;

        // Adopt only on strict improvement; an alternative that scores the
        // same or worse would be a regression.
        if candidate_score.total > incumbent_score.total {
            debug!(
                day_index,
                slot = kind.as_str(),
                old_score = incumbent_score.total,
                new_score = candidate_score.total,
                replacement = %candidate.name,
                "adopting alternative recipe"
            );
            if let Some(slot) = working.days[day_index].meals.get_mut(&kind) {
                slot.replace_recipe(candidate);
                slot.score = Some(candidate_score.total);
            }
        } else {
            annotate(working, day_index, kind, incumbent_score.total);
        }
    }
}

fn annotate(working: &mut WeeklyPlan, day_index: usize, kind: SlotKind, total: f32) {
    if let Some(slot) = working.days[day_index].meals.get_mut(&kind) {
        slot.score = Some(total);
    }
}
