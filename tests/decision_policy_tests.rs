//! Decision-policy behavior: the replacement threshold, strict-improvement
//! adoption of alternatives, idempotent re-runs, and the repetition penalty.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use meal_optimizer::{
    AlternativeSource, BudgetOutcome, BudgetPlanner, DayPlan, Ingredient, MealSlot, Mode,
    NoAlternatives, OptimizationContext, PantryItem, PlanOptimizer, Recipe, Season, SlotKind,
    StaticPricing, StaticSeasonality, WeeklyPlan,
};
use std::sync::atomic::{AtomicUsize, Ordering};

fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: format!("id-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        ingredients: ingredients
            .iter()
            .map(|n| Ingredient {
                name: n.to_string(),
                quantity: 1.0,
                unit: "unidad".to_string(),
                aisle: "misc".to_string(),
            })
            .collect(),
        instructions: vec![],
        prep_time_min: 10,
        cook_time_min: 20,
        servings: 2,
        nutrition: None,
        tags: vec![],
        cultural: None,
    }
}

fn plan_with_lunches(recipes: Vec<Recipe>) -> WeeklyPlan {
    // Monday start so no day in a short plan is protected.
    let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let days: Vec<DayPlan> = recipes
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let mut day = DayPlan::new(start + Duration::days(i as i64));
            day.meals.insert(
                SlotKind::Lunch,
                MealSlot::with_recipe(
                    SlotKind::Lunch,
                    NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                    r,
                ),
            );
            day
        })
        .collect();
    let len = days.len() as i64;
    WeeklyPlan {
        user_id: "user-1".to_string(),
        week_start: start,
        week_end: start + Duration::days(len.max(1) - 1),
        days,
    }
}

struct IdentityBudgetPlanner;

#[async_trait]
impl BudgetPlanner for IdentityBudgetPlanner {
    async fn optimize_plan_for_budget(&self, plan: &WeeklyPlan) -> Result<BudgetOutcome> {
        Ok(BudgetOutcome {
            plan: plan.clone(),
            change_count: 0,
            savings: 0.0,
        })
    }
}

/// Always offers the same fixed candidate, counting how often it is asked.
struct FixedAlternative {
    candidate: Recipe,
    calls: AtomicUsize,
}

impl FixedAlternative {
    fn new(candidate: Recipe) -> Self {
        FixedAlternative {
            candidate,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AlternativeSource for FixedAlternative {
    async fn suggest(
        &self,
        _incumbent: &Recipe,
        _ctx: &OptimizationContext,
        _plan: &WeeklyPlan,
        _day_index: usize,
        _kind: SlotKind,
    ) -> Result<Option<Recipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.candidate.clone()))
    }
}

/// Always errors, counting how often it is asked.
struct FailingAlternative {
    calls: AtomicUsize,
}

impl FailingAlternative {
    fn new() -> Self {
        FailingAlternative {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AlternativeSource for FailingAlternative {
    async fn suggest(
        &self,
        _incumbent: &Recipe,
        _ctx: &OptimizationContext,
        _plan: &WeeklyPlan,
        _day_index: usize,
        _kind: SlotKind,
    ) -> Result<Option<Recipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("recipe service unavailable"))
    }
}

fn pantry(names: &[&str]) -> Vec<PantryItem> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| PantryItem {
            id: format!("p{i}"),
            name: name.to_string(),
            amount: 1.0,
            unit: "kg".to_string(),
            location: "despensa".to_string(),
        })
        .collect()
}

/// An incumbent at or above the threshold keeps its slot and the alternative
/// source is never consulted.
#[tokio::test]
async fn test_above_threshold_incumbent_never_queries_alternatives() {
    // Everything aligned: free ingredients, full pantry match, in season,
    // traditional dish name.
    let incumbent = recipe("Asado con ensalada", &["tomate", "lechuga"]);
    let plan = plan_with_lunches(vec![incumbent.clone()]);

    let seasonality =
        StaticSeasonality::new().with_entries("pampa", Season::Summer, ["tomate", "lechuga"]);
    let pricing = StaticPricing::new(0.0);
    let budget = IdentityBudgetPlanner;
    let alternatives = FixedAlternative::new(recipe("Tarta de acelga", &["acelga"]));
    let optimizer = PlanOptimizer::new(&seasonality, &pricing, &budget, &alternatives);

    let mut ctx = OptimizationContext::new(Mode::Normal, "pampa", Season::Summer);
    ctx.pantry = pantry(&["tomate", "lechuga"]);

    let outcome = optimizer.optimize_weekly_plan(&plan, &ctx).await.unwrap();

    let lunch = outcome.plan.days[0].meals.get(&SlotKind::Lunch).unwrap();
    assert_eq!(lunch.recipe.as_ref().unwrap().name, "Asado con ensalada");
    let score = lunch.score.unwrap();
    assert!(score >= 0.7, "expected a keeper, scored {score}");
    assert_eq!(alternatives.calls.load(Ordering::SeqCst), 0);
}

/// A below-threshold incumbent is swapped for an alternative that scores
/// strictly higher.
#[tokio::test]
async fn test_below_threshold_adopts_strictly_better_alternative() {
    // Expensive, out of season, nothing in the pantry, unremarkable name.
    let incumbent = recipe("Caesar salad", &["faisan importado"]);
    let plan = plan_with_lunches(vec![incumbent]);

    let seasonality =
        StaticSeasonality::new().with_entries("pampa", Season::Summer, ["tomate", "zapallo"]);
    let pricing = StaticPricing::new(0.0)
        .with_price("faisan importado", 2000.0)
        .with_price("tomate", 10.0)
        .with_price("zapallo", 10.0);
    let budget = IdentityBudgetPlanner;
    let better = recipe("Empanadas de zapallo", &["tomate", "zapallo"]);
    let alternatives = FixedAlternative::new(better);
    let optimizer = PlanOptimizer::new(&seasonality, &pricing, &budget, &alternatives);

    let mut ctx = OptimizationContext::new(Mode::Normal, "pampa", Season::Summer);
    ctx.pantry = pantry(&["tomate", "zapallo"]);

    let outcome = optimizer.optimize_weekly_plan(&plan, &ctx).await.unwrap();

    let lunch = outcome.plan.days[0].meals.get(&SlotKind::Lunch).unwrap();
    assert_eq!(lunch.recipe.as_ref().unwrap().name, "Empanadas de zapallo");
    assert_eq!(lunch.recipe_id.as_deref(), Some("id-empanadas-de-zapallo"));
    assert_eq!(alternatives.calls.load(Ordering::SeqCst), 1);
    assert!(lunch.score.is_some());
}

/// An alternative that does not beat the incumbent is rejected: equal scores
/// are not an improvement.
#[tokio::test]
async fn test_below_threshold_rejects_non_improving_alternative() {
    let incumbent = recipe("Caesar salad", &["faisan importado"]);
    let plan = plan_with_lunches(vec![incumbent.clone()]);

    let seasonality = StaticSeasonality::new();
    let pricing = StaticPricing::new(0.0).with_price("faisan importado", 2000.0);
    let budget = IdentityBudgetPlanner;
    // The identical recipe scores identically, so it must not be adopted.
    let alternatives = FixedAlternative::new(incumbent.clone());
    let optimizer = PlanOptimizer::new(&seasonality, &pricing, &budget, &alternatives);

    let ctx = OptimizationContext::new(Mode::Normal, "pampa", Season::Summer);
    let outcome = optimizer.optimize_weekly_plan(&plan, &ctx).await.unwrap();

    let lunch = outcome.plan.days[0].meals.get(&SlotKind::Lunch).unwrap();
    assert_eq!(lunch.recipe.as_ref().unwrap().id, incumbent.id);
    assert_eq!(alternatives.calls.load(Ordering::SeqCst), 1);
    assert!(lunch.score.is_some());
}

/// An alternative-source failure is caught per call: the below-threshold
/// incumbent keeps its slot and is still annotated with its own score.
#[tokio::test]
async fn test_alternative_source_failure_keeps_incumbent() {
    let incumbent = recipe("Caesar salad", &["faisan importado"]);
    let plan = plan_with_lunches(vec![incumbent.clone()]);

    let seasonality = StaticSeasonality::new();
    let pricing = StaticPricing::new(0.0).with_price("faisan importado", 2000.0);
    let budget = IdentityBudgetPlanner;
    let alternatives = FailingAlternative::new();
    let optimizer = PlanOptimizer::new(&seasonality, &pricing, &budget, &alternatives);

    let ctx = OptimizationContext::new(Mode::Normal, "pampa", Season::Summer);
    let outcome = optimizer.optimize_weekly_plan(&plan, &ctx).await.unwrap();

    // The incumbent was below threshold, so the source was consulted once.
    assert_eq!(alternatives.calls.load(Ordering::SeqCst), 1);

    let lunch = outcome.plan.days[0].meals.get(&SlotKind::Lunch).unwrap();
    assert_eq!(lunch.recipe.as_ref().unwrap().id, incumbent.id);
    let score = lunch.score.expect("incumbent still annotated");
    assert!(score < 0.7);
}

/// With no alternatives available, re-running the optimizer recomputes scores
/// but never changes recipes.
#[tokio::test]
async fn test_rerun_without_alternatives_is_idempotent() {
    let plan = plan_with_lunches(vec![
        recipe("Milanesa con pure", &["peceto", "pan rallado"]),
        recipe("Tarta de acelga", &["acelga", "huevo"]),
        recipe("Guiso de mondongo", &["mondongo", "papa"]),
    ]);

    let seasonality = StaticSeasonality::new();
    let pricing = StaticPricing::new(60.0);
    let budget = IdentityBudgetPlanner;
    let alternatives = NoAlternatives;
    let optimizer = PlanOptimizer::new(&seasonality, &pricing, &budget, &alternatives);
    let ctx = OptimizationContext::new(Mode::Normal, "pampa", Season::Summer);

    let first = optimizer.optimize_weekly_plan(&plan, &ctx).await.unwrap();
    let second = optimizer
        .optimize_weekly_plan(&first.plan, &ctx)
        .await
        .unwrap();

    assert_eq!(first.plan, second.plan);
    for (day_a, day_b) in first.plan.days.iter().zip(second.plan.days.iter()) {
        for (kind, slot_a) in &day_a.meals {
            assert_eq!(slot_a.recipe_id, day_b.meals[kind].recipe_id);
        }
    }
}

/// Two identical lunches a day apart: the later one sits closer to more
/// repetitions inside its window and scores strictly lower on variety.
///
/// With only the two copies the symmetric ±3-day window makes them see each
/// other and tie, so the ordering is only observable when the two windows
/// hold different contents — here a third copy reachable from day 1 but not
/// from day 0.
#[tokio::test]
async fn test_repetition_penalty_orders_identical_recipes() {
    let plan = plan_with_lunches(vec![
        recipe("Milanesa con pure", &["peceto"]),
        recipe("Milanesa con pure", &["peceto"]),
        recipe("Tarta de acelga", &["acelga"]),
        recipe("Pastas caseras", &["harina"]),
        recipe("Milanesa con pure", &["peceto"]),
    ]);

    // Day 1's window reaches day 4 and sees two repetitions; day 0's window
    // stops at day 3 and sees only one.
    let earlier = meal_optimizer::scoring::variety_score(
        &plan,
        0,
        SlotKind::Lunch,
        "Milanesa con pure",
    );
    let later = meal_optimizer::scoring::variety_score(
        &plan,
        1,
        SlotKind::Lunch,
        "Milanesa con pure",
    );
    assert!(
        later < earlier,
        "later occurrence {later} should score below earlier {earlier}"
    );
}
