use crate::context::{OptimizationContext, Season};
use crate::plan::{Recipe, SlotKind, WeeklyPlan};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Catalog of in-season ingredient names per region and season.
///
/// Read-only reference data. The optimizer fetches the set once per run and
/// scores against that snapshot, so implementations are free to hit a
/// database or remote service.
#[async_trait]
pub trait SeasonalityProvider: Send + Sync {
    async fn seasonal_ingredients(&self, region: &str, season: Season) -> Result<HashSet<String>>;
}

/// Estimated unit price for an ingredient in a given season.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    async fn ingredient_price(&self, name: &str, season: Season) -> Result<f32>;
}

/// Result of a whole-plan budget rewrite.
#[derive(Debug, Clone)]
pub struct BudgetOutcome {
    pub plan: WeeklyPlan,
    pub change_count: u32,
    pub savings: f32,
}

/// Whole-plan budget substitution engine, invoked at most once per run and
/// only in economy mode.
#[async_trait]
pub trait BudgetPlanner: Send + Sync {
    async fn optimize_plan_for_budget(&self, plan: &WeeklyPlan) -> Result<BudgetOutcome>;
}

/// Source of replacement candidates for below-threshold slots.
///
/// Best-effort: returning `Ok(None)` is the common case and leaves the
/// incumbent recipe in place.
#[async_trait]
pub trait AlternativeSource: Send + Sync {
    async fn suggest(
        &self,
        incumbent: &Recipe,
        ctx: &OptimizationContext,
        plan: &WeeklyPlan,
        day_index: usize,
        kind: SlotKind,
    ) -> Result<Option<Recipe>>;
}

/// Alternative source that never suggests anything. With this source the
/// optimizer only annotates scores, which makes re-runs idempotent.
#[derive(Debug, Default)]
pub struct NoAlternatives;

#[async_trait]
impl AlternativeSource for NoAlternatives {
    async fn suggest(
        &self,
        _incumbent: &Recipe,
        _ctx: &OptimizationContext,
        _plan: &WeeklyPlan,
        _day_index: usize,
        _kind: SlotKind,
    ) -> Result<Option<Recipe>> {
        Ok(None)
    }
}

/// In-memory seasonal catalog keyed by region and season.
#[derive(Debug, Default)]
pub struct StaticSeasonality {
    catalog: HashMap<(String, Season), HashSet<String>>,
}

impl StaticSeasonality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(
        mut self,
        region: impl Into<String>,
        season: Season,
        ingredients: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.catalog
            .entry((region.into(), season))
            .or_default()
            .extend(ingredients.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl SeasonalityProvider for StaticSeasonality {
    async fn seasonal_ingredients(&self, region: &str, season: Season) -> Result<HashSet<String>> {
        Ok(self
            .catalog
            .get(&(region.to_string(), season))
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory price table with a flat fallback for unknown ingredients.
#[derive(Debug)]
pub struct StaticPricing {
    prices: HashMap<String, f32>,
    fallback: f32,
}

impl StaticPricing {
    pub fn new(fallback: f32) -> Self {
        StaticPricing {
            prices: HashMap::new(),
            fallback,
        }
    }

    pub fn with_price(mut self, name: impl Into<String>, price: f32) -> Self {
        self.prices.insert(name.into().to_lowercase(), price);
        self
    }
}

#[async_trait]
impl PricingProvider for StaticPricing {
    async fn ingredient_price(&self, name: &str, _season: Season) -> Result<f32> {
        Ok(self
            .prices
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(self.fallback))
    }
}
