//! Rule-based category weighting.
//!
//! Screen time assigns a base weight per category; mood and preferences then
//! narrow the pool and multiply those base weights. Weights are plain integers
//! consumed by the selector, so no habit list is ever copied.

use std::collections::BTreeMap;

use super::catalog::{Category, HabitCatalog, MoodCategory};

/// Above this many minutes screen time counts as high.
pub const HIGH_SCREEN_TIME_MINUTES: f64 = 240.0;
/// Above this many minutes (and up to the high mark) screen time counts as moderate.
pub const MODERATE_SCREEN_TIME_MINUTES: f64 = 120.0;

/// Multiplier for a category the user asked for.
pub const PREFERENCE_MULTIPLIER: u32 = 2;
/// Multiplier for a requested category that also suits the mood. Replaces, not stacks.
pub const AFFINITY_PREFERENCE_MULTIPLIER: u32 = 3;
/// Multiplier for mood-affinity categories when no preference matched.
pub const AFFINITY_DEFAULT_MULTIPLIER: u32 = 2;
/// Multiplier for restorative categories under elevated screen time.
pub const SCREEN_TIME_MULTIPLIER: u32 = 2;

const HIGH_SCREEN_TIME_BOOSTS: [Category; 3] =
    [Category::DigitalWellbeing, Category::PhysicalActivity, Category::Nature];
const MODERATE_SCREEN_TIME_BOOSTS: [Category; 1] = [Category::DigitalWellbeing];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTimeTier {
    Low,
    Moderate,
    High,
}

impl ScreenTimeTier {
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes > HIGH_SCREEN_TIME_MINUTES {
            ScreenTimeTier::High
        } else if minutes > MODERATE_SCREEN_TIME_MINUTES {
            ScreenTimeTier::Moderate
        } else {
            ScreenTimeTier::Low
        }
    }

    fn boosted(self) -> &'static [Category] {
        match self {
            ScreenTimeTier::High => &HIGH_SCREEN_TIME_BOOSTS,
            ScreenTimeTier::Moderate => &MODERATE_SCREEN_TIME_BOOSTS,
            ScreenTimeTier::Low => &[],
        }
    }
}

/// A set of catalog categories, each with an integer selection weight.
///
/// Every habit in a category is drawn with its category's weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPool {
    catalog: HabitCatalog,
    weights: BTreeMap<Category, u32>,
}

impl WeightedPool {
    pub fn empty(catalog: HabitCatalog) -> Self {
        Self { catalog, weights: BTreeMap::new() }
    }

    pub fn catalog(&self) -> HabitCatalog {
        self.catalog
    }

    pub fn weight(&self, category: Category) -> Option<u32> {
        self.weights.get(&category).copied()
    }

    /// Categories with their weights, in canonical category order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.weights.iter().map(|(category, weight)| (*category, *weight))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.weights.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of weights over every habit in the pool.
    pub fn total_weight(&self) -> u64 {
        self.entries()
            .map(|(category, weight)| {
                u64::from(weight) * self.catalog.habits(category).len() as u64
            })
            .sum()
    }

    fn set(&mut self, category: Category, weight: u32) {
        self.weights.insert(category, weight);
    }
}

/// Base weights for every catalog category given today's screen time.
pub fn apply_screen_time(catalog: HabitCatalog, screen_time_minutes: f64) -> WeightedPool {
    let boosted = ScreenTimeTier::from_minutes(screen_time_minutes).boosted();
    let mut pool = WeightedPool::empty(catalog);

    for category in catalog.categories() {
        let weight = if boosted.contains(&category) { SCREEN_TIME_MULTIPLIER } else { 1 };
        pool.set(category, weight);
    }

    pool
}

/// Narrows the screen-time pool by preferences, then by mood affinity.
///
/// Falls back to the screen-time pool unchanged when neither yields a category.
pub fn apply_mood_and_preferences(
    mood_category: Option<MoodCategory>,
    screen_weighted: &WeightedPool,
    preferences: &[Category],
) -> WeightedPool {
    let affinity = mood_category.map(MoodCategory::affinity).unwrap_or(&[]);
    let mut pool = WeightedPool::empty(screen_weighted.catalog());

    for preference in preferences {
        let Some(base) = screen_weighted.weight(*preference) else {
            continue;
        };
        let multiplier = if affinity.contains(preference) {
            AFFINITY_PREFERENCE_MULTIPLIER
        } else {
            PREFERENCE_MULTIPLIER
        };
        pool.set(*preference, base * multiplier);
    }

    if pool.is_empty() {
        for category in affinity {
            if let Some(base) = screen_weighted.weight(*category) {
                pool.set(*category, base * AFFINITY_DEFAULT_MULTIPLIER);
            }
        }
    }

    if pool.is_empty() {
        return screen_weighted.clone();
    }

    pool
}
