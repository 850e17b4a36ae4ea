//! Weighted random draw over a [`WeightedPool`].

use rand::Rng;

use super::catalog::Category;
use super::weighting::WeightedPool;

/// Returned when the pool holds no habits at all.
pub const FALLBACK_HABIT: &str = "Take a 5-minute break and reflect on your day";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub habit: &'static str,
    /// `None` only for [`FALLBACK_HABIT`].
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    end: u64,
    weight: u64,
    category: Category,
    habits: &'static [&'static str],
}

/// Cumulative weight table, one span per category with habits.
#[derive(Debug, Clone)]
pub struct CumulativeTable {
    spans: Vec<Span>,
}

impl CumulativeTable {
    pub fn build(pool: &WeightedPool) -> Self {
        let catalog = pool.catalog();
        let mut spans = Vec::new();
        let mut end = 0u64;

        for (category, weight) in pool.entries() {
            let habits = catalog.habits(category);
            if weight == 0 || habits.is_empty() {
                continue;
            }
            let weight = u64::from(weight);
            end += weight * habits.len() as u64;
            spans.push(Span { end, weight, category, habits });
        }

        Self { spans }
    }

    pub fn total(&self) -> u64 {
        self.spans.last().map(|span| span.end).unwrap_or(0)
    }

    /// Habit at a position in `0..total()`, as if every habit were repeated `weight` times.
    pub fn lookup(&self, position: u64) -> Option<Selection> {
        let index = self.spans.partition_point(|span| span.end <= position);
        let span = self.spans.get(index)?;
        let start = if index == 0 { 0 } else { self.spans[index - 1].end };
        let offset = ((position - start) / span.weight) as usize;

        span.habits
            .get(offset)
            .map(|habit| Selection { habit: *habit, category: Some(span.category) })
    }
}

pub fn select_habit<R: Rng + ?Sized>(pool: &WeightedPool, rng: &mut R) -> Selection {
    let table = CumulativeTable::build(pool);
    let total = table.total();
    if total == 0 {
        return Selection { habit: FALLBACK_HABIT, category: None };
    }

    let position = rng.gen_range(0..total);
    table.lookup(position).unwrap_or(Selection { habit: FALLBACK_HABIT, category: None })
}
