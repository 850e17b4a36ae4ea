//! Static habit catalog, mood taxonomy, affinity table and preference aliases.
//!
//! All tables are `const` data shared read-only for the life of the process.

use serde::{Deserialize, Serialize};

/// Closed set of habit categories, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Relaxation,
    Mindfulness,
    PhysicalActivity,
    Productivity,
    Social,
    Creative,
    DigitalWellbeing,
    Nature,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Relaxation,
        Category::Mindfulness,
        Category::PhysicalActivity,
        Category::Productivity,
        Category::Social,
        Category::Creative,
        Category::DigitalWellbeing,
        Category::Nature,
    ];

    /// Canonical lowercase key, e.g. `physical_activity`.
    pub fn key(self) -> &'static str {
        match self {
            Category::Relaxation => "relaxation",
            Category::Mindfulness => "mindfulness",
            Category::PhysicalActivity => "physical_activity",
            Category::Productivity => "productivity",
            Category::Social => "social",
            Category::Creative => "creative",
            Category::DigitalWellbeing => "digital_wellbeing",
            Category::Nature => "nature",
        }
    }

    /// Human-facing form, e.g. "Physical Activity".
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Relaxation => "Relaxation",
            Category::Mindfulness => "Mindfulness",
            Category::PhysicalActivity => "Physical Activity",
            Category::Productivity => "Productivity",
            Category::Social => "Social",
            Category::Creative => "Creative",
            Category::DigitalWellbeing => "Digital Wellbeing",
            Category::Nature => "Nature",
        }
    }

    /// Exact match on the canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

/// Coarse grouping of raw moods used to pick affinities and reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodCategory {
    StressedAnxious,
    TiredFatigued,
    HappyExcited,
    Understimulated,
    Negative,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 5] = [
        MoodCategory::StressedAnxious,
        MoodCategory::TiredFatigued,
        MoodCategory::HappyExcited,
        MoodCategory::Understimulated,
        MoodCategory::Negative,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MoodCategory::StressedAnxious => "stressed_anxious",
            MoodCategory::TiredFatigued => "tired_fatigued",
            MoodCategory::HappyExcited => "happy_excited",
            MoodCategory::Understimulated => "understimulated",
            MoodCategory::Negative => "negative",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }

    /// Raw moods belonging to this group.
    pub fn moods(self) -> &'static [&'static str] {
        match self {
            MoodCategory::StressedAnxious => &["stressed", "anxious", "overwhelmed"],
            MoodCategory::TiredFatigued => &["tired", "fatigued", "exhausted"],
            MoodCategory::HappyExcited => &["happy", "excited", "motivated"],
            MoodCategory::Understimulated => &["bored", "understimulated", "restless"],
            MoodCategory::Negative => {
                &["sad", "down", "depressed", "angry", "frustrated", "irritated"]
            }
        }
    }

    /// Habit categories that suit this mood group, most suitable first.
    pub fn affinity(self) -> &'static [Category] {
        match self {
            MoodCategory::StressedAnxious => {
                &[Category::Relaxation, Category::Mindfulness, Category::Nature]
            }
            MoodCategory::TiredFatigued => {
                &[Category::PhysicalActivity, Category::Nature, Category::Social]
            }
            MoodCategory::HappyExcited => {
                &[Category::Productivity, Category::Creative, Category::Social]
            }
            MoodCategory::Understimulated => {
                &[Category::Creative, Category::PhysicalActivity, Category::Productivity]
            }
            MoodCategory::Negative => &[Category::Mindfulness, Category::Social, Category::Nature],
        }
    }
}

/// The full valid-mood vocabulary in display order.
pub const VALID_MOODS: [&str; 18] = [
    "stressed",
    "anxious",
    "overwhelmed",
    "tired",
    "fatigued",
    "exhausted",
    "happy",
    "excited",
    "motivated",
    "bored",
    "understimulated",
    "restless",
    "sad",
    "down",
    "depressed",
    "angry",
    "frustrated",
    "irritated",
];

/// Habits of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitGroup {
    pub category: Category,
    pub habits: &'static [&'static str],
}

const HABIT_GROUPS: &[HabitGroup] = &[
    HabitGroup {
        category: Category::Relaxation,
        habits: &[
            "Listen to calming music for 5 minutes",
            "Take a 5-minute breathing break",
            "Practice progressive muscle relaxation",
            "Do a quick guided meditation",
            "Take a mindful tea break",
        ],
    },
    HabitGroup {
        category: Category::Mindfulness,
        habits: &[
            "Do a 5-minute meditation session",
            "Practice mindful breathing for 3 minutes",
            "Journal 3 things you're grateful for",
            "Do a body scan meditation",
            "Practice mindful walking for 5 minutes",
        ],
    },
    HabitGroup {
        category: Category::PhysicalActivity,
        habits: &[
            "Go for a short 10-minute walk",
            "Do 5 minutes of stretching",
            "Do 10 jumping jacks",
            "Take the stairs instead of elevator",
            "Do a quick yoga flow",
        ],
    },
    HabitGroup {
        category: Category::Productivity,
        habits: &[
            "Tidy your workspace",
            "Read a book for 10 minutes",
            "Write down your top 3 priorities",
            "Organize your digital files",
            "Learn something new for 10 minutes",
        ],
    },
    HabitGroup {
        category: Category::Social,
        habits: &[
            "Send a message to a friend",
            "Call a family member",
            "Write a thank you note",
            "Compliment someone",
            "Reach out to an old friend",
        ],
    },
    HabitGroup {
        category: Category::Creative,
        habits: &[
            "Doodle or sketch for 5 minutes",
            "Write a short poem or haiku",
            "Take 3 interesting photos",
            "Brainstorm ideas for a project",
            "Listen to a new genre of music",
        ],
    },
    HabitGroup {
        category: Category::DigitalWellbeing,
        habits: &[
            "Turn off notifications for 30 minutes",
            "Do a quick digital declutter",
            "Take a short screen break",
            "Adjust your screen brightness",
            "Set app time limits",
        ],
    },
    HabitGroup {
        category: Category::Nature,
        habits: &[
            "Step outside for fresh air",
            "Water your plants",
            "Look at the sky for a few minutes",
            "Listen to nature sounds",
            "Open a window for fresh air",
        ],
    },
];

/// Immutable mapping from category to its ordered habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitCatalog {
    groups: &'static [HabitGroup],
}

/// The built-in catalog, five habits per category.
pub const BUILTIN_CATALOG: HabitCatalog = HabitCatalog { groups: HABIT_GROUPS };

impl HabitCatalog {
    pub const fn from_groups(groups: &'static [HabitGroup]) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &'static [HabitGroup] {
        self.groups
    }

    /// Habits for a category; empty when the catalog does not carry it.
    pub fn habits(&self, category: Category) -> &'static [&'static str] {
        self.groups
            .iter()
            .find(|group| group.category == category)
            .map(|group| group.habits)
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: Category) -> bool {
        self.groups.iter().any(|group| group.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.groups.iter().map(|group| group.category)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.habits.is_empty())
    }

    /// Category owning the given habit text, if any.
    pub fn category_of(&self, habit: &str) -> Option<Category> {
        self.groups
            .iter()
            .find(|group| group.habits.contains(&habit))
            .map(|group| group.category)
    }
}

impl Default for HabitCatalog {
    fn default() -> Self {
        BUILTIN_CATALOG
    }
}
