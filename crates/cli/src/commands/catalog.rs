use std::collections::BTreeMap;

use clap::ValueEnum;
use microhabit_core::habits::RecommendationEngine;
use serde_json::{json, Map, Value};

use crate::commands::CommandResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogSection {
    Moods,
    Preferences,
    Habits,
}

/// Prints one catalog section, or all of them when none is named.
pub fn run(section: Option<CatalogSection>) -> CommandResult {
    let engine = RecommendationEngine::default();
    let sections = match section {
        Some(section) => vec![section],
        None => vec![CatalogSection::Moods, CatalogSection::Preferences, CatalogSection::Habits],
    };

    let mut data = Map::new();
    for section in &sections {
        match section {
            CatalogSection::Moods => {
                data.insert("moods".to_string(), json!(engine.valid_moods()));
            }
            CatalogSection::Preferences => {
                data.insert("preferences".to_string(), json!(engine.preference_display_names()));
                data.insert("preference_keys".to_string(), json!(engine.preference_keys()));
            }
            CatalogSection::Habits => {
                let catalog = engine.catalog();
                let habits: BTreeMap<&str, &[&str]> = catalog
                    .categories()
                    .map(|category| (category.key(), catalog.habits(category)))
                    .collect();
                data.insert("habits".to_string(), json!(habits));
            }
        }
    }

    let names: Vec<&str> = sections
        .iter()
        .map(|section| match section {
            CatalogSection::Moods => "moods",
            CatalogSection::Preferences => "preferences",
            CatalogSection::Habits => "habits",
        })
        .collect();
    CommandResult::success_with_data(
        "catalog",
        format!("catalog sections: {}", names.join(", ")),
        Some(Value::Object(data)),
    )
}
