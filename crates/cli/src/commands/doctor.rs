use microhabit_core::config::{AppConfig, LoadOptions};
use microhabit_core::habits::{Category, MoodCategory, RecommendationEngine};
use microhabit_db::migrations;
use serde::Serialize;

use crate::commands::{build_runtime, open_migrated_pool};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = vec![check_catalog_integrity(&RecommendationEngine::default())];

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "database_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let healthy = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if healthy { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if healthy {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_integrity(engine: &RecommendationEngine) -> DoctorCheck {
    let catalog = engine.catalog();
    let empty: Vec<&str> = Category::ALL
        .iter()
        .filter(|category| catalog.habits(**category).is_empty())
        .map(|category| category.key())
        .collect();
    let unmapped: Vec<&str> = engine
        .valid_moods()
        .iter()
        .copied()
        .filter(|mood| !MoodCategory::ALL.iter().any(|group| group.moods().contains(mood)))
        .collect();

    if empty.is_empty() && unmapped.is_empty() {
        return DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Pass,
            details: format!(
                "{} categories and {} moods available",
                Category::ALL.len(),
                engine.valid_moods().len()
            ),
        };
    }

    DoctorCheck {
        name: "catalog_integrity",
        status: CheckStatus::Fail,
        details: format!(
            "empty categories: [{}]; moods without a category: [{}]",
            empty.join(", "),
            unmapped.join(", ")
        ),
    }
}

fn check_database(config: &AppConfig) -> DoctorCheck {
    if !config.storage.enabled {
        return DoctorCheck {
            name: "database_readiness",
            status: CheckStatus::Skipped,
            details: "suggestion storage is disabled".to_string(),
        };
    }

    let runtime = match build_runtime("doctor") {
        Ok(runtime) => runtime,
        Err(failure) => {
            return DoctorCheck {
                name: "database_readiness",
                status: CheckStatus::Fail,
                details: failure.output,
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(config).await.map_err(|(_, message, _)| message)?;
        let applied = migrations::MIGRATOR
            .iter()
            .filter(|migration| !migration.migration_type.is_down_migration())
            .count();
        pool.close().await;
        Ok::<usize, String>(applied)
    });

    match result {
        Ok(applied) => DoctorCheck {
            name: "database_readiness",
            status: CheckStatus::Pass,
            details: format!(
                "connected using `{}`; schema at {applied} migration(s)",
                config.database.url
            ),
        },
        Err(error) => {
            DoctorCheck { name: "database_readiness", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
