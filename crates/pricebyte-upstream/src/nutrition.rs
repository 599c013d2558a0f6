//! Conversion of either upstream nutrition encoding into [`NutritionInfo`].

use std::collections::BTreeMap;

use pricebyte_core::NutritionInfo;
use serde_json::{Map, Value};

use crate::types::{BreakdownSection, NutritionSource};

/// Flat nutrition-facts fields that are carried over, with their display names.
const FACT_FIELDS: &[(&str, &str)] = &[
    ("protein", "Protein"),
    ("fat", "Fat - Total"),
    ("sodium", "Sodium"),
    ("carbohydrate", "Carbohydrate"),
    ("sugar", "Sugars - Total"),
    ("saturated_fat", "Fat - Saturated"),
];

pub(crate) fn resolve(source: &NutritionSource) -> NutritionInfo {
    match source {
        NutritionSource::Breakdown(sections) => from_breakdown(sections),
        NutritionSource::Facts(facts) => from_facts(facts),
        NutritionSource::Absent => NutritionInfo::default(),
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    PerServing,
    Per100g,
}

fn classify(title: &str) -> Option<Bucket> {
    let lower = title.to_lowercase();
    if lower.contains("serving") {
        Some(Bucket::PerServing)
    } else if lower.contains("100g") || lower.contains("100ml") {
        Some(Bucket::Per100g)
    } else {
        None
    }
}

fn from_breakdown(sections: &[BreakdownSection]) -> NutritionInfo {
    let mut info = NutritionInfo::default();

    for section in sections {
        let Some(bucket) = classify(&section.title) else {
            continue;
        };
        let target = match bucket {
            Bucket::PerServing => &mut info.per_serving,
            Bucket::Per100g => &mut info.per_100g,
        };
        for entry in &section.nutrients {
            target.insert(
                standard_nutrient_name(&entry.nutrient, &entry.value),
                entry.value.clone(),
            );
        }
    }

    info
}

/// Maps common nutrient spellings onto a fixed set of display names.
/// Energy is split by unit since both kJ and Cal rows share the name.
fn standard_nutrient_name(name: &str, value: &str) -> String {
    let standard = match name.to_lowercase().as_str() {
        "energy" if value.contains("kJ") => "Energy (kJ)",
        "energy" => "Energy (Cal)",
        "fat - total" => "Fat - Total",
        "fat - saturated" => "Fat - Saturated",
        "sugars - total" => "Sugars - Total",
        "carbohydrate" => "Carbohydrate",
        "protein" => "Protein",
        "sodium" => "Sodium",
        "gluten" => "Gluten",
        _ => return name.to_owned(),
    };
    standard.to_owned()
}

fn from_facts(facts: &Map<String, Value>) -> NutritionInfo {
    let mut per_serving = BTreeMap::new();

    if let Some(calories) = facts.get("calories_per_serving").and_then(display_value) {
        per_serving.insert("Energy (Cal)".to_owned(), format!("{calories} Cal"));
    }
    for (field, label) in FACT_FIELDS {
        if let Some(value) = facts.get(*field).and_then(display_value) {
            per_serving.insert((*label).to_owned(), value);
        }
    }

    NutritionInfo {
        per_100g: per_serving.clone(),
        per_serving,
    }
}

/// Renders a facts value for display. Null, empty, zero and `false` count as
/// missing.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}
