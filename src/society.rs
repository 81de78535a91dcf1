use crate::extract::{extract_year, is_estimate};
use crate::generic::parse_measure;
use crate::model::RecordExt;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Population {
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub is_estimate: bool,
    pub note: String,
}

/// "338,289,857 (2023 est.)" or `total`/`male`/`female` subfields.
pub fn parse_population(record: &Value, country: &str) -> Population {
    let mut text = record.subfield_text("total");
    if text.is_empty() {
        text = record.text();
    }

    let count = |key: &str| parse_measure(&record.subfield_text(key)).map(|m| m.value);
    let mut population = Population {
        male: count("male"),
        female: count("female"),
        year: extract_year(&text),
        is_estimate: is_estimate(&text),
        note: record.note(),
        ..Population::default()
    };
    if text.is_empty() {
        return population;
    }

    match parse_measure(&text) {
        Some(measure) => population.total = measure.value,
        None => warn!(country, field = "Population", text, "population total not understood"),
    }
    population
}
