use crate::config::AppConfig;
use crate::dispatch::{ParseMode, default_value, extract_country, parse_field, shape_for};
use crate::loader::DataDir;
use crate::model::CountryRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

static NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub struct FieldQuery {
    pub section: String,
    pub field: String,
    pub mode: ParseMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldResult {
    pub country: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub result: Value,
}

pub fn data_dir(config: &AppConfig) -> DataDir {
    DataDir::new(&config.data_dir).with_max_text_len(config.limits.max_text_len)
}

fn field_record<'a>(record: &'a CountryRecord, query: &FieldQuery) -> &'a Value {
    record
        .field(&query.section, &query.field)
        .unwrap_or(&NULL)
}

pub fn parse_country_field(config: &AppConfig, code: &str, query: &FieldQuery) -> Result<Value> {
    let data = data_dir(config);
    let record = data
        .load(code)
        .with_context(|| format!("failed to load country {code}"))?;
    Ok(parse_field(
        field_record(&record, query),
        config.parser_code(&record.code),
        &query.section,
        &query.field,
        query.mode,
    ))
}

pub fn extract_country_file(config: &AppConfig, code: &str) -> Result<Value> {
    let data = data_dir(config);
    let mut record = data
        .load(code)
        .with_context(|| format!("failed to load country {code}"))?;
    record.code = config.parser_code(&record.code).to_string();
    Ok(extract_country(&record))
}

pub fn batch_field(config: &AppConfig, query: &FieldQuery) -> Result<Vec<FieldResult>> {
    let data = data_dir(config);
    let countries = data
        .countries()
        .with_context(|| format!("failed to list countries in {}", data.root().display()))?;

    let shape = shape_for(&query.section, &query.field);
    let mut results = Vec::with_capacity(countries.len());
    for (code, path) in countries {
        let parser_code = config.parser_code(&code).to_string();
        match data.load_file(&path) {
            Ok(record) => results.push(FieldResult {
                result: parse_field(
                    field_record(&record, query),
                    &parser_code,
                    &query.section,
                    &query.field,
                    query.mode,
                ),
                country: code,
                ok: true,
                error: None,
            }),
            Err(err) => {
                error!(country = %code, error = %err, "country failed to load");
                results.push(FieldResult {
                    country: code,
                    ok: false,
                    error: Some(err.to_string()),
                    result: default_value(shape, &parser_code),
                });
            }
        }
    }

    info!(
        section = %query.section,
        field = %query.field,
        countries = results.len(),
        failed = results.iter().filter(|r| !r.ok).count(),
        "batch complete"
    );
    Ok(results)
}

pub fn batch_records(records: &[(String, Value)], query: &FieldQuery) -> Vec<FieldResult> {
    let mut results: Vec<FieldResult> = records
        .iter()
        .map(|(code, data)| {
            let record = CountryRecord::new(code.as_str(), data.clone());
            FieldResult {
                result: parse_field(
                    field_record(&record, query),
                    &record.code,
                    &query.section,
                    &query.field,
                    query.mode,
                ),
                country: record.code,
                ok: data.is_object(),
                error: (!data.is_object()).then(|| "country data is not a JSON object".to_string()),
            }
        })
        .collect();
    results.sort_by(|a, b| a.country.cmp(&b.country));
    results
}
