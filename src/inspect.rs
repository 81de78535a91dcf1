use crate::config::AppConfig;
use crate::dispatch::{ParseMode, default_value, parse_field, shape_for};
use crate::pipeline::data_dir;
use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub section: String,
    pub field: String,
    pub sample_limit: usize,
    pub country_glob: String,
}

impl InspectOptions {
    pub fn from_config(config: &AppConfig, section: &str, field: &str) -> Self {
        Self {
            section: section.to_string(),
            field: field.to_string(),
            sample_limit: config.inspect.sample_limit,
            country_glob: config.inspect.country_glob.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub country: String,
    pub passed: bool,
    pub input: Value,
    pub output: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub section: String,
    pub field: String,
    pub shape: &'static str,
    pub countries_matched: usize,
    pub sampled: usize,
    pub passed: usize,
    pub failed: usize,
    pub lines: Vec<String>,
    pub samples: Vec<Sample>,
}

pub fn run_inspection(config: &AppConfig, options: &InspectOptions) -> Result<InspectReport> {
    let pattern = Pattern::new(&options.country_glob)
        .with_context(|| format!("invalid country glob {}", options.country_glob))?;
    let data = data_dir(config);
    let countries: Vec<_> = data
        .countries()
        .with_context(|| format!("failed to list countries in {}", data.root().display()))?
        .into_iter()
        .filter(|(code, _)| pattern.matches(code) || pattern.matches(&code.to_ascii_lowercase()))
        .collect();

    let shape = shape_for(&options.section, &options.field);
    let mut samples = Vec::new();
    for (code, path) in countries.iter().take(options.sample_limit) {
        let parser_code = config.parser_code(code);
        let default = default_value(shape, parser_code);
        let sample = match data.load_file(path) {
            Ok(record) => match record.field(&options.section, &options.field) {
                Some(input) => {
                    let output = parse_field(
                        input,
                        parser_code,
                        &options.section,
                        &options.field,
                        ParseMode::Parsed,
                    );
                    let passed = output != default;
                    Sample {
                        country: code.clone(),
                        passed,
                        input: input.clone(),
                        reason: (!passed).then(|| "parser returned the default shape".to_string()),
                        output,
                    }
                }
                None => Sample {
                    country: code.clone(),
                    passed: false,
                    input: Value::Null,
                    output: default,
                    reason: Some("field missing".to_string()),
                },
            },
            Err(err) => {
                error!(country = %code, error = %err, "country failed to load");
                Sample {
                    country: code.clone(),
                    passed: false,
                    input: Value::Null,
                    output: default,
                    reason: Some(err.to_string()),
                }
            }
        };
        samples.push(sample);
    }

    let lines = samples
        .iter()
        .map(|s| match &s.reason {
            Some(reason) if !s.passed => {
                format!("FAIL {} {}/{}: {reason}", s.country, options.section, options.field)
            }
            _ => format!("PASS {} {}/{}", s.country, options.section, options.field),
        })
        .collect();
    let passed = samples.iter().filter(|s| s.passed).count();

    info!(
        section = %options.section,
        field = %options.field,
        sampled = samples.len(),
        passed,
        "inspection complete"
    );

    Ok(InspectReport {
        section: options.section.clone(),
        field: options.field.clone(),
        shape: shape.name(),
        countries_matched: countries.len(),
        sampled: samples.len(),
        passed,
        failed: samples.len() - passed,
        lines,
        samples,
    })
}
