use crate::extract::{
    NumericOptions, Percentage, SplitOptions, extract_numeric, extract_percentage, extract_year,
    is_estimate, parse_plain, split_list, split_outside_parens,
};
use crate::markup::{has_label, split_labeled};
use crate::model::{Measure, Outcome, RecordExt};
use crate::text::{clean, clean_lines, snake_case, split_trailing_paren};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static YEAR_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>.*?)\s+(?P<year>(?:19|20)\d{2})$").expect("year key regex must be valid")
});
static MEASURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<cur>[$€£¥])?\s*(?P<num>-?\d[\d,]*(?:\.\d+)?|-?\.\d+)\s*(?P<mag>thousand|million|billion|trillion|mn|bn|tn)?\s*(?P<rest>.*)$",
    )
    .expect("measure regex must be valid")
});
static RANGE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-|–|to\b)\s*\d[\d,]*(?:\.\d+)?\s*(?:thousand|million|billion|trillion)?")
        .expect("range tail regex must be valid")
});
static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<rating>[A-Za-z][A-Za-z0-9+\-]*)\s*(?:\((?P<year>\d{4})\))?")
        .expect("rating regex must be valid")
});
static AGE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)male\s+(?P<male>[\d,]+)\s*/\s*female\s+(?P<female>[\d,]+)")
        .expect("age bracket regex must be valid")
});
static SHARE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*(?P<pct>\d+(?:\.\d+)?)\s*%(?P<rest>.*)$")
        .expect("share item regex must be valid")
});
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*(?:[^()]*?\s)?(?P<y>(?:19|20)\d{2})(?:\s*est\.?)?\s*\)\s*$")
        .expect("trailing year regex must be valid")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextNote {
    pub key: String,
    pub text: String,
    pub note: String,
}

impl Serialize for TextNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.key, &self.text)?;
        map.serialize_entry(&format!("{}_note", self.key), &self.note)?;
        map.end()
    }
}

pub fn parse_text_note(record: &Value, main_key: &str) -> TextNote {
    TextNote {
        key: main_key.to_string(),
        text: record.text(),
        note: record.note(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Subdivided {
    Regions {
        regions: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "String::is_empty")]
        general: String,
        note: String,
    },
    Plain(TextNote),
}

pub fn parse_subdivided(record: &Value, main_key: &str) -> Subdivided {
    let raw = record.raw_text();
    if !has_label(raw, "em") {
        return Subdivided::Plain(parse_text_note(record, main_key));
    }

    let labeled = split_labeled(raw, "em");
    let regions = labeled
        .blocks
        .into_iter()
        .map(|block| {
            let content = block.content.trim_end_matches([';', ',']).trim_end().to_string();
            (block.label, content)
        })
        .collect();
    Subdivided::Regions {
        regions,
        general: labeled.preamble,
        note: record.note(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEntry {
    pub year: i32,
    pub value: f64,
    pub unit: String,
    pub is_estimate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearSeries {
    pub entries: Vec<YearEntry>,
    pub note: String,
}

impl YearSeries {
    pub fn latest(&self) -> Option<&YearEntry> {
        self.entries.last()
    }
}

pub fn parse_year_series(record: &Value, unit: Option<&str>) -> YearSeries {
    let mut entries = Vec::new();

    for (key, sub) in record.subfields() {
        let Some(caps) = YEAR_KEY.captures(key) else {
            continue;
        };
        let Ok(year) = caps["year"].parse::<i32>() else {
            continue;
        };
        let text = sub.text();
        match series_value(&text, unit) {
            Some((value, found_unit)) => entries.push(YearEntry {
                year,
                value,
                unit: found_unit,
                is_estimate: is_estimate(&text),
            }),
            None => debug!(key, text, "year entry without a number skipped"),
        }
    }

    if entries.is_empty() {
        let text = record.text();
        if let (Some(year), Some((value, found_unit))) = (extract_year(&text), series_value(&text, unit)) {
            entries.push(YearEntry {
                year,
                value,
                unit: found_unit,
                is_estimate: is_estimate(&text),
            });
        }
    }

    entries.sort_by_key(|e| e.year);
    entries.dedup_by_key(|e| e.year);

    YearSeries {
        entries,
        note: record.note(),
    }
}

fn series_value(text: &str, unit: Option<&str>) -> Option<(f64, String)> {
    let measure = parse_measure(text)?;
    let found_unit = match unit {
        Some(declared) => declared.to_string(),
        None => measure.unit,
    };
    Some((measure.value, found_unit))
}

/// Number, unit, year and estimate flag from text such as
/// "$818.822 billion (2023 est.)" or "264,000 sq km (2012)".
pub fn parse_measure(text: &str) -> Option<Measure> {
    let numeric = extract_numeric(text, NumericOptions::default())?;
    let unit = MEASURE
        .captures(text)
        .map(|caps| {
            if caps.name("cur").is_some() {
                return currency_code(&caps["cur"]).to_string();
            }
            unit_from_rest(&caps["rest"])
        })
        .unwrap_or_default();

    Some(Measure {
        value: numeric.value,
        unit,
        year: extract_year(text),
        is_estimate: is_estimate(text),
        min: numeric.min,
        max: numeric.max,
    })
}

fn currency_code(symbol: &str) -> &'static str {
    match symbol {
        "€" => "EUR",
        "£" => "GBP",
        "¥" => "JPY",
        _ => "USD",
    }
}

fn unit_from_rest(rest: &str) -> String {
    let rest = RANGE_TAIL.replace(rest, "");
    let rest = rest.trim_start();
    if rest.starts_with('%') {
        return "%".to_string();
    }
    let end = rest.find(['(', ';', ':']).unwrap_or(rest.len());
    let end = rest[..end].find(", ").unwrap_or(end);
    let candidate = rest[..end].trim();
    if candidate.is_empty()
        || candidate.len() > 40
        || !candidate.starts_with(|c: char| c.is_alphabetic())
    {
        return String::new();
    }
    candidate.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub rating: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

pub fn parse_rating(text: &str) -> Option<Rating> {
    let caps = RATING.captures(text.trim())?;
    Some(Rating {
        rating: caps["rating"].to_string(),
        year: caps.name("year").and_then(|m| m.as_str().parse().ok()),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBracket {
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female: Option<f64>,
}

pub fn parse_age_bracket(text: &str) -> Option<AgeBracket> {
    let percentage = extract_percentage(text)?;
    let caps = AGE_SPLIT.captures(text);
    Some(AgeBracket {
        percentage: percentage.percentage,
        male: caps.as_ref().and_then(|c| parse_plain(&c["male"])),
        female: caps.as_ref().and_then(|c| parse_plain(&c["female"])),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Rating,
    Percentage,
    Measure,
    AgeBracket,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Item {
    Rating(Rating),
    Percentage(Percentage),
    Measure(Measure),
    AgeBracket(AgeBracket),
    Text(String),
}

impl ItemKind {
    pub fn parse(self, text: &str) -> Option<Item> {
        if text.is_empty() {
            return None;
        }
        match self {
            ItemKind::Rating => parse_rating(text).map(Item::Rating),
            ItemKind::Percentage => extract_percentage(text).map(Item::Percentage),
            ItemKind::Measure => parse_measure(text).map(Item::Measure),
            ItemKind::AgeBracket => parse_age_bracket(text).map(Item::AgeBracket),
            ItemKind::Text => Some(Item::Text(text.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubEntities {
    #[serde(flatten)]
    pub entries: BTreeMap<String, Item>,
    pub note: String,
}

pub fn parse_sub_entities(record: &Value, names: &[&str], item: ItemKind) -> SubEntities {
    let selected: Vec<(String, &Value)> = if names.is_empty() {
        record
            .subfields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    } else {
        names
            .iter()
            .filter_map(|name| record.subfield(name).map(|v| (name.to_string(), v)))
            .collect()
    };

    let mut entries = BTreeMap::new();
    for (name, sub) in selected {
        let text = sub.text();
        if text.is_empty() {
            continue;
        }
        let parsed = item.parse(&text).unwrap_or_else(|| {
            warn!(subfield = %name, text, "item did not match; keeping text");
            Item::Text(text.clone())
        });
        entries.insert(snake_case(&name), parsed);
    }

    SubEntities {
        entries,
        note: record.note(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasureField {
    #[serde(flatten)]
    pub measure: Measure,
    pub note: String,
}

pub fn parse_measure_field(record: &Value) -> Outcome<MeasureField> {
    let text = record.text();
    if text.is_empty() {
        return Outcome::default();
    }
    match parse_measure(&text) {
        Some(measure) => Outcome::Parsed(MeasureField {
            measure,
            note: record.note(),
        }),
        None => Outcome::Unparsed { raw_text: text },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemList {
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub note: String,
}

pub fn parse_item_list(record: &Value) -> ItemList {
    let lines = clean_lines(record.raw_text());
    let (text, options) = if lines.len() > 1 {
        let per_line = SplitOptions {
            delimiter: '\n',
            smart: false,
            drop_empty: true,
        };
        (lines.join("\n"), per_line)
    } else {
        (record.text(), SplitOptions::default())
    };
    let (body, year) = strip_trailing_year(&text);
    ItemList {
        items: split_list(body, options),
        year,
        note: record.note(),
    }
}

/// Drops a trailing "(2022)" / "(2019 est.)" and returns its year.
pub fn strip_trailing_year(text: &str) -> (&str, Option<i32>) {
    match TRAILING_YEAR.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map_or(text.len(), |m| m.start());
            (
                text[..start].trim_end(),
                caps["y"].parse::<i32>().ok(),
            )
        }
        None => (text, None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareList {
    pub entries: Vec<Share>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub is_estimate: bool,
    pub note: String,
}

/// "Canada 17%, Mexico 16%, China 7% (2022)" style lists.
pub fn parse_share_list(record: &Value) -> ShareList {
    let text = record.text();
    let estimate = is_estimate(&text);
    let (body, year) = strip_trailing_year(&text);
    let delimiter = if split_outside_parens(body, ';').len() > 1 {
        ';'
    } else {
        ','
    };

    let entries = split_outside_parens(body, delimiter)
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .map(|item| share_from_item(&item))
        .collect();

    ShareList {
        entries,
        year,
        is_estimate: estimate,
        note: record.note(),
    }
}

fn share_from_item(item: &str) -> Share {
    if let Some(caps) = SHARE_ITEM.captures(item) {
        let name = caps["name"].trim().trim_end_matches(['-', ':']).trim();
        let detail = caps["rest"].trim();
        let detail = split_trailing_paren(detail).1.unwrap_or(detail).trim();
        return Share {
            name: name.to_string(),
            percentage: parse_plain(&caps["pct"]),
            detail: (!detail.is_empty()).then(|| detail.to_string()),
        };
    }
    let (name, detail) = split_trailing_paren(item);
    Share {
        name: clean(name),
        percentage: None,
        detail: detail.map(ToString::to_string),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PercentageField {
    #[serde(flatten)]
    pub percentage: Option<Percentage>,
    pub note: String,
}

pub fn parse_percentage_field(record: &Value) -> PercentageField {
    let text = record.text();
    let percentage = extract_percentage(&text);
    if percentage.is_none() && !text.is_empty() {
        debug!(text, "no percentage in text");
    }
    PercentageField {
        percentage,
        note: record.note(),
    }
}
