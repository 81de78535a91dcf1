use crate::extract::extract_coordinates;
use crate::geography::GeoCoordinates;
use crate::model::RecordExt;
use crate::text::split_trailing_paren;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

static UTC_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bUTC\s*(?P<sign>[+\-−])\s*(?P<h>\d{1,2})(?:(?P<sep>[:.])(?P<frac>\d{1,2}))?")
        .expect("utc offset regex must be valid")
});
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<d>\d{1,2})\s+(?P<m>January|February|March|April|May|June|July|August|September|October|November|December)\s+(?P<y>\d{4})\b",
    )
    .expect("date regex must be valid")
});
static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<m>January|February|March|April|May|June|July|August|September|October|November|December)\s+(?P<y>\d{4})\b",
    )
    .expect("month year regex must be valid")
});
static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?P<y>1\d{3}|20\d{2})\b").expect("year regex must be valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Capital {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_note: Option<String>,
    pub coordinates: GeoCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_difference: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub daylight_saving_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etymology: String,
    pub note: String,
}

pub fn parse_capital(record: &Value, country: &str) -> Capital {
    let mut name_text = record.subfield_text("name");
    if name_text.is_empty() {
        name_text = record.text();
    }
    let (name, name_note) = split_trailing_paren(&name_text);

    let coords_text = record.subfield_text("geographic coordinates");
    let coordinates = match extract_coordinates(&coords_text) {
        Some(found) => found.into(),
        None => {
            if !coords_text.is_empty() {
                warn!(country, field = "Capital", text = coords_text, "capital coordinates not understood");
            }
            GeoCoordinates::default()
        }
    };

    let time_difference = record.subfield_text("time difference");
    Capital {
        name: name.trim().to_string(),
        name_note: name_note.map(ToString::to_string),
        coordinates,
        utc_offset: parse_utc_offset(&time_difference),
        time_difference,
        daylight_saving_time: record.subfield_text("daylight saving time"),
        etymology: record.subfield_text("etymology"),
        note: record.note(),
    }
}

/// Hours east of UTC: "UTC-5" -> -5.0, "UTC+5.5" and "UTC+5:30" -> 5.5.
pub fn parse_utc_offset(text: &str) -> Option<f64> {
    let caps = UTC_OFFSET.captures(text)?;
    let hours: f64 = caps["h"].parse().ok()?;
    let fraction = match (caps.name("sep").map(|m| m.as_str()), caps.name("frac")) {
        (Some(":"), Some(minutes)) => minutes.as_str().parse::<f64>().ok()? / 60.0,
        (Some("."), Some(decimal)) => format!("0.{}", decimal.as_str()).parse::<f64>().ok()?,
        _ => 0.0,
    };
    let sign = if &caps["sign"] == "+" { 1.0 } else { -1.0 };
    Some(sign * (hours + fraction))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndependenceEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Independence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub description: String,
    pub events: Vec<IndependenceEvent>,
    pub note: String,
}

/// "4 July 1776 (declared independence from Great Britain); 3 September 1783
/// (recognized by Great Britain)". The first dated event is the headline date.
pub fn parse_independence(record: &Value, country: &str) -> Independence {
    let text = record.text();
    let mut result = Independence {
        note: record.note(),
        ..Independence::default()
    };
    if text.is_empty() {
        return result;
    }

    result.events = text
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(independence_event)
        .collect();

    if let Some(first) = result.events.iter().find(|e| e.year.is_some()) {
        result.date = first.date;
        result.year = first.year;
    } else {
        debug!(country, field = "Independence", text, "no date in independence text");
    }
    result.description = text;
    result
}

fn independence_event(part: &str) -> IndependenceEvent {
    let (head, detail) = split_trailing_paren(part);
    let description = detail.unwrap_or(head).trim().to_string();

    if let Some(caps) = DAY_MONTH_YEAR.captures(part) {
        let raw = format!("{} {} {}", &caps["d"], &caps["m"], &caps["y"]);
        let date = NaiveDate::parse_from_str(&raw, "%d %B %Y").ok();
        return IndependenceEvent {
            date,
            year: caps["y"].parse().ok(),
            description,
        };
    }

    let year = MONTH_YEAR
        .captures(part)
        .or_else(|| BARE_YEAR.captures(part))
        .and_then(|caps| caps["y"].parse().ok());
    IndependenceEvent {
        date: None,
        year,
        description,
    }
}
