use crate::extract::{Coordinates, SplitOptions, extract_coordinates, parse_plain, split_list};
use crate::generic::parse_measure;
use crate::markup::{has_label, split_labeled};
use crate::model::{Measure, Outcome, RecordExt, subfield_with_prefix};
use crate::text::{clean, snake_case};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

static BORDER_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>.*?)\s+(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<unit>km|mi)\b\s*(?:\((?P<note>.*)\))?",
    )
    .expect("border item regex must be valid")
});
static BORDER_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?P<n>\d+)\)").expect("border count regex must be valid"));
static ELEVATION_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*(?P<num>-?\d[\d,]*(?:\.\d+)?)\s*(?P<unit>m|ft)\b")
        .expect("elevation regex must be valid")
});
static WATER_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>.*?)\s*(?:\((?P<loc>[^)]*)\))?\s*(?:-|–)?\s*(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<unit>sq\s*km|km)\b",
    )
    .expect("water body regex must be valid")
});
static LANDLOCKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blandlocked\b").expect("landlocked regex must be valid"));

pub fn parse_location(record: &Value) -> Option<String> {
    let text = record.text();
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoCoordinates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<Coordinates> for GeoCoordinates {
    fn from(value: Coordinates) -> Self {
        Self {
            latitude: Some(value.latitude),
            longitude: Some(value.longitude),
        }
    }
}

pub fn parse_geographic_coordinates(record: &Value, country: &str) -> GeoCoordinates {
    let text = record.text();
    if text.is_empty() {
        return GeoCoordinates::default();
    }
    match extract_coordinates(&text) {
        Some(coords) => coords.into(),
        None => {
            warn!(country, field = "Geographic coordinates", text, "no coordinate pair found");
            GeoCoordinates::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Area {
    pub value: f64,
    pub unit: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<Measure>,
}

pub fn parse_area(record: &Value, country: &str) -> Area {
    let mut text = record.text();
    if text.is_empty() {
        text = record.subfield_text("total");
    }

    let mut area = Area {
        notes: record.note(),
        land: record
            .subfield("land")
            .and_then(|v| parse_measure(&v.text())),
        water: record
            .subfield("water")
            .and_then(|v| parse_measure(&v.text())),
        ..Area::default()
    };

    if text.is_empty() {
        return area;
    }

    match parse_measure(&text) {
        Some(measure) => {
            area.value = measure.value;
            area.unit = measure.unit;
        }
        None => warn!(country, field = "Area", text, "area text has no number"),
    }
    area
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    pub country: String,
    pub value: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LandBoundaries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Measure>,
    pub border_countries: Vec<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_count: Option<u32>,
    pub note: String,
}

pub fn parse_land_boundaries(record: &Value, country: &str) -> LandBoundaries {
    let mut total_text = record.subfield_text("total");
    if total_text.is_empty() {
        total_text = record.text();
    }

    let mut result = LandBoundaries {
        total: parse_measure(&total_text),
        note: record.note(),
        ..LandBoundaries::default()
    };

    let Some((key, borders)) = subfield_with_prefix(record, "border countries") else {
        return result;
    };
    result.declared_count = BORDER_COUNT
        .captures(key)
        .and_then(|c| c["n"].parse::<u32>().ok());

    let text = borders.text();
    for item in split_list(&text, SplitOptions { delimiter: ';', smart: false, drop_empty: true }) {
        match BORDER_ITEM.captures(&item) {
            Some(caps) => result.border_countries.push(Border {
                country: caps["name"].trim().to_string(),
                value: parse_plain(&caps["num"]).unwrap_or_default(),
                unit: caps["unit"].to_string(),
                note: caps.name("note").map(|m| m.as_str().trim().to_string()),
            }),
            None => warn!(country, field = "Land boundaries", item, "border entry not understood"),
        }
    }

    if let Some(declared) = result.declared_count
        && declared as usize != result.border_countries.len()
    {
        warn!(
            country,
            declared,
            parsed = result.border_countries.len(),
            "border country count mismatch"
        );
    }
    result
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coastline {
    pub value: f64,
    pub unit: String,
    pub landlocked: bool,
    pub note: String,
}

pub fn parse_coastline(record: &Value, country: &str) -> Outcome<Coastline> {
    let text = record.text();
    if text.is_empty() {
        return Outcome::default();
    }

    let landlocked = LANDLOCKED.is_match(&text);
    match parse_measure(&text) {
        Some(measure) => Outcome::Parsed(Coastline {
            value: measure.value,
            unit: measure.unit,
            landlocked,
            note: record.note(),
        }),
        None if landlocked => Outcome::Parsed(Coastline {
            value: 0.0,
            unit: "km".to_string(),
            landlocked,
            note: record.note(),
        }),
        None => {
            warn!(country, field = "Coastline", text, "coastline not understood");
            Outcome::Unparsed { raw_text: text }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub value: Option<f64>,
    pub unit: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaritimeClaims {
    pub claims: BTreeMap<String, Claim>,
    pub landlocked: bool,
    pub note: String,
}

pub fn parse_maritime_claims(record: &Value, _country: &str) -> MaritimeClaims {
    let mut result = MaritimeClaims {
        landlocked: LANDLOCKED.is_match(&record.text()),
        note: record.note(),
        ..MaritimeClaims::default()
    };

    for (key, sub) in record.subfields() {
        let description = sub.text();
        if description.is_empty() {
            continue;
        }
        let measure = parse_measure(&description);
        result.claims.insert(
            snake_case(key),
            Claim {
                value: measure.as_ref().map(|m| m.value),
                unit: measure.map(|m| m.unit).unwrap_or_default(),
                description,
            },
        );
    }
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Elevation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_point: Option<ElevationPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_point: Option<ElevationPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_elevation: Option<ElevationPoint>,
    pub note: String,
}

pub fn parse_elevation(record: &Value, country: &str) -> Elevation {
    let point = |key: &str| {
        let text = record.subfield_text(key);
        if text.is_empty() {
            return None;
        }
        let parsed = parse_elevation_point(&text);
        if parsed.is_none() {
            warn!(country, field = "Elevation", key, text, "elevation point not understood");
        }
        parsed
    };

    Elevation {
        highest_point: point("highest point"),
        lowest_point: point("lowest point"),
        mean_elevation: point("mean elevation"),
        note: record.note(),
    }
}

/// "Denali 6,190 m", "Death Valley (lowest point in North America) -86 m", "760 m".
pub fn parse_elevation_point(text: &str) -> Option<ElevationPoint> {
    let caps = ELEVATION_POINT.captures(text)?;
    let raw_name = caps["name"].trim();
    let (name, location) = match raw_name.find('(') {
        Some(idx) => (
            raw_name[..idx].trim(),
            Some(raw_name[idx..].trim_matches(['(', ')', ' ']).to_string()),
        ),
        None => (raw_name, None),
    };
    Some(ElevationPoint {
        name: (!name.is_empty()).then(|| name.to_string()),
        location: location.filter(|l| !l.is_empty()),
        value: parse_plain(&caps["num"])?,
        unit: caps["unit"].to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NaturalHazards {
    pub hazards: Vec<String>,
    pub details: BTreeMap<String, String>,
    pub note: String,
}

pub fn parse_natural_hazards(record: &Value) -> NaturalHazards {
    let raw = record.raw_text();
    let (list_text, details) = if has_label(raw, "strong") {
        let labeled = split_labeled(raw, "strong");
        let details = labeled
            .blocks
            .into_iter()
            .map(|b| (snake_case(&b.label), b.content))
            .collect();
        (labeled.preamble, details)
    } else {
        (clean(raw), BTreeMap::new())
    };

    NaturalHazards {
        hazards: split_list(&list_text, SplitOptions::default()),
        details,
        note: record.note(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub value: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

pub fn parse_major_lakes(record: &Value, country: &str) -> Vec<WaterBody> {
    let mut lakes = Vec::new();
    let subfields = record.subfields();
    if subfields.is_empty() {
        lakes.extend(water_bodies(&record.text(), None, country, "Major lakes"));
    }
    for (key, sub) in subfields {
        let kind = lake_kind(key);
        lakes.extend(water_bodies(&sub.text(), kind, country, "Major lakes"));
    }
    lakes
}

fn lake_kind(key: &str) -> Option<String> {
    let lowered = key.to_ascii_lowercase();
    if lowered.starts_with("fresh") {
        Some("fresh".to_string())
    } else if lowered.starts_with("salt") {
        Some("salt".to_string())
    } else {
        None
    }
}

pub fn parse_major_rivers(record: &Value, country: &str) -> Vec<WaterBody> {
    water_bodies(&record.text(), None, country, "Major rivers")
}

fn water_bodies(text: &str, kind: Option<String>, country: &str, field: &str) -> Vec<WaterBody> {
    let mut out = Vec::new();
    for item in split_list(text, SplitOptions { delimiter: ';', smart: false, drop_empty: true }) {
        if item.to_ascii_lowercase().starts_with("note") {
            continue;
        }
        let Some(caps) = WATER_ITEM.captures(&item) else {
            warn!(country, field, item, "water body entry not understood");
            continue;
        };
        let name = caps["name"].trim().trim_end_matches(['-', '–']).trim();
        if name.is_empty() {
            continue;
        }
        out.push(WaterBody {
            name: name.to_string(),
            location: caps.name("loc").map(|m| m.as_str().trim().to_string()),
            value: parse_plain(&caps["num"]).unwrap_or_default(),
            unit: caps["unit"].split_whitespace().collect::<Vec<_>>().join(" "),
            kind: kind.clone(),
        });
    }
    out
}
