use crate::generic::parse_measure;
use crate::geography::{ElevationPoint, parse_elevation_point};
use crate::model::{Measure, RecordExt};
use crate::ranking::{RankedEntry, parse_ranked_entries, split_by_anchors};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

const NOTE: &str = "note:";
const TOTAL: &str = "total:";
const LAND: &str = "land:";
const WATER: &str = "water:";
const LARGEST_COUNTRIES: &str = "top ten largest countries";
const SMALLEST_COUNTRIES: &str = "top ten smallest countries";
const HIGHEST_POINT: &str = "highest point:";
const LOWEST_POINT: &str = "lowest point:";
const MEAN_ELEVATION: &str = "mean elevation:";
const HIGHEST_MOUNTAINS: &str = "top ten highest mountains";
const NATURAL_LAKES: &str = "top ten largest natural lakes";
const WATER_BODIES: &str = "top ten largest water bodies";
const LONGEST_RIVERS: &str = "top ten longest rivers";
const DRAINAGE_BASINS: &str = "top ten largest drainage basins";

fn world_prose(record: &Value) -> String {
    let mut parts = Vec::new();
    let text = record.text();
    if !text.is_empty() {
        parts.push(text);
    }
    for (key, sub) in record.subfields() {
        let text = sub.text();
        if !text.is_empty() {
            parts.push(format!("{key}: {text}"));
        }
    }
    let note = record.note();
    if !note.is_empty() {
        parts.push(format!("{NOTE} {note}"));
    }
    parts.join("; ")
}

struct Runs<'a> {
    runs: Vec<(&'static str, &'a str)>,
}

impl<'a> Runs<'a> {
    fn new(prose: &'a str, anchors: &[&'static str]) -> Self {
        Self {
            runs: split_by_anchors(prose, anchors),
        }
    }

    fn get(&self, anchor: &str) -> Option<&'a str> {
        self.runs
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|(_, body)| *body)
            .filter(|body| !body.is_empty())
    }

    fn measure(&self, anchor: &str) -> Option<Measure> {
        self.get(anchor).and_then(parse_measure)
    }

    fn ranking(&self, anchor: &str, country: &str, field: &str) -> Vec<RankedEntry> {
        let Some(block) = self.get(anchor) else {
            return Vec::new();
        };
        let entries = parse_ranked_entries(block);
        if entries.is_empty() {
            warn!(country, field, anchor, "ranking block without entries");
        }
        entries
    }

    fn note(&self) -> String {
        self.get(NOTE).unwrap_or_default().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldArea {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land: Option<Measure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water: Option<Measure>,
    pub largest_countries: Vec<RankedEntry>,
    pub smallest_countries: Vec<RankedEntry>,
    pub note: String,
}

pub fn parse_world_area(record: &Value, country: &str) -> WorldArea {
    let prose = world_prose(record);
    let runs = Runs::new(
        &prose,
        &[TOTAL, LAND, WATER, NOTE, LARGEST_COUNTRIES, SMALLEST_COUNTRIES],
    );
    WorldArea {
        total: runs.measure(TOTAL),
        land: runs.measure(LAND),
        water: runs.measure(WATER),
        largest_countries: runs.ranking(LARGEST_COUNTRIES, country, "Area"),
        smallest_countries: runs.ranking(SMALLEST_COUNTRIES, country, "Area"),
        note: runs.note(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldCoastline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Measure>,
    pub note: String,
}

pub fn parse_world_coastline(record: &Value, country: &str) -> WorldCoastline {
    let prose = world_prose(record);
    let runs = Runs::new(&prose, &[NOTE]);
    let head = match prose.split_once(';') {
        Some((head, _)) => head,
        None => prose.as_str(),
    };
    let total = parse_measure(head);
    if total.is_none() && !head.is_empty() {
        debug!(country, field = "Coastline", head, "world coastline without a total");
    }
    WorldCoastline {
        total,
        note: runs.note(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldElevation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_point: Option<ElevationPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_point: Option<ElevationPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_elevation: Option<ElevationPoint>,
    pub highest_mountains: Vec<RankedEntry>,
    pub note: String,
}

pub fn parse_world_elevation(record: &Value, country: &str) -> WorldElevation {
    let prose = world_prose(record);
    let runs = Runs::new(
        &prose,
        &[HIGHEST_POINT, LOWEST_POINT, MEAN_ELEVATION, NOTE, HIGHEST_MOUNTAINS],
    );
    let point = |anchor: &str| runs.get(anchor).and_then(parse_elevation_point);
    WorldElevation {
        highest_point: point(HIGHEST_POINT),
        lowest_point: point(LOWEST_POINT),
        mean_elevation: point(MEAN_ELEVATION),
        highest_mountains: runs.ranking(HIGHEST_MOUNTAINS, country, "Elevation"),
        note: runs.note(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldLakes {
    pub natural_lakes: Vec<RankedEntry>,
    pub water_bodies: Vec<RankedEntry>,
    pub note: String,
}

pub fn parse_world_lakes(record: &Value, country: &str) -> WorldLakes {
    let prose = world_prose(record);
    let runs = Runs::new(&prose, &[NATURAL_LAKES, WATER_BODIES, NOTE]);
    WorldLakes {
        natural_lakes: runs.ranking(NATURAL_LAKES, country, "Major lakes"),
        water_bodies: runs.ranking(WATER_BODIES, country, "Major lakes"),
        note: runs.note(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorldRivers {
    pub longest_rivers: Vec<RankedEntry>,
    pub drainage_basins: Vec<RankedEntry>,
    pub note: String,
}

pub fn parse_world_rivers(record: &Value, country: &str) -> WorldRivers {
    let prose = world_prose(record);
    let runs = Runs::new(&prose, &[LONGEST_RIVERS, DRAINAGE_BASINS, NOTE]);
    WorldRivers {
        longest_rivers: runs.ranking(LONGEST_RIVERS, country, "Major rivers"),
        drainage_basins: runs.ranking(DRAINAGE_BASINS, country, "Major rivers"),
        note: runs.note(),
    }
}
