use crate::extract::parse_plain;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

// Names allow letters, spaces, apostrophes, periods and hyphens. Digits and
// other punctuation inside a name are not supported.
static RANKED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<name>\p{L}[\p{L}\s'’.\-]*?)\s*(?:\((?P<loc>[^)]*)\))?\s*(?:-|–)?\s*(?P<num>-?\d[\d,]*(?:\.\d+)?)\s*(?P<mag>million|thousand)?\s*(?P<unit>sq\s*km|km|m)\b",
    )
    .expect("ranked entry regex must be valid")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub value: f64,
    pub unit: String,
}

// A run ends where the next anchor of any kind begins. Missing anchors are skipped.
pub fn split_by_anchors<'a, 'b>(text: &'a str, anchors: &[&'b str]) -> Vec<(&'b str, &'a str)> {
    let mut found: Vec<(usize, usize, &'b str)> = anchors
        .iter()
        .filter_map(|anchor| {
            let pattern = Regex::new(&format!(r"(?i)\b{}", regex::escape(anchor))).ok()?;
            pattern.find(text).map(|m| (m.start(), m.end(), *anchor))
        })
        .collect();
    found.sort_by_key(|(start, _, _)| *start);

    let mut runs = Vec::with_capacity(found.len());
    for (idx, (_, body_start, anchor)) in found.iter().enumerate() {
        let end = found
            .get(idx + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(text.len());
        let body = text[*body_start..end.max(*body_start)]
            .trim_start_matches([':', ' '])
            .trim_end_matches([';', ' ', ',']);
        runs.push((*anchor, body));
    }

    let mut ordered = Vec::with_capacity(runs.len());
    for anchor in anchors {
        if let Some(run) = runs.iter().find(|(a, _)| a == anchor) {
            ordered.push(*run);
        }
    }
    ordered
}

pub fn parse_ranked_entries(block: &str) -> Vec<RankedEntry> {
    let mut entries = Vec::new();
    for caps in RANKED_ENTRY.captures_iter(block) {
        let Some(value) = caps.name("num").and_then(|m| parse_plain(m.as_str())) else {
            continue;
        };
        let factor = match caps.name("mag").map(|m| m.as_str()) {
            Some("million") => 1e6,
            Some("thousand") => 1e3,
            _ => 1.0,
        };
        let name = caps["name"].trim().trim_end_matches(['-', '–']).trim();
        if name.is_empty() {
            continue;
        }
        entries.push(RankedEntry {
            rank: entries.len() + 1,
            name: name.to_string(),
            location: caps
                .name("loc")
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            value: value * factor,
            unit: normalize_unit(&caps["unit"]),
        });
    }

    if entries.is_empty() && !block.trim().is_empty() {
        debug!(block, "ranked block without entries");
    }
    entries
}

fn normalize_unit(unit: &str) -> String {
    unit.split_whitespace().collect::<Vec<_>>().join(" ")
}
