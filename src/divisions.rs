use crate::extract::{SplitOptions, split_list, split_outside_parens};
use crate::markup::{has_label, split_labeled};
use crate::model::RecordExt;
use crate::territory::{SpecialTerritory, has_no_divisions, has_second_order_only, special_territory};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

static COMPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<n1>\d+|[a-z]+)\s+(?P<t1>[a-z][a-z\s\-]*?)\*?(?:\s*\([^)]*\))?(?:\s*,?\s+and\s+(?P<n2>\d+|[a-z]+)\s+(?P<t2>[a-z][a-z\s\-]*?)\*?(?:\s*\([^)]*\))?)?\s*$",
    )
    .expect("composition regex must be valid")
});
static SECOND_ORDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bbut\s+there\s+are\s+(?P<n>\d+|[a-z]+)\s+(?P<type>[a-z][a-z\s\-]*?)(?:\s*\([^)]*\))?\s*(?:[:;,]|\bnamed\b|\bat\b|$)(?P<rest>.*)$",
    )
    .expect("second order regex must be valid")
});
static NONE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^none\b").expect("none regex must be valid"));
static NOTE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[;.]?\s*note\s*[:\-–].*$").expect("note regex must be valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub divisions: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionPart {
    pub count: u32,
    #[serde(rename = "type")]
    pub unit_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub primary: CompositionPart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<CompositionPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdministrativeDivisions {
    Categorized {
        categories: Vec<Category>,
        total_divisions: usize,
        note: String,
    },
    SimpleList {
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        composition: Option<Composition>,
        divisions: Vec<String>,
        total_divisions: usize,
        note: String,
    },
    #[serde(rename = "none")]
    NoDivisions {
        description: String,
        note: String,
    },
    SecondOrder {
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        unit_type: String,
        divisions: Vec<String>,
        total_divisions: usize,
        description: String,
        note: String,
    },
    Special {
        territory: &'static SpecialTerritory,
        description: String,
        note: String,
    },
    Empty,
}

impl Default for AdministrativeDivisions {
    fn default() -> Self {
        AdministrativeDivisions::Empty
    }
}

impl AdministrativeDivisions {
    pub fn total_divisions(&self) -> usize {
        match self {
            AdministrativeDivisions::Categorized { total_divisions, .. }
            | AdministrativeDivisions::SimpleList { total_divisions, .. }
            | AdministrativeDivisions::SecondOrder { total_divisions, .. } => *total_divisions,
            _ => 0,
        }
    }
}

pub fn parse_administrative_divisions(record: &Value, country: &str) -> AdministrativeDivisions {
    let raw = record.raw_text();
    let text = record.text();
    let note = record.note();

    if let Some(territory) = special_territory(country) {
        return AdministrativeDivisions::Special {
            territory,
            description: text,
            note,
        };
    }

    if text.is_empty() {
        return AdministrativeDivisions::Empty;
    }

    if has_second_order_only(country) || (NONE_PREFIX.is_match(&text) && SECOND_ORDER.is_match(&text)) {
        if let Some(divisions) = second_order(&text, &note) {
            return divisions;
        }
        warn!(country, field = "Administrative divisions", text, "second-order clause not found");
    }

    if has_no_divisions(country) || NONE_PREFIX.is_match(&text) {
        return AdministrativeDivisions::NoDivisions {
            description: text,
            note,
        };
    }

    if has_label(raw, "strong") {
        return categorized(raw, note);
    }

    simple_list(&text, note)
}

fn categorized(raw: &str, note: String) -> AdministrativeDivisions {
    let labeled = split_labeled(raw, "strong");
    let categories: Vec<Category> = labeled
        .blocks
        .into_iter()
        .filter(|b| !b.label.eq_ignore_ascii_case("note"))
        .map(|block| {
            let divisions = division_items(&block.content);
            Category {
                name: block.label,
                count: divisions.len(),
                divisions,
            }
        })
        .collect();
    let total_divisions = categories.iter().map(|c| c.count).sum();
    AdministrativeDivisions::Categorized {
        categories,
        total_divisions,
        note,
    }
}

fn simple_list(text: &str, note: String) -> AdministrativeDivisions {
    // Local-name parentheticals in the head may carry their own separators.
    let (head, body) = match split_outside_parens(text, ';').split_first() {
        Some((head, rest)) if !rest.is_empty() => (head.trim().to_string(), rest.join(";")),
        _ => (String::new(), text.to_string()),
    };

    let composition = parse_composition(&head);
    let (count, unit_type) = match &composition {
        Some(c) => {
            let secondary = c.secondary.as_ref().map_or(0, |s| s.count);
            (Some(c.primary.count + secondary), Some(c.primary.unit_type.clone()))
        }
        None => (None, None),
    };

    // Without a count phrase the head is the first division.
    let list_text = if composition.is_none() && !head.is_empty() {
        text
    } else {
        body.as_str()
    };
    let divisions = division_items(list_text.trim());
    if let Some(expected) = count
        && expected as usize != divisions.len()
    {
        debug!(expected, found = divisions.len(), "division count differs from list");
    }

    AdministrativeDivisions::SimpleList {
        count,
        unit_type,
        composition,
        total_divisions: divisions.len(),
        divisions,
        note,
    }
}

/// "50 states and 1 district*" or "16 regions (regiones, singular - region)".
pub fn parse_composition(head: &str) -> Option<Composition> {
    let caps = COMPOSITION.captures(head.trim())?;
    let part = |n: &str, t: &str| {
        Some(CompositionPart {
            count: parse_count(caps.name(n)?.as_str())?,
            unit_type: caps.name(t)?.as_str().trim().to_string(),
        })
    };
    Some(Composition {
        primary: part("n1", "t1")?,
        secondary: part("n2", "t2"),
    })
}

fn second_order(text: &str, note: &str) -> Option<AdministrativeDivisions> {
    let caps = SECOND_ORDER.captures(text)?;
    let unit_type = caps["type"].trim().to_string();
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let rest = NOTE_TAIL.replace(rest, "");
    let divisions = division_items(rest.trim().trim_start_matches([':', ',']));
    Some(AdministrativeDivisions::SecondOrder {
        count: parse_count(&caps["n"]),
        unit_type,
        total_divisions: divisions.len(),
        divisions,
        description: text.to_string(),
        note: note.to_string(),
    })
}

fn division_items(text: &str) -> Vec<String> {
    let text = NOTE_TAIL.replace(text, "");
    let delimiter = if text.contains(',') { ',' } else { ';' };
    split_list(
        &text,
        SplitOptions {
            delimiter,
            smart: false,
            drop_empty: true,
        },
    )
    .into_iter()
    .map(|item| item.trim_end_matches('*').trim().to_string())
    .filter(|item| !item.is_empty())
    .collect()
}

fn parse_count(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    const WORDS: [&str; 21] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
        "nineteen", "twenty",
    ];
    let lowered = raw.to_ascii_lowercase();
    WORDS.iter().position(|w| *w == lowered).map(|n| n as u32)
}
