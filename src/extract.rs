use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

const NUMBER: &str = r"-?\d[\d,]*(?:\.\d+)?|-?\.\d+";

static SENTINEL_NONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\W*(?:na|n/a|not available)\b").expect("n/a regex must be valid")
});
static SENTINEL_NEGLIGIBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnegligible\b").expect("negligible regex must be valid"));
static SENTINEL_TRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btrace\b").expect("trace regex must be valid"));
static SENTINEL_LESS_THAN_ONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bless\s+than\s+1(?:[^\d.,]|[.,](?:\D|$)|$)").expect("less-than regex must be valid")
});
static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<num>{NUMBER})")).expect("number regex must be valid")
});
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^(?P<a>{NUMBER})\s*(?:-|–|to\b)\s*(?P<b>{NUMBER})"))
        .expect("range regex must be valid")
});
static BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bbetween\s+(?P<a>{NUMBER})\s+and\s+(?P<b>{NUMBER})"
    ))
    .expect("between regex must be valid")
});
static MAGNITUDE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(thousand|million|billion|trillion|mn|bn|tn)\b")
        .expect("magnitude regex must be valid")
});
static MAGNITUDE_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\s*)([mbt])\b").expect("magnitude letter regex must be valid")
});
static CURRENCY_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$€£¥]\s*-?$").expect("currency regex must be valid"));
static NEGATIVE_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*[$€£¥]\s*$").expect("currency regex must be valid"));

static PCT_YEAR_EST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?P<n>{NUMBER})\s*%\s*\((?P<y>\d{{4}})\s*est\.?\)"))
        .expect("percentage regex must be valid")
});
static PCT_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<n>{NUMBER})\s*%\s*\((?P<y>\d{{4}})\)"))
        .expect("percentage regex must be valid")
});
static PERCENT_WORD_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?P<n>{NUMBER})\s*percent\s*\((?P<y>\d{{4}})\)"))
        .expect("percentage regex must be valid")
});
static PCT_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?P<n>{NUMBER})\s*%")).expect("percentage regex must be valid")
});
static PERCENT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?P<n>{NUMBER})\s*percent")).expect("percentage regex must be valid")
});
static YEAR_IN_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?:[^)]*?\b)?(?P<y>(?:19|20)\d{2})\b[^)]*\)").expect("year regex must be valid")
});
static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?P<p>(?:19|20)\d{2}\s*[-–]\s*\d{2,4})(?:\s*est\.?)?\)")
        .expect("period regex must be valid")
});
static EST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)est").expect("est regex must be valid"));

static DMS_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<lat_d>\d{1,2})\s+(?P<lat_m>\d{1,2}(?:\.\d+)?)\s*(?P<ns>[NS])\s*,\s*(?P<lon_d>\d{1,3})\s+(?P<lon_m>\d{1,2}(?:\.\d+)?)\s*(?P<ew>[EW])",
    )
    .expect("coordinate regex must be valid")
});
static DECIMAL_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<lat>-?\d{1,2}\.\d+)\s*,\s*(?P<lon>-?\d{1,3}\.\d+)")
        .expect("decimal coordinate regex must be valid")
});

static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d{1,2}\.\s+").expect("marker regex must be valid"));
static LEADING_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-–]\s+").expect("dash regex must be valid"));
static LEADING_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|or)\s+").expect("connector regex must be valid"));
static TRAILING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[,\s]*(?:etc\.?|among others)\s*$").expect("filler regex must be valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericValue {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub is_range: bool,
}

impl NumericValue {
    fn single(value: f64) -> Self {
        Self {
            value,
            min: None,
            max: None,
            is_range: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NumericOptions<'a> {
    pub unit: Option<&'a str>,
    pub allow_ranges: bool,
}

impl Default for NumericOptions<'_> {
    fn default() -> Self {
        Self {
            unit: None,
            allow_ranges: true,
        }
    }
}

pub fn extract_number(text: &str) -> Option<f64> {
    extract_numeric(text, NumericOptions::default()).map(|n| n.value)
}

pub fn extract_numeric(text: &str, options: NumericOptions<'_>) -> Option<NumericValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let owned;
    let text = match options.unit.filter(|u| !u.is_empty()) {
        Some(unit) => {
            owned = remove_case_insensitive(trimmed, unit);
            owned.as_str()
        }
        None => trimmed,
    };

    if SENTINEL_NONE.is_match(text) {
        return None;
    }
    if SENTINEL_LESS_THAN_ONE.is_match(text) {
        return Some(NumericValue::single(0.5));
    }

    let first = FIRST_NUMBER.captures(text).and_then(|c| c.name("num"));
    let number_at = first.map_or(text.len(), |m| m.start());
    if let Some(value) = leading_sentinel(text, number_at) {
        return Some(NumericValue::single(value));
    }
    let Some(first) = first else {
        debug!(text, "no number found");
        return None;
    };

    let before = &text[..first.start()];
    let sign = if NEGATIVE_CURRENCY.is_match(before) { -1.0 } else { 1.0 };

    if options.allow_ranges
        && let Some((lo, hi, end)) = leading_range(text, first.start())
    {
        let factor = sign * magnitude_after(before, &text[end..]);
        let (lo, hi) = (lo * factor, hi * factor);
        return Some(NumericValue {
            value: (lo + hi) / 2.0,
            min: Some(lo),
            max: Some(hi),
            is_range: true,
        });
    }

    let base = parse_plain(first.as_str())?;
    let factor = sign * magnitude_after(before, &text[first.end()..]);
    Some(NumericValue::single(base * factor))
}

// "negligible (2023 est.)": a sentinel ahead of the first number wins over it.
fn leading_sentinel(text: &str, number_at: usize) -> Option<f64> {
    let sentinels: [(&Regex, f64); 2] = [(&SENTINEL_NEGLIGIBLE, 0.0), (&SENTINEL_TRACE, 0.001)];
    sentinels
        .into_iter()
        .find(|(re, _)| re.find(text).is_some_and(|m| m.start() < number_at))
        .map(|(_, value)| value)
}

fn leading_range(text: &str, start: usize) -> Option<(f64, f64, usize)> {
    if let Some(caps) = BETWEEN.captures(text)
        && let (Some(a), Some(b)) = (caps.name("a"), caps.name("b"))
        && a.start() == start
    {
        return Some((parse_plain(a.as_str())?, parse_plain(b.as_str())?, b.end()));
    }

    let caps = RANGE.captures(&text[start..])?;
    let (a, b) = (caps.name("a")?, caps.name("b")?);
    if looks_like_year_span(a.as_str(), b.as_str()) {
        return None;
    }
    Some((
        parse_plain(a.as_str())?,
        parse_plain(b.as_str())?,
        start + b.end(),
    ))
}

fn looks_like_year_span(a: &str, b: &str) -> bool {
    let is_year = |s: &str| s.len() == 4 && s.starts_with(['1', '2']) && s.parse::<u32>().is_ok();
    is_year(a) && (b.len() == 2 || is_year(b)) && !b.starts_with('-')
}

fn magnitude_after(before: &str, after: &str) -> f64 {
    if let Some(caps) = MAGNITUDE_WORD.captures(after) {
        return magnitude_factor(&caps[1]);
    }

    if let Some(caps) = MAGNITUDE_LETTER.captures(after) {
        let glued = caps[1].is_empty();
        if glued || CURRENCY_BEFORE.is_match(before) {
            return magnitude_factor(&caps[2]);
        }
    }
    1.0
}

fn magnitude_factor(word: &str) -> f64 {
    match word.to_ascii_lowercase().as_str() {
        "thousand" => 1e3,
        "million" | "mn" | "m" => 1e6,
        "billion" | "bn" | "b" => 1e9,
        "trillion" | "tn" | "t" => 1e12,
        _ => 1.0,
    }
}

pub fn parse_plain(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    cleaned.trim().parse::<f64>().ok()
}

fn remove_case_insensitive(text: &str, needle: &str) -> String {
    let pattern = format!("(?i){}", regex::escape(needle));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(_) => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentage {
    pub value: f64,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub is_estimate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub original_text: String,
}

pub fn extract_percentage(text: &str) -> Option<Percentage> {
    let text = text.trim();
    let patterns: [&Regex; 5] = [
        &PCT_YEAR_EST,
        &PCT_YEAR,
        &PERCENT_WORD_YEAR,
        &PCT_PLAIN,
        &PERCENT_WORD,
    ];

    let mut found = None;
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text)
            && let Some(percentage) = caps.name("n").and_then(|m| parse_plain(m.as_str()))
        {
            let year = caps.name("y").and_then(|m| m.as_str().parse::<i32>().ok());
            found = Some((percentage, year));
            break;
        }
    }

    let (percentage, year) = match found {
        Some(hit) => hit,
        None => {
            let first = FIRST_NUMBER.captures(text)?.name("num")?;
            debug!(text, "no percentage pattern; using first number");
            (parse_plain(first.as_str())?, None)
        }
    };

    let period = PERIOD.captures(text).map(|c| c["p"].replace(' ', ""));
    let year = year.or_else(|| {
        if period.is_some() {
            return None;
        }
        YEAR_IN_PARENS
            .captures(text)
            .and_then(|c| c["y"].parse::<i32>().ok())
    });

    Some(Percentage {
        value: percentage / 100.0,
        percentage,
        year,
        is_estimate: EST.is_match(text),
        period,
        original_text: text.to_string(),
    })
}

pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_IN_PARENS
        .captures(text)
        .and_then(|c| c["y"].parse::<i32>().ok())
}

pub fn is_estimate(text: &str) -> bool {
    EST.is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn extract_coordinates(text: &str) -> Option<Coordinates> {
    if let Some(caps) = DMS_PAIR.captures(text) {
        let part = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<f64>().ok());
        let (lat_d, lat_m, lon_d, lon_m) =
            (part("lat_d")?, part("lat_m")?, part("lon_d")?, part("lon_m")?);
        let mut latitude = lat_d + lat_m / 60.0;
        let mut longitude = lon_d + lon_m / 60.0;
        if caps["ns"].eq_ignore_ascii_case("s") {
            latitude = -latitude;
        }
        if caps["ew"].eq_ignore_ascii_case("w") {
            longitude = -longitude;
        }
        return Some(Coordinates {
            latitude: round_to(latitude, 6),
            longitude: round_to(longitude, 6),
        });
    }

    let caps = DECIMAL_PAIR.captures(text)?;
    Some(Coordinates {
        latitude: caps["lat"].parse().ok()?,
        longitude: caps["lon"].parse().ok()?,
    })
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    pub delimiter: char,
    pub smart: bool,
    pub drop_empty: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            smart: true,
            drop_empty: true,
        }
    }
}

const CANDIDATE_DELIMITERS: [char; 7] = [';', ',', '|', '\n', '•', '–', '-'];

pub fn split_list(text: &str, options: SplitOptions) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let delimiter = if options.smart {
        choose_delimiter(text).unwrap_or(options.delimiter)
    } else {
        options.delimiter
    };

    let mut normalized = text.replace('•', &delimiter.to_string());
    normalized = LEADING_DASH
        .replace_all(&normalized, delimiter.to_string().as_str())
        .into_owned();
    normalized = NUMBERED_MARKER
        .replace_all(&normalized, format!("{delimiter} ").as_str())
        .into_owned();

    split_outside_parens(&normalized, delimiter)
        .into_iter()
        .map(|item| tidy_item(&item))
        .filter(|item| !(options.drop_empty && item.is_empty()))
        .collect()
}

fn choose_delimiter(text: &str) -> Option<char> {
    let mut best: Option<(char, usize)> = None;
    for candidate in CANDIDATE_DELIMITERS {
        let count = text.matches(candidate).count();
        if count == 0 {
            continue;
        }
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((candidate, count));
        }
    }
    best.map(|(c, _)| c)
}

pub fn split_outside_parens(text: &str, delimiter: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == delimiter && depth == 0 {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    items.push(current);
    items
}

fn tidy_item(item: &str) -> String {
    let item = item.trim();
    let item = LEADING_CONNECTOR.replace(item, "");
    let item = TRAILING_FILLER.replace(&item, "");
    item.trim().trim_end_matches([';', ',']).trim().to_string()
}
