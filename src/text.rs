use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

pub const MAX_TEXT_LEN: usize = 64 * 1024;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?\s*(?:br|p|div|li|ul|ol)\b[^>]*>").expect("block tag regex must be valid")
});
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex must be valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must be valid"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]{2,8});")
        .expect("entity regex must be valid")
});

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", " "),
    ("ndash", "–"),
    ("mdash", "—"),
    ("deg", "°"),
    ("aacute", "á"),
    ("Aacute", "Á"),
    ("agrave", "à"),
    ("Agrave", "À"),
    ("acirc", "â"),
    ("Acirc", "Â"),
    ("atilde", "ã"),
    ("Atilde", "Ã"),
    ("auml", "ä"),
    ("Auml", "Ä"),
    ("ccedil", "ç"),
    ("Ccedil", "Ç"),
    ("eacute", "é"),
    ("Eacute", "É"),
    ("egrave", "è"),
    ("Egrave", "È"),
    ("ecirc", "ê"),
    ("Ecirc", "Ê"),
    ("iacute", "í"),
    ("Iacute", "Í"),
    ("ntilde", "ñ"),
    ("Ntilde", "Ñ"),
    ("oacute", "ó"),
    ("Oacute", "Ó"),
    ("ocirc", "ô"),
    ("Ocirc", "Ô"),
    ("otilde", "õ"),
    ("Otilde", "Õ"),
    ("ouml", "ö"),
    ("Ouml", "Ö"),
    ("uacute", "ú"),
    ("Uacute", "Ú"),
    ("uuml", "ü"),
    ("Uuml", "Ü"),
];

pub fn clean(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Every pass only shortens the text, so this settles. Double-escaped input
    // ("&amp;eacute;") and tags split across entities need more than one pass.
    let mut working = bounded(text).to_string();
    loop {
        let decoded = decode_entities(&working);
        let stripped = BLOCK_TAG.replace_all(&decoded, " ");
        let stripped = ANY_TAG.replace_all(&stripped, "").into_owned();
        if stripped == working {
            break;
        }
        working = stripped;
    }

    WHITESPACE.replace_all(&working, " ").trim().to_string()
}

pub fn clean_lines(text: &str) -> Vec<String> {
    let decoded = decode_entities(bounded(text));
    BLOCK_TAG
        .split(&decoded)
        .map(clean)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn clean_value(value: &Value) -> String {
    match value {
        Value::String(text) => clean(text),
        _ => String::new(),
    }
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            decode_entity(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|c| c.to_string());
    }

    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, literal)| (*literal).to_string())
}

pub fn bounded(text: &str) -> &str {
    truncate_at(text, MAX_TEXT_LEN)
}

pub fn truncate_at(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    warn!(len = text.len(), kept = end, "oversized text truncated");
    &text[..end]
}

/// Lowercases and joins words with underscores: "Moody's rating" -> "moodys_rating".
pub fn snake_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else if ch == '\'' || ch == '’' {
            continue;
        } else {
            pending_sep = true;
        }
    }
    out
}

pub fn split_trailing_paren(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    if !trimmed.ends_with(')') {
        return (trimmed, None);
    }

    let mut depth = 0usize;
    for (idx, ch) in trimmed.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let inner = &trimmed[idx + 1..trimmed.len() - 1];
                    return (trimmed[..idx].trim_end(), Some(inner.trim()));
                }
            }
            _ => {}
        }
    }
    (trimmed, None)
}
