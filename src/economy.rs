use crate::generic::{
    ItemKind, ShareList, SubEntities, YearSeries, parse_share_list, parse_sub_entities,
    parse_year_series,
};
use crate::model::RecordExt;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static DATED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}$").expect("dated key regex must be valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeRates {
    pub currency: String,
    #[serde(flatten)]
    pub series: YearSeries,
}

pub fn parse_exchange_rates(record: &Value, country: &str) -> ExchangeRates {
    let currency = record
        .subfields()
        .into_iter()
        .find(|(key, _)| !DATED_KEY.is_match(key))
        .map(|(key, sub)| {
            let text = sub.text();
            let label = if text.is_empty() { key } else { text.as_str() };
            label.trim_end_matches(['-', ':', ' ']).trim().to_string()
        })
        .unwrap_or_default();

    let series = parse_year_series(record, None);
    if currency.is_empty() && !series.entries.is_empty() {
        debug!(country, field = "Exchange rates", "rates without a currency label");
    }

    ExchangeRates { currency, series }
}

/// Agency ratings keyed by agency: `{"fitch_rating": {"rating": "AA+", "year": 2011}}`.
pub fn parse_credit_ratings(record: &Value) -> SubEntities {
    parse_sub_entities(record, &[], ItemKind::Rating)
}

pub fn parse_gdp_composition(record: &Value) -> SubEntities {
    parse_sub_entities(record, &[], ItemKind::Percentage)
}

pub fn parse_trade_partners(record: &Value) -> ShareList {
    parse_share_list(record)
}
