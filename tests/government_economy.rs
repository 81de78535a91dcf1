use anyhow::Result;
use chrono::NaiveDate;
use factbook::economy::{
    parse_credit_ratings, parse_exchange_rates, parse_gdp_composition, parse_trade_partners,
};
use factbook::government::{parse_capital, parse_independence, parse_utc_offset};
use factbook::society::parse_population;
use serde_json::json;

#[test]
fn capital_reads_name_coordinates_and_offset() -> Result<()> {
    let capital = parse_capital(
        &json!({
            "name": {"text": "Washington, DC"},
            "geographic coordinates": {"text": "38 53 N, 77 02 W"},
            "time difference": {"text": "UTC-5 (during Standard Time)"},
            "etymology": {"text": "named after George Washington"}
        }),
        "USA",
    );
    assert_eq!(capital.name, "Washington, DC");
    assert_eq!(capital.name_note, None);
    let latitude = capital.coordinates.latitude.expect("latitude");
    let longitude = capital.coordinates.longitude.expect("longitude");
    assert!((latitude - 38.883333).abs() < 1e-4);
    assert!((longitude + 77.033333).abs() < 1e-4);
    assert_eq!(capital.utc_offset, Some(-5.0));
    assert_eq!(capital.etymology, "named after George Washington");

    let json = serde_json::to_value(&capital)?;
    assert!(json.get("daylight_saving_time").is_none());
    assert_eq!(json["time_difference"], "UTC-5 (during Standard Time)");
    Ok(())
}

#[test]
fn capital_name_note_and_missing_coordinates() {
    let capital = parse_capital(
        &json!({"name": {"text": "Amsterdam (constitutional capital)"}}),
        "NLD",
    );
    assert_eq!(capital.name, "Amsterdam");
    assert_eq!(capital.name_note.as_deref(), Some("constitutional capital"));
    assert_eq!(capital.coordinates.latitude, None);
    assert_eq!(capital.utc_offset, None);
}

#[test]
fn utc_offsets_accept_fractions_and_unicode_minus() {
    assert_eq!(parse_utc_offset("UTC-5"), Some(-5.0));
    assert_eq!(parse_utc_offset("UTC+5.5"), Some(5.5));
    assert_eq!(parse_utc_offset("UTC+5:30 (10.5 hours ahead)"), Some(5.5));
    assert_eq!(parse_utc_offset("UTC\u{2212}3"), Some(-3.0));
    assert_eq!(parse_utc_offset("UTC+0"), Some(0.0));
    assert_eq!(parse_utc_offset("varies by region"), None);
}

#[test]
fn independence_events_carry_dates() -> Result<()> {
    let independence = parse_independence(
        &json!({"text": "4 July 1776 (declared independence from Great Britain); 3 September 1783 (recognized by Great Britain)"}),
        "USA",
    );
    assert_eq!(independence.date, NaiveDate::from_ymd_opt(1776, 7, 4));
    assert_eq!(independence.year, Some(1776));
    assert_eq!(independence.events.len(), 2);
    assert_eq!(
        independence.events[0].description,
        "declared independence from Great Britain"
    );
    assert_eq!(independence.events[1].date, NaiveDate::from_ymd_opt(1783, 9, 3));

    let json = serde_json::to_value(&independence)?;
    assert_eq!(json["date"], "1776-07-04");

    let partial = parse_independence(&json!({"text": "August 1960 (from France)"}), "CIV");
    assert_eq!(partial.date, None);
    assert_eq!(partial.year, Some(1960));
    assert_eq!(partial.events[0].description, "from France");

    let undated = parse_independence(
        &json!({"text": "none (territory of the US with commonwealth status)"}),
        "PRI",
    );
    assert_eq!(undated.year, None);
    assert_eq!(undated.events.len(), 1);

    let empty = parse_independence(&json!({}), "USA");
    assert!(empty.events.is_empty());
    assert!(empty.description.is_empty());
    Ok(())
}

#[test]
fn exchange_rates_take_currency_from_undated_key() -> Result<()> {
    let rates = parse_exchange_rates(
        &json!({
            "Currency": {"text": "Canadian dollars (CAD) per US dollar -"},
            "Exchange rates 2023": {"text": "1.35 (2023 est.)"},
            "Exchange rates 2022": {"text": "1.302 (2022 est.)"}
        }),
        "CAN",
    );
    assert_eq!(rates.currency, "Canadian dollars (CAD) per US dollar");
    let years: Vec<i32> = rates.series.entries.iter().map(|e| e.year).collect();
    assert_eq!(years, [2022, 2023]);
    assert_eq!(rates.series.entries[1].value, 1.35);

    let json = serde_json::to_value(&rates)?;
    assert_eq!(json["currency"], "Canadian dollars (CAD) per US dollar");
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));

    let key_only = parse_exchange_rates(
        &json!({
            "euros per US dollar -": {"text": ""},
            "Exchange rates 2023": {"text": "0.924 (2023 est.)"}
        }),
        "DEU",
    );
    assert_eq!(key_only.currency, "euros per US dollar");
    Ok(())
}

#[test]
fn ratings_composition_and_partners() -> Result<()> {
    let ratings = serde_json::to_value(parse_credit_ratings(&json!({
        "Fitch rating": {"text": "AA+ (2011)"},
        "Standard & Poors rating": {"text": "AA+ (2011)"}
    })))?;
    assert_eq!(ratings["standard_poors_rating"]["rating"], "AA+");
    assert_eq!(ratings["standard_poors_rating"]["year"], 2011);

    let composition = serde_json::to_value(parse_gdp_composition(&json!({
        "agriculture": {"text": "0.9% (2017 est.)"},
        "industry": {"text": "19.1% (2017 est.)"}
    })))?;
    assert_eq!(composition["agriculture"]["percentage"], 0.9);
    assert_eq!(composition["industry"]["year"], 2017);

    let partners = parse_trade_partners(&json!({"text": "Canada 17%, Mexico 16%, China 7% (2022)"}));
    assert_eq!(partners.entries[1].name, "Mexico");
    assert_eq!(partners.entries[1].percentage, Some(16.0));
    Ok(())
}

#[test]
fn population_from_text_and_subfields() {
    let population = parse_population(&json!({"text": "338,289,857 (2023 est.)"}), "USA");
    assert_eq!(population.total, 338_289_857.0);
    assert_eq!(population.year, Some(2023));
    assert!(population.is_estimate);

    let split = parse_population(
        &json!({
            "total": {"text": "1,000,000 (2024 est.)"},
            "male": {"text": "480,000"},
            "female": {"text": "520,000"}
        }),
        "XYZ",
    );
    assert_eq!(split.total, 1_000_000.0);
    assert_eq!(split.male, Some(480_000.0));
    assert_eq!(split.female, Some(520_000.0));

    let missing = parse_population(&json!({"text": "uninhabited"}), "ATF");
    assert_eq!(missing.total, 0.0);
    assert_eq!(missing.year, None);
}
