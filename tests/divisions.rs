use anyhow::{Context, Result};
use factbook::divisions::{AdministrativeDivisions, parse_administrative_divisions, parse_composition};
use serde_json::{Value, json};
use std::path::PathBuf;

fn fixture_field(code: &str) -> Result<Value> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/countries")
        .join(format!("{code}.json"));
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let data: Value = serde_json::from_str(&raw)?;
    data["Government"]["Administrative divisions"]
        .as_object()
        .map(|o| Value::Object(o.clone()))
        .context("fixture has no administrative divisions")
}

#[test]
fn labeled_categories_are_counted() -> Result<()> {
    let parsed = parse_administrative_divisions(&fixture_field("CAN")?, "CAN");
    let AdministrativeDivisions::Categorized { categories, total_divisions, .. } = &parsed else {
        panic!("expected categorized divisions, got {parsed:?}");
    };
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "provinces");
    assert_eq!(categories[0].divisions, ["Alberta", "British Columbia", "Manitoba"]);
    assert_eq!(categories[1].name, "territories");
    assert_eq!(categories[1].count, 3);
    assert_eq!(*total_divisions, 6);
    assert_eq!(parsed.total_divisions(), 6);

    let json = serde_json::to_value(&parsed)?;
    assert_eq!(json["type"], "categorized");
    Ok(())
}

#[test]
fn count_phrase_and_list() -> Result<()> {
    let parsed = parse_administrative_divisions(&fixture_field("USA")?, "USA");
    let AdministrativeDivisions::SimpleList {
        count,
        unit_type,
        composition,
        divisions,
        total_divisions,
        ..
    } = &parsed
    else {
        panic!("expected a simple list, got {parsed:?}");
    };
    assert_eq!(*count, Some(51));
    assert_eq!(unit_type.as_deref(), Some("states"));
    let composition = composition.as_ref().expect("composition");
    assert_eq!(composition.primary.count, 50);
    assert_eq!(composition.secondary.as_ref().map(|s| s.unit_type.as_str()), Some("district"));
    assert_eq!(
        divisions,
        &["Alabama", "Alaska", "Arizona", "District of Columbia", "Wyoming"]
    );
    assert_eq!(*total_divisions, 5);
    Ok(())
}

#[test]
fn list_without_count_phrase_keeps_every_item() {
    let parsed = parse_administrative_divisions(
        &json!({"text": "Andijon, Buxoro, Farg'ona, Jizzax"}),
        "UZB",
    );
    assert_eq!(parsed.total_divisions(), 4);

    let semicolons = parse_administrative_divisions(
        &json!({"text": "Aileu; Ainaro; Baucau; Bobonaro"}),
        "TLS",
    );
    let AdministrativeDivisions::SimpleList { divisions, count, .. } = semicolons else {
        panic!("expected a simple list");
    };
    assert_eq!(count, None);
    assert_eq!(divisions, ["Aileu", "Ainaro", "Baucau", "Bobonaro"]);
}

#[test]
fn composition_accepts_number_words() {
    let parts = parse_composition("twelve parishes").expect("composition");
    assert_eq!(parts.primary.count, 12);
    assert_eq!(parts.primary.unit_type, "parishes");
    assert!(parts.secondary.is_none());
    assert!(parse_composition("Alberta, British Columbia").is_none());
}

#[test]
fn count_phrase_with_local_names() {
    let parsed = parse_administrative_divisions(
        &json!({"text": "16 regions (regiones, singular - region); Aysen, Antofagasta, Araucania"}),
        "CHL",
    );
    let AdministrativeDivisions::SimpleList { count, unit_type, divisions, .. } = parsed else {
        panic!("expected a simple list");
    };
    assert_eq!(count, Some(16));
    assert_eq!(unit_type.as_deref(), Some("regions"));
    assert_eq!(divisions, ["Aysen", "Antofagasta", "Araucania"]);

    let parsed = parse_administrative_divisions(
        &json!({"text": "13 states (negeri, singular - negeri) and 3 federal territories (wilayah persekutuan, singular - wilayah persekutuan); Johor, Kedah, Kuala Lumpur*"}),
        "MYS",
    );
    let AdministrativeDivisions::SimpleList { count, composition, divisions, .. } = parsed else {
        panic!("expected a simple list");
    };
    assert_eq!(count, Some(16));
    let composition = composition.expect("composition");
    assert_eq!(composition.primary.count, 13);
    assert_eq!(composition.primary.unit_type, "states");
    let secondary = composition.secondary.expect("secondary part");
    assert_eq!(secondary.count, 3);
    assert_eq!(secondary.unit_type, "federal territories");
    assert_eq!(divisions, ["Johor", "Kedah", "Kuala Lumpur"]);
}

#[test]
fn second_order_units_are_listed() -> Result<()> {
    let parsed = parse_administrative_divisions(&fixture_field("MCO")?, "MCO");
    let AdministrativeDivisions::SecondOrder { count, unit_type, divisions, .. } = &parsed else {
        panic!("expected second-order divisions, got {parsed:?}");
    };
    assert_eq!(*count, Some(10));
    assert_eq!(unit_type, "quarters");
    assert_eq!(divisions.len(), 10);
    assert_eq!(divisions[0], "Fontvieille");
    assert_eq!(divisions[9], "Larvotto");
    Ok(())
}

#[test]
fn special_and_missing_divisions() -> Result<()> {
    let parsed = parse_administrative_divisions(&fixture_field("ESH")?, "ESH");
    let AdministrativeDivisions::Special { territory, description, .. } = &parsed else {
        panic!("expected a special territory, got {parsed:?}");
    };
    assert_eq!(territory.name, "Western Sahara");
    assert_eq!(description, "none (under de facto control of Morocco)");
    assert_eq!(serde_json::to_value(&parsed)?["territory"]["administered_by"], "Morocco");

    let aruba = parse_administrative_divisions(&json!({"text": "none (part of the Kingdom of the Netherlands)"}), "ABW");
    assert_eq!(
        serde_json::to_value(&aruba)?,
        json!({"type": "none", "description": "none (part of the Kingdom of the Netherlands)", "note": ""})
    );

    let empty = parse_administrative_divisions(&json!({"text": ""}), "USA");
    assert_eq!(empty, AdministrativeDivisions::Empty);
    assert_eq!(serde_json::to_value(&empty)?, json!({"type": "empty"}));
    Ok(())
}
