use anyhow::{Context, Result};
use factbook::world::{
    parse_world_area, parse_world_coastline, parse_world_elevation, parse_world_lakes,
    parse_world_rivers,
};
use serde_json::{Value, json};
use std::path::PathBuf;

fn world_field(field: &str) -> Result<Value> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/countries/WLD.json");
    let data: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    data["Geography"]
        .get(field)
        .cloned()
        .with_context(|| format!("WLD fixture has no {field}"))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * b.abs().max(1.0)
}

#[test]
fn area_totals_and_country_rankings() -> Result<()> {
    let area = parse_world_area(&world_field("Area")?, "WLD");
    let total = area.total.as_ref().context("total")?;
    assert!(close(total.value, 510_072_000.0), "got {}", total.value);
    assert_eq!(total.unit, "sq km");
    assert!(close(area.land.as_ref().context("land")?.value, 148_940_000.0));
    assert!(close(area.water.as_ref().context("water")?.value, 361_132_000.0));

    let largest: Vec<&str> = area.largest_countries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(largest, ["Russia", "Canada", "United States"]);
    assert_eq!(area.largest_countries[0].rank, 1);
    assert_eq!(area.largest_countries[0].value, 17_098_242.0);

    assert_eq!(area.smallest_countries.len(), 3);
    let holy_see = &area.smallest_countries[0];
    assert_eq!(holy_see.name, "Holy See");
    assert_eq!(holy_see.location.as_deref(), Some("Vatican City"));
    assert_eq!(holy_see.value, 0.44);
    assert_eq!(area.smallest_countries[2].rank, 3);

    assert_eq!(area.note, "70.9% of the world's surface is water, 29.1% is land");
    Ok(())
}

#[test]
fn elevation_points_and_mountains() -> Result<()> {
    let elevation = parse_world_elevation(&world_field("Elevation")?, "WLD");
    let highest = elevation.highest_point.as_ref().context("highest")?;
    assert_eq!(highest.name.as_deref(), Some("Mount Everest"));
    assert_eq!(highest.location.as_deref(), Some("China-Nepal"));
    assert_eq!(highest.value, 8_849.0);

    let lowest = elevation.lowest_point.as_ref().context("lowest")?;
    assert_eq!(lowest.value, -3_500.0);
    assert_eq!(elevation.mean_elevation.as_ref().map(|p| p.value), Some(840.0));

    let mountains: Vec<&str> = elevation
        .highest_mountains
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(mountains, ["Mount Everest", "Kangchenjunga"]);
    assert_eq!(elevation.highest_mountains[1].location.as_deref(), Some("India-Nepal"));
    assert_eq!(elevation.highest_mountains[1].unit, "m");
    Ok(())
}

#[test]
fn lakes_split_into_natural_lakes_and_water_bodies() -> Result<()> {
    let lakes = parse_world_lakes(&world_field("Major lakes (area sq km)")?, "WLD");
    assert_eq!(lakes.natural_lakes.len(), 2);
    let caspian = &lakes.natural_lakes[0];
    assert_eq!(caspian.name, "Caspian Sea");
    assert_eq!(
        caspian.location.as_deref(),
        Some("Azerbaijan, Iran, Kazakhstan, Russia, Turkmenistan")
    );
    assert_eq!(caspian.value, 374_000.0);
    assert_eq!(caspian.unit, "sq km");

    let bodies: Vec<&str> = lakes.water_bodies.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(bodies, ["Pacific Ocean", "Atlantic Ocean"]);
    assert_eq!(lakes.water_bodies[0].value, 168_723_000.0);
    Ok(())
}

#[test]
fn rivers_and_drainage_basins() -> Result<()> {
    let rivers = parse_world_rivers(&world_field("Major rivers (by length in km)")?, "WLD");
    let names: Vec<&str> = rivers.longest_rivers.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Nile", "Amazon", "Yangtze"]);
    assert_eq!(rivers.longest_rivers[0].unit, "km");
    assert_eq!(rivers.drainage_basins.len(), 2);
    assert_eq!(rivers.drainage_basins[1].name, "Congo");
    assert_eq!(rivers.drainage_basins[1].unit, "sq km");
    assert_eq!(rivers.drainage_basins[0].value, 7_000_000.0);
    Ok(())
}

#[test]
fn coastline_total_and_note() -> Result<()> {
    let coastline = parse_world_coastline(&world_field("Coastline")?, "WLD");
    assert_eq!(coastline.total.as_ref().map(|m| m.value), Some(356_000.0));
    assert_eq!(coastline.note, "the world coastline is not a precise figure");
    Ok(())
}

#[test]
fn empty_world_records_produce_empty_rankings() -> Result<()> {
    let area = parse_world_area(&json!({}), "WLD");
    assert!(area.total.is_none());
    assert!(area.largest_countries.is_empty());

    let lakes = serde_json::to_value(parse_world_lakes(&json!({}), "WLD"))?;
    assert_eq!(
        lakes,
        json!({"natural_lakes": [], "water_bodies": [], "note": ""})
    );
    Ok(())
}
