use anyhow::Result;
use factbook::config::{AppConfig, load_config};
use factbook::dispatch::ParseMode;
use factbook::inspect::{InspectOptions, run_inspection};
use factbook::loader::{DataDir, LoadError};
use factbook::pipeline::{
    FieldQuery, batch_field, batch_records, extract_country_file, parse_country_field,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

#[test]
fn parse_one_field_from_disk() -> Result<()> {
    let env = setup_fixture_env()?;
    let config = env.config();

    let area = parse_country_field(&config, "usa", &query("Geography", "Area"))?;
    assert_eq!(area["value"], json!(9833517.0));
    assert_eq!(area["notes"], "includes only the 50 states and District of Columbia");

    let original = parse_country_field(
        &config,
        "CAN",
        &FieldQuery {
            mode: ParseMode::Original,
            ..query("Geography", "Coastline")
        },
    )?;
    assert_eq!(original, json!({"text": "202,080 km"}));

    let missing = parse_country_field(&config, "MCO", &query("Geography", "Area"))?;
    assert_eq!(missing, json!({"value": 0.0, "unit": "", "notes": ""}));

    assert!(parse_country_field(&config, "ZZZ", &query("Geography", "Area")).is_err());
    Ok(())
}

#[test]
fn batch_reports_every_file_sorted() -> Result<()> {
    let env = setup_fixture_env()?;
    fs::write(env.data_dir.join("BAD.json"), "{ not json")?;
    let config = env.config();

    let results = batch_field(&config, &query("Geography", "Area"))?;
    let codes: Vec<&str> = results.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(codes, ["BAD", "CAN", "ESH", "MCO", "USA", "WLD"]);

    let bad = &results[0];
    assert!(!bad.ok);
    assert!(bad.error.as_deref().is_some_and(|e| e.contains("BAD.json")));
    assert_eq!(bad.result, json!({"value": 0.0, "unit": "", "notes": ""}));

    let canada = &results[1];
    assert!(canada.ok);
    assert_eq!(canada.result["value"], json!(9984670.0));

    let world = &results[5];
    assert!(world.ok);
    assert_eq!(world.result["smallest_countries"][1]["name"], "Monaco");
    Ok(())
}

#[test]
fn batch_of_in_memory_records() {
    let records = vec![
        ("usa".to_string(), json!({"Geography": {"Coastline": {"text": "19,924 km"}}})),
        ("AAA".to_string(), json!(["not", "an", "object"])),
        ("CZE".to_string(), json!({"Geography": {"Coastline": {"text": "0 km (landlocked)"}}})),
    ];
    let results = batch_records(&records, &query("Geography", "Coastline"));
    let codes: Vec<&str> = results.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(codes, ["AAA", "CZE", "USA"]);

    assert!(!results[0].ok);
    assert_eq!(results[0].error.as_deref(), Some("country data is not a JSON object"));
    assert_eq!(
        results[0].result,
        json!({"value": 0.0, "unit": "", "landlocked": false, "note": ""})
    );
    assert_eq!(results[1].result["landlocked"], true);
    assert_eq!(results[2].result["value"], json!(19924.0));
}

#[test]
fn batch_keeps_going_past_unreadable_text() {
    let coastline = |text: &str| json!({"Geography": {"Coastline": {"text": text}}});
    let records = vec![
        ("NOR".to_string(), coastline("25,148 km")),
        ("SJM".to_string(), coastline("unknown")),
        ("AUT".to_string(), coastline("0 km (landlocked)")),
        ("CAN".to_string(), coastline("202,080 km")),
    ];
    let results = batch_records(&records, &query("Geography", "Coastline"));
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.ok && r.error.is_none()));

    let odd = results.iter().find(|r| r.country == "SJM").expect("SJM result");
    assert_eq!(odd.result, json!({"raw_text": "unknown"}));

    let values: Vec<&Value> = results.iter().map(|r| &r.result["value"]).collect();
    assert_eq!(values[0], &json!(0.0));
    assert_eq!(values[1], &json!(202080.0));
    assert_eq!(values[2], &json!(25148.0));
}

#[test]
fn whole_country_extraction_uses_world_code_mapping() -> Result<()> {
    let env = setup_fixture_env()?;
    fs::rename(env.data_dir.join("WLD.json"), env.data_dir.join("XWL.json"))?;
    let mut config = env.config();
    config.world_code = "XWL".to_string();

    let world = extract_country_file(&config, "xwl")?;
    assert_eq!(
        world["Geography"]["Major rivers (by length in km)"]["longest_rivers"][0]["name"],
        "Nile"
    );

    let usa = extract_country_file(&config, "USA")?;
    assert_eq!(usa["Government"]["Capital"]["utc_offset"], json!(-5.0));
    Ok(())
}

#[test]
fn inspection_samples_matching_countries() -> Result<()> {
    let env = setup_fixture_env()?;
    let config = env.config();

    let options = InspectOptions::from_config(&config, "Geography", "Area");
    let report = run_inspection(&config, &options)?;
    assert_eq!(report.shape, "domain");
    assert_eq!(report.countries_matched, 5);
    assert_eq!(report.sampled, 5);
    assert_eq!(report.passed, 3);
    assert_eq!(report.failed, 2);
    assert!(report.lines.contains(&"PASS USA Geography/Area".to_string()));
    assert!(report.lines.contains(&"FAIL ESH Geography/Area: field missing".to_string()));

    let narrow = InspectOptions {
        country_glob: "u*".to_string(),
        ..options.clone()
    };
    let report = run_inspection(&config, &narrow)?;
    assert_eq!(report.sampled, 1);
    assert_eq!(report.samples[0].country, "USA");

    let limited = InspectOptions {
        sample_limit: 2,
        ..options
    };
    let report = run_inspection(&config, &limited)?;
    assert_eq!(report.countries_matched, 5);
    assert_eq!(report.sampled, 2);
    Ok(())
}

#[test]
fn config_defaults_and_validation() -> Result<()> {
    let temp = tempdir()?;

    let defaults = load_config(&temp.path().join("missing.toml"))?;
    assert_eq!(defaults.world_code, "WLD");
    assert_eq!(defaults.inspect.sample_limit, 5);
    assert_eq!(defaults.log.filter, "info");

    let valid = temp.path().join("factbook.toml");
    fs::write(
        &valid,
        r#"
data_dir = "countries"

[inspect]
sample_limit = 12
country_glob = "[A-M]*"

[limits]
max_text_len = 2048
"#,
    )?;
    let config = load_config(&valid)?;
    assert_eq!(config.data_dir, PathBuf::from("countries"));
    assert_eq!(config.inspect.sample_limit, 12);
    assert_eq!(config.limits.max_text_len, 2048);
    assert_eq!(config.world_code, "WLD");

    let invalid = temp.path().join("invalid.toml");
    fs::write(&invalid, "[inspect]\nsample_limit = 0\n")?;
    let err = load_config(&invalid).expect_err("sample_limit of zero is rejected");
    assert!(format!("{err:#}").contains("sample_limit"));

    let broken = temp.path().join("broken.toml");
    fs::write(&broken, "data_dir = [")?;
    assert!(load_config(&broken).is_err());
    Ok(())
}

#[test]
fn loader_finds_codes_and_limits_text() -> Result<()> {
    let env = setup_fixture_env()?;
    let data = DataDir::new(&env.data_dir);

    let codes: Vec<String> = data.countries()?.into_iter().map(|(code, _)| code).collect();
    assert_eq!(codes, ["CAN", "ESH", "MCO", "USA", "WLD"]);
    assert_eq!(data.load("can")?.code, "CAN");

    match data.load("ZZZ") {
        Err(LoadError::NotFound { code, .. }) => assert_eq!(code, "ZZZ"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(
        DataDir::new(env.data_dir.join("nope")).countries(),
        Err(LoadError::MissingDir(_))
    ));

    fs::write(env.data_dir.join("ARR.json"), "[1, 2, 3]")?;
    assert!(matches!(data.load("ARR"), Err(LoadError::NotAnObject(_))));

    let short = DataDir::new(&env.data_dir).with_max_text_len(10);
    let usa = short.load("USA")?;
    assert_eq!(
        usa.field("Geography", "Location").and_then(|v| v["text"].as_str()),
        Some("North Amer")
    );
    Ok(())
}

fn query(section: &str, field: &str) -> FieldQuery {
    FieldQuery {
        section: section.to_string(),
        field: field.to_string(),
        mode: ParseMode::Parsed,
    }
}

struct FixtureEnv {
    _temp: TempDir,
    data_dir: PathBuf,
}

impl FixtureEnv {
    fn config(&self) -> AppConfig {
        AppConfig {
            data_dir: self.data_dir.clone(),
            ..AppConfig::default()
        }
    }
}

fn setup_fixture_env() -> Result<FixtureEnv> {
    let temp = tempdir()?;
    let fixture_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let data_dir = temp.path().join("countries");
    copy_dir(&fixture_root.join("countries"), &data_dir)?;

    Ok(FixtureEnv {
        _temp: temp,
        data_dir,
    })
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else {
            fs::copy(src_path, dst_path)?;
        }
    }

    Ok(())
}
