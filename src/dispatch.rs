use crate::divisions::{AdministrativeDivisions, parse_administrative_divisions};
use crate::economy::{
    ExchangeRates, parse_credit_ratings, parse_exchange_rates, parse_gdp_composition,
    parse_trade_partners,
};
use crate::generic::{
    ItemKind, ItemList, MeasureField, PercentageField, ShareList, SubEntities, Subdivided,
    TextNote, YearSeries, parse_item_list, parse_measure_field, parse_percentage_field,
    parse_share_list, parse_sub_entities, parse_subdivided, parse_text_note, parse_year_series,
};
use crate::geography::{
    Area, Coastline, Elevation, GeoCoordinates, LandBoundaries, MaritimeClaims, NaturalHazards,
    parse_area, parse_coastline, parse_elevation, parse_geographic_coordinates,
    parse_land_boundaries, parse_location, parse_major_lakes, parse_major_rivers,
    parse_maritime_claims, parse_natural_hazards,
};
use crate::government::{Capital, Independence, parse_capital, parse_independence};
use crate::model::{CountryRecord, Outcome};
use crate::society::{Population, parse_population};
use crate::territory::is_world;
use crate::world::{
    WorldArea, WorldCoastline, WorldElevation, WorldLakes, WorldRivers, parse_world_area,
    parse_world_coastline, parse_world_elevation, parse_world_lakes, parse_world_rivers,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Parsed,
    Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Location,
    GeographicCoordinates,
    Area,
    LandBoundaries,
    Coastline,
    MaritimeClaims,
    Elevation,
    NaturalHazards,
    MajorLakes,
    MajorRivers,
    AdministrativeDivisions,
    Capital,
    Independence,
    ExchangeRates,
    CreditRatings,
    GdpComposition,
    TradePartners,
    Population,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    TextNote { key: &'static str },
    Subdivided { key: &'static str },
    YearSeries { unit: Option<&'static str> },
    Percentage,
    SubEntities { names: &'static [&'static str], item: ItemKind },
    Measure,
    ItemList,
    ShareList,
    Domain(Domain),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::TextNote { .. } => "text_note",
            Shape::Subdivided { .. } => "subdivided",
            Shape::YearSeries { .. } => "year_series",
            Shape::Percentage => "percentage",
            Shape::SubEntities { .. } => "sub_entities",
            Shape::Measure => "measure",
            Shape::ItemList => "item_list",
            Shape::ShareList => "share_list",
            Shape::Domain(_) => "domain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub section: &'static str,
    pub field: &'static str,
    pub shape: Shape,
}

const fn field(section: &'static str, field: &'static str, shape: Shape) -> FieldSpec {
    FieldSpec {
        section,
        field,
        shape,
    }
}

const fn text(key: &'static str) -> Shape {
    Shape::TextNote { key }
}

const fn subdivided(key: &'static str) -> Shape {
    Shape::Subdivided { key }
}

const fn series(unit: Option<&'static str>) -> Shape {
    Shape::YearSeries { unit }
}

const fn entities(item: ItemKind) -> Shape {
    Shape::SubEntities { names: &[], item }
}

const fn domain(domain: Domain) -> Shape {
    Shape::Domain(domain)
}

const GEOGRAPHY: &str = "Geography";
const PEOPLE: &str = "People and Society";
const GOVERNMENT: &str = "Government";
const ECONOMY: &str = "Economy";

pub static FIELDS: &[FieldSpec] = &[
    field("Introduction", "Background", text("background")),
    field(GEOGRAPHY, "Location", domain(Domain::Location)),
    field(GEOGRAPHY, "Geographic coordinates", domain(Domain::GeographicCoordinates)),
    field(GEOGRAPHY, "Map references", text("map_references")),
    field(GEOGRAPHY, "Area", domain(Domain::Area)),
    field(GEOGRAPHY, "Area - comparative", text("comparison")),
    field(GEOGRAPHY, "Land boundaries", domain(Domain::LandBoundaries)),
    field(GEOGRAPHY, "Coastline", domain(Domain::Coastline)),
    field(GEOGRAPHY, "Maritime claims", domain(Domain::MaritimeClaims)),
    field(GEOGRAPHY, "Climate", subdivided("climate")),
    field(GEOGRAPHY, "Terrain", subdivided("terrain")),
    field(GEOGRAPHY, "Elevation", domain(Domain::Elevation)),
    field(GEOGRAPHY, "Natural resources", Shape::ItemList),
    field(GEOGRAPHY, "Land use", entities(ItemKind::Percentage)),
    field(GEOGRAPHY, "Irrigated land", Shape::Measure),
    field(GEOGRAPHY, "Major lakes (area sq km)", domain(Domain::MajorLakes)),
    field(GEOGRAPHY, "Major rivers (by length in km)", domain(Domain::MajorRivers)),
    field(GEOGRAPHY, "Major watersheds (area sq km)", text("watersheds")),
    field(GEOGRAPHY, "Major aquifers", Shape::ItemList),
    field(GEOGRAPHY, "Population distribution", text("distribution")),
    field(GEOGRAPHY, "Natural hazards", domain(Domain::NaturalHazards)),
    field(GEOGRAPHY, "Geography - note", text("description")),
    field(PEOPLE, "Population", domain(Domain::Population)),
    field(PEOPLE, "Nationality", entities(ItemKind::Text)),
    field(PEOPLE, "Ethnic groups", Shape::ShareList),
    field(PEOPLE, "Languages", Shape::ShareList),
    field(PEOPLE, "Religions", Shape::ShareList),
    field(PEOPLE, "Age structure", entities(ItemKind::AgeBracket)),
    field(PEOPLE, "Dependency ratios", entities(ItemKind::Measure)),
    field(PEOPLE, "Median age", entities(ItemKind::Measure)),
    field(PEOPLE, "Population growth rate", Shape::Percentage),
    field(PEOPLE, "Birth rate", Shape::Measure),
    field(PEOPLE, "Death rate", Shape::Measure),
    field(PEOPLE, "Net migration rate", Shape::Measure),
    field(PEOPLE, "Urbanization", entities(ItemKind::Percentage)),
    field(PEOPLE, "Major urban areas - population", text("urban_areas")),
    field(PEOPLE, "Sex ratio", entities(ItemKind::Measure)),
    field(PEOPLE, "Mother's mean age at first birth", Shape::Measure),
    field(PEOPLE, "Maternal mortality ratio", Shape::Measure),
    field(PEOPLE, "Infant mortality rate", entities(ItemKind::Measure)),
    field(PEOPLE, "Life expectancy at birth", entities(ItemKind::Measure)),
    field(PEOPLE, "Total fertility rate", Shape::Measure),
    field(PEOPLE, "Obesity - adult prevalence rate", Shape::Percentage),
    field(PEOPLE, "Current health expenditure", Shape::Percentage),
    field(PEOPLE, "Physician density", Shape::Measure),
    field(PEOPLE, "Hospital bed density", Shape::Measure),
    field(PEOPLE, "Drinking water source", entities(ItemKind::Percentage)),
    field(PEOPLE, "Literacy", entities(ItemKind::Percentage)),
    field(
        PEOPLE,
        "School life expectancy (primary to tertiary education)",
        entities(ItemKind::Measure),
    ),
    field(PEOPLE, "Education expenditures", Shape::Percentage),
    field("Environment", "Environmental issues", Shape::ItemList),
    field("Environment", "Total water withdrawal", entities(ItemKind::Measure)),
    field(GOVERNMENT, "Country name", entities(ItemKind::Text)),
    field(GOVERNMENT, "Government type", text("government_type")),
    field(GOVERNMENT, "Capital", domain(Domain::Capital)),
    field(GOVERNMENT, "Administrative divisions", domain(Domain::AdministrativeDivisions)),
    field(GOVERNMENT, "Dependent areas", Shape::ItemList),
    field(GOVERNMENT, "Independence", domain(Domain::Independence)),
    field(GOVERNMENT, "National holiday", text("holiday")),
    field(GOVERNMENT, "Constitution", entities(ItemKind::Text)),
    field(GOVERNMENT, "Legal system", text("legal_system")),
    field(GOVERNMENT, "Citizenship", entities(ItemKind::Text)),
    field(GOVERNMENT, "Suffrage", text("suffrage")),
    field(GOVERNMENT, "Executive branch", entities(ItemKind::Text)),
    field(GOVERNMENT, "Legislative branch", entities(ItemKind::Text)),
    field(GOVERNMENT, "Judicial branch", entities(ItemKind::Text)),
    field(GOVERNMENT, "Political parties", Shape::ItemList),
    field(GOVERNMENT, "Flag", text("flag_description")),
    field(GOVERNMENT, "National symbol(s)", Shape::ItemList),
    field(GOVERNMENT, "National anthem", entities(ItemKind::Text)),
    field(ECONOMY, "Economic overview", text("overview")),
    field(ECONOMY, "Real GDP (purchasing power parity)", series(None)),
    field(ECONOMY, "Real GDP growth rate", series(Some("%"))),
    field(ECONOMY, "Real GDP per capita", series(None)),
    field(ECONOMY, "GDP (official exchange rate)", Shape::Measure),
    field(ECONOMY, "Inflation rate (consumer prices)", series(Some("%"))),
    field(ECONOMY, "Credit ratings", domain(Domain::CreditRatings)),
    field(
        ECONOMY,
        "GDP - composition, by sector of origin",
        domain(Domain::GdpComposition),
    ),
    field(ECONOMY, "GDP - composition, by end use", domain(Domain::GdpComposition)),
    field(ECONOMY, "Agricultural products", Shape::ItemList),
    field(ECONOMY, "Industries", Shape::ItemList),
    field(ECONOMY, "Industrial production growth rate", Shape::Percentage),
    field(ECONOMY, "Labor force", Shape::Measure),
    field(ECONOMY, "Unemployment rate", series(Some("%"))),
    field(ECONOMY, "Youth unemployment rate (ages 15-24)", entities(ItemKind::Percentage)),
    field(ECONOMY, "Population below poverty line", Shape::Percentage),
    field(
        ECONOMY,
        "Gini Index coefficient - distribution of family income",
        series(None),
    ),
    field(
        ECONOMY,
        "Household income or consumption by percentage share",
        entities(ItemKind::Percentage),
    ),
    field(ECONOMY, "Remittances", series(Some("%"))),
    field(ECONOMY, "Budget", entities(ItemKind::Measure)),
    field(ECONOMY, "Public debt", series(Some("%"))),
    field(ECONOMY, "Taxes and other revenues", Shape::Percentage),
    field(ECONOMY, "Current account balance", series(None)),
    field(ECONOMY, "Exports", series(None)),
    field(ECONOMY, "Exports - partners", domain(Domain::TradePartners)),
    field(ECONOMY, "Exports - commodities", Shape::ItemList),
    field(ECONOMY, "Imports", series(None)),
    field(ECONOMY, "Imports - partners", domain(Domain::TradePartners)),
    field(ECONOMY, "Imports - commodities", Shape::ItemList),
    field(ECONOMY, "Reserves of foreign exchange and gold", series(None)),
    field(ECONOMY, "Debt - external", series(None)),
    field(ECONOMY, "Exchange rates", domain(Domain::ExchangeRates)),
    field("Energy", "Electricity access", entities(ItemKind::Percentage)),
    field("Energy", "Electricity", entities(ItemKind::Measure)),
    field("Communications", "Telephones - fixed lines", entities(ItemKind::Measure)),
    field("Communications", "Internet users", entities(ItemKind::Measure)),
    field("Communications", "Internet country code", text("code")),
    field("Transportation", "Airports", Shape::Measure),
    field("Transportation", "Railways", entities(ItemKind::Measure)),
    field("Transportation", "Roadways", entities(ItemKind::Measure)),
    field("Transportation", "Waterways", Shape::Measure),
    field("Military and Security", "Military expenditures", series(Some("%"))),
    field("Military and Security", "Military and security forces", text("forces")),
    field(
        "Transnational Issues",
        "Refugees and internally displaced persons",
        entities(ItemKind::Text),
    ),
];

pub const FALLBACK_SHAPE: Shape = Shape::TextNote { key: "description" };

pub fn lookup(section: &str, field: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| {
        spec.section.eq_ignore_ascii_case(section.trim()) && spec.field.eq_ignore_ascii_case(field.trim())
    })
}

pub fn shape_for(section: &str, field: &str) -> Shape {
    match lookup(section, field) {
        Some(spec) => spec.shape,
        None => {
            debug!(section, field, "unregistered field; using text and note");
            FALLBACK_SHAPE
        }
    }
}

// Parses one field record. Never fails: anything unusable yields the
// field's default shape.
pub fn parse_field(record: &Value, country: &str, section: &str, field: &str, mode: ParseMode) -> Value {
    if mode == ParseMode::Original {
        return record.clone();
    }
    run_shape(shape_for(section, field), record, country, field)
}

pub fn run_shape(shape: Shape, record: &Value, country: &str, field: &str) -> Value {
    let value = match shape {
        Shape::TextNote { key } => serde_json::to_value(parse_text_note(record, key)),
        Shape::Subdivided { key } => serde_json::to_value(parse_subdivided(record, key)),
        Shape::YearSeries { unit } => serde_json::to_value(parse_year_series(record, unit)),
        Shape::Percentage => serde_json::to_value(parse_percentage_field(record)),
        Shape::SubEntities { names, item } => {
            serde_json::to_value(parse_sub_entities(record, names, item))
        }
        Shape::Measure => serde_json::to_value(parse_measure_field(record)),
        Shape::ItemList => serde_json::to_value(parse_item_list(record)),
        Shape::ShareList => serde_json::to_value(parse_share_list(record)),
        Shape::Domain(domain) => run_domain(domain, record, country),
    };

    match value {
        Ok(value) => value,
        Err(err) => {
            error!(country, field, error = %err, "result did not serialize; using default");
            default_value(shape, country)
        }
    }
}

fn run_domain(domain: Domain, record: &Value, country: &str) -> serde_json::Result<Value> {
    let world = is_world(country);
    match domain {
        Domain::Location => serde_json::to_value(parse_location(record)),
        Domain::GeographicCoordinates => {
            serde_json::to_value(parse_geographic_coordinates(record, country))
        }
        Domain::Area if world => serde_json::to_value(parse_world_area(record, country)),
        Domain::Area => serde_json::to_value(parse_area(record, country)),
        Domain::LandBoundaries => serde_json::to_value(parse_land_boundaries(record, country)),
        Domain::Coastline if world => serde_json::to_value(parse_world_coastline(record, country)),
        Domain::Coastline => serde_json::to_value(parse_coastline(record, country)),
        Domain::MaritimeClaims => serde_json::to_value(parse_maritime_claims(record, country)),
        Domain::Elevation if world => serde_json::to_value(parse_world_elevation(record, country)),
        Domain::Elevation => serde_json::to_value(parse_elevation(record, country)),
        Domain::NaturalHazards => serde_json::to_value(parse_natural_hazards(record)),
        Domain::MajorLakes if world => serde_json::to_value(parse_world_lakes(record, country)),
        Domain::MajorLakes => serde_json::to_value(parse_major_lakes(record, country)),
        Domain::MajorRivers if world => serde_json::to_value(parse_world_rivers(record, country)),
        Domain::MajorRivers => serde_json::to_value(parse_major_rivers(record, country)),
        Domain::AdministrativeDivisions => {
            serde_json::to_value(parse_administrative_divisions(record, country))
        }
        Domain::Capital => serde_json::to_value(parse_capital(record, country)),
        Domain::Independence => serde_json::to_value(parse_independence(record, country)),
        Domain::ExchangeRates => serde_json::to_value(parse_exchange_rates(record, country)),
        Domain::CreditRatings => serde_json::to_value(parse_credit_ratings(record)),
        Domain::GdpComposition => serde_json::to_value(parse_gdp_composition(record)),
        Domain::TradePartners => serde_json::to_value(parse_trade_partners(record)),
        Domain::Population => serde_json::to_value(parse_population(record, country)),
    }
}

pub fn default_value(shape: Shape, country: &str) -> Value {
    let world = is_world(country);
    let value = match shape {
        Shape::TextNote { key } => serde_json::to_value(empty_text_note(key)),
        Shape::Subdivided { key } => serde_json::to_value(Subdivided::Plain(empty_text_note(key))),
        Shape::YearSeries { .. } => serde_json::to_value(YearSeries::default()),
        Shape::Percentage => serde_json::to_value(PercentageField::default()),
        Shape::SubEntities { .. } => serde_json::to_value(SubEntities::default()),
        Shape::Measure => serde_json::to_value(Outcome::<MeasureField>::default()),
        Shape::ItemList => serde_json::to_value(ItemList::default()),
        Shape::ShareList => serde_json::to_value(ShareList::default()),
        Shape::Domain(domain) => match domain {
            Domain::Location => Ok(Value::Null),
            Domain::GeographicCoordinates => serde_json::to_value(GeoCoordinates::default()),
            Domain::Area if world => serde_json::to_value(WorldArea::default()),
            Domain::Area => serde_json::to_value(Area::default()),
            Domain::LandBoundaries => serde_json::to_value(LandBoundaries::default()),
            Domain::Coastline if world => serde_json::to_value(WorldCoastline::default()),
            Domain::Coastline => serde_json::to_value(Outcome::<Coastline>::default()),
            Domain::MaritimeClaims => serde_json::to_value(MaritimeClaims::default()),
            Domain::Elevation if world => serde_json::to_value(WorldElevation::default()),
            Domain::Elevation => serde_json::to_value(Elevation::default()),
            Domain::NaturalHazards => serde_json::to_value(NaturalHazards::default()),
            Domain::MajorLakes if world => serde_json::to_value(WorldLakes::default()),
            Domain::MajorRivers if world => serde_json::to_value(WorldRivers::default()),
            Domain::MajorLakes | Domain::MajorRivers => Ok(Value::Array(Vec::new())),
            Domain::AdministrativeDivisions => {
                serde_json::to_value(AdministrativeDivisions::default())
            }
            Domain::Capital => serde_json::to_value(Capital::default()),
            Domain::Independence => serde_json::to_value(Independence::default()),
            Domain::ExchangeRates => serde_json::to_value(ExchangeRates::default()),
            Domain::CreditRatings | Domain::GdpComposition => {
                serde_json::to_value(SubEntities::default())
            }
            Domain::TradePartners => serde_json::to_value(ShareList::default()),
            Domain::Population => serde_json::to_value(Population::default()),
        },
    };
    value.unwrap_or(Value::Null)
}

fn empty_text_note(key: &str) -> TextNote {
    TextNote {
        key: key.to_string(),
        ..TextNote::default()
    }
}

pub fn extract_country(record: &CountryRecord) -> Value {
    let mut sections = Map::new();
    for spec in FIELDS {
        let Some(field_record) = record.field(spec.section, spec.field) else {
            continue;
        };
        let parsed = run_shape(spec.shape, field_record, &record.code, spec.field);
        let entry = sections
            .entry(spec.section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(fields) = entry {
            fields.insert(spec.field.to_string(), parsed);
        }
    }
    debug!(country = %record.code, sections = sections.len(), "country extracted");
    Value::Object(sections)
}
