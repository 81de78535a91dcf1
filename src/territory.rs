use serde::Serialize;

pub const WORLD_CODE: &str = "WLD";

pub const NO_DIVISION_CODES: &[&str] = &[
    "ABW", "ATA", "CCK", "CUW", "CXR", "GIB", "GUM", "IOT", "MAC", "NFK", "PCN", "SXM",
];

pub const SECOND_ORDER_CODES: &[&str] = &["MCO", "NIU", "SGP", "TKL"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialTerritory {
    pub code: &'static str,
    pub name: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administered_by: Option<&'static str>,
    pub claimed_by: &'static [&'static str],
    pub summary: &'static str,
}

pub const SPECIAL_TERRITORIES: &[SpecialTerritory] = &[
    SpecialTerritory {
        code: "ESH",
        name: "Western Sahara",
        status: "disputed",
        administered_by: Some("Morocco"),
        claimed_by: &["Morocco", "Sahrawi Arab Democratic Republic"],
        summary: "non-self-governing territory; sovereignty unresolved between Morocco and the Polisario Front",
    },
    SpecialTerritory {
        code: "FLK",
        name: "Falkland Islands (Islas Malvinas)",
        status: "overseas_territory",
        administered_by: Some("United Kingdom"),
        claimed_by: &["Argentina"],
        summary: "overseas territory of the UK; also claimed by Argentina",
    },
    SpecialTerritory {
        code: "SGS",
        name: "South Georgia and South Sandwich Islands",
        status: "overseas_territory",
        administered_by: Some("United Kingdom"),
        claimed_by: &["Argentina"],
        summary: "overseas territory of the UK; also claimed by Argentina",
    },
    SpecialTerritory {
        code: "VAT",
        name: "Holy See (Vatican City)",
        status: "city_state",
        administered_by: None,
        claimed_by: &[],
        summary: "ecclesiastical city-state with no administrative divisions",
    },
];

pub fn is_world(code: &str) -> bool {
    code.eq_ignore_ascii_case(WORLD_CODE)
}

pub fn has_no_divisions(code: &str) -> bool {
    NO_DIVISION_CODES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

pub fn has_second_order_only(code: &str) -> bool {
    SECOND_ORDER_CODES.iter().any(|c| c.eq_ignore_ascii_case(code))
}

pub fn special_territory(code: &str) -> Option<&'static SpecialTerritory> {
    SPECIAL_TERRITORIES
        .iter()
        .find(|t| t.code.eq_ignore_ascii_case(code))
}
