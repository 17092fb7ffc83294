//! Static racing catalog
//!
//! Country codes, race categories, and the runner form-field lists shared by the
//! completeness heuristic and the supplemental merger. All of this is fixed
//! configuration; nothing here is mutated at runtime.

/// Whether races from a country are trusted as complete from the primary endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Primary endpoint carries full form data
    Domestic,
    /// Primary endpoint often omits form data; completeness heuristic applies
    International,
}

/// Country known to the affiliate API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub region: Region,
}

/// Race category (code accepted by the meetings endpoint)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: &'static str,
    pub name: &'static str,
}

const fn domestic(code: &'static str, name: &'static str) -> Country {
    Country { code, name, region: Region::Domestic }
}

const fn international(code: &'static str, name: &'static str) -> Country {
    Country { code, name, region: Region::International }
}

/// Country catalog, sorted by code. Interactive selection indexes into this
/// order (1-based).
pub static COUNTRIES: &[Country] = &[
    international("ARE", "United Arab Emirates"),
    international("ARG", "Argentina"),
    domestic("AUS", "Australia"),
    international("BRA", "Brazil"),
    international("CAN", "Canada"),
    international("CHL", "Chile"),
    international("DEU", "Germany"),
    international("FRA", "France"),
    international("GBR", "Great Britain"),
    international("HKG", "Hong Kong"),
    international("IND", "India"),
    international("IRL", "Ireland"),
    international("JPN", "Japan"),
    international("KOR", "South Korea"),
    international("MAC", "Macau"),
    international("MYS", "Malaysia"),
    international("NOR", "Norway"),
    international("NZL", "New Zealand"),
    international("SGP", "Singapore"),
    international("SWE", "Sweden"),
    international("URY", "Uruguay"),
    international("USA", "United States"),
    international("ZAF", "South Africa"),
];

/// Race categories in the order the API documents them
pub static CATEGORIES: &[Category] = &[
    Category { code: "T", name: "Thoroughbred" },
    Category { code: "H", name: "Harness" },
    Category { code: "G", name: "Greyhound" },
];

/// Countries queried when the selection resolves to nothing
pub const DEFAULT_COUNTRIES: &[&str] = &["AUS"];

/// Categories queried when the selection resolves to nothing
pub const DEFAULT_CATEGORIES: &[&str] = &["T", "G"];

/// Fields sampled by the completeness heuristic. A runner carrying none of
/// these is treated as missing its form.
pub const SIGNIFICANT_FORM_FIELDS: &[&str] = &[
    "form_comment",
    "last_twenty_starts",
    "past_performances",
    "form_indicators",
];

/// Fields copied from the per-runner endpoint into a base runner
pub const MERGEABLE_FORM_FIELDS: &[&str] = &[
    "form_comment",
    "last_twenty_starts",
    "past_performances",
    "form_indicators",
    "best_time",
    "speedmap",
    "jockey_stats",
    "trainer_stats",
    "gear",
    "flucs",
    "class_level",
    "recent_stats",
    "track_stats",
    "distance_stats",
];

/// Look up a country by code (case-insensitive)
pub fn country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Look up a category by code (case-insensitive)
pub fn category(code: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// True when `code` names a country in the international partition
pub fn is_international(code: &str) -> bool {
    country(code).is_some_and(|c| c.region == Region::International)
}
