//! Curated common alternative names.
//!
//! These cover inputs that no amount of token matching can map to the
//! official M49 names ("North Korea" shares no distinguishing word with
//! "Democratic People's Republic of Korea"). Alias hits are consulted
//! during fuzzy resolution only and are never classified exact.
//!
//! Keys are compared against the uppercased input and against each of
//! its abbreviation expansions, so "U.K. Virgin Islands" reaches the
//! "UNITED KINGDOM VIRGIN ISLANDS" entry.

pub(crate) const COMMON_ALIASES: &[(&str, &str)] = &[
    ("BURMA", "MMR"),
    ("CAPE VERDE", "CPV"),
    ("DR CONGO", "COD"),
    ("EAST TIMOR", "TLS"),
    ("HOLLAND", "NLD"),
    ("HONG KONG", "HKG"),
    ("IVORY COAST", "CIV"),
    ("MACAO", "MAC"),
    ("MACAU", "MAC"),
    ("NORTH KOREA", "PRK"),
    ("PALESTINE", "PSE"),
    ("SOUTH KOREA", "KOR"),
    ("SWAZILAND", "SWZ"),
    ("UAE", "ARE"),
    ("UK", "GBR"),
    ("UNITED KINGDOM VIRGIN ISLANDS", "VGB"),
];
