//! Domain types shared by every rando crate.
//!
//! Newtypes keep languages, trek identifiers, and source names from being
//! mixed up with arbitrary strings.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A language code such as `en` or `fr`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(pub String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Stable identifier of a trek in the web application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrekId(pub u64);

impl fmt::Display for TrekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for TrekId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Name of a record source (provenance tag) used by `--source` filtering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceName(pub String);

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SourceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SourceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Reference models that carry a pictogram image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Theme,
    RecordSource,
    Network,
    Practice,
    Accessibility,
    Difficulty,
    PoiType,
    ServiceType,
    Route,
    WeblinkCategory,
    TouristicContentCategory,
}

impl TaxonomyKind {
    /// All kinds in export order.
    pub fn all() -> &'static [TaxonomyKind] {
        &[
            TaxonomyKind::Theme,
            TaxonomyKind::RecordSource,
            TaxonomyKind::Network,
            TaxonomyKind::Practice,
            TaxonomyKind::Accessibility,
            TaxonomyKind::Difficulty,
            TaxonomyKind::PoiType,
            TaxonomyKind::ServiceType,
            TaxonomyKind::Route,
            TaxonomyKind::WeblinkCategory,
            TaxonomyKind::TouristicContentCategory,
        ]
    }

    /// Whether pictograms of this kind ship inside the per-language archive.
    ///
    /// Mobile clients never display weblink categories.
    pub fn zipped(&self) -> bool {
        !matches!(self, TaxonomyKind::WeblinkCategory)
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxonomyKind::Theme => "theme",
            TaxonomyKind::RecordSource => "record_source",
            TaxonomyKind::Network => "network",
            TaxonomyKind::Practice => "practice",
            TaxonomyKind::Accessibility => "accessibility",
            TaxonomyKind::Difficulty => "difficulty",
            TaxonomyKind::PoiType => "poi_type",
            TaxonomyKind::ServiceType => "service_type",
            TaxonomyKind::Route => "route",
            TaxonomyKind::WeblinkCategory => "weblink_category",
            TaxonomyKind::TouristicContentCategory => "touristic_content_category",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(Language::from("fr").to_string(), "fr");
        assert_eq!(TrekId(42).to_string(), "42");
        assert_eq!(SourceName::from("Source A").to_string(), "Source A");
    }

    #[test]
    fn trek_ids_order_numerically() {
        let mut ids = vec![TrekId(10), TrekId(2), TrekId(33)];
        ids.sort();
        assert_eq!(ids, vec![TrekId(2), TrekId(10), TrekId(33)]);
    }

    #[test]
    fn only_weblink_pictograms_stay_out_of_archives() {
        let unzipped: Vec<_> = TaxonomyKind::all()
            .iter()
            .filter(|k| !k.zipped())
            .collect();
        assert_eq!(unzipped, vec![&TaxonomyKind::WeblinkCategory]);
    }

    #[test]
    fn taxonomy_kind_serde_matches_display() {
        for kind in TaxonomyKind::all() {
            let json = serde_json::to_string(kind).expect("serialize");
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
