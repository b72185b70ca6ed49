//! Content catalog: the publishable objects exported by the web application.
//!
//! The sync pipeline only ever reads the catalog. Every query that feeds an
//! export returns treks sorted by identifier so archive contents stay
//! deterministic from one run to the next.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::{Language, SourceName, TaxonomyKind, TrekId};

/// An attached picture and its resized (thumbnailed) variant, both relative
/// to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub original: String,
    pub resized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InformationDesk {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A published sub-object of a trek: a point of interest or a touristic content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedContent {
    pub id: u64,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

/// A trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trek {
    pub id: TrekId,
    pub slug: String,
    /// Languages the trek is published in.
    #[serde(default)]
    pub published: BTreeSet<Language>,
    #[serde(default)]
    pub parents: Vec<TrekId>,
    #[serde(default)]
    pub sources: Vec<SourceName>,
    #[serde(default)]
    pub deleted: bool,
    /// WGS84 `[lng, lat]` vertices of the trek line.
    #[serde(default)]
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub information_desks: Vec<InformationDesk>,
    #[serde(default)]
    pub pois: Vec<RelatedContent>,
    #[serde(default)]
    pub touristic_contents: Vec<RelatedContent>,
}

impl Trek {
    pub fn is_published(&self, lang: &Language) -> bool {
        self.published.contains(lang)
    }

    pub fn any_published(&self, langs: &[Language]) -> bool {
        langs.iter().any(|l| self.is_published(l))
    }

    fn matches_sources(&self, sources: Option<&[SourceName]>) -> bool {
        match sources {
            None => true,
            Some(wanted) => self.sources.iter().any(|s| wanted.contains(s)),
        }
    }
}

/// Pictogram of a reference model entry (theme, practice, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pictogram {
    pub kind: TaxonomyKind,
    #[serde(default)]
    pub path: Option<String>,
}

/// Root of the exported catalog JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub treks: Vec<Trek>,
    #[serde(default)]
    pub pictograms: Vec<Pictogram>,
}

impl Catalog {
    /// Load a catalog from its JSON export.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Catalog {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Look up a non-deleted trek.
    pub fn trek(&self, id: TrekId) -> Option<&Trek> {
        self.treks.iter().find(|t| t.id == id && !t.deleted)
    }

    fn existing(&self) -> Vec<&Trek> {
        let mut treks: Vec<&Trek> = self.treks.iter().filter(|t| !t.deleted).collect();
        treks.sort_by_key(|t| t.id);
        treks
    }

    fn parents<'a>(&'a self, trek: &'a Trek) -> impl Iterator<Item = &'a Trek> + 'a {
        trek.parents.iter().filter_map(|id| self.trek(*id))
    }

    /// Whether `trek` is published in `lang`, directly or through a parent.
    pub fn published_in(&self, trek: &Trek, lang: &Language) -> bool {
        trek.is_published(lang) || self.parents(trek).any(|p| p.is_published(lang))
    }

    /// Treks to export for `lang`, sorted by identifier.
    pub fn eligible_treks(&self, lang: &Language, sources: Option<&[SourceName]>) -> Vec<&Trek> {
        self.existing()
            .into_iter()
            .filter(|t| t.matches_sources(sources))
            .filter(|t| self.published_in(t, lang))
            .collect()
    }

    /// Treks that get their own tile archive: published, directly or through
    /// a parent, in at least one of `langs`.
    pub fn tile_treks(&self, langs: &[Language], sources: Option<&[SourceName]>) -> Vec<&Trek> {
        self.existing()
            .into_iter()
            .filter(|t| t.matches_sources(sources))
            .filter(|t| t.any_published(langs) || self.parents(t).any(|p| p.any_published(langs)))
            .collect()
    }

    /// Pictograms of one reference model, in catalog order.
    pub fn pictograms(&self, kind: TaxonomyKind) -> impl Iterator<Item = &Pictogram> {
        self.pictograms.iter().filter(move |p| p.kind == kind)
    }
}
