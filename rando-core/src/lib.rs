//! rando core library: domain types, settings and the content catalog.
//!
//! - [`types`]: newtypes and enums
//! - [`settings`]: YAML settings of the web application being mirrored
//! - [`catalog`]: the publishable content exported by the web application
//! - [`error`]: [`ConfigError`]

pub mod catalog;
pub mod error;
pub mod settings;
pub mod types;

pub use catalog::{Catalog, InformationDesk, Picture, Pictogram, RelatedContent, Trek};
pub use error::ConfigError;
pub use settings::{Settings, TileSettings};
pub use types::{Language, SourceName, TaxonomyKind, TrekId};
