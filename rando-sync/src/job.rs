//! Run-scoped configuration: one [`SyncJob`] per invocation.

use std::path::{Path, PathBuf};

use rando_core::{Language, Settings, SourceName};
use rando_tiles::BBox;

use crate::error::SyncError;

/// Name of the working tree, created next to the destination root.
pub const TMP_DIR_NAME: &str = "tmp_sync_rando";

/// Where the previous bundle is parked while the new one is swapped in.
pub const DEPRECATED_DIR_NAME: &str = "deprecated_sync_rando";

/// Run options as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    pub destination: PathBuf,
    /// Base URL of the live application, e.g. `http://localhost:8000`.
    pub url: String,
    /// Restrict treks to these provenance sources.
    pub sources: Option<Vec<SourceName>>,
    /// Override the configured languages.
    pub languages: Option<Vec<Language>>,
    pub skip_pdf: bool,
    pub skip_tiles: bool,
    pub skip_dem: bool,
    pub skip_profile_png: bool,
    pub with_events: bool,
    /// Touristic content category ids; empty leaves the global listing unfiltered
    /// and skips per-trek touristic contents.
    pub content_categories: Vec<String>,
}

impl SyncOptions {
    pub fn new(destination: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            url: url.into(),
            sources: None,
            languages: None,
            skip_pdf: false,
            skip_tiles: false,
            skip_dem: false,
            skip_profile_png: false,
            with_events: false,
            content_categories: Vec::new(),
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct SyncJob {
    pub options: SyncOptions,
    pub settings: Settings,
    pub dst_root: PathBuf,
    pub tmp_root: PathBuf,
    /// Base URL without trailing slash.
    pub url: String,
    /// `host[:port]` part of the base URL.
    pub host: String,
    pub languages: Vec<Language>,
    /// Extent of the global tile archive; `None` when tiles are skipped.
    pub global_extent: Option<BBox>,
}

impl SyncJob {
    pub fn new(options: SyncOptions, settings: Settings) -> Result<Self, SyncError> {
        let (url, host) = parse_url(&options.url)?;

        let languages = options
            .languages
            .clone()
            .unwrap_or_else(|| settings.languages.clone());
        if languages.is_empty() {
            return Err(SyncError::NoLanguage);
        }

        let global_extent = if options.skip_tiles {
            None
        } else {
            Some(BBox::try_from(settings.tiles.spatial_extent()?)?)
        };

        let dst_root = options.destination.clone();
        let tmp_root = tmp_root_for(&dst_root);
        check_not_reserved(&dst_root, &tmp_root)?;
        Ok(Self {
            options,
            settings,
            dst_root,
            tmp_root,
            url,
            host,
            languages,
            global_extent,
        })
    }

    pub fn sources(&self) -> Option<&[SourceName]> {
        self.options.sources.as_deref()
    }

    /// Comma-joined source names, as sent in the `source` query parameter.
    pub fn source_param(&self) -> Option<String> {
        self.options.sources.as_ref().map(|sources| {
            sources
                .iter()
                .map(|s| s.0.as_str())
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    pub fn categories_param(&self) -> Option<String> {
        if self.options.content_categories.is_empty() {
            None
        } else {
            Some(self.options.content_categories.join(","))
        }
    }
}

fn tmp_root_for(dst_root: &Path) -> PathBuf {
    sibling(dst_root, TMP_DIR_NAME)
}

/// `name` next to `dst_root`, in the working directory for a bare name.
pub(crate) fn sibling(dst_root: &Path, name: &str) -> PathBuf {
    match dst_root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}

/// The destination must not be one of the sibling directories a run creates
/// and removes.
fn check_not_reserved(dst_root: &Path, tmp_root: &Path) -> Result<(), SyncError> {
    let reserved = match dst_root.file_name() {
        None => true,
        Some(name) => name == TMP_DIR_NAME || name == DEPRECATED_DIR_NAME,
    };
    let aliased = match dst_root.canonicalize() {
        Ok(dst) => [tmp_root.to_path_buf(), sibling(dst_root, DEPRECATED_DIR_NAME)]
            .iter()
            .any(|other| other.canonicalize().map_or(false, |other| other == dst)),
        Err(_) => false,
    };
    if reserved || aliased {
        return Err(SyncError::ReservedDestination(dst_root.to_path_buf()));
    }
    Ok(())
}

/// Split an absolute http(s) URL into (base without trailing slash, host).
fn parse_url(raw: &str) -> Result<(String, String), SyncError> {
    let rest = raw
        .strip_prefix("http://")
        .or_else(|| raw.strip_prefix("https://"))
        .ok_or_else(|| SyncError::InvalidUrl(raw.to_string()))?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(SyncError::InvalidUrl(raw.to_string()));
    }
    Ok((raw.trim_end_matches('/').to_string(), host.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings_with_extent() -> Settings {
        let mut settings = Settings::default();
        settings.tiles.spatial_extent = Some([5.0, 44.0, 7.0, 46.0]);
        settings
    }

    #[rstest]
    #[case("http://localhost", "http://localhost", "localhost")]
    #[case("http://localhost:8000/", "http://localhost:8000", "localhost:8000")]
    #[case("https://rando.example.org/app", "https://rando.example.org/app", "rando.example.org")]
    fn accepts_http_urls(#[case] raw: &str, #[case] base: &str, #[case] host: &str) {
        let job = SyncJob::new(SyncOptions::new("/srv/out", raw), settings_with_extent()).unwrap();
        assert_eq!(job.url, base);
        assert_eq!(job.host, host);
    }

    #[rstest]
    #[case("localhost:8000")]
    #[case("ftp://example.org")]
    #[case("http://")]
    #[case("")]
    fn rejects_malformed_urls(#[case] raw: &str) {
        let err = SyncJob::new(SyncOptions::new("/srv/out", raw), settings_with_extent()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidUrl(_)));
    }

    #[test]
    fn tmp_root_sits_next_to_destination() {
        let job = SyncJob::new(SyncOptions::new("/srv/out", "http://localhost"), settings_with_extent()).unwrap();
        assert_eq!(job.tmp_root, PathBuf::from("/srv/tmp_sync_rando"));

        let job = SyncJob::new(SyncOptions::new("out", "http://localhost"), settings_with_extent()).unwrap();
        assert_eq!(job.tmp_root, PathBuf::from("tmp_sync_rando"));
    }

    #[rstest]
    #[case("/srv/tmp_sync_rando")]
    #[case("/srv/deprecated_sync_rando")]
    #[case("/srv/tmp_sync_rando/.")]
    #[case("/srv/..")]
    #[case("/")]
    fn reserved_destinations_are_rejected(#[case] dst: &str) {
        let err = SyncJob::new(SyncOptions::new(dst, "http://localhost"), settings_with_extent()).unwrap_err();
        assert!(matches!(err, SyncError::ReservedDestination(_)));
    }

    #[test]
    fn command_line_languages_override_settings() {
        let mut options = SyncOptions::new("/srv/out", "http://localhost");
        options.languages = Some(vec![Language::from("fr"), Language::from("it")]);
        let job = SyncJob::new(options, settings_with_extent()).unwrap();
        assert_eq!(job.languages, vec![Language::from("fr"), Language::from("it")]);
    }

    #[test]
    fn empty_language_list_is_rejected() {
        let mut options = SyncOptions::new("/srv/out", "http://localhost");
        options.languages = Some(Vec::new());
        let err = SyncJob::new(options, settings_with_extent()).unwrap_err();
        assert!(matches!(err, SyncError::NoLanguage));
    }

    #[test]
    fn extent_is_only_required_with_tiles() {
        let err = SyncJob::new(SyncOptions::new("/srv/out", "http://localhost"), Settings::default()).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));

        let mut options = SyncOptions::new("/srv/out", "http://localhost");
        options.skip_tiles = true;
        let job = SyncJob::new(options, Settings::default()).unwrap();
        assert!(job.global_extent.is_none());
    }

    #[test]
    fn query_parameters_are_comma_joined() {
        let mut options = SyncOptions::new("/srv/out", "http://localhost");
        options.skip_tiles = true;
        options.sources = Some(vec![SourceName::from("PNE"), SourceName::from("CDT")]);
        options.content_categories = vec!["1".to_string(), "3".to_string()];
        let job = SyncJob::new(options, Settings::default()).unwrap();
        assert_eq!(job.source_param().as_deref(), Some("PNE,CDT"));
        assert_eq!(job.categories_param().as_deref(), Some("1,3"));
    }
}
