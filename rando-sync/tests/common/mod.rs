//! In-process collaborators shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rando_core::{Catalog, Language, Settings};
use rando_render::{Endpoint, RenderError, RenderRequest, RenderResponse, Renderable};
use rando_sync::ProgressReporter;
use rando_tiles::{Tile, TileError, TileSource};
use serde_json::json;

pub const CATALOG: &str = r#"{
    "treks": [
        {
            "id": 1, "slug": "lac-blanc", "published": ["en"],
            "geometry": [[6.86, 45.83], [6.87, 45.84]],
            "thumbnail": "resized/one.jpg",
            "pictures": [{"original": "paperclip/one.jpg", "resized": "resized/one.jpg"}]
        },
        {
            "id": 2, "slug": "col-de-balme", "published": ["fr"],
            "geometry": [[6.95, 46.02]],
            "pictures": [{"original": "paperclip/two.jpg", "resized": "resized/two.jpg"}]
        },
        {"id": 3, "slug": "draft", "geometry": [[6.9, 45.9]]}
    ],
    "pictograms": [{"kind": "theme", "path": "upload/theme.svg"}]
}"#;

pub fn catalog() -> Catalog {
    serde_json::from_str(CATALOG).unwrap()
}

/// Settings whose media and static roots live under `dir`.
pub fn settings(dir: &Path) -> Settings {
    let media = dir.join("media-root");
    let statics = dir.join("static-root");
    std::fs::create_dir_all(media.join("resized")).unwrap();
    std::fs::create_dir_all(media.join("upload")).unwrap();
    std::fs::create_dir_all(statics.join("trekking")).unwrap();
    std::fs::write(media.join("resized/one.jpg"), "one").unwrap();
    std::fs::write(media.join("resized/two.jpg"), "two").unwrap();
    std::fs::write(media.join("upload/theme.svg"), "<svg/>").unwrap();
    std::fs::write(statics.join("trekking/trek.svg"), "<svg/>").unwrap();

    let mut settings = Settings::default();
    settings.languages = vec![Language::from("en"), Language::from("fr")];
    settings.media_root = media;
    settings.static_root = statics;
    settings.tiles.spatial_extent = Some([6.8, 45.8, 7.0, 46.1]);
    settings.tiles.global_zooms = vec![0, 1, 2];
    settings.tiles.low_zooms = vec![10];
    settings.tiles.high_zooms = vec![11];
    settings
}

/// Answers like the live application would, from the catalog.
///
/// `raise` and `refuse` name routes that raise or answer HTTP 500;
/// `sabotage` is a path turned into a directory while rendering the trek
/// listing, so the following write fails.
pub struct FakeRenderer {
    pub catalog: Catalog,
    pub raise: BTreeSet<String>,
    pub refuse: BTreeSet<String>,
    pub sabotage: Option<PathBuf>,
    pub seen: RefCell<Vec<RenderRequest>>,
}

impl FakeRenderer {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            raise: BTreeSet::new(),
            refuse: BTreeSet::new(),
            sabotage: None,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Renderable for FakeRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderResponse, RenderError> {
        self.seen.borrow_mut().push(request.clone());
        let route = request.route();
        if self.raise.contains(&route) {
            return Err(RenderError::Failed(format!("cannot render {route}")));
        }
        if self.refuse.contains(&route) {
            return Ok(RenderResponse::status(500));
        }
        match request.endpoint {
            Endpoint::TrekList => {
                if let Some(path) = &self.sabotage {
                    std::fs::create_dir_all(path).unwrap();
                }
                let features: Vec<_> = self
                    .catalog
                    .eligible_treks(&request.language, None)
                    .iter()
                    .map(|t| json!({"type": "Feature", "id": t.id.0, "properties": {"slug": t.slug}}))
                    .collect();
                let body = json!({"type": "FeatureCollection", "features": features});
                Ok(RenderResponse::ok(body.to_string()))
            }
            _ => Ok(RenderResponse::ok(route)),
        }
    }
}

/// Serves every tile except those listed in `missing`.
#[derive(Default)]
pub struct FakeTiles {
    pub missing: Vec<Tile>,
    pub fetched: RefCell<Vec<Tile>>,
}

impl TileSource for FakeTiles {
    fn fetch(&self, tile: Tile) -> Result<Vec<u8>, TileError> {
        self.fetched.borrow_mut().push(tile);
        if self.missing.contains(&tile) {
            return Err(TileError::Download {
                url: format!("http://tiles/{tile}.png"),
                reason: "connection reset".to_string(),
            });
        }
        Ok(tile.to_string().into_bytes())
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    pub milestones: RefCell<Vec<(u8, String)>>,
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, percent: u8, message: &str) {
        self.milestones.borrow_mut().push((percent, message.to_string()));
    }
}

/// Names of the entries of a zip file, sorted.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}
