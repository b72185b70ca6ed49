//! Per-trek export: every file of one trek in one language.
//!
//! Shared listings (`parameters.json`, `themes.json`), the trek's GeoJSON
//! collections, its profile chart and its thumbnail feed the per-language
//! archive; pictures feed the trek's own `zip/treks/<lang>/<id>.zip`.
//! GPX, KML, PDF, `profile.json` and `dem.json` are written to disk only.

use rando_core::{Language, Trek};
use rando_render::{Endpoint, TrekRef};

use crate::archive::Archive;
use crate::differ::ArchiveOutcome;
use crate::error::SyncError;
use crate::job::SyncJob;
use crate::snapshot::{ExportTask, Snapshotter, TaskOutcome};

/// A JSON listing, narrowed to the selected sources when a filter is set.
pub(crate) fn json_task<'a>(job: &SyncJob, endpoint: Endpoint) -> ExportTask<'a> {
    let task = ExportTask::new(endpoint);
    match job.source_param() {
        Some(sources) => task.query("source", sources),
        None => task,
    }
}

/// A GeoJSON listing, narrowed to the selected sources when a filter is set.
pub(crate) fn geojson_task<'a>(job: &SyncJob, endpoint: Endpoint) -> ExportTask<'a> {
    let task = ExportTask::new(endpoint).query("format", "geojson");
    match job.source_param() {
        Some(sources) => task.query("source", sources),
        None => task,
    }
}

/// Copy one file of the media root into the bundle.
pub(crate) fn media_file(
    job: &SyncJob,
    snap: &mut Snapshotter<'_>,
    lang: Option<&Language>,
    name: Option<&str>,
    archive: Option<&mut Archive>,
) -> Result<TaskOutcome, SyncError> {
    snap.copy_file(
        lang,
        name.unwrap_or_default(),
        &job.settings.media_root,
        job.settings.media_prefix(),
        archive,
    )
}

/// Export `trek` in `lang` and seal its per-trek archive.
pub fn export_trek(
    job: &SyncJob,
    snap: &mut Snapshotter<'_>,
    lang: &Language,
    trek: &Trek,
    lang_zip: &mut Archive,
) -> Result<ArchiveOutcome, SyncError> {
    let mut trek_zip = Archive::create(snap.tmp_root(), format!("zip/treks/{lang}/{}.zip", trek.id))?;
    let options = &job.options;
    let trek_ref = TrekRef {
        id: trek.id,
        slug: trek.slug.clone(),
    };

    snap.render(lang, json_task(job, Endpoint::Parameters).archive(lang_zip))?;
    snap.render(lang, json_task(job, Endpoint::Themes).archive(lang_zip))?;

    let pois = Endpoint::TrekPois(trek.id);
    if job.settings.touristic_contents_as_poi {
        // The archive gets POIs and touristic contents together; the file on
        // disk ends up holding POIs only.
        let combined = ExportTask::new(Endpoint::TrekPoisAndTouristicContents(trek.id))
            .query("format", "geojson")
            .dest(pois.route(lang))
            .archive(lang_zip);
        snap.render(lang, combined)?;
        snap.render(lang, ExportTask::new(pois).query("format", "geojson"))?;
    } else {
        snap.render(lang, ExportTask::new(pois).query("format", "geojson").archive(lang_zip))?;
    }
    snap.render(
        lang,
        ExportTask::new(Endpoint::TrekServices(trek.id))
            .query("format", "geojson")
            .archive(lang_zip),
    )?;

    if let Some(categories) = job.categories_param() {
        let task = ExportTask::new(Endpoint::TrekTouristicContents(trek.id))
            .query("format", "geojson")
            .query("categories", categories)
            .archive(lang_zip);
        snap.render(lang, task)?;
    }
    if options.with_events {
        let task = ExportTask::new(Endpoint::TrekTouristicEvents(trek.id))
            .query("format", "geojson")
            .archive(lang_zip);
        snap.render(lang, task)?;
    }

    snap.render(lang, ExportTask::new(Endpoint::TrekGpx(trek_ref.clone())))?;
    snap.render(lang, ExportTask::new(Endpoint::TrekKml(trek_ref.clone())))?;
    if !options.skip_pdf {
        snap.render(lang, ExportTask::new(Endpoint::TrekDocument(trek_ref)))?;
    }
    snap.render(lang, ExportTask::new(Endpoint::ElevationProfile(trek.id)))?;
    if !options.skip_profile_png {
        snap.render(lang, ExportTask::new(Endpoint::ElevationChart(trek.id)).archive(lang_zip))?;
    }
    if !options.skip_dem {
        snap.render(lang, ExportTask::new(Endpoint::ElevationArea(trek.id)))?;
    }

    for desk in &trek.information_desks {
        media_file(job, snap, Some(lang), desk.thumbnail.as_deref(), Some(&mut trek_zip))?;
    }
    for poi in &trek.pois {
        let mut pictures = poi.pictures.iter();
        if let Some(first) = pictures.next() {
            media_file(job, snap, Some(lang), Some(&first.resized), Some(&mut trek_zip))?;
        }
        for picture in pictures {
            media_file(job, snap, Some(lang), Some(&picture.resized), None)?;
        }
    }
    if job.settings.touristic_contents_as_poi {
        for content in &trek.touristic_contents {
            if let Some(first) = content.pictures.first() {
                media_file(job, snap, Some(lang), Some(&first.resized), Some(&mut trek_zip))?;
            }
        }
    }
    media_file(job, snap, Some(lang), trek.thumbnail.as_deref(), Some(&mut *lang_zip))?;
    for picture in &trek.pictures {
        media_file(job, snap, Some(lang), Some(&picture.resized), Some(&mut trek_zip))?;
    }

    snap.seal(trek_zip)
}
