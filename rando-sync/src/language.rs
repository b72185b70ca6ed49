//! Per-language export: global listings, static files, pictograms, then
//! every eligible trek, feeding `zip/treks/<lang>/global.zip`.

use rando_core::{Catalog, Language, TaxonomyKind};
use rando_render::Endpoint;

use crate::archive::Archive;
use crate::differ::ArchiveOutcome;
use crate::error::SyncError;
use crate::job::SyncJob;
use crate::snapshot::{ExportTask, Snapshotter};
use crate::trek::{export_trek, geojson_task, json_task, media_file};

/// What one language export produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSummary {
    pub treks: usize,
    pub outcome: ArchiveOutcome,
}

/// Export everything for `lang` and seal its per-language archive last.
///
/// Only treks published in `lang`, directly or through a parent, are
/// exported, in identifier order.
pub fn export_language(
    job: &SyncJob,
    catalog: &Catalog,
    snap: &mut Snapshotter<'_>,
    lang: &Language,
) -> Result<LanguageSummary, SyncError> {
    let mut zip = Archive::create(snap.tmp_root(), format!("zip/treks/{lang}/global.zip"))?;

    snap.render(lang, geojson_task(job, Endpoint::TrekList).archive(&mut zip))?;
    snap.render(lang, geojson_task(job, Endpoint::PoiList))?;
    snap.render(lang, geojson_task(job, Endpoint::FlatPageList).archive(&mut zip))?;
    snap.render(lang, geojson_task(job, Endpoint::ServiceList).archive(&mut zip))?;
    snap.render(lang, ExportTask::new(Endpoint::FeedbackCategories).archive(&mut zip))?;

    let mut contents = geojson_task(job, Endpoint::TouristicContentList);
    let mut categories = json_task(job, Endpoint::TouristicCategories);
    if let Some(ids) = job.categories_param() {
        contents = contents.query("categories", ids.clone());
        categories = categories.query("categories", ids);
    }
    if job.options.with_events {
        categories = categories.query("events", "1");
    }
    snap.render(lang, contents.archive(&mut zip))?;
    snap.render(lang, geojson_task(job, Endpoint::TouristicEventList).archive(&mut zip))?;
    snap.render(lang, categories.archive(&mut zip))?;

    for name in &job.settings.static_files {
        snap.copy_file(
            Some(lang),
            name,
            &job.settings.static_root,
            job.settings.static_prefix(),
            None,
        )?;
    }

    for kind in TaxonomyKind::all() {
        // Touristic categories are language-independent and only shipped when
        // touristic contents are folded into POIs.
        let picto_lang = match kind {
            TaxonomyKind::TouristicContentCategory if !job.settings.touristic_contents_as_poi => continue,
            TaxonomyKind::TouristicContentCategory => None,
            _ => Some(lang),
        };
        for pictogram in catalog.pictograms(*kind) {
            let archive = if kind.zipped() { Some(&mut zip) } else { None };
            media_file(job, snap, picto_lang, pictogram.path.as_deref(), archive)?;
        }
    }

    let treks = catalog.eligible_treks(lang, job.sources());
    tracing::info!(%lang, treks = treks.len(), "exporting treks");
    for trek in &treks {
        export_trek(job, snap, lang, trek, &mut zip)?;
    }

    let outcome = snap.seal(zip)?;
    Ok(LanguageSummary {
        treks: treks.len(),
        outcome,
    })
}
