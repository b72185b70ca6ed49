//! `rando sync`: build the offline bundle into a destination directory.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use rando_core::{Catalog, Language, Settings, SourceName};
use rando_render::HttpRenderer;
use rando_sync::{
    ArchiveOutcome, JsonLinesProgress, NoProgress, ProgressReporter, Supervisor, SyncJob,
    SyncOptions, SyncReport,
};
use rando_tiles::HttpTileSource;

/// Arguments for `rando sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory receiving the bundle (created if missing).
    pub destination: PathBuf,

    /// Base URL of the running application.
    #[arg(short, long, default_value = "http://localhost")]
    pub url: String,

    /// Only treks from these sources (comma-separated).
    #[arg(short, long, value_delimiter = ',')]
    pub source: Option<Vec<String>>,

    /// Languages to sync (comma-separated); defaults to the settings file.
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    /// Skip generation of PDF files.
    #[arg(short = 'p', long)]
    pub skip_pdf: bool,

    /// Skip generation of zip tiles files.
    #[arg(short = 't', long)]
    pub skip_tiles: bool,

    /// Skip generation of DEM files for 3D.
    #[arg(short = 'd', long)]
    pub skip_dem: bool,

    /// Skip generation of PNG elevation profiles.
    #[arg(short = 'e', long)]
    pub skip_profile_png: bool,

    /// Also export touristic events per trek and list the event category.
    #[arg(short = 'w', long)]
    pub with_events: bool,

    /// Restrict touristic contents to these category ids (comma-separated).
    #[arg(short = 'c', long, value_delimiter = ',')]
    pub content_categories: Vec<String>,

    /// Settings file.
    #[arg(long, env = "RANDO_SETTINGS", default_value = "rando.yaml")]
    pub settings: PathBuf,

    /// Append progress milestones to this file as JSON lines.
    #[arg(long)]
    pub progress_file: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self, verbosity: u8) -> Result<()> {
        let settings = Settings::load_at(&self.settings)
            .with_context(|| format!("failed to load settings from {}", self.settings.display()))?;
        let catalog = Catalog::load_at(&settings.catalog)
            .with_context(|| format!("failed to load catalog {}", settings.catalog.display()))?;
        tracing::info!(catalog = %settings.catalog.display(), treks = catalog.treks.len(), "catalog loaded");

        let progress: Box<dyn ProgressReporter> = match &self.progress_file {
            Some(path) => Box::new(JsonLinesProgress::new(path, "sync_rando")),
            None => Box::new(NoProgress),
        };
        let job = SyncJob::new(self.into_options(), settings).context("invalid sync options")?;

        let renderer = HttpRenderer::new(
            &job.url,
            Duration::from_secs(job.settings.request_timeout_secs),
        );
        let tile_settings = &job.settings.tiles;
        let mut tiles = HttpTileSource::new(
            tile_settings.url.clone(),
            Duration::from_secs(tile_settings.timeout_secs),
        )
        .with_subdomains(tile_settings.subdomains.clone())
        .with_referer(job.url.clone());
        if let Some(dir) = &tile_settings.cache_dir {
            tiles = tiles.with_cache_dir(dir);
        }

        let report = Supervisor::new(&job, &catalog, &renderer, &tiles)
            .with_progress(progress.as_ref())
            .run()
            .with_context(|| format!("sync into {} aborted", job.dst_root.display()))?;

        if verbosity >= 2 {
            print_report(&report);
        }
        if verbosity >= 1 {
            println!("{}", "Done".green().bold());
        }
        if !report.success() {
            println!(
                "{} ({} failed)",
                "Some errors raised during synchronization.".red().bold(),
                report.failures.len()
            );
            std::process::exit(1);
        }
        Ok(())
    }

    fn into_options(self) -> SyncOptions {
        let mut options = SyncOptions::new(self.destination, self.url);
        options.sources = self
            .source
            .map(|names| names.into_iter().map(SourceName::from).collect());
        options.languages = self
            .languages
            .map(|langs| langs.into_iter().map(Language::from).collect());
        options.skip_pdf = self.skip_pdf;
        options.skip_tiles = self.skip_tiles;
        options.skip_dem = self.skip_dem;
        options.skip_profile_png = self.skip_profile_png;
        options.with_events = self.with_events;
        options.content_categories = self.content_categories;
        options
    }
}

#[derive(Tabled)]
struct ArchiveRow {
    archive: String,
    entries: usize,
    outcome: String,
}

#[derive(Tabled)]
struct FailureRow {
    language: String,
    target: String,
    reason: String,
}

fn print_report(report: &SyncReport) {
    let rows: Vec<ArchiveRow> = report
        .archives
        .iter()
        .map(|a| ArchiveRow {
            archive: a.path.display().to_string(),
            entries: a.entries,
            outcome: match a.outcome {
                ArchiveOutcome::Unchanged => "unchanged".green().to_string(),
                ArchiveOutcome::Zipped => "zipped".yellow().to_string(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if !report.failures.is_empty() {
        let rows: Vec<FailureRow> = report
            .failures
            .iter()
            .map(|f| FailureRow {
                language: f.language.clone().unwrap_or_else(|| "-".to_string()),
                target: f.target.clone(),
                reason: f.reason.to_string().red().to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    println!(
        "{} files written, {} tiles fetched, {}/{} archives unchanged",
        report.written,
        report.tiles_fetched,
        report.unchanged_archives(),
        report.archives.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: SyncArgs,
    }

    #[test]
    fn comma_lists_and_short_flags_map_to_options() {
        let harness = Harness::parse_from([
            "rando", "/srv/out", "-u", "http://rando.example.org", "-s", "PNE,CDT", "-l", "fr,it",
            "-p", "-t", "-e", "-c", "1,4", "-w",
        ]);
        let options = harness.args.into_options();

        assert_eq!(options.url, "http://rando.example.org");
        assert_eq!(
            options.sources,
            Some(vec![SourceName::from("PNE"), SourceName::from("CDT")])
        );
        assert_eq!(
            options.languages,
            Some(vec![Language::from("fr"), Language::from("it")])
        );
        assert!(options.skip_pdf && options.skip_tiles && options.skip_profile_png);
        assert!(!options.skip_dem);
        assert!(options.with_events);
        assert_eq!(options.content_categories, vec!["1", "4"]);
    }

    #[test]
    fn defaults_follow_the_command() {
        let harness = Harness::parse_from(["rando", "out"]);
        assert_eq!(harness.args.url, "http://localhost");
        let options = harness.args.into_options();
        assert!(options.sources.is_none());
        assert!(options.languages.is_none());
        assert!(options.content_categories.is_empty());
    }
}
