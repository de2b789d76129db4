//! Static HTML report assembly and the report-generation pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use askama::Template;

use crate::chart::{self, ChartRenderer, GoogleImageCharts};
use crate::config::{Capabilities, Config, RendererKind};
use crate::stats::{self, Scope, StatsError};
use crate::storage;

// Chart titles and geometry, unchanged from the historical reports.
const WEEKLY_PER_FEED: (&str, u32, u32) = ("Entries by feed", 350, 200);
const HOURLY_PER_FEED: (&str, u32, u32) = ("Entries by feed", 800, 200);

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    charts: &'a [String],
}

/// Wrap an ordered sequence of chart image references into one static
/// HTML document.
pub fn assemble(charts: &[String]) -> Result<String> {
    ReportTemplate { charts }
        .render()
        .context("rendering report template")
}

/// Generate the full statistics report: weekly per-feed chart, then
/// hourly per-feed chart, assembled into a single HTML page at the
/// configured destination. Everything is recomputed from the store on
/// each call; a failure produces no partial output.
pub fn generate_statistics(config: &Config, capabilities: &Capabilities) -> Result<PathBuf> {
    if !capabilities.renderer {
        return Err(StatsError::MissingDependency(
            "chart renderer is disabled or unavailable".to_string(),
        )
        .into());
    }
    if !capabilities.storage {
        return Err(StatsError::StorageUnavailable(
            "statistics store capability absent".to_string(),
        )
        .into());
    }

    let renderer = match config.renderer {
        RendererKind::GoogleImageCharts => GoogleImageCharts::new(),
        RendererKind::Disabled => unreachable!("capability check rejects a disabled renderer"),
    };

    let db_path = config.db_path();
    let pool = storage::open_pool(&db_path)?;
    tracing::info!(db = %db_path.display(), "generating statistics report");

    let weekly = stats::aggregate_by_weekday(&pool, Scope::PerFeed)?;
    let hourly = stats::aggregate_by_hour(&pool, Scope::PerFeed)?;

    let charts = vec![
        renderer.render(&chart::compose(
            WEEKLY_PER_FEED.0,
            WEEKLY_PER_FEED.1,
            WEEKLY_PER_FEED.2,
            &weekly,
        ))?,
        renderer.render(&chart::compose(
            HOURLY_PER_FEED.0,
            HOURLY_PER_FEED.1,
            HOURLY_PER_FEED.2,
            &hourly,
        ))?,
    ];

    let html = assemble(&charts)?;
    let destination = config.report_path();
    std::fs::write(&destination, html)
        .with_context(|| format!("writing report to {}", destination.display()))?;

    tracing::info!(report = %destination.display(), "statistics report written");
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_keeps_reference_order() {
        let refs = vec!["r1".to_string(), "r2".to_string(), "r3".to_string()];
        let html = assemble(&refs).unwrap();

        assert_eq!(html.matches("<img").count(), 3);
        let p1 = html.find("src=\"r1\"").unwrap();
        let p2 = html.find("src=\"r2\"").unwrap();
        let p3 = html.find("src=\"r3\"").unwrap();
        assert!(p1 < p2 && p2 < p3);
    }

    #[test]
    fn test_assemble_empty_report_is_valid_page() {
        let html = assemble(&[]).unwrap();
        assert!(html.contains("<html"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_generate_fails_fast_without_renderer() {
        let capabilities = Capabilities {
            storage: true,
            renderer: false,
        };
        let err = generate_statistics(&Config::default(), &capabilities).unwrap_err();
        let stats_err = err.downcast_ref::<StatsError>().unwrap();
        assert!(matches!(stats_err, StatsError::MissingDependency(_)));
    }

    #[test]
    fn test_generate_fails_fast_without_storage() {
        let capabilities = Capabilities {
            storage: false,
            renderer: true,
        };
        let err = generate_statistics(&Config::default(), &capabilities).unwrap_err();
        let stats_err = err.downcast_ref::<StatsError>().unwrap();
        assert!(matches!(stats_err, StatsError::StorageUnavailable(_)));
    }
}
