pub mod dates;
pub mod entry;
pub mod nodes;
pub mod rules;
pub mod walker;

use anyhow::Result;

use crate::cache;
use crate::config::Config;
use crate::dedup::RecordSet;
use crate::output;
use crate::plog::ProjectLog;
use crate::projects;

/// Counters from one project's parse.
#[derive(Debug, Default)]
pub struct ProjectSummary {
    pub pages: usize,
    pub records: usize,
    pub ignored: usize,
    pub dup_skips: usize,
    pub aborted_pages: usize,
}

/// Full pipeline for one project: unpack cache → walk pages newest-first
/// (threading the date context for continuations) → fold into the dedup set
/// → write sorted TSV → mark complete. Page failures are logged and skipped;
/// anything returned as Err fails the project (the run continues).
pub fn parse_project(cfg: &Config, project: &str) -> Result<ProjectSummary> {
    let clean = projects::clean_name(project);
    let mut log = ProjectLog::create(&cfg.log_path(&clean), project)?;
    log.info("beginning parse");

    log.info("  decompressing cache");
    cache::decompress(cfg, &clean)?;
    let cache_dir = cfg.cache_dir(&clean);
    let page_ids = cache::page_ids(&cache_dir)?;

    let mut summary = ProjectSummary {
        pages: page_ids.len(),
        ..ProjectSummary::default()
    };
    let mut records = RecordSet::new();
    let mut carried_date: Option<i64> = None;

    for (i, &page_id) in page_ids.iter().enumerate() {
        if i > 0 && i % 100 == 0 {
            log.info(&format!(
                "  {i}: {:.2}%",
                100.0 * i as f64 / page_ids.len() as f64
            ));
        }
        let html = match cache::read_page(&cache_dir, page_id) {
            Ok(html) => html,
            Err(e) => {
                log.error(&format!("unreadable page {page_id}: {e:#}"));
                summary.aborted_pages += 1;
                continue;
            }
        };
        let markup = match nodes::scan_page(&html) {
            Ok(markup) => markup,
            Err(e) => {
                log.error(&format!("unscannable page {page_id}: {e:#}"));
                summary.aborted_pages += 1;
                continue;
            }
        };
        let out = walker::walk_page(project, page_id, &markup, carried_date, &mut records, &mut log);
        carried_date = out.carried_date;
        summary.ignored += out.ignored;
        summary.dup_skips += out.dup_skips;
        if out.aborted {
            summary.aborted_pages += 1;
        }
    }
    summary.records = records.len();

    log.info("parse complete");
    log.info("writing results");
    output::write_assessments(&cfg.assessment_path(&projects::quoted_name(project)), &records)?;
    log.info("marking complete");
    output::write_marker(&cfg.marker_path(&clean), project)?;
    log.info(&format!(
        "project complete: {} records from {} pages ({} ignored, {} duplicates, {} pages aborted)",
        summary.records, summary.pages, summary.ignored, summary.dup_skips, summary.aborted_pages
    ));
    Ok(summary)
}
