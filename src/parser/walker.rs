use crate::config::END_TIMESTAMP;
use crate::dedup::{Insert, RecordSet};
use crate::parser::dates;
use crate::parser::entry::{self, Outcome};
use crate::parser::nodes::{Node, PageMarkup};
use crate::parser::rules::DATE_HEADING_ID_RE;
use crate::plog::ProjectLog;

/// What one page contributed, plus the date context to carry into the next
/// (older) page.
#[derive(Debug)]
pub struct WalkOutcome {
    pub carried_date: Option<i64>,
    pub records_added: usize,
    pub dup_skips: usize,
    pub ignored: usize,
    /// Page processing stopped early on a classification or date failure.
    pub aborted: bool,
}

impl WalkOutcome {
    fn new(carried_date: Option<i64>) -> Self {
        Self {
            carried_date,
            records_added: 0,
            dup_skips: 0,
            ignored: 0,
            aborted: false,
        }
    }
}

/// Walk one page's heading/list sequence, folding entries into the project
/// record set. Failures abort this page only; the caller moves on to the
/// next page with the returned date context.
pub fn walk_page(
    project: &str,
    page_id: u64,
    markup: &PageMarkup,
    carried_date: Option<i64>,
    records: &mut RecordSet,
    log: &mut ProjectLog,
) -> WalkOutcome {
    let mut out = WalkOutcome::new(carried_date);
    let nodes = &markup.nodes;

    let mut current: i64;
    let start: usize;

    if markup.is_continuation {
        // resume inside the list truncated on the previous (newer) revision
        let Some(date) = carried_date else {
            // crawl started mid-continuation; skip to the first full page
            log.info(&format!("continuation without carried date, skipping: {page_id}"));
            return out;
        };
        log.info(&format!("  continuing date: {date}"));
        match nodes.iter().position(|n| matches!(n, Node::List(_))) {
            Some(i) => {
                current = date;
                start = i;
            }
            None => {
                empty_page_guard(markup, page_id, &out, log);
                return out;
            }
        }
    } else {
        let Some(i) = nodes
            .iter()
            .position(|n| matches!(n, Node::Heading { id, .. } if DATE_HEADING_ID_RE.is_match(id)))
        else {
            if markup.log_too_large {
                log.warn(&format!("log too large to upload: {page_id}"));
            } else {
                log.info(&format!("no headings match date pattern: {page_id}"));
            }
            return out;
        };
        let Node::Heading { text, .. } = &nodes[i] else {
            unreachable!("position matched a heading");
        };
        match dates::resolve(text) {
            Ok(ts) => {
                current = ts;
                out.carried_date = Some(ts);
            }
            Err(e) => {
                log.error(&format!("unable to parse date: {:?}", e.text()));
                log.error(&format!("    page_id: {page_id}"));
                out.aborted = true;
                return out;
            }
        }
        start = i + 1;
    }

    for node in &nodes[start..] {
        match node {
            Node::Heading { id, text } if DATE_HEADING_ID_RE.is_match(id) => {
                match dates::resolve(text) {
                    Ok(ts) => {
                        current = ts;
                        out.carried_date = Some(ts);
                    }
                    Err(e) => {
                        log.error(&format!("unable to parse date: {:?}", e.text()));
                        log.error(&format!("    page_id: {page_id}"));
                        out.aborted = true;
                        return out;
                    }
                }
            }
            Node::Heading { .. } => {}
            Node::List(items) => {
                if current > END_TIMESTAMP {
                    // beyond the observation window
                    continue;
                }
                for item in items {
                    if item.toc {
                        continue;
                    }
                    match entry::classify(item) {
                        Outcome::Record(ex) => {
                            match records.insert(ex.into_record(project, current)) {
                                Insert::Added => out.records_added += 1,
                                Insert::Duplicate => out.dup_skips += 1,
                                Insert::Conflict { kept, discarded } => {
                                    log.error("  contradictory entries:");
                                    log.error(&format!("    keeping: {}", kept.tsv_row()));
                                    log.error(&format!("    discarding: {}", discarded.tsv_row()));
                                    out.dup_skips += 1;
                                }
                            }
                        }
                        Outcome::Ignore => out.ignored += 1,
                        Outcome::Error(reason) => {
                            log.error(&format!("  error parsing ({reason}): <<{}>>", item.text));
                            log.error(&format!("    page_id: {page_id}"));
                            out.aborted = true;
                            return out;
                        }
                    }
                }
            }
        }
    }

    empty_page_guard(markup, page_id, &out, log);
    out
}

/// A page that produced nothing is either an expected oversized-log stub or
/// a parse miss worth flagging; neither stops the run.
fn empty_page_guard(markup: &PageMarkup, page_id: u64, out: &WalkOutcome, log: &mut ProjectLog) {
    if out.records_added == 0 && out.dup_skips == 0 {
        if markup.log_too_large {
            log.warn(&format!("log too large to upload: {page_id}"));
        } else {
            log.error(&format!("found no entries in: {page_id}"));
        }
    }
}
