use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::parser::nodes::Item;
use crate::record::{Action, LogRecord};

// ── Entry sentence patterns, one per bot generation / edit style ──

static REASSESSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \(talk\) reassessed\.").unwrap());
static REASSESSED_NOTALK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) reassessed\..+\([^()]* t\)\.").unwrap());
static REASSESSED_SIMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) reassessed from (.+) \((.+)\) to (.+)\s*\((.+)\)").unwrap());
static REASSESSED_QUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Quality rating changed from (\S+) to (\S+)").unwrap());
static REASSESSED_IMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Importance rating changed from (\S+) to (\S+)").unwrap());
static ASSESSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \(.+\) assessed.").unwrap());
static ASSESSED_TALKAFTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+) assessed\.").unwrap());
static ASSESSED_QUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Quality assessed as (.+?) \(.+?\)\.").unwrap());
static ASSESSED_IMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Importance assessed as (.+?) \(.+?\)\.").unwrap());
static RENAMED_TALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) \([^()]*talk[^()]*\) (.+) \((.+)\) renamed to (.+)").unwrap()
});
static RENAMED_TALK_NOTALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^()]+) \([^()]*[tT]alk[^()]*\) (\S+-Class) \((\S+-Class)\) renamed to (.+)")
        .unwrap()
});
static RENAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \(.+?\) (.+) \((.+)\) renamed to (.+)").unwrap());
static RENAMED_SIMPLE_TALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+) \([^()]*[tT]alk[^()]*(?:\([^()]*\)[^()]*)?\) renamed to (.+) \([^()]*[tT]alk[^()]*(?:\([^()]*\)[^()]*)?\)",
    )
    .unwrap()
});
static RENAMED_SIMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) renamed to (.+)\.").unwrap());
static RENAMED_MOVED_TALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) ([^()]*talk[^()]*) moved to (.+) ([^()]*talk[^()]*)").unwrap()
});
static ADDED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) \([^()]*(?:\([^()]*\))[^()]*[tT]alk[^()]*\) (\S+) \((\S+)\) added").unwrap()
});
static ADDED_SIMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \([^()]*talk[^()]*\) added").unwrap());
static CREATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \([^()]*[tT]alk[^()]*\) Created").unwrap());
static RECREATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \([^()]*[tT]alk[^()]*\) (\S+-Class) recreated").unwrap());
static REMOVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \([^()]*talk[^()]*\)\s*removed").unwrap());
static REMOVED_SIMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)\s*\([^()]*talk[^()]*\) (.+) \((.+)\)\s*removed").unwrap()
});
static REMOVED_NOTALK_ASSESSMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+) (\S+-Class) \(([^()]+-Class)\) removed\.").unwrap());
static REMOVED_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) \([^()]*\([^()]*\)[^()]*talk[^()]*\)\s*removed").unwrap()
});
static REMOVED_NOTALK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+) removed\.").unwrap());
static REMOVED_PERTALK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) Removed per talk page discussion").unwrap());
static MOVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) moved from (.+) \((.+)\) to (.+) \((.+)\)").unwrap());
static MOVED_SIMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) moved from (.+) to (.+)").unwrap());
static UPGRADED_GA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) upgraded to good article status").unwrap());

// ── Noise patterns: recognized and dropped without error ──

static TESTING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Temp bot").unwrap());
static NOACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) \([^()]*talk[^()]*\) (.+) \((.+)\)").unwrap());
static NONAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([^()]*[tT]alk[^()]*\)").unwrap());
static NOCHANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(No changes today\)").unwrap());
static CARET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\^").unwrap());
static ANY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^").unwrap());

/// Link text that is a talk-page label rather than an article name.
static TALK_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^()]*talk[^()]*").unwrap());

/// Date-heading anchor ids: "January_5.2C_2010" and friends.
pub static DATE_HEADING_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(January|February|March|April|May|June|July|August|September|October|November|December)_\d{1,2}\.2C_\d{4}",
    )
    .unwrap()
});

/// One-off corrupted entries (bot bugs and stray human edits) ignored
/// unconditionally, matched by exact text.
pub static EXCLUDED_ENTRIES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "The Cambridge Declaration assessed- Class (Mid)",
        "Giovanni Sala ([[Talk:Giovanni S",
        "Mubarak Al-Sabah (talk) Reassessment Needed from Stub Class.",
        "[[Ground Zero (2007 film) [1]]] ([[Talk:Ground Zero (2007 film) [2]|talk]]) Stub-Class (Low-Class) removed.",
        "Foie gras, added with class=GA",
        "Flag of Ecuador cleaned-up, abridged and wikified Kevin McE 01:19, 22 December 2006 (UTC)",
        "Achaemenid Empire Still rated as Stub, unassesed",
        "NASRIYAUnassessed-Class (No-Class) added",
        "& moved back. No reason for the above undiscussed page move, even the edit summary didn't give any reason. Compare prior discussion at Wikipedia talk:Naming conventions (books)#Article title length.",
        "Songkhla Lake (talk) Mori Riyo added",
        "Thomas Viaduct (talk) - Complete overhaul, new content added more images added.",
        "Šumamice Memomial Pamk menamed to Octobem in Kmagujevac Memomial Pamk.",
        "Upstate New York r",
        "[[M*A*S*H (novels)]] ([[Talk:M*A*S*H (novels)|talk]]) added, as Unassessed (No-Class)",
        "Vic and Sade - removed, good article but does not fit this project",
        "Human chorionic gonadotropin (Talk:Human chorionic gonadotropin|talk) assessed. Quality assessed as Start-Class (rev ·Importance assessed as Mid-Class (rev · t).",
        "Statelessness (talk) Unassessed added",
        "Coca-Cola Refreshing Filmmaker's Award requesting first assessment",
        "[[Urban Gothic (TV series) [1]]] ([[Talk:Urban Gothic (TV series) [2]|talk]]) Unassessed-Class (No-Class) removed.",
        "Directed_evolution_(transhumanism) (talk)",
        "Wikipedia is a fake sorry to break it to u people",
        "Franconia (wine region) (talk) started new article",
        "Hong Kong (talk) Should be either Top or High (Hong Kong has approx. 7 million people and Asia's World City",
        "Hong Kong (talk) Should be either Top or High (Hong Kong has approx. 7 million people and China's World City",
    ])
});

/// Fields one rule pulls out of an entry; project and date are stamped on by
/// the walker when the record is folded into the project set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub action: Action,
    pub article_name: String,
    pub old_quality: String,
    pub new_quality: String,
    pub old_importance: String,
    pub new_importance: String,
    pub new_article_name: String,
}

impl Extraction {
    fn new(action: Action, article_name: &str) -> Self {
        Self {
            action,
            article_name: article_name.to_string(),
            old_quality: String::new(),
            new_quality: String::new(),
            old_importance: String::new(),
            new_importance: String::new(),
            new_article_name: String::new(),
        }
    }

    pub fn into_record(self, project: &str, timestamp: i64) -> LogRecord {
        LogRecord {
            project: project.to_string(),
            timestamp,
            action: self.action,
            article_name: self.article_name,
            old_quality: self.old_quality,
            new_quality: self.new_quality,
            old_importance: self.old_importance,
            new_importance: self.new_importance,
            new_article_name: self.new_article_name,
            old_article_link: String::new(),
            old_talk_link: String::new(),
        }
    }
}

/// What one rule decided about an entry.
#[derive(Debug)]
pub enum RuleResult {
    Extract(Extraction),
    /// Known noise, drop without error.
    Ignore,
    /// Rule matched but the entry's structure (usually its links) does not
    /// support extraction.
    Fail(String),
    /// Rule declines; try the next one.
    Pass,
}

/// One prioritized rule: an anchored sentence matcher plus an extractor over
/// the captures and the item's embedded links.
pub struct Rule {
    pub name: &'static str,
    pub matcher: &'static LazyLock<Regex>,
    pub extract: fn(&Captures, &Item) -> RuleResult,
}

/// The full cascade, in priority order. Order is load-bearing: generic
/// patterns (bare "removed", action-less noise) sit below the specific
/// variants they would otherwise shadow.
pub static RULES: &[Rule] = &[
    Rule { name: "reassessed-talk", matcher: &REASSESSED_RE, extract: reassessed },
    Rule { name: "reassessed-no-talk", matcher: &REASSESSED_NOTALK_RE, extract: reassessed },
    Rule { name: "reassessed-inline", matcher: &REASSESSED_SIMPLE_RE, extract: reassessed_inline },
    Rule { name: "assessed", matcher: &ASSESSED_RE, extract: assessed_by_link },
    Rule { name: "assessed-talk-after", matcher: &ASSESSED_TALKAFTER_RE, extract: assessed_talk_after },
    Rule { name: "renamed-with-assessment", matcher: &RENAMED_TALK_RE, extract: renamed_with_assessment },
    Rule { name: "renamed-with-class", matcher: &RENAMED_TALK_NOTALK_RE, extract: renamed_with_assessment },
    Rule { name: "renamed-by-links", matcher: &RENAMED_RE, extract: renamed_by_links },
    Rule { name: "renamed-both-talk", matcher: &RENAMED_SIMPLE_TALK_RE, extract: renamed_plain },
    Rule { name: "renamed-plain", matcher: &RENAMED_SIMPLE_RE, extract: renamed_plain },
    Rule { name: "renamed-moved-talk", matcher: &RENAMED_MOVED_TALK_RE, extract: renamed_moved },
    Rule { name: "added-with-assessment", matcher: &ADDED_RE, extract: added_with_assessment },
    Rule { name: "added-plain", matcher: &ADDED_SIMPLE_RE, extract: assessed_name_only },
    Rule { name: "created", matcher: &CREATED_RE, extract: assessed_name_only },
    Rule { name: "recreated", matcher: &RECREATED_RE, extract: recreated },
    Rule { name: "removed-talk", matcher: &REMOVED_RE, extract: removed_name_only },
    Rule { name: "removed-with-assessment", matcher: &REMOVED_SIMPLE_RE, extract: removed_with_assessment },
    Rule { name: "removed-class-no-talk", matcher: &REMOVED_NOTALK_ASSESSMENT_RE, extract: removed_with_assessment },
    Rule { name: "removed-nested-paren", matcher: &REMOVED_PAREN_RE, extract: removed_name_only },
    Rule { name: "removed-no-talk", matcher: &REMOVED_NOTALK_RE, extract: removed_name_only },
    Rule { name: "removed-per-talk", matcher: &REMOVED_PERTALK_RE, extract: removed_name_only },
    Rule { name: "moved-with-assessment", matcher: &MOVED_RE, extract: moved_with_assessment },
    Rule { name: "moved-plain", matcher: &MOVED_SIMPLE_RE, extract: moved_plain },
    Rule { name: "upgraded-ga", matcher: &UPGRADED_GA_RE, extract: upgraded_ga },
    Rule { name: "ignore-testing", matcher: &TESTING_RE, extract: ignore },
    Rule { name: "ignore-no-action", matcher: &NOACTION_RE, extract: ignore },
    Rule { name: "ignore-no-name", matcher: &NONAME_RE, extract: ignore },
    Rule { name: "ignore-no-change", matcher: &NOCHANGE_RE, extract: ignore },
    Rule { name: "ignore-caret", matcher: &CARET_RE, extract: ignore },
    Rule { name: "ignore-excluded", matcher: &ANY_RE, extract: excluded },
    Rule { name: "ignore-bare-name", matcher: &ANY_RE, extract: bare_name },
];

// ── Extractors ──

fn reassessed(caps: &Captures, item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Reassessed, &caps[1]);
    if let Some(c) = REASSESSED_QUAL_RE.captures(&item.text) {
        ex.old_quality = c[1].to_string();
        ex.new_quality = clean_rating(&c[2]);
    }
    if let Some(c) = REASSESSED_IMP_RE.captures(&item.text) {
        ex.old_importance = c[1].to_string();
        ex.new_importance = clean_rating(&c[2]);
    }
    RuleResult::Extract(ex)
}

/// The new rating is sentence-final in some entries, so the token capture
/// picks up the closing period.
fn clean_rating(s: &str) -> String {
    s.trim_end_matches('.').to_string()
}

fn reassessed_inline(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Reassessed, &caps[1]);
    ex.old_quality = caps[2].to_string();
    ex.old_importance = caps[3].to_string();
    ex.new_quality = caps[4].to_string();
    ex.new_importance = caps[5].to_string();
    RuleResult::Extract(ex)
}

/// Article names with parentheses defeat the sentence pattern, so the name
/// comes from the first embedded link. Entries without links fall through to
/// the later patterns.
fn assessed_by_link(_caps: &Captures, item: &Item) -> RuleResult {
    let Some(first) = item.links.first() else {
        return RuleResult::Pass;
    };
    RuleResult::Extract(assessed_fields(&first.text, item))
}

fn assessed_talk_after(_caps: &Captures, item: &Item) -> RuleResult {
    let Some(first) = item.links.first() else {
        return RuleResult::Fail("assessed entry without links".to_string());
    };
    RuleResult::Extract(assessed_fields(&first.text, item))
}

fn assessed_fields(article: &str, item: &Item) -> Extraction {
    let mut ex = Extraction::new(Action::Assessed, article);
    if let Some(c) = ASSESSED_QUAL_RE.captures(&item.text) {
        ex.new_quality = c[1].to_string();
    }
    if let Some(c) = ASSESSED_IMP_RE.captures(&item.text) {
        ex.new_importance = c[1].to_string();
    }
    ex
}

fn renamed_with_assessment(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Renamed, &caps[1]);
    ex.old_importance = caps[3].to_string();
    ex.new_article_name = caps[4].to_string();
    RuleResult::Extract(ex)
}

/// Both names may contain parentheses; select them by link position. The
/// second link is the old talk page, so the new name is the second link for
/// two-link entries and the third otherwise.
fn renamed_by_links(_caps: &Captures, item: &Item) -> RuleResult {
    let links = &item.links;
    let Some(first) = links.first() else {
        return RuleResult::Fail("renamed entry without links".to_string());
    };
    let new_name = match links.len() {
        0 | 1 => return RuleResult::Fail("renamed entry with unrecognized link count".to_string()),
        2 => &links[1].text,
        _ => &links[2].text,
    };
    if TALK_TEXT_RE.is_match(new_name) {
        return RuleResult::Fail("unable to find new name".to_string());
    }
    let mut ex = Extraction::new(Action::Renamed, &first.text);
    ex.new_article_name = new_name.clone();
    RuleResult::Extract(ex)
}

fn renamed_plain(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Renamed, &caps[1]);
    ex.new_article_name = caps[2].to_string();
    RuleResult::Extract(ex)
}

fn renamed_moved(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Renamed, &caps[1]);
    ex.new_article_name = caps[3].to_string();
    RuleResult::Extract(ex)
}

fn added_with_assessment(caps: &Captures, _item: &Item) -> RuleResult {
    // some entries keep leftover wiki markup around the title
    let article = caps[1].trim_matches(|c| c == '[' || c == ']');
    let mut ex = Extraction::new(Action::Assessed, article);
    ex.new_quality = caps[2].to_string();
    ex.new_importance = caps[3].to_string();
    RuleResult::Extract(ex)
}

fn assessed_name_only(caps: &Captures, _item: &Item) -> RuleResult {
    RuleResult::Extract(Extraction::new(Action::Assessed, &caps[1]))
}

fn recreated(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Assessed, &caps[1]);
    ex.new_quality = caps[2].to_string();
    RuleResult::Extract(ex)
}

fn removed_name_only(caps: &Captures, _item: &Item) -> RuleResult {
    RuleResult::Extract(Extraction::new(Action::Removed, &caps[1]))
}

fn removed_with_assessment(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Removed, &caps[1]);
    ex.old_importance = caps[3].to_string();
    RuleResult::Extract(ex)
}

fn moved_with_assessment(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Reassessed, &caps[1]);
    ex.old_quality = caps[2].to_string();
    ex.old_importance = caps[3].to_string();
    ex.new_quality = caps[4].to_string();
    ex.new_importance = caps[5].to_string();
    RuleResult::Extract(ex)
}

fn moved_plain(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Reassessed, &caps[1]);
    ex.old_quality = caps[2].to_string();
    ex.new_quality = caps[3].to_string();
    RuleResult::Extract(ex)
}

fn upgraded_ga(caps: &Captures, _item: &Item) -> RuleResult {
    let mut ex = Extraction::new(Action::Reassessed, &caps[1]);
    ex.new_quality = "GA-Class".to_string();
    RuleResult::Extract(ex)
}

fn ignore(_caps: &Captures, _item: &Item) -> RuleResult {
    RuleResult::Ignore
}

fn excluded(_caps: &Captures, item: &Item) -> RuleResult {
    if EXCLUDED_ENTRIES.contains(item.text.as_str()) {
        RuleResult::Ignore
    } else {
        RuleResult::Pass
    }
}

/// Entries that are just a linked article name and nothing else.
fn bare_name(_caps: &Captures, item: &Item) -> RuleResult {
    if item.links.len() == 1 && item.links[0].text == item.text {
        RuleResult::Ignore
    } else {
        RuleResult::Pass
    }
}
