use std::fmt;

/// Output column order for the per-project TSV.
pub const COLUMNS: [&str; 11] = [
    "Project",
    "Date",
    "Action",
    "ArticleName",
    "OldQual",
    "NewQual",
    "OldImp",
    "NewImp",
    "NewArticleName",
    "OldArticleLink",
    "OldTalkLink",
];

/// Assessment event type. Variants are declared in lexicographic order of
/// their serialized names so the derived `Ord` matches the output sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Assessed,
    Reassessed,
    Removed,
    Renamed,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Assessed => "Assessed",
            Action::Reassessed => "Reassessed",
            Action::Removed => "Removed",
            Action::Renamed => "Renamed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized assessment event. String fields are empty (never "None")
/// when the log sentence did not state them. `old_article_link` and
/// `old_talk_link` are permanently-empty placeholder columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub project: String,
    pub timestamp: i64,
    pub action: Action,
    pub article_name: String,
    pub old_quality: String,
    pub new_quality: String,
    pub old_importance: String,
    pub new_importance: String,
    pub new_article_name: String,
    pub old_article_link: String,
    pub old_talk_link: String,
}

/// Identity of a logically unique event: two records with the same key are
/// the same event reported twice (across page revisions).
pub type DedupKey = (i64, String, Action);

impl LogRecord {
    pub fn key(&self) -> DedupKey {
        (self.timestamp, self.article_name.clone(), self.action)
    }

    /// Serialize in `COLUMNS` order, timestamp as a decimal integer.
    pub fn tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.project,
            self.timestamp,
            self.action,
            self.article_name,
            self.old_quality,
            self.new_quality,
            self.old_importance,
            self.new_importance,
            self.new_article_name,
            self.old_article_link,
            self.old_talk_link,
        )
    }
}
