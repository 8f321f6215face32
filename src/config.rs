use std::path::{Path, PathBuf};

/// End of the observation window: 2015-12-03T00:00:00Z. Daily logs dated
/// beyond this are present in late crawls but are not collected.
pub const END_TIMESTAMP: i64 = 1_449_100_800;

/// Sentence inserted where a daily log was split across page revisions.
pub const CONTINUATION_TEXT: &str = "This log entry was truncated because it was too long. \
     This entry is a continuation of the entry in the next revision of this log page.";

/// Sentence the assessment bot leaves in place of an oversized daily log.
pub const LOG_TOO_LARGE_TEXT: &str = "The log for today is too huge to upload to the wiki.";

/// Filesystem layout for one parse run. Cache archives carry paths relative
/// to `root` (`output/projects/<name>/cache/...`), so they unpack into it.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub projects_tsv: PathBuf,
}

impl Config {
    pub fn new(root: PathBuf, projects_tsv: Option<PathBuf>) -> Self {
        let projects_tsv =
            projects_tsv.unwrap_or_else(|| root.join("data").join("projects.utf-16-le.tsv"));
        Self { root, projects_tsv }
    }

    /// Crawled cache archive for a project.
    pub fn crawl_tar(&self, clean_name: &str) -> PathBuf {
        self.root
            .join("output")
            .join("projects_crawled")
            .join(format!("{clean_name}-cache.tgz"))
    }

    /// Per-project work directory (cache + parse log).
    pub fn project_dir(&self, clean_name: &str) -> PathBuf {
        self.root.join("output").join("projects").join(clean_name)
    }

    pub fn cache_dir(&self, clean_name: &str) -> PathBuf {
        self.project_dir(clean_name).join("cache")
    }

    pub fn log_path(&self, clean_name: &str) -> PathBuf {
        self.project_dir(clean_name).join("parse.log")
    }

    pub fn assessments_dir(&self) -> PathBuf {
        self.root.join("output").join("assessments")
    }

    pub fn assessment_path(&self, quoted_name: &str) -> PathBuf {
        self.assessments_dir().join(format!("{quoted_name}.utf8.tsv"))
    }

    pub fn done_dir(&self) -> PathBuf {
        self.root.join("output").join("done_parse")
    }

    /// Completion marker, written only after the project's TSV is persisted.
    pub fn marker_path(&self, clean_name: &str) -> PathBuf {
        self.done_dir().join(clean_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Path::new(".").to_path_buf(), None)
    }
}
