use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

/// Per-project diagnostic log (`parse.log` in the project's output
/// directory). Constructed by the orchestrator for the duration of one
/// project's parse; lines are written through immediately so the log is
/// readable while a long parse runs. Warnings and errors are mirrored to the
/// process log so batch runs surface them without opening project files.
pub struct ProjectLog {
    project: String,
    file: File,
}

impl ProjectLog {
    pub fn create(path: &Path, project: &str) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening project log {}", path.display()))?;
        Ok(Self {
            project: project.to_string(),
            file,
        })
    }

    fn write(&mut self, level: &str, msg: &str) {
        let ts = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let _ = writeln!(self.file, "[{ts}][{level}] {msg}");
    }

    pub fn info(&mut self, msg: &str) {
        self.write("INFO", msg);
    }

    pub fn warn(&mut self, msg: &str) {
        tracing::warn!(project = %self.project, "{msg}");
        self.write("WARN", msg);
    }

    pub fn error(&mut self, msg: &str) {
        tracing::error!(project = %self.project, "{msg}");
        self.write("ERROR", msg);
    }
}
