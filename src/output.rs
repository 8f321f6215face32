use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::dedup::RecordSet;
use crate::record::COLUMNS;

/// Write the project's sorted records as a TSV. The file is written to a
/// `.tmp` sibling and renamed into place, so a crash mid-write cannot leave
/// a complete-looking output; the caller writes the completion marker only
/// after this returns Ok.
pub fn write_assessments(path: &Path, records: &RecordSet) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    let tmp = tmp_path(path);
    {
        let file = File::create(&tmp)
            .with_context(|| format!("creating output file {}", tmp.display()))?;
        let mut w = BufWriter::new(file);
        writeln!(w, "{}", COLUMNS.join("\t"))?;
        for rec in records.iter() {
            writeln!(w, "{}", rec.tsv_row())?;
        }
        w.flush()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming output into place at {}", path.display()))?;
    Ok(())
}

pub fn write_marker(path: &Path, project_name: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating marker directory {}", dir.display()))?;
    }
    fs::write(path, project_name)
        .with_context(|| format!("writing completion marker {}", path.display()))?;
    Ok(())
}

pub fn is_complete(marker_path: &Path) -> bool {
    marker_path.exists()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
