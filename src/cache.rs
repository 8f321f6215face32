use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use regex::Regex;

use crate::config::Config;

static CACHE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^oldid=(\d+)\.html").unwrap());

/// Unpack a project's crawled cache archive into the run directory. The
/// archive carries `output/projects/<name>/cache/...` relative paths.
/// Failure here is a project-level error: the caller logs it and moves on.
pub fn decompress(cfg: &Config, clean_name: &str) -> Result<()> {
    let tar_path = cfg.crawl_tar(clean_name);
    let file = File::open(&tar_path)
        .with_context(|| format!("opening cache archive {}", tar_path.display()))?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive
        .unpack(&cfg.root)
        .with_context(|| format!("unpacking cache archive {}", tar_path.display()))?;
    Ok(())
}

/// Cached page ids, newest revision first — the required walk order, since
/// continuation resolution carries the date forward from newer pages.
pub fn page_ids(cache_dir: &Path) -> Result<Vec<u64>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(cache_dir)
        .with_context(|| format!("listing cache {}", cache_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        match CACHE_FILE_RE.captures(&name) {
            Some(caps) => {
                if let Ok(id) = caps[1].parse::<u64>() {
                    ids.push(id);
                }
            }
            None => tracing::debug!("ignoring non-page cache file: {name}"),
        }
    }
    ids.sort_unstable_by(|a, b| b.cmp(a));
    Ok(ids)
}

pub fn read_page(cache_dir: &Path, page_id: u64) -> Result<String> {
    let path = cache_dir.join(format!("oldid={page_id}.html"));
    let bytes =
        fs::read(&path).with_context(|| format!("reading cached page {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn cleanup(cache_dir: &Path) -> std::io::Result<()> {
    fs::remove_dir_all(cache_dir)
}
