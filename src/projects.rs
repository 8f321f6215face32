use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};

/// Load the project registry: a UTF-16-LE TSV with a header row and
/// (name, unique-key) columns. Rows repeating a unique-key are dropped
/// (first kept); the returned names are sorted.
pub fn load_registry(path: &Path) -> Result<Vec<String>> {
    let bytes =
        fs::read(path).with_context(|| format!("reading project registry {}", path.display()))?;
    let text = decode_utf16_le(&bytes)
        .with_context(|| format!("decoding project registry {}", path.display()))?;

    let mut names = Vec::new();
    let mut seen = HashSet::new();
    for (i, line) in text.lines().enumerate() {
        if i == 0 || line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        ensure!(fields.len() == 2, "malformed registry line {}: {line:?}", i + 1);
        let (name, unique) = (fields[0], fields[1]);
        if seen.insert(unique.to_string()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    ensure!(bytes.len() % 2 == 0, "odd byte count for UTF-16 content");
    let units = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]));
    let mut text: String = char::decode_utf16(units)
        .collect::<Result<_, _>>()
        .context("invalid UTF-16")?;
    if text.starts_with('\u{feff}') {
        text.remove(0);
    }
    Ok(text)
}

/// Filesystem-safe project name used for cache/log/marker paths.
pub fn clean_name(name: &str) -> String {
    name.replace('/', "_")
}

/// Output-file form of a project name: spaces become underscores, every
/// other byte outside the unreserved set is percent-encoded.
pub fn quoted_name(name: &str) -> String {
    let underscored = name.replace(' ', "_");
    let mut out = String::with_capacity(underscored.len());
    for b in underscored.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
