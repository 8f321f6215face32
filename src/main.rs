mod cache;
mod config;
mod dedup;
mod output;
mod parser;
mod plog;
mod projects;
mod record;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use config::Config;

#[derive(Parser)]
#[command(name = "assesslog", about = "WikiProject assessment-log parser")]
struct Cli {
    /// Run directory containing data/ and output/
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Project registry TSV (UTF-16-LE); defaults to data/projects.utf-16-le.tsv
    #[arg(long)]
    projects: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse cached log pages for every pending project
    Parse {
        /// First project name to process (skip names sorting before it)
        #[arg(long)]
        from: Option<String>,
        /// Stop before this project name
        #[arg(long)]
        to: Option<String>,
        /// Max projects to process this run
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show registry and completion statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = Config::new(cli.root, cli.projects);

    let result = match cli.command {
        Commands::Parse { from, to, limit } => run_parse(&cfg, from, to, limit),
        Commands::Stats => run_stats(&cfg),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_parse(
    cfg: &Config,
    from: Option<String>,
    to: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let names = projects::load_registry(&cfg.projects_tsv)?;

    let mut completed = 0usize;
    let mut pending: Vec<String> = Vec::new();
    for name in &names {
        if let Some(f) = &from {
            if f > name {
                tracing::debug!("skipping (before --from): {name}");
                continue;
            }
        }
        if let Some(t) = &to {
            if t <= name {
                break;
            }
        }
        if output::is_complete(&cfg.marker_path(&projects::clean_name(name))) {
            completed += 1;
            continue;
        }
        pending.push(name.clone());
    }
    if let Some(n) = limit {
        pending.truncate(n);
    }

    if pending.is_empty() {
        println!(
            "No pending projects ({completed} already complete of {} in range).",
            names.len()
        );
        return Ok(());
    }
    println!(
        "Parsing {} projects ({completed} already complete)...",
        pending.len()
    );

    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Projects are fully independent (disjoint cache/log/output paths), so
    // they parallelize at this level; page order within a project stays
    // strictly sequential.
    let results: Vec<(usize, bool)> = pending
        .par_iter()
        .map(|name| {
            let res = parser::parse_project(cfg, name);
            let out = match res {
                Ok(summary) => {
                    if summary.aborted_pages > 0 {
                        tracing::warn!(
                            project = %name,
                            "{} of {} pages aborted",
                            summary.aborted_pages,
                            summary.pages
                        );
                    }
                    (summary.records, true)
                }
                Err(e) => {
                    tracing::error!(project = %name, "parse failed: {e:#}");
                    (0, false)
                }
            };
            let cache_dir = cfg.cache_dir(&projects::clean_name(name));
            if cache_dir.exists() {
                if let Err(e) = cache::cleanup(&cache_dir) {
                    tracing::warn!(project = %name, "cache cleanup failed: {e}");
                }
            }
            pb.inc(1);
            out
        })
        .collect();
    pb.finish_and_clear();

    let ok = results.iter().filter(|(_, ok)| *ok).count();
    let failed = results.len() - ok;
    let records: usize = results.iter().map(|(n, _)| n).sum();
    println!("Done: {ok} projects parsed ({failed} failed), {records} records.");
    Ok(())
}

fn run_stats(cfg: &Config) -> anyhow::Result<()> {
    let names = projects::load_registry(&cfg.projects_tsv)?;
    let completed = names
        .iter()
        .filter(|n| output::is_complete(&cfg.marker_path(&projects::clean_name(n))))
        .count();
    let outputs = match std::fs::read_dir(cfg.assessments_dir()) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".utf8.tsv"))
            .count(),
        Err(_) => 0,
    };
    println!("Projects:  {}", names.len());
    println!("Complete:  {completed}");
    println!("Pending:   {}", names.len() - completed);
    println!("Outputs:   {outputs}");
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
