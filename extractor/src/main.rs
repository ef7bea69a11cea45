use anyhow::{Context, Result};
use catalog::load_catalog;
use clap::{Parser, Subcommand};
use engine::text::decode_lossy;
use engine::{EngineConfig, ScoredSkill, SkillEngine};
use serde::Serialize;
use sha1::{Digest, Sha1};
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "extractor")]
#[command(about = "Rank catalog skills found in resume text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the skills of a single resume
    Rank {
        /// Plain-text resume
        #[arg(long)]
        resume: String,
        /// Catalog snapshot directory or catalog file
        #[arg(long, default_value = "./catalog")]
        catalog: String,
        /// Engine configuration JSON; omitted fields keep their defaults
        #[arg(long)]
        config: Option<String>,
        /// Override the number of skills returned
        #[arg(long)]
        top_k: Option<usize>,
        /// Include scores in the output
        #[arg(long, default_value_t = false)]
        scores: bool,
        /// Print the skills as a job-search query string instead of JSON
        #[arg(long, default_value_t = false)]
        query: bool,
    },
    /// Rank every .txt resume under a file or directory into JSONL
    Batch {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Catalog snapshot directory or catalog file
        #[arg(long, default_value = "./catalog")]
        catalog: String,
        /// Output JSONL file
        #[arg(long)]
        output: String,
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[derive(Serialize)]
struct RankOutput<'a> {
    resume: &'a str,
    skills: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<&'a [ScoredSkill]>,
}

#[derive(Serialize)]
struct BatchRecord<'a> {
    id: String,
    path: &'a str,
    skills: Vec<&'a str>,
    scores: &'a [ScoredSkill],
    timestamp: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { resume, catalog, config, top_k, scores, query } => {
            let engine = build_engine(&catalog, config.as_deref(), top_k)?;
            let ranked = engine.rank_scored(&read_resume(Path::new(&resume))?);
            if query {
                println!("{}", search_query(&ranked));
            } else {
                let out = RankOutput {
                    resume: &resume,
                    skills: ranked.iter().map(|s| s.name.as_str()).collect(),
                    scores: scores.then_some(ranked.as_slice()),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Ok(())
        }
        Commands::Batch { input, catalog, output, config, top_k } => {
            let engine = build_engine(&catalog, config.as_deref(), top_k)?;
            rank_batch(&engine, Path::new(&input), Path::new(&output))
        }
    }
}

fn build_engine(catalog_path: &str, config_path: Option<&str>, top_k: Option<usize>) -> Result<SkillEngine> {
    let catalog = load_catalog(catalog_path)?;
    let mut config = match config_path {
        Some(p) => load_config(Path::new(p))?,
        None => EngineConfig::default(),
    };
    if let Some(k) = top_k {
        config = config.with_top_k(k);
    }
    Ok(SkillEngine::with_config(&catalog, config))
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_resume(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_lossy(&bytes))
}

/// Ranked skills joined the way the job search expects them.
fn search_query(ranked: &[ScoredSkill]) -> String {
    ranked.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
}

fn collect_resumes(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files.sort();
    files
}

fn rank_batch(engine: &SkillEngine, input: &Path, output: &Path) -> Result<()> {
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(output).with_context(|| format!("creating {}", output.display()))?);

    let files = collect_resumes(input);
    let mut written = 0usize;
    for file in &files {
        let text = match read_resume(file) {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(path = %file.display(), error = %err, "skipping resume");
                continue;
            }
        };
        let ranked = engine.rank_scored(&text);
        let path = file.to_string_lossy();
        let rec = BatchRecord {
            id: path_id(&path),
            path: &path,
            skills: ranked.iter().map(|s| s.name.as_str()).collect(),
            scores: &ranked,
            timestamp: time::OffsetDateTime::now_utc().format(&Rfc3339).context("formatting timestamp")?,
        };
        serde_json::to_writer(&mut out, &rec)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;

    tracing::info!(found = files.len(), written, output = %output.display(), "batch complete");
    Ok(())
}

fn path_id(path: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(path.as_bytes());
    format!("{:x}", hasher.finalize())
}
