use anyhow::{bail, Context, Result};
use engine::SkillCatalog;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_skills: u32,
    pub created_at: String,
    pub version: u32,
    /// Where the names came from: a file path or the skills service URL.
    pub source: String,
}

pub struct SnapshotPaths {
    pub root: PathBuf,
}

impl SnapshotPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn skills(&self) -> PathBuf { self.root.join("skills.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// True when `root` looks like a snapshot directory.
    pub fn exists(&self) -> bool { self.meta().is_file() && self.skills().is_file() }
}

/// Write the catalog (sorted names, bincode) next to its JSON metadata.
pub fn save_snapshot(paths: &SnapshotPaths, catalog: &SkillCatalog, source: &str) -> Result<MetaFile> {
    create_dir_all(&paths.root).with_context(|| format!("creating {}", paths.root.display()))?;
    let names: Vec<&str> = catalog.iter().collect();
    fs::write(paths.skills(), bincode::serialize(&names)?)
        .with_context(|| format!("writing {}", paths.skills().display()))?;

    let meta = MetaFile {
        num_skills: names.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("formatting snapshot timestamp")?,
        version: SNAPSHOT_VERSION,
        source: source.to_string(),
    };
    fs::write(paths.meta(), serde_json::to_string_pretty(&meta)?)
        .with_context(|| format!("writing {}", paths.meta().display()))?;
    Ok(meta)
}

pub fn load_snapshot(paths: &SnapshotPaths) -> Result<(SkillCatalog, MetaFile)> {
    let json = fs::read_to_string(paths.meta()).with_context(|| format!("reading {}", paths.meta().display()))?;
    let meta: MetaFile = serde_json::from_str(&json).context("decoding meta.json")?;
    if meta.version != SNAPSHOT_VERSION {
        bail!("unsupported snapshot version {} (expected {SNAPSHOT_VERSION})", meta.version);
    }

    let bytes = fs::read(paths.skills()).with_context(|| format!("reading {}", paths.skills().display()))?;
    let names: Vec<String> = bincode::deserialize(&bytes).context("decoding skills.bin")?;
    let catalog: SkillCatalog = names.into_iter().collect();
    if catalog.len() as u32 != meta.num_skills {
        tracing::warn!(expected = meta.num_skills, found = catalog.len(), "snapshot count mismatch");
    }
    Ok((catalog, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SnapshotPaths::new(dir.path());
        let catalog: SkillCatalog = ["Rust"].into_iter().collect();
        save_snapshot(&paths, &catalog, "test").unwrap();
        fs::write(dir.path().join("meta.json"), r#"{"num_skills":1,"created_at":"","version":99,"source":"test"}"#).unwrap();
        let err = load_snapshot(&paths).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }

    #[test]
    fn metadata_carries_an_rfc3339_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let catalog: SkillCatalog = ["Rust", "Go"].into_iter().collect();
        let meta = save_snapshot(&SnapshotPaths::new(dir.path()), &catalog, "test").unwrap();
        assert!(time::OffsetDateTime::parse(&meta.created_at, &Rfc3339).is_ok(), "{}", meta.created_at);
        assert_eq!(meta.num_skills, 2);
    }

    #[test]
    fn missing_directory_is_not_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!SnapshotPaths::new(dir.path().join("nope")).exists());
    }
}
