//! Sources of skill catalogs: local files, snapshots, and the remote skills
//! directory.

pub mod auth;
pub mod file;
pub mod remote;
pub mod snapshot;

use anyhow::{bail, Result};
use engine::SkillCatalog;
use std::path::Path;

pub use auth::{ClientCredentials, CredentialProvider, StaticToken};
pub use file::load_catalog_file;
pub use remote::RemoteCatalog;
pub use snapshot::{load_snapshot, save_snapshot, MetaFile, SnapshotPaths};

/// Load a catalog from a snapshot directory or a catalog file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<SkillCatalog> {
    let path = path.as_ref();
    if path.is_dir() {
        let paths = SnapshotPaths::new(path);
        if !paths.exists() {
            bail!("{} is a directory but not a catalog snapshot", path.display());
        }
        let (catalog, meta) = load_snapshot(&paths)?;
        tracing::info!(path = %path.display(), skills = catalog.len(), created_at = %meta.created_at, "loaded catalog snapshot");
        return Ok(catalog);
    }
    load_catalog_file(path)
}
