//! Loads the content directory into memory once at startup.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::{info, warn};

use crate::domain::posts::DocumentSet;

use super::error::InfraError;

const CONTENT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Read every content file directly inside `directory`.
///
/// Subdirectories and files with other extensions are ignored. Entries are
/// ordered by file name so the encounter order is stable across runs. A
/// missing directory yields an empty set; a file that is not valid UTF-8 is
/// skipped with a warning.
pub async fn load_documents(directory: &Path) -> Result<DocumentSet, InfraError> {
    let mut entries = match fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(
                target = "gambit::content::load",
                directory = %directory.display(),
                "content directory missing; serving an empty blog"
            );
            return Ok(DocumentSet::new());
        }
        Err(err) => return Err(InfraError::content(directory, err)),
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| InfraError::content(directory, err))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|err| InfraError::content(entry.path(), err))?;
        let path = entry.path();
        if file_type.is_file() && is_content_file(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut documents = DocumentSet::new();
    for path in paths {
        match fs::read_to_string(&path).await {
            Ok(text) => documents.push(path, text),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(
                    target = "gambit::content::load",
                    path = %path.display(),
                    "content file is not valid UTF-8; skipped"
                );
            }
            Err(err) => return Err(InfraError::content(path, err)),
        }
    }

    info!(
        target = "gambit::content::load",
        directory = %directory.display(),
        documents = documents.len(),
        "content loaded"
    );
    Ok(documents)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CONTENT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
