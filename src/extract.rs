use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::debug;
use crate::error::Result;
use crate::file::{load_root, RootSelector};
use crate::search::{search, SearchOptions};
use crate::types::{FileReport, MatchResult};

/// Load one export and search it.
pub fn extract_file(path: &Path, selector: &RootSelector, options: &SearchOptions) -> Result<Vec<MatchResult>> {
    let root = load_root(path, selector)?;
    let matches = search(&root, options);
    debug!("search"; "{}: {} matches", path.display(), matches.len());
    Ok(matches)
}

/// Extract several exports in parallel. Reports keep the order of `paths`;
/// a failing file only fails its own report.
pub fn extract_batch(paths: &[PathBuf], selector: &RootSelector, options: &SearchOptions) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| match extract_file(path, selector, options) {
            Ok(matches) => FileReport { file: path.clone(), matches, error: None },
            Err(e) => FileReport {
                file: path.clone(),
                matches: Vec::new(),
                error: Some(format!("{:#}", anyhow::Error::new(e))),
            },
        })
        .collect()
}
