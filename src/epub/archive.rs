//! Unpacking the issue archive into a working tree.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::site::{ARTICLES_DIR, IMAGES_DIR};

/// Destroy and recreate the work and output roots.
///
/// Leaves `output_dir/articles` and `output_dir/images` in place, empty.
pub fn prepare_workspace(work_dir: &Path, output_dir: &Path) -> Result<()> {
    for dir in [work_dir, output_dir] {
        if dir.exists() {
            debug!(dir = %dir.display(), "clearing previous run");
            fs::remove_dir_all(dir)?;
        }
    }

    fs::create_dir_all(work_dir)?;
    fs::create_dir_all(output_dir.join(ARTICLES_DIR))?;
    fs::create_dir_all(output_dir.join(IMAGES_DIR))?;
    Ok(())
}

/// Extract every entry of `archive` under `dest`, preserving directories.
///
/// Returns the number of files written. Entries whose names would escape
/// `dest` are skipped.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize> {
    if !archive.is_file() {
        return Err(Error::ArchiveNotFound(archive.to_path_buf()));
    }

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let mut count = 0;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        let Some(entry_path) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let output_path = dest.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&output_path)?;
        io::copy(&mut entry, &mut outfile)?;
        count += 1;
    }

    Ok(count)
}
