/// Locate the per-series mailing list archives on disk
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};

pub fn file_name(series: &str) -> String {
    format!("{}-changes.mbox", series)
}

pub fn archive_path(base_dir: &Path, series: &str) -> PathBuf {
    base_dir.join(file_name(series))
}

/// Where the list server publishes the archive of a series
pub fn download_url(archive_url: &str, series: &str) -> String {
    let name = file_name(series);
    format!("{}/{}/{}", archive_url.trim_end_matches('/'), name, name)
}

/// Open the archive of a series. `Ok(None)` means it has not been downloaded.
pub fn open(base_dir: &Path, series: &str) -> Result<Option<BufReader<File>>> {
    let path = archive_path(base_dir, series);
    match File::open(&path) {
        Ok(f) => Ok(Some(BufReader::new(f))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(format!("Failed to open archive {}", path.display())),
    }
}
