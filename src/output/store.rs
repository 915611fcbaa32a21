//! On-disk page store
//!
//! Writes are plain `File::create` + write; an interrupted write can leave a
//! partial file behind.

use crate::error::{Error, Result};
use crate::types::{QueryName, Record};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const PAGE_EXTENSION: &str = "json";

/// Directory tree of persisted pages
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one server's pages for one query
    pub fn query_dir(&self, server: &str, query: QueryName) -> PathBuf {
        self.root.join(server).join(query.as_str())
    }

    /// Path of a single page file
    pub fn page_path(&self, server: &str, query: QueryName, stem: &str) -> PathBuf {
        self.query_dir(server, query)
            .join(format!("{stem}.{PAGE_EXTENSION}"))
    }

    /// Create the query directory (and parents) if missing
    pub fn ensure_query_dir(&self, server: &str, query: QueryName) -> Result<PathBuf> {
        let dir = self.query_dir(server, query);
        fs::create_dir_all(&dir).map_err(|e| {
            Error::output(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
        Ok(dir)
    }

    /// Whether a page has already been saved
    pub fn exists(&self, server: &str, query: QueryName, stem: &str) -> bool {
        self.page_path(server, query, stem).exists()
    }

    /// Write a page, replacing any previous file with the same stem
    pub fn write_page(
        &self,
        server: &str,
        query: QueryName,
        stem: &str,
        records: &[Record],
    ) -> Result<PathBuf> {
        let path = self.page_path(server, query, stem);
        let file = File::create(&path).map_err(|e| {
            Error::output(format!("Failed to create file {}: {e}", path.display()))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, records)?;
        writer.flush().map_err(|e| {
            Error::output(format!("Failed to write file {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), records = records.len(), "Saved page");
        Ok(path)
    }

    /// Every saved page file for a server and query, sorted by file name
    ///
    /// A missing directory yields an empty list.
    pub fn page_files(&self, server: &str, query: QueryName) -> Result<Vec<PathBuf>> {
        let dir = self.query_dir(server, query);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == PAGE_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read one page file back
    pub fn read_page(&self, path: &Path) -> Result<Vec<Record>> {
        let file = File::open(path).map_err(|e| {
            Error::output(format!("Failed to open file {}: {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            Error::output(format!("Failed to parse page {}: {e}", path.display()))
        })
    }
}
