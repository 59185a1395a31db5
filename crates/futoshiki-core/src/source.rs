//! Catalog sources.
//!
//! - Http: the published daily puzzle list
//! - File: a local copy of the same JSON, for offline play
//! - Static: in-memory puzzles for tests

use crate::catalog::Catalog;
use crate::error::{GameError, GameResult};
use crate::puzzle::PuzzleDefinition;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Published catalog of daily puzzles
pub const DEFAULT_CATALOG_URL: &str = "https://www.iqobi.com/futoshiki-today/puzzles.json";

/// Something that can produce the puzzle catalog
pub trait CatalogSource: Send + Sync {
    /// Fetch the whole catalog once. Failures are never retried here.
    fn fetch(&self) -> GameResult<Catalog>;

    /// Name for display and logs
    fn source_name(&self) -> String;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    fn fetch(&self) -> GameResult<Catalog> {
        (**self).fetch()
    }

    fn source_name(&self) -> String {
        (**self).source_name()
    }
}

fn parse_catalog(json: &str) -> GameResult<Catalog> {
    serde_json::from_str::<Vec<PuzzleDefinition>>(json)
        .map(Catalog::new)
        .map_err(|e| GameError::SourceUnavailable(format!("invalid catalog data: {}", e)))
}

// ==================== HTTP Source ====================

/// Catalog fetched over HTTP
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self) -> GameResult<Catalog> {
        let unavailable = |e: reqwest::Error| GameError::SourceUnavailable(e.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(unavailable)?;

        log::info!("fetching catalog from {}", self.url);
        let response = client.get(&self.url).send().map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("catalog request to {} returned {}", self.url, status);
            return Err(GameError::SourceUnavailable(format!("server returned {}", status)));
        }

        let body = response.text().map_err(unavailable)?;
        let catalog = parse_catalog(&body)?;
        log::info!("catalog holds {} puzzles", catalog.len());
        Ok(catalog)
    }

    fn source_name(&self) -> String {
        self.url.clone()
    }
}

// ==================== File Source ====================

/// Catalog read from a local JSON file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileSource {
    fn fetch(&self) -> GameResult<Catalog> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            GameError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        parse_catalog(&json)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

// ==================== Static Source ====================

/// In-memory catalog for tests
pub struct StaticSource {
    puzzles: Option<Vec<PuzzleDefinition>>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(puzzles: Vec<PuzzleDefinition>) -> Self {
        Self {
            puzzles: Some(puzzles),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source whose every fetch fails
    pub fn unavailable() -> Self {
        Self {
            puzzles: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// How many times the catalog was fetched
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CatalogSource for StaticSource {
    fn fetch(&self) -> GameResult<Catalog> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.puzzles
            .clone()
            .map(Catalog::new)
            .ok_or_else(|| GameError::SourceUnavailable("static source unavailable".into()))
    }

    fn source_name(&self) -> String {
        "static".to_string()
    }
}

/// Pick a source for a catalog location: URLs go over HTTP, anything else is a file
pub fn source_for(location: &str, timeout: Duration) -> Box<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location, timeout))
    } else {
        Box::new(FileSource::new(location))
    }
}
