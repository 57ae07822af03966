use super::{Dataset, EntryNormalizer};
use crate::har::{Creator, Har, HarReader, Log, Page};
use crate::memory::{MemoryProbe, SystemMemoryProbe};
use crate::validate::check_memory;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Memory is sampled once every this many entries while loading.
pub const MEMORY_CHECK_INTERVAL: usize = 100;

/// Capture-level information taken from the raw log header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: Option<String>,
    pub creator: Option<Creator>,
    pub browser: Option<Creator>,
    pub pages: Vec<Page>,
    /// Raw entry count, including entries that were later dropped.
    pub entries_count: usize,
}

impl Metadata {
    pub fn from_log(log: &Log) -> Self {
        Self {
            version: log.version.clone(),
            creator: log.creator.clone(),
            browser: log.browser.clone(),
            pages: log.pages.clone(),
            entries_count: log.entries.len(),
        }
    }
}

/// Loads a capture into a [`Dataset`], enforcing a memory ceiling.
pub struct CaptureLoader {
    memory_limit_mb: u64,
    probe: Box<dyn MemoryProbe>,
}

impl CaptureLoader {
    pub fn new(memory_limit_mb: u64) -> Self {
        Self::with_probe(memory_limit_mb, Box::new(SystemMemoryProbe::new()))
    }

    pub fn with_probe(memory_limit_mb: u64, probe: Box<dyn MemoryProbe>) -> Self {
        Self {
            memory_limit_mb,
            probe,
        }
    }

    pub fn memory_limit_mb(&self) -> u64 {
        self.memory_limit_mb
    }

    /// Current process memory in MB, if it can be measured.
    pub fn current_memory_mb(&self) -> Option<f64> {
        self.probe.current_mb()
    }

    /// Load a HAR file from disk
    pub fn load(&self, path: &Path) -> Result<(Dataset, Metadata)> {
        tracing::info!("Parsing HAR file: {}", path.display());
        let har = HarReader::from_file(path)?;
        self.load_har(&har)
    }

    /// Load a HAR document held in memory
    pub fn load_str(&self, content: &str) -> Result<(Dataset, Metadata)> {
        let har = HarReader::from_str(content)?;
        self.load_har(&har)
    }

    fn load_har(&self, har: &Har) -> Result<(Dataset, Metadata)> {
        let metadata = Metadata::from_log(&har.log);
        let total = har.log.entries.len();
        tracing::info!("Found {} entries in HAR file", total);

        let mut rows = Vec::with_capacity(total);
        for (idx, entry) in har.log.entries.iter().enumerate() {
            if idx % MEMORY_CHECK_INTERVAL == 0 {
                tracing::debug!("Processing entry {}/{}", idx + 1, total);
                self.check_memory()?;
            }

            match EntryNormalizer::try_normalize(entry) {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => tracing::debug!("Skipping entry {} without a url", idx),
                Err(e) => tracing::warn!("Failed to process entry {}: {}", idx, e),
            }
        }

        if rows.is_empty() {
            return Err(Error::Parsing(
                "No valid entries found in HAR file".to_string(),
            ));
        }

        tracing::info!("Successfully parsed {} requests", rows.len());
        Ok((Dataset::new(rows), metadata))
    }

    fn check_memory(&self) -> Result<()> {
        match self.probe.current_mb() {
            Some(current) => check_memory(current, self.memory_limit_mb),
            None => {
                tracing::debug!("Memory usage unavailable, skipping check");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::rc::Rc;

    fn entry(url: &str, time: f64) -> Value {
        json!({
            "request": {"method": "GET", "url": url},
            "response": {"status": 200, "content": {"size": 1024, "mimeType": "text/css"}},
            "time": time,
            "startedDateTime": "2025-01-01T10:00:00.000Z",
            "timings": {"wait": time}
        })
    }

    fn capture(entries: Vec<Value>) -> String {
        json!({
            "log": {
                "version": "1.2",
                "creator": {"name": "Test", "version": "1.0"},
                "browser": {"name": "Chrome", "version": "120"},
                "pages": [{"id": "page_1", "title": "Home", "startedDateTime": "2025-01-01T10:00:00.000Z"}],
                "entries": entries
            }
        })
        .to_string()
    }

    fn loader() -> CaptureLoader {
        CaptureLoader::with_probe(1024, Box::new(|| Some(10.0)))
    }

    #[test]
    fn test_load_collects_rows_and_metadata() {
        let content = capture(vec![
            entry("https://example.com/a.css", 10.0),
            entry("https://example.com/b.css", 20.0),
        ]);

        let (data, metadata) = loader().load_str(&content).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.rows()[1].url, "https://example.com/b.css");
        assert_eq!(metadata.version.as_deref(), Some("1.2"));
        assert_eq!(
            metadata.browser.and_then(|b| b.name).as_deref(),
            Some("Chrome")
        );
        assert_eq!(metadata.pages.len(), 1);
        assert_eq!(metadata.entries_count, 2);
    }

    #[test]
    fn test_malformed_entry_is_dropped_but_counted() {
        let content = capture(vec![
            entry("https://example.com/a.css", 10.0),
            json!({"request": {"url": "https://example.com/bad"}, "time": "oops"}),
            json!({"request": {}, "response": {}, "time": 1, "startedDateTime": ""}),
        ]);

        let (data, metadata) = loader().load_str(&content).unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(metadata.entries_count, 3);
    }

    #[test]
    fn test_all_entries_malformed_is_parsing_error() {
        let content = capture(vec![
            json!({"request": {}, "response": {}, "time": 1, "startedDateTime": ""}),
            json!({"request": {"url": 42}}),
        ]);

        let err = loader().load_str(&content).unwrap_err();
        assert!(matches!(err, Error::Parsing(_)));
    }

    #[test]
    fn test_empty_entries_is_invalid_format() {
        let err = loader().load_str(&capture(vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_memory_ceiling_aborts_load() {
        let loader = CaptureLoader::with_probe(512, Box::new(|| Some(4096.0)));
        let content = capture(vec![entry("https://example.com/a.css", 10.0)]);

        let err = loader.load_str(&content).unwrap_err();
        assert!(matches!(
            err,
            Error::ResourceExceeded { limit_mb: 512, .. }
        ));
    }

    #[test]
    fn test_memory_is_sampled_every_interval() {
        let samples = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&samples);
        let loader = CaptureLoader::with_probe(
            1024,
            Box::new(move || {
                counter.set(counter.get() + 1);
                Some(1.0)
            }),
        );

        let entries = (0..250)
            .map(|i| entry(&format!("https://example.com/{i}.css"), 1.0))
            .collect();
        let (data, _) = loader.load_str(&capture(entries)).unwrap();

        assert_eq!(data.len(), 250);
        // entries 0, 100 and 200
        assert_eq!(samples.get(), 3);
    }

    #[test]
    fn test_unmeasurable_memory_does_not_fail() {
        let loader = CaptureLoader::with_probe(1, Box::new(|| None));
        let content = capture(vec![entry("https://example.com/a.css", 10.0)]);
        assert!(loader.load_str(&content).is_ok());
    }
}
