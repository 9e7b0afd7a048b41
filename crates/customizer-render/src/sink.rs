//! Style sinks: the single mutable text target the pipeline renders into.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// Receives the complete style text after every flush.
///
/// Each call replaces the whole previous content in one operation. On
/// error the previous content is left in place.
pub trait StyleSink: Send {
    fn replace(&mut self, text: &str) -> std::io::Result<()>;
}

/// In-memory sink; clones share the same buffer so the owner of the
/// pipeline can still read what was rendered.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    text: Arc<Mutex<String>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `replace` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl StyleSink for MemorySink {
    fn replace(&mut self, text: &str) -> std::io::Result<()> {
        let mut guard = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
        guard.push_str(text);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Writes the style text to a `.css` file, swapping it in via rename so
/// readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, text: &str) -> std::io::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl StyleSink for FileSink {
    fn replace(&mut self, text: &str) -> std::io::Result<()> {
        self.write_atomic(text)?;
        debug!(path = %self.path.display(), bytes = text.len(), "style file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_replaces_whole_content() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.replace("a { color: red; }").unwrap();
        writer.replace("b { color: blue; }").unwrap();

        assert_eq!(sink.contents(), "b { color: blue; }");
        assert_eq!(sink.write_count(), 2);
    }

    #[test]
    fn file_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.css");
        let mut sink = FileSink::new(&path);

        sink.replace(".a { width: 1px; }\n").unwrap();
        sink.replace(".b { width: 2px; }\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), ".b { width: 2px; }\n");
        assert!(!dir.path().join("console.css.tmp").exists());
    }

    #[test]
    fn file_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing").join("console.css"));
        let err = sink.replace("x").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!sink.path().exists());
    }
}
