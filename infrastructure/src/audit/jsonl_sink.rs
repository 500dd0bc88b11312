//! JSONL audit sink.
//!
//! Each [`AuditEntry`] is serialized as a single JSON line and appended to
//! the log file via a buffered writer, flushed per record so the log stays
//! durable across crashes. The file is opened in append mode — the audit
//! trail accumulates across gateway runs.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use toolgate_application::ports::audit_sink::{AuditSink, AuditSinkError};
use toolgate_domain::audit::AuditEntry;

/// Audit sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every record and on
/// `Drop`.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open (or create) the audit log at the given path, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditSinkError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AuditSinkError::Io(format!("{}: {}", parent.display(), e)))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AuditSinkError::Io(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, entry: &AuditEntry) -> Result<(), AuditSinkError> {
        let line = serde_json::to_string(entry)
            .map_err(|e| AuditSinkError::Serialize(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditSinkError::Io("audit writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| AuditSinkError::Io(e.to_string()))?;
        writer.flush().map_err(|e| AuditSinkError::Io(e.to_string()))?;
        Ok(())
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
