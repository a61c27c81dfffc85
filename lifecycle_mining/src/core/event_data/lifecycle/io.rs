//! IO implementations for `LifecycleLog`

use std::io::{BufReader, Read, Write};

use crate::core::event_data::lifecycle::record_ingest::{
    import_records_reader, RecordImportOptions,
};
use crate::core::event_data::lifecycle::LifecycleLog;
use crate::core::io::{Exportable, ExtensionWithMime, Importable};

/// Error type for `LifecycleLog` IO operations
#[derive(Debug)]
pub enum LifecycleLogIOError {
    /// IO Error
    Io(std::io::Error),
    /// JSON Parsing Error
    Json(serde_json::Error),
    /// Malformed execution record (1-based line number)
    Record {
        /// Line of the malformed record
        line: usize,
        /// Underlying parsing error
        source: serde_json::Error,
    },
    /// Unsupported Format
    UnsupportedFormat(String),
}

impl std::fmt::Display for LifecycleLogIOError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleLogIOError::Io(e) => write!(f, "IO Error: {}", e),
            LifecycleLogIOError::Json(e) => write!(f, "JSON Error: {}", e),
            LifecycleLogIOError::Record { line, source } => {
                write!(f, "Malformed record in line {}: {}", line, source)
            }
            LifecycleLogIOError::UnsupportedFormat(s) => write!(f, "Unsupported Format: {}", s),
        }
    }
}

impl std::error::Error for LifecycleLogIOError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleLogIOError::Io(e) => Some(e),
            LifecycleLogIOError::Json(e) => Some(e),
            LifecycleLogIOError::Record { source, .. } => Some(source),
            LifecycleLogIOError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for LifecycleLogIOError {
    fn from(e: std::io::Error) -> Self {
        LifecycleLogIOError::Io(e)
    }
}

impl From<serde_json::Error> for LifecycleLogIOError {
    fn from(e: serde_json::Error) -> Self {
        LifecycleLogIOError::Json(e)
    }
}

impl Importable for LifecycleLog {
    type Error = LifecycleLogIOError;
    type ImportOptions = RecordImportOptions;

    fn import_from_reader_with_options<R: Read>(
        reader: R,
        format: &str,
        options: Self::ImportOptions,
    ) -> Result<Self, Self::Error> {
        match format {
            _ if format.ends_with("jsonl.gz") => {
                let gz = flate2::read::GzDecoder::new(reader);
                import_records_reader(BufReader::new(gz), &options)
            }
            _ if format.ends_with("jsonl") || format.ends_with("ndjson") => {
                import_records_reader(BufReader::new(reader), &options)
            }
            _ if format.ends_with("json") => {
                let log: LifecycleLog = serde_json::from_reader(reader)?;
                Ok(log)
            }
            _ => Err(LifecycleLogIOError::UnsupportedFormat(format.to_string())),
        }
    }

    fn known_import_formats() -> Vec<ExtensionWithMime> {
        vec![
            ExtensionWithMime::new("jsonl", "application/jsonl"),
            ExtensionWithMime::new("ndjson", "application/x-ndjson"),
            ExtensionWithMime::new("jsonl.gz", "application/gzip"),
            ExtensionWithMime::new("json", "application/json"),
        ]
    }
}

impl Exportable for LifecycleLog {
    type Error = LifecycleLogIOError;
    type ExportOptions = ();

    fn export_to_writer_with_options<W: Write>(
        &self,
        writer: W,
        format: &str,
        _: Self::ExportOptions,
    ) -> Result<(), Self::Error> {
        if format.ends_with("json") {
            serde_json::to_writer(writer, self)?;
            Ok(())
        } else {
            Err(LifecycleLogIOError::UnsupportedFormat(format.to_string()))
        }
    }

    fn known_export_formats() -> Vec<ExtensionWithMime> {
        vec![ExtensionWithMime::new("json", "application/json")]
    }
}
