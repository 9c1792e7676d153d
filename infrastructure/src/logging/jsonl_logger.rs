//! JSONL file writer for solver epoch events.
//!
//! Each [`EpochEvent`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use quizsolver_application::ports::epoch_logger::{EpochEvent, EpochLogger};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL epoch logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEpochLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEpochLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create epoch log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create epoch log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: EpochEvent, timestamp: String) -> Value {
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::String(event.event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        }
        other => serde_json::json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl EpochLogger for JsonlEpochLogger {
    fn log(&self, event: EpochEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(line) = serde_json::to_string(&record(event, timestamp)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEpochLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<Value> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.epochs.jsonl");
        let logger = JsonlEpochLogger::new(&path).unwrap();

        logger.log(EpochEvent::new(
            "feedback",
            serde_json::json!({
                "result": {"epoch": 1, "score": 0.25, "finished": false},
                "solved": 3,
            }),
        ));
        logger.log(EpochEvent::new(
            "finished",
            serde_json::json!({"result": {"epoch": 2, "finished": true}}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for value in &lines {
            let timestamp = value["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        }
        assert_eq!(lines[0]["type"], "feedback");
        assert_eq!(lines[0]["result"]["epoch"], 1);
        assert_eq!(lines[0]["solved"], 3);
        assert_eq!(lines[1]["type"], "finished");
        assert_eq!(lines[1]["result"]["finished"], true);
    }

    #[test]
    fn test_jsonl_logger_handles_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scalar.jsonl");
        let logger = JsonlEpochLogger::new(&path).unwrap();

        logger.log(EpochEvent::new("note", serde_json::json!(0.5)));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], 0.5);
    }

    #[test]
    fn test_jsonl_logger_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("epochs.jsonl");
        let logger = JsonlEpochLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }
}
