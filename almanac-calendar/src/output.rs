use std::fs;
use std::path::Path;

use almanac_common::{AlmanacError, Result};

use crate::model::AggregateOutput;

/// Write the aggregate document as pretty JSON, creating parent directories.
///
/// Called once per run, after every window has been scraped.
pub fn write_output(path: &Path, output: &AggregateOutput) -> Result<()> {
    let io_err = |source| AlmanacError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(output)?;
    fs::write(path, json).map_err(io_err)?;

    tracing::info!(
        count = output.events.len(),
        path = %path.display(),
        "calendar.output.saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventRecord;
    use tempfile::TempDir;

    #[test]
    fn writes_events_document_into_new_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("results").join("calendar_events.json");
        let output = AggregateOutput {
            events: vec![EventRecord {
                title: "Open Gym".into(),
                date: "2025-04-02".into(),
                time: None,
                description: None,
            }],
        };

        write_output(&path, &output).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"events\": [\n    {\n      \"title\": \"Open Gym\",\n      \"date\": \"2025-04-02\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn empty_run_still_writes_a_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events.json");
        write_output(&path, &AggregateOutput::default()).unwrap();

        let parsed: AggregateOutput =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed.events.is_empty());
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        // a directory cannot be overwritten as a file
        let err = write_output(tmp.path(), &AggregateOutput::default()).unwrap_err();
        assert!(matches!(err, AlmanacError::Io { .. }), "got {err:?}");
    }
}
