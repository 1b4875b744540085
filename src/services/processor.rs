use crate::models::{DutRecord, FileFailure, RunLabel, UploadedFile};

use super::sheet::{loader, records};

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<DutRecord>,
    pub failures: Vec<FileFailure>,
}

fn base_name(name: &str) -> &str {
    name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Run one tagged file collection through the extraction pipeline, file by
/// file. Unreadable spreadsheets are reported and skipped; the batch always
/// runs to the end.
pub fn process_files(files: &[UploadedFile], run: RunLabel) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for file in files {
        if !loader::is_spreadsheet_file(&file.name) {
            tracing::debug!("skipping non-spreadsheet upload {}", file.name);
            continue;
        }

        match loader::load_rows(&file.data) {
            Ok(rows) => {
                let record = records::extract_record(base_name(&file.name), run, rows);
                tracing::info!("extracted {} record from {}", run, record.file_name);
                outcome.records.push(record);
            }
            Err(e) => {
                tracing::error!("could not read {}: {}", file.name, e);
                outcome.failures.push(FileFailure {
                    file_name: base_name(&file.name).to_string(),
                    run,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}
