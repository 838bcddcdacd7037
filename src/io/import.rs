use anyhow::Result;
use std::io::Read;

use crate::application::FinanceService;
use crate::domain::{EntryDraft, TransactionKind, ValidationError};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every row without recording anything
    pub dry_run: bool,
}

/// Importer for loading a previously exported report back into the tracker.
/// Columns are read by position: Date, Type, Category, Amount, Note.
pub struct Importer<'a> {
    service: &'a FinanceService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a FinanceService) -> Self {
        Self { service }
    }

    /// Import transactions from CSV. Every row gets a fresh id.
    /// Valid rows are recorded together once the whole file has been read.
    pub async fn import_csv<R: Read>(&self, reader: R, options: ImportOptions) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let mut valid = Vec::new();
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let kind_str = record.get(1).unwrap_or("");
            let Some(kind) = TransactionKind::from_str(kind_str) else {
                errors.push(ImportError {
                    line,
                    field: Some("Type".to_string()),
                    error: format!("Unknown transaction type '{}'", kind_str),
                });
                continue;
            };

            let mut draft = EntryDraft::new(kind, record.get(3).unwrap_or(""))
                .with_date(record.get(0).unwrap_or(""))
                .with_category(record.get(2).unwrap_or(""));
            if let Some(note) = record.get(4).filter(|s| !s.is_empty()) {
                draft = draft.with_note(note);
            }

            match draft.validate() {
                Ok(transaction) => valid.push(transaction),
                Err(e) => errors.push(validation_error(line, e)),
            }
        }

        let imported = if options.dry_run {
            valid.len()
        } else {
            self.service.add_transactions(valid).await?
        };

        Ok(ImportResult { imported, errors })
    }
}

fn validation_error(line: usize, error: ValidationError) -> ImportError {
    let field = match error {
        ValidationError::MissingDate | ValidationError::InvalidDate(_) => "Date",
        ValidationError::MissingCategory => "Category",
        ValidationError::InvalidAmount(_)
        | ValidationError::TooManyDecimals(_)
        | ValidationError::AmountTooLarge(_) => "Amount",
    };
    ImportError {
        line,
        field: Some(field.to_string()),
        error: error.to_string(),
    }
}
