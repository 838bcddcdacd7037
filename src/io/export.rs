use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{format_cents, MonthPeriod, Transaction};

/// Column names of the exported report, in order.
pub const CSV_HEADERS: [&str; 5] = ["Date", "Type", "Category", "Amount", "Note"];

/// How double quotes inside a note are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteQuoting {
    /// Note wrapped in quotes, embedded quotes left untouched.
    #[default]
    Verbatim,
    /// Embedded quotes doubled, so standard CSV readers recover the note exactly.
    Escaped,
}

/// A rendered monthly report ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    pub rows: usize,
}

/// `<prefix>_<MonthName>_<Year>.csv`
pub fn export_filename(prefix: &str, period: MonthPeriod) -> String {
    format!("{}_{}_{}.csv", prefix, period.month_name(), period.year())
}

/// Write one header line and one line per transaction, in the order given.
/// Every line, including the last, ends with `\n`.
pub fn write_csv<W: Write>(
    writer: W,
    transactions: &[Transaction],
    quoting: NoteQuoting,
) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;

    let mut count = 0;
    for transaction in transactions {
        csv_writer.write_record([
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.kind.label().to_string(),
            transaction.category.clone(),
            format_cents(transaction.amount_cents),
            quote_note(transaction.note.as_deref().unwrap_or_default(), quoting),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Render the report as a string. Lines are joined by `\n` with no trailing newline.
pub fn render_csv(transactions: &[Transaction], quoting: NoteQuoting) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, transactions, quoting)?;

    let mut content = String::from_utf8(buffer).context("CSV output is not valid UTF-8")?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

fn quote_note(note: &str, quoting: NoteQuoting) -> String {
    match quoting {
        NoteQuoting::Verbatim => format!("\"{}\"", note),
        NoteQuoting::Escaped => format!("\"{}\"", note.replace('"', "\"\"")),
    }
}
