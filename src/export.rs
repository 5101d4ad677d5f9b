//! CSV export of expense lists.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};
use crate::models::ExpenseRequest;
use crate::timefmt::{format_date, format_datetime};

/// One exported line. Column names are the header row.
#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Expense Date")]
    expense_date: String,
    #[serde(rename = "Created Date")]
    created_date: String,
    #[serde(rename = "Submitted Date")]
    submitted_date: String,
    #[serde(rename = "Processed Date")]
    processed_date: String,
    #[serde(rename = "Creator")]
    creator: String,
    #[serde(rename = "Processed By")]
    processed_by: &'a str,
    #[serde(rename = "Rejection Reason")]
    rejection_reason: &'a str,
    #[serde(rename = "Attachments Count")]
    attachments_count: usize,
}

impl<'a> From<&'a ExpenseRequest> for ExpenseRow<'a> {
    fn from(expense: &'a ExpenseRequest) -> Self {
        Self {
            id: expense.id.to_string(),
            title: &expense.title,
            description: &expense.description,
            amount: format!("{:.2}", expense.amount),
            status: expense.status.name(),
            category: expense.category_name(),
            expense_date: format_date(&expense.expense_date),
            created_date: format_datetime(&expense.created_at),
            submitted_date: expense.submitted_at.as_ref().map(format_datetime).unwrap_or_default(),
            processed_date: expense.processed_at.as_ref().map(format_datetime).unwrap_or_default(),
            creator: expense.creator_display(),
            processed_by: expense.processed_by.as_deref().unwrap_or(""),
            rejection_reason: expense.rejection_reason.as_deref().unwrap_or(""),
            attachments_count: expense.attachment_urls.len(),
        }
    }
}

/// Write the header plus one row per expense. Quotes inside fields are
/// escaped by doubling; lines end in `\n`.
pub fn write_expenses_csv<W: Write>(writer: W, expenses: &[ExpenseRequest]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    if expenses.is_empty() {
        wtr.write_record(HEADERS)?;
    }
    for expense in expenses {
        wtr.serialize(ExpenseRow::from(expense))?;
    }

    wtr.flush()?;
    Ok(())
}

pub const HEADERS: [&str; 14] = [
    "ID",
    "Title",
    "Description",
    "Amount",
    "Status",
    "Category",
    "Expense Date",
    "Created Date",
    "Submitted Date",
    "Processed Date",
    "Creator",
    "Processed By",
    "Rejection Reason",
    "Attachments Count",
];

/// `{prefix}_{YYYY-MM-DD_HHMMSS}.csv`
pub fn generate_csv_filename(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y-%m-%d_%H%M%S"))
}

/// Export into `dir` under a timestamped name and return the file path.
pub fn export_expenses_csv(
    dir: &Path,
    prefix: &str,
    expenses: &[ExpenseRequest],
) -> Result<PathBuf> {
    if expenses.is_empty() {
        return Err(ClientError::invalid("No expenses to export"));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(generate_csv_filename(prefix, Local::now()));
    let file = std::fs::File::create(&path)?;
    write_expenses_csv(file, expenses)?;

    tracing::info!(path = %path.display(), rows = expenses.len(), "expenses exported");
    Ok(path)
}
