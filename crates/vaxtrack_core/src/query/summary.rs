//! Dashboard counts across the three collections.

use crate::model::lifecycle::RecordStatus;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// Record counts per status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub completed: u64,
    pub due: u64,
    pub overdue: u64,
}

/// Collection sizes shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub vaccines: u64,
    pub patients: u64,
    pub records: u64,
    pub records_by_status: StatusCounts,
}

pub fn summarize(conn: &Connection) -> RepoResult<DashboardSummary> {
    let mut summary = DashboardSummary {
        vaccines: count_rows(conn, "vaccines")?,
        patients: count_rows(conn, "patients")?,
        records: count_rows(conn, "vaccination_records")?,
        records_by_status: StatusCounts::default(),
    };

    let mut stmt = conn.prepare(
        "SELECT status, COUNT(*) AS total
         FROM vaccination_records
         GROUP BY status;",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let status_text: String = row.get("status")?;
        let total = to_count(row.get("total")?)?;
        let status = status_text.parse::<RecordStatus>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid status `{status_text}` in vaccination_records.status"
            ))
        })?;
        match status {
            RecordStatus::Completed => summary.records_by_status.completed = total,
            RecordStatus::Due => summary.records_by_status.due = total,
            RecordStatus::Overdue => summary.records_by_status.overdue = total,
        }
    }

    Ok(summary)
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let total: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    to_count(total)
}

fn to_count(value: i64) -> RepoResult<u64> {
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative count `{value}`")))
}
