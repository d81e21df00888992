use serde::Serialize;

use super::{RepoError, Repository};
use crate::models::{canonical_day, Attendance, AttendanceFields, AttendanceStatus};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    /// Rounded share of present days, 0 with no records.
    pub percentage: u32,
}

impl Repository<'_, AttendanceFields> {
    /// At most one record per (studentId, date); a repeat mark overwrites it.
    /// The date is stored zero-padded so every spelling of a day matches.
    pub fn mark(&mut self, mut fields: AttendanceFields) -> Result<Attendance, RepoError> {
        fields.date = canonical_day(&fields.date, "date").map_err(RepoError::Validation)?;
        self.upsert_by(fields, |a, b| a.student_id == b.student_id && a.date == b.date)
    }

    pub fn by_student(&self, student_id: &str) -> Result<Vec<Attendance>, StoreError> {
        self.find(|a| a.fields.student_id == student_id)
    }

    pub fn by_date(&self, date: &str) -> Result<Vec<Attendance>, StoreError> {
        let day = canonical_day(date, "date").unwrap_or_else(|_| date.to_string());
        self.find(|a| a.fields.date == day)
    }

    pub fn summary_for(&self, student_id: &str) -> Result<AttendanceSummary, StoreError> {
        let records = self.by_student(student_id)?;
        let count = |status: AttendanceStatus| {
            records
                .iter()
                .filter(|a| a.fields.status == status)
                .count()
        };
        let total = records.len();
        let present = count(AttendanceStatus::Present);
        let percentage = if total == 0 {
            0
        } else {
            ((present as f64 / total as f64) * 100.0).round() as u32
        };
        Ok(AttendanceSummary {
            total,
            present,
            absent: count(AttendanceStatus::Absent),
            late: count(AttendanceStatus::Late),
            percentage,
        })
    }
}
