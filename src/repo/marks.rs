use serde::Serialize;

use super::{rounded_mean, RepoError, Repository};
use crate::models::{Mark, MarkFields};
use crate::store::StoreError;

const DISTINCTION_MARKS: f64 = 80.0;
const LOW_MARKS: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStats {
    pub count: usize,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMarkSummary {
    pub count: usize,
    pub average: f64,
    pub distinctions: usize,
    #[serde(rename = "below60")]
    pub below_60: usize,
}

impl Repository<'_, MarkFields> {
    /// At most one mark per (studentId, examId); resubmission overwrites.
    pub fn submit(&mut self, fields: MarkFields) -> Result<Mark, RepoError> {
        self.upsert_by(fields, |a, b| {
            a.student_id == b.student_id && a.exam_id == b.exam_id
        })
    }

    pub fn by_student(&self, student_id: &str) -> Result<Vec<Mark>, StoreError> {
        self.find(|m| m.fields.student_id == student_id)
    }

    pub fn by_exam(&self, exam_id: &str) -> Result<Vec<Mark>, StoreError> {
        self.find(|m| m.fields.exam_id == exam_id)
    }

    pub fn exam_stats(&self, exam_id: &str) -> Result<ExamStats, StoreError> {
        let marks = self.by_exam(exam_id)?;
        Ok(ExamStats {
            count: marks.len(),
            average: rounded_mean(marks.iter().map(|m| m.fields.marks)),
        })
    }

    pub fn student_summary(&self, student_id: &str) -> Result<StudentMarkSummary, StoreError> {
        let marks = self.by_student(student_id)?;
        Ok(StudentMarkSummary {
            count: marks.len(),
            average: rounded_mean(marks.iter().map(|m| m.fields.marks)),
            distinctions: marks
                .iter()
                .filter(|m| m.fields.marks >= DISTINCTION_MARKS)
                .count(),
            below_60: marks.iter().filter(|m| m.fields.marks < LOW_MARKS).count(),
        })
    }
}
