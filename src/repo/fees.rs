use chrono::Utc;
use serde::Serialize;

use super::{RepoError, Repository};
use crate::models::{Fee, FeeFields, Student};
use crate::store::{read_collection, Collection, StoreError};

const UNKNOWN_STUDENT: &str = "Unknown Student";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    pub pending_count: usize,
    pub paid_count: usize,
    pub pending_total: f64,
    pub paid_total: f64,
}

impl Repository<'_, FeeFields> {
    /// New fees start unpaid. A blank `studentName` is filled from the
    /// students collection.
    pub fn raise(&mut self, mut fields: FeeFields) -> Result<Fee, RepoError> {
        fields.is_paid = false;
        fields.paid_at = None;
        if fields.student_name.trim().is_empty() {
            let students: Vec<Student> = read_collection(&*self.store, Collection::Students)?;
            fields.student_name = students
                .into_iter()
                .find(|s| s.id == fields.student_id)
                .map(|s| s.fields.name)
                .unwrap_or_else(|| UNKNOWN_STUDENT.to_string());
        }
        self.create(fields)
    }

    /// One-way unpaid to paid. Paying again leaves `paidAt` untouched.
    pub fn mark_paid(&mut self, id: &str) -> Result<Option<Fee>, StoreError> {
        self.replace_with(id, |fee| {
            if fee.fields.is_paid {
                return false;
            }
            fee.fields.is_paid = true;
            fee.fields.paid_at = Some(Utc::now());
            true
        })
    }

    pub fn by_student(&self, student_id: &str) -> Result<Vec<Fee>, StoreError> {
        self.find(|f| f.fields.student_id == student_id)
    }

    pub fn summary(&self, student_id: Option<&str>) -> Result<FeeSummary, StoreError> {
        let fees = match student_id {
            Some(sid) => self.by_student(sid)?,
            None => self.list_all()?,
        };
        let (paid, pending): (Vec<&Fee>, Vec<&Fee>) = fees.iter().partition(|f| f.fields.is_paid);
        Ok(FeeSummary {
            pending_count: pending.len(),
            paid_count: paid.len(),
            pending_total: pending.iter().map(|f| f.fields.amount).sum(),
            paid_total: paid.iter().map(|f| f.fields.amount).sum(),
        })
    }
}
