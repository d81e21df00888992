//! Stored entity shapes.
//!
//! Each entity is a [`Record`]: a generated id, the entity's own fields and a
//! creation stamp. Keys are camelCase on disk and on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<F> {
    pub id: String,
    #[serde(flatten)]
    pub fields: F,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The fields of one entity type, without identity or creation stamp.
pub trait Fields: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    /// Checks beyond what deserialization already enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Who a notice is addressed to. `All` reaches every role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Audience {
    pub fn reaches(self, role: Role) -> bool {
        matches!(
            (self, role),
            (Audience::All, _)
                | (Audience::Admin, Role::Admin)
                | (Audience::Teacher, Role::Teacher)
                | (Audience::Student, Role::Student)
                | (Audience::Parent, Role::Parent)
        )
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(())
}

pub fn require_calendar_day(value: &str, field: &str) -> Result<(), String> {
    canonical_day(value, field).map(|_| ())
}

/// Zero-padded `YYYY-MM-DD` for any spelling chrono accepts, so `2024-2-5`
/// and `2024-02-05` name the same day.
pub fn canonical_day(value: &str, field: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("{} must be a YYYY-MM-DD date", field))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub email: String,
    /// Stored and compared as given.
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
}

impl Fields for UserFields {
    const COLLECTION: Collection = Collection::Users;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.email, "email")?;
        require_non_empty(&self.password, "password")?;
        require_non_empty(&self.name, "name")
    }
}

pub type User = Record<UserFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    /// Human-facing code such as `STU001`.
    pub student_id: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
}

impl Fields for StudentFields {
    const COLLECTION: Collection = Collection::Students;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.name, "name")
    }
}

pub type Student = Record<StudentFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFields {
    pub student_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_by: Option<String>,
}

impl Fields for AttendanceFields {
    const COLLECTION: Collection = Collection::Attendance;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.student_id, "studentId")?;
        require_calendar_day(&self.date, "date")
    }
}

pub type Attendance = Record<AttendanceFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamFields {
    pub name: String,
    pub subject: String,
    pub date: String,
    pub max_marks: f64,
    #[serde(default)]
    pub description: String,
}

impl Fields for ExamFields {
    const COLLECTION: Collection = Collection::Exams;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.name, "name")?;
        if self.max_marks <= 0.0 {
            return Err("maxMarks must be positive".to_string());
        }
        Ok(())
    }
}

pub type Exam = Record<ExamFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkFields {
    pub exam_id: String,
    pub student_id: String,
    /// Not checked against `max_marks`.
    pub marks: f64,
    pub max_marks: f64,
}

impl Fields for MarkFields {
    const COLLECTION: Collection = Collection::Marks;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.exam_id, "examId")?;
        require_non_empty(&self.student_id, "studentId")
    }
}

impl MarkFields {
    pub fn grade(&self) -> Grade {
        Grade::for_marks(self.marks)
    }
}

pub type Mark = Record<MarkFields>;

/// Letter grade on the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn for_marks(marks: f64) -> Self {
        match marks {
            m if m >= 90.0 => Grade::APlus,
            m if m >= 80.0 => Grade::A,
            m if m >= 70.0 => Grade::B,
            m if m >= 60.0 => Grade::C,
            m if m >= 50.0 => Grade::D,
            _ => Grade::F,
        }
    }
}

fn everyone() -> Vec<Audience> {
    vec![Audience::All]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFields {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "everyone")]
    pub target_roles: Vec<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
}

impl NoticeFields {
    pub fn reaches(&self, role: Role) -> bool {
        self.target_roles.iter().any(|a| a.reaches(role))
    }
}

impl Fields for NoticeFields {
    const COLLECTION: Collection = Collection::Notices;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.title, "title")
    }
}

pub type Notice = Record<NoticeFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeFields {
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    pub description: String,
    pub amount: f64,
    pub due_date: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Fields for FeeFields {
    const COLLECTION: Collection = Collection::Fees;

    fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.student_id, "studentId")?;
        if self.amount < 0.0 {
            return Err("amount must not be negative".to_string());
        }
        Ok(())
    }
}

pub type Fee = Record<FeeFields>;
