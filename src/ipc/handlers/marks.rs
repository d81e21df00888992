use crate::config::Config;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_optional_str, get_required_str, respond, respond_list, to_json, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::models::{Exam, ExamFields, Mark, MarkFields};
use crate::repo::Repository;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

fn get_number(params: &Value, key: &str) -> Result<Option<f64>, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a number", key))),
    }
}

/// A stored mark plus its letter `grade`.
fn mark_json(mark: &Mark) -> Value {
    let mut v = to_json(mark);
    if let Some(obj) = v.as_object_mut() {
        obj.insert("grade".to_string(), to_json(&mark.fields.grade()));
    }
    v
}

fn marks_list(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let student_id = get_optional_str(params, "studentId");
    let exam_id = get_optional_str(params, "examId");
    let repo = Repository::<MarkFields>::new(store);
    let marks = match (student_id.as_deref(), exam_id.as_deref()) {
        (Some(s), Some(e)) => repo.find(|m| m.fields.student_id == s && m.fields.exam_id == e)?,
        (Some(s), None) => repo.by_student(s)?,
        (None, Some(e)) => repo.by_exam(e)?,
        (None, None) => repo.list_all()?,
    };
    let rows: Vec<Value> = marks.iter().map(mark_json).collect();
    Ok(json!({ "marks": rows }))
}

/// `maxMarks` defaults to the exam's; the exam must exist in that case.
fn marks_submit(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let exam_id = get_required_str(params, "examId")?;
    let student_id = get_required_str(params, "studentId")?;
    let marks = get_number(params, "marks")?
        .ok_or_else(|| HandlerErr::bad_params("missing marks"))?;
    let max_marks = match get_number(params, "maxMarks")? {
        Some(m) => m,
        None => {
            let exam: Option<Exam> =
                Repository::<ExamFields>::new(&mut *store).get_by_id(&exam_id)?;
            exam.map(|e| e.fields.max_marks)
                .ok_or_else(|| HandlerErr::new("not_found", "exam not found; pass maxMarks"))?
        }
    };

    let mark = Repository::<MarkFields>::new(store).submit(MarkFields {
        exam_id,
        student_id,
        marks,
        max_marks,
    })?;
    Ok(json!({ "mark": mark_json(&mark) }))
}

fn marks_exam_stats(store: &mut dyn KeyValueStore, _: &Config, params: &Value) -> HandlerResult {
    let exam_id = get_required_str(params, "examId")?;
    Ok(json!(Repository::<MarkFields>::new(store).exam_stats(&exam_id)?))
}

fn marks_student_summary(
    store: &mut dyn KeyValueStore,
    _: &Config,
    params: &Value,
) -> HandlerResult {
    let student_id = get_required_str(params, "studentId")?;
    Ok(json!(Repository::<MarkFields>::new(store).student_summary(&student_id)?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.list" => Some(respond_list(state, req, json!({ "marks": [] }), marks_list)),
        "marks.submit" => Some(respond(state, req, marks_submit)),
        "marks.examStats" => Some(respond(state, req, marks_exam_stats)),
        "marks.studentSummary" => Some(respond(state, req, marks_student_summary)),
        _ => None,
    }
}
