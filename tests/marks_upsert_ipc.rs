mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn resubmitting_a_mark_keeps_one_record_with_the_latest_score() {
    let workspace = temp_dir("schoold-marks-upsert");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let exam = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "exams.create",
        json!({
            "exam": {
                "name": "Midterm",
                "subject": "Mathematics",
                "date": "2024-03-15",
                "maxMarks": 100
            }
        }),
    );
    let exam_id = exam
        .get("exam")
        .and_then(|e| e.get("id"))
        .and_then(|v| v.as_str())
        .expect("exam id")
        .to_string();

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "marks.submit",
        json!({ "examId": exam_id.clone(), "studentId": "1", "marks": 85 }),
    );
    assert_eq!(
        first
            .get("mark")
            .and_then(|m| m.get("maxMarks"))
            .and_then(|v| v.as_f64()),
        Some(100.0),
        "maxMarks defaults to the exam's"
    );
    assert_eq!(
        first
            .get("mark")
            .and_then(|m| m.get("grade"))
            .and_then(|v| v.as_str()),
        Some("A")
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "marks.submit",
        json!({ "examId": exam_id.clone(), "studentId": "1", "marks": 90 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "marks.submit",
        json!({ "examId": exam_id.clone(), "studentId": "2", "marks": 55 }),
    );

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "marks.list",
        json!({ "examId": exam_id.clone(), "studentId": "1" }),
    );
    let rows = listed
        .get("marks")
        .and_then(|v| v.as_array())
        .expect("marks rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("marks").and_then(|v| v.as_f64()), Some(90.0));
    assert_eq!(rows[0].get("grade").and_then(|v| v.as_str()), Some("A+"));

    let by_exam = request_ok(
        &mut stdin,
        &mut reader,
        "6a",
        "marks.list",
        json!({ "examId": exam_id.clone() }),
    );
    let mut grades: Vec<String> = by_exam
        .get("marks")
        .and_then(|v| v.as_array())
        .expect("marks rows")
        .iter()
        .filter_map(|m| m.get("grade").and_then(|v| v.as_str()).map(str::to_string))
        .collect();
    grades.sort();
    assert_eq!(grades, vec!["A+".to_string(), "D".to_string()]);

    let stats = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "marks.examStats",
        json!({ "examId": exam_id.clone() }),
    );
    assert_eq!(stats.get("count").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(stats.get("average").and_then(|v| v.as_f64()), Some(73.0));

    let summary = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "marks.studentSummary",
        json!({ "studentId": "2" }),
    );
    assert_eq!(summary.get("below60").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(summary.get("distinctions").and_then(|v| v.as_u64()), Some(0));

    let code = request_err(
        &mut stdin,
        &mut reader,
        "9",
        "marks.submit",
        json!({ "examId": "no-such-exam", "studentId": "1", "marks": 70 }),
    );
    assert_eq!(code, "not_found");
    let explicit = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "marks.submit",
        json!({ "examId": "no-such-exam", "studentId": "1", "marks": 70, "maxMarks": 80 }),
    );
    assert_eq!(
        explicit
            .get("mark")
            .and_then(|m| m.get("maxMarks"))
            .and_then(|v| v.as_f64()),
        Some(80.0)
    );

    let _ = std::fs::remove_dir_all(workspace);
}
