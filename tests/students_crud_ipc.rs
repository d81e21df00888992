mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

fn student_count(result: &serde_json::Value) -> usize {
    result
        .get("students")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .unwrap_or(0)
}

#[test]
fn students_create_get_update_delete_roundtrip() {
    let workspace = temp_dir("schoold-students-crud");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let before = request_ok(&mut stdin, &mut reader, "2", "students.list", json!({}));
    assert_eq!(student_count(&before), 2);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        json!({
            "student": {
                "name": "Dana Reed",
                "email": "dana@school.com",
                "studentId": "STU003",
                "class": "Grade 9",
                "parentEmail": "reed@school.com"
            }
        }),
    );
    let student = created.get("student").expect("student");
    let id = student
        .get("id")
        .and_then(|v| v.as_str())
        .expect("student id")
        .to_string();
    assert!(student.get("createdAt").and_then(|v| v.as_str()).is_some());

    let fetched = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.get",
        json!({ "id": id.clone() }),
    );
    assert_eq!(
        fetched
            .get("student")
            .and_then(|s| s.get("name"))
            .and_then(|v| v.as_str()),
        Some("Dana Reed")
    );

    let grade9 = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "students.list",
        json!({ "class": "Grade 9" }),
    );
    assert_eq!(student_count(&grade9), 2);

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.update",
        json!({ "id": id.clone(), "patch": { "class": "Grade 10", "id": "hijack" } }),
    );
    let updated = updated.get("student").expect("updated student");
    assert_eq!(updated.get("class").and_then(|v| v.as_str()), Some("Grade 10"));
    assert_eq!(updated.get("id").and_then(|v| v.as_str()), Some(id.as_str()));
    assert_eq!(
        updated.get("parentEmail").and_then(|v| v.as_str()),
        Some("reed@school.com")
    );

    let parent_view = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "students.forUser",
        json!({ "email": "reed@school.com", "role": "parent" }),
    );
    assert_eq!(
        parent_view
            .get("student")
            .and_then(|s| s.get("id"))
            .and_then(|v| v.as_str()),
        Some(id.as_str())
    );

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "students.update",
        json!({ "id": "no-such-student", "patch": { "class": "Grade 1" } }),
    );
    assert!(missing.get("student").map_or(false, |v| v.is_null()));

    let code = request_err(
        &mut stdin,
        &mut reader,
        "9",
        "students.update",
        json!({ "id": id.clone(), "patch": { "name": "" } }),
    );
    assert_eq!(code, "bad_params");

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "students.delete",
        json!({ "id": id.clone() }),
    );
    assert_eq!(deleted.get("deleted").and_then(|v| v.as_bool()), Some(true));
    let ghost = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "students.delete",
        json!({ "id": "no-such-student" }),
    );
    assert_eq!(ghost.get("deleted").and_then(|v| v.as_bool()), Some(true));

    let after = request_ok(&mut stdin, &mut reader, "12", "students.list", json!({}));
    assert_eq!(student_count(&after), 2);

    let _ = std::fs::remove_dir_all(workspace);
}
