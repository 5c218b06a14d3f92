mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn grade_create_enforces_required_fields_and_domain() {
    let workspace = temp_dir("educontrold-grades");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "grades.create",
        json!({ "input": { "subject": "Matemática", "description": "Prova", "value": 7.0 } }),
    );
    assert_eq!(error["code"], "invalid_input");

    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "grades.create",
        json!({ "input": { "studentId": "s1", "description": "Prova", "value": 7.0 } }),
    );
    assert_eq!(error["code"], "invalid_input");

    let error = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "grades.create",
        json!({ "input": {
            "studentId": "s1",
            "subject": "Matemática",
            "description": "Prova",
            "value": 10.5
        }}),
    );
    assert_eq!(error["code"], "invalid_input");

    let listed = request_ok(&mut stdin, &mut reader, "4", "grades.list", json!({}));
    assert_eq!(listed["grades"].as_array().expect("array").len(), 0);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "grades.create",
        json!({ "input": {
            "studentId": "s1",
            "subject": "Matemática",
            "description": "Prova Mensal",
            "value": 9.5
        }}),
    );
    let grade_id = created["grade"]["id"].as_str().expect("id").to_string();
    assert_eq!(created["grade"]["value"], 9.5);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "grades.delete",
        json!({ "id": grade_id }),
    );
    let listed = request_ok(&mut stdin, &mut reader, "7", "grades.list", json!({}));
    assert_eq!(listed["grades"].as_array().expect("array").len(), 0);
}

#[test]
fn boundary_values_zero_and_ten_are_accepted() {
    let workspace = temp_dir("educontrold-grades-bounds");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    for (i, value) in [0.0, 10.0].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("{}", i + 1),
            "grades.create",
            json!({ "input": {
                "studentId": "s1",
                "subject": "Matemática",
                "description": "Prova",
                "value": value
            }}),
        );
    }
    let listed = request_ok(&mut stdin, &mut reader, "3", "grades.list", json!({}));
    assert_eq!(listed["grades"].as_array().expect("array").len(), 2);
}
