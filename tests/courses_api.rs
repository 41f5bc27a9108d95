mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn get_first_course() {
    let app = TestApp::new();
    let courses = app.course_factory(1).await;

    let response = app.get(&format!("/courses/{}/", courses[0].id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], courses[0].name.as_str());
    assert_eq!(response.body["id"], courses[0].id);
    assert_eq!(response.body["students"], json!([]));
}

#[tokio::test]
async fn get_list_course() {
    let app = TestApp::new();
    let courses = app.course_factory(10).await;

    let response = app.get("/courses/").await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.body.as_array().unwrap();
    assert_eq!(data.len(), courses.len());
    for (c, expected) in data.iter().zip(&courses) {
        assert_eq!(c["name"], expected.name.as_str());
    }
}

#[tokio::test]
async fn get_filter_id_course() {
    let app = TestApp::new();
    let courses = app.course_factory(10).await;

    let response = app.get(&format!("/courses/?id={}", courses[0].id)).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.body.as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], courses[0].name.as_str());
}

#[tokio::test]
async fn get_filter_name_course() {
    let app = TestApp::new();
    let courses = app.course_factory(10).await;

    let response = app.get(&format!("/courses/?name={}", courses[0].name)).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.body.as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], courses[0].name.as_str());
}

#[tokio::test]
async fn filters_combine_and_may_match_nothing() {
    let app = TestApp::new();
    let courses = app.course_factory(3).await;

    let uri = format!("/courses/?id={}&name={}", courses[0].id, courses[1].name);
    let response = app.get(&uri).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn empty_filter_value_lists_everything() {
    let app = TestApp::new();
    app.course_factory(4).await;

    let response = app.get("/courses/?name=&id=").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn non_numeric_id_filter_is_rejected() {
    let app = TestApp::new();

    let response = app.get("/courses/?id=first").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "validation_error");
    assert_eq!(response.body["error"]["details"]["id"], json!(["Enter a number."]));
}

#[tokio::test]
async fn create_course() {
    let app = TestApp::new();
    let student = app.create_student("student_1", "2000-02-02").await;

    let response = app
        .post("/courses/", json!({"name": "course_1", "students": [student.id]}))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["name"], "course_1");
    assert_eq!(response.body["students"], json!([student.id]));

    let listed = app.get("/courses/").await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_course_without_students() {
    let app = TestApp::new();

    let response = app.post("/courses/", json!({"name": "course_1"})).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["students"], json!([]));
}

#[tokio::test]
async fn create_course_with_unknown_student() {
    let app = TestApp::new();

    let response = app
        .post("/courses/", json!({"name": "course_1", "students": [404]}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"]["details"]["students"],
        json!(["Invalid pk \"404\" - object does not exist."])
    );
    assert_eq!(app.get("/courses/").await.body, json!([]));
}

#[tokio::test]
async fn create_course_requires_name() {
    let app = TestApp::new();

    let missing = app.post("/courses/", json!({"students": []})).await;
    let blank = app.post("/courses/", json!({"name": " "})).await;

    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"]["details"]["name"], json!(["This field is required."]));
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank.body["error"]["details"]["name"], json!(["This field may not be blank."]));
}

#[tokio::test]
async fn create_course_rejects_non_object_body() {
    let app = TestApp::new();

    let response = app.post("/courses/", json!(["course_1"])).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn patch_course() {
    let app = TestApp::new();
    let student = app.create_student("student_1", "2000-02-02").await;
    let course = app.course_factory(1).await;

    let response = app
        .patch(&format!("/courses/{}/", course[0].id), json!({"students": [student.id]}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["students"], json!([student.id]));
    assert_eq!(response.body["name"], course[0].name.as_str());
}

#[tokio::test]
async fn patch_replaces_previous_members() {
    let app = TestApp::new();
    let students = app.student_factory(3).await;
    let created = app
        .post(
            "/courses/",
            json!({"name": "course_1", "students": [students[0].id, students[1].id]}),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let response = app
        .patch(&format!("/courses/{}/", id), json!({"students": [students[2].id]}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["students"], json!([students[2].id]));
    let fetched = app.get(&format!("/courses/{}/", id)).await;
    assert_eq!(fetched.body["students"], json!([students[2].id]));
}

#[tokio::test]
async fn patch_name_keeps_members() {
    let app = TestApp::new();
    let students = app.student_factory(2).await;
    let created = app
        .post(
            "/courses/",
            json!({"name": "course_1", "students": [students[1].id, students[0].id]}),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let response = app.patch(&format!("/courses/{}/", id), json!({"name": "renamed"})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "renamed");
    assert_eq!(response.body["students"], json!([students[1].id, students[0].id]));
}

#[tokio::test]
async fn patch_with_empty_list_clears_members() {
    let app = TestApp::new();
    let students = app.student_factory(1).await;
    let created = app
        .post("/courses/", json!({"name": "course_1", "students": [students[0].id]}))
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let response = app.patch(&format!("/courses/{}/", id), json!({"students": []})).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["students"], json!([]));
}

#[tokio::test]
async fn put_replaces_whole_course() {
    let app = TestApp::new();
    let students = app.student_factory(1).await;
    let created = app
        .post("/courses/", json!({"name": "course_1", "students": [students[0].id]}))
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let missing_name = app.put(&format!("/courses/{}/", id), json!({"students": []})).await;
    let response = app.put(&format!("/courses/{}/", id), json!({"name": "course_2"})).await;

    assert_eq!(missing_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"id": id, "name": "course_2", "students": []}));
}

#[tokio::test]
async fn delete_course() {
    let app = TestApp::new();
    let course = app.course_factory(1).await;

    let response = app.delete(&format!("/courses/{}/", course[0].id)).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_null());
    let after = app.get(&format!("/courses/{}/", course[0].id)).await;
    assert_eq!(after.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_course_is_not_found() {
    let app = TestApp::new();

    let read = app.get("/courses/999/").await;
    let patch = app.patch("/courses/999/", json!({"name": "x"})).await;
    let delete = app.delete("/courses/999/").await;

    assert_eq!(read.status, StatusCode::NOT_FOUND);
    assert_eq!(read.body["error"]["code"], "not_found");
    assert_eq!(patch.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_path_id_is_bad_request() {
    let app = TestApp::new();

    let response = app.get("/courses/abc/").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn missing_course_wins_over_invalid_body() {
    let app = TestApp::new();

    let unknown_student = app.patch("/courses/999/", json!({"students": [404]})).await;
    let blank_name = app.patch("/courses/999/", json!({"name": ""})).await;
    let empty_put = app.put("/courses/999/", json!({})).await;

    for response in [unknown_student, blank_name, empty_put] {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["error"]["code"], "not_found");
    }
}

#[tokio::test]
async fn invalid_body_on_existing_course_is_rejected() {
    let app = TestApp::new();
    let course = app.course_factory(1).await;

    let response = app
        .patch(&format!("/courses/{}/", course[0].id), json!({"name": ""}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["details"]["name"], json!(["This field may not be blank."]));
}

#[tokio::test]
async fn name_filter_returns_every_exact_match() {
    let app = TestApp::new();
    let first = app.course_named("course-1").await;
    app.course_named("course-10").await;
    let second = app.course_named("course-1").await;
    app.course_named("Course-1").await;

    let response = app.get("/courses/?name=course-1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!([
            {"id": first.id, "name": "course-1", "students": []},
            {"id": second.id, "name": "course-1", "students": []},
        ])
    );
}

#[tokio::test]
async fn numeric_string_student_ids_are_accepted() {
    let app = TestApp::new();
    let student = app.create_student("student_1", "2000-02-02").await;

    let response = app
        .post(
            "/courses/",
            json!({"name": "course_1", "students": [student.id.to_string()]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["students"], json!([student.id]));
}
