use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use campus::domain::config::ApiConfig;
use campus::kernel::server::ApiState;
use campus_database::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let config = ApiConfig::default();
    let db = Database::builder()
        .url("mem://")
        .session("campus_test", "server")
        .migrations(campus::migrations())
        .init()
        .await
        .expect("in-memory store");
    let slices = campus::init(&config, &db).expect("slices");
    let state = ApiState::builder()
        .config(config)
        .db(db)
        .register_slices(slices)
        .build()
        .expect("state");
    campus_server::router::init(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body").to_vec();
    (status, location, body)
}

async fn json_call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let (status, _, bytes) = send(app, request).await;
    let value =
        if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json") };
    (status, value)
}

async fn form_post(app: &Router, uri: &str, body: &str) -> (StatusCode, Option<String>) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("request");
    let (status, location, _) = send(app, request).await;
    (status, location)
}

async fn follow(app: &Router, uri: &str) -> (StatusCode, Option<String>) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, location, _) = send(app, request).await;
    (status, location)
}

async fn new_course(app: &Router, code: &str) -> i64 {
    let (status, course) = json_call(
        app,
        "POST",
        "/api/course",
        Some(json!({ "course_code": code, "course_name": format!("{code} name") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    course["course_id"].as_i64().expect("course_id")
}

async fn new_student(app: &Router, roll: &str) -> i64 {
    let (status, student) = json_call(
        app,
        "POST",
        "/api/student",
        Some(json!({ "roll_number": roll, "first_name": "Alice", "last_name": "Smith" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    student["student_id"].as_i64().expect("student_id")
}

async fn enrolled_courses(app: &Router, student_id: i64) -> Vec<i64> {
    let (status, body) =
        json_call(app, "GET", &format!("/api/student/{student_id}/course"), None).await;
    if status == StatusCode::NOT_FOUND {
        return Vec::new();
    }
    body.as_array()
        .expect("enrollments")
        .iter()
        .filter_map(|e| e["course_id"].as_i64())
        .collect()
}

async fn page(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, _, bytes) = send(app, request).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn health_and_docs_are_served() {
    let app = app().await;
    let (status, body) = json_call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, _) = page(&app, "/api").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn course_api_maps_errors_to_status_codes() {
    let app = app().await;
    let course = json!({ "course_code": "CSE01", "course_name": "MAD I" });

    let (status, created) = json_call(&app, "POST", "/api/course", Some(course.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["course_code"], "CSE01");
    let id = created["course_id"].as_i64().expect("course_id");

    let (status, body) = json_call(&app, "POST", "/api/course", Some(course)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({}));

    let (status, body) =
        json_call(&app, "POST", "/api/course", Some(json!({ "course_code": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error_code": "COURSE001", "error_message": "Course Name is required" })
    );

    let (status, body) = json_call(
        &app,
        "PUT",
        &format!("/api/course/{id}"),
        Some(json!({ "course_description": "Apps" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_name"], "MAD I");
    assert_eq!(body["course_description"], "Apps");

    let (status, body) = json_call(&app, "DELETE", &format!("/api/course/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Successfully deleted" }));

    let (status, body) = json_call(&app, "GET", &format!("/api/course/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn enrollment_api_round_trip() {
    let app = app().await;
    let (_, course) = json_call(
        &app,
        "POST",
        "/api/course",
        Some(json!({ "course_code": "CSE02", "course_name": "DBMS" })),
    )
    .await;
    let course_id = course["course_id"].as_i64().expect("course_id");

    let (status, student) = json_call(
        &app,
        "POST",
        "/api/student",
        Some(json!({ "roll_number": "21BCS001", "first_name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = student["student_id"].as_i64().expect("student_id");
    let enrollments = format!("/api/student/{student_id}/course");

    let (status, _) = json_call(&app, "GET", &enrollments, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        json_call(&app, "POST", &enrollments, Some(json!({ "course_id": 999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "ENROLLMENT001");

    let (status, body) =
        json_call(&app, "POST", "/api/student/999/course", Some(json!({ "course_id": course_id })))
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "ENROLLMENT002");

    let (status, body) =
        json_call(&app, "POST", &enrollments, Some(json!({ "course_id": course_id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body[0]["course_id"], course_id);

    let (status, body) = json_call(&app, "GET", &enrollments, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let withdraw = format!("{enrollments}/{course_id}");
    let (status, _) = json_call(&app, "DELETE", &withdraw, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = json_call(&app, "DELETE", &withdraw, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Enrollment not found" }));
}

#[tokio::test]
async fn student_pages_redirect_after_changes() {
    let app = app().await;
    let (status, location) =
        form_post(&app, "/course/create", "code=CSE01&c_name=MAD+I&desc=Apps").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/courses"));

    let (_, courses) = page(&app, "/courses").await;
    assert!(courses.contains("CSE01"));

    let (status, location) =
        form_post(&app, "/student/create", "roll=21BCS009&f_name=Dana&l_name=").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    let (status, index) = page(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(index.contains("21BCS009"));

    let (status, _) = form_post(&app, "/student/create", "roll=21BCS009&f_name=Eve").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = form_post(&app, "/student/create", "roll=&f_name=Eve").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_rows_render_the_error_page() {
    let app = app().await;
    let (status, html) = page(&app, "/student/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Student not found"));

    let (status, _) = page(&app, "/course/999/delete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_api_validates_and_amends() {
    let app = app().await;

    let (status, body) =
        json_call(&app, "POST", "/api/student", Some(json!({ "first_name": "Alice" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error_code": "STUDENT001", "error_message": "Roll Number required" })
    );

    let (status, body) =
        json_call(&app, "POST", "/api/student", Some(json!({ "roll_number": "R1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error_code": "STUDENT002", "error_message": "First Name is required" })
    );

    let id = new_student(&app, "R1").await;
    new_student(&app, "R2").await;

    let (status, body) = json_call(
        &app,
        "POST",
        "/api/student",
        Some(json!({ "roll_number": "R1", "first_name": "Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({}));

    let student = format!("/api/student/{id}");
    let (status, body) =
        json_call(&app, "PUT", &student, Some(json!({ "last_name": "Jones" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roll_number"], "R1");
    assert_eq!(body["first_name"], "Alice");
    assert_eq!(body["last_name"], "Jones");

    let (status, body) =
        json_call(&app, "PUT", &student, Some(json!({ "roll_number": "R2" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({}));

    let (status, body) = json_call(&app, "PUT", &student, Some(json!({ "first_name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "STUDENT002");

    let (status, body) = json_call(&app, "GET", &student, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_name"], "Jones");

    let (status, _) =
        json_call(&app, "PUT", "/api/student/999", Some(json!({ "first_name": "Eve" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_update_form_replaces_the_enrollment_set() {
    let app = app().await;
    let a = new_course(&app, "CSE01").await;
    let b = new_course(&app, "CSE02").await;
    let id = new_student(&app, "R1").await;
    json_call(&app, "POST", &format!("/api/student/{id}/course"), Some(json!({ "course_id": a })))
        .await;

    let update = format!("/student/{id}/update");
    let (status, form) = page(&app, &update).await;
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains("name=\"courses\""));

    let (status, location) =
        form_post(&app, &update, &format!("f_name=Dana&l_name=Lee&courses={b}&courses={b}")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    assert_eq!(enrolled_courses(&app, id).await, vec![b]);

    let (_, student) = json_call(&app, "GET", &format!("/api/student/{id}"), None).await;
    assert_eq!(student["first_name"], "Dana");
    assert_eq!(student["roll_number"], "R1");

    let (status, _) =
        form_post(&app, &update, &format!("f_name=Dana&courses={a}&courses={b}")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(enrolled_courses(&app, id).await, vec![a, b]);

    let (status, _) =
        form_post(&app, &update, &format!("f_name=Dana&courses={a}&courses=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(enrolled_courses(&app, id).await, vec![a, b]);

    let (status, _) = form_post(&app, &update, &format!("f_name=&courses={a}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = form_post(&app, &update, "f_name=Dana&courses=999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(enrolled_courses(&app, id).await, vec![a, b]);

    let (status, _) = form_post(&app, "/student/999/update", "f_name=Dana").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = form_post(&app, &update, "f_name=Dana").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(enrolled_courses(&app, id).await.is_empty());
}

#[tokio::test]
async fn withdraw_and_delete_links_redirect() {
    let app = app().await;
    let a = new_course(&app, "CSE01").await;
    let b = new_course(&app, "CSE02").await;
    let id = new_student(&app, "R1").await;
    let enroll_both = format!("f_name=Alice&courses={a}&courses={b}");
    form_post(&app, &format!("/student/{id}/update"), &enroll_both).await;

    let (_, details) = page(&app, &format!("/student/{id}")).await;
    assert!(details.contains("Withdraw"));

    let withdraw = format!("/student/{id}/withdraw/{a}");
    let back = format!("/student/{id}");
    let (status, location) = follow(&app, &withdraw).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(back.as_str()));
    assert_eq!(enrolled_courses(&app, id).await, vec![b]);

    let (status, location) = follow(&app, &withdraw).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(back.as_str()));

    let (status, location) = follow(&app, &format!("/student/{id}/delete")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    let (status, _) = json_call(&app, "GET", &format!("/api/student/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = follow(&app, &format!("/student/{id}/delete")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_update_form_keeps_the_code() {
    let app = app().await;
    let a = new_course(&app, "CSE01").await;
    let update = format!("/course/{a}/update");

    let (status, form) = page(&app, &update).await;
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains("CSE01"));

    let (status, location) =
        form_post(&app, &update, "code=HACK&c_name=Algorithms&desc=Graphs").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/courses"));

    let (_, course) = json_call(&app, "GET", &format!("/api/course/{a}"), None).await;
    assert_eq!(course["course_code"], "CSE01");
    assert_eq!(course["course_name"], "Algorithms");
    assert_eq!(course["course_description"], "Graphs");

    let (status, _) = form_post(&app, &update, "c_name=&desc=Graphs").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = form_post(&app, "/course/999/update", "c_name=Algorithms").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, location) = follow(&app, &format!("/course/{a}/delete")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/courses"));
    let (status, _) = json_call(&app, "GET", &format!("/api/course/{a}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
