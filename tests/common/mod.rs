#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use ucms_client::{ApiClient, ClientConfig, MemorySessionStore};

pub const PASSWORD: &str = "secret";

/// In-process stand-in for the UCMS API.
pub struct MockState {
    pub valid_access: Mutex<String>,
    pub valid_refresh: Mutex<String>,
    pub refresh_succeeds: AtomicBool,
    /// Issue a new refresh token on every refresh and reject the old one.
    pub rotate_refresh: bool,
    pub refresh_calls: AtomicUsize,
    pub hits: AtomicUsize,
    pub registered: Mutex<Vec<i64>>,
    pub grades: Mutex<Vec<Value>>,
    /// Every write, as `("METHOD /path", body)`.
    pub requests: Mutex<Vec<(String, Value)>>,
    pub available_delay: Duration,
    pub registered_delay: Duration,
    pub refresh_delay: Duration,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            valid_access: Mutex::new("access-1".to_string()),
            valid_refresh: Mutex::new("refresh-1".to_string()),
            refresh_succeeds: AtomicBool::new(true),
            rotate_refresh: false,
            refresh_calls: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            registered: Mutex::new(vec![1]),
            grades: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            available_delay: Duration::from_millis(0),
            registered_delay: Duration::from_millis(0),
            refresh_delay: Duration::from_millis(0),
        }
    }
}

impl MockState {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Simulates the access token expiring server side.
    pub fn expire_access_token(&self) {
        *self.valid_access.lock().unwrap() = "rotated-away".to_string();
    }

    fn record(&self, route: impl Into<String>, body: Value) {
        self.requests.lock().unwrap().push((route.into(), body));
    }

    /// Bodies recorded for `route`, oldest first.
    pub fn bodies(&self, route: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == route)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn routes(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_access.lock().unwrap());
        headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockApi {
    pub async fn start() -> Self {
        Self::start_with(MockState::default()).await
    }

    pub async fn start_with(state: MockState) -> Self {
        let state = Arc::new(state);
        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/register", post(register_student))
            .route("/auth/register/lecturer", post(register_lecturer))
            .route("/auth/register/admin", post(register_admin))
            .route("/courses", get(list_courses).post(create_course))
            .route(
                "/courses/{id}",
                get(get_course).put(update_course).delete(delete_course),
            )
            .route("/courses/code/{code}", get(get_course_by_code))
            .route("/always-unauthorized", get(always_unauthorized))
            .route("/students/courses/enrollment/available", get(available))
            .route("/students/course-registrations/my-courses", get(my_courses))
            .route("/students/course-registrations/check/{id}", get(check))
            .route("/students/course-registrations", get(all_registrations))
            .route(
                "/students/course-registrations/student/{number}",
                get(student_registrations),
            )
            .route(
                "/students/course-registrations/course/{id}",
                get(course_registrations),
            )
            .route("/students/course-registrations/register", post(register))
            .route(
                "/students/course-registrations/unregister/{id}",
                delete(unregister),
            )
            .route("/students/results/my-results", get(my_results))
            .route("/students/results/student/{number}", get(student_results))
            .route("/lecturers/grading/courses", get(gradable_courses))
            .route(
                "/lecturers/grading/courses/{id}/students",
                get(enrolled_students),
            )
            .route("/lecturers/grading/courses/{id}/results", get(course_results))
            .route(
                "/lecturers/grading/courses/{id}/release-results",
                post(release_results),
            )
            .route("/lecturers/grading/submit-grade", post(submit_grade))
            .with_state(state.clone());
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock api");
        let addr = listener.local_addr().expect("Failed to read mock api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock api stopped");
        });

        Self {
            base_url: format!("http://{}/api/v1", addr),
            state,
        }
    }

    pub fn client(&self) -> (Arc<ApiClient>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let api = ApiClient::new(ClientConfig::new(self.base_url.clone()), store.clone())
            .expect("Failed to build client");
        (Arc::new(api), store)
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized", "message": "Token expired" })),
    )
        .into_response()
}

pub fn course_json(id: i64, code: &str, name: &str, department: &str, credits: u32) -> Value {
    json!({
        "id": id,
        "code": code,
        "name": name,
        "description": "",
        "credits": credits,
        "department": department,
        "maxEnrollments": 30,
        "currentEnrollments": 10,
        "prerequisites": [],
        "isActive": true
    })
}

fn registration_json(course_id: i64) -> Value {
    json!({
        "id": 100 + course_id,
        "studentNumber": "S2024001",
        "courseId": course_id,
        "courseCode": format!("C{}", course_id),
        "courseTitle": format!("Course {}", course_id),
        "department": "Computer Science",
        "credits": 3,
        "status": "ACTIVE",
        "registeredAt": "2024-02-01T09:00:00Z"
    })
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hit();
    let username = body["username"].as_str().unwrap_or_default().to_string();
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid username or password" })),
        )
            .into_response();
    }
    let role = match username.as_str() {
        "admin" => "ADMIN",
        "lecturer" => "LECTURER",
        "registrar" => "REGISTRAR",
        _ => "STUDENT",
    };
    Json(json!({
        "accessToken": state.valid_access.lock().unwrap().clone(),
        "refreshToken": state.valid_refresh.lock().unwrap().clone(),
        "user": {
            "id": 42,
            "username": username,
            "email": format!("{}@uni.edu", username),
            "role": role,
            "firstName": "Ada",
            "lastName": "Lovelace"
        }
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hit();
    let calls = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::time::sleep(state.refresh_delay).await;
    let mut valid_refresh = state.valid_refresh.lock().unwrap();
    if !state.refresh_succeeds.load(Ordering::SeqCst) || body["refreshToken"] != *valid_refresh {
        return unauthorized();
    }
    let access = format!("access-{}", calls + 1);
    *state.valid_access.lock().unwrap() = access.clone();
    if state.rotate_refresh {
        *valid_refresh = format!("refresh-{}", calls + 1);
        let refresh = valid_refresh.clone();
        return Json(json!({ "accessToken": access, "refreshToken": refresh })).into_response();
    }
    Json(json!({ "accessToken": access })).into_response()
}

async fn register_student(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    state.record("POST /auth/register", body);
    Json(json!({ "message": "User registered successfully" })).into_response()
}

async fn register_lecturer(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if body["lecturerSecretKey"] != "lecturer-key" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid lecturer secret key" })),
        )
            .into_response();
    }
    state.record("POST /auth/register/lecturer", body);
    Json(json!({ "message": "Lecturer registered successfully" })).into_response()
}

async fn register_admin(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    state.record("POST /auth/register/admin", body);
    Json(json!({ "message": "Admin registered successfully" })).into_response()
}

/// Echoes a course create/update body back as the stored course.
fn course_from_body(id: i64, body: &Value) -> Value {
    json!({
        "id": id,
        "code": body["code"],
        "name": body["name"],
        "description": body["description"],
        "credits": body["credits"],
        "department": body["department"],
        "maxEnrollments": body["maxEnrollments"],
        "currentEnrollments": 0,
        "prerequisites": body["prerequisites"],
        "isActive": true
    })
}

async fn list_courses(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "content": [
            course_json(1, "CS101", "Introduction to Programming", "Computer Science", 3),
            course_json(2, "MATH101", "Calculus I", "Mathematics", 4)
        ],
        "totalElements": 2,
        "totalPages": 1,
        "number": 0,
        "size": 20
    }))
    .into_response()
}

async fn always_unauthorized(State(state): State<Arc<MockState>>) -> Response {
    state.hit();
    unauthorized()
}

async fn get_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if id != 1 {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Course not found" })))
            .into_response();
    }
    Json(course_json(1, "CS101", "Introduction to Programming", "Computer Science", 3))
        .into_response()
}

async fn get_course_by_code(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(course_json(2, &code, "Calculus I", "Mathematics", 4)).into_response()
}

async fn create_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let course = course_from_body(10, &body);
    state.record("POST /courses", body);
    (StatusCode::CREATED, Json(course)).into_response()
}

async fn update_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let course = course_from_body(id, &body);
    state.record(format!("PUT /courses/{}", id), body);
    Json(course).into_response()
}

async fn delete_course(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.record(format!("DELETE /courses/{}", id), Value::Null);
    StatusCode::NO_CONTENT.into_response()
}

async fn available(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    tokio::time::sleep(state.available_delay).await;
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        course_json(1, "CS101", "Introduction to Programming", "Computer Science", 3),
        course_json(2, "MATH101", "Calculus I", "Mathematics", 4),
        course_json(3, "PHYS101", "Physics I", "Physics", 3)
    ]))
    .into_response()
}

async fn my_courses(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    tokio::time::sleep(state.registered_delay).await;
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let rows: Vec<Value> = state
        .registered
        .lock()
        .unwrap()
        .iter()
        .map(|id| registration_json(*id))
        .collect();
    Json(Value::Array(rows)).into_response()
}

async fn check(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    // Course 3 has a broken status endpoint.
    if id == 3 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!(state.registered.lock().unwrap().contains(&id))).into_response()
}

async fn register(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Some(course_id) = body["courseId"].as_i64() else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "courseId is required" })))
            .into_response();
    };
    let mut registered = state.registered.lock().unwrap();
    if registered.contains(&course_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Already registered for this course" })),
        )
            .into_response();
    }
    registered.push(course_id);
    Json(registration_json(course_id)).into_response()
}

async fn unregister(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut registered = state.registered.lock().unwrap();
    if !registered.contains(&id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Student is not registered for this course" })),
        )
            .into_response();
    }
    registered.retain(|c| *c != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn my_results(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {
            "id": 1, "studentNumber": "S2024001", "courseCode": "CS101",
            "courseTitle": "Introduction to Programming", "credits": 3,
            "marks": 82.0, "grade": "A", "isReleased": true,
            "gradedAt": "2024-05-01T10:00:00Z", "releasedAt": "2024-05-10T10:00:00Z"
        },
        {
            "id": 2, "studentNumber": "S2024001", "courseCode": "MATH101",
            "courseTitle": "Calculus I", "credits": 4,
            "marks": 66.0, "grade": "B", "remarks": "Solid work", "isReleased": true
        }
    ]))
    .into_response()
}

async fn all_registrations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let page = params.get("page").cloned().unwrap_or_default();
    let size = params.get("size").cloned().unwrap_or_default();
    state.record(
        format!("GET /students/course-registrations?page={}&size={}", page, size),
        Value::Null,
    );
    Json(json!({
        "content": [registration_json(1), registration_json(2)],
        "totalElements": 42,
        "totalPages": 3,
        "number": page.parse::<u32>().unwrap_or(0),
        "size": size.parse::<u32>().unwrap_or(0)
    }))
    .into_response()
}

async fn student_registrations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if number != "S2024001" {
        return Json(json!([])).into_response();
    }
    Json(json!([registration_json(1), registration_json(2)])).into_response()
}

async fn course_registrations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let mut other = registration_json(id);
    other["id"] = json!(200 + id);
    other["studentNumber"] = json!("S2024002");
    Json(json!([registration_json(id), other])).into_response()
}

async fn student_results(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(number): Path<String>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{
        "id": 5, "studentNumber": number, "courseCode": "CS101",
        "courseTitle": "Introduction to Programming", "credits": 3,
        "marks": 91.0, "grade": "A+", "isReleased": true
    }]))
    .into_response()
}

async fn gradable_courses(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let course = course_json(1, "CS101", "Introduction to Programming", "Computer Science", 3);
    Json(json!([course])).into_response()
}

async fn enrolled_students(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if id != 1 {
        return Json(json!([])).into_response();
    }
    Json(json!([
        { "studentId": 7, "studentNumber": "S2024001", "firstName": "Sam", "lastName": "Lee" },
        {
            "studentId": 8, "studentNumber": "S2024002", "firstName": "Kim", "lastName": "Park",
            "existingResult": {
                "id": 3, "studentNumber": "S2024002", "courseCode": "CS101",
                "marks": 58.0, "grade": "C+", "isReleased": false
            }
        }
    ]))
    .into_response()
}

async fn course_results(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "content": [{
            "id": 3, "studentNumber": "S2024002", "courseCode": format!("C{}", id),
            "credits": 3, "marks": 58.0, "grade": "C+", "isReleased": false
        }],
        "totalElements": 1,
        "totalPages": 1,
        "number": 0,
        "size": 20
    }))
    .into_response()
}

async fn release_results(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.record(
        format!("POST /lecturers/grading/courses/{}/release-results", id),
        Value::Null,
    );
    Json(json!({ "message": "Results released" })).into_response()
}

async fn submit_grade(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.grades.lock().unwrap().push(body);
    Json(json!({ "message": "Grade submitted" })).into_response()
}
