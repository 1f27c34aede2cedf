// tests/common/mod.rs
//
// Stub grading server speaking the token, values and grade endpoints over
// real HTTP on an ephemeral port.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use submitty_api_check::config::{AppConfig, Credentials};

pub const TOKEN: &str = "stub-token-1234";
pub const SEMESTER: &str = "f26";
pub const COURSE: &str = "sample";
pub const GRADEABLE: &str = "subdirectory_vcs_homework";

/// How the stub deviates from the real platform.
#[derive(Clone)]
pub struct StubOptions {
    /// Answer `/api/token` with only `{"data": {"token": ...}}`.
    pub bare_token: bool,
    /// Serve values for any key, user, gradeable and method, and answer
    /// unknown endpoints with `success`.
    pub lenient: bool,
    /// `data` of a successful grade response
    pub grade_message: String,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            bare_token: false,
            lenient: false,
            grade_message: "Successfully uploaded version 2 for Subdirectory VCS Homework".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct StubState {
    pub values: Value,
    pub options: StubOptions,
    pub requests: Arc<Mutex<Vec<String>>>,
}

pub struct StubServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Config pointing at this stub, logged in as the default instructor.
    pub fn config(&self) -> AppConfig {
        self.config_with_password("instructor")
    }

    pub fn config_with_password(&self, password: &str) -> AppConfig {
        AppConfig {
            base_url: self.base_url.clone(),
            semester: SEMESTER.to_string(),
            course: COURSE.to_string(),
            credentials: Credentials {
                user_id: "instructor".to_string(),
                password: password.to_string(),
            },
            timeout_secs: 5,
            report_path: None,
        }
    }
}

#[derive(Deserialize)]
struct TokenForm {
    user_id: String,
    password: String,
}

#[derive(Deserialize)]
struct GradeForm {
    user_id: String,
    vcs_checkout: String,
    git_repo_id: String,
}

fn record(state: &StubState, req: &HttpRequest) {
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(format!("{} {}", req.method(), req.path()));
    }
}

fn fail(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "fail", "message": message }))
}

fn success_values(state: &StubState) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "success", "data": state.values }))
}

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TOKEN)
}

async fn token(req: HttpRequest, state: web::Data<StubState>, form: web::Form<TokenForm>) -> HttpResponse {
    record(&state, &req);
    if form.user_id == "instructor" && form.password == "instructor" {
        if state.options.bare_token {
            return HttpResponse::Ok().json(json!({ "data": { "token": TOKEN } }));
        }
        HttpResponse::Ok().json(json!({ "status": "success", "data": { "token": TOKEN } }))
    } else {
        fail("Could not login using that user id or password")
    }
}

async fn values(
    req: HttpRequest,
    state: web::Data<StubState>,
    path: web::Path<(String, String, String)>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    record(&state, &req);
    if state.options.lenient {
        return success_values(&state);
    }
    if !authorized(&req) {
        return fail("Unauthenticated access. Please log in.");
    }
    let (_, _, gradeable) = path.into_inner();
    if gradeable != GRADEABLE {
        return fail("Gradeable does not exist");
    }
    match query.get("user_id").map(String::as_str) {
        Some("student") => success_values(&state),
        _ => fail("API key and specified user_id are not for the same user."),
    }
}

async fn grade(req: HttpRequest, state: web::Data<StubState>, form: web::Form<GradeForm>) -> HttpResponse {
    record(&state, &req);
    if !authorized(&req) {
        return fail("Unauthenticated access. Please log in.");
    }
    if form.user_id != "student" || form.vcs_checkout != "true" || form.git_repo_id != "none" {
        return fail("Invalid grade request");
    }
    HttpResponse::Ok().json(json!({ "status": "success", "data": state.options.grade_message }))
}

async fn method_not_allowed(state: web::Data<StubState>) -> HttpResponse {
    if state.options.lenient {
        return success_values(&state);
    }
    fail("Method not allowed.")
}

async fn broken() -> HttpResponse {
    HttpResponse::InternalServerError().body("Internal Server Error")
}

async fn not_found(state: web::Data<StubState>) -> HttpResponse {
    if state.options.lenient {
        return HttpResponse::Ok().json(json!({ "status": "success", "data": null }));
    }
    HttpResponse::NotFound().json(json!({ "status": "fail", "message": "Endpoint not found." }))
}

/// Values payload matching the sample course's graded VCS homework.
pub fn sample_values() -> Value {
    json!({
        "is_queued": false,
        "queue_position": 0,
        "is_grading": false,
        "has_submission": true,
        "autograding_complete": true,
        "has_active_version": true,
        "highest_version": 1,
        "total_points": 6,
        "total_percent": 0.857,
        "test_cases": [
            {
                "name": "Python test",
                "details": "python3 *.py",
                "has_extra_results": true,
                "is_extra_credit": false,
                "points_available": 5,
                "points_received": 5,
                "testcase_message": ""
            },
            {
                "name": "Submitted a .pdf file",
                "details": "",
                "has_extra_results": true,
                "is_extra_credit": false,
                "points_available": 1,
                "points_received": 1,
                "testcase_message": ""
            },
            {
                "name": "Required 500-1000 Words",
                "details": "",
                "has_extra_results": true,
                "is_extra_credit": false,
                "points_available": 1,
                "points_received": 0,
                "testcase_message": ""
            }
        ]
    })
}

/// Starts a well-behaved stub on the current actix runtime.
pub fn spawn_stub(values: Value) -> StubServer {
    spawn_stub_with(values, StubOptions::default())
}

pub fn spawn_stub_with(stub_values: Value, options: StubOptions) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let data = web::Data::new(StubState {
        values: stub_values,
        options,
        requests: requests.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/token", web::post().to(token))
            .route("/api/broken", web::get().to(broken))
            .service(
                web::resource("/api/{semester}/{course}/gradeable/{gradeable}/values")
                    .route(web::get().to(values))
                    .default_service(web::to(method_not_allowed)),
            )
            .route(
                "/api/{semester}/{course}/gradeable/{gradeable}/grade",
                web::post().to(grade),
            )
            .default_service(web::to(not_found))
    })
    .workers(1)
    .listen(listener)
    .expect("listen on stub port")
    .run();

    actix_rt::spawn(server);

    StubServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}
