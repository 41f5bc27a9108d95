//! Shared helpers for the API tests: an in-memory app, a request client and
//! factories that create rows directly in the store.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use course_api::model::{NewCourse, NewStudent};
use course_api::{app, AppState, Course, CourseStore, MemoryStore, ServerConfig, Student};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

static SEQUENCE: AtomicUsize = AtomicUsize::new(1);

fn next_name(prefix: &str) -> String {
    format!("{}-{}", prefix, SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    /// `Value::Null` when the response had no body.
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());
        let router = app(state, ServerConfig::default().body_limit_bytes);
        TestApp { router, store }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// `quantity` courses with generated names and no students.
    pub async fn course_factory(&self, quantity: usize) -> Vec<Course> {
        let mut courses = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            let input = NewCourse {
                name: next_name("course"),
                students: vec![],
            };
            courses.push(self.store.create_course(&input).await.unwrap());
        }
        courses
    }

    pub async fn course_named(&self, name: &str) -> Course {
        let input = NewCourse {
            name: name.into(),
            students: vec![],
        };
        self.store.create_course(&input).await.unwrap()
    }

    /// `quantity` students with generated names and no birth date.
    pub async fn student_factory(&self, quantity: usize) -> Vec<Student> {
        let mut students = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            let input = NewStudent {
                name: next_name("student"),
                birth_date: None,
            };
            students.push(self.store.create_student(&input).await.unwrap());
        }
        students
    }

    pub async fn create_student(&self, name: &str, birth_date: &str) -> Student {
        let input = NewStudent {
            name: name.into(),
            birth_date: Some(birth_date.parse().unwrap()),
        };
        self.store.create_student(&input).await.unwrap()
    }
}
