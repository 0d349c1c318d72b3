#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use reqwest::StatusCode;
use serde_json::Value;

use course_outline::VecLog;
use course_outline::args::CliArguments;
use course_outline::config::Config;
use course_outline::entry::run;
use course_outline::error::Result;
use course_outline::http::{self, HttpError, Response};
use course_outline::world::MockWorld;

pub const BASE: &str = "https://canvas.example.edu";
pub const COURSE: u64 = 12345;
pub const SERVICE: &str = "http://localhost:8000";

/// The first page of one of the test course's collections.
pub fn first_page(kind: &str) -> String {
    format!("{BASE}/api/v1/courses/{COURSE}/{kind}?per_page=100")
}

/// A later page of one of the test course's collections.
pub fn page_url(kind: &str, page: usize) -> String {
    format!("{BASE}/api/v1/courses/{COURSE}/{kind}?page={page}&per_page=100")
}

/// A successful page with the given items and `Link` header.
pub fn page(items: Value, link: &str) -> Response {
    Response::ok(serde_json::to_vec(&items).unwrap()).with_link(link)
}

/// `count` items with consecutive IDs starting at `first`.
pub fn items(first: u64, count: u64) -> Value {
    (first..first + count)
        .map(|id| serde_json::json!({ "id": id, "name": format!("item {id}") }))
        .collect()
}

/// A Canvas-style `Link` header; `next` is omitted on the last page.
pub fn link(kind: &str, page: usize, last: usize) -> String {
    let mut links = vec![
        format!(r#"<{}>; rel="current""#, page_url(kind, page)),
        format!(r#"<{}>; rel="first""#, page_url(kind, 1)),
        format!(r#"<{}>; rel="last""#, page_url(kind, last)),
    ];
    if page < last {
        links.insert(1, format!(r#"<{}>; rel="next""#, page_url(kind, page + 1)));
    }
    links.join(",")
}

/// The response of an LMS for a collection the course doesn't use.
pub fn not_found() -> Response {
    Response::new(
        StatusCode::NOT_FOUND,
        r#"{"errors":[{"message":"The specified resource does not exist."}]}"#,
    )
}

/// A transport-level failure, as if the connection could not be established.
pub fn transport_error() -> HttpError {
    let error = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("request without a valid URL can't be built");
    HttpError::Network(error)
}

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Fail,
}

/// Maps request URLs to responses; URLs that are not mapped are answered with [not_found].
#[derive(Debug, Clone, Default)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: impl Into<String>, response: Response) -> Self {
        self.0.insert(url.into(), Route::Respond(response));
        self
    }

    /// Requests to `url` fail without a response.
    pub fn fail(mut self, url: impl Into<String>) -> Self {
        self.0.insert(url.into(), Route::Fail);
        self
    }

    pub fn find(&self, url: &str) -> Option<http::Result<Response>> {
        self.0.get(url).map(|route| match route {
            Route::Respond(response) => Ok(response.clone()),
            Route::Fail => Err(transport_error()),
        })
    }

    pub fn get(&self, url: &str) -> http::Result<Response> {
        self.find(url).unwrap_or_else(|| Ok(not_found()))
    }
}

/// Everything the world was asked to do, for inspection after the run.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub requests: Arc<Mutex<Vec<String>>>,
    pub posts: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub outputs: Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// The body of the single request made to the given service endpoint.
    pub fn posted_json(&self, endpoint: &str) -> Value {
        let posts = self.posts.lock().unwrap();
        let bodies: Vec<_> = posts
            .iter()
            .filter(|(url, _)| url.ends_with(endpoint))
            .collect();
        assert_eq!(bodies.len(), 1, "expected exactly one request to {endpoint}");
        serde_json::from_slice(&bodies[0].1).unwrap()
    }

    pub fn posted_bytes(&self, endpoint: &str) -> Vec<u8> {
        let posts = self.posts.lock().unwrap();
        posts
            .iter()
            .find(|(url, _)| url.ends_with(endpoint))
            .map(|(_, body)| body.clone())
            .expect("request was made")
    }

    pub fn outputs(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.outputs.lock().unwrap().clone()
    }
}

pub struct ExportTest {
    pub world: MockWorld,
    pub log: VecLog,
    pub recorder: Recorder,
}

impl ExportTest {
    /// Sets up a world with the given arguments, configuration and LMS, and an outline service
    /// that answers every request with `service` (or 200 with an empty object for `/save-token`).
    /// Routes also apply to `POST` requests and take precedence over these defaults.
    pub fn new(
        args: &[&str],
        config: &'static str,
        routes: Routes,
        service: Response,
    ) -> Self {
        let log = VecLog::new();
        let recorder = Recorder::default();
        let mut world = MockWorld::new();

        world
            .expect_arguments()
            .return_const(CliArguments::parse_from(args));
        world.expect_log().return_const(log.clone());
        world
            .expect_read_config()
            .returning(move || Config::parse(config));

        let post_routes = routes.clone();
        let requests = Arc::clone(&recorder.requests);
        world.expect_get().returning(move |url| {
            requests.lock().unwrap().push(url.to_string());
            routes.get(url.as_str())
        });

        let posts = Arc::clone(&recorder.posts);
        world.expect_post_json().returning(move |url, body| {
            posts.lock().unwrap().push((url.to_string(), body.to_vec()));
            if let Some(response) = post_routes.find(url.as_str()) {
                response
            } else if url.path().ends_with("/save-token") {
                Ok(Response::ok("{}"))
            } else {
                Ok(service.clone())
            }
        });

        let outputs = Arc::clone(&recorder.outputs);
        world.expect_write_output().returning(move |path, content| {
            outputs
                .lock()
                .unwrap()
                .push((path.to_path_buf(), content.to_vec()));
            Ok(())
        });

        Self {
            world,
            log,
            recorder,
        }
    }

    pub async fn run(self) -> (Result<()>, VecLog, Recorder) {
        let result = run(self.world).await;
        (result, self.log, self.recorder)
    }
}

/// A successful outline service response.
pub fn outline() -> Response {
    Response::ok(r#"{"course":"Intro","weeks":[{"week":1,"topics":["pagination"]}]}"#)
}

/// Parses one field of a submitted aggregate back into the item sequence it serializes.
pub fn field_items(aggregate: &Value, field: &str) -> Value {
    let json = aggregate[field].as_str().expect("field is a string");
    serde_json::from_str(json).expect("field is serialized JSON")
}
