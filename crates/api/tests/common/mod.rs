#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::cookie::SameSite;

use personagens_api::config::{ServerConfig, SessionConfig};
use personagens_api::router::build_app_router;
use personagens_api::state::AppState;
use personagens_api::upload::UploadStore;
use personagens_db::MemoryStore;

pub const BOUNDARY: &str = "----personagens-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads go to `upload_dir`; cookies are not marked `Secure` since the
/// tests speak plain HTTP.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        require_session_for_writes: false,
        session: SessionConfig {
            secret: None,
            cookie_name: "personagens.sid".to_string(),
            secure: false,
            same_site: SameSite::Lax,
            idle_timeout_mins: None,
        },
    }
}

/// A router wired to an in-memory store and a temporary upload directory.
///
/// The router is cheap to clone; clones share the store, the upload
/// directory and the session store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Build the app after letting `tweak` adjust the default test config.
    pub fn with_config(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = test_config(uploads.path());
        tweak(&mut config);

        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
            uploads: Arc::new(UploadStore::new(config.upload_dir.clone())),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app_router(state, &config),
            store,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::delete(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        parts: &[Part<'_>],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(multipart_body(parts))).unwrap())
            .await
    }

    /// Register a user and log in, returning the session cookie.
    pub async fn login_cookie(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/auth/register",
                serde_json::json!({ "nome": "Tester", "email": email, "senha": password }),
            )
            .await;
        assert_eq!(response.status(), 201);

        let response = self
            .post_json(
                "/auth/login",
                serde_json::json!({ "email": email, "senha": password }),
            )
            .await;
        assert_eq!(response.status(), 200);
        session_cookie(&response).expect("login should set a session cookie")
    }

    /// Number of files currently in the upload directory.
    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

pub fn photo(file_name: &str) -> Part<'_> {
    Part::File {
        name: "foto",
        file_name,
        data: b"\x89PNG fake image bytes",
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// The `name=value` pair of the first `Set-Cookie` header, ready to be sent
/// back in a `Cookie` header.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(|pair| pair.trim().to_string())
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
