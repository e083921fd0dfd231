use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{delete, get},
    Extension, Router, ServiceExt,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{util::MapRequestLayer, Layer, ServiceBuilder};
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod auth;
pub mod handlers;
pub mod users;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Build the application router.
///
/// The credential store and session store arrive injected so tests can run the
/// router against their own instances.
#[must_use]
pub fn app(users: users::DynUserStore, sessions: auth::session::Sessions) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login_view).post(handlers::login))
        .route(
            "/register",
            get(handlers::register_view).post(handlers::register),
        )
        .route("/logout", delete(handlers::logout))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(users))
                .layer(Extension(sessions)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, globals: &GlobalArgs) -> Result<()> {
    let users: users::DynUserStore = Arc::new(users::MemoryUserStore::default());
    let sessions = auth::session::Sessions::new(globals.session_secret.clone());

    // The method override must run before routing, so it wraps the router
    // instead of joining the layer stack above.
    let app = MapRequestLayer::new(method_override::<Body>).layer(app(users, sessions));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(
        listener,
        ServiceExt::<Request<Body>>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }

    info!("Gracefully shutdown");
}

/// Rewrite `POST /logout?_method=DELETE` into a real `DELETE` before routing.
/// HTML forms can only submit GET and POST.
fn method_override<B>(mut request: Request<B>) -> Request<B> {
    if request.method() != Method::POST {
        return request;
    }

    let overridden = request.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == "_method").then(|| value.to_ascii_uppercase())
        })
    });

    if let Some(method) = overridden {
        if let Ok(method) = Method::from_bytes(method.as_bytes()) {
            *request.method_mut() = method;
        }
    }

    request
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
    }

    #[test]
    fn method_override_rewrites_logout_post() {
        let rewritten = method_override(request(Method::POST, "/logout?_method=DELETE"));
        assert_eq!(rewritten.method(), Method::DELETE);
    }

    #[test]
    fn method_override_is_case_insensitive() {
        let rewritten = method_override(request(Method::POST, "/logout?_method=delete"));
        assert_eq!(rewritten.method(), Method::DELETE);
    }

    #[test]
    fn method_override_ignores_other_methods() {
        let rewritten = method_override(request(Method::GET, "/logout?_method=DELETE"));
        assert_eq!(rewritten.method(), Method::GET);
    }

    #[test]
    fn method_override_ignores_missing_param() {
        let rewritten = method_override(request(Method::POST, "/login"));
        assert_eq!(rewritten.method(), Method::POST);
    }

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
