//! Documentation of a question and streamed answer page.
//!
//!
//!
//! # General Infrastructure
//! - Single axum server renders the page, accepts the form and streams answers
//! - Page is driven by htmx, bundled into `dist/main.js` together with the submission gate
//! - Gate logic lives in the `gate` crate so it can be tested and driven headless by `tester`
//!
//!
//!
//! # Request Lifecycle
//!
//! 1. `GET /` returns the page with the form (`form`) and its input (`text-input`)
//! 2. `POST /` echoes the question as a snippet with an answer slot for submission `N`
//! 3. In the background the answer is computed after `PROCESS_DELAY_SECS` and queued
//! 4. The answer slot connects to `GET /processed`, which streams `<p id='answer-N'>` once
//! 5. The page processes `answer-N`, the gate reopens, the user may ask again
//!
//! `GET /counter` is an independent heartbeat stream, handy to see SSE working at all.
//!
//!
//!
//! # Notes
//!
//! ## Submission Ids
//! Ids start at 0 and increase per accepted POST. The snippet slot and the streamed
//! answer share the id. A `/processed` stream does not pick a specific id though, it
//! takes whatever answer is next in the queue.
//!
//! ## Unsupported Methods
//! Anything other than GET/POST on `/` is a 500 with `HTTP method not supported`.
//! Anything other than GET on `/processed` is a 405.
//!
//!
//!
//! # Setup
//!
//! Environment variables, all optional.
//! ```sh
//! RUST_PORT=1313
//! PROCESS_DELAY_SECS=2
//! COUNTER_INTERVAL_MS=1000
//! ANSWER_BACKLOG=16
//! DIST_DIR=dist
//! RUST_LOG=info
//! ```
//!
//! Run the server.
//! ```sh
//! cargo run -p answer
//! ```
//!
//! Drive it headless through the gate.
//! ```sh
//! cargo run -p tester -- "first question" "second question"
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod answer;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod stream;
pub mod templates;

use config::Config;
use error::AppError;
use routes::{index_handler, submit_handler, unsupported_handler};
use state::State;
use stream::{counter_handler, processed_handler, processed_not_allowed};

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/",
            get(index_handler)
                .post(submit_handler)
                .fallback(unsupported_handler),
        )
        .route("/counter", get(counter_handler))
        .route(
            "/processed",
            get(processed_handler).fallback(processed_not_allowed),
        )
        .nest_service("/dist", ServeDir::new(&state.config.dist_dir))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let state = State::new(Config::load()?)?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use futures_util::StreamExt;
    use tower::ServiceExt;

    use super::*;

    fn test_config(process_delay: u64) -> Config {
        Config {
            process_delay,
            counter_interval: Duration::from_millis(10),
            ..Config::default()
        }
    }

    fn test_app(process_delay: u64) -> Router {
        app(State::new(test_config(process_delay)).unwrap())
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn ask(question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("input_text={question}")))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = test_app(0).oneshot(get_uri("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains(r#"id="form""#));
        assert!(html.contains(r#"id="text-input""#));
    }

    #[tokio::test]
    async fn test_submit_echoes_question() {
        let response = test_app(0).oneshot(ask("test")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<p class=\"question\">You have entered: test</p>"));
        assert!(html.contains(r#"id="answer-stream-0""#));
    }

    #[tokio::test]
    async fn test_submit_escapes_and_counts() {
        let app = test_app(0);

        let first = app.clone().oneshot(ask("one")).await.unwrap();
        assert!(body_text(first).await.contains("answer-stream-0"));

        let second = app.oneshot(ask("%3Cb%3E")).await.unwrap();
        let html = body_text(second).await;
        assert!(html.contains("You have entered: &lt;b&gt;"));
        assert!(html.contains("answer-stream-1"));
    }

    #[tokio::test]
    async fn test_submit_missing_field_is_empty() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("other=1"))
            .unwrap();

        let response = test_app(0).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("You have entered: </p>"));
    }

    #[tokio::test]
    async fn test_submit_non_form_body_is_empty() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("input_text=test"))
            .unwrap();

        let response = test_app(0).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("You have entered: </p>"));
    }

    #[tokio::test]
    async fn test_submit_oversized_form() {
        let question = "a".repeat(3 * 1024 * 1024);
        let response = test_app(0).oneshot(ask(&question)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.starts_with("Error parsing form"));
    }

    #[tokio::test]
    async fn test_unsupported_methods() {
        let app = test_app(0);

        let put = Request::builder()
            .method("PUT")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(put).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "HTTP method not supported: PUT");

        let post = Request::builder()
            .method("POST")
            .uri("/processed")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(post).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_text(response).await, "Method not supported");
    }

    #[tokio::test]
    async fn test_processed_streams_answer() {
        let app = test_app(1);

        app.clone().oneshot(ask("test")).await.unwrap();

        let response = app.oneshot(get_uri("/processed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE].to_str().unwrap(),
            "text/event-stream"
        );

        let events = body_text(response).await;
        assert!(events.contains("data: <p id='answer-0'>You have entered: test. Waited 1 seconds</p>"));
    }

    #[tokio::test]
    async fn test_processed_hands_out_each_answer_once() {
        let app = test_app(0);

        app.clone().oneshot(ask("a")).await.unwrap();
        app.clone().oneshot(ask("b")).await.unwrap();

        let first = body_text(app.clone().oneshot(get_uri("/processed")).await.unwrap()).await;
        let second = body_text(app.oneshot(get_uri("/processed")).await.unwrap()).await;

        let both = format!("{first}{second}");
        assert!(both.contains("answer-0"));
        assert!(both.contains("answer-1"));
        assert_ne!(first.contains("answer-0"), second.contains("answer-0"));
    }

    #[tokio::test]
    async fn test_processed_times_out_empty() {
        let response = test_app(0).oneshot(get_uri("/processed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_counter_ticks() {
        let response = test_app(0).oneshot(get_uri("/counter")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut frames = response.into_body().into_data_stream();

        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"data: <p>counter=0</p>\n\n");

        let second = frames.next().await.unwrap().unwrap();
        assert_eq!(&second[..], b"data: <p>counter=1</p>\n\n");
    }

    #[tokio::test]
    async fn test_processed_dropped_stream_keeps_answer() {
        let app = test_app(0);

        let abandoned = app.clone().oneshot(get_uri("/processed")).await.unwrap();
        drop(abandoned);

        app.clone().oneshot(ask("kept")).await.unwrap();

        let events = body_text(app.oneshot(get_uri("/processed")).await.unwrap()).await;
        assert!(events.contains("data: <p id='answer-0'>You have entered: kept</p>"));
    }

    #[tokio::test]
    async fn test_dist_serves_files() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("main.js"), "console.log(1);").unwrap();

        let router = app(State::new(Config {
            dist_dir: dist.path().to_string_lossy().into_owned(),
            ..test_config(0)
        })
        .unwrap());

        let response = router.clone().oneshot(get_uri("/dist/main.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "console.log(1);");

        let response = router.oneshot(get_uri("/dist/missing.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
