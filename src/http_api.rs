use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::Config,
    store::{StoreError, Student, StudentStore},
};

/* ================== Context ================== */

/// Shared handler state, immutable after startup. The store sits behind
/// a trait object so tests can run the router against an in-memory fake.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentStore>,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn response(status: StatusCode, msg: impl Into<String>) -> Response {
        (status, Json(ApiError { error: msg.into() })).into_response()
    }
}

#[derive(Serialize)]
struct CreatedMsg {
    message: &'static str,
    #[serde(rename = "insertedID")]
    inserted_id: String,
}

fn store_error_response(err: &StoreError) -> Response {
    let msg = match err {
        StoreError::Query(_) => "Failed to fetch documents",
        StoreError::Decode(_) => "Failed to decode documents",
        StoreError::Insert(_) => "Failed to insert document",
    };
    ApiError::response(StatusCode::INTERNAL_SERVER_ERROR, msg)
}

/* ================== Student handlers ================== */

/// GET /students — every document in the collection, verbatim.
async fn students_list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, Response> {
    let docs = state.students.find_all().await.map_err(|e| {
        error!("students list failed: {e}");
        store_error_response(&e)
    })?;

    Ok(Json(docs))
}

/// POST /students — bind the strict Student shape, insert one document.
/// Binding failures surface the binder's own message, verbatim.
async fn student_add(
    State(state): State<AppState>,
    payload: Result<Json<Student>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(new_student) =
        payload.map_err(|rej| ApiError::response(StatusCode::BAD_REQUEST, rej.body_text()))?;

    let id = state.students.insert_one(&new_student).await.map_err(|e| {
        error!("student insert failed: {e}");
        store_error_response(&e)
    })?;

    let inserted_id = match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    };

    Ok((
        StatusCode::CREATED,
        Json(CreatedMsg {
            message: "Student added successfully!",
            inserted_id,
        }),
    )
        .into_response())
}

/* ================== Router & server ================== */

// Local dev front-end plus the deployed one. PUT/DELETE are declared for
// the front-end's benefit even though no handlers exist for them.
const ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:5173",
    "https://students-frontend.onrender.com",
];

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            ALLOWED_ORIGINS.map(HeaderValue::from_static),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/students", get(students_list).post(student_add))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

pub async fn run_http_server(config: &Config, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[http] listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/* ================== Tests ================== */
