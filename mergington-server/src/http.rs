use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{self, rejection::QueryRejection, Path, Query},
    http::{header, HeaderValue, Response, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_derive::Deserialize;

use mergington_shared::{Activities, ActivityRecord, ErrorDetail, MessageResponse, StatusUpdate};
use tokio::net::TcpListener;
use tokio_stream::wrappers::WatchStream;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::{RegistryError, State, STREAM_SEGMENT};

impl IntoResponse for RegistryError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RegistryError::NotFound => StatusCode::NOT_FOUND,
            RegistryError::AlreadySignedUp
            | RegistryError::NotSignedUp
            | RegistryError::ActivityFull
            | RegistryError::InvalidEmail => StatusCode::BAD_REQUEST,
        };
        let detail = ErrorDetail {
            detail: self.to_string(),
        };
        (status, Json(detail)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

/// Extracts the `email` parameter, reporting a missing one like any other rejected request.
fn email(query: Result<Query<EmailQuery>, QueryRejection>) -> Result<String, RegistryError> {
    match query {
        Ok(Query(EmailQuery { email })) => Ok(email),
        Err(rejection) => {
            log::warn!("rejected query: {}", rejection.body_text());
            Err(RegistryError::InvalidEmail)
        }
    }
}

async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn list_activities(extract::State(state): extract::State<Arc<State>>) -> Json<Activities> {
    Json(state.list())
}

async fn activity(
    Path(name): Path<String>,
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<ActivityRecord>, RegistryError> {
    state.get(&name).map(Json).ok_or(RegistryError::NotFound)
}

async fn signup(
    Path(name): Path<String>,
    extract::State(state): extract::State<Arc<State>>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, RegistryError> {
    let email = email(query)?;
    let message = state
        .signup(&name, &email)
        .inspect_err(|e| log::warn!("signup of {email} for {name:?} rejected: {e}"))?;
    Ok(Json(MessageResponse { message }))
}

async fn unregister(
    Path(name): Path<String>,
    extract::State(state): extract::State<Arc<State>>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, RegistryError> {
    let email = email(query)?;
    let message = state
        .unregister(&name, &email)
        .inspect_err(|e| log::warn!("unregister of {email} from {name:?} rejected: {e}"))?;
    Ok(Json(MessageResponse { message }))
}

/// Streams the activities as newline-delimited json: the current state first, then the new
/// state after every change.
async fn stream(extract::State(state): extract::State<Arc<State>>) -> impl IntoResponse {
    let updates = WatchStream::new(state.subscribe()).map(StatusUpdate::Activities);
    let lines = updates.map(|msg| serde_json::to_string(&msg).map(|x| x + "\n"));

    let mut res = Response::new(Body::from_stream(lines));
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    res
}

pub fn router(state: Arc<State>) -> Router {
    let static_files = ServeDir::new(state.static_dir()).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(root))
        .route("/activities", get(list_activities))
        .route(&format!("/activities/{STREAM_SEGMENT}"), get(stream))
        .route("/activities/:name", get(activity))
        .route("/activities/:name/signup", post(signup))
        .route("/activities/:name/unregister", post(unregister))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn main(state: Arc<State>) -> Result<()> {
    let listen_on = state.config.http.listen_on;

    let listener = TcpListener::bind(listen_on).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
