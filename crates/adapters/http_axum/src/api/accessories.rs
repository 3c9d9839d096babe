//! JSON REST handlers for garage door accessories.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use garage_bridge_domain::accessory::{AccessoryInformation, AccessorySnapshot};
use garage_bridge_domain::door::TargetDoorState;

use crate::error::ApiError;
use crate::state::AppState;

/// Request and response body of the target endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct TargetBody {
    pub value: TargetDoorState,
}

/// One accessory with its static metadata.
#[derive(Serialize)]
pub struct AccessoryDetails {
    #[serde(flatten)]
    pub snapshot: AccessorySnapshot,
    pub information: AccessoryInformation,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AccessorySnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<AccessoryDetails>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the target read endpoint.
pub enum TargetResponse {
    Ok(Json<TargetBody>),
}

impl IntoResponse for TargetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the target write endpoint.
pub enum SetTargetResponse {
    Accepted(Json<AccessorySnapshot>),
}

impl IntoResponse for SetTargetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// Possible responses from the identify endpoint.
pub enum IdentifyResponse {
    NoContent,
}

impl IntoResponse for IdentifyResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/accessories`
pub async fn list(State(state): State<AppState>) -> ListResponse {
    ListResponse::Ok(Json(state.accessories.snapshots()))
}

/// `GET /api/accessories/{name}`
pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<GetResponse, ApiError> {
    let handle = state.accessories.get(&name)?;
    Ok(GetResponse::Ok(Json(AccessoryDetails {
        snapshot: handle.snapshot(),
        information: handle.information().clone(),
    })))
}

/// `GET /api/accessories/{name}/target`
pub async fn get_target(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<TargetResponse, ApiError> {
    let handle = state.accessories.get(&name)?;
    Ok(TargetResponse::Ok(Json(TargetBody {
        value: handle.target_state(),
    })))
}

/// `PUT /api/accessories/{name}/target`
///
/// Answers once the door entered its transitional state; the body is the
/// snapshot at that point.
pub async fn set_target(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<TargetBody>, JsonRejection>,
) -> Result<SetTargetResponse, ApiError> {
    let handle = state.accessories.get(&name)?;
    let Json(body) = payload?;
    handle.set_target(body.value).await?;
    Ok(SetTargetResponse::Accepted(Json(handle.snapshot())))
}

/// `POST /api/accessories/{name}/identify`
pub async fn identify(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<IdentifyResponse, ApiError> {
    state.accessories.get(&name)?.identify();
    Ok(IdentifyResponse::NoContent)
}
