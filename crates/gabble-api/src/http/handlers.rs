//! Request handlers for the five protocol commands.
//!
//! Endpoints:
//! - GET /join?name=  -> `ok` + `Set-Cookie: uid=<token>`, or `no`
//! - GET /leave?name= + uid cookie -> `ok` / `no`
//! - GET /who         -> numbered roster (always succeeds)
//! - GET /post?name=&msg= + uid cookie -> `ok` / `no`
//! - GET /read?name=  + uid cookie -> visible entries, or `no`
//!
//! Every failure cause (duplicate name, unknown session, absent or
//! malformed identity) answers the same literal `no`; the wire protocol
//! never says which case occurred. A bad cookie is handled here and
//! never reaches the room.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use gabble_types::session::SessionToken;

use crate::state::AppState;

const OK: &str = "ok";
const NO: &str = "no";

#[derive(Debug, Deserialize)]
pub struct NameParams {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostParams {
    name: Option<String>,
    msg: Option<String>,
}

/// Pull the identity token out of the `uid` cookie, if any.
///
/// Absent, unparseable, or non-numeric values all come back as `None` --
/// the universal invalid-identity sentinel.
fn identity(headers: &HeaderMap) -> Option<SessionToken> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix("uid=")?.parse().ok())
}

/// GET /join?name= -- ask to enter the room.
pub async fn join(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Response {
    let Some(name) = params.name.filter(|n| !n.is_empty()) else {
        return NO.into_response();
    };
    match state.room.add_user(&name).await {
        Ok(token) => ([(header::SET_COOKIE, format!("uid={token}"))], OK).into_response(),
        Err(e) => {
            debug!(%name, error = %e, "join rejected");
            NO.into_response()
        }
    }
}

/// GET /leave?name= + uid cookie -- announce departure.
pub async fn leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<NameParams>,
) -> Response {
    let (Some(name), Some(token)) = (params.name, identity(&headers)) else {
        return NO.into_response();
    };
    match state.room.del_user(&name, token).await {
        Ok(()) => OK.into_response(),
        Err(e) => {
            debug!(%name, error = %e, "leave rejected");
            NO.into_response()
        }
    }
}

/// GET /who -- numbered listing of who is present. Always succeeds.
pub async fn who(State(state): State<AppState>) -> Response {
    state.room.who().await.into_response()
}

/// GET /post?name=&msg= + uid cookie -- store a message.
pub async fn post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PostParams>,
) -> Response {
    let (Some(name), Some(msg), Some(token)) = (params.name, params.msg, identity(&headers))
    else {
        return NO.into_response();
    };
    match state.room.store_message(&name, token, &msg).await {
        Ok(()) => OK.into_response(),
        Err(e) => {
            debug!(%name, error = %e, "post rejected");
            NO.into_response()
        }
    }
}

/// GET /read?name= + uid cookie -- everything visible since last read.
///
/// An empty body is a successful read with nothing new; `no` is sent
/// only for an absent or invalid identity.
pub async fn read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<NameParams>,
) -> Response {
    let (Some(name), Some(token)) = (params.name, identity(&headers)) else {
        return NO.into_response();
    };
    match state.room.read(&name, token).await {
        Ok(text) => text.into_response(),
        Err(e) => {
            debug!(%name, error = %e, "read rejected");
            NO.into_response()
        }
    }
}
