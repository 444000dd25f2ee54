use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use falab_lib::{
    automaton::{
        compose,
        dot::ToDot,
        product::{self, Mode},
        regex,
        run::Run,
        Fa,
    },
    error::FaError,
};
use serde::{Deserialize, Serialize};

use crate::{render, store::RecordStore, App};

type Reply<T> = Result<Json<T>, (StatusCode, String)>;

/// Client-side violations map to 400, internal failures to 500.
fn fail(err: FaError) -> (StatusCode, String) {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string())
}

fn load_all(app: &App, uuids: &[String]) -> Result<Vec<Fa>, (StatusCode, String)> {
    uuids
        .iter()
        .map(|id| app.store.get_by_id(id).map_err(fail))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct UuidQuery {
    pub uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct BooleanRequest {
    pub uuids: Vec<String>,
    pub mode: Mode,
}

pub async fn boolean(
    State(app): State<Arc<App>>,
    Json(req): Json<BooleanRequest>,
) -> Reply<Fa> {
    let fas = load_all(&app, &req.uuids)?;
    let result = product::boolean(&fas, req.mode).map_err(fail)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct UuidsRequest {
    pub uuids: Vec<String>,
}

pub async fn n_boolean(
    State(app): State<Arc<App>>,
    Json(req): Json<UuidsRequest>,
) -> Reply<Fa> {
    let fas = load_all(&app, &req.uuids)?;
    let result = compose::epsilon_union(&fas).map_err(fail)?;
    Ok(Json(result))
}

pub async fn concatenation(
    State(app): State<Arc<App>>,
    Json(req): Json<UuidsRequest>,
) -> Reply<Fa> {
    let fas = load_all(&app, &req.uuids)?;
    let result = compose::concatenate(&fas).map_err(fail)?;
    Ok(Json(result))
}

pub async fn complement(
    State(app): State<Arc<App>>,
    Query(query): Query<UuidQuery>,
) -> Reply<Fa> {
    let fa = app.store.get_by_id(&query.uuid).map_err(fail)?;
    Ok(Json(fa.complement()))
}

pub async fn minimize_dfa(
    State(app): State<Arc<App>>,
    Query(query): Query<UuidQuery>,
) -> Reply<Fa> {
    let fa = app.store.get_by_id(&query.uuid).map_err(fail)?;
    Ok(Json(fa.minimize().map_err(fail)?))
}

pub async fn nfa_to_dfa(
    State(app): State<Arc<App>>,
    Query(query): Query<UuidQuery>,
) -> Reply<Fa> {
    let fa = app.store.get_by_id(&query.uuid).map_err(fail)?;
    Ok(Json(fa.determinize().map_err(fail)?))
}

pub async fn fa_to_regex(
    State(app): State<Arc<App>>,
    Query(query): Query<UuidQuery>,
) -> Result<String, (StatusCode, String)> {
    let fa = app.store.get_by_id(&query.uuid).map_err(fail)?;
    fa.to_regex().map_err(fail)
}

#[derive(Debug, Deserialize)]
pub struct RegexRequest {
    pub regex: String,
}

pub async fn regex_to_nfa(
    State(_app): State<Arc<App>>,
    Json(req): Json<RegexRequest>,
) -> Reply<Fa> {
    if req.regex.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "missing regex field".to_string()));
    }

    let nfa = regex::regex_to_nfa(&req.regex).map_err(fail)?;
    Ok(Json(nfa))
}

#[derive(Debug, Deserialize)]
pub struct RunStringRequest {
    pub uuid: String,
    pub string: String,
}

pub async fn run_string(
    State(app): State<Arc<App>>,
    Json(req): Json<RunStringRequest>,
) -> Reply<Run> {
    let fa = app.store.get_by_id(&req.uuid).map_err(fail)?;
    Ok(Json(fa.run(&req.string)))
}

pub async fn to_dot(
    State(app): State<Arc<App>>,
    Query(query): Query<UuidQuery>,
) -> Result<String, (StatusCode, String)> {
    let fa = app.store.get_by_id(&query.uuid).map_err(fail)?;
    Ok(fa.to_dot())
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub fa: Option<Fa>,
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub id: String,
    pub svg: String,
    pub tex: String,
    pub dot: String,
}

pub async fn render(
    State(app): State<Arc<App>>,
    Json(req): Json<RenderRequest>,
) -> Reply<RenderResponse> {
    let fa = match (req.fa, req.uuid) {
        (Some(fa), _) => fa,
        (None, Some(uuid)) => app.store.get_by_id(&uuid).map_err(fail)?,
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                "must provide either fa or uuid".to_string(),
            ))
        }
    };

    let dot = fa.to_dot();
    let rendered = render::render(&dot, app.config.get_render())
        .await
        .map_err(fail)?;

    let id = render::fresh_id();
    app.artifacts.save_tex(&id, &rendered.tex).map_err(fail)?;
    app.artifacts.save_svg(&id, &rendered.svg).map_err(fail)?;

    if let Some(logger) = &app.logger {
        logger.info(&format!("rendered {}", id));
    }

    Ok(Json(RenderResponse {
        id,
        svg: rendered.svg,
        tex: rendered.tex,
        dot,
    }))
}

pub async fn get_tex(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<String, (StatusCode, String)> {
    app.artifacts
        .load_tex(&id)
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))
}

pub async fn get_svg(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let svg = app
        .artifacts
        .load_svg(&id)
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

pub async fn live() -> &'static str {
    "ok"
}
