pub mod data;

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub use data::{Dataset, DespesaRecord, Estatisticas, EstatisticasComplementares, OperadoraRecord};

pub const MAX_LIMIT: u32 = 100;

pub type Db = Arc<Dataset>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Despesa {
    pub trimestre: u8,
    pub ano: i32,
    pub valor_despesa: f64,
    pub valor_ytd: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperadoraIdentity {
    pub cnpj: String,
    pub razao_social: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DespesasPage {
    #[serde(flatten)]
    pub pagination: Page<Despesa>,
    pub operadora: OperadoraIdentity,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Error body in the `{"detail": ...}` shape the real backend uses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

pub struct HandlerError {
    status: StatusCode,
    detail: String,
}

impl HandlerError {
    fn not_found(cnpj: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: format!("Operadora com CNPJ {cnpj} não encontrada"),
        }
    }

    fn invalid(detail: String) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail,
        }
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid(rejection.body_text())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status, Json(Detail { detail: self.detail })).into_response()
    }
}

pub fn app() -> Router {
    app_with(Dataset::sample())
}

pub fn app_with(dataset: Dataset) -> Router {
    let db: Db = Arc::new(dataset);
    let api = Router::new()
        .route("/operadoras", get(list_operadoras))
        .route("/operadoras/{cnpj}", get(get_operadora))
        .route("/operadoras/{cnpj}/despesas", get(list_despesas))
        .route("/estatisticas", get(get_estatisticas))
        .route(
            "/estatisticas-complementares",
            get(get_estatisticas_complementares),
        );
    Router::new()
        .route("/", get(health))
        .nest("/api", api)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate_page(page: u32, limit: u32) -> Result<(), HandlerError> {
    if page < 1 {
        return Err(HandlerError::invalid("page must be >= 1".to_string()));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(HandlerError::invalid(format!("limit must be between 1 and {MAX_LIMIT}")));
    }
    Ok(())
}

/// Slice one page out of `items`; `total_pages` is `ceil(total / limit)`.
fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let total = items.len() as u64;
    let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    let data = items.into_iter().skip(offset).take(limit as usize).collect();
    Page {
        data,
        total,
        page,
        limit,
        total_pages: total.div_ceil(u64::from(limit)),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "name": "operadoras-mock", "status": "ok" }))
}

async fn list_operadoras(
    State(db): State<Db>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<OperadoraRecord>>, HandlerError> {
    let Query(query) = query?;
    validate_page(query.page, query.limit)?;
    let matches = db.search(&query.search).into_iter().cloned().collect();
    Ok(Json(paginate(matches, query.page, query.limit)))
}

async fn get_operadora(
    State(db): State<Db>,
    Path(cnpj): Path<String>,
) -> Result<Json<OperadoraRecord>, HandlerError> {
    db.find(&cnpj)
        .cloned()
        .map(Json)
        .ok_or_else(|| HandlerError::not_found(&cnpj))
}

async fn list_despesas(
    State(db): State<Db>,
    Path(cnpj): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<DespesasPage>, HandlerError> {
    let Query(query) = query?;
    validate_page(query.page, query.limit)?;
    let operadora = db.find(&cnpj).ok_or_else(|| HandlerError::not_found(&cnpj))?;

    let history = db
        .despesas_of(&cnpj)
        .into_iter()
        .map(|q| Despesa {
            trimestre: q.trimestre,
            ano: q.ano,
            valor_despesa: q.valor_isolado,
            valor_ytd: q.valor_ytd,
        })
        .collect();

    Ok(Json(DespesasPage {
        pagination: paginate(history, query.page, query.limit),
        operadora: OperadoraIdentity {
            cnpj: operadora.cnpj.clone(),
            razao_social: operadora.razao_social.clone(),
        },
    }))
}

async fn get_estatisticas(State(db): State<Db>) -> Json<Estatisticas> {
    Json(db.estatisticas())
}

async fn get_estatisticas_complementares(
    State(db): State<Db>,
) -> Json<EstatisticasComplementares> {
    Json(db.estatisticas_complementares())
}
