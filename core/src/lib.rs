//! Typed client for the operadoras expense dashboard backend.
//!
//! # Overview
//! Wraps the five read endpoints of the backend (operadora listing and
//! lookup, per-operadora expense history, and the two statistics reports)
//! and returns their bodies as typed data contracts.
//!
//! # Design
//! - `OperadorasClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern), so request
//!   construction is deterministic and testable on its own.
//! - `ApiClient` executes those requests with one shared `reqwest::Client`
//!   configured from `ClientConfig` (base URL, timeout). Build it once and
//!   pass it around.
//! - Errors propagate unchanged to the caller; nothing is retried or cached.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use api::ApiClient;
pub use client::OperadorasClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Despesa, DespesaPorUF, DespesasResponse, Estatisticas, EstatisticasComplementares,
    ListOperadoras, Operadora, OperadoraCrescimento, OperadoraResumo, OperadorasAcimaMedia,
    PaginatedResponse, Pagination, ResumoEstatisticas, TopOperadora, UFDistribuicao,
};
