//! Stateless HTTP request builder and response parser for the operadoras API.
//!
//! # Design
//! `OperadorasClient` holds only the parsed base URL and carries no mutable
//! state between calls. Each backend operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the HTTP round trip in between,
//! keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    DespesasResponse, Estatisticas, EstatisticasComplementares, ListOperadoras, Operadora,
    PaginatedResponse, Pagination,
};

/// Synchronous, stateless client for the operadoras API.
#[derive(Debug, Clone)]
pub struct OperadorasClient {
    base_url: Url,
}

impl OperadorasClient {
    /// Parse `base_url`, e.g. `http://localhost:8000/api`.
    ///
    /// Trailing slashes are ignored. Any query string or fragment on the base
    /// is dropped.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL must be an http(s) URL, got {base_url}"
            )));
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        let trimmed = base_url.path().trim_end_matches('/').to_string();
        base_url.set_path(&trimmed);
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so a `/` inside a CNPJ stays inside its segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config(format!("cannot append path to {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn build_list_operadoras(&self, params: &ListOperadoras) -> Result<HttpRequest> {
        let mut url = self.endpoint(&["operadoras"])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &params.page.to_string())
                .append_pair("limit", &params.limit.to_string());
            if !params.search.is_empty() {
                query.append_pair("search", &params.search);
            }
        }
        Ok(HttpRequest::get(url))
    }

    pub fn build_get_operadora(&self, cnpj: &str) -> Result<HttpRequest> {
        Ok(HttpRequest::get(self.endpoint(&["operadoras", cnpj])?))
    }

    pub fn build_list_despesas(&self, cnpj: &str, pagination: &Pagination) -> Result<HttpRequest> {
        let mut url = self.endpoint(&["operadoras", cnpj, "despesas"])?;
        url.query_pairs_mut()
            .append_pair("page", &pagination.page.to_string())
            .append_pair("limit", &pagination.limit.to_string());
        Ok(HttpRequest::get(url))
    }

    pub fn build_get_estatisticas(&self) -> Result<HttpRequest> {
        Ok(HttpRequest::get(self.endpoint(&["estatisticas"])?))
    }

    pub fn build_get_estatisticas_complementares(&self) -> Result<HttpRequest> {
        Ok(HttpRequest::get(self.endpoint(&["estatisticas-complementares"])?))
    }

    pub fn parse_list_operadoras(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<Operadora>> {
        parse_json(response)
    }

    pub fn parse_get_operadora(&self, response: HttpResponse) -> Result<Operadora> {
        parse_json(response)
    }

    pub fn parse_list_despesas(&self, response: HttpResponse) -> Result<DespesasResponse> {
        parse_json(response)
    }

    pub fn parse_get_estatisticas(&self, response: HttpResponse) -> Result<Estatisticas> {
        parse_json(response)
    }

    pub fn parse_get_estatisticas_complementares(
        &self,
        response: HttpResponse,
    ) -> Result<EstatisticasComplementares> {
        parse_json(response)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
