//! Async executor that runs `OperadorasClient` requests over `reqwest`.
//!
//! # Design
//! `ApiClient` owns one `reqwest::Client` built from a `ClientConfig`, so
//! every call shares the connection pool and the same timeout. Cloning is
//! cheap and clones share the pool. Failures are logged and returned
//! unchanged: no retry, no caching, no fallback value. Dropping a returned
//! future cancels the in-flight request.

use crate::client::OperadorasClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    DespesasResponse, Estatisticas, EstatisticasComplementares, ListOperadoras, Operadora,
    PaginatedResponse, Pagination,
};

/// Typed async client for the operadoras backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    requests: OperadorasClient,
}

impl ApiClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for an invalid base URL and
    /// `ApiError::Transport` if the HTTP client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let requests = OperadorasClient::new(&config.base_url)?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        tracing::debug!(
            base_url = %requests.base_url(),
            timeout_ms = config.timeout.as_millis() as u64,
            "api client initialized"
        );
        Ok(Self { http, requests })
    }

    pub fn requests(&self) -> &OperadorasClient {
        &self.requests
    }

    /// `GET /operadoras?page&limit[&search]`. `search` is omitted when empty.
    pub async fn fetch_operadoras(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<PaginatedResponse<Operadora>> {
        self.fetch_operadoras_with(&ListOperadoras {
            page,
            limit,
            search: search.to_string(),
        })
        .await
    }

    pub async fn fetch_operadoras_with(
        &self,
        params: &ListOperadoras,
    ) -> Result<PaginatedResponse<Operadora>> {
        let req = self.requests.build_list_operadoras(params)?;
        let response = self.execute(req).await?;
        self.requests.parse_list_operadoras(response)
    }

    /// `GET /operadoras/{cnpj}`.
    pub async fn fetch_operadora(&self, cnpj: &str) -> Result<Operadora> {
        let req = self.requests.build_get_operadora(cnpj)?;
        let response = self.execute(req).await?;
        self.requests.parse_get_operadora(response)
    }

    /// `GET /operadoras/{cnpj}/despesas?page&limit`.
    pub async fn fetch_operadora_despesas(
        &self,
        cnpj: &str,
        page: u32,
        limit: u32,
    ) -> Result<DespesasResponse> {
        self.fetch_operadora_despesas_with(cnpj, &Pagination { page, limit })
            .await
    }

    pub async fn fetch_operadora_despesas_with(
        &self,
        cnpj: &str,
        pagination: &Pagination,
    ) -> Result<DespesasResponse> {
        let req = self.requests.build_list_despesas(cnpj, pagination)?;
        let response = self.execute(req).await?;
        self.requests.parse_list_despesas(response)
    }

    /// `GET /estatisticas`.
    pub async fn fetch_estatisticas(&self) -> Result<Estatisticas> {
        let req = self.requests.build_get_estatisticas()?;
        let response = self.execute(req).await?;
        self.requests.parse_get_estatisticas(response)
    }

    /// `GET /estatisticas-complementares`.
    pub async fn fetch_estatisticas_complementares(&self) -> Result<EstatisticasComplementares> {
        let req = self.requests.build_get_estatisticas_complementares()?;
        let response = self.execute(req).await?;
        self.requests.parse_get_estatisticas_complementares(response)
    }

    /// Run one request. Any status is returned as data; status interpretation
    /// belongs to the `parse_*` methods.
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");

        let mut builder = self.http.get(req.url.clone());
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %req.url, timeout = e.is_timeout(), "request failed: {e}");
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.inspect_err(|e| {
            tracing::warn!(url = %req.url, status, "failed to read response body: {e}");
        })?;

        if (200..300).contains(&status) {
            tracing::debug!(url = %req.url, status, bytes = body.len(), "received response");
        } else {
            tracing::warn!(url = %req.url, status, "backend returned error status");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
