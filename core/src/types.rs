//! Data contracts exchanged with the operadoras backend.
//!
//! # Design
//! These types mirror the backend's JSON shapes field for field and carry no
//! behavior beyond the pagination helpers. They are defined independently from
//! the mock-server crate; integration tests catch schema drift between the two.
//! Optional fields are `Option` so callers must handle absence explicitly.

use serde::{Deserialize, Serialize};

/// A health-insurance operator, keyed by CNPJ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Operadora {
    pub cnpj: String,
    pub razao_social: String,
    #[serde(default)]
    pub registro_ans: Option<String>,
    #[serde(default)]
    pub modalidade: Option<String>,
    pub uf: String,
}

/// One quarter of expenses for a single operadora.
///
/// `valor_despesa` is the value isolated to the quarter; `valor_ytd` is the
/// cumulative year-to-date figure when the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Despesa {
    pub trimestre: u8,
    pub ano: i32,
    pub valor_despesa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_ytd: Option<f64>,
}

/// Generic pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// `ceil(total / limit)`, or 0 when `limit` is 0.
    pub fn expected_total_pages(total: u64, limit: u32) -> u64 {
        if limit == 0 {
            return 0;
        }
        total.div_ceil(u64::from(limit))
    }

    /// Whether `total_pages` and the page length agree with `total` and `limit`.
    ///
    /// The client never enforces this; it is here for callers that want to.
    pub fn is_consistent(&self) -> bool {
        self.total_pages == Self::expected_total_pages(self.total, self.limit)
            && self.data.len() as u64 <= u64::from(self.limit)
    }
}

/// Identity of the operadora an expense history belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperadoraResumo {
    pub cnpj: String,
    pub razao_social: String,
}

/// Paginated expense history of one operadora.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DespesasResponse {
    #[serde(flatten)]
    pub pagination: PaginatedResponse<Despesa>,
    pub operadora: OperadoraResumo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DespesaPorUF {
    pub uf: String,
    pub total: f64,
    pub media_trimestral: f64,
    pub qtd_operadoras: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopOperadora {
    pub cnpj: String,
    pub razao_social: String,
    pub uf: String,
    pub total_despesas: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumoEstatisticas {
    pub total_despesas: f64,
    pub media_despesas: f64,
    pub total_registros: u64,
}

/// Global dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Estatisticas {
    pub resumo: ResumoEstatisticas,
    pub top_5_operadoras: Vec<TopOperadora>,
    pub despesas_por_uf: Vec<DespesaPorUF>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperadoraCrescimento {
    pub cnpj: String,
    pub razao_social: String,
    pub despesa_inicial: f64,
    pub despesa_final: f64,
    pub crescimento_percentual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UFDistribuicao {
    pub uf: String,
    pub qtd_operadoras: u64,
    pub total_despesas: f64,
    pub media_por_registro: f64,
    pub media_por_operadora: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperadorasAcimaMedia {
    pub total: u64,
    pub media_geral_referencia: f64,
    pub criterio: String,
}

/// Secondary statistics derived from quarter-isolated expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstatisticasComplementares {
    pub top_5_crescimento: Vec<OperadoraCrescimento>,
    pub top_5_uf: Vec<UFDistribuicao>,
    pub operadoras_acima_media: OperadorasAcimaMedia,
}

/// Query parameters for listing operadoras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOperadoras {
    pub page: u32,
    pub limit: u32,
    /// Sent only when non-empty.
    pub search: String,
}

impl Default for ListOperadoras {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
        }
    }
}

/// Page selection for paginated sub-resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}
