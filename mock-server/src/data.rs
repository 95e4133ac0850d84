//! In-memory dataset and the aggregations behind the statistics routes.
//!
//! Expenses are stored the way the ANS publishes them: year-to-date totals per
//! quarter. Every report works on quarter-isolated values, obtained by
//! subtracting the previous quarter of the same year.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

pub const CRITERIO_ACIMA_MEDIA: &str =
    "Despesas acima da média geral em pelo menos 2 dos 3 trimestres";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OperadoraRecord {
    pub cnpj: String,
    pub razao_social: String,
    pub registro_ans: Option<String>,
    pub modalidade: Option<String>,
    pub uf: String,
}

/// One cumulative (YTD) expense figure as loaded from the source files.
#[derive(Clone, Debug)]
pub struct DespesaRecord {
    pub cnpj: String,
    pub ano: i32,
    pub trimestre: u8,
    pub valor_ytd: f64,
}

/// A quarter with both its cumulative and isolated value.
#[derive(Clone, Debug, PartialEq)]
pub struct QuarterValue {
    pub cnpj: String,
    pub ano: i32,
    pub trimestre: u8,
    pub valor_ytd: f64,
    pub valor_isolado: f64,
}

impl QuarterValue {
    fn period(&self) -> i32 {
        self.ano * 10 + i32::from(self.trimestre)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Resumo {
    pub total_despesas: f64,
    pub media_despesas: f64,
    pub total_registros: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TopOperadora {
    pub cnpj: String,
    pub razao_social: String,
    pub uf: String,
    pub total_despesas: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DespesaPorUf {
    pub uf: String,
    pub total: f64,
    pub media_trimestral: f64,
    pub qtd_operadoras: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Estatisticas {
    pub resumo: Resumo,
    pub top_5_operadoras: Vec<TopOperadora>,
    pub despesas_por_uf: Vec<DespesaPorUf>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Crescimento {
    pub cnpj: String,
    pub razao_social: String,
    pub despesa_inicial: f64,
    pub despesa_final: f64,
    pub crescimento_percentual: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UfDistribuicao {
    pub uf: String,
    pub qtd_operadoras: u64,
    pub total_despesas: f64,
    pub media_por_registro: f64,
    pub media_por_operadora: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AcimaMedia {
    pub total: u64,
    pub media_geral_referencia: f64,
    pub criterio: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EstatisticasComplementares {
    pub top_5_crescimento: Vec<Crescimento>,
    pub top_5_uf: Vec<UfDistribuicao>,
    pub operadoras_acima_media: AcimaMedia,
}

/// Per-operadora totals over isolated quarter values.
struct Agregado<'a> {
    operadora: &'a OperadoraRecord,
    total_despesas: f64,
    media_trimestral: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub operadoras: Vec<OperadoraRecord>,
    pub despesas: Vec<DespesaRecord>,
}

impl Dataset {
    pub fn new(operadoras: Vec<OperadoraRecord>, despesas: Vec<DespesaRecord>) -> Self {
        Self {
            operadoras,
            despesas,
        }
    }

    pub fn find(&self, cnpj: &str) -> Option<&OperadoraRecord> {
        self.operadoras.iter().find(|op| op.cnpj == cnpj)
    }

    /// Case-insensitive substring match on `razao_social` or `cnpj`; an empty
    /// term matches everything.
    pub fn search(&self, term: &str) -> Vec<&OperadoraRecord> {
        if term.is_empty() {
            return self.operadoras.iter().collect();
        }
        let needle = term.to_lowercase();
        self.operadoras
            .iter()
            .filter(|op| {
                op.razao_social.to_lowercase().contains(&needle)
                    || op.cnpj.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Every quarter with its isolated value, ordered by cnpj, year, quarter.
    pub fn quarter_values(&self) -> Vec<QuarterValue> {
        let mut rows: Vec<&DespesaRecord> = self.despesas.iter().collect();
        rows.sort_by(|a, b| (&a.cnpj, a.ano, a.trimestre).cmp(&(&b.cnpj, b.ano, b.trimestre)));

        let mut out = Vec::with_capacity(rows.len());
        let mut previous: Option<&DespesaRecord> = None;
        for row in rows {
            let prior_ytd = previous
                .filter(|p| p.cnpj == row.cnpj && p.ano == row.ano)
                .map_or(0.0, |p| p.valor_ytd);
            out.push(QuarterValue {
                cnpj: row.cnpj.clone(),
                ano: row.ano,
                trimestre: row.trimestre,
                valor_ytd: row.valor_ytd,
                valor_isolado: row.valor_ytd - prior_ytd,
            });
            previous = Some(row);
        }
        out
    }

    /// Expense history of one operadora, newest quarter first.
    pub fn despesas_of(&self, cnpj: &str) -> Vec<QuarterValue> {
        let mut rows: Vec<QuarterValue> = self
            .quarter_values()
            .into_iter()
            .filter(|q| q.cnpj == cnpj)
            .collect();
        rows.sort_by(|a, b| (b.ano, b.trimestre).cmp(&(a.ano, a.trimestre)));
        rows
    }

    fn agregados(&self) -> Vec<Agregado<'_>> {
        let mut by_cnpj: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for q in self.quarter_values() {
            by_cnpj.entry(q.cnpj).or_default().push(q.valor_isolado);
        }
        by_cnpj
            .into_iter()
            .filter_map(|(cnpj, values)| {
                let operadora = self.find(&cnpj)?;
                let total_despesas: f64 = values.iter().sum();
                Some(Agregado {
                    operadora,
                    total_despesas,
                    media_trimestral: total_despesas / values.len() as f64,
                })
            })
            .collect()
    }

    pub fn estatisticas(&self) -> Estatisticas {
        let agregados = self.agregados();

        let resumo = Resumo {
            total_despesas: agregados.iter().map(|a| a.total_despesas).sum(),
            media_despesas: round2(
                mean(agregados.iter().map(|a| a.media_trimestral)).unwrap_or(0.0),
            ),
            total_registros: agregados.len() as u64,
        };

        let mut top: Vec<TopOperadora> = agregados
            .iter()
            .map(|a| TopOperadora {
                cnpj: a.operadora.cnpj.clone(),
                razao_social: a.operadora.razao_social.clone(),
                uf: a.operadora.uf.clone(),
                total_despesas: a.total_despesas,
            })
            .collect();
        top.sort_by(|a, b| b.total_despesas.total_cmp(&a.total_despesas));
        top.truncate(5);

        let mut by_uf: BTreeMap<&str, Vec<&Agregado<'_>>> = BTreeMap::new();
        for a in &agregados {
            by_uf.entry(a.operadora.uf.as_str()).or_default().push(a);
        }
        let mut despesas_por_uf: Vec<DespesaPorUf> = by_uf
            .into_iter()
            .map(|(uf, rows)| DespesaPorUf {
                uf: uf.to_string(),
                total: rows.iter().map(|a| a.total_despesas).sum(),
                media_trimestral: mean(rows.iter().map(|a| a.media_trimestral)).unwrap_or(0.0),
                qtd_operadoras: rows.len() as u64,
            })
            .collect();
        despesas_por_uf.sort_by(|a, b| b.total.total_cmp(&a.total));

        Estatisticas {
            resumo,
            top_5_operadoras: top,
            despesas_por_uf,
        }
    }

    pub fn estatisticas_complementares(&self) -> EstatisticasComplementares {
        let quarters = self.quarter_values();
        EstatisticasComplementares {
            top_5_crescimento: self.top_crescimento(&quarters),
            top_5_uf: self.top_uf(&quarters),
            operadoras_acima_media: acima_media(&quarters),
        }
    }

    /// Growth between the first and last period present anywhere in the data.
    fn top_crescimento(&self, quarters: &[QuarterValue]) -> Vec<Crescimento> {
        let (Some(first), Some(last)) = (
            quarters.iter().map(QuarterValue::period).min(),
            quarters.iter().map(QuarterValue::period).max(),
        ) else {
            return Vec::new();
        };

        let at = |period: i32| {
            quarters
                .iter()
                .filter(|q| q.period() == period)
                .map(|q| (q.cnpj.as_str(), q.valor_isolado))
                .collect::<HashMap<_, _>>()
        };
        let iniciais = at(first);
        let finais = at(last);

        let mut out: Vec<Crescimento> = iniciais
            .iter()
            .filter(|(_, inicial)| **inicial > 0.0)
            .filter_map(|(cnpj, inicial)| {
                let final_ = *finais.get(cnpj)?;
                let operadora = self.find(cnpj)?;
                Some(Crescimento {
                    cnpj: operadora.cnpj.clone(),
                    razao_social: operadora.razao_social.clone(),
                    despesa_inicial: *inicial,
                    despesa_final: final_,
                    crescimento_percentual: round2((final_ - inicial) / inicial * 100.0),
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.crescimento_percentual
                .total_cmp(&a.crescimento_percentual)
                .then_with(|| a.cnpj.cmp(&b.cnpj))
        });
        out.truncate(5);
        out
    }

    fn top_uf(&self, quarters: &[QuarterValue]) -> Vec<UfDistribuicao> {
        let mut by_uf: BTreeMap<&str, (BTreeSet<&str>, Vec<f64>)> = BTreeMap::new();
        for q in quarters.iter().filter(|q| q.valor_isolado > 0.0) {
            let Some(operadora) = self.find(&q.cnpj) else {
                continue;
            };
            let entry = by_uf.entry(operadora.uf.as_str()).or_default();
            entry.0.insert(operadora.cnpj.as_str());
            entry.1.push(q.valor_isolado);
        }

        let mut out: Vec<UfDistribuicao> = by_uf
            .into_iter()
            .map(|(uf, (operadoras, values))| {
                let total: f64 = values.iter().sum();
                UfDistribuicao {
                    uf: uf.to_string(),
                    qtd_operadoras: operadoras.len() as u64,
                    total_despesas: total,
                    media_por_registro: round2(total / values.len() as f64),
                    media_por_operadora: round2(total / operadoras.len() as f64),
                }
            })
            .collect();
        out.sort_by(|a, b| b.total_despesas.total_cmp(&a.total_despesas));
        out.truncate(5);
        out
    }

    /// Seed data: five operadoras with three quarters of 2024 and one without
    /// any expenses.
    pub fn sample() -> Self {
        type Seed<'a> = (&'a str, &'a str, Option<&'a str>, Option<&'a str>, &'a str);
        let seeds: [Seed<'_>; 6] = [
            (
                "11111111000111",
                "Saude Paulista SA",
                Some("300001"),
                Some("Medicina de Grupo"),
                "SP",
            ),
            (
                "22222222000122",
                "Unimed Rio Cooperativa",
                Some("300002"),
                Some("Cooperativa Médica"),
                "RJ",
            ),
            (
                "33333333000133",
                "Odonto Minas Ltda",
                Some("300003"),
                Some("Odontologia de Grupo"),
                "MG",
            ),
            ("44444444000144", "Vida Gaucha Seguros", None, None, "RS"),
            (
                "55555555000155",
                "Paulista Odonto",
                Some("300005"),
                Some("Odontologia de Grupo"),
                "SP",
            ),
            (
                "66666666000166",
                "Sem Despesas Ltda",
                Some("300006"),
                Some("Autogestão"),
                "RJ",
            ),
        ];
        let operadoras = seeds
            .iter()
            .map(|(cnpj, razao, reg, modal, uf)| OperadoraRecord {
                cnpj: (*cnpj).to_string(),
                razao_social: (*razao).to_string(),
                registro_ans: reg.map(str::to_string),
                modalidade: modal.map(str::to_string),
                uf: (*uf).to_string(),
            })
            .collect();

        let ytd: [(&str, [f64; 3]); 5] = [
            ("11111111000111", [100.0, 250.0, 450.0]),
            ("22222222000122", [200.0, 380.0, 540.0]),
            ("33333333000133", [50.0, 110.0, 180.0]),
            ("44444444000144", [80.0, 160.0, 200.0]),
            ("55555555000155", [30.0, 90.0, 120.0]),
        ];
        let despesas = ytd
            .iter()
            .flat_map(|(cnpj, values)| {
                values.iter().zip(1u8..).map(move |(valor, trimestre)| DespesaRecord {
                    cnpj: (*cnpj).to_string(),
                    ano: 2024,
                    trimestre,
                    valor_ytd: *valor,
                })
            })
            .collect();

        Self::new(operadoras, despesas)
    }
}

fn acima_media(quarters: &[QuarterValue]) -> AcimaMedia {
    let media = mean(
        quarters
            .iter()
            .filter(|q| q.valor_isolado > 0.0)
            .map(|q| q.valor_isolado),
    );

    let total = media.map_or(0, |media| {
        let mut acima: HashMap<&str, u32> = HashMap::new();
        for q in quarters.iter().filter(|q| q.valor_isolado > media) {
            *acima.entry(q.cnpj.as_str()).or_default() += 1;
        }
        acima.values().filter(|count| **count >= 2).count() as u64
    });

    AcimaMedia {
        total,
        media_geral_referencia: media.unwrap_or(0.0),
        criterio: CRITERIO_ACIMA_MEDIA.to_string(),
    }
}
