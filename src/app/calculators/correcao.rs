//! Correção monetária por índice mensal e juros simples ou compostos.

use crate::config::rates::RateTables;
use crate::core::calendar::{add_months, format_competencia, parse_competencia};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::{round2, round_to};
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoJuros {
    #[default]
    Simples,
    Compostos,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndiceMensal {
    pub competencia: String,
    /// Monthly variation in percent (0.42 = 0,42%).
    pub percentual: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurosMora {
    /// Monthly rate in percent.
    pub taxa_mensal: f64,
    #[serde(default)]
    pub tipo: TipoJuros,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrecaoInput {
    pub valor_original: f64,
    /// First month corrected ("YYYY-MM").
    pub competencia_inicial: String,
    /// Month of the update; its own index is not applied.
    pub competencia_final: String,
    #[serde(default)]
    pub indice: Option<String>,
    #[serde(default)]
    pub indices: Vec<IndiceMensal>,
    #[serde(default)]
    pub juros: Option<JurosMora>,
    #[serde(default)]
    pub multa_percentual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoCorrecao {
    pub competencia: String,
    pub percentual: f64,
    pub fator_acumulado: f64,
    pub valor_corrigido: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrecaoOutput {
    pub indice: Option<String>,
    pub meses: u32,
    pub fator_acumulado: f64,
    pub percentual_acumulado: f64,
    pub valor_original: f64,
    pub valor_corrigido: f64,
    pub correcao: f64,
    pub juros: f64,
    pub multa: f64,
    pub total: f64,
    /// Months without an index in the table, counted as 0%.
    pub indices_ausentes: Vec<String>,
    pub periodos: Vec<PeriodoCorrecao>,
}

impl Validate for CorrecaoInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("valorOriginal", self.valor_original)?;
        let inicial = parse_competencia(&self.competencia_inicial)?;
        let final_ = parse_competencia(&self.competencia_final)?;
        if final_ < inicial {
            return Err(JurisError::invalid(
                "competenciaFinal",
                &self.competencia_final,
                "Final month cannot precede the initial month",
            ));
        }
        for indice in &self.indices {
            parse_competencia(&indice.competencia)?;
            if !indice.percentual.is_finite() || indice.percentual <= -100.0 {
                return Err(JurisError::invalid(
                    "indices",
                    indice.percentual,
                    "Monthly variation must be a finite value above -100%",
                ));
            }
        }
        if let Some(juros) = &self.juros {
            validate_non_negative("juros.taxaMensal", juros.taxa_mensal)?;
        }
        validate_non_negative("multaPercentual", self.multa_percentual)
    }
}

/// Months in `[inicial, final)`.
fn competencias(inicial: &str, final_: &str) -> Result<Vec<NaiveDate>> {
    let inicio = parse_competencia(inicial)?;
    let fim = parse_competencia(final_)?;
    let mut meses = Vec::new();
    let mut cursor = inicio;
    while cursor < fim {
        meses.push(cursor);
        cursor = add_months(cursor, 1)?;
    }
    Ok(meses)
}

pub fn juros_sobre(valor: f64, taxa_mensal: f64, meses: u32, tipo: TipoJuros) -> f64 {
    let taxa = taxa_mensal / 100.0;
    match tipo {
        TipoJuros::Simples => valor * taxa * f64::from(meses),
        TipoJuros::Compostos => valor * ((1.0 + taxa).powf(f64::from(meses)) - 1.0),
    }
}

pub fn calcular_correcao(input: &CorrecaoInput) -> Result<CorrecaoOutput> {
    // 以日期為鍵，"2024-1" 與 "2024-01" 視為同一個月
    let tabela: HashMap<NaiveDate, f64> = input
        .indices
        .iter()
        .map(|i| Ok((parse_competencia(&i.competencia)?, i.percentual)))
        .collect::<Result<_>>()?;

    let mut fator = 1.0;
    let mut periodos = Vec::new();
    let mut indices_ausentes = Vec::new();
    for mes in competencias(&input.competencia_inicial, &input.competencia_final)? {
        let competencia = format_competencia(mes);
        let percentual = match tabela.get(&mes) {
            Some(p) => *p,
            None => {
                indices_ausentes.push(competencia.clone());
                0.0
            }
        };
        fator *= 1.0 + percentual / 100.0;
        periodos.push(PeriodoCorrecao {
            competencia,
            percentual,
            fator_acumulado: round_to(fator, 6),
            valor_corrigido: round2(input.valor_original * fator),
        });
    }
    if !indices_ausentes.is_empty() {
        warn!(
            "⚠️ {} months without index, counted as 0%: {}",
            indices_ausentes.len(),
            indices_ausentes.join(", ")
        );
    }

    let meses = periodos.len() as u32;
    let valor_corrigido = round2(input.valor_original * fator);
    let juros = match &input.juros {
        Some(j) => round2(juros_sobre(valor_corrigido, j.taxa_mensal, meses, j.tipo)),
        None => 0.0,
    };
    let multa = round2((valor_corrigido + juros) * input.multa_percentual / 100.0);

    Ok(CorrecaoOutput {
        indice: input.indice.clone(),
        meses,
        fator_acumulado: round_to(fator, 6),
        percentual_acumulado: round_to((fator - 1.0) * 100.0, 4),
        valor_original: input.valor_original,
        valor_corrigido,
        correcao: round2(valor_corrigido - input.valor_original),
        juros,
        multa,
        total: round2(valor_corrigido + juros + multa),
        indices_ausentes,
        periodos,
    })
}

pub struct CorrecaoMonetariaCalculator;

impl Calculator for CorrecaoMonetariaCalculator {
    type Input = CorrecaoInput;
    type Output = CorrecaoOutput;

    fn name(&self) -> &'static str {
        "correcao_monetaria"
    }

    fn calculate(&self, input: &CorrecaoInput, _tables: &RateTables) -> Result<CorrecaoOutput> {
        calcular_correcao(input)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurosInput {
    pub valor_principal: f64,
    /// Monthly rate in percent.
    pub taxa_mensal: f64,
    pub meses: u32,
    #[serde(default)]
    pub tipo: TipoJuros,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoJuros {
    pub mes: u32,
    pub juros_mes: f64,
    pub juros_acumulados: f64,
    pub saldo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurosOutput {
    pub valor_principal: f64,
    pub taxa_mensal: f64,
    pub meses: u32,
    pub tipo: TipoJuros,
    pub juros: f64,
    pub montante: f64,
    pub periodos: Vec<PeriodoJuros>,
}

impl Validate for JurosInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("valorPrincipal", self.valor_principal)?;
        validate_non_negative("taxaMensal", self.taxa_mensal)?;
        validate_range("meses", self.meses, 1, 1200)
    }
}

pub fn calcular_juros(input: &JurosInput) -> JurosOutput {
    let taxa = input.taxa_mensal / 100.0;
    let mut saldo = input.valor_principal;
    let mut acumulados = 0.0;
    let periodos = (1..=input.meses)
        .map(|mes| {
            let juros_mes = match input.tipo {
                TipoJuros::Simples => input.valor_principal * taxa,
                TipoJuros::Compostos => saldo * taxa,
            };
            acumulados += juros_mes;
            saldo += juros_mes;
            PeriodoJuros {
                mes,
                juros_mes: round2(juros_mes),
                juros_acumulados: round2(acumulados),
                saldo: round2(saldo),
            }
        })
        .collect();

    JurosOutput {
        valor_principal: input.valor_principal,
        taxa_mensal: input.taxa_mensal,
        meses: input.meses,
        tipo: input.tipo,
        juros: round2(acumulados),
        montante: round2(saldo),
        periodos,
    }
}

pub struct JurosCalculator;

impl Calculator for JurosCalculator {
    type Input = JurosInput;
    type Output = JurosOutput;

    fn name(&self) -> &'static str {
        "juros"
    }

    fn calculate(&self, input: &JurosInput, _tables: &RateTables) -> Result<JurosOutput> {
        Ok(calcular_juros(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correcao() -> CorrecaoInput {
        CorrecaoInput {
            valor_original: 1000.0,
            competencia_inicial: "2024-01".to_string(),
            competencia_final: "2024-04".to_string(),
            indice: Some("IPCA-E".to_string()),
            indices: vec![
                IndiceMensal {
                    competencia: "2024-01".to_string(),
                    percentual: 0.5,
                },
                IndiceMensal {
                    competencia: "2024-02".to_string(),
                    percentual: 1.0,
                },
            ],
            juros: None,
            multa_percentual: 0.0,
        }
    }

    #[test]
    fn test_accumulated_factor_and_missing_months() {
        let out = calcular_correcao(&correcao()).unwrap();
        assert_eq!(out.meses, 3);
        assert_eq!(out.fator_acumulado, 1.01505);
        assert_eq!(out.valor_corrigido, 1015.05);
        assert_eq!(out.correcao, 15.05);
        assert_eq!(out.indices_ausentes, vec!["2024-03".to_string()]);
        assert_eq!(out.periodos[2].percentual, 0.0);
    }

    #[test]
    fn test_interest_and_fine() {
        let mut input = correcao();
        input.juros = Some(JurosMora {
            taxa_mensal: 1.0,
            tipo: TipoJuros::Simples,
        });
        input.multa_percentual = 10.0;
        let out = calcular_correcao(&input).unwrap();
        assert_eq!(out.juros, 30.45);
        assert_eq!(out.multa, 104.55);
        assert_eq!(out.total, 1150.05);
    }

    #[test]
    fn test_unpadded_month_matches_its_index() {
        let mut input = correcao();
        input.competencia_final = "2024-02".to_string();
        input.indices = vec![IndiceMensal {
            competencia: "2024-1".to_string(),
            percentual: 1.0,
        }];
        assert!(input.validate().is_ok());

        let out = calcular_correcao(&input).unwrap();
        assert_eq!(out.valor_corrigido, 1010.0);
        assert!(out.indices_ausentes.is_empty());
        assert_eq!(out.periodos[0].competencia, "2024-01");
    }

    #[test]
    fn test_same_month_has_no_correction() {
        let mut input = correcao();
        input.competencia_final = "2024-01".to_string();
        let out = calcular_correcao(&input).unwrap();
        assert_eq!(out.meses, 0);
        assert_eq!(out.valor_corrigido, 1000.0);
    }

    #[test]
    fn test_final_before_initial_is_rejected() {
        let mut input = correcao();
        input.competencia_final = "2023-12".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_simple_interest() {
        let out = calcular_juros(&JurosInput {
            valor_principal: 1000.0,
            taxa_mensal: 1.0,
            meses: 12,
            tipo: TipoJuros::Simples,
        });
        assert_eq!(out.juros, 120.0);
        assert_eq!(out.montante, 1120.0);
        assert_eq!(out.periodos.len(), 12);
        assert_eq!(out.periodos[0].juros_mes, 10.0);
    }

    #[test]
    fn test_compound_interest() {
        let out = calcular_juros(&JurosInput {
            valor_principal: 1000.0,
            taxa_mensal: 1.0,
            meses: 12,
            tipo: TipoJuros::Compostos,
        });
        assert_eq!(out.montante, 1126.83);
        assert_eq!(out.juros, 126.83);
        assert_eq!(out.periodos[1].juros_mes, 10.1);
    }
}
