use crate::config::rates::{RateTables, SeguroDesempregoTable};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_solicitacao() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeguroDesempregoInput {
    /// Last (up to three) monthly salaries before the dismissal.
    pub ultimos_salarios: Vec<f64>,
    /// Months worked in the last 36 months.
    pub meses_trabalhados: u32,
    #[serde(default = "default_solicitacao")]
    pub numero_solicitacao: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeguroDesempregoOutput {
    pub elegivel: bool,
    pub carencia_meses: u32,
    pub salario_medio: f64,
    pub valor_parcela: f64,
    pub parcelas: u32,
    pub total: f64,
}

impl Validate for SeguroDesempregoInput {
    fn validate(&self) -> Result<()> {
        if self.ultimos_salarios.is_empty() || self.ultimos_salarios.len() > 3 {
            return Err(JurisError::invalid(
                "ultimosSalarios",
                self.ultimos_salarios.len(),
                "Provide between 1 and 3 salaries",
            ));
        }
        for salario in &self.ultimos_salarios {
            validate_non_negative("ultimosSalarios", *salario)?;
        }
        validate_positive_number("numeroSolicitacao", self.numero_solicitacao, 1)
    }
}

/// 依申請次數所需的最低工作月數（Lei 7.998/90 art. 3）
pub fn carencia(numero_solicitacao: u32) -> u32 {
    match numero_solicitacao {
        1 => 12,
        2 => 9,
        _ => 6,
    }
}

/// 給付期數；未達門檻回傳 0
pub fn numero_parcelas(numero_solicitacao: u32, meses: u32) -> u32 {
    if meses < carencia(numero_solicitacao) {
        return 0;
    }
    match meses {
        24.. => 5,
        12..=23 => 4,
        _ => 3,
    }
}

pub fn valor_parcela(salario_medio: f64, salario_minimo: f64, tabela: &SeguroDesempregoTable) -> f64 {
    let valor = if salario_medio <= tabela.limite_faixa1 {
        salario_medio * tabela.fator_faixa1
    } else if salario_medio <= tabela.limite_faixa2 {
        (salario_medio - tabela.limite_faixa1) * tabela.fator_faixa2 + tabela.parcela_fixa_faixa2
    } else {
        tabela.teto
    };
    round2(valor.max(salario_minimo).min(tabela.teto.max(salario_minimo)))
}

pub fn calcular_seguro_desemprego(
    input: &SeguroDesempregoInput,
    tables: &RateTables,
) -> SeguroDesempregoOutput {
    let salario_medio =
        round2(input.ultimos_salarios.iter().sum::<f64>() / input.ultimos_salarios.len() as f64);
    let parcelas = numero_parcelas(input.numero_solicitacao, input.meses_trabalhados);
    let elegivel = parcelas > 0;
    let valor = if elegivel {
        valor_parcela(salario_medio, tables.salario_minimo, &tables.seguro_desemprego)
    } else {
        0.0
    };
    debug!(
        "🧮 Seguro-desemprego: média {salario_medio}, {parcelas} parcelas de {valor}"
    );

    SeguroDesempregoOutput {
        elegivel,
        carencia_meses: carencia(input.numero_solicitacao),
        salario_medio,
        valor_parcela: valor,
        parcelas,
        total: round2(valor * f64::from(parcelas)),
    }
}

pub struct SeguroDesempregoCalculator;

impl Calculator for SeguroDesempregoCalculator {
    type Input = SeguroDesempregoInput;
    type Output = SeguroDesempregoOutput;

    fn name(&self) -> &'static str {
        "seguro_desemprego"
    }

    fn calculate(
        &self,
        input: &SeguroDesempregoInput,
        tables: &RateTables,
    ) -> Result<SeguroDesempregoOutput> {
        Ok(calcular_seguro_desemprego(input, tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(salarios: Vec<f64>, meses: u32, solicitacao: u32) -> SeguroDesempregoInput {
        SeguroDesempregoInput {
            ultimos_salarios: salarios,
            meses_trabalhados: meses,
            numero_solicitacao: solicitacao,
        }
    }

    #[test]
    fn test_first_band() {
        let out = calcular_seguro_desemprego(
            &input(vec![2000.0, 2000.0, 2000.0], 18, 1),
            &RateTables::default(),
        );
        assert!(out.elegivel);
        assert_eq!(out.valor_parcela, 1600.0);
        assert_eq!(out.parcelas, 4);
        assert_eq!(out.total, 6400.0);
    }

    #[test]
    fn test_second_band() {
        let out = calcular_seguro_desemprego(
            &input(vec![3000.0, 3000.0, 3000.0], 30, 1),
            &RateTables::default(),
        );
        // (3000 − 2041,39) × 0,5 + 1633,10
        assert_eq!(out.valor_parcela, 2112.41);
        assert_eq!(out.parcelas, 5);
    }

    #[test]
    fn test_ceiling_and_floor() {
        let tables = RateTables::default();
        let alto = calcular_seguro_desemprego(&input(vec![9000.0], 24, 1), &tables);
        assert_eq!(alto.valor_parcela, 2313.74);
        let baixo = calcular_seguro_desemprego(&input(vec![1500.0], 24, 1), &tables);
        assert_eq!(baixo.valor_parcela, 1412.0);
    }

    #[test]
    fn test_instalments_by_request_order() {
        assert_eq!(numero_parcelas(1, 11), 0);
        assert_eq!(numero_parcelas(1, 12), 4);
        assert_eq!(numero_parcelas(2, 9), 3);
        assert_eq!(numero_parcelas(2, 8), 0);
        assert_eq!(numero_parcelas(3, 6), 3);
        assert_eq!(numero_parcelas(3, 23), 4);
        assert_eq!(numero_parcelas(3, 24), 5);
    }

    #[test]
    fn test_not_eligible_pays_nothing() {
        let out = calcular_seguro_desemprego(&input(vec![2000.0], 6, 1), &RateTables::default());
        assert!(!out.elegivel);
        assert_eq!(out.total, 0.0);
    }

    #[test]
    fn test_requires_salaries() {
        assert!(input(vec![], 12, 1).validate().is_err());
        assert!(input(vec![1.0, 2.0, 3.0, 4.0], 12, 1).validate().is_err());
    }
}
