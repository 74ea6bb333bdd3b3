use crate::app::calculators::inss::contribuicao_progressiva;
use crate::app::calculators::irrf::{calcular_irrf, IrrfInput};
use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::{round2, round_to};
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalidadePensao {
    PercentualRendimento,
    SalariosMinimos,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensaoInput {
    pub modalidade: ModalidadePensao,
    #[serde(default)]
    pub rendimento_bruto: Option<f64>,
    /// Legal deductions; INSS and IRRF are computed from the tables when absent.
    #[serde(default)]
    pub descontos_legais: Option<f64>,
    #[serde(default)]
    pub percentual: Option<f64>,
    #[serde(default)]
    pub quantidade_salarios: Option<f64>,
    #[serde(default = "default_true")]
    pub incide_decimo_terceiro: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensaoOutput {
    pub base_calculo: f64,
    pub descontos_legais: f64,
    pub valor_mensal: f64,
    pub valor_decimo_terceiro: f64,
    pub total_anual: f64,
    /// Share of the gross income, when one was given.
    pub percentual_rendimento_bruto: Option<f64>,
}

impl Validate for PensaoInput {
    fn validate(&self) -> Result<()> {
        match self.modalidade {
            ModalidadePensao::PercentualRendimento => {
                let rendimento = self.rendimento_bruto.ok_or_else(|| JurisError::MissingFieldError {
                    field: "rendimentoBruto".to_string(),
                })?;
                validate_non_negative("rendimentoBruto", rendimento)?;
                let percentual = self.percentual.ok_or_else(|| JurisError::MissingFieldError {
                    field: "percentual".to_string(),
                })?;
                validate_range("percentual", percentual, 0.0, 100.0)?;
            }
            ModalidadePensao::SalariosMinimos => {
                let quantidade =
                    self.quantidade_salarios.ok_or_else(|| JurisError::MissingFieldError {
                        field: "quantidadeSalarios".to_string(),
                    })?;
                validate_non_negative("quantidadeSalarios", quantidade)?;
            }
        }
        if let Some(descontos) = self.descontos_legais {
            validate_non_negative("descontosLegais", descontos)?;
        }
        Ok(())
    }
}

/// 法定扣除：社保與所得稅（依費率表計算）
fn descontos_de(rendimento: f64, tables: &RateTables) -> f64 {
    let inss = contribuicao_progressiva(rendimento, &tables.inss).contribuicao_total;
    let irrf = calcular_irrf(
        &IrrfInput {
            rendimento_bruto: rendimento,
            contribuicao_inss: Some(inss),
            dependentes: 0,
            pensao_alimenticia: 0.0,
            permitir_desconto_simplificado: true,
        },
        tables,
    )
    .imposto;
    round2(inss + irrf)
}

pub fn calcular_pensao(input: &PensaoInput, tables: &RateTables) -> Result<PensaoOutput> {
    let (base_calculo, descontos_legais, valor_mensal) = match input.modalidade {
        ModalidadePensao::PercentualRendimento => {
            let (Some(rendimento), Some(percentual)) = (input.rendimento_bruto, input.percentual)
            else {
                return Err(JurisError::MissingFieldError {
                    field: "rendimentoBruto/percentual".to_string(),
                });
            };
            let descontos = input
                .descontos_legais
                .unwrap_or_else(|| descontos_de(rendimento, tables));
            let base = round2((rendimento - descontos).max(0.0));
            (base, descontos, round2(base * percentual / 100.0))
        }
        ModalidadePensao::SalariosMinimos => {
            let quantidade = input.quantidade_salarios.unwrap_or(0.0);
            (
                tables.salario_minimo,
                0.0,
                round2(quantidade * tables.salario_minimo),
            )
        }
    };

    let valor_decimo_terceiro = if input.incide_decimo_terceiro {
        valor_mensal
    } else {
        0.0
    };
    let percentual_rendimento_bruto = input
        .rendimento_bruto
        .filter(|r| *r > 0.0)
        .map(|r| round_to(valor_mensal / r * 100.0, 2));

    Ok(PensaoOutput {
        base_calculo,
        descontos_legais,
        valor_mensal,
        valor_decimo_terceiro,
        total_anual: round2(valor_mensal * 12.0 + valor_decimo_terceiro),
        percentual_rendimento_bruto,
    })
}

pub struct PensaoCalculator;

impl Calculator for PensaoCalculator {
    type Input = PensaoInput;
    type Output = PensaoOutput;

    fn name(&self) -> &'static str {
        "pensao_alimenticia"
    }

    fn calculate(&self, input: &PensaoInput, tables: &RateTables) -> Result<PensaoOutput> {
        calcular_pensao(input, tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentual(descontos: Option<f64>) -> PensaoInput {
        PensaoInput {
            modalidade: ModalidadePensao::PercentualRendimento,
            rendimento_bruto: Some(5000.0),
            descontos_legais: descontos,
            percentual: Some(30.0),
            quantidade_salarios: None,
            incide_decimo_terceiro: true,
        }
    }

    #[test]
    fn test_percentage_of_net_income() {
        let out = calcular_pensao(&percentual(Some(853.97)), &RateTables::default()).unwrap();
        assert_eq!(out.base_calculo, 4146.03);
        assert_eq!(out.valor_mensal, 1243.81);
        assert_eq!(out.total_anual, 16169.53);
    }

    #[test]
    fn test_deductions_computed_from_tables() {
        // INSS 518,82 + IRRF 335,15
        let out = calcular_pensao(&percentual(None), &RateTables::default()).unwrap();
        assert_eq!(out.descontos_legais, 853.97);
        assert_eq!(out.valor_mensal, 1243.81);
    }

    #[test]
    fn test_minimum_wage_multiple() {
        let input = PensaoInput {
            modalidade: ModalidadePensao::SalariosMinimos,
            rendimento_bruto: None,
            descontos_legais: None,
            percentual: None,
            quantidade_salarios: Some(1.5),
            incide_decimo_terceiro: false,
        };
        let out = calcular_pensao(&input, &RateTables::default()).unwrap();
        assert_eq!(out.valor_mensal, 2118.0);
        assert_eq!(out.valor_decimo_terceiro, 0.0);
        assert_eq!(out.total_anual, 25416.0);
        assert_eq!(out.percentual_rendimento_bruto, None);
    }

    #[test]
    fn test_percentage_requires_income() {
        let mut input = percentual(None);
        input.rendimento_bruto = None;
        assert!(input.validate().is_err());
    }
}
