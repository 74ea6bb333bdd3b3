use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};

/// Grau de insalubridade (NR-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrauInsalubridade {
    Minimo,
    Medio,
    Maximo,
}

impl GrauInsalubridade {
    pub fn percentual(self) -> f64 {
        match self {
            GrauInsalubridade::Minimo => 10.0,
            GrauInsalubridade::Medio => 20.0,
            GrauInsalubridade::Maximo => 40.0,
        }
    }
}

fn default_meses() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsalubridadeInput {
    pub grau: GrauInsalubridade,
    /// Overrides the minimum wage as the base (collective agreements).
    #[serde(default)]
    pub base_calculo: Option<f64>,
    #[serde(default = "default_meses")]
    pub meses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsalubridadeOutput {
    pub base_calculo: f64,
    pub percentual: f64,
    pub valor_mensal: f64,
    pub meses: u32,
    pub total: f64,
}

impl Validate for InsalubridadeInput {
    fn validate(&self) -> Result<()> {
        if let Some(base) = self.base_calculo {
            validate_non_negative("baseCalculo", base)?;
        }
        Ok(())
    }
}

pub fn calcular_insalubridade(input: &InsalubridadeInput, tables: &RateTables) -> InsalubridadeOutput {
    let base_calculo = input.base_calculo.unwrap_or(tables.salario_minimo);
    let percentual = input.grau.percentual();
    let valor_mensal = round2(base_calculo * percentual / 100.0);
    InsalubridadeOutput {
        base_calculo,
        percentual,
        valor_mensal,
        meses: input.meses,
        total: round2(valor_mensal * f64::from(input.meses)),
    }
}

pub struct InsalubridadeCalculator;

impl Calculator for InsalubridadeCalculator {
    type Input = InsalubridadeInput;
    type Output = InsalubridadeOutput;

    fn name(&self) -> &'static str {
        "insalubridade"
    }

    fn calculate(&self, input: &InsalubridadeInput, tables: &RateTables) -> Result<InsalubridadeOutput> {
        Ok(calcular_insalubridade(input, tables))
    }
}

pub const PERCENTUAL_PERICULOSIDADE: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PericulosidadeInput {
    pub salario_base: f64,
    #[serde(default = "default_meses")]
    pub meses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PericulosidadeOutput {
    pub salario_base: f64,
    pub percentual: f64,
    pub valor_mensal: f64,
    pub meses: u32,
    pub total: f64,
}

impl Validate for PericulosidadeInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salarioBase", self.salario_base)
    }
}

/// 危險津貼：基本薪資的 30%（art. 193 §1 CLT），不含其他津貼
pub fn calcular_periculosidade(input: &PericulosidadeInput) -> PericulosidadeOutput {
    let valor_mensal = round2(input.salario_base * PERCENTUAL_PERICULOSIDADE / 100.0);
    PericulosidadeOutput {
        salario_base: input.salario_base,
        percentual: PERCENTUAL_PERICULOSIDADE,
        valor_mensal,
        meses: input.meses,
        total: round2(valor_mensal * f64::from(input.meses)),
    }
}

pub struct PericulosidadeCalculator;

impl Calculator for PericulosidadeCalculator {
    type Input = PericulosidadeInput;
    type Output = PericulosidadeOutput;

    fn name(&self) -> &'static str {
        "periculosidade"
    }

    fn calculate(&self, input: &PericulosidadeInput, _tables: &RateTables) -> Result<PericulosidadeOutput> {
        Ok(calcular_periculosidade(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insalubridade_uses_minimum_wage() {
        let out = calcular_insalubridade(
            &InsalubridadeInput {
                grau: GrauInsalubridade::Medio,
                base_calculo: None,
                meses: 12,
            },
            &RateTables::default(),
        );
        assert_eq!(out.base_calculo, 1412.0);
        assert_eq!(out.valor_mensal, 282.4);
        assert_eq!(out.total, 3388.8);
    }

    #[test]
    fn test_insalubridade_custom_base() {
        let out = calcular_insalubridade(
            &InsalubridadeInput {
                grau: GrauInsalubridade::Maximo,
                base_calculo: Some(2000.0),
                meses: 1,
            },
            &RateTables::default(),
        );
        assert_eq!(out.valor_mensal, 800.0);
    }

    #[test]
    fn test_grade_deserializes_from_snake_case() {
        let grau: GrauInsalubridade = serde_json::from_str("\"minimo\"").unwrap();
        assert_eq!(grau.percentual(), 10.0);
    }

    #[test]
    fn test_periculosidade() {
        let out = calcular_periculosidade(&PericulosidadeInput {
            salario_base: 3000.0,
            meses: 3,
        });
        assert_eq!(out.valor_mensal, 900.0);
        assert_eq!(out.total, 2700.0);
    }
}
