use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sexo {
    Masculino,
    Feminino,
}

impl Sexo {
    /// Years of contribution after which each extra year adds 2% (EC 103/2019 art. 26).
    pub fn anos_sem_acrescimo(self) -> u32 {
        match self {
            Sexo::Masculino => 20,
            Sexo::Feminino => 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficioInput {
    pub salarios_contribuicao: Vec<f64>,
    pub sexo: Sexo,
    pub anos_contribuicao: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficioOutput {
    pub salario_beneficio: f64,
    pub anos_excedentes: u32,
    pub coeficiente: f64,
    pub valor_calculado: f64,
    pub renda_mensal_inicial: f64,
    pub limitado_teto: bool,
    pub elevado_minimo: bool,
}

impl Validate for BeneficioInput {
    fn validate(&self) -> Result<()> {
        if self.salarios_contribuicao.is_empty() {
            return Err(JurisError::MissingFieldError {
                field: "salariosContribuicao".to_string(),
            });
        }
        for salario in &self.salarios_contribuicao {
            validate_non_negative("salariosContribuicao", *salario)?;
        }
        Ok(())
    }
}

/// 平均投保薪資（每筆先受投保上限限制）× 係數，結果介於最低工資與上限之間
pub fn calcular_beneficio(input: &BeneficioInput, tables: &RateTables) -> BeneficioOutput {
    let teto = tables.teto_inss();
    let soma: f64 = input
        .salarios_contribuicao
        .iter()
        .map(|s| s.min(teto))
        .sum();
    let salario_beneficio = round2(soma / input.salarios_contribuicao.len() as f64);

    let anos_excedentes = input
        .anos_contribuicao
        .saturating_sub(input.sexo.anos_sem_acrescimo());
    let coeficiente = 60.0 + 2.0 * f64::from(anos_excedentes);
    let valor_calculado = round2(salario_beneficio * coeficiente / 100.0);

    let limitado_teto = valor_calculado > teto;
    let elevado_minimo = valor_calculado < tables.salario_minimo;
    let renda_mensal_inicial = valor_calculado.clamp(tables.salario_minimo, teto.max(tables.salario_minimo));

    BeneficioOutput {
        salario_beneficio,
        anos_excedentes,
        coeficiente,
        valor_calculado,
        renda_mensal_inicial,
        limitado_teto,
        elevado_minimo,
    }
}

pub struct BeneficioCalculator;

impl Calculator for BeneficioCalculator {
    type Input = BeneficioInput;
    type Output = BeneficioOutput;

    fn name(&self) -> &'static str {
        "beneficio_previdenciario"
    }

    fn calculate(&self, input: &BeneficioInput, tables: &RateTables) -> Result<BeneficioOutput> {
        Ok(calcular_beneficio(input, tables))
    }
}
