use crate::app::calculators::inss::contribuicao_progressiva;
use crate::config::rates::{IrrfTable, RateTables};
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrfInput {
    pub rendimento_bruto: f64,
    /// Computed from the INSS table when absent.
    #[serde(default)]
    pub contribuicao_inss: Option<f64>,
    #[serde(default)]
    pub dependentes: u32,
    #[serde(default)]
    pub pensao_alimenticia: f64,
    #[serde(default = "default_true")]
    pub permitir_desconto_simplificado: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalidadeDeducao {
    Legal,
    Simplificada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrfOutput {
    pub rendimento_bruto: f64,
    pub contribuicao_inss: f64,
    pub modalidade_deducao: ModalidadeDeducao,
    pub deducoes: f64,
    pub base_calculo: f64,
    pub faixa: usize,
    pub aliquota: f64,
    pub parcela_deduzir: f64,
    pub imposto: f64,
    /// Percentage points over the gross income.
    pub aliquota_efetiva: f64,
}

impl Validate for IrrfInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("rendimentoBruto", self.rendimento_bruto)?;
        if let Some(inss) = self.contribuicao_inss {
            validate_non_negative("contribuicaoInss", inss)?;
        }
        validate_non_negative("pensaoAlimenticia", self.pensao_alimenticia)
    }
}

/// Tax over an already-computed base.
pub fn imposto_sobre_base(base: f64, table: &IrrfTable) -> (usize, f64, f64, f64) {
    let Some((indice, faixa)) = table
        .faixas
        .iter()
        .enumerate()
        .find(|(_, f)| f.limite.map_or(true, |limite| base <= limite))
        .or_else(|| table.faixas.iter().enumerate().last())
    else {
        return (0, 0.0, 0.0, 0.0);
    };
    let imposto = round2((base * faixa.aliquota - faixa.deducao).max(0.0));
    (indice + 1, faixa.aliquota, faixa.deducao, imposto)
}

pub fn calcular_irrf(input: &IrrfInput, tables: &RateTables) -> IrrfOutput {
    let table = &tables.irrf;
    let contribuicao_inss = input.contribuicao_inss.unwrap_or_else(|| {
        contribuicao_progressiva(input.rendimento_bruto, &tables.inss).contribuicao_total
    });

    let deducoes_legais = contribuicao_inss
        + f64::from(input.dependentes) * table.deducao_dependente
        + input.pensao_alimenticia;

    let (modalidade_deducao, deducoes) =
        if input.permitir_desconto_simplificado && table.desconto_simplificado > deducoes_legais {
            (ModalidadeDeducao::Simplificada, table.desconto_simplificado)
        } else {
            (ModalidadeDeducao::Legal, deducoes_legais)
        };

    let base_calculo = round2((input.rendimento_bruto - deducoes).max(0.0));
    let (faixa, aliquota, parcela_deduzir, imposto) = imposto_sobre_base(base_calculo, table);

    let aliquota_efetiva = if input.rendimento_bruto > 0.0 {
        round2(imposto / input.rendimento_bruto * 100.0)
    } else {
        0.0
    };

    IrrfOutput {
        rendimento_bruto: input.rendimento_bruto,
        contribuicao_inss,
        modalidade_deducao,
        deducoes: round2(deducoes),
        base_calculo,
        faixa,
        aliquota,
        parcela_deduzir,
        imposto,
        aliquota_efetiva,
    }
}

pub struct IrrfCalculator;

impl Calculator for IrrfCalculator {
    type Input = IrrfInput;
    type Output = IrrfOutput;

    fn name(&self) -> &'static str {
        "irrf"
    }

    fn calculate(&self, input: &IrrfInput, tables: &RateTables) -> Result<IrrfOutput> {
        Ok(calcular_irrf(input, tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bruto: f64) -> IrrfInput {
        IrrfInput {
            rendimento_bruto: bruto,
            contribuicao_inss: None,
            dependentes: 0,
            pensao_alimenticia: 0.0,
            permitir_desconto_simplificado: true,
        }
    }

    #[test]
    fn test_exempt_income() {
        let out = calcular_irrf(&input(2000.0), &RateTables::default());
        assert_eq!(out.faixa, 1);
        assert_eq!(out.imposto, 0.0);
    }

    #[test]
    fn test_simplified_discount_wins_when_larger() {
        let out = calcular_irrf(&input(5000.0), &RateTables::default());
        assert_eq!(out.contribuicao_inss, 518.82);
        assert_eq!(out.modalidade_deducao, ModalidadeDeducao::Simplificada);
        assert_eq!(out.base_calculo, 4435.20);
        assert_eq!(out.faixa, 4);
        assert_eq!(out.imposto, 335.15);
    }

    #[test]
    fn test_legal_deductions_with_dependants() {
        let mut i = input(5000.0);
        i.dependentes = 2;
        let out = calcular_irrf(&i, &RateTables::default());
        // 518,82 + 2 × 189,59 = 898,00
        assert_eq!(out.modalidade_deducao, ModalidadeDeducao::Legal);
        assert_eq!(out.deducoes, 898.0);
        assert_eq!(out.base_calculo, 4102.0);
        // 4102 × 22,5% − 662,77 = 260,18
        assert_eq!(out.imposto, 260.18);
    }

    #[test]
    fn test_top_bracket() {
        let mut i = input(10_000.0);
        i.contribuicao_inss = Some(908.86);
        i.permitir_desconto_simplificado = false;
        let out = calcular_irrf(&i, &RateTables::default());
        assert_eq!(out.faixa, 5);
        // (10000 − 908,86) × 27,5% − 896,00 = 1604,06
        assert_eq!(out.imposto, 1604.06);
    }
}
