use crate::config::rates::{InssTable, RateTables};
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InssInput {
    pub salario_contribuicao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InssFaixaDetalhe {
    pub faixa: usize,
    pub limite_inferior: f64,
    pub limite_superior: f64,
    pub base: f64,
    pub aliquota: f64,
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InssOutput {
    pub salario_contribuicao: f64,
    pub base_calculo: f64,
    pub faixas: Vec<InssFaixaDetalhe>,
    pub contribuicao_total: f64,
    /// Percentage points.
    pub aliquota_efetiva: f64,
    pub atingiu_teto: bool,
}

impl Validate for InssInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salarioContribuicao", self.salario_contribuicao)
    }
}

/// 累進計算：每一級只對落在該級區間的部分課徵
pub fn contribuicao_progressiva(salario: f64, table: &InssTable) -> InssOutput {
    let teto = table.teto();
    let base_calculo = salario.min(teto);

    let mut faixas = Vec::new();
    let mut total = 0.0;
    let mut limite_inferior = 0.0;
    for (i, faixa) in table.faixas.iter().enumerate() {
        if base_calculo <= limite_inferior {
            break;
        }
        let base = base_calculo.min(faixa.limite) - limite_inferior;
        let valor = base * faixa.aliquota;
        total += valor;
        faixas.push(InssFaixaDetalhe {
            faixa: i + 1,
            limite_inferior,
            limite_superior: faixa.limite,
            base: round2(base),
            aliquota: faixa.aliquota,
            valor: round2(valor),
        });
        limite_inferior = faixa.limite;
    }

    let contribuicao_total = round2(total);
    let aliquota_efetiva = if salario > 0.0 {
        round2(contribuicao_total / salario * 100.0)
    } else {
        0.0
    };

    InssOutput {
        salario_contribuicao: salario,
        base_calculo,
        faixas,
        contribuicao_total,
        aliquota_efetiva,
        atingiu_teto: salario >= teto,
    }
}

pub struct InssCalculator;

impl Calculator for InssCalculator {
    type Input = InssInput;
    type Output = InssOutput;

    fn name(&self) -> &'static str {
        "inss"
    }

    fn calculate(&self, input: &InssInput, tables: &RateTables) -> Result<InssOutput> {
        Ok(contribuicao_progressiva(input.salario_contribuicao, &tables.inss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bracket_only() {
        let out = contribuicao_progressiva(1412.0, &InssTable::default());
        assert_eq!(out.faixas.len(), 1);
        assert_eq!(out.contribuicao_total, 105.90);
        assert_eq!(out.aliquota_efetiva, 7.5);
    }

    #[test]
    fn test_progressive_brackets() {
        let out = contribuicao_progressiva(3000.0, &InssTable::default());
        assert_eq!(out.faixas.len(), 3);
        assert_eq!(out.faixas[0].valor, 105.90);
        assert_eq!(out.faixas[1].valor, 112.92);
        assert_eq!(out.faixas[2].valor, 40.0);
        assert_eq!(out.contribuicao_total, 258.82);
        assert!(!out.atingiu_teto);
    }

    #[test]
    fn test_ceiling() {
        let out = contribuicao_progressiva(15_000.0, &InssTable::default());
        assert_eq!(out.base_calculo, 7786.02);
        assert_eq!(out.contribuicao_total, 908.86);
        assert!(out.atingiu_teto);
    }

    #[test]
    fn test_zero_salary() {
        let out = contribuicao_progressiva(0.0, &InssTable::default());
        assert!(out.faixas.is_empty());
        assert_eq!(out.contribuicao_total, 0.0);
        assert_eq!(out.aliquota_efetiva, 0.0);
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let input = InssInput {
            salario_contribuicao: -1.0,
        };
        assert!(input.validate().is_err());
    }
}
