use crate::app::calculators::inss::contribuicao_progressiva;
use crate::app::calculators::irrf::{calcular_irrf, IrrfInput};
use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use serde::{Deserialize, Serialize};

fn default_dias() -> u32 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeriasInput {
    pub salario: f64,
    #[serde(default)]
    pub media_variaveis: f64,
    #[serde(default = "default_dias")]
    pub dias: u32,
    /// Sell one third of the days (abono pecuniário, art. 143 CLT).
    #[serde(default)]
    pub vender_abono: bool,
    #[serde(default)]
    pub dependentes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeriasOutput {
    pub dias_gozo: u32,
    pub dias_abono: u32,
    pub valor_ferias: f64,
    pub terco_constitucional: f64,
    pub abono_pecuniario: f64,
    pub terco_abono: f64,
    pub total_bruto: f64,
    pub desconto_inss: f64,
    pub desconto_irrf: f64,
    pub liquido: f64,
}

impl Validate for FeriasInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_non_negative("mediaVariaveis", self.media_variaveis)?;
        validate_range("dias", self.dias, 1, 30)
    }
}

pub fn calcular_ferias(input: &FeriasInput, tables: &RateTables) -> FeriasOutput {
    let remuneracao = input.salario + input.media_variaveis;
    let dias_abono = if input.vender_abono { input.dias / 3 } else { 0 };
    let dias_gozo = input.dias - dias_abono;

    let valor_ferias = round2(remuneracao / 30.0 * f64::from(dias_gozo));
    let terco_constitucional = round2(valor_ferias / 3.0);
    let abono_pecuniario = round2(remuneracao / 30.0 * f64::from(dias_abono));
    let terco_abono = round2(abono_pecuniario / 3.0);

    // 出售假期的補償金不計入 INSS 與 IRRF
    let base_tributavel = valor_ferias + terco_constitucional;
    let desconto_inss = contribuicao_progressiva(base_tributavel, &tables.inss).contribuicao_total;
    let desconto_irrf = calcular_irrf(
        &IrrfInput {
            rendimento_bruto: base_tributavel,
            contribuicao_inss: Some(desconto_inss),
            dependentes: input.dependentes,
            pensao_alimenticia: 0.0,
            permitir_desconto_simplificado: true,
        },
        tables,
    )
    .imposto;

    let total_bruto = round2(valor_ferias + terco_constitucional + abono_pecuniario + terco_abono);
    let liquido = round2(total_bruto - desconto_inss - desconto_irrf);

    FeriasOutput {
        dias_gozo,
        dias_abono,
        valor_ferias,
        terco_constitucional,
        abono_pecuniario,
        terco_abono,
        total_bruto,
        desconto_inss,
        desconto_irrf,
        liquido,
    }
}

pub struct FeriasCalculator;

impl Calculator for FeriasCalculator {
    type Input = FeriasInput;
    type Output = FeriasOutput;

    fn name(&self) -> &'static str {
        "ferias"
    }

    fn calculate(&self, input: &FeriasInput, tables: &RateTables) -> Result<FeriasOutput> {
        Ok(calcular_ferias(input, tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FeriasInput {
        FeriasInput {
            salario: 3000.0,
            media_variaveis: 0.0,
            dias: 30,
            vender_abono: false,
            dependentes: 0,
        }
    }

    #[test]
    fn test_full_vacation() {
        let out = calcular_ferias(&input(), &RateTables::default());
        assert_eq!(out.valor_ferias, 3000.0);
        assert_eq!(out.terco_constitucional, 1000.0);
        assert_eq!(out.desconto_inss, 378.82);
        assert_eq!(out.desconto_irrf, 133.84);
        assert_eq!(out.liquido, 3487.34);
    }

    #[test]
    fn test_selling_a_third() {
        let mut i = input();
        i.vender_abono = true;
        let out = calcular_ferias(&i, &RateTables::default());
        assert_eq!(out.dias_gozo, 20);
        assert_eq!(out.dias_abono, 10);
        assert_eq!(out.valor_ferias, 2000.0);
        assert_eq!(out.abono_pecuniario, 1000.0);
        assert_eq!(out.terco_abono, 333.33);
        assert_eq!(out.total_bruto, 4000.0);
    }

    #[test]
    fn test_days_out_of_range() {
        let mut i = input();
        i.dias = 31;
        assert!(i.validate().is_err());
    }
}
