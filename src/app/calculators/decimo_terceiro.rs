use crate::app::calculators::inss::contribuicao_progressiva;
use crate::app::calculators::irrf::{calcular_irrf, IrrfInput};
use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecimoTerceiroInput {
    pub salario: f64,
    #[serde(default)]
    pub media_variaveis: f64,
    /// Avos (months with at least 15 worked days), 1..=12.
    pub meses_trabalhados: u32,
    #[serde(default)]
    pub dependentes: u32,
    /// First instalment already paid; defaults to half of the gross.
    #[serde(default)]
    pub adiantamento_pago: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecimoTerceiroOutput {
    pub avos: u32,
    pub valor_bruto: f64,
    pub primeira_parcela: f64,
    pub desconto_inss: f64,
    pub desconto_irrf: f64,
    pub segunda_parcela: f64,
    pub liquido_total: f64,
}

impl Validate for DecimoTerceiroInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_non_negative("mediaVariaveis", self.media_variaveis)?;
        validate_range("mesesTrabalhados", self.meses_trabalhados, 1, 12)?;
        if let Some(adiantamento) = self.adiantamento_pago {
            validate_non_negative("adiantamentoPago", adiantamento)?;
        }
        Ok(())
    }
}

/// 第十三薪：第一期不扣稅，INSS 與 IRRF 全數在第二期扣除（IRRF 為專屬課稅，不適用簡易扣除）
pub fn calcular_decimo_terceiro(
    input: &DecimoTerceiroInput,
    tables: &RateTables,
) -> DecimoTerceiroOutput {
    let valor_bruto =
        round2((input.salario + input.media_variaveis) * f64::from(input.meses_trabalhados) / 12.0);
    let primeira_parcela = input
        .adiantamento_pago
        .map(round2)
        .unwrap_or_else(|| round2(valor_bruto / 2.0));

    let desconto_inss = contribuicao_progressiva(valor_bruto, &tables.inss).contribuicao_total;
    let desconto_irrf = calcular_irrf(
        &IrrfInput {
            rendimento_bruto: valor_bruto,
            contribuicao_inss: Some(desconto_inss),
            dependentes: input.dependentes,
            pensao_alimenticia: 0.0,
            permitir_desconto_simplificado: false,
        },
        tables,
    )
    .imposto;

    let segunda_parcela = round2(valor_bruto - primeira_parcela - desconto_inss - desconto_irrf);

    DecimoTerceiroOutput {
        avos: input.meses_trabalhados,
        valor_bruto,
        primeira_parcela,
        desconto_inss,
        desconto_irrf,
        segunda_parcela,
        liquido_total: round2(primeira_parcela + segunda_parcela),
    }
}

pub struct DecimoTerceiroCalculator;

impl Calculator for DecimoTerceiroCalculator {
    type Input = DecimoTerceiroInput;
    type Output = DecimoTerceiroOutput;

    fn name(&self) -> &'static str {
        "decimo_terceiro"
    }

    fn calculate(
        &self,
        input: &DecimoTerceiroInput,
        tables: &RateTables,
    ) -> Result<DecimoTerceiroOutput> {
        Ok(calcular_decimo_terceiro(input, tables))
    }
}
