use crate::config::rates::RateTables;
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::{round2, round_to};
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use serde::{Deserialize, Serialize};

/// Faixas do art. 85 §3 CPC: (limite em salários mínimos, percentual mínimo, máximo).
const FAIXAS_FAZENDA: [(Option<f64>, f64, f64); 5] = [
    (Some(200.0), 10.0, 20.0),
    (Some(2_000.0), 8.0, 10.0),
    (Some(20_000.0), 5.0, 8.0),
    (Some(100_000.0), 3.0, 5.0),
    (None, 1.0, 3.0),
];

fn default_percentual() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonorariosInput {
    /// Condenação, proveito econômico ou valor da causa.
    pub valor_base: f64,
    #[serde(default)]
    pub fazenda_publica: bool,
    /// Ordinary fee percentage (10..=20, art. 85 §2).
    #[serde(default = "default_percentual")]
    pub percentual: f64,
    /// Position inside each Fazenda band: 0 = minimum, 1 = maximum.
    #[serde(default)]
    pub posicao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaixaHonorarios {
    pub faixa: usize,
    pub limite_inferior: f64,
    pub limite_superior: Option<f64>,
    pub base: f64,
    pub percentual: f64,
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonorariosOutput {
    pub valor_base: f64,
    pub honorarios: f64,
    pub percentual_efetivo: f64,
    pub faixas: Vec<FaixaHonorarios>,
}

impl Validate for HonorariosInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("valorBase", self.valor_base)?;
        if self.fazenda_publica {
            validate_range("posicao", self.posicao, 0.0, 1.0)
        } else {
            validate_range("percentual", self.percentual, 10.0, 20.0)
        }
    }
}

/// 對公庫（Fazenda Pública）案件逐級累進：各級只計算落在該級內的金額（art. 85 §5）
fn faixas_fazenda(valor_base: f64, salario_minimo: f64, posicao: f64) -> Vec<FaixaHonorarios> {
    let mut faixas = Vec::new();
    let mut inferior = 0.0;
    for (idx, (limite_sm, minimo, maximo)) in FAIXAS_FAZENDA.iter().enumerate() {
        if valor_base <= inferior {
            break;
        }
        let superior = limite_sm.map(|sm| sm * salario_minimo);
        let teto = superior.unwrap_or(f64::INFINITY).min(valor_base);
        let base = teto - inferior;
        let percentual = minimo + (maximo - minimo) * posicao;
        faixas.push(FaixaHonorarios {
            faixa: idx + 1,
            limite_inferior: round2(inferior),
            limite_superior: superior.map(round2),
            base: round2(base),
            percentual,
            valor: round2(base * percentual / 100.0),
        });
        match superior {
            Some(s) => inferior = s,
            None => break,
        }
    }
    faixas
}

pub fn calcular_honorarios(input: &HonorariosInput, tables: &RateTables) -> HonorariosOutput {
    let faixas = if input.fazenda_publica {
        faixas_fazenda(input.valor_base, tables.salario_minimo, input.posicao)
    } else {
        vec![FaixaHonorarios {
            faixa: 1,
            limite_inferior: 0.0,
            limite_superior: None,
            base: input.valor_base,
            percentual: input.percentual,
            valor: round2(input.valor_base * input.percentual / 100.0),
        }]
    };

    let honorarios = round2(faixas.iter().map(|f| f.valor).sum());
    let percentual_efetivo = if input.valor_base > 0.0 {
        round_to(honorarios / input.valor_base * 100.0, 4)
    } else {
        0.0
    };

    HonorariosOutput {
        valor_base: input.valor_base,
        honorarios,
        percentual_efetivo,
        faixas,
    }
}

pub struct HonorariosCalculator;

impl Calculator for HonorariosCalculator {
    type Input = HonorariosInput;
    type Output = HonorariosOutput;

    fn name(&self) -> &'static str {
        "honorarios"
    }

    fn calculate(&self, input: &HonorariosInput, tables: &RateTables) -> Result<HonorariosOutput> {
        Ok(calcular_honorarios(input, tables))
    }
}
