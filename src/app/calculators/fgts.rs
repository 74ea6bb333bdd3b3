//! FGTS balance projection: monthly TR correction, 3% p.a. interest, deposits and withdrawals.

use crate::config::rates::RateTables;
use crate::core::calendar::{add_months, format_competencia, parse_competencia};
use crate::domain::ports::Calculator;
use crate::utils::error::{JurisError, Result};
use crate::utils::money::{monthly_from_annual, round2};
use crate::utils::validation::{validate_non_negative, validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_MESES: u32 = 1200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxaMensal {
    /// "YYYY-MM"
    pub competencia: String,
    /// Fraction, e.g. 0.0012 for 0,12%.
    pub taxa: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaqueFgts {
    pub competencia: String,
    pub valor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReajusteSalarial {
    pub competencia: String,
    pub salario: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FgtsInput {
    #[serde(default)]
    pub saldo_inicial: f64,
    pub salario_mensal: f64,
    pub competencia_inicial: String,
    pub meses: u32,
    #[serde(default)]
    pub aprendiz: bool,
    /// Overrides the deposit rate from the rate tables.
    #[serde(default)]
    pub aliquota_deposito: Option<f64>,
    #[serde(default)]
    pub taxas_tr: Vec<TaxaMensal>,
    #[serde(default)]
    pub saques: Vec<SaqueFgts>,
    #[serde(default)]
    pub reajustes: Vec<ReajusteSalarial>,
    #[serde(default)]
    pub calcular_multa_rescisoria: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FgtsPeriodo {
    pub competencia: String,
    pub salario: f64,
    pub saldo_anterior: f64,
    pub taxa_tr: f64,
    pub correcao: f64,
    pub juros: f64,
    pub deposito: f64,
    pub saque: f64,
    pub saldo_final: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FgtsOutput {
    pub saldo_inicial: f64,
    pub total_depositos: f64,
    pub total_correcao: f64,
    pub total_juros: f64,
    pub total_saques: f64,
    pub saldo_final: f64,
    pub multa_rescisoria: Option<f64>,
    pub periodos: Vec<FgtsPeriodo>,
}

impl Validate for FgtsInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("saldoInicial", self.saldo_inicial)?;
        validate_non_negative("salarioMensal", self.salario_mensal)?;
        validate_range("meses", self.meses, 1, MAX_MESES)?;
        parse_competencia(&self.competencia_inicial)?;
        if let Some(aliquota) = self.aliquota_deposito {
            validate_range("aliquotaDeposito", aliquota, 0.0, 1.0)?;
        }
        for taxa in &self.taxas_tr {
            parse_competencia(&taxa.competencia)?;
            if !taxa.taxa.is_finite() || taxa.taxa <= -1.0 || taxa.taxa >= 1.0 {
                return Err(JurisError::invalid(
                    "taxasTr.taxa",
                    taxa.taxa,
                    "Monthly rate must be a fraction between -1 and 1",
                ));
            }
        }
        for saque in &self.saques {
            parse_competencia(&saque.competencia)?;
            validate_non_negative("saques.valor", saque.valor)?;
        }
        for reajuste in &self.reajustes {
            parse_competencia(&reajuste.competencia)?;
            validate_non_negative("reajustes.salario", reajuste.salario)?;
        }
        Ok(())
    }
}

fn by_competencia<T>(
    items: &[T],
    key: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> Result<HashMap<NaiveDate, f64>> {
    let mut map = HashMap::new();
    for item in items {
        *map.entry(parse_competencia(key(item))?).or_insert(0.0) += value(item);
    }
    Ok(map)
}

pub fn projetar_fgts(input: &FgtsInput, tables: &RateTables) -> Result<FgtsOutput> {
    let inicio = parse_competencia(&input.competencia_inicial)?;
    let aliquota = input.aliquota_deposito.unwrap_or(if input.aprendiz {
        tables.fgts.aliquota_aprendiz
    } else {
        tables.fgts.aliquota_deposito
    });
    let juros_mensal = monthly_from_annual(tables.fgts.juros_anuais);

    let taxas = by_competencia(&input.taxas_tr, |t| &t.competencia, |t| t.taxa)?;
    let saques = by_competencia(&input.saques, |s| &s.competencia, |s| s.valor)?;
    let mut reajustes: Vec<(NaiveDate, f64)> = input
        .reajustes
        .iter()
        .map(|r| Ok((parse_competencia(&r.competencia)?, r.salario)))
        .collect::<Result<_>>()?;
    reajustes.sort_by_key(|(data, _)| *data);

    let mut periodos = Vec::with_capacity(input.meses as usize);
    let mut saldo = input.saldo_inicial;
    let mut salario = input.salario_mensal;

    for i in 0..input.meses {
        let competencia = add_months(inicio, i)?;
        if let Some((_, novo)) = reajustes.iter().rev().find(|(data, _)| *data == competencia) {
            salario = *novo;
        }

        let taxa_tr = taxas
            .get(&competencia)
            .copied()
            .unwrap_or(tables.fgts.tr_padrao);
        let saldo_anterior = saldo;
        // 利息與 TR 只作用於上期餘額，本月存款不計息
        let correcao = round2(saldo_anterior * taxa_tr);
        let juros = round2(saldo_anterior * juros_mensal);
        let deposito = round2(salario * aliquota);

        let disponivel = saldo_anterior + deposito + correcao + juros;
        let pedido = saques.get(&competencia).copied().unwrap_or(0.0);
        let saque = round2(pedido.min(disponivel.max(0.0)));
        if pedido > saque {
            tracing::warn!(
                "FGTS withdrawal of {:.2} in {} exceeds the available balance, limited to {:.2}",
                pedido,
                format_competencia(competencia),
                saque
            );
        }

        saldo = round2(disponivel - saque);
        periodos.push(FgtsPeriodo {
            competencia: format_competencia(competencia),
            salario,
            saldo_anterior,
            taxa_tr,
            correcao,
            juros,
            deposito,
            saque,
            saldo_final: saldo,
        });
    }

    let total_depositos = round2(periodos.iter().map(|p| p.deposito).sum());
    let total_correcao = round2(periodos.iter().map(|p| p.correcao).sum());
    let total_juros = round2(periodos.iter().map(|p| p.juros).sum());
    let total_saques = round2(periodos.iter().map(|p| p.saque).sum());
    let multa_rescisoria = input
        .calcular_multa_rescisoria
        .then(|| round2(saldo * tables.fgts.multa_sem_justa_causa));

    tracing::debug!(
        "FGTS projection: {} periods, final balance {:.2}",
        periodos.len(),
        saldo
    );

    Ok(FgtsOutput {
        saldo_inicial: input.saldo_inicial,
        total_depositos,
        total_correcao,
        total_juros,
        total_saques,
        saldo_final: saldo,
        multa_rescisoria,
        periodos,
    })
}

pub struct FgtsCalculator;

impl Calculator for FgtsCalculator {
    type Input = FgtsInput;
    type Output = FgtsOutput;

    fn name(&self) -> &'static str {
        "fgts"
    }

    fn calculate(&self, input: &FgtsInput, tables: &RateTables) -> Result<FgtsOutput> {
        projetar_fgts(input, tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FgtsInput {
        FgtsInput {
            saldo_inicial: 1000.0,
            salario_mensal: 2000.0,
            competencia_inicial: "2024-01".to_string(),
            meses: 2,
            aprendiz: false,
            aliquota_deposito: None,
            taxas_tr: Vec::new(),
            saques: Vec::new(),
            reajustes: Vec::new(),
            calcular_multa_rescisoria: false,
        }
    }

    #[test]
    fn test_two_month_projection() {
        let out = projetar_fgts(&input(), &RateTables::default()).unwrap();
        assert_eq!(out.periodos.len(), 2);

        let p1 = &out.periodos[0];
        assert_eq!(p1.competencia, "2024-01");
        assert_eq!(p1.juros, 2.47);
        assert_eq!(p1.deposito, 160.0);
        assert_eq!(p1.saldo_final, 1162.47);

        let p2 = &out.periodos[1];
        assert_eq!(p2.saldo_anterior, 1162.47);
        assert_eq!(p2.juros, 2.87);
        assert_eq!(p2.saldo_final, 1325.34);
        assert_eq!(out.saldo_final, 1325.34);
        assert_eq!(out.total_depositos, 320.0);
    }

    #[test]
    fn test_tr_rate_is_applied_per_month() {
        let mut i = input();
        i.meses = 1;
        i.taxas_tr = vec![TaxaMensal {
            competencia: "2024-01".to_string(),
            taxa: 0.001,
        }];
        let out = projetar_fgts(&i, &RateTables::default()).unwrap();
        assert_eq!(out.periodos[0].correcao, 1.0);
        assert_eq!(out.saldo_final, 1163.47);
    }

    #[test]
    fn test_withdrawal_is_limited_to_balance() {
        let mut i = input();
        i.meses = 1;
        i.saques = vec![SaqueFgts {
            competencia: "2024-01".to_string(),
            valor: 50_000.0,
        }];
        let out = projetar_fgts(&i, &RateTables::default()).unwrap();
        assert_eq!(out.periodos[0].saque, 1162.47);
        assert_eq!(out.saldo_final, 0.0);
    }

    #[test]
    fn test_apprentice_rate_and_salary_adjustment() {
        let mut i = input();
        i.saldo_inicial = 0.0;
        i.aprendiz = true;
        i.reajustes = vec![ReajusteSalarial {
            competencia: "2024-02".to_string(),
            salario: 3000.0,
        }];
        let out = projetar_fgts(&i, &RateTables::default()).unwrap();
        assert_eq!(out.periodos[0].deposito, 40.0);
        assert_eq!(out.periodos[1].deposito, 60.0);
    }

    #[test]
    fn test_rescission_fine() {
        let mut i = input();
        i.calcular_multa_rescisoria = true;
        let out = projetar_fgts(&i, &RateTables::default()).unwrap();
        assert_eq!(out.multa_rescisoria, Some(530.14));
    }

    #[test]
    fn test_validation() {
        let mut i = input();
        i.meses = 0;
        assert!(i.validate().is_err());

        let mut i = input();
        i.competencia_inicial = "janeiro".to_string();
        assert!(i.validate().is_err());

        let mut i = input();
        i.saques = vec![SaqueFgts {
            competencia: "2024-01".to_string(),
            valor: -1.0,
        }];
        assert!(i.validate().is_err());
    }
}
