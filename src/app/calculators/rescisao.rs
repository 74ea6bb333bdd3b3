//! Verbas rescisórias (TRCT): saldo de salário, aviso prévio, 13º, férias e multa do FGTS.

use crate::app::calculators::aviso_previo::{dias_aviso, validate_dates, ModalidadeAviso};
use crate::app::calculators::inss::contribuicao_progressiva;
use crate::app::calculators::irrf::{calcular_irrf, IrrfInput};
use crate::config::rates::RateTables;
use crate::core::calendar::{add_days, add_months, avos, full_years_between};
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::money::round2;
use crate::utils::validation::{validate_non_negative, Validate};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivoRescisao {
    SemJustaCausa,
    PedidoDemissao,
    JustaCausa,
    /// Art. 484-A CLT.
    AcordoMutuo,
    TerminoContrato,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Natureza {
    Provento,
    Desconto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescisaoInput {
    pub salario: f64,
    #[serde(default)]
    pub media_variaveis: f64,
    pub data_admissao: NaiveDate,
    pub data_desligamento: NaiveDate,
    pub motivo: MotivoRescisao,
    #[serde(default)]
    pub aviso: ModalidadeAviso,
    #[serde(default)]
    pub periodos_ferias_vencidas: u32,
    /// FGTS balance before the rescission deposits, base for the fine.
    #[serde(default)]
    pub saldo_fgts: f64,
    #[serde(default)]
    pub dependentes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbaRescisoria {
    pub descricao: String,
    pub referencia: String,
    pub valor: f64,
    pub natureza: Natureza,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescisaoOutput {
    pub motivo: MotivoRescisao,
    pub dias_aviso: u32,
    pub data_projetada: NaiveDate,
    pub verbas: Vec<VerbaRescisoria>,
    pub total_proventos: f64,
    pub total_descontos: f64,
    pub liquido: f64,
    /// FGTS due on the rescission amounts (deposited, not paid in cash).
    pub fgts_rescisorio: f64,
    pub multa_fgts: f64,
    /// Share of the FGTS balance the worker may withdraw, in percentage points.
    pub percentual_saque_fgts: f64,
    pub direito_seguro_desemprego: bool,
}

impl Validate for RescisaoInput {
    fn validate(&self) -> Result<()> {
        validate_non_negative("salario", self.salario)?;
        validate_non_negative("mediaVariaveis", self.media_variaveis)?;
        validate_non_negative("saldoFgts", self.saldo_fgts)?;
        validate_dates(self.data_admissao, self.data_desligamento)
    }
}

fn verba(descricao: &str, referencia: String, valor: f64, natureza: Natureza) -> VerbaRescisoria {
    VerbaRescisoria {
        descricao: descricao.to_string(),
        referencia,
        valor: round2(valor),
        natureza,
    }
}

/// 離職當月的工作天數（上限 30 天）
fn dias_saldo_salario(admissao: NaiveDate, desligamento: NaiveDate) -> u32 {
    let dias = if admissao.year() == desligamento.year() && admissao.month() == desligamento.month()
    {
        desligamento.day() - admissao.day() + 1
    } else {
        desligamento.day()
    };
    dias.min(30)
}

/// 13º 的 avos：依年度分別計算，預告期投射跨年時合併計入
fn avos_decimo_terceiro(admissao: NaiveDate, fim: NaiveDate, desligamento: NaiveDate) -> u32 {
    let mut total = 0;
    for ano in desligamento.year()..=fim.year() {
        let (Some(jan), Some(dez)) = (
            NaiveDate::from_ymd_opt(ano, 1, 1),
            NaiveDate::from_ymd_opt(ano, 12, 31),
        ) else {
            continue;
        };
        let inicio = admissao.max(jan);
        total += avos(inicio, fim.min(dez)).min(12);
    }
    total
}

fn avos_ferias(admissao: NaiveDate, fim: NaiveDate) -> Result<u32> {
    let anos = full_years_between(admissao, fim);
    let inicio_periodo = add_months(admissao, anos * 12)?;
    Ok(avos(inicio_periodo, fim).min(12))
}

pub fn calcular_rescisao(input: &RescisaoInput, tables: &RateTables) -> Result<RescisaoOutput> {
    let remuneracao = input.salario + input.media_variaveis;
    let diaria = remuneracao / 30.0;
    let motivo = input.motivo;
    let mut verbas = Vec::new();

    let dias_saldo = dias_saldo_salario(input.data_admissao, input.data_desligamento);
    let saldo_salario = round2(diaria * f64::from(dias_saldo));
    verbas.push(verba(
        "Saldo de salário",
        format!("{} dias", dias_saldo),
        saldo_salario,
        Natureza::Provento,
    ));

    // 預告期
    let dias = dias_aviso(input.data_admissao, input.data_desligamento);
    let empregador_indeniza = input.aviso == ModalidadeAviso::Indenizado
        && matches!(motivo, MotivoRescisao::SemJustaCausa | MotivoRescisao::AcordoMutuo);
    let mut aviso_indenizado = 0.0;
    let data_projetada = if empregador_indeniza {
        let dias_pagos = if motivo == MotivoRescisao::AcordoMutuo {
            dias / 2
        } else {
            dias
        };
        aviso_indenizado = round2(diaria * f64::from(dias_pagos));
        verbas.push(verba(
            "Aviso prévio indenizado",
            format!("{} dias", dias_pagos),
            aviso_indenizado,
            Natureza::Provento,
        ));
        add_days(input.data_desligamento, u64::from(dias))?
    } else {
        input.data_desligamento
    };

    let mut descontos_aviso = 0.0;
    if motivo == MotivoRescisao::PedidoDemissao && input.aviso == ModalidadeAviso::Indenizado {
        descontos_aviso = round2(remuneracao);
        verbas.push(verba(
            "Aviso prévio não cumprido",
            "30 dias".to_string(),
            descontos_aviso,
            Natureza::Desconto,
        ));
    }

    let mut decimo_terceiro = 0.0;
    if motivo != MotivoRescisao::JustaCausa {
        let avos_13 = avos_decimo_terceiro(input.data_admissao, data_projetada, input.data_desligamento);
        decimo_terceiro = round2(remuneracao * f64::from(avos_13) / 12.0);
        if avos_13 > 0 {
            verbas.push(verba(
                "13º salário proporcional",
                format!("{}/12", avos_13),
                decimo_terceiro,
                Natureza::Provento,
            ));
        }

        let avos_fer = avos_ferias(input.data_admissao, data_projetada)?;
        if avos_fer > 0 {
            let ferias = round2(remuneracao * f64::from(avos_fer) / 12.0);
            verbas.push(verba(
                "Férias proporcionais",
                format!("{}/12", avos_fer),
                ferias,
                Natureza::Provento,
            ));
            verbas.push(verba(
                "1/3 sobre férias proporcionais",
                "1/3".to_string(),
                ferias / 3.0,
                Natureza::Provento,
            ));
        }
    }

    if input.periodos_ferias_vencidas > 0 {
        let vencidas = round2(remuneracao * f64::from(input.periodos_ferias_vencidas));
        verbas.push(verba(
            "Férias vencidas",
            format!("{} período(s)", input.periodos_ferias_vencidas),
            vencidas,
            Natureza::Provento,
        ));
        verbas.push(verba(
            "1/3 sobre férias vencidas",
            "1/3".to_string(),
            vencidas / 3.0,
            Natureza::Provento,
        ));
    }

    // 扣除：薪資餘額與 13º 分開計算 INSS / IRRF；補償性項目免稅
    let inss_saldo = contribuicao_progressiva(saldo_salario, &tables.inss).contribuicao_total;
    verbas.push(verba(
        "INSS sobre saldo de salário",
        String::new(),
        inss_saldo,
        Natureza::Desconto,
    ));
    let irrf_saldo = calcular_irrf(
        &IrrfInput {
            rendimento_bruto: saldo_salario,
            contribuicao_inss: Some(inss_saldo),
            dependentes: input.dependentes,
            pensao_alimenticia: 0.0,
            permitir_desconto_simplificado: true,
        },
        tables,
    )
    .imposto;
    if irrf_saldo > 0.0 {
        verbas.push(verba(
            "IRRF sobre saldo de salário",
            String::new(),
            irrf_saldo,
            Natureza::Desconto,
        ));
    }

    if decimo_terceiro > 0.0 {
        let inss_13 = contribuicao_progressiva(decimo_terceiro, &tables.inss).contribuicao_total;
        verbas.push(verba("INSS sobre 13º salário", String::new(), inss_13, Natureza::Desconto));
        let irrf_13 = calcular_irrf(
            &IrrfInput {
                rendimento_bruto: decimo_terceiro,
                contribuicao_inss: Some(inss_13),
                dependentes: input.dependentes,
                pensao_alimenticia: 0.0,
                permitir_desconto_simplificado: false,
            },
            tables,
        )
        .imposto;
        if irrf_13 > 0.0 {
            verbas.push(verba("IRRF sobre 13º salário", String::new(), irrf_13, Natureza::Desconto));
        }
    }

    let total_proventos = round2(
        verbas
            .iter()
            .filter(|v| v.natureza == Natureza::Provento)
            .map(|v| v.valor)
            .sum(),
    );
    let total_descontos = round2(
        verbas
            .iter()
            .filter(|v| v.natureza == Natureza::Desconto)
            .map(|v| v.valor)
            .sum(),
    );
    let liquido = round2(total_proventos - total_descontos);

    let fgts_rescisorio =
        round2((saldo_salario + aviso_indenizado + decimo_terceiro) * tables.fgts.aliquota_deposito);
    let percentual_multa = match motivo {
        MotivoRescisao::SemJustaCausa => tables.fgts.multa_sem_justa_causa,
        MotivoRescisao::AcordoMutuo => tables.fgts.multa_acordo,
        _ => 0.0,
    };
    let multa_fgts = round2((input.saldo_fgts + fgts_rescisorio) * percentual_multa);
    let percentual_saque_fgts = match motivo {
        MotivoRescisao::SemJustaCausa | MotivoRescisao::TerminoContrato => 100.0,
        MotivoRescisao::AcordoMutuo => 80.0,
        MotivoRescisao::PedidoDemissao | MotivoRescisao::JustaCausa => 0.0,
    };

    tracing::debug!(
        "Rescission ({:?}): {} items, net {:.2}, aviso discount {:.2}",
        motivo,
        verbas.len(),
        liquido,
        descontos_aviso
    );

    Ok(RescisaoOutput {
        motivo,
        dias_aviso: dias,
        data_projetada,
        verbas,
        total_proventos,
        total_descontos,
        liquido,
        fgts_rescisorio,
        multa_fgts,
        percentual_saque_fgts,
        direito_seguro_desemprego: motivo == MotivoRescisao::SemJustaCausa,
    })
}

pub struct RescisaoCalculator;

impl Calculator for RescisaoCalculator {
    type Input = RescisaoInput;
    type Output = RescisaoOutput;

    fn name(&self) -> &'static str {
        "rescisao"
    }

    fn calculate(&self, input: &RescisaoInput, tables: &RateTables) -> Result<RescisaoOutput> {
        calcular_rescisao(input, tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input(motivo: MotivoRescisao) -> RescisaoInput {
        RescisaoInput {
            salario: 3000.0,
            media_variaveis: 0.0,
            data_admissao: d(2022, 3, 1),
            data_desligamento: d(2024, 6, 15),
            motivo,
            aviso: ModalidadeAviso::Indenizado,
            periodos_ferias_vencidas: 0,
            saldo_fgts: 5000.0,
            dependentes: 0,
        }
    }

    fn valor(out: &RescisaoOutput, descricao: &str) -> Option<f64> {
        out.verbas
            .iter()
            .find(|v| v.descricao == descricao)
            .map(|v| v.valor)
    }

    #[test]
    fn test_dismissal_without_cause() {
        let out = calcular_rescisao(&input(MotivoRescisao::SemJustaCausa), &RateTables::default())
            .unwrap();
        assert_eq!(out.dias_aviso, 36);
        assert_eq!(out.data_projetada, d(2024, 7, 21));
        assert_eq!(valor(&out, "Saldo de salário"), Some(1500.0));
        assert_eq!(valor(&out, "Aviso prévio indenizado"), Some(3600.0));
        assert_eq!(valor(&out, "13º salário proporcional"), Some(1750.0));
        assert_eq!(valor(&out, "Férias proporcionais"), Some(1250.0));
        assert_eq!(valor(&out, "1/3 sobre férias proporcionais"), Some(416.67));
        assert_eq!(valor(&out, "INSS sobre saldo de salário"), Some(113.82));
        assert_eq!(valor(&out, "INSS sobre 13º salário"), Some(136.32));
        assert_eq!(out.total_proventos, 8516.67);
        assert_eq!(out.total_descontos, 250.14);
        assert_eq!(out.liquido, 8266.53);
        assert_eq!(out.fgts_rescisorio, 548.0);
        assert_eq!(out.multa_fgts, 2219.2);
        assert!(out.direito_seguro_desemprego);
        assert_eq!(out.percentual_saque_fgts, 100.0);
    }

    #[test]
    fn test_dismissal_for_cause_keeps_only_salary_and_vested_vacation() {
        let mut i = input(MotivoRescisao::JustaCausa);
        i.periodos_ferias_vencidas = 1;
        let out = calcular_rescisao(&i, &RateTables::default()).unwrap();
        assert_eq!(valor(&out, "Aviso prévio indenizado"), None);
        assert_eq!(valor(&out, "13º salário proporcional"), None);
        assert_eq!(valor(&out, "Férias proporcionais"), None);
        assert_eq!(valor(&out, "Férias vencidas"), Some(3000.0));
        assert_eq!(valor(&out, "1/3 sobre férias vencidas"), Some(1000.0));
        assert_eq!(out.multa_fgts, 0.0);
        assert!(!out.direito_seguro_desemprego);
    }

    #[test]
    fn test_mutual_agreement_halves_notice_and_fine() {
        let out = calcular_rescisao(&input(MotivoRescisao::AcordoMutuo), &RateTables::default())
            .unwrap();
        assert_eq!(valor(&out, "Aviso prévio indenizado"), Some(1800.0));
        assert_eq!(out.percentual_saque_fgts, 80.0);
        // fgts rescisório: (1500 + 1800 + 1750) × 8% = 404,00
        assert_eq!(out.fgts_rescisorio, 404.0);
        assert_eq!(out.multa_fgts, 1080.8);
    }

    #[test]
    fn test_resignation_without_notice_discounts_a_month() {
        let out = calcular_rescisao(&input(MotivoRescisao::PedidoDemissao), &RateTables::default())
            .unwrap();
        assert_eq!(valor(&out, "Aviso prévio não cumprido"), Some(3000.0));
        assert_eq!(out.data_projetada, d(2024, 6, 15));
        // sem projeção: 13º de jan a 15/jun = 6/12
        assert_eq!(valor(&out, "13º salário proporcional"), Some(1500.0));
        assert_eq!(out.multa_fgts, 0.0);
    }

    #[test]
    fn test_salary_days_when_admitted_in_same_month() {
        assert_eq!(dias_saldo_salario(d(2024, 6, 10), d(2024, 6, 15)), 6);
        assert_eq!(dias_saldo_salario(d(2024, 1, 10), d(2024, 7, 31)), 30);
    }
}
