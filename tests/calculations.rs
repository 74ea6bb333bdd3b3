use chrono::NaiveDate;
use juris_calc::app::calculators::dosimetria::Regime;
use juris_calc::app::calculators::fgts::{projetar_fgts, FgtsInput, SaqueFgts};
use juris_calc::domain::model::CalculationType;
use juris_calc::utils::error::ErrorCategory;
use juris_calc::{CalcEngine, CalculationRequest, CalculationResult, RateTables};
use proptest::prelude::*;
use serde_json::json;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run(value: serde_json::Value) -> CalculationResult {
    let request: CalculationRequest = serde_json::from_value(value).unwrap();
    CalcEngine::new().run(&request).unwrap()
}

#[test]
fn test_rescission_through_engine() {
    let result = run(json!({
        "tipo": "rescisao",
        "dados": {
            "salario": 3000.0,
            "dataAdmissao": "2022-03-01",
            "dataDesligamento": "2024-06-15",
            "motivo": "sem_justa_causa",
            "saldoFgts": 5000.0
        }
    }));
    let CalculationResult::Rescisao(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.dias_aviso, 36);
    assert_eq!(out.total_proventos, 8516.67);
    assert_eq!(out.liquido, 8266.53);
    assert_eq!(out.multa_fgts, 2219.2);
}

#[test]
fn test_result_serializes_with_type_tag() {
    let result = run(json!({"tipo": "inss", "dados": {"salarioContribuicao": 5000.0}}));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["tipo"], "inss");
    assert_eq!(value["resultado"]["contribuicaoTotal"], 518.82);
}

#[test]
fn test_sentence_dosimetry() {
    let result = run(json!({
        "tipo": "dosimetria",
        "dados": {
            "penaMinima": {"anos": 1},
            "penaMaxima": {"anos": 4},
            "circunstanciasDesfavoraveis": 2,
            "agravantes": 1,
            "causasAumento": ["1/3"]
        }
    }));
    let CalculationResult::Dosimetria(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.pena_base_dias, 630);
    assert_eq!(out.pena_intermediaria_dias, 735);
    assert_eq!(out.pena_definitiva_dias, 980);
    assert_eq!(out.pena_definitiva, "2 anos, 8 meses e 20 dias");
    assert_eq!(out.regime_inicial, Regime::Aberto);
}

#[test]
fn test_regime_progression_dates() {
    let result = run(json!({
        "tipo": "progressao_regime",
        "dados": {
            "pena": {"anos": 6},
            "dataInicio": "2024-01-01",
            "hipotese": "primario_com_violencia"
        }
    }));
    let CalculationResult::ProgressaoRegime(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.etapas.len(), 2);
    assert_eq!(out.etapas[0].data_prevista, d(2025, 6, 24));
    assert_eq!(out.etapas[1].data_prevista, d(2026, 8, 3));
}

#[test]
fn test_procedural_deadline_skips_good_friday() {
    let result = run(json!({
        "tipo": "prazo_processual",
        "dados": {"dataIntimacao": "2024-03-25", "dias": 5}
    }));
    let CalculationResult::PrazoProcessual(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.data_final, d(2024, 4, 2));
    assert!(out.feriados_no_periodo.contains(&d(2024, 3, 29)));
}

#[test]
fn test_monetary_correction_with_interest_and_fine() {
    let result = run(json!({
        "tipo": "correcao_monetaria",
        "dados": {
            "valorOriginal": 1000.0,
            "competenciaInicial": "2024-01",
            "competenciaFinal": "2024-04",
            "indices": [
                {"competencia": "2024-01", "percentual": 0.5},
                {"competencia": "2024-02", "percentual": 1.0}
            ],
            "juros": {"taxaMensal": 1.0},
            "multaPercentual": 10.0
        }
    }));
    let CalculationResult::CorrecaoMonetaria(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.valor_corrigido, 1015.05);
    assert_eq!(out.total, 1150.05);
    assert_eq!(out.indices_ausentes, vec!["2024-03".to_string()]);
}

#[test]
fn test_invalid_input_is_a_validation_error() {
    let request: CalculationRequest = serde_json::from_value(json!({
        "tipo": "honorarios",
        "dados": {"valorBase": 10000.0, "percentual": 25.0}
    }))
    .unwrap();
    assert_eq!(request.tipo(), CalculationType::Honorarios);

    let err = CalcEngine::new().run(&request).unwrap_err();
    assert!(matches!(err.category(), ErrorCategory::Validation));
}

#[test]
fn test_extreme_criminal_inputs_are_rejected_instead_of_overflowing() {
    let requests = [
        json!({"tipo": "dosimetria", "dados": {
            "penaMinima": {"anos": 1},
            "penaMaxima": {"anos": 4},
            "causasAumento": ["3000000000/1", "3000000000/1"]
        }}),
        json!({"tipo": "detracao", "dados": {"pena": {"anos": 20000000}}}),
        json!({"tipo": "progressao_regime", "dados": {
            "pena": {"anos": 6},
            "dataInicio": "2024-01-01",
            "hipotese": "primario_sem_violencia",
            "diasDetracao": 4000000000u32,
            "diasRemidos": 4000000000u32
        }}),
    ];
    for value in requests {
        let request: CalculationRequest = serde_json::from_value(value).unwrap();
        let err = CalcEngine::new().run(&request).unwrap_err();
        assert!(matches!(err.category(), ErrorCategory::Validation));
    }
}

#[test]
fn test_custom_tables_change_the_minimum_wage_floor() {
    let tables = RateTables::from_toml_str("salario_minimo = 1518.0\n").unwrap();
    let request: CalculationRequest = serde_json::from_value(json!({
        "tipo": "insalubridade",
        "dados": {"grau": "medio"}
    }))
    .unwrap();
    let result = CalcEngine::with_tables(tables).run(&request).unwrap();
    let CalculationResult::Insalubridade(out) = result else {
        panic!("unexpected result {:?}", result);
    };
    assert_eq!(out.valor_mensal, 303.6);
}

fn fgts_input(
    saldo_inicial: f64,
    salario: f64,
    meses: u32,
    saque: Option<(u32, f64)>,
) -> FgtsInput {
    FgtsInput {
        saldo_inicial,
        salario_mensal: salario,
        competencia_inicial: "2023-01".to_string(),
        meses,
        aprendiz: false,
        aliquota_deposito: None,
        taxas_tr: Vec::new(),
        saques: saque
            .map(|(mes, valor)| {
                vec![SaqueFgts {
                    competencia: format!("2023-{:02}", mes),
                    valor,
                }]
            })
            .unwrap_or_default(),
        reajustes: Vec::new(),
        calcular_multa_rescisoria: true,
    }
}

proptest! {
    #[test]
    fn fgts_balance_is_consistent(
        saldo_inicial in 0.0f64..100_000.0,
        salario in 1412.0f64..30_000.0,
        meses in 1u32..=12,
        saque in prop::option::of((1u32..=12, 0.0f64..200_000.0)),
    ) {
        let out = projetar_fgts(
            &fgts_input(saldo_inicial, salario, meses, saque),
            &RateTables::default(),
        )
        .unwrap();

        prop_assert_eq!(out.periodos.len(), meses as usize);
        prop_assert!(out.saldo_final >= 0.0);

        let mut anterior = saldo_inicial;
        for periodo in &out.periodos {
            prop_assert_eq!(periodo.saldo_anterior, anterior);
            let esperado = periodo.saldo_anterior + periodo.deposito + periodo.correcao
                + periodo.juros - periodo.saque;
            prop_assert!((periodo.saldo_final - esperado).abs() <= 0.011);
            anterior = periodo.saldo_final;
        }

        let soma = out.saldo_inicial + out.total_depositos + out.total_correcao
            + out.total_juros - out.total_saques;
        prop_assert!((out.saldo_final - soma).abs() <= 0.02 * meses as f64);

        let multa = out.multa_rescisoria.unwrap();
        prop_assert!((multa - out.saldo_final * 0.4).abs() <= 0.01);
    }
}
