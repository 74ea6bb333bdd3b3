use crate::app::calculators::adicionais::{InsalubridadeCalculator, PericulosidadeCalculator};
use crate::app::calculators::aviso_previo::AvisoPrevioCalculator;
use crate::app::calculators::beneficio::BeneficioCalculator;
use crate::app::calculators::correcao::{CorrecaoMonetariaCalculator, JurosCalculator};
use crate::app::calculators::decimo_terceiro::DecimoTerceiroCalculator;
use crate::app::calculators::dosimetria::DosimetriaCalculator;
use crate::app::calculators::execucao_penal::{DetracaoCalculator, ProgressaoCalculator};
use crate::app::calculators::ferias::FeriasCalculator;
use crate::app::calculators::fgts::FgtsCalculator;
use crate::app::calculators::honorarios::HonorariosCalculator;
use crate::app::calculators::inss::InssCalculator;
use crate::app::calculators::irrf::IrrfCalculator;
use crate::app::calculators::jornada::{AdicionalNoturnoCalculator, HorasExtrasCalculator};
use crate::app::calculators::pensao::PensaoCalculator;
use crate::app::calculators::prazos::PrazoCalculator;
use crate::app::calculators::prescricao::PrescricaoCalculator;
use crate::app::calculators::rescisao::RescisaoCalculator;
use crate::app::calculators::seguro_desemprego::SeguroDesempregoCalculator;
use crate::app::calculators::{CalculationRequest, CalculationResult};
use crate::config::rates::RateTables;
use crate::domain::model::Calculation;
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;

/// 計算引擎：持有費率表，負責驗證輸入後分派給對應的計算器
#[derive(Debug, Clone, Default)]
pub struct CalcEngine {
    tables: RateTables,
}

impl CalcEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: RateTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    pub fn execute<C: Calculator>(&self, calculator: &C, input: &C::Input) -> Result<C::Output> {
        tracing::debug!("🧮 Running {} calculation", calculator.name());

        if let Err(e) = input.validate() {
            tracing::warn!("❌ Invalid {} input: {}", calculator.name(), e);
            return Err(e);
        }

        let output = calculator.calculate(input, &self.tables)?;
        tracing::info!("✅ {} calculation completed", calculator.name());
        Ok(output)
    }

    pub fn run(&self, request: &CalculationRequest) -> Result<CalculationResult> {
        use CalculationRequest as Req;
        use CalculationResult as Res;

        let result = match request {
            Req::Rescisao(i) => Res::Rescisao(self.execute(&RescisaoCalculator, i)?),
            Req::HorasExtras(i) => Res::HorasExtras(self.execute(&HorasExtrasCalculator, i)?),
            Req::Fgts(i) => Res::Fgts(self.execute(&FgtsCalculator, i)?),
            Req::Inss(i) => Res::Inss(self.execute(&InssCalculator, i)?),
            Req::Irrf(i) => Res::Irrf(self.execute(&IrrfCalculator, i)?),
            Req::Ferias(i) => Res::Ferias(self.execute(&FeriasCalculator, i)?),
            Req::DecimoTerceiro(i) => {
                Res::DecimoTerceiro(self.execute(&DecimoTerceiroCalculator, i)?)
            }
            Req::AvisoPrevio(i) => Res::AvisoPrevio(self.execute(&AvisoPrevioCalculator, i)?),
            Req::AdicionalNoturno(i) => {
                Res::AdicionalNoturno(self.execute(&AdicionalNoturnoCalculator, i)?)
            }
            Req::Insalubridade(i) => {
                Res::Insalubridade(self.execute(&InsalubridadeCalculator, i)?)
            }
            Req::Periculosidade(i) => {
                Res::Periculosidade(self.execute(&PericulosidadeCalculator, i)?)
            }
            Req::SeguroDesemprego(i) => {
                Res::SeguroDesemprego(self.execute(&SeguroDesempregoCalculator, i)?)
            }
            Req::Dosimetria(i) => Res::Dosimetria(self.execute(&DosimetriaCalculator, i)?),
            Req::ProgressaoRegime(i) => {
                Res::ProgressaoRegime(self.execute(&ProgressaoCalculator, i)?)
            }
            Req::Detracao(i) => Res::Detracao(self.execute(&DetracaoCalculator, i)?),
            Req::Prescricao(i) => Res::Prescricao(self.execute(&PrescricaoCalculator, i)?),
            Req::CorrecaoMonetaria(i) => {
                Res::CorrecaoMonetaria(self.execute(&CorrecaoMonetariaCalculator, i)?)
            }
            Req::Juros(i) => Res::Juros(self.execute(&JurosCalculator, i)?),
            Req::Honorarios(i) => Res::Honorarios(self.execute(&HonorariosCalculator, i)?),
            Req::PensaoAlimenticia(i) => {
                Res::PensaoAlimenticia(self.execute(&PensaoCalculator, i)?)
            }
            Req::PrazoProcessual(i) => Res::PrazoProcessual(self.execute(&PrazoCalculator, i)?),
            Req::BeneficioPrevidenciario(i) => {
                Res::BeneficioPrevidenciario(self.execute(&BeneficioCalculator, i)?)
            }
        };
        Ok(result)
    }
}

impl Calculation {
    /// Builds the persisted entity from a request and its result.
    pub fn record(
        id: u64,
        user_id: u64,
        case_id: Option<u64>,
        titulo: impl Into<String>,
        request: &CalculationRequest,
        result: &CalculationResult,
    ) -> Result<Self> {
        Ok(Self {
            id,
            user_id,
            case_id,
            tipo: request.tipo(),
            titulo: titulo.into(),
            entrada: serde_json::to_value(request)?,
            resultado: serde_json::to_value(result)?,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::calculators::inss::InssInput;
    use crate::domain::model::CalculationType;
    use crate::utils::error::{ErrorCategory, JurisError};

    #[test]
    fn test_execute_validates_before_calculating() {
        let engine = CalcEngine::new();
        let err = engine
            .execute(
                &InssCalculator,
                &InssInput {
                    salario_contribuicao: -10.0,
                },
            )
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(matches!(err, JurisError::InvalidValueError { .. }));
    }

    #[test]
    fn test_run_dispatches_by_type() {
        let request: CalculationRequest = serde_json::from_str(
            r#"{"tipo": "periculosidade", "dados": {"salarioBase": 2000.0}}"#,
        )
        .unwrap();
        let result = CalcEngine::new().run(&request).unwrap();
        assert_eq!(result.tipo(), CalculationType::Periculosidade);
        match result {
            CalculationResult::Periculosidade(out) => assert_eq!(out.valor_mensal, 600.0),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_custom_tables_are_used() {
        let mut tables = RateTables::default();
        tables.salario_minimo = 1500.0;
        let request: CalculationRequest = serde_json::from_str(
            r#"{"tipo": "insalubridade", "dados": {"grau": "maximo"}}"#,
        )
        .unwrap();
        let result = CalcEngine::with_tables(tables).run(&request).unwrap();
        let CalculationResult::Insalubridade(out) = result else {
            panic!("unexpected result");
        };
        assert_eq!(out.valor_mensal, 600.0);
    }

    #[test]
    fn test_record_keeps_request_and_result() {
        let request = CalculationRequest::Inss(InssInput {
            salario_contribuicao: 3000.0,
        });
        let result = CalcEngine::new().run(&request).unwrap();
        let calc = Calculation::record(1, 7, Some(3), "INSS março", &request, &result).unwrap();
        assert_eq!(calc.tipo, CalculationType::Inss);
        assert_eq!(calc.entrada["dados"]["salarioContribuicao"], 3000.0);
        assert_eq!(calc.resultado["resultado"]["contribuicaoTotal"], 258.82);
    }
}
