//! Calculator selections shared across a session.
//!
//! [`CalculatorContext`] carries the regime, period, month and utility
//! coefficient a calculation runs under, and dispatches a
//! [`CalculationRequest`] to the matching regime calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::{EmpresarialCalculator, MoralCalculator, ResicoCalculator};
use crate::models::{
    AdvancedCalculationResult, CalculationResult, EmpresarialAdvancedInput, Month,
    MoralAdvancedInput, Period, Regime, ResicoAdvancedInput,
};
use crate::tables::{DEFAULT_UTILITY_COEFFICIENT, TaxTables};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("utility coefficient {0} must be greater than 0 and at most 1")]
    InvalidCoefficient(Decimal),

    #[error("utility coefficient {0} has more than 4 decimal places")]
    CoefficientPrecision(Decimal),
}

/// Selections a calculation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorContext {
    pub regime: Regime,
    /// RESICO table selection.
    pub period: Period,
    /// Cumulative month for Actividad Empresarial.
    pub month: Month,
    /// Persona Moral fiscal utility coefficient.
    pub utility_coefficient: Decimal,
}

impl Default for CalculatorContext {
    fn default() -> Self {
        Self {
            regime: Regime::default(),
            period: Period::default(),
            month: Month::default(),
            utility_coefficient: DEFAULT_UTILITY_COEFFICIENT,
        }
    }
}

/// Amounts for one calculation. Fields a regime does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationRequest {
    pub income: Decimal,
    pub deductions: Decimal,
    pub previous_losses: Decimal,
    pub withheld_isr: Decimal,
    pub provisional_payments: Decimal,
}

impl CalculationRequest {
    pub fn income(income: Decimal) -> Self {
        Self {
            income,
            ..Default::default()
        }
    }
}

impl CalculatorContext {
    pub fn for_regime(regime: Regime) -> Self {
        Self {
            regime,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        let coefficient = self.utility_coefficient;
        if coefficient <= Decimal::ZERO || coefficient > Decimal::ONE {
            return Err(ContextError::InvalidCoefficient(coefficient));
        }
        if coefficient.normalize().scale() > 4 {
            return Err(ContextError::CoefficientPrecision(coefficient));
        }
        Ok(())
    }

    /// Simple calculation for the selected regime.
    ///
    /// Persona Moral estimates its fiscal utility from income through the
    /// utility coefficient; deductions are only used by Actividad Empresarial.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use isr_core::context::{CalculationRequest, CalculatorContext};
    /// use isr_core::tables::TaxTables;
    /// use isr_core::Regime;
    ///
    /// let tables = TaxTables::default();
    /// let context = CalculatorContext::for_regime(Regime::PersonaMoral);
    /// let result = context.calculate(&tables, &CalculationRequest::income(dec!(1250000)));
    ///
    /// // 1,250,000 × 0.2360 × 30 %
    /// assert_eq!(result.tax, dec!(88500.00));
    /// ```
    pub fn calculate(
        &self,
        tables: &TaxTables,
        request: &CalculationRequest,
    ) -> CalculationResult {
        debug!(regime = self.regime.as_str(), income = %request.income, "dispatching calculation");

        match self.regime {
            Regime::Resico => ResicoCalculator::new(tables).calculate(request.income, self.period),
            Regime::ActividadEmpresarial => EmpresarialCalculator::new(tables).calculate(
                request.income,
                request.deductions,
                self.month,
            ),
            Regime::PersonaMoral => {
                let calculator = MoralCalculator::new(tables);
                let utility =
                    calculator.utility_from_coefficient(request.income, self.utility_coefficient);
                calculator.calculate(utility)
            }
        }
    }

    /// Advanced calculation for the selected regime.
    pub fn calculate_advanced(
        &self,
        tables: &TaxTables,
        request: &CalculationRequest,
    ) -> AdvancedCalculationResult {
        debug!(
            regime = self.regime.as_str(),
            income = %request.income,
            "dispatching advanced calculation"
        );

        match self.regime {
            Regime::Resico => ResicoCalculator::new(tables).calculate_advanced(
                &ResicoAdvancedInput {
                    total_income: request.income,
                    withheld_isr: request.withheld_isr,
                    provisional_payments: request.provisional_payments,
                    withheld_iva: Decimal::ZERO,
                },
                self.period,
            ),
            Regime::ActividadEmpresarial => EmpresarialCalculator::new(tables).calculate_advanced(
                &EmpresarialAdvancedInput {
                    total_income: request.income,
                    total_deductions: request.deductions,
                    provisional_payments: request.provisional_payments,
                    withheld_isr: request.withheld_isr,
                },
                self.month,
            ),
            Regime::PersonaMoral => MoralCalculator::new(tables).calculate_advanced(
                &MoralAdvancedInput {
                    total_income: request.income,
                    total_deductions: request.deductions,
                    previous_losses: request.previous_losses,
                    provisional_payments: request.provisional_payments,
                    withheld_isr: request.withheld_isr,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_context() {
        let context = CalculatorContext::default();

        assert_eq!(context.regime, Regime::Resico);
        assert_eq!(context.period, Period::Annual);
        assert_eq!(context.month, Month::DECEMBER);
        assert_eq!(context.utility_coefficient, dec!(0.2360));
        assert_eq!(context.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_out_of_range_coefficient() {
        let context = CalculatorContext {
            utility_coefficient: dec!(1.5),
            ..Default::default()
        };

        assert_eq!(
            context.validate(),
            Err(ContextError::InvalidCoefficient(dec!(1.5)))
        );
    }

    #[test]
    fn validate_rejects_excess_precision() {
        let context = CalculatorContext {
            utility_coefficient: dec!(0.23605),
            ..Default::default()
        };

        assert_eq!(
            context.validate(),
            Err(ContextError::CoefficientPrecision(dec!(0.23605)))
        );
    }

    #[test]
    fn dispatches_resico_by_period() {
        let tables = TaxTables::default();
        let context = CalculatorContext {
            period: Period::Monthly,
            ..Default::default()
        };

        let result = context.calculate(&tables, &CalculationRequest::income(dec!(30000)));

        assert_eq!(result.rate, dec!(1.1));
    }

    #[test]
    fn dispatches_empresarial_with_deductions() {
        let tables = TaxTables::default();
        let context = CalculatorContext::for_regime(Regime::ActividadEmpresarial);
        let request = CalculationRequest {
            income: dec!(3000000),
            deductions: dec!(2160000),
            ..Default::default()
        };

        let result = context.calculate(&tables, &request);

        assert_eq!(result.tax, dec!(185603.84));
    }

    #[test]
    fn advanced_moral_uses_deductions_not_coefficient() {
        let tables = TaxTables::default();
        let context = CalculatorContext::for_regime(Regime::PersonaMoral);
        let request = CalculationRequest {
            income: dec!(5000000),
            deductions: dec!(3820000),
            ..Default::default()
        };

        let result = context.calculate_advanced(&tables, &request);

        assert_eq!(result.gross_isr, dec!(354000.00));
    }

    #[test]
    fn deserializes_partial_config() {
        let context: CalculatorContext =
            serde_json::from_str(r#"{"regime":"persona_moral","month":6}"#).unwrap();

        assert_eq!(context.regime, Regime::PersonaMoral);
        assert_eq!(context.month, Month::new(6).unwrap());
        assert_eq!(context.period, Period::Annual);
    }
}
