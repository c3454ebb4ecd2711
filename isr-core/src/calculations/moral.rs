//! Persona Moral calculations.
//!
//! Legal entities pay a flat rate (30 %) over their fiscal utility. The annual
//! taxable base is income − deductions − previous losses, floored at zero.
//! During the year, provisional payments are estimated from accumulated income
//! through a utility coefficient.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{as_percent, non_negative, round_half_up, settle, taxable_base};
use crate::models::{
    AdvancedCalculationResult, BracketLabel, CalculationResult, Month, MoralAdvancedInput,
    ProvisionalPayment,
};
use crate::tables::TaxTables;

/// Calculator for the Persona Moral regime.
#[derive(Debug, Clone)]
pub struct MoralCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> MoralCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Calculates ISR over a fiscal utility.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use isr_core::calculations::MoralCalculator;
    /// use isr_core::tables::TaxTables;
    ///
    /// let tables = TaxTables::default();
    /// let result = MoralCalculator::new(&tables).calculate(dec!(1180000));
    ///
    /// assert_eq!(result.tax, dec!(354000.00));
    /// assert_eq!(result.bracket.to_string(), "Tasa General");
    /// ```
    pub fn calculate(
        &self,
        utility: Decimal,
    ) -> CalculationResult {
        let utility = round_half_up(utility);
        if utility <= Decimal::ZERO {
            return CalculationResult::not_applicable();
        }

        let tax = round_half_up(utility * self.tables.moral_rate);
        debug!(utility = %utility, tax = %tax, "Persona Moral calculated");

        CalculationResult {
            tax,
            rate: as_percent(self.tables.moral_rate),
            bracket: BracketLabel::GeneralRate,
            net_income: utility - tax,
        }
    }

    /// Calculates ISR from income, deductions and previous losses.
    pub fn calculate_with_deductions(
        &self,
        income: Decimal,
        deductions: Decimal,
        previous_losses: Decimal,
    ) -> CalculationResult {
        if round_half_up(income) <= Decimal::ZERO {
            return CalculationResult::not_applicable();
        }

        let base = taxable_base(
            round_half_up(income),
            &[
                non_negative("deductions", deductions),
                non_negative("previous_losses", previous_losses),
            ],
        );
        if base <= Decimal::ZERO {
            return CalculationResult::non_positive_base();
        }

        self.calculate(base)
    }

    /// Fiscal utility estimated as `income × coefficient`.
    pub fn utility_from_coefficient(
        &self,
        income: Decimal,
        coefficient: Decimal,
    ) -> Decimal {
        round_half_up(
            non_negative("income", income)
                .saturating_mul(non_negative("utility_coefficient", coefficient)),
        )
    }

    /// Annual calculation netting provisional payments and withholding.
    ///
    /// A zero taxable base is not an error here: the gross ISR is zero and any
    /// credits become a favor balance.
    pub fn calculate_advanced(
        &self,
        input: &MoralAdvancedInput,
    ) -> AdvancedCalculationResult {
        let income = round_half_up(input.total_income);
        if income <= Decimal::ZERO {
            return AdvancedCalculationResult::empty();
        }

        let total_deductions = non_negative("total_deductions", input.total_deductions);
        let previous_losses = non_negative("previous_losses", input.previous_losses);
        let withheld_isr = non_negative("withheld_isr", input.withheld_isr);
        let provisional_payments = non_negative("provisional_payments", input.provisional_payments);

        let base = taxable_base(income, &[total_deductions, previous_losses]);
        let gross_isr = round_half_up(base * self.tables.moral_rate);
        let (final_isr, is_favor_balance) = settle(gross_isr, withheld_isr, provisional_payments);

        debug!(
            base = %base,
            gross_isr = %gross_isr,
            final_isr = %final_isr,
            is_favor_balance,
            "Persona Moral advanced calculated"
        );

        AdvancedCalculationResult {
            tax: final_isr,
            rate: as_percent(self.tables.moral_rate),
            bracket: BracketLabel::GeneralRate,
            net_income: base - gross_isr,
            gross_income: income,
            total_deductions,
            taxable_base: base,
            gross_isr,
            withheld_isr,
            provisional_payments,
            final_isr,
            is_favor_balance,
        }
    }

    /// Provisional payment schedule for the months in `monthly_incomes`,
    /// starting in January.
    ///
    /// Each month's ISR is determined over the accumulated income times the
    /// utility coefficient; the payment due is that amount less the payments
    /// already made, never negative. Months past December are ignored, and
    /// the schedule stops at the first month whose accumulated income is out
    /// of range.
    pub fn provisional_payment_schedule(
        &self,
        monthly_incomes: &[Decimal],
        coefficient: Decimal,
    ) -> Vec<ProvisionalPayment> {
        let mut accumulated_income = Decimal::ZERO;
        let mut previous_payments = Decimal::ZERO;

        Month::all()
            .zip(monthly_incomes)
            .map_while(|(month, income)| {
                let Some(total) =
                    accumulated_income.checked_add(non_negative("monthly_income", *income))
                else {
                    warn!(%month, "accumulated income out of range; schedule truncated");
                    return None;
                };
                accumulated_income = total;
                let estimated_utility = self.utility_from_coefficient(accumulated_income, coefficient);
                let determined_isr = round_half_up(estimated_utility * self.tables.moral_rate);
                let isr_to_pay = (determined_isr - previous_payments).max(Decimal::ZERO);

                let row = ProvisionalPayment {
                    month,
                    accumulated_income,
                    estimated_utility,
                    determined_isr,
                    previous_payments,
                    isr_to_pay,
                };
                previous_payments += isr_to_pay;
                Some(row)
            })
            .collect()
    }
}
