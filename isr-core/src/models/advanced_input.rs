use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResicoAdvancedInput {
    pub total_income: Decimal,
    pub withheld_isr: Decimal,
    pub provisional_payments: Decimal,
    /// Withheld VAT. Carried for reporting only; it does not affect ISR.
    pub withheld_iva: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmpresarialAdvancedInput {
    pub total_income: Decimal,
    pub total_deductions: Decimal,
    pub provisional_payments: Decimal,
    pub withheld_isr: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoralAdvancedInput {
    pub total_income: Decimal,
    pub total_deductions: Decimal,
    pub previous_losses: Decimal,
    pub provisional_payments: Decimal,
    pub withheld_isr: Decimal,
}
