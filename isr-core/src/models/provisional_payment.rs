use rust_decimal::Decimal;
use serde::Serialize;

use super::Month;

/// One row of a Persona Moral provisional payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionalPayment {
    pub month: Month,
    pub accumulated_income: Decimal,
    /// Accumulated income times the utility coefficient.
    pub estimated_utility: Decimal,
    pub determined_isr: Decimal,
    /// Sum of the payments made in earlier months.
    pub previous_payments: Decimal,
    pub isr_to_pay: Decimal,
}
