mod advanced_input;
mod calculation_result;
mod period;
mod provisional_payment;
mod regime;
mod tax_bracket;

pub use advanced_input::{EmpresarialAdvancedInput, MoralAdvancedInput, ResicoAdvancedInput};
pub use calculation_result::{AdvancedCalculationResult, BracketLabel, CalculationResult};
pub use period::{InvalidMonth, Month, ParsePeriodError, Period};
pub use provisional_payment::ProvisionalPayment;
pub use regime::{REGIMES, Regime, RegimeConfig};
pub use tax_bracket::{Bracket, TaxBracket, TaxBracketWithQuota, UNBOUNDED_MAX};
