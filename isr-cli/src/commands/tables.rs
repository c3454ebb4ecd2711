//! Tables command - prints the rate tables in use

use std::io::Write;

use anyhow::Result;
use clap::Args;
use isr_core::format::{format_currency, format_percentage};
use isr_core::{Month, Regime, TaxBracket, TaxBracketWithQuota};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Session, parse_month, parse_regime};
use crate::report;

#[derive(Args, Debug)]
pub struct TablesCommand {
    /// Only this regime (RESICO, EMPRESARIAL or MORAL)
    #[arg(short, long, value_parser = parse_regime)]
    regime: Option<Regime>,

    /// Month for the cumulative Actividad Empresarial table. Defaults to the configured month.
    #[arg(short, long, value_parser = parse_month)]
    month: Option<Month>,

    /// Output as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct TablesView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    resico_monthly: Option<&'a [TaxBracket]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resico_annual: Option<&'a [TaxBracket]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resico_max_income: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    empresarial: Option<Vec<TaxBracketWithQuota>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moral_rate: Option<Decimal>,
}

impl TablesCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut dyn Write,
    ) -> Result<()> {
        let month = self.month.unwrap_or(session.defaults.month);
        let tables = &session.tables;
        let wants = |regime: Regime| self.regime.is_none_or(|selected| selected == regime);

        let mut view = TablesView::default();
        if wants(Regime::Resico) {
            view.resico_monthly = Some(tables.resico_monthly.as_slice());
            view.resico_annual = Some(tables.resico_annual.as_slice());
            view.resico_max_income = Some(tables.resico_max_income);
        }
        if wants(Regime::ActividadEmpresarial) {
            view.empresarial = Some(tables.empresarial(month));
        }
        if wants(Regime::PersonaMoral) {
            view.moral_rate = Some(tables.moral_rate);
        }

        if self.json {
            return report::write_json(out, &view);
        }

        if let (Some(monthly), Some(annual)) = (view.resico_monthly, view.resico_annual) {
            report::write_flat_table(out, "RESICO mensual", monthly)?;
            report::write_flat_table(out, "RESICO anual", annual)?;
            writeln!(
                out,
                "Límite de ingresos RESICO: {}\n",
                format_currency(tables.resico_max_income, true)
            )?;
        }
        if let Some(empresarial) = &view.empresarial {
            let heading = format!(
                "Actividad Empresarial (acumulada enero a {})",
                month.name().to_lowercase()
            );
            report::write_quota_table(out, &heading, empresarial)?;
            writeln!(out)?;
        }
        if let Some(rate) = view.moral_rate {
            writeln!(out, "Persona Moral: tasa general {}", format_percentage(rate, 2))?;
        }
        Ok(())
    }
}
