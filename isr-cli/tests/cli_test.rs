//! End-to-end tests: parse arguments, build the session and render into a buffer.

use std::path::PathBuf;

use clap::Parser;
use isr_cli::cli::Cli;
use isr_cli::commands::Session;
use isr_cli::config::Config;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn try_run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("isr").chain(args.iter().copied()))?;
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let session = Session::from_config(&config)?;

    let mut out = Vec::new();
    cli.run(&session, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn run(args: &[&str]) -> String {
    try_run(args).expect("command should succeed")
}

fn json(args: &[&str]) -> Value {
    serde_json::from_str(&run(args)).expect("output should be JSON")
}

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimals serialize as strings")
        .parse()
        .expect("valid decimal")
}

// ===== RESICO tests =====

#[test]
fn test_resico_first_bracket() {
    let text = run(&["resico", "300000"]);

    assert!(text.starts_with("RESICO (anual)"));
    assert!(text.contains("Tramo:                $0.01 - $300,000.00"));
    assert!(text.contains("ISR:                  $3,000.00"));
    assert!(text.contains("Ingreso neto:         $297,000.00"));
}

#[test]
fn test_resico_accepts_formatted_amounts() {
    let text = run(&["resico", "$300,000.00"]);

    assert!(text.contains("ISR:                  $3,000.00"));
}

#[test]
fn test_resico_json() {
    let value = json(&["resico", "300000", "--json"]);

    assert_eq!(decimal(&value["tax"]), dec!(3000));
    assert_eq!(value["bracket"], "$0.01 - $300,000.00");
}

#[test]
fn test_resico_over_ceiling_warns() {
    let text = run(&["resico", "3500000.01"]);

    assert!(text.contains("Excede límite RESICO"));
    assert!(text.contains("Aviso: el ingreso supera el límite de $3,500,000.00"));
}

#[test]
fn test_resico_negative_income_is_not_applicable() {
    let value = json(&["resico", "-5", "--json"]);

    assert_eq!(value["bracket"], "N/A");
    assert_eq!(decimal(&value["tax"]), Decimal::ZERO);
}

#[test]
fn test_resico_monthly_period() {
    let value = json(&["resico", "30000", "--period", "mensual", "--json"]);

    assert_eq!(decimal(&value["rate"]), dec!(1.1));
    assert_eq!(decimal(&value["tax"]), dec!(330));
}

#[test]
fn test_resico_advanced_favor_balance() {
    let text = run(&[
        "resico",
        "300000",
        "--advanced",
        "--withheld-isr",
        "3000",
        "--provisional-payments",
        "500",
    ]);

    assert!(text.contains("ISR causado:          $3,000.00"));
    assert!(text.contains("Saldo a favor:        $500.00"));
}

#[test]
fn test_invalid_amount_is_rejected() {
    let err = try_run(&["resico", "trescientos mil"]).unwrap_err();

    assert!(err.to_string().contains("trescientos mil"));
}

// ===== Actividad Empresarial tests =====

#[test]
fn test_empresarial_december() {
    let text = run(&["empresarial", "3000000", "--deductions", "2160000", "--month", "12"]);

    assert!(text.contains("enero a diciembre"));
    assert!(text.contains("Tramo:                $590,796.12 - $1,127,926.80"));
    assert!(text.contains("ISR:                  $185,603.84"));
    assert!(text.contains("Ingreso neto:         $654,396.16"));
}

#[test]
fn test_empresarial_advanced_json() {
    let value = json(&[
        "empresarial",
        "3000000",
        "-d",
        "2160000",
        "--advanced",
        "--withheld-isr",
        "5000",
        "--provisional-payments",
        "150000",
        "--json",
    ]);

    assert_eq!(decimal(&value["taxable_base"]), dec!(840000));
    assert_eq!(decimal(&value["final_isr"]), dec!(30603.84));
    assert_eq!(value["is_favor_balance"], false);
}

#[test]
fn test_empresarial_warns_on_excessive_deductions() {
    let text = run(&["empresarial", "100000", "-d", "99000"]);

    assert!(text.contains("Aviso: las deducciones superan el 95% del ingreso"));
    assert!(text.contains("$80,000.00"));
}

#[test]
fn test_empresarial_advanced_zero_base_returns_credits() {
    let value = json(&[
        "empresarial",
        "1000",
        "-d",
        "2000",
        "--advanced",
        "--provisional-payments",
        "500",
        "--json",
    ]);

    assert_eq!(value["bracket"], "Base gravable negativa o cero");
    assert_eq!(decimal(&value["final_isr"]), dec!(500));
    assert_eq!(value["is_favor_balance"], true);
}

#[test]
fn test_empresarial_deductions_exceeding_income() {
    let value = json(&["empresarial", "100000", "-d", "150000", "--json"]);

    assert_eq!(value["bracket"], "Base gravable negativa o cero");
}

// ===== Persona Moral tests =====

#[test]
fn test_moral_uses_utility_coefficient() {
    let text = run(&["moral", "5000000"]);

    assert!(text.contains("Tramo:                Tasa General"));
    assert!(text.contains("ISR:                  $354,000.00"));
    assert!(text.contains("Utilidad fiscal estimada: $1,180,000.00 (coeficiente 23.60%)"));
}

#[test]
fn test_moral_with_deductions_and_losses() {
    let value = json(&["moral", "1000000", "-d", "600000", "-l", "100000", "--json"]);

    assert_eq!(decimal(&value["tax"]), dec!(90000));
    assert_eq!(decimal(&value["net_income"]), dec!(210000));
}

#[test]
fn test_moral_advanced_zero_base_returns_credits() {
    let text = run(&[
        "moral",
        "100000",
        "-d",
        "200000",
        "--advanced",
        "--provisional-payments",
        "1200",
    ]);

    assert!(text.contains("Base gravable:        $0.00"));
    assert!(text.contains("Saldo a favor:        $1,200.00"));
}

#[test]
fn test_moral_rejects_bad_coefficient() {
    assert!(try_run(&["moral", "1000000", "--coefficient", "1.5"]).is_err());
}

#[test]
fn test_moral_coefficient_conflicts_with_deductions() {
    for extra in [&["-d", "1000"][..], &["-l", "1000"], &["--advanced"]] {
        let mut args = vec!["moral", "1000000", "--coefficient", "0.5"];
        args.extend_from_slice(extra);

        let err = try_run(&args).unwrap_err();

        assert!(err.to_string().contains("cannot be used with"), "{err}");
    }
}

#[test]
fn test_provisional_schedule() {
    let text = run(&["provisional", "100000", "100000", "50000"]);

    assert!(text.contains("Enero"));
    assert!(text.contains("$7,080.00"));
    assert!(text.contains("$3,540.00"));
    assert!(text.contains("$17,700.00"));
}

#[test]
fn test_provisional_schedule_json() {
    let value = json(&["provisional", "100000", "100000", "50000", "--json"]);
    let rows = value.as_array().expect("schedule is an array");

    assert_eq!(rows.len(), 3);
    assert_eq!(decimal(&rows[1]["previous_payments"]), dec!(7080));
    assert_eq!(decimal(&rows[2]["isr_to_pay"]), dec!(3540));
}

#[test]
fn test_provisional_rejects_thirteen_months() {
    let mut args = vec!["provisional"];
    args.extend(["1000"; 13]);

    let err = try_run(&args).unwrap_err();

    assert!(err.to_string().contains("12 months"));
}

// ===== projection tests =====

#[test]
fn test_project_annual_and_month_payment() {
    let text = run(&["project", "25000", "--month", "3"]);

    assert!(text.contains("ISR:                  $3,000.00"));
    assert!(text.contains("Pago de marzo: $375.00 (acumulado: $1,125.00)"));
    assert!(!text.contains("no es elegible"));
}

#[test]
fn test_amounts_above_ceiling_are_rejected() {
    let err = try_run(&["project", "79228162514264337593543950335"]).unwrap_err();

    assert!(err.to_string().contains("ceiling"));
}

#[test]
fn test_project_largest_accepted_amount() {
    let value = json(&["project", "999999999.99", "--json"]);

    assert_eq!(value["eligible"], false);
    assert_eq!(value["annual"]["bracket"], "Excede límite RESICO");
}

#[test]
fn test_project_flags_ineligible_income() {
    let value = json(&["project", "300000", "--json"]);

    assert_eq!(value["eligible"], false);
    assert_eq!(value["annual"]["bracket"], "Excede límite RESICO");
}

// ===== tables and regimes tests =====

#[test]
fn test_tables_filtered_by_regime() {
    let text = run(&["tables", "--regime", "moral"]);

    assert_eq!(text, "Persona Moral: tasa general 30.00%\n");
}

#[test]
fn test_tables_cumulative_empresarial() {
    let value = json(&["tables", "-r", "empresarial", "-m", "12", "--json"]);
    let brackets = value["empresarial"].as_array().expect("brackets");

    assert_eq!(brackets.len(), 11);
    assert_eq!(decimal(&brackets[7]["min"]), dec!(590796.12));
    assert!(value.get("resico_annual").is_none());
}

#[test]
fn test_regimes_listing() {
    let text = run(&["regimes"]);

    assert!(text.contains("RESICO - Persona Física [RESICO]"));
    assert!(text.contains("Persona Moral - Régimen General [MORAL]"));
    assert!(text.contains("  • Tasa general del 30% sobre utilidad fiscal"));
}

// ===== config tests =====

#[test]
fn test_config_overrides_tables_and_defaults() {
    let config = fixture("config.toml");

    let resico = run(&["--config", &config, "resico", "300000"]);
    let moral = json(&["--config", &config, "moral", "1000000", "--json"]);
    let calc = run(&["calc", "1000000", "--config", &config]);

    assert!(resico.contains("ISR:                  $6,000.00"));
    assert_eq!(decimal(&moral["tax"]), dec!(90000));
    assert!(calc.starts_with("Persona Moral"));
    assert!(calc.contains("ISR:                  $90,000.00"));
}

#[test]
fn test_config_default_month() {
    let text = run(&["tables", "--regime", "empresarial", "--config", &fixture("config.toml")]);

    assert!(text.contains("acumulada enero a junio"));
}

#[test]
fn test_missing_config_file_fails() {
    let err = try_run(&["--config", &fixture("missing.toml"), "regimes"]).unwrap_err();

    assert!(err.to_string().contains("cannot read config file"));
}

#[test]
fn test_calc_with_regime_override() {
    let value = json(&["calc", "3000000", "-r", "empresarial", "-d", "2160000", "--json"]);

    assert_eq!(decimal(&value["tax"]), dec!(185603.84));
}

// ===== batch tests =====

#[test]
fn test_batch_table() {
    let text = run(&["batch", &fixture("batch.csv")]);

    assert!(text.contains("Excede límite RESICO"));
    assert!(text.contains("$30,603.84 a pagar"));
    assert!(text.contains("$1,200.00 a favor"));
}

#[test]
fn test_batch_json() {
    let value = json(&["batch", &fixture("batch.csv"), "--json"]);
    let rows = value.as_array().expect("batch output is an array");

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["regime"], "resico");
    assert_eq!(decimal(&rows[0]["result"]["gross_isr"]), dec!(3000));
    assert_eq!(rows[2]["regime"], "actividad_empresarial");
    assert_eq!(decimal(&rows[2]["result"]["final_isr"]), dec!(30603.84));
    assert_eq!(rows[3]["result"]["is_favor_balance"], true);
}

#[test]
fn test_batch_reports_bad_rows() {
    let err = try_run(&["batch", &fixture("bad_batch.csv")]).unwrap_err();

    assert!(format!("{err:#}").contains("unrecognised regime 'ASALARIADO' on row 1"));
}
