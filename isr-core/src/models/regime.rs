use serde::{Deserialize, Serialize};

/// Fiscal regime a calculation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    #[default]
    Resico,
    ActividadEmpresarial,
    PersonaMoral,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resico => "RESICO",
            Self::ActividadEmpresarial => "EMPRESARIAL",
            Self::PersonaMoral => "MORAL",
        }
    }

    /// Accepts the short codes (`RESICO`, `EMPRESARIAL`, `MORAL`) in any case,
    /// plus the snake_case names used in config files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RESICO" => Some(Self::Resico),
            "EMPRESARIAL" | "ACTIVIDAD_EMPRESARIAL" => Some(Self::ActividadEmpresarial),
            "MORAL" | "PERSONA_MORAL" => Some(Self::PersonaMoral),
            _ => None,
        }
    }

    pub fn all() -> &'static [Regime] {
        &[
            Regime::Resico,
            Regime::ActividadEmpresarial,
            Regime::PersonaMoral,
        ]
    }

    /// Descriptive entry for this regime.
    pub fn config(&self) -> &'static RegimeConfig {
        match self {
            Self::Resico => &REGIMES[0],
            Self::ActividadEmpresarial => &REGIMES[1],
            Self::PersonaMoral => &REGIMES[2],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeConfig {
    pub regime: Regime,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub characteristics: &'static [&'static str],
}

pub const REGIMES: [RegimeConfig; 3] = [
    RegimeConfig {
        regime: Regime::Resico,
        title: "RESICO",
        subtitle: "Persona Física",
        characteristics: &[
            "Ingresos máximos: $3,500,000 anuales",
            "Tasas reducidas del 1% al 2.5%",
            "Cálculo directo sobre ingresos",
            "No hay deducciones personales",
        ],
    },
    RegimeConfig {
        regime: Regime::ActividadEmpresarial,
        title: "Actividad Empresarial",
        subtitle: "Persona Física",
        characteristics: &[
            "Para personas físicas con actividad empresarial",
            "Permite deducciones autorizadas",
            "Tasas progresivas del 1.92% al 35%",
            "Cálculo sobre base gravable",
        ],
    },
    RegimeConfig {
        regime: Regime::PersonaMoral,
        title: "Persona Moral",
        subtitle: "Régimen General",
        characteristics: &[
            "Tasa general del 30% sobre utilidad fiscal",
            "Aplica para empresas y sociedades",
            "Permite deducciones autorizadas",
            "Régimen general del SAT",
        ],
    },
];
