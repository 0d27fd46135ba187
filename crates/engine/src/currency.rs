use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code carried by cheques and movements.
///
/// The treasury is effectively mono-currency (default `ARS`); the engine still
/// models currency explicitly so mixed-currency input is rejected instead of
/// silently summed.
///
/// ## Minor units
///
/// Monetary values are stored as an `i64` number of **minor units**.
/// `minor_units()` returns how many decimal digits separate minor from major
/// units, e.g. `10.50 ARS` ⇄ `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ars,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Ars | Currency::Usd => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ARS" => Ok(Currency::Ars),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::Validation(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
