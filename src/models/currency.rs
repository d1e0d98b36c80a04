//! Display currency and conversion from the base currency.
//!
//! All amounts are persisted in Congolese francs (CDF). US dollars are a display
//! option only, converted with a fixed reference rate.

use serde::{Deserialize, Serialize};

/// Reference rate: francs per dollar.
pub const USD_TO_CDF_RATE: f64 = 2800.0;

/// Currency used to display (and enter) amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Congolese franc, the base currency
    #[default]
    Cdf,
    /// US dollar
    Usd,
}

impl Currency {
    /// Converts an amount entered in this currency to base currency.
    #[must_use]
    pub fn to_base(self, amount: f64) -> f64 {
        match self {
            Self::Cdf => amount,
            Self::Usd => amount * USD_TO_CDF_RATE,
        }
    }

    /// Converts a base-currency amount to this currency.
    #[must_use]
    pub fn from_base(self, amount_in_base: f64) -> f64 {
        match self {
            Self::Cdf => amount_in_base,
            Self::Usd => amount_in_base / USD_TO_CDF_RATE,
        }
    }

    /// Formats a base-currency amount for display, rounded to whole units with
    /// grouped thousands: `1 234 567 FC` or `$1,234,567`.
    #[must_use]
    pub fn format_amount(self, amount_in_base: f64) -> String {
        let value = self.from_base(amount_in_base).round();
        let sign = if value < 0.0 { "-" } else { "" };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = value.abs() as u64;

        match self {
            Self::Cdf => format!("{sign}{} FC", group_thousands(whole, '\u{202f}')),
            Self::Usd => format!("{sign}${}", group_thousands(whole, ',')),
        }
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
