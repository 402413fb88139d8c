use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

/// Integer digits allowed in amounts, caps and rates.
pub(crate) const MAX_INTEGER_DIGITS: u32 = 12;

/// True when `value` has at most [`MAX_INTEGER_DIGITS`] integer digits.
pub(crate) fn within_limit(value: Decimal) -> bool {
    value.abs() < Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS))
}

/// Display currencies. Amounts are stored in [`Currency::BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Currency {
    Rwf,
    Usd,
    Eur,
}

impl Currency {
    pub(crate) const BASE: Currency = Currency::Rwf;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Rwf => "RWF",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RWF" => Some(Self::Rwf),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [Currency] {
        &[Self::Rwf, Self::Usd, Self::Eur]
    }

    pub(crate) fn is_base(&self) -> bool {
        *self == Self::BASE
    }

    /// Multiplier against the base currency used when no override is set.
    pub(crate) fn default_rate(&self) -> Decimal {
        match self {
            Self::Rwf => Decimal::ONE,
            Self::Usd => Decimal::new(93, 5),
            Self::Eur => Decimal::new(85, 5),
        }
    }

    /// The currency after this one, wrapping around. Used by the settings form.
    pub(crate) fn cycle(&self, delta: i32) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0) as i32;
        let len = all.len() as i32;
        all[(idx + delta).rem_euclid(len) as usize]
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cap, display currency and conversion rates.
///
/// `rates` always holds an entry for every [`Currency`], and the base rate is always 1.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    /// Spending ceiling in base currency. Zero means "no cap".
    pub(crate) cap: Decimal,
    pub(crate) currency: Currency,
    rates: BTreeMap<Currency, Decimal>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cap: Decimal::ZERO,
            currency: Currency::BASE,
            rates: Currency::all()
                .iter()
                .map(|c| (*c, c.default_rate()))
                .collect(),
        }
    }
}

impl Settings {
    pub(crate) fn rate(&self, currency: Currency) -> Decimal {
        self.rates
            .get(&currency)
            .copied()
            .unwrap_or_else(|| currency.default_rate())
    }

    pub(crate) fn rates(&self) -> &BTreeMap<Currency, Decimal> {
        &self.rates
    }

    /// Set a rate if it is positive and within [`MAX_INTEGER_DIGITS`].
    /// The base rate cannot be changed. Returns whether the rate was applied.
    pub(crate) fn set_rate(&mut self, currency: Currency, rate: Decimal) -> bool {
        if currency.is_base() || rate <= Decimal::ZERO || !within_limit(rate) {
            return false;
        }
        self.rates.insert(currency, rate);
        true
    }

    /// Convert a base-currency amount into the display currency, rounded to cents.
    pub(crate) fn convert(&self, base_amount: Decimal) -> Decimal {
        base_amount
            .saturating_mul(self.rate(self.currency))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Two-decimal display value without the currency code, e.g. `"0.06"`.
    pub(crate) fn display_value(&self, base_amount: Decimal) -> String {
        format!("{:.2}", self.convert(base_amount))
    }

    /// Display value with the currency code, e.g. `"USD 0.06"`.
    pub(crate) fn format_money(&self, base_amount: Decimal) -> String {
        format!("{} {}", self.currency, self.display_value(base_amount))
    }
}
