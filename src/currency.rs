use crate::Amount;

/// Conventions for writing numbers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Locale {
    /// `AU$ 1.234,56`
    #[default]
    EsCo,
    /// `AU$1,234.56`
    EnUs,
}

impl Locale {
    fn group_separator(self) -> char {
        match self {
            Locale::EsCo => '.',
            Locale::EnUs => ',',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Locale::EsCo => ',',
            Locale::EnUs => '.',
        }
    }

    fn symbol_separator(self) -> &'static str {
        match self {
            Locale::EsCo => " ",
            Locale::EnUs => "",
        }
    }
}

/// Formats monetary amounts with two decimals
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    locale: Locale,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("AU$", Locale::default())
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, locale: Locale) -> Self {
        Self { symbol: symbol.into(), locale }
    }

    /// The amount with currency symbol, e.g. `AU$ 1.234,56`
    pub fn money(&self, amount: Amount) -> String {
        format!("{}{}{}", self.symbol, self.locale.symbol_separator(), self.number(amount))
    }

    /// The amount without currency symbol, e.g. `1.234,56`
    pub fn number(&self, amount: Amount) -> String {
        let cents = amount
            .saturating_mul_int(100)
            .saturating_round()
            .to_num::<u64>();

        format!(
            "{}{}{:02}",
            self.integer(cents / 100),
            self.locale.decimal_separator(),
            cents % 100,
        )
    }

    /// A whole number with digit grouping, e.g. `12.345`
    pub fn integer(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.locale.group_separator());
            }
            grouped.push(digit);
        }

        grouped
    }
}
