/// Display currency. Only selects the symbol shown next to amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Inr,
}

impl Currency {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Inr => "INR",
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Jpy => "¥",
            Self::Inr => "₹",
        }
    }

    pub(crate) fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            "JPY" => Some(Self::Jpy),
            "INR" => Some(Self::Inr),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [Currency] {
        &[Self::Usd, Self::Eur, Self::Gbp, Self::Jpy, Self::Inr]
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.symbol())
    }
}

/// Symbol for a stored currency code. Unknown codes fall back to `$`.
pub(crate) fn symbol_for_code(code: &str) -> &'static str {
    Currency::parse(code).map_or("$", |c| c.symbol())
}
