//! Static currency reference data and symbol lookup.

use serde::Serialize;

/// Reference data for a supported currency. Loaded once as compiled-in
/// constants; never mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    /// ISO 4217 code (e.g. "USD")
    pub code: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Display symbol (e.g. "$", "A$")
    pub symbol: &'static str,
    /// Flag glyph for display
    pub flag: &'static str,
}

/// All currencies the system knows about.
pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", name: "US Dollar", symbol: "$", flag: "🇺🇸" },
    CurrencyInfo { code: "EUR", name: "Euro", symbol: "€", flag: "🇪🇺" },
    CurrencyInfo { code: "GBP", name: "British Pound", symbol: "£", flag: "🇬🇧" },
    CurrencyInfo { code: "JPY", name: "Japanese Yen", symbol: "¥", flag: "🇯🇵" },
    CurrencyInfo { code: "AUD", name: "Australian Dollar", symbol: "A$", flag: "🇦🇺" },
    CurrencyInfo { code: "CAD", name: "Canadian Dollar", symbol: "C$", flag: "🇨🇦" },
    CurrencyInfo { code: "CHF", name: "Swiss Franc", symbol: "CHF", flag: "🇨🇭" },
    CurrencyInfo { code: "CNY", name: "Chinese Yuan", symbol: "¥", flag: "🇨🇳" },
    CurrencyInfo { code: "INR", name: "Indian Rupee", symbol: "₹", flag: "🇮🇳" },
    CurrencyInfo { code: "BRL", name: "Brazilian Real", symbol: "R$", flag: "🇧🇷" },
    CurrencyInfo { code: "MXN", name: "Mexican Peso", symbol: "$", flag: "🇲🇽" },
    CurrencyInfo { code: "TRY", name: "Turkish Lira", symbol: "₺", flag: "🇹🇷" },
    CurrencyInfo { code: "ARS", name: "Argentine Peso", symbol: "$", flag: "🇦🇷" },
    CurrencyInfo { code: "PHP", name: "Philippine Peso", symbol: "₱", flag: "🇵🇭" },
    CurrencyInfo { code: "IDR", name: "Indonesian Rupiah", symbol: "Rp", flag: "🇮🇩" },
    CurrencyInfo { code: "THB", name: "Thai Baht", symbol: "฿", flag: "🇹🇭" },
    CurrencyInfo { code: "VND", name: "Vietnamese Dong", symbol: "₫", flag: "🇻🇳" },
    CurrencyInfo { code: "ZAR", name: "South African Rand", symbol: "R", flag: "🇿🇦" },
    CurrencyInfo { code: "RUB", name: "Russian Ruble", symbol: "₽", flag: "🇷🇺" },
    CurrencyInfo { code: "PLN", name: "Polish Zloty", symbol: "zł", flag: "🇵🇱" },
];

/// Symbol-to-code pairs checked longest symbol first, so that a short
/// symbol never shadows a longer one containing it ("$" vs "A$").
/// Symbols shared by several currencies resolve to the first entry
/// carrying them ("$" is USD, "¥" is JPY).
pub const SYMBOL_TABLE: &[(&str, &str)] = &[
    ("CHF", "CHF"),
    ("A$", "AUD"),
    ("C$", "CAD"),
    ("R$", "BRL"),
    ("Rp", "IDR"),
    ("zł", "PLN"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₺", "TRY"),
    ("₱", "PHP"),
    ("₫", "VND"),
    ("฿", "THB"),
    ("₽", "RUB"),
    ("R", "ZAR"),
];

/// Looks up reference data by ISO code (case-insensitive).
pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Returns true if the code is in the registry.
pub fn is_known(code: &str) -> bool {
    lookup(code).is_some()
}

/// Resolves a currency code from a symbol prefix ("€", "A$ ", "R$").
///
/// Checks the ordered table so multi-character symbols win over their
/// single-character substrings.
pub fn code_for_symbol(prefix: &str) -> Option<&'static str> {
    SYMBOL_TABLE.iter().find(|(symbol, _)| prefix.contains(symbol)).map(|(_, code)| *code)
}

/// Returns the flag glyph for a currency code, or a neutral flag.
pub fn flag(code: &str) -> &'static str {
    lookup(code).map(|c| c.flag).unwrap_or("🏳️")
}

/// Returns the display symbol for a currency code, or the code itself.
pub fn symbol(code: &str) -> &'static str {
    lookup(code).map(|c| c.symbol).unwrap_or("")
}
