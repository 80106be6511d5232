//! Ticker normalization.

/// Qualify a bare ticker with the configured exchange suffix.
///
/// Symbols that already carry an exchange (`TCS.NS`, `BRK.B`) or are indices
/// (`^NSEI`) are left alone, as is everything when `suffix` is empty.
pub fn normalize_ticker(symbol: &str, suffix: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if suffix.is_empty() || symbol.contains('.') || symbol.starts_with('^') {
        symbol
    } else {
        format!("{symbol}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix_to_bare_symbol() {
        assert_eq!(normalize_ticker("reliance", ".NS"), "RELIANCE.NS");
        assert_eq!(normalize_ticker("  TCS ", ".NS"), "TCS.NS");
    }

    #[test]
    fn leaves_qualified_symbols_alone() {
        assert_eq!(normalize_ticker("INFY.BO", ".NS"), "INFY.BO");
        assert_eq!(normalize_ticker("^NSEI", ".NS"), "^NSEI");
    }

    #[test]
    fn empty_suffix_is_passthrough() {
        assert_eq!(normalize_ticker("spy", ""), "SPY");
    }
}
