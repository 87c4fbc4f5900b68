/// Currency code substituted when a record carries none.
pub const DEFAULT_CURRENCY: &str = "ARS";

/// Format an amount using the product's regional convention (es-AR):
/// dot thousands separators, comma decimals, currency code prefix.
/// An empty or blank code falls back to [`DEFAULT_CURRENCY`].
pub fn currency(amount: f64, code: &str) -> String {
    let trimmed = code.trim();
    let code = if trimmed.is_empty() { DEFAULT_CURRENCY } else { trimmed };

    let negative = amount < 0.0;
    let cents = format!("{:.2}", amount.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{code} {grouped},{dec_part}")
    } else {
        format!("{code} {grouped},{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting() {
        assert_eq!(currency(1234.56, "ARS"), "ARS 1.234,56");
        assert_eq!(currency(0.0, "ARS"), "ARS 0,00");
        assert_eq!(currency(1000000.99, "ARS"), "ARS 1.000.000,99");
        assert_eq!(currency(-500.0, "ARS"), "-ARS 500,00");
    }

    #[test]
    fn test_currency_default_code() {
        assert_eq!(currency(1500.0, ""), "ARS 1.500,00");
        assert_eq!(currency(1500.0, "  "), "ARS 1.500,00");
    }

    #[test]
    fn test_currency_explicit_code() {
        assert_eq!(currency(1500.0, "USD"), "USD 1.500,00");
        assert_eq!(currency(42.1, "EUR"), "EUR 42,10");
    }
}
