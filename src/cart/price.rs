use crate::foundation::error::{StoryError, StoryResult};

/// Parse a displayed price such as `"₹850"` into whole currency units.
///
/// The currency symbol must prefix the amount and the remainder must be plain ASCII
/// digits. Anything else (a different symbol, thousands separators, decimals, trailing
/// text) is a [`StoryError::Price`] instead of a silently non-numeric total.
pub fn parse_price(displayed: &str, currency_symbol: &str) -> StoryResult<u64> {
    let trimmed = displayed.trim();
    let digits = trimmed.strip_prefix(currency_symbol).ok_or_else(|| {
        StoryError::price(format!(
            "'{displayed}' does not start with currency symbol '{currency_symbol}'"
        ))
    })?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoryError::price(format!(
            "'{displayed}' is not a whole amount after '{currency_symbol}'"
        )));
    }

    digits
        .parse::<u64>()
        .map_err(|e| StoryError::price(format!("'{displayed}' is out of range: {e}")))
}

/// Render an amount the way prices are displayed on the page.
pub fn format_price(amount: u64, currency_symbol: &str) -> String {
    format!("{currency_symbol}{amount}")
}

#[cfg(test)]
#[path = "../../tests/unit/cart/price.rs"]
mod tests;
