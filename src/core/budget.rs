/// Price a row is assumed to carry when the catalog has no parsable MSRP.
///
/// High enough that unpriced rows only pass extreme slack-adjusted
/// ceilings; missing price is never treated as free.
pub const UNPRICED_SENTINEL: f64 = 99_999.0;

/// Parse a free-text budget answer into a numeric ceiling.
///
/// Tolerant by design: currency symbols and thousands separators are
/// stripped, the first integer literal wins, and a trailing `k` multiplies
/// by 1000. `"under $50k, maybe less"` parses to 50000. Returns `None`
/// when no number can be found; the caller falls back to its configured
/// default ceiling.
pub fn parse_budget_ceiling(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();

    let bytes = cleaned.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(bytes.len());

    let value: f64 = cleaned[start..end].parse().ok()?;

    let has_k_suffix = cleaned[end..]
        .chars()
        .next()
        .map(|c| c == 'k' || c == 'K')
        .unwrap_or(false);

    if has_k_suffix {
        Some(value * 1000.0)
    } else {
        Some(value)
    }
}

/// Derive the numeric MSRP bounds from a catalog range string.
///
/// Accepts `"$<min>"` or `"$<min> - $<max>"` with comma separators and
/// optional whitespace around the dash. Text without a dollar figure
/// yields `(None, None)`: the minimum price is unknown, not zero.
pub fn parse_msrp_bounds(text: &str) -> (Option<f64>, Option<f64>) {
    let mut figures = dollar_figures(text);
    let min = figures.next();
    let max = figures.next().or(min);
    (min, max)
}

/// Iterate the dollar figures (`$12,345`) embedded in a string.
fn dollar_figures(text: &str) -> impl Iterator<Item = f64> + '_ {
    text.split('$').skip(1).filter_map(|segment| {
        let digits: String = segment
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == ',')
            .filter(|c| *c != ',')
            .collect();
        digits.parse().ok()
    })
}
