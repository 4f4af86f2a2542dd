//! Damage / HP amounts typed by players, e.g. `1.5w`, `2k`, `3kw`, `1E`

/// Amount that is not a non-negative number with a known suffix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal amount: {0:?}")]
pub struct AmountParseError(pub String);

// Longer suffixes first so `kw` is not read as `w`
const SUFFIXES: &[(&str, f64)] = &[
    ("kw", 1e7),
    ("bw", 1e6),
    ("e", 1e8),
    ("w", 1e4),
    ("k", 1e3),
];

/// Parse an amount, truncating fractional results toward zero
///
/// Plain input must be an integer; suffixed input is read as a float and
/// multiplied by the suffix unit. Suffixes are case-insensitive.
pub fn parse_amount(input: &str) -> Result<i64, AmountParseError> {
    let text = input.trim();
    let err = || AmountParseError(input.to_string());
    let lower = text.to_ascii_lowercase();

    let value = match SUFFIXES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
    {
        Some((suffix, unit)) => {
            let number = text[..text.len() - suffix.len()].trim();
            let scaled = number.parse::<f64>().map_err(|_| err())? * unit;
            if !scaled.is_finite() || scaled < 0.0 || scaled >= i64::MAX as f64 {
                return Err(err());
            }
            scaled.trunc() as i64
        }
        None => text.parse::<i64>().map_err(|_| err())?,
    };

    if value < 0 {
        return Err(err());
    }
    Ok(value)
}
