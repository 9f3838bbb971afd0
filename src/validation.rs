use crate::{
    constants::{
        DEFAULT_NAME_SUFFIX, MAX_NAME_LENGTH, MAX_REGISTER_YEARS, MIN_NAME_LENGTH,
        MIN_REGISTER_YEARS,
    },
    error::{NameServiceError, Result},
};

/// Trims, lowercases and drops a trailing `.carv` suffix.
///
/// Only ASCII letters are folded. Anything else is left as typed so that
/// validation still sees it.
pub fn normalize_name(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.strip_suffix(DEFAULT_NAME_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

/// Accepts 3–64 characters from `[a-z0-9-]`. Anything non-ASCII is rejected
/// rather than guessing whether to count bytes or code points.
pub fn validate_name(name: &str) -> Result<()> {
    if !name.is_ascii() {
        return Err(NameServiceError::InvalidName);
    }
    if name.len() < MIN_NAME_LENGTH || name.len() > MAX_NAME_LENGTH {
        return Err(NameServiceError::InvalidName);
    }
    if !name
        .bytes()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-')
    {
        return Err(NameServiceError::InvalidName);
    }
    Ok(())
}

pub fn validate_years(years: u8) -> Result<()> {
    if !(MIN_REGISTER_YEARS..=MAX_REGISTER_YEARS).contains(&years) {
        return Err(NameServiceError::InvalidYears(years));
    }
    Ok(())
}

/// Normalizes then validates user input, returning the canonical name.
pub fn canonical_name(raw: &str) -> Result<String> {
    let name = normalize_name(raw);
    validate_name(&name)?;
    Ok(name)
}

/// Yearly price in whole CARV, tiered by length.
pub fn price_per_year(name: &str) -> u64 {
    match name.chars().count() {
        0..=2 => 0,
        3 => 1600,
        4 => 400,
        5 => 200,
        6 => 100,
        _ => 20,
    }
}

pub fn total_price(name: &str, years: u8) -> u64 {
    price_per_year(name) * u64::from(years)
}

/// `alice` -> `alice.carv`
pub fn full_label(name: &str) -> String {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return String::new();
    }
    format!("{normalized}{DEFAULT_NAME_SUFFIX}")
}
