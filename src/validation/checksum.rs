use crate::models::FILLER;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Numeric value of an MRZ character for check digit purposes.
fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A'..='Z' => Some(10 + (c as u32 - 'A' as u32)),
        FILLER => Some(0),
        _ => None,
    }
}

/// ICAO 9303 7-3-1 check digit of `value`, or `None` if it holds a
/// character that has no MRZ value.
pub fn compute_check_digit(value: &str) -> Option<u32> {
    value
        .chars()
        .enumerate()
        .try_fold(0u32, |sum, (i, c)| Some(sum + char_value(c)? * WEIGHTS[i % 3]))
        .map(|sum| sum % 10)
}

/// Whether `check_digit` matches `value`.
///
/// A filler check digit means no check digit was issued, which only holds
/// when the value itself is empty (all fillers).
pub fn is_value_valid(value: &str, check_digit: char) -> bool {
    if check_digit == FILLER {
        return value.chars().all(|c| c == FILLER);
    }
    match (check_digit.to_digit(10), compute_check_digit(value)) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}
