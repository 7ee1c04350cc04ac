//! Structural field rules shared by the table generators.

use chrono::{Duration, NaiveDate};
use rand::{Rng, RngCore};

/// Length of short random identifiers.
pub const SHORT_ID_LEN: usize = 15;
/// Width of free-text description columns.
pub const TEXT_MAX: usize = 100;
/// Width of `tienda.direccion`.
pub const STORE_ADDRESS_MAX: usize = 30;

const DNI_DIGITS: usize = 8;
const DNI_LETTERS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
const QUANTITY_SCALES: &[f64] = &[1.0, 10.0, 100.0];

/// First 15 hex characters of a random v4 UUID.
pub fn short_id(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let mut id = uuid::Uuid::from_bytes(bytes).simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Eight random digits followed by a letter from A to J.
pub fn dni(rng: &mut dyn RngCore) -> String {
    let mut value = String::with_capacity(DNI_DIGITS + 1);
    for _ in 0..DNI_DIGITS {
        let digit = rng.random_range(0..10_u32);
        value.push(char::from_digit(digit, 10).unwrap_or('0'));
    }
    value.push(DNI_LETTERS[rng.random_range(0..DNI_LETTERS.len())]);
    value
}

/// End of a date window: `start` plus one to eight whole weeks.
pub fn window_end(start: NaiveDate, rng: &mut dyn RngCore) -> NaiveDate {
    start + Duration::weeks(rng.random_range(1..=8))
}

/// Uniform pick among explicit outcomes, `None` included.
pub fn nullable_choice<T: Copy>(options: &[Option<T>], rng: &mut dyn RngCore) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    options[rng.random_range(0..options.len())]
}

/// Uniform pick from a pool the caller checked to be non-empty.
pub fn pick<'a, T>(pool: &'a [T], rng: &mut dyn RngCore) -> &'a T {
    &pool[rng.random_range(0..pool.len())]
}

/// Float in `[0, 1)` scaled by one of 1, 10 or 100.
pub fn scaled_quantity(rng: &mut dyn RngCore) -> f64 {
    let scale = QUANTITY_SCALES[rng.random_range(0..QUANTITY_SCALES.len())];
    rng.random::<f64>() * scale
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Strips the calling code and whitespace; empty results become `None`.
pub fn normalize_phone(raw: &str, calling_code: &str) -> Option<String> {
    let stripped = raw.replace(calling_code, "");
    let phone: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
    if phone.is_empty() { None } else { Some(phone) }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn short_id_is_fifteen_hex_chars() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let id = short_id(&mut rng);
        assert_eq!(id.len(), SHORT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn dni_has_digits_and_letter() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let value = dni(&mut rng);
            assert_eq!(value.len(), 9);
            assert!(value[..8].chars().all(|c| c.is_ascii_digit()));
            assert!(DNI_LETTERS.contains(&value.chars().last().unwrap()));
        }
    }

    #[test]
    fn window_end_stays_within_eight_weeks() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = NaiveDate::from_ymd_opt(2023, 12, 28).unwrap();
        for _ in 0..200 {
            let end = window_end(start, &mut rng);
            assert!(end >= start + Duration::weeks(1));
            assert!(end <= start + Duration::weeks(8));
            assert_eq!((end - start).num_days() % 7, 0);
        }
    }

    #[test]
    fn phone_loses_calling_code_and_spaces() {
        assert_eq!(
            normalize_phone("+34 612 345 678", "+34"),
            Some("612345678".to_string())
        );
        assert_eq!(normalize_phone(" ", "+1"), None);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("cafés", 4), "café");
        assert_eq!(truncate("abc", 30), "abc");
    }
}
