//! Fake-value provider boundary.
//!
//! Generators only ask for opaque strings and calendar dates; everything
//! locale specific lives behind [`FakeProvider`].

mod adapter;
pub mod locales;

use chrono::NaiveDate;
use rand::RngCore;

pub use adapter::FakeRsAdapter;
pub use locales::LocaleKey;

/// Lower bound of every generated calendar date.
pub const EARLIEST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Source of locale-appropriate fake values.
pub trait FakeProvider: Send + Sync {
    fn locale(&self) -> LocaleKey;

    fn country(&self, rng: &mut dyn RngCore) -> String;

    fn region(&self, rng: &mut dyn RngCore) -> String;

    fn person_name(&self, rng: &mut dyn RngCore) -> String;

    /// Single-line postal address.
    fn address(&self, rng: &mut dyn RngCore) -> String;

    /// Free text of at most `max_chars` characters.
    fn text(&self, rng: &mut dyn RngCore, max_chars: usize) -> String;

    fn word(&self, rng: &mut dyn RngCore) -> String;

    fn company(&self, rng: &mut dyn RngCore) -> String;

    fn email(&self, rng: &mut dyn RngCore) -> String;

    /// Raw phone number as the locale formats it.
    fn phone_number(&self, rng: &mut dyn RngCore) -> String;

    /// Calendar date between 1970-01-01 and `until`, both inclusive.
    fn date(&self, rng: &mut dyn RngCore, until: NaiveDate) -> NaiveDate;
}
