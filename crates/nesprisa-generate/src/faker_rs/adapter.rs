use chrono::{Duration, NaiveDate};
use fake::Fake;
use fake::faker::address::raw::{
    BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode,
};
use fake::faker::company::raw::CompanyName;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::{Paragraph, Word};
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, PT_BR};
use rand::{Rng, RngCore};

use super::{EARLIEST_DATE, FakeProvider};
use super::locales::LocaleKey;


macro_rules! localized {
    ($locale:expr, $rng:expr, $faker:ident $(, $arg:expr)*) => {{
        let value: String = match $locale {
            LocaleKey::EnUs => $faker(EN $(, $arg)*).fake_with_rng(&mut *$rng),
            LocaleKey::PtBr => $faker(PT_BR $(, $arg)*).fake_with_rng(&mut *$rng),
        };
        value
    }};
}

/// [`FakeProvider`] backed by the `fake` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeRsAdapter {
    locale: LocaleKey,
}

impl FakeRsAdapter {
    pub fn new(locale: LocaleKey) -> Self {
        Self { locale }
    }
}

impl FakeProvider for FakeRsAdapter {
    fn locale(&self) -> LocaleKey {
        self.locale
    }

    fn country(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, CountryName)
    }

    fn region(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, StateName)
    }

    fn person_name(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, Name)
    }

    fn address(&self, rng: &mut dyn RngCore) -> String {
        let number = localized!(self.locale, rng, BuildingNumber);
        let street = localized!(self.locale, rng, StreetName);
        let city = localized!(self.locale, rng, CityName);
        let zip = localized!(self.locale, rng, ZipCode);
        format!("{number} {street}, {city} {zip}")
    }

    fn text(&self, rng: &mut dyn RngCore, max_chars: usize) -> String {
        let text = localized!(self.locale, rng, Paragraph, 1..3);
        text.chars().take(max_chars).collect()
    }

    fn word(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, Word)
    }

    fn company(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, CompanyName)
    }

    fn email(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, SafeEmail)
    }

    fn phone_number(&self, rng: &mut dyn RngCore) -> String {
        localized!(self.locale, rng, PhoneNumber)
    }

    fn date(&self, rng: &mut dyn RngCore, until: NaiveDate) -> NaiveDate {
        let span = (until - EARLIEST_DATE).num_days().max(0);
        EARLIEST_DATE + Duration::days(rng.random_range(0..=span))
    }
}
