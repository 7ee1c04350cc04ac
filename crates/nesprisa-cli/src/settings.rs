use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nesprisa_core::TableName;
use nesprisa_generate::faker_rs::LocaleKey;
use nesprisa_generate::registry::DEFAULT_ROWS;
use nesprisa_generate::{GenerationError, SeedOptions, TableRegistry};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Seeding settings read from a TOML file.
///
/// ```toml
/// default_rows = 20
/// seed = 42
/// locale = "pt_BR"
/// base_date = "2024-01-31"
///
/// [rows]
/// carrito = 50
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedSettings {
    pub default_rows: Option<usize>,
    /// Row counts per table name.
    pub rows: BTreeMap<String, usize>,
    pub seed: Option<u64>,
    pub locale: Option<LocaleKey>,
    pub base_date: Option<NaiveDate>,
    pub max_attempts_row: Option<u32>,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rows: Option<usize>,
    pub only: Vec<TableName>,
    pub no_parents: bool,
    pub seed: Option<u64>,
    pub locale: Option<LocaleKey>,
    pub base_date: Option<NaiveDate>,
    pub max_attempts_row: Option<u32>,
}

impl SeedSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Registry with the configured row counts; `--rows` replaces all of them.
    pub fn registry(&self, overrides: &Overrides) -> Result<TableRegistry, SettingsError> {
        let mut registry = TableRegistry::new(self.default_rows.unwrap_or(DEFAULT_ROWS));
        for (name, rows) in &self.rows {
            let table: TableName = name.parse().map_err(GenerationError::from)?;
            registry.set_rows(table, *rows)?;
        }
        if let Some(rows) = overrides.rows {
            registry.set_all_rows(rows);
        }
        Ok(registry)
    }

    pub fn options(&self, overrides: &Overrides) -> SeedOptions {
        let defaults = SeedOptions::default();
        SeedOptions {
            seed: overrides.seed.or(self.seed),
            base_date: overrides.base_date.or(self.base_date),
            max_attempts_row: overrides
                .max_attempts_row
                .or(self.max_attempts_row)
                .unwrap_or(defaults.max_attempts_row),
            targets: if overrides.only.is_empty() {
                None
            } else {
                Some(overrides.only.clone())
            },
            auto_generate_parents: !overrides.no_parents,
        }
    }

    pub fn locale(&self, overrides: &Overrides) -> LocaleKey {
        overrides.locale.or(self.locale).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_rows = 20
seed = 42
locale = "pt_BR"
base_date = "2024-01-31"

[rows]
carrito = 50
Receta = 5
"#;

    #[test]
    fn parses_settings_file() {
        let settings: SeedSettings = toml::from_str(SAMPLE).unwrap();
        assert_eq!(settings.default_rows, Some(20));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.locale, Some(LocaleKey::PtBr));
        assert_eq!(settings.base_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(settings.rows.get("carrito"), Some(&50));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<SeedSettings>("rowz = 3").is_err());
    }

    #[test]
    fn file_row_counts_feed_the_registry() {
        let settings: SeedSettings = toml::from_str(SAMPLE).unwrap();
        let registry = settings.registry(&Overrides::default()).unwrap();
        assert_eq!(registry.rows_for(TableName::Carrito).unwrap(), 50);
        assert_eq!(registry.rows_for(TableName::Receta).unwrap(), 5);
        assert_eq!(registry.rows_for(TableName::Pais).unwrap(), 20);
    }

    #[test]
    fn rows_flag_overrides_every_table() {
        let settings: SeedSettings = toml::from_str(SAMPLE).unwrap();
        let overrides = Overrides {
            rows: Some(3),
            ..Overrides::default()
        };
        let registry = settings.registry(&overrides).unwrap();
        for table in TableName::ALL {
            assert_eq!(registry.rows_for(table).unwrap(), 3);
        }
    }

    #[test]
    fn unknown_table_in_rows_fails() {
        let settings: SeedSettings = toml::from_str("[rows]\ncafeteria = 3").unwrap();
        let err = settings.registry(&Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Generation(GenerationError::UnknownTable(_))
        ));
    }

    #[test]
    fn command_line_wins_over_file() {
        let settings: SeedSettings = toml::from_str(SAMPLE).unwrap();
        let overrides = Overrides {
            seed: Some(7),
            locale: Some(LocaleKey::EnUs),
            only: vec![TableName::Oferta],
            no_parents: true,
            ..Overrides::default()
        };
        let options = settings.options(&overrides);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.base_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(options.targets, Some(vec![TableName::Oferta]));
        assert!(!options.auto_generate_parents);
        assert_eq!(options.max_attempts_row, SeedOptions::default().max_attempts_row);
        assert_eq!(settings.locale(&overrides), LocaleKey::EnUs);
    }

    #[test]
    fn defaults_without_file() {
        let settings = SeedSettings::load_optional(None).unwrap();
        assert_eq!(settings, SeedSettings::default());
        assert_eq!(settings.locale(&Overrides::default()), LocaleKey::EnUs);
        let registry = settings.registry(&Overrides::default()).unwrap();
        assert_eq!(registry.rows_for(TableName::Tienda).unwrap(), DEFAULT_ROWS);
    }
}
