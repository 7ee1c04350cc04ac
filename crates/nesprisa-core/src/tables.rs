use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier for every table in the nesprisa schema.
///
/// Variants are declared in the fixed run order: each table appears after
/// all the tables it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Pais,
    Region,
    ResponsablePlantacion,
    Plantacion,
    TipoGrano,
    GranoEnPlantacion,
    Variedad,
    VariedadEspecial,
    Oferta,
    Aditivo,
    Anyadir,
    Tienda,
    Cliente,
    Carrito,
    Contiene,
    Cafetera,
    TieneCafetera,
    VarEnCafetera,
    Receta,
}

impl TableName {
    /// All tables in dependency order.
    pub const ALL: [TableName; 19] = [
        TableName::Pais,
        TableName::Region,
        TableName::ResponsablePlantacion,
        TableName::Plantacion,
        TableName::TipoGrano,
        TableName::GranoEnPlantacion,
        TableName::Variedad,
        TableName::VariedadEspecial,
        TableName::Oferta,
        TableName::Aditivo,
        TableName::Anyadir,
        TableName::Tienda,
        TableName::Cliente,
        TableName::Carrito,
        TableName::Contiene,
        TableName::Cafetera,
        TableName::TieneCafetera,
        TableName::VarEnCafetera,
        TableName::Receta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Pais => "pais",
            TableName::Region => "region",
            TableName::ResponsablePlantacion => "responsable_plantacion",
            TableName::Plantacion => "plantacion",
            TableName::TipoGrano => "tipo_grano",
            TableName::GranoEnPlantacion => "grano_en_plantacion",
            TableName::Variedad => "variedad",
            TableName::VariedadEspecial => "variedad_especial",
            TableName::Oferta => "oferta",
            TableName::Aditivo => "aditivo",
            TableName::Anyadir => "anyadir",
            TableName::Tienda => "tienda",
            TableName::Cliente => "cliente",
            TableName::Carrito => "carrito",
            TableName::Contiene => "contiene",
            TableName::Cafetera => "cafetera",
            TableName::TieneCafetera => "tiene_cafetera",
            TableName::VarEnCafetera => "var_en_cafetera",
            TableName::Receta => "receta",
        }
    }

    /// Tables referenced by foreign keys of this table.
    pub fn dependencies(self) -> &'static [TableName] {
        match self {
            TableName::Pais
            | TableName::ResponsablePlantacion
            | TableName::TipoGrano
            | TableName::Variedad
            | TableName::Aditivo
            | TableName::Tienda
            | TableName::Cliente
            | TableName::Cafetera => &[],
            TableName::Region => &[TableName::Pais],
            TableName::Plantacion => &[TableName::Region, TableName::ResponsablePlantacion],
            TableName::GranoEnPlantacion => &[TableName::Plantacion, TableName::TipoGrano],
            TableName::VariedadEspecial | TableName::Oferta => &[TableName::Variedad],
            TableName::Anyadir => &[TableName::Aditivo, TableName::Variedad],
            TableName::Carrito => &[TableName::Tienda, TableName::Cliente],
            TableName::Contiene => &[TableName::Carrito, TableName::Variedad],
            TableName::TieneCafetera => &[TableName::Cafetera, TableName::Cliente],
            TableName::VarEnCafetera => &[TableName::Cafetera, TableName::Variedad],
            TableName::Receta => &[TableName::TipoGrano, TableName::Variedad],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        TableName::ALL
            .into_iter()
            .find(|table| table.as_str() == normalized)
            .ok_or_else(|| Error::UnknownTable(value.to_string()))
    }
}
