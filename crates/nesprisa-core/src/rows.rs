//! Typed rows for every table of the schema.
//!
//! Each row struct implements [`Record`], which ties it to its [`TableName`],
//! exposes its column layout, and converts it into [`FieldValue`]s for
//! writers. [`TableRows`] wraps a batch of rows for a single table so that
//! heterogeneous batches can travel through the seeding pipeline.

use std::fmt;

use chrono::NaiveDate;

use crate::tables::TableName;
use crate::values::FieldValue;

/// A row type bound to one table of the schema.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    const TABLE: TableName;
    const COLUMNS: &'static [&'static str];
    /// Column whose value is assigned by the store on persist.
    const GENERATED_COLUMN: Option<&'static str> = None;

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<FieldValue>;

    /// Receives the store-assigned value of `GENERATED_COLUMN`.
    fn assign_generated(&mut self, _value: i64) {}

    fn pool(rows: &TableRows) -> Option<&[Self]>;
}

/// Caffeine level of a coffee variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NivelCafeina {
    Bajo,
    Medio,
    Alto,
}

impl NivelCafeina {
    pub fn as_str(self) -> &'static str {
        match self {
            NivelCafeina::Bajo => "bajo",
            NivelCafeina::Medio => "medio",
            NivelCafeina::Alto => "alto",
        }
    }
}

impl From<NivelCafeina> for FieldValue {
    fn from(value: NivelCafeina) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

/// Loyalty tier an offer is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fidelidad {
    I,
    II,
    III,
}

impl Fidelidad {
    pub fn as_str(self) -> &'static str {
        match self {
            Fidelidad::I => "I",
            Fidelidad::II => "II",
            Fidelidad::III => "III",
        }
    }
}

impl From<Fidelidad> for FieldValue {
    fn from(value: Fidelidad) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pais {
    pub id_pais: String,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id_pais: String,
    pub id_region: String,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponsablePlantacion {
    pub dni_responsable: String,
    pub nombre_responsable: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plantacion {
    pub id_pais: String,
    pub id_region: String,
    pub id_plantacion: String,
    pub direccion: String,
    pub dni_responsable: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TipoGrano {
    pub id_tipo_grano: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GranoEnPlantacion {
    pub id_pais: String,
    pub id_region: String,
    pub id_plantacion: String,
    pub id_tipo_grano: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variedad {
    pub id_variedad: String,
    pub denominacion: String,
    pub pvp10: f64,
    pub intensidad: i32,
    pub nivel_cafeina: Option<NivelCafeina>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariedadEspecial {
    pub id_variedad: String,
    pub descripcion_envase: String,
    pub fecha_inicio_disponibilidad: NaiveDate,
    pub fecha_fin_disponibilidad: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Oferta {
    pub id_variedad: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub descuento: f64,
    pub fidelidad: Option<Fidelidad>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aditivo {
    pub id_aditivo: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Anyadir {
    pub id_aditivo: String,
    pub id_variedad: String,
    pub cantidad: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tienda {
    pub id_tienda: String,
    pub direccion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cliente {
    pub dni: String,
    pub nombre: String,
    pub telefono: Option<String>,
    pub email: String,
    pub fecha: NaiveDate,
}

/// Shopping cart; `id_carrito` stays `None` until the store assigns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Carrito {
    pub id_tienda: String,
    pub id_carrito: Option<i64>,
    pub fecha: NaiveDate,
    pub dni_cliente: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contiene {
    pub id_tienda: String,
    pub id_carrito: i64,
    pub id_variedad: String,
    pub cantidad: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cafetera {
    pub fabricante: String,
    pub modelo: String,
    pub presion: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TieneCafetera {
    pub fabricante_caf: String,
    pub modelo_caf: String,
    pub dni_cliente: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarEnCafetera {
    pub fabricante_caf: String,
    pub modelo_caf: String,
    pub id_variedad: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receta {
    pub id_tipo_grano: String,
    pub id_variedad: String,
    pub cantidad: f64,
    pub nivel_molido: i32,
}

macro_rules! table_rows {
    ($($variant:ident => $row:ident),+ $(,)?) => {
        /// A batch of rows for a single table.
        #[derive(Debug, Clone, PartialEq)]
        pub enum TableRows {
            $($variant(Vec<$row>),)+
        }

        impl TableRows {
            pub fn table(&self) -> TableName {
                match self {
                    $(TableRows::$variant(_) => <$row as Record>::TABLE,)+
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(TableRows::$variant(rows) => rows.len(),)+
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            pub fn columns(&self) -> &'static [&'static str] {
                match self {
                    $(TableRows::$variant(_) => <$row as Record>::COLUMNS,)+
                }
            }

            pub fn generated_column(&self) -> Option<&'static str> {
                match self {
                    $(TableRows::$variant(_) => <$row as Record>::GENERATED_COLUMN,)+
                }
            }

            /// Field values of every row, in column order.
            pub fn value_rows(&self) -> Vec<Vec<FieldValue>> {
                match self {
                    $(TableRows::$variant(rows) => rows.iter().map(<$row as Record>::values).collect(),)+
                }
            }

            /// Stores a store-assigned value on the row at `index`.
            pub fn assign_generated(&mut self, index: usize, value: i64) {
                match self {
                    $(TableRows::$variant(rows) => {
                        if let Some(row) = rows.get_mut(index) {
                            row.assign_generated(value);
                        }
                    })+
                }
            }
        }

        $(
            impl From<Vec<$row>> for TableRows {
                fn from(rows: Vec<$row>) -> Self {
                    TableRows::$variant(rows)
                }
            }
        )+
    };
}

table_rows! {
    Pais => Pais,
    Region => Region,
    ResponsablePlantacion => ResponsablePlantacion,
    Plantacion => Plantacion,
    TipoGrano => TipoGrano,
    GranoEnPlantacion => GranoEnPlantacion,
    Variedad => Variedad,
    VariedadEspecial => VariedadEspecial,
    Oferta => Oferta,
    Aditivo => Aditivo,
    Anyadir => Anyadir,
    Tienda => Tienda,
    Cliente => Cliente,
    Carrito => Carrito,
    Contiene => Contiene,
    Cafetera => Cafetera,
    TieneCafetera => TieneCafetera,
    VarEnCafetera => VarEnCafetera,
    Receta => Receta,
}

macro_rules! record {
    ($row:ident, $variant:ident, [$($column:ident),+ $(,)?]) => {
        impl Record for $row {
            const TABLE: TableName = TableName::$variant;
            const COLUMNS: &'static [&'static str] = &[$(stringify!($column)),+];

            fn values(&self) -> Vec<FieldValue> {
                vec![$(FieldValue::from(self.$column.clone())),+]
            }

            fn pool(rows: &TableRows) -> Option<&[Self]> {
                match rows {
                    TableRows::$variant(rows) => Some(rows),
                    _ => None,
                }
            }
        }
    };
}

record!(Pais, Pais, [id_pais, nombre]);
record!(Region, Region, [id_pais, id_region, nombre]);
record!(
    ResponsablePlantacion,
    ResponsablePlantacion,
    [dni_responsable, nombre_responsable]
);
record!(
    Plantacion,
    Plantacion,
    [id_pais, id_region, id_plantacion, direccion, dni_responsable]
);
record!(TipoGrano, TipoGrano, [id_tipo_grano, descripcion]);
record!(
    GranoEnPlantacion,
    GranoEnPlantacion,
    [id_pais, id_region, id_plantacion, id_tipo_grano]
);
record!(
    Variedad,
    Variedad,
    [id_variedad, denominacion, pvp10, intensidad, nivel_cafeina]
);
record!(
    VariedadEspecial,
    VariedadEspecial,
    [
        id_variedad,
        descripcion_envase,
        fecha_inicio_disponibilidad,
        fecha_fin_disponibilidad
    ]
);
record!(
    Oferta,
    Oferta,
    [id_variedad, fecha_inicio, fecha_fin, descuento, fidelidad]
);
record!(Aditivo, Aditivo, [id_aditivo, descripcion]);
record!(Anyadir, Anyadir, [id_aditivo, id_variedad, cantidad]);
record!(Tienda, Tienda, [id_tienda, direccion]);
record!(Cliente, Cliente, [dni, nombre, telefono, email, fecha]);
record!(
    Contiene,
    Contiene,
    [id_tienda, id_carrito, id_variedad, cantidad]
);
record!(Cafetera, Cafetera, [fabricante, modelo, presion]);
record!(
    TieneCafetera,
    TieneCafetera,
    [fabricante_caf, modelo_caf, dni_cliente]
);
record!(
    VarEnCafetera,
    VarEnCafetera,
    [fabricante_caf, modelo_caf, id_variedad]
);
record!(
    Receta,
    Receta,
    [id_tipo_grano, id_variedad, cantidad, nivel_molido]
);

impl Record for Carrito {
    const TABLE: TableName = TableName::Carrito;
    const COLUMNS: &'static [&'static str] = &["id_tienda", "id_carrito", "fecha", "dni_cliente"];
    const GENERATED_COLUMN: Option<&'static str> = Some("id_carrito");

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::from(&self.id_tienda),
            FieldValue::from(self.id_carrito),
            FieldValue::from(self.fecha),
            FieldValue::from(&self.dni_cliente),
        ]
    }

    fn assign_generated(&mut self, value: i64) {
        self.id_carrito = Some(value);
    }

    fn pool(rows: &TableRows) -> Option<&[Self]> {
        match rows {
            TableRows::Carrito(rows) => Some(rows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrito_receives_generated_id() {
        let mut rows = TableRows::from(vec![Carrito {
            id_tienda: "t1".to_string(),
            id_carrito: None,
            fecha: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            dni_cliente: "12345678A".to_string(),
        }]);

        assert_eq!(rows.generated_column(), Some("id_carrito"));
        assert_eq!(rows.value_rows()[0][1], FieldValue::Null);

        rows.assign_generated(0, 7);
        assert_eq!(rows.value_rows()[0][1], FieldValue::Int(7));
    }

    #[test]
    fn values_follow_column_order() {
        let variedad = Variedad {
            id_variedad: "abc".to_string(),
            denominacion: "ristretto".to_string(),
            pvp10: 4.5,
            intensidad: 9,
            nivel_cafeina: None,
        };

        let values = variedad.values();
        assert_eq!(values.len(), Variedad::COLUMNS.len());
        assert_eq!(values[0], FieldValue::Text("abc".to_string()));
        assert_eq!(values[3], FieldValue::Int(9));
        assert!(values[4].is_null());
    }
}
