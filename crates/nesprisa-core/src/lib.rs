//! Core contracts for the nesprisa seeder.
//!
//! This crate defines the table identifiers and their fixed dependency order,
//! the typed row structs for every table, and the value type used by writers.

pub mod error;
pub mod graph;
pub mod rows;
pub mod tables;
pub mod values;

pub use error::{Error, Result};
pub use graph::{FkGraphReport, build_fk_graph_report, validate_order};
pub use rows::{
    Aditivo, Anyadir, Cafetera, Carrito, Cliente, Contiene, Fidelidad, GranoEnPlantacion,
    NivelCafeina, Oferta, Pais, Plantacion, Receta, Record, Region, ResponsablePlantacion,
    TableRows, TieneCafetera, Tienda, TipoGrano, VarEnCafetera, Variedad, VariedadEspecial,
};
pub use tables::TableName;
pub use values::FieldValue;
