//! Stores, customers and their carts.

use rand::Rng;

use nesprisa_core::{Carrito, Cliente, Contiene, TableName, Tienda, Variedad};

use super::fields::{self, STORE_ADDRESS_MAX};
use super::{GeneratorContext, ensure_pool, table_generator};
use crate::errors::GenerationError;
use crate::foreign::SeedContext;
use crate::registry::TableRegistry;
use crate::unique::{CombinationPicker, UniquenessTracker};

const MAX_CART_QUANTITY: i32 = 100;

pub fn register(registry: &mut TableRegistry, rows: usize) {
    registry.register_generator(Box::new(TiendaGenerator), rows);
    registry.register_generator(Box::new(ClienteGenerator), rows);
    registry.register_generator(Box::new(CarritoGenerator), rows);
    registry.register_generator(Box::new(ContieneGenerator), rows);
}

table_generator!(TiendaGenerator, Tienda, generate_tiendas);
table_generator!(ClienteGenerator, Cliente, generate_clientes);
table_generator!(CarritoGenerator, Carrito, CarritoInput, generate_carritos);
table_generator!(ContieneGenerator, Contiene, ContieneInput, generate_contiene);

pub struct CarritoInput<'a> {
    pub tiendas: &'a [Tienda],
    pub clientes: &'a [Cliente],
}

impl<'a> CarritoInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            tiendas: pools.require(TableName::Carrito)?,
            clientes: pools.require(TableName::Carrito)?,
        })
    }
}

/// Carts must come from the store so that every one carries its id.
pub struct ContieneInput<'a> {
    pub carritos: &'a [Carrito],
    pub variedades: &'a [Variedad],
}

impl<'a> ContieneInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            carritos: pools.require(TableName::Contiene)?,
            variedades: pools.require(TableName::Contiene)?,
        })
    }
}

pub fn generate_tiendas(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Tienda>, GenerationError> {
    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        rows.push(Tienda {
            id_tienda: ctx.claim_short_id(&mut ids, count)?,
            direccion: ctx.address(STORE_ADDRESS_MAX),
        });
    }
    Ok(rows)
}

/// Customers are keyed by DNI; the phone loses its calling code and may end up empty.
pub fn generate_clientes(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Cliente>, GenerationError> {
    let calling_code = ctx.faker.locale().calling_code();
    let mut dnis = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let dni = ctx.claim_dni(&mut dnis, count)?;
        let nombre = ctx.person_name();
        let raw_phone = ctx.faker.phone_number(&mut *ctx.rng);
        let email = ctx.faker.email(&mut *ctx.rng);
        rows.push(Cliente {
            dni,
            nombre,
            telefono: fields::normalize_phone(&raw_phone, calling_code),
            email,
            fecha: ctx.date(),
        });
    }
    Ok(rows)
}

/// A customer may own several carts in the same store; the id is assigned on persist.
pub fn generate_carritos(
    input: &CarritoInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Carrito>, GenerationError> {
    ensure_pool(TableName::Carrito, input.tiendas)?;
    ensure_pool(TableName::Carrito, input.clientes)?;

    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let tienda = ctx.pick(input.tiendas);
        let cliente = ctx.pick(input.clientes);
        rows.push(Carrito {
            id_tienda: tienda.id_tienda.clone(),
            id_carrito: None,
            fecha: ctx.date(),
            dni_cliente: cliente.dni.clone(),
        });
    }
    Ok(rows)
}

pub fn generate_contiene(
    input: &ContieneInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Contiene>, GenerationError> {
    ensure_pool(TableName::Contiene, input.carritos)?;
    ensure_pool(TableName::Contiene, input.variedades)?;

    let mut carts = Vec::with_capacity(input.carritos.len());
    for carrito in input.carritos {
        let id_carrito = carrito
            .id_carrito
            .ok_or(GenerationError::UnpersistedParent {
                table: TableName::Contiene,
                parent: TableName::Carrito,
            })?;
        carts.push((carrito.id_tienda.as_str(), id_carrito));
    }

    let pairs =
        CombinationPicker::product(TableName::Contiene, carts.len(), input.variedades.len())
            .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(cart, variedad)| Contiene {
            id_tienda: carts[cart].0.to_string(),
            id_carrito: carts[cart].1,
            id_variedad: input.variedades[variedad].id_variedad.clone(),
            cantidad: ctx.rng.random_range(0..=MAX_CART_QUANTITY),
        })
        .collect())
}
