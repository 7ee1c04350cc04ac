//! Coffee machines, who owns them and which varieties they take.

use rand::Rng;

use nesprisa_core::{Cafetera, Cliente, TableName, TieneCafetera, VarEnCafetera, Variedad};

use super::{GeneratorContext, ensure_pool, table_generator};
use crate::errors::GenerationError;
use crate::foreign::SeedContext;
use crate::registry::TableRegistry;
use crate::unique::{CombinationPicker, UniquenessTracker};

const MAX_PRESSURE_BAR: f64 = 10.0;

pub fn register(registry: &mut TableRegistry, rows: usize) {
    registry.register_generator(Box::new(CafeteraGenerator), rows);
    registry.register_generator(Box::new(TieneCafeteraGenerator), rows);
    registry.register_generator(Box::new(VarEnCafeteraGenerator), rows);
}

table_generator!(CafeteraGenerator, Cafetera, generate_cafeteras);
table_generator!(
    TieneCafeteraGenerator,
    TieneCafetera,
    TieneCafeteraInput,
    generate_tiene_cafetera
);
table_generator!(
    VarEnCafeteraGenerator,
    VarEnCafetera,
    VarEnCafeteraInput,
    generate_var_en_cafetera
);

pub struct TieneCafeteraInput<'a> {
    pub cafeteras: &'a [Cafetera],
    pub clientes: &'a [Cliente],
}

impl<'a> TieneCafeteraInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            cafeteras: pools.require(TableName::TieneCafetera)?,
            clientes: pools.require(TableName::TieneCafetera)?,
        })
    }
}

pub struct VarEnCafeteraInput<'a> {
    pub cafeteras: &'a [Cafetera],
    pub variedades: &'a [Variedad],
}

impl<'a> VarEnCafeteraInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            cafeteras: pools.require(TableName::VarEnCafetera)?,
            variedades: pools.require(TableName::VarEnCafetera)?,
        })
    }
}

/// Machines are keyed by (manufacturer, model).
pub fn generate_cafeteras(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Cafetera>, GenerationError> {
    let mut models = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let faker = ctx.faker;
        let rng = &mut *ctx.rng;
        let (fabricante, modelo) =
            models.claim_with(TableName::Cafetera, count, ctx.max_attempts_row, || {
                (faker.company(&mut *rng), faker.word(&mut *rng))
            })?;
        rows.push(Cafetera {
            fabricante,
            modelo,
            presion: ctx.rng.random::<f64>() * MAX_PRESSURE_BAR,
        });
    }
    Ok(rows)
}

pub fn generate_tiene_cafetera(
    input: &TieneCafeteraInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<TieneCafetera>, GenerationError> {
    ensure_pool(TableName::TieneCafetera, input.cafeteras)?;
    ensure_pool(TableName::TieneCafetera, input.clientes)?;

    let pairs = CombinationPicker::product(
        TableName::TieneCafetera,
        input.cafeteras.len(),
        input.clientes.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(cafetera, cliente)| {
            let cafetera = &input.cafeteras[cafetera];
            TieneCafetera {
                fabricante_caf: cafetera.fabricante.clone(),
                modelo_caf: cafetera.modelo.clone(),
                dni_cliente: input.clientes[cliente].dni.clone(),
            }
        })
        .collect())
}

pub fn generate_var_en_cafetera(
    input: &VarEnCafeteraInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<VarEnCafetera>, GenerationError> {
    ensure_pool(TableName::VarEnCafetera, input.cafeteras)?;
    ensure_pool(TableName::VarEnCafetera, input.variedades)?;

    let pairs = CombinationPicker::product(
        TableName::VarEnCafetera,
        input.cafeteras.len(),
        input.variedades.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(cafetera, variedad)| {
            let cafetera = &input.cafeteras[cafetera];
            VarEnCafetera {
                fabricante_caf: cafetera.fabricante.clone(),
                modelo_caf: cafetera.modelo.clone(),
                id_variedad: input.variedades[variedad].id_variedad.clone(),
            }
        })
        .collect())
}
