//! Coffee varieties, their offers, additives and recipes.

use rand::Rng;

use nesprisa_core::{
    Aditivo, Anyadir, Fidelidad, NivelCafeina, Oferta, Receta, TableName, TipoGrano, Variedad,
    VariedadEspecial,
};

use super::fields::{self, TEXT_MAX};
use super::{GeneratorContext, ensure_pool, table_generator};
use crate::errors::GenerationError;
use crate::foreign::SeedContext;
use crate::registry::TableRegistry;
use crate::unique::{CombinationPicker, UniquenessTracker};

const CAFFEINE_LEVELS: &[Option<NivelCafeina>] = &[
    None,
    Some(NivelCafeina::Bajo),
    Some(NivelCafeina::Medio),
    Some(NivelCafeina::Alto),
];
const LOYALTY_TIERS: &[Option<Fidelidad>] = &[
    None,
    Some(Fidelidad::I),
    Some(Fidelidad::II),
    Some(Fidelidad::III),
];

pub fn register(registry: &mut TableRegistry, rows: usize) {
    registry.register_generator(Box::new(VariedadGenerator), rows);
    registry.register_generator(Box::new(VariedadEspecialGenerator), rows);
    registry.register_generator(Box::new(OfertaGenerator), rows);
    registry.register_generator(Box::new(AditivoGenerator), rows);
    registry.register_generator(Box::new(AnyadirGenerator), rows);
    registry.register_generator(Box::new(RecetaGenerator), rows);
}

table_generator!(VariedadGenerator, Variedad, generate_variedades);
table_generator!(
    VariedadEspecialGenerator,
    VariedadEspecial,
    VariedadInput,
    generate_variedades_especiales
);
table_generator!(OfertaGenerator, Oferta, VariedadInput, generate_ofertas);
table_generator!(AditivoGenerator, Aditivo, generate_aditivos);
table_generator!(AnyadirGenerator, Anyadir, AnyadirInput, generate_anyadir);
table_generator!(RecetaGenerator, Receta, RecetaInput, generate_recetas);

/// Parent pool for tables that only reference `variedad`.
pub struct VariedadInput<'a> {
    pub variedades: &'a [Variedad],
}

impl<'a> VariedadInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            variedades: pools.require(TableName::Variedad)?,
        })
    }
}

pub struct AnyadirInput<'a> {
    pub aditivos: &'a [Aditivo],
    pub variedades: &'a [Variedad],
}

impl<'a> AnyadirInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            aditivos: pools.require(TableName::Anyadir)?,
            variedades: pools.require(TableName::Anyadir)?,
        })
    }
}

pub struct RecetaInput<'a> {
    pub tipos_grano: &'a [TipoGrano],
    pub variedades: &'a [Variedad],
}

impl<'a> RecetaInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            tipos_grano: pools.require(TableName::Receta)?,
            variedades: pools.require(TableName::Receta)?,
        })
    }
}

/// Varieties get a unique id and a unique one-word name.
pub fn generate_variedades(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Variedad>, GenerationError> {
    let mut ids = UniquenessTracker::new();
    let mut names = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let id_variedad = ctx.claim_short_id(&mut ids, count)?;
        let faker = ctx.faker;
        let rng = &mut *ctx.rng;
        let denominacion =
            names.claim_with(TableName::Variedad, count, ctx.max_attempts_row, || {
                faker.word(&mut *rng)
            })?;
        rows.push(Variedad {
            id_variedad,
            denominacion,
            pvp10: ctx.rng.random::<f64>() * 100.0,
            intensidad: ctx.rng.random_range(0..=10),
            nivel_cafeina: fields::nullable_choice(CAFFEINE_LEVELS, &mut *ctx.rng),
        });
    }
    Ok(rows)
}

/// At most one special edition per variety.
pub fn generate_variedades_especiales(
    input: &VariedadInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<VariedadEspecial>, GenerationError> {
    ensure_pool(TableName::VariedadEspecial, input.variedades)?;

    let picks = CombinationPicker::single(TableName::VariedadEspecial, input.variedades.len())
        .draw_many(count, &mut *ctx.rng)?;

    let mut rows = Vec::with_capacity(count);
    for (variedad, _) in picks {
        let (start, end) = ctx.date_window();
        rows.push(VariedadEspecial {
            id_variedad: input.variedades[variedad].id_variedad.clone(),
            descripcion_envase: ctx.text(TEXT_MAX),
            fecha_inicio_disponibilidad: start,
            fecha_fin_disponibilidad: end,
        });
    }
    Ok(rows)
}

/// Offers are unique per (variety, start date).
pub fn generate_ofertas(
    input: &VariedadInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Oferta>, GenerationError> {
    ensure_pool(TableName::Oferta, input.variedades)?;

    let mut keys = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let faker = ctx.faker;
        let base_date = ctx.base_date;
        let rng = &mut *ctx.rng;
        let (id_variedad, fecha_inicio) =
            keys.claim_with(TableName::Oferta, count, ctx.max_attempts_row, || {
                let variedad = fields::pick(input.variedades, &mut *rng);
                let start = faker.date(&mut *rng, base_date);
                (variedad.id_variedad.as_str(), start)
            })?;
        rows.push(Oferta {
            id_variedad: id_variedad.to_string(),
            fecha_inicio,
            fecha_fin: fields::window_end(fecha_inicio, &mut *ctx.rng),
            descuento: ctx.rng.random::<f64>(),
            fidelidad: fields::nullable_choice(LOYALTY_TIERS, &mut *ctx.rng),
        });
    }
    Ok(rows)
}

pub fn generate_aditivos(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Aditivo>, GenerationError> {
    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        rows.push(Aditivo {
            id_aditivo: ctx.claim_short_id(&mut ids, count)?,
            descripcion: ctx.text(TEXT_MAX),
        });
    }
    Ok(rows)
}

pub fn generate_anyadir(
    input: &AnyadirInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Anyadir>, GenerationError> {
    ensure_pool(TableName::Anyadir, input.aditivos)?;
    ensure_pool(TableName::Anyadir, input.variedades)?;

    let pairs = CombinationPicker::product(
        TableName::Anyadir,
        input.aditivos.len(),
        input.variedades.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(aditivo, variedad)| Anyadir {
            id_aditivo: input.aditivos[aditivo].id_aditivo.clone(),
            id_variedad: input.variedades[variedad].id_variedad.clone(),
            cantidad: fields::scaled_quantity(&mut *ctx.rng),
        })
        .collect())
}

pub fn generate_recetas(
    input: &RecetaInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Receta>, GenerationError> {
    ensure_pool(TableName::Receta, input.tipos_grano)?;
    ensure_pool(TableName::Receta, input.variedades)?;

    let pairs = CombinationPicker::product(
        TableName::Receta,
        input.tipos_grano.len(),
        input.variedades.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(tipo, variedad)| Receta {
            id_tipo_grano: input.tipos_grano[tipo].id_tipo_grano.clone(),
            id_variedad: input.variedades[variedad].id_variedad.clone(),
            cantidad: ctx.rng.random::<f64>() * 10.0,
            nivel_molido: ctx.rng.random_range(0..=5),
        })
        .collect())
}
