//! Countries, regions, plantations and the beans grown on them.

use nesprisa_core::{
    GranoEnPlantacion, Pais, Plantacion, Region, ResponsablePlantacion, TableName, TipoGrano,
};

use super::fields::TEXT_MAX;
use super::{GeneratorContext, ensure_pool, table_generator};
use crate::errors::GenerationError;
use crate::foreign::SeedContext;
use crate::registry::TableRegistry;
use crate::unique::{CombinationPicker, UniquenessTracker};

pub fn register(registry: &mut TableRegistry, rows: usize) {
    registry.register_generator(Box::new(PaisGenerator), rows);
    registry.register_generator(Box::new(RegionGenerator), rows);
    registry.register_generator(Box::new(ResponsablePlantacionGenerator), rows);
    registry.register_generator(Box::new(PlantacionGenerator), rows);
    registry.register_generator(Box::new(TipoGranoGenerator), rows);
    registry.register_generator(Box::new(GranoEnPlantacionGenerator), rows);
}

table_generator!(PaisGenerator, Pais, generate_paises);
table_generator!(RegionGenerator, Region, RegionInput, generate_regiones);
table_generator!(
    ResponsablePlantacionGenerator,
    ResponsablePlantacion,
    generate_responsables
);
table_generator!(
    PlantacionGenerator,
    Plantacion,
    PlantacionInput,
    generate_plantaciones
);
table_generator!(TipoGranoGenerator, TipoGrano, generate_tipos_grano);
table_generator!(
    GranoEnPlantacionGenerator,
    GranoEnPlantacion,
    GranoEnPlantacionInput,
    generate_granos_en_plantacion
);

pub struct RegionInput<'a> {
    pub paises: &'a [Pais],
}

impl<'a> RegionInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            paises: pools.require(TableName::Region)?,
        })
    }
}

pub struct PlantacionInput<'a> {
    pub regiones: &'a [Region],
    pub responsables: &'a [ResponsablePlantacion],
}

impl<'a> PlantacionInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            regiones: pools.require(TableName::Plantacion)?,
            responsables: pools.require(TableName::Plantacion)?,
        })
    }
}

pub struct GranoEnPlantacionInput<'a> {
    pub plantaciones: &'a [Plantacion],
    pub tipos_grano: &'a [TipoGrano],
}

impl<'a> GranoEnPlantacionInput<'a> {
    pub fn resolve(pools: &'a SeedContext) -> Result<Self, GenerationError> {
        Ok(Self {
            plantaciones: pools.require(TableName::GranoEnPlantacion)?,
            tipos_grano: pools.require(TableName::GranoEnPlantacion)?,
        })
    }
}

pub fn generate_paises(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Pais>, GenerationError> {
    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let id_pais = ctx.claim_short_id(&mut ids, count)?;
        let nombre = ctx.faker.country(&mut *ctx.rng);
        rows.push(Pais { id_pais, nombre });
    }
    Ok(rows)
}

/// Each region picks its country independently; only the region id is unique.
pub fn generate_regiones(
    input: &RegionInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Region>, GenerationError> {
    ensure_pool(TableName::Region, input.paises)?;

    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let pais = ctx.pick(input.paises);
        let id_region = ctx.claim_short_id(&mut ids, count)?;
        rows.push(Region {
            id_pais: pais.id_pais.clone(),
            id_region,
            nombre: ctx.faker.region(&mut *ctx.rng),
        });
    }
    Ok(rows)
}

pub fn generate_responsables(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<ResponsablePlantacion>, GenerationError> {
    let mut dnis = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        rows.push(ResponsablePlantacion {
            dni_responsable: ctx.claim_dni(&mut dnis, count)?,
            nombre_responsable: ctx.person_name(),
        });
    }
    Ok(rows)
}

/// Draws distinct (region, responsible) pairs and adds a fresh plantation id.
pub fn generate_plantaciones(
    input: &PlantacionInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<Plantacion>, GenerationError> {
    ensure_pool(TableName::Plantacion, input.regiones)?;
    ensure_pool(TableName::Plantacion, input.responsables)?;

    let pairs = CombinationPicker::product(
        TableName::Plantacion,
        input.regiones.len(),
        input.responsables.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for (region, responsable) in pairs {
        let region = &input.regiones[region];
        rows.push(Plantacion {
            id_pais: region.id_pais.clone(),
            id_region: region.id_region.clone(),
            id_plantacion: ctx.claim_short_id(&mut ids, count)?,
            direccion: ctx.address(TEXT_MAX),
            dni_responsable: input.responsables[responsable].dni_responsable.clone(),
        });
    }
    Ok(rows)
}

pub fn generate_tipos_grano(
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<TipoGrano>, GenerationError> {
    let mut ids = UniquenessTracker::new();
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        rows.push(TipoGrano {
            id_tipo_grano: ctx.claim_short_id(&mut ids, count)?,
            descripcion: ctx.text(TEXT_MAX),
        });
    }
    Ok(rows)
}

pub fn generate_granos_en_plantacion(
    input: &GranoEnPlantacionInput<'_>,
    count: usize,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Vec<GranoEnPlantacion>, GenerationError> {
    ensure_pool(TableName::GranoEnPlantacion, input.plantaciones)?;
    ensure_pool(TableName::GranoEnPlantacion, input.tipos_grano)?;

    let pairs = CombinationPicker::product(
        TableName::GranoEnPlantacion,
        input.plantaciones.len(),
        input.tipos_grano.len(),
    )
    .draw_many(count, &mut *ctx.rng)?;

    Ok(pairs
        .into_iter()
        .map(|(plantacion, tipo)| {
            let plantacion = &input.plantaciones[plantacion];
            GranoEnPlantacion {
                id_pais: plantacion.id_pais.clone(),
                id_region: plantacion.id_region.clone(),
                id_plantacion: plantacion.id_plantacion.clone(),
                id_tipo_grano: input.tipos_grano[tipo].id_tipo_grano.clone(),
            }
        })
        .collect())
}
