//! Structural population of nested fixtures.

use fixture_core::GenerationError;
use rand::RngCore;
use std::any::type_name;
use tracing::trace;

use crate::generator::{ValueGenerator, ValueGeneratorExt};
use crate::injector::{enumerate_annotated_fields, FieldTarget, Fixture};
use crate::registry::{Generated, GeneratorRegistry, ResolvedGenerator};
use crate::value::Value;

/// Builds a default `P` and fills its generated fields.
struct PojoGenerator<P> {
    plan: Vec<(FieldTarget<P>, ResolvedGenerator)>,
}

impl<P: Fixture + Default + Send> ValueGenerator<Generated> for PojoGenerator<P> {
    fn generate(&self, rng: &mut dyn RngCore) -> Generated {
        let mut pojo = P::default();
        for (field, generator) in &self.plan {
            let value = generator.generate(rng)?;
            field.assign(&mut pojo, value)?;
        }
        Ok(Value::object(pojo))
    }
}

/// Resolve every generated field of `P` up front.
///
/// Nested pojos are resolved recursively; `depth` bounds the recursion so
/// self-referential types fail at resolution instead of overflowing.
pub fn resolve_pojo<P: Fixture + Default + Send>(
    registry: &GeneratorRegistry,
    depth: usize,
) -> Result<ResolvedGenerator, GenerationError> {
    trace!(pojo = type_name::<P>(), depth, "Resolving pojo fields");

    let mut plan = Vec::new();
    for field in enumerate_annotated_fields::<P>() {
        let descriptor = field.effective_descriptor()?;
        let generator = registry.resolve_at(&descriptor, field.field_type(), depth)?;
        plan.push((field, generator));
    }
    Ok(PojoGenerator { plan }.boxed())
}

/// A fresh `P` with every generated field populated.
pub fn build_pojo<P: Fixture + Default + Send>(
    registry: &GeneratorRegistry,
    rng: &mut dyn RngCore,
) -> Result<P, GenerationError> {
    let value = resolve_pojo::<P>(registry, 0)?.generate(rng)?;
    crate::value::object_from_value(value)
}
