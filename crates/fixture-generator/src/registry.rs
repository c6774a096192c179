//! Descriptor resolution.
//!
//! [`GeneratorRegistry::resolve`] turns a [`Descriptor`] plus the declared
//! type of the receiving field into a ready generator. All parameter and
//! compatibility checks happen here, before any value is produced.

use fixture_core::{Charset, Descriptor, GenerationError, NumericMode, TimeMode};
use std::collections::HashMap;
use tracing::debug;

use crate::generator::{BoxedGenerator, Mapped, ValueGenerator, ValueGeneratorExt};
use crate::generators::{composite, numeric, strings, time};
use crate::value::{FieldType, FieldValue, Value};

/// Outcome of one invocation of a resolved generator.
///
/// Structural pojo population can still be refused by the fixture at
/// assignment time, so resolved generators are fallible.
pub type Generated = Result<Value, GenerationError>;

/// Type-erased generator produced by resolution.
pub type ResolvedGenerator = BoxedGenerator<Generated>;

/// Nested pojo resolution stops at this depth.
pub const MAX_POJO_DEPTH: usize = 8;

/// Element count of inferred list descriptors.
pub const INFERRED_LIST_SIZE: usize = 10;

type CustomFactory = Box<dyn Fn() -> Result<ResolvedGenerator, GenerationError> + Send + Sync>;

struct CustomEntry {
    output: FieldType,
    factory: CustomFactory,
}

/// Resolves descriptors into generators.
///
/// Holds the custom generators addressable by `custom` and `list`
/// descriptors, keyed by a stable identifier.
#[derive(Default)]
pub struct GeneratorRegistry {
    custom: HashMap<String, CustomEntry>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `G::default()` as the custom generator `id`.
    pub fn register<T, G>(&mut self, id: impl Into<String>) -> &mut Self
    where
        T: FieldValue,
        G: ValueGenerator<T> + Default + Send + Sync + 'static,
    {
        self.register_with::<T, G, _>(id, || Ok(G::default()))
    }

    /// Register a factory building the custom generator `id`.
    ///
    /// The factory runs on every resolution; its errors surface as
    /// [`GenerationError::InvalidArgument`].
    pub fn register_with<T, G, F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        T: FieldValue,
        G: ValueGenerator<T> + Send + Sync + 'static,
        F: Fn() -> Result<G, GenerationError> + Send + Sync + 'static,
    {
        let id = id.into();
        debug!(id = %id, output = %T::field_type(), "Registering custom generator");

        let factory: CustomFactory = Box::new(move || {
            let generator = factory()?;
            Ok(Mapped::new(generator, |v: T| Ok(v.into_value())).boxed())
        });
        self.custom.insert(
            id,
            CustomEntry {
                output: T::field_type(),
                factory,
            },
        );
        self
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.custom.contains_key(id)
    }

    /// Resolve `descriptor` for a field declared as `target`.
    pub fn resolve(
        &self,
        descriptor: &Descriptor,
        target: &FieldType,
    ) -> Result<ResolvedGenerator, GenerationError> {
        self.resolve_at(descriptor, target, 0)
    }

    /// Resolve the inferred descriptor of `target`.
    pub fn resolve_inferred(&self, target: &FieldType) -> Result<ResolvedGenerator, GenerationError> {
        self.resolve_at(&infer_descriptor(target)?, target, 0)
    }

    pub(crate) fn resolve_at(
        &self,
        descriptor: &Descriptor,
        target: &FieldType,
        depth: usize,
    ) -> Result<ResolvedGenerator, GenerationError> {
        check_compatible(descriptor, target)?;
        debug!(kind = %descriptor.kind(), field_type = %target, depth, "Resolving descriptor");

        match (descriptor, target) {
            (Descriptor::String { charset, length }, _) => {
                Ok(generated(strings::string_generator(*charset, *length)?, Value::String))
            }
            (Descriptor::Boolean, _) => Ok(generated(numeric::booleans(), Value::Bool)),
            (Descriptor::Integer { mode, min, max }, _) => Ok(generated(
                numeric::integer_generator(*mode, *min, *max)?,
                Value::Int,
            )),
            (Descriptor::Long { mode, min, max }, _) => Ok(generated(
                numeric::long_generator(*mode, *min, *max)?,
                Value::Long,
            )),
            (Descriptor::Double { mode, min, max }, _) => Ok(generated(
                numeric::double_generator(*mode, *min, *max)?,
                Value::Double,
            )),
            (Descriptor::Float { mode, min, max }, _) => Ok(generated(
                numeric::float_generator(*mode, *min, *max)?,
                Value::Float,
            )),
            (Descriptor::Date { mode, start, end }, _) => Ok(generated(
                time::date_generator(*mode, *start, *end)?,
                Value::Date,
            )),
            (Descriptor::Instant { mode, start, end }, _) => Ok(generated(
                time::instant_generator(*mode, *start, *end)?,
                Value::Instant,
            )),
            (Descriptor::Url { protocol }, _) => {
                Ok(generated(strings::urls(protocol.as_str())?, Value::String))
            }
            (Descriptor::Pojo, FieldType::Pojo(pojo)) => {
                GenerationError::check_argument(
                    depth < MAX_POJO_DEPTH,
                    format!(
                        "pojo {} nests deeper than {MAX_POJO_DEPTH} levels",
                        pojo.name()
                    ),
                )?;
                pojo.resolve(self, depth + 1)
            }
            (Descriptor::Enum, FieldType::Enum(enum_type)) => Ok(composite::enum_values(enum_type)?
                .map_values(Ok)
                .boxed()),
            (
                Descriptor::List {
                    element,
                    generator,
                    size,
                },
                FieldType::List(element_type),
            ) => {
                let element = match (generator, element) {
                    (Some(id), _) => self.resolve_custom(id, element_type)?,
                    (None, Some(element)) => self.resolve_at(element, element_type, depth)?,
                    (None, None) => {
                        self.resolve_at(&infer_descriptor(element_type)?, element_type, depth)?
                    }
                };
                Ok(composite::list_of(element, *size)?
                    .map_values(|items: Vec<Generated>| {
                        items.into_iter().collect::<Result<Vec<_>, _>>().map(Value::List)
                    })
                    .boxed())
            }
            (Descriptor::Custom { generator }, _) => self.resolve_custom(generator, target),
            (descriptor, target) => Err(incompatible(descriptor, target)),
        }
    }

    fn resolve_custom(
        &self,
        id: &str,
        target: &FieldType,
    ) -> Result<ResolvedGenerator, GenerationError> {
        let entry = self.custom.get(id).ok_or_else(|| {
            GenerationError::invalid_argument(format!("no custom generator registered as '{id}'"))
        })?;

        GenerationError::check_argument(
            entry.output.same_as(target),
            format!(
                "custom generator '{id}' produces {} values, field expects {target}",
                entry.output
            ),
        )?;

        (entry.factory)().map_err(|e| {
            GenerationError::invalid_argument(format!(
                "custom generator '{id}' could not be instantiated: {e}"
            ))
        })
    }
}

fn generated<T, G>(generator: G, wrap: fn(T) -> Value) -> ResolvedGenerator
where
    T: 'static,
    G: ValueGenerator<T> + Send + Sync + 'static,
{
    Mapped::new(generator, move |v: T| Ok(wrap(v))).boxed()
}

fn incompatible(descriptor: &Descriptor, target: &FieldType) -> GenerationError {
    GenerationError::invalid_argument(format!(
        "{} descriptor cannot populate a field of type {target}",
        descriptor.kind()
    ))
}

fn check_compatible(descriptor: &Descriptor, target: &FieldType) -> Result<(), GenerationError> {
    let compatible = matches!(
        (descriptor, target),
        (Descriptor::String { .. } | Descriptor::Url { .. }, FieldType::String)
            | (Descriptor::Boolean, FieldType::Bool)
            | (Descriptor::Integer { .. }, FieldType::Int)
            | (Descriptor::Long { .. }, FieldType::Long)
            | (Descriptor::Double { .. }, FieldType::Double)
            | (Descriptor::Float { .. }, FieldType::Float)
            | (Descriptor::Date { .. }, FieldType::Date)
            | (Descriptor::Instant { .. }, FieldType::Instant)
            | (Descriptor::Pojo, FieldType::Pojo(_))
            | (Descriptor::Enum, FieldType::Enum(_))
            | (Descriptor::List { .. }, FieldType::List(_))
            | (Descriptor::Custom { .. }, _)
    );

    if compatible {
        Ok(())
    } else {
        Err(incompatible(descriptor, target))
    }
}

/// Default descriptor for a field of type `field_type`.
pub fn infer_descriptor(field_type: &FieldType) -> Result<Descriptor, GenerationError> {
    Ok(match field_type {
        FieldType::String => Descriptor::string(Charset::Alphanumeric, 10),
        FieldType::Bool => Descriptor::boolean(),
        FieldType::Int => Descriptor::integers(NumericMode::Positive),
        FieldType::Long => Descriptor::longs(NumericMode::Positive),
        FieldType::Double => Descriptor::double_range(0.0, 10_000.0),
        FieldType::Float => Descriptor::floats(NumericMode::Positive),
        FieldType::Date => Descriptor::dates(TimeMode::Anytime),
        FieldType::Instant => Descriptor::instants(TimeMode::Anytime),
        FieldType::Enum(_) => Descriptor::enumeration(),
        FieldType::List(_) => Descriptor::list(INFERRED_LIST_SIZE),
        FieldType::Pojo(_) => Descriptor::pojo(),
        FieldType::Opaque(name) => {
            return Err(GenerationError::invalid_argument(format!(
                "no default generator for type {name}, declare a custom generator"
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EnumType;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn generate(registry: &GeneratorRegistry, descriptor: &Descriptor, target: &FieldType) -> Value {
        let mut rng = StdRng::seed_from_u64(42);
        registry
            .resolve(descriptor, target)
            .unwrap()
            .generate(&mut rng)
            .unwrap()
    }

    #[derive(Default)]
    struct Countdown;

    impl ValueGenerator<i32> for Countdown {
        fn generate(&self, _rng: &mut dyn RngCore) -> i32 {
            3
        }
    }

    fn status_type() -> FieldType {
        FieldType::Enum(EnumType {
            name: "Status".to_string(),
            variants: vec!["Active".to_string(), "Inactive".to_string()],
        })
    }

    #[test]
    fn test_resolve_integer_range() {
        let registry = GeneratorRegistry::new();
        let generator = registry
            .resolve(&Descriptor::integer_range(-10, 150), &FieldType::Int)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let values: Vec<i32> = (0..10_000)
            .map(|_| generator.generate(&mut rng).unwrap().as_i32().unwrap())
            .collect();
        assert!(values.iter().all(|v| (-10..150).contains(v)));
        assert!(values.iter().any(|v| *v < 0));
        assert!(values.iter().any(|v| *v >= 0));
    }

    #[test]
    fn test_resolve_hex_string() {
        let registry = GeneratorRegistry::new();
        let value = generate(
            &registry,
            &Descriptor::string(Charset::Hexadecimal, 90),
            &FieldType::String,
        );
        let text = value.as_str().unwrap();
        assert_eq!(text.len(), 90);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_resolve_list_of_strings() {
        let registry = GeneratorRegistry::new();
        let value = generate(
            &registry,
            &Descriptor::list_of(Descriptor::string(Charset::Alphanumeric, 10), 50),
            &FieldType::List(Box::new(FieldType::String)),
        );
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 50);
        for item in items {
            assert!(item.as_str().unwrap().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_inferred_list_elements() {
        let registry = GeneratorRegistry::new();
        let value = generate(
            &registry,
            &Descriptor::list(3),
            &FieldType::List(Box::new(FieldType::Double)),
        );
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 3);
        for item in items {
            assert!((0.0..=10_000.0).contains(&item.as_f64().unwrap()));
        }
    }

    #[test]
    fn test_incompatible_descriptor() {
        let registry = GeneratorRegistry::new();
        let err = registry
            .resolve(&Descriptor::enumeration(), &FieldType::String)
            .err()
            .unwrap();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
        assert!(err.to_string().contains("enum descriptor"));

        assert!(registry
            .resolve(&Descriptor::boolean(), &FieldType::Int)
            .is_err());
        assert!(registry
            .resolve(&Descriptor::list(2), &FieldType::String)
            .is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        let registry = GeneratorRegistry::new();
        assert!(matches!(
            registry.resolve(&Descriptor::integer_range(150, -10), &FieldType::Int).err(),
            Some(GenerationError::InvalidRange(_))
        ));
        assert!(matches!(
            registry.resolve(&Descriptor::string(Charset::Alphabetic, 0), &FieldType::String).err(),
            Some(GenerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.resolve(&Descriptor::string(Charset::Uuid, 0), &FieldType::String).err(),
            Some(GenerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry
                .resolve(&Descriptor::list(0), &FieldType::List(Box::new(FieldType::Int)))
                .err(),
            Some(GenerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.resolve(&Descriptor::url(" "), &FieldType::String).err(),
            Some(GenerationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_resolve_enum() {
        let registry = GeneratorRegistry::new();
        let value = generate(&registry, &Descriptor::enumeration(), &status_type());
        assert!(matches!(value.as_str(), Some("Active" | "Inactive")));

        let empty = FieldType::Enum(EnumType {
            name: "Empty".to_string(),
            variants: vec![],
        });
        assert!(registry.resolve(&Descriptor::enumeration(), &empty).is_err());
    }

    #[test]
    fn test_custom_generators() {
        let mut registry = GeneratorRegistry::new();
        registry.register::<i32, Countdown>("countdown");
        assert!(registry.is_registered("countdown"));

        let value = generate(&registry, &Descriptor::custom("countdown"), &FieldType::Int);
        assert_eq!(value.as_i32(), Some(3));

        // Output type must match the field
        assert!(registry
            .resolve(&Descriptor::custom("countdown"), &FieldType::Long)
            .is_err());

        // Unregistered identifiers are rejected
        assert!(matches!(
            registry.resolve(&Descriptor::custom("missing"), &FieldType::Int).err(),
            Some(GenerationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_list_generator_takes_precedence() {
        let mut registry = GeneratorRegistry::new();
        registry.register::<i32, Countdown>("countdown");

        let descriptor = Descriptor::List {
            element: Some(Box::new(Descriptor::integers(NumericMode::Negative))),
            generator: Some("countdown".to_string()),
            size: 4,
        };
        let value = generate(&registry, &descriptor, &FieldType::List(Box::new(FieldType::Int)));
        let items: Vec<i32> = value.as_list().unwrap().iter().filter_map(Value::as_i32).collect();
        assert_eq!(items, vec![3, 3, 3, 3]);

        let missing = Descriptor::list_with_generator("missing", 4);
        assert!(registry
            .resolve(&missing, &FieldType::List(Box::new(FieldType::Int)))
            .is_err());
    }

    #[test]
    fn test_failing_factory() {
        let mut registry = GeneratorRegistry::new();
        registry.register_with::<i32, Countdown, _>("broken", || {
            Err(GenerationError::invalid_argument("no database"))
        });

        let err = registry
            .resolve(&Descriptor::custom("broken"), &FieldType::Int)
            .err()
            .unwrap();
        assert!(err.to_string().contains("could not be instantiated"));
    }

    #[test]
    fn test_infer_descriptor() {
        assert_eq!(
            infer_descriptor(&FieldType::String).unwrap(),
            Descriptor::string(Charset::Alphanumeric, 10)
        );
        assert_eq!(
            infer_descriptor(&FieldType::Int).unwrap(),
            Descriptor::integers(NumericMode::Positive)
        );
        assert_eq!(
            infer_descriptor(&FieldType::Double).unwrap(),
            Descriptor::double_range(0.0, 10_000.0)
        );
        assert_eq!(
            infer_descriptor(&FieldType::List(Box::new(FieldType::Bool))).unwrap(),
            Descriptor::list(INFERRED_LIST_SIZE)
        );
        assert!(infer_descriptor(&FieldType::Opaque("Money")).is_err());
    }
}
