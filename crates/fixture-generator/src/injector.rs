//! Field injection.
//!
//! A [`Fixture`] declares its generated fields once, in
//! [`Fixture::register`]. An injection pass enumerates those fields, orders
//! them by descriptor kind, and for each one resolves the descriptor,
//! draws a value and assigns it. The first failure aborts the pass; fields
//! assigned before it stay assigned.

use fixture_core::{Descriptor, GenerationError};
use rand::rngs::StdRng;
use std::any::type_name;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

use crate::generator::ValueGenerator;
use crate::registry::{infer_descriptor, GeneratorRegistry};
use crate::rng::new_rng;
use crate::value::{FieldType, FieldValue, Value};

/// A type whose fields can be populated with generated values.
pub trait Fixture: Sized + 'static {
    /// Declare the generated fields of this type.
    fn register(fields: &mut FieldTargets<Self>);

    /// Called before a generated value is written to `field`.
    fn before_assign(&mut self, _field: &str) {}

    /// Called after the write to `field`, whether or not it succeeded.
    fn after_assign(&mut self, _field: &str) {}
}

type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), GenerationError> + Send + Sync>;

/// A declared, assignable field of a fixture type.
pub struct FieldTarget<T> {
    declaring_type: &'static str,
    name: &'static str,
    field_type: FieldType,
    descriptor: Option<Descriptor>,
    setter: Setter<T>,
}

impl<T: Fixture> FieldTarget<T> {
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// The declared descriptor, `None` for inferred fields.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }

    /// The declared descriptor, or the one inferred from the field type.
    pub fn effective_descriptor(&self) -> Result<Descriptor, GenerationError> {
        match &self.descriptor {
            Some(descriptor) => Ok(descriptor.clone()),
            None => infer_descriptor(&self.field_type),
        }
    }

    /// Position of this field in an injection pass.
    fn injection_rank(&self) -> usize {
        self.effective_descriptor()
            .map(|d| d.kind().injection_rank())
            .unwrap_or(usize::MAX)
    }

    /// Write `value` into this field of `target`.
    pub fn assign(&self, target: &mut T, value: Value) -> Result<(), GenerationError> {
        let mut scope = AssignmentScope::open(target, self.name);
        (self.setter)(&mut *scope, value)
    }
}

/// Brackets one field write with the fixture's assignment hooks.
///
/// `after_assign` runs on drop, so it fires on every exit path.
struct AssignmentScope<'a, T: Fixture> {
    target: &'a mut T,
    field: &'static str,
}

impl<'a, T: Fixture> AssignmentScope<'a, T> {
    fn open(target: &'a mut T, field: &'static str) -> Self {
        target.before_assign(field);
        Self { target, field }
    }
}

impl<T: Fixture> Deref for AssignmentScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.target
    }
}

impl<T: Fixture> DerefMut for AssignmentScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.target
    }
}

impl<T: Fixture> Drop for AssignmentScope<'_, T> {
    fn drop(&mut self) {
        self.target.after_assign(self.field);
    }
}

/// The generated fields declared by a fixture type.
pub struct FieldTargets<T> {
    declaring_type: &'static str,
    targets: Vec<FieldTarget<T>>,
}

impl<T: Fixture> FieldTargets<T> {
    /// Collect the fields `T` declares, in registration order.
    pub fn collect() -> Self {
        let mut fields = Self {
            declaring_type: type_name::<T>(),
            targets: Vec::new(),
        };
        T::register(&mut fields);
        fields
    }

    fn push<V: FieldValue>(
        &mut self,
        name: &'static str,
        descriptor: Option<Descriptor>,
        setter: Setter<T>,
    ) -> &mut Self {
        self.targets.push(FieldTarget {
            declaring_type: self.declaring_type,
            name,
            field_type: V::field_type(),
            descriptor,
            setter,
        });
        self
    }

    /// Declare a field populated from `descriptor`.
    pub fn field<V, F>(&mut self, name: &'static str, descriptor: Descriptor, setter: F) -> &mut Self
    where
        V: FieldValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |target: &mut T, value: Value| {
            setter(target, V::from_value(value)?);
            Ok(())
        });
        self.push::<V>(name, Some(descriptor), setter)
    }

    /// Declare a field whose setter may refuse the write.
    ///
    /// A refusal surfaces as [`GenerationError::AccessDenied`].
    pub fn guarded<V, F>(
        &mut self,
        name: &'static str,
        descriptor: Descriptor,
        setter: F,
    ) -> &mut Self
    where
        V: FieldValue,
        F: Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |target: &mut T, value: Value| {
            setter(target, V::from_value(value)?)
                .map_err(|reason| GenerationError::access_denied(name, reason))
        });
        self.push::<V>(name, Some(descriptor), setter)
    }

    /// Declare a field populated from the descriptor inferred from its type.
    pub fn inferred<V, F>(&mut self, name: &'static str, setter: F) -> &mut Self
    where
        V: FieldValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: Setter<T> = Box::new(move |target: &mut T, value: Value| {
            setter(target, V::from_value(value)?);
            Ok(())
        });
        self.push::<V>(name, None, setter)
    }

    /// Include the fields of an embedded fixture, reached through `project`.
    ///
    /// The embedded type's hooks bracket writes to its own fields.
    pub fn embed<B: Fixture>(&mut self, project: fn(&mut T) -> &mut B) -> &mut Self {
        for inner in FieldTargets::<B>::collect().targets {
            let declaring_type = inner.declaring_type;
            let name = inner.name;
            let field_type = inner.field_type.clone();
            let descriptor = inner.descriptor.clone();
            self.targets.push(FieldTarget {
                declaring_type,
                name,
                field_type,
                descriptor,
                setter: Box::new(move |target: &mut T, value: Value| {
                    inner.assign(project(target), value)
                }),
            });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldTarget<T>> {
        self.targets.iter()
    }

    pub fn into_vec(self) -> Vec<FieldTarget<T>> {
        self.targets
    }
}

/// The generated fields of `T`, in injection order.
///
/// Fields are ordered by descriptor kind (see
/// [`INJECTION_ORDER`](fixture_core::INJECTION_ORDER)); fields of the same
/// kind keep their registration order.
pub fn enumerate_annotated_fields<T: Fixture>() -> Vec<FieldTarget<T>> {
    let mut fields = FieldTargets::<T>::collect().into_vec();
    fields.sort_by_key(FieldTarget::injection_rank);
    fields
}

/// Populates fixtures from a registry with a single RNG stream.
pub struct FieldInjector<'r> {
    registry: &'r GeneratorRegistry,
    rng: StdRng,
}

impl<'r> FieldInjector<'r> {
    /// Injector seeded from `FIXTURE_GEN_SEED` when set, else from OS entropy.
    pub fn new(registry: &'r GeneratorRegistry) -> Self {
        Self {
            registry,
            rng: new_rng(None),
        }
    }

    /// Injector whose output is fully determined by `seed`.
    pub fn with_seed(registry: &'r GeneratorRegistry, seed: u64) -> Self {
        Self {
            registry,
            rng: new_rng(Some(seed)),
        }
    }

    /// Assign a generated value to every declared field of `target`.
    pub fn populate<T: Fixture>(&mut self, target: &mut T) -> Result<(), GenerationError> {
        let fields = enumerate_annotated_fields::<T>();
        debug!(
            fixture = type_name::<T>(),
            fields = fields.len(),
            "Populating generated fields"
        );

        for field in &fields {
            self.inflate(field, target)?;
        }
        Ok(())
    }

    fn inflate<T: Fixture>(
        &mut self,
        field: &FieldTarget<T>,
        target: &mut T,
    ) -> Result<(), GenerationError> {
        let descriptor = field.effective_descriptor()?;
        let generator = self.registry.resolve(&descriptor, field.field_type())?;
        let value = generator.generate(&mut self.rng)?;
        trace!(
            declaring_type = field.declaring_type(),
            field = field.name(),
            value = ?value,
            "Generated value"
        );
        field.assign(target, value)
    }
}

/// Populate `target` with the default registry.
pub fn populate_generated_fields<T: Fixture>(target: &mut T) -> Result<(), GenerationError> {
    let registry = GeneratorRegistry::default();
    FieldInjector::new(&registry).populate(target)
}
