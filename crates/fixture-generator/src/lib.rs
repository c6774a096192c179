//! Value generators and field injection for the fixture-gen toolkit.
//!
//! This crate turns the declarative [`Descriptor`]s of `fixture-core` into
//! live generators and uses them to populate test fixtures.
//!
//! # Architecture
//!
//! ```text
//!  Descriptor + FieldType
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │  GeneratorRegistry  │  validation, inference,
//! │                     │  custom generators
//! └──────────┬──────────┘
//!            │ ResolvedGenerator
//!            ▼
//! ┌─────────────────────┐
//! │   FieldInjector     │  ordered pass over a Fixture's fields,
//! │  - rng (StdRng)     │  assignment hooks
//! └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_generator::{
//!     Charset, Descriptor, FieldInjector, FieldTargets, Fixture, GeneratorRegistry,
//! };
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Fixture for User {
//!     fn register(fields: &mut FieldTargets<Self>) {
//!         fields
//!             .field("name", Descriptor::string(Charset::Alphabetic, 8), |u: &mut User, v: String| u.name = v)
//!             .field("age", Descriptor::integer_range(18, 80), |u: &mut User, v: i32| u.age = v);
//!     }
//! }
//!
//! let registry = GeneratorRegistry::new();
//! let mut user = User::default();
//! FieldInjector::with_seed(&registry, 42).populate(&mut user).unwrap();
//!
//! assert_eq!(user.name.len(), 8);
//! assert!((18..80).contains(&user.age));
//! ```
//!
//! # Generators
//!
//! Every built-in generator lives in [`generators`]:
//!
//! - Bounded numbers: `integers`, `longs`, `doubles`, `floats` and their
//!   `positive_*`, `negative_*`, `any_*` and `small_positive_*` shortcuts
//! - Strings: alphabetic, alphanumeric, hexadecimal, numeric, UUID, URL
//! - Time: dates and instants in the past, present, future or a range
//! - Composites: `list_of`, `map_of`, `one_of`, `enum_of`
//!
//! Closures `Fn(&mut dyn RngCore) -> T` are generators too.

pub mod generator;
pub mod generators;
pub mod injector;
pub mod pojo;
pub mod registry;
pub mod rng;
pub mod schema_gen;
pub mod value;

// Re-exports for convenience
pub use fixture_core::{Charset, Descriptor, GenerationError, NumericMode, TimeMode};
pub use generator::{BoxedGenerator, Mapped, ValueGenerator, ValueGeneratorExt};
pub use injector::{
    enumerate_annotated_fields, populate_generated_fields, FieldInjector, FieldTarget,
    FieldTargets, Fixture,
};
pub use pojo::build_pojo;
pub use registry::{infer_descriptor, Generated, GeneratorRegistry, ResolvedGenerator};
pub use rng::SEED_ENV_VAR;
pub use schema_gen::{GeneratedRecord, RecordError, SchemaGenerator};
pub use value::{EnumType, FieldEnum, FieldType, FieldValue, PojoType, Value};
