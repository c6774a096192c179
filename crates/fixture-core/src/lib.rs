//! Core types for the fixture-gen toolkit.
//!
//! This crate provides the foundational, randomness-free types shared by
//! the generator engine and the CLI:
//!
//! - [`Descriptor`] - Closed set of declarative "what to generate" descriptions
//! - [`GenerationError`] - Error taxonomy surfaced by resolution and injection
//! - [`FixtureSchema`] - Fixture definitions loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    └─── fixture-generator  (resolves descriptors into generators,
//!                             injects values into fixtures)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{Charset, Descriptor};
//!
//! let descriptor: Descriptor = serde_yaml::from_str(
//!     "{ kind: string, charset: hexadecimal, length: 90 }",
//! ).unwrap();
//!
//! assert_eq!(descriptor, Descriptor::string(Charset::Hexadecimal, 90));
//! ```

pub mod descriptor;
pub mod error;
pub mod schema;

// Re-exports for convenience
pub use descriptor::{Charset, Descriptor, DescriptorKind, NumericMode, TimeMode, INJECTION_ORDER};
pub use error::GenerationError;
pub use schema::{FieldKind, FixtureDefinition, FixtureField, FixtureSchema, SchemaError};
