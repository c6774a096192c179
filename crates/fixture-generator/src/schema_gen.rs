//! Record generation from a [`FixtureSchema`].

use fixture_core::{FixtureDefinition, FixtureSchema, GenerationError};
use rand::rngs::StdRng;
use serde_json::{Map, Value as Json};

use crate::generator::ValueGenerator;
use crate::registry::{GeneratorRegistry, ResolvedGenerator};
use crate::rng::new_rng;
use crate::value::{FieldType, Value};

/// Error type for schema-driven generation.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Fixture not found in schema
    #[error("Fixture not found: {0}")]
    FixtureNotFound(String),

    /// A field could not be resolved or generated
    #[error("Field '{field}' of fixture '{fixture}': {source}")]
    Field {
        fixture: String,
        field: String,
        #[source]
        source: GenerationError,
    },
}

/// One generated record.
#[derive(Debug)]
pub struct GeneratedRecord {
    pub fixture: String,
    pub index: u64,
    /// Field values, in declaration order
    pub fields: Vec<(String, Value)>,
}

impl GeneratedRecord {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn to_json(&self) -> Json {
        let fields: Map<String, Json> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Json::Object(fields)
    }
}

struct ResolvedField {
    name: String,
    /// Position in the declared field list
    position: usize,
    generator: ResolvedGenerator,
}

/// Produces records for the fixtures of a schema.
///
/// Fields are generated in injection order and reported in declaration
/// order. With a seed the record stream is reproducible.
pub struct SchemaGenerator<'r> {
    schema: FixtureSchema,
    registry: &'r GeneratorRegistry,
    rng: StdRng,
    index: u64,
}

impl<'r> SchemaGenerator<'r> {
    /// Seed precedence: `seed`, then the schema's seed, then
    /// `FIXTURE_GEN_SEED`, then OS entropy.
    pub fn new(schema: FixtureSchema, registry: &'r GeneratorRegistry, seed: Option<u64>) -> Self {
        let rng = new_rng(seed.or(schema.seed));
        Self {
            schema,
            registry,
            rng,
            index: 0,
        }
    }

    pub fn schema(&self) -> &FixtureSchema {
        &self.schema
    }

    /// Get the current record index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    fn resolve(&self, fixture: &FixtureDefinition) -> Result<Vec<ResolvedField>, RecordError> {
        let mut fields = fixture
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| {
                let target = FieldType::from_kind(&field.field_type);
                self.registry
                    .resolve(&field.generator, &target)
                    .map(|generator| ResolvedField {
                        name: field.name.clone(),
                        position,
                        generator,
                    })
                    .map_err(|source| RecordError::Field {
                        fixture: fixture.name.clone(),
                        field: field.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        fields.sort_by_key(|f| fixture.fields[f.position].generator.kind().injection_rank());
        Ok(fields)
    }

    fn definition(&self, fixture: &str) -> Result<&FixtureDefinition, RecordError> {
        self.schema
            .get_fixture(fixture)
            .ok_or_else(|| RecordError::FixtureNotFound(fixture.to_string()))
    }

    /// Resolve every field of every fixture without generating anything.
    pub fn validate(&self) -> Result<(), RecordError> {
        for fixture in &self.schema.fixtures {
            self.resolve(fixture)?;
        }
        Ok(())
    }

    /// Generate the next record for `fixture`.
    pub fn next_record(&mut self, fixture: &str) -> Result<GeneratedRecord, RecordError> {
        let definition = self.definition(fixture)?;
        let resolved = self.resolve(definition)?;
        self.generate(fixture, &resolved)
    }

    fn generate(
        &mut self,
        fixture: &str,
        resolved: &[ResolvedField],
    ) -> Result<GeneratedRecord, RecordError> {
        let mut fields: Vec<(usize, String, Value)> = Vec::with_capacity(resolved.len());
        for field in resolved {
            let value = field
                .generator
                .generate(&mut self.rng)
                .map_err(|source| RecordError::Field {
                    fixture: fixture.to_string(),
                    field: field.name.clone(),
                    source,
                })?;
            fields.push((field.position, field.name.clone(), value));
        }
        fields.sort_by_key(|(position, _, _)| *position);

        let index = self.index;
        self.index += 1;

        Ok(GeneratedRecord {
            fixture: fixture.to_string(),
            index,
            fields: fields
                .into_iter()
                .map(|(_, name, value)| (name, value))
                .collect(),
        })
    }

    /// Generate `count` records for `fixture`, resolving its fields once.
    pub fn records(
        &mut self,
        fixture: &str,
        count: u64,
    ) -> Result<Vec<GeneratedRecord>, RecordError> {
        let definition = self.definition(fixture)?;
        let resolved = self.resolve(definition)?;

        (0..count)
            .map(|_| self.generate(fixture, &resolved))
            .collect()
    }
}
