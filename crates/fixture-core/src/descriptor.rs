//! Declarative descriptors.
//!
//! A [`Descriptor`] says *what* to generate for a field: a kind plus the
//! parameters that kind needs. Descriptors are plain data. Turning one into
//! a generator (and rejecting inconsistent parameters) is the job of the
//! registry in `fixture-generator`.
//!
//! Descriptors deserialize from YAML with the kind as a tag:
//!
//! ```yaml
//! kind: integer
//! mode: range
//! min: -10
//! max: 150
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character class used by string descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// `[A-Za-z]`
    #[default]
    Alphabetic,
    /// `[A-Za-z0-9]`
    Alphanumeric,
    /// `[0-9a-f]`
    Hexadecimal,
    /// `[0-9]`
    Numeric,
    /// Hyphenated UUID v4; length must be positive but is otherwise ignored
    Uuid,
}

/// Bound selection for numeric descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericMode {
    #[default]
    Positive,
    Negative,
    Any,
    /// Explicit `min`/`max`, requires `min < max`
    Range,
}

/// Window selection for date and instant descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    Past,
    Present,
    Future,
    #[default]
    Anytime,
    /// Explicit `start`/`end`, requires `start < end`
    Range,
}

fn default_string_length() -> usize {
    10
}

fn default_list_size() -> usize {
    10
}

fn default_float_max() -> f32 {
    1.0
}

fn default_protocol() -> String {
    "http".to_string()
}

/// Declarative description of a generated value.
///
/// The set of kinds is closed; resolution matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    /// Fixed-length string from a character class
    String {
        #[serde(default)]
        charset: Charset,
        #[serde(default = "default_string_length")]
        length: usize,
    },

    /// Fair coin
    Boolean,

    /// 32-bit integers, half-open `[min, max)` in range mode
    Integer {
        #[serde(default)]
        mode: NumericMode,
        #[serde(default)]
        min: i32,
        #[serde(default)]
        max: i32,
    },

    /// 64-bit integers, half-open `[min, max)` in range mode
    Long {
        #[serde(default)]
        mode: NumericMode,
        #[serde(default)]
        min: i64,
        #[serde(default)]
        max: i64,
    },

    /// 64-bit floats, closed `[min, max]` in range mode
    Double {
        #[serde(default)]
        mode: NumericMode,
        #[serde(default)]
        min: f64,
        #[serde(default)]
        max: f64,
    },

    /// 32-bit floats, closed `[min, max]` in range mode
    Float {
        #[serde(default)]
        mode: NumericMode,
        #[serde(default)]
        min: f32,
        #[serde(default = "default_float_max")]
        max: f32,
    },

    /// Calendar dates
    Date {
        #[serde(default)]
        mode: TimeMode,
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },

    /// Points in time (UTC)
    Instant {
        #[serde(default)]
        mode: TimeMode,
        #[serde(default)]
        start: Option<DateTime<Utc>>,
        #[serde(default)]
        end: Option<DateTime<Utc>>,
    },

    /// URL strings with the given scheme
    Url {
        #[serde(default = "default_protocol")]
        protocol: String,
    },

    /// Structurally populated object of the field's declared type
    Pojo,

    /// One of the declared variants of the field's enum type
    Enum,

    /// List of `size` independently generated elements.
    ///
    /// A `generator` naming a registered custom generator takes precedence
    /// over `element`; with neither, the element descriptor is inferred
    /// from the field's element type.
    List {
        #[serde(default)]
        element: Option<Box<Descriptor>>,
        #[serde(default)]
        generator: Option<String>,
        #[serde(default = "default_list_size")]
        size: usize,
    },

    /// Generator registered under a stable identifier
    Custom { generator: String },
}

impl Descriptor {
    pub fn string(charset: Charset, length: usize) -> Self {
        Self::String { charset, length }
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn integers(mode: NumericMode) -> Self {
        Self::Integer {
            mode,
            min: 0,
            max: 0,
        }
    }

    pub fn integer_range(min: i32, max: i32) -> Self {
        Self::Integer {
            mode: NumericMode::Range,
            min,
            max,
        }
    }

    pub fn longs(mode: NumericMode) -> Self {
        Self::Long {
            mode,
            min: 0,
            max: 0,
        }
    }

    pub fn long_range(min: i64, max: i64) -> Self {
        Self::Long {
            mode: NumericMode::Range,
            min,
            max,
        }
    }

    pub fn doubles(mode: NumericMode) -> Self {
        Self::Double {
            mode,
            min: 0.0,
            max: 0.0,
        }
    }

    pub fn double_range(min: f64, max: f64) -> Self {
        Self::Double {
            mode: NumericMode::Range,
            min,
            max,
        }
    }

    pub fn floats(mode: NumericMode) -> Self {
        Self::Float {
            mode,
            min: 0.0,
            max: default_float_max(),
        }
    }

    pub fn float_range(min: f32, max: f32) -> Self {
        Self::Float {
            mode: NumericMode::Range,
            min,
            max,
        }
    }

    pub fn dates(mode: TimeMode) -> Self {
        Self::Date {
            mode,
            start: None,
            end: None,
        }
    }

    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Date {
            mode: TimeMode::Range,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn instants(mode: TimeMode) -> Self {
        Self::Instant {
            mode,
            start: None,
            end: None,
        }
    }

    pub fn instant_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::Instant {
            mode: TimeMode::Range,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn url(protocol: impl Into<String>) -> Self {
        Self::Url {
            protocol: protocol.into(),
        }
    }

    pub fn pojo() -> Self {
        Self::Pojo
    }

    pub fn enumeration() -> Self {
        Self::Enum
    }

    /// List whose element descriptor is inferred from the field type.
    pub fn list(size: usize) -> Self {
        Self::List {
            element: None,
            generator: None,
            size,
        }
    }

    pub fn list_of(element: Descriptor, size: usize) -> Self {
        Self::List {
            element: Some(Box::new(element)),
            generator: None,
            size,
        }
    }

    pub fn list_with_generator(generator: impl Into<String>, size: usize) -> Self {
        Self::List {
            element: None,
            generator: Some(generator.into()),
            size,
        }
    }

    pub fn custom(generator: impl Into<String>) -> Self {
        Self::Custom {
            generator: generator.into(),
        }
    }

    /// The kind tag of this descriptor.
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::String { .. } => DescriptorKind::String,
            Self::Boolean => DescriptorKind::Boolean,
            Self::Integer { .. } => DescriptorKind::Integer,
            Self::Long { .. } => DescriptorKind::Long,
            Self::Double { .. } => DescriptorKind::Double,
            Self::Float { .. } => DescriptorKind::Float,
            Self::Date { .. } => DescriptorKind::Date,
            Self::Instant { .. } => DescriptorKind::Instant,
            Self::Url { .. } => DescriptorKind::Url,
            Self::Pojo => DescriptorKind::Pojo,
            Self::Enum => DescriptorKind::Enum,
            Self::List { .. } => DescriptorKind::List,
            Self::Custom { .. } => DescriptorKind::Custom,
        }
    }
}

/// Kind tag of a [`Descriptor`], without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKind {
    String,
    Boolean,
    Integer,
    Long,
    Double,
    Float,
    Date,
    Instant,
    Url,
    Pojo,
    Enum,
    List,
    Custom,
}

/// Order in which an injection pass visits descriptor kinds.
///
/// Fields of the same kind keep their registration order.
pub const INJECTION_ORDER: [DescriptorKind; 13] = [
    DescriptorKind::String,
    DescriptorKind::Boolean,
    DescriptorKind::Integer,
    DescriptorKind::Long,
    DescriptorKind::Double,
    DescriptorKind::Float,
    DescriptorKind::Date,
    DescriptorKind::Instant,
    DescriptorKind::Url,
    DescriptorKind::Pojo,
    DescriptorKind::Enum,
    DescriptorKind::List,
    DescriptorKind::Custom,
];

impl DescriptorKind {
    /// Position of this kind in [`INJECTION_ORDER`].
    pub fn injection_rank(self) -> usize {
        INJECTION_ORDER
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(INJECTION_ORDER.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Float => "float",
            Self::Date => "date",
            Self::Instant => "instant",
            Self::Url => "url",
            Self::Pojo => "pojo",
            Self::Enum => "enum",
            Self::List => "list",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
