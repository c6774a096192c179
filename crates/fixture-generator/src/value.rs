//! Runtime values and field types.
//!
//! The registry works with type-erased [`Value`]s so a single resolution
//! path serves every field. Typed code crosses that boundary through
//! [`FieldValue`], which every assignable field type implements.

use chrono::{DateTime, NaiveDate, Utc};
use fixture_core::{FieldKind, GenerationError};
use std::any::{type_name, Any};
use std::fmt;

use crate::injector::Fixture;
use crate::registry::{GeneratorRegistry, ResolvedGenerator};

/// A generated value.
pub enum Value {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(NaiveDate),
    Instant(DateTime<Utc>),
    Enum {
        type_name: String,
        variant: String,
        index: usize,
    },
    List(Vec<Value>),
    /// Populated object or custom-generated value of a user type
    Object {
        type_name: &'static str,
        value: Box<dyn Any + Send>,
    },
}

impl Value {
    pub fn object<T: Any + Send>(value: T) -> Self {
        Self::Object {
            type_name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Short label of the value's kind, used in error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Instant(_) => "instant",
            Self::Enum { .. } => "enum",
            Self::List(_) => "list",
            Self::Object { type_name, .. } => *type_name,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            Self::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert to JSON. Objects, which carry no serializable structure,
    /// become their type name.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Bool(v) => Json::Bool(*v),
            Self::Int(v) => Json::from(*v),
            Self::Long(v) => Json::from(*v),
            Self::Float(v) => Json::from(f64::from(*v)),
            Self::Double(v) => Json::from(*v),
            Self::String(v) => Json::String(v.clone()),
            Self::Date(v) => Json::String(v.format("%Y-%m-%d").to_string()),
            Self::Instant(v) => Json::String(v.to_rfc3339()),
            Self::Enum { variant, .. } => Json::String(variant.clone()),
            Self::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Self::Object { type_name, .. } => Json::String(format!("<{type_name}>")),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::Long(v) => write!(f, "Long({v})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Double(v) => write!(f, "Double({v})"),
            Self::String(v) => write!(f, "String({v:?})"),
            Self::Date(v) => write!(f, "Date({v})"),
            Self::Instant(v) => write!(f, "Instant({v})"),
            Self::Enum {
                type_name, variant, ..
            } => write!(f, "Enum({type_name}::{variant})"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Object { type_name, .. } => write!(f, "Object({type_name})"),
        }
    }
}

/// Runtime description of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<String>,
}

/// Resolves every generated field of a fixture type, `depth` levels deep.
pub type PojoResolver =
    fn(&GeneratorRegistry, usize) -> Result<ResolvedGenerator, GenerationError>;

/// Runtime handle on a fixture type that can be populated structurally.
#[derive(Clone, Copy)]
pub struct PojoType {
    name: &'static str,
    resolver: PojoResolver,
}

impl PojoType {
    pub fn of<P: Fixture + Default + Send>() -> Self {
        Self {
            name: type_name::<P>(),
            resolver: crate::pojo::resolve_pojo::<P>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn resolve(
        &self,
        registry: &GeneratorRegistry,
        depth: usize,
    ) -> Result<ResolvedGenerator, GenerationError> {
        (self.resolver)(registry, depth)
    }
}

impl fmt::Debug for PojoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PojoType").field(&self.name).finish()
    }
}

/// Declared type of an assignable field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    Instant,
    Enum(EnumType),
    List(Box<FieldType>),
    Pojo(PojoType),
    /// A user type that only custom generators can produce
    Opaque(&'static str),
}

impl FieldType {
    /// Human-readable type name, e.g. `list<string>`.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int => "int".to_string(),
            Self::Long => "long".to_string(),
            Self::Float => "float".to_string(),
            Self::Double => "double".to_string(),
            Self::String => "string".to_string(),
            Self::Date => "date".to_string(),
            Self::Instant => "instant".to_string(),
            Self::Enum(enum_type) => format!("enum {}", enum_type.name),
            Self::List(element) => format!("list<{}>", element.describe()),
            Self::Pojo(pojo) => format!("pojo {}", pojo.name),
            Self::Opaque(name) => (*name).to_string(),
        }
    }

    /// Structural equality. Pojo types compare by name.
    pub fn same_as(&self, other: &FieldType) -> bool {
        match (self, other) {
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.same_as(b),
            (Self::Pojo(a), Self::Pojo(b)) => a.name == b.name,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            (a, b) => {
                !matches!(a, Self::Enum(_) | Self::List(_) | Self::Pojo(_) | Self::Opaque(_))
                    && std::mem::discriminant(a) == std::mem::discriminant(b)
            }
        }
    }

    /// Field type declared by a schema.
    pub fn from_kind(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool,
            FieldKind::Int => Self::Int,
            FieldKind::Long => Self::Long,
            FieldKind::Float => Self::Float,
            FieldKind::Double => Self::Double,
            FieldKind::String => Self::String,
            FieldKind::Date => Self::Date,
            FieldKind::Instant => Self::Instant,
            FieldKind::Enum { name, values } => Self::Enum(EnumType {
                name: name.clone(),
                variants: values.clone(),
            }),
            FieldKind::List { element_type } => Self::List(Box::new(Self::from_kind(element_type))),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn mismatch(expected: &FieldType, value: &Value) -> GenerationError {
    GenerationError::invalid_argument(format!(
        "cannot assign a {} value to a field of type {expected}",
        value.type_label()
    ))
}

/// A Rust type that can receive generated values.
pub trait FieldValue: Sized + Send + 'static {
    fn field_type() -> FieldType;

    fn from_value(value: Value) -> Result<Self, GenerationError>;

    fn into_value(self) -> Value;
}

macro_rules! primitive_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::$variant
                }

                fn from_value(value: Value) -> Result<Self, GenerationError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(&FieldType::$variant, &other)),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

primitive_field_value!(
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    NaiveDate => Date,
    DateTime<Utc> => Instant,
);

impl<T: FieldValue> FieldValue for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn from_value(value: Value) -> Result<Self, GenerationError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch(&Self::field_type(), &other)),
        }
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(FieldValue::into_value).collect())
    }
}

/// A fieldless Rust enum whose variants can be generated.
///
/// Implemented by [`field_enum!`](crate::field_enum).
pub trait FieldEnum: Clone + Send + 'static {
    fn type_name() -> &'static str;

    /// Every variant, in declaration order.
    fn variants() -> &'static [Self];

    fn label(&self) -> &'static str;

    fn enum_type() -> EnumType {
        EnumType {
            name: Self::type_name().to_string(),
            variants: Self::variants()
                .iter()
                .map(|v| v.label().to_string())
                .collect(),
        }
    }
}

/// [`FieldValue::from_value`] for [`FieldEnum`] types.
pub fn enum_from_value<E: FieldEnum>(value: Value) -> Result<E, GenerationError> {
    match value {
        Value::Enum { variant, index, .. } => E::variants()
            .get(index)
            .filter(|v| v.label() == variant)
            .or_else(|| E::variants().iter().find(|v| v.label() == variant))
            .cloned()
            .ok_or_else(|| {
                GenerationError::invalid_argument(format!(
                    "{variant} is not a variant of {}",
                    E::type_name()
                ))
            }),
        other => Err(mismatch(&FieldType::Enum(E::enum_type()), &other)),
    }
}

/// [`FieldValue::into_value`] for [`FieldEnum`] types.
pub fn enum_into_value<E: FieldEnum>(value: &E) -> Value {
    let label = value.label();
    Value::Enum {
        type_name: E::type_name().to_string(),
        variant: label.to_string(),
        index: E::variants()
            .iter()
            .position(|v| v.label() == label)
            .unwrap_or_default(),
    }
}

/// [`FieldValue::from_value`] for types carried as [`Value::Object`].
pub fn object_from_value<T: Any + Send>(value: Value) -> Result<T, GenerationError> {
    match value {
        Value::Object { type_name, value } => value.downcast::<T>().map(|v| *v).map_err(|_| {
            GenerationError::invalid_argument(format!(
                "cannot assign a {type_name} value to a field of type {}",
                std::any::type_name::<T>()
            ))
        }),
        other => Err(GenerationError::invalid_argument(format!(
            "cannot assign a {} value to a field of type {}",
            other.type_label(),
            std::any::type_name::<T>()
        ))),
    }
}

/// Declare a fieldless enum that can be generated and assigned.
///
/// ```rust
/// fixture_generator::field_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Color { Red, Green, Blue }
/// }
///
/// use fixture_generator::FieldEnum;
/// assert_eq!(Color::variants().len(), 3);
/// assert_eq!(Color::Green.label(), "Green");
/// ```
#[macro_export]
macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        $vis enum $name { $($variant),* }

        impl $crate::FieldEnum for $name {
            fn type_name() -> &'static str {
                stringify!($name)
            }

            fn variants() -> &'static [Self] {
                &[$($name::$variant),*]
            }

            fn label(&self) -> &'static str {
                match *self {
                    $($name::$variant => stringify!($variant)),*
                }
            }
        }

        impl $crate::FieldValue for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Enum(<$name as $crate::FieldEnum>::enum_type())
            }

            fn from_value(value: $crate::Value) -> Result<Self, $crate::GenerationError> {
                $crate::value::enum_from_value(value)
            }

            fn into_value(self) -> $crate::Value {
                $crate::value::enum_into_value(&self)
            }
        }
    };
}

/// Make [`Fixture`](crate::Fixture) types assignable as nested pojo fields.
///
/// The types must also implement `Default`.
#[macro_export]
macro_rules! pojo_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn field_type() -> $crate::FieldType {
                    $crate::FieldType::Pojo($crate::PojoType::of::<$ty>())
                }

                fn from_value(value: $crate::Value) -> Result<Self, $crate::GenerationError> {
                    $crate::value::object_from_value(value)
                }

                fn into_value(self) -> $crate::Value {
                    $crate::Value::object(self)
                }
            }
        )+
    };
}

/// Make user types assignable from custom generators only.
#[macro_export]
macro_rules! opaque_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn field_type() -> $crate::FieldType {
                    $crate::FieldType::Opaque(stringify!($ty))
                }

                fn from_value(value: $crate::Value) -> Result<Self, $crate::GenerationError> {
                    $crate::value::object_from_value(value)
                }

                fn into_value(self) -> $crate::Value {
                    $crate::Value::object(self)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::field_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Color { Red, Green, Blue }
    }

    #[derive(Debug, PartialEq)]
    struct Money(i64);

    crate::opaque_field!(Money);

    #[test]
    fn test_primitive_round_trip() {
        assert_eq!(i32::from_value(5i32.into_value()).unwrap(), 5);
        assert_eq!(
            String::from_value("abc".to_string().into_value()).unwrap(),
            "abc"
        );

        let err = i64::from_value(Value::Int(5)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));
        assert!(err.to_string().contains("int value to a field of type long"));
    }

    #[test]
    fn test_list_field_type() {
        let field_type = <Vec<String>>::field_type();
        assert_eq!(field_type.describe(), "list<string>");
        assert!(field_type.same_as(&FieldType::List(Box::new(FieldType::String))));
        assert!(!field_type.same_as(&FieldType::List(Box::new(FieldType::Int))));

        let value = Value::List(vec![Value::Int(1), Value::String("x".into())]);
        assert!(<Vec<i32>>::from_value(value).is_err());
    }

    #[test]
    fn test_enum_values() {
        assert_eq!(Color::variants(), &[Color::Red, Color::Green, Color::Blue]);
        assert_eq!(
            Color::enum_type().variants,
            vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()]
        );

        let value = Color::Blue.into_value();
        assert_eq!(value.as_str(), Some("Blue"));
        assert_eq!(Color::from_value(value).unwrap(), Color::Blue);

        let foreign = Value::Enum {
            type_name: "Color".into(),
            variant: "Purple".into(),
            index: 0,
        };
        assert!(Color::from_value(foreign).is_err());
    }

    #[test]
    fn test_opaque_values() {
        assert_eq!(Money::field_type().describe(), "Money");
        assert_eq!(Money::from_value(Money(12).into_value()).unwrap(), Money(12));
        assert!(Money::from_value(Value::object(7u8)).is_err());
    }

    #[test]
    fn test_same_as_primitives() {
        assert!(FieldType::Int.same_as(&FieldType::Int));
        assert!(!FieldType::Int.same_as(&FieldType::Long));
        assert!(!FieldType::Opaque("A").same_as(&FieldType::Opaque("B")));
    }

    #[test]
    fn test_from_kind() {
        let kind = FieldKind::List {
            element_type: Box::new(FieldKind::Enum {
                name: "status".into(),
                values: vec!["active".into(), "inactive".into()],
            }),
        };
        assert_eq!(FieldType::from_kind(&kind).describe(), "list<enum status>");
    }

    #[test]
    fn test_to_json() {
        let value = Value::List(vec![Value::Int(1), Value::Bool(true), Value::String("a".into())]);
        assert_eq!(value.to_json(), serde_json::json!([1, true, "a"]));

        let date = Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(date.to_json(), serde_json::json!("2024-02-29"));
    }
}
