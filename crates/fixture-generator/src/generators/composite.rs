//! Generators composed from other generators.

use fixture_core::GenerationError;
use rand::RngCore;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::numeric::int_in_range;
use crate::generator::ValueGenerator;
use crate::value::{EnumType, FieldEnum, Value};

/// Size range used when a list size is left open.
const ANY_SIZE_MIN: i32 = 5;
const ANY_SIZE_MAX: i32 = 200;

/// Uniform index in `[0, len)`, drawn through the bounded range generator.
fn pick_index(rng: &mut dyn RngCore, len: usize) -> usize {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    int_in_range(rng, 0, len) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListSize {
    Exact(usize),
    Between(i32, i32),
}

/// Lists of independently generated elements.
#[derive(Debug, Clone)]
pub struct ListOf<G> {
    element: G,
    size: ListSize,
}

impl<T, G: ValueGenerator<T>> ValueGenerator<Vec<T>> for ListOf<G> {
    fn generate(&self, rng: &mut dyn RngCore) -> Vec<T> {
        let size = match self.size {
            ListSize::Exact(size) => size,
            ListSize::Between(min, max) => int_in_range(rng, min, max) as usize,
        };
        (0..size).map(|_| self.element.generate(rng)).collect()
    }
}

/// Lists of exactly `size` elements.
pub fn list_of<G>(element: G, size: usize) -> Result<ListOf<G>, GenerationError> {
    GenerationError::check_argument(size > 0, "list size must be greater than 0")?;
    Ok(ListOf {
        element,
        size: ListSize::Exact(size),
    })
}

/// Lists whose size is drawn from `[5, 200)` on every invocation.
pub fn list_of_any_size<G>(element: G) -> ListOf<G> {
    ListOf {
        element,
        size: ListSize::Between(ANY_SIZE_MIN, ANY_SIZE_MAX),
    }
}

/// Maps built from `size` generated key/value pairs.
///
/// Keys are not deduplicated: when two generated keys collide the later
/// value wins, so the map may hold fewer than `size` entries.
#[derive(Debug, Clone)]
pub struct MapOf<K, V> {
    keys: K,
    values: V,
    size: usize,
}

impl<K, V, KT, VT> ValueGenerator<HashMap<KT, VT>> for MapOf<K, V>
where
    K: ValueGenerator<KT>,
    V: ValueGenerator<VT>,
    KT: Hash + Eq,
{
    fn generate(&self, rng: &mut dyn RngCore) -> HashMap<KT, VT> {
        let mut map = HashMap::with_capacity(self.size);
        for _ in 0..self.size {
            let key = self.keys.generate(rng);
            let value = self.values.generate(rng);
            map.insert(key, value);
        }
        map
    }
}

pub fn map_of<K, V>(keys: K, values: V, size: usize) -> Result<MapOf<K, V>, GenerationError> {
    GenerationError::check_argument(size > 0, "map size must be greater than 0")?;
    Ok(MapOf { keys, values, size })
}

/// Uniform choice from a fixed candidate set.
#[derive(Debug, Clone)]
pub struct OneOf<T> {
    candidates: Vec<T>,
}

impl<T: Clone> ValueGenerator<T> for OneOf<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.candidates[pick_index(rng, self.candidates.len())].clone()
    }
}

pub fn one_of<T: Clone>(candidates: Vec<T>) -> Result<OneOf<T>, GenerationError> {
    GenerationError::check_argument(
        !candidates.is_empty(),
        "candidate set must not be empty",
    )?;
    Ok(OneOf { candidates })
}

/// Uniform choice among the variants of a [`FieldEnum`].
pub struct EnumOf<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: FieldEnum> ValueGenerator<E> for EnumOf<E> {
    fn generate(&self, rng: &mut dyn RngCore) -> E {
        let variants = E::variants();
        variants[pick_index(rng, variants.len())].clone()
    }
}

pub fn enum_of<E: FieldEnum>() -> Result<EnumOf<E>, GenerationError> {
    GenerationError::check_argument(
        !E::variants().is_empty(),
        format!("enum {} declares no variants", E::type_name()),
    )?;
    Ok(EnumOf {
        _marker: PhantomData,
    })
}

/// Uniform choice among the variants of a runtime enum type.
#[derive(Debug, Clone)]
pub struct EnumValues {
    enum_type: EnumType,
}

impl ValueGenerator<Value> for EnumValues {
    fn generate(&self, rng: &mut dyn RngCore) -> Value {
        let index = pick_index(rng, self.enum_type.variants.len());
        Value::Enum {
            type_name: self.enum_type.name.clone(),
            variant: self.enum_type.variants[index].clone(),
            index,
        }
    }
}

pub fn enum_values(enum_type: &EnumType) -> Result<EnumValues, GenerationError> {
    GenerationError::check_argument(
        !enum_type.variants.is_empty(),
        format!("enum {} declares no variants", enum_type.name),
    )?;
    Ok(EnumValues {
        enum_type: enum_type.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::numeric::{integers, small_positive_integers};
    use crate::generators::strings::alphanumeric_strings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    crate::field_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Suit { Hearts, Spades, Clubs, Diamonds }
    }

    crate::field_enum! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Nothing {}
    }

    #[test]
    fn test_list_of_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = list_of(alphanumeric_strings(10).unwrap(), 50).unwrap();
        let list = generator.generate(&mut rng);

        assert_eq!(list.len(), 50);
        for item in &list {
            assert_eq!(item.len(), 10);
            assert!(item.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_list_of_any_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = list_of_any_size(small_positive_integers());
        for _ in 0..100 {
            let list = generator.generate(&mut rng);
            assert!((5..200).contains(&list.len()));
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            list_of(small_positive_integers(), 0),
            Err(GenerationError::InvalidArgument(_))
        ));
        assert!(map_of(small_positive_integers(), small_positive_integers(), 0).is_err());
    }

    #[test]
    fn test_map_of_collisions_overwrite() {
        let mut rng = StdRng::seed_from_u64(42);
        // Only two possible keys, so most insertions collide
        let generator = map_of(integers(0, 2).unwrap(), small_positive_integers(), 20).unwrap();
        let map = generator.generate(&mut rng);

        assert!(!map.is_empty());
        assert!(map.len() <= 2);
    }

    #[test]
    fn test_pick_index_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [1usize, 2, 7, 1000] {
            for _ in 0..500 {
                assert!(pick_index(&mut rng, len) < len);
            }
        }
        assert_eq!(one_of(vec!["only"]).unwrap().generate(&mut rng), "only");
    }

    #[test]
    fn test_one_of() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = one_of(vec!["red", "green", "blue"]).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(generator.generate(&mut rng));
        }
        assert_eq!(seen.len(), 3);

        assert!(matches!(
            one_of(Vec::<i32>::new()),
            Err(GenerationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_enum_of() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = enum_of::<Suit>().unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(generator.generate(&mut rng) as u8);
        }
        assert_eq!(seen.len(), 4);

        assert!(enum_of::<Nothing>().is_err());
    }

    #[test]
    fn test_enum_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = enum_values(&Suit::enum_type()).unwrap();
        match generator.generate(&mut rng) {
            Value::Enum {
                type_name,
                variant,
                index,
            } => {
                assert_eq!(type_name, "Suit");
                assert_eq!(Suit::variants()[index].label(), variant);
            }
            other => panic!("Expected enum value, got {other:?}"),
        }

        let empty = EnumType {
            name: "Empty".to_string(),
            variants: vec![],
        };
        assert!(enum_values(&empty).is_err());
    }
}
