//! String, UUID, URL and byte generators.

use fixture_core::{Charset, GenerationError};
use rand::{Rng, RngCore};
use uuid::Uuid;

use super::composite::{one_of, OneOf};
use super::numeric::int_in_range;
use crate::generator::{BoxedGenerator, ValueGenerator, ValueGeneratorExt};

const ALPHABETIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const HEXADECIMAL: &[u8] = b"0123456789abcdef";
const NUMERIC: &[u8] = b"0123456789";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

const TOP_LEVEL_DOMAINS: &[&str] = &["com", "net", "org", "io", "dev", "co.uk"];

fn pick(rng: &mut dyn RngCore, alphabet: &[u8]) -> char {
    alphabet[rng.random_range(0..alphabet.len())] as char
}

fn check_length(length: usize) -> Result<(), GenerationError> {
    GenerationError::check_argument(length > 0, "string length must be greater than 0")
}

/// Fixed-length strings over a single alphabet.
#[derive(Debug, Clone, Copy)]
pub struct CharsetString {
    alphabet: &'static [u8],
    length: usize,
}

impl ValueGenerator<String> for CharsetString {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        (0..self.length).map(|_| pick(rng, self.alphabet)).collect()
    }
}

pub fn alphabetic_strings(length: usize) -> Result<CharsetString, GenerationError> {
    check_length(length)?;
    Ok(CharsetString {
        alphabet: ALPHABETIC,
        length,
    })
}

pub fn alphanumeric_strings(length: usize) -> Result<CharsetString, GenerationError> {
    check_length(length)?;
    Ok(CharsetString {
        alphabet: ALPHANUMERIC,
        length,
    })
}

/// Lowercase hexadecimal digits.
pub fn hex_strings(length: usize) -> Result<CharsetString, GenerationError> {
    check_length(length)?;
    Ok(CharsetString {
        alphabet: HEXADECIMAL,
        length,
    })
}

pub fn numeric_strings(length: usize) -> Result<CharsetString, GenerationError> {
    check_length(length)?;
    Ok(CharsetString {
        alphabet: NUMERIC,
        length,
    })
}

/// Fixed-length strings of arbitrary Unicode scalar values.
#[derive(Debug, Clone, Copy)]
pub struct UnicodeString {
    length: usize,
}

impl ValueGenerator<String> for UnicodeString {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        (0..self.length).map(|_| rng.random::<char>()).collect()
    }
}

/// `length` counts characters, not bytes.
pub fn strings(length: usize) -> Result<UnicodeString, GenerationError> {
    check_length(length)?;
    Ok(UnicodeString { length })
}

/// Alphabetic strings of a random length in `[5, 20)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyLengthAlphabetic;

impl ValueGenerator<String> for AnyLengthAlphabetic {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        let length = int_in_range(rng, 5i32, 20) as usize;
        (0..length).map(|_| pick(rng, ALPHABETIC)).collect()
    }
}

pub fn alphabetic_strings_any_length() -> AnyLengthAlphabetic {
    AnyLengthAlphabetic
}

/// Generate a random UUID v4 using the provided RNG.
pub fn uuid_v4(rng: &mut dyn RngCore) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // Version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // Variant RFC 4122

    Uuid::from_bytes(bytes)
}

/// Hyphenated UUID v4 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uuids;

impl ValueGenerator<String> for Uuids {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        uuid_v4(rng).hyphenated().to_string()
    }
}

pub fn uuids() -> Uuids {
    Uuids
}

/// Generator for a `string` descriptor.
pub fn string_generator(
    charset: Charset,
    length: usize,
) -> Result<BoxedGenerator<String>, GenerationError> {
    check_length(length)?;
    Ok(match charset {
        Charset::Alphabetic => alphabetic_strings(length)?.boxed(),
        Charset::Alphanumeric => alphanumeric_strings(length)?.boxed(),
        Charset::Hexadecimal => hex_strings(length)?.boxed(),
        Charset::Numeric => numeric_strings(length)?.boxed(),
        Charset::Uuid => uuids().boxed(),
    })
}

/// Random byte arrays of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct Bytes {
    length: usize,
}

impl ValueGenerator<Vec<u8>> for Bytes {
    fn generate(&self, rng: &mut dyn RngCore) -> Vec<u8> {
        let mut bytes = vec![0u8; self.length];
        rng.fill_bytes(&mut bytes);
        bytes
    }
}

pub fn bytes(length: usize) -> Result<Bytes, GenerationError> {
    GenerationError::check_argument(length > 0, "byte length must be greater than 0")?;
    Ok(Bytes { length })
}

/// URLs of the form `{protocol}://www.{host}.{tld}`.
#[derive(Debug, Clone)]
pub struct Urls {
    protocol: String,
    tlds: OneOf<&'static str>,
}

impl ValueGenerator<String> for Urls {
    fn generate(&self, rng: &mut dyn RngCore) -> String {
        let host_length = int_in_range(rng, 5i32, 15) as usize;
        let host: String = (0..host_length).map(|_| pick(rng, LOWERCASE)).collect();
        let tld = self.tlds.generate(rng);
        format!("{}://www.{host}.{tld}", self.protocol)
    }
}

pub fn urls(protocol: impl Into<String>) -> Result<Urls, GenerationError> {
    let protocol = protocol.into();
    GenerationError::check_argument(
        !protocol.trim().is_empty(),
        "url protocol must not be empty",
    )?;
    Ok(Urls {
        protocol,
        tlds: one_of(TOP_LEVEL_DOMAINS.to_vec())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hex_strings() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = string_generator(Charset::Hexadecimal, 90)
            .unwrap()
            .generate(&mut rng);

        assert_eq!(value.len(), 90);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_unicode_strings() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = strings(40).unwrap();
        for _ in 0..100 {
            assert_eq!(generator.generate(&mut rng).chars().count(), 40);
        }
    }

    #[test]
    fn test_charsets() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let v = alphabetic_strings(12).unwrap().generate(&mut rng);
            assert_eq!(v.len(), 12);
            assert!(v.chars().all(|c| c.is_ascii_alphabetic()));

            let v = alphanumeric_strings(8).unwrap().generate(&mut rng);
            assert!(v.chars().all(|c| c.is_ascii_alphanumeric()));

            let v = numeric_strings(6).unwrap().generate(&mut rng);
            assert!(v.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(matches!(
            alphabetic_strings(0),
            Err(GenerationError::InvalidArgument(_))
        ));
        assert!(string_generator(Charset::Numeric, 0).is_err());
        assert!(matches!(
            string_generator(Charset::Uuid, 0),
            Err(GenerationError::InvalidArgument(_))
        ));
        assert!(strings(0).is_err());
        assert!(bytes(0).is_err());
        // Any positive length is accepted for uuids and then ignored
        assert!(string_generator(Charset::Uuid, 1).is_ok());
    }

    #[test]
    fn test_any_length_alphabetic() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let v = alphabetic_strings_any_length().generate(&mut rng);
            assert!((5..20).contains(&v.len()));
        }
    }

    #[test]
    fn test_uuid_version() {
        let mut rng = StdRng::seed_from_u64(42);
        let uuid = uuid_v4(&mut rng);
        assert_eq!(uuid.get_version_num(), 4);

        let text = uuids().generate(&mut rng);
        assert_eq!(text.len(), 36);
        assert!(Uuid::parse_str(&text).is_ok());
    }

    #[test]
    fn test_uuid_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(uuid_v4(&mut rng1), uuid_v4(&mut rng2));
    }

    #[test]
    fn test_bytes() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(bytes(32).unwrap().generate(&mut rng).len(), 32);
    }

    #[test]
    fn test_urls() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = urls("https").unwrap();
        for _ in 0..100 {
            let url = generator.generate(&mut rng);
            assert!(url.starts_with("https://www."), "{url}");
            let host = &url["https://www.".len()..];
            assert!(host.contains('.'));
        }

        assert!(matches!(urls(""), Err(GenerationError::InvalidArgument(_))));
    }
}
