//! Built-in value generators.
//!
//! Constructors validate their parameters and return a ready generator;
//! generators themselves never fail.

pub mod composite;
pub mod numeric;
pub mod strings;
pub mod time;

pub use composite::{
    enum_of, enum_values, list_of, list_of_any_size, map_of, one_of, EnumOf, EnumValues, ListOf,
    MapOf, OneOf,
};
pub use numeric::{
    any_doubles, any_floats, any_integers, any_longs, booleans, double_in_range, doubles, floats,
    int_in_range, integers, longs, negative_doubles, negative_floats, negative_integers,
    negative_longs, positive_doubles, positive_floats, positive_integers, positive_longs,
    safe_decrement, safe_increment, small_positive_doubles, small_positive_integers,
    small_positive_longs, Booleans, BoundedInt, DoubleRange, FloatRange, IntRange,
};
pub use strings::{
    alphabetic_strings, alphabetic_strings_any_length, alphanumeric_strings, bytes, hex_strings,
    numeric_strings, strings, urls, uuid_v4, uuids, CharsetString, UnicodeString, Urls, Uuids,
};
pub use time::{
    dates, dates_between, days_ago, days_ahead, hours_ago, hours_ahead, instants, instants_between,
    minutes_ago, minutes_ahead, Dates, Instants,
};
