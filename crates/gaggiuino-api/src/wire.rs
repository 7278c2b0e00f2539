// Wire-level coercion helpers
//
// The controller firmware is loose about JSON types: numbers arrive as
// strings on some endpoints, booleans as "true"/"false" on others. These
// `serde` adapters normalise both shapes into the declared Rust type and
// are attached to model fields via `deserialize_with` / `with`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serializer};

/// Parse a boolean the way the firmware writes them.
///
/// Case-insensitive; surrounding whitespace is ignored. Returns `None`
/// for anything outside the accepted vocabulary.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

// ── Booleans ─────────────────────────────────────────────────────────

struct FlexBoolVisitor;

impl Visitor<'_> for FlexBoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, a boolean string, or 0/1")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse_bool(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// Deserialize a boolean from a native bool, a boolean string, or 0/1.
pub fn flex_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(FlexBoolVisitor)
}

/// Booleans the device expects back as `"true"` / `"false"` strings.
///
/// Reads either form, always writes the string form.
pub mod string_bool {
    use super::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        super::flex_bool(deserializer)
    }
}

// ── Numbers ──────────────────────────────────────────────────────────

/// A JSON number or a string holding one.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

/// Deserialize an integer from a JSON integer or a numeric string.
///
/// Floats are accepted only when they carry no fractional part.
pub fn flex_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    let out_of_range = || <D::Error as de::Error>::custom("integer out of range");
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => <T as TryFrom<i64>>::try_from(v).map_err(|_| out_of_range()),
        NumberOrString::Uint(v) => <T as TryFrom<u64>>::try_from(v).map_err(|_| out_of_range()),
        NumberOrString::Float(v) => {
            if v.fract() != 0.0 || !v.is_finite() {
                return Err(de::Error::invalid_value(
                    Unexpected::Float(v),
                    &"an integral number",
                ));
            }
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let whole = v as i64;
            <T as TryFrom<i64>>::try_from(whole).map_err(|_| out_of_range())
        }
        NumberOrString::Str(s) => s
            .trim()
            .parse::<T>()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"an integer string")),
    }
}

/// Deserialize a float from a JSON number or a numeric string.
pub fn flex_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        NumberOrString::Int(v) => Ok(v as f64),
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        NumberOrString::Uint(v) => Ok(v as f64),
        NumberOrString::Float(v) => Ok(v),
        NumberOrString::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a numeric string")),
    }
}

/// Optional variant of [`flex_int`]: absent or `null` decode to `None`.
pub fn flex_int_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + TryFrom<u64> + FromStr,
{
    #[derive(Deserialize)]
    struct Wrapper<T: TryFrom<i64> + TryFrom<u64> + FromStr>(
        #[serde(deserialize_with = "flex_int")] T,
    );

    Option::<Wrapper<T>>::deserialize(deserializer).map(|w| w.map(|Wrapper(v)| v))
}

/// Integers the device sends and expects back as decimal strings.
pub mod string_int {
    use super::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        super::flex_int(deserializer)
    }
}
