//! Serde support for configuration-facing types.
//!
//! Closed enums serialize as their canonical short names, so an unknown
//! key fails deserialization instead of surfacing during a search.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeVector};
use crate::filter::{FilterOperator, RuneFilter, Tier};
use crate::prediction::Prediction;
use crate::rune::RuneSet;
use crate::stat::StatKind;

macro_rules! string_serde {
    ($ty:ty, $expecting:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct StrVisitor;

                impl Visitor<'_> for StrVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<$ty, E> {
                        v.parse().map_err(E::custom)
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<$ty, E> {
                        self.visit_str(&v.to_string())
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<$ty, E> {
                        self.visit_str(&v.to_string())
                    }
                }

                deserializer.deserialize_any(StrVisitor)
            }
        }
    };
}

string_serde!(Attribute, "an attribute name such as \"SPD\"");
string_serde!(StatKind, "a stat kind such as \"HPperc\"");
string_serde!(RuneSet, "a rune set name such as \"Violent\"");
string_serde!(Tier, "a filter tier: g, o, e or 1..6");

/// Sparse form: only non-zero entries are written.
impl Serialize for AttributeVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<_> = self.non_zero().collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (attribute, value) in entries {
            map.serialize_entry(&attribute, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VectorVisitor;

        impl<'de> Visitor<'de> for VectorVisitor {
            type Value = AttributeVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute name to number")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut vector = AttributeVector::new();
                while let Some((attribute, value)) = access.next_entry::<Attribute, f64>()? {
                    vector[attribute] = value;
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_map(VectorVisitor)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuneFilterRepr {
    #[serde(default)]
    flat: f64,
    #[serde(default)]
    percent: f64,
    #[serde(default)]
    test: f64,
}

impl Serialize for RuneFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RuneFilterRepr {
            flat: self.flat,
            percent: self.percent,
            test: self.test,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuneFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let r = RuneFilterRepr::deserialize(deserializer)?;
        Ok(RuneFilter::new(r.flat, r.percent, r.test))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PredictionRepr {
    #[serde(default)]
    level: u8,
    #[serde(default)]
    predict_subs: bool,
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PredictionRepr {
            level: self.level,
            predict_subs: self.predict_subs,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Prediction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let r = PredictionRepr::deserialize(deserializer)?;
        Ok(Prediction::new(r.level, r.predict_subs))
    }
}

/// `"or"`, `"and"` or `{ sum = <target> }`.
impl Serialize for FilterOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterOperator::Or => serializer.serialize_str("or"),
            FilterOperator::And => serializer.serialize_str("and"),
            FilterOperator::Sum(target) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("sum", target)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OperatorVisitor;

        impl<'de> Visitor<'de> for OperatorVisitor {
            type Value = FilterOperator;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"or\", \"and\" or { sum = <target> }")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v {
                    "or" => Ok(FilterOperator::Or),
                    "and" => Ok(FilterOperator::And),
                    other => Err(E::unknown_variant(other, &["or", "and", "sum"])),
                }
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let entries: BTreeMap<String, f64> =
                    Deserialize::deserialize(de::value::MapAccessDeserializer::new(&mut access))?;
                match (entries.get("sum"), entries.len()) {
                    (Some(target), 1) => Ok(FilterOperator::Sum(*target)),
                    _ => Err(de::Error::custom("expected exactly one key: sum")),
                }
            }
        }

        deserializer.deserialize_any(OperatorVisitor)
    }
}
