// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shape of `spread.yaml` as it is decoded, before names are filled in and inheritance is
//! applied.

use super::OptionalInt;
use indexmap::{IndexMap, map::Entry};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};
use std::fmt;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) struct ProjectDeserialize {
    #[serde(default, rename = "project", deserialize_with = "null_as_default")]
    pub(super) name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) backends: IndexMap<String, Option<BackendDeserialize>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) suites: IndexMap<String, Option<SuiteDeserialize>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) struct BackendDeserialize {
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub(super) backend_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) plan: String,
    #[serde(default)]
    pub(super) priority: OptionalInt,
    #[serde(default)]
    pub(super) systems: SystemsDeserialize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) struct SystemDeserialize {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) image: String,
    #[serde(default)]
    pub(super) workers: OptionalInt,
    #[serde(default)]
    pub(super) plan: Option<String>,
    #[serde(default)]
    pub(super) priority: OptionalInt,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) struct SuiteDeserialize {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(super) summary: String,
    #[serde(default)]
    pub(super) priority: OptionalInt,
}

/// The systems of a backend, keyed by name.
///
/// Accepts either a mapping of name to settings, or a sequence whose items are either a bare name
/// or a single-key mapping of name to settings:
///
/// ```yaml
/// systems:
///   - ubuntu-22.04-64
///   - fedora-39-64:
///       plan: large
/// ```
///
/// Settings may be null. Names must be unique within a backend.
#[derive(Debug, Default)]
pub(super) struct SystemsDeserialize(pub(super) IndexMap<String, SystemDeserialize>);

impl SystemsDeserialize {
    fn insert<E: de::Error>(&mut self, name: String, system: SystemDeserialize) -> Result<(), E> {
        match self.0.entry(name) {
            Entry::Occupied(entry) => Err(E::custom(format!(
                "system `{}` is listed more than once",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(system);
                Ok(())
            }
        }
    }
}

impl<'de> Deserialize<'de> for SystemsDeserialize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = SystemsDeserialize;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a map of system names to settings, or a list of system names"
                )
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SystemsDeserialize::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut systems = SystemsDeserialize::default();
                while let Some((name, system)) =
                    map.next_entry::<String, Option<SystemDeserialize>>()?
                {
                    systems.insert(name, system.unwrap_or_default())?;
                }
                Ok(systems)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut systems = SystemsDeserialize::default();
                while let Some(SystemEntry(name, system)) = seq.next_element()? {
                    systems.insert(name, system)?;
                }
                Ok(systems)
            }
        }

        deserializer.deserialize_any(V)
    }
}

/// A single item in a list of systems.
struct SystemEntry(String, SystemDeserialize);

impl<'de> Deserialize<'de> for SystemEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;

        impl<'de> Visitor<'de> for V {
            type Value = SystemEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a system name, or a map with a single system name as its key"
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(SystemEntry(v.to_owned(), SystemDeserialize::default()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let Some((name, system)) = map.next_entry::<String, Option<SystemDeserialize>>()?
                else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(SystemEntry(name, system.unwrap_or_default()))
            }
        }

        deserializer.deserialize_any(V)
    }
}

/// Deserializes an explicit null as the default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
