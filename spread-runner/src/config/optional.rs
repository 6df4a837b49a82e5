// Copyright (c) The spread Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Deserializer};
use std::fmt;

/// An integer setting that records whether it was present in the project file.
///
/// Use it with `#[serde(default)]`: an absent key (or an explicit null) leaves it unset, and any
/// integer, including 0, marks it as set. When unset, `value` is always 0.
///
/// The [`Display`](fmt::Display) impl renders `value` whether or not it is set, so `"0"` alone
/// doesn't tell an explicit zero apart from an absent key. Check [`is_set`](Self::is_set) for that.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionalInt {
    is_set: bool,
    // Always 0 when unset.
    value: i64,
}

impl OptionalInt {
    /// Creates a set value.
    pub fn new(value: i64) -> Self {
        Self {
            is_set: true,
            value,
        }
    }

    /// Creates an unset value.
    pub const fn unset() -> Self {
        Self {
            is_set: false,
            value: 0,
        }
    }

    /// Returns true if the key was present.
    pub fn is_set(self) -> bool {
        self.is_set
    }

    /// Returns the value, or 0 if not set.
    pub fn value(self) -> i64 {
        self.value
    }

    /// Returns the value if it is set.
    pub fn get(self) -> Option<i64> {
        self.is_set.then_some(self.value)
    }

    /// Replaces an unset value with `parent`. A set value is left alone.
    pub fn inherit(&mut self, parent: OptionalInt) {
        if !self.is_set {
            *self = parent;
        }
    }
}

impl From<Option<i64>> for OptionalInt {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::unset(),
        }
    }
}

impl fmt::Display for OptionalInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<'de> Deserialize<'de> for OptionalInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(Self::from)
    }
}

/// A setting that is either given in the project file or inherited from an enclosing scope.
///
/// Before inheritance is applied, a value that wasn't in the project file holds `T::default()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inheritable<T> {
    value: T,
    is_explicit: bool,
}

impl<T> Inheritable<T> {
    /// Creates a value that was given in the project file.
    pub fn explicit(value: T) -> Self {
        Self {
            value,
            is_explicit: true,
        }
    }

    /// Returns the current value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns true if the value was given in the project file.
    pub fn is_explicit(&self) -> bool {
        self.is_explicit
    }

    /// Copies `parent` into this setting unless it was given in the project file.
    ///
    /// Applying this more than once with the same parent has no further effect.
    pub fn inherit_from(&mut self, parent: &T)
    where
        T: Clone,
    {
        if !self.is_explicit {
            self.value = parent.clone();
        }
    }
}

impl<T: Default> From<Option<T>> for Inheritable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::explicit(value),
            None => Self::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Inheritable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
