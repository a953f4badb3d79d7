//! First-party caveats and the caveat codec.
//!
//! A caveat is a named restriction carried inside a token, encoded as the
//! flat string `condition=value`. Decoding is strict: the string must split
//! on `=` into exactly two parts, so a condition or value containing `=`
//! cannot round-trip. See [`Caveat::is_round_trippable`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CaveatError;

/// Delimiter between condition and value in an encoded caveat.
pub const CAVEAT_DELIMITER: char = '=';

/// A single first-party restriction: `condition=value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Caveat {
    /// Name of the restriction (e.g. `RequestPath`).
    pub condition: String,
    /// Required value of the restriction.
    pub value: String,
}

impl Caveat {
    /// Create a new caveat.
    pub fn new(condition: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            value: value.into(),
        }
    }

    /// Encode as `condition=value`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.condition, CAVEAT_DELIMITER, self.value)
    }

    /// Decode a `condition=value` string.
    ///
    /// Fails unless the string contains exactly one `=`.
    ///
    /// # Example
    /// ```
    /// use lsat_types::Caveat;
    ///
    /// let caveat = Caveat::decode("RequestPath=/protected").unwrap();
    /// assert_eq!(caveat, Caveat::new("RequestPath", "/protected"));
    /// assert!(Caveat::decode("no-delimiter").is_err());
    /// assert!(Caveat::decode("a=b=c").is_err());
    /// ```
    pub fn decode(raw: &str) -> Result<Self, CaveatError> {
        let mut parts = raw.split(CAVEAT_DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(condition), Some(value), None) => Ok(Self::new(condition, value)),
            _ => Err(CaveatError::Format(raw.to_string())),
        }
    }

    /// Whether `decode(encode(self)) == self`.
    ///
    /// False when the condition or value contains the delimiter.
    pub fn is_round_trippable(&self) -> bool {
        !self.condition.contains(CAVEAT_DELIMITER) && !self.value.contains(CAVEAT_DELIMITER)
    }

    /// Whether the caveat can be put in a token: a non-empty condition that
    /// round-trips through the codec.
    pub fn is_well_formed(&self) -> bool {
        !self.condition.is_empty() && self.is_round_trippable()
    }
}

impl std::fmt::Display for Caveat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl std::str::FromStr for Caveat {
    type Err = CaveatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// The caveats a token must carry, keyed by condition.
///
/// Conditions are unique; inserting a condition twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredCaveats {
    by_condition: BTreeMap<String, String>,
}

impl RequiredCaveats {
    /// Create an empty requirement set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a required caveat.
    pub fn insert(&mut self, caveat: Caveat) {
        self.by_condition.insert(caveat.condition, caveat.value);
    }

    /// Required value for a condition, if any.
    pub fn get(&self, condition: &str) -> Option<&str> {
        self.by_condition.get(condition).map(String::as_str)
    }

    /// Number of distinct required conditions.
    pub fn len(&self) -> usize {
        self.by_condition.len()
    }

    /// Whether nothing is required.
    pub fn is_empty(&self) -> bool {
        self.by_condition.is_empty()
    }

    /// Iterate required caveats in condition order.
    pub fn iter(&self) -> impl Iterator<Item = Caveat> + '_ {
        self.by_condition
            .iter()
            .map(|(condition, value)| Caveat::new(condition.clone(), value.clone()))
    }
}

impl FromIterator<Caveat> for RequiredCaveats {
    fn from_iter<I: IntoIterator<Item = Caveat>>(iter: I) -> Self {
        let mut required = Self::new();
        required.extend(iter);
        required
    }
}

impl Extend<Caveat> for RequiredCaveats {
    fn extend<I: IntoIterator<Item = Caveat>>(&mut self, iter: I) {
        for caveat in iter {
            self.insert(caveat);
        }
    }
}

impl<'a> From<&'a [Caveat]> for RequiredCaveats {
    fn from(caveats: &'a [Caveat]) -> Self {
        caveats.iter().cloned().collect()
    }
}

/// Check presented raw caveats against the required set.
///
/// Entries that do not decode are skipped: they may be caveats this codec
/// does not understand. Among decoded entries a repeated condition keeps its
/// last value. Every required condition must be present with an equal value;
/// extra presented conditions are ignored.
///
/// # Example
/// ```
/// use lsat_types::{verify_presented, Caveat, RequiredCaveats};
///
/// let required: RequiredCaveats = [Caveat::new("RequestPath", "/a")].into_iter().collect();
/// assert!(verify_presented(&["RequestPath=/a", "tier=gold"], &required).is_ok());
/// assert!(verify_presented(&["RequestPath=/b"], &required).is_err());
/// ```
pub fn verify_presented<S: AsRef<str>>(
    presented: &[S],
    required: &RequiredCaveats,
) -> Result<(), CaveatError> {
    let decoded: Vec<Caveat> = presented
        .iter()
        .filter_map(|raw| Caveat::decode(raw.as_ref()).ok())
        .collect();

    if decoded.len() < required.len() {
        return Err(CaveatError::Mismatch);
    }

    let mut presented_by_condition: BTreeMap<&str, &str> = BTreeMap::new();
    for caveat in &decoded {
        presented_by_condition.insert(&caveat.condition, &caveat.value);
    }

    for (condition, value) in &required.by_condition {
        match presented_by_condition.get(condition.as_str()) {
            Some(presented) if *presented == value.as_str() => {}
            _ => return Err(CaveatError::Mismatch),
        }
    }

    Ok(())
}
