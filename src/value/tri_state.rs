//! `TriState` boolean for nullable flag columns.
//!
//! A nullable boolean column has three states and the unset one carries meaning
//! (it selects a default). `TriState` keeps that state explicit instead of folding it
//! into `Option<bool>` checks scattered through the accessors.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Boolean that remembers whether it was ever assigned.
///
/// # Example
///
/// ```
/// use catalog_options::TriState;
///
/// let flag = TriState::Unset;
/// assert!(flag.unwrap_or(true));
/// assert!(!TriState::False.unwrap_or(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    /// Never assigned; reads fall back to a caller supplied default.
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// Resolve to a plain boolean, using `default` when unset.
    #[must_use]
    pub fn unwrap_or(self, default: bool) -> bool {
        self.as_option().unwrap_or(default)
    }

    /// The explicit value, if one was assigned.
    #[must_use]
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        matches!(self, TriState::Unset)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriState::Unset, TriState::from)
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_option()
    }
}

// Serialized as `null | true | false` so the unset state survives a round trip.
impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriState::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert_eq!(TriState::default(), TriState::Unset);
        assert!(TriState::default().is_unset());
    }

    #[test]
    fn test_unwrap_or() {
        assert!(TriState::Unset.unwrap_or(true));
        assert!(!TriState::Unset.unwrap_or(false));
        assert!(TriState::True.unwrap_or(false));
        assert!(!TriState::False.unwrap_or(true));
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(TriState::from(None), TriState::Unset);
        assert_eq!(TriState::from(Some(false)), TriState::False);
        assert_eq!(Option::<bool>::from(TriState::True), Some(true));
    }

    #[test]
    fn test_serde_keeps_unset_apart_from_false() {
        assert_eq!(serde_json::to_string(&TriState::Unset).unwrap(), "null");
        assert_eq!(serde_json::to_string(&TriState::False).unwrap(), "false");
        let unset: TriState = serde_json::from_str("null").unwrap();
        let explicit: TriState = serde_json::from_str("false").unwrap();
        assert_eq!(unset, TriState::Unset);
        assert_eq!(explicit, TriState::False);
    }
}
