//! Capability sets using bitflags.
//!
//! Each capability names a protected feature area of the admin front end.
//! On the wire a set is a JSON array of snake_case keys, e.g.
//! `["dashboard", "incentives"]`.

use bitflags::bitflags;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of feature areas a user may access.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Default landing page, granted to every role
        const DASHBOARD          = 1 << 0;
        /// Personnel charge entry and review
        const PERSONNEL_CHARGES  = 1 << 1;
        /// Incentive entry and review
        const INCENTIVES         = 1 << 2;
        /// User administration pages
        const USER_MANAGEMENT    = 1 << 3;
        /// Approval queue for pending requests
        const APPROVALS          = 1 << 4;
        /// Reports and exports
        const REPORTS            = 1 << 5;
        /// Document upload and signing
        const DOCUMENTS          = 1 << 6;
        /// Platform settings
        const SETTINGS           = 1 << 7;
    }
}

/// A capability key that is not part of the known universe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl Capabilities {
    /// The capability every role holds and no role may restrict.
    pub const LANDING_PAGE: Self = Self::DASHBOARD;

    /// Look up a single capability by its snake_case key.
    ///
    /// # Examples
    ///
    /// ```
    /// use wf_common::Capabilities;
    ///
    /// assert_eq!(Capabilities::from_key("user_management"), Some(Capabilities::USER_MANAGEMENT));
    /// assert_eq!(Capabilities::from_key("USER_MANAGEMENT"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
            return None;
        }
        Self::from_name(&key.to_ascii_uppercase())
    }

    /// Parse a list of keys, failing on the first unknown one.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, UnknownCapability>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().try_fold(Self::empty(), |acc, key| {
            let key = key.as_ref();
            Self::from_key(key)
                .map(|cap| acc | cap)
                .ok_or_else(|| UnknownCapability(key.to_string()))
        })
    }

    /// The snake_case keys of every capability in this set, in bit order.
    #[must_use]
    pub fn keys(self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = self.keys();
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in &keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = Vec::<String>::deserialize(deserializer)?;
        Self::from_keys(&keys).map_err(D::Error::custom)
    }
}
