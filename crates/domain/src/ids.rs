use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Row identities are SQLite `INTEGER PRIMARY KEY AUTOINCREMENT` values.
///
/// A record that has never been stored carries `None` for its id rather than a
/// sentinel value, so the newtypes only ever wrap ids the store handed out
/// (or ids read back from a delimited list).
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_id!(MediaAssetId);
define_id!(CharacterId);
define_id!(ConfigurationId);
