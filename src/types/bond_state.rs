// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bond state of a remote Bluetooth device.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Pairing relationship between the local adapter and a remote device.
///
/// # Examples
///
/// ```
/// use bond_watch::types::BondState;
///
/// assert_eq!(BondState::Bonded.as_str(), "BOND_BONDED");
/// assert_eq!(BondState::try_from(11).unwrap(), BondState::Bonding);
/// assert_eq!("bonded".parse::<BondState>().unwrap(), BondState::Bonded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BondState {
    /// No bond exists.
    None,
    /// Bonding is in progress.
    Bonding,
    /// The devices are bonded.
    Bonded,
}

impl BondState {
    /// Raw platform code for [`BondState::None`].
    pub const RAW_NONE: i32 = 10;
    /// Raw platform code for [`BondState::Bonding`].
    pub const RAW_BONDING: i32 = 11;
    /// Raw platform code for [`BondState::Bonded`].
    pub const RAW_BONDED: i32 = 12;

    /// Returns the canonical platform name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "BOND_NONE",
            Self::Bonding => "BOND_BONDING",
            Self::Bonded => "BOND_BONDED",
        }
    }

    /// Returns the raw platform code of the state.
    #[must_use]
    pub const fn as_raw(&self) -> i32 {
        match self {
            Self::None => Self::RAW_NONE,
            Self::Bonding => Self::RAW_BONDING,
            Self::Bonded => Self::RAW_BONDED,
        }
    }

    /// Converts a raw platform code, returning `None` for unknown codes.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            Self::RAW_NONE => Some(Self::None),
            Self::RAW_BONDING => Some(Self::Bonding),
            Self::RAW_BONDED => Some(Self::Bonded),
            _ => None,
        }
    }

    /// Returns `true` while a bonding attempt is in progress.
    #[must_use]
    pub const fn is_bonding(&self) -> bool {
        matches!(self, Self::Bonding)
    }
}

impl fmt::Display for BondState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for BondState {
    type Error = ValueError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(ValueError::UnknownBondState(raw))
    }
}

impl From<BondState> for i32 {
    fn from(state: BondState) -> Self {
        state.as_raw()
    }
}

impl FromStr for BondState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("BOND_").unwrap_or(upper.as_str()) {
            "NONE" => Ok(Self::None),
            "BONDING" => Ok(Self::Bonding),
            "BONDED" => Ok(Self::Bonded),
            other => other
                .parse::<i32>()
                .ok()
                .and_then(Self::from_raw)
                .ok_or_else(|| ValueError::InvalidBondStateName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_match_platform_constants() {
        assert_eq!(BondState::None.as_raw(), 10);
        assert_eq!(BondState::Bonding.as_raw(), 11);
        assert_eq!(BondState::Bonded.as_raw(), 12);
    }

    #[test]
    fn try_from_unknown_code_fails() {
        assert_eq!(
            BondState::try_from(-1),
            Err(ValueError::UnknownBondState(-1))
        );
        assert_eq!(
            BondState::try_from(13),
            Err(ValueError::UnknownBondState(13))
        );
    }

    #[test]
    fn parse_accepts_names_and_codes() {
        assert_eq!("BOND_NONE".parse::<BondState>().unwrap(), BondState::None);
        assert_eq!("bonding".parse::<BondState>().unwrap(), BondState::Bonding);
        assert_eq!(" Bonded ".parse::<BondState>().unwrap(), BondState::Bonded);
        assert_eq!("12".parse::<BondState>().unwrap(), BondState::Bonded);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "paired".parse::<BondState>(),
            Err(ValueError::InvalidBondStateName("paired".to_string()))
        );
        assert!("99".parse::<BondState>().is_err());
    }

    #[test]
    fn display_uses_platform_name() {
        assert_eq!(BondState::Bonding.to_string(), "BOND_BONDING");
    }

    #[test]
    fn only_bonding_is_bonding() {
        assert!(BondState::Bonding.is_bonding());
        assert!(!BondState::None.is_bonding());
        assert!(!BondState::Bonded.is_bonding());
    }
}
