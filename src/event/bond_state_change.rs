// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Concluded bonding attempt.

use std::fmt;

use crate::types::BondState;

/// A bond state transition that concludes a bonding attempt.
///
/// Values are only produced for transitions leaving
/// [`BondState::Bonding`] for a state other than `Bonding`, so
/// `previous()` is always `Bonding` for changes created through
/// [`BondStateChange::concluding`].
///
/// # Examples
///
/// ```
/// use bond_watch::event::BondStateChange;
/// use bond_watch::types::BondState;
///
/// let change = BondStateChange::concluding(BondState::Bonding, BondState::Bonded).unwrap();
/// assert!(change.is_bonded());
/// assert_eq!(
///     change.to_string(),
///     "BleBondStateChange: BOND_BONDING to BOND_BONDED"
/// );
///
/// // Entering bonding is not a conclusion.
/// assert!(BondStateChange::concluding(BondState::None, BondState::Bonding).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BondStateChange {
    previous: BondState,
    new: BondState,
}

impl BondStateChange {
    /// Creates a change record without applying the concluding filter.
    #[must_use]
    pub const fn new(previous: BondState, new: BondState) -> Self {
        Self { previous, new }
    }

    /// Returns the change if `previous -> new` concludes a bonding attempt.
    ///
    /// A transition concludes an attempt when `previous` is `Bonding` and
    /// `new` is not.
    #[must_use]
    pub const fn concluding(previous: BondState, new: BondState) -> Option<Self> {
        if previous.is_bonding() && !new.is_bonding() {
            Some(Self::new(previous, new))
        } else {
            None
        }
    }

    /// Returns the state before the transition.
    #[must_use]
    pub const fn previous(&self) -> BondState {
        self.previous
    }

    /// Returns the state after the transition.
    #[must_use]
    pub const fn new_state(&self) -> BondState {
        self.new
    }

    /// Returns `true` if the attempt ended with a bond.
    #[must_use]
    pub const fn is_bonded(&self) -> bool {
        matches!(self.new, BondState::Bonded)
    }

    /// Returns `true` if the attempt ended without a bond.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.new, BondState::None)
    }
}

impl fmt::Display for BondStateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BleBondStateChange: {} to {}", self.previous, self.new)
    }
}
