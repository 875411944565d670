// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published by the bond state bridge.
//!
//! The only event is [`BondStateChange`]: a bonding attempt concluded,
//! either with a bond or back to no bond.
//!
//! # Examples
//!
//! ```
//! use bond_watch::event::BondStateChange;
//! use bond_watch::types::BondState;
//!
//! let failed = BondStateChange::concluding(BondState::Bonding, BondState::None);
//! assert!(failed.is_some_and(|c| c.is_failed()));
//!
//! let restarted = BondStateChange::concluding(BondState::Bonding, BondState::Bonding);
//! assert!(restarted.is_none());
//! ```

mod bond_state_change;

pub use bond_state_change::BondStateChange;
