// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `bond_watch` - Shared async stream of Bluetooth bonding outcomes.
//!
//! The host platform reports every bond state transition of every remote
//! device through a broadcast API. This library registers one listener for
//! those broadcasts, keeps only transitions that conclude a bonding attempt
//! (`BONDING -> BONDED` and `BONDING -> NONE`), and fans them out to any
//! number of async subscribers.
//!
//! # Lifecycle
//!
//! - The platform listener is registered when the first subscriber attaches.
//! - All subscribers share that single registration.
//! - The listener is unregistered when the last subscriber is dropped,
//!   whether it finished, faulted, or its task was cancelled.
//! - The stream is live: late subscribers do not see earlier changes.
//!
//! # Quick Start
//!
//! Implement [`BondNotifier`](platform::BondNotifier) over the host's
//! broadcast registration API, or use the in-process
//! [`LoopbackNotifier`](platform::LoopbackNotifier):
//!
//! ```
//! use bond_watch::BondStateBridge;
//! use bond_watch::platform::LoopbackNotifier;
//! use bond_watch::types::BondState;
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> bond_watch::Result<()> {
//!     let notifier = Arc::new(LoopbackNotifier::new());
//!     let bridge = BondStateBridge::new(notifier.clone());
//!
//!     let mut changes = bridge.subscribe();
//!
//!     notifier.notify(BondState::None, BondState::Bonding); // ignored
//!     notifier.notify(BondState::Bonding, BondState::Bonded);
//!
//!     if let Some(change) = changes.recv().await {
//!         println!("{}", change?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod platform;
pub mod types;

pub use bridge::{BondStateBridge, BondStateSubscription};
pub use config::BridgeConfig;
pub use error::{Error, RegistrationError, Result, ValueError};
pub use event::BondStateChange;
pub use platform::{BondNotifier, LoopbackNotifier, NotificationFilter, RawBondNotification};
pub use types::BondState;
