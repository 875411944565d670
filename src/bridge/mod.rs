// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared stream of concluded bonding attempts.
//!
//! A [`BondStateBridge`] turns platform bond state broadcasts into a hot,
//! multicast stream of [`BondStateChange`](crate::event::BondStateChange)
//! values. The platform listener is registered when the first
//! [`BondStateSubscription`] is created and unregistered when the last one
//! is dropped. Every subscriber in between shares that one registration.
//!
//! # Examples
//!
//! ```
//! use bond_watch::BondStateBridge;
//! use bond_watch::platform::LoopbackNotifier;
//! use bond_watch::types::BondState;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let notifier = Arc::new(LoopbackNotifier::new());
//! let bridge = BondStateBridge::new(notifier.clone());
//! assert!(!bridge.is_registered());
//!
//! let mut first = bridge.subscribe();
//! let mut second = bridge.subscribe();
//! assert_eq!(notifier.register_count(), 1);
//!
//! notifier.notify(BondState::Bonding, BondState::None);
//! assert!(first.recv().await.unwrap().unwrap().is_failed());
//! assert!(second.recv().await.unwrap().unwrap().is_failed());
//!
//! drop(first);
//! drop(second);
//! assert_eq!(notifier.unregister_count(), 1);
//! # }
//! ```

mod bond_state_bridge;
mod subscription;

pub use bond_state_bridge::BondStateBridge;
pub use subscription::BondStateSubscription;
