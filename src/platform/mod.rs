// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host platform notification capability.
//!
//! The bridge never talks to a Bluetooth stack directly. It consumes the
//! host's broadcast registration API through the narrow [`BondNotifier`]
//! trait: register a listener for a [`NotificationFilter`], get a
//! [`RegistrationHandle`] back, hand the handle back to unregister.
//!
//! [`LoopbackNotifier`] is an in-process implementation that lets tests and
//! simulations inject notifications.
//!
//! # Examples
//!
//! ```
//! use bond_watch::platform::{
//!     BondNotifier, LoopbackNotifier, NotificationFilter, RawBondNotification,
//! };
//! use std::sync::Arc;
//!
//! let notifier = LoopbackNotifier::new();
//! let handle = notifier
//!     .register(&NotificationFilter::default(), Arc::new(|raw: RawBondNotification| println!("{raw:?}")))
//!     .unwrap();
//! notifier.unregister(handle);
//! assert_eq!(notifier.unregister_count(), 1);
//! ```

mod handle;
mod loopback;

use std::sync::Arc;

use crate::error::RegistrationError;

pub use handle::RegistrationHandle;
pub use loopback::LoopbackNotifier;

/// Action broadcast by the host when a remote device's bond state changes.
pub const ACTION_BOND_STATE_CHANGED: &str = "android.bluetooth.device.action.BOND_STATE_CHANGED";

/// Listener invoked by the platform for every matching notification.
pub type BondListener = Arc<dyn Fn(RawBondNotification) + Send + Sync>;

/// A bond state notification as delivered by the platform.
///
/// States are raw platform codes; a missing extra is reported as
/// [`RawBondNotification::MISSING`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawBondNotification {
    /// Raw code of the state before the transition.
    pub previous_state: i32,
    /// Raw code of the state after the transition.
    pub state: i32,
}

impl RawBondNotification {
    /// Value reported for a state extra the platform did not include.
    pub const MISSING: i32 = -1;

    /// Creates a notification from raw codes.
    #[must_use]
    pub const fn new(previous_state: i32, state: i32) -> Self {
        Self {
            previous_state,
            state,
        }
    }
}

/// Selects which platform broadcasts a listener receives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NotificationFilter {
    action: String,
}

impl NotificationFilter {
    /// Creates a filter for a custom action.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    /// Returns the filtered action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns `true` if the filter accepts `action`.
    #[must_use]
    pub fn matches(&self, action: &str) -> bool {
        self.action == action
    }
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self::new(ACTION_BOND_STATE_CHANGED)
    }
}

/// Host platform broadcast registration, scoped to one device context.
///
/// Implementations must not call back into the bridge from `register` or
/// `unregister`; the bridge holds its lock across both calls.
pub trait BondNotifier: Send + Sync {
    /// Registers `listener` for broadcasts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if the platform cannot register the
    /// listener.
    fn register(
        &self,
        filter: &NotificationFilter,
        listener: BondListener,
    ) -> Result<RegistrationHandle, RegistrationError>;

    /// Releases a registration. Unknown handles are ignored.
    fn unregister(&self, handle: RegistrationHandle);
}

impl<T: BondNotifier + ?Sized> BondNotifier for Arc<T> {
    fn register(
        &self,
        filter: &NotificationFilter,
        listener: BondListener,
    ) -> Result<RegistrationHandle, RegistrationError> {
        (**self).register(filter, listener)
    }

    fn unregister(&self, handle: RegistrationHandle) {
        (**self).unregister(handle);
    }
}
