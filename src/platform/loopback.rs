// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process notifier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use super::{
    ACTION_BOND_STATE_CHANGED, BondListener, BondNotifier, NotificationFilter,
    RawBondNotification, RegistrationHandle,
};
use crate::error::RegistrationError;
use crate::types::BondState;

/// A [`BondNotifier`] that lives entirely in process.
///
/// Listeners are kept in a registry and invoked synchronously from
/// [`notify`](Self::notify) on the calling thread, which stands in for the
/// platform's broadcast thread. Call counters make registration lifecycle
/// observable.
///
/// # Examples
///
/// ```
/// use bond_watch::BondStateBridge;
/// use bond_watch::platform::LoopbackNotifier;
/// use bond_watch::types::BondState;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let notifier = Arc::new(LoopbackNotifier::new());
/// let bridge = BondStateBridge::new(notifier.clone());
///
/// let mut sub = bridge.subscribe();
/// notifier.notify(BondState::Bonding, BondState::Bonded);
///
/// let change = sub.recv().await.unwrap().unwrap();
/// assert!(change.is_bonded());
/// # }
/// ```
pub struct LoopbackNotifier {
    listeners: RwLock<HashMap<RegistrationHandle, (NotificationFilter, BondListener)>>,
    refusal: Mutex<Option<RegistrationError>>,
    register_calls: AtomicUsize,
    unregister_calls: AtomicUsize,
}

impl LoopbackNotifier {
    /// Creates a notifier with no registered listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            refusal: Mutex::new(None),
            register_calls: AtomicUsize::new(0),
            unregister_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every following `register` call fail with `error`.
    pub fn refuse_registrations(&self, error: RegistrationError) {
        *self.refusal.lock() = Some(error);
    }

    /// Lets `register` calls succeed again.
    pub fn accept_registrations(&self) {
        *self.refusal.lock() = None;
    }

    /// Broadcasts a transition between two known states.
    ///
    /// Returns the number of listeners invoked.
    pub fn notify(&self, previous: BondState, state: BondState) -> usize {
        self.notify_raw(RawBondNotification::new(previous.as_raw(), state.as_raw()))
    }

    /// Broadcasts raw codes under the bond state changed action.
    ///
    /// Returns the number of listeners invoked.
    pub fn notify_raw(&self, raw: RawBondNotification) -> usize {
        self.notify_action(ACTION_BOND_STATE_CHANGED, raw)
    }

    /// Broadcasts raw codes under an arbitrary action.
    ///
    /// Only listeners whose filter matches `action` are invoked. Listeners
    /// run outside the registry lock.
    pub fn notify_action(&self, action: &str, raw: RawBondNotification) -> usize {
        let targets: Vec<BondListener> = self
            .listeners
            .read()
            .values()
            .filter(|(filter, _)| filter.matches(action))
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in &targets {
            listener(raw);
        }
        targets.len()
    }

    /// Returns the number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns how many times `register` was called, including refusals.
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `unregister` was called.
    #[must_use]
    pub fn unregister_count(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }
}

impl Default for LoopbackNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoopbackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackNotifier")
            .field("listeners", &self.listener_count())
            .field("register_calls", &self.register_count())
            .field("unregister_calls", &self.unregister_count())
            .finish_non_exhaustive()
    }
}

impl BondNotifier for LoopbackNotifier {
    fn register(
        &self,
        filter: &NotificationFilter,
        listener: BondListener,
    ) -> Result<RegistrationHandle, RegistrationError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.refusal.lock().clone() {
            return Err(error);
        }

        let handle = RegistrationHandle::new();
        self.listeners
            .write()
            .insert(handle, (filter.clone(), listener));
        Ok(handle)
    }

    fn unregister(&self, handle: RegistrationHandle) {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        self.listeners.write().remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn counting_listener() -> (BondListener, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let listener: BondListener = Arc::new(move |_: RawBondNotification| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        (listener, hits)
    }

    #[test]
    fn register_and_notify() {
        let notifier = LoopbackNotifier::new();
        let (listener, hits) = counting_listener();

        notifier
            .register(&NotificationFilter::default(), listener)
            .unwrap();
        assert_eq!(notifier.listener_count(), 1);

        let invoked = notifier.notify(BondState::Bonding, BondState::Bonded);
        assert_eq!(invoked, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_stops_delivery() {
        let notifier = LoopbackNotifier::new();
        let (listener, hits) = counting_listener();

        let handle = notifier
            .register(&NotificationFilter::default(), listener)
            .unwrap();
        notifier.unregister(handle);

        assert_eq!(notifier.notify(BondState::Bonding, BondState::None), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.unregister_count(), 1);
    }

    #[test]
    fn refusal_fails_registration_until_accepted() {
        let notifier = LoopbackNotifier::new();
        let error = RegistrationError::Unavailable("bluetooth off".to_string());
        notifier.refuse_registrations(error.clone());

        let (listener, _) = counting_listener();
        let result = notifier.register(&NotificationFilter::default(), listener.clone());
        assert_eq!(result, Err(error));
        assert_eq!(notifier.listener_count(), 0);

        notifier.accept_registrations();
        assert!(
            notifier
                .register(&NotificationFilter::default(), listener)
                .is_ok()
        );
        assert_eq!(notifier.register_count(), 2);
    }

    #[test]
    fn action_mismatch_is_not_delivered() {
        let notifier = LoopbackNotifier::new();
        let (listener, hits) = counting_listener();
        notifier
            .register(&NotificationFilter::new("custom.ACTION"), listener)
            .unwrap();

        assert_eq!(notifier.notify(BondState::Bonding, BondState::Bonded), 0);
        assert_eq!(
            notifier.notify_action("custom.ACTION", RawBondNotification::new(11, 12)),
            1
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
