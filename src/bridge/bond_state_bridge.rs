// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference-counted platform registration with broadcast fan-out.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use super::BondStateSubscription;
use crate::config::BridgeConfig;
use crate::error::RegistrationError;
use crate::event::BondStateChange;
use crate::platform::{BondListener, BondNotifier, RawBondNotification, RegistrationHandle};
use crate::types::BondState;

/// Bridges platform bond state broadcasts into a shared stream.
///
/// Cloning the bridge yields another handle to the same registration.
///
/// # Sessions
///
/// A session spans from the first subscriber attaching to the last one
/// detaching. Exactly one platform registration exists per successful
/// session. If registration fails, the session is faulted: every subscriber
/// attaching while it lasts receives the failure and then end of stream.
/// Once all of them are dropped, the next [`subscribe`](Self::subscribe)
/// starts a fresh session and asks the platform again.
///
/// # Delivery
///
/// Only transitions out of [`BondState::Bonding`] into another state are
/// published. Changes are not retained: a subscriber sees only changes
/// published after it attached.
#[derive(Clone)]
pub struct BondStateBridge {
    shared: Arc<Shared>,
}

/// State shared between the bridge and its subscriptions.
pub(super) struct Shared {
    notifier: Arc<dyn BondNotifier>,
    config: BridgeConfig,
    session: Mutex<Session>,
}

enum Session {
    Idle,
    Active {
        handle: RegistrationHandle,
        sender: broadcast::Sender<BondStateChange>,
        subscribers: usize,
    },
    Faulted {
        error: RegistrationError,
        subscribers: usize,
    },
}

impl BondStateBridge {
    /// Creates a bridge over `notifier` with the default configuration.
    ///
    /// Nothing is registered until the first subscription.
    #[must_use]
    pub fn new<N>(notifier: N) -> Self
    where
        N: BondNotifier + 'static,
    {
        Self::with_config(notifier, BridgeConfig::default())
    }

    /// Creates a bridge over `notifier` with a custom configuration.
    #[must_use]
    pub fn with_config<N>(notifier: N, config: BridgeConfig) -> Self
    where
        N: BondNotifier + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                notifier: Arc::new(notifier),
                config,
                session: Mutex::new(Session::Idle),
            }),
        }
    }

    /// Attaches a new subscriber.
    ///
    /// The first subscriber of a session registers the platform listener.
    /// A registration failure is not returned here; it is delivered as the
    /// terminal item of the returned subscription.
    #[must_use]
    pub fn subscribe(&self) -> BondStateSubscription {
        let mut session = self.shared.session.lock();

        if matches!(*session, Session::Idle) {
            let (next, subscription) = self.start_session();
            *session = next;
            return subscription;
        }

        match &mut *session {
            Session::Idle => unreachable!("idle session handled above"),
            Session::Active {
                sender,
                subscribers,
                ..
            } => {
                *subscribers += 1;
                tracing::trace!(subscribers = *subscribers, "Subscriber joined bond state stream");
                BondStateSubscription::live(self.shared.clone(), sender.subscribe())
            }
            Session::Faulted { error, subscribers } => {
                *subscribers += 1;
                BondStateSubscription::faulted(self.shared.clone(), error.clone())
            }
        }
    }

    /// Registers the platform listener for a new session.
    fn start_session(&self) -> (Session, BondStateSubscription) {
        let (sender, receiver) = broadcast::channel(self.shared.config.channel_capacity());
        let filter = self.shared.config.filter();

        match self
            .shared
            .notifier
            .register(filter, bond_listener(sender.clone()))
        {
            Ok(handle) => {
                tracing::debug!(%handle, action = filter.action(), "Registered bond state listener");
                let session = Session::Active {
                    handle,
                    sender,
                    subscribers: 1,
                };
                (
                    session,
                    BondStateSubscription::live(self.shared.clone(), receiver),
                )
            }
            Err(error) => {
                tracing::warn!(%error, action = filter.action(), "Bond state listener registration failed");
                let subscription = BondStateSubscription::faulted(self.shared.clone(), error.clone());
                (
                    Session::Faulted {
                        error,
                        subscribers: 1,
                    },
                    subscription,
                )
            }
        }
    }

    /// Returns the number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match &*self.shared.session.lock() {
            Session::Idle => 0,
            Session::Active { subscribers, .. } | Session::Faulted { subscribers, .. } => {
                *subscribers
            }
        }
    }

    /// Returns `true` while a platform listener is registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(&*self.shared.session.lock(), Session::Active { .. })
    }

    /// Returns the bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }
}

impl std::fmt::Debug for BondStateBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondStateBridge")
            .field("config", &self.shared.config)
            .field("subscribers", &self.subscriber_count())
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Detaches one subscriber, unregistering when it was the last.
    pub(super) fn detach(&self) {
        let mut session = self.session.lock();

        let remaining = match &mut *session {
            Session::Idle => return,
            Session::Active { subscribers, .. } | Session::Faulted { subscribers, .. } => {
                *subscribers = subscribers.saturating_sub(1);
                *subscribers
            }
        };
        if remaining > 0 {
            tracing::trace!(subscribers = remaining, "Subscriber left bond state stream");
            return;
        }

        // Unregister under the lock so a new session cannot register first.
        if let Session::Active { handle, .. } = std::mem::replace(&mut *session, Session::Idle) {
            self.notifier.unregister(handle);
            tracing::debug!(%handle, "Unregistered bond state listener");
        } else {
            tracing::debug!("Faulted bond state session ended");
        }
    }
}

/// Builds the platform listener publishing concluded attempts to `sender`.
fn bond_listener(sender: broadcast::Sender<BondStateChange>) -> BondListener {
    Arc::new(move |raw: RawBondNotification| {
        if let Some(change) = concluded_change(raw) {
            // No receivers means the session is ending; the change is dropped.
            let delivered = sender.send(change).unwrap_or(0);
            tracing::debug!(%change, delivered, "Published bond state change");
        }
    })
}

/// Applies the delivery rule to a raw notification.
fn concluded_change(raw: RawBondNotification) -> Option<BondStateChange> {
    tracing::trace!(
        previous = raw.previous_state,
        state = raw.state,
        "Bond state notification"
    );

    if raw.previous_state != BondState::RAW_BONDING {
        return None;
    }
    let Some(state) = BondState::from_raw(raw.state) else {
        tracing::warn!(state = raw.state, "Unknown bond state after bonding, dropped");
        return None;
    };
    BondStateChange::concluding(BondState::Bonding, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::LoopbackNotifier;

    fn bridge() -> (Arc<LoopbackNotifier>, BondStateBridge) {
        let notifier = Arc::new(LoopbackNotifier::new());
        let bridge = BondStateBridge::new(notifier.clone());
        (notifier, bridge)
    }

    #[test]
    fn concluded_change_filters_raw_codes() {
        let bonded = RawBondNotification::new(11, 12);
        assert_eq!(
            concluded_change(bonded),
            Some(BondStateChange::new(BondState::Bonding, BondState::Bonded))
        );

        let failed = RawBondNotification::new(11, 10);
        assert_eq!(
            concluded_change(failed),
            Some(BondStateChange::new(BondState::Bonding, BondState::None))
        );

        assert_eq!(concluded_change(RawBondNotification::new(11, 11)), None);
        assert_eq!(concluded_change(RawBondNotification::new(10, 11)), None);
        assert_eq!(concluded_change(RawBondNotification::new(12, 10)), None);
    }

    #[test]
    fn concluded_change_drops_missing_codes() {
        assert_eq!(
            concluded_change(RawBondNotification::new(RawBondNotification::MISSING, 12)),
            None
        );
        assert_eq!(
            concluded_change(RawBondNotification::new(11, RawBondNotification::MISSING)),
            None
        );
    }

    #[test]
    fn nothing_registered_before_first_subscriber() {
        let (notifier, bridge) = bridge();
        assert_eq!(notifier.register_count(), 0);
        assert!(!bridge.is_registered());
        assert_eq!(bridge.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_share_one_registration() {
        let (notifier, bridge) = bridge();

        let subs: Vec<_> = (0..5).map(|_| bridge.subscribe()).collect();
        assert_eq!(notifier.register_count(), 1);
        assert_eq!(notifier.listener_count(), 1);
        assert_eq!(bridge.subscriber_count(), 5);
        assert!(bridge.is_registered());

        drop(subs);
        assert_eq!(bridge.subscriber_count(), 0);
    }

    #[test]
    fn unregisters_only_after_last_subscriber() {
        let (notifier, bridge) = bridge();

        let first = bridge.subscribe();
        let second = bridge.subscribe();
        let third = bridge.subscribe();

        drop(first);
        drop(third);
        assert_eq!(notifier.unregister_count(), 0);
        assert!(bridge.is_registered());

        drop(second);
        assert_eq!(notifier.unregister_count(), 1);
        assert_eq!(notifier.listener_count(), 0);
        assert!(!bridge.is_registered());
    }

    #[test]
    fn new_session_registers_again() {
        let (notifier, bridge) = bridge();

        drop(bridge.subscribe());
        let _sub = bridge.subscribe();

        assert_eq!(notifier.register_count(), 2);
        assert_eq!(notifier.unregister_count(), 1);
        assert!(bridge.is_registered());
    }

    #[test]
    fn clones_share_the_session() {
        let (notifier, bridge) = bridge();
        let other = bridge.clone();

        let _a = bridge.subscribe();
        let _b = other.subscribe();

        assert_eq!(notifier.register_count(), 1);
        assert_eq!(other.subscriber_count(), 2);
    }

    #[test]
    fn failed_registration_faults_session() {
        let (notifier, bridge) = bridge();
        notifier.refuse_registrations(RegistrationError::Unavailable("off".to_string()));

        let first = bridge.subscribe();
        let second = bridge.subscribe();

        assert_eq!(notifier.register_count(), 1);
        assert_eq!(bridge.subscriber_count(), 2);
        assert!(!bridge.is_registered());

        drop(first);
        drop(second);
        assert_eq!(notifier.unregister_count(), 0);
        assert_eq!(bridge.subscriber_count(), 0);
    }

    #[test]
    fn custom_filter_is_used_for_registration() {
        let notifier = Arc::new(LoopbackNotifier::new());
        let config = BridgeConfig::default()
            .with_filter(crate::platform::NotificationFilter::new("custom.BOND"));
        let bridge = BondStateBridge::with_config(notifier.clone(), config);

        let _sub = bridge.subscribe();
        assert_eq!(notifier.notify(BondState::Bonding, BondState::Bonded), 0);
        assert_eq!(
            notifier.notify_action("custom.BOND", RawBondNotification::new(11, 12)),
            1
        );
        assert_eq!(bridge.config().filter().action(), "custom.BOND");
    }
}
