// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One subscriber's view of the shared bond state stream.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use super::bond_state_bridge::Shared;
use crate::error::{Error, RegistrationError, Result};
use crate::event::BondStateChange;

/// A subscription to a [`BondStateBridge`](super::BondStateBridge).
///
/// Yields `Ok(change)` for every concluded bonding attempt published after
/// the subscription was created. If the platform refused the registration,
/// yields a single `Err(Error::Registration(..))` and then ends.
///
/// Dropping the subscription detaches it from the bridge. Dropping the last
/// one unregisters the platform listener, including when the owning task is
/// cancelled.
///
/// A subscriber that falls more than the configured capacity behind skips
/// the oldest changes rather than holding back the producer or other
/// subscribers.
pub struct BondStateSubscription {
    shared: Arc<Shared>,
    delivery: Delivery,
}

enum Delivery {
    Live(BroadcastStream<BondStateChange>),
    Faulted(Option<RegistrationError>),
}

impl BondStateSubscription {
    pub(super) fn live(shared: Arc<Shared>, receiver: broadcast::Receiver<BondStateChange>) -> Self {
        Self {
            shared,
            delivery: Delivery::Live(BroadcastStream::new(receiver)),
        }
    }

    pub(super) fn faulted(shared: Arc<Shared>, error: RegistrationError) -> Self {
        Self {
            shared,
            delivery: Delivery::Faulted(Some(error)),
        }
    }

    /// Waits for the next concluded bonding attempt.
    ///
    /// Returns `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<Result<BondStateChange>> {
        self.next().await
    }

    /// Returns `true` if this subscription belongs to a session whose
    /// registration failed.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self.delivery, Delivery::Faulted(_))
    }
}

impl Stream for BondStateSubscription {
    type Item = Result<BondStateChange>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut self.delivery {
            Delivery::Faulted(error) => Poll::Ready(error.take().map(|e| Err(Error::Registration(e)))),
            Delivery::Live(stream) => loop {
                match ready!(Pin::new(&mut *stream).poll_next(cx)) {
                    Some(Ok(change)) => return Poll::Ready(Some(Ok(change))),
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        tracing::debug!(skipped, "Bond state subscriber lagged, changes skipped");
                    }
                    None => return Poll::Ready(None),
                }
            },
        }
    }
}

impl Drop for BondStateSubscription {
    fn drop(&mut self) {
        self.shared.detach();
    }
}

impl std::fmt::Debug for BondStateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondStateSubscription")
            .field("faulted", &self.is_faulted())
            .finish_non_exhaustive()
    }
}
