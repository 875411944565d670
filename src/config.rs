// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::platform::NotificationFilter;

/// Default number of undelivered changes a subscriber may fall behind.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for a [`BondStateBridge`](crate::BondStateBridge).
///
/// # Examples
///
/// ```
/// use bond_watch::BridgeConfig;
/// use bond_watch::platform::NotificationFilter;
///
/// let config = BridgeConfig::default()
///     .with_channel_capacity(16)
///     .with_filter(NotificationFilter::new("com.example.BOND"));
///
/// assert_eq!(config.channel_capacity(), 16);
/// assert_eq!(config.filter().action(), "com.example.BOND");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    channel_capacity: usize,
    filter: NotificationFilter,
}

impl BridgeConfig {
    /// Sets how many changes a slow subscriber may lag before it starts
    /// skipping the oldest ones. Zero is raised to one.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Sets the platform notification filter.
    #[must_use]
    pub fn with_filter(mut self, filter: NotificationFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the per-subscriber channel capacity, at least one.
    #[must_use]
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }

    /// Returns the platform notification filter.
    #[must_use]
    pub fn filter(&self) -> &NotificationFilter {
        &self.filter
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            filter: NotificationFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ACTION_BOND_STATE_CHANGED;

    #[test]
    fn default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.channel_capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.filter().action(), ACTION_BOND_STATE_CHANGED);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let config = BridgeConfig::default().with_channel_capacity(0);
        assert_eq!(config.channel_capacity(), 1);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let config: BridgeConfig = serde_json::from_str(r#"{"channel_capacity": 8}"#).unwrap();
        assert_eq!(config.channel_capacity(), 8);
        assert_eq!(config.filter(), &NotificationFilter::default());
    }

    #[test]
    fn deserialize_zero_capacity_is_clamped_on_read() {
        let config: BridgeConfig = serde_json::from_str(r#"{"channel_capacity": 0}"#).unwrap();
        assert_eq!(config.channel_capacity(), 1);
    }

    #[test]
    fn deserialize_custom_filter() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"filter": {"action": "custom.BOND"}}"#).unwrap();
        assert_eq!(config.filter().action(), "custom.BOND");
        assert_eq!(config.channel_capacity(), DEFAULT_CHANNEL_CAPACITY);
    }
}
