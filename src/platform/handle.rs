// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registration handle type.

use std::fmt;

use uuid::Uuid;

/// Opaque token identifying one platform listener registration.
///
/// Issued by [`BondNotifier::register`](super::BondNotifier::register) and
/// handed back to [`BondNotifier::unregister`](super::BondNotifier::unregister).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(Uuid);

impl RegistrationHandle {
    /// Creates a new unique handle.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a handle from a platform-assigned UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RegistrationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0.to_string()[..8];
        write!(f, "RegistrationHandle({short}...)")
    }
}

impl fmt::Display for RegistrationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
