// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `bond_watch` library.
//!
//! Only one runtime fault exists: the host platform refusing to register the
//! bond state listener. Everything else is value conversion.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A raw value could not be converted into a library type.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The platform did not register the bond state listener.
    ///
    /// Delivered as the terminal item of every subscription in the
    /// affected session.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),
}

/// Errors related to value conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A raw platform code does not name a bond state.
    #[error("unknown bond state code: {0}")]
    UnknownBondState(i32),

    /// A string does not name a bond state.
    #[error("invalid bond state name: {0}")]
    InvalidBondStateName(String),
}

/// Failure of the platform to register a listener.
///
/// This type is `Clone` so that a single failure can be reported to
/// every subscriber sharing the registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The platform refused the registration.
    #[error("platform refused registration for {action}: {reason}")]
    Refused {
        /// The notification action that was requested.
        action: String,
        /// Platform-provided reason.
        reason: String,
    },

    /// The platform notification service is not available.
    #[error("notification service unavailable: {0}")]
    Unavailable(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownBondState(42);
        assert_eq!(err.to_string(), "unknown bond state code: 42");
    }

    #[test]
    fn error_from_registration_error() {
        let reg = RegistrationError::Unavailable("adapter off".to_string());
        let err: Error = reg.clone().into();
        assert_eq!(err, Error::Registration(reg));
    }

    #[test]
    fn refused_display_names_action() {
        let err = RegistrationError::Refused {
            action: "bond".to_string(),
            reason: "too many receivers".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "platform refused registration for bond: too many receivers"
        );
    }
}
