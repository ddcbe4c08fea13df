//! # Key Policy
//!
//! Which key generation to derive for an account.
//!
//! | Input                   | Derived key          |
//! |-------------------------|----------------------|
//! | forced new              | V2 (password)        |
//! | remote is V1            | V1 (legacy)          |
//! | remote is V2            | V2 (password)        |
//! | remote is V3 or absent  | V3 (passwordless)    |

use shared_types::entities::{KeyVersion, RemotePublicKey};

/// Select the key version to derive.
#[must_use]
pub fn select_key_version(force_new: bool, remote_version: Option<KeyVersion>) -> KeyVersion {
    if force_new {
        return KeyVersion::V2;
    }
    match remote_version {
        Some(KeyVersion::InsecureV1) => KeyVersion::InsecureV1,
        Some(KeyVersion::V2) => KeyVersion::V2,
        Some(KeyVersion::V3) | None => KeyVersion::V3,
    }
}

/// Whether recovering the account's key needs the user's password.
#[must_use]
pub fn is_password_needed(remote: Option<&RemotePublicKey>) -> bool {
    remote.is_some_and(|key| key.key_version().requires_password())
}
