//! Session key loading.
//!
//! The signing key is derived from a key file. Debug builds, or deployments
//! that opt in with `session_allow_ephemeral`, fall back to a random key when
//! the file cannot be read; every session then ends with the process.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroize;

/// Minimum key file length accepted in release builds.
const SESSION_KEY_MIN_LEN: usize = 64;
/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a key file of at least 64 bytes.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading the session key.
#[derive(thiserror::Error, Debug)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the session key from `path`.
///
/// # Errors
/// Fails when the file is unreadable and no ephemeral fallback is allowed,
/// or when a release build reads a key shorter than 64 bytes.
pub fn load_session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionKeyError> {
    let key = match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionKeyError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            key
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "using temporary session key; sessions end on restart"
            );
            Key::generate()
        }
        Err(source) => {
            return Err(SessionKeyError::KeyRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    Ok(key)
}

/// Truncated SHA-256 fingerprint of the key's signing material, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.signing());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
