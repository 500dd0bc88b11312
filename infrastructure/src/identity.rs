//! Caller identity derivation.
//!
//! Rate-limit state and the audit actor field key off a caller id. When the
//! transport provides none, a stable fingerprint is derived from
//! process-level identifiers, which are harder to spoof than a plain
//! environment variable.

use sha2::{Digest, Sha256};

/// Resolve the caller id: an explicit identity wins, otherwise a local
/// process fingerprint.
pub fn derive_caller_id(explicit: Option<&str>) -> String {
    match explicit {
        Some(caller) if !caller.trim().is_empty() => caller.trim().to_string(),
        _ => local_fingerprint(),
    }
}

/// SHA-256 fingerprint of process id, user, and hostname.
pub fn local_fingerprint() -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    let identifier = format!("cli:{}:{}:{}", std::process::id(), user, hostname);

    let digest = Sha256::digest(identifier.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Shortened caller id for display ("3f2a9c0d1b2e...").
pub fn short_display(caller_id: &str) -> String {
    if caller_id.len() <= 12 {
        caller_id.to_string()
    } else {
        format!("{}...", &caller_id[..12])
    }
}
