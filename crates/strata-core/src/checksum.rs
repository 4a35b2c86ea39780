//! SHA-256 checksum utility for migration drift detection.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of a migration script as lowercase hex.
pub fn compute_checksum(script: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(script.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}
