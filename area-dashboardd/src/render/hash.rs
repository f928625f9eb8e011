use sha2::{Sha256, Digest};

/// SHA-256 of a rendered fragment, hex encoded.
/// Lets pollers of the grid skip redraws when nothing changed.
pub fn compute_hash(fragment: &str) -> String {
    let hash = Sha256::digest(fragment.as_bytes());
    hex::encode(hash)
}
