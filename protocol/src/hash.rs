//! # Hashing Utilities
//!
//! BLAKE3 helpers used to fingerprint ledger state. Each table is hashed
//! under its own derive-key context so two tables with identical bytes
//! never produce the same leaf.

/// BLAKE3 digest of `data`.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// BLAKE3 in derive-key mode: `context` selects an independent hash
/// function, so `("balances", x)` and `("supply", x)` never collide.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Hashes several slices as if they were concatenated.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Binary Merkle root over `leaves`. An odd trailing leaf is paired with
/// itself; a single leaf is hashed with itself; no leaves gives all zeros.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    if leaves.len() == 1 {
        return blake3_hash_multi(&[leaves[0].as_slice(), leaves[0].as_slice()]);
    }

    let mut level: Vec<[u8; 32]> = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                blake3_hash_multi(&[left.as_slice(), right.as_slice()])
            })
            .collect();
    }
    level[0]
}

/// Lowercase hex encoding of a digest.
pub fn to_hex(digest: &[u8; 32]) -> String {
    hex::encode(digest)
}
