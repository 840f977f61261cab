/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a sequence of parts joined by `|`.
pub fn hash_joined(parts: &[&str]) -> Hash {
    hash(parts.join("|").as_bytes())
}
