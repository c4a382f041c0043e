use crate::utils::error::{Result, UnleashError};
use std::io::Cursor;

const NORMALIZER: u32 = 100;

/// Buckets `identifier` into 1..=100 within `group_id`.
///
/// Uses unsigned murmur3 (x86, 32 bit, seed 0) over `"{group_id}:{identifier}"` so the
/// bucket matches the other Unleash SDKs.
pub fn normalized_hash(identifier: &str, group_id: &str) -> Result<u32> {
    let key = format!("{}:{}", group_id, identifier);
    let hash = murmur3::murmur3_32(&mut Cursor::new(key.as_bytes()), 0).map_err(|e| {
        UnleashError::strategy("normalized_hash", format!("hashing failed: {}", e))
    })?;
    Ok(hash % NORMALIZER + 1)
}
