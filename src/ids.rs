// SPDX-License-Identifier: MIT

//! Opaque identifier generation.
//!
//! Identifiers are millisecond timestamps with a process-local sequence
//! suffix so records created in the same millisecond stay distinct.

use std::sync::atomic::{AtomicU64, Ordering};

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh opaque id.
pub fn fresh_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed) % 10_000;
    format!("{millis}-{seq:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_within_a_burst() {
        let mut ids: Vec<String> = (0..1000).map(|_| fresh_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }
}
