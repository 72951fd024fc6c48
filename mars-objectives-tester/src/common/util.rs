use std::hash::Hasher;

use mars_objectives::SelectionResult;
use twox_hash::XxHash64;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Stable fingerprint of a selected board, order included.
pub fn board_digest(result: &SelectionResult) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for name in result.milestone_names() {
        hasher.write(name.as_bytes());
        hasher.write_u8(0);
    }
    hasher.write_u8(0xFF);
    for name in result.award_names() {
        hasher.write(name.as_bytes());
        hasher.write_u8(0);
    }
    hasher.finish()
}
