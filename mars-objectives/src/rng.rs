//! Seeded random streams for reproducible selections.
//!
//! A session seed is expanded into one independent stream per objective kind,
//! so replaying a recorded seed reproduces the same board.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

use crate::objective::ObjectiveKind;

/// Per-kind random streams derived from one session seed.
#[derive(Debug)]
pub struct SelectionRng {
    seed: u64,
    milestones: RefCell<ChaCha8Rng>,
    awards: RefCell<ChaCha8Rng>,
}

impl SelectionRng {
    /// Construct the streams from a user-visible seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            milestones: RefCell::new(ChaCha8Rng::seed_from_u64(derive_stream_seed(
                seed,
                b"milestones",
            ))),
            awards: RefCell::new(ChaCha8Rng::seed_from_u64(derive_stream_seed(
                seed, b"awards",
            ))),
        }
    }

    /// Use `seed` when given, otherwise draw a fresh one from the OS.
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::from_seed(seed.unwrap_or_else(rand::random))
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Access the stream for one objective kind.
    #[must_use]
    pub fn stream(&self, kind: ObjectiveKind) -> RefMut<'_, ChaCha8Rng> {
        match kind {
            ObjectiveKind::Milestone => self.milestones.borrow_mut(),
            ObjectiveKind::Award => self.awards.borrow_mut(),
        }
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).map_or(user_seed, |mut mac| {
        mac.update(domain_tag);
        let digest = mac.finalize().into_bytes();
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed_bytes)
    })
}
