//! Seeded random streams for deterministic runs.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Derive an independent stream seed from the user's seed and a domain tag.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        // HMAC accepts keys of any length.
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// RNG wrapper that counts draw calls against the stream.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    /// Stream for `domain_tag` under `user_seed`.
    #[must_use]
    pub fn for_stream(user_seed: u64, domain_tag: &[u8]) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(derive_stream_seed(
            user_seed, domain_tag,
        )))
    }
}

impl<R: RngCore> CountingRng<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn streams_are_stable_and_tag_separated() {
        assert_eq!(derive_stream_seed(7, b"a"), derive_stream_seed(7, b"a"));
        assert_ne!(derive_stream_seed(7, b"a"), derive_stream_seed(7, b"b"));
        assert_ne!(derive_stream_seed(7, b"a"), derive_stream_seed(8, b"a"));
    }

    #[test]
    fn counting_rng_replays_and_counts() {
        let mut first = CountingRng::for_stream(42, b"test");
        let mut second = CountingRng::for_stream(42, b"test");
        let a: Vec<u32> = (0..16).map(|_| first.gen_range(0..350)).collect();
        let b: Vec<u32> = (0..16).map(|_| second.gen_range(0..350)).collect();
        assert_eq!(a, b);
        assert!(first.draws() >= 16);
        assert_eq!(first.draws(), second.draws());
    }
}
