use rand::rngs::OsRng;
use rand::Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::UnsafeCell;

thread_local! {
    static RNG: UnsafeCell<ChaCha20Rng> = UnsafeCell::new(ChaCha20Rng::from_seed(OsRng.gen()));
}

pub struct SecureRng;

impl SecureRng {
    pub fn get_ref() -> &'static mut ChaCha20Rng {
        unsafe { RNG.with(|rng| &mut *rng.get()) }
    }

    pub fn next_u64() -> u64 {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            unsafe { RngCore::next_u64(&mut *rng.get()) }
        })
    }

    pub fn next_u128() -> u128 {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            let rng_ref = unsafe { &mut *rng.get() };
            let mut bytes = [0u8; 16];
            RngCore::fill_bytes(rng_ref, &mut bytes);
            u128::from_le_bytes(bytes)
        })
    }

    /// Draws uniformly from `[0, upper)`.
    pub fn next_u64_below(upper: u64) -> u64 {
        Self::get_ref().gen_range(0..upper)
    }
}
