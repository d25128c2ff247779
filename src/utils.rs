use rand::{FromEntropy, SeedableRng};
use rand_xorshift::XorShiftRng;

#[inline(always)]
pub fn square(n: f64) -> f64 {
    n * n
}


const SEED_XOR: u128 = 0b10101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010;
pub fn stable_hash_seed(s: &str) -> [u8; 16] {
    let mut val = 17u128;
    for byte in s.as_bytes() {
        val = 31u128.wrapping_mul(val).wrapping_add(*byte as u128);
        val ^= SEED_XOR;
    }
    val.to_le_bytes()
}

/// Seeded generator when a seed string is given, entropy otherwise.
pub fn new_rng(seed: Option<&str>) -> XorShiftRng {
    match seed {
        Some(seed) => XorShiftRng::from_seed(stable_hash_seed(seed)),
        None => XorShiftRng::from_entropy(),
    }
}
