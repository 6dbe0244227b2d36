/// Deterministic 32-bit PRNG (mulberry32).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mulberry32(u32);

impl Mulberry32 {
    pub(crate) fn new(seed: u32) -> Self {
        Self(seed)
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(0x6D2B_79F5);
        let mut t = self.0;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform in `[0, 1)`.
    pub(crate) fn next_f64_01(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a32(u32);

impl Fnv1a32 {
    const OFFSET_BASIS: u32 = 0x811C_9DC5;
    const PRIME: u32 = 0x0100_0193;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u32::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u32 {
        self.0
    }
}

/// Map an expression-level seed to a PRNG seed. Integral seeds keep their value so
/// `random(7)` behaves the same as the reference generator; fractional seeds are hashed.
pub(crate) fn seed_to_u32(seed: f64) -> u32 {
    if !seed.is_finite() {
        return 0;
    }
    if seed.fract() == 0.0 && seed.abs() < 9.0e15 {
        return (seed as i64) as u32;
    }
    let mut h = Fnv1a32::new_default();
    h.write_bytes(&seed.to_bits().to_le_bytes());
    h.finish()
}

/// `random(seed)` value for a given seed: the first draw of a freshly seeded generator.
pub(crate) fn seeded_random(seed: f64) -> f64 {
    Mulberry32::new(seed_to_u32(seed)).next_f64_01()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
