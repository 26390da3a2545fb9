use std::hash::Hasher;

/// Seedable 64-bit FNV-1a. Integers are fed little-endian so hashes match across platforms.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    pub(crate) fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::with_seed(Self::OFFSET_BASIS)
    }
}

impl Hasher for Fnv1a64 {
    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |h, &b| {
            (h ^ u64::from(b)).wrapping_mul(Self::PRIME)
        });
    }

    fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Two independently seeded FNV streams fed the same input, read out as 128 bits.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FnvPair {
    hi: Fnv1a64,
    lo: Fnv1a64,
}

impl FnvPair {
    const LO_SEED: u64 = 0x9ae1_6a3b_2f90_404f;

    pub(crate) fn new() -> Self {
        Self {
            hi: Fnv1a64::default(),
            lo: Fnv1a64::with_seed(Self::LO_SEED),
        }
    }

    pub(crate) fn tag(&mut self, v: u8) {
        self.hi.write_u8(v);
        self.lo.write_u8(v);
    }

    pub(crate) fn len(&mut self, n: usize) {
        self.hi.write_u64(n as u64);
        self.lo.write_u64(n as u64);
    }

    /// Bit pattern, so `0.0` and `-0.0` differ.
    pub(crate) fn float(&mut self, v: f64) {
        self.hi.write_u64(v.to_bits());
        self.lo.write_u64(v.to_bits());
    }

    /// Length-prefixed so adjacent strings cannot alias.
    pub(crate) fn text(&mut self, s: &str) {
        self.len(s.len());
        self.hi.write(s.as_bytes());
        self.lo.write(s.as_bytes());
    }

    pub(crate) fn finish(&self) -> (u64, u64) {
        (self.hi.finish(), self.lo.finish())
    }
}

/// Euclidean remainder that stays in `[0, m)` for positive `m`.
pub(crate) fn wrap_positive(v: f64, m: f64) -> f64 {
    let r = v.rem_euclid(m);
    if r >= m { 0.0 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
