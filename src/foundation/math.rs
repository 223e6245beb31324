/// 32-bit FNV-1a, the hash behind every synthesis [`Seed`](crate::Seed).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a32(u32);

impl Fnv1a32 {
    pub(crate) const OFFSET_BASIS: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;

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

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn finish(self) -> u32 {
        self.0
    }
}

/// Marsaglia xorshift32 stream (shifts 13, 17, 5).
#[derive(Clone, Debug)]
pub(crate) struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    // A zero state is a fixed point of xorshift.
    const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

    pub(crate) fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            Self::ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value in `[0, 1)`.
    pub(crate) fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Next integer in `[lo, hi]` (inclusive). Returns `lo` when `hi < lo`.
    pub(crate) fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo) + 1.0;
        lo + ((self.next_unit() * span).floor() as u32).min(hi - lo)
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
