//! # Gradient Noise Implementation
//!
//! Deterministic 2D coherent noise for flicker and jitter animation.
//!
//! ## Why lattice gradient noise?
//!
//! - Smooth first derivative, no popping between frames
//! - One lattice cell touched per sample, O(1), no allocations
//! - Two independent input channels map cleanly onto (time, phase)
//!
//! ## Determinism Guarantee
//!
//! Given the same `EffectSeed`, this implementation produces **exactly**
//! the same values on any platform, any time.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Root seed for deterministic effect animation.
///
/// Every random stream in the stack derives from one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectSeed(u64);

impl EffectSeed {
    /// Creates a new effect seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific consumer (e.g., one component).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a hash mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517cc1b727220a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Opens a uniform random stream over this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl Default for EffectSeed {
    fn default() -> Self {
        Self(0xFADE_CAFE_D00D_F106)
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
#[derive(Debug)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: EffectSeed) -> Self {
        let mut perm = [0u8; 512];

        // Initialize with identity permutation
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates shuffle with deterministic RNG
        // (| 1 because zero is a fixed point of xorshift)
        let mut rng_state = seed.value() | 1;
        for i in (1..256).rev() {
            // Simple xorshift64 for deterministic shuffling
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        // Double the table to avoid index wrapping
        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    /// Gets a permutation value (with automatic wrapping).
    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }
}

/// Unit gradients at the corners, 8 directions.
const GRADIENTS: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2],
    [-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2],
    [std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2],
    [-std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2],
];

/// 2D gradient noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
///
/// # Performance
///
/// - O(1) per sample
/// - No allocations
/// - Cache-friendly access patterns
///
/// # Example
///
/// ```rust,ignore
/// let noise = GradientNoise::new(EffectSeed::new(42));
///
/// // Signed sample for position jitter
/// let value = noise.sample(100.5, 200.3);
/// assert!(value >= -1.0 && value <= 1.0);
///
/// // Unit-interval sample for brightness flicker
/// let flicker = noise.sample01(elapsed * 3.0, phase);
/// ```
#[derive(Debug)]
pub struct GradientNoise {
    /// The permutation table.
    perm_table: PermutationTable,
}

impl GradientNoise {
    /// Scale applied so the unit-gradient lattice spans the full [-1, 1].
    const AMPLITUDE: f32 = std::f32::consts::SQRT_2;

    /// Creates a new gradient noise generator from a seed.
    #[must_use]
    pub fn new(seed: EffectSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D gradient noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = fast_floor(x);
        let yi = fast_floor(y);
        let xf = x - xi as f32;
        let yf = y - yi as f32;

        // Quintic fade keeps the second derivative continuous across cells
        let u = fade(xf);
        let v = fade(yf);

        let ii = (xi & 255) as usize;
        let jj = (yi & 255) as usize;

        let row0 = self.perm_table.get(jj) as usize;
        let row1 = self.perm_table.get(jj + 1) as usize;
        let g00 = self.perm_table.get(ii + row0);
        let g10 = self.perm_table.get(ii + 1 + row0);
        let g01 = self.perm_table.get(ii + row1);
        let g11 = self.perm_table.get(ii + 1 + row1);

        let n00 = corner_dot(g00, xf, yf);
        let n10 = corner_dot(g10, xf - 1.0, yf);
        let n01 = corner_dot(g01, xf, yf - 1.0);
        let n11 = corner_dot(g11, xf - 1.0, yf - 1.0);

        let value = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v) * Self::AMPLITUDE;
        value.clamp(-1.0, 1.0)
    }

    /// Samples noise remapped into [0, 1].
    ///
    /// This is the channel the brightness-flicker formula consumes.
    #[inline]
    #[must_use]
    pub fn sample01(&self, x: f32, y: f32) -> f32 {
        (self.sample(x, y) + 1.0) * 0.5
    }

    /// Generates octaved (fractal) noise.
    ///
    /// Combines multiple layers of noise at different frequencies. One octave
    /// is enough for flicker; drifting wisps read better with two or three.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Coordinates
    /// * `octaves` - Number of noise layers
    /// * `persistence` - Amplitude decay per octave (typically 0.5)
    /// * `lacunarity` - Frequency increase per octave (typically 2.0)
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn octaved(&self, x: f32, y: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude <= 0.0 {
            return 0.0;
        }
        total / max_amplitude
    }
}

/// Quintic fade curve, 6t^5 - 15t^4 + 10t^3.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Dot of the hashed corner gradient with the offset to the sample point.
#[inline]
fn corner_dot(hash: u8, x: f32, y: f32) -> f32 {
    let grad = GRADIENTS[(hash & 7) as usize];
    grad[0] * x + grad[1] * y
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fast floor function.
///
/// Faster than `f32::floor()` for our use case.
#[inline]
fn fast_floor(x: f32) -> i32 {
    let xi = x as i32;
    if x < xi as f32 {
        xi - 1
    } else {
        xi
    }
}
