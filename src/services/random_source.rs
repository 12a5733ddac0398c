use rand::Rng;

/// A source of uniform draws in `[0, 1)`.
///
/// Simulations take one of these instead of reaching for a global generator,
/// so tests can script the exact sequence of draws.
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: UnitSource + ?Sized> UnitSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> UnitSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Uniform index into a slice of length `len` (which must be non-zero).
pub fn pick_index<S: UnitSource + ?Sized>(source: &mut S, len: usize) -> usize {
    let index = (source.next_unit() * len as f64) as usize;
    index.min(len.saturating_sub(1))
}

/// Standard normal draw via the Box–Muller transform.
pub fn standard_normal<S: UnitSource + ?Sized>(source: &mut S) -> f64 {
    // 1 - u lies in (0, 1], keeping ln() finite
    let u1 = 1.0 - source.next_unit();
    let u2 = source.next_unit();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
