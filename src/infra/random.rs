use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::port::RandomSource;

/// Adapts any `rand` generator to the simulation's random port.
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_the_unit_interval() {
        let mut source = RngSource::new(StdRng::seed_from_u64(11));
        for _ in 0..1_000 {
            let sample = source.next_unit();
            assert!((0.0..1.0).contains(&sample));
            let cpu_delta = source.uniform(-8.0, 10.0);
            assert!((-8.0..=10.0).contains(&cpu_delta));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngSource::new(StdRng::seed_from_u64(3));
        let mut b = RngSource::new(StdRng::seed_from_u64(3));
        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }
}
