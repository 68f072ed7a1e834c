use super::port::RandomSource;

/// Replays a fixed cycle of unit samples.
pub struct ScriptedRandom {
    samples: Vec<f64>,
    position: usize,
}

impl ScriptedRandom {
    pub fn new(samples: Vec<f64>) -> Self {
        assert!(!samples.is_empty(), "scripted random needs samples");
        Self {
            samples,
            position: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let sample = self.samples[self.position % self.samples.len()];
        self.position += 1;
        sample
    }
}
