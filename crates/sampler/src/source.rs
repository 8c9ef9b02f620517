use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Produces the raw value of each new reading.
pub trait ValueSource: Send + std::fmt::Debug {
    fn next_value(&mut self) -> f64;
}

/// Uniform draw from `[min, max]`.
#[derive(Debug)]
pub struct UniformSource {
    min: f64,
    max: f64,
    rng: StdRng,
}

impl UniformSource {
    /// `seed = None` seeds from the operating system.
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: f64, max: f64, seed: Option<u64>) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        Self { min, max, rng }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl ValueSource for UniformSource {
    fn next_value(&mut self) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Replays a fixed list of values, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    queue: VecDeque<f64>,
    last:  f64,
}

impl ReplaySource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queue: values.into_iter().collect(),
            last:  0.0,
        }
    }
}

impl ValueSource for ReplaySource {
    fn next_value(&mut self) -> f64 {
        if let Some(v) = self.queue.pop_front() {
            self.last = v;
        }
        self.last
    }
}
