use rand::distributions::Uniform;
use rand::Rng;

use crate::utils::new_rng;

/// Draws independent weights uniformly from [-1, 1].
#[derive(Clone)]
pub struct RandomInitializer {
    distribution: Uniform<f64>,
    rng: rand_xorshift::XorShiftRng
}

impl RandomInitializer {

    pub fn new_from_entropy() -> Self {
        RandomInitializer {
            distribution: Uniform::new_inclusive(-1.0, 1.0),
            rng: new_rng(None),
        }
    }

    pub fn new_with_seed(val: &str) -> Self {
        RandomInitializer {
            distribution: Uniform::new_inclusive(-1.0, 1.0),
            rng: new_rng(Some(val)),
        }
    }

    pub fn get_weight(&mut self) -> f64 {
        self.rng.sample(self.distribution)
    }

    pub fn fill(&mut self, target: &mut [f64]) {
        for element in target.iter_mut() {
            *element = self.get_weight();
        }
    }

}
