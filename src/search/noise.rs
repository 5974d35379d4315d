use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

/// Half-width of the tie-breaking salt. Below one score unit, so salted
/// scores never reorder moves whose integer scores differ.
pub const SALT_MAGNITUDE: f64 = 0.25;

/// Uniform perturbation added to root scores to break exact ties.
pub struct RootNoise {
    rng: SmallRng,
    dist: Uniform<f64>,
}

impl RootNoise {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        RootNoise { rng, dist: Uniform::new(-SALT_MAGNITUDE, SALT_MAGNITUDE) }
    }

    pub fn salt(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    /// Index of the best salted score; `None` on an empty slice.
    pub fn pick(&mut self, scores: &[i32]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in scores.iter().enumerate() {
            let salted = score as f64 + self.salt();
            if best.map_or(true, |(_, b)| salted > b) {
                best = Some((i, salted));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Index of the first maximum.
pub fn pick_first_best(scores: &[i32]) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
