use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh seed from the thread rng; the seed stays readable so a session can be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty range");
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_picks() {
        let mut a = RngState::from_seed(42);
        let mut b = RngState::from_seed(42);
        let left: Vec<usize> = (0..32).map(|_| a.pick_index(10)).collect();
        let right: Vec<usize> = (0..32).map(|_| b.pick_index(10)).collect();
        assert_eq!(left, right);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn pick_index_stays_in_range() {
        let mut rng = RngState::from_seed(7);
        for _ in 0..500 {
            assert!(rng.pick_index(3) < 3);
        }
        assert_eq!(rng.pick_index(1), 0);
    }
}
