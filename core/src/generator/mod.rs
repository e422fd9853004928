use rand::Rng;

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate<R: Rng + ?Sized>(self, config: &GameConfig, rng: &mut R) -> Result<MineLayout>;
}
