//! Snowfall on the game-over screen (cosmetic)
//!
//! Flakes fall one pixel per tick and pile up on anything that is not open
//! sky: the ground strip, the result panel, the obstacles left standing from
//! the last gameplay frame, or flakes that already settled.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::Position;
use crate::consts::*;

/// Result panel drawn over the playfield on game over: x, y, width, height
pub const PANEL: Area = (20, 30, 200, 80);

/// Screen rectangle: x, y, width, height
pub type Area = (i32, i32, i32, i32);

/// Snow state: live flakes plus a bitmap of settled ones
#[derive(Debug, Clone)]
pub struct Snow {
    pub flakes: Vec<Position>,
    settled: Vec<bool>,
    /// Sprites still on screen under the snow
    blockers: Vec<Area>,
}

impl Default for Snow {
    fn default() -> Self {
        Self {
            flakes: Vec::new(),
            settled: vec![false; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            blockers: Vec::new(),
        }
    }
}

impl Snow {
    /// Scatter a fresh set of flakes, some starting above the screen.
    /// `blockers` are the sprite footprints left on screen for snow to land on.
    pub fn start(&mut self, rng: &mut Pcg32, blockers: &[Area]) {
        self.settled.iter_mut().for_each(|s| *s = false);
        self.blockers = blockers.to_vec();
        self.flakes = (0..MAX_SNOWFLAKES)
            .map(|_| {
                Position::new(
                    rng.random_range(0..SCREEN_WIDTH),
                    rng.random_range(-20..SCREEN_HEIGHT),
                )
            })
            .collect();
    }

    /// Whether a settled flake occupies the pixel
    pub fn is_settled(&self, x: i32, y: i32) -> bool {
        index(x, y).is_some_and(|i| self.settled[i])
    }

    /// Whether a falling flake may enter the pixel
    pub fn is_clear(&self, x: i32, y: i32) -> bool {
        if y < 0 {
            return true;
        }
        if y >= PLAYFIELD_HEIGHT {
            return false;
        }
        let inside = |&(ax, ay, aw, ah): &Area| x >= ax && x < ax + aw && y >= ay && y < ay + ah;
        if inside(&PANEL) || self.blockers.iter().any(inside) {
            return false;
        }
        !self.is_settled(x, y)
    }

    /// Drop every flake one pixel, or settle it and respawn at the top
    pub fn update(&mut self, rng: &mut Pcg32) {
        for i in 0..self.flakes.len() {
            let flake = self.flakes[i];
            let (x, y) = (flake.x(), flake.y());

            if y < SCREEN_HEIGHT - 1 && self.is_clear(x, y + 1) {
                self.flakes[i].move_by(0, 1);
            } else {
                if let Some(cell) = index(x, y) {
                    self.settled[cell] = true;
                }
                self.flakes[i].teleport(rng.random_range(0..SCREEN_WIDTH), 0);
            }
        }
    }
}

fn index(x: i32, y: i32) -> Option<usize> {
    if (0..SCREEN_WIDTH).contains(&x) && (0..SCREEN_HEIGHT).contains(&y) {
        Some((y * SCREEN_WIDTH + x) as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_start_scatters_flakes() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snow = Snow::default();
        snow.start(&mut rng, &[]);
        assert_eq!(snow.flakes.len(), MAX_SNOWFLAKES);
        assert!(snow.flakes.iter().all(|f| (0..SCREEN_WIDTH).contains(&f.x())
            && (-20..SCREEN_HEIGHT).contains(&f.y())));
    }

    #[test]
    fn test_flake_falls_then_settles_on_ground() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut snow = Snow::default();
        snow.flakes = vec![Position::new(5, PLAYFIELD_HEIGHT - 2)];

        snow.update(&mut rng);
        assert_eq!(snow.flakes[0].y(), PLAYFIELD_HEIGHT - 1);

        snow.update(&mut rng);
        assert!(snow.is_settled(5, PLAYFIELD_HEIGHT - 1));
        assert_eq!(snow.flakes[0].y(), 0);
    }

    #[test]
    fn test_flakes_pile_up() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut snow = Snow::default();
        snow.flakes = vec![Position::new(10, PLAYFIELD_HEIGHT - 1)];
        snow.update(&mut rng);
        assert!(!snow.is_clear(10, PLAYFIELD_HEIGHT - 1));

        snow.flakes = vec![Position::new(10, PLAYFIELD_HEIGHT - 2)];
        snow.update(&mut rng);
        assert!(snow.is_settled(10, PLAYFIELD_HEIGHT - 2));
    }

    #[test]
    fn test_panel_blocks_snow() {
        let snow = Snow::default();
        assert!(!snow.is_clear(100, PANEL.1));
        assert!(snow.is_clear(100, PANEL.1 - 1));
        assert!(snow.is_clear(PANEL.0 - 1, PANEL.1 + 5));
    }

    #[test]
    fn test_snow_lands_on_leftover_sprites() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut snow = Snow::default();
        let tree = (150, PLAYFIELD_HEIGHT - TREE_HEIGHT, TREE_WIDTH, TREE_HEIGHT);
        snow.start(&mut rng, &[tree]);
        assert!(!snow.is_clear(155, tree.1));
        assert!(snow.is_clear(155, tree.1 - 1));

        snow.flakes = vec![Position::new(155, tree.1 - 1)];
        snow.update(&mut rng);
        assert!(snow.is_settled(155, tree.1 - 1));
    }

    #[test]
    fn test_start_clears_pile() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut snow = Snow::default();
        snow.flakes = vec![Position::new(10, PLAYFIELD_HEIGHT - 1)];
        snow.update(&mut rng);
        snow.start(&mut rng, &[]);
        assert!(!snow.is_settled(10, PLAYFIELD_HEIGHT - 1));
    }
}
