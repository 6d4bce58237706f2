//! Dirty-rectangle rendering onto any RGB565 draw target
//!
//! The renderer only reads game state. It remembers where it last drew each
//! entity, erases stale footprints in sky blue, then draws the new frame.
//! Entering the menu or starting a run clears the whole screen; game over
//! draws its panel and snow over the last gameplay frame.

mod framebuffer;
mod screens;

pub use framebuffer::Framebuffer;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};

use crate::HighScores;
use crate::assets::colors::{GROUND_GREEN, SKY_BLUE};
use crate::assets::{SpriteId, Sprites};
use crate::consts::*;
use crate::sim::snow::Area;
use crate::sim::{FlyingObstacle, GameMode, GamePhase, GameState, ObstacleKind, Sleigh, Snow};

/// Everything a frame is drawn from
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub high_scores: &'a HighScores,
    pub snow: &'a Snow,
    pub sprites: &'a Sprites,
    pub now_ms: u64,
}

/// The playfield above the ground strip
pub fn playfield() -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(SCREEN_WIDTH as u32, PLAYFIELD_HEIGHT as u32),
    )
}

/// The ground strip along the bottom edge
pub fn ground() -> Rectangle {
    Rectangle::new(
        Point::new(0, PLAYFIELD_HEIGHT),
        Size::new(SCREEN_WIDTH as u32, GROUND_HEIGHT as u32),
    )
}

/// A sprite placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    id: SpriteId,
    top_left: Point,
}

impl Placement {
    fn new(id: SpriteId, x: i32, y: i32) -> Self {
        Self {
            id,
            top_left: Point::new(x, y),
        }
    }

    fn footprint(&self) -> Rectangle {
        let (w, h) = self.id.size();
        Rectangle::new(self.top_left, Size::new(w, h))
    }
}

/// Renderer state carried between frames
#[derive(Debug, Default)]
pub struct Renderer {
    phase: Option<GamePhase>,
    sleigh: Option<Placement>,
    trees: [Option<Placement>; TREE_COUNT],
    flyers: [Option<Placement>; FLYER_COUNT],
    score_shown: Option<i32>,
    menu_mode_shown: Option<GameMode>,
    panel_shown: bool,
    flakes_shown: Vec<Point>,
    /// Full-screen clears so far
    pub clears: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one frame
    pub fn render<D>(&mut self, display: &mut D, scene: &Scene) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let phase = scene.state.phase;
        if self.phase != Some(phase) {
            if self.phase == Some(GamePhase::Playing) && phase == GamePhase::GameOver {
                // Leave the crash scene on screen
                self.forget();
            } else {
                self.clear(display)?;
            }
            self.phase = Some(phase);
        }

        match phase {
            GamePhase::Menu => self.draw_menu(display, scene),
            GamePhase::Playing => self.draw_gameplay(display, scene),
            GamePhase::GameOver => self.draw_game_over(display, scene),
        }
    }

    /// Footprints of the sprites drawn by the last gameplay frame
    pub fn footprints(&self) -> Vec<Area> {
        self.trees
            .iter()
            .chain(&self.flyers)
            .chain(std::iter::once(&self.sleigh))
            .flatten()
            .map(|p| {
                let r = p.footprint();
                (r.top_left.x, r.top_left.y, r.size.width as i32, r.size.height as i32)
            })
            .collect()
    }

    /// Sky over the playfield, grass along the bottom; forgets every footprint
    fn clear<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        display.fill_solid(&playfield(), SKY_BLUE)?;
        display.fill_solid(&ground(), GROUND_GREEN)?;

        self.clears += 1;
        self.forget();
        log::debug!("Screen cleared ({})", self.clears);
        Ok(())
    }

    /// Drop what was drawn without touching the display
    fn forget(&mut self) {
        *self = Self {
            clears: self.clears,
            ..Self::default()
        };
    }

    fn draw_gameplay<D>(&mut self, display: &mut D, scene: &Scene) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let state = scene.state;

        let trees: Vec<Option<Placement>> = state
            .trees
            .iter()
            .map(|t| {
                t.active
                    .then(|| Placement::new(SpriteId::Tree, t.pos.x(), t.pos.y()))
            })
            .collect();
        let flyers: Vec<Option<Placement>> =
            state.flyers.iter().map(flyer_placement).collect();
        let sleigh = sleigh_placement(&state.sleigh, scene.now_ms);

        // Erase everything stale before drawing anything, so an erase never
        // cuts into a neighbor drawn this frame
        let mut field = display.clipped(&playfield());
        for (old, new) in self.trees.iter().zip(&trees) {
            erase_stale(&mut field, *old, *new)?;
        }
        for (old, new) in self.flyers.iter().zip(&flyers) {
            erase_stale(&mut field, *old, *new)?;
        }
        erase_stale(&mut field, self.sleigh, sleigh)?;

        for p in trees.iter().chain(&flyers).chain(std::iter::once(&sleigh)).flatten() {
            scene.sprites.get(p.id).draw_at(&mut field, p.top_left)?;
        }

        for (slot, p) in self.trees.iter_mut().zip(trees) {
            *slot = p;
        }
        for (slot, p) in self.flyers.iter_mut().zip(flyers) {
            *slot = p;
        }
        self.sleigh = sleigh;

        if self.score_shown != Some(state.score) {
            screens::draw_score(display, state.score)?;
            self.score_shown = Some(state.score);
        }
        Ok(())
    }

    fn draw_menu<D>(&mut self, display: &mut D, scene: &Scene) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mode = scene.state.mode;
        if self.menu_mode_shown != Some(mode) {
            screens::draw_menu_text(display, mode)?;
            self.menu_mode_shown = Some(mode);
        }
        screens::draw_menu_sprites(display, scene.sprites, mode, scene.now_ms)
    }

    fn draw_game_over<D>(&mut self, display: &mut D, scene: &Scene) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.panel_shown {
            let state = scene.state;
            screens::draw_game_over_panel(
                display,
                state.score,
                scene.high_scores.session_best(state.mode),
                scene.high_scores.record(state.mode),
            )?;
            self.panel_shown = true;
        }

        // Flakes that settled stay white; the rest of the old trail goes back to sky
        let snow = scene.snow;
        for p in self.flakes_shown.drain(..) {
            if !snow.is_settled(p.x, p.y) {
                Pixel(p, SKY_BLUE).draw(display)?;
            }
        }
        for flake in &snow.flakes {
            let p = Point::new(flake.x(), flake.y());
            if snow.is_clear(p.x, p.y) && p.y >= 0 {
                self.flakes_shown.push(p);
            }
        }
        display.draw_iter(
            self.flakes_shown
                .iter()
                .map(|p| Pixel(*p, screens::SNOW_WHITE)),
        )
    }
}

fn erase_stale<D>(
    display: &mut D,
    old: Option<Placement>,
    new: Option<Placement>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match old {
        Some(old) if Some(old.footprint()) != new.map(|p| p.footprint()) => {
            display.fill_solid(&old.footprint(), SKY_BLUE)
        }
        _ => Ok(()),
    }
}

fn flyer_placement(flyer: &FlyingObstacle) -> Option<Placement> {
    if !flyer.is_visible() {
        return None;
    }
    let id = match (flyer.kind, flyer.flap_frame) {
        (ObstacleKind::Duck, false) => SpriteId::Duck0,
        (ObstacleKind::Duck, true) => SpriteId::Duck1,
        (ObstacleKind::Foe, false) => SpriteId::Foe0,
        (ObstacleKind::Foe, true) => SpriteId::Foe1,
        (ObstacleKind::Gift, _) => SpriteId::Gift,
    };
    Some(Placement::new(id, flyer.pos.x(), flyer.pos.y()))
}

/// Sleigh frame for this instant. Blinks while crashed; the explosion sits
/// just above the ground and alternates frames.
fn sleigh_placement(sleigh: &Sleigh, now_ms: u64) -> Option<Placement> {
    if sleigh.is_exploding() {
        let id = if (now_ms / 300) % 2 == 0 {
            SpriteId::Explosion0
        } else {
            SpriteId::Explosion1
        };
        return Some(Placement::new(
            id,
            SLEIGH_X,
            PLAYFIELD_HEIGHT - SLEIGH_HITBOX * 2,
        ));
    }
    if sleigh.is_crashed() && (now_ms / 100) % 2 == 0 {
        return None;
    }
    let id = if sleigh.velocity < 0.0 {
        SpriteId::Sleigh0
    } else {
        SpriteId::Sleigh1
    };
    Some(Placement::new(id, SLEIGH_X, sleigh.top()))
}
