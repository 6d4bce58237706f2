//! Text and decorations for the menu, the score bar and the game-over panel

use embedded_graphics::{
    mono_font::{
        MonoTextStyle, MonoTextStyleBuilder,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::assets::colors::*;
use crate::assets::{SpriteId, Sprites};
use crate::consts::*;
use crate::sim::GameMode;
use crate::sim::snow::PANEL;

pub const SNOW_WHITE: Rgb565 = WHITE;

/// Width of the score bar on the ground strip
const SCORE_BAR_WIDTH: u32 = 110;

fn small(color: Rgb565, background: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .background_color(background)
        .build()
}

fn large(color: Rgb565, background: Rgb565) -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(&FONT_10X20)
        .text_color(color)
        .background_color(background)
        .build()
}

/// Draw `text` horizontally centered on the screen with its top at `y`
fn centered<D>(
    display: &mut D,
    text: &str,
    y: i32,
    style: MonoTextStyle<'static, Rgb565>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, Point::new(SCREEN_WIDTH / 2, y), style, layout).draw(display)?;
    Ok(())
}

pub fn draw_score<D>(display: &mut D, score: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let bar = Rectangle::new(
        Point::new(5, PLAYFIELD_HEIGHT),
        Size::new(SCORE_BAR_WIDTH, GROUND_HEIGHT as u32),
    );
    display.fill_solid(&bar, GROUND_GREEN)?;
    Text::with_baseline(
        &format!("Score: {}", score),
        bar.top_left,
        small(WHITE, GROUND_GREEN),
        Baseline::Top,
    )
    .draw(display)?;
    Ok(())
}

/// Mode label padded to a fixed width so switching modes overwrites it cleanly
pub fn mode_label(mode: GameMode) -> String {
    format!("Mode {:>6}", mode.as_str())
}

pub fn draw_menu_text<D>(display: &mut D, mode: GameMode) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    centered(display, "Press!", 30, large(WHITE, SKY_BLUE))?;
    centered(display, "Santa's big sleigh ride!", 70, small(WHITE, SKY_BLUE))?;
    centered(display, &mode_label(mode), 100, small(WHITE, SKY_BLUE))
}

/// Animated duck, bobbing sleigh and, in cheat mode, a bobbing foe
pub fn draw_menu_sprites<D>(
    display: &mut D,
    sprites: &Sprites,
    mode: GameMode,
    now_ms: u64,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (flap_ms, bob_period) = if mode == GameMode::Normal {
        (600, 500.0)
    } else {
        (300, 250.0)
    };

    let duck = if (now_ms / flap_ms) % 2 == 0 {
        SpriteId::Duck0
    } else {
        SpriteId::Duck1
    };
    sprites
        .get(duck)
        .draw_at(display, Point::new(SCREEN_WIDTH - 40, 30))?;

    let t = now_ms as f64 / bob_period;
    display.fill_solid(
        &Rectangle::new(
            Point::new(10, 20),
            Size::new(SLEIGH_WIDTH as u32, (SLEIGH_HEIGHT + 20) as u32),
        ),
        SKY_BLUE,
    )?;
    let sleigh = if t.cos() > 0.0 {
        SpriteId::Sleigh1
    } else {
        SpriteId::Sleigh0
    };
    sprites
        .get(sleigh)
        .draw_at(display, Point::new(10, 30 + (t.sin() * 10.0) as i32))?;

    let foe_area = Rectangle::new(
        Point::new(SCREEN_WIDTH - 30, 90),
        Size::new(DUCK_WIDTH as u32, (DUCK_HEIGHT + 20) as u32),
    );
    display.fill_solid(&foe_area, SKY_BLUE)?;
    if mode == GameMode::Cheat {
        let t = now_ms as f64 / 200.0;
        let foe = if t.cos() > 0.0 {
            SpriteId::Foe1
        } else {
            SpriteId::Foe0
        };
        sprites.get(foe).draw_at(
            display,
            Point::new(SCREEN_WIDTH - 30, 100 + (t.sin() * 10.0) as i32),
        )?;
    }
    Ok(())
}

/// Result panel with the run score, the session best and the all-time record
pub fn draw_game_over_panel<D>(
    display: &mut D,
    score: i32,
    session_best: i32,
    record: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (x, y, w, h) = PANEL;
    Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32))
        .into_styled(
            PrimitiveStyleBuilder::new()
                .fill_color(BLACK)
                .stroke_color(WHITE)
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(display)?;

    centered(display, "Game over!", y + 6, large(RED, BLACK))?;
    let text = small(WHITE, BLACK);
    centered(display, &format!("Score: {}", score), y + 30, text)?;
    centered(display, &format!("Best: {}", session_best), y + 45, text)?;
    centered(display, &format!("Record: {}", record), y + 58, text)?;
    centered(display, "Press to restart", y + 70, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Framebuffer;

    #[test]
    fn test_mode_labels_share_width() {
        let widths: Vec<usize> = GameMode::ALL.iter().map(|m| mode_label(*m).len()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert_eq!(mode_label(GameMode::Normal), "Mode Normal");
    }

    #[test]
    fn test_score_stays_on_ground_strip() {
        let mut fb = Framebuffer::new();
        let Ok(()) = draw_score(&mut fb, 1234);
        assert!(fb.count_in(5, PLAYFIELD_HEIGHT, SCORE_BAR_WIDTH as i32, GROUND_HEIGHT, WHITE) > 0);
        assert_eq!(fb.count_in(0, 0, SCREEN_WIDTH, PLAYFIELD_HEIGHT, WHITE), 0);
    }

    #[test]
    fn test_cheat_menu_shows_foe() {
        let sprites = Sprites::procedural();
        let foe_area = |fb: &Framebuffer| fb.count_in(SCREEN_WIDTH - 30, 90, DUCK_WIDTH, DUCK_HEIGHT + 20, BLACK);

        let mut fb = Framebuffer::new();
        let Ok(()) = draw_menu_sprites(&mut fb, &sprites, GameMode::Normal, 0);
        assert_eq!(foe_area(&fb), 0);

        let Ok(()) = draw_menu_sprites(&mut fb, &sprites, GameMode::Cheat, 0);
        assert!(foe_area(&fb) > 0);
    }

    #[test]
    fn test_panel_text_stays_inside_panel() {
        let mut fb = Framebuffer::new();
        let Ok(()) = draw_game_over_panel(&mut fb, 99_999, 99_999, 99_999);
        let (x, y, w, h) = PANEL;
        let inside = fb.count_in(x, y, w, h, WHITE);
        assert_eq!(fb.count(WHITE), inside);
        assert!(fb.count_in(x, y, w, h, RED) > 0);
    }
}
