//! Draws a [`World`] snapshot into a [`PixelBuf`].

use super::font::{self, GLYPH_H};
use super::*;
use crate::config::Physics;
use crate::game::{Phase, World};

const RETRY_PROMPT: &str = "SPACE TO RETRY";

/// Maps world units onto buffer pixels.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    sx: f64,
    sy: f64,
}

impl Projection {
    pub fn new(physics: &Physics, buf: &PixelBuf) -> Self {
        Self {
            sx: buf.width() as f64 / physics.world.width,
            sy: buf.height() as f64 / physics.world.height,
        }
    }

    pub fn x(&self, x: f64) -> i32 {
        (x * self.sx).round() as i32
    }

    pub fn y(&self, y: f64) -> i32 {
        (y * self.sy).round() as i32
    }

    pub fn w(&self, w: f64) -> i32 {
        (w * self.sx).round() as i32
    }

    pub fn h(&self, h: f64) -> i32 {
        (h * self.sy).round() as i32
    }
}

/// One frame's worth of drawing. Never mutates the world.
pub struct Scene<'a> {
    world: &'a World,
    physics: &'a Physics,
    show_hud: bool,
}

impl<'a> Scene<'a> {
    pub fn new(world: &'a World, physics: &'a Physics, show_hud: bool) -> Self {
        Self {
            world,
            physics,
            show_hud,
        }
    }

    pub fn draw(&self, buf: &mut PixelBuf) {
        let view = View::new(self.physics, buf);
        self.draw_sky(buf, &view);
        self.draw_hills(buf, &view);
        self.draw_pipes(buf, &view);
        self.draw_ground(buf, &view);
        self.draw_bird(buf, &view);

        match self.world.phase {
            Phase::NotStarted => self.draw_title(buf, &view),
            Phase::Playing => {}
            Phase::Ended => self.draw_game_over(buf, &view),
        }
        if self.world.phase != Phase::Ended {
            self.draw_score(buf, &view);
        }
        if self.show_hud {
            self.draw_tuning_hud(buf, &view);
        }
    }

    fn draw_sky(&self, buf: &mut PixelBuf, view: &View) {
        let sky_h = view.ground;
        for y in 0..sky_h {
            let t = (y as u32 * 256 / sky_h.max(1) as u32) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            buf.fill_rect(0, y, view.pw, 1, c);
        }
    }

    fn draw_hills(&self, buf: &mut PixelBuf, view: &View) {
        let base = view.ground;
        let scroll = self.world.distance * view.proj.sx;
        let s = view.scale;
        // Far hills
        for x in 0..view.pw {
            let fx = (x as f64 + scroll * 0.2) * 0.04;
            let h = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0) * s;
            let top = base - h as i32 - (4.0 * s) as i32;
            buf.fill_rect(x, top, 1, base - top, HILL_FAR);
        }
        // Near hills
        for x in 0..view.pw {
            let fx = (x as f64 + scroll * 0.4) * 0.06;
            let h = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0) * s;
            let top = base - h as i32 - (2.0 * s) as i32;
            buf.fill_rect(x, top, 1, base - top, HILL_NEAR);
        }
    }

    fn draw_ground(&self, buf: &mut PixelBuf, view: &View) {
        let gy = view.ground;
        let scroll = self.world.distance * view.proj.sx;
        // Grass strip
        for x in 0..view.pw {
            let alt = ((x as f64 + scroll) as i32 / 3) % 2 == 0;
            buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            buf.set(x, gy + 1, GRASS);
        }
        // Dirt
        for y in (gy + 2)..view.ph {
            for x in 0..view.pw {
                let stripe = ((x as f64 + scroll * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
                buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_pipes(&self, buf: &mut PixelBuf, view: &View) {
        let cap_extra = (2.0 * view.scale).max(1.0) as i32;
        let cap_h = (3.0 * view.scale).max(2.0) as i32;
        let pw = view.proj.w(self.physics.pipe_width).max(1);

        for pipe in &self.world.pipes {
            let px = view.proj.x(pipe.x);
            let gap_top = view.proj.y(pipe.gap_top(self.physics));
            let gap_bot = view.proj.y(pipe.gap_bottom(self.physics));

            // Top pipe body
            for x in 0..pw {
                buf.fill_rect(px + x, 0, 1, gap_top - cap_h, pipe_shade(x, pw));
            }
            // Top pipe cap
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                buf.fill_rect(px + x, gap_top - cap_h, 1, cap_h, c);
                // Cap edge darkening
                buf.set(px + x, gap_top - cap_h, CAP_DARK);
                buf.set(px + x, gap_top - 1, CAP_DARK);
            }

            // Bottom pipe cap
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                buf.fill_rect(px + x, gap_bot, 1, cap_h, c);
                buf.set(px + x, gap_bot, CAP_DARK);
                buf.set(px + x, gap_bot + cap_h - 1, CAP_DARK);
            }
            // Bottom pipe body
            for x in 0..pw {
                let top = gap_bot + cap_h;
                buf.fill_rect(px + x, top, 1, view.ground - top, pipe_shade(x, pw));
            }
        }
    }

    fn draw_bird(&self, buf: &mut PixelBuf, view: &View) {
        let bird = &self.world.bird;
        let s = view.scale;
        let tick = self.world.tick;

        // Idle bob before the first flap; the world position stays put.
        let bob = if self.world.phase == Phase::NotStarted {
            (tick as f64 * 0.08).sin() * 3.0 * s
        } else {
            0.0
        };
        let cx = view.proj.x(bird.x);
        let cy = view.proj.y(bird.y) + bob as i32;

        // Determine tilt for visual (shift pixels up/down)
        let tilt_unit = (self.physics.flap_strength.abs() / 3.0).max(f64::EPSILON);
        let tilt = (bird.velocity / tilt_unit).clamp(-1.0, 1.0) as i32;

        // Body core
        let bw = view.proj.w(bird.half_w).max(2);
        let bh = view.proj.h(bird.half_h).max(1);
        buf.fill_rect(cx - bw, cy - bh, bw * 2 + 1, bh * 2, BIRD_Y);

        // Highlight (top of body)
        buf.fill_rect(cx - bw + 1, cy - bh, bw * 2 - 2, 1.max((s * 0.8) as i32), BIRD_HI);

        // Wing beats while alive, folded after a crash.
        let wing_y_off = match self.world.phase {
            Phase::Ended => 0,
            _ if tick % 8 < 4 => -1,
            _ => 1,
        };
        let wing_h = (1.5 * s).max(1.0) as i32;
        let wing_w = (2.0 * s).max(1.0) as i32;
        buf.fill_rect(cx - bw + 1, cy + wing_y_off + tilt, wing_w, wing_h, BIRD_WING);

        // Eye
        let eye_r = (0.8 * s).max(1.0) as i32;
        let ex = cx + bw - eye_r - 1;
        let ey = cy - bh + (0.5 * s).max(1.0) as i32;
        buf.fill_rect(ex, ey, eye_r + 1, eye_r + 1, BIRD_EYE);
        buf.set(ex + eye_r, ey + eye_r, BIRD_PUPIL);

        // Beak
        let beak_x = cx + bw;
        let beak_y = cy - (0.5 * s) as i32 + tilt;
        let beak_w = (2.0 * s).max(2.0) as i32;
        let beak_h = (1.5 * s).max(1.0) as i32;
        buf.fill_rect(beak_x, beak_y, beak_w, beak_h / 2 + 1, BIRD_BEAK_HI);
        buf.fill_rect(beak_x, beak_y + beak_h / 2 + 1, beak_w, beak_h / 2, BIRD_BEAK);

        // Tail
        let tail_w = (1.5 * s).max(1.0) as i32;
        buf.fill_rect(cx - bw - tail_w, cy - 1 + tilt, tail_w, 2, BIRD_WING);
    }

    fn draw_score(&self, buf: &mut PixelBuf, view: &View) {
        font::draw_number(buf, view.pw / 2, 4, self.world.score, view.text_scale, WHITE);
    }

    /// Gravity, flap and speed as integers (value × 100) in the bottom-right.
    fn draw_tuning_hud(&self, buf: &mut PixelBuf, view: &View) {
        let rows = [
            ("G", self.physics.gravity, Rgb(180, 180, 255)),
            ("F", -self.physics.flap_strength, Rgb(255, 180, 180)),
            ("S", self.physics.pipe_speed, Rgb(180, 255, 180)),
        ];
        let line_h = GLYPH_H + 2;
        let bottom = view.ground - line_h - 1;
        let cx = view.pw - 14;

        for (i, (label, value, color)) in rows.iter().enumerate() {
            let y = bottom - i as i32 * line_h;
            let text = format!("{label}{}", (value * 100.0).round().max(0.0) as u32);
            font::draw_text(buf, cx, y, &text, 1, *color);
        }
    }

    fn draw_title(&self, buf: &mut PixelBuf, view: &View) {
        let cx = view.pw / 2;
        let cy = view.ph / 4;
        let big = view.text_scale * 2;
        font::draw_text(buf, cx, cy, "FLAPPY", big, BIRD_Y);

        let sub_y = cy + GLYPH_H * big + 2 * view.text_scale + 2;
        font::draw_text(buf, cx, sub_y, "SPACE TO FLAP", view.text_scale, WHITE);
    }

    fn draw_game_over(&self, buf: &mut PixelBuf, view: &View) {
        let cx = view.pw / 2;
        let cy = view.ph / 2;
        let ts = view.text_scale;
        let line_h = (GLYPH_H + 3) * ts;
        let panel_w = (40.0 * view.scale).max(30.0) as i32;
        let panel_h = (line_h * 3 + 4).max(16);

        // Dark overlay
        buf.dim();

        font::draw_text(buf, cx, cy - panel_h / 2 - line_h - 2, "GAME OVER", ts, WHITE);

        // Panel background
        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        buf.fill_rect(px, py, panel_w, panel_h, DIRT);
        buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        // Score
        font::draw_number(buf, cx, py + 3, self.world.score, ts, WHITE);

        // Best
        font::draw_text(buf, cx, py + 3 + line_h, "BEST", ts, BIRD_WING);
        font::draw_number(buf, cx, py + 3 + line_h * 2, self.world.best, ts, BIRD_Y);

        font::draw_text(buf, cx, py + panel_h + 3, RETRY_PROMPT, ts, WHITE);
    }
}

/// Per-frame layout derived from the buffer size.
struct View {
    proj: Projection,
    pw: i32,
    ph: i32,
    /// Ground line in pixels.
    ground: i32,
    /// Sprite detail scale; 1.0 on a 48-pixel-tall buffer.
    scale: f64,
    text_scale: i32,
}

impl View {
    fn new(physics: &Physics, buf: &PixelBuf) -> Self {
        let proj = Projection::new(physics, buf);
        let ph = buf.height() as i32;
        let scale = ph as f64 / 48.0;
        Self {
            proj,
            pw: buf.width() as i32,
            ph,
            ground: proj.y(physics.ground_y()).clamp(0, ph),
            scale,
            text_scale: (scale.floor() as i32).max(1),
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.max(0) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Pipe;

    fn world_in(phase: Phase, physics: &Physics) -> World {
        let mut world = World::new(physics);
        world.phase = phase;
        world
    }

    #[test]
    fn test_projection_maps_world_corners() {
        let physics = Physics::default();
        let buf = PixelBuf::new(100, 60);
        let proj = Projection::new(&physics, &buf);
        assert_eq!(proj.x(0.0), 0);
        assert_eq!(proj.x(physics.world.width), 100);
        assert_eq!(proj.y(physics.world.height), 60);
        assert_eq!(proj.y(physics.ground_y()), 54);
    }

    #[test]
    fn test_draws_every_phase_at_any_size() {
        let physics = Physics::default();
        for phase in [Phase::NotStarted, Phase::Playing, Phase::Ended] {
            let mut world = world_in(phase, &physics);
            world.pipes.push(Pipe::new(-30.0, 200.0));
            world.pipes.push(Pipe::new(240.0, 350.0));
            world.score = 123;
            world.best = 456;
            for (w, h) in [(1, 2), (8, 6), (80, 48), (240, 120)] {
                let mut buf = PixelBuf::new(w, h);
                Scene::new(&world, &physics, true).draw(&mut buf);
            }
        }
    }

    #[test]
    fn test_bird_drawn_at_projected_position() {
        let physics = Physics::default();
        let world = world_in(Phase::Playing, &physics);
        let mut buf = PixelBuf::new(200, 120);
        Scene::new(&world, &physics, false).draw(&mut buf);

        let proj = Projection::new(&physics, &buf);
        let cx = proj.x(world.bird.x) as usize;
        let cy = proj.y(world.bird.y) as usize;
        let body = [BIRD_Y, BIRD_HI, BIRD_WING, BIRD_EYE, BIRD_PUPIL];
        assert!(body.contains(&buf.get(cx, cy)));
    }

    #[test]
    fn test_pipe_body_drawn_above_gap() {
        let physics = Physics::default();
        let mut world = world_in(Phase::Playing, &physics);
        world.pipes.push(Pipe::new(200.0, 300.0));
        let mut buf = PixelBuf::new(200, 120);
        Scene::new(&world, &physics, false).draw(&mut buf);

        let proj = Projection::new(&physics, &buf);
        let x = proj.x(215.0) as usize;
        let body = buf.get(x, proj.y(50.0) as usize);
        let gap = buf.get(x, proj.y(300.0) as usize);
        // Pipe shades are green-dominant, the sky is blue-dominant.
        assert!(body.1 > body.0 && body.1 > body.2);
        assert!(gap.2 > gap.1);
    }

    #[test]
    fn test_game_over_dims_the_sky() {
        let physics = Physics::default();
        let mut buf_playing = PixelBuf::new(80, 48);
        let mut buf_ended = PixelBuf::new(80, 48);
        Scene::new(&world_in(Phase::Playing, &physics), &physics, false).draw(&mut buf_playing);
        Scene::new(&world_in(Phase::Ended, &physics), &physics, false).draw(&mut buf_ended);

        assert_eq!(buf_ended.get(0, 0), buf_playing.get(0, 0).dim());
    }

    #[test]
    fn test_game_over_shows_retry_prompt() {
        let physics = Physics::default();
        let mut buf = PixelBuf::new(80, 48);
        Scene::new(&world_in(Phase::Ended, &physics), &physics, false).draw(&mut buf);

        // Everything behind the panel is dimmed, so full white below it is the prompt.
        let panel_bottom = 38;
        let prompt_px = (panel_bottom..buf.height())
            .flat_map(|y| (0..buf.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == WHITE)
            .count();
        assert!(prompt_px > 0);
    }
}
