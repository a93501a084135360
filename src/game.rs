//! Frame driver
//!
//! One frame: poll input, simulate the frame's time budget, draw the field,
//! advance particles, present. Everything runs on the caller's thread.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::platform::{InputState, WindowLayer};
use crate::renderer::{Bitmap, draw_text, text_size};
use crate::settings::Settings;
use crate::sim::{Box2, Field, ParticlePool, Side, StepReport, step};
use crate::with_alpha;

/// Where the field lands in a bitmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldView {
    /// Pixel rectangle holding the field, edges on whole pixels
    pub rect: Box2,
    /// Pixels per field unit
    pub scale: f32,
}

impl FieldView {
    /// Largest rectangle with the field's aspect ratio that fits inside the
    /// margin, centered
    pub fn fit(width: usize, height: usize, field_size: Vec2, margin: f32) -> Option<Self> {
        let available = Vec2::new(width as f32, height as f32) - Vec2::splat(2.0 * margin);
        let aspect = field_size.x / field_size.y;

        let field_height = available.y.min(available.x / aspect).floor();
        if field_height < 1.0 {
            return None;
        }
        let size = Vec2::new((field_height * aspect).round(), field_height);
        let min = ((Vec2::new(width as f32, height as f32) - size) * 0.5).floor();

        Some(Self {
            rect: Box2::new(min, min + size),
            scale: field_height / field_size.y,
        })
    }

    /// Field coordinates of a window pixel
    pub fn to_field(&self, pixel: Vec2) -> Vec2 {
        (pixel - self.rect.min) / self.scale
    }
}

pub struct Game {
    field: Field,
    particles: ParticlePool,
    rng: Pcg32,
    settings: Settings,
    last_report: StepReport,
    prev_left_button: bool,
    frames: u64,
}

impl Game {
    /// Seed the RNG and generate a layout
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.resolved_seed();
        log::info!("Starting with seed {seed}");
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = Field::generate(
            settings.field_aspect_ratio,
            settings.entity_capacity,
            settings.entity_speed,
            &mut rng,
        );
        Self::from_parts(settings, field, rng)
    }

    /// Drive an existing field
    pub fn with_field(settings: &Settings, field: Field) -> Self {
        let rng = Pcg32::seed_from_u64(settings.resolved_seed());
        Self::from_parts(settings, field, rng)
    }

    fn from_parts(settings: &Settings, field: Field, rng: Pcg32) -> Self {
        Self {
            field,
            particles: ParticlePool::default(),
            rng,
            settings: settings.clone(),
            last_report: StepReport::default(),
            prev_left_button: false,
            frames: 0,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    /// Report of the most recent simulated frame
    pub fn last_report(&self) -> &StepReport {
        &self.last_report
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulate `dt` seconds: collisions, explosions, size easing
    pub fn update(&mut self, dt: f64) {
        let report = step(&mut self.field, dt);

        for &index in &report.destroyed {
            let center = self.field.entities[index].center;
            let spawned = self
                .particles
                .spawn_explosion(center, ACTIVE_COLOR, &mut self.rng);
            log::info!(
                "Entity {index} destroyed, {} left, {spawned} particles",
                self.field.live_count()
            );
        }

        log::debug!(
            "Frame {}: {} substeps, {} collisions",
            self.frames,
            report.substeps,
            report.collisions
        );

        for entity in &mut self.field.entities {
            entity.ease_render_size(dt as f32);
        }
        self.last_report = report;
    }

    /// Left-button press inside the field sets off an explosion there
    fn handle_input(&mut self, input: &InputState, view: Option<&FieldView>) {
        let pressed = input.buttons.left && !self.prev_left_button;
        self.prev_left_button = input.buttons.left;
        if !pressed {
            return;
        }

        let Some(view) = view else {
            return;
        };
        let point = view.to_field(Vec2::new(input.mouse_x, input.mouse_y));
        if self.field.bounds().contains(point) {
            log::debug!("Click explosion at {point:?}");
            self.particles
                .spawn_explosion(point, SECONDARY_COLOR, &mut self.rng);
        }
    }

    /// Draw the whole frame into `bitmap`
    pub fn render(&self, bitmap: &mut Bitmap, input: &InputState) {
        bitmap.clear(BACKGROUND_COLOR);

        let view = FieldView::fit(
            bitmap.width(),
            bitmap.height(),
            self.field.size,
            self.settings.field_margin_px,
        );
        if let Some(view) = &view {
            let mut field_bitmap = bitmap.sub_bitmap(view.rect);
            self.draw_field(&mut field_bitmap, view.scale);
        }

        if self.settings.show_hud {
            let text = self.hud_text();
            let panel = Box2::new(Vec2::splat(4.0), Vec2::splat(12.0) + text_size(&text));
            bitmap.fill_rectangle(panel, with_alpha(BACKGROUND_COLOR, 0xc0));
            draw_text(bitmap, Vec2::splat(8.0), &text);
        }

        let cursor = Vec2::new(input.mouse_x, input.mouse_y);
        let over_field = view.is_some_and(|v| self.field.bounds().contains(v.to_field(cursor)));
        let cursor_color = if over_field {
            SECONDARY_COLOR
        } else {
            DISABLED_COLOR
        };
        bitmap.draw_circle(cursor, 6.0, cursor_color);
    }

    fn draw_field(&self, bitmap: &mut Bitmap, scale: f32) {
        for entity in &self.field.entities {
            if entity.hidden || entity.disabled {
                continue;
            }
            let rect = entity.render_bounds().scale(scale);
            bitmap.fill_rectangle(rect, ACTIVE_COLOR);

            // Damaging edges, drawn on the outermost pixels of the box
            let last = rect.max - Vec2::ONE;
            for side in Side::ALL {
                if !entity.damaging.get(side) {
                    continue;
                }
                let (from, to) = match side {
                    Side::Top => (rect.min, Vec2::new(last.x, rect.min.y)),
                    Side::Right => (Vec2::new(last.x, rect.min.y), last),
                    Side::Bottom => (Vec2::new(rect.min.x, last.y), last),
                    Side::Left => (rect.min, Vec2::new(rect.min.x, last.y)),
                };
                bitmap.draw_line(from.round(), to.round(), DAMAGING_COLOR);
            }
        }

        for particle in self.particles.iter() {
            bitmap.fill_circle(particle.position * scale, particle.size * scale, particle.color);
        }

        bitmap.draw_rectangle(bitmap.bounds(), SECONDARY_COLOR);
    }

    fn hud_text(&self) -> String {
        format!(
            "entities  {}/{}\nparticles {}/{}\nsubsteps  {}",
            self.field.live_count(),
            self.field.dynamic_count(),
            self.particles.active_count(),
            self.particles.capacity(),
            self.last_report.substeps,
        )
    }

    /// Run one frame against `window`; false once the window wants to close
    pub fn frame<W: WindowLayer>(&mut self, window: &mut W) -> bool {
        let input = window.poll_input();
        if input.should_close {
            return false;
        }
        if input.resized {
            log::debug!("Window resized, field view recomputed from the new buffer");
        }

        let dt = window.frame_delta_seconds();
        {
            let mut bitmap = window.acquire_frame_buffer();
            let view = FieldView::fit(
                bitmap.width(),
                bitmap.height(),
                self.field.size,
                self.settings.field_margin_px,
            );
            self.handle_input(&input, view.as_ref());
            self.update(dt);
            self.render(&mut bitmap, &input);
        }
        self.particles.advance(dt as f32);
        window.present();

        self.frames += 1;
        true
    }

    /// Run frames until the window asks to close; returns the frame count
    pub fn run<W: WindowLayer>(&mut self, window: &mut W) -> u64 {
        while self.frame(window) {}
        log::info!(
            "Stopped after {} frames, {} of {} entities left",
            self.frames,
            self.field.live_count(),
            self.field.dynamic_count()
        );
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessWindow;
    use crate::sim::{DamagingSides, Entity};

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Walls only, so nothing but clicks can spawn particles
    fn empty_field() -> Field {
        Field::with_size(Vec2::new(FIELD_ASPECT_RATIO, 1.0), DEFAULT_ENTITY_CAPACITY)
    }

    #[test]
    fn test_field_view_fits_and_centers() {
        let view = FieldView::fit(1280, 720, Vec2::new(4.0 / 3.0, 1.0), 48.0).unwrap();
        assert_eq!(view.scale, 624.0);
        assert_eq!(view.rect.size(), Vec2::new(832.0, 624.0));
        assert_eq!(view.rect.min, Vec2::new(224.0, 48.0));
        assert_eq!(view.to_field(Vec2::new(224.0 + 312.0, 48.0 + 312.0)), Vec2::splat(0.5));

        assert!(FieldView::fit(90, 90, Vec2::ONE, 48.0).is_none());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Game::new(&seeded(5));
        let mut b = Game::new(&seeded(5));
        for _ in 0..120 {
            a.update(1.0 / 60.0);
            b.update(1.0 / 60.0);
        }
        for (x, y) in a.field().entities.iter().zip(&b.field().entities) {
            assert_eq!(x.center, y.center);
            assert_eq!(x.size, y.size);
        }
    }

    #[test]
    fn test_update_consumes_whole_frame() {
        let mut game = Game::new(&seeded(11));
        for _ in 0..60 {
            game.update(1.0 / 60.0);
            let report = game.last_report();
            assert!(!report.hit_substep_cap);
            assert!((report.time_simulated - 1.0 / 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_destruction_spawns_explosion() {
        let mut field = Field::with_size(Vec2::ONE, 8);
        let victim = field
            .push(Entity::dynamic(
                Box2::from_center_size(Vec2::new(0.3, 0.5), Vec2::splat(MIN_ENTITY_SIZE + 0.005)),
                Vec2::new(0.5, 0.0),
                DamagingSides::default(),
            ))
            .unwrap();
        field.push(Entity::dynamic(
            Box2::from_center_size(Vec2::new(0.5, 0.5), Vec2::splat(0.1)),
            Vec2::ZERO,
            DamagingSides {
                left: true,
                ..Default::default()
            },
        ));

        let mut game = Game::with_field(&seeded(1), field);
        game.update(0.5);

        assert_eq!(game.last_report().destroyed, vec![victim]);
        assert!(game.field().entities[victim].disabled);
        assert!(game.particles().active_count() >= EXPLOSION_MIN_PARTICLES as usize);
        assert_eq!(game.field().live_count(), 1);
    }

    #[test]
    fn test_click_inside_field_explodes_once() {
        let mut game = Game::with_field(&seeded(3), empty_field());
        let mut window = HeadlessWindow::new(1280, 720, 60.0);

        let mut click = InputState {
            mouse_x: 640.0,
            mouse_y: 360.0,
            ..Default::default()
        };
        click.buttons.left = true;
        window.push_input(click);
        window.push_input(click);

        assert!(game.frame(&mut window));
        let after_press = game.particles().active_count();
        assert!(after_press >= EXPLOSION_MIN_PARTICLES as usize);

        // Holding the button does not fire again
        assert!(game.frame(&mut window));
        assert!(game.particles().active_count() <= after_press);
    }

    #[test]
    fn test_click_outside_field_does_nothing() {
        let mut game = Game::with_field(&seeded(3), empty_field());
        let mut window = HeadlessWindow::new(1280, 720, 60.0);
        let mut click = InputState {
            mouse_x: 10.0,
            mouse_y: 10.0,
            ..Default::default()
        };
        click.buttons.left = true;
        window.push_input(click);

        game.frame(&mut window);
        assert_eq!(game.particles().active_count(), 0);
    }

    #[test]
    fn test_render_draws_field_and_hud() {
        let game = Game::new(&seeded(8));
        let mut window = HeadlessWindow::new(640, 480, 60.0);
        let mut bitmap = window.acquire_frame_buffer();
        game.render(&mut bitmap, &InputState::default());

        let view = FieldView::fit(640, 480, game.field().size, FIELD_MARGIN).unwrap();
        let corner = view.rect.min;
        assert_eq!(bitmap.pixel(corner.x as i32, corner.y as i32), Some(SECONDARY_COLOR));
        assert_eq!(bitmap.pixel(639, 479), Some(BACKGROUND_COLOR));

        let mut active = 0;
        for y in 0..480 {
            for x in 0..640 {
                if bitmap.pixel(x, y) == Some(ACTIVE_COLOR) {
                    active += 1;
                }
            }
        }
        assert!(active > 0);

        // HUD shadow pixels in the top-left corner
        let shadow = (0..40).any(|y| (0..120).any(|x| bitmap.pixel(x, y) == Some(SHADOW_COLOR)));
        assert!(shadow);
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut game = Game::new(&seeded(2));
        let mut window = HeadlessWindow::new(320, 240, 60.0).with_frame_limit(30);
        assert_eq!(game.run(&mut window), 30);
        assert_eq!(window.frames_presented(), 30);
    }
}
