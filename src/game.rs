// Pixcade
// copyright pixcade contributors 2024～2026

//! Game encapsulates Model and Render classes and implements the main
//! loop. All the Game, Model and Render instances have the same lifetime.
//!
//! The loop is single-threaded and cooperative: poll input, then on each
//! elapsed tick run update-then-render synchronously. Steps never overlap
//! and teardown is deterministic: once the adapter reports quit, run
//! returns and no further steps fire.

use crate::{context::Context, event::timer_update, log::init_log};
use log::info;
use std::{
    io,
    time::{Duration, Instant},
};

/// The Model interface, main entrance for data and core logic.
///
/// The default update gates simulation on the phase machine: global
/// timers, handle_timer and handle_auto run only while Playing, so a
/// paused game freezes entity state and timers exactly as-is. Input
/// handling always runs, which is what lets pause/resume/restart keys
/// work in the first place.
pub trait Model {
    fn init(&mut self, ctx: &mut Context);
    fn update(&mut self, ctx: &mut Context, dt: f32) {
        if ctx.phase.is_running() {
            timer_update();
        }
        self.handle_event(ctx, dt);
        if ctx.phase.is_running() {
            self.handle_timer(ctx, dt);
            self.handle_auto(ctx, dt);
        }
        self.handle_input(ctx, dt);
    }
    fn handle_event(&mut self, ctx: &mut Context, dt: f32);
    fn handle_timer(&mut self, ctx: &mut Context, dt: f32);
    fn handle_input(&mut self, ctx: &mut Context, dt: f32);
    fn handle_auto(&mut self, ctx: &mut Context, dt: f32);
}

/// The Render interface, takes context and model as input params. It
/// renders every single frame, whatever the phase: a paused game keeps
/// showing its frozen frame plus the overlay the render chooses to draw.
pub trait Render {
    type Model: Model;

    fn init(&mut self, ctx: &mut Context, m: &mut Self::Model);
    fn update(&mut self, ctx: &mut Context, m: &mut Self::Model, dt: f32) {
        self.handle_event(ctx, m, dt);
        self.handle_timer(ctx, m, dt);
        self.draw(ctx, m, dt);
    }
    fn handle_event(&mut self, ctx: &mut Context, model: &mut Self::Model, dt: f32);
    fn handle_timer(&mut self, ctx: &mut Context, model: &mut Self::Model, dt: f32);
    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, dt: f32);
}

/// Game encapsulates a Model, a Render and a Context structure
pub struct Game<M, R>
where
    M: Model,
    R: Render<Model = M>,
{
    pub context: Context,
    pub model: M,
    pub render: R,
}

impl<M, R> Game<M, R>
where
    M: Model,
    R: Render<Model = M>,
{
    pub fn new(m: M, r: R, name: &str) -> Self {
        let ctx = Context::new(name);
        init_log(
            log::LevelFilter::Info,
            &format!("log{}{}.log", std::path::MAIN_SEPARATOR, name),
        );
        info!("{}(pixcade) start...", name);
        Self {
            context: ctx,
            model: m,
            render: r,
        }
    }

    /// Main loop, polling input events and calling on_tick at the
    /// configured framerate. Returns when the adapter reports quit.
    pub fn run(&mut self) -> io::Result<()> {
        info!("Begin run...");

        let mut last_tick = Instant::now();
        let tick_rate = Duration::from_nanos(1_000_000_000 / self.context.config.fps as u64);

        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_nanos(100));

            if self
                .context
                .adapter
                .poll_event(timeout, &mut self.context.input_events)
            {
                info!("Quit requested, stopping loop...");
                return Ok(());
            }

            let et = last_tick.elapsed();

            if et >= tick_rate {
                let dt = et.as_secs_f32();
                self.on_tick(dt);
                last_tick = Instant::now();
            }
        }
    }

    /// one step: absorb input, update model logic, then render
    pub fn on_tick(&mut self, dt: f32) {
        self.context.stage += 1;
        self.context.absorb_input(dt);
        self.model.update(&mut self.context, dt);
        self.render.update(&mut self.context, &mut self.model, dt);
        self.context.input_events.clear();
    }

    /// init model and render
    pub fn init(&mut self) {
        info!("Init game...");
        self.model.init(&mut self.context);
        self.render.init(&mut self.context, &mut self.model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Phase, PhaseEvent};

    /// minimal model: one actor drifting right while Playing
    struct DriftModel {
        x: f32,
        vx: f32,
    }

    impl Model for DriftModel {
        fn init(&mut self, ctx: &mut Context) {
            ctx.phase = Phase::Playing;
        }
        fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
        fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
        fn handle_input(&mut self, _ctx: &mut Context, _dt: f32) {}
        fn handle_auto(&mut self, _ctx: &mut Context, dt: f32) {
            self.x += self.vx * dt;
        }
    }

    #[test]
    fn paused_steps_freeze_entity_state() {
        let mut ctx = Context::new("drift-test");
        let mut m = DriftModel { x: 1.0, vx: 10.0 };
        m.init(&mut ctx);

        m.update(&mut ctx, 0.016);
        assert!(m.x > 1.0);

        let frozen = m.x;
        ctx.phase_event(PhaseEvent::PauseToggle);
        for _ in 0..10 {
            m.update(&mut ctx, 0.016);
        }
        assert_eq!(m.x, frozen);

        // resume continues from the resume point, one step of motion only
        ctx.phase_event(PhaseEvent::PauseToggle);
        m.update(&mut ctx, 0.016);
        assert!((m.x - (frozen + 10.0 * 0.016)).abs() < 1e-6);
    }

    #[test]
    fn rest_state_is_idempotent() {
        let mut ctx = Context::new("rest-test");
        let mut m = DriftModel { x: 4.0, vx: 0.0 };
        m.init(&mut ctx);
        for _ in 0..100 {
            m.update(&mut ctx, 0.016);
        }
        assert_eq!(m.x, 4.0);
    }
}
