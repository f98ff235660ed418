use log::info;
use pixcade::{
    audio::Cue,
    context::Context,
    event::{Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    util::{
        circle_hit,
        objpool::{GObj, GameObjPool},
        wrap, Rand,
    },
};
use std::f32::consts::TAU;

pub const FIELD_W: f32 = 70.0;
pub const FIELD_H: f32 = 30.0;

const TURN_RATE: f32 = 3.5;
const ACCEL: f32 = 18.0;
/// fraction of velocity kept per second of coasting
const DRAG: f32 = 0.45;

const SHOT_SPEED: f32 = 32.0;
const SHOT_LIFE: f32 = 1.1;
const MAX_SHOTS: usize = 4;

pub const SHIP_R: f32 = 1.0;
const INVULN_TIME: f32 = 2.0;

pub const MAX_ROCKS: usize = 48;
/// radius per size tier: 0 large, 1 medium, 2 small
pub const ROCK_RADII: [f32; 3] = [4.0, 2.0, 1.0];
/// the smallest tier pays the highest points
pub const ROCK_POINTS: [u64; 3] = [20, 50, 100];
pub const ROCK_SPEEDS: [f32; 3] = [3.0, 5.0, 8.0];

#[derive(Default)]
pub struct Rock {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: u8,
}

impl GObj for Rock {
    fn new() -> Rock {
        Default::default()
    }

    /// args: [x, y, vx, vy]
    fn reset(&mut self, size: u8, args: &[f32]) {
        self.size = size;
        self.x = args[0];
        self.y = args[1];
        self.vx = args[2];
        self.vy = args[3];
    }
}

impl Rock {
    pub fn radius(&self) -> f32 {
        ROCK_RADII[self.size as usize]
    }
}

/// Destroy one rock: large and medium spawn exactly two children of the
/// next smaller size at the parent's position, each with a random
/// heading and the tier base speed scaled by a random factor in
/// [0.5, 1.0]; small rocks leave nothing. Returns the points awarded.
pub fn destroy_rock(rocks: &mut GameObjPool<Rock>, id: usize, rand: &mut Rand) -> u64 {
    let (x, y, size) = {
        let r = &rocks.pool[id];
        (r.obj.x, r.obj.y, r.obj.size)
    };
    rocks.pool[id].active = false;
    if size < 2 {
        let child = size + 1;
        for _ in 0..2 {
            let heading = rand.gen_range(0.0, TAU);
            let speed = ROCK_SPEEDS[child as usize] * rand.gen_range(0.5, 1.0);
            rocks.create(
                child,
                &[x, y, heading.cos() * speed, heading.sin() * speed],
            );
        }
    }
    ROCK_POINTS[size as usize]
}

#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub vx: f32,
    pub vy: f32,
    pub invuln: f32,
    pub thrusting: bool,
}

impl Ship {
    fn centered() -> Self {
        Self {
            x: FIELD_W / 2.0,
            y: FIELD_H / 2.0,
            angle: -std::f32::consts::FRAC_PI_2,
            vx: 0.0,
            vy: 0.0,
            invuln: INVULN_TIME,
            thrusting: false,
        }
    }
}

pub struct AsteroidsModel {
    pub ship: Ship,
    pub shots: Vec<Shot>,
    pub rocks: GameObjPool<Rock>,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl AsteroidsModel {
    pub fn new() -> Self {
        Self {
            ship: Ship::centered(),
            shots: vec![],
            rocks: GameObjPool::new("ROCK", MAX_ROCKS),
            score: 0,
            lives: 3,
            level: 1,
        }
    }

    fn reset(&mut self, ctx: &mut Context) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.shots.clear();
        self.ship = Ship::centered();
        self.spawn_wave(ctx);
    }

    /// wave rocks enter on the field edge, never on top of the ship
    fn spawn_wave(&mut self, ctx: &mut Context) {
        self.rocks.clear();
        let count = (3 + self.level as usize).min(12);
        for _ in 0..count {
            let (x, y) = if ctx.rand.pick(2) == 0 {
                (ctx.rand.gen_range(0.0, FIELD_W), 0.0)
            } else {
                (0.0, ctx.rand.gen_range(0.0, FIELD_H))
            };
            let heading = ctx.rand.gen_range(0.0, TAU);
            let speed = ROCK_SPEEDS[0] * ctx.rand.gen_range(0.5, 1.0);
            self.rocks.create(
                0,
                &[x, y, heading.cos() * speed, heading.sin() * speed],
            );
        }
    }

    fn fire(&mut self, ctx: &mut Context) {
        if self.shots.len() >= MAX_SHOTS {
            return;
        }
        let (sin, cos) = self.ship.angle.sin_cos();
        self.shots.push(Shot {
            x: wrap(self.ship.x + cos * SHIP_R, FIELD_W),
            y: wrap(self.ship.y + sin * SHIP_R, FIELD_H),
            vx: self.ship.vx + cos * SHOT_SPEED,
            vy: self.ship.vy + sin * SHOT_SPEED,
            life: SHOT_LIFE,
        });
        ctx.play(Cue::Shoot);
    }

    /// shots iterate in reverse insertion order, rocks in storage order;
    /// the first overlap consumes the shot
    fn collide_shots(&mut self, ctx: &mut Context) {
        for si in (0..self.shots.len()).rev() {
            let s = self.shots[si];
            let mut hit_rock: Option<usize> = None;
            for o in &self.rocks.pool {
                if o.active
                    && circle_hit(s.x, s.y, 0.5, o.obj.x, o.obj.y, o.obj.radius())
                {
                    hit_rock = Some(o.id);
                    break;
                }
            }
            if let Some(id) = hit_rock {
                self.score += destroy_rock(&mut self.rocks, id, &mut ctx.rand);
                self.shots.remove(si);
                ctx.play(Cue::Explosion);
            }
        }
    }

    fn collide_ship(&mut self, ctx: &mut Context) {
        if self.ship.invuln > 0.0 {
            return;
        }
        let hit = self.rocks.pool.iter().any(|o| {
            o.active
                && circle_hit(
                    self.ship.x,
                    self.ship.y,
                    SHIP_R,
                    o.obj.x,
                    o.obj.y,
                    o.obj.radius(),
                )
        });
        if !hit {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        ctx.play(Cue::Explosion);
        if self.lives == 0 {
            info!("ship destroyed, score {}", self.score);
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
        } else {
            // reset, not destroy: recentered with a grace window
            self.ship = Ship::centered();
        }
    }

    pub fn step(&mut self, ctx: &mut Context, dt: f32) {
        let ship = &mut self.ship;
        ship.invuln = (ship.invuln - dt).max(0.0);

        // impulse while held, fixed angular increment per step
        if ctx.input.is_held(KeyCode::Left) || ctx.input.is_held(KeyCode::Char('a')) {
            ship.angle -= TURN_RATE * dt;
        }
        if ctx.input.is_held(KeyCode::Right) || ctx.input.is_held(KeyCode::Char('d')) {
            ship.angle += TURN_RATE * dt;
        }
        ship.thrusting =
            ctx.input.is_held(KeyCode::Up) || ctx.input.is_held(KeyCode::Char('w'));
        if ship.thrusting {
            let (sin, cos) = ship.angle.sin_cos();
            ship.vx += cos * ACCEL * dt;
            ship.vy += sin * ACCEL * dt;
        }

        // exponential coasting decay, then toroidal wrap
        let drag = DRAG.powf(dt);
        ship.vx *= drag;
        ship.vy *= drag;
        ship.x = wrap(ship.x + ship.vx * dt, FIELD_W);
        ship.y = wrap(ship.y + ship.vy * dt, FIELD_H);

        for s in &mut self.shots {
            s.x = wrap(s.x + s.vx * dt, FIELD_W);
            s.y = wrap(s.y + s.vy * dt, FIELD_H);
            s.life -= dt;
        }
        self.shots.retain(|s| s.life > 0.0);

        self.rocks.update_active(|o| {
            o.obj.x = wrap(o.obj.x + o.obj.vx * dt, FIELD_W);
            o.obj.y = wrap(o.obj.y + o.obj.vy * dt, FIELD_H);
        });

        self.collide_shots(ctx);
        self.collide_ship(ctx);

        if self.rocks.count_active() == 0 {
            self.level += 1;
            self.spawn_wave(ctx);
            ctx.play(Cue::LevelUp);
        }
    }
}

impl Model for AsteroidsModel {
    fn init(&mut self, ctx: &mut Context) {
        ctx.rand.srand_now();
        ctx.phase = Phase::Ready;
        ctx.input_events.clear();
        self.reset(ctx);
    }

    fn handle_input(&mut self, ctx: &mut Context, _dt: f32) {
        let es = ctx.input_events.clone();
        for e in &es {
            let Event::Key(key) = e;
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match ctx.phase {
                Phase::Ready => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        ctx.phase_event(PhaseEvent::Start);
                    }
                }
                Phase::Playing => match key.code {
                    KeyCode::Char(' ') => self.fire(ctx),
                    KeyCode::Char('p') => ctx.phase_event(PhaseEvent::PauseToggle),
                    _ => {}
                },
                Phase::Paused => {
                    if key.code == KeyCode::Char('p') {
                        ctx.phase_event(PhaseEvent::PauseToggle);
                    }
                }
                Phase::Over | Phase::Win => {
                    if key.code == KeyCode::Char('r') {
                        self.reset(ctx);
                        ctx.phase_event(PhaseEvent::Restart);
                    }
                }
            }
        }
    }

    fn handle_auto(&mut self, ctx: &mut Context, dt: f32) {
        self.step(ctx, dt);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> (Context, AsteroidsModel) {
        let mut ctx = Context::new("asteroids-test");
        ctx.phase = Phase::Playing;
        let mut m = AsteroidsModel::new();
        m.reset(&mut ctx);
        (ctx, m)
    }

    #[test]
    fn resting_ship_stays_put() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.lives = 3;
        let (x, y) = (m.ship.x, m.ship.y);
        for _ in 0..50 {
            // wave respawn may repopulate rocks; keep them away
            m.rocks.clear();
            m.step(&mut ctx, 0.016);
        }
        assert_eq!((m.ship.x, m.ship.y), (x, y));
        assert_eq!((m.ship.vx, m.ship.vy), (0.0, 0.0));
    }

    #[test]
    fn toroidal_wrap_reenters_opposite_edge() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.ship.invuln = 100.0;
        m.ship.x = FIELD_W - 0.1;
        m.ship.vx = 10.0;
        m.step(&mut ctx, 0.1);
        assert!(m.ship.x < FIELD_W / 2.0);
    }

    #[test]
    fn large_rock_splits_into_two_mediums_at_parent_position() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        let id = m.rocks.create(0, &[20.0, 10.0, 1.0, 0.0]);
        let points = destroy_rock(&mut m.rocks, id, &mut ctx.rand);
        assert_eq!(points, ROCK_POINTS[0]);
        let children: Vec<_> = m.rocks.pool.iter().filter(|o| o.active).collect();
        assert_eq!(children.len(), 2);
        for c in &children {
            assert_eq!(c.obj.size, 1);
            assert_eq!((c.obj.x, c.obj.y), (20.0, 10.0));
            let speed = (c.obj.vx * c.obj.vx + c.obj.vy * c.obj.vy).sqrt();
            assert!(speed >= ROCK_SPEEDS[1] * 0.5 - 1e-3);
            assert!(speed <= ROCK_SPEEDS[1] * 1.0 + 1e-3);
        }
    }

    #[test]
    fn small_rock_leaves_no_children_and_pays_top_tier() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        let id = m.rocks.create(2, &[20.0, 10.0, 0.0, 0.0]);
        let points = destroy_rock(&mut m.rocks, id, &mut ctx.rand);
        assert_eq!(points, ROCK_POINTS[2]);
        assert_eq!(m.rocks.count_active(), 0);
        assert!(ROCK_POINTS[2] > ROCK_POINTS[0]);
    }

    #[test]
    fn shots_expire_by_lifetime() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.ship.invuln = 100.0;
        m.fire(&mut ctx);
        assert_eq!(m.shots.len(), 1);
        for _ in 0..100 {
            m.rocks.clear();
            m.step(&mut ctx, 0.016);
        }
        assert!(m.shots.is_empty());
    }

    #[test]
    fn shot_cap_holds() {
        let (mut ctx, mut m) = playing();
        for _ in 0..10 {
            m.fire(&mut ctx);
        }
        assert_eq!(m.shots.len(), MAX_SHOTS);
    }

    #[test]
    fn collision_costs_a_life_and_grants_grace() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.rocks.create(0, &[0.0, 0.0, 0.0, 0.0]);
        m.ship.x = 1.0;
        m.ship.y = 0.0;
        m.ship.invuln = 0.0;
        m.collide_ship(&mut ctx);
        assert_eq!(m.lives, 2);
        assert!(m.ship.invuln > 0.0);
        // grace window: the same overlap does not kill again
        m.ship.x = 1.0;
        m.ship.y = 0.0;
        m.collide_ship(&mut ctx);
        assert_eq!(m.lives, 2);
    }

    #[test]
    fn last_life_is_terminal() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.rocks.create(0, &[m.ship.x, m.ship.y, 0.0, 0.0]);
        m.lives = 1;
        m.ship.invuln = 0.0;
        m.collide_ship(&mut ctx);
        assert_eq!(ctx.phase, Phase::Over);
    }

    #[test]
    fn cleared_field_starts_the_next_wave() {
        let (mut ctx, mut m) = playing();
        m.rocks.clear();
        m.ship.invuln = 100.0;
        m.step(&mut ctx, 0.016);
        assert_eq!(m.level, 2);
        assert_eq!(m.rocks.count_active(), 3 + 2);
    }
}
