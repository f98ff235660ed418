use log::{debug, info};
use pixcade::{
    audio::Cue,
    context::Context,
    event::{event_emit, Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    score::ScoreStore,
    util::{Cadence, Dir, PointU16},
};

pub const SNAKE_W: usize = 40;
pub const SNAKE_H: usize = 20;

/// grid marker for the seed; body cells hold their 1-based segment index
pub const SEED_MARK: i16 = 10000;

/// step interval shrinks as the snake grows
pub fn step_interval(len: usize) -> f32 {
    (0.4 - 0.005 * len as f32).max(0.08)
}

pub struct SnakeModel {
    pub grid: [[i16; SNAKE_W]; SNAKE_H],
    pub body: Vec<PointU16>,
    pub dir: Dir,
    pub seed: PointU16,
    pub score: u64,
    pub best: u64,
    pub store: ScoreStore,
    step: Cadence,
}

impl SnakeModel {
    pub fn new() -> Self {
        let store = ScoreStore::new("snake");
        Self {
            grid: [[0; SNAKE_W]; SNAKE_H],
            body: vec![],
            dir: Dir::Down,
            seed: PointU16::default(),
            score: 0,
            best: store.load(),
            store,
            step: Cadence::new(step_interval(1)),
        }
    }

    fn reset(&mut self, ctx: &mut Context) {
        self.body.clear();
        self.body.push(PointU16 {
            x: SNAKE_W as u16 / 2,
            y: SNAKE_H as u16 / 2,
        });
        self.dir = Dir::Down;
        self.score = 0;
        self.step = Cadence::new(step_interval(1));
        self.place_seed(ctx);
        self.make_grid();
        event_emit("Snake.RedrawGrid");
    }

    pub fn make_grid(&mut self) {
        self.grid = [[0; SNAKE_W]; SNAKE_H];
        for (i, p) in self.body.iter().enumerate() {
            self.grid[p.y as usize][p.x as usize] = (i + 1) as i16;
        }
        self.grid[self.seed.y as usize][self.seed.x as usize] = SEED_MARK;
    }

    /// drop the seed on a free cell: random probes first, scan fallback
    fn place_seed(&mut self, ctx: &mut Context) {
        for i in 0..888 {
            let nx = ctx.rand.pick(SNAKE_W) as u16;
            let ny = ctx.rand.pick(SNAKE_H) as u16;
            if !self.body.iter().any(|p| p.x == nx && p.y == ny) {
                self.seed = PointU16 { x: nx, y: ny };
                debug!("seed at {:?} after {} probes", self.seed, i);
                return;
            }
        }
        for y in 0..SNAKE_H as u16 {
            for x in 0..SNAKE_W as u16 {
                if !self.body.iter().any(|p| p.x == x && p.y == y) {
                    self.seed = PointU16 { x, y };
                    return;
                }
            }
        }
    }

    fn game_over(&mut self, ctx: &mut Context) {
        info!("snake dead, score {}", self.score);
        ctx.phase_event(PhaseEvent::Lose);
        ctx.play(Cue::GameOver);
        // the persisted scalar is written only when beaten, only here
        if self.store.record_if_best(self.score) {
            self.best = self.score;
        }
    }

    /// one move in direction d; both key presses and the cadence land here
    pub fn act(&mut self, d: Dir, ctx: &mut Context) {
        // reversing into the neck is ignored, not fatal
        if self.body.len() > 1 && d == self.dir.opposite() {
            return;
        }
        let (dx, dy) = d.delta();
        let cx = self.body[0].x as i16 + dx;
        let cy = self.body[0].y as i16 + dy;
        if cx < 0 || cx >= SNAKE_W as i16 || cy < 0 || cy >= SNAKE_H as i16 {
            self.game_over(ctx);
            event_emit("Snake.RedrawGrid");
            return;
        }
        let cell = self.grid[cy as usize][cx as usize];
        let ate = cell == SEED_MARK;
        if !ate {
            // the tail cell is vacated this same step, so stepping onto
            // it is legal: only a body index other than the tail kills
            if cell != 0 && cell != self.body.len() as i16 {
                self.game_over(ctx);
                event_emit("Snake.RedrawGrid");
                return;
            }
            self.body.pop();
        }
        self.body.insert(
            0,
            PointU16 {
                x: cx as u16,
                y: cy as u16,
            },
        );
        self.dir = d;
        if ate {
            // grow: the tail stayed, the seed moves to a free cell
            self.score += 10;
            ctx.play(Cue::Bonus);
            self.place_seed(ctx);
            self.step.set_interval(step_interval(self.body.len()));
        }
        self.make_grid();
        event_emit("Snake.RedrawGrid");
    }
}

impl Model for SnakeModel {
    fn init(&mut self, ctx: &mut Context) {
        ctx.rand.srand_now();
        ctx.phase = Phase::Ready;
        ctx.input_events.clear();
        // the config may point the persisted scalar somewhere else
        if let Some(dir) = &ctx.config.data_dir {
            self.store = ScoreStore::with_dir(dir.clone(), "snake");
            self.best = self.store.load();
        }
        self.reset(ctx);
    }

    fn handle_input(&mut self, ctx: &mut Context, _dt: f32) {
        let es = ctx.input_events.clone();
        for e in &es {
            let Event::Key(key) = e;
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match ctx.phase {
                Phase::Ready => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        ctx.phase_event(PhaseEvent::Start);
                    }
                }
                Phase::Playing => {
                    let d = match key.code {
                        KeyCode::Up | KeyCode::Char('w') => Some(Dir::Up),
                        KeyCode::Left | KeyCode::Char('a') => Some(Dir::Left),
                        KeyCode::Down | KeyCode::Char('s') => Some(Dir::Down),
                        KeyCode::Right | KeyCode::Char('d') => Some(Dir::Right),
                        _ => None,
                    };
                    if let Some(d) = d {
                        self.act(d, ctx);
                        self.step.reset();
                    } else if key.code == KeyCode::Char('p')
                        && key.kind == KeyEventKind::Press
                    {
                        ctx.phase_event(PhaseEvent::PauseToggle);
                    }
                }
                Phase::Paused => {
                    if key.code == KeyCode::Char('p') && key.kind == KeyEventKind::Press {
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
        if self.step.tick(dt) {
            self.act(self.dir, ctx);
        }
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, path::PathBuf};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("pixcade-snake-{}", tag));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn playing(tag: &str) -> (Context, SnakeModel) {
        let mut ctx = Context::new("snake-test");
        let mut m = SnakeModel::new();
        m.store = ScoreStore::with_dir(temp_dir(tag), "snake");
        m.best = 0;
        m.reset(&mut ctx);
        ctx.phase = Phase::Playing;
        (ctx, m)
    }

    #[test]
    fn eating_the_seed_grows_and_scores() {
        let (mut ctx, mut m) = playing("grow");
        let head = m.body[0];
        m.seed = PointU16 { x: head.x, y: head.y + 1 };
        m.make_grid();
        let len = m.body.len();
        m.act(Dir::Down, &mut ctx);
        assert_eq!(m.body.len(), len + 1);
        assert_eq!(m.score, 10);
        assert!(step_interval(m.body.len()) <= step_interval(1));
    }

    #[test]
    fn border_exit_is_terminal_and_persists_best() {
        let (mut ctx, mut m) = playing("border");
        m.score = 70;
        m.body = vec![PointU16 { x: 0, y: 5 }];
        m.make_grid();
        m.act(Dir::Left, &mut ctx);
        assert_eq!(ctx.phase, Phase::Over);
        assert_eq!(m.best, 70);
        assert_eq!(m.store.load(), 70);
    }

    #[test]
    fn lower_score_never_overwrites_best() {
        let (mut ctx, mut m) = playing("lowscore");
        m.store.store(100);
        m.best = 100;
        m.score = 30;
        m.body = vec![PointU16 { x: 0, y: 5 }];
        m.make_grid();
        m.act(Dir::Left, &mut ctx);
        assert_eq!(m.best, 100);
        assert_eq!(m.store.load(), 100);
    }

    #[test]
    fn biting_the_body_is_terminal() {
        let (mut ctx, mut m) = playing("bite");
        // a hook: head at (10,10), body trailing right then down
        m.body = vec![
            PointU16 { x: 10, y: 10 },
            PointU16 { x: 11, y: 10 },
            PointU16 { x: 11, y: 11 },
            PointU16 { x: 10, y: 11 },
            PointU16 { x: 9, y: 11 },
        ];
        m.seed = PointU16 { x: 0, y: 0 };
        m.dir = Dir::Left;
        m.make_grid();
        // moving down lands on (10,11), a mid-body segment
        m.act(Dir::Down, &mut ctx);
        assert_eq!(ctx.phase, Phase::Over);
    }

    #[test]
    fn reversal_is_ignored() {
        let (mut ctx, mut m) = playing("reverse");
        m.body = vec![PointU16 { x: 10, y: 10 }, PointU16 { x: 9, y: 10 }];
        m.dir = Dir::Right;
        m.seed = PointU16 { x: 0, y: 0 };
        m.make_grid();
        m.act(Dir::Left, &mut ctx);
        assert_eq!(m.body[0], PointU16 { x: 10, y: 10 });
        assert_eq!(ctx.phase, Phase::Playing);
    }

    #[test]
    fn stepping_onto_the_vacating_tail_is_legal() {
        let (mut ctx, mut m) = playing("tail");
        // a 2x2 loop: head chases its own tail cell
        m.body = vec![
            PointU16 { x: 10, y: 10 },
            PointU16 { x: 11, y: 10 },
            PointU16 { x: 11, y: 11 },
            PointU16 { x: 10, y: 11 },
        ];
        m.dir = Dir::Left;
        m.seed = PointU16 { x: 0, y: 0 };
        m.make_grid();
        m.act(Dir::Down, &mut ctx);
        assert_eq!(ctx.phase, Phase::Playing);
        assert_eq!(m.body[0], PointU16 { x: 10, y: 11 });
    }
}
