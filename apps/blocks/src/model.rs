use blocks_lib::{
    drop_interval, level_for_lines, Board, Piece, LINE_SCORES, PIECE_KINDS,
};
use log::info;
use pixcade::{
    audio::Cue,
    context::Context,
    event::{event_emit, Event, KeyCode, KeyEventKind},
    game::Model,
    phase::{Phase, PhaseEvent},
    util::Cadence,
};

pub struct BlocksModel {
    pub board: Board,
    pub cur: Piece,
    pub next_kind: u8,
    pub hold_kind: Option<u8>,
    pub hold_lock: bool,
    pub shadow_y: i16,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub last_clear: u32,
    fall: Cadence,
}

impl BlocksModel {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            cur: Piece::spawn(0),
            next_kind: 0,
            hold_kind: None,
            hold_lock: false,
            shadow_y: 0,
            score: 0,
            lines: 0,
            level: 1,
            last_clear: 0,
            fall: Cadence::new(drop_interval(1)),
        }
    }

    fn reset(&mut self, ctx: &mut Context) {
        self.board = Board::new();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.hold_kind = None;
        self.hold_lock = false;
        self.last_clear = 0;
        self.fall = Cadence::new(drop_interval(1));
        self.cur = Piece::spawn(self.random_kind(ctx));
        self.next_kind = self.random_kind(ctx);
        self.refresh_shadow();
        event_emit("Blocks.RedrawGrid");
    }

    fn random_kind(&mut self, ctx: &mut Context) -> u8 {
        ctx.rand.pick(PIECE_KINDS) as u8
    }

    fn refresh_shadow(&mut self) {
        self.shadow_y = self.board.shadow_y(&self.cur);
    }

    fn spawn_next(&mut self, ctx: &mut Context) {
        self.cur = Piece::spawn(self.next_kind);
        self.next_kind = self.random_kind(ctx);
        self.hold_lock = false;
        self.refresh_shadow();
        if !self.board.can_place(&self.cur.pat, self.cur.x, self.cur.y) {
            info!("board topped out, score {}", self.score);
            ctx.phase_event(PhaseEvent::Lose);
            ctx.play(Cue::GameOver);
        }
    }

    fn shift(&mut self, ctx: &mut Context, dx: i16) {
        if self
            .board
            .can_place(&self.cur.pat, self.cur.x + dx, self.cur.y)
        {
            self.cur.x += dx;
            self.refresh_shadow();
            ctx.play(Cue::Move);
            event_emit("Blocks.RedrawGrid");
        }
    }

    fn rotate(&mut self, ctx: &mut Context, cw: bool) {
        if let Some(p) = self.board.try_rotate(&self.cur, cw) {
            self.cur = p;
            self.refresh_shadow();
            ctx.play(Cue::Rotate);
            event_emit("Blocks.RedrawGrid");
        }
    }

    /// one gravity step; locks when the piece can not fall further
    fn step_down(&mut self, ctx: &mut Context) {
        if self
            .board
            .can_place(&self.cur.pat, self.cur.x, self.cur.y + 1)
        {
            self.cur.y += 1;
            event_emit("Blocks.RedrawGrid");
        } else {
            self.lock_piece(ctx);
        }
    }

    fn hard_drop(&mut self, ctx: &mut Context) {
        self.cur.y = self.shadow_y;
        self.lock_piece(ctx);
    }

    fn lock_piece(&mut self, ctx: &mut Context) {
        self.board.lock(&self.cur);
        let cleared = self.board.clear_full_rows();
        self.last_clear = cleared;
        if cleared > 0 {
            self.score += LINE_SCORES[cleared as usize] * self.level as u64;
            self.lines += cleared;
            self.level = level_for_lines(self.lines);
            self.fall.set_interval(drop_interval(self.level));
            ctx.play(Cue::LineClear);
            event_emit("Blocks.LineClear");
        } else {
            ctx.play(Cue::Drop);
        }
        self.fall.reset();
        self.spawn_next(ctx);
        event_emit("Blocks.RedrawGrid");
    }

    fn hold(&mut self, ctx: &mut Context) {
        if self.hold_lock {
            return;
        }
        self.hold_lock = true;
        match self.hold_kind {
            Some(k) => {
                self.hold_kind = Some(self.cur.kind);
                self.cur = Piece::spawn(k);
                self.refresh_shadow();
            }
            None => {
                self.hold_kind = Some(self.cur.kind);
                self.spawn_next(ctx);
                // spawn_next unlocks; a swap is spent until the next lock
                self.hold_lock = true;
            }
        }
        event_emit("Blocks.RedrawGrid");
    }
}

impl Model for BlocksModel {
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
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let repeat = key.kind == KeyEventKind::Repeat;
            match ctx.phase {
                Phase::Ready => {
                    if !repeat
                        && matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter)
                    {
                        ctx.phase_event(PhaseEvent::Start);
                    }
                }
                Phase::Playing => match key.code {
                    KeyCode::Left | KeyCode::Char('a') => self.shift(ctx, -1),
                    KeyCode::Right | KeyCode::Char('d') => self.shift(ctx, 1),
                    KeyCode::Down | KeyCode::Char('s') => self.step_down(ctx),
                    KeyCode::Up | KeyCode::Char('w') if !repeat => self.rotate(ctx, true),
                    KeyCode::Char('z') if !repeat => self.rotate(ctx, false),
                    KeyCode::Char(' ') if !repeat => self.hard_drop(ctx),
                    KeyCode::Char('c') if !repeat => self.hold(ctx),
                    KeyCode::Char('p') if !repeat => ctx.phase_event(PhaseEvent::PauseToggle),
                    _ => {}
                },
                Phase::Paused => {
                    if !repeat && key.code == KeyCode::Char('p') {
                        ctx.phase_event(PhaseEvent::PauseToggle);
                    }
                }
                Phase::Over | Phase::Win => {
                    if !repeat && key.code == KeyCode::Char('r') {
                        self.reset(ctx);
                        ctx.phase_event(PhaseEvent::Restart);
                    }
                }
            }
        }
    }

    fn handle_auto(&mut self, ctx: &mut Context, dt: f32) {
        if self.fall.tick(dt) {
            self.step_down(ctx);
        }
    }

    fn handle_event(&mut self, _ctx: &mut Context, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks_lib::BOARD_H;

    fn playing_ctx() -> Context {
        let mut ctx = Context::new("blocks-test");
        ctx.phase = Phase::Playing;
        ctx
    }

    #[test]
    fn o_piece_gravity_run_locks_on_floor_without_score() {
        let mut ctx = playing_ctx();
        let mut m = BlocksModel::new();
        m.reset(&mut ctx);
        m.cur = Piece::spawn(1);
        m.next_kind = 2;
        m.refresh_shadow();
        // gravity until the piece locks
        while m.board.cells.iter().flatten().all(|&c| c == 0) {
            m.step_down(&mut ctx);
        }
        // locked at the floor: bottom two rows, columns 4-5
        for y in [BOARD_H - 2, BOARD_H - 1] {
            for x in [4usize, 5] {
                assert_ne!(m.board.cells[y][x], 0);
            }
        }
        assert_eq!(m.score, 0);
        // the next piece is live again at the top
        assert_eq!(m.cur.y, 0);
    }

    #[test]
    fn line_clear_scores_by_level_table() {
        let mut ctx = playing_ctx();
        let mut m = BlocksModel::new();
        m.reset(&mut ctx);
        // bottom row one O-gap away from full at columns 4-5
        for x in 0..10 {
            if x != 4 && x != 5 {
                m.board.cells[BOARD_H - 1][x] = 1;
                m.board.cells[BOARD_H - 2][x] = 1;
            }
        }
        m.cur = Piece::spawn(1);
        m.refresh_shadow();
        m.hard_drop(&mut ctx);
        assert_eq!(m.last_clear, 2);
        assert_eq!(m.score, LINE_SCORES[2]);
        assert_eq!(m.lines, 2);
    }

    #[test]
    fn hold_swaps_once_per_drop() {
        let mut ctx = playing_ctx();
        let mut m = BlocksModel::new();
        m.reset(&mut ctx);
        let first = m.cur.kind;
        m.hold(&mut ctx);
        assert_eq!(m.hold_kind, Some(first));
        let second = m.cur.kind;
        // a second hold before locking is rejected
        m.hold(&mut ctx);
        assert_eq!(m.cur.kind, second);
        assert_eq!(m.hold_kind, Some(first));
    }

    #[test]
    fn top_out_is_terminal() {
        let mut ctx = playing_ctx();
        let mut m = BlocksModel::new();
        m.reset(&mut ctx);
        for y in 0..4 {
            for x in 0..10 {
                m.board.cells[y][x] = 1;
            }
        }
        m.next_kind = 2;
        m.spawn_next(&mut ctx);
        assert_eq!(ctx.phase, Phase::Over);
    }
}
