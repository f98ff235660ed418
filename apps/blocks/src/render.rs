use crate::model::BlocksModel;
use blocks_lib::{BOARD_H, BOARD_W};
use pixcade::{
    context::Context,
    event::{event_check, event_register, timer_fire, timer_register, timer_stage},
    game::Render,
    phase::Phase,
    render::panel::Panel,
    render::sprite::{Sprite, TextAlign},
    render::style::Color,
};

const PIECE_COLORS: [Color; 8] = [
    Color::Reset,
    Color::LightCyan,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightGreen,
    Color::LightRed,
    Color::LightBlue,
    Color::Yellow,
];

const SIDE_W: u16 = 14;
const SCREEN_W: u16 = BOARD_W as u16 + SIDE_W + 3;
const SCREEN_H: u16 = BOARD_H as u16 + 3;

pub struct BlocksRender {
    pub panel: Panel,
}

impl BlocksRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, BOARD_W as u16 + 2, BOARD_H as u16 + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "BLOCKS", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");
        t.add_sprite(
            Sprite::new(1, 1, BOARD_W as u16, BOARD_H as u16),
            "BOARD",
        );
        t.add_sprite(
            Sprite::new(BOARD_W as u16 + 3, 1, SIDE_W, BOARD_H as u16),
            "SIDE",
        );
        t.add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");

        event_register("Blocks.RedrawGrid", "draw_grid");
        event_register("Blocks.LineClear", "flash");
        timer_register("Blocks.Flash", 0.25, "flash_done");

        Self { panel: t }
    }

    fn draw_board(&mut self, ctx: &mut Context, d: &mut BlocksModel) {
        let flashing = timer_stage("Blocks.Flash") > 0;
        let l = self.panel.get_sprite("BOARD");
        l.clear();
        for y in 0..BOARD_H {
            for x in 0..BOARD_W {
                let v = d.board.cells[y][x];
                if v != 0 {
                    // cleared rows are already gone when this draws, so
                    // the clear feedback is a short full-stack flash
                    let color = if flashing {
                        Color::White
                    } else {
                        PIECE_COLORS[v as usize % PIECE_COLORS.len()]
                    };
                    l.set_char(x as u16, y as u16, '▇', color, Color::Reset);
                }
            }
        }
        if ctx.phase == Phase::Ready {
            return;
        }
        // ghost projection first so the live piece draws over it
        for (c, r) in d.cur.pat.cells_iter() {
            let gx = d.cur.x + c as i16;
            let gy = d.shadow_y + r as i16;
            if gx >= 0 && gy >= 0 {
                l.set_char(gx as u16, gy as u16, '░', Color::DarkGray, Color::Reset);
            }
        }
        for (c, r) in d.cur.pat.cells_iter() {
            let px = d.cur.x + c as i16;
            let py = d.cur.y + r as i16;
            if px >= 0 && py >= 0 {
                l.set_char(
                    px as u16,
                    py as u16,
                    '▇',
                    PIECE_COLORS[d.cur.color() as usize % PIECE_COLORS.len()],
                    Color::Reset,
                );
            }
        }
    }

    fn draw_side(&mut self, d: &mut BlocksModel) {
        let l = self.panel.get_sprite("SIDE");
        l.clear();
        l.set_color_str(0, 0, &format!("score {}", d.score), Color::White, Color::Reset);
        l.set_color_str(0, 1, &format!("lines {}", d.lines), Color::Gray, Color::Reset);
        l.set_color_str(0, 2, &format!("level {}", d.level), Color::Gray, Color::Reset);
        l.set_color_str(0, 4, "next", Color::Gray, Color::Reset);
        let next = blocks_lib::piece::pattern_of(d.next_kind);
        for (c, r) in next.cells_iter() {
            l.set_char(
                (1 + c) as u16,
                (5 + r) as u16,
                '▇',
                PIECE_COLORS[(d.next_kind + 1) as usize % PIECE_COLORS.len()],
                Color::Reset,
            );
        }
        l.set_color_str(0, 9, "hold", Color::Gray, Color::Reset);
        if let Some(k) = d.hold_kind {
            let hold = blocks_lib::piece::pattern_of(k);
            for (c, r) in hold.cells_iter() {
                l.set_char(
                    (1 + c) as u16,
                    (10 + r) as u16,
                    '▇',
                    PIECE_COLORS[(k + 1) as usize % PIECE_COLORS.len()],
                    Color::Reset,
                );
            }
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context) {
        let l = self.panel.get_sprite("MSG");
        l.clear();
        let (text, color) = match ctx.phase {
            Phase::Ready => ("press space to start", Color::LightGreen),
            Phase::Playing => ("p pause  q quit", Color::DarkGray),
            Phase::Paused => ("PAUSED - p resumes", Color::LightYellow),
            Phase::Over => ("GAME OVER - r restarts", Color::LightRed),
            Phase::Win => ("YOU WIN - r restarts", Color::LightGreen),
        };
        l.draw_text(0, text, TextAlign::Center, color, Color::Reset);
    }
}

impl Render for BlocksRender {
    type Model = BlocksModel;

    fn init(&mut self, ctx: &mut Context, _data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "blocks") {
            log::warn!("adapter init failed: {}", e);
        }
        self.panel.init(ctx);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _data: &mut Self::Model, _dt: f32) {
        if event_check("Blocks.LineClear", "flash") {
            timer_fire("Blocks.Flash", 0u8);
        }
    }

    fn handle_timer(&mut self, _ctx: &mut Context, _model: &mut Self::Model, _dt: f32) {
        // flash simply expires; nothing to do on the edge
        event_check("Blocks.Flash", "flash_done");
    }

    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, _dt: f32) {
        self.draw_board(ctx, model);
        self.draw_side(model);
        self.draw_msg(ctx);
        self.panel.draw(ctx).unwrap();
    }
}
