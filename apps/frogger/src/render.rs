use crate::model::{
    FroggerModel, LaneKind, FIELD_H, FIELD_W, GOAL_XS, MEDIAN_ROW, START_ROW,
};
use pixcade::{
    context::Context,
    game::Render,
    phase::Phase,
    render::panel::Panel,
    render::sprite::{Sprite, TextAlign},
    render::style::Color,
};

const SCREEN_W: u16 = FIELD_W as u16 + 2;
const SCREEN_H: u16 = FIELD_H + 3;

pub struct FroggerRender {
    pub panel: Panel,
}

impl FroggerRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, SCREEN_W, FIELD_H + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "FROGGER", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");
        t.add_sprite(Sprite::new(1, 1, FIELD_W as u16, FIELD_H), "FIELD");
        t.add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");

        Self { panel: t }
    }

    fn draw_field(&mut self, ctx: &mut Context, d: &mut FroggerModel) {
        let l = self.panel.get_sprite("FIELD");
        l.clear();

        // water backdrop and safe strips
        for y in 1..MEDIAN_ROW {
            l.draw_rect(0, y, FIELD_W as u16, 1, '~', Color::Blue, Color::Reset);
        }
        l.draw_rect(0, MEDIAN_ROW, FIELD_W as u16, 1, '·', Color::DarkGray, Color::Reset);
        l.draw_rect(0, START_ROW, FIELD_W as u16, 1, '·', Color::DarkGray, Color::Reset);

        // goal slots
        for (i, gx) in GOAL_XS.iter().enumerate() {
            let color = if d.goals[i] {
                Color::LightGreen
            } else {
                Color::DarkGray
            };
            let glyph = if d.goals[i] { "◊◊◊" } else { "___" };
            l.set_color_str(*gx as u16, 0, glyph, color, Color::Reset);
        }

        for lane in &d.lanes {
            let (glyph, color) = match lane.kind {
                LaneKind::Road => ('■', Color::LightRed),
                LaneKind::River => ('▬', Color::Yellow),
            };
            for &x in &lane.xs {
                for i in 0..lane.len as u16 {
                    let cx = x as i32 + i as i32;
                    if cx >= 0 {
                        l.set_char(cx as u16, lane.y, glyph, color, Color::Reset);
                    }
                }
            }
        }

        if ctx.phase != Phase::Ready {
            l.set_char(
                d.frog_x as u16,
                d.frog_y,
                '&',
                Color::LightGreen,
                Color::Reset,
            );
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context, d: &mut FroggerModel) {
        let l = self.panel.get_sprite("MSG");
        l.clear();
        l.set_color_str(
            0,
            0,
            &format!(
                "score {}  lives {}  level {}  time {:>2}",
                d.score, d.lives, d.level, d.time_left as u32
            ),
            Color::White,
            Color::Reset,
        );
        let (text, color) = match ctx.phase {
            Phase::Ready => ("space starts", Color::LightGreen),
            Phase::Playing => ("", Color::Reset),
            Phase::Paused => ("PAUSED", Color::LightYellow),
            Phase::Over => ("GAME OVER - r restarts", Color::LightRed),
            Phase::Win => ("", Color::Reset),
        };
        if !text.is_empty() {
            l.draw_text(0, text, TextAlign::Right, color, Color::Reset);
        }
    }
}

impl Render for FroggerRender {
    type Model = FroggerModel;

    fn init(&mut self, ctx: &mut Context, _data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "frogger") {
            log::warn!("adapter init failed: {}", e);
        }
        self.panel.init(ctx);
    }

    fn handle_event(&mut self, _ctx: &mut Context, _data: &mut Self::Model, _dt: f32) {}
    fn handle_timer(&mut self, _ctx: &mut Context, _model: &mut Self::Model, _dt: f32) {}

    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, _dt: f32) {
        self.draw_field(ctx, model);
        self.draw_msg(ctx, model);
        self.panel.draw(ctx).unwrap();
    }
}
