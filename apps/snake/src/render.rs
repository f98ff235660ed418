use crate::model::{SnakeModel, SEED_MARK, SNAKE_H, SNAKE_W};
use pixcade::{
    context::Context,
    event::event_check,
    event::event_register,
    game::Render,
    phase::Phase,
    render::panel::Panel,
    render::sprite::{Sprite, TextAlign},
    render::style::Color,
};

const SEED_COLORS: [Color; 6] = [
    Color::LightRed,
    Color::LightYellow,
    Color::LightGreen,
    Color::LightCyan,
    Color::LightBlue,
    Color::LightMagenta,
];

const SCREEN_W: u16 = SNAKE_W as u16 + 2;
const SCREEN_H: u16 = SNAKE_H as u16 + 3;

pub struct SnakeRender {
    pub panel: Panel,
}

impl SnakeRender {
    pub fn new() -> Self {
        let mut t = Panel::new();

        let mut border = Sprite::new(0, 0, SCREEN_W, SNAKE_H as u16 + 2);
        border.draw_border(Color::DarkGray);
        border.set_color_str(1, 0, "SNAKE", Color::Indexed(222), Color::Reset);
        t.add_sprite(border, "BORDER");
        t.add_sprite(Sprite::new(1, 1, SNAKE_W as u16, SNAKE_H as u16), "GRID");
        t.add_sprite(Sprite::new(0, SCREEN_H - 1, SCREEN_W, 1), "MSG");

        event_register("Snake.RedrawGrid", "draw_grid");

        Self { panel: t }
    }

    pub fn draw_grid(&mut self, ctx: &mut Context, d: &mut SnakeModel) {
        let l = self.panel.get_sprite("GRID");
        l.clear();
        for y in 0..SNAKE_H {
            for x in 0..SNAKE_W {
                match d.grid[y][x] {
                    0 => {}
                    1 => {
                        l.set_char(x as u16, y as u16, '▓', Color::LightGreen, Color::Reset);
                    }
                    SEED_MARK => {
                        let c = SEED_COLORS[(ctx.stage / 5) as usize % SEED_COLORS.len()];
                        l.set_char(x as u16, y as u16, '∙', c, Color::Reset);
                    }
                    _ => {
                        l.set_char(x as u16, y as u16, '▒', Color::Green, Color::Reset);
                    }
                }
            }
        }
    }

    fn draw_msg(&mut self, ctx: &mut Context, d: &mut SnakeModel) {
        let l = self.panel.get_sprite("MSG");
        l.clear();
        l.set_color_str(
            0,
            0,
            &format!("score {}  best {}", d.score, d.best),
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

impl Render for SnakeRender {
    type Model = SnakeModel;

    fn init(&mut self, ctx: &mut Context, data: &mut Self::Model) {
        if let Err(e) = ctx.adapter.init(SCREEN_W, SCREEN_H, "snake") {
            log::warn!("adapter init failed: {}", e);
        }
        self.panel.init(ctx);
        self.draw_grid(ctx, data);
    }

    fn handle_event(&mut self, ctx: &mut Context, data: &mut Self::Model, _dt: f32) {
        if event_check("Snake.RedrawGrid", "draw_grid") {
            self.draw_grid(ctx, data);
        }
    }

    fn handle_timer(&mut self, _ctx: &mut Context, _model: &mut Self::Model, _dt: f32) {}

    fn draw(&mut self, ctx: &mut Context, model: &mut Self::Model, _dt: f32) {
        // the seed pulses every frame even when the grid is unchanged
        self.draw_grid(ctx, model);
        self.draw_msg(ctx, model);
        self.panel.draw(ctx).unwrap();
    }
}
