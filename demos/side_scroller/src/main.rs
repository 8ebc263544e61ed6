use anyhow::{Context, Result};
use brickrun::render::Color;
use brickrun::ui::LabelValues;
use brickrun::{
    DrawList, Engine, EngineContext, Game, GameConfig, GameEvent, GameState, InputMap, TextRasterizer, UiEvent,
    UiLayer, UiLayout,
};

const BACKGROUND: Color = [0.05, 0.06, 0.12, 1.0];
const TITLE_WIDGETS: [&str; 3] = ["start", "quit", "name"];
const PLAYING_WIDGETS: [&str; 1] = ["score"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Menu up, simulation paused.
    Title,
    Playing,
}

struct SideScroller {
    game: GameState,
    ui: UiLayer,
    input_map: InputMap,
    phase: Phase,
    player_name: Option<String>,
    font: Option<TextRasterizer>,
    draw_list: DrawList,
}

impl SideScroller {
    fn new(game: GameState, ui: UiLayer, font: Option<TextRasterizer>) -> Self {
        let mut app = Self {
            game,
            ui,
            input_map: InputMap::default(),
            phase: Phase::Title,
            player_name: None,
            font,
            draw_list: DrawList::new(),
        };
        app.enter(Phase::Title);
        app
    }

    fn enter(&mut self, phase: Phase) {
        let title = phase == Phase::Title;
        for id in TITLE_WIDGETS {
            self.ui.set_visible(id, title);
        }
        for id in PLAYING_WIDGETS {
            self.ui.set_visible(id, !title);
        }
        self.phase = phase;
        log::info!("Phase: {:?}", phase);
    }

    fn handle_ui_event(&mut self, event: UiEvent, ctx: &mut EngineContext<'_>) {
        match event {
            UiEvent::ButtonClicked { id } if id == "start" => self.enter(Phase::Playing),
            UiEvent::ButtonClicked { id } if id == "quit" => {
                log::info!("Quit requested");
                ctx.request_exit();
            }
            UiEvent::TextChanged { id, text } => log::debug!("{id}: {text:?}"),
            other => match committed_name(&other) {
                Some(name) => {
                    log::info!("Player name set to {:?}", name);
                    self.player_name = Some(name.to_owned());
                }
                None => log::debug!("Unhandled UI event {:?}", other),
            },
        }
    }

    fn handle_game_event(&self, event: GameEvent) {
        match event {
            GameEvent::PlayerDied { cause } => {
                let name = self.player_name.as_deref().unwrap_or("Player");
                log::info!("{name} died ({cause:?}), score {}", self.game.player().score);
            }
            GameEvent::ScoreChanged(score) => log::debug!("Score: {score}"),
            other => log::trace!("{:?}", other),
        }
    }
}

/// The name field commits on Enter and when it loses focus.
fn committed_name(event: &UiEvent) -> Option<&str> {
    match event {
        UiEvent::Submitted { id, text } | UiEvent::Unfocused { id, text } if id == "name" => Some(text.as_str()),
        _ => None,
    }
}

impl Game for SideScroller {
    fn init(&mut self, ctx: &mut EngineContext<'_>) -> Result<()> {
        if let Some(font) = self.font.take() {
            ctx.renderer().set_font(font);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext<'_>) -> Result<()> {
        let dt = ctx.delta_time().as_secs_f64();

        self.ui.handle_input(ctx.input());
        for event in self.ui.drain_events() {
            self.handle_ui_event(event, ctx);
        }

        if self.phase == Phase::Playing {
            let frame = if self.ui.has_focus() {
                Default::default()
            } else {
                self.input_map.frame_input(ctx.input())
            };
            self.game.step(dt, &frame);
            for event in self.game.drain_events() {
                self.handle_game_event(event);
            }
        }

        let values = LabelValues {
            fps: ctx.fps(),
            score: self.game.player().score,
        };
        self.ui.update(dt, &values);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut EngineContext<'_>) -> Result<()> {
        self.draw_list.clear();
        self.game.draw(&mut self.draw_list);
        self.ui.draw(&mut self.draw_list);
        ctx.renderer().render(&self.draw_list, BACKGROUND)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = GameConfig::default_path();
    let config = GameConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let game = GameState::load(config.clone())
        .with_context(|| format!("Failed to load level {}", config.level.map_path.display()))?;

    let layout = match &config.ui.layout_path {
        Some(path) => UiLayout::load_or_default(path)
            .with_context(|| format!("Failed to load UI layout {}", path.display()))?,
        None => UiLayout::default(),
    };

    let font = match &config.ui.font_path {
        Some(path) => match TextRasterizer::load(path) {
            Ok(font) => Some(font),
            Err(err) => {
                log::warn!("{err:#}; text will not be drawn");
                None
            }
        },
        None => {
            log::warn!("No font configured; text will not be drawn");
            None
        }
    };

    let app = SideScroller::new(game, UiLayer::new(layout), font);
    Engine::new(config.window.clone().into()).run(app)
}
