//! Gameplay state for one level and its per-frame step.

use crate::camera::{Camera2D, CameraRig};
use crate::combat;
use crate::config::GameConfig;
use crate::effects::Effects;
use crate::entities::{AnimationState, Enemy, EnemyId, Player};
use crate::error::WorldLoadError;
use crate::events::{DeathCause, EventQueue, GameEvent};
use crate::input::FrameInput;
use crate::math::Vec2;
use crate::physics::{self, sanitize_dt};
use crate::render::{Color, DrawList, Drawable, Renderable};
use crate::world::{BlockStyle, World};

const BLOCK_Z: i32 = 0;
const ENEMY_Z: i32 = 10;
const PLAYER_Z: i32 = 20;

const BRICK_COLOR: Color = [0.62, 0.32, 0.18, 1.0];
const FLOOR_COLOR: Color = [0.25, 0.55, 0.2, 1.0];
const SPIKE_COLOR: Color = [0.85, 0.1, 0.1, 1.0];
const DECOR_COLOR: Color = [0.35, 0.35, 0.4, 1.0];
const ENEMY_COLOR: Color = [0.6, 0.2, 0.7, 1.0];

fn block_color(style: BlockStyle) -> Color {
    match style {
        BlockStyle::Brick => BRICK_COLOR,
        BlockStyle::Floor => FLOOR_COLOR,
        BlockStyle::Spikes => SPIKE_COLOR,
        BlockStyle::Decor(kind) => {
            // Vary decor slightly by type so distinct digits are visible.
            let tint = kind as f32 * 0.04;
            [DECOR_COLOR[0] + tint, DECOR_COLOR[1] + tint, DECOR_COLOR[2], 1.0]
        }
    }
}

fn player_color(animation: AnimationState) -> Color {
    match animation {
        AnimationState::Idle => [0.2, 0.45, 0.95, 1.0],
        AnimationState::Walk => [0.25, 0.55, 1.0, 1.0],
        AnimationState::Jump => [0.45, 0.7, 1.0, 1.0],
        AnimationState::Death => [0.4, 0.4, 0.4, 1.0],
    }
}

impl Renderable for Player {
    fn render(&self, list: &mut DrawList, camera: &Camera2D) {
        list.push_world(
            camera,
            &self.body.bounds(),
            PLAYER_Z,
            Drawable::ColorRect {
                color: player_color(self.animation),
            },
        );
    }
}

impl Renderable for Enemy {
    fn render(&self, list: &mut DrawList, camera: &Camera2D) {
        if !self.alive {
            return;
        }
        list.push_world(
            camera,
            &self.body.bounds(),
            ENEMY_Z,
            Drawable::ColorRect { color: ENEMY_COLOR },
        );
    }
}

/// Everything the simulation owns for one level.
pub struct GameState {
    config: GameConfig,
    world: World,
    level_spawn: Vec2,
    kill_plane: f64,
    player: Player,
    enemies: Vec<Enemy>,
    camera: CameraRig,
    events: EventQueue<GameEvent>,
    effects: Effects,
    /// Seconds left before respawning; `Some` while the player is dead.
    respawn_timer: Option<f64>,
}

impl GameState {
    pub fn new(config: GameConfig, world: World) -> Self {
        let player_size = config.level.player_size();
        let level_spawn = match world.player_spawn() {
            Some(cell) => world.spawn_position(cell, player_size),
            None => config.level.player_start(),
        };
        let kill_plane = config.kill_plane(world.pixel_height());
        let viewport = Vec2::new(config.window.width as f64, config.window.height as f64);

        let player = Player::new(level_spawn, player_size);
        let mut camera = CameraRig::new(viewport, &config.camera);
        camera.reseed(&player.body);

        let enemies = spawn_enemies(&world, config.level.enemy_size());
        log::info!(
            "Level ready: {}x{} tiles, {} blocks, {} enemies, spawn at ({}, {})",
            world.columns(),
            world.rows(),
            world.blocks().len(),
            enemies.len(),
            level_spawn.x,
            level_spawn.y
        );

        Self {
            config,
            world,
            level_spawn,
            kill_plane,
            player,
            enemies,
            camera,
            events: EventQueue::new(),
            effects: Effects::new(),
            respawn_timer: None,
        }
    }

    /// Load the map named by `config.level.map_path`.
    pub fn load(config: GameConfig) -> Result<Self, WorldLoadError> {
        let world = World::load(&config.level.map_path, config.level.tile_size)?;
        Ok(Self::new(config, world))
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Order: camera toggle, pending respawn, player physics and hazards,
    /// enemy patrols, player/enemy contacts, effects, camera update.
    pub fn step(&mut self, dt: f64, input: &FrameInput) {
        let dt = sanitize_dt(dt, self.config.physics.max_frame_time);

        if input.toggle_camera {
            let mode = self.camera.toggle(&self.player.body);
            self.events.push(GameEvent::CameraModeChanged(mode));
        }

        self.tick_respawn(dt);

        let step = physics::update_player(
            &mut self.player,
            dt,
            &input.player(),
            &self.world,
            &self.config.physics,
            self.kill_plane,
        );
        if step.jumped {
            self.events.push(GameEvent::PlayerJumped);
        }
        if let Some(hazard) = step.hazard {
            self.kill_player(hazard.into());
        }

        for enemy in &mut self.enemies {
            physics::update_enemy(enemy, dt, &self.world, &self.config.physics);
        }

        let interaction = combat::interact(
            &mut self.player,
            &mut self.enemies,
            &self.config.rules,
            self.config.physics.stomp_bounce,
        );
        for stomp in &interaction.stomps {
            let reward = self.config.rules.stomp_reward;
            self.effects.spawn_score(stomp.position, reward);
            self.events.push(GameEvent::EnemyStomped {
                enemy: stomp.enemy,
                position: stomp.position,
                reward,
            });
        }
        if !interaction.stomps.is_empty() {
            self.events.push(GameEvent::ScoreChanged(self.player.score));
        }
        if let Some(enemy) = interaction.killed_by {
            // `interact` has already put the player into the Death state.
            self.on_player_died(DeathCause::Enemy(enemy));
        }

        self.effects.update(dt);
        self.camera.update(dt, &input.camera(), &self.player.body);
    }

    fn kill_player(&mut self, cause: DeathCause) {
        if !self.player.alive {
            return;
        }
        self.player.death();
        self.on_player_died(cause);
    }

    fn on_player_died(&mut self, cause: DeathCause) {
        log::info!("Player died: {:?}", cause);
        self.events.push(GameEvent::PlayerDied { cause });
        self.respawn_timer = Some(self.config.rules.respawn_delay.max(0.0));
    }

    // The timer starts counting on the step after death, so a zero delay
    // respawns on the next step.
    fn tick_respawn(&mut self, dt: f64) {
        let Some(remaining) = self.respawn_timer.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.respawn();
        }
    }

    /// Bring the player back and reset the level's enemies.
    pub fn respawn(&mut self) {
        self.respawn_timer = None;
        self.player.respawn(self.level_spawn);
        self.enemies = spawn_enemies(&self.world, self.config.level.enemy_size());
        self.camera.reseed(&self.player.body);
        log::info!(
            "Player respawned at ({}, {}) with {} enemies",
            self.player.body.position.x,
            self.player.body.position.y,
            self.enemies.len()
        );
        self.events.push(GameEvent::PlayerRespawned {
            position: self.player.body.position,
        });
    }

    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn level_spawn(&self) -> Vec2 {
        self.level_spawn
    }

    pub fn kill_plane(&self) -> f64 {
        self.kill_plane
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_timer.is_some()
    }

    /// Queue every world drawable as seen by the current camera.
    pub fn draw(&self, list: &mut DrawList) {
        self.render(list, self.camera.current());
    }
}

impl Renderable for GameState {
    fn render(&self, list: &mut DrawList, camera: &Camera2D) {
        let tile_size = self.world.tile_size();
        let visible_width = camera.viewport.x / camera.zoom;
        for block in self
            .world
            .visible_blocks(camera.offset.x, visible_width, self.config.level.chunk_size)
        {
            list.push_world(
                camera,
                &block.bounds(tile_size),
                BLOCK_Z,
                Drawable::ColorRect {
                    color: block_color(block.style),
                },
            );
        }
        for enemy in &self.enemies {
            enemy.render(list, camera);
        }
        self.player.render(list, camera);
        self.effects.render(list, camera);
    }
}

/// One enemy per spawn marker, ids in spawn-list order.
fn spawn_enemies(world: &World, size: Vec2) -> Vec<Enemy> {
    world
        .enemy_spawns()
        .iter()
        .enumerate()
        .map(|(index, &cell)| {
            Enemy::new(EnemyId::new(index as u32), world.spawn_position(cell, size), size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(map: &str) -> GameState {
        let config = GameConfig::default();
        let world = World::parse(map, config.level.tile_size).unwrap();
        GameState::new(config, world)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn player_spawns_on_the_marker() {
        let game = state("    \n P  \n3333");
        let tile = game.world().tile_size();
        let size = game.config().level.player_size();
        let spawn = game.level_spawn();
        assert!((spawn.x - (tile + (tile - size.x) / 2.0)).abs() < 1e-9);
        assert!((spawn.y - (2.0 * tile - size.y)).abs() < 1e-9);
    }

    #[test]
    fn lethal_contact_kills_then_respawns_after_the_delay() {
        let mut game = state(" P ^\n3333");
        let walk_right = FrameInput {
            horizontal: 1.0,
            ..FrameInput::default()
        };
        for _ in 0..120 {
            game.step(1.0 / 60.0, &walk_right);
            if !game.player().alive {
                break;
            }
        }
        assert!(!game.player().alive);
        assert!(game.is_respawning());
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::PlayerDied {
            cause: DeathCause::Lethal
        }));

        let delay = game.config().rules.respawn_delay;
        let frames = (delay / (1.0 / 60.0)).ceil() as usize + 1;
        for _ in 0..frames {
            game.step(1.0 / 60.0, &idle());
            if game.player().alive {
                break;
            }
        }
        assert!(game.player().alive);
        assert_eq!(game.player().body.position, game.level_spawn());
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerRespawned { .. })));
    }

    #[test]
    fn zero_delay_respawns_on_the_next_step() {
        let mut config = GameConfig::default();
        config.rules.respawn_delay = 0.0;
        let world = World::parse(" P \n333", config.level.tile_size).unwrap();
        let mut game = GameState::new(config, world);

        game.kill_player(DeathCause::OutOfBounds);
        game.step(1.0 / 60.0, &idle());
        assert!(game.player().alive);
        assert!(!game.is_respawning());
    }

    #[test]
    fn camera_toggle_emits_an_event() {
        let mut game = state(" P \n333");
        let input = FrameInput {
            toggle_camera: true,
            ..FrameInput::default()
        };
        game.step(1.0 / 60.0, &input);
        assert!(game
            .drain_events()
            .contains(&GameEvent::CameraModeChanged(crate::camera::CameraMode::Free)));
    }

    #[test]
    fn draw_culls_far_blocks_and_layers_entities() {
        let mut map = String::from("P");
        map.push_str(&" ".repeat(199));
        map.push('\n');
        map.push_str(&"3".repeat(200));
        let game = state(&map);

        let mut list = DrawList::new();
        game.draw(&mut list);
        let blocks = list.sorted().iter().filter(|c| c.z_index == BLOCK_Z).count();
        assert!(blocks > 0 && blocks < 200);

        let top = list.sorted().last().map(|c| c.z_index);
        assert_eq!(top, Some(PLAYER_Z));
    }

    #[test]
    fn nan_dt_changes_nothing() {
        let mut game = state(" P \n   \n333");
        let before = game.player().body;
        game.step(f64::NAN, &idle());
        assert_eq!(game.player().body, before);
    }
}
