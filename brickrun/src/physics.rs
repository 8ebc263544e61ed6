//! Per-frame kinematics for the player and enemies.
//!
//! Integration is explicit Euler on a variable time step. Bodies are moved by
//! their full velocity first and then corrected by [`collision::resolve`].

use crate::collision::{self, CollisionResult, Hazard};
use crate::config::PhysicsConfig;
use crate::entities::{Enemy, Movable, Player};
use crate::world::World;

/// Movement intent for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal axis: negative is left, positive is right, zero is idle.
    pub horizontal: f64,
    /// Jump was pressed this frame (edge, not level).
    pub jump_pressed: bool,
}

/// What happened to the player during [`update_player`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerStep {
    pub jumped: bool,
    pub collision: CollisionResult,
    pub hazard: Option<Hazard>,
}

/// Clamp an elapsed time to something safe to integrate.
///
/// Non-finite and negative values become zero; long frames are capped at
/// `max_frame_time`.
pub fn sanitize_dt(dt: f64, max_frame_time: f64) -> f64 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_frame_time.max(0.0))
}

/// Advance `entity` by its velocity.
pub fn integrate<M: Movable + ?Sized>(entity: &mut M, dt: f64) {
    let body = entity.body_mut();
    body.position += body.velocity * dt;
}

// ------------------------------
// Player
// ------------------------------

/// Run one physics step for the player.
///
/// A dead player is frozen until respawn. The returned hazard is only
/// reported; deciding what to do about it is up to the caller.
pub fn update_player(
    player: &mut Player,
    dt: f64,
    input: &PlayerInput,
    world: &World,
    physics: &PhysicsConfig,
    kill_plane: f64,
) -> PlayerStep {
    let mut step = PlayerStep::default();
    if !player.alive {
        return step;
    }

    let dt = sanitize_dt(dt, physics.max_frame_time);
    if dt == 0.0 {
        step.hazard = collision::hazard(&player.body, world, kill_plane);
        return step;
    }

    let body = &mut player.body;
    body.velocity.y = (body.velocity.y + physics.gravity * dt).min(physics.max_fall_speed);

    body.velocity.x = if input.horizontal > 0.0 {
        physics.move_speed
    } else if input.horizontal < 0.0 {
        -physics.move_speed
    } else {
        0.0
    };

    if input.jump_pressed && body.grounded {
        body.velocity.y = physics.jump_impulse;
        body.grounded = false;
        step.jumped = true;
    }

    integrate(player, dt);

    let body = &mut player.body;
    step.collision = collision::resolve(body, world);
    body.grounded = step.collision.grounded;

    // The level edges act as walls.
    let max_x = (world.pixel_width() - body.size.x).max(0.0);
    if body.position.x < 0.0 || body.position.x > max_x {
        body.position.x = body.position.x.clamp(0.0, max_x);
        body.velocity.x = 0.0;
        step.collision.blocked_x = true;
    }

    player.refresh_animation();
    step.hazard = collision::hazard(&player.body, world, kill_plane);
    step
}

// ------------------------------
// Enemies
// ------------------------------

/// Move an enemy along its patrol track.
///
/// Enemies ignore gravity. They turn around when a Solid block or the level
/// edge stops them.
pub fn update_enemy(enemy: &mut Enemy, dt: f64, world: &World, physics: &PhysicsConfig) -> CollisionResult {
    if !enemy.alive {
        return CollisionResult::default();
    }
    let dt = sanitize_dt(dt, physics.max_frame_time);
    if dt == 0.0 {
        return CollisionResult::default();
    }

    enemy.body.velocity.x = physics.enemy_speed * enemy.patrol_direction.sign();
    enemy.body.velocity.y = 0.0;
    integrate(enemy, dt);

    let mut result = collision::resolve(&mut enemy.body, world);
    let max_x = (world.pixel_width() - enemy.body.size.x).max(0.0);
    if enemy.body.position.x < 0.0 || enemy.body.position.x > max_x {
        enemy.body.position.x = enemy.body.position.x.clamp(0.0, max_x);
        result.blocked_x = true;
    }

    if result.blocked_x {
        enemy.patrol_direction = enemy.patrol_direction.reversed();
        log::debug!(
            "Enemy {:?} turned {:?} at x={:.1}",
            enemy.id,
            enemy.patrol_direction,
            enemy.body.position.x
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AnimationState, EnemyId, PatrolDirection};
    use crate::math::Vec2;

    const TILE: f64 = 50.0;
    const DT: f64 = 1.0 / 60.0;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    fn player_at(x: f64, y: f64) -> Player {
        Player::new(Vec2::new(x, y), Vec2::new(20.0, 50.0))
    }

    #[test]
    fn sanitize_dt_rejects_bad_values() {
        assert_eq!(sanitize_dt(f64::NAN, 0.05), 0.0);
        assert_eq!(sanitize_dt(-0.1, 0.05), 0.0);
        assert_eq!(sanitize_dt(1.0, 0.05), 0.05);
        assert_eq!(sanitize_dt(0.01, 0.05), 0.01);
    }

    #[test]
    fn falling_player_comes_to_rest_on_the_floor() {
        let world = World::parse("    \n    \n3333", TILE).unwrap();
        let mut player = player_at(60.0, 0.0);
        let input = PlayerInput::default();

        let mut frames = 0;
        while !player.body.grounded {
            update_player(&mut player, DT, &input, &world, &physics(), 1000.0);
            frames += 1;
            assert!(frames < 120, "player never landed");
        }
        for _ in 0..30 {
            update_player(&mut player, DT, &input, &world, &physics(), 1000.0);
        }

        assert!(player.body.grounded);
        assert_eq!(player.body.velocity.y, 0.0);
        assert_eq!(player.body.position.y, 100.0 - 50.0);
        assert_eq!(player.animation, AnimationState::Idle);
    }

    #[test]
    fn fall_speed_is_clamped() {
        let world = World::parse("    ", TILE).unwrap();
        let mut player = player_at(60.0, -10_000.0);
        for _ in 0..200 {
            update_player(&mut player, DT, &PlayerInput::default(), &world, &physics(), 1e9);
        }
        assert_eq!(player.body.velocity.y, physics().max_fall_speed);
    }

    #[test]
    fn jump_requires_ground() {
        let world = World::parse("    \n3333", TILE).unwrap();
        let mut player = player_at(60.0, 0.0);
        player.body.grounded = true;
        let jump = PlayerInput {
            horizontal: 0.0,
            jump_pressed: true,
        };

        let step = update_player(&mut player, DT, &jump, &world, &physics(), 1000.0);
        assert!(step.jumped);
        assert!(!player.body.grounded);
        assert_eq!(player.body.velocity.y, physics().jump_impulse);
        assert!(player.body.position.y < 0.0);
        assert_eq!(player.animation, AnimationState::Jump);

        let vy = player.body.velocity.y;
        let step = update_player(&mut player, DT, &jump, &world, &physics(), 1000.0);
        assert!(!step.jumped);
        assert!(player.body.velocity.y > vy);
    }

    #[test]
    fn horizontal_input_sets_velocity_instantly() {
        let world = World::parse("    \n3333", TILE).unwrap();
        let mut player = player_at(60.0, 0.0);
        player.body.grounded = true;

        let right = PlayerInput {
            horizontal: 1.0,
            jump_pressed: false,
        };
        update_player(&mut player, DT, &right, &world, &physics(), 1000.0);
        assert_eq!(player.body.velocity.x, physics().move_speed);
        assert_eq!(player.animation, AnimationState::Walk);

        update_player(&mut player, DT, &PlayerInput::default(), &world, &physics(), 1000.0);
        assert_eq!(player.body.velocity.x, 0.0);
        assert_eq!(player.animation, AnimationState::Idle);
    }

    #[test]
    fn level_edges_stop_the_player() {
        let world = World::parse("    \n3333", TILE).unwrap();
        let mut player = player_at(1.0, 0.0);
        player.body.grounded = true;
        let left = PlayerInput {
            horizontal: -1.0,
            jump_pressed: false,
        };
        let step = update_player(&mut player, DT, &left, &world, &physics(), 1000.0);
        assert!(step.collision.blocked_x);
        assert_eq!(player.body.position.x, 0.0);
    }

    #[test]
    fn dead_player_is_frozen() {
        let world = World::parse("    ", TILE).unwrap();
        let mut player = player_at(60.0, 0.0);
        player.death();
        let right = PlayerInput {
            horizontal: 1.0,
            jump_pressed: true,
        };
        let step = update_player(&mut player, DT, &right, &world, &physics(), 1000.0);
        assert_eq!(step, PlayerStep::default());
        assert_eq!(player.body.position, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn falling_out_of_the_level_reports_a_hazard() {
        let world = World::parse("    ", TILE).unwrap();
        let mut player = player_at(60.0, 590.0);
        player.body.velocity.y = 900.0;
        let step = update_player(&mut player, DT, &PlayerInput::default(), &world, &physics(), 600.0);
        assert_eq!(step.hazard, Some(Hazard::OutOfBounds));
    }

    #[test]
    fn enemies_turn_at_walls() {
        let world = World::parse("1    1\n333333", TILE).unwrap();
        let mut enemy = Enemy::new(EnemyId::new(0), Vec2::new(52.0, 10.0), Vec2::new(40.0, 40.0));
        assert_eq!(enemy.patrol_direction, PatrolDirection::Left);

        let result = update_enemy(&mut enemy, 0.05, &world, &physics());
        assert!(result.blocked_x);
        assert_eq!(enemy.body.position.x, 50.0);
        assert_eq!(enemy.patrol_direction, PatrolDirection::Right);

        update_enemy(&mut enemy, 0.05, &world, &physics());
        assert!(enemy.body.position.x > 50.0);
        assert_eq!(enemy.body.position.y, 10.0);
    }

    #[test]
    fn enemies_turn_at_level_edges() {
        let world = World::parse("   \n333", TILE).unwrap();
        let mut enemy = Enemy::new(EnemyId::new(1), Vec2::new(108.0, 10.0), Vec2::new(40.0, 40.0));
        enemy.patrol_direction = PatrolDirection::Right;

        update_enemy(&mut enemy, 0.05, &world, &physics());
        assert_eq!(enemy.body.position.x, 110.0);
        assert_eq!(enemy.patrol_direction, PatrolDirection::Left);
    }
}
