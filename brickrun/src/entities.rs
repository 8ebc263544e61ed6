//! Dynamic game objects: the player and patrolling enemies.
//!
//! Both share a kinematic [`Body`]; behaviour specific to each lives in
//! [`crate::physics`] and [`crate::combat`].

use crate::math::{Rect, Vec2};

/// Animation state shown by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Jump,
    Death,
}

/// Kinematic state shared by every dynamic entity.
///
/// `position` is the top-left corner of the bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    /// A body with a non-positive or non-finite size cannot collide.
    pub fn has_valid_size(&self) -> bool {
        self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

/// Something with a body that the physics step can move.
pub trait Movable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
}

/// Something with an axis-aligned collision box.
pub trait Collidable {
    fn bounds(&self) -> Rect;
}

impl<T: Movable> Collidable for T {
    fn bounds(&self) -> Rect {
        self.body().bounds()
    }
}

/// Something that can be killed.
pub trait Damageable {
    fn is_alive(&self) -> bool;
    fn kill(&mut self);
}

/// The player character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub animation: AnimationState,
    pub score: i64,
    pub alive: bool,
    /// Where the player comes back after dying. `None` uses the level spawn.
    pub respawn_point: Option<Vec2>,
}

impl Player {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::new(position, size),
            animation: AnimationState::Idle,
            score: 0,
            alive: true,
            respawn_point: Some(position),
        }
    }

    /// Enter the Death state. Position is kept until [`Player::respawn`].
    pub fn death(&mut self) {
        self.alive = false;
        self.animation = AnimationState::Death;
        self.body.velocity = Vec2::ZERO;
    }

    /// Reset to the respawn point, or `level_spawn` when none is set.
    ///
    /// Score is kept. Calling this repeatedly yields the same state.
    pub fn respawn(&mut self, level_spawn: Vec2) {
        let target = self
            .respawn_point
            .filter(|point| point.is_finite())
            .unwrap_or(level_spawn);
        self.body.position = target;
        self.body.velocity = Vec2::ZERO;
        self.body.grounded = false;
        self.alive = true;
        self.animation = AnimationState::Idle;
    }

    /// Pick the animation that matches the current body state.
    pub fn refresh_animation(&mut self) {
        self.animation = if !self.alive {
            AnimationState::Death
        } else if !self.body.grounded {
            AnimationState::Jump
        } else if self.body.velocity.x != 0.0 {
            AnimationState::Walk
        } else {
            AnimationState::Idle
        };
    }
}

impl Movable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Damageable for Player {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.death();
    }
}

/// Stable identifier of an enemy within a level.
///
/// Ids are assigned from the spawn list, so an enemy keeps its id across
/// level resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Horizontal patrol direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatrolDirection {
    Left,
    Right,
}

impl PatrolDirection {
    pub fn sign(self) -> f64 {
        match self {
            PatrolDirection::Left => -1.0,
            PatrolDirection::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            PatrolDirection::Left => PatrolDirection::Right,
            PatrolDirection::Right => PatrolDirection::Left,
        }
    }
}

/// A patrolling enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: Body,
    pub patrol_direction: PatrolDirection,
    pub alive: bool,
    pub animation: AnimationState,
}

impl Enemy {
    pub fn new(id: EnemyId, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            body: Body::new(position, size),
            patrol_direction: PatrolDirection::Left,
            alive: true,
            animation: AnimationState::Walk,
        }
    }
}

impl Movable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Damageable for Enemy {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
        self.animation = AnimationState::Death;
        self.body.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(70.0, 500.0), Vec2::new(20.0, 50.0))
    }

    #[test]
    fn death_keeps_position() {
        let mut p = player();
        p.body.position = Vec2::new(300.0, 120.0);
        p.body.velocity = Vec2::new(250.0, -400.0);
        p.death();
        assert!(!p.alive);
        assert_eq!(p.animation, AnimationState::Death);
        assert_eq!(p.body.position, Vec2::new(300.0, 120.0));
        assert_eq!(p.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn respawn_is_idempotent() {
        let mut p = player();
        p.score = 300;
        p.body.position = Vec2::new(900.0, 10.0);
        p.body.velocity = Vec2::new(-250.0, 800.0);
        p.death();

        p.respawn(Vec2::new(0.0, 0.0));
        let first = p.clone();
        p.respawn(Vec2::new(0.0, 0.0));

        assert_eq!(p, first);
        assert!(p.alive);
        assert_eq!(p.score, 300);
        assert_eq!(p.body.position, Vec2::new(70.0, 500.0));
        assert_eq!(p.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn respawn_without_point_uses_level_spawn() {
        let mut p = player();
        p.respawn_point = None;
        p.respawn(Vec2::new(125.0, 40.0));
        assert_eq!(p.body.position, Vec2::new(125.0, 40.0));

        p.respawn_point = Some(Vec2::new(f64::NAN, 0.0));
        p.respawn(Vec2::new(10.0, 20.0));
        assert_eq!(p.body.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn animation_follows_body_state() {
        let mut p = player();
        p.body.grounded = true;
        p.refresh_animation();
        assert_eq!(p.animation, AnimationState::Idle);

        p.body.velocity.x = 250.0;
        p.refresh_animation();
        assert_eq!(p.animation, AnimationState::Walk);

        p.body.grounded = false;
        p.refresh_animation();
        assert_eq!(p.animation, AnimationState::Jump);

        p.kill();
        p.refresh_animation();
        assert_eq!(p.animation, AnimationState::Death);
    }

    #[test]
    fn capability_traits_share_the_body() {
        let mut enemy = Enemy::new(EnemyId::new(3), Vec2::new(10.0, 20.0), Vec2::new(40.0, 40.0));
        assert_eq!(enemy.bounds(), Rect::new(10.0, 20.0, 40.0, 40.0));
        enemy.body_mut().position.x = 50.0;
        assert_eq!(enemy.bounds().x, 50.0);
        assert!(enemy.is_alive());
        enemy.kill();
        assert!(!enemy.is_alive());
        assert_eq!(enemy.animation, AnimationState::Death);
    }
}
