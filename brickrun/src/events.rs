//! Typed event queues.
//!
//! Producers push during the frame; the owner drains the queue once per frame
//! and dispatches. Nothing is delivered re-entrantly.

use crossbeam_channel::{Receiver, Sender};

use crate::camera::CameraMode;
use crate::collision::Hazard;
use crate::entities::EnemyId;
use crate::math::Vec2;

/// Unbounded FIFO of events of one type.
pub struct EventQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    pub fn push(&self, event: T) {
        // The queue owns the receiver, so the channel cannot be disconnected.
        let _ = self.sender.send(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Why the player died.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Lethal,
    OutOfBounds,
    Enemy(EnemyId),
}

impl From<Hazard> for DeathCause {
    fn from(hazard: Hazard) -> Self {
        match hazard {
            Hazard::Lethal => DeathCause::Lethal,
            Hazard::OutOfBounds => DeathCause::OutOfBounds,
        }
    }
}

/// Gameplay events emitted by [`GameState`](crate::game::GameState).
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlayerJumped,
    PlayerDied { cause: DeathCause },
    PlayerRespawned { position: Vec2 },
    EnemyStomped {
        enemy: EnemyId,
        position: Vec2,
        reward: i64,
    },
    ScoreChanged(i64),
    CameraModeChanged(CameraMode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order_and_empties() {
        let queue = EventQueue::new();
        queue.push(GameEvent::PlayerJumped);
        queue.push(GameEvent::ScoreChanged(100));
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert_eq!(events, vec![GameEvent::PlayerJumped, GameEvent::ScoreChanged(100)]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn hazards_map_to_death_causes() {
        assert_eq!(DeathCause::from(Hazard::Lethal), DeathCause::Lethal);
        assert_eq!(DeathCause::from(Hazard::OutOfBounds), DeathCause::OutOfBounds);
    }
}
