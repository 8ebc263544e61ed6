//! Player versus enemy contact.
//!
//! [`check`] classifies one pair without side effects. [`interact`]
//! classifies every active enemy against a snapshot of the player first and
//! only then applies the results, so removing enemies never disturbs the
//! iteration.

use crate::config::RulesConfig;
use crate::entities::{Collidable, Damageable, Enemy, EnemyId, Player};
use crate::math::Vec2;

/// Result of a single player/enemy contact test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    None,
    PlayerDies,
    EnemyDies,
}

/// Classify a contact between `player` and `enemy`.
///
/// A descending player touching the enemy's top zone always stomps, even if
/// the boxes also overlap on the side.
pub fn check(player: &Player, enemy: &Enemy, top_zone_fraction: f64) -> Outcome {
    let player_bounds = player.bounds();
    let enemy_bounds = enemy.bounds();
    if !player_bounds.intersects(&enemy_bounds) {
        return Outcome::None;
    }

    let top_zone = enemy_bounds.top_slice(top_zone_fraction);
    if player.body.velocity.y > 0.0 && player_bounds.intersects(&top_zone) {
        Outcome::EnemyDies
    } else {
        Outcome::PlayerDies
    }
}

/// An enemy killed by a stomp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stomp {
    pub enemy: EnemyId,
    /// Top centre of the enemy when it died.
    pub position: Vec2,
}

/// Everything that happened between the player and the enemies this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub stomps: Vec<Stomp>,
    /// Set when the player died to a side hit.
    pub killed_by: Option<EnemyId>,
}

/// Resolve all player/enemy contacts for one frame.
///
/// Stomps win over side hits: if any enemy is stomped, side contacts in the
/// same frame are ignored. Stomped enemies are removed from `enemies`, the
/// player bounces with `stomp_bounce` and earns `rules.stomp_reward` each.
pub fn interact(
    player: &mut Player,
    enemies: &mut Vec<Enemy>,
    rules: &RulesConfig,
    stomp_bounce: f64,
) -> Interaction {
    let mut interaction = Interaction::default();
    if !player.is_alive() {
        return interaction;
    }

    let mut side_hit = None;
    for enemy in enemies.iter().filter(|enemy| enemy.is_alive()) {
        match check(player, enemy, rules.top_zone_fraction) {
            Outcome::EnemyDies => {
                let bounds = enemy.bounds();
                interaction.stomps.push(Stomp {
                    enemy: enemy.id,
                    position: Vec2::new(bounds.center().x, bounds.top()),
                });
            }
            Outcome::PlayerDies => {
                side_hit.get_or_insert(enemy.id);
            }
            Outcome::None => {}
        }
    }

    if !interaction.stomps.is_empty() {
        enemies.retain(|enemy| !interaction.stomps.iter().any(|stomp| stomp.enemy == enemy.id));
        player.body.velocity.y = stomp_bounce;
        player.body.grounded = false;
        player.score += rules.stomp_reward * interaction.stomps.len() as i64;
        log::debug!(
            "Stomped {} enemies, score now {}",
            interaction.stomps.len(),
            player.score
        );
    } else if let Some(enemy) = side_hit {
        player.kill();
        interaction.killed_by = Some(enemy);
    }

    interaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EnemyId;

    fn player_at(x: f64, y: f64, vy: f64) -> Player {
        let mut player = Player::new(Vec2::new(x, y), Vec2::new(20.0, 50.0));
        player.body.velocity.y = vy;
        player
    }

    fn enemy_at(id: u32, x: f64, y: f64) -> Enemy {
        Enemy::new(EnemyId::new(id), Vec2::new(x, y), Vec2::new(40.0, 40.0))
    }

    #[test]
    fn separate_boxes_do_not_interact() {
        let player = player_at(0.0, 0.0, 100.0);
        assert_eq!(check(&player, &enemy_at(0, 100.0, 100.0), 0.25), Outcome::None);
        // Touching edges only.
        let player = player_at(80.0, 100.0, 100.0);
        assert_eq!(check(&player, &enemy_at(0, 100.0, 100.0), 0.25), Outcome::None);
    }

    #[test]
    fn descending_into_the_top_zone_stomps_even_from_the_side() {
        // Overlaps the enemy's left edge and the top 10px.
        let player = player_at(85.0, 60.0, 200.0);
        let enemy = enemy_at(0, 100.0, 100.0);
        assert_eq!(check(&player, &enemy, 0.25), Outcome::EnemyDies);
    }

    #[test]
    fn side_contact_kills_the_player() {
        let enemy = enemy_at(0, 100.0, 100.0);
        // Below the top zone.
        assert_eq!(check(&player_at(85.0, 115.0, 200.0), &enemy, 0.25), Outcome::PlayerDies);
        // In the top zone but rising or standing still.
        assert_eq!(check(&player_at(85.0, 60.0, 0.0), &enemy, 0.25), Outcome::PlayerDies);
        assert_eq!(check(&player_at(85.0, 60.0, -300.0), &enemy, 0.25), Outcome::PlayerDies);
    }

    #[test]
    fn stomps_remove_enemies_and_score() {
        let rules = RulesConfig::default();
        let mut player = player_at(100.0, 55.0, 300.0);
        let mut enemies = vec![enemy_at(0, 85.0, 100.0), enemy_at(1, 110.0, 100.0), enemy_at(2, 400.0, 100.0)];

        let interaction = interact(&mut player, &mut enemies, &rules, -450.0);
        assert_eq!(interaction.stomps.len(), 2);
        assert_eq!(interaction.stomps[0].position, Vec2::new(105.0, 100.0));
        assert!(interaction.killed_by.is_none());
        assert_eq!(enemies.iter().map(|e| e.id.to_u32()).collect::<Vec<_>>(), vec![2]);
        assert_eq!(player.score, 200);
        assert_eq!(player.body.velocity.y, -450.0);
        assert!(player.alive);
    }

    #[test]
    fn a_stomp_cancels_side_hits_in_the_same_frame() {
        let rules = RulesConfig::default();
        let mut player = player_at(100.0, 55.0, 300.0);
        // Enemy 1 is hit from the side: the player's feet are below its top zone.
        let mut enemies = vec![enemy_at(0, 90.0, 100.0), enemy_at(1, 110.0, 0.0)];
        enemies[1].body.size = Vec2::new(40.0, 80.0);
        assert_eq!(check(&player, &enemies[1], rules.top_zone_fraction), Outcome::PlayerDies);

        let interaction = interact(&mut player, &mut enemies, &rules, -450.0);
        assert_eq!(interaction.stomps.len(), 1);
        assert!(interaction.killed_by.is_none());
        assert!(player.alive);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn side_hit_kills_without_touching_score() {
        let rules = RulesConfig::default();
        let mut player = player_at(85.0, 115.0, 0.0);
        player.score = 400;
        let mut enemies = vec![enemy_at(7, 100.0, 100.0)];

        let interaction = interact(&mut player, &mut enemies, &rules, -450.0);
        assert_eq!(interaction.killed_by, Some(EnemyId::new(7)));
        assert!(!player.alive);
        assert_eq!(player.score, 400);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn dead_players_do_not_interact() {
        let rules = RulesConfig::default();
        let mut player = player_at(100.0, 55.0, 300.0);
        player.death();
        let mut enemies = vec![enemy_at(0, 85.0, 100.0)];
        assert_eq!(interact(&mut player, &mut enemies, &rules, -450.0), Interaction::default());
        assert_eq!(enemies.len(), 1);
    }
}
