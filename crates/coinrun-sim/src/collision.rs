//! Contact queries between the player and interactive entities.
//!
//! The simulation gathers all contacts for a frame first, then resolves
//! them in a fixed order (coins, checkpoint, portals, projectiles,
//! enemies) so outcomes never depend on entity storage order.

use crate::config::SimConfig;
use crate::content::Coin;
use crate::enemy::Enemy;
use crate::level::{Checkpoint, Portal};
use crate::player::PlayerState;
use crate::projectile::Projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Coin(usize),
    Checkpoint,
    Portal(usize),
    Projectile(usize),
    Enemy { index: usize, stomp: bool },
}

/// A touch counts as a stomp when the player was not rising sharply and
/// their feet sit in a narrow band around the enemy's head.
pub fn is_stomp(player: &PlayerState, approach_vy: f32, enemy: &Enemy, config: &SimConfig) -> bool {
    let player_bottom = player.aabb().bottom();
    let enemy_box = enemy.aabb();
    let overlap_from_above = player_bottom - enemy_box.top();
    let low_enough = player_bottom <= enemy_box.top() + config.stomp_top_slack
        || player_bottom <= enemy.y;
    approach_vy >= config.stomp_min_vy
        && overlap_from_above >= config.stomp_overlap_min
        && overlap_from_above <= config.stomp_overlap_max
        && low_enough
}

/// Collect every contact for this frame, in resolution order.
#[allow(clippy::too_many_arguments)]
pub fn gather_contacts(
    player: &PlayerState,
    approach_vy: f32,
    coins: &[Coin],
    enemies: &[Enemy],
    projectiles: &[Projectile],
    checkpoint: &Checkpoint,
    portals: &[Portal],
    config: &SimConfig,
) -> Vec<Contact> {
    let body = player.aabb();
    let mut contacts = Vec::new();

    for (idx, coin) in coins.iter().enumerate() {
        if coin.active && body.intersects(&coin.aabb()) {
            contacts.push(Contact::Coin(idx));
        }
    }

    if !checkpoint.activated && body.intersects(&checkpoint.aabb()) {
        contacts.push(Contact::Checkpoint);
    }

    for (idx, portal) in portals.iter().enumerate() {
        if !portal.claimed && body.intersects(&portal.aabb()) {
            contacts.push(Contact::Portal(idx));
        }
    }

    for (idx, projectile) in projectiles.iter().enumerate() {
        if projectile.active && body.intersects(&projectile.aabb()) {
            contacts.push(Contact::Projectile(idx));
        }
    }

    for (idx, enemy) in enemies.iter().enumerate() {
        if enemy.active && body.intersects(&enemy.aabb()) {
            contacts.push(Contact::Enemy {
                index: idx,
                stomp: is_stomp(player, approach_vy, enemy, config),
            });
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PLAYER_H;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    fn grunt_at(x: f32, foot_y: f32) -> Enemy {
        Enemy::grunt(x, foot_y, x - 100.0, x + 100.0, 70.0, false, 1.0)
    }

    fn player_with_bottom_at(x: f32, bottom: f32) -> PlayerState {
        PlayerState::spawn(x, bottom - PLAYER_H / 2.0)
    }

    #[test]
    fn falling_onto_head_is_a_stomp() {
        let config = cfg();
        let enemy = grunt_at(1000.0, 502.0);
        let enemy_top = enemy.aabb().top();
        let player = player_with_bottom_at(1000.0, enemy_top + 10.0);
        assert!(is_stomp(&player, 150.0, &enemy, &config));
    }

    #[test]
    fn deep_side_overlap_is_not_a_stomp() {
        let config = cfg();
        let enemy = grunt_at(1000.0, 502.0);
        let enemy_top = enemy.aabb().top();
        let player = player_with_bottom_at(1010.0, enemy_top + 40.0);
        assert!(!is_stomp(&player, 150.0, &enemy, &config));
    }

    #[test]
    fn rising_player_cannot_stomp() {
        let config = cfg();
        let enemy = grunt_at(1000.0, 502.0);
        let enemy_top = enemy.aabb().top();
        let player = player_with_bottom_at(1000.0, enemy_top + 10.0);
        assert!(!is_stomp(&player, -100.0, &enemy, &config));
    }

    #[test]
    fn feet_just_above_head_still_count() {
        let config = cfg();
        let enemy = grunt_at(1000.0, 502.0);
        let enemy_top = enemy.aabb().top();
        // Slightly above the head, inside the negative overlap band.
        let player = player_with_bottom_at(1000.0, enemy_top - 4.0);
        assert!(is_stomp(&player, 10.0, &enemy, &config));
    }

    #[test]
    fn contacts_come_out_in_resolution_order() {
        let config = cfg();
        let player = PlayerState::spawn(1000.0, 460.0);
        let coin = Coin {
            x: 1000.0,
            y: 460.0,
            value: 100,
            big: false,
            active: true,
        };
        let enemy = grunt_at(1000.0, 488.0 + 22.4);
        let projectile = Projectile {
            x: 1005.0,
            y: 465.0,
            vx: 0.0,
            base_vy: 0.0,
            phase: 0.0,
            active: true,
        };
        let checkpoint = Checkpoint {
            x: 1000.0,
            y: 470.0,
            activated: false,
        };
        let portals = [Portal {
            x: 1000.0,
            y: 488.0,
            level_index: 1,
            claimed: false,
        }];
        let contacts = gather_contacts(
            &player,
            50.0,
            &[coin],
            &[enemy],
            &[projectile],
            &checkpoint,
            &portals,
            &config,
        );
        assert_eq!(contacts.len(), 5);
        assert_eq!(contacts[0], Contact::Coin(0));
        assert_eq!(contacts[1], Contact::Checkpoint);
        assert_eq!(contacts[2], Contact::Portal(0));
        assert_eq!(contacts[3], Contact::Projectile(0));
        assert!(matches!(contacts[4], Contact::Enemy { index: 0, .. }));
    }

    #[test]
    fn inactive_and_claimed_entities_are_skipped() {
        let config = cfg();
        let player = PlayerState::spawn(1000.0, 460.0);
        let mut coin = Coin {
            x: 1000.0,
            y: 460.0,
            value: 100,
            big: false,
            active: false,
        };
        let checkpoint = Checkpoint {
            x: 1000.0,
            y: 470.0,
            activated: true,
        };
        let portals = [Portal {
            x: 1000.0,
            y: 488.0,
            level_index: 1,
            claimed: true,
        }];
        let contacts = gather_contacts(
            &player,
            0.0,
            std::slice::from_ref(&coin),
            &[],
            &[],
            &checkpoint,
            &portals,
            &config,
        );
        assert!(contacts.is_empty());
        coin.active = true;
        let contacts = gather_contacts(
            &player,
            0.0,
            &[coin],
            &[],
            &[],
            &checkpoint,
            &portals,
            &config,
        );
        assert_eq!(contacts, vec![Contact::Coin(0)]);
    }
}
