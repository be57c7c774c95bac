//! Collision detection and target queries
//!
//! Everything here compares squared distances with a strict `<`: two shapes
//! exactly at the threshold do not collide.

use std::collections::BTreeSet;

use glam::Vec2;

use super::enemy::Enemy;
use super::state::EntityId;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }
}

/// Distance test between two points. Returns the hit flag and the squared distance.
#[inline]
pub fn check_distance(a: Vec2, b: Vec2, threshold: f32) -> (bool, f32) {
    let dist_sq = a.distance_squared(b);
    (dist_sq < threshold * threshold, dist_sq)
}

/// Two circles overlap when their centers are closer than the radius sum
#[inline]
pub fn circles_collide(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    check_distance(a, b, radius_a + radius_b).0
}

/// Circle against axis-aligned rectangle
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// Player body against an enemy body (sum of half sizes)
#[inline]
pub fn player_enemy_collision(player_pos: Vec2, player_size: f32, enemy: &Enemy) -> bool {
    circles_collide(player_pos, player_size / 2.0, enemy.pos, enemy.size / 2.0)
}

/// Index of the nearest enemy to `from` that is not in `exclude`.
///
/// With `max_distance` only enemies strictly inside that radius qualify.
pub fn find_nearest_unstruck(
    from: Vec2,
    enemies: &[Enemy],
    exclude: &BTreeSet<EntityId>,
    max_distance: Option<f32>,
) -> Option<usize> {
    let mut best = None;
    let mut best_dist_sq = max_distance.map_or(f32::INFINITY, |d| d * d);

    for (i, enemy) in enemies.iter().enumerate() {
        if exclude.contains(&enemy.id) {
            continue;
        }
        let dist_sq = from.distance_squared(enemy.pos);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(i);
        }
    }

    best
}

/// All enemies strictly inside `radius` of `center`, closest first.
///
/// Returns `(index, distance)` pairs.
pub fn enemies_in_radius(
    center: Vec2,
    radius: f32,
    enemies: &[Enemy],
    exclude: &BTreeSet<EntityId>,
) -> Vec<(usize, f32)> {
    let radius_sq = radius * radius;
    let mut nearby: Vec<(usize, f32)> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !exclude.contains(&e.id))
        .filter_map(|(i, e)| {
            let dist_sq = center.distance_squared(e.pos);
            (dist_sq < radius_sq).then(|| (i, dist_sq.sqrt()))
        })
        .collect();

    nearby.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    nearby
}

/// Index of an enemy by id
#[inline]
pub fn index_of(enemies: &[Enemy], id: EntityId) -> Option<usize> {
    enemies.iter().position(|e| e.id == id)
}
