//! Axis-aligned collision between dynamic bodies and the static world.
//!
//! [`resolve`] takes a body that has already been advanced by its velocity
//! and pushes it out of any Solid blocks it ended up inside. Each contact is
//! assigned to an axis by the direction the body is moving: a block below a
//! body that is not rising is a floor, a block above a rising body is a
//! ceiling, and a block to the side only blocks a body moving toward it.
//! When both axes apply, or neither does, the shallower penetration wins.
//! Vertical contacts are resolved first, then the remaining horizontal ones
//! against the corrected box. Each axis is corrected at most once per call.

use crate::entities::Body;
use crate::math::{Rect, Vec2};
use crate::world::{Block, World};

/// What the resolver did to a body this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Landed on a Solid block while not moving upward.
    pub grounded: bool,
    /// Pushed out of a wall on the horizontal axis.
    pub blocked_x: bool,
}

/// A death condition reported to the caller. The resolver never acts on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hazard {
    /// Touching a Lethal block.
    Lethal,
    /// Fell below the kill plane, or the position is no longer finite.
    OutOfBounds,
}

/// Push `body` out of every Solid block it overlaps.
pub fn resolve(body: &mut Body, world: &World) -> CollisionResult {
    let mut result = CollisionResult::default();
    if !body.has_valid_size() || !body.position.is_finite() {
        log::warn!(
            "Skipping collision for degenerate body at {:?} with size {:?}",
            body.position,
            body.size
        );
        return result;
    }
    let tile_size = world.tile_size();

    let bounds = body.bounds();
    let mut floor: Option<f64> = None;
    let mut ceiling: Option<f64> = None;
    for block in solid_blocks(world, &bounds) {
        let block_bounds = block.bounds(tile_size);
        if contact_axis(&bounds, body.velocity, &block_bounds) != Some(Axis::Vertical) {
            continue;
        }
        if bounds.center().y < block_bounds.center().y {
            floor = Some(floor.map_or(block_bounds.top(), |top| top.min(block_bounds.top())));
        } else {
            ceiling = Some(ceiling.map_or(block_bounds.bottom(), |bottom| {
                bottom.max(block_bounds.bottom())
            }));
        }
    }

    match (floor, ceiling) {
        (Some(_), Some(_)) => {
            log::warn!(
                "Body at {:?} is wedged between floor and ceiling; leaving it in place",
                body.position
            );
        }
        (Some(top), None) => {
            body.position.y = top - body.size.y;
            if body.velocity.y >= 0.0 {
                body.velocity.y = 0.0;
                result.grounded = true;
            }
        }
        (None, Some(bottom)) => {
            body.position.y = bottom;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        }
        (None, None) => {}
    }

    let bounds = body.bounds();
    let mut wall_right: Option<f64> = None;
    let mut wall_left: Option<f64> = None;
    for block in solid_blocks(world, &bounds) {
        let block_bounds = block.bounds(tile_size);
        if contact_axis(&bounds, body.velocity, &block_bounds) != Some(Axis::Horizontal) {
            continue;
        }
        if block_bounds.center().x > bounds.center().x {
            wall_right = Some(wall_right.map_or(block_bounds.left(), |left| left.min(block_bounds.left())));
        } else {
            wall_left = Some(wall_left.map_or(block_bounds.right(), |right| {
                right.max(block_bounds.right())
            }));
        }
    }

    match (wall_left, wall_right) {
        (Some(_), Some(_)) => {
            log::warn!(
                "Body at {:?} is wedged between walls; leaving it in place",
                body.position
            );
        }
        (None, Some(left)) => {
            body.position.x = left - body.size.x;
            body.velocity.x = 0.0;
            result.blocked_x = true;
        }
        (Some(right), None) => {
            body.position.x = right;
            body.velocity.x = 0.0;
            result.blocked_x = true;
        }
        (None, None) => {}
    }

    result
}

/// Death condition for `body`, if any. Lethal contact wins over falling out.
pub fn hazard(body: &Body, world: &World, kill_plane: f64) -> Option<Hazard> {
    if !body.position.is_finite() {
        return Some(Hazard::OutOfBounds);
    }
    if world
        .blocks_overlapping(&body.bounds())
        .any(|block| block.kind.is_lethal())
    {
        return Some(Hazard::Lethal);
    }
    if body.position.y > kill_plane {
        return Some(Hazard::OutOfBounds);
    }
    None
}

fn solid_blocks<'a>(world: &'a World, bounds: &Rect) -> impl Iterator<Item = &'a Block> + 'a {
    world
        .blocks_overlapping(bounds)
        .filter(|block| block.kind.is_solid())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Which axis `block` pushes `body` out along, or `None` if they don't touch.
fn contact_axis(body: &Rect, velocity: Vec2, block: &Rect) -> Option<Axis> {
    let overlap = body.intersection(block)?;

    let below = block.center().y > body.center().y;
    let vertical = if below {
        velocity.y >= 0.0
    } else {
        velocity.y < 0.0
    };
    let right = block.center().x > body.center().x;
    let horizontal = if right {
        velocity.x > 0.0
    } else {
        velocity.x < 0.0
    };

    Some(match (vertical, horizontal) {
        (true, false) => Axis::Vertical,
        (false, true) => Axis::Horizontal,
        // Equal depths go vertical so a body meeting a corner exactly stays up.
        _ if overlap.h <= overlap.w => Axis::Vertical,
        _ => Axis::Horizontal,
    })
}
