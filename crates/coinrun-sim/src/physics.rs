//! Axis-aligned collision primitives.
//!
//! The world uses screen coordinates: y grows downward. A body "lands" when
//! it is pushed up (negative y correction) out of a solid.

use serde::{Deserialize, Serialize};

/// Axis-aligned box stored as center plus half extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    pub fn from_center(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            half_w: w / 2.0,
            half_h: h / 2.0,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.half_w
    }

    pub fn right(&self) -> f32 {
        self.x + self.half_w
    }

    pub fn top(&self) -> f32 {
        self.y - self.half_h
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.half_h
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.x - other.x).abs() < self.half_w + other.half_w
            && (self.y - other.y).abs() < self.half_h + other.half_h
    }
}

/// Contact between a moving body and a solid surface during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceContact {
    /// Index of the solid in the slice passed to [`step_body`].
    pub solid: usize,
    /// True when the body was standing on the surface (pushed up out of it).
    pub from_above: bool,
}

/// Result of integrating and resolving a body for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMove {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Landed on a surface this step.
    pub blocked_down: bool,
    /// Hit a surface from below this step.
    pub blocked_up: bool,
    pub contacts: Vec<SurfaceContact>,
}

/// Integrate a body by `dt` and push it out of every overlapping solid along
/// the axis of minimum penetration, zeroing the velocity component that drove
/// it in. Solids are resolved in slice order; overlaps created by an earlier
/// correction are handled by the later entries in the same pass.
pub fn step_body(body: Aabb, vx: f32, vy: f32, dt: f32, solids: &[(usize, Aabb)]) -> BodyMove {
    let mut out = BodyMove {
        x: body.x + vx * dt,
        y: body.y + vy * dt,
        vx,
        vy,
        blocked_down: false,
        blocked_up: false,
        contacts: Vec::new(),
    };

    for &(index, solid) in solids {
        let moved = Aabb {
            x: out.x,
            y: out.y,
            ..body
        };
        if !moved.intersects(&solid) {
            continue;
        }
        let dx = out.x - solid.x;
        let dy = out.y - solid.y;
        let pen_x = (body.half_w + solid.half_w) - dx.abs();
        let pen_y = (body.half_h + solid.half_h) - dy.abs();

        if pen_y <= pen_x {
            if dy < 0.0 {
                // Body sits above the solid: land on it.
                out.y -= pen_y;
                if out.vy > 0.0 {
                    out.vy = 0.0;
                }
                out.blocked_down = true;
                out.contacts.push(SurfaceContact {
                    solid: index,
                    from_above: true,
                });
            } else {
                // Head bump from below.
                out.y += pen_y;
                if out.vy < 0.0 {
                    out.vy = 0.0;
                }
                out.blocked_up = true;
                out.contacts.push(SurfaceContact {
                    solid: index,
                    from_above: false,
                });
            }
        } else {
            out.x += pen_x.copysign(dx);
            out.vx = 0.0;
            out.contacts.push(SurfaceContact {
                solid: index,
                from_above: false,
            });
        }
    }

    out
}

/// Clamp a body's center so its extent stays inside `[0, world_width]`.
pub fn clamp_to_world(x: f32, half_w: f32, world_width: f32) -> f32 {
    x.clamp(half_w, world_width - half_w)
}
