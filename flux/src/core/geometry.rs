//! Drag and resize math. Pure functions over the gesture's starting state and
//! the current pointer position; nothing here touches a window.

use flux_ipc::ResizeDirection;

use super::{Point, Rect, WindowLimits};

/// Translate `start` by the pointer delta. Size is unchanged.
pub fn compute_move_bounds(start: Rect, start_point: Point, current_point: Point) -> Rect {
    let dx = i64::from(current_point.x) - i64::from(start_point.x);
    let dy = i64::from(current_point.y) - i64::from(start_point.y);
    Rect {
        x: saturate_i32(i64::from(start.x) + dx),
        y: saturate_i32(i64::from(start.y) + dy),
        ..start
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Grow or shrink `start` from its top-left anchor along the axes named by
/// `direction`. `None` (an unrecognised direction) leaves both axes alone.
pub fn compute_resize_bounds(
    start: Rect,
    start_point: Point,
    current_point: Point,
    direction: Option<ResizeDirection>,
    limits: &WindowLimits,
) -> Rect {
    let dx = i64::from(current_point.x) - i64::from(start_point.x);
    let dy = i64::from(current_point.y) - i64::from(start_point.y);

    let mut bounds = start;
    if let Some(direction) = direction {
        if direction.affects_width() {
            bounds.width = resized(start.width, dx, limits.min_width);
        }
        if direction.affects_height() {
            bounds.height = resized(start.height, dy, limits.min_height);
        }
    }
    clamp_rect(bounds, limits)
}

/// Apply min and max extents. Position is left alone.
pub fn clamp_rect(rect: Rect, limits: &WindowLimits) -> Rect {
    rect.clamped(limits)
}

fn resized(length: u32, delta: i64, min: u32) -> u32 {
    let target = (i64::from(length) + delta).max(i64::from(min));
    u32::try_from(target).unwrap_or(u32::MAX)
}
