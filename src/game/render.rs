//! Shape Renderer
//!
//! Draws every entity with a `Sprite` using macroquad primitives, sorted
//! by `z`. Cats get a small procedural figure whose pose follows the
//! sprite frame, so the locomotion visuals read without any art assets.

use macroquad::prelude::*;
use crate::platforming::locomotion::cat_frames;
use super::components::{Shape, Sprite};
use super::world::World;

/// Draw all sprites in world space. Caller sets the camera.
pub fn draw_world(world: &World) {
    let mut items: Vec<(Vec2, &Sprite)> = world
        .sprites
        .iter()
        .filter_map(|(e, sprite)| Some((*world.positions.get(e)?, sprite)))
        .filter(|(_, sprite)| sprite.opacity > 0.0)
        .collect();
    items.sort_by_key(|(_, sprite)| sprite.z);

    for (position, sprite) in items {
        draw_sprite(position, sprite);
    }
}

pub fn draw_sprite(position: Vec2, sprite: &Sprite) {
    let size = sprite.size * sprite.scale;
    let color = sprite.draw_color();
    match sprite.shape {
        Shape::Rect => {
            draw_rectangle(position.x - size.x / 2.0, position.y - size.y / 2.0, size.x, size.y, color);
        }
        Shape::Circle => {
            draw_circle(position.x, position.y, size.x / 2.0, color);
        }
        Shape::Cat => draw_cat(position, size, sprite.frame, sprite.flip_x, color),
        Shape::Crosshair => {
            let r = size.x / 2.0;
            draw_circle_lines(position.x, position.y, r, 2.0, color);
            draw_line(position.x - r * 1.4, position.y, position.x + r * 1.4, position.y, 2.0, color);
            draw_line(position.x, position.y - r * 1.4, position.x, position.y + r * 1.4, 2.0, color);
        }
        Shape::Gun => {
            // Frame 0 aims high, 1 level, 2 low
            let angle = match sprite.frame {
                0 => -0.9,
                1 => -0.45,
                _ => 0.0,
            };
            let base = vec2(position.x, position.y + size.y * 0.25);
            draw_rectangle(base.x - size.x / 2.0, base.y, size.x, size.y * 0.25, color);
            let dir = if sprite.flip_x { -1.0 } else { 1.0 };
            let tip = base + vec2(f32::cos(angle) * dir, f32::sin(angle)) * size.x * 0.6;
            draw_line(base.x, base.y, tip.x, tip.y, size.y * 0.2, color);
        }
    }
}

/// Procedural cat: body, head, ears, tail and two leg pairs.
fn draw_cat(position: Vec2, size: Vec2, frame: usize, flip_x: bool, color: Color) {
    let facing = if flip_x { -1.0 } else { 1.0 };
    let w = size.x;
    let h = size.y;

    // Pose: (body stretch, leg swing, tail lift)
    let (stretch, swing, tail) = match frame {
        f if f <= cat_frames::WALK_LAST => {
            let phase = f as f32 / (cat_frames::WALK_LAST + 1) as f32 * std::f32::consts::TAU;
            (1.0, phase.sin() * 0.12, 0.2)
        }
        cat_frames::JUMP_START => (1.2, -0.15, 0.6),
        cat_frames::JUMP_MID => (1.0, 0.0, 0.4),
        cat_frames::FALL => (0.9, 0.15, -0.2),
        _ => (1.0, 0.0, 0.0),
    };

    let body_w = w * 0.7;
    let body_h = h * 0.38 * stretch;
    let body_top = position.y + h / 2.0 - h * 0.18 - body_h;
    draw_rectangle(position.x - body_w / 2.0, body_top, body_w, body_h, color);

    // Legs
    let leg_y = body_top + body_h;
    let leg_len = h * 0.18;
    for (i, x) in [-0.28, 0.2].iter().enumerate() {
        let sign = if i == 0 { 1.0 } else { -1.0 };
        let lx = position.x + x * w * facing;
        let dx = swing * w * sign;
        draw_line(lx, leg_y, lx + dx, leg_y + leg_len, w * 0.08, color);
    }

    // Head
    let head_r = w * 0.2;
    let head = vec2(position.x + body_w * 0.5 * facing, body_top - head_r * 0.3);
    draw_circle(head.x, head.y, head_r, color);
    for ear in [-0.6, 0.6] {
        let ex = head.x + ear * head_r;
        draw_triangle(
            vec2(ex - head_r * 0.35, head.y - head_r * 0.6),
            vec2(ex + head_r * 0.35, head.y - head_r * 0.6),
            vec2(ex, head.y - head_r * 1.4),
            color,
        );
    }
    draw_circle(head.x + head_r * 0.45 * facing, head.y - head_r * 0.1, head_r * 0.15, BLACK);

    // Tail
    let tail_root = vec2(position.x - body_w * 0.5 * facing, body_top + body_h * 0.3);
    let tail_tip = tail_root + vec2(-w * 0.25 * facing, -h * (0.15 + tail * 0.3));
    draw_line(tail_root.x, tail_root.y, tail_tip.x, tail_tip.y, w * 0.07, color);
}

/// Text centered on `(x, y)`.
pub fn draw_text_centered(text: &str, x: f32, y: f32, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(text, x - dims.width / 2.0, y + dims.offset_y / 2.0, size, color);
}
