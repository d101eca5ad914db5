use blockyard_common::CellCoord;
use blockyard_cull::VisibleCell;
use glam::{Mat4, Vec3};

use crate::scene::{JointTree, SceneError, ShapeKind};
use crate::surface::{Surface, TextureSlot};

/// Backend draw contract: one box of `2 * half_extents` centered at `center`.
pub trait VolumeSink {
    fn draw_unit_volume(&mut self, center: Vec3, half_extents: Vec3, surface: &Surface);
}

/// A recorded `draw_unit_volume` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub surface: Surface,
}

/// Sink that keeps every call; used for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_with(&self, texture: TextureSlot) -> usize {
        self.calls
            .iter()
            .filter(|c| c.surface.texture_weight > 0.0 && c.surface.texture == texture)
            .count()
    }

    /// Human-readable tally of the recorded frame.
    pub fn summary(&self) -> String {
        let flat = self
            .calls
            .iter()
            .filter(|c| c.surface.texture_weight == 0.0)
            .count();
        format!(
            "draws={} stone={} grass={} slate={} flat={}",
            self.calls.len(),
            self.count_with(TextureSlot::Stone),
            self.count_with(TextureSlot::Grass),
            self.count_with(TextureSlot::Slate),
            flat
        )
    }
}

impl VolumeSink for RecordingSink {
    fn draw_unit_volume(&mut self, center: Vec3, half_extents: Vec3, surface: &Surface) {
        self.calls.push(DrawCall {
            center,
            half_extents,
            surface: *surface,
        });
    }
}

const SKY_COLOR: [f32; 4] = [0.22, 0.45, 0.90, 1.0];
const GEM_COLOR: [f32; 4] = [1.0, 0.85, 0.15, 1.0];
const BEACON_COLOR: [f32; 4] = [1.0, 0.95, 0.25, 1.0];
const GROUND_THICKNESS: f32 = 0.05;

/// Turns the visible cell set and the fixed scenery into volume draws.
#[derive(Debug, Clone)]
pub struct WorldPainter {
    world_size: usize,
    shrine: JointTree,
}

impl WorldPainter {
    /// Columns at least this tall get the slate texture.
    pub const SLATE_HEIGHT: u8 = 3;

    pub fn new(world_size: usize, goal: CellCoord) -> Result<Self, SceneError> {
        Ok(Self {
            world_size,
            shrine: shrine_tree(goal)?,
        })
    }

    pub fn texture_for_height(height: u8) -> TextureSlot {
        if height >= Self::SLATE_HEIGHT {
            TextureSlot::Slate
        } else {
            TextureSlot::Stone
        }
    }

    /// Draw one frame: sky, ground, visible columns, then the shrine.
    pub fn paint_frame(&self, visible: &[VisibleCell], sink: &mut impl VolumeSink) {
        let half = self.world_size as f32 / 2.0;

        sink.draw_unit_volume(
            Vec3::new(half, 2.0, half),
            Vec3::splat(60.0),
            &Surface::solid(SKY_COLOR),
        );
        sink.draw_unit_volume(
            Vec3::new(half, -GROUND_THICKNESS, half),
            Vec3::new(half, GROUND_THICKNESS, half),
            &Surface::textured(TextureSlot::Grass),
        );

        let mut blocks = 0;
        for cell in visible.iter().filter(|c| c.height > 0) {
            let surface = Surface::textured(Self::texture_for_height(cell.height));
            let base = cell.coord.center();
            for y in 0..cell.height {
                sink.draw_unit_volume(
                    Vec3::new(base.x, y as f32 + 0.5, base.y),
                    Vec3::splat(0.5),
                    &surface,
                );
                blocks += 1;
            }
        }

        for prim in self.shrine.primitives() {
            if let Some((center, half_extents)) = prim.as_unit_volume() {
                sink.draw_unit_volume(center, half_extents, &prim.surface);
            }
        }
        tracing::trace!(blocks, "frame painted");
    }
}

/// The goal marker: a slate plinth with a gold gem and a tall beacon above it.
fn shrine_tree(goal: CellCoord) -> Result<JointTree, SceneError> {
    let c = goal.center();
    let mut tree = JointTree::new();

    let plinth = tree.add_root("plinth", Mat4::from_translation(Vec3::new(c.x, 0.5, c.y)))?;
    tree.attach(
        plinth,
        ShapeKind::Cube,
        Mat4::from_scale(Vec3::splat(0.5)),
        Surface::textured(TextureSlot::Slate),
    )?;

    let gem = tree.add_child(plinth, "gem", Mat4::from_translation(Vec3::Y))?;
    tree.attach(
        gem,
        ShapeKind::Cube,
        Mat4::from_scale(Vec3::splat(0.35)),
        Surface::solid(GEM_COLOR),
    )?;

    let pole = tree.add_child(plinth, "beacon", Mat4::from_translation(Vec3::new(0.0, 2.5, 0.0)))?;
    tree.attach(
        pole,
        ShapeKind::Cube,
        Mat4::from_scale(Vec3::new(0.12, 2.0, 0.12)),
        Surface::solid(BEACON_COLOR),
    )?;

    let lamp = tree.add_child(pole, "lamp", Mat4::from_translation(Vec3::new(0.0, 2.2, 0.0)))?;
    tree.attach(
        lamp,
        ShapeKind::Cube,
        Mat4::from_scale(Vec3::splat(0.25)),
        Surface::solid(BEACON_COLOR),
    )?;

    Ok(tree)
}
