use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::anim::FrameAnimator;
use crate::render::atlas::{Sheet, SpriteAtlas, SOURCE_EXTENT};

/// Per-instance data uploaded to GPU each frame.
/// Stride = 36 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Screen position of the quad center (x, y).
    pub position: [f32; 2],
    /// Destination size in pixels. Negative width mirrors horizontally.
    pub size: [f32; 2],
    /// Source rectangle in atlas pixels (x, y, w, h).
    pub source: [f32; 4],
    /// Rotation in radians, clockwise on screen.
    pub rotation: f32,
}

impl SpriteInstance {
    /// A sprite whose destination box has its top-left corner at `top_left`.
    pub fn at_top_left(source: [f32; 4], top_left: Vec2, size: Vec2) -> Self {
        Self {
            position: (top_left + size * 0.5).into(),
            size: size.into(),
            source,
            rotation: 0.0,
        }
    }

    /// Draw the animator's current frame out of `sheet`.
    pub fn from_animator(
        atlas: &SpriteAtlas,
        sheet: Sheet,
        animator: &FrameAnimator,
        top_left: Vec2,
    ) -> Self {
        Self::at_top_left(
            atlas.source_rect(sheet, animator.source_offset()),
            top_left,
            Vec2::splat(SOURCE_EXTENT),
        )
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mirror horizontally when `scale_x` is negative.
    pub fn scaled_x(mut self, scale_x: f32) -> Self {
        self.size[0] *= scale_x;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::AnimationSpec;
    use crate::signal::FrameHub;

    #[test]
    fn stride_matches_pipeline_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 36);
    }

    #[test]
    fn animator_frame_selects_source_column() {
        let atlas = SpriteAtlas::generate();
        let mut hub = FrameHub::new();
        let mut anim = FrameAnimator::new();
        anim.activate(AnimationSpec::cycle(6, 9, 325.0, 40.0), &mut hub, 0.0)
            .unwrap();

        let inst = SpriteInstance::from_animator(&atlas, Sheet::Plumber, &anim, Vec2::new(10.0, 20.0));
        assert_eq!(inst.source[0], 240.0);
        assert_eq!(inst.source[1], 0.0);
        assert_eq!(inst.position, [10.0 + 19.5, 20.0 + 19.5]);
    }

    #[test]
    fn negative_scale_mirrors_width() {
        let inst = SpriteInstance::at_top_left([0.0; 4], Vec2::ZERO, Vec2::new(40.0, 40.0))
            .scaled_x(-1.0)
            .rotated(1.5);
        assert_eq!(inst.size, [-40.0, 40.0]);
        assert_eq!(inst.rotation, 1.5);
    }
}
