use glam::Vec2;

/// Horizontal step of the whole flock per frame.
const FLOCK_DX: f32 = 3.0;
/// Spacing between bees along x.
const BEE_SPACING: f32 = 55.0;
/// X offset of the first bee.
const FIRST_BEE_X: f32 = 150.0;
/// Per-bee phase multiplier in the sine stagger.
const STAGGER: f32 = 0.7;
/// Sprites are drawn nose-up; this turns the nose toward the heading.
const NOSE_UP: f32 = 1.57;

/// One bee's resting slot and last drawn height.
#[derive(Debug, Clone, Copy)]
pub struct Bee {
    pub offset_x: f32,
    pub y: f32,
    pub dy: f32,
}

/// A row of bees sharing one sweeping x offset, each staggered vertically.
pub struct BeeFlock {
    pub bees: Vec<Bee>,
    /// Shared sweep offset in `[-span, span]`.
    pub x: f32,
    pub dx: f32,
    /// +1 or -1; mirrors every bee when the sweep reverses.
    pub scale: f32,
    span: f32,
    center_y: f32,
}

/// Where to draw one bee this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeePose {
    pub center: Vec2,
    pub rotation: f32,
    pub scale_x: f32,
}

impl BeeFlock {
    pub fn new(count: usize, width: f32, height: f32) -> Self {
        let bees = (0..count)
            .map(|i| Bee {
                offset_x: FIRST_BEE_X + i as f32 * BEE_SPACING,
                y: 0.0,
                dy: 0.0,
            })
            .collect();
        let mut flock = Self {
            bees,
            x: 0.0,
            dx: FLOCK_DX,
            scale: 1.0,
            span: 0.0,
            center_y: 0.0,
        };
        flock.resize(width, height);
        flock
    }

    /// The sweep covers the full window width either side of its start.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.span = width.max(FLOCK_DX * 2.0);
        self.center_y = height * 0.4;
    }

    /// Advance the sweep one frame and recompute every bee's height.
    pub fn update(&mut self) {
        // Stagger uses where the sweep was before this frame's step.
        let pct = self.x / self.span;

        if self.x > self.span || self.x < -self.span {
            self.dx = -self.dx;
            self.scale = -self.scale;
        }
        self.x += self.dx;

        for (i, bee) in self.bees.iter_mut().enumerate() {
            let phase = (1.5 - pct.abs()) * i as f32 * STAGGER;
            let y = self.x * phase.sin() + self.center_y;
            bee.dy = y - bee.y;
            bee.y = y;
        }
    }

    pub fn poses(&self) -> impl Iterator<Item = BeePose> + '_ {
        self.bees.iter().map(move |bee| BeePose {
            center: Vec2::new(self.x + bee.offset_x, bee.y),
            rotation: bee.dy.atan2(self.dx) + NOSE_UP,
            scale_x: self.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bees_are_spread_along_x() {
        let flock = BeeFlock::new(3, 800.0, 600.0);
        let xs: Vec<f32> = flock.bees.iter().map(|b| b.offset_x).collect();
        assert_eq!(xs, vec![150.0, 205.0, 260.0]);
    }

    #[test]
    fn sweep_reverses_and_mirrors_past_span() {
        let mut flock = BeeFlock::new(1, 300.0, 600.0);
        // span = 300, steps of 3: passes +300 after 101 frames.
        for _ in 0..101 {
            flock.update();
        }
        assert_eq!(flock.x, 303.0);
        assert_eq!(flock.scale, 1.0);

        flock.update();
        assert_eq!(flock.dx, -FLOCK_DX);
        assert_eq!(flock.scale, -1.0);
        assert_eq!(flock.x, 300.0);
        assert!(flock.poses().all(|p| p.scale_x == -1.0));
    }

    #[test]
    fn first_bee_flies_level() {
        // Bee 0 has zero phase, so it stays on the center line.
        let mut flock = BeeFlock::new(4, 800.0, 500.0);
        for _ in 0..10 {
            flock.update();
            assert_eq!(flock.bees[0].y, 200.0);
        }
        let pose = flock.poses().next().unwrap();
        assert!((pose.rotation - NOSE_UP).abs() < 1e-6);
    }

    #[test]
    fn stagger_uses_the_position_before_the_step() {
        let mut flock = BeeFlock::new(2, 300.0, 500.0);
        for _ in 0..10 {
            flock.update();
        }
        // Frame 10 steps from x = 27 to x = 30.
        let phase = (1.5 - 27.0f32 / 300.0) * STAGGER;
        assert_eq!(flock.bees[1].y, 30.0 * phase.sin() + 200.0);
    }
}
