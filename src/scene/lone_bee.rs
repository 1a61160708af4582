use glam::Vec2;

/// How far either side of its anchor the bee travels.
const BOUND: f32 = 300.0;
/// Pixels moved per frame.
const STEP: f32 = 2.0;
/// Resting height of the flight path.
const BASE_Y: f32 = 140.0;
/// Spin, in degrees per pixel of travel.
const SPIN: f32 = 1.2;

/// A single bee moved purely by its transform: it bobs back and forth
/// through a sine and spins with distance, on a fixed (unanimated) sprite.
pub struct LoneBee {
    pub x: f32,
    pub y: f32,
    pub step: f32,
    anchor_x: f32,
    h_ratio: f32,
}

impl LoneBee {
    pub fn new(width: f32, height: f32) -> Self {
        let mut bee = Self {
            x: 0.0,
            y: 0.0,
            step: STEP,
            anchor_x: 0.0,
            h_ratio: 0.0,
        };
        bee.resize(width, height);
        bee
    }

    /// The path is anchored at mid-window; taller windows exaggerate the bob.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.anchor_x = width * 0.5;
        self.h_ratio = (height / BOUND).floor();
    }

    pub fn update(&mut self) {
        let pct = self.x / BOUND;

        if self.x > BOUND || self.x < -BOUND {
            self.step = -self.step;
        }

        self.x += self.step;
        self.y = (self.h_ratio * self.x * pct.sin()).floor() + BASE_Y;
    }

    /// Clockwise rotation in radians.
    pub fn rotation(&self) -> f32 {
        (SPIN * self.x).to_radians()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.anchor_x + self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounces_past_the_bound() {
        let mut bee = LoneBee::new(960.0, 600.0);
        for _ in 0..151 {
            bee.update();
        }
        assert_eq!(bee.x, 302.0);
        assert_eq!(bee.step, STEP);

        bee.update();
        assert_eq!(bee.step, -STEP);
        assert_eq!(bee.x, 300.0);
    }

    #[test]
    fn height_and_spin_follow_travel() {
        // 600 px tall: the bob is doubled.
        let mut bee = LoneBee::new(960.0, 600.0);
        for _ in 0..10 {
            bee.update();
        }
        assert_eq!(bee.x, 20.0);
        // floor(2 * 20 * sin(18 / 300)) + 140
        assert_eq!(bee.y, 142.0);
        assert!((bee.rotation() - 24f32.to_radians()).abs() < 1e-6);
        assert_eq!(bee.center(), Vec2::new(500.0, 142.0));
    }

    #[test]
    fn short_window_flies_flat() {
        let mut bee = LoneBee::new(800.0, 200.0);
        for _ in 0..50 {
            bee.update();
            assert_eq!(bee.y, BASE_Y);
        }
    }
}
