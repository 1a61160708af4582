pub mod flock;
pub mod lone_bee;
pub mod plumber;

use glam::Vec2;

use crate::anim::clips::{self, Clip};
use crate::anim::{AnimError, FrameAnimator};
use crate::input::{Key, KeyAction};
use crate::render::atlas::{Sheet, SpriteAtlas, CELL, SOURCE_EXTENT};
use crate::render::instance::SpriteInstance;
use crate::signal::FrameHub;

use self::flock::BeeFlock;
use self::lone_bee::LoneBee;
use self::plumber::Plumber;

/// Resting x of the enemy's oscillation.
const ENEMY_HOME_X: f32 = 500.0;
/// Half-width of the enemy's oscillation.
const ENEMY_REACH: f32 = 50.0;
/// Phase advance of the enemy per frame.
const ENEMY_PHASE_STEP: f32 = 0.015;
/// Where the marquee runners stand.
const RUNNER_RIGHT_POS: Vec2 = Vec2::new(40.0, 40.0);
const RUNNER_LEFT_POS: Vec2 = Vec2::new(120.0, 40.0);

/// Floor tiles repeat at the visible brick size.
const BRICK_STEP: f32 = SOURCE_EXTENT;

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

/// Walks in place while drifting back and forth along a sine.
pub struct Enemy {
    pub animator: FrameAnimator,
    pub phase: f32,
}

impl Enemy {
    fn new() -> Self {
        Self {
            animator: FrameAnimator::new(),
            phase: 0.0,
        }
    }

    pub fn x(&self) -> f32 {
        ENEMY_HOME_X + self.phase.sin() * ENEMY_REACH
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// A stationary sprite that only cycles its frames.
pub struct Runner {
    pub pos: Vec2,
    pub animator: FrameAnimator,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Everything on screen, independent of the window and GPU.
pub struct Scene {
    width: f32,
    floor_y: f32,
    pub plumber: Plumber,
    pub enemy: Enemy,
    pub runners: [Runner; 2],
    pub flock: BeeFlock,
    pub lone_bee: LoneBee,
}

impl Scene {
    pub fn new(width: f32, height: f32, bee_count: usize) -> Self {
        Self {
            width,
            floor_y: floor_y(height),
            plumber: Plumber::new(),
            enemy: Enemy::new(),
            runners: [
                Runner {
                    pos: RUNNER_RIGHT_POS,
                    animator: FrameAnimator::new(),
                },
                Runner {
                    pos: RUNNER_LEFT_POS,
                    animator: FrameAnimator::new(),
                },
            ],
            flock: BeeFlock::new(bee_count, width, height),
            lone_bee: LoneBee::new(width, height),
        }
    }

    /// Activate every animator against `hub`.
    pub fn start(&mut self, hub: &mut FrameHub, now_ms: f64) -> Result<(), AnimError> {
        self.plumber.spawn(hub, now_ms)?;
        self.enemy
            .animator
            .activate(Clip::EnemyWalk.spec(), hub, now_ms)?;
        self.runners[0]
            .animator
            .activate(Clip::RunRight.spec(), hub, now_ms)?;
        self.runners[1]
            .animator
            .activate(clips::quick_run_left(), hub, now_ms)?;
        log::info!(
            "scene started: {} bees, floor at y={}",
            self.flock.bees.len(),
            self.floor_y
        );
        Ok(())
    }

    /// Stop every animator and drop their registrations.
    pub fn stop(&mut self, hub: &mut FrameHub) {
        self.plumber.animator.stop(hub);
        self.enemy.animator.stop(hub);
        for runner in &mut self.runners {
            runner.animator.stop(hub);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.floor_y = floor_y(height);
        self.flock.resize(width, height);
        self.lone_bee.resize(width, height);
    }

    /// Animators currently registered for frame ticks.
    pub fn running_animators(&self) -> usize {
        std::iter::once(&self.plumber.animator)
            .chain(std::iter::once(&self.enemy.animator))
            .chain(self.runners.iter().map(|r| &r.animator))
            .filter(|a| a.is_running())
            .count()
    }

    #[cfg(test)]
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        action: KeyAction,
        hub: &mut FrameHub,
        now_ms: f64,
    ) -> Result<(), AnimError> {
        self.plumber.handle_key(key, action, hub, now_ms)
    }

    /// Per-frame world update. Animators advance separately via the hub.
    pub fn update(&mut self) {
        self.plumber.update(self.width - SOURCE_EXTENT);
        self.enemy.phase += ENEMY_PHASE_STEP;
        self.flock.update();
        self.lone_bee.update();
    }

    /// Rebuild the instance list, back to front.
    pub fn build_instances(&self, atlas: &SpriteAtlas, out: &mut Vec<SpriteInstance>) {
        out.clear();

        // Floor: two rows of bricks.
        let brick = atlas.source_rect(Sheet::Brick, 0.0);
        let tiles = (self.width / BRICK_STEP).ceil() as usize;
        for row in 0..2 {
            let y = self.floor_y + row as f32 * BRICK_STEP;
            for i in 0..tiles {
                out.push(SpriteInstance::at_top_left(
                    brick,
                    Vec2::new(i as f32 * BRICK_STEP, y),
                    Vec2::splat(BRICK_STEP),
                ));
            }
        }

        for runner in &self.runners {
            out.push(SpriteInstance::from_animator(
                atlas,
                Sheet::Plumber,
                &runner.animator,
                runner.pos,
            ));
        }

        let ground = self.floor_y - CELL as f32;
        out.push(SpriteInstance::from_animator(
            atlas,
            Sheet::Enemy,
            &self.enemy.animator,
            Vec2::new(self.enemy.x(), ground),
        ));
        out.push(SpriteInstance::from_animator(
            atlas,
            Sheet::Plumber,
            &self.plumber.animator,
            Vec2::new(self.plumber.x, ground),
        ));

        let bee = atlas.source_rect(Sheet::Bee, 0.0);
        let half = Vec2::splat(SOURCE_EXTENT * 0.5);
        out.push(
            SpriteInstance::at_top_left(
                bee,
                self.lone_bee.center() - half,
                Vec2::splat(SOURCE_EXTENT),
            )
            .rotated(self.lone_bee.rotation()),
        );
        for pose in self.flock.poses() {
            out.push(
                SpriteInstance::at_top_left(
                    bee,
                    pose.center - half,
                    Vec2::splat(SOURCE_EXTENT),
                )
                .rotated(pose.rotation)
                .scaled_x(pose.scale_x),
            );
        }
    }
}

/// Top of the two-brick floor strip.
fn floor_y(height: f32) -> f32 {
    height - CELL as f32 * 2.0
}
