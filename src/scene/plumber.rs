use crate::anim::clips::Clip;
use crate::anim::{AnimError, FrameAnimator};
use crate::input::{Key, KeyAction};
use crate::signal::FrameHub;

/// Walk speed in pixels per delivered frame.
pub const SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    fn run(self) -> Clip {
        match self {
            Facing::Left => Clip::RunLeft,
            Facing::Right => Clip::RunRight,
        }
    }

    fn stand(self) -> Clip {
        match self {
            Facing::Left => Clip::StandLeft,
            Facing::Right => Clip::StandRight,
        }
    }

    fn jump(self) -> Clip {
        match self {
            Facing::Left => Clip::JumpLeft,
            Facing::Right => Clip::JumpRight,
        }
    }
}

/// The keyboard-driven character.
pub struct Plumber {
    pub x: f32,
    pub facing: Facing,
    pub animator: FrameAnimator,
    /// Arrow currently driving movement. A second arrow is ignored until release.
    held: Option<Facing>,
    jumping: bool,
    clip: Clip,
}

impl Plumber {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            facing: Facing::Right,
            animator: FrameAnimator::new(),
            held: None,
            jumping: false,
            clip: Clip::StandRight,
        }
    }

    /// Put the plumber in its opening pose.
    pub fn spawn(&mut self, hub: &mut FrameHub, now_ms: f64) -> Result<(), AnimError> {
        self.x = 0.0;
        self.facing = Facing::Right;
        self.held = None;
        self.jumping = false;
        self.play(Clip::StandRight, hub, now_ms)
    }

    #[cfg(test)]
    pub fn clip(&self) -> Clip {
        self.clip
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        action: KeyAction,
        hub: &mut FrameHub,
        now_ms: f64,
    ) -> Result<(), AnimError> {
        match (key, action) {
            (Key::Left | Key::Right, KeyAction::Pressed) => {
                if self.held.is_some() {
                    return Ok(());
                }
                let dir = if key == Key::Left {
                    Facing::Left
                } else {
                    Facing::Right
                };
                self.held = Some(dir);
                self.facing = dir;
                if !self.jumping {
                    self.play(dir.run(), hub, now_ms)?;
                }
            }
            (Key::Left | Key::Right, KeyAction::Released) => {
                // Either arrow releases movement; the run frame freezes where it is.
                self.held = None;
                if !self.jumping {
                    self.animator.stop(hub);
                }
            }
            (Key::Up, KeyAction::Pressed) => {
                if !self.jumping {
                    self.jumping = true;
                    self.play(self.facing.jump(), hub, now_ms)?;
                }
            }
            (Key::Up, KeyAction::Released) => {
                if self.jumping {
                    self.jumping = false;
                    let clip = match self.held {
                        Some(dir) => dir.run(),
                        None => self.facing.stand(),
                    };
                    self.play(clip, hub, now_ms)?;
                }
            }
            (Key::Escape, _) => {}
        }
        Ok(())
    }

    /// Advance position by one frame, keeping the sprite inside `[0, max_x]`.
    pub fn update(&mut self, max_x: f32) {
        match self.held {
            Some(Facing::Left) => self.x -= SPEED,
            Some(Facing::Right) => self.x += SPEED,
            None => {}
        }
        self.x = self.x.clamp(0.0, max_x.max(0.0));
    }

    fn play(&mut self, clip: Clip, hub: &mut FrameHub, now_ms: f64) -> Result<(), AnimError> {
        self.animator.activate(clip.spec(), hub, now_ms)?;
        if clip != self.clip {
            log::info!("plumber: {} -> {}", self.clip.label(), clip.label());
        }
        self.clip = clip;
        Ok(())
    }
}

impl Default for Plumber {
    fn default() -> Self {
        Self::new()
    }
}
