use super::AnimationSpec;

/// Every sprite-sheet frame is a 40 px block.
pub const BLOCK: f32 = 40.0;

/// Length of one full run cycle.
const RUN_MS: f64 = 325.0;

/// Named clips of the plumber and enemy sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    RunRight,
    RunLeft,
    StandLeft,
    StandRight,
    JumpLeft,
    JumpRight,
    EnemyWalk,
}

impl Clip {
    #[cfg(test)]
    pub const ALL: [Clip; 7] = [
        Clip::RunRight,
        Clip::RunLeft,
        Clip::StandLeft,
        Clip::StandRight,
        Clip::JumpLeft,
        Clip::JumpRight,
        Clip::EnemyWalk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Clip::RunRight => "run_right",
            Clip::RunLeft => "run_left",
            Clip::StandLeft => "stand_left",
            Clip::StandRight => "stand_right",
            Clip::JumpLeft => "jump_left",
            Clip::JumpRight => "jump_right",
            Clip::EnemyWalk => "enemy_walk",
        }
    }

    pub fn spec(self) -> AnimationSpec {
        match self {
            Clip::RunRight => AnimationSpec::cycle(6, 9, RUN_MS, BLOCK),
            Clip::RunLeft => AnimationSpec::cycle(2, 5, RUN_MS, BLOCK),
            Clip::StandLeft => AnimationSpec::pose(2, BLOCK),
            Clip::StandRight => AnimationSpec::pose(6, BLOCK),
            Clip::JumpLeft => AnimationSpec::pose(11, BLOCK),
            Clip::JumpRight => AnimationSpec::pose(0, BLOCK),
            Clip::EnemyWalk => AnimationSpec::cycle(0, 1, RUN_MS, BLOCK),
        }
    }
}

/// The faster left-running variant used by the marquee runners.
pub fn quick_run_left() -> AnimationSpec {
    AnimationSpec::cycle(2, 5, 200.0, BLOCK)
}
