use crate::signal::scheduler::Cadence;

/// Frame scheduler mode: `display` (default) or `timer`.
pub const CADENCE_VAR: &str = "SPRITELOOP_CADENCE";
/// Bee flock size.
pub const BEES_VAR: &str = "SPRITELOOP_BEES";

const DEFAULT_BEES: usize = 15;
const MAX_BEES: usize = 64;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cadence: Cadence,
    pub bee_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cadence: Cadence::Display,
            bee_count: DEFAULT_BEES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(CADENCE_VAR).ok().as_deref(),
            std::env::var(BEES_VAR).ok().as_deref(),
        )
    }

    /// Unrecognized values fall back to defaults with a warning.
    pub fn from_values(cadence: Option<&str>, bees: Option<&str>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = cadence {
            match raw.trim().to_ascii_lowercase().as_str() {
                "display" | "vsync" => settings.cadence = Cadence::Display,
                "timer" | "fallback" => settings.cadence = Cadence::Timer,
                other => log::warn!("{CADENCE_VAR}={other:?} not recognized, using display"),
            }
        }

        if let Some(raw) = bees {
            match raw.trim().parse::<usize>() {
                Ok(n) => settings.bee_count = n.min(MAX_BEES),
                Err(_) => log::warn!("{BEES_VAR}={raw:?} is not a number, using {DEFAULT_BEES}"),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_vars() {
        assert_eq!(Settings::from_values(None, None), Settings::default());
    }

    #[test]
    fn timer_cadence_and_bee_count() {
        let s = Settings::from_values(Some(" Timer "), Some("4"));
        assert_eq!(s.cadence, Cadence::Timer);
        assert_eq!(s.bee_count, 4);
    }

    #[test]
    fn bad_values_fall_back() {
        let s = Settings::from_values(Some("webkit"), Some("lots"));
        assert_eq!(s, Settings::default());
        assert_eq!(Settings::from_values(None, Some("1000")).bee_count, MAX_BEES);
    }
}
