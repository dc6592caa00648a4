//! Volume control
//!
//! Volume range is 0-100%. The engine receives the level directly; mute
//! sends 0 while remembering the level.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Output silenced; `level` is kept
    muted: bool,
}

impl Volume {
    /// Start at `level`, clamped to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Set volume level, clamped to 0-100
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Remembered level, ignoring mute
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Silence output, keeping the level
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Restore output at the remembered level
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level the engine should actually output
    pub fn effective_level(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}
