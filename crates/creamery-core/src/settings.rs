//! Player settings as an explicit, owned value.
//!
//! Audio and persistence knobs live in a plain [`Settings`] struct handed
//! to whichever component needs it. The coordinating layer owns the single
//! process-wide instance; nothing in this crate keeps module-level mutable
//! state. Settings are stored separately from the save record.

/// Process-wide player preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// 0.0..=1.0 scalar applied to all audio.
    pub master_volume: f32,
    pub music_volume: f32,
    pub effects_volume: f32,
    pub muted: bool,
    /// How often the coordinating layer persists, in seconds.
    pub autosave_interval_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.7,
            effects_volume: 1.0,
            muted: false,
            autosave_interval_secs: 30,
        }
    }
}

impl Settings {
    /// Back to defaults, in place.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_defaults() {
        let mut s = Settings::default();
        s.muted = true;
        s.master_volume = 0.1;
        s.reset();
        assert_eq!(s, Settings::default());
    }
}
