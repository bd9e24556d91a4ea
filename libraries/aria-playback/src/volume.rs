//! Volume level handling
//!
//! Volume is a linear level in 0.0-1.0, passed to the output device as is.
//! The mute toggle is stateless: from 0 it always restores a
//! fixed level, it does not remember what the level was before muting.

/// Linear volume level (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create a volume level, clamped into range
    ///
    /// Non-finite input yields silence.
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level).unwrap_or(0.0),
        }
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set level, returning whether it was accepted
    ///
    /// Out-of-range values are clamped; NaN and infinities are rejected
    /// and leave the level untouched.
    pub fn set_level(&mut self, level: f32) -> bool {
        match Self::clamp(level) {
            Some(level) => {
                self.level = level;
                true
            }
            None => false,
        }
    }

    /// Whether the level is exactly zero
    pub fn is_muted(&self) -> bool {
        self.level == 0.0
    }

    /// Level the mute button moves to from the current one
    pub fn toggled_mute(&self, restore_level: f32) -> f32 {
        if self.is_muted() {
            Self::clamp(restore_level).unwrap_or(0.0)
        } else {
            0.0
        }
    }

    fn clamp(level: f32) -> Option<f32> {
        level.is_finite().then(|| level.clamp(0.0, 1.0))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::default();
        assert_eq!(vol.level(), 0.7);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);
        assert!(vol.set_level(0.25));
        assert_eq!(vol.level(), 0.25);

        assert!(vol.set_level(1.5));
        assert_eq!(vol.level(), 1.0);

        assert!(vol.set_level(-0.3));
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn non_finite_levels_are_rejected() {
        let mut vol = Volume::new(0.4);
        assert!(!vol.set_level(f32::NAN));
        assert!(!vol.set_level(f32::INFINITY));
        assert_eq!(vol.level(), 0.4);

        assert_eq!(Volume::new(f32::NAN).level(), 0.0);
    }

    #[test]
    fn mute_toggle_restores_fixed_level() {
        let vol = Volume::new(0.35);
        assert_eq!(vol.toggled_mute(0.7), 0.0);

        let muted = Volume::new(0.0);
        assert!(muted.is_muted());
        // Not 0.35: the previous level is not remembered
        assert_eq!(muted.toggled_mute(0.7), 0.7);
    }
}
