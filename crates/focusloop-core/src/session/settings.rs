use serde::{Deserialize, Serialize};

use super::state::SessionType;
use crate::error::ValidationError;

pub const DEFAULT_POMODORO_SECS: u64 = 25 * 60;
pub const DEFAULT_SHORT_BREAK_SECS: u64 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECS: u64 = 15 * 60;
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

/// Session lengths (in seconds) and the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub pomodoro_duration: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
    /// Completed pomodoros after which a long break replaces a short one.
    pub long_break_interval: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_duration: DEFAULT_POMODORO_SECS,
            short_break_duration: DEFAULT_SHORT_BREAK_SECS,
            long_break_duration: DEFAULT_LONG_BREAK_SECS,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

impl Settings {
    /// Seconds allotted to a session of the given type.
    pub fn duration_for(&self, session_type: SessionType) -> u64 {
        match session_type {
            SessionType::Pomodoro => self.pomodoro_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Merge a partial update; fields absent from `patch` are kept.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            pomodoro_duration: patch.pomodoro_duration.unwrap_or(self.pomodoro_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch
                .long_break_duration
                .unwrap_or(self.long_break_duration),
            long_break_interval: patch
                .long_break_interval
                .unwrap_or(self.long_break_interval),
        }
    }

    /// Every duration and the interval must be positive.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let durations = [
            ("pomodoroDuration", self.pomodoro_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
        ];
        for (field, secs) in durations {
            if secs == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "duration must be at least one second".to_string(),
                });
            }
        }
        if self.long_break_interval == 0 {
            return Err(ValidationError::InvalidValue {
                field: "longBreakInterval".to_string(),
                message: "interval must be at least one pomodoro".to_string(),
            });
        }
        Ok(())
    }
}

/// Free-function form of [`Settings::duration_for`].
pub fn duration_for(session_type: SessionType, settings: &Settings) -> u64 {
    settings.duration_for(session_type)
}

/// Partial settings update. `None` leaves the current value in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_interval: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = Settings::default();
        assert_eq!(s.pomodoro_duration, 1500);
        assert_eq!(s.short_break_duration, 300);
        assert_eq!(s.long_break_duration, 900);
        assert_eq!(s.long_break_interval, 4);
    }

    #[test]
    fn duration_for_maps_each_type() {
        let s = Settings::default();
        assert_eq!(duration_for(SessionType::Pomodoro, &s), 1500);
        assert_eq!(duration_for(SessionType::ShortBreak, &s), 300);
        assert_eq!(duration_for(SessionType::LongBreak, &s), 900);
    }

    #[test]
    fn merged_keeps_unspecified_fields() {
        let patch = SettingsPatch {
            short_break_duration: Some(120),
            ..Default::default()
        };
        let s = Settings::default().merged(&patch);
        assert_eq!(s.short_break_duration, 120);
        assert_eq!(s.pomodoro_duration, 1500);
        assert_eq!(s.long_break_interval, 4);
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let s = Settings {
            long_break_interval: 0,
            ..Default::default()
        };
        let err = s.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "longBreakInterval"
        ));
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let s = Settings {
            long_break_duration: 0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn patch_deserializes_partial_json() {
        let patch: SettingsPatch = serde_json::from_str(r#"{"pomodoroDuration":1200}"#).unwrap();
        assert_eq!(patch.pomodoro_duration, Some(1200));
        assert!(patch.long_break_interval.is_none());
        assert!(!patch.is_empty());
        assert!(SettingsPatch::default().is_empty());
    }
}
