use chrono::Duration;
use serde::{Serialize, Serializer};
use std::fmt;

/// ISO-8601 time period over whole seconds, as used by the Task Scheduler
/// schema (`PT10M`, `PT1H`, `PT24H`).
///
/// Hours are the largest unit: a full day renders as `PT24H`, never `P1D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    seconds: u64,
}

impl Period {
    pub fn from_seconds(seconds: u64) -> Self {
        Period { seconds }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Period {
            seconds: minutes * 60,
        }
    }

    pub fn from_hours(hours: u64) -> Self {
        Period {
            seconds: hours * 3600,
        }
    }

    /// Negative durations clamp to zero.
    pub(crate) fn from_duration(duration: &Duration) -> Self {
        Period {
            seconds: duration.num_seconds().max(0) as u64,
        }
    }

    pub fn as_seconds(&self) -> u64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;

        f.write_str("PT")?;
        if self.seconds == 0 {
            return f.write_str("0S");
        }
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds > 0 {
            write!(f, "{seconds}S")?;
        }
        Ok(())
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Period;
    use chrono::Duration;

    #[test]
    fn test_zero() {
        assert_eq!(Period::from_seconds(0).to_string(), "PT0S");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(Period::from_minutes(10).to_string(), "PT10M");
    }

    #[test]
    fn test_normalises_minutes_to_hours() {
        assert_eq!(Period::from_minutes(90).to_string(), "PT1H30M");
    }

    #[test]
    fn test_full_day_stays_in_hours() {
        assert_eq!(Period::from_minutes(1440).to_string(), "PT24H");
    }

    #[test]
    fn test_almost_full_day() {
        assert_eq!(Period::from_minutes(1439).to_string(), "PT23H59M");
    }

    #[test]
    fn test_mixed_components() {
        assert_eq!(Period::from_seconds(3725).to_string(), "PT1H2M5S");
    }

    #[test]
    fn test_from_duration() {
        assert_eq!(
            Period::from_duration(&Duration::hours(3)),
            Period::from_hours(3)
        );
    }

    #[test]
    fn test_negative_duration_clamps() {
        assert!(Period::from_duration(&Duration::seconds(-5)).is_zero());
    }
}
