use chrono::{Duration, NaiveDateTime};

/// Compute the duration between each consecutive pair of recurrences, and
/// the same list with consecutive duplicates removed.
///
/// Example:
///
///   input = 01:00, 02:00, 03:00, 04:00, 06:00, 08:00
///   differences = 1H, 1H, 1H, 2H, 2H
///   compact     = 1H, 2H
pub(crate) fn compile_differences(
    recurrences: &[NaiveDateTime],
) -> (Vec<Duration>, Vec<Duration>) {
    if recurrences.len() < 2 {
        return (Vec::new(), Vec::new());
    }
    let mut differences = Vec::with_capacity(recurrences.len() - 1);
    for pair in recurrences.windows(2) {
        differences.push(pair[1] - pair[0]);
    }

    let mut compact = Vec::with_capacity(differences.len());
    let mut previous = Duration::zero();
    for difference in &differences {
        if *difference != previous {
            compact.push(*difference);
            previous = *difference;
        }
    }
    (differences, compact)
}

/// How a day's recurrences can be expressed as a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Repetition {
    /// One recurrence only.
    Single(NaiveDateTime),
    /// Constant inter-arrival: a start, an interval and a total span.
    Uniform {
        start: NaiveDateTime,
        interval: Duration,
        duration: Duration,
    },
    /// Anything else: each recurrence needs its own trigger.
    Irregular,
}

/// Decide whether the recurrences collapse into a single repetition
/// pattern. A span of 1439 minutes is promoted to a full 24 hours: the
/// scheduler balks at the 23H59M period a midnight-to-23:59 day produces.
pub(crate) fn detect(recurrences: &[NaiveDateTime]) -> Repetition {
    if let [only] = recurrences {
        return Repetition::Single(*only);
    }
    let (_, compact) = compile_differences(recurrences);
    if let [interval] = compact.as_slice() {
        let first = recurrences[0];
        let last = recurrences[recurrences.len() - 1];
        let mut duration = last - first;
        if duration == Duration::minutes(1439) {
            duration = Duration::minutes(1440);
        }
        return Repetition::Uniform {
            start: first,
            interval: *interval,
            duration,
        };
    }
    Repetition::Irregular
}
