//! Clock face formatting.
//!
//! Times are rounded *up* to the next tenth of a second so a clock never shows
//! `0:00.0` while the flag has not fallen yet.

use std::time::Duration;

const NANOS_PER_TENTH: u128 = 100_000_000;

/// `m:ss.t`, minutes are not wrapped into hours (`125:00.0`).
pub fn clock_face(time: Duration) -> String {
    let (min, sec, tenths) = split(time);
    format!("{min}:{sec:02}.{tenths}")
}

/// `m:ss` without tenths, rounded up to the next full second.
pub fn short(time: Duration) -> String {
    let nanos = time.as_nanos();
    let secs = nanos.div_ceil(1_000_000_000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn split(time: Duration) -> (u128, u128, u128) {
    let tenths = time.as_nanos().div_ceil(NANOS_PER_TENTH);
    let secs = tenths / 10;
    (secs / 60, secs % 60, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_minutes() {
        assert_eq!(clock_face(Duration::from_secs(90 * 60)), "90:00.0");
        assert_eq!(short(Duration::from_secs(300)), "5:00");
    }

    #[test]
    fn rounds_up_to_next_tenth() {
        assert_eq!(clock_face(Duration::from_millis(59_901)), "1:00.0");
        assert_eq!(clock_face(Duration::from_millis(9_050)), "0:09.1");
        assert_eq!(clock_face(Duration::from_nanos(1)), "0:00.1");
        assert_eq!(clock_face(Duration::ZERO), "0:00.0");
    }

    #[test]
    fn short_rounds_up_to_next_second() {
        assert_eq!(short(Duration::from_millis(29_001)), "0:30");
        assert_eq!(short(Duration::ZERO), "0:00");
    }
}
