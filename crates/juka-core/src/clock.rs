//! Wall clock for the menu bar.

/// Time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallTime {
    /// Break seconds-since-midnight (any integer, wrapped) into a time of day.
    pub fn from_day_seconds(secs: i64) -> Self {
        let s = secs.rem_euclid(86_400);
        Self {
            hour: (s / 3600) as u8,
            minute: ((s % 3600) / 60) as u8,
            second: (s % 60) as u8,
        }
    }

    /// `HH:MM`, as shown in the menu.
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Source of the current time.
pub trait TimeService {
    fn now(&self) -> WallTime;
}

/// System clock shifted by a fixed UTC offset. The host timezone is not
/// read, so kiosks outside UTC set `utc_offset_minutes` in `juka.toml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub utc_offset_minutes: i32,
}

impl SystemClock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }
}

impl TimeService for SystemClock {
    fn now(&self) -> WallTime {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        local_time(secs, self.utc_offset_minutes)
    }
}

/// Time of day for `unix_secs` shifted by the kiosk's UTC offset.
fn local_time(unix_secs: u64, utc_offset_minutes: i32) -> WallTime {
    let day = (unix_secs % 86_400) as i64;
    WallTime::from_day_seconds(day + i64::from(utc_offset_minutes) * 60)
}
