use turnscope_types::{DayHour, Error, HourOfDay, Result, WindowStart};

/// Maps a session's start time to the key of the bin it falls in.
pub trait KeyScheme {
    type Key: Ord + Copy;

    fn key_for(&self, start_time: f64) -> Self::Key;
}

/// `floor((start mod 86400) / 3600)`; folds every day onto 24 bins
#[derive(Debug, Clone, Copy, Default)]
pub struct HourOfDayScheme;

impl KeyScheme for HourOfDayScheme {
    type Key = HourOfDay;

    fn key_for(&self, start_time: f64) -> HourOfDay {
        HourOfDay::of(start_time)
    }
}

/// `floor(start / width) * width`; one bin per window along the trace
#[derive(Debug, Clone, Copy)]
pub struct TraceWindowScheme {
    width: u64,
}

impl TraceWindowScheme {
    pub fn new(width: u64) -> Result<Self> {
        if width == 0 {
            return Err(Error::configuration("bin_width must be positive"));
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> u64 {
        self.width
    }
}

impl KeyScheme for TraceWindowScheme {
    type Key = WindowStart;

    fn key_for(&self, start_time: f64) -> WindowStart {
        WindowStart::of(start_time, self.width)
    }
}

/// (calendar day, hour of day); feeds the variance decomposition
#[derive(Debug, Clone, Copy, Default)]
pub struct DayHourScheme;

impl KeyScheme for DayHourScheme {
    type Key = DayHour;

    fn key_for(&self, start_time: f64) -> DayHour {
        DayHour::of(start_time)
    }
}
