/// Source of the current calendar date used to default task dates.
pub trait Clock: Send + Sync {
    /// Today's date formatted as `YYYY-MM-DD`.
    fn today(&self) -> String;
}

/// Reads the server clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        chrono::Utc::now().format("%Y-%m-%d").to_string()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: String,
}

impl FixedClock {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.date.clone()
    }
}
