use crate::error::{DashError, Result};
use crate::reading::Reading;
use std::collections::VecDeque;

/// Default number of readings kept by a dashboard.
pub const DEFAULT_CAPACITY: usize = 5;

/// Upper bound on the up-front allocation; larger windows grow on demand.
const PREALLOCATE_MAX: usize = 64;

/// Fixed-capacity window of the most recent readings, oldest evicted first.
///
/// Readings are kept in insertion order. The window never reorders them, so a
/// clock that steps backwards shows up as-is.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl SampleWindow {
    /// A capacity of zero is bumped to one; the window always holds the latest reading.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity.min(PREALLOCATE_MAX)),
            capacity,
        }
    }

    /// Push a new reading, evicting the oldest if at capacity.
    /// Returns the evicted reading, if any.
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        let evicted = if self.readings.len() == self.capacity {
            self.readings.pop_front()
        } else {
            None
        };
        self.readings.push_back(reading);
        evicted
    }

    /// The most recently pushed reading.
    pub fn latest(&self) -> Result<Reading> {
        self.readings.back().copied().ok_or(DashError::EmptyBuffer)
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Timestamp;
    use chrono::NaiveDate;

    fn reading(value: f64, second: u32) -> Reading {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, second))
            .unwrap();
        Reading::new(value, Timestamp::new(at))
    }

    #[test]
    fn length_is_min_of_pushes_and_capacity() {
        let mut window = SampleWindow::new(3);
        for n in 0..10u32 {
            window.push(reading(n as f64, n));
            assert_eq!(window.len(), (n as usize + 1).min(3));
        }
    }

    #[test]
    fn evicts_oldest_first() {
        let mut window = SampleWindow::new(5);
        let values = [5.1, 6.2, 7.3, 8.4, 9.5, 10.6, 11.7];
        let mut evicted = Vec::new();
        for (i, v) in values.iter().enumerate() {
            evicted.extend(window.push(reading(*v, i as u32)));
        }

        let kept: Vec<f64> = window.iter().map(Reading::value).collect();
        assert_eq!(kept, vec![7.3, 8.4, 9.5, 10.6, 11.7]);
        assert_eq!(evicted.iter().map(Reading::value).collect::<Vec<_>>(), vec![5.1, 6.2]);
        assert_eq!(window.latest().unwrap().value(), 11.7);
    }

    #[test]
    fn empty_window_has_no_latest() {
        let window = SampleWindow::default();
        assert!(matches!(window.latest(), Err(DashError::EmptyBuffer)));
        assert!(window.snapshot().is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = SampleWindow::new(0);
        window.push(reading(1.0, 0));
        window.push(reading(2.0, 1));
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.snapshot(), vec![reading(2.0, 1)]);
    }

    #[test]
    fn huge_capacity_does_not_preallocate() {
        let mut window = SampleWindow::new(usize::MAX);
        assert_eq!(window.capacity(), usize::MAX);
        assert_eq!(window.push(reading(1.0, 0)), None);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn keeps_backwards_clock_and_duplicate_timestamps() {
        let mut window = SampleWindow::new(4);
        window.push(reading(1.0, 30));
        window.push(reading(2.0, 10));
        window.push(reading(3.0, 10));

        let seconds: Vec<String> = window.iter().map(|r| r.timestamp().to_string()).collect();
        assert_eq!(
            seconds,
            vec!["2024-01-01 12:00:30", "2024-01-01 12:00:10", "2024-01-01 12:00:10"]
        );
    }
}
