//! Source of "today" for predictions.

use chrono::{Local, NaiveDate, Utc};

use crate::config::Timezone;

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the wall clock in the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    pub timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.timezone {
            Timezone::Utc => Utc::now().date_naive(),
            Timezone::Local => Local::now().date_naive(),
        }
    }
}

/// Always the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
