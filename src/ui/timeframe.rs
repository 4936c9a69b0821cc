use crate::data::Granularity;
use chrono::Duration;
use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Timeframe {
    #[value(name = "1h")]
    OneHour,
    #[value(name = "2h")]
    TwoHours,
    #[value(name = "4h")]
    FourHours,
    #[value(name = "8h")]
    EightHours,
    #[value(name = "12h")]
    TwelveHours,
    #[value(name = "16h")]
    SixteenHours,
    #[value(name = "1d")]
    OneDay,
    #[value(name = "2d")]
    TwoDays,
}

impl Timeframe {
    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::OneHour,
            Timeframe::TwoHours,
            Timeframe::FourHours,
            Timeframe::EightHours,
            Timeframe::TwelveHours,
            Timeframe::SixteenHours,
            Timeframe::OneDay,
            Timeframe::TwoDays,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::TwoHours => "2h",
            Timeframe::FourHours => "4h",
            Timeframe::EightHours => "8h",
            Timeframe::TwelveHours => "12h",
            Timeframe::SixteenHours => "16h",
            Timeframe::OneDay => "1d",
            Timeframe::TwoDays => "2d",
        }
    }

    pub fn minutes_per_point(&self) -> i64 {
        match self {
            Timeframe::OneHour => 60,
            Timeframe::TwoHours => 120,
            Timeframe::FourHours => 240,
            Timeframe::EightHours => 480,
            Timeframe::TwelveHours => 720,
            Timeframe::SixteenHours => 960,
            Timeframe::OneDay => 1440,
            Timeframe::TwoDays => 2880,
        }
    }

    /// Sub-daily timeframes read hourly records, the rest read daily ones.
    pub fn granularity(&self) -> Granularity {
        match self {
            Timeframe::OneDay | Timeframe::TwoDays => Granularity::Daily,
            _ => Granularity::Hourly,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::minutes(self.minutes_per_point())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_hours_reads_hourly_records() {
        assert_eq!(Timeframe::FourHours.granularity(), Granularity::Hourly);
        assert_eq!(Timeframe::FourHours.minutes_per_point(), 240);
    }

    #[test]
    fn two_days_reads_daily_records() {
        assert_eq!(Timeframe::TwoDays.granularity(), Granularity::Daily);
        assert_eq!(Timeframe::TwoDays.minutes_per_point(), 2880);
    }

    #[test]
    fn only_day_timeframes_are_daily() {
        let daily: Vec<&str> = Timeframe::all()
            .into_iter()
            .filter(|tf| tf.granularity() == Granularity::Daily)
            .map(|tf| tf.label())
            .collect();
        assert_eq!(daily, vec!["1d", "2d"]);
    }

    #[test]
    fn labels_parse_back_case_insensitively() {
        for tf in Timeframe::all() {
            assert_eq!(Timeframe::from_str(tf.label(), true), Ok(tf));
            assert_eq!(Timeframe::from_str(&tf.label().to_uppercase(), true), Ok(tf));
        }
    }
}
