use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Named relative time range used to filter trips for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Trips from `now - 7 days` onwards.
    #[default]
    Last7Days,
    /// Trips from `now - 30 days` onwards.
    Last30Days,
    /// Trips in the calendar year of `now`.
    ThisYear,
    /// Every trip.
    All,
}

impl Window {
    pub const ALL: [Window; 4] = [
        Self::Last7Days,
        Self::Last30Days,
        Self::ThisYear,
        Self::All,
    ];

    /// Whether a trip at `trip_date` falls inside the window seen from `now`.
    ///
    /// The rolling windows only have a lower bound; trips dated after `now`
    /// are kept.
    pub fn contains(&self, trip_date: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            Self::Last7Days => trip_date >= now - Duration::days(7),
            Self::Last30Days => trip_date >= now - Duration::days(30),
            Self::ThisYear => trip_date.year() == now.year(),
            Self::All => true,
        }
    }

    /// Short code used on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::ThisYear => "year",
            Self::All => "all",
        }
    }

    /// French label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Last7Days => "7 derniers jours",
            Self::Last30Days => "30 derniers jours",
            Self::ThisYear => "Cette année",
            Self::All => "Tout",
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" | "7" | "last7days" | "week" => Ok(Self::Last7Days),
            "30d" | "30" | "last30days" | "month" => Ok(Self::Last30Days),
            "year" | "thisyear" => Ok(Self::ThisYear),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown period '{other}' (expected 7d, 30d, year or all)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn seven_days_is_a_lower_bound_on_the_instant() {
        let now = at(2024, 6, 15, 12);
        assert!(Window::Last7Days.contains(at(2024, 6, 8, 12), now));
        assert!(!Window::Last7Days.contains(at(2024, 6, 8, 11), now));
        assert!(Window::Last7Days.contains(at(2024, 7, 1, 0), now));
    }

    #[test]
    fn thirty_days() {
        let now = at(2024, 6, 15, 12);
        assert!(Window::Last30Days.contains(at(2024, 5, 16, 12), now));
        assert!(!Window::Last30Days.contains(at(2024, 5, 16, 11), now));
    }

    #[test]
    fn this_year_matches_calendar_year() {
        let now = at(2024, 1, 3, 8);
        assert!(Window::ThisYear.contains(at(2024, 12, 31, 23), now));
        assert!(!Window::ThisYear.contains(at(2023, 12, 31, 23), now));
    }

    #[test]
    fn parse_codes() {
        for w in Window::ALL {
            assert_eq!(w.code().parse::<Window>().unwrap(), w);
        }
        assert!("fortnight".parse::<Window>().is_err());
    }
}
