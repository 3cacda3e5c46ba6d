use anyhow::{bail, Context, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One bookable room offer scraped from a hotel's rate page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomRecord {
    pub destination: String,
    #[serde(rename = "hotel name")]
    pub hotel_name: String,
    #[serde(rename = "check in date")]
    pub check_in_date: String,
    #[serde(rename = "check out date")]
    pub check_out_date: String,
    #[serde(rename = "room name")]
    pub room_name: String,
    /// Price exactly as rendered, currency symbol included
    #[serde(rename = "room price")]
    pub room_price: String,
}

/// Month/year value the booking site expects in `qCiMy` / `qCoMy`.
///
/// The site indexes months from zero, so July 2024 is `062024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthYearToken {
    month0: u32,
    year: i32,
}

impl MonthYearToken {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month0: date.month0(),
            year: date.year(),
        }
    }

    /// Calendar month, 1-based
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    /// Output date for a day of this month, e.g. `15/7/2024`
    pub fn display_date(&self, day: u32) -> String {
        format!("{}/{}/{}", day, self.month(), self.year)
    }
}

impl fmt::Display for MonthYearToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:04}", self.month0, self.year)
    }
}

impl FromStr for MonthYearToken {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            bail!("month-year token must be 6 digits, got {s:?}");
        }
        let month0: u32 = s[..2].parse().context("invalid month in token")?;
        let year: i32 = s[2..].parse().context("invalid year in token")?;
        if month0 > 11 {
            bail!("month index {month0} out of range in token {s:?}");
        }
        Ok(Self { month0, year })
    }
}

/// Check-in and check-out dates of a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayDates {
    pub fn starting(check_in: NaiveDate, nights: u32) -> Result<Self> {
        let check_out = check_in
            .checked_add_days(Days::new(u64::from(nights)))
            .with_context(|| format!("check-out date out of range: {check_in} + {nights} nights"))?;
        Ok(Self { check_in, check_out })
    }

    pub fn check_in_token(&self) -> MonthYearToken {
        MonthYearToken::from_date(self.check_in)
    }

    pub fn check_out_token(&self) -> MonthYearToken {
        MonthYearToken::from_date(self.check_out)
    }

    pub fn check_in_display(&self) -> String {
        display(self.check_in)
    }

    pub fn check_out_display(&self) -> String {
        display(self.check_out)
    }
}

fn display(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn token_is_six_chars_for_every_month() {
        for month in 1..=12 {
            for year in [1999, 2024, 2031] {
                let token = MonthYearToken::from_date(date(year, month, 1)).to_string();
                assert_eq!(token.len(), 6, "{token}");
                assert_eq!(&token[..2], format!("{:02}", month - 1));
                assert_eq!(&token[2..], year.to_string());
            }
        }
    }

    #[test]
    fn token_display_date_adds_one_to_month_index() {
        let token: MonthYearToken = "062024".parse().unwrap();
        assert_eq!(token.display_date(15), "15/7/2024");
    }

    #[test]
    fn january_uses_month_index_zero() {
        let token = MonthYearToken::from_date(date(2025, 1, 10));
        assert_eq!(token.to_string(), "002025");
        assert_eq!(token.display_date(10), "10/1/2025");
    }

    #[test]
    fn token_parse_rejects_bad_input() {
        assert!("62024".parse::<MonthYearToken>().is_err());
        assert!("12x024".parse::<MonthYearToken>().is_err());
        assert!("122024".parse::<MonthYearToken>().is_err());
    }

    #[test]
    fn stay_rolls_over_month_and_year() {
        let stay = StayDates::starting(date(2024, 12, 31), 1).unwrap();
        assert_eq!(stay.check_out, date(2025, 1, 1));
        assert_eq!(stay.check_in_token().to_string(), "112024");
        assert_eq!(stay.check_out_token().to_string(), "002025");
        assert_eq!(stay.check_in_display(), "31/12/2024");
        assert_eq!(stay.check_out_display(), "1/1/2025");
    }

    #[test]
    fn display_matches_token_rendering() {
        let stay = StayDates::starting(date(2024, 7, 15), 1).unwrap();
        assert_eq!(
            stay.check_in_display(),
            stay.check_in_token().display_date(15)
        );
    }

    #[test]
    fn record_serializes_with_column_names() {
        let record = RoomRecord {
            destination: "Auburn".into(),
            hotel_name: "Hotel".into(),
            check_in_date: "1/2/2024".into(),
            check_out_date: "2/2/2024".into(),
            room_name: "King".into(),
            room_price: "$99".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["hotel name"], "Hotel");
        assert_eq!(value["room price"], "$99");
    }
}
