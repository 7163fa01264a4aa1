//! Expiry date parsing and validation.
//!
//! The form produces expiry values as `MM/YY`. A card is usable through the
//! end of its expiry month, so the current month itself is still valid.
//!
//! # Example
//!
//! ```
//! use card_input::expiry::{check_expiry, validate_expiry, YearMonth};
//!
//! let today = YearMonth::new(2026, 10).unwrap();
//!
//! assert!(validate_expiry("10/26", today));
//! assert!(validate_expiry("10/27", today));
//! assert!(!validate_expiry("09/26", today));
//! assert!(!validate_expiry("13/25", today));
//!
//! let exp = check_expiry("04/30", today).unwrap();
//! assert_eq!(exp.year(), 2030);
//! assert_eq!(exp.month(), 4);
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearMonth {
    // Field order gives chronological ordering.
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair. Returns `None` if the month is not 1-12.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// January of `year`.
    #[inline]
    pub const fn january(year: u16) -> Self {
        Self { year, month: 1 }
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the month `months` after this one, saturating at December of `u16::MAX`.
    pub fn plus_months(self, months: u32) -> Self {
        let index = (self.year as u32 * 12 + (self.month as u32 - 1)).saturating_add(months);
        match u16::try_from(index / 12) {
            Ok(year) => Self {
                year,
                month: (index % 12) as u8 + 1,
            },
            Err(_) => Self {
                year: u16::MAX,
                month: 12,
            },
        }
    }

    /// Returns the month `months` before this one, saturating at year 0.
    pub fn minus_months(self, months: u32) -> Self {
        let index = (self.year as u32 * 12 + (self.month as u32 - 1)).saturating_sub(months);
        Self {
            year: (index / 12) as u16,
            month: (index % 12) as u8 + 1,
        }
    }

    /// The current month according to the system clock (UTC).
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let (year, month) = civil_from_days((secs / 86_400) as i64);
        Self { year, month }
    }

    /// Formats as `MM/YY`.
    pub fn format_short(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year % 100)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Converts days since 1970-01-01 into a proleptic Gregorian (year, month).
fn civil_from_days(days: i64) -> (u16, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year.clamp(0, u16::MAX as i64) as u16, month as u8)
}

/// Errors from expiry parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// The input is empty.
    Empty,
    /// Not exactly two `/`-separated numeric parts.
    InvalidFormat,
    /// Month is outside 1-12.
    InvalidMonth(u8),
    /// The expiry month is before the current month.
    Expired {
        /// The parsed expiry.
        expiry: YearMonth,
    },
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "expiry date is empty"),
            Self::InvalidFormat => write!(f, "invalid expiry format (expected MM/YY)"),
            Self::InvalidMonth(m) => write!(f, "invalid month {}: must be 1-12", m),
            Self::Expired { expiry } => write!(f, "card expired ({})", expiry.format_short()),
        }
    }
}

impl std::error::Error for ExpiryError {}

/// Parses an `MM/YY` expiry without checking it against the calendar.
///
/// Two-digit years are read as `20YY`.
pub fn parse_expiry(input: &str) -> Result<YearMonth, ExpiryError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExpiryError::Empty);
    }

    let parts: Vec<&str> = input.split('/').collect();
    let [month_str, year_str] = parts.as_slice() else {
        return Err(ExpiryError::InvalidFormat);
    };

    let month_str = month_str.trim();
    let year_str = year_str.trim();
    if month_str.is_empty()
        || year_str.is_empty()
        || year_str.len() > 2
        || month_str.len() > 2
        || !month_str.bytes().all(|b| b.is_ascii_digit())
        || !year_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ExpiryError::InvalidFormat);
    }

    let month: u8 = month_str.parse().map_err(|_| ExpiryError::InvalidFormat)?;
    let yy: u16 = year_str.parse().map_err(|_| ExpiryError::InvalidFormat)?;

    YearMonth::new(2000 + yy, month).ok_or(ExpiryError::InvalidMonth(month))
}

/// Parses an expiry and rejects it if it lies before `today`'s month.
pub fn check_expiry(input: &str, today: YearMonth) -> Result<YearMonth, ExpiryError> {
    let expiry = parse_expiry(input)?;
    if expiry < today {
        return Err(ExpiryError::Expired { expiry });
    }
    Ok(expiry)
}

/// Returns true if `input` is a well-formed expiry that is not before `today`'s month.
#[inline]
pub fn validate_expiry(input: &str, today: YearMonth) -> bool {
    check_expiry(input, today).is_ok()
}

/// Like [`validate_expiry`], against the system clock.
#[inline]
pub fn validate_expiry_now(input: &str) -> bool {
    validate_expiry(input, YearMonth::now())
}
