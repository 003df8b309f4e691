//! Synthetic record model.
//!
//! A [`Record`] is one generated tuple of mobile number, full name,
//! account number, IFSC code and password. Records are produced by the
//! generator, persisted by the store and rendered by the formatter.

mod check;
mod format;
mod generator;
mod names;

pub use check::FormatViolation;
pub use format::{broadcast_message, format_record, user_message};

use serde::{Deserialize, Serialize};

/// Lowest mobile number that can be generated (inclusive).
pub const MOBILE_MIN: u64 = 6_000_000_000;

/// Highest mobile number that can be generated (inclusive).
pub const MOBILE_MAX: u64 = 9_999_999_999;

/// Number of digits in a generated account number.
pub const ACCOUNT_DIGITS: usize = 12;

/// Bank code prefix shared by every generated IFSC.
pub const IFSC_PREFIX: &str = "SBIN0";

/// Number of random characters following [`IFSC_PREFIX`].
pub const IFSC_SUFFIX_LEN: usize = 6;

/// Length of a generated password.
pub const PASSWORD_LEN: usize = 10;

/// Symbols allowed in passwords in addition to letters and digits.
pub const PASSWORD_SYMBOLS: &str = "!@#$%";

/// Bank name shown next to every record.
pub const BANK_NAME: &str = "State Bank of India";

/// Column names of the persisted store, in column order.
pub const HEADER: [&str; 5] = ["Mobile", "Full Name", "Account No", "IFSC", "Password"];

/// One generated record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 10-digit mobile number.
    #[serde(rename = "Mobile")]
    pub mobile: String,

    /// Human-looking full name.
    #[serde(rename = "Full Name")]
    pub full_name: String,

    /// 12-digit account number.
    #[serde(rename = "Account No")]
    pub account_number: String,

    /// IFSC code, `SBIN0` followed by six upper-case alphanumerics.
    #[serde(rename = "IFSC")]
    pub ifsc: String,

    /// 10-character password.
    #[serde(rename = "Password")]
    pub password: String,
}

impl Record {
    /// Returns the mobile number with all but the last four digits hidden.
    ///
    /// Used wherever a record is mentioned in logs.
    #[must_use]
    pub fn masked_mobile(&self) -> String {
        let len = self.mobile.chars().count();
        if len > 4 {
            let tail: String = self.mobile.chars().skip(len - 4).collect();
            format!("******{tail}")
        } else {
            "****".to_owned()
        }
    }
}
