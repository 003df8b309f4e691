//! Field format checks.

use thiserror::Error;

use super::{
    ACCOUNT_DIGITS, IFSC_PREFIX, IFSC_SUFFIX_LEN, MOBILE_MAX, MOBILE_MIN, PASSWORD_LEN,
    PASSWORD_SYMBOLS, Record,
};

/// A field that does not match its required format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatViolation {
    #[error("Mobile '{0}' is not a 10-digit number in 6000000000..=9999999999")]
    Mobile(String),

    #[error("Full name is empty")]
    EmptyName,

    #[error("Account number '{0}' is not 12 digits")]
    AccountNumber(String),

    #[error("IFSC '{0}' does not match SBIN0 followed by 6 upper-case alphanumerics")]
    Ifsc(String),

    #[error("Password has {length} chars or contains characters outside letters, digits and !@#$%")]
    Password { length: usize },
}

impl Record {
    /// Checks every field against its format, reporting the first violation.
    pub fn check(&self) -> Result<(), FormatViolation> {
        let mobile_ok = self.mobile.len() == 10
            && all_digits(&self.mobile)
            && self
                .mobile
                .parse::<u64>()
                .is_ok_and(|n| (MOBILE_MIN..=MOBILE_MAX).contains(&n));
        if !mobile_ok {
            return Err(FormatViolation::Mobile(self.mobile.clone()));
        }

        if self.full_name.trim().is_empty() {
            return Err(FormatViolation::EmptyName);
        }

        if self.account_number.len() != ACCOUNT_DIGITS || !all_digits(&self.account_number) {
            return Err(FormatViolation::AccountNumber(self.account_number.clone()));
        }

        let ifsc_ok = self.ifsc.strip_prefix(IFSC_PREFIX).is_some_and(|suffix| {
            suffix.len() == IFSC_SUFFIX_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        });
        if !ifsc_ok {
            return Err(FormatViolation::Ifsc(self.ifsc.clone()));
        }

        let password_ok = self.password.chars().count() == PASSWORD_LEN
            && self
                .password
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
        if !password_ok {
            return Err(FormatViolation::Password {
                length: self.password.chars().count(),
            });
        }

        Ok(())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
