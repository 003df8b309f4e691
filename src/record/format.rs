//! Markdown rendering of records.

use super::{BANK_NAME, Record};

/// Renders a record as a Markdown card.
///
/// Fields appear once each, in the order mobile, name, account number,
/// bank name, IFSC, password.
#[must_use]
pub fn format_record(record: &Record) -> String {
    format!(
        "📱 *Mobile*: `{}`\n\
         👤 *Full Name*: `{}`\n\
         🏦 *Account No*: `{}`\n\
         🏦 *Bank Name*: `{BANK_NAME}`\n\
         🔢 *IFSC*: `{}`\n\
         🔐 *Password*: `{}`",
        record.mobile, record.full_name, record.account_number, record.ifsc, record.password,
    )
}

/// Message sent back to the user who asked for a record.
#[must_use]
pub fn user_message(record: &Record) -> String {
    format!("✅ *Fake Data Generated:*\n\n{}", format_record(record))
}

/// Message posted to the broadcast destination.
#[must_use]
pub fn broadcast_message(record: &Record) -> String {
    format!("📋 *New Fake Data:*\n\n{}", format_record(record))
}
