//! Transaction Status State Machine
//!
//! Status IDs are designed for PostgreSQL storage as SMALLINT.
//! Terminal states: SUCCESS (10), FAILURE (-10)

use std::fmt;

/// Ledger entry status
///
/// ```text
/// PENDING ──▶ SUCCESS
///    └──────▶ FAILURE
/// ```
///
/// Both SUCCESS and FAILURE are terminal; a terminal entry is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum TransactionStatus {
    /// Initial state - entry created, no mutation committed yet
    Pending = 0,

    /// Terminal: all balance mutations committed
    Success = 10,

    /// Terminal: a failure occurred after the entry was created; the entry
    /// is durably retained for audit and retry classification
    Failure = -10,
}

impl TransactionStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Failure)
    }

    /// Valid forward transitions only: PENDING -> SUCCESS | FAILURE
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (
                TransactionStatus::Pending,
                TransactionStatus::Success | TransactionStatus::Failure
            )
        )
    }

    /// Numeric status ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL status ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransactionStatus::Pending),
            10 => Some(TransactionStatus::Success),
            -10 => Some(TransactionStatus::Failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
