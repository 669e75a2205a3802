//! Per-user earnings counters.
//!
//! All amounts are minor currency units (cents). `total_earned_cents`
//! only ever increases; the other counters move money between buckets
//! without creating or destroying it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mutable earnings record, created lazily on the first credit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    pub total_earned_cents: i64,
    pub available_balance_cents: i64,
    pub pending_withdrawal_cents: i64,
    pub withdrawn_cents: i64,
}

/// Errors from earnings mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EarningsError {
    #[error("Credit amount must be positive, got {0}")]
    NonPositiveCredit(i64),

    #[error("Withdrawal of {requested} exceeds available balance of {available}")]
    InsufficientBalance { requested: i64, available: i64 },
}

impl Earnings {
    /// Credit a reward: raises both the lifetime total and the
    /// available balance.
    pub fn credit(&mut self, amount_cents: i64) -> Result<(), EarningsError> {
        if amount_cents <= 0 {
            return Err(EarningsError::NonPositiveCredit(amount_cents));
        }
        self.total_earned_cents += amount_cents;
        self.available_balance_cents += amount_cents;
        Ok(())
    }

    /// Move money from the available balance into the pending-withdrawal
    /// bucket. The lifetime total is untouched.
    pub fn request_withdrawal(&mut self, amount_cents: i64) -> Result<(), EarningsError> {
        if amount_cents <= 0 {
            return Err(EarningsError::NonPositiveCredit(amount_cents));
        }
        if amount_cents > self.available_balance_cents {
            return Err(EarningsError::InsufficientBalance {
                requested: amount_cents,
                available: self.available_balance_cents,
            });
        }
        self.available_balance_cents -= amount_cents;
        self.pending_withdrawal_cents += amount_cents;
        Ok(())
    }

    /// Read-only view used in intake responses and balance notifications
    pub fn snapshot(&self) -> EarningsSnapshot {
        EarningsSnapshot {
            total_earned_cents: self.total_earned_cents,
            available_balance_cents: self.available_balance_cents,
            pending_withdrawal_cents: self.pending_withdrawal_cents,
            withdrawn_cents: self.withdrawn_cents,
        }
    }
}

/// Immutable snapshot of a user's earnings counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsSnapshot {
    pub total_earned_cents: i64,
    pub available_balance_cents: i64,
    pub pending_withdrawal_cents: i64,
    pub withdrawn_cents: i64,
}
