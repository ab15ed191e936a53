//! Appointment Lifecycle
//!
//! Closed status enumerations with an exhaustive transition table. The
//! persistence layer stores these as text and refuses anything the table
//! does not allow.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked by the customer, awaiting the barber's confirmation.
    Pending,

    /// Accepted by the barber.
    Confirmed,

    /// The customer is in the chair.
    InProgress,

    /// Finished. Terminal together with [`AppointmentStatus::Cancelled`].
    Completed,

    /// Called off by either side before completion.
    Cancelled,
}

impl AppointmentStatus {
    /// Stable text form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// True while the appointment still occupies its interval on the
    /// barber's day; these are the statuses the overlap invariant covers.
    #[must_use]
    pub const fn holds_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::InProgress)
    }

    /// True when no further status change is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `next` is a legal move from this state.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed)
        )
    }

    /// Validate a transition, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the lifecycle table does not allow
    /// moving from `self` to `next`.
    pub const fn transition_to(self, next: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownAppointmentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownAppointmentStatus(other.to_string())),
        }
    }
}

/// Settlement state of an appointment's bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No successful payment recorded yet.
    Unpaid,

    /// Settled. A paid appointment can never be paid again.
    Paid,
}

impl PaymentStatus {
    /// Stable text form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(UnknownPaymentStatus(other.to_string())),
        }
    }
}

/// Attempted move not allowed by the lifecycle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move appointment from {from} to {to}")]
pub struct InvalidTransition {
    /// State the appointment was in.
    pub from: AppointmentStatus,

    /// State the caller asked for.
    pub to: AppointmentStatus,
}

/// Text that does not name an [`AppointmentStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown appointment status `{0}`")]
pub struct UnknownAppointmentStatus(pub String);

/// Text that does not name a [`PaymentStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment status `{0}`")]
pub struct UnknownPaymentStatus(pub String);

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn lifecycle_allows_the_documented_paths() -> TestResult {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, Pending};

        assert_eq!(Pending.transition_to(Confirmed)?, Confirmed);
        assert_eq!(Pending.transition_to(Cancelled)?, Cancelled);
        assert_eq!(Confirmed.transition_to(InProgress)?, InProgress);
        assert_eq!(Confirmed.transition_to(Cancelled)?, Cancelled);
        assert_eq!(InProgress.transition_to(Completed)?, Completed);

        Ok(())
    }

    #[test]
    fn terminal_states_accept_nothing() {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, Pending};

        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal(), "{terminal} should be terminal");

            for next in [Pending, Confirmed, InProgress, Completed, Cancelled] {
                assert!(
                    terminal.transition_to(next).is_err(),
                    "{terminal} -> {next} should be rejected"
                );
            }
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        use AppointmentStatus::{Completed, InProgress, Pending};

        let result = Pending.transition_to(Completed);

        assert_eq!(
            result,
            Err(InvalidTransition {
                from: Pending,
                to: Completed,
            })
        );

        assert!(Pending.transition_to(InProgress).is_err());
        assert!(InProgress.transition_to(Pending).is_err());
    }

    #[test]
    fn slot_holding_statuses_match_the_overlap_invariant() {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, Pending};

        assert!(Pending.holds_slot());
        assert!(Confirmed.holds_slot());
        assert!(InProgress.holds_slot());
        assert!(!Completed.holds_slot());
        assert!(!Cancelled.holds_slot());
    }

    #[test]
    fn status_text_round_trips() -> TestResult {
        use AppointmentStatus::{Cancelled, Completed, Confirmed, InProgress, Pending};

        for status in [Pending, Confirmed, InProgress, Completed, Cancelled] {
            assert_eq!(status.as_str().parse::<AppointmentStatus>()?, status);
        }

        assert_eq!("unpaid".parse::<PaymentStatus>()?, PaymentStatus::Unpaid);
        assert_eq!("paid".parse::<PaymentStatus>()?, PaymentStatus::Paid);
        assert!("settled".parse::<PaymentStatus>().is_err());
        assert!("PENDING".parse::<AppointmentStatus>().is_err());

        Ok(())
    }
}
