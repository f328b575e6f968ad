// src/domain/permissions.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::booking::Booking;

/// True only when the booking carries an explicit `cancelled: true`.
pub fn is_cancelled(booking: &Booking) -> bool {
    booking.cancelled
}

/// A booking counts as paid when any one of the upstream payment signals says so.
///
/// The booking API is not consistent about which field it updates after a
/// capture, so `paymentStatus`, `status` and the presence of a `paymentId`
/// are each sufficient on their own.
pub fn is_paid(booking: &Booking) -> bool {
    booking.payment_status.as_deref() == Some("paid")
        || booking.status.as_deref() == Some("paid")
        || booking.status.as_deref() == Some("confirmed")
        || booking.payment_id.is_some()
}

/// A stay is completed once its check-out lies in the past, unless it was cancelled.
pub fn is_completed(booking: &Booking) -> bool {
    is_completed_at(booking, Utc::now())
}

pub fn is_completed_at(booking: &Booking, now: DateTime<Utc>) -> bool {
    // An unparseable check-out is the same as none at all.
    let Some(check_out) = booking.check_out_at() else {
        return false;
    };
    check_out < now && !is_cancelled(booking)
}

/// Cancellation always hides the invoice, whatever the payment state.
pub fn can_view_invoice(booking: &Booking) -> bool {
    is_paid(booking) && !is_cancelled(booking)
}

pub fn can_rate(booking: &Booking) -> bool {
    can_rate_at(booking, Utc::now())
}

/// Completed and paid. `is_completed_at` already excludes cancelled stays.
pub fn can_rate_at(booking: &Booking, now: DateTime<Utc>) -> bool {
    is_completed_at(booking, now) && is_paid(booking)
}

/// All facets of a booking, evaluated against one clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFacets {
    pub is_cancelled: bool,
    pub is_paid: bool,
    pub is_completed: bool,
    pub can_view_invoice: bool,
    pub can_rate: bool,
}

impl BookingFacets {
    pub fn evaluate(booking: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            is_cancelled: is_cancelled(booking),
            is_paid: is_paid(booking),
            is_completed: is_completed_at(booking, now),
            can_view_invoice: can_view_invoice(booking),
            can_rate: can_rate_at(booking, now),
        }
    }

    /// Short label for list views.
    pub fn label(&self) -> &'static str {
        if self.is_cancelled {
            "Cancelled"
        } else if self.is_completed {
            "Completed"
        } else if self.is_paid {
            "Confirmed"
        } else {
            "Pending payment"
        }
    }
}
