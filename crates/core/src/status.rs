//! Order status tracking
//!
//! Orders move through a fixed delivery sequence one step at a time and may
//! be cancelled by staff at any point, or by the customer while the order is
//! still being received. The full trail is kept as a [`StatusHistory`]: a
//! run of delivery stages followed by any cancellation entries. Re-opening a
//! cancelled order drops the cancellation entries and resumes the trail.

use jiff::Timestamp;
use thiserror::Error;

/// Delivery stages in order, excluding the two cancellation statuses.
pub const FORWARD_SEQUENCE: [OrderStatus; 4] = [
    OrderStatus::ReceivingOrders,
    OrderStatus::Processing,
    OrderStatus::BeingDelivered,
    OrderStatus::Delivered,
];

/// A point in an order's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    ReceivingOrders,
    Processing,
    BeingDelivered,
    Delivered,
    Canceled,
    CanceledByUser,
}

impl OrderStatus {
    /// The status label used in storage and over the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReceivingOrders => "Receiving orders",
            Self::Processing => "Order processing",
            Self::BeingDelivered => "Being delivered",
            Self::Delivered => "Delivered",
            Self::Canceled => "Canceled",
            Self::CanceledByUser => "Canceled by user",
        }
    }

    /// Position within [`FORWARD_SEQUENCE`], or `None` for cancellations.
    #[must_use]
    pub fn forward_index(&self) -> Option<usize> {
        FORWARD_SEQUENCE.iter().position(|status| status == self)
    }

    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled | Self::CanceledByUser)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Receiving orders" => Ok(Self::ReceivingOrders),
            "Order processing" => Ok(Self::Processing),
            "Being delivered" => Ok(Self::BeingDelivered),
            "Delivered" => Ok(Self::Delivered),
            "Canceled" => Ok(Self::Canceled),
            "Canceled by user" => Ok(Self::CanceledByUser),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// The label did not match any known order status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised order status: {0:?}")]
pub struct ParseStatusError(pub String);

/// One recorded status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub at: Timestamp,
}

/// A non-empty status trail: consecutive delivery stages starting at
/// [`OrderStatus::ReceivingOrders`], then zero or more cancellation entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistory {
    entries: Vec<StatusEntry>,
}

impl StatusHistory {
    /// The trail of a freshly placed order.
    #[must_use]
    pub fn started_at(at: Timestamp) -> Self {
        Self {
            entries: vec![StatusEntry {
                status: OrderStatus::ReceivingOrders,
                at,
            }],
        }
    }

    /// Rebuild a trail from stored entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the entries are empty, skip or repeat a
    /// delivery stage, or place a cancellation anywhere but at the tail.
    pub fn from_entries(entries: Vec<StatusEntry>) -> Result<Self, HistoryError> {
        if entries.is_empty() {
            return Err(HistoryError::Empty);
        }

        if Self::forward_len_of(&entries) == 0 {
            return Err(HistoryError::OutOfSequence { position: 0 });
        }

        for (position, entry) in entries.iter().enumerate() {
            match entry.status.forward_index() {
                Some(index) if index == position => {}
                None if position >= Self::forward_len_of(&entries) => {}
                _ => return Err(HistoryError::OutOfSequence { position }),
            }
        }

        Ok(Self { entries })
    }

    /// All entries, oldest first. Never empty.
    #[must_use]
    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// The most recent entry.
    #[must_use]
    pub fn current(&self) -> StatusEntry {
        self.entries.last().copied().unwrap_or(StatusEntry {
            status: OrderStatus::ReceivingOrders,
            at: Timestamp::UNIX_EPOCH,
        })
    }

    fn forward_len_of(entries: &[StatusEntry]) -> usize {
        entries
            .iter()
            .take_while(|entry| !entry.status.is_cancellation())
            .count()
    }

    /// Number of leading delivery-stage entries, ignoring trailing
    /// cancellations. At least 1.
    fn forward_len(&self) -> usize {
        Self::forward_len_of(&self.entries)
    }

    /// The delivery stage the order had reached, looking through any
    /// trailing cancellation entries.
    fn reached_stage(&self) -> usize {
        self.forward_len().saturating_sub(1)
    }

    /// Apply a staff status change and report what happened.
    ///
    /// Moving forward is only allowed one stage at a time. Selecting an
    /// earlier stage rewinds the trail to it, keeping the original
    /// timestamps. Selecting the reached stage again refreshes its
    /// timestamp, which on a cancelled order re-opens it. `Canceled` may be
    /// layered on at any point; `Canceled by user` is reserved for the
    /// customer themselves.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::SkippedStage`] for a jump past the next
    /// stage and [`TransitionError::UnsupportedTarget`] for
    /// `Canceled by user`.
    pub fn admin_transition(
        &mut self,
        target: OrderStatus,
        now: Timestamp,
    ) -> Result<Transition, TransitionError> {
        if target == OrderStatus::CanceledByUser {
            return Err(TransitionError::UnsupportedTarget { target });
        }

        if target == OrderStatus::Canceled {
            if self.current().status == OrderStatus::Canceled {
                return Ok(Transition::NoChange);
            }

            return Ok(self.append(target, now));
        }

        let Some(target_stage) = target.forward_index() else {
            return Err(TransitionError::UnsupportedTarget { target });
        };

        let reached = self.reached_stage();

        if target_stage == reached {
            Ok(self.refresh(now))
        } else if target_stage == reached + 1 {
            Ok(self.resume_and_append(target, now))
        } else if target_stage < reached {
            Ok(self.rewind(target_stage + 1))
        } else {
            Err(TransitionError::SkippedStage {
                from: self.current().status,
                to: target,
            })
        }
    }

    /// Cancel on behalf of the customer. Only allowed while the order is
    /// still at [`OrderStatus::ReceivingOrders`].
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AlreadyCanceled`] when a cancellation is
    /// already recorded and [`TransitionError::AlreadyProcessed`] once the
    /// order has moved past the first stage.
    pub fn user_cancellation(&mut self, now: Timestamp) -> Result<Transition, TransitionError> {
        let current = self.current().status;

        if current.is_cancellation() {
            return Err(TransitionError::AlreadyCanceled { status: current });
        }

        if self.reached_stage() > 0 {
            return Err(TransitionError::AlreadyProcessed { status: current });
        }

        Ok(self.append(OrderStatus::CanceledByUser, now))
    }

    fn append(&mut self, status: OrderStatus, now: Timestamp) -> Transition {
        self.entries.push(StatusEntry { status, at: now });

        Transition::Append {
            kept: self.entries.len() - 1,
            status,
        }
    }

    fn refresh(&mut self, now: Timestamp) -> Transition {
        let kept = self.forward_len();
        self.entries.truncate(kept);

        if let Some(last) = self.entries.last_mut() {
            last.at = now;
        }

        Transition::Refresh { kept }
    }

    fn resume_and_append(&mut self, status: OrderStatus, now: Timestamp) -> Transition {
        let kept = self.forward_len();
        self.entries.truncate(kept);
        self.entries.push(StatusEntry { status, at: now });

        Transition::Append { kept, status }
    }

    fn rewind(&mut self, kept: usize) -> Transition {
        self.entries.truncate(kept);

        Transition::Rewind { kept }
    }
}

/// What a status change did to the trail. `kept` counts the leading entries
/// that survived, for logging and for targeted storage updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The trail is already in the requested state.
    NoChange,

    /// Trailing cancellations (if any) were dropped and the timestamp of
    /// the reached stage was set to now.
    Refresh { kept: usize },

    /// `status` was recorded after the `kept` surviving entries.
    Append { kept: usize, status: OrderStatus },

    /// The trail was cut back to an earlier stage, keeping the original
    /// timestamps of the `kept` surviving entries.
    Rewind { kept: usize },
}

/// Rejected status changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot move from {from} straight to {to}")]
    SkippedStage { from: OrderStatus, to: OrderStatus },

    #[error("{target} cannot be set through this channel")]
    UnsupportedTarget { target: OrderStatus },

    #[error("order is already cancelled ({status})")]
    AlreadyCanceled { status: OrderStatus },

    #[error("order has already been processed ({status})")]
    AlreadyProcessed { status: OrderStatus },
}

/// Stored status entries that do not form a valid trail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("order has no status entries")]
    Empty,

    #[error("status entry at position {position} is out of sequence")]
    OutOfSequence { position: usize },
}
