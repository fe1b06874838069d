//! Error values returned by every registry operation.

/// Coarse classification of a [`QueueError`].
///
/// `BadParam` and `Full` are never produced: null references cannot exist and
/// a rejected push is always reported as `TooFull`. They are kept so that
/// [`ErrorKind::code`] covers every legacy error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed caller argument.
    BadParam,
    /// Ticket does not name a live queue.
    BadTicket,
    /// Pop from a queue with no elements.
    Empty,
    /// Push to a full queue (legacy alias of `TooFull`).
    Full,
    /// Storage for a new queue could not be obtained.
    NoRoom,
    /// Every slot is occupied.
    TooManyQueues,
    /// A registry invariant was found broken.
    InternalInconsistency,
    /// Push to a queue already holding its maximum number of elements.
    TooFull,
}

impl ErrorKind {
    /// Legacy negative integer code for this kind.
    pub const fn code(self) -> i32 {
        match self {
            ErrorKind::BadParam => -1,
            ErrorKind::BadTicket => -3,
            ErrorKind::Empty => -4,
            ErrorKind::Full => -5,
            ErrorKind::NoRoom => -6,
            ErrorKind::TooManyQueues => -7,
            ErrorKind::InternalInconsistency => -8,
            ErrorKind::TooFull => -9,
        }
    }
}

/// Reasons an [`Inconsistency`](QueueError::Inconsistency) was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencyCause {
    /// Slot index handed to the encoder is outside the table.
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of slots.
        max: usize,
    },
    /// Offset index does not fit the ticket's high field.
    IndexFieldOverflow {
        /// Offending index.
        index: usize,
        /// Largest index the high field can carry.
        max: usize,
    },
    /// Generation counter no longer fits the ticket's low field.
    GenerationExhausted {
        /// Largest generation the low field can carry.
        max: u32,
    },
    /// `head` or `count` of a stored queue is out of bounds.
    Bounds {
        /// Stored head index.
        head: usize,
        /// Stored element count.
        count: usize,
    },
    /// Stored ticket carries a zero generation field.
    ZeroGeneration,
}

/// Error returned by [`QueueRegistry`](crate::QueueRegistry) operations.
///
/// Each value carries the description of the call that failed; nothing is
/// shared between calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Ticket's slot field points outside the table.
    #[error("ticket slot index {index} exceeds {max}")]
    TicketOutOfRange {
        /// Decoded slot index.
        index: usize,
        /// Number of slots.
        max: usize,
    },
    /// Ticket names a slot with no queue in it.
    #[error("ticket refers to unused queue index {index}")]
    UnusedSlot {
        /// Decoded slot index.
        index: usize,
    },
    /// Ticket names a slot now occupied by a different queue.
    #[error("ticket refers to old queue (current generation={current}, ticket generation={stale})")]
    StaleTicket {
        /// Generation of the slot's current occupant.
        current: u32,
        /// Generation carried by the caller's ticket.
        stale: u32,
    },
    /// Pop on an empty queue.
    #[error("queue empty")]
    Empty,
    /// Push on a queue at capacity.
    #[error("queue full (max {capacity} elts)")]
    TooFull {
        /// Queue capacity.
        capacity: usize,
    },
    /// Element buffer allocation failed.
    #[error("no memory for a queue of {capacity} elements")]
    NoRoom {
        /// Requested capacity.
        capacity: usize,
    },
    /// All slots are occupied.
    #[error("too many queues (max {max})")]
    TooManyQueues {
        /// Number of slots.
        max: usize,
    },
    /// Internal invariant violation.
    #[error("internal inconsistency: {0}")]
    Inconsistency(InconsistencyCause),
}

impl QueueError {
    /// Classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            QueueError::TicketOutOfRange { .. }
            | QueueError::UnusedSlot { .. }
            | QueueError::StaleTicket { .. } => ErrorKind::BadTicket,
            QueueError::Empty => ErrorKind::Empty,
            QueueError::TooFull { .. } => ErrorKind::TooFull,
            QueueError::NoRoom { .. } => ErrorKind::NoRoom,
            QueueError::TooManyQueues { .. } => ErrorKind::TooManyQueues,
            QueueError::Inconsistency(_) => ErrorKind::InternalInconsistency,
        }
    }

    /// Legacy negative integer code, see [`ErrorKind::code`].
    pub const fn code(&self) -> i32 { self.kind().code() }
}

impl core::fmt::Display for InconsistencyCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InconsistencyCause::IndexOutOfRange { index, max } => {
                write!(f, "index {index} too large (assumed less than {max})")
            }
            InconsistencyCause::IndexFieldOverflow { index, max } => {
                write!(f, "index {index} does not fit a ticket (max {max})")
            }
            InconsistencyCause::GenerationExhausted { max } => {
                write!(f, "generation number too large (max {max})")
            }
            InconsistencyCause::Bounds { head, count } => write!(f, "head={head}, count={count}"),
            InconsistencyCause::ZeroGeneration => write!(f, "generation=0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes() {
        assert_eq!(QueueError::UnusedSlot { index: 3 }.code(), -3);
        assert_eq!(QueueError::StaleTicket { current: 2, stale: 1 }.code(), -3);
        assert_eq!(QueueError::Empty.code(), -4);
        assert_eq!(QueueError::NoRoom { capacity: 8 }.code(), -6);
        assert_eq!(QueueError::TooManyQueues { max: 4 }.code(), -7);
        assert_eq!(QueueError::Inconsistency(InconsistencyCause::ZeroGeneration).code(), -8);
        assert_eq!(QueueError::TooFull { capacity: 4 }.code(), -9);
        assert_eq!(ErrorKind::BadParam.code(), -1);
        assert_eq!(ErrorKind::Full.code(), -5);
    }

    #[test]
    fn messages_carry_context() {
        assert_eq!(QueueError::TooFull { capacity: 1024 }.to_string(), "queue full (max 1024 elts)");
        assert_eq!(QueueError::TooManyQueues { max: 2 }.to_string(), "too many queues (max 2)");
        let err = QueueError::Inconsistency(InconsistencyCause::Bounds { head: 9, count: 1 });
        assert_eq!(err.to_string(), "internal inconsistency: head=9, count=1");
    }
}
