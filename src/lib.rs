//! ticket_queue - a fixed pool of bounded FIFO integer queues behind opaque tickets
//!
//! Callers never see a queue directly. [`QueueRegistry::create`] hands out a
//! [`Ticket`] that encodes the queue's slot and a generation number; every other
//! operation validates the ticket against the slot's current occupant first, so
//! a ticket for a deleted queue is rejected even after its slot has been reused.
//!
//! ```
//! use ticket_queue::{ErrorKind, QueueRegistry};
//!
//! let mut queues = QueueRegistry::<4, 3>::new();
//! let t = queues.create().unwrap();
//! queues.push(t, 11).unwrap();
//! queues.push(t, 12).unwrap();
//! assert_eq!(queues.pop(t), Ok(11));
//! assert_eq!(queues.list(t).unwrap(), vec![12]);
//!
//! queues.delete(t).unwrap();
//! assert_eq!(queues.pop(t).unwrap_err().kind(), ErrorKind::BadTicket);
//! ```
#![warn(missing_docs)]

mod error;
mod registry;
mod ring;
mod slots;
mod ticket;

pub use error::{ErrorKind, InconsistencyCause, QueueError};
pub use registry::{QueueRegistry, QueueSnapshot};
pub use ticket::{Ticket, MAX_GENERATION, MAX_TICKET_INDEX};

/// Type of the values held in a queue.
pub type Element = i32;

/// Default maximum number of simultaneous queues.
pub const DEFAULT_MAX_QUEUES: usize = 1024;
/// Default maximum number of elements per queue.
pub const DEFAULT_MAX_ELEMENTS: usize = 1024;

/// Registry with the default bounds.
pub type DefaultRegistry = QueueRegistry<DEFAULT_MAX_QUEUES, DEFAULT_MAX_ELEMENTS>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke() {
        let mut reg = DefaultRegistry::new();
        let t = reg.create().unwrap();
        reg.push(t, 42).unwrap();
        assert_eq!(reg.pop(t), Ok(42));
    }

    #[test]
    fn default_bounds() {
        let reg = DefaultRegistry::default();
        assert_eq!(reg.capacity(), DEFAULT_MAX_ELEMENTS);
        assert_eq!(reg.max_queues(), DEFAULT_MAX_QUEUES);
        assert_eq!(reg.live_queues(), 0);
    }
}
