//! The public registry: ticket validation in front of every queue operation.

use core::fmt;

use tracing::{debug, trace, warn};

use crate::error::{ErrorKind, QueueError};
use crate::slots::SlotTable;
use crate::ticket::{self, Ticket, TicketCodec};
use crate::Element;

const TARGET: &str = "ticket_queue";

/// Fixed pool of up to `MAXQ` bounded FIFO queues of `MAXELT` elements each.
///
/// Queues are reachable only through the [`Ticket`] returned by
/// [`create`](Self::create). Deleting a queue invalidates its ticket for good,
/// even after the slot is handed to a new queue.
pub struct QueueRegistry<const MAXQ: usize, const MAXELT: usize> {
    slots: SlotTable<MAXQ, MAXELT>,
    codec: TicketCodec,
}

/// Read-only view of one queue, as produced by [`QueueRegistry::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Slot the queue occupies.
    pub index: usize,
    /// Generation of the queue's ticket.
    pub generation: u32,
    /// Index of the front element inside the ring buffer.
    pub head: usize,
    /// Live elements, front first.
    pub elements: Vec<Element>,
}

impl fmt::Display for QueueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "queue (index={}, nonce={}, count={}, start={}):",
            self.index,
            self.generation,
            self.elements.len(),
            self.head
        )?;
        for e in &self.elements {
            write!(f, " {e}")?;
        }
        Ok(())
    }
}

impl<const MAXQ: usize, const MAXELT: usize> QueueRegistry<MAXQ, MAXELT> {
    /// Empty registry; the first ticket carries generation 1.
    ///
    /// # Panics
    /// If `MAXQ` or `MAXELT` is zero.
    pub fn new() -> Self {
        assert!(MAXQ > 0, "queue count must be greater than 0");
        assert!(MAXELT > 0, "queue capacity must be greater than 0");
        QueueRegistry { slots: SlotTable::new(), codec: TicketCodec::new() }
    }

    /// Creates an empty queue in the lowest free slot.
    pub fn create(&mut self) -> Result<Ticket, QueueError> {
        let index = self.slots.allocate().map_err(|e| report("create", e))?;
        let ticket = match self.codec.encode::<MAXQ>(index) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.slots.free(index);
                return Err(report("create", e));
            }
        };
        if let Some(queue) = self.slots.get_mut(index) {
            queue.stamp(ticket);
        }
        debug!(target: TARGET, slot = index, %ticket, generation = ticket.generation(), "queue created");
        Ok(ticket)
    }

    /// Deletes the queue and frees its slot.
    pub fn delete(&mut self, ticket: Ticket) -> Result<(), QueueError> {
        let index = self.resolve("delete", ticket)?;
        self.slots.free(index);
        debug!(target: TARGET, slot = index, %ticket, "queue deleted");
        Ok(())
    }

    /// Appends `value` to the tail of the queue.
    pub fn push(&mut self, ticket: Ticket, value: Element) -> Result<(), QueueError> {
        let index = self.resolve("push", ticket)?;
        let queue = self.slots.get_mut(index).ok_or(QueueError::UnusedSlot { index })?;
        queue.push(value).map_err(|e| report("push", e))?;
        trace!(target: TARGET, slot = index, value, count = queue.len(), "pushed");
        Ok(())
    }

    /// Removes and returns the front element.
    pub fn pop(&mut self, ticket: Ticket) -> Result<Element, QueueError> {
        let index = self.resolve("pop", ticket)?;
        let queue = self.slots.get_mut(index).ok_or(QueueError::UnusedSlot { index })?;
        let value = queue.pop().map_err(|e| report("pop", e))?;
        trace!(target: TARGET, slot = index, value, count = queue.len(), "popped");
        Ok(value)
    }

    /// Live elements, front first, without removing them.
    pub fn list(&self, ticket: Ticket) -> Result<Vec<Element>, QueueError> {
        let index = self.resolve("list", ticket)?;
        let queue = self.slots.get(index).ok_or(QueueError::UnusedSlot { index })?;
        Ok(queue.iter().collect())
    }

    /// Contents plus slot, generation and head position of the queue.
    pub fn snapshot(&self, ticket: Ticket) -> Result<QueueSnapshot, QueueError> {
        let index = self.resolve("snapshot", ticket)?;
        let queue = self.slots.get(index).ok_or(QueueError::UnusedSlot { index })?;
        Ok(QueueSnapshot {
            index,
            generation: ticket.generation(),
            head: queue.head(),
            elements: queue.iter().collect(),
        })
    }

    /// Number of elements in the queue.
    pub fn len(&self, ticket: Ticket) -> Result<usize, QueueError> {
        let index = self.resolve("len", ticket)?;
        self.slots.get(index).map(|q| q.len()).ok_or(QueueError::UnusedSlot { index })
    }

    /// Whether the queue holds no elements.
    pub fn is_empty(&self, ticket: Ticket) -> Result<bool, QueueError> { self.len(ticket).map(|n| n == 0) }

    /// Number of queues currently alive.
    pub fn live_queues(&self) -> usize { self.slots.occupied() }

    /// Maximum number of elements per queue.
    pub const fn capacity(&self) -> usize { MAXELT }

    /// Maximum number of simultaneous queues.
    pub const fn max_queues(&self) -> usize { MAXQ }

    fn resolve(&self, op: &'static str, ticket: Ticket) -> Result<usize, QueueError> {
        ticket::decode(ticket, &self.slots).map_err(|e| {
            trace!(target: TARGET, op, %ticket, error = %e, "ticket rejected");
            report(op, e)
        })
    }

    #[cfg(test)]
    fn with_codec(codec: TicketCodec) -> Self { QueueRegistry { slots: SlotTable::new(), codec } }
}

impl<const MAXQ: usize, const MAXELT: usize> Default for QueueRegistry<MAXQ, MAXELT> {
    fn default() -> Self { Self::new() }
}

impl<const MAXQ: usize, const MAXELT: usize> fmt::Debug for QueueRegistry<MAXQ, MAXELT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueRegistry")
            .field("max_queues", &MAXQ)
            .field("capacity", &MAXELT)
            .field("live_queues", &self.live_queues())
            .finish()
    }
}

/// Surfaces broken invariants in the log; every error is passed through.
fn report(op: &'static str, err: QueueError) -> QueueError {
    if err.kind() == ErrorKind::InternalInconsistency {
        warn!(target: TARGET, op, code = err.code(), "{err}");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::MAX_GENERATION;

    #[test]
    fn create_push_pop() {
        let mut reg = QueueRegistry::<4, 8>::new();
        let t = reg.create().unwrap();
        reg.push(t, 5).unwrap();
        reg.push(t, 6).unwrap();
        assert_eq!(reg.len(t), Ok(2));
        assert_eq!(reg.pop(t), Ok(5));
        assert_eq!(reg.pop(t), Ok(6));
        assert_eq!(reg.is_empty(t), Ok(true));
    }

    #[test]
    fn failed_create_releases_slot() {
        let mut reg = QueueRegistry::<2, 2>::with_codec(TicketCodec::starting_at(MAX_GENERATION));
        let last = reg.create().unwrap();
        let err = reg.create().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInconsistency);
        assert_eq!(reg.live_queues(), 1);

        // freeing a slot does not bring generations back
        reg.delete(last).unwrap();
        assert_eq!(reg.create().unwrap_err().kind(), ErrorKind::InternalInconsistency);
        assert_eq!(reg.live_queues(), 0);
    }

    #[test]
    fn snapshot_renders_debug_line() {
        let mut reg = QueueRegistry::<2, 4>::new();
        let _first = reg.create().unwrap();
        let t = reg.create().unwrap();
        for v in [1, 2, 3] { reg.push(t, v).unwrap(); }
        reg.pop(t).unwrap();

        let snap = reg.snapshot(t).unwrap();
        assert_eq!(snap, QueueSnapshot { index: 1, generation: 2, head: 1, elements: vec![2, 3] });
        assert_eq!(snap.to_string(), "queue (index=1, nonce=2, count=2, start=1): 2 3");
    }

    #[test]
    #[should_panic(expected = "queue capacity must be greater than 0")]
    fn zero_capacity_panics() {
        let _reg = QueueRegistry::<1, 0>::new();
    }

    #[test]
    #[should_panic(expected = "queue count must be greater than 0")]
    fn zero_queue_count_panics() {
        let _reg = QueueRegistry::<0, 1>::new();
    }
}
