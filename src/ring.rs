//! Bounded circular FIFO living in one registry slot.

use crate::error::{InconsistencyCause, QueueError};
use crate::ticket::Ticket;
use crate::Element;

/// One queue: a fixed buffer of `MAXELT` elements plus head index and count.
///
/// Live elements are `buffer[(head + i) % MAXELT]` for `i < count`.
pub(crate) struct RingQueue<const MAXELT: usize> {
    ticket: Ticket,
    buffer: Box<[Element; MAXELT]>,
    head: usize,
    count: usize,
}

impl<const MAXELT: usize> RingQueue<MAXELT> {
    /// Allocates an empty queue, reporting allocation failure as `NoRoom`.
    ///
    /// The ticket is left unissued until the codec stamps it.
    pub(crate) fn try_new() -> Result<Self, QueueError> {
        let no_room = || QueueError::NoRoom { capacity: MAXELT };
        let mut v: Vec<Element> = Vec::new();
        v.try_reserve_exact(MAXELT).map_err(|_| no_room())?;
        v.resize(MAXELT, 0);
        let buffer: Box<[Element; MAXELT]> = v.into_boxed_slice().try_into().map_err(|_| no_room())?;

        Ok(RingQueue { ticket: Ticket::UNISSUED, buffer, head: 0, count: 0 })
    }

    pub(crate) fn ticket(&self) -> Ticket { self.ticket }
    pub(crate) fn stamp(&mut self, ticket: Ticket) { self.ticket = ticket; }
    pub(crate) fn head(&self) -> usize { self.head }
    pub(crate) fn len(&self) -> usize { self.count }

    /// Appends at the tail; never grows the buffer.
    pub(crate) fn push(&mut self, value: Element) -> Result<(), QueueError> {
        if self.count == MAXELT {
            return Err(QueueError::TooFull { capacity: MAXELT });
        }
        self.buffer[(self.head + self.count) % MAXELT] = value;
        self.count += 1;
        Ok(())
    }

    /// Removes the front element.
    pub(crate) fn pop(&mut self) -> Result<Element, QueueError> {
        if self.count == 0 {
            return Err(QueueError::Empty);
        }
        let value = self.buffer[self.head];
        self.count -= 1;
        self.head = (self.head + 1) % MAXELT;
        Ok(value)
    }

    /// Live elements from the front, without consuming them.
    pub(crate) fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        (0..self.count).map(move |i| self.buffer[(self.head + i) % MAXELT])
    }

    /// Checks `head` and `count` against the buffer length.
    pub(crate) fn check_bounds(&self) -> Result<(), QueueError> {
        if self.head >= MAXELT || self.count > MAXELT {
            return Err(QueueError::Inconsistency(InconsistencyCause::Bounds {
                head: self.head,
                count: self.count,
            }));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn corrupt(&mut self, head: usize, count: usize) {
        self.head = head;
        self.count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let mut q = RingQueue::<4>::try_new().unwrap();
        assert_eq!(q.len(), 0);
        assert_eq!(q.head(), 0);
        assert_eq!(q.pop(), Err(QueueError::Empty));
        assert!(q.check_bounds().is_ok());
    }

    #[test]
    fn full_then_drain() {
        let mut q = RingQueue::<3>::try_new().unwrap();
        for i in 0..3 { q.push(i).unwrap(); }
        assert_eq!(q.push(99), Err(QueueError::TooFull { capacity: 3 }));
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        for i in 0..3 { assert_eq!(q.pop(), Ok(i)); }
        assert_eq!(q.pop(), Err(QueueError::Empty));
    }

    #[test]
    fn head_wraps() {
        let mut q = RingQueue::<4>::try_new().unwrap();
        for i in 0..3 { q.push(i).unwrap(); }
        for _ in 0..3 { q.pop().unwrap(); }
        // head is now 3; the next pushes straddle the end of the buffer
        for i in 10..14 { q.push(i).unwrap(); }
        assert_eq!(q.head(), 3);
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![10, 11, 12, 13]);
        for i in 10..14 { assert_eq!(q.pop(), Ok(i)); }
        assert_eq!(q.head(), 3);
    }

    #[test]
    fn out_of_range_state_is_reported() {
        let mut q = RingQueue::<4>::try_new().unwrap();
        q.corrupt(4, 0);
        assert!(matches!(
            q.check_bounds(),
            Err(QueueError::Inconsistency(InconsistencyCause::Bounds { head: 4, count: 0 }))
        ));
        q.corrupt(0, 5);
        assert!(q.check_bounds().is_err());
    }
}
