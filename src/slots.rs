//! Fixed table of queue slots.

use crate::error::QueueError;
use crate::ring::RingQueue;

/// `MAXQ` optional queues. Occupancy alone decides whether an index is live.
pub(crate) struct SlotTable<const MAXQ: usize, const MAXELT: usize> {
    slots: Vec<Option<RingQueue<MAXELT>>>,
}

impl<const MAXQ: usize, const MAXELT: usize> SlotTable<MAXQ, MAXELT> {
    pub(crate) fn new() -> Self {
        let mut slots = Vec::with_capacity(MAXQ);
        slots.resize_with(MAXQ, || None);
        SlotTable { slots }
    }

    /// Claims the lowest free slot and gives it fresh, empty storage.
    pub(crate) fn allocate(&mut self) -> Result<usize, QueueError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(QueueError::TooManyQueues { max: MAXQ })?;
        self.slots[index] = Some(RingQueue::try_new()?);
        Ok(index)
    }

    /// Vacates a slot, dropping its storage. The index must already be validated.
    pub(crate) fn free(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&RingQueue<MAXELT>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut RingQueue<MAXELT>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub(crate) fn occupied(&self) -> usize { self.slots.iter().filter(|s| s.is_some()).count() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_lowest_index_first() {
        let mut table = SlotTable::<3, 2>::new();
        assert_eq!(table.allocate(), Ok(0));
        assert_eq!(table.allocate(), Ok(1));
        assert_eq!(table.allocate(), Ok(2));
        assert_eq!(table.allocate(), Err(QueueError::TooManyQueues { max: 3 }));

        table.free(1);
        assert!(table.get(1).is_none());
        assert_eq!(table.occupied(), 2);
        assert_eq!(table.allocate(), Ok(1));
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let mut table = SlotTable::<2, 2>::new();
        assert!(table.get(5).is_none());
        assert!(table.get_mut(2).is_none());
        table.free(7);
        assert_eq!(table.occupied(), 0);
    }
}
