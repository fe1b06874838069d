//! Opaque queue tickets and the codec that issues and validates them.
//!
//! A ticket packs the slot index (offset by [`INDEX_OFFSET`]) into its high
//! 16 bits and the slot's generation (offset by [`GENERATION_OFFSET`]) into its
//! low 16 bits. The occupying queue stores the ticket it was issued, so
//! validation is one comparison against that slot: any ticket minted for an
//! earlier occupant carries an older generation and is rejected.

use core::fmt;

use crate::error::{InconsistencyCause, QueueError};
use crate::slots::SlotTable;

/// Added to the slot index before packing.
pub(crate) const INDEX_OFFSET: u32 = 0x1221;
/// Added to the generation before packing.
pub(crate) const GENERATION_OFFSET: u32 = 0x0502;
/// The high field is kept to 15 bits so a ticket stays positive as an `i32`.
const INDEX_FIELD_MAX: u32 = 0x7fff;
const GENERATION_FIELD_MAX: u32 = 0xffff;
const FIELD_BITS: u32 = 16;

/// Largest generation a ticket can carry.
pub const MAX_GENERATION: u32 = GENERATION_FIELD_MAX - GENERATION_OFFSET;
/// Largest slot index a ticket can carry.
pub const MAX_TICKET_INDEX: usize = (INDEX_FIELD_MAX - INDEX_OFFSET) as usize;

/// Caller-held reference to one queue.
///
/// The value is opaque: it only means something to the registry that issued
/// it, and only for as long as that queue has not been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u32);

impl Ticket {
    pub(crate) const UNISSUED: Ticket = Ticket(0);

    /// Raw integer form, for callers that must store tickets as plain integers.
    pub const fn into_raw(self) -> u32 { self.0 }

    /// Rebuilds a ticket from [`Ticket::into_raw`]. Arbitrary values are
    /// accepted here and rejected by the registry when used.
    pub const fn from_raw(raw: u32) -> Self { Ticket(raw) }

    const fn index_field(self) -> u32 { self.0 >> FIELD_BITS }
    const fn generation_field(self) -> u32 { self.0 & GENERATION_FIELD_MAX }

    /// Generation this ticket was issued with.
    pub(crate) const fn generation(self) -> u32 { self.generation_field().wrapping_sub(GENERATION_OFFSET) }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Generation source; starts at 1 and never hands out the same value twice.
pub(crate) struct TicketCodec {
    next_generation: u32,
}

impl TicketCodec {
    pub(crate) const fn new() -> Self { TicketCodec { next_generation: 1 } }

    #[cfg(test)]
    pub(crate) const fn starting_at(next_generation: u32) -> Self { TicketCodec { next_generation } }

    /// Mints the ticket for `index` with the next generation.
    ///
    /// The counter only advances on success, so once generations run out
    /// every later call fails the same way.
    pub(crate) fn encode<const MAXQ: usize>(&mut self, index: usize) -> Result<Ticket, QueueError> {
        if index >= MAXQ {
            return Err(QueueError::Inconsistency(InconsistencyCause::IndexOutOfRange { index, max: MAXQ }));
        }

        let high = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(INDEX_OFFSET))
            .filter(|&h| h <= INDEX_FIELD_MAX)
            .ok_or(QueueError::Inconsistency(InconsistencyCause::IndexFieldOverflow {
                index,
                max: MAX_TICKET_INDEX,
            }))?;

        let low = self
            .next_generation
            .checked_add(GENERATION_OFFSET)
            .filter(|&l| l != 0 && l <= GENERATION_FIELD_MAX)
            .ok_or(QueueError::Inconsistency(InconsistencyCause::GenerationExhausted { max: MAX_GENERATION }))?;

        self.next_generation += 1;
        Ok(Ticket((high << FIELD_BITS) | low))
    }
}

/// Resolves `ticket` to the index of the live queue it was issued for.
pub(crate) fn decode<const MAXQ: usize, const MAXELT: usize>(
    ticket: Ticket,
    slots: &SlotTable<MAXQ, MAXELT>,
) -> Result<usize, QueueError> {
    let index = ticket.index_field().wrapping_sub(INDEX_OFFSET) as usize;
    if index >= MAXQ {
        return Err(QueueError::TicketOutOfRange { index, max: MAXQ });
    }
    let queue = slots.get(index).ok_or(QueueError::UnusedSlot { index })?;

    let stored = queue.ticket();
    if stored != ticket {
        return Err(QueueError::StaleTicket { current: stored.generation(), stale: ticket.generation() });
    }

    queue.check_bounds()?;
    if stored.generation_field() == 0 {
        return Err(QueueError::Inconsistency(InconsistencyCause::ZeroGeneration));
    }
    Ok(index)
}
