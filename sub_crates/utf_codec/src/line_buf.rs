//! The growable unit buffer that the line reader accumulates a line in.

use std::mem;

use tracing::debug;

use crate::line_reader::{Line, LineError};
use crate::units::{ByteOrder, CodeUnit};

/// Capacity, in units, of a line buffer's first allocation.
pub(crate) const INITIAL_CAPACITY: usize = 128;

/// Works out the capacity to grow to in order to hold `needed` units of
/// `width` bytes each, starting from `capacity`.
///
/// Capacity doubles from `INITIAL_CAPACITY`.  If doubling would overflow
/// the address space, it falls back to exactly `needed`, and if even that
/// doesn't fit, fails with `LineError::CapacityOverflow`.
pub(crate) fn grow_capacity(
    capacity: usize,
    needed: usize,
    width: usize,
) -> Result<usize, LineError> {
    let fits = |units: usize| {
        units
            .checked_mul(width)
            .map_or(false, |bytes| bytes <= isize::MAX as usize)
    };

    let mut new_capacity = if capacity == 0 {
        INITIAL_CAPACITY
    } else {
        capacity
    };
    while new_capacity < needed {
        match new_capacity.checked_mul(2) {
            Some(doubled) if fits(doubled) => new_capacity = doubled,
            _ => {
                new_capacity = needed;
                break;
            }
        }
    }

    if fits(new_capacity) {
        Ok(new_capacity)
    } else {
        Err(LineError::CapacityOverflow)
    }
}

/// A buffer of units that grows by doubling, reporting allocation failure
/// as an error instead of aborting.
#[derive(Debug)]
pub(crate) struct LineBuf<U> {
    units: Vec<U>,
}

impl<U: CodeUnit> LineBuf<U> {
    pub(crate) fn new() -> LineBuf<U> {
        LineBuf { units: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.units.capacity()
    }

    pub(crate) fn last(&self) -> Option<U> {
        self.units.last().copied()
    }

    /// Replaces the last unit.  Does nothing if the buffer is empty.
    pub(crate) fn set_last(&mut self, unit: U) {
        if let Some(last) = self.units.last_mut() {
            *last = unit;
        }
    }

    /// Makes sure there's room for `needed` units in total.
    fn reserve_total(&mut self, needed: usize) -> Result<(), LineError> {
        let capacity = self.units.capacity();
        if capacity >= needed {
            return Ok(());
        }

        let new_capacity = grow_capacity(capacity, needed, mem::size_of::<U>())?;
        debug!(from = capacity, to = new_capacity, "growing line buffer");
        self.units
            .try_reserve_exact(new_capacity - self.units.len())?;
        Ok(())
    }

    /// Appends one unit, keeping room for a terminator after it.
    pub(crate) fn push(&mut self, unit: U) -> Result<(), LineError> {
        let needed = self
            .len()
            .checked_add(2)
            .ok_or(LineError::CapacityOverflow)?;
        self.reserve_total(needed)?;
        self.units.push(unit);
        Ok(())
    }

    /// Appends the units packed in `bytes`, which hold units in host byte
    /// order.  `bytes.len()` must be a multiple of the unit width.
    pub(crate) fn extend_from_bytes(&mut self, bytes: &[u8]) -> Result<(), LineError> {
        debug_assert_eq!(bytes.len() % U::WIDTH, 0);
        let count = bytes.len() / U::WIDTH;
        if count == 0 {
            return Ok(());
        }

        let needed = self
            .len()
            .checked_add(count)
            .and_then(|n| n.checked_add(1))
            .ok_or(LineError::CapacityOverflow)?;
        self.reserve_total(needed)?;
        self.units
            .extend(bytes.chunks_exact(U::WIDTH).map(U::from_ne_slice));
        Ok(())
    }

    /// Terminates the buffer and hands it over as a `Line`, converting the
    /// units from `order` to host byte order.
    pub(crate) fn finish(mut self, order: ByteOrder) -> Result<Line<U>, LineError> {
        let needed = self
            .len()
            .checked_add(1)
            .ok_or(LineError::CapacityOverflow)?;
        self.reserve_total(needed)?;

        if order == ByteOrder::Swapped {
            for unit in self.units.iter_mut() {
                *unit = unit.swap_bytes();
            }
        }
        self.units.push(U::ZERO);
        Ok(Line::from_terminated(self.units))
    }
}
