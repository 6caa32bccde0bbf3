use crate::foundation::core::FrameNumber;
use crate::foundation::error::{ReelError, ReelResult};
use crate::frame::Frame;

/// A loaded frame and the number it was loaded under.
#[derive(Debug)]
pub struct Slot {
    pub number: FrameNumber,
    pub frame: Frame,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Most frames resident at once.
    pub peak_resident: usize,
    /// Number of `clear` calls that released at least one frame.
    pub recycles: u64,
}

/// Bounded, slot-addressed holder for one chunk of frames.
///
/// Slots are created on first use, never beyond `capacity`, and reused across chunks; `clear`
/// releases the frames but keeps the slots.
pub struct FrameArena {
    capacity: usize,
    slots: Vec<Option<Slot>>,
    len: usize,
    stats: ArenaStats,
}

impl FrameArena {
    pub fn with_capacity(capacity: usize) -> ReelResult<Self> {
        if capacity == 0 {
            return Err(ReelError::validation("frame arena capacity must be > 0"));
        }
        Ok(Self {
            capacity,
            slots: Vec::new(),
            len: 0,
            stats: ArenaStats::default(),
        })
    }

    /// Most frames the arena will ever hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots allocated so far.
    pub fn allocated_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> ArenaStats {
        self.stats
    }

    /// Place `frame` in the next free slot and return the slot index.
    pub fn push(&mut self, number: FrameNumber, frame: Frame) -> ReelResult<usize> {
        let idx = self.len;
        if idx >= self.capacity {
            return Err(ReelError::validation(format!(
                "frame arena is full ({} frames)",
                self.capacity
            )));
        }
        let slot = Some(Slot { number, frame });
        match self.slots.get_mut(idx) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
        self.len += 1;
        self.stats.peak_resident = self.stats.peak_resident.max(self.len);
        Ok(idx)
    }

    pub fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots[..self.len].iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots[..self.len].iter_mut().flatten()
    }

    /// Release every resident frame, keeping the slot storage.
    pub fn clear(&mut self) {
        if self.len > 0 {
            self.stats.recycles = self.stats.recycles.saturating_add(1);
        }
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgb8;

    fn frame(v: u8) -> Frame {
        Frame::filled(1, 1, Rgb8::gray(v)).unwrap()
    }

    #[test]
    fn arena_honors_capacity() {
        let mut a = FrameArena::with_capacity(2).unwrap();
        assert_eq!(a.push(FrameNumber(1), frame(1)).unwrap(), 0);
        assert_eq!(a.push(FrameNumber(2), frame(2)).unwrap(), 1);
        assert!(a.push(FrameNumber(3), frame(3)).is_err());
        assert_eq!(a.len(), 2);
        assert_eq!(a.capacity(), 2);
    }

    #[test]
    fn huge_capacity_allocates_only_used_slots() {
        let mut a = FrameArena::with_capacity(usize::MAX).unwrap();
        assert_eq!(a.allocated_slots(), 0);
        a.push(FrameNumber(1), frame(1)).unwrap();
        a.push(FrameNumber(2), frame(2)).unwrap();
        assert_eq!(a.allocated_slots(), 2);
        assert_eq!(a.capacity(), usize::MAX);
    }

    #[test]
    fn clear_recycles_slots() {
        let mut a = FrameArena::with_capacity(3).unwrap();
        a.push(FrameNumber(1), frame(1)).unwrap();
        a.push(FrameNumber(2), frame(2)).unwrap();
        a.clear();
        assert!(a.is_empty());
        assert!(a.slot(0).is_none());

        a.push(FrameNumber(3), frame(3)).unwrap();
        assert_eq!(a.slot(0).map(|s| s.number), Some(FrameNumber(3)));
        assert_eq!(a.allocated_slots(), 2, "slots are reused, not reallocated");
        assert_eq!(a.iter().count(), 1);

        let st = a.stats();
        assert_eq!(st.peak_resident, 2);
        assert_eq!(st.recycles, 1);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(FrameArena::with_capacity(0).is_err());
    }
}
