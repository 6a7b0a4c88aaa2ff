//! Lock-free overwrite ring of timing events.
//!
//! # Overview
//! - Single producer (the capture path of one line), single consumer.
//! - The producer never blocks; on wrap it overwrites the oldest record.
//! - Ring sequence numbers are monotonically increasing `u32`; `0` is reserved to mean "empty".
//! - Each record also carries its per-edge sequence: asserts and clears are counted separately.
//! - The consumer drains in order (`poll_one`/`poll_up_to`) or fetches the newest assert and
//!   clear records (`fetch`). The newest of each edge is kept outside the ring slots, so it
//!   survives any number of wraps.
//! - A closed ring refuses events with [`ConsumerUnavailable`].
//!
//! # Memory ordering
//! The producer writes the record, publishes the per-slot sequence, updates the newest record
//! of its edge, then publishes the newest overall sequence. The consumer validates the per-slot
//! sequence before and after reading, which rejects records torn by a concurrent overwrite.
//! The newest-per-edge records are seqlocks: odd versions mark a write in progress, and a read
//! is kept only if the version is even and unchanged across it.

use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::mem::MaybeUninit;

use crate::atomic::{AtomicBool, AtomicU32, Ordering, fence};
use crate::classify::EventKind;
use crate::dispatch::EventSink;
use crate::error::ConsumerUnavailable;
use crate::time::Instant;

/// A published timing event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PpsRecord {
    /// Per-edge sequence: the n-th assert or the n-th clear, starting at 1.
    pub sequence: u32,
    pub kind: EventKind,
    pub timestamp: Instant,
}

/// Newest assert and clear records, as a PPS fetch would report them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PpsFetch {
    pub assert: Option<PpsRecord>,
    pub clear: Option<PpsRecord>,
}

#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct PollStats {
    pub read: usize,
    pub dropped: usize,
    pub newest: u32,
}

/// Single-writer seqlock holding the newest record of one edge. Version `0` means empty.
struct LatestRecord {
    version: AtomicU32,
    record: UnsafeCell<MaybeUninit<PpsRecord>>,
}

impl LatestRecord {
    fn new() -> Self {
        Self {
            version: AtomicU32::new(0),
            record: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Producer only.
    #[inline]
    fn store(&self, record: PpsRecord) {
        let version = self.version.load(Ordering::Relaxed);
        self.version.store(version.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        unsafe { (*self.record.get()).as_mut_ptr().write(record) };

        let mut next = version.wrapping_add(2);
        if next == 0 {
            next = 2;
        }
        self.version.store(next, Ordering::Release);
    }

    fn load(&self) -> Option<PpsRecord> {
        loop {
            let v1 = self.version.load(Ordering::Acquire);
            if v1 == 0 {
                return None;
            }
            if v1 & 1 == 1 {
                spin_loop();
                continue;
            }

            let record = unsafe { (*self.record.get()).assume_init_read() };

            fence(Ordering::Acquire);
            if self.version.load(Ordering::Relaxed) == v1 {
                return Some(record);
            }
            spin_loop();
        }
    }
}

/// Overwrite ring for one line's timing events.
/// Producer never waits; consumer may drop if it lags > N.
pub struct EventRing<const N: usize> {
    next_seq: AtomicU32,
    published_seq: AtomicU32,
    slot_seq: [AtomicU32; N],
    slots: [UnsafeCell<MaybeUninit<PpsRecord>>; N],
    assert_count: AtomicU32,
    clear_count: AtomicU32,
    latest_assert: LatestRecord,
    latest_clear: LatestRecord,
    open: AtomicBool,
}

unsafe impl<const N: usize> Sync for EventRing<N> {}

impl<const N: usize> Default for EventRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventRing<N> {
    pub fn new() -> Self {
        const { assert!(N > 0) };
        Self {
            next_seq: AtomicU32::new(0),
            published_seq: AtomicU32::new(0),
            slot_seq: core::array::from_fn(|_| AtomicU32::new(0)),
            slots: core::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
            assert_count: AtomicU32::new(0),
            clear_count: AtomicU32::new(0),
            latest_assert: LatestRecord::new(),
            latest_clear: LatestRecord::new(),
            open: AtomicBool::new(true),
        }
    }

    #[inline(always)]
    const fn idx_for(seq: u32) -> usize {
        ((seq.wrapping_sub(1)) as usize) % N
    }

    /// Create the producer handle. Only one producer may be active.
    #[inline]
    pub fn producer(&self) -> RingProducer<'_, N> {
        RingProducer { ring: self }
    }

    /// Create the consumer handle. Only one consumer may be active.
    #[inline]
    pub fn consumer(&self) -> RingConsumer<'_, N> {
        RingConsumer {
            ring: self,
            last_seq: 0,
            dropped_accum: 0,
        }
    }

    #[inline]
    fn newest_seq(&self) -> u32 {
        self.published_seq.load(Ordering::Acquire)
    }

    fn record_inner(
        &self,
        timestamp: Instant,
        kind: EventKind,
    ) -> Result<Option<u32>, ConsumerUnavailable> {
        if !self.open.load(Ordering::Acquire) {
            return Err(ConsumerUnavailable);
        }

        let (count, latest) = match kind {
            EventKind::Assert => (&self.assert_count, &self.latest_assert),
            EventKind::Clear => (&self.clear_count, &self.latest_clear),
            EventKind::Ignored => return Ok(None),
        };

        // Single producer: plain load/store on the edge counter is enough.
        let sequence = count.load(Ordering::Relaxed).wrapping_add(1);
        count.store(sequence, Ordering::Relaxed);

        let mut seq = self
            .next_seq
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);
        if seq == 0 {
            seq = 1;
            self.next_seq.store(1, Ordering::Relaxed);
        }

        let idx = Self::idx_for(seq);
        let record = PpsRecord {
            sequence,
            kind,
            timestamp,
        };
        unsafe { (*self.slots[idx].get()).as_mut_ptr().write(record) };

        self.slot_seq[idx].store(seq, Ordering::Release);
        latest.store(record);
        self.published_seq.store(seq, Ordering::Release);
        Ok(Some(seq))
    }

    #[inline]
    fn read_seq_inner(&self, seq: u32) -> Option<PpsRecord> {
        if seq == 0 {
            return None;
        }
        let idx = Self::idx_for(seq);

        if self.slot_seq[idx].load(Ordering::Acquire) != seq {
            return None;
        }

        let record = unsafe { (*self.slots[idx].get()).assume_init_read() };

        if self.slot_seq[idx].load(Ordering::Acquire) != seq {
            return None;
        }

        Some(record)
    }
}

/// Producing side of an [`EventRing`]; the sink a capture session publishes into.
pub struct RingProducer<'a, const N: usize> {
    ring: &'a EventRing<N>,
}

impl<'a, const N: usize> RingProducer<'a, N> {
    /// Record an event. Returns its ring sequence, or `None` for an `Ignored` kind.
    #[inline]
    pub fn record(
        &self,
        timestamp: Instant,
        kind: EventKind,
    ) -> Result<Option<u32>, ConsumerUnavailable> {
        self.ring.record_inner(timestamp, kind)
    }
}

impl<const N: usize> EventSink for RingProducer<'_, N> {
    #[inline]
    fn publish(&self, timestamp: Instant, kind: EventKind) -> Result<(), ConsumerUnavailable> {
        self.record(timestamp, kind).map(|_| ())
    }
}

pub struct RingConsumer<'a, const N: usize> {
    ring: &'a EventRing<N>,
    last_seq: u32,
    dropped_accum: usize,
}

impl<'a, const N: usize> RingConsumer<'a, N> {
    /// Stop accepting events. The producer gets [`ConsumerUnavailable`] until `reopen`.
    #[inline]
    pub fn close(&self) {
        self.ring.open.store(false, Ordering::Release);
    }

    #[inline]
    pub fn reopen(&self) {
        self.ring.open.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.ring.open.load(Ordering::Acquire)
    }

    /// How many records have been dropped since consumer creation (or since reset).
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped_accum
    }

    /// Reset the internal drop counter.
    #[inline]
    pub fn reset_dropped(&mut self) {
        self.dropped_accum = 0;
    }

    /// Newest assert and clear records, without moving the drain cursor.
    pub fn fetch(&self) -> PpsFetch {
        PpsFetch {
            assert: self.ring.latest_assert.load(),
            clear: self.ring.latest_clear.load(),
        }
    }

    /// Drain at most one record (in order).
    /// Returns true if a record was delivered to the hook.
    #[inline]
    pub fn poll_one(&mut self, hook: impl FnOnce(u32, &PpsRecord)) -> bool {
        let mut hook = Some(hook);
        let stats = self.poll_up_to(1, |seq, r| {
            if let Some(hook) = hook.take() {
                hook(seq, r);
            }
        });
        stats.read == 1
    }

    /// Drain up to `max` records (in order).
    pub fn poll_up_to(&mut self, max: usize, mut hook: impl FnMut(u32, &PpsRecord)) -> PollStats {
        let mut newest = self.ring.newest_seq();
        let mut stats = PollStats {
            read: 0,
            dropped: 0,
            newest,
        };
        if max == 0 || newest == 0 {
            return stats;
        }

        while stats.read < max {
            newest = self.ring.newest_seq();
            if self.last_seq == newest {
                break;
            }

            if newest.wrapping_sub(self.last_seq) as usize > N {
                stats.dropped += self.skip_overwritten(newest);
                continue;
            }

            let next = self.last_seq.wrapping_add(1);
            self.last_seq = next;
            match self.ring.read_seq_inner(next) {
                Some(r) => {
                    hook(next, &r);
                    stats.read += 1;
                }
                None => stats.dropped += 1,
            }
        }

        stats.newest = newest;
        self.dropped_accum += stats.dropped;
        stats
    }

    /// Move the cursor past records the producer has already overwritten.
    fn skip_overwritten(&mut self, newest: u32) -> usize {
        let next = self.last_seq.wrapping_add(1);
        let keep_from = newest.wrapping_sub((N - 1) as u32);
        self.last_seq = keep_from.wrapping_sub(1);
        keep_from.wrapping_sub(next) as usize
    }

    /// Fast-forward so the next `poll_one()` yields the newest record.
    #[inline]
    pub fn skip_to_latest(&mut self) {
        let newest = self.ring.newest_seq();
        if newest != 0 {
            self.last_seq = newest.wrapping_sub(1);
        }
    }
}
