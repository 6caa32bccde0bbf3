use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::{
    filter::FrameOp,
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
    pipeline::arena::FrameArena,
    pipeline::chunk::ChunkPlan,
    store::FrameStore,
};

/// Default number of frames held in memory per chunk.
pub const DEFAULT_STRIDE_LEN: usize = 20;

/// Driver options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverOpts {
    /// Frames per chunk; also the residency bound.
    pub stride_len: usize,
    /// Log per-frame transform timings at `info`.
    pub trace_frames: bool,
}

impl Default for DriverOpts {
    fn default() -> Self {
        Self {
            stride_len: DEFAULT_STRIDE_LEN,
            trace_frames: false,
        }
    }
}

/// Driver lifecycle. Transitions only move forward; `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    LoadingChunk,
    ProcessingChunk,
    StoringChunk,
    Done,
}

/// Outcome of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Time spent inside the frame transform only (I/O excluded), summed per frame.
    pub transform_time: Duration,
    /// Frame count reported by the store before the run.
    pub frames_predicted: usize,
    pub chunks_planned: usize,
    pub chunks_completed: usize,
    pub frames_processed: usize,
    pub frames_stored: usize,
    /// First missing frame, when the run ended before the predicted count.
    pub stopped_at: Option<FrameNumber>,
    /// Most frames resident at once.
    pub peak_resident: usize,
}

impl RunReport {
    pub fn ended_early(&self) -> bool {
        self.stopped_at.is_some()
    }
}

/// Chunked read → transform → write loop over a [`FrameStore`].
pub struct Driver {
    op: FrameOp,
    opts: DriverOpts,
    state: DriverState,
    arena: FrameArena,
}

impl Driver {
    pub fn new(op: FrameOp, opts: DriverOpts) -> ReelResult<Self> {
        if opts.stride_len == 0 {
            return Err(ReelError::validation("stride length must be > 0"));
        }
        let arena = FrameArena::with_capacity(opts.stride_len)?;
        Ok(Self {
            op,
            opts,
            state: DriverState::Idle,
            arena,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Process every frame the store can provide.
    ///
    /// A missing frame ends the run: frames already loaded for the current chunk are dropped
    /// without being transformed or stored, and the report so far is returned. Any error
    /// aborts the run.
    #[tracing::instrument(skip_all, fields(op = self.op.name(), stride_len = self.opts.stride_len))]
    pub fn run(&mut self, store: &mut dyn FrameStore) -> ReelResult<RunReport> {
        if self.state != DriverState::Idle {
            return Err(ReelError::validation("driver has already run"));
        }
        let res = self.run_chunks(store);
        self.transition(DriverState::Done);
        res
    }

    fn run_chunks(&mut self, store: &mut dyn FrameStore) -> ReelResult<RunReport> {
        let num_frames = store.count_frames()?;
        let plan = ChunkPlan::new(num_frames, self.opts.stride_len)?;
        let mut report = RunReport {
            frames_predicted: num_frames,
            chunks_planned: plan.num_chunks(),
            ..RunReport::default()
        };
        info!(
            frames = num_frames,
            chunks = report.chunks_planned,
            "starting pipeline"
        );

        for (ci, positions) in plan.chunks().enumerate() {
            self.transition(DriverState::LoadingChunk);
            self.arena.clear();
            for pos in positions {
                let n = FrameNumber::from_position(pos)?;
                match store.load(n)? {
                    Some(frame) => {
                        self.arena.push(n, frame)?;
                    }
                    None => {
                        info!(frame = %n, "all files processed");
                        self.arena.clear();
                        report.stopped_at = Some(n);
                        report.peak_resident = self.arena.stats().peak_resident;
                        return Ok(report);
                    }
                }
            }

            self.transition(DriverState::ProcessingChunk);
            for slot in self.arena.iter_mut() {
                let begin = Instant::now();
                self.op.apply(&mut slot.frame);
                let spent = begin.elapsed();
                report.transform_time += spent;
                report.frames_processed += 1;
                if self.opts.trace_frames {
                    info!(frame = %slot.number, micros = spent.as_micros() as u64, "frame transformed");
                }
            }

            self.transition(DriverState::StoringChunk);
            for slot in self.arena.iter() {
                store.store(slot.number, &slot.frame)?;
                report.frames_stored += 1;
            }

            report.chunks_completed += 1;
            debug!(
                chunk = ci,
                frames = self.arena.len(),
                slots = self.arena.allocated_slots(),
                transform_ms = report.transform_time.as_millis() as u64,
                "chunk done"
            );
        }

        self.arena.clear();
        report.peak_resident = self.arena.stats().peak_resident;
        Ok(report)
    }

    fn transition(&mut self, next: DriverState) {
        trace!(from = ?self.state, to = ?next, "driver state");
        self.state = next;
    }
}

/// Build a [`Driver`] and run it once over `store`.
pub fn process_frames(
    store: &mut dyn FrameStore,
    op: FrameOp,
    opts: DriverOpts,
) -> ReelResult<RunReport> {
    Driver::new(op, opts)?.run(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernel::Kernel;
    use crate::foundation::core::Rgb8;
    use crate::frame::Frame;
    use crate::store::memory::InMemoryStore;

    fn frames(n: usize) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame::filled(2, 2, Rgb8::new(i as u8, 2 * i as u8, 3 * i as u8)).unwrap())
            .collect()
    }

    fn opts(stride_len: usize) -> DriverOpts {
        DriverOpts {
            stride_len,
            trace_frames: false,
        }
    }

    #[test]
    fn processes_every_frame_in_order() {
        let mut store = InMemoryStore::from_frames(frames(7));
        let report = process_frames(&mut store, FrameOp::Desaturate, opts(3)).unwrap();

        assert_eq!(report.frames_predicted, 7);
        assert_eq!(report.chunks_planned, 3);
        assert_eq!(report.chunks_completed, 3);
        assert_eq!(report.frames_processed, 7);
        assert_eq!(report.frames_stored, 7);
        assert!(!report.ended_early());
        assert!(report.peak_resident <= 3);

        let loads: Vec<u32> = store.loads().iter().map(|n| n.0).collect();
        assert_eq!(loads, (1..=7).collect::<Vec<_>>());
        let px = store.outputs()[&FrameNumber(3)].pixel(0, 0);
        assert_eq!(px, Rgb8::gray(4));
    }

    #[test]
    fn stops_at_first_gap_and_drops_partial_chunk() {
        let mut store = InMemoryStore::from_frames(frames(6));
        store.remove(FrameNumber(4));

        let report =
            process_frames(&mut store, FrameOp::Convolve(Kernel::identity()), opts(2)).unwrap();

        assert_eq!(report.stopped_at, Some(FrameNumber(4)));
        assert_eq!(report.chunks_completed, 1);
        assert_eq!(report.frames_processed, 2);
        let stored: Vec<u32> = store.outputs().keys().map(|n| n.0).collect();
        assert_eq!(stored, vec![1, 2]);
        assert!(!store.loads().contains(&FrameNumber(5)));
    }

    #[test]
    fn overstated_count_ends_gracefully() {
        let mut store = InMemoryStore::from_frames(frames(4));
        store.set_reported_count(6);

        let report = process_frames(&mut store, FrameOp::Desaturate, opts(4)).unwrap();

        assert_eq!(report.frames_stored, 4);
        assert_eq!(report.stopped_at, Some(FrameNumber(5)));
        assert_eq!(store.loads().last(), Some(&FrameNumber(5)));
    }

    #[test]
    fn empty_store_does_nothing() {
        let mut store = InMemoryStore::new();
        let report = process_frames(&mut store, FrameOp::Desaturate, opts(20)).unwrap();
        assert_eq!(report, RunReport::default());
        assert!(store.loads().is_empty());
    }

    #[test]
    fn residency_never_exceeds_stride() {
        let mut store = InMemoryStore::from_frames(frames(11));
        let report = process_frames(&mut store, FrameOp::Desaturate, opts(4)).unwrap();
        assert_eq!(report.peak_resident, 4);
    }

    #[test]
    fn driver_reaches_done_and_cannot_rerun() {
        let mut store = InMemoryStore::from_frames(frames(2));
        let mut d = Driver::new(FrameOp::Desaturate, opts(1)).unwrap();
        assert_eq!(d.state(), DriverState::Idle);
        d.run(&mut store).unwrap();
        assert_eq!(d.state(), DriverState::Done);
        assert!(d.run(&mut store).is_err());
    }

    #[test]
    fn unbounded_stride_processes_short_sequence() {
        let mut store = InMemoryStore::from_frames(frames(2));
        let report = process_frames(&mut store, FrameOp::Desaturate, opts(usize::MAX)).unwrap();
        assert_eq!(report.chunks_planned, 1);
        assert_eq!(report.frames_stored, 2);
        assert_eq!(report.peak_resident, 2);
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(Driver::new(FrameOp::Desaturate, opts(0)).is_err());
    }
}
