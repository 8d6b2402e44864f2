/// Adaptive batch sizing for chunked materialization.
///
/// Each tick measures the time since the previous chunk tick and scales the batch so that the
/// work per tick trends toward the target frame time:
/// `next = round(prev * target_frame_ms / measured_ms)`, never below 1.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkPacer {
    chunk: usize,
    last_tick_ms: Option<u64>,
}

impl ChunkPacer {
    pub fn new(initial_chunk: usize) -> Self {
        Self {
            chunk: initial_chunk.max(1),
            last_tick_ms: None,
        }
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn last_tick_ms(&self) -> Option<u64> {
        self.last_tick_ms
    }

    /// Returns the batch size for a tick at `now_ms`, clamped to `[1, pending]`.
    ///
    /// With `target_frame_ms = None` the chunk size stays fixed.
    pub fn next_batch(&mut self, now_ms: u64, pending: usize, target_frame_ms: Option<f64>) -> usize {
        if let (Some(last), Some(target)) = (self.last_tick_ms, target_frame_ms) {
            let measured = now_ms.saturating_sub(last).max(1) as f64;
            let scaled = self.chunk as f64 * target / measured;
            self.chunk = ((scaled + 0.5) as usize).max(1);
        }
        self.last_tick_ms = Some(now_ms);
        self.chunk.clamp(1, pending.max(1))
    }
}
