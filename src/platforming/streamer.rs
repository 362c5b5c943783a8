//! World Segment Streamer
//!
//! Keeps a sliding window of level chunks alive around a viewpoint. The
//! viewpoint's distance from the reference line is bucketed into segment
//! indices; chunks inside `current ± buffer` are built, chunks further
//! than `buffer + 1` away are torn down. The one-segment gap between the
//! two rules stops chunks from flickering when the viewpoint hovers on a
//! boundary.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    pub segment_height: f32,
    pub buffer: i32,
    /// Highest valid segment index (inclusive). Index 0 is the lowest.
    pub max_index: i32,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            segment_height: 500.0,
            buffer: 2,
            max_index: 8,
        }
    }
}

/// Builds and tears down the entities that make up one chunk.
pub trait SegmentBuilder {
    type Chunk;

    fn build(&mut self, index: i32) -> Self::Chunk;
    fn destroy(&mut self, index: i32, chunk: Self::Chunk);
}

/// What one `update` changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub current: i32,
    pub created: Vec<i32>,
    pub destroyed: Vec<i32>,
}

impl StreamReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

pub struct SegmentStreamer<C> {
    config: StreamerConfig,
    live: BTreeMap<i32, C>,
}

impl<C> SegmentStreamer<C> {
    pub fn new(config: StreamerConfig) -> Self {
        Self {
            config,
            live: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Segment index of `distance`, or `None` when it isn't a finite number.
    /// Distances beyond the `i32` range clamp to its ends.
    pub fn current_segment(&self, distance: f32) -> Option<i32> {
        let segment = (distance / self.config.segment_height).floor();
        segment.is_finite().then_some(segment as i32)
    }

    /// Indices that should be live for `current`, before range clipping.
    pub fn window(&self, current: i32) -> RangeInclusive<i32> {
        current.saturating_sub(self.config.buffer)..=current.saturating_add(self.config.buffer)
    }

    /// Bring the live set in line with the viewpoint.
    ///
    /// Returns `None` and leaves the live set alone for a non-finite distance.
    pub fn update<B>(&mut self, distance: f32, builder: &mut B) -> Option<StreamReport>
    where
        B: SegmentBuilder<Chunk = C>,
    {
        let current = self.current_segment(distance)?;
        let mut report = StreamReport {
            current,
            ..Default::default()
        };

        for index in self.window(current) {
            // Out-of-level indices are skipped, not errors
            if index < 0 || index > self.config.max_index {
                continue;
            }
            if !self.live.contains_key(&index) {
                let chunk = builder.build(index);
                self.live.insert(index, chunk);
                report.created.push(index);
            }
        }

        let keep = self.config.buffer.saturating_add(1).max(0) as u32;
        let stale: Vec<i32> = self
            .live
            .keys()
            .copied()
            .filter(|index| index.abs_diff(current) > keep)
            .collect();
        for index in stale {
            if let Some(chunk) = self.live.remove(&index) {
                builder.destroy(index, chunk);
                report.destroyed.push(index);
            }
        }

        Some(report)
    }

    /// Tear down every live chunk.
    pub fn clear<B>(&mut self, builder: &mut B)
    where
        B: SegmentBuilder<Chunk = C>,
    {
        for (index, chunk) in std::mem::take(&mut self.live) {
            builder.destroy(index, chunk);
        }
    }

    pub fn contains(&self, index: i32) -> bool {
        self.live.contains_key(&index)
    }

    pub fn live_indices(&self) -> Vec<i32> {
        self.live.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
