use gauge_core::Frame;
use std::collections::VecDeque;

/// Bounded log of recently received frames, newest first.
///
/// Charts mounted after the feed has been running bootstrap from this log so
/// they do not start blank.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    frames:   VecDeque<Frame>,
    capacity: usize,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames:   VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Seed from a newest-first batch, keeping at most `capacity` frames.
    pub fn with_frames(capacity: usize, newest_first: Vec<Frame>) -> Self {
        let mut history = Self::new(capacity);
        history.frames.extend(newest_first.into_iter().take(capacity));
        history
    }

    /// Record a new frame, evicting the oldest if at capacity.
    pub fn record(&mut self, frame: Frame) {
        if self.capacity == 0 {
            return;
        }
        if self.frames.len() == self.capacity {
            self.frames.pop_back();
        }
        self.frames.push_front(frame);
    }

    /// Frames newest first.
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = &Frame> + ExactSizeIterator {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
