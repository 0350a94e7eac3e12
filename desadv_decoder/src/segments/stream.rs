//! Navigable stream of raw segments

use super::raw::RawSegment;

/// Stream of segments with parser-style navigation
#[derive(Debug, Clone)]
pub struct SegmentStream {
    segments: Vec<RawSegment>,
    position: usize,
}

impl SegmentStream {
    pub fn new(segments: Vec<RawSegment>) -> Self {
        Self {
            segments,
            position: 0,
        }
    }

    /// Current segment without advancing
    pub fn current(&self) -> Option<&RawSegment> {
        self.segments.get(self.position)
    }

    /// Look ahead without advancing
    pub fn peek(&self, offset: usize) -> Option<&RawSegment> {
        self.segments.get(self.position + offset)
    }

    /// Advance and return the segment that was current
    pub fn advance(&mut self) -> Option<&RawSegment> {
        if self.position < self.segments.len() {
            let segment = &self.segments[self.position];
            self.position += 1;
            Some(segment)
        } else {
            None
        }
    }

    /// Check if the stream is exhausted
    pub fn is_at_end(&self) -> bool {
        self.position >= self.segments.len()
    }

    /// Save the current position for later restore
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore a previously saved position
    pub fn restore_position(&mut self, position: usize) {
        self.position = position.min(self.segments.len());
    }

    /// Total number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments remaining from the current position
    pub fn remaining(&self) -> usize {
        self.segments.len().saturating_sub(self.position)
    }

    /// Iterate over all segments regardless of position
    pub fn iter(&self) -> std::slice::Iter<'_, RawSegment> {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stream() -> SegmentStream {
        SegmentStream::new(vec![
            RawSegment::new("BGM", vec!["REF1".into()], 2),
            RawSegment::new("DTM", vec!["20240115".into()], 3),
            RawSegment::new("LIN", vec!["8412345678905".into(), "EN".into()], 4),
        ])
    }

    #[test]
    fn test_navigation() {
        let mut stream = sample_stream();

        assert_eq!(stream.len(), 3);
        assert_eq!(stream.current().unwrap().tag, "BGM");
        assert_eq!(stream.peek(1).unwrap().tag, "DTM");

        assert_eq!(stream.advance().unwrap().tag, "BGM");
        assert_eq!(stream.current().unwrap().tag, "DTM");
        assert_eq!(stream.remaining(), 2);

        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        assert!(stream.advance().is_none());
    }

    #[test]
    fn test_save_restore() {
        let mut stream = sample_stream();

        let saved = stream.save_position();
        stream.advance();
        stream.advance();
        assert_eq!(stream.current().unwrap().tag, "LIN");

        stream.restore_position(saved);
        assert_eq!(stream.current().unwrap().tag, "BGM");
    }

    #[test]
    fn test_restore_clamps_to_end() {
        let mut stream = sample_stream();
        stream.restore_position(99);
        assert!(stream.is_at_end());
    }
}
