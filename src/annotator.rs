//! Line-oriented timestamp annotation for a session byte stream.
//!
//! The annotator sits between the session (producer) and the rendering
//! surface (consumer). It never holds payload bytes back: every byte
//! received in [`LineTimestampAnnotator::feed`] is re-emitted in the same
//! call, with a bracketed timestamp prepended at each line start. Whether
//! the next byte begins a line is carried across calls as state, not as
//! buffered data, so latency is unaffected by missing terminators.

use crate::format::timestamp_for;
use crate::log::StatusLog;

/// Consumer seam for annotated output.
///
/// Each call is one output write; the consumer appends writes in order
/// and never reorders them.
pub trait OutputSink {
    fn write_chunk(&mut self, bytes: &[u8]);
}

/// Capturing sink, mainly for tests and embedding.
impl OutputSink for Vec<Vec<u8>> {
    fn write_chunk(&mut self, bytes: &[u8]) {
        self.push(bytes.to_vec());
    }
}

/// Sink that forwards writes to any [`std::io::Write`].
///
/// Write errors are reported through the log and the affected write is
/// skipped; the annotator's contract is that chunk processing itself
/// never fails.
pub struct WriterSink<'a, W: std::io::Write> {
    writer: W,
    log: &'a dyn StatusLog,
}

impl<'a, W: std::io::Write> WriterSink<'a, W> {
    pub fn new(writer: W, log: &'a dyn StatusLog) -> Self {
        Self { writer, log }
    }
}

impl<W: std::io::Write> OutputSink for WriterSink<'_, W> {
    fn write_chunk(&mut self, bytes: &[u8]) {
        if let Err(e) = self.writer.write_all(bytes).and_then(|()| self.writer.flush()) {
            self.log.error(&format!("output write failed: {e}"));
        }
    }
}

/// Stateful chunk processor that stamps line starts with timestamps.
pub struct LineTimestampAnnotator {
    /// True iff the next emitted byte begins a new logical line.
    at_line_start: bool,
    /// True iff the format changed since the last emitted byte; forces one
    /// re-stamp even mid-line so the change is visible immediately.
    format_changed: bool,
    /// The configured format name, kept raw so an unrecognized value
    /// degrades per chunk instead of failing at construction.
    selection: String,
    /// Injected status log.
    log: Box<dyn StatusLog>,
    /// Set by `close()`; further calls are ignored.
    closed: bool,
}

impl LineTimestampAnnotator {
    /// Create an annotator with the initially selected format name.
    ///
    /// The first emitted fragment is treated as a line start.
    pub fn new(initial_format: impl Into<String>, log: Box<dyn StatusLog>) -> Self {
        Self {
            at_line_start: true,
            format_changed: false,
            selection: initial_format.into(),
            log,
            closed: false,
        }
    }

    /// The currently selected format name.
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Process one chunk, emitting one or more writes to `sink`.
    ///
    /// When the selected format resolves to no timestamp (format `none`,
    /// or an unrecognized name), the chunk is forwarded unmodified as a
    /// single write. Otherwise the chunk is split into line fragments and
    /// each fragment is emitted as one write, stamped when it begins a
    /// line or immediately after a format change. All input bytes are
    /// always forwarded; this call cannot fail.
    pub fn feed(&mut self, data: &[u8], sink: &mut dyn OutputSink) {
        if self.closed {
            return;
        }

        let stamp = timestamp_for(&self.selection, self.log.as_ref());
        if stamp.is_empty() {
            sink.write_chunk(data);
            return;
        }

        // split_inclusive keeps each `\n` with its fragment and never
        // yields an empty tail, so a chunk ending exactly on a terminator
        // cannot produce a phantom write.
        for fragment in data.split_inclusive(|&b| b == b'\n') {
            if self.at_line_start || self.format_changed {
                let mut write = Vec::with_capacity(stamp.len() + fragment.len() + 3);
                write.push(b'[');
                write.extend_from_slice(stamp.as_bytes());
                write.extend_from_slice(b"] ");
                write.extend_from_slice(fragment);
                sink.write_chunk(&write);
                self.at_line_start = false;
                self.format_changed = false;
            } else {
                sink.write_chunk(fragment);
            }

            // `\r` ends a logical line for stamping purposes even though
            // it is not a split point, so a lone trailing `\r` flips the
            // state without producing an extra fragment.
            if matches!(fragment.last(), Some(&b'\n') | Some(&b'\r')) {
                self.at_line_start = true;
            }
        }
    }

    /// Record a format change from the configuration owner.
    ///
    /// The caller only reports genuine value transitions (adjacent
    /// duplicates are filtered by [`FormatWatch`](crate::config::FormatWatch)).
    /// No output is produced here; the next emitted fragment is re-stamped
    /// even mid-line, exactly once.
    pub fn on_format_changed(&mut self, selection: impl Into<String>) {
        if self.closed {
            return;
        }
        self.selection = selection.into();
        self.format_changed = true;
        self.log
            .info(&format!("timestamp format changed to {}", self.selection));
    }

    /// Stop processing. Idempotent; later `feed` calls emit nothing.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NullLog;

    fn annotator(format: &str) -> LineTimestampAnnotator {
        LineTimestampAnnotator::new(format, Box::new(NullLog))
    }

    /// Split a stamped write into its `[...] ` marker and the payload.
    fn split_stamp(write: &[u8]) -> (&[u8], &[u8]) {
        assert_eq!(write.first(), Some(&b'['), "write is not stamped");
        let end = write
            .windows(2)
            .position(|w| w == b"] ")
            .expect("missing closing bracket");
        (&write[1..end], &write[end + 2..])
    }

    #[test]
    fn test_none_format_is_pure_passthrough() {
        let mut a = annotator("none");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"line one\nline two\n", &mut out);
        assert_eq!(out, vec![b"line one\nline two\n".to_vec()]);
    }

    #[test]
    fn test_each_line_start_is_stamped() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"A\nB\n", &mut out);
        assert_eq!(out.len(), 2);
        let (ts, payload) = split_stamp(&out[0]);
        assert_eq!(ts.len(), 12);
        assert_eq!(payload, b"A\n");
        let (_, payload) = split_stamp(&out[1]);
        assert_eq!(payload, b"B\n");
    }

    #[test]
    fn test_mid_line_continuation_is_not_stamped() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"AB", &mut out);
        a.feed(b"CD\n", &mut out);
        assert_eq!(out.len(), 2);
        let (_, payload) = split_stamp(&out[0]);
        assert_eq!(payload, b"AB");
        assert_eq!(out[1], b"CD\n");
    }

    #[test]
    fn test_chunk_ending_on_terminator_has_no_phantom_write() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"X\n", &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_carriage_return_ends_a_line_without_extra_fragment() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"prompt> \r", &mut out);
        assert_eq!(out.len(), 1);
        let mut out2: Vec<Vec<u8>> = Vec::new();
        a.feed(b"next", &mut out2);
        // the byte after `\r` begins a new line and is stamped
        let (_, payload) = split_stamp(&out2[0]);
        assert_eq!(payload, b"next");
    }

    #[test]
    fn test_format_change_forces_exactly_one_restamp() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"partial", &mut out); // now mid-line
        a.on_format_changed("european-date-time");
        let mut out2: Vec<Vec<u8>> = Vec::new();
        a.feed(b"still going, ", &mut out2);
        a.feed(b"and going", &mut out2);
        assert_eq!(out2.len(), 2);
        let (ts, payload) = split_stamp(&out2[0]);
        assert_eq!(ts.len(), 23); // dd/mm/yyyy hh:mm:ss.SSS
        assert_eq!(payload, b"still going, ");
        // freshness was consumed; the next mid-line fragment is bare
        assert_eq!(out2[1], b"and going");
    }

    #[test]
    fn test_format_change_survives_an_empty_chunk() {
        let mut a = annotator("time-only");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"partial", &mut out);
        a.on_format_changed("us-date-time");
        // a zero-fragment call must not consume the freshness flag
        a.feed(b"", &mut out);
        let mut out2: Vec<Vec<u8>> = Vec::new();
        a.feed(b"resumed", &mut out2);
        let (_, payload) = split_stamp(&out2[0]);
        assert_eq!(payload, b"resumed");
    }

    #[test]
    fn test_unknown_format_degrades_to_passthrough() {
        let mut a = annotator("stardate");
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"payload\n", &mut out);
        assert_eq!(out, vec![b"payload\n".to_vec()]);
    }

    #[test]
    fn test_close_is_idempotent_and_stops_processing() {
        let mut a = annotator("time-only");
        a.close();
        a.close();
        assert!(a.is_closed());
        let mut out: Vec<Vec<u8>> = Vec::new();
        a.feed(b"ignored\n", &mut out);
        assert!(out.is_empty());
    }
}
