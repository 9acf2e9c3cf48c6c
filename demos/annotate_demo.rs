//! Demonstration of line timestamp annotation.
//!
//! This example shows how to:
//! 1. Create an annotator with a selected format
//! 2. Feed arbitrarily fragmented chunks through it
//! 3. Apply a live format change mid-line
//! 4. Inspect the resulting output writes
//!
//! Run with: cargo run --example annotate_demo

use serial_timestamp::{LineTimestampAnnotator, OutputSink, TracingLog};

/// Sink that prints each output write with its index.
struct PrintSink {
    count: usize,
}

impl OutputSink for PrintSink {
    fn write_chunk(&mut self, bytes: &[u8]) {
        println!("write {:>2}: {:?}", self.count, String::from_utf8_lossy(bytes));
        self.count += 1;
    }
}

fn main() {
    println!("Serial Timestamp - Annotation Demo");
    println!("==================================");
    println!();

    let mut annotator = LineTimestampAnnotator::new("time-only", Box::new(TracingLog));
    let mut sink = PrintSink { count: 0 };

    // A session rarely delivers whole lines; chunks split lines at
    // arbitrary byte boundaries.
    println!("Feeding fragmented chunks with format `time-only`:");
    annotator.feed(b"boot: loading mod", &mut sink);
    annotator.feed(b"ules\nboot: ready\nlogin: ", &mut sink);
    println!();

    // A live format change re-stamps the next fragment even though the
    // `login: ` line is still open.
    println!("Switching to `european-date-time` mid-line:");
    annotator.on_format_changed("european-date-time");
    annotator.feed(b"admin", &mut sink);
    annotator.feed(b"\nlast login: yesterday\n", &mut sink);
    println!();

    annotator.close();
    println!("Annotator closed.");
}
