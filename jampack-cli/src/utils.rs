//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};

/// Create a byte-progress bar with standard styling, hidden when `enable`
/// is false so piping through `-` never gets bar escape codes mixed into
/// the stream.
pub fn create_progress_bar(total_bytes: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Wraps a reader so every byte read through it ticks a progress bar,
/// without jampack-pipeline needing any progress-reporting hooks of its
/// own.
pub struct ProgressRead<R> {
    inner: R,
    bar: ProgressBar,
}

impl<R: Read> ProgressRead<R> {
    /// Wrap `inner`, reporting bytes read to `bar`.
    pub fn new(inner: R, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl<R: Read> Read for ProgressRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bar.inc(n as u64);
        Ok(n)
    }
}
