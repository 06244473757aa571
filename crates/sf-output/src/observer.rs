//! `CorpusOutputObserver<W>` bridges `CorpusObserver` to an `OutputWriter`.

use sf_core::TimeWindow;
use sf_telemetry::{CorpusObserver, CorpusStats, TelemetrySample};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`CorpusObserver`] that streams each window's samples to an
/// [`OutputWriter`] and finishes the writer when the corpus ends.
///
/// Observer callbacks cannot fail, so the first write error is stored and
/// later writes are skipped.  Check [`take_error`][Self::take_error] after
/// `CorpusGenerator::run` returns.
pub struct CorpusOutputObserver<W: OutputWriter> {
    writer:     W,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> CorpusOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Samples written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::error!("corpus output failed: {e}");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> CorpusObserver for CorpusOutputObserver<W> {
    fn on_window(&mut self, window: TimeWindow, samples: &[TelemetrySample]) {
        if self.last_error.is_some() || samples.is_empty() {
            return;
        }
        let result = self.writer.write_samples(samples);
        if result.is_ok() {
            self.written += samples.len();
            log::trace!("window {}: wrote {} samples", window.ordinal(), samples.len());
        }
        self.store_err(result);
    }

    fn on_corpus_end(&mut self, stats: &CorpusStats) {
        let result = self.writer.finish();
        self.store_err(result);
        log::debug!("corpus output finished: {} of {} samples written", self.written, stats.samples);
    }
}
