//! Mock infrastructure for testing
//!
//! Mock capture devices, a recording video sink, and frame helpers for
//! exercising the capture loop without hardware.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vigil_core::capture::{CameraDevice, FrameSource, ScreenGrabber};
use vigil_core::clock::ManualClock;
use vigil_core::error::{Result, VigilError};
use vigil_core::output::{SinkFactory, VideoSink};
use vigil_core::types::Frame;

/// Create a test frame filled with one color
pub fn solid_frame(width: u32, height: u32, color: [u8; 3]) -> Frame {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for _ in 0..width * height {
        data.extend_from_slice(&color);
    }
    Frame::from_raw(width, height, data).expect("buffer length matches")
}

/// Scripted camera device.
///
/// Serves solid frames, optionally failing at a given read, flipping a
/// shutdown flag after a number of successful reads, or charging virtual
/// time per read to simulate a slow device.
pub struct MockCamera {
    pub reads: Arc<AtomicUsize>,
    fail_at: Option<usize>,
    stop_after: Option<(usize, Arc<AtomicBool>)>,
    read_cost: Option<(Duration, Arc<ManualClock>)>,
    size: (u32, u32),
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            reads: Arc::new(AtomicUsize::new(0)),
            fail_at: None,
            stop_after: None,
            read_cost: None,
            size: (64, 48),
        }
    }

    /// Fail with `DeviceUnavailable` on the n-th read (1-based)
    pub fn fail_at(mut self, read: usize) -> Self {
        self.fail_at = Some(read);
        self
    }

    /// Set `flag` after `reads` successful reads, stopping the loop
    pub fn stop_after(mut self, reads: usize, flag: Arc<AtomicBool>) -> Self {
        self.stop_after = Some((reads, flag));
        self
    }

    /// Advance `clock` by `cost` on every read
    pub fn read_cost(mut self, cost: Duration, clock: Arc<ManualClock>) -> Self {
        self.read_cost = Some((cost, clock));
        self
    }

    /// Shared read counter
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl CameraDevice for MockCamera {
    fn read_frame(&mut self) -> Result<Frame> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(n) {
            return Err(VigilError::device("mock camera unplugged"));
        }
        if let Some((cost, clock)) = &self.read_cost {
            clock.advance(*cost);
        }
        if let Some((limit, flag)) = &self.stop_after {
            if n >= *limit {
                flag.store(true, Ordering::Relaxed);
            }
        }
        Ok(solid_frame(self.size.0, self.size.1, [200, 0, 0]))
    }
}

/// Screen grabber serving solid frames and counting grabs
pub struct MockScreen {
    pub grabs: Arc<AtomicUsize>,
    size: (u32, u32),
}

impl MockScreen {
    pub fn new() -> Self {
        Self {
            grabs: Arc::new(AtomicUsize::new(0)),
            size: (64, 48),
        }
    }

    pub fn grab_counter(&self) -> Arc<AtomicUsize> {
        self.grabs.clone()
    }
}

impl ScreenGrabber for MockScreen {
    fn grab(&mut self) -> Result<Frame> {
        self.grabs.fetch_add(1, Ordering::SeqCst);
        Ok(solid_frame(self.size.0, self.size.1, [0, 0, 200]))
    }
}

/// Assemble a frame source from mock devices, normalized to 64x48 each
pub fn mock_source(camera: MockCamera, screen: MockScreen) -> FrameSource {
    FrameSource::new(Box::new(camera), Box::new(screen), (64, 48), (64, 48))
}

/// What happened to one opened sink
#[derive(Debug, Clone)]
pub struct SinkRecord {
    pub path: PathBuf,
    pub frames: usize,
    pub finished: bool,
}

/// Shared log of every sink a factory opened
pub type SinkLog = Arc<Mutex<Vec<SinkRecord>>>;

pub fn new_sink_log() -> SinkLog {
    Arc::new(Mutex::new(Vec::new()))
}

struct RecordingSink {
    index: usize,
    log: SinkLog,
    fail_script: Option<(usize, Arc<AtomicUsize>)>,
}

impl VideoSink for RecordingSink {
    fn append(&mut self, _frame: &Frame) -> Result<()> {
        if let Some((fail_at, appends)) = &self.fail_script {
            let n = appends.fetch_add(1, Ordering::SeqCst) + 1;
            if n == *fail_at {
                return Err(VigilError::encode("mock sink refused the frame"));
            }
        }
        let mut log = self.log.lock().expect("sink log poisoned");
        log[self.index].frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut log = self.log.lock().expect("sink log poisoned");
        log[self.index].finished = true;
        Ok(())
    }
}

/// Sink factory that records every open/append/finish into `log`
pub fn recording_factory(log: SinkLog) -> SinkFactory {
    factory(log, None)
}

/// Like `recording_factory`, but the n-th append (1-based, counted across
/// all sinks the factory opens) fails with an encode error
pub fn flaky_factory(log: SinkLog, fail_at_append: usize) -> SinkFactory {
    factory(log, Some((fail_at_append, Arc::new(AtomicUsize::new(0)))))
}

fn factory(log: SinkLog, fail_script: Option<(usize, Arc<AtomicUsize>)>) -> SinkFactory {
    Box::new(move |path| {
        let index = {
            let mut log = log.lock().expect("sink log poisoned");
            log.push(SinkRecord {
                path: path.to_path_buf(),
                frames: 0,
                finished: false,
            });
            log.len() - 1
        };
        Ok(Box::new(RecordingSink {
            index,
            log: log.clone(),
            fail_script: fail_script.clone(),
        }))
    })
}
