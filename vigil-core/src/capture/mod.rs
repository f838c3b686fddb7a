//! Capture sources
//!
//! Webcam capture via `nokhwa` and screen capture via `xcap`, both behind
//! small traits so the capture loop can be exercised with mock devices.

mod camera;
mod screen;

pub use camera::NokhwaCamera;
pub use screen::{list_monitors, MonitorInfo, XcapScreen};

use tracing::debug;

use crate::config::CaptureConfig;
use crate::error::Result;
use crate::types::Frame;

/// A camera device that produces one frame per read.
///
/// Opening the device happens in the backend constructor; a read failure
/// mid-run is treated as device loss by the capture loop.
pub trait CameraDevice {
    fn read_frame(&mut self) -> Result<Frame>;
}

/// A screen grabber bound to one monitor
pub trait ScreenGrabber {
    fn grab(&mut self) -> Result<Frame>;
}

/// Pairs a camera device with a screen grabber and normalizes both to the
/// configured fixed dimensions.
pub struct FrameSource {
    camera: Box<dyn CameraDevice>,
    screen: Box<dyn ScreenGrabber>,
    camera_size: (u32, u32),
    screen_size: (u32, u32),
}

impl FrameSource {
    /// Assemble a source from already-opened devices
    pub fn new(
        camera: Box<dyn CameraDevice>,
        screen: Box<dyn ScreenGrabber>,
        camera_size: (u32, u32),
        screen_size: (u32, u32),
    ) -> Self {
        Self {
            camera,
            screen,
            camera_size,
            screen_size,
        }
    }

    /// Open the real backends described by `config`.
    ///
    /// The camera is opened here, once; failure is fatal for the run.
    pub fn open(config: &CaptureConfig) -> Result<Self> {
        let camera = NokhwaCamera::open(
            config.camera_index,
            config.camera_width,
            config.camera_height,
            config.frame_rate,
        )?;
        let screen = XcapScreen::open(config.monitor_index)?;
        debug!(
            camera_index = config.camera_index,
            monitor_index = config.monitor_index,
            "capture devices opened"
        );
        Ok(Self::new(
            Box::new(camera),
            Box::new(screen),
            (config.camera_width, config.camera_height),
            (config.screen_width, config.screen_height),
        ))
    }

    /// Capture one camera frame, resized to the configured dimensions
    pub fn capture_camera(&mut self) -> Result<Frame> {
        let frame = self.camera.read_frame()?;
        Ok(frame.resize(self.camera_size.0, self.camera_size.1))
    }

    /// Capture one screen frame, resized to the configured dimensions
    pub fn capture_screen(&mut self) -> Result<Frame> {
        let frame = self.screen.grab()?;
        Ok(frame.resize(self.screen_size.0, self.screen_size.1))
    }
}
