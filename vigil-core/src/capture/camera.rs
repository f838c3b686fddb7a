//! Webcam backend built on nokhwa

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{debug, info};

use crate::capture::CameraDevice;
use crate::error::Result;
use crate::types::Frame;

/// A webcam opened through the platform-native nokhwa backend
pub struct NokhwaCamera {
    camera: Camera,
}

impl NokhwaCamera {
    /// Open the camera at `index`, asking the driver for the closest match
    /// to the requested format. The delivered resolution may differ; frames
    /// are resized downstream regardless.
    pub fn open(index: u32, width: u32, height: u32, fps: u32) -> Result<Self> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, fps),
        ));

        let mut camera = Camera::new(CameraIndex::Index(index), requested)?;
        camera.open_stream()?;

        let format = camera.camera_format();
        info!(
            index,
            width = format.width(),
            height = format.height(),
            fps = format.frame_rate(),
            "camera opened"
        );
        Ok(Self { camera })
    }
}

impl CameraDevice for NokhwaCamera {
    fn read_frame(&mut self) -> Result<Frame> {
        let buffer = self.camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        Frame::from_raw(decoded.width(), decoded.height(), decoded.into_raw())
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            debug!("stopping camera stream failed: {}", e);
        }
    }
}
