//! Screen backend built on xcap

use tracing::info;
use xcap::Monitor;

use crate::capture::ScreenGrabber;
use crate::error::{Result, VigilError};
use crate::types::Frame;

/// A screen grabber bound to a single monitor, resolved once at open time
pub struct XcapScreen {
    monitor: Monitor,
}

impl XcapScreen {
    /// Bind to the monitor at `index` in enumeration order
    pub fn open(index: usize) -> Result<Self> {
        let monitors = Monitor::all()?;
        let count = monitors.len();
        let monitor = monitors.into_iter().nth(index).ok_or_else(|| {
            VigilError::device(format!(
                "monitor index {} out of range ({} available)",
                index, count
            ))
        })?;

        info!(
            index,
            name = %monitor.name().unwrap_or_default(),
            "screen grabber bound to monitor"
        );
        Ok(Self { monitor })
    }
}

impl ScreenGrabber for XcapScreen {
    fn grab(&mut self) -> Result<Frame> {
        let image = self.monitor.capture_image()?;
        let (width, height) = (image.width(), image.height());

        // Strip the alpha channel; artifacts are RGB24 throughout.
        let rgba = image.into_raw();
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        Frame::from_raw(width, height, rgb)
    }
}

/// Description of one attached monitor, for `vigil list-monitors`
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub index: usize,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Enumerate attached monitors in the order `XcapScreen::open` indexes them
pub fn list_monitors() -> Result<Vec<MonitorInfo>> {
    let monitors = Monitor::all()?;
    let mut infos = Vec::with_capacity(monitors.len());
    for (index, monitor) in monitors.iter().enumerate() {
        infos.push(MonitorInfo {
            index,
            name: monitor.name().unwrap_or_default(),
            width: monitor.width().unwrap_or(0),
            height: monitor.height().unwrap_or(0),
            is_primary: monitor.is_primary().unwrap_or(false),
        });
    }
    Ok(infos)
}
