//! V4L2 capture backend (`/dev/videoN`).
//!
//! Negotiates RGB3 and falls back to whatever the driver keeps (YUYV and
//! MJPG are converted; other formats end the stream).

use log::{info, warn};
use ouroboros::self_referencing;

use super::{CaptureBackend, CaptureDevice};
use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Opens `/dev/video{index}` devices
#[derive(Debug, Clone)]
pub struct V4l2Backend {
    /// Preferred frame width
    pub width: u32,
    /// Preferred frame height
    pub height: u32,
    /// Memory-mapped buffers to queue
    pub buffers: u32,
}

impl Default for V4l2Backend {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            buffers: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelFormat {
    Rgb3,
    Yuyv,
    Mjpg,
}

impl PixelFormat {
    fn from_fourcc(fourcc: &v4l::FourCC) -> Option<Self> {
        match &fourcc.repr {
            b"RGB3" => Some(Self::Rgb3),
            b"YUYV" => Some(Self::Yuyv),
            b"MJPG" => Some(Self::Mjpg),
            _ => None,
        }
    }
}

#[self_referencing]
struct StreamState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this>,
}

/// An open V4L2 device with a running mmap stream
pub struct V4l2Device {
    state: Option<StreamState>,
    format: PixelFormat,
    width: u32,
    height: u32,
}

impl CaptureBackend for V4l2Backend {
    type Device = V4l2Device;

    fn open(&mut self, index: u32) -> Result<Self::Device> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let path = format!("/dev/video{}", index);
        let unavailable = |reason: String| Error::DeviceUnavailable { index, reason };

        let device = v4l::Device::with_path(&path)
            .map_err(|err| unavailable(format!("open {}: {}", path, err)))?;
        let mut format = device
            .format()
            .map_err(|err| unavailable(format!("read format: {}", err)))?;
        format.width = self.width;
        format.height = self.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                warn!("failed to set RGB3 on {}: {}", path, err);
                device
                    .format()
                    .map_err(|err| unavailable(format!("read format: {}", err)))?
            }
        };

        let pixel_format = PixelFormat::from_fourcc(&format.fourcc)
            .ok_or_else(|| unavailable(format!("unsupported pixel format {}", format.fourcc)))?;

        let buffers = self.buffers.max(1);
        let state = StreamStateTryBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, buffers)
            },
        }
        .try_build()
        .map_err(|err| unavailable(format!("create buffer stream: {}", err)))?;

        info!(
            "{} streaming {}x{} {:?}",
            path, format.width, format.height, pixel_format
        );
        Ok(V4l2Device {
            state: Some(state),
            format: pixel_format,
            width: format.width,
            height: format.height,
        })
    }
}

impl V4l2Device {
    fn convert(&self, buf: &[u8]) -> Result<PixelBuffer> {
        let (w, h) = (self.width, self.height);
        match self.format {
            PixelFormat::Rgb3 => {
                let len = w as usize * h as usize * 3;
                let data = buf.get(..len).unwrap_or(buf).to_vec();
                PixelBuffer::from_rgb(w, h, data)
            }
            PixelFormat::Yuyv => {
                // Luma is every other byte
                let luma: Vec<u8> = buf
                    .iter()
                    .step_by(2)
                    .take(w as usize * h as usize)
                    .copied()
                    .collect();
                PixelBuffer::from_gray(w, h, luma)
            }
            PixelFormat::Mjpg => {
                let img = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)?;
                Ok(PixelBuffer::from_image(img))
            }
        }
    }
}

impl CaptureDevice for V4l2Device {
    fn read_frame(&mut self) -> Result<Option<PixelBuffer>> {
        use v4l::io::traits::CaptureStream;

        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };
        let data = state
            .with_mut(|fields| fields.stream.next().map(|(buf, _meta)| buf.to_vec()))
            .map_err(|err| Error::Capture(err.to_string()))?;
        self.convert(&data).map(Some)
    }

    fn release(&mut self) {
        if self.state.take().is_some() {
            info!("v4l2 device released");
        }
    }
}
