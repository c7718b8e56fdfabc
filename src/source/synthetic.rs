use crate::error::{Error, Result};
use crate::frame::Frame;

const DEFAULT_FRAME_COUNT: u64 = 30;
const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// Synthetic frame source for tests and dry runs.
///
/// `stub://<n>` produces exactly `n` frames; bare `stub://` produces 30.
pub(crate) struct SyntheticSource {
    total_frames: u64,
    frame_count: u64,
}

impl SyntheticSource {
    pub(crate) fn new(spec: &str) -> Result<Self> {
        let total_frames = if spec.is_empty() {
            DEFAULT_FRAME_COUNT
        } else {
            spec.parse().map_err(|_| {
                Error::configuration(format!(
                    "stub source expects stub://<frame-count>, got 'stub://{}'",
                    spec
                ))
            })?
        };
        Ok(Self {
            total_frames,
            frame_count: 0,
        })
    }

    pub(crate) fn next_frame(&mut self) -> Result<Frame> {
        if self.frame_count >= self.total_frames {
            return Err(Error::EndOfStream);
        }
        self.frame_count += 1;

        let pixel_count = (WIDTH * HEIGHT * 3) as usize;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count) % 256) as u8;
        }
        Frame::new(pixels, WIDTH, HEIGHT)
    }

    pub(crate) fn frames_produced(&self) -> u64 {
        self.frame_count
    }
}
