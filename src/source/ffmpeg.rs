//! FFmpeg-backed local file decoder.
//!
//! Decodes the best video stream of a local file to packed RGB24. Packet
//! exhaustion flushes the decoder and then reports `EndOfStream`.

use ffmpeg_next as ffmpeg;

use crate::error::{Error, Result};
use crate::frame::Frame;

pub(crate) struct FfmpegSource {
    input: ffmpeg::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    frame_count: u64,
    flushed: bool,
}

impl FfmpegSource {
    pub(crate) fn open(path: &str) -> Result<Self> {
        ffmpeg::init().map_err(|e| Error::stream(format!("initialize ffmpeg: {}", e)))?;
        let input = ffmpeg::format::input(&path)
            .map_err(|e| Error::stream(format!("failed to open video input '{}': {}", path, e)))?;
        let input_stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| Error::stream(format!("'{}' has no video track", path)))?;
        let stream_index = input_stream.index();
        let context = ffmpeg::codec::context::Context::from_parameters(input_stream.parameters())
            .map_err(|e| Error::stream(format!("load video decoder parameters: {}", e)))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| Error::stream(format!("open video decoder: {}", e)))?;

        let scaler = ffmpeg::software::scaling::context::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::util::format::pixel::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg::software::scaling::flag::Flags::BILINEAR,
        )
        .map_err(|e| Error::stream(format!("create scaler: {}", e)))?;

        log::info!("VideoSource: opened {} (ffmpeg)", path);

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler,
            frame_count: 0,
            flushed: false,
        })
    }

    pub(crate) fn next_frame(&mut self) -> Result<Frame> {
        let mut decoded = ffmpeg::frame::Video::empty();

        loop {
            if let Some(frame) = self.receive_one(&mut decoded)? {
                return Ok(frame);
            }

            if self.flushed {
                return Err(Error::EndOfStream);
            }

            // Feed the next video packet, or flush at end of file.
            match self
                .input
                .packets()
                .find(|(stream, _)| stream.index() == self.stream_index)
            {
                Some((_, packet)) => {
                    self.decoder.send_packet(&packet).map_err(|e| {
                        Error::stream(format!("send packet to decoder: {}", e))
                    })?;
                }
                None => {
                    self.decoder
                        .send_eof()
                        .map_err(|e| Error::stream(format!("flush decoder: {}", e)))?;
                    self.flushed = true;
                }
            }
        }
    }

    fn receive_one(&mut self, decoded: &mut ffmpeg::frame::Video) -> Result<Option<Frame>> {
        if self.decoder.receive_frame(decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgb_frame)
            .map_err(|e| Error::stream(format!("scale frame to RGB: {}", e)))?;
        let (pixels, width, height) = frame_to_pixels(&rgb_frame)?;
        self.frame_count += 1;
        Ok(Some(Frame::new(pixels, width, height)?))
    }

    pub(crate) fn frames_produced(&self) -> u64 {
        self.frame_count
    }
}

fn frame_to_pixels(frame: &ffmpeg::frame::Video) -> Result<(Vec<u8>, u32, u32)> {
    let width = frame.width();
    let height = frame.height();
    let row_bytes = (width as usize) * 3;
    let stride = frame.stride(0);
    let data = frame.data(0);

    if stride == row_bytes {
        return Ok((data.to_vec(), width, height));
    }

    // Strip per-row padding.
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let end = start + row_bytes;
        pixels.extend_from_slice(
            data.get(start..end)
                .ok_or_else(|| Error::stream("ffmpeg frame row is out of bounds"))?,
        );
    }

    Ok((pixels, width, height))
}
