// ABOUTME: GIF frame decoder and compositor producing PNG-encoded still frames
// ABOUTME: Applies per-frame disposal on a persistent canvas; falls back to static images

use crate::constants::decode::{DEFAULT_FRAME_DELAY_MS, MAX_FRAMES};
use crate::error::PreviewError;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// One fully composited still, encoded as PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub png: Vec<u8>,
    pub delay_ms: u32,
}

/// Decoded frames plus the logical canvas size. A size of 0 means unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    pub frames: Vec<Frame>,
    pub width: u32,
    pub height: u32,
}

impl FrameSequence {
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub max_frames: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_frames: MAX_FRAMES,
        }
    }
}

impl DecodeOptions {
    /// Only the first composited frame, as used for listing thumbnails.
    pub fn first_frame() -> Self {
        Self { max_frames: 1 }
    }
}

pub fn decode_frames(data: &[u8]) -> Result<FrameSequence, PreviewError> {
    decode_frames_with(data, DecodeOptions::default())
}

pub fn decode_frames_with(
    data: &[u8],
    options: DecodeOptions,
) -> Result<FrameSequence, PreviewError> {
    match decode_animated(data, options) {
        Ok(sequence) if !sequence.frames.is_empty() => Ok(sequence),
        Ok(_) => decode_static(data),
        Err(err) => {
            log::debug!("not a decodable GIF ({}), trying static image", err);
            decode_static(data)
        }
    }
}

fn decode_animated(data: &[u8], options: DecodeOptions) -> Result<FrameSequence, PreviewError> {
    let mut gif_options = gif::DecodeOptions::new();
    gif_options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = gif_options
        .read_info(Cursor::new(data))
        .map_err(|e| PreviewError::Decode(e.to_string()))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    let mut canvas = RgbaImage::new(width, height);
    let mut previous = RgbaImage::new(width, height);
    let mut frames = Vec::new();

    while frames.len() < options.max_frames {
        let Some(frame) = decoder
            .read_next_frame()
            .map_err(|e| PreviewError::Decode(e.to_string()))?
        else {
            break;
        };

        if frame.dispose == gif::DisposalMethod::Previous {
            previous.clone_from(&canvas);
        }

        let region = Region::of(frame);
        if width == 0 || height == 0 {
            // Unknown logical screen: the canvas grows to cover every sub-frame seen so far
            let fit_width = if width == 0 {
                canvas.width().max(region.left + region.width)
            } else {
                width
            };
            let fit_height = if height == 0 {
                canvas.height().max(region.top + region.height)
            } else {
                height
            };
            grow(&mut canvas, fit_width, fit_height);
            grow(&mut previous, fit_width, fit_height);
        }
        composite_over(&mut canvas, &frame.buffer, region);
        frames.push(Frame {
            png: encode_png(&canvas)?,
            delay_ms: frame_delay_ms(frame.delay),
        });

        match frame.dispose {
            gif::DisposalMethod::Background => clear_region(&mut canvas, region),
            gif::DisposalMethod::Previous => canvas.clone_from(&previous),
            _ => {}
        }
    }

    Ok(FrameSequence {
        frames,
        width,
        height,
    })
}

fn decode_static(data: &[u8]) -> Result<FrameSequence, PreviewError> {
    let img = image::load_from_memory(data)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(FrameSequence {
        frames: vec![Frame { png, delay_ms: 0 }],
        width: img.width(),
        height: img.height(),
    })
}

fn grow(canvas: &mut RgbaImage, width: u32, height: u32) {
    if canvas.dimensions() == (width, height) {
        return;
    }
    let mut larger = RgbaImage::new(width, height);
    image::imageops::replace(&mut larger, canvas, 0, 0);
    *canvas = larger;
}

fn frame_delay_ms(centiseconds: u16) -> u32 {
    match u32::from(centiseconds) * 10 {
        0 => DEFAULT_FRAME_DELAY_MS,
        delay => delay,
    }
}

pub(crate) fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, PreviewError> {
    let mut buffer = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

#[derive(Debug, Clone, Copy)]
struct Region {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl Region {
    fn of(frame: &gif::Frame<'_>) -> Self {
        Self {
            left: u32::from(frame.left),
            top: u32::from(frame.top),
            width: u32::from(frame.width),
            height: u32::from(frame.height),
        }
    }

    /// Canvas coordinates covered by this region, clipped to the canvas.
    fn pixels(
        self,
        canvas_width: u32,
        canvas_height: u32,
    ) -> impl Iterator<Item = (u32, u32, u32, u32)> {
        (0..self.height)
            .filter(move |fy| self.top + fy < canvas_height)
            .flat_map(move |fy| {
                (0..self.width)
                    .filter(move |fx| self.left + fx < canvas_width)
                    .map(move |fx| (fx, fy, self.left + fx, self.top + fy))
            })
    }
}

fn composite_over(canvas: &mut RgbaImage, buffer: &[u8], region: Region) {
    let (cw, ch) = canvas.dimensions();
    for (fx, fy, x, y) in region.pixels(cw, ch) {
        let offset = ((fy * region.width + fx) * 4) as usize;
        let Some(src) = buffer.get(offset..offset + 4) else {
            continue;
        };
        let dst = canvas.get_pixel_mut(x, y);
        *dst = blend_over(Rgba([src[0], src[1], src[2], src[3]]), *dst);
    }
}

fn clear_region(canvas: &mut RgbaImage, region: Region) {
    let (cw, ch) = canvas.dimensions();
    for (_, _, x, y) in region.pixels(cw, ch) {
        canvas.put_pixel(x, y, Rgba([0, 0, 0, 0]));
    }
}

/// Porter-Duff "source over destination" on straight (non-premultiplied) RGBA.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    let out_a = sa + da * inv / 255;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel =
        |s: u8, d: u8| ((u32::from(s) * sa + u32::from(d) * da * inv / 255) / out_a) as u8;
    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        out_a as u8,
    ])
}
