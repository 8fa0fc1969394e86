//! Core geometry and pixel-buffer types shared across the pipeline.
//!
//! Images are stored as owned interleaved buffers: [`BgrImage`] for the
//! three-channel blue-green-red source image and [`GrayImage`] for the luma
//! plane consumed by face detection, landmark prediction, and the contrast
//! measure.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A face bounding box from the detector: top-left corner plus size,
/// in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Map a point from normalized [0,1] coordinates into image coordinates
    /// within this box.
    pub fn denormalize(&self, p: Point) -> Point {
        Point::new(self.x + p.x * self.width, self.y + p.y * self.height)
    }

    /// Clip the box to an image of the given dimensions and return the
    /// covered pixel rectangle, or `None` if nothing remains.
    pub fn clipped_rect(&self, image_width: u32, image_height: u32) -> Option<Rect> {
        let x0 = (self.x.round() as i64).max(0);
        let y0 = (self.y.round() as i64).max(0);
        let x1 = ((self.x + self.width).round() as i64).min(image_width as i64);
        let y1 = ((self.y + self.height).round() as i64).min(image_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Rect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect with an image of the given dimensions. Returns `None` when
    /// the rectangle lies entirely outside the image.
    pub fn intersect_image(&self, image_width: u32, image_height: u32) -> Option<Rect> {
        let x0 = self.x.max(0) as i64;
        let y0 = self.y.max(0) as i64;
        let x1 = (self.x as i64 + self.width as i64).min(image_width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(image_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Rect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// An interleaved 3-byte-per-pixel image in blue-green-red channel order.
///
/// Immutable after construction; the whole pipeline reads from a single
/// loaded instance per diagnosis.
#[derive(Debug, Clone)]
pub struct BgrImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl BgrImage {
    /// Wrap a raw interleaved BGR buffer.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when the buffer length does not match the
    /// dimensions.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> [u8; 3],
    {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y) as `[b, g, r]`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height);
        let idx = ((y * self.width + x) * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Convert to a luma plane with the 0.299/0.587/0.114 weighting.
    pub fn to_gray(&self) -> GrayImage {
        let mut data = Vec::with_capacity((self.width * self.height) as usize);
        for px in self.data.chunks_exact(3) {
            let luma =
                0.299 * px[2] as f32 + 0.587 * px[1] as f32 + 0.114 * px[0] as f32;
            data.push(luma.round().clamp(0.0, 255.0) as u8);
        }
        GrayImage::new(data, self.width, self.height)
    }
}

/// A single-channel luma image.
///
/// Out-of-bounds reads return 0, which keeps sub-pixel sampling near the
/// image border total.
#[derive(Debug, Clone)]
pub struct GrayImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> u8,
    {
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma at (x, y); 0 when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[(y as u32 * self.width + x as u32) as usize]
    }

    /// The raw luma buffer, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}
