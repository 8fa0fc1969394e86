//! Facial region segmentation and skin filtering
//!
//! Carves the source image into the six landmark-defined regions the
//! palette is built from, and filters each crop down to skin-toned pixels
//! with the YCrCb chroma mask. Kept pixels are the YCrCb round trip of the
//! originals; rejected pixels become the masked-out sentinel and are
//! dropped, including the rare skin pixel that happens to round-trip to
//! exactly the sentinel value (a frozen contract quirk).

use crate::color::convert::{bgr_to_ycrcb, ycrcb_to_bgr};
use crate::constants::skin;
use crate::face::Landmarks;
use crate::types::{BgrImage, Point, Rect};

/// The six regions sampled for the palette, in pooling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRegion {
    RightEye,
    LeftEye,
    Lips,
    LeftCheek,
    RightCheek,
    Nose,
}

impl FaceRegion {
    /// Pooling order for the palette pixel set.
    pub const EXTRACTION_ORDER: [FaceRegion; 6] = [
        FaceRegion::RightEye,
        FaceRegion::LeftEye,
        FaceRegion::Lips,
        FaceRegion::LeftCheek,
        FaceRegion::RightCheek,
        FaceRegion::Nose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaceRegion::RightEye => "right eye",
            FaceRegion::LeftEye => "left eye",
            FaceRegion::Lips => "lips",
            FaceRegion::LeftCheek => "left cheek",
            FaceRegion::RightCheek => "right cheek",
            FaceRegion::Nose => "nose",
        }
    }

    /// The landmark points defining this region.
    pub fn points(&self, landmarks: &Landmarks) -> Vec<Point> {
        match self {
            FaceRegion::RightEye => landmarks.right_eye().to_vec(),
            FaceRegion::LeftEye => landmarks.left_eye().to_vec(),
            FaceRegion::Lips => landmarks.lips().to_vec(),
            FaceRegion::LeftCheek => landmarks.left_cheek(),
            FaceRegion::RightCheek => landmarks.right_cheek(),
            FaceRegion::Nose => landmarks.nose().to_vec(),
        }
    }
}

/// Integer bounding rectangle of a point set.
///
/// Points are rounded to pixel coordinates; width and height span the
/// extremes inclusively (max - min + 1).
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut min_x = first.x.round() as i32;
    let mut max_x = min_x;
    let mut min_y = first.y.round() as i32;
    let mut max_y = min_y;

    for p in &points[1..] {
        let x = p.x.round() as i32;
        let y = p.y.round() as i32;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    Some(Rect::new(
        min_x,
        min_y,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

/// Skin-toned pixels within a region.
///
/// Crops the bounding rectangle of the region's points (clamped to the
/// image), keeps pixels whose chroma falls in the skin range, and returns
/// them after the YCrCb round trip. Returns an empty list when masking
/// removes everything or the rectangle lies outside the image.
pub fn skin_pixels(image: &BgrImage, region_points: &[Point]) -> Vec<[u8; 3]> {
    let rect = match bounding_rect(region_points)
        .and_then(|r| r.intersect_image(image.width(), image.height()))
    {
        Some(rect) => rect,
        None => return Vec::new(),
    };

    let mut kept = Vec::new();
    for y in rect.y as u32..rect.y as u32 + rect.height {
        for x in rect.x as u32..rect.x as u32 + rect.width {
            let ycrcb = bgr_to_ycrcb(image.pixel(x, y));
            if !in_skin_range(ycrcb) {
                continue;
            }
            let bgr = ycrcb_to_bgr(ycrcb);
            if bgr != skin::MASKED_BGR {
                kept.push(bgr);
            }
        }
    }
    kept
}

fn in_skin_range(ycrcb: [u8; 3]) -> bool {
    let cr = ycrcb[1];
    let cb = ycrcb[2];
    (skin::CR_MIN..=skin::CR_MAX).contains(&cr) && (skin::CB_MIN..=skin::CB_MAX).contains(&cb)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A BGR value inside the skin chroma range.
    pub const SKIN_BGR: [u8; 3] = [150, 170, 210];

    #[test]
    fn test_bounding_rect_inclusive_span() {
        let points = [
            Point::new(2.0, 3.0),
            Point::new(7.0, 3.0),
            Point::new(4.0, 9.0),
        ];
        let rect = bounding_rect(&points).unwrap();
        assert_eq!(rect, Rect::new(2, 3, 6, 7));
    }

    #[test]
    fn test_bounding_rect_rounds_coordinates() {
        let points = [Point::new(1.4, 1.6), Point::new(3.5, 2.4)];
        let rect = bounding_rect(&points).unwrap();
        assert_eq!(rect, Rect::new(1, 2, 4, 1));
    }

    #[test]
    fn test_bounding_rect_empty_points() {
        assert!(bounding_rect(&[]).is_none());
    }

    #[test]
    fn test_skin_pixels_keep_skin_tones() {
        let image = BgrImage::from_fn(10, 10, |_, _| SKIN_BGR);
        let points = [Point::new(2.0, 2.0), Point::new(5.0, 5.0)];
        let pixels = skin_pixels(&image, &points);
        assert_eq!(pixels.len(), 16); // 4x4 inclusive rectangle

        // Kept pixels are the chroma round trip of the original
        for px in &pixels {
            for (a, b) in px.iter().zip(SKIN_BGR.iter()) {
                assert!((*a as i16 - *b as i16).abs() <= 2);
            }
        }
    }

    #[test]
    fn test_skin_pixels_drop_non_skin() {
        // Pure green fails the Cr bound
        let image = BgrImage::from_fn(10, 10, |_, _| [0, 255, 0]);
        let points = [Point::new(0.0, 0.0), Point::new(9.0, 9.0)];
        assert!(skin_pixels(&image, &points).is_empty());
    }

    #[test]
    fn test_skin_pixels_mixed_content() {
        // Left half skin, right half saturated blue
        let image = BgrImage::from_fn(10, 10, |x, _| if x < 5 { SKIN_BGR } else { [255, 0, 0] });
        let points = [Point::new(0.0, 0.0), Point::new(9.0, 9.0)];
        let pixels = skin_pixels(&image, &points);
        assert_eq!(pixels.len(), 50);
    }

    #[test]
    fn test_skin_pixels_clamped_to_image() {
        let image = BgrImage::from_fn(6, 6, |_, _| SKIN_BGR);
        // Rectangle hangs past every border
        let points = [Point::new(-3.0, -3.0), Point::new(20.0, 20.0)];
        let pixels = skin_pixels(&image, &points);
        assert_eq!(pixels.len(), 36);
    }

    #[test]
    fn test_skin_pixels_outside_image() {
        let image = BgrImage::from_fn(6, 6, |_, _| SKIN_BGR);
        let points = [Point::new(50.0, 50.0), Point::new(60.0, 60.0)];
        assert!(skin_pixels(&image, &points).is_empty());
    }

    #[test]
    fn test_extraction_order_is_fixed() {
        assert_eq!(FaceRegion::EXTRACTION_ORDER[0], FaceRegion::RightEye);
        assert_eq!(FaceRegion::EXTRACTION_ORDER[2], FaceRegion::Lips);
        assert_eq!(FaceRegion::EXTRACTION_ORDER[5], FaceRegion::Nose);
    }

    #[test]
    fn test_region_point_counts() {
        let lm = crate::face::test_support::grid_landmarks(Point::new(0.0, 0.0), 1.0);
        assert_eq!(FaceRegion::Lips.points(&lm).len(), 20);
        assert_eq!(FaceRegion::LeftCheek.points(&lm).len(), 9);
        assert_eq!(FaceRegion::RightCheek.points(&lm).len(), 9);
        assert_eq!(FaceRegion::Nose.points(&lm).len(), 9);
        assert_eq!(FaceRegion::RightEye.points(&lm).len(), 6);
    }
}
