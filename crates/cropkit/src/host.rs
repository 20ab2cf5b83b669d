// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use cropkit_core::{Point, Rect, Size};
use image::DynamicImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// The zoomable surface the overlay sits on: an image of `image_size`
/// pixels shown at `zoom`, scrolled by `offset` view units.
#[derive(Debug, Clone, Copy)]
pub struct ZoomSurface {
    image_w: u32,
    image_h: u32,
    zoom: f64,
    offset: Point,
}

impl ZoomSurface {
    pub fn new(image_w: u32, image_h: u32, zoom: f64, offset: Point) -> Result<Self, String> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(format!("zoom must be a positive number, got {zoom}"));
        }
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err("offset must be finite".into());
        }
        Ok(Self {
            image_w,
            image_h,
            zoom,
            offset,
        })
    }

    /// Size of the zoomed image in view units.
    pub fn content_size(&self) -> Size {
        Size::new(
            self.image_w as f64 * self.zoom,
            self.image_h as f64 * self.zoom,
        )
    }

    /// Map a view-space crop rectangle onto image pixels, clipped to the
    /// image. `None` when nothing of the image is selected.
    pub fn view_to_image(&self, rect: Rect) -> Option<PixelRect> {
        let rect = rect.normalized();
        if !rect.is_finite() {
            return None;
        }

        let to_px = |v: f64, offset: f64, limit: u32| {
            ((v + offset) / self.zoom).round().max(0.0).min(limit as f64) as u32
        };

        let x0 = to_px(rect.min_x(), self.offset.x, self.image_w);
        let x1 = to_px(rect.max_x(), self.offset.x, self.image_w);
        let y0 = to_px(rect.min_y(), self.offset.y, self.image_h);
        let y1 = to_px(rect.max_y(), self.offset.y, self.image_h);

        (x1 > x0 && y1 > y0).then_some(PixelRect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        })
    }
}

/// Re-centre `rect` inside `view`, shrinking it if it no longer fits.
/// The result is meant for `CropOverlay::set_point_frame`.
pub fn recenter(rect: Rect, view: Size) -> Rect {
    let w = rect.w.min(view.w.max(0.0));
    let h = rect.h.min(view.h.max(0.0));
    Rect::new((view.w - w) / 2.0, (view.h - h) / 2.0, w, h)
}

pub fn crop_image(image: &DynamicImage, r: PixelRect) -> DynamicImage {
    image.crop_imm(r.x, r.y, r.w, r.h)
}

pub fn crop_file(input: &Path, r: PixelRect, output: &Path) -> Result<(u32, u32), String> {
    let image = image::open(input).map_err(|e| format!("open {}: {e}", input.display()))?;
    let cropped = crop_image(&image, r);
    cropped
        .save(output)
        .map_err(|e| format!("save {}: {e}", output.display()))?;
    Ok((cropped.width(), cropped.height()))
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba, RgbaImage};

    use super::*;

    #[test]
    fn test_rejects_bad_zoom() {
        assert!(ZoomSurface::new(10, 10, 0.0, Point::default()).is_err());
        assert!(ZoomSurface::new(10, 10, f64::NAN, Point::default()).is_err());
        assert!(ZoomSurface::new(10, 10, 1.0, Point::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_identity_mapping() {
        let s = ZoomSurface::new(200, 100, 1.0, Point::default()).unwrap();
        assert_eq!(
            s.view_to_image(Rect::new(10.0, 10.0, 80.0, 60.0)),
            Some(PixelRect { x: 10, y: 10, w: 80, h: 60 })
        );
    }

    #[test]
    fn test_zoom_and_offset() {
        let s = ZoomSurface::new(400, 400, 2.0, Point::new(10.0, 0.0)).unwrap();
        assert_eq!(s.content_size(), Size::new(800.0, 800.0));
        assert_eq!(
            s.view_to_image(Rect::new(10.0, 10.0, 80.0, 60.0)),
            Some(PixelRect { x: 10, y: 5, w: 40, h: 30 })
        );
    }

    #[test]
    fn test_clipped_to_image() {
        let s = ZoomSurface::new(50, 50, 1.0, Point::default()).unwrap();
        assert_eq!(
            s.view_to_image(Rect::new(30.0, 40.0, 100.0, 100.0)),
            Some(PixelRect { x: 30, y: 40, w: 20, h: 10 })
        );
        assert_eq!(s.view_to_image(Rect::new(60.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn test_recenter() {
        let view = Size::new(200.0, 100.0);
        assert_eq!(
            recenter(Rect::new(0.0, 0.0, 80.0, 40.0), view),
            Rect::new(60.0, 30.0, 80.0, 40.0)
        );
        assert_eq!(
            recenter(Rect::new(5.0, 5.0, 300.0, 40.0), view),
            Rect::new(0.0, 30.0, 200.0, 40.0)
        );
    }

    #[test]
    fn test_crop_image_takes_selected_pixels() {
        let mut img = RgbaImage::new(20, 10);
        img.put_pixel(12, 4, Rgba([255, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);

        let out = crop_image(&img, PixelRect { x: 10, y: 2, w: 5, h: 5 });
        assert_eq!(out.dimensions(), (5, 5));
        assert_eq!(out.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_crop_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        DynamicImage::ImageRgba8(RgbaImage::new(40, 30))
            .save(&input)
            .unwrap();

        let dims = crop_file(&input, PixelRect { x: 5, y: 5, w: 10, h: 20 }, &output).unwrap();
        assert_eq!(dims, (10, 20));
        assert_eq!(image::open(&output).unwrap().dimensions(), (10, 20));
    }
}
