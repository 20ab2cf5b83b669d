// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use cropkit_core::{CropOverlay, HandleId, Point, Rect, Size};
use eventline::{debug, info, warn};

use crate::cli::{Args, Cmd};
use crate::config::CropkitConfig;
use crate::host::{self, ZoomSurface};
use crate::paths;
use crate::session;

pub fn run(args: Args, cfg: &CropkitConfig) -> Result<(), String> {
    debug!("parsed args: {:?}", args.cmd);

    match args.cmd {
        Cmd::Init { surface } => {
            let overlay = new_overlay(surface, cfg)?;
            println!("{}", overlay.point_rectangle());
            Ok(())
        }

        Cmd::Drag {
            surface,
            handle,
            by,
            steps,
        } => {
            let steps = steps.unwrap_or_else(|| gesture_steps(by));
            run_drag(new_overlay(surface, cfg)?, handle, by, steps)
        }

        Cmd::Run { script, surface } => {
            let src = std::fs::read_to_string(&script)
                .map_err(|e| format!("read {}: {e}", script.display()))?;
            let commands = session::parse_script(&src)?;
            info!("replaying {} commands from {}", commands.len(), script.display());

            let mut overlay = new_overlay(surface, cfg)?;
            let report = session::run(&mut overlay, &commands, std::io::stdout().lock())?;
            for note in &report.refused {
                warn!("refused: {note}");
            }
            info!("session finished at {}", report.rect);
            Ok(())
        }

        Cmd::Crop {
            image,
            rect,
            zoom,
            offset,
            output,
        } => {
            let output = output.unwrap_or_else(|| default_output(&image, cfg));
            run_crop(&image, rect, zoom, offset.unwrap_or_default(), &output)
        }
    }
}

fn new_overlay(surface: Size, cfg: &CropkitConfig) -> Result<CropOverlay, String> {
    if !(surface.w.is_finite() && surface.h.is_finite()) || surface.w <= 0.0 || surface.h <= 0.0 {
        return Err(format!("surface must be positive, got {}x{}", surface.w, surface.h));
    }
    Ok(CropOverlay::new(surface, cfg.crop))
}

const MAX_GESTURE_STEPS: u32 = 10_000;

/// One update per logical point along the longer axis. A single jump past the
/// minimum size rolls back to the last stable rectangle, so a gesture has to
/// arrive in small pieces to stop exactly at the floor.
fn gesture_steps(by: Point) -> u32 {
    let travel = by.x.abs().max(by.y.abs());
    if !travel.is_finite() {
        return 1;
    }
    (travel.ceil() as u32).clamp(1, MAX_GESTURE_STEPS)
}

fn run_drag(mut overlay: CropOverlay, handle: HandleId, by: Point, steps: u32) -> Result<(), String> {
    if !overlay.begin_drag(handle) {
        return Err(format!("could not start dragging {handle}"));
    }
    debug!("drag {handle} by ({}, {}) in {steps} steps", by.x, by.y);

    let n = steps as f64;
    for i in 1..=steps {
        let i = i as f64;
        let t = Point::new(by.x * i / n, by.y * i / n);
        if let Some(r) = overlay.update_drag(handle, t) {
            println!("{r}");
        }
    }

    overlay.end_drag(handle);
    info!("drag finished at {}", overlay.point_rectangle());
    Ok(())
}

fn run_crop(image: &Path, rect: Rect, zoom: f64, offset: Point, output: &Path) -> Result<(), String> {
    let (w, h) = image::image_dimensions(image)
        .map_err(|e| format!("read {}: {e}", image.display()))?;

    let surface = ZoomSurface::new(w, h, zoom, offset)?;
    debug!("image {w}x{h}, zoomed content {:?}", surface.content_size());
    let px = surface
        .view_to_image(rect)
        .ok_or_else(|| format!("crop rectangle {rect} selects nothing of the image"))?;
    debug!("view {rect} -> pixels {:?}", px);

    paths::ensure_parent_dir(output).map_err(|e| format!("create output dir: {e}"))?;
    let (cw, ch) = host::crop_file(image, px, output)?;

    info!("wrote {}x{} crop to {}", cw, ch, output.display());
    println!("saved to: {}", output.display());
    Ok(())
}

fn default_output(image: &Path, cfg: &CropkitConfig) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    cfg.output_directory.join(format!("{stem}-crop.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_steps_follow_travel() {
        assert_eq!(gesture_steps(Point::new(200.0, 200.0)), 200);
        assert_eq!(gesture_steps(Point::new(-20.0, 5.5)), 20);
        assert_eq!(gesture_steps(Point::new(0.25, 0.0)), 1);
        assert_eq!(gesture_steps(Point::new(0.0, 0.0)), 1);
        assert_eq!(gesture_steps(Point::new(1e9, 0.0)), MAX_GESTURE_STEPS);
        assert_eq!(gesture_steps(Point::new(f64::INFINITY, 3.0)), 1);
    }

    #[test]
    fn test_default_drag_stops_at_minimum_size() {
        let cfg = CropkitConfig::default();
        let mut overlay = new_overlay(Size::new(200.0, 200.0), &cfg).unwrap();
        let by = Point::new(200.0, 200.0);
        let n = gesture_steps(by);

        overlay.begin_drag(HandleId::TopLeft);
        let n_f = f64::from(n);
        for i in 1..=n {
            let i = f64::from(i);
            overlay.update_drag(HandleId::TopLeft, Point::new(by.x * i / n_f, by.y * i / n_f));
        }
        overlay.end_drag(HandleId::TopLeft);

        assert_eq!(overlay.point_rectangle(), Rect::new(120.0, 120.0, 50.0, 50.0));
    }
}
