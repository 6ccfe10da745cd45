//! Bounding box overlays for YOLO and KITTI label folders
//!
//! Both front ends walk a label folder, pair each label file with the image
//! sharing its stem, draw every box with a class tag, then save or show the result.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

use crate::conversion::{read_kitti_labels, read_yolo_labels};
use crate::error::LabelError;
use crate::io::{collect_files_with_extensions, companion_path};
use crate::types::{VisualizeStats, LABEL_EXTENSION};
use crate::utils::{create_output_directory, create_progress_bar};

// KITTI overlays are always written as PNG
pub const KITTI_OUTPUT_EXT: &str = "png";

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const TAG_TEXT: Rgb<u8> = Rgb([225, 255, 255]);

/// Deterministic per-class colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    seed: u64,
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    /// Draw `count` colors in class order from a generator seeded with `seed`
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let colors = (0..count).map(|_| random_color(&mut rng)).collect();
        Palette { seed, colors }
    }

    /// Color of a class index; indices past the palette get their own seeded color
    pub fn color(&self, class_idx: usize) -> Rgb<u8> {
        match self.colors.get(class_idx) {
            Some(color) => *color,
            None => random_color(&mut StdRng::seed_from_u64(
                self.seed.wrapping_add(class_idx as u64),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn random_color(rng: &mut StdRng) -> Rgb<u8> {
    Rgb([rng.gen(), rng.gen(), rng.gen()])
}

/// How a box and its tag are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub color: Rgb<u8>,
    pub tag_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub thickness: u32,
    pub text_height: f32,
}

impl BoxStyle {
    /// Style for YOLO overlays: class color, tag filled with the same color
    pub fn for_yolo(image: &RgbImage, color: Rgb<u8>) -> Self {
        let thickness = line_thickness(image.width(), image.height());
        BoxStyle {
            color,
            tag_color: color,
            text_color: TAG_TEXT,
            thickness,
            text_height: (22.0 * thickness as f32 / 3.0).max(12.0),
        }
    }

    /// Style for KITTI overlays: red outline, red text on white
    pub fn for_kitti() -> Self {
        BoxStyle {
            color: RED,
            tag_color: WHITE,
            text_color: RED,
            thickness: 2,
            text_height: 14.0,
        }
    }
}

/// Line thickness scaled with the image size
pub fn line_thickness(width: u32, height: u32) -> u32 {
    (0.002 * (width + height) as f64 / 2.0).round() as u32 + 1
}

/// Load a TrueType font for the class tags.
///
/// Returns `None` (tags are drawn without text) when the font is missing or invalid.
pub fn load_font(path: &Path) -> Option<FontVec> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read font {}: {}; class names will not be drawn", path.display(), e);
            return None;
        }
    };
    match FontVec::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Invalid font {}: {}; class names will not be drawn", path.display(), e);
            None
        }
    }
}

/// Clamp corners to the image plus a margin wider than the outline.
///
/// Label coordinates are not range checked, so corners may be anywhere in `i32`.
pub fn clamp_corners(
    corners: (i32, i32, i32, i32),
    width: u32,
    height: u32,
    thickness: u32,
) -> (i32, i32, i32, i32) {
    let margin = thickness.min(1 << 16) as i32 + 1;
    let max_x = width.min(i32::MAX as u32 / 2) as i32 + margin;
    let max_y = height.min(i32::MAX as u32 / 2) as i32 + margin;
    let (x1, y1, x2, y2) = corners;
    (
        x1.clamp(-margin, max_x),
        y1.clamp(-margin, max_y),
        x2.clamp(-margin, max_x),
        y2.clamp(-margin, max_y),
    )
}

/// Draw one box given by its corners, plus a tag carrying `label` above its top-left corner
pub fn draw_labeled_box(
    image: &mut RgbImage,
    corners: (i32, i32, i32, i32),
    label: &str,
    style: &BoxStyle,
    font: Option<&FontVec>,
) {
    let (x1, y1, x2, y2) = clamp_corners(corners, image.width(), image.height(), style.thickness);
    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));

    // Grow the outline around the box edge, one pixel ring at a time
    let half = (style.thickness / 2) as i32;
    for ring in 0..style.thickness as i32 {
        let offset = ring - half;
        let width = (right - left - 2 * offset).max(1) as u32;
        let height = (bottom - top - 2 * offset).max(1) as u32;
        draw_hollow_rect_mut(
            image,
            Rect::at(left + offset, top + offset).of_size(width, height),
            style.color,
        );
    }

    if label.is_empty() {
        return;
    }
    let scale = PxScale::from(style.text_height);
    let (text_width, text_height) = match font {
        Some(font) => text_size(scale, font, label),
        None => (
            (style.text_height as u32 / 2).saturating_mul(label.len() as u32),
            style.text_height as u32,
        ),
    };
    let tag_height = text_height + 3;
    let tag_top = (top - tag_height as i32).max(0);
    draw_filled_rect_mut(
        image,
        Rect::at(left, tag_top).of_size(text_width.max(1), tag_height),
        style.tag_color,
    );
    if let Some(font) = font {
        draw_text_mut(image, style.text_color, left, tag_top + 1, scale, font, label);
    }
}

/// Directory receiving overlays that are shown instead of saved.
///
/// It is kept after the run so the viewer can still read the files.
fn viewer_directory() -> std::io::Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix("yolo2kitti-viz-")
        .tempdir()?
        .keep();
    info!("Overlays for display are written to {}", dir.display());
    Ok(dir)
}

/// Open an overlay with the system image viewer
pub fn show_overlay(path: &Path) {
    if let Err(e) = opener::open(path) {
        warn!("Failed to open viewer for {}: {}", path.display(), e);
    }
}

/// Shared walk over a label folder: pair, decode, draw, then save or show
fn render_label_folder(
    image_dir: &Path,
    label_dir: &Path,
    output_dir: Option<&Path>,
    image_ext: &str,
    output_ext: &str,
    mut draw: impl FnMut(&Path, &mut RgbImage) -> Result<usize, LabelError>,
) -> std::io::Result<VisualizeStats> {
    let (output_dir, show) = match output_dir {
        Some(dir) => (create_output_directory(dir)?, false),
        None => (viewer_directory()?, true),
    };

    let label_files = collect_files_with_extensions(label_dir, &[LABEL_EXTENSION]);
    let pb = create_progress_bar(label_files.len() as u64, "Visualizing labels");
    let mut stats = VisualizeStats::default();

    for label_path in &label_files {
        pb.inc(1);
        let (Some(image_path), Some(output_path)) = (
            companion_path(label_path, image_dir, image_ext),
            companion_path(label_path, &output_dir, output_ext),
        ) else {
            continue;
        };

        if !image_path.exists() {
            warn!("Image not found for label: {}", label_path.display());
            stats.skipped_missing_image += 1;
            continue;
        }

        let mut image = match image::open(&image_path) {
            Ok(image) => image.to_rgb8(),
            Err(e) => {
                error!("Failed to open image {}: {}", image_path.display(), e);
                stats.failed += 1;
                continue;
            }
        };

        let boxes = match draw(label_path, &mut image) {
            Ok(boxes) => boxes,
            Err(e) => {
                error!("Skipping label file: {}", e);
                stats.failed += 1;
                continue;
            }
        };

        if let Err(e) = image.save(&output_path) {
            error!("Failed to save {}: {}", output_path.display(), e);
            stats.failed += 1;
            continue;
        }
        if show {
            show_overlay(&output_path);
        }
        stats.images_rendered += 1;
        stats.boxes_drawn += boxes;
    }
    pb.finish_with_message("Visualization complete");

    Ok(stats)
}

/// Draw YOLO labels onto their images, colored and tagged per class.
///
/// Overlays go to `output_dir`, or to the system viewer when it is `None`.
pub fn visualize_yolo(
    image_dir: &Path,
    label_dir: &Path,
    output_dir: Option<&Path>,
    class_names: &[String],
    image_ext: &str,
    palette: &Palette,
    font: Option<&FontVec>,
) -> std::io::Result<VisualizeStats> {
    render_label_folder(
        image_dir,
        label_dir,
        output_dir,
        image_ext,
        image_ext,
        |label_path, image| {
            let boxes = read_yolo_labels(label_path)?;
            let (width, height) = image.dimensions();
            for yolo_box in &boxes {
                let label = match class_names.get(yolo_box.class_id) {
                    Some(name) => name.clone(),
                    None => {
                        warn!(
                            "{}: class index {} has no name ({} class names given)",
                            label_path.display(),
                            yolo_box.class_id,
                            class_names.len()
                        );
                        format!("class_{}", yolo_box.class_id)
                    }
                };
                let style = BoxStyle::for_yolo(image, palette.color(yolo_box.class_id));
                let corners = yolo_box.to_pixel_corners(width, height);
                draw_labeled_box(image, corners, &label, &style, font);
            }
            Ok(boxes.len())
        },
    )
}

/// Draw KITTI labels onto their images in red as PNG overlays, saved or shown
pub fn visualize_kitti(
    image_dir: &Path,
    label_dir: &Path,
    output_dir: Option<&Path>,
    image_ext: &str,
    font: Option<&FontVec>,
) -> std::io::Result<VisualizeStats> {
    let style = BoxStyle::for_kitti();
    render_label_folder(
        image_dir,
        label_dir,
        output_dir,
        image_ext,
        KITTI_OUTPUT_EXT,
        |label_path, image| {
            let boxes = read_kitti_labels(label_path)?;
            for kitti_box in &boxes {
                let corners = (
                    kitti_box.x_min.round() as i32,
                    kitti_box.y_min.round() as i32,
                    kitti_box.x_max.round() as i32,
                    kitti_box.y_max.round() as i32,
                );
                draw_labeled_box(image, corners, &kitti_box.class_name, &style, font);
            }
            Ok(boxes.len())
        },
    )
}
