use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LabelError, ParseError};
use crate::io::write_text_file;
use crate::types::{ClassMapping, KittiBox, YoloBox, YOLO_FIELD_COUNT};
use crate::utils::read_image_dimensions;

// Columns 4..8 of a KITTI line hold the 2D box, so anything shorter is unusable
pub const KITTI_MIN_FIELDS: usize = 8;

fn parse_f64(token: &str, field: &'static str) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::NonNumeric {
        field,
        value: token.to_string(),
    })
}

impl YoloBox {
    /// Parse `<class_id> <x_center> <y_center> <width> <height>`
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != YOLO_FIELD_COUNT {
            return Err(ParseError::WrongFieldCount {
                expected: YOLO_FIELD_COUNT,
                found: tokens.len(),
            });
        }

        let class_id = tokens[0]
            .parse::<usize>()
            .map_err(|_| ParseError::NonNumeric {
                field: "class_id",
                value: tokens[0].to_string(),
            })?;

        Ok(YoloBox {
            class_id,
            x_center: parse_f64(tokens[1], "x_center")?,
            y_center: parse_f64(tokens[2], "y_center")?,
            width: parse_f64(tokens[3], "width")?,
            height: parse_f64(tokens[4], "height")?,
        })
    }

    /// Absolute corners `(x_left, y_top, x_right, y_bottom)` on a `width` x `height` image
    pub fn to_corners(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let (w, h) = (width as f64, height as f64);
        (
            (self.x_center - self.width / 2.0) * w,
            (self.y_center - self.height / 2.0) * h,
            (self.x_center + self.width / 2.0) * w,
            (self.y_center + self.height / 2.0) * h,
        )
    }

    /// Corners rounded to whole pixels, for drawing
    pub fn to_pixel_corners(&self, width: u32, height: u32) -> (i32, i32, i32, i32) {
        let x_center = self.x_center * width as f64;
        let y_center = self.y_center * height as f64;
        let w = self.width * width as f64;
        let h = self.height * height as f64;
        (
            (x_center - w / 2.0).round() as i32,
            (y_center - h / 2.0).round() as i32,
            (x_center + w / 2.0).round() as i32,
            (y_center + h / 2.0).round() as i32,
        )
    }

    /// Convert to a KITTI box, naming the class through `mapping`
    pub fn to_kitti(&self, width: u32, height: u32, mapping: &ClassMapping) -> KittiBox {
        let (x_min, y_min, x_max, y_max) = self.to_corners(width, height);
        KittiBox {
            class_name: mapping.resolve(self.class_id).to_string(),
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

impl FromStr for YoloBox {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YoloBox::parse(s)
    }
}

impl KittiBox {
    /// Parse the class name and 2D box of a KITTI line; trailing 3D fields are ignored
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < KITTI_MIN_FIELDS {
            return Err(ParseError::WrongFieldCount {
                expected: KITTI_MIN_FIELDS,
                found: tokens.len(),
            });
        }

        Ok(KittiBox {
            class_name: tokens[0].to_string(),
            x_min: parse_f64(tokens[4], "bbox_left")?,
            y_min: parse_f64(tokens[5], "bbox_top")?,
            x_max: parse_f64(tokens[6], "bbox_right")?,
            y_max: parse_f64(tokens[7], "bbox_bottom")?,
        })
    }

    /// Back to normalized YOLO coordinates on a `width` x `height` image
    pub fn to_yolo(&self, class_id: usize, width: u32, height: u32) -> YoloBox {
        let (w, h) = (width as f64, height as f64);
        YoloBox {
            class_id,
            x_center: (self.x_min + self.x_max) / 2.0 / w,
            y_center: (self.y_min + self.y_max) / 2.0 / h,
            width: (self.x_max - self.x_min) / w,
            height: (self.y_max - self.y_min) / h,
        }
    }
}

impl FromStr for KittiBox {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KittiBox::parse(s)
    }
}

// Canonical 15-field line: truncation, occlusion and alpha are fixed, 3D fields zeroed
impl fmt::Display for KittiBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 0.0 0 -1.0 {:.2} {:.2} {:.2} {:.2} 0 0 0 0 0 0 0",
            self.class_name, self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}

/// Parse every non-blank line of a label file with `parse`, tagging errors with the 1-based line
fn read_label_file<T>(
    path: &Path,
    parse: impl Fn(&str) -> Result<T, ParseError>,
) -> Result<Vec<T>, LabelError> {
    let content = fs::read_to_string(path).map_err(|source| LabelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse(line).map_err(|source| LabelError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Read all boxes of a YOLO label file
pub fn read_yolo_labels(path: &Path) -> Result<Vec<YoloBox>, LabelError> {
    read_label_file(path, YoloBox::parse)
}

/// Read all boxes of a KITTI label file
pub fn read_kitti_labels(path: &Path) -> Result<Vec<KittiBox>, LabelError> {
    read_label_file(path, KittiBox::parse)
}

/// Render boxes as KITTI label file contents, one line per box
pub fn format_kitti_labels(boxes: &[KittiBox]) -> String {
    let mut kitti_data = String::with_capacity(boxes.len() * 64);
    for kitti_box in boxes {
        kitti_data.push_str(&kitti_box.to_string());
        kitti_data.push('\n');
    }
    kitti_data
}

/// Convert one YOLO label file into a KITTI label file.
///
/// The image is only used for its dimensions. The output is written once
/// every line parsed, so a malformed label never leaves a partial file.
/// Returns the number of boxes written.
pub fn convert_label_file(
    label_path: &Path,
    image_path: &Path,
    output_path: &Path,
    mapping: &ClassMapping,
) -> Result<usize, LabelError> {
    let (width, height) = read_image_dimensions(image_path).map_err(|source| LabelError::Image {
        path: image_path.to_path_buf(),
        source,
    })?;

    let kitti_boxes: Vec<KittiBox> = read_yolo_labels(label_path)?
        .iter()
        .map(|yolo_box| yolo_box.to_kitti(width, height, mapping))
        .collect();

    write_text_file(output_path, &format_kitti_labels(&kitti_boxes)).map_err(|source| {
        LabelError::Io {
            path: output_path.to_path_buf(),
            source,
        }
    })?;

    Ok(kitti_boxes.len())
}
