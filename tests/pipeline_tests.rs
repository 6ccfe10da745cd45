use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

use yolo2kitti::config::parse_class_mapping;
use yolo2kitti::visualize::{clamp_corners, draw_labeled_box, line_thickness, BoxStyle};
use yolo2kitti::{
    convert_label_file, process_job, render_reports, run_jobs, verify, verify_pair,
    visualize_kitti, visualize_yolo, BatchJob, ContentKind, ConfigError, LabelError, Palette,
};

const KITTI_LINE: &str = "license_plate 0.0 0 -1.0 40.00 60.00 60.00 140.00 0 0 0 0 0 0 0";

fn write_image(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([20, 40, 60]))
        .save(path)
        .unwrap();
}

fn make_dirs(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let dir = root.join(name);
            fs::create_dir_all(&dir).unwrap();
            dir
        })
        .collect()
}

#[test]
fn test_convert_label_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let label_path = root.join("car_001.txt");
    let image_path = root.join("car_001.jpg");
    let output_path = root.join("car_001.kitti.txt");
    fs::write(&label_path, "0 0.5 0.5 0.2 0.4\n\n3 0.5 0.5 0.2 0.4\n").unwrap();
    write_image(&image_path, 100, 200);

    let mapping = parse_class_mapping(r#"{"0": "license_plate"}"#).unwrap();
    let written = convert_label_file(&label_path, &image_path, &output_path, &mapping).unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        fs::read_to_string(&output_path).unwrap(),
        format!(
            "{}\nDontCare 0.0 0 -1.0 40.00 60.00 60.00 140.00 0 0 0 0 0 0 0\n",
            KITTI_LINE
        )
    );
}

#[test]
fn test_convert_label_file_reports_bad_line_without_writing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let label_path = root.join("a.txt");
    let image_path = root.join("a.jpg");
    let output_path = root.join("out.txt");
    fs::write(&label_path, "0 0.5 0.5 0.2 0.4\n0 0.5 0.5 0.2\n").unwrap();
    write_image(&image_path, 64, 64);

    let err = convert_label_file(&label_path, &image_path, &output_path, &Default::default())
        .unwrap_err();
    assert!(matches!(err, LabelError::Parse { line: 2, .. }));
    assert!(!output_path.exists());
}

#[test]
fn test_process_job_is_fail_soft() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["labels", "images"]);
    let (label_dir, image_dir) = (&dirs[0], &dirs[1]);

    fs::write(label_dir.join("good.txt"), "0 0.5 0.5 0.2 0.4\n").unwrap();
    fs::write(label_dir.join("orphan.txt"), "0 0.5 0.5 0.2 0.4\n").unwrap();
    fs::write(label_dir.join("broken.txt"), "0 0.5 oops 0.2 0.4\n").unwrap();
    fs::write(label_dir.join("notes.md"), "not a label").unwrap();
    write_image(&image_dir.join("good.jpg"), 100, 200);
    write_image(&image_dir.join("broken.jpg"), 100, 200);

    let job = BatchJob {
        label_dir: label_dir.clone(),
        output_dir: temp_dir.path().join("kitti"),
        image_dir: image_dir.clone(),
        image_output_dir: Some(temp_dir.path().join("kitti_images")),
    };
    let mapping = parse_class_mapping(r#"{"0": "license_plate"}"#).unwrap();
    let stats = process_job(&job, &mapping, "jpg").unwrap();

    assert_eq!(stats.labels_found, 3);
    assert_eq!(stats.labels_converted, 1);
    assert_eq!(stats.skipped_missing_image, 1);
    assert_eq!(stats.failed_conversions, 1);
    assert_eq!(stats.images_copied, 1);
    assert_eq!(stats.copy_failures, 0);

    assert_eq!(
        fs::read_to_string(job.output_dir.join("good.txt")).unwrap(),
        format!("{}\n", KITTI_LINE)
    );
    assert!(!job.output_dir.join("orphan.txt").exists());
    assert!(!job.output_dir.join("broken.txt").exists());

    let copied = temp_dir.path().join("kitti_images/good.jpg");
    assert_eq!(
        fs::read(&copied).unwrap(),
        fs::read(image_dir.join("good.jpg")).unwrap()
    );
    assert_eq!(
        fs::metadata(&copied).unwrap().modified().unwrap(),
        fs::metadata(image_dir.join("good.jpg"))
            .unwrap()
            .modified()
            .unwrap()
    );
    assert!(!temp_dir.path().join("kitti_images/broken.jpg").exists());
}

#[cfg(unix)]
#[test]
fn test_process_job_copies_read_only_image() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["labels", "images"]);
    fs::write(dirs[0].join("plate.txt"), "0 0.5 0.5 0.2 0.4
").unwrap();
    let source = dirs[1].join("plate.jpg");
    write_image(&source, 100, 200);
    fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

    let job = BatchJob {
        label_dir: dirs[0].clone(),
        output_dir: temp_dir.path().join("kitti"),
        image_dir: dirs[1].clone(),
        image_output_dir: Some(temp_dir.path().join("kitti_images")),
    };
    let stats = process_job(&job, &Default::default(), "jpg").unwrap();

    assert_eq!(stats.images_copied, 1);
    assert_eq!(stats.copy_failures, 0);
    let copied = temp_dir.path().join("kitti_images/plate.jpg");
    let copied_meta = fs::metadata(&copied).unwrap();
    assert_eq!(copied_meta.permissions().mode() & 0o777, 0o444);
    assert_eq!(
        copied_meta.modified().unwrap(),
        fs::metadata(&source).unwrap().modified().unwrap()
    );
}

#[test]
fn test_process_job_counts_failed_image_copy() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["labels", "images", "kitti_images/plate.jpg"]);
    fs::write(dirs[0].join("plate.txt"), "0 0.5 0.5 0.2 0.4
").unwrap();
    write_image(&dirs[1].join("plate.jpg"), 100, 200);

    // A directory sits where the copied image should go
    let job = BatchJob {
        label_dir: dirs[0].clone(),
        output_dir: temp_dir.path().join("kitti"),
        image_dir: dirs[1].clone(),
        image_output_dir: Some(temp_dir.path().join("kitti_images")),
    };
    let stats = process_job(&job, &Default::default(), "jpg").unwrap();

    assert_eq!(stats.labels_converted, 1);
    assert_eq!(stats.images_copied, 0);
    assert_eq!(stats.copy_failures, 1);
    assert!(job.output_dir.join("plate.txt").exists());
    assert!(dirs[2].is_dir());
}

#[test]
fn test_run_jobs_then_verify_passes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(
        temp_dir.path(),
        &["labels/train", "labels/val", "images/train", "images/val"],
    );

    for (label_dir, image_dir, stem) in [(&dirs[0], &dirs[2], "t0"), (&dirs[1], &dirs[3], "v0")] {
        fs::write(label_dir.join(format!("{}.txt", stem)), "0 0.3 0.3 0.1 0.1\n").unwrap();
        write_image(&image_dir.join(format!("{}.png", stem)), 32, 32);
    }

    let jobs: Vec<BatchJob> = [("train", 0, 2), ("val", 1, 3)]
        .iter()
        .map(|(split, label_idx, image_idx)| BatchJob {
            label_dir: dirs[*label_idx].clone(),
            output_dir: temp_dir.path().join("kitti").join(split),
            image_dir: dirs[*image_idx].clone(),
            image_output_dir: None,
        })
        .collect();

    let stats = run_jobs(&jobs, &Default::default(), "png");
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.labels_converted == 1));

    let sources: Vec<_> = jobs.iter().map(|job| job.label_dir.clone()).collect();
    let destinations: Vec<_> = jobs.iter().map(|job| job.output_dir.clone()).collect();
    let reports = verify(&sources, &destinations, ContentKind::Labels).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|report| report.passed()));
    assert!(render_reports(&reports).contains("Verification PASSED"));
}

#[test]
fn test_verify_reports_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["yolo", "kitti"]);

    for stem in ["a", "b", "c"] {
        fs::write(dirs[0].join(format!("{}.txt", stem)), "0 0.5 0.5 0.1 0.1\n").unwrap();
    }
    for stem in ["a", "b"] {
        fs::write(dirs[1].join(format!("{}.txt", stem)), format!("{}\n", KITTI_LINE)).unwrap();
    }

    let report = verify_pair(&dirs[0], &dirs[1], ContentKind::Labels);
    assert_eq!(report.source_count, 3);
    assert_eq!(report.destination_count, 2);
    assert_eq!(report.missing_files.len(), 1);
    assert!(report.missing_files.contains("c.txt"));
    assert!(report.unexpected_files.is_empty());
    assert!(report.errors.is_empty());
    assert!(!report.passed());
    assert!(render_reports(&[report]).contains("Verification FAILED"));
}

#[test]
fn test_verify_flags_malformed_line_and_unexpected_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["yolo", "kitti"]);

    fs::write(dirs[0].join("a.txt"), "0 0.5 0.5 0.1 0.1\n").unwrap();
    let short_line = KITTI_LINE.rsplit_once(' ').unwrap().0;
    fs::write(
        dirs[1].join("a.txt"),
        format!("{}\n{}\n", KITTI_LINE, short_line),
    )
    .unwrap();
    fs::write(dirs[1].join("z.txt"), "").unwrap();

    let report = verify_pair(&dirs[0], &dirs[1], ContentKind::Labels);
    assert_eq!(report.unexpected_files.len(), 1);
    assert_eq!(
        report.errors,
        vec![
            ("a.txt".to_string(), "2: format error".to_string()),
            ("z.txt".to_string(), "empty file".to_string()),
        ]
    );
}

#[test]
fn test_verify_images_detects_corrupt_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["images", "copies"]);

    for dir in &dirs {
        write_image(&dir.join("ok.png"), 8, 8);
    }
    write_image(&dirs[0].join("bad.jpg"), 8, 8);
    fs::write(dirs[1].join("bad.jpg"), b"definitely not a jpeg").unwrap();

    let report = verify_pair(&dirs[0], &dirs[1], ContentKind::Images);
    assert_eq!(report.source_count, 2);
    assert_eq!(report.destination_count, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].0, "bad.jpg");
    assert!(!report.passed());
}

#[test]
fn test_verify_missing_destination_folder() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["yolo"]);
    fs::write(dirs[0].join("a.txt"), "0 0.5 0.5 0.1 0.1\n").unwrap();

    let report = verify_pair(&dirs[0], &temp_dir.path().join("nope"), ContentKind::Labels);
    assert_eq!(report.destination_count, 0);
    assert_eq!(report.missing_files.len(), 1);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_verify_rejects_mismatched_folder_lists() {
    let result = verify(
        &[PathBuf::from("a"), PathBuf::from("b")],
        &[PathBuf::from("c")],
        ContentKind::Labels,
    );
    assert!(matches!(
        result,
        Err(ConfigError::FolderCountMismatch { .. })
    ));
}

#[test]
fn test_palette_is_deterministic() {
    let first = Palette::new(42, 3);
    let second = Palette::new(42, 3);
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first.color(10), second.color(10));

    let other = Palette::new(7, 3);
    assert_ne!(
        (0..3).map(|i| first.color(i)).collect::<Vec<_>>(),
        (0..3).map(|i| other.color(i)).collect::<Vec<_>>()
    );
}

#[test]
fn test_line_thickness() {
    assert_eq!(line_thickness(100, 200), 1);
    assert_eq!(line_thickness(1000, 1000), 3);
}

#[test]
fn test_draw_labeled_box_without_font() {
    let mut image = RgbImage::new(50, 50);
    let style = BoxStyle::for_kitti();
    draw_labeled_box(&mut image, (10, 20, 30, 40), "a", &style, None);

    // Left edge in the box color, tag filled above the box, inside untouched
    assert_eq!(*image.get_pixel(10, 30), style.color);
    assert_eq!(*image.get_pixel(12, 10), style.tag_color);
    assert_eq!(*image.get_pixel(20, 30), Rgb([0, 0, 0]));
}

#[test]
fn test_clamp_corners_keeps_boxes_near_the_image() {
    assert_eq!(clamp_corners((10, 20, 30, 40), 50, 50, 2), (10, 20, 30, 40));
    assert_eq!(
        clamp_corners((i32::MIN, -5, i32::MAX, 70), 50, 60, 2),
        (-3, -3, 53, 63)
    );
}

#[test]
fn test_draw_labeled_box_with_extreme_corners() {
    let mut image = RgbImage::new(40, 30);
    let style = BoxStyle::for_kitti();
    draw_labeled_box(
        &mut image,
        (i32::MIN, i32::MIN, i32::MAX, i32::MAX),
        "huge",
        &style,
        None,
    );
    draw_labeled_box(&mut image, (i32::MAX, 5, i32::MAX - 1, 6), "far", &style, None);

    // The outlines lie outside the frame, so only the first tag is visible
    assert_eq!(*image.get_pixel(10, 5), style.tag_color);
    assert_eq!(*image.get_pixel(35, 25), Rgb([0, 0, 0]));
}

#[test]
fn test_visualize_yolo_writes_overlays() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["images", "labels"]);
    let output_dir = temp_dir.path().join("viz");

    write_image(&dirs[0].join("p1.jpg"), 120, 80);
    // Class 5 has no name: drawn with a fallback tag instead of failing
    fs::write(
        dirs[1].join("p1.txt"),
        "0 0.5 0.5 0.2 0.4\n5 0.25 0.25 0.1 0.1\n",
    )
    .unwrap();
    fs::write(dirs[1].join("p2.txt"), "0 0.5 0.5 0.2 0.4\n").unwrap();

    let class_names = vec!["license_plate".to_string()];
    let stats = visualize_yolo(
        &dirs[0],
        &dirs[1],
        Some(&output_dir),
        &class_names,
        "jpg",
        &Palette::new(42, class_names.len()),
        None,
    )
    .unwrap();

    assert_eq!(stats.images_rendered, 1);
    assert_eq!(stats.boxes_drawn, 2);
    assert_eq!(stats.skipped_missing_image, 1);
    assert_eq!(image::image_dimensions(output_dir.join("p1.jpg")).unwrap(), (120, 80));
}

#[test]
fn test_visualize_kitti_writes_png() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["images", "kitti"]);
    let output_dir = temp_dir.path().join("result_viz");

    write_image(&dirs[0].join("k1.jpg"), 100, 200);
    fs::write(dirs[1].join("k1.txt"), format!("{}\n", KITTI_LINE)).unwrap();
    write_image(&dirs[0].join("k2.jpg"), 100, 200);
    fs::write(dirs[1].join("k2.txt"), "license_plate 0.0 0\n").unwrap();

    let stats = visualize_kitti(&dirs[0], &dirs[1], Some(&output_dir), "jpg", None).unwrap();

    assert_eq!(stats.images_rendered, 1);
    assert_eq!(stats.boxes_drawn, 1);
    assert_eq!(stats.failed, 1);

    let overlay = image::open(output_dir.join("k1.png")).unwrap().to_rgb8();
    assert_eq!(*overlay.get_pixel(40, 100), Rgb([255, 0, 0]));
    assert!(!output_dir.join("k2.png").exists());
}

#[test]
fn test_visualize_kitti_survives_out_of_range_boxes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dirs = make_dirs(temp_dir.path(), &["images", "kitti"]);
    let output_dir = temp_dir.path().join("viz");

    write_image(&dirs[0].join("wide.jpg"), 100, 200);
    fs::write(
        dirs[1].join("wide.txt"),
        "car 0.0 0 -1.0 -3000000000 0 3000000000 10 0 0 0 0 0 0 0\n",
    )
    .unwrap();
    write_image(&dirs[0].join("normal.jpg"), 100, 200);
    fs::write(dirs[1].join("normal.txt"), format!("{}\n", KITTI_LINE)).unwrap();

    let stats = visualize_kitti(&dirs[0], &dirs[1], Some(&output_dir), "jpg", None).unwrap();

    assert_eq!(stats.images_rendered, 2);
    assert_eq!(stats.boxes_drawn, 2);
    assert_eq!(stats.failed, 0);
    assert!(output_dir.join("wide.png").exists());
    assert!(output_dir.join("normal.png").exists());
}
