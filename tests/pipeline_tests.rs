mod common;

use image::{GenericImageView, ImageFormat, Rgba};
use img_stamp::{
    batch_stamp_images, process_event, stamp_image, AssetCatalog, ChangeEvent, EmbeddedCatalog,
    FsStore, MemoryCatalog, MemoryStore, ObjectStore, Outcome, StampOptions,
};

#[test]
fn stamped_png_keeps_source_bounds() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let source = common::encode_png(300, 200, [255, 255, 255, 255]);

    let stamped = stamp_image(&source, &catalog, &options).unwrap();

    assert_eq!(image::guess_format(&stamped).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&stamped).unwrap();
    assert_eq!(decoded.dimensions(), (300, 200));
}

#[test]
fn jpeg_input_comes_out_as_png() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let source = common::encode_jpeg(320, 240);

    let stamped = stamp_image(&source, &catalog, &options).unwrap();

    assert_eq!(image::guess_format(&stamped).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&stamped).unwrap();
    assert_eq!(decoded.dimensions(), (320, 240));
}

#[test]
fn watermark_is_visible_in_bottom_right_region() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let source = common::encode_png(200, 200, [255, 255, 255, 255]);

    let stamped = stamp_image(&source, &catalog, &options).unwrap();
    let canvas = image::load_from_memory(&stamped).unwrap().to_rgba8();

    // 200x200 selects the 64px stamp; some pixel in that corner changes.
    let mut touched = false;
    for y in 136..200 {
        for x in 136..200 {
            if *canvas.get_pixel(x, y) != Rgba([255, 255, 255, 255]) {
                touched = true;
            }
        }
    }
    assert!(touched, "no watermark pixels in the bottom-right corner");

    // Pixels far from the corner stay untouched.
    assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*canvas.get_pixel(100, 10), Rgba([255, 255, 255, 255]));
}

#[test]
fn missing_catalog_size_still_watermarks_via_default() {
    let embedded = EmbeddedCatalog::new();
    let mut sparse = MemoryCatalog::new();
    sparse.insert(16, embedded.get(16).unwrap().to_vec());

    let options = StampOptions::default();
    // 1000x1000 wants the 256px stamp, which this catalog lacks.
    let source = common::encode_png(1000, 1000, [255, 255, 255, 255]);
    let stamped = stamp_image(&source, &sparse, &options).unwrap();

    let canvas = image::load_from_memory(&stamped).unwrap().to_rgba8();
    let mut touched = false;
    for y in 984..1000 {
        for x in 984..1000 {
            if *canvas.get_pixel(x, y) != Rgba([255, 255, 255, 255]) {
                touched = true;
            }
        }
    }
    assert!(touched, "fallback stamp was not drawn");
}

#[test]
fn stamping_is_deterministic_across_calls() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let source = common::encode_png(123, 77, [9, 8, 7, 255]);

    let first = stamp_image(&source, &catalog, &options).unwrap();
    let second = stamp_image(&source, &catalog, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn stamp_larger_than_source_is_cropped() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::new(false, Some(64)).unwrap();
    let source = common::encode_png(10, 10, [255, 255, 255, 255]);

    let stamped = stamp_image(&source, &catalog, &options).unwrap();
    let decoded = image::load_from_memory(&stamped).unwrap();
    assert_eq!(decoded.dimensions(), (10, 10));
}

#[test]
fn created_event_stores_png_artifact_under_prefixed_key() {
    let mut store = MemoryStore::new();
    store
        .put("uploads/photo.jpg", &common::encode_jpeg(128, 96))
        .unwrap();

    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let event = ChangeEvent::Created {
        key: "uploads/photo.jpg".to_string(),
    };
    let outcome = process_event(&mut store, &catalog, &options, &event).unwrap();

    assert_eq!(
        outcome,
        Outcome::Stamped {
            output_key: "xformed_uploads/photo.jpg".to_string()
        }
    );

    let artifact = store.get("xformed_uploads/photo.jpg").unwrap();
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&artifact).unwrap();
    assert_eq!(decoded.dimensions(), (128, 96));
}

#[test]
fn event_lifecycle_create_skip_remove() {
    let mut store = MemoryStore::new();
    store.put("photo.png", &common::encode_png(64, 64, [1, 2, 3, 255])).unwrap();

    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();

    let created = ChangeEvent::Created {
        key: "photo.png".to_string(),
    };
    process_event(&mut store, &catalog, &options, &created).unwrap();
    assert!(store.contains("xformed_photo.png"));

    // Replaying the artifact's own creation event does nothing.
    let artifact_created = ChangeEvent::Created {
        key: "xformed_photo.png".to_string(),
    };
    let outcome = process_event(&mut store, &catalog, &options, &artifact_created).unwrap();
    assert_eq!(outcome, Outcome::SkippedTransformed);
    assert_eq!(store.len(), 2);

    let removed = ChangeEvent::Removed {
        key: "photo.png".to_string(),
    };
    process_event(&mut store, &catalog, &options, &removed).unwrap();
    assert!(!store.contains("xformed_photo.png"));
    assert!(store.contains("photo.png"));
}

#[test]
fn process_event_is_deterministic_across_stores() {
    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let source = common::encode_png(90, 60, [200, 100, 50, 255]);
    let event = ChangeEvent::Created {
        key: "a.png".to_string(),
    };

    let mut first_store = MemoryStore::new();
    first_store.put("a.png", &source).unwrap();
    process_event(&mut first_store, &catalog, &options, &event).unwrap();

    let mut second_store = MemoryStore::new();
    second_store.put("a.png", &source).unwrap();
    process_event(&mut second_store, &catalog, &options, &event).unwrap();

    assert_eq!(
        first_store.get("xformed_a.png").unwrap(),
        second_store.get("xformed_a.png").unwrap()
    );
}

#[test]
fn fs_store_event_round_trip() {
    let dir = common::create_temp_directory();
    let mut store = FsStore::new(dir.path()).unwrap();
    store
        .put("photo.png", &common::encode_png(64, 64, [5, 5, 5, 255]))
        .unwrap();

    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    let event = ChangeEvent::Created {
        key: "photo.png".to_string(),
    };
    process_event(&mut store, &catalog, &options, &event).unwrap();

    let artifact_path = dir.path().join("xformed_photo.png");
    assert!(artifact_path.exists());
    let artifact = std::fs::read(&artifact_path).unwrap();
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Png);
}

#[test]
fn batch_stamps_a_directory_tree() {
    let dir = common::create_temp_directory();
    common::create_test_image_files(dir.path());
    common::create_nested_directory_structure(dir.path());
    let output = dir.path().join("stamped");

    let catalog = EmbeddedCatalog::new();
    let options = StampOptions::default();
    batch_stamp_images(
        dir.path().to_string_lossy().to_string(),
        output.clone(),
        options,
        true,
        &catalog,
    )
    .unwrap();

    assert!(output.join("xformed_test.png").exists());
    assert!(output.join("xformed_test.jpg").exists());
    assert!(output.join("xformed_nested.png").exists());
    assert!(!output.join("xformed_test.txt").exists());

    // Artifact names keep the source extension; bytes are always PNG.
    let artifact = std::fs::read(output.join("xformed_test.jpg")).unwrap();
    assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Png);
}
