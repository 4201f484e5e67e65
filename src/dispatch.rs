use crate::catalog::AssetCatalog;
use crate::constants::TRANSFORM_PREFIX;
use crate::error::Result;
use crate::stamp::{self, StampOptions};
use crate::store::ObjectStore;
use tracing::{info, warn};

/// A storage change notification, already parsed by whatever transport
/// delivered it. The dispatcher only cares about the kind and the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// An object was created or overwritten.
    Created { key: String },
    /// An object was removed.
    Removed { key: String },
    /// Anything else; logged and ignored.
    Other { name: String },
}

/// What `process_event` did for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Source was watermarked and stored under the transformed key.
    Stamped { output_key: String },
    /// Source already carries the transform prefix; nothing to do.
    SkippedTransformed,
    /// The transformed artifact for a removed source was deleted.
    Deleted { output_key: String },
    /// Unrecognized event kind.
    Ignored,
}

/// Key under which the watermarked artifact of `key` is stored.
pub fn transformed_key(key: &str) -> String {
    format!("{TRANSFORM_PREFIX}{key}")
}

/// Whether a key names an artifact this pipeline already produced.
/// Matches anywhere in the key, so renamed or re-nested copies of a
/// transformed object still count as transformed.
pub fn is_transformed(key: &str) -> bool {
    key.contains(TRANSFORM_PREFIX)
}

/// Apply one change event to a store.
///
/// Created objects are watermarked and written back under the prefixed
/// key; keys that already carry the prefix are skipped so artifacts are
/// never stamped twice. Removed objects get their transformed artifact
/// deleted. Unknown events are logged and ignored.
pub fn process_event(
    store: &mut dyn ObjectStore,
    catalog: &dyn AssetCatalog,
    options: &StampOptions,
    event: &ChangeEvent,
) -> Result<Outcome> {
    match event {
        ChangeEvent::Created { key } if is_transformed(key) => {
            info!(key, "object already transformed, skipping");
            Ok(Outcome::SkippedTransformed)
        }
        ChangeEvent::Created { key } => {
            let source = store.get(key)?;
            let stamped = stamp::stamp_image(&source, catalog, options)?;
            let output_key = transformed_key(key);
            store.put(&output_key, &stamped)?;
            info!(
                key,
                output_key,
                bytes = stamped.len(),
                "stored transformed object"
            );
            Ok(Outcome::Stamped { output_key })
        }
        ChangeEvent::Removed { key } => {
            let output_key = transformed_key(key);
            store.delete(&output_key)?;
            info!(key, output_key, "deleted transformed object");
            Ok(Outcome::Deleted { output_key })
        }
        ChangeEvent::Other { name } => {
            warn!(name, "unsupported event");
            Ok(Outcome::Ignored)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EmbeddedCatalog;
    use crate::error::StampError;
    use crate::store::MemoryStore;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn created(key: &str) -> ChangeEvent {
        ChangeEvent::Created {
            key: key.to_string(),
        }
    }

    #[test]
    fn test_created_object_is_stamped_under_prefixed_key() {
        let mut store = MemoryStore::new();
        store.put("photo.png", &png_bytes(64, 64)).unwrap();

        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let outcome =
            process_event(&mut store, &catalog, &options, &created("photo.png")).unwrap();

        assert_eq!(
            outcome,
            Outcome::Stamped {
                output_key: "xformed_photo.png".to_string()
            }
        );
        let artifact = store.get("xformed_photo.png").unwrap();
        assert_eq!(image::guess_format(&artifact).unwrap(), ImageFormat::Png);
        // The source object stays untouched.
        assert_eq!(store.get("photo.png").unwrap(), png_bytes(64, 64));
    }

    #[test]
    fn test_already_transformed_object_is_skipped() {
        let mut store = MemoryStore::new();
        store.put("xformed_photo.png", &png_bytes(64, 64)).unwrap();

        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let outcome = process_event(
            &mut store,
            &catalog,
            &options,
            &created("xformed_photo.png"),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::SkippedTransformed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prefix_anywhere_in_key_counts_as_transformed() {
        let mut store = MemoryStore::new();
        store
            .put("backup/xformed_photo.png", &png_bytes(64, 64))
            .unwrap();

        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let outcome = process_event(
            &mut store,
            &catalog,
            &options,
            &created("backup/xformed_photo.png"),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::SkippedTransformed);
    }

    #[test]
    fn test_removed_object_deletes_artifact() {
        let mut store = MemoryStore::new();
        store.put("photo.png", &png_bytes(64, 64)).unwrap();
        store.put("xformed_photo.png", b"artifact").unwrap();

        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let event = ChangeEvent::Removed {
            key: "photo.png".to_string(),
        };
        let outcome = process_event(&mut store, &catalog, &options, &event).unwrap();

        assert_eq!(
            outcome,
            Outcome::Deleted {
                output_key: "xformed_photo.png".to_string()
            }
        );
        assert!(!store.contains("xformed_photo.png"));
        assert!(store.contains("photo.png"));
    }

    #[test]
    fn test_removed_object_without_artifact_still_succeeds() {
        let mut store = MemoryStore::new();
        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let event = ChangeEvent::Removed {
            key: "never-stamped.png".to_string(),
        };
        assert!(process_event(&mut store, &catalog, &options, &event).is_ok());
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let mut store = MemoryStore::new();
        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let event = ChangeEvent::Other {
            name: "ObjectRestored:Completed".to_string(),
        };
        let outcome = process_event(&mut store, &catalog, &options, &event).unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert!(store.is_empty());
    }

    #[test]
    fn test_created_event_for_missing_object_fails() {
        let mut store = MemoryStore::new();
        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let result = process_event(&mut store, &catalog, &options, &created("ghost.png"));
        assert!(matches!(result, Err(StampError::ObjectNotFound(_))));
    }

    #[test]
    fn test_created_event_with_undecodable_object_fails() {
        let mut store = MemoryStore::new();
        store.put("not-an-image.txt", b"plain text").unwrap();

        let catalog = EmbeddedCatalog::new();
        let options = StampOptions::default();
        let result = process_event(&mut store, &catalog, &options, &created("not-an-image.txt"));
        assert!(result.is_err());
        assert!(!store.contains("xformed_not-an-image.txt"));
    }

    #[test]
    fn test_transformed_key_prefixes() {
        assert_eq!(transformed_key("a.png"), "xformed_a.png");
        assert_eq!(transformed_key("dir/a.png"), "xformed_dir/a.png");
    }

    #[test]
    fn test_is_transformed_substring_semantics() {
        assert!(is_transformed("xformed_a.png"));
        assert!(is_transformed("copy_of_xformed_a.png"));
        assert!(is_transformed("backup/xformed_a.png"));
        assert!(!is_transformed("a.png"));
        assert!(!is_transformed("xforme_a.png"));
    }
}
