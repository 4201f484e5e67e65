pub mod batch;
pub mod catalog;
pub mod cli;
pub mod composite;
pub mod constants;
pub mod decode;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod info;
pub mod sizing;
pub mod stamp;
pub mod store;

pub use batch::{batch_stamp_images, collect_image_files, generate_output_path, is_image_file};
pub use catalog::{load_stamp, stamp_asset_name, AssetCatalog, EmbeddedCatalog, MemoryCatalog};
pub use composite::{composite, draw_over};
pub use decode::{decode_image, probe_dimensions};
pub use dispatch::{is_transformed, process_event, transformed_key, ChangeEvent, Outcome};
pub use encode::{encode_png, optimize_png};
pub use error::{Result, StampError};
pub use info::get_image_info;
pub use sizing::{is_catalog_size, select_stamp_size};
pub use stamp::{stamp_file, stamp_file_pipeline, stamp_image, validate_file_exists, StampOptions};
pub use store::{FsStore, MemoryStore, ObjectStore};
