pub mod toml_loader;

pub use toml_loader::{
    load_manifest, manifest_to_requests, parse_manifest, scan_image_folder, BatchManifest,
    ManifestImage,
};
