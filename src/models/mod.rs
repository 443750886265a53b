pub mod caption;
pub mod loaders;
pub mod preset;

pub use caption::{BatchItem, CaptionOutcome, CaptionRequest, ImageSource, PostProcessConfig};
pub use loaders::{load_manifest, manifest_to_requests, scan_image_folder, BatchManifest};
pub use preset::PromptStyle;
