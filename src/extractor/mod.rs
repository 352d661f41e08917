pub mod models;
pub mod tikwm;
pub mod traits;
pub mod url;

pub use models::{DownloadOption, MediaFormat, VideoInfo};
pub use tikwm::TikwmExtractor;
pub use traits::Extractor;
pub use url::{extract_video_id, recognize, RecognizedUrl, UrlKind};
