pub mod download_link;
pub mod quiz_flow;
pub mod round_ctx;

pub use download_link::{find_download_link, DownloadLink};
pub use quiz_flow::QuizFlow;
pub use round_ctx::RoundCtx;
