//! 基础设施层：持有稀缺资源（标签页、临时文件），只暴露能力

pub mod js_executor;
pub mod temp_file;

pub use js_executor::JsExecutor;
pub use temp_file::TempFile;
