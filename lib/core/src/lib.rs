pub mod error;
pub mod module;
pub mod types;

pub use error::ServiceError;
pub use module::Module;
pub use types::{merge_patch, new_id, now_rfc3339, today_ymd, ListParams};
