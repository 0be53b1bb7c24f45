pub mod apply;
pub mod channel;
pub mod files;
pub mod flags;
pub mod install;
pub mod logs;
pub mod platform;

use std::error::Error;

pub type BoxError = Box<dyn Error + Send + Sync>;

pub type BoxResult<T> = Result<T, BoxError>;
