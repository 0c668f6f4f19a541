pub mod config;
pub mod error;
pub mod types;

pub use config::KakeiboConfig;
pub use error::{KakeiboError, Result};
pub use types::*;
