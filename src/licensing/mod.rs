//! License activation decision engine.
//!
//! Every operation takes an explicit connection; callers own the pool and
//! decide which thread the work runs on. Rejections are returned as
//! [`AppError`](crate::error::AppError) variants so each call yields exactly
//! one success value or one error kind.

mod admin;
mod hardware;
mod info;
mod validate;

pub use admin::*;
pub use hardware::*;
pub use info::*;
pub use validate::*;
