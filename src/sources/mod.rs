//! Status sources
//!
//! A status source produces one [`ConnectionStatusSnapshot`] per call. The
//! only real implementation is [`SurfboardClient`], which logs in to the
//! modem and scrapes its connection status page.
//!
//! [`ConnectionStatusSnapshot`]: crate::models::ConnectionStatusSnapshot

pub mod surfboard;
pub mod traits;

pub use surfboard::{SessionToken, SurfboardClient};
pub use traits::StatusSource;
