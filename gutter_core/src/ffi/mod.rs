//! `UniFFI` surface; the scaffolding generated from `gutter_core.udl` is
//! included at the crate root.

mod error;
mod session;

pub use error::CoreError;
pub use session::{open_session, open_session_with_config, BaselineStatus, GutterSession};
