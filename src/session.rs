//! Tracks metadata for a loading/rendering session.

use crate::log;

/// Metadata for a loading/rendering session.
///
/// When a caller first uses one of the API entry points (e.g. [`crate::LoadOptions`]
/// and [`crate::load`]), there is no context yet where this crate's code may start to
/// track things. This struct provides that context.
pub struct Session {
    log_enabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }
}
