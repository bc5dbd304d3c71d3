use tracing::{debug, info, warn};

use crate::events::CirculationEvent;

/// Trait for circulation event observation
pub trait CirculationObserver {
    /// Called after the engine applies or refuses an operation
    fn on_event(&self, event: &CirculationEvent);
}

/// Logs every event through `tracing`: successes at info, refusals at warn
#[derive(Debug)]
pub struct CirculationLogger;

impl CirculationObserver for CirculationLogger {
    fn on_event(&self, event: &CirculationEvent) {
        match event {
            CirculationEvent::BookAdded { id, title } => info!(%id, %title, "book added"),
            CirculationEvent::DuplicateIgnored { id } => {
                debug!(%id, "id already cataloged, insert ignored");
            }
            CirculationEvent::BookRemoved { id } => info!(%id, "book removed"),
            CirculationEvent::BorrowRequested { user_id, title } => {
                info!(user = %user_id, %title, "borrow request queued");
            }
            CirculationEvent::Issued { user_id, title } => {
                info!(user = %user_id, %title, "book issued");
            }
            CirculationEvent::ReturnRecorded { title } => info!(%title, "return recorded"),
            CirculationEvent::ReturnProcessed { title } => info!(%title, "return processed"),
            CirculationEvent::HistoryEntryRemoved { user_id, title } => {
                info!(user = %user_id, %title, "history entry removed");
            }
            CirculationEvent::Rejected { operation, error } => {
                warn!(?operation, %error, "operation rejected");
            }
        }
    }
}
