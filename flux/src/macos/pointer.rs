use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use crate::core::Point;
use crate::platform::PointerSource;

/// Reads the cursor position from the window server on every call
pub struct SystemPointer;

impl PointerSource for SystemPointer {
    fn cursor_position(&self) -> Point {
        let location = CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
            .and_then(CGEvent::new)
            .map(|event| event.location());
        match location {
            Ok(location) => Point::new(location.x as i32, location.y as i32),
            Err(()) => {
                tracing::warn!("Failed to query cursor position");
                Point::default()
            }
        }
    }
}
