use std::time::Duration;

use flux_ipc::{GestureKind, ResizeDirection};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Point, Rect};

/// Posted by a session's ticker into the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTick {
    pub kind: GestureKind,
    pub session: u64,
}

/// Periodic tick task for one gesture session. Aborted on drop.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Returns `None` outside a tokio runtime; the session then only advances
    /// on explicit ticks.
    pub fn spawn(
        tick: GestureTick,
        period: Duration,
        tx: mpsc::UnboundedSender<GestureTick>,
    ) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(tick).is_err() {
                    break;
                }
            }
        });
        Some(Self { handle })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct GestureSession {
    pub id: u64,
    pub kind: GestureKind,
    pub direction: Option<ResizeDirection>,
    pub start_point: Point,
    pub start_bounds: Rect,
    /// Set once a tick has moved the window away from `start_bounds`
    pub changed: bool,
    pub ticker: Option<Ticker>,
}

impl GestureSession {
    pub fn new(
        id: u64,
        kind: GestureKind,
        direction: Option<ResizeDirection>,
        start_point: Point,
        start_bounds: Rect,
    ) -> Self {
        Self {
            id,
            kind,
            direction,
            start_point,
            start_bounds,
            changed: false,
            ticker: None,
        }
    }
}

impl std::fmt::Debug for GestureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSession")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("direction", &self.direction)
            .field("start_point", &self.start_point)
            .field("start_bounds", &self.start_bounds)
            .field("changed", &self.changed)
            .field("ticking", &self.ticker.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_requires_runtime() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let tick = GestureTick {
            kind: GestureKind::Move,
            session: 1,
        };
        assert!(Ticker::spawn(tick, Duration::from_millis(10), tx).is_none());
    }

    #[tokio::test]
    async fn test_ticker_posts_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tick = GestureTick {
            kind: GestureKind::Resize,
            session: 7,
        };
        let _ticker = Ticker::spawn(tick, Duration::from_millis(1), tx).unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first, tick);
        assert_eq!(second, tick);
    }

    #[tokio::test]
    async fn test_ticker_stops_on_drop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tick = GestureTick {
            kind: GestureKind::Move,
            session: 3,
        };
        let ticker = Ticker::spawn(tick, Duration::from_millis(1), tx).unwrap();
        assert!(rx.recv().await.is_some());

        drop(ticker);
        // The aborted task drops its sender, so draining terminates
        let drained = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
