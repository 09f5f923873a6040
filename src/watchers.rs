use std::sync::Arc;

use slog::info;
use slog::Logger;
use zookeeper::KeeperState;
use zookeeper::WatchedEvent;
use zookeeper::WatchedEventType;
use zookeeper::Watcher;

use crate::sink::EventSink;
use crate::sink::ReadyGate;

/// Session-scoped watcher installed when the ZooKeeper session is created.
///
/// The service routes two kinds of events here: session-state transitions
/// and node events for any path registered through an existence check with
/// the "use the session watcher" flag. A `SyncConnected` state transition
/// releases the ready gate so session setup can complete; a created node
/// drains one slot of the event sink. Everything else is logged and ignored.
pub struct GlobalWatcher {
    gate: Arc<ReadyGate>,
    logger: Logger,
    sink: Arc<EventSink>,
}

impl GlobalWatcher {
    pub fn new(gate: Arc<ReadyGate>, sink: Arc<EventSink>, logger: Logger) -> GlobalWatcher {
        GlobalWatcher { gate, logger, sink }
    }
}

impl Watcher for GlobalWatcher {
    fn handle(&self, event: WatchedEvent) {
        info!(self.logger, "Event in session watcher"; "event" => ?event);
        match (event.event_type, event.keeper_state) {
            (WatchedEventType::None, KeeperState::SyncConnected) => self.gate.release(),
            (WatchedEventType::NodeCreated, _) => self.sink.signal(),
            _ => (),
        }
    }
}

/// One-shot watcher passed to a single existence check.
///
/// The service consumes the registration on the first matching event, so a
/// fresh instance is needed for every registration.
pub struct ExistsWatcher {
    logger: Logger,
    sink: Arc<EventSink>,
}

impl ExistsWatcher {
    pub fn new(sink: Arc<EventSink>, logger: Logger) -> ExistsWatcher {
        ExistsWatcher { logger, sink }
    }
}

impl Watcher for ExistsWatcher {
    fn handle(&self, event: WatchedEvent) {
        info!(self.logger, "Event in exists watcher"; "event" => ?event);
        if let WatchedEventType::NodeCreated = event.event_type {
            self.sink.signal();
        }
    }
}
