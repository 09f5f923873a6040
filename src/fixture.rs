use std::sync::Arc;
use std::time::Duration;

use failure::ResultExt;
use slog::debug;
use slog::error;
use slog::info;
use slog::o;
use slog::warn;
use slog::Logger;
use zookeeper::Stat;
use zookeeper::ZkError;
use zookeeper::ZkState;
use zookeeper::ZooKeeper;

use crate::config::Config;
use crate::sink::EventSink;
use crate::sink::ReadyGate;
use crate::watchers::ExistsWatcher;
use crate::watchers::GlobalWatcher;
use crate::ErrorKind;
use crate::Result;

/// Drives a single watcher scenario against a live ZooKeeper ensemble.
///
/// The fixture owns the session, the event sink the scenario blocks on and
/// the logger the watcher callbacks report through. Scenarios never share a
/// fixture: each one opens its own session so watchers registered by one
/// scenario cannot leak into the next.
///
/// The fixture never creates the znodes it watches. Creation is done
/// out-of-band by an operator in `zkCli.sh`; the fixture registers watchers,
/// waits for the resulting events and removes whatever the operator created.
pub struct WatcherFixture {
    keeper: ZooKeeper,
    logger: Logger,
    sink: Arc<EventSink>,
}

impl WatcherFixture {
    /// Open a session and block until the service reports it ready.
    pub fn connect(config: &Config, logger: Logger) -> Result<WatcherFixture> {
        let sink = Arc::new(EventSink::new());
        let gate = Arc::new(ReadyGate::new());
        let watcher = GlobalWatcher::new(
            Arc::clone(&gate),
            Arc::clone(&sink),
            logger.new(o!("watcher" => "session")),
        );
        info!(logger, "Initiating ZooKeeper session"; "ensemble" => &config.ensemble);
        let timeout = Duration::from_secs(config.timeout);
        let keeper = ZooKeeper::connect(&config.ensemble, timeout, watcher)
            .with_context(|_| ErrorKind::BackendConnect)?;

        // The session watcher releases the gate on the SyncConnected event;
        // the state listener releases it on the Connected transition.
        // The gate is idempotent so the slower of the two is a no-op.
        let listener_gate = Arc::clone(&gate);
        let listener_logger = logger.clone();
        keeper.add_listener(move |state| match state {
            ZkState::Connected | ZkState::ConnectedReadOnly => {
                info!(listener_logger, "ZooKeeper session established"; "state" => ?state);
                listener_gate.release();
            }
            ZkState::AuthFailed => error!(listener_logger, "ZooKeeper authentication failed"),
            ZkState::Closed => warn!(listener_logger, "ZooKeeper session closed"),
            state => debug!(listener_logger, "ZooKeeper session state changed"; "state" => ?state),
        });

        gate.wait();
        Ok(WatcherFixture {
            keeper,
            logger,
            sink,
        })
    }
}

impl WatcherFixture {
    /// Arm the event sink with the number of watcher events the scenario expects.
    pub fn arm(&self, count: u32) {
        self.sink.arm(count);
    }

    /// Block until every expected watcher event has been observed.
    pub fn await_events(&self) {
        self.sink.wait();
    }

    /// Existence check registering the session watcher on `path`.
    ///
    /// Re-registering the same path this way does not accumulate triggers:
    /// the service delivers at most one event to the session watcher per
    /// `(path, session watcher)` registration.
    pub fn exists_global(&self, path: &str) -> Result<Option<Stat>> {
        let stat = self
            .keeper
            .exists(path, true)
            .with_context(|_| ErrorKind::Backend("existence check"))?;
        info!(
            self.logger, "Existence check complete";
            "path" => path, "watcher" => "session", "stat" => ?stat
        );
        Ok(stat)
    }

    /// Existence check registering a fresh one-shot watcher on `path`.
    pub fn exists_watched(&self, path: &str) -> Result<Option<Stat>> {
        let watcher = ExistsWatcher::new(
            Arc::clone(&self.sink),
            self.logger.new(o!("watcher" => "exists")),
        );
        let stat = self
            .keeper
            .exists_w(path, watcher)
            .with_context(|_| ErrorKind::Backend("existence check"))?;
        info!(
            self.logger, "Existence check complete";
            "path" => path, "watcher" => "exists", "stat" => ?stat
        );
        Ok(stat)
    }

    /// Remove the znode at `path`, accepting any version.
    ///
    /// Removal is cleanup, not an assertion: a scenario aborted before the
    /// operator created the path must still tear down, so a missing znode is
    /// logged and tolerated.
    pub fn remove(&self, path: &str) -> Result<()> {
        match self.keeper.delete(path, None) {
            Ok(()) => debug!(self.logger, "Removed znode"; "path" => path),
            Err(ZkError::NoNode) => {
                debug!(self.logger, "Skipped removal of missing znode"; "path" => path);
            }
            Err(error) => Err(error).with_context(|_| ErrorKind::Backend("znode removal"))?,
        }
        Ok(())
    }

    /// Close the session, releasing armed watcher registrations without
    /// triggering them.
    pub fn close(self) -> Result<()> {
        info!(self.logger, "Closing ZooKeeper session");
        self.keeper
            .close()
            .with_context(|_| ErrorKind::Backend("session close"))?;
        Ok(())
    }
}
