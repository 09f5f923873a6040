//! Operator-driven watcher scenarios.
//!
//! Each test opens its own session against a live ZooKeeper ensemble and
//! blocks until an operator creates the watched znodes through `zkCli.sh`
//! (the exact commands are logged once the watchers are registered). Run
//! the scenarios one at a time:
//!
//! ```text
//! cargo test --test scenarios watchers_observe_two_paths -- --ignored --nocapture
//! ```

use std::path::Path;

use slog::info;
use slog::Logger;

use zk_watcher_fixture::logging;
use zk_watcher_fixture::Config;
use zk_watcher_fixture::Result;
use zk_watcher_fixture::WatcherFixture;

const CONFIG_FILE: &str = "fixture.yaml";

fn setup() -> Result<(WatcherFixture, Logger)> {
    let config = if Path::new(CONFIG_FILE).exists() {
        Config::from_file(CONFIG_FILE)?
    } else {
        Config::default()
    };
    let logger = logging::configure(config.level.clone());
    let fixture = WatcherFixture::connect(&config, logger.clone())?;
    Ok((fixture, logger))
}

/// Session setup returns only once the ready gate has been released, and
/// removing a znode nobody created is tolerated cleanup.
#[test]
#[ignore = "needs a live ZooKeeper ensemble"]
fn session_ready_before_first_operation() -> Result<()> {
    let (fixture, logger) = setup()?;
    info!(logger, "Session ready; removing a znode that was never created");
    fixture.remove("/absent")?;
    fixture.close()
}

/// A session watcher and a one-shot exists watcher observe one event each.
#[test]
#[ignore = "needs a live ZooKeeper ensemble and an operator driving zkCli.sh"]
fn watchers_observe_two_paths() -> Result<()> {
    let (fixture, logger) = setup()?;
    fixture.arm(2);

    fixture.exists_global("/one")?;
    fixture.exists_watched("/two")?;
    info!(logger, "Waiting for events; in zkCli.sh run: create /one, then create /two");

    fixture.await_events();
    fixture.remove("/one")?;
    fixture.remove("/two")?;
    fixture.close()
}

/// The session watcher is registered twice on the same path, but at most
/// one event is delivered for a single create.
#[test]
#[ignore = "needs a live ZooKeeper ensemble and an operator driving zkCli.sh"]
fn global_watcher_triggers_at_most_once() -> Result<()> {
    let (fixture, logger) = setup()?;
    fixture.arm(1);

    fixture.exists_global("/three")?;
    fixture.exists_global("/three")?;
    info!(logger, "Waiting for one event; in zkCli.sh run: create /three");

    fixture.await_events();
    fixture.remove("/three")?;
    fixture.close()
}

/// Two distinct exists watchers are registered on the same path, but at
/// most one of them is triggered for a single create.
#[test]
#[ignore = "needs a live ZooKeeper ensemble and an operator driving zkCli.sh"]
fn exists_watcher_triggers_at_most_once() -> Result<()> {
    let (fixture, logger) = setup()?;
    fixture.arm(1);

    fixture.exists_watched("/four")?;
    fixture.exists_watched("/four")?;
    info!(logger, "Waiting for one event; in zkCli.sh run: create /four");

    fixture.await_events();
    fixture.remove("/four")?;
    fixture.close()
}
