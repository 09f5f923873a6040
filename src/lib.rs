pub mod logging;

mod config;
mod error;
mod fixture;
mod sink;
mod watchers;

pub use self::config::Config;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::error::Result;
pub use self::fixture::WatcherFixture;
