mod args;
mod client;
mod server;

use args::{LaunchArgs, Mode};
use stardust_engine::logging::{LoggingConfig, init_logging};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let launch = LaunchArgs::parse(std::env::args().skip(1));
    match launch.mode {
        Mode::Server => server::run(&launch),
        Mode::Client => client::run(&launch),
    }
}
