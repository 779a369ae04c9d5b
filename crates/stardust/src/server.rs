use crate::args::LaunchArgs;

/// Server entry point. Reports the accepted arguments and returns.
pub fn run(launch: &LaunchArgs) -> anyhow::Result<()> {
    log::info!("server detected");
    for (key, value) in &launch.args {
        log::info!("key: {key} ; value: {value}");
    }
    Ok(())
}
