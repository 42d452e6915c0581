use fcapi::{
    ops::{DescribeInstance, GetFirecrackerVersion, GetMachineConfiguration},
    Agent, AgentConfig, Result,
};

/// Prints the instance description, version and machine configuration of a
/// running Firecracker.
///
/// Usage: `fcapi [config.json]`. Without an argument the configuration comes
/// from the `FCAPI_*` environment variables.
fn main() {
    let _ = env_logger::builder().is_test(false).try_init();

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("fcapi: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AgentConfig::from_file(path)?,
        None => AgentConfig::from_env()?,
    };
    let mut agent = Agent::connect(&config)?;

    let instance = agent.execute(&DescribeInstance::new())?.into_result()?;
    println!("instance: {:?}", instance.into_payload());

    let version = agent.execute(&GetFirecrackerVersion::new())?.into_result()?;
    if let Some(version) = version.into_payload() {
        println!("version: {}", version.firecracker_version);
    }

    let machine = agent.execute(&GetMachineConfiguration::new())?.into_result()?;
    println!("machine: {:?}", machine.into_payload());
    Ok(())
}
