//! Version command implementation

use cxfw_core::regmap::RegisterPort;
use cxfw_core::version::read_version;

/// Read and print the running firmware's identification
pub fn run_version(port: &mut dyn RegisterPort) -> Result<(), Box<dyn std::error::Error>> {
    let version = read_version(port)?;

    println!("{}", version.firmware());
    println!("{}", version.rom_patch());

    Ok(())
}
