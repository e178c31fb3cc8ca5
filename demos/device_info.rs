//! Print a Flexit device's name and serial number.
//!
//! Usage: `device_info <flexit-unit-ip-address>`

use std::env;
use std::net::SocketAddr;

use flexit_bacnet::{FlexitBacnet, BACNET_IP_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("usage: {} <flexit-unit-ip-address>", args[0]);
        return Ok(());
    }

    let peer: SocketAddr = format!("{}:{}", args[1], BACNET_IP_PORT).parse()?;
    let mut device = FlexitBacnet::new(peer, 2);

    if !device.is_valid().await {
        return Err("not a valid device".into());
    }

    device.update().await?;
    println!("Device Name: {}", device.device_name()?);
    println!("Serial Number: {}", device.serial_number()?);

    Ok(())
}
