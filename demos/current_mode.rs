//! Print a Flexit device's current ventilation mode.
//!
//! Usage: `current_mode <flexit-unit-ip-address>`

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

    device.update().await?;

    if !device.is_valid().await {
        return Err("not a valid device".into());
    }

    println!("ventilation mode: {}", device.ventilation_mode()?);

    Ok(())
}
