//! Toggle a Flexit device's cooker hood ventilation mode.
//!
//! Usage: `toggle_cooker_hood <flexit-unit-ip-address>`

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

    let was_active = device.cooker_hood_active()?;
    if was_active {
        println!("cooker hood on, deactivating...");
        device.deactivate_cooker_hood().await?;
    } else {
        println!("cooker hood off, activating");
        device.activate_cooker_hood().await?;
    }

    device.update().await?;
    println!(
        "cooker hood status: {}",
        if device.cooker_hood_active()? { "on" } else { "off" }
    );

    Ok(())
}
