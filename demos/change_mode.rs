//! Toggle a Flexit device's ventilation mode between Home and Away.
//!
//! Usage: `change_mode <flexit-unit-ip-address>`

use std::env;
use std::net::SocketAddr;

use flexit_bacnet::property;
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

    println!("Comfort button active: {}", device.comfort_button_active()?);
    println!("Operation mode: {}", device.operation_mode()?);
    println!("Ventilation mode (before): {}", device.ventilation_mode()?);

    match device.ventilation_mode()? {
        "Home" => device.set_ventilation_mode(property::VENTILATION_MODE_AWAY).await?,
        "Away" => device.set_ventilation_mode(property::VENTILATION_MODE_HOME).await?,
        _ => {
            println!("This example toggles only between Home and Away modes.");
            return Ok(());
        }
    }

    println!("Ventilation mode (after): {}", device.ventilation_mode()?);

    Ok(())
}
