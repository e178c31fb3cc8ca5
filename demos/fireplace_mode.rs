//! Trigger temporary fireplace ventilation on a Flexit device.
//!
//! Usage: `fireplace_mode <flexit-unit-ip-address> <duration-in-minutes>`

use std::env;
use std::net::SocketAddr;

use flexit_bacnet::{FlexitBacnet, BACNET_IP_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("usage: {} <flexit-unit-ip-address> <duration-in-minutes>", args[0]);
        return Ok(());
    }

    let duration: u32 = match args[2].parse() {
        Ok(v) => v,
        Err(_) => {
            println!("duration-in-minutes must be a number");
            return Ok(());
        }
    };

    let peer: SocketAddr = format!("{}:{}", args[1], BACNET_IP_PORT).parse()?;
    let mut device = FlexitBacnet::new(peer, 2);

    device.update().await?;
    device.start_fireplace_ventilation(duration).await?;
    device.update().await?;

    let remaining = device.fireplace_ventilation_remaining_duration()?;
    if remaining > 0 {
        println!("fireplace mode on for: {remaining} minutes");
    } else {
        println!("fireplace mode off");
    }

    Ok(())
}
