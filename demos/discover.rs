//! Broadcast for Flexit devices on the local network and print the IP
//! address of each one that responds.
//!
//! Usage: `discover [timeout-in-seconds]`

use std::env;
use std::time::Duration;

use flexit_bacnet::discovery;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let timeout = env::args()
        .nth(1)
        .and_then(|s| s.parse::<f64>().ok())
        .map(Duration::from_secs_f64)
        .unwrap_or(discovery::DEFAULT_DISCOVERY_TIMEOUT);

    println!("discovering Flexit devices for {timeout:?}...");
    let found = discovery::discover(timeout).await?;

    if found.is_empty() {
        println!("no devices found");
    } else {
        for ip in found {
            println!("{ip}");
        }
    }

    Ok(())
}
