//! Poll a PB04 module on a Linux I2C bus and log its state.
//!
//! Environment:
//! - `PB04_I2C_DEV`: bus device, default `/dev/i2c-1`
//! - `PB04_POLL_SECS`: seconds between samples, default 5
//! - `PB04_BIG_ENDIAN`: set for revisions that send the high byte first

use std::env;
use std::time::Duration;

use anyhow::Context;
use env_logger::{Builder, Env, Target};
use linux_embedded_hal::I2cdev;
use log::{error, info, warn};
use pb04::{ByteOrder, Config, Pb04};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let dev = env::var("PB04_I2C_DEV").unwrap_or_else(|_| "/dev/i2c-1".to_string());
    let poll_secs: u64 = match env::var("PB04_POLL_SECS") {
        Ok(s) => s.parse().context("Invalid PB04_POLL_SECS")?,
        Err(_) => 5,
    };
    let byte_order = if env::var_os("PB04_BIG_ENDIAN").is_some() {
        ByteOrder::BigEndian
    } else {
        ByteOrder::LittleEndian
    };

    let i2c = I2cdev::new(&dev).with_context(|| format!("Failed to open {dev}"))?;
    let config = Config {
        byte_order,
        ..Config::default()
    };
    let mut gauge = Pb04::with_config(i2c, config);
    info!("Polling PB04 at {:#04x} on {dev} every {poll_secs}s", config.address);

    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
            _ = ticker.tick() => {
                match gauge.fetch_state() {
                    Ok(state) => {
                        info!(
                            "Voltage: {:.3}V  Current: {:.0}mA  Capacity: {}%",
                            state.voltage_mv / 1000.0,
                            state.current_ma,
                            state.capacity_pct
                        );
                        match state.capacity_pct {
                            0 => warn!("Capacity could not be estimated"),
                            1 => warn!("Battery critically low"),
                            _ => {}
                        }
                    }
                    Err(e) => error!("{e}"),
                }
            }
        }
    }

    Ok(())
}
