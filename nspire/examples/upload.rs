//! Upload a file to the calculator, with custom timeouts
//!
//! Usage: `upload <local file> <remote path>`

use std::error::Error;
use std::time::Duration;

use nspire::{Calculator, Timeouts};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(local), Some(remote)) = (args.next(), args.next()) else {
        eprintln!("usage: upload <local file> <remote path>");
        std::process::exit(2);
    };

    let data = std::fs::read(&local)?;

    // Large documents take a while to be committed on the device
    let timeouts = Timeouts::default().with_data_read(Duration::from_secs(30));
    let mut calc = Calculator::open_usb()?.with_timeouts(timeouts);

    calc.upload_file(&remote, &data).await?;
    println!("{} -> {} ({} bytes)", local, remote, data.len());

    calc.release().await?;

    Ok(())
}
