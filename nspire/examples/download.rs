//! Download a file from the calculator
//!
//! Usage: `download <remote path> <local file>`

use std::error::Error;

use nspire::Calculator;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(remote), Some(local)) = (args.next(), args.next()) else {
        eprintln!("usage: download <remote path> <local file>");
        std::process::exit(2);
    };

    let mut calc = Calculator::open_usb()?;

    let data = calc.download_file(&remote).await?;
    std::fs::write(&local, &data)?;
    println!("{} -> {} ({} bytes)", remote, local, data.len());

    calc.release().await?;

    Ok(())
}
