//! List a directory on the first calculator found on USB

use nspire::Calculator;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> nspire::Result<()> {
    // RUST_LOG=nspire=trace dumps every frame
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "/documents".to_string());

    let mut calc = Calculator::open_usb()?;

    let entries = calc.list_directory(&path).await?;
    println!("{} ({} entries)", path, entries.len());
    for entry in &entries {
        println!("  {}", entry);
    }

    calc.release().await?;

    Ok(())
}
