use bdsms::{SmsNetBd, SmsNetBdConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SmsNetBd::new(SmsNetBdConfig::from_env()?)?;
    let envelope = client.get_balance().await?;
    println!("balance: {:?}", envelope.data.balance);

    Ok(())
}
