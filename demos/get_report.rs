use std::io;
use std::time::Duration;

use bdsms::{RequestId, SmsNetBd, SmsNetBdConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let request_id = std::env::var("SMS_NET_BD_REQUEST_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_NET_BD_REQUEST_ID environment variable is required",
        )
    })?;

    let client = SmsNetBd::builder(SmsNetBdConfig::from_env()?)
        .timeout(Duration::from_secs(15))
        .build()?;
    let envelope = client.get_report(RequestId::new(request_id)?).await?;

    println!(
        "status: {:?}, charge: {:?}",
        envelope.data.request_status, envelope.data.request_charge
    );
    for recipient in &envelope.data.recipients {
        println!(
            "  {} {:?} {:?}",
            recipient.number, recipient.status, recipient.charge
        );
    }

    Ok(())
}
