use std::io;

use bdsms::{AdapterKind, SendSmsPayload, SmsGateway, SmsNetBdConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SmsNetBdConfig::from_env()?;
    let to = std::env::var("SMS_NET_BD_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS_NET_BD_TO environment variable is required (comma-separated numbers)",
        )
    })?;
    let message = std::env::var("SMS_NET_BD_MESSAGE")
        .unwrap_or_else(|_| "Hello from the bdsms example.".to_owned());

    let mut payload = SendSmsPayload::new(to, message);
    if let Ok(schedule) = std::env::var("SMS_NET_BD_SCHEDULE") {
        payload = payload.schedule(schedule);
    }

    let gateway = SmsGateway::new(AdapterKind::SmsNetBd, config)?;
    let envelope = gateway.client().send_sms(payload).await?;
    println!(
        "msg: {}, request_id: {:?}",
        envelope.msg, envelope.data.request_id
    );

    Ok(())
}
