//! SMTP transport — STARTTLS relay with credential login (async lettre).

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use trailmail_core::config::SmtpSettings;
use trailmail_core::error::{Result, TrailmailError};

/// Async SMTP mailer bound to the configured sending account.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build the transport from the environment-injected settings.
    pub fn new(settings: &SmtpSettings, display_name: &str) -> Result<Self> {
        let from: Mailbox = format!("{display_name} <{}>", settings.address)
            .parse()
            .map_err(|e| TrailmailError::Smtp(format!("Invalid sender address: {e}")))?;

        let creds = Credentials::new(settings.address.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| TrailmailError::Smtp(format!("SMTP relay: {e}")))?
            .port(settings.port)
            .credentials(creds)
            .build();

        Ok(Self { transport, from })
    }

    /// The sender mailbox used on every outgoing message.
    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    /// Send one message over the relay.
    pub async fn send(&self, message: Message) -> Result<()> {
        self.transport
            .send(message)
            .await
            .map_err(|e| TrailmailError::Smtp(e.to_string()))?;
        Ok(())
    }
}
