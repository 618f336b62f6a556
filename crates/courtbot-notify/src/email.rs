//! SMTP report email.

use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use courtbot_core::config::EmailNotifyConfig;

use crate::error::{NotifyError, Result};

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: lettre::message::Mailbox,
    to: lettre::message::Mailbox,
}

impl EmailNotifier {
    /// Port 465 is implicit TLS; anything else negotiates STARTTLS.
    pub fn new(config: &EmailNotifyConfig) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| NotifyError::Email(e.to_string()))?
        .port(config.smtp_port)
        .credentials(creds)
        .build();

        let from = config
            .username
            .parse()
            .map_err(|e| NotifyError::Email(format!("bad sender address: {e}")))?;
        let to = config
            .recipient()
            .parse()
            .map_err(|e| NotifyError::Email(format!("bad recipient address: {e}")))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Send the plain-text run report.
    pub async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Email(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Email(e.to_string()))?;

        info!(to = %self.to, "report email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_defaults_to_sender_account() {
        let notifier = EmailNotifier::new(&EmailNotifyConfig {
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 465,
            username: "club@example.org".into(),
            password: "app-password".into(),
            to: None,
        })
        .unwrap();
        assert_eq!(notifier.to.email.to_string(), "club@example.org");
    }

    #[test]
    fn bad_addresses_are_config_errors() {
        let result = EmailNotifier::new(&EmailNotifyConfig {
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 465,
            username: "not an address".into(),
            password: "pw".into(),
            to: None,
        });
        assert!(result.is_err());
    }
}
