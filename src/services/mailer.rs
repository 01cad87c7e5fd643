//! SMTP mailer handle.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use crate::config::{ConfigMap, SmtpConfig};
use crate::error::BootstrapError;

/// Outbound mail transport, built from the `smtp` config section.
/// Construction validates the `from` address but does not touch the network.
#[derive(Debug)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &ConfigMap) -> Result<Self, BootstrapError> {
        let smtp: SmtpConfig = config.section("smtp")?;
        let from: Mailbox = smtp.from.parse().map_err(|e| {
            BootstrapError::resource("mailer", format!("invalid from address '{}': {e}", smtp.from))
        })?;

        // TLS is terminated by the relay in this deployment; credentials are
        // still honoured when configured.
        let mut builder = SmtpTransport::builder_dangerous(smtp.host.as_str()).port(smtp.port);
        if let (Some(user), Some(pass)) = (smtp.username, smtp.password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        debug!(host = %smtp.host, port = smtp.port, "mailer ready");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    pub fn from_address(&self) -> &Mailbox {
        &self.from
    }

    /// Send a plain-text message to the given recipients.
    /// No-op if `to` is empty; addresses that do not parse are skipped.
    pub fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), String> {
        if to.is_empty() {
            return Ok(());
        }
        let recipients: Vec<Mailbox> = to.iter().filter_map(|s| s.parse().ok()).collect();
        if recipients.is_empty() {
            return Err("no valid recipient addresses".to_string());
        }

        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for mb in recipients {
            builder = builder.to(mb);
        }
        let message = builder
            .body(body.to_string())
            .map_err(|e| format!("failed to build message: {e}"))?;
        self.transport
            .send(&message)
            .map(|_| ())
            .map_err(|e| format!("smtp send failed: {e}"))
    }
}
