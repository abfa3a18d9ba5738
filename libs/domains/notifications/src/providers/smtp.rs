//! Email delivery over SMTP via lettre.
//!
//! Defaults target a local dev relay (Mailpit/MailHog on port 1025, no auth,
//! no TLS). Production relays opt in through `SMTP_TLS` and credentials.

use super::{EmailProvider, SendResult};
use crate::error::{EmailError, EmailResult};
use crate::models::Email;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

/// Connection settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Address placed on the From header.
    pub from_email: String,
    /// Display name shown next to the from address.
    pub from_name: String,
    /// Login, absent for unauthenticated dev relays.
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl Default for SmtpConfig {
    /// Local Mailpit/MailHog relay without auth.
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1025,
            from_email: "noreply@localhost".to_string(),
            from_name: "Taskboard".to_string(),
            username: None,
            password: None,
            use_tls: false,
        }
    }
}

impl SmtpConfig {
    /// Read settings from `SMTP_*` and `EMAIL_FROM_ADDRESS`, keeping the dev
    /// relay defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SMTP_HOST").unwrap_or(defaults.host),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.port),
            from_email: std::env::var("EMAIL_FROM_ADDRESS").unwrap_or(defaults.from_email),
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or(defaults.from_name),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls: std::env::var("SMTP_TLS").is_ok_and(|v| v == "true" || v == "1"),
        }
    }
}

/// Sends mail through a pooled lettre transport.
#[derive(Debug)]
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    host: String,
    port: u16,
}

impl SmtpProvider {
    /// Validates the sender address and prepares the transport.
    ///
    /// A malformed `from_email` surfaces here, at startup, rather than on
    /// every send attempt.
    pub fn new(config: SmtpConfig) -> EmailResult<Self> {
        let sender: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| {
                EmailError::InvalidAddress(format!("sender '{}': {}", config.from_email, e))
            })?;
        let transport = Self::build_transport(&config)?;

        Ok(Self {
            transport,
            sender,
            host: config.host,
            port: config.port,
        })
    }

    pub fn from_env() -> EmailResult<Self> {
        Self::new(SmtpConfig::from_env())
    }

    /// Provider pinned to the local Mailpit/MailHog relay, ignoring env.
    pub fn mailhog() -> EmailResult<Self> {
        Self::new(SmtpConfig::default())
    }

    fn build_transport(config: &SmtpConfig) -> EmailResult<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| EmailError::Provider(format!("SMTP relay setup failed: {}", e)))?
        } else {
            // Plain connection, what Mailpit and MailHog speak
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }

    fn build_message(&self, email: &Email) -> EmailResult<Message> {
        let recipient: Mailbox = email.to.parse().map_err(|e| {
            EmailError::InvalidAddress(format!("recipient '{}': {}", email.to, e))
        })?;

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::Provider(format!("Could not assemble message: {}", e)))
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &Email) -> EmailResult<SendResult> {
        debug!(
            to = %email.to,
            subject = %email.subject,
            relay = %self.host,
            port = self.port,
            "Handing message to SMTP relay"
        );

        let message = self.build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = %email.to, error = %e, "SMTP relay rejected message");
            EmailError::Provider(format!("SMTP delivery failed: {}", e))
        })?;

        let message_id = response.message().next().map(str::to_string);
        info!(to = %email.to, message_id = ?message_id, "SMTP relay accepted message");

        Ok(SendResult { message_id })
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }

    async fn health_check(&self) -> EmailResult<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| EmailError::Provider(format!("SMTP connection probe failed: {}", e)))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_local_relay() {
        let config = SmtpConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1025);
        assert!(!config.use_tls);
        assert!(config.username.is_none());
    }

    #[test]
    fn test_from_env_without_vars_keeps_defaults() {
        temp_env::with_vars_unset(
            [
                "SMTP_HOST",
                "SMTP_PORT",
                "EMAIL_FROM_ADDRESS",
                "SMTP_FROM_NAME",
                "SMTP_USERNAME",
                "SMTP_PASSWORD",
                "SMTP_TLS",
            ],
            || {
                let config = SmtpConfig::from_env();
                assert_eq!(config.host, "localhost");
                assert_eq!(config.port, 1025);
                assert_eq!(config.from_email, "noreply@localhost");
                assert!(!config.use_tls);
            },
        );
    }

    #[test]
    fn test_from_env_reads_overrides() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("mail.example.com")),
                ("SMTP_PORT", Some("587")),
                ("EMAIL_FROM_ADDRESS", Some("alerts@example.com")),
                ("SMTP_USERNAME", Some("mailer")),
                ("SMTP_PASSWORD", Some("secret")),
                ("SMTP_TLS", Some("1")),
            ],
            || {
                let config = SmtpConfig::from_env();
                assert_eq!(config.host, "mail.example.com");
                assert_eq!(config.port, 587);
                assert_eq!(config.from_email, "alerts@example.com");
                assert_eq!(config.username, Some("mailer".to_string()));
                assert!(config.use_tls);
            },
        );
    }

    #[test]
    fn test_new_rejects_malformed_sender() {
        let config = SmtpConfig {
            from_email: "not an address".to_string(),
            ..SmtpConfig::default()
        };

        let err = SmtpProvider::new(config).unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }

    #[test]
    fn test_build_message_rejects_malformed_recipient() {
        let provider = SmtpProvider::new(SmtpConfig::default()).unwrap();
        let email = Email {
            to: "not an address".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
        };

        let err = provider.build_message(&email).unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }

    #[test]
    fn test_build_message_accepts_plain_address() {
        let provider = SmtpProvider::new(SmtpConfig::default()).unwrap();
        let email = Email {
            to: "ops@example.com".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
        };

        assert!(provider.build_message(&email).is_ok());
    }
}
