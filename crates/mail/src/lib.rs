//! Email notification delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport to send plain-text
//! platform emails: account verification, team invitations, and team
//! application approval/rejection notices. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set the mailer is disabled
//! and every send becomes a logged no-op, so the platform runs without an
//! SMTP server in development and tests.
//!
//! Delivery is best-effort by contract: callers log failures and move on,
//! and no workflow depends on a message arriving.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@talentforge.local";

/// Default base URL for links embedded in emails.
const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Configuration for the SMTP delivery service.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Base URL used to build verification and invitation links.
    pub app_url: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and sends should be skipped.
    ///
    /// | Variable        | Required | Default                      |
    /// |-----------------|----------|------------------------------|
    /// | `SMTP_HOST`     | yes      | —                            |
    /// | `SMTP_PORT`     | no       | `587`                        |
    /// | `SMTP_FROM`     | no       | `noreply@talentforge.local`  |
    /// | `SMTP_USER`     | no       | —                            |
    /// | `SMTP_PASSWORD` | no       | —                            |
    /// | `APP_URL`       | no       | `http://localhost:3000`      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends platform emails via SMTP, or skips delivery when unconfigured.
pub struct Mailer {
    config: Option<MailConfig>,
}

impl Mailer {
    /// Create a mailer from the environment; disabled if SMTP is not
    /// configured.
    pub fn from_env() -> Self {
        let config = MailConfig::from_env();
        if config.is_none() {
            tracing::info!("SMTP_HOST not set; email delivery disabled");
        }
        Self { config }
    }

    /// Create an explicitly disabled mailer (used by tests).
    pub fn disabled() -> Self {
        Self { config: None }
    }

    pub fn new(config: MailConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Send the account verification email with the sign-up token link.
    pub async fn send_verification(
        &self,
        to_email: &str,
        first_name: &str,
        token: &str,
    ) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            return self.skip(to_email, "verification");
        };
        let link = format!("{}/verify-email?token={token}", config.app_url);
        let body = format!(
            "Hi {first_name},\n\n\
             Welcome to TalentForge. Please confirm your email address:\n\n{link}\n"
        );
        self.deliver(config, to_email, "Verify your email address", body)
            .await
    }

    /// Send a team invitation carrying the member's response token and its
    /// validity window in hours.
    pub async fn send_team_invitation(
        &self,
        to_email: &str,
        token: &str,
        expires_in_hours: i64,
    ) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            return self.skip(to_email, "team invitation");
        };
        let link = format!("{}/team-invitations?token={token}", config.app_url);
        let body = format!(
            "You have been invited to join a challenge team.\n\n\
             Respond here: {link}\n\n\
             The invitation expires in {expires_in_hours} hours.\n"
        );
        self.deliver(config, to_email, "Team invitation", body).await
    }

    /// Notify the team leader that the application was approved.
    pub async fn send_approval(
        &self,
        to_email: &str,
        challenge_title: &str,
    ) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            return self.skip(to_email, "approval");
        };
        let body = format!(
            "Your team application for \"{challenge_title}\" has been approved.\n\
             Every team member accepted the invitation.\n"
        );
        self.deliver(config, to_email, "Team application approved", body)
            .await
    }

    /// Notify the team leader that the application was cancelled, with the
    /// reason (the rejecting member's email).
    pub async fn send_rejection(
        &self,
        to_email: &str,
        challenge_title: &str,
        reason: &str,
    ) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            return self.skip(to_email, "rejection");
        };
        let body = format!(
            "Your team application for \"{challenge_title}\" has been cancelled.\n\
             Reason: {reason}\n"
        );
        self.deliver(config, to_email, "Team application cancelled", body)
            .await
    }

    fn skip(&self, to_email: &str, kind: &str) -> Result<(), MailError> {
        tracing::debug!(to = to_email, kind, "Email delivery disabled; skipping");
        Ok(())
    }

    async fn deliver(
        &self,
        config: &MailConfig,
        to_email: &str,
        subject: &str,
        body: String,
    ) -> Result<(), MailError> {
        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
