//! Account model types.

use serde::{Deserialize, Serialize};

/// Security/encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// No encryption (not recommended).
    None,
    /// Implicit TLS (connect directly with TLS).
    #[default]
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

impl Security {
    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::Tls => "SSL/TLS",
            Self::StartTls => "STARTTLS",
        }
    }
}

/// Host, port and security of one mail server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
}

impl ServerConfig {
    /// Creates a server entry.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, security: Security) -> Self {
        Self {
            host: host.into(),
            port,
            security,
        }
    }

    /// Default IMAP settings: no host, port 993, implicit TLS.
    #[must_use]
    pub const fn imap_default() -> Self {
        Self {
            host: String::new(),
            port: 993,
            security: Security::Tls,
        }
    }

    /// Default SMTP settings: no host, port 587, STARTTLS.
    #[must_use]
    pub const fn smtp_default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            security: Security::StartTls,
        }
    }
}

/// Email account configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Email address, also used as the login name.
    pub email: String,
    /// Password or app password.
    pub password: String,
    /// Incoming (IMAP) server.
    pub imap: ServerConfig,
    /// Outgoing (SMTP) server.
    pub smtp: ServerConfig,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            imap: ServerConfig::imap_default(),
            smtp: ServerConfig::smtp_default(),
        }
    }
}

impl Account {
    /// Create a new account with default ports and no hosts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create account with server settings for well-known providers.
    ///
    /// Unknown domains keep the default ports and leave hosts empty.
    #[must_use]
    pub fn with_email(email: &str) -> Self {
        let mut account = Self {
            email: email.to_string(),
            ..Default::default()
        };

        if let Some(domain) = email.split('@').nth(1) {
            match domain.to_lowercase().as_str() {
                "gmail.com" | "googlemail.com" => {
                    account.imap.host = "imap.gmail.com".to_string();
                    account.smtp.host = "smtp.gmail.com".to_string();
                }
                "outlook.com" | "hotmail.com" | "live.com" => {
                    account.imap.host = "outlook.office365.com".to_string();
                    account.smtp.host = "smtp.office365.com".to_string();
                }
                _ => {}
            }
        }

        account
    }

    /// Copy of the account with the password hidden, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let password = if self.password.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        Self {
            password,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;

    #[test]
    fn security_default_is_tls() {
        assert_eq!(Security::default(), Security::Tls);
        assert_eq!(Security::StartTls.display_name(), "STARTTLS");
    }

    #[test]
    fn default_ports() {
        let account = Account::new();
        assert_eq!(account.imap.port, 993);
        assert_eq!(account.imap.security, Security::Tls);
        assert_eq!(account.smtp.port, 587);
        assert_eq!(account.smtp.security, Security::StartTls);
        assert!(account.imap.host.is_empty());
    }

    #[test]
    fn with_email_gmail() {
        let account = Account::with_email("user@gmail.com");
        assert_eq!(account.email, "user@gmail.com");
        assert_eq!(account.imap.host, "imap.gmail.com");
        assert_eq!(account.smtp.host, "smtp.gmail.com");
        assert_eq!(account.imap.port, 993);
        assert_eq!(account.smtp.port, 587);
    }

    #[test]
    fn with_email_outlook_any_case() {
        let account = Account::with_email("user@Hotmail.com");
        assert_eq!(account.imap.host, "outlook.office365.com");
        assert_eq!(account.smtp.host, "smtp.office365.com");
    }

    #[test]
    fn with_email_unknown_domain() {
        let account = Account::with_email("user@example.org");
        assert!(account.imap.host.is_empty());
        assert!(account.smtp.host.is_empty());
    }

    #[test]
    fn redacted_hides_password() {
        let mut account = Account::with_email("user@gmail.com");
        assert!(account.redacted().password.is_empty());

        account.password = "hunter2".to_string();
        let shown = account.redacted();
        assert_eq!(shown.password, "********");
        assert_eq!(shown.email, account.email);
    }

    #[test]
    fn deserializes_partial_config() {
        let account: Account =
            serde_json::from_str(r#"{"email": "me@example.com", "imap": {"host": "mail.example.com", "port": 143, "security": "starttls"}}"#)
                .unwrap();
        assert_eq!(account.imap.host, "mail.example.com");
        assert_eq!(account.imap.security, Security::StartTls);
        assert_eq!(account.smtp, ServerConfig::smtp_default());
    }
}
