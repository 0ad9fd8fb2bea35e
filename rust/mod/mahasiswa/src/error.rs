use thiserror::Error;

use crate::client::ApiError;

/// Identity service failure, classified the way the hosted SDK reports it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("auth/invalid-email")]
    InvalidEmail,

    #[error("auth/user-not-found")]
    UserNotFound,

    #[error("auth/wrong-password")]
    WrongPassword,

    #[error("auth/email-already-in-use")]
    EmailAlreadyInUse,

    #[error("auth/weak-password")]
    WeakPassword,

    #[error("auth/network-request-failed: {0}")]
    Network(String),

    #[error("{code}: {message}")]
    Other { code: String, message: String },
}

impl AuthError {
    /// SDK-style error code, e.g. `auth/user-not-found`.
    pub fn code(&self) -> &str {
        match self {
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::Network(_) => "auth/network-request-failed",
            AuthError::Other { code, .. } => code,
        }
    }

    /// Text shown to the user in the error notification.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidEmail => "Email tidak valid".into(),
            AuthError::UserNotFound => "User tidak ditemukan".into(),
            AuthError::WrongPassword => "Password salah".into(),
            AuthError::EmailAlreadyInUse => "Email sudah terdaftar".into(),
            AuthError::WeakPassword => "Password terlalu lemah".into(),
            AuthError::Network(_) => "Koneksi internet bermasalah".into(),
            AuthError::Other { message, .. } => message.clone(),
        }
    }

    /// Classify an Identity Toolkit REST error message such as
    /// `EMAIL_NOT_FOUND` or `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn from_service_message(message: &str) -> Self {
        let reason = message.split(" : ").next().unwrap_or(message).trim();
        match reason {
            "INVALID_EMAIL" => AuthError::InvalidEmail,
            "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
            "INVALID_PASSWORD" => AuthError::WrongPassword,
            "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            _ => AuthError::Other {
                code: format!("auth/{}", reason.to_lowercase().replace('_', "-")),
                message: message.to_string(),
            },
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Network(err) => AuthError::Network(err.to_string()),
            ApiError::Server { .. } => AuthError::from_service_message(&e.service_message()),
            ApiError::Auth(message) | ApiError::Decode(message) => AuthError::Other {
                code: "auth/internal-error".into(),
                message,
            },
        }
    }
}

/// Form checks done before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Harap isi email dan password")]
    MissingCredentials,

    #[error("Password minimal 6 karakter")]
    PasswordTooShort,
}

/// Failure of a sign-in or sign-up action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ActionError {
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Validation(e) => e.to_string(),
            ActionError::Auth(e) => e.user_message(),
        }
    }
}

/// Roster retrieval or seeding failure.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to load roster: {0}")]
    Fetch(#[source] ApiError),

    #[error("seeding stopped after {inserted} of {total} records: {source}")]
    Seed {
        inserted: usize,
        total: usize,
        #[source]
        source: ApiError,
    },
}

impl RosterError {
    pub fn user_message(&self) -> String {
        match self {
            RosterError::Fetch(e) => format!("Gagal memuat data mahasiswa: {}", e.service_message()),
            RosterError::Seed {
                inserted,
                total,
                source,
            } => format!(
                "Gagal menambahkan data ({} dari {} berhasil): {}",
                inserted,
                total,
                source.service_message()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_service_messages() {
        assert_eq!(AuthError::from_service_message("EMAIL_NOT_FOUND"), AuthError::UserNotFound);
        assert_eq!(AuthError::from_service_message("INVALID_PASSWORD"), AuthError::WrongPassword);
        assert_eq!(AuthError::from_service_message("EMAIL_EXISTS"), AuthError::EmailAlreadyInUse);
        assert_eq!(AuthError::from_service_message("INVALID_EMAIL"), AuthError::InvalidEmail);
        assert_eq!(
            AuthError::from_service_message(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthError::WeakPassword
        );
    }

    #[test]
    fn unknown_message_keeps_raw_text() {
        let err = AuthError::from_service_message("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled");
        assert_eq!(err.code(), "auth/too-many-attempts-try-later");
        assert_eq!(err.user_message(), "TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled");
    }

    #[test]
    fn user_messages() {
        assert_eq!(AuthError::UserNotFound.user_message(), "User tidak ditemukan");
        assert_eq!(
            AuthError::Network("connection refused".into()).user_message(),
            "Koneksi internet bermasalah"
        );
        assert_eq!(
            ActionError::from(ValidationError::PasswordTooShort).user_message(),
            "Password minimal 6 karakter"
        );
    }

    #[test]
    fn server_error_body_is_classified() {
        let api = ApiError::Server {
            status: 400,
            message: r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#.into(),
        };
        assert_eq!(AuthError::from(api), AuthError::EmailAlreadyInUse);
    }

    #[test]
    fn seed_error_reports_progress() {
        let err = RosterError::Seed {
            inserted: 2,
            total: 5,
            source: ApiError::Server {
                status: 503,
                message: "unavailable".into(),
            },
        };
        assert_eq!(err.user_message(), "Gagal menambahkan data (2 dari 5 berhasil): unavailable");
    }
}
