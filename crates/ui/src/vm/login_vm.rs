use services::{ApiError, AuthError};

/// User-facing text for a failed sign-in.
#[must_use]
pub fn login_error_message(err: &AuthError) -> String {
    match err {
        AuthError::MissingCredentials => "Enter your username and password.".to_string(),
        AuthError::InvalidCredentials | AuthError::Api(ApiError::Auth) => {
            "Incorrect username or password.".to_string()
        }
        AuthError::Api(ApiError::Network(_)) => {
            "Cannot reach the server. Check your connection and try again.".to_string()
        }
        other => format!("Sign-in failed: {other}"),
    }
}
