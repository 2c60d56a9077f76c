use crate::error::{ApiError, ApiResult};

/// Minuscules + trim. Rejette un email absent ou sans '@'.
pub fn normalize_email(raw: Option<&str>) -> ApiResult<String> {
    let email = raw.map(|e| e.trim().to_lowercase()).unwrap_or_default();

    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidEmail);
    }

    Ok(email)
}
