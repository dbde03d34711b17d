//! Password hashing and OTP code generation

pub use grievance_core::otp::generate_code as generate_otp_code;

/// Default bcrypt cost factor
pub const BCRYPT_COST: u32 = 12;

/// Hash an admin password with bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Verify an admin password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Password strength rule for admin password changes: at least one uppercase,
/// one lowercase, one digit, and one special character.
pub fn password_is_strong(password: &str) -> bool {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    has_upper && has_lower && has_digit && has_special
}
