use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Unique, case-sensitive login name
    pub username: String,
    /// Password after the character shift has been applied
    pub obfuscated_password: String,
    /// Shift amount used to obfuscate the password
    pub key: i32,
}

impl UserRecord {
    pub fn new(
        username: impl Into<String>,
        obfuscated_password: impl Into<String>,
        key: i32,
    ) -> Self {
        Self {
            username: username.into(),
            obfuscated_password: obfuscated_password.into(),
            key,
        }
    }
}
