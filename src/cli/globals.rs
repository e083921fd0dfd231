use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub session_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub const fn new(session_secret: SecretString) -> Self {
        Self { session_secret }
    }
}
