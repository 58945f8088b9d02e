/// Source of the acting identity and of the accepted login credentials.
pub trait CredentialProvider: Send + Sync + 'static {
    fn verify(&self, username: &str, password: &str) -> bool;
    /// Identity stamped on every newly created task.
    fn owner_id(&self) -> &str;
}

/// Single hard-wired account used by the demo deployment.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    username: String,
    password: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self { username: "admin".into(), password: "pass".into() }
    }
}

impl CredentialProvider for DemoCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }

    fn owner_id(&self) -> &str { &self.username }
}
