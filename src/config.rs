use std::{env, fmt, sync::Arc};

/// Environment variable holding the API base path.
pub const API_URL_VAR: &str = "PIPELINES_API_URL";
/// Environment variable holding the access token.
pub const TOKEN_VAR: &str = "PIPELINES_TOKEN";

pub const DEFAULT_BASE_PATH: &str = "http://localhost";

/// Supplies the bearer token for a request.
///
/// Consulted once per request, so a token that changes between calls is
/// picked up without rebuilding the client.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Never sends a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn access_token(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        non_empty(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        EnvToken { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        EnvToken::new(TOKEN_VAR)
    }
}

impl TokenSource for EnvToken {
    fn access_token(&self) -> Option<String> {
        env::var(&self.var).ok().and_then(non_empty)
    }
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self().and_then(non_empty)
    }
}

fn non_empty(token: String) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Where the API lives and how requests are authorized.
#[derive(Clone)]
pub struct Configuration {
    base_path: String,
    token_source: Arc<dyn TokenSource>,
}

impl Configuration {
    pub fn new(base_path: &str) -> Self {
        Configuration {
            base_path: base_path.trim_end_matches('/').to_owned(),
            token_source: Arc::new(NoToken),
        }
    }

    /// Base path from `PIPELINES_API_URL` and the token from
    /// `PIPELINES_TOKEN`, read per request.
    pub fn from_env() -> Self {
        let base_path = env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_PATH.to_owned());
        Configuration::new(&base_path).with_token_source(EnvToken::default())
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_token_source(StaticToken::new(token))
    }

    pub fn with_token_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.token_source = Arc::new(source);
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn access_token(&self) -> Option<String> {
        self.token_source.access_token()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(DEFAULT_BASE_PATH)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_path", &self.base_path)
            .finish()
    }
}
