use std::fmt;
use std::str::FromStr;

pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Deployment the process runs in. Selects `appsettings.{name}.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment `{0}` (expected local, test or prod)")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    /// Reads `APP_ENVIRONMENT`; unset means [`Environment::Local`].
    pub fn from_env() -> Result<Self, UnknownEnvironment> {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Test => "Test",
            Self::Prod => "Prod",
        }
    }

    pub fn settings_file(&self) -> String {
        format!("appsettings.{}", self.as_str())
    }

    /// Production always logs JSON.
    pub fn prefers_json_logs(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        [Self::Local, Self::Test, Self::Prod]
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(name))
            .or_else(|| name.eq_ignore_ascii_case("production").then_some(Self::Prod))
            .ok_or_else(|| UnknownEnvironment(name.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
