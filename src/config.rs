use {
    crate::env::Environment,
    serde::Serialize,
    std::{fmt, str::FromStr},
};

/// Upload ceiling of the `uploads` preset, in megabytes.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 1024;

/// Variable the port is read from unless told otherwise.
pub const DEFAULT_PORT_VAR: &str = "PORT";

/// The `[server]` section of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub headless: bool,
    #[serde(rename = "enableCORS")]
    pub enable_cors: bool,
    pub enable_xsrf_protection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_size: Option<u64>,
    /// Written verbatim. Never parsed or validated.
    pub port: String,
}

/// Named sets of fixed settings values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// XSRF protection off, no upload ceiling.
    Basic,
    /// XSRF protection on, 1 GiB upload ceiling.
    #[default]
    Uploads,
}

impl Preset {
    pub const NAMES: [&'static str; 2] = ["basic", "uploads"];

    pub fn build(self, port: String, max_upload_size: Option<u64>) -> ServerConfig {
        match self {
            | Preset::Basic => ServerConfig {
                headless: true,
                enable_cors: false,
                enable_xsrf_protection: false,
                max_upload_size,
                port,
            },
            | Preset::Uploads => ServerConfig {
                headless: true,
                enable_cors: false,
                enable_xsrf_protection: true,
                max_upload_size: max_upload_size.or(Some(DEFAULT_MAX_UPLOAD_SIZE)),
                port,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            | "basic" => Ok(Preset::Basic),
            | "uploads" => Ok(Preset::Uploads),
            | other => Err(anyhow::anyhow!("unknown preset: {}", other)),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Preset::Basic => f.write_str("basic"),
            | Preset::Uploads => f.write_str("uploads"),
        }
    }
}

/// Where the port value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSource {
    Static(String),
    FromEnv(String),
}

impl Default for PortSource {
    fn default() -> Self {
        PortSource::FromEnv(DEFAULT_PORT_VAR.to_string())
    }
}

impl PortSource {
    /// Resolves the port string.
    ///
    /// An unset variable yields an empty port unless `required` is set, in
    /// which case it is an error.
    pub fn resolve(&self, env: &impl Environment, required: bool) -> anyhow::Result<String> {
        match self {
            | PortSource::Static(value) => Ok(value.clone()),
            | PortSource::FromEnv(var) => match env.var(var) {
                | Some(value) => Ok(value),
                | None if required => anyhow::bail!("environment variable {} is not set", var),
                | None => {
                    tracing::warn!(var = %var, "port variable is not set, writing an empty port");
                    Ok(String::new())
                },
            },
        }
    }
}
