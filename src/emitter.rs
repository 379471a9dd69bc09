use {
    crate::{config::ServerConfig, env::Environment},
    anyhow::{Context, Result},
    std::{
        fmt::Write as _,
        path::{Path, PathBuf},
    },
};

pub const SETTINGS_DIR: &str = ".streamlit";
pub const SETTINGS_FILE: &str = "config.toml";

/// `$HOME/.streamlit`
pub fn default_target_dir(env: &impl Environment) -> Result<PathBuf> {
    let home = env
        .var("HOME")
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow::anyhow!("HOME is not set, pass --dir explicitly"))?;
    Ok(Path::new(&home).join(SETTINGS_DIR))
}

/// Renders the settings file. The port is interpolated as-is.
pub fn render(config: &ServerConfig) -> String {
    let mut out = String::from("[server]\n");
    // writing into a String cannot fail
    let _ = writeln!(out, "headless = {}", config.headless);
    let _ = writeln!(out, "enableCORS = {}", config.enable_cors);
    let _ = writeln!(out, "enableXsrfProtection = {}", config.enable_xsrf_protection);
    if let Some(size) = config.max_upload_size {
        let _ = writeln!(out, "maxUploadSize = {}", size);
    }
    let _ = writeln!(out, "port = {}", config.port);
    out
}

/// Returns the parse error if the server would not be able to read `rendered`.
pub fn lint(rendered: &str) -> Option<String> {
    toml::from_str::<toml::Table>(rendered)
        .err()
        .map(|e| e.message().to_string())
}

/// Creates `target_dir` if needed and overwrites the settings file inside it.
/// Returns the path of the written file.
pub fn emit(target_dir: &Path, config: &ServerConfig) -> Result<PathBuf> {
    let rendered = render(config);
    if let Some(problem) = lint(&rendered) {
        tracing::warn!(port = %config.port, "settings will not parse: {}", problem);
    }

    std::fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;
    let path = target_dir.join(SETTINGS_FILE);
    std::fs::write(&path, &rendered)
        .with_context(|| format!("Failed to write config file to: {}", path.display()))?;
    tracing::debug!(bytes = rendered.len(), path = %path.display(), "settings written");
    Ok(path)
}
