pub mod args;
pub mod config;
pub mod emitter;
pub mod env;
pub mod reference;

use {
    crate::{
        args::{Command, ManualFormat, Settings, ShowFormat},
        config::ServerConfig,
        env::{Environment, ProcessEnvironment},
    },
    anyhow::{Context, Result},
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt},
};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streamlit_setup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = crate::args::ClapArgumentLoader::load()?;
    let env = ProcessEnvironment;

    match cmd.command {
        | Command::Manual { path, format } => {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            match format {
                | ManualFormat::Manpages => {
                    reference::build_manpages(&path)?;
                },
                | ManualFormat::Markdown => {
                    reference::build_markdown(&path)?;
                },
            }
            Ok(())
        },
        | Command::Autocomplete { path, shell } => {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            reference::build_shell_completion(&path, &shell)?;
            Ok(())
        },
        | Command::Emit => {
            let target_dir = match &cmd.settings.dir {
                | Some(dir) => dir.clone(),
                | None => emitter::default_target_dir(&env)?,
            };
            let config = resolve(&cmd.settings, &env)?;
            let path = emitter::emit(&target_dir, &config)?;
            tracing::info!(preset = %cmd.settings.preset, port = %config.port, "wrote {}", path.display());
            Ok(())
        },
        | Command::Show { format } => {
            let config = resolve(&cmd.settings, &env)?;
            match format {
                | ShowFormat::Toml => print!("{}", emitter::render(&config)),
                | ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
            }
            Ok(())
        },
    }
}

fn resolve(settings: &Settings, env: &impl Environment) -> Result<ServerConfig> {
    let port = settings.port.resolve(env, settings.require_port)?;
    Ok(settings.preset.build(port, settings.max_upload_size))
}
