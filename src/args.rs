use {
    crate::config::{DEFAULT_PORT_VAR, PortSource, Preset},
    anyhow::Result,
    clap::{Arg, ArgAction, ArgMatches},
    std::{path::PathBuf, str::FromStr},
};

#[derive(Debug)]
pub(crate) enum ManualFormat {
    Manpages,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShowFormat {
    Toml,
    Json,
}

/// How the settings file is assembled. Shared by `emit` and `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub preset: Preset,
    pub dir: Option<PathBuf>,
    pub port: PortSource,
    pub max_upload_size: Option<u64>,
    pub require_port: bool,
}

#[derive(Debug)]
pub(crate) struct CallArgs {
    pub settings: Settings,
    pub command: Command,
}

impl CallArgs {
    pub(crate) fn validate(&self) -> Result<()> {
        if let PortSource::FromEnv(var) = &self.settings.port {
            if var.is_empty() || var.contains('=') || var.contains('\0') {
                return Err(anyhow::anyhow!("argument \"port-env\": invalid variable name {:?}", var));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) enum Command {
    Manual {
        path: PathBuf,
        format: ManualFormat,
    },
    Autocomplete {
        path: PathBuf,
        shell: clap_complete::Shell,
    },
    Emit,
    Show {
        format: ShowFormat,
    },
}

pub(crate) struct ClapArgumentLoader {}

impl ClapArgumentLoader {
    pub(crate) fn root_command() -> clap::Command {
        clap::Command::new("streamlit-setup")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Writes the server settings file for a Streamlit app. Runs `emit` when no subcommand is given.")
            .author("cchexcode <alexanderh.weber@outlook.com>")
            .propagate_version(true)
            .args([
                Arg::new("preset")
                    .long("preset")
                    .global(true)
                    .value_parser(Preset::NAMES)
                    .default_value("uploads")
                    .help("Fixed settings to write."),
                Arg::new("dir")
                    .short('d')
                    .long("dir")
                    .global(true)
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("Settings directory. Defaults to $HOME/.streamlit."),
                Arg::new("port-env")
                    .long("port-env")
                    .global(true)
                    .default_value(DEFAULT_PORT_VAR)
                    .help("Environment variable holding the port."),
                Arg::new("port")
                    .long("port")
                    .global(true)
                    .conflicts_with("port-env")
                    .help("Literal port value, bypassing the environment."),
                Arg::new("max-upload-size")
                    .long("max-upload-size")
                    .global(true)
                    .value_parser(clap::value_parser!(u64).range(1..))
                    .help("Upload ceiling in megabytes, overriding the preset."),
                Arg::new("require-port")
                    .long("require-port")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Fail instead of writing an empty port when the variable is unset."),
            ])
            .subcommand(clap::Command::new("emit").about("Writes the settings file."))
            .subcommand(
                clap::Command::new("show")
                    .about("Prints the settings without writing anything.")
                    .arg(
                        clap::Arg::new("format")
                            .short('f')
                            .long("format")
                            .value_parser(["toml", "json"])
                            .default_value("toml"),
                    ),
            )
            .subcommand(
                clap::Command::new("man")
                    .about("Renders the manual.")
                    .arg(
                        clap::Arg::new("out")
                            .short('o')
                            .long("out")
                            .value_parser(clap::value_parser!(PathBuf))
                            .required(true),
                    )
                    .arg(
                        clap::Arg::new("format")
                            .short('f')
                            .long("format")
                            .value_parser(["manpages", "markdown"])
                            .required(true),
                    ),
            )
            .subcommand(
                clap::Command::new("autocomplete")
                    .about("Renders shell completion scripts.")
                    .arg(
                        clap::Arg::new("out")
                            .short('o')
                            .long("out")
                            .value_parser(clap::value_parser!(PathBuf))
                            .required(true),
                    )
                    .arg(
                        clap::Arg::new("shell")
                            .short('s')
                            .long("shell")
                            .value_parser(["bash", "zsh", "fish", "elvish", "powershell"])
                            .required(true),
                    ),
            )
    }

    pub(crate) fn load() -> Result<CallArgs> {
        Self::load_from(std::env::args_os())
    }

    pub(crate) fn load_from<I, T>(argv: I) -> Result<CallArgs>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let command = Self::root_command().try_get_matches_from(argv)?;

        // global args are only propagated downwards, so read them from the
        // innermost matches
        let (cmd, leaf) = match command.subcommand() {
            | Some(("man", subc)) => (
                Command::Manual {
                    path: required::<PathBuf>(subc, "out")?.clone(),
                    format: match required::<String>(subc, "format")?.as_str() {
                        | "manpages" => ManualFormat::Manpages,
                        | "markdown" => ManualFormat::Markdown,
                        | _ => return Err(anyhow::anyhow!("argument \"format\": unknown format")),
                    },
                },
                subc,
            ),
            | Some(("autocomplete", subc)) => (
                Command::Autocomplete {
                    path: required::<PathBuf>(subc, "out")?.clone(),
                    shell: clap_complete::Shell::from_str(required::<String>(subc, "shell")?)
                        .map_err(|e| anyhow::anyhow!("argument \"shell\": {}", e))?,
                },
                subc,
            ),
            | Some(("show", subc)) => (
                Command::Show {
                    format: match subc.get_one::<String>("format").map(String::as_str) {
                        | Some("json") => ShowFormat::Json,
                        | _ => ShowFormat::Toml,
                    },
                },
                subc,
            ),
            | Some(("emit", subc)) => (Command::Emit, subc),
            | None => (Command::Emit, &command),
            | Some(_) => return Err(anyhow::anyhow!("unknown command")),
        };

        let callargs = CallArgs {
            settings: settings(leaf)?,
            command: cmd,
        };

        callargs.validate()?;
        Ok(callargs)
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(m: &'a ArgMatches, id: &str) -> Result<&'a T> {
    m.get_one::<T>(id)
        .ok_or_else(|| anyhow::anyhow!("argument \"{}\" is required", id))
}

fn settings(m: &ArgMatches) -> Result<Settings> {
    let preset = match m.get_one::<String>("preset") {
        | Some(name) => name.parse()?,
        | None => Preset::default(),
    };
    let port = match m.get_one::<String>("port") {
        | Some(value) => PortSource::Static(value.clone()),
        | None => PortSource::FromEnv(
            m.get_one::<String>("port-env")
                .cloned()
                .unwrap_or_else(|| DEFAULT_PORT_VAR.to_string()),
        ),
    };
    Ok(Settings {
        preset,
        dir: m.get_one::<PathBuf>("dir").cloned(),
        port,
        max_upload_size: m.get_one::<u64>("max-upload-size").copied(),
        require_port: m.get_flag("require-port"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(argv: &[&str]) -> Result<CallArgs> {
        ClapArgumentLoader::load_from(std::iter::once("streamlit-setup").chain(argv.iter().copied()))
    }

    #[test]
    fn no_arguments_emits_with_defaults() {
        let args = load(&[]).unwrap();
        assert!(matches!(args.command, Command::Emit));
        assert_eq!(
            args.settings,
            Settings {
                preset: Preset::Uploads,
                dir: None,
                port: PortSource::FromEnv("PORT".into()),
                max_upload_size: None,
                require_port: false,
            }
        );
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let args = load(&["emit", "--preset", "basic", "--dir", "/tmp/x", "--require-port"]).unwrap();
        assert!(matches!(args.command, Command::Emit));
        assert_eq!(args.settings.preset, Preset::Basic);
        assert_eq!(args.settings.dir, Some(PathBuf::from("/tmp/x")));
        assert!(args.settings.require_port);
    }

    #[test]
    fn flags_before_subcommand_are_kept() {
        let args = load(&["--preset", "basic", "show", "--format", "json"]).unwrap();
        assert_eq!(args.settings.preset, Preset::Basic);
        assert!(matches!(args.command, Command::Show { format: ShowFormat::Json }));
    }

    #[test]
    fn static_port_and_upload_override() {
        let args = load(&["show", "--port", "8501", "--max-upload-size", "200"]).unwrap();
        assert_eq!(args.settings.port, PortSource::Static("8501".into()));
        assert_eq!(args.settings.max_upload_size, Some(200));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(load(&["--preset", "strict"]).is_err());
        assert!(load(&["--max-upload-size", "0"]).is_err());
        assert!(load(&["--port", "1", "--port-env", "APP_PORT"]).is_err());
        assert!(load(&["--port-env", ""]).is_err());
        assert!(load(&["--port-env", "A=B"]).is_err());
    }

    #[test]
    fn reference_commands() {
        let args = load(&["man", "--out", "docs", "--format", "markdown"]).unwrap();
        assert!(matches!(args.command, Command::Manual { format: ManualFormat::Markdown, .. }));

        let args = load(&["autocomplete", "-o", "out", "-s", "zsh"]).unwrap();
        assert!(matches!(args.command, Command::Autocomplete { shell: clap_complete::Shell::Zsh, .. }));
    }
}
