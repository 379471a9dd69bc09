use {
    crate::args::ClapArgumentLoader,
    anyhow::{Context, Result},
    std::path::Path,
};

const BIN_NAME: &str = "streamlit-setup";

pub fn build_shell_completion(outdir: &Path, shell: &clap_complete::Shell) -> Result<()> {
    let mut app = ClapArgumentLoader::root_command();
    clap_complete::generate_to(*shell, &mut app, BIN_NAME, outdir)
        .with_context(|| format!("Failed to write completions to: {}", outdir.display()))?;
    Ok(())
}

pub fn build_markdown(outdir: &Path) -> Result<()> {
    let app = ClapArgumentLoader::root_command();
    let path = outdir.join(format!("{}.md", BIN_NAME));
    std::fs::write(&path, clap_markdown::help_markdown_command(&app))
        .with_context(|| format!("Failed to write manual to: {}", path.display()))?;
    Ok(())
}

pub fn build_manpages(outdir: &Path) -> Result<()> {
    let app = ClapArgumentLoader::root_command();

    fn render(outdir: &Path, name: &str, cmd: &clap::Command) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
        let path = outdir.join(format!("{}.1", name));
        std::fs::write(&path, buffer).with_context(|| format!("Failed to write manpage to: {}", path.display()))?;
        Ok(())
    }

    render(outdir, BIN_NAME, &app)?;
    for sub in app.get_subcommands() {
        render(outdir, &format!("{}-{}", BIN_NAME, sub.get_name()), sub)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::tempdir};

    #[test]
    fn manpages_cover_every_subcommand() {
        let dir = tempdir().unwrap();
        build_manpages(dir.path()).unwrap();
        for name in ["streamlit-setup", "streamlit-setup-emit", "streamlit-setup-show"] {
            assert!(dir.path().join(format!("{}.1", name)).is_file(), "missing {}", name);
        }
    }

    #[test]
    fn markdown_mentions_presets() {
        let dir = tempdir().unwrap();
        build_markdown(dir.path()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("streamlit-setup.md")).unwrap();
        assert!(text.contains("--preset"));
    }

    #[test]
    fn bash_completion_is_written() {
        let dir = tempdir().unwrap();
        build_shell_completion(dir.path(), &clap_complete::Shell::Bash).unwrap();
        assert!(dir.path().join("streamlit-setup.bash").is_file());
    }
}
