use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap_complete::{generate, Shell};

use crate::app::AppError;

const BIN_NAME: &str = "liftlog";

pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Accepts a bare shell name or a path such as `$SHELL`.
fn shell_named(raw: &str) -> Option<Shell> {
    let name = raw.trim().rsplit('/').next()?.to_ascii_lowercase();
    match name.as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

fn login_shell() -> Option<Shell> {
    shell_named(&std::env::var("SHELL").ok()?)
}

/// Where an installed script lives and whether an rc file must source it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstallTarget {
    script: PathBuf,
    rc_file: Option<PathBuf>,
}

fn install_target(shell: Shell, home: &Path) -> Option<InstallTarget> {
    let target = match shell {
        Shell::Bash => InstallTarget {
            script: home.join(".local/share/bash-completion/completions").join(BIN_NAME),
            rc_file: None,
        },
        Shell::Zsh => InstallTarget {
            script: home.join(".config/liftlog/completions/liftlog.zsh"),
            rc_file: Some(home.join(".zshrc")),
        },
        Shell::Fish => InstallTarget {
            script: home.join(".config/fish/completions/liftlog.fish"),
            rc_file: None,
        },
        _ => return None,
    };
    Some(target)
}

fn install(shell: Shell, home: &Path) -> io::Result<PathBuf> {
    let target = install_target(shell, home).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no install location for {shell:?}"),
        )
    })?;
    if let Some(parent) = target.script.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut script = Vec::new();
    write_completions(shell, &mut script);
    std::fs::write(&target.script, script)?;

    if let Some(rc_file) = &target.rc_file {
        ensure_sourced(rc_file, &target.script)?;
    }
    Ok(target.script)
}

fn ensure_sourced(rc_file: &Path, script: &Path) -> io::Result<()> {
    let line = format!("source \"{}\"", script.display());
    match std::fs::read_to_string(rc_file) {
        Ok(existing) if existing.lines().any(|l| l.trim() == line) => return Ok(()),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut rc = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(rc_file)?;
    writeln!(rc)?;
    writeln!(rc, "# liftlog shell completions")?;
    writeln!(rc, "{line}")?;
    Ok(())
}

pub fn run_completions_command(shell: Option<&str>, install_script: bool) -> Result<(), AppError> {
    let shell = match shell {
        Some(name) => shell_named(name)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown shell '{name}'")))?,
        None => login_shell().ok_or_else(|| {
            AppError::InvalidArgument(
                "cannot tell the shell from $SHELL; name one explicitly".to_string(),
            )
        })?,
    };

    if install_script {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::InvalidArgument("HOME is not set".to_string()))?;
        let path = install(shell, &home)?;
        println!("completions installed to {}", path.display());
    } else {
        write_completions(shell, &mut io::stdout().lock());
    }
    Ok(())
}
