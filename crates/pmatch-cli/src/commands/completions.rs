use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, shells, Generator};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

/// Render the completion script for `shell` under the binary name declared on `Cli`
fn render_completions(shell: CompletionShell) -> Vec<u8> {
    fn render(generator: impl Generator, command: &mut clap::Command) -> Vec<u8> {
        let bin_name = command.get_name().to_string();
        let mut script = Vec::new();
        generate(generator, command, bin_name, &mut script);
        script
    }

    let mut command = Cli::command();
    match shell {
        CompletionShell::Bash => render(shells::Bash, &mut command),
        CompletionShell::Zsh => render(shells::Zsh, &mut command),
        CompletionShell::Fish => render(shells::Fish, &mut command),
    }
}

pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_completions(shell);

    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            println!("{}", path.display());
        }
        None => io::stdout().write_all(&script)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_use_declared_binary_name() {
        let fish = String::from_utf8(render_completions(CompletionShell::Fish)).unwrap();
        assert!(fish.contains("complete -c pmatch"));

        let zsh = String::from_utf8(render_completions(CompletionShell::Zsh)).unwrap();
        assert!(zsh.contains("#compdef pmatch"));
    }
}
