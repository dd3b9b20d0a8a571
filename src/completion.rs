//! # Shell Completion Module
//!
//! Generates completion scripts for the supported shells through clap's
//! completion support.
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! moodlog --completions bash > ~/.local/share/bash-completion/completions/moodlog
//!
//! # Generate zsh completions
//! moodlog --completions zsh > ~/.config/zsh/completions/_moodlog
//! ```

use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

use crate::cli::Shell;

/// Generate shell completions for the given shell into `out`
pub fn write_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Generate shell completions for the given shell on stdout
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    write_completions(gen, cmd, &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
pub fn shell_to_completion_shell(shell: &Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::CommandFactory;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(&Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(&Shell::Zsh), CompletionShell::Zsh);
        assert_eq!(
            shell_to_completion_shell(&Shell::PowerShell),
            CompletionShell::PowerShell
        );
    }

    #[test]
    fn test_bash_script_mentions_flags() {
        let mut cmd = Args::command();
        let mut buffer = Vec::new();
        write_completions(CompletionShell::Bash, &mut cmd, &mut buffer);

        let script = String::from_utf8(buffer).unwrap();
        assert!(script.contains("_moodlog"));
        assert!(script.contains("--analyze"));
        assert!(script.contains("--clear-likes"));
    }
}
