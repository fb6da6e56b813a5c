use clap::Parser;
use clap::error::ErrorKind;
use taxon_api::CategoryId;

/// Commands accepted by the selection shell and by session scripts
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(no_binary_name = true)]
pub enum ShellCommand {
    /// Open the selection dialog: start a draft and refetch the tree
    Open,
    /// Flip a category in the draft
    Toggle {
        /// Category id
        id: CategoryId,
    },
    /// Check a category in the draft
    Check {
        /// Category id
        id: CategoryId,
    },
    /// Uncheck a category in the draft
    Uncheck {
        /// Category id
        id: CategoryId,
    },
    /// Save the draft as the committed selection
    Commit,
    /// Close the dialog without saving
    Discard,
    /// Remove a category from the committed selection
    Remove {
        /// Category id
        id: CategoryId,
    },
    /// Request a primary category (normalized against the selection)
    Primary {
        /// Category id
        id: CategoryId,
    },
    /// Load a persisted selection (effective ids plus primary)
    Load {
        /// Persisted effective category ids (comma or space separated)
        #[arg(value_delimiter = ',', num_args = 0..)]
        categories: Vec<CategoryId>,
        /// Persisted primary category id
        #[arg(long)]
        primary: Option<CategoryId>,
    },
    /// Clear the selection
    Reset,
    /// Show the committed selection, or the draft while the dialog is open
    Show,
    /// Print the persisted pair as JSON
    Persisted,
    /// Print the category tree
    Tree,
}

impl ShellCommand {
    /// Command names for completion and highlighting, derived from the enum.
    pub fn command_names() -> Vec<String> {
        use clap::CommandFactory;
        let cmd = Self::command();
        let mut names = vec!["help".to_string(), "exit".to_string(), "quit".to_string()];
        names.extend(cmd.get_subcommands().map(|s| s.get_name().to_string()));
        names
    }

    /// Whether the command's first argument is a category id.
    pub fn takes_category(name: &str) -> bool {
        matches!(
            name,
            "toggle" | "check" | "uncheck" | "remove" | "primary" | "load"
        )
    }
}

pub fn parse_shell_command(
    input: &str,
) -> Result<Option<ShellCommand>, Box<dyn std::error::Error>> {
    // Quoted names stay one argument
    let args = shlex::split(input).ok_or("Invalid quoting")?;

    match ShellCommand::try_parse_from(args) {
        Ok(c) => Ok(Some(c)),
        Err(e) => {
            // `help` prints usage; not a failure
            if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion {
                println!("{}", e);
                return Ok(None);
            }
            Err(Box::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_shell_command("toggle 3").unwrap(),
            Some(ShellCommand::Toggle { id: CategoryId(3) })
        );
        assert_eq!(parse_shell_command("commit").unwrap(), Some(ShellCommand::Commit));
        assert_eq!(
            parse_shell_command("load 1,2 3 --primary 3").unwrap(),
            Some(ShellCommand::Load {
                categories: vec![CategoryId(1), CategoryId(2), CategoryId(3)],
                primary: Some(CategoryId(3)),
            })
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_shell_command("toggle phones").is_err());
        assert!(parse_shell_command("explode").is_err());
        assert!(parse_shell_command("toggle \"3").is_err());
    }

    #[test]
    fn test_command_names() {
        let names = ShellCommand::command_names();
        assert!(names.contains(&"open".to_string()));
        assert!(names.contains(&"persisted".to_string()));
        assert!(names.contains(&"exit".to_string()));
    }
}
