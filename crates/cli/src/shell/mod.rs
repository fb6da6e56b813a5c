mod command;
mod completer;
mod context;
mod handlers;
mod highlighter;
mod prompt;
pub(crate) mod view;

use reedline::{
    ColumnarMenu, DefaultHinter, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

use self::command::{ShellCommand, parse_shell_command};
use self::completer::SelectionCompleter;
use self::context::ShellContext;
use self::highlighter::SelectionHighlighter;
use self::prompt::SelectionPrompt;
use crate::TreeArgs;
use taxon_core::ResolverConfig;

const SHELL_HISTORY_SIZE: usize = 500;

/// Parse and execute one line. `Ok(None)` for blank lines, comments and help output.
fn execute_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    match parse_shell_command(trimmed)? {
        Some(cmd) => {
            let handler = handlers::get_handler(&cmd);
            handler.handle(&cmd, context).map(Some)
        }
        None => Ok(None),
    }
}

/// Run every line of `input`, stopping at the first failing command.
fn run_lines(
    context: &mut ShellContext,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        match execute_line(context, &line) {
            Ok(Some(output)) if !output.is_empty() => writeln!(out, "{}", output)?,
            Ok(_) => {}
            Err(e) => return Err(format!("line {}: {}: {}", number + 1, line.trim(), e).into()),
        }
    }

    if context.controller.is_editing() {
        writeln!(out, "Note: selection dialog still open; draft not saved.")?;
    }
    writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&context.controller.persisted())?
    )?;
    Ok(())
}

pub fn run_script(
    rt: tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
    script: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = ShellContext::new(rt, args, config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match script {
        Some(path) => {
            info!("Running session script {}", path.display());
            let file = std::fs::File::open(path)?;
            run_lines(&mut context, std::io::BufReader::new(file), &mut out)
        }
        None => run_lines(&mut context, std::io::stdin().lock(), &mut out),
    }
}

pub fn run_interactive(
    rt: tokio::runtime::Runtime,
    args: &TreeArgs,
    config: ResolverConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut context = ShellContext::new(rt, args, config)?;
    println!(
        "Tree: {} ({} categories)",
        args.tree.display(),
        context.controller.tree().len()
    );
    println!("Type 'help' for commands.");

    let mut line_editor = setup_line_editor(&context);

    loop {
        let prompt = SelectionPrompt::new(
            context.controller.is_editing(),
            context.controller.explicit().len(),
        );

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }
                match execute_line(&mut context, trimmed) {
                    Ok(Some(output)) if !output.is_empty() => println!("{}", output),
                    Ok(_) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Bye!");
                break;
            }
            Err(e) => return Err(Box::new(e)),
        }
    }
    Ok(())
}

fn setup_line_editor(context: &ShellContext) -> Reedline {
    let commands = ShellCommand::command_names();

    let completer = Box::new(SelectionCompleter::new(
        commands.clone(),
        context.category_names(),
    ));
    let completion_menu = Box::new(ColumnarMenu::default().with_name("completion_menu"));

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    let mut line_editor = Reedline::create()
        .with_completer(completer)
        .with_highlighter(Box::new(SelectionHighlighter::new(commands)))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_hinter(Box::new(
            DefaultHinter::default().with_style(
                nu_ansi_term::Style::new()
                    .italic()
                    .fg(nu_ansi_term::Color::LightGray),
            ),
        ))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    if let Some(history_file) = history_path() {
        match FileBackedHistory::with_file(SHELL_HISTORY_SIZE, history_file) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => tracing::warn!("Shell history disabled: {}", e),
        }
    }

    line_editor
}

fn history_path() -> Option<std::path::PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".taxon");
    path.push("shell");
    std::fs::create_dir_all(&path).ok()?;
    path.push("history");
    Some(path)
}
