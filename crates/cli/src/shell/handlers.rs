use super::command::ShellCommand;
use super::context::ShellContext;
use super::view::{CategoryRow, SelectionRow};
use tabled::{Table, settings::Style};
use taxon_api::CategoryId;
use taxon_core::{effective_from_explicit, normalize_primary};

pub trait CommandHandler {
    fn handle(
        &self,
        cmd: &ShellCommand,
        context: &mut ShellContext,
    ) -> Result<String, Box<dyn std::error::Error>>;
}

pub fn get_handler(cmd: &ShellCommand) -> Box<dyn CommandHandler> {
    match cmd {
        ShellCommand::Open
        | ShellCommand::Toggle { .. }
        | ShellCommand::Check { .. }
        | ShellCommand::Uncheck { .. }
        | ShellCommand::Commit
        | ShellCommand::Discard => Box::new(DraftHandler),
        ShellCommand::Remove { .. }
        | ShellCommand::Primary { .. }
        | ShellCommand::Load { .. }
        | ShellCommand::Reset => Box::new(SelectionHandler),
        ShellCommand::Show | ShellCommand::Persisted | ShellCommand::Tree => Box::new(ViewHandler),
    }
}

/// Commands operating on the dialog draft
pub struct DraftHandler;
impl CommandHandler for DraftHandler {
    fn handle(
        &self,
        cmd: &ShellCommand,
        context: &mut ShellContext,
    ) -> Result<String, Box<dyn std::error::Error>> {
        if let ShellCommand::Open = cmd {
            let ticket = context.controller.open_edit();
            return Ok(context.refresh(ticket).unwrap_or_default());
        }

        let controller = &mut context.controller;
        let not_editing = || -> Box<dyn std::error::Error> {
            "No selection dialog open. Run 'open' first.".into()
        };

        match cmd {
            ShellCommand::Toggle { id } => {
                if !controller.is_editing() {
                    return Err(not_editing());
                }
                let staged = controller.toggle_staged(*id);
                Ok(format!("{} {}", if staged { "checked" } else { "unchecked" }, id))
            }
            ShellCommand::Check { id } | ShellCommand::Uncheck { id } => {
                if !controller.is_editing() {
                    return Err(not_editing());
                }
                let checked = matches!(cmd, ShellCommand::Check { .. });
                controller.set_staged(*id, checked);
                Ok(String::new())
            }
            ShellCommand::Commit => {
                if !controller.commit() {
                    return Err(not_editing());
                }
                Ok(format!(
                    "Saved {} categories, primary {}",
                    controller.explicit().len(),
                    describe_primary(controller.primary())
                ))
            }
            ShellCommand::Discard => {
                if !controller.discard() {
                    return Err(not_editing());
                }
                Ok("Draft discarded.".to_string())
            }
            _ => Ok(String::new()),
        }
    }
}

/// Direct mutations of the committed selection
pub struct SelectionHandler;
impl CommandHandler for SelectionHandler {
    fn handle(
        &self,
        cmd: &ShellCommand,
        context: &mut ShellContext,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let controller = &mut context.controller;

        match cmd {
            ShellCommand::Remove { id } => {
                if controller.remove(*id) {
                    Ok(format!(
                        "Removed {}, primary {}",
                        id,
                        describe_primary(controller.primary())
                    ))
                } else {
                    Ok(format!("{} was not selected.", id))
                }
            }
            ShellCommand::Primary { id } => {
                let primary = controller.set_primary(*id);
                Ok(format!("Primary {}", describe_primary(primary)))
            }
            ShellCommand::Load {
                categories,
                primary,
            } => {
                controller.initialize_from_persisted(categories, *primary);
                Ok(format!(
                    "Loaded {} categories as {} explicit, primary {}",
                    categories.len(),
                    controller.explicit().len(),
                    describe_primary(controller.primary())
                ))
            }
            ShellCommand::Reset => {
                controller.reset();
                Ok("Selection cleared.".to_string())
            }
            _ => Ok(String::new()),
        }
    }
}

/// Read-only views
pub struct ViewHandler;
impl CommandHandler for ViewHandler {
    fn handle(
        &self,
        cmd: &ShellCommand,
        context: &mut ShellContext,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let controller = &context.controller;

        match cmd {
            ShellCommand::Show => {
                let index = controller.tree();
                let (label, state, primary, stale) = match controller.staged() {
                    Some(staged) => (
                        "Draft",
                        effective_from_explicit(index, staged).check_state(),
                        // What commit would settle on
                        normalize_primary(index, controller.primary(), staged),
                        staged
                            .iter()
                            .copied()
                            .filter(|&id| !index.contains(id))
                            .collect::<Vec<CategoryId>>(),
                    ),
                    None => (
                        "Selection",
                        controller.check_state(),
                        controller.primary(),
                        controller.stale_ids(),
                    ),
                };
                if state.checked.is_empty() {
                    return Ok(format!("{}: NO CATEGORIES SELECTED", label));
                }
                let rows = SelectionRow::from_state(index, &state, primary);
                let mut out = format!("{}:\n{}", label, Table::new(&rows).with(Style::psql()));
                if !index.is_empty() && !stale.is_empty() {
                    let ids: Vec<String> = stale.iter().map(ToString::to_string).collect();
                    out.push_str(&format!("\nNot in tree: {}", ids.join(", ")));
                }
                Ok(out)
            }
            ShellCommand::Persisted => Ok(serde_json::to_string_pretty(&controller.persisted())?),
            ShellCommand::Tree => {
                let rows = CategoryRow::preorder(controller.tree());
                if rows.is_empty() {
                    return Ok("NO CATEGORIES FOUND".to_string());
                }
                Ok(Table::new(&rows).with(Style::psql()).to_string())
            }
            _ => Ok(String::new()),
        }
    }
}

fn describe_primary(primary: Option<taxon_api::CategoryId>) -> String {
    primary
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string())
}
