//! Line-oriented staff commands for the headless runner.
//!
//! ```text
//! alert <type> <location> <message...>
//! quick <code_blue|code_red|emergency|maintenance>
//! dismiss <id>
//! enqueue <department> <token>
//! advance <department>
//! stock <add|subtract|set> <quantity> <item name...>
//! refresh
//! ```

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controllers::staff::{AlertForm, InventoryForm, QuickAlert, StockOperation, TokenForm};
use crate::controllers::StaffPage;
use crate::lifecycle::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffCommand {
    Alert(AlertForm),
    Quick(QuickAlert),
    Dismiss(i64),
    Enqueue(TokenForm),
    Advance(String),
    Stock(InventoryForm),
    Refresh,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl StaffCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let rest: Vec<&str> = words.collect();
        match verb {
            "alert" => match rest.as_slice() {
                [kind, location, message @ ..] if !message.is_empty() => {
                    Ok(StaffCommand::Alert(AlertForm {
                        kind: kind.to_string(),
                        location: location.to_string(),
                        message: message.join(" "),
                    }))
                }
                _ => Err(CommandError::Usage("alert <type> <location> <message...>")),
            },
            "quick" => rest
                .first()
                .and_then(|raw| QuickAlert::parse(raw))
                .map(StaffCommand::Quick)
                .ok_or(CommandError::Usage(
                    "quick <code_blue|code_red|emergency|maintenance>",
                )),
            "dismiss" => rest
                .first()
                .and_then(|raw| raw.parse().ok())
                .map(StaffCommand::Dismiss)
                .ok_or(CommandError::Usage("dismiss <id>")),
            "enqueue" => match rest.as_slice() {
                [department, token] => Ok(StaffCommand::Enqueue(TokenForm {
                    department: department.to_string(),
                    token_number: token.to_string(),
                })),
                _ => Err(CommandError::Usage("enqueue <department> <token>")),
            },
            "advance" => match rest.as_slice() {
                [department] => Ok(StaffCommand::Advance(department.to_string())),
                _ => Err(CommandError::Usage("advance <department>")),
            },
            "stock" => match rest.as_slice() {
                [operation, quantity, name @ ..] if !name.is_empty() => {
                    let quantity = quantity.parse().map_err(|_| {
                        CommandError::Usage("stock <add|subtract|set> <quantity> <item name...>")
                    })?;
                    Ok(StaffCommand::Stock(InventoryForm {
                        item_name: name.join(" "),
                        quantity,
                        operation: StockOperation::parse(operation),
                    }))
                }
                _ => Err(CommandError::Usage(
                    "stock <add|subtract|set> <quantity> <item name...>",
                )),
            },
            "refresh" => Ok(StaffCommand::Refresh),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Run one command against the staff page, going through its forms the way
/// a person at the panel would.
pub async fn execute(staff: &StaffPage, command: StaffCommand) {
    match command {
        StaffCommand::Alert(form) => {
            staff.fill_alert_form(form);
            staff.create_alert().await;
        }
        StaffCommand::Quick(quick) => {
            staff.quick_alert(quick).await;
        }
        StaffCommand::Dismiss(id) => {
            staff.dismiss_alert(id).await;
        }
        StaffCommand::Enqueue(form) => {
            staff.fill_token_form(form);
            staff.add_token().await;
        }
        StaffCommand::Advance(department) => {
            staff.advance_token(&department).await;
        }
        StaffCommand::Stock(form) => {
            staff.fill_inventory_form(form);
            staff.update_inventory().await;
        }
        StaffCommand::Refresh => staff.refresh_now().await,
    }
}

/// Read commands from `input` until EOF or shutdown.
pub async fn run_commands<R>(staff: &StaffPage, input: R, shutdown: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Command reader stopping");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match StaffCommand::parse(&line) {
                    Ok(command) => execute(staff, command).await,
                    Err(CommandError::Empty) => {}
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => {
                    info!("Command input closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read command: {}", e);
                    break;
                }
            },
        }
    }
}
