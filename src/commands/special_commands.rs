//! Special commands parser for the interactive sessions
//!
//! This module parses the commands typed into the shop and chat sessions.
//! In the shop every action is a command; in the chat, plain text picks a
//! quiz option and commands cover everything else.
//!
//! Command names are prefixed with `/` and are case-insensitive. Arguments
//! keep the case they were typed in.

use crate::checkout::FormField;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands accepted by the shop session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    /// List variants with prices
    Sizes,
    /// Select a variant by size label
    SelectSize(String),
    /// Add the selected variant to the cart
    Add,
    /// Show the cart
    ShowCart,
    /// Hide the cart
    CloseCart,
    /// Remove a line item by id
    Remove(u64),
    /// "Proceed to Buy"
    Checkout,
    /// Fill a checkout form field
    Set { field: FormField, value: String },
    /// Append the current location to the address
    Locate,
    /// Submit the order
    Submit,
    /// Close the checkout form
    Cancel,
    /// Show gallery images
    Gallery,
    /// Show the gallery image at a zero-based index
    Image(usize),
    Next,
    Prev,
    Status,
    Help,
    Exit,
    /// Blank input
    None,
}

/// Commands accepted by the chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Open the chat and begin the quiz
    Start,
    /// Pick a quiz option by number or text
    Choose(String),
    /// Fill in and send the contact form
    Form,
    /// Print the conversation so far
    Transcript,
    Help,
    Exit,
    /// Blank input
    None,
}

/// Split `/command rest` into a lowercase command word and the raw rest
fn split_command(input: &str) -> (String, &str) {
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    }
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

fn no_argument(command: ShopCommand, name: &str, rest: &str) -> Result<ShopCommand, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(unsupported(name, rest))
    }
}

/// Parse a line typed into the shop session
///
/// # Errors
///
/// Returns CommandError::UnknownCommand for unrecognised input.
/// Returns CommandError::MissingArgument when `/size`, `/remove`, `/image`
/// or `/set` are missing their argument.
/// Returns CommandError::UnsupportedArgument for malformed arguments.
///
/// # Examples
///
/// ```
/// use ecopure::checkout::FormField;
/// use ecopure::commands::special_commands::{parse_shop_command, ShopCommand};
///
/// let cmd = parse_shop_command("/set name Asha Rao").unwrap();
/// assert_eq!(
///     cmd,
///     ShopCommand::Set { field: FormField::Name, value: "Asha Rao".to_string() }
/// );
///
/// assert_eq!(parse_shop_command("/image 2").unwrap(), ShopCommand::Image(1));
/// assert!(parse_shop_command("/fly").is_err());
/// ```
pub fn parse_shop_command(input: &str) -> Result<ShopCommand, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(ShopCommand::None);
    }

    let (cmd, rest) = split_command(trimmed);
    match cmd.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(ShopCommand::Exit),
        "/help" | "/?" => Ok(ShopCommand::Help),
        "/status" => no_argument(ShopCommand::Status, "/status", rest),
        "/sizes" | "/variants" => no_argument(ShopCommand::Sizes, "/sizes", rest),

        "/size" => {
            if rest.is_empty() {
                Err(missing("/size", "/size <100 ml|250 ml|500 ml>"))
            } else {
                Ok(ShopCommand::SelectSize(rest.to_string()))
            }
        }

        "/add" => no_argument(ShopCommand::Add, "/add", rest),
        "/cart" => no_argument(ShopCommand::ShowCart, "/cart", rest),
        "/close" => no_argument(ShopCommand::CloseCart, "/close", rest),

        "/remove" => {
            if rest.is_empty() {
                return Err(missing("/remove", "/remove <item id>"));
            }
            rest.parse::<u64>()
                .map(ShopCommand::Remove)
                .map_err(|_| unsupported("/remove", rest))
        }

        "/checkout" | "/buy" => no_argument(ShopCommand::Checkout, "/checkout", rest),

        "/set" => {
            let usage = "/set <name|phone|email|address> <value>";
            if rest.is_empty() {
                return Err(missing("/set", usage));
            }
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            let field = FormField::parse_str(field).map_err(|_| unsupported("/set", field))?;
            if value.is_empty() {
                return Err(missing("/set", usage));
            }
            Ok(ShopCommand::Set {
                field,
                value: value.replace("\\n", "\n"),
            })
        }

        "/locate" | "/location" => no_argument(ShopCommand::Locate, "/locate", rest),
        "/submit" => no_argument(ShopCommand::Submit, "/submit", rest),
        "/cancel" => no_argument(ShopCommand::Cancel, "/cancel", rest),
        "/gallery" => no_argument(ShopCommand::Gallery, "/gallery", rest),

        "/image" => {
            if rest.is_empty() {
                return Err(missing("/image", "/image <number>"));
            }
            match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(ShopCommand::Image(n - 1)),
                _ => Err(unsupported("/image", rest)),
            }
        }

        "/next" => no_argument(ShopCommand::Next, "/next", rest),
        "/prev" | "/previous" => no_argument(ShopCommand::Prev, "/prev", rest),

        _ => Err(CommandError::UnknownCommand(cmd)),
    }
}

/// Parse a line typed into the chat session
///
/// Any text that is not a command is treated as an option choice; whether
/// the option is valid for the current step is decided by the chat itself.
///
/// # Examples
///
/// ```
/// use ecopure::commands::special_commands::{parse_chat_command, ChatCommand};
///
/// assert_eq!(parse_chat_command("2").unwrap(), ChatCommand::Choose("2".to_string()));
/// assert_eq!(parse_chat_command("/FORM").unwrap(), ChatCommand::Form);
/// assert!(parse_chat_command("/cart").is_err());
/// ```
pub fn parse_chat_command(input: &str) -> Result<ChatCommand, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(ChatCommand::None);
    }

    let lower = trimmed.to_lowercase();
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(ChatCommand::Choose(trimmed.to_string()));
    }

    let (cmd, rest) = split_command(trimmed);
    let command = match cmd.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => ChatCommand::Exit,
        "/help" | "/?" => ChatCommand::Help,
        "/start" | "/restart" => ChatCommand::Start,
        "/form" => ChatCommand::Form,
        "/transcript" | "/history" => ChatCommand::Transcript,
        _ => return Err(CommandError::UnknownCommand(cmd)),
    };

    if rest.is_empty() {
        Ok(command)
    } else {
        Err(unsupported(&cmd, rest))
    }
}

/// Display help text for the shop session
pub fn print_shop_help() {
    println!(
        r#"
Shop Commands
=============

PRODUCT:
  /sizes              - List available sizes and prices
  /size <label>       - Select a size, e.g. /size 500 ml
  /gallery            - List product images
  /image <n>          - Show image number n
  /next, /prev        - Step through the gallery

CART:
  /add                - Add the selected size to the cart
  /cart               - Show the cart
  /close              - Hide the cart
  /remove <id>        - Remove an item by its id

CHECKOUT:
  /checkout           - Proceed to buy (opens the order form)
  /set <field> <text> - Fill a field: name, phone, email, address
                        Use \n inside the address for a new line
  /locate             - Add your current location to the address
  /submit             - Send the order on WhatsApp
  /cancel             - Close the order form

OTHER:
  /status             - Show selection, cart and form state
  /help               - Show this help
  exit, quit          - Leave the shop
"#
    );
}

/// Display help text for the chat session
pub fn print_chat_help() {
    println!(
        r#"
Chat Commands
=============

  <number> or <text>  - Pick one of the listed options
  /start              - Take the quiz again after browsing
  /form               - Fill in your details and send them on WhatsApp
  /transcript         - Show the conversation so far
  /help               - Show this help
  exit, quit          - Leave the chat
"#
    );
}
