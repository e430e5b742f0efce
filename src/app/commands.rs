//! Command-line parser.
//!
//! Parses `/command arg1 arg2 ...` (or `:command ...`) input lines into typed
//! [`ParsedCommand`] values that the event handler can act on. Numbers are
//! kept as text here; validation happens where the command is applied, with
//! the same rules as the forms.

use thiserror::Error;

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Add { name: String, price: String, quantity: Option<String> },
    Edit { index: usize, name: Option<String>, price: Option<String>, quantity: Option<String> },
    Remove { index: usize },
    Clear,
    Save,
    Load { index: usize },
    Tax { rate: String },
    Budget { amount: Option<String> },
    Help,
    Quit,
}

/// One-line usage strings, shown by `/help`.
pub const HELP: &[&str] = &[
    "/add <name> <price> [qty]   add an item",
    "/edit <n> [name=..] [price=..] [qty=..]   edit item n",
    "/rm <n>   remove item n",
    "/clear   empty the cart",
    "/save   save the cart to history",
    "/load <n>   load history entry n into the cart",
    "/tax <rate>   set the sales tax rate (%)",
    "/budget <amount|off>   set or disable the budget",
    "/quit   exit",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Commands start with / or :")]
    NotACommand,
    #[error("Unknown command '{0}'. Try /help")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

fn is_number(s: &str) -> bool {
    let s = s.strip_prefix('$').unwrap_or(s);
    !s.is_empty() && s.parse::<f64>().is_ok()
}

fn is_whole(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn parse_index(s: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    match s.and_then(|s| s.trim().parse::<usize>().ok()) {
        Some(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Parse a command line into a [`ParsedCommand`].
///
/// Command names are case-insensitive. Indices are 1-based as displayed.
pub fn parse_command(input: &str) -> Result<ParsedCommand, CommandError> {
    let input = input.trim();
    let body = input
        .strip_prefix('/')
        .or_else(|| input.strip_prefix(':'))
        .ok_or(CommandError::NotACommand)?;

    let mut parts = body.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let rest = parts.next().unwrap_or("").trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    match cmd.as_str() {
        "add" | "a" => parse_add(&args),
        "edit" | "e" => parse_edit(&args),
        "rm" | "remove" | "del" => Ok(ParsedCommand::Remove {
            index: parse_index(args.first().copied(), "/rm <n>")?,
        }),
        "clear" => Ok(ParsedCommand::Clear),
        "save" => Ok(ParsedCommand::Save),
        "load" => Ok(ParsedCommand::Load {
            index: parse_index(args.first().copied(), "/load <n>")?,
        }),
        "tax" => match args.first() {
            Some(rate) => Ok(ParsedCommand::Tax { rate: rate.to_string() }),
            None => Err(CommandError::Usage("/tax <rate>")),
        },
        "budget" => match args.first() {
            Some(a) if a.eq_ignore_ascii_case("off") => Ok(ParsedCommand::Budget { amount: None }),
            Some(a) => Ok(ParsedCommand::Budget { amount: Some(a.to_string()) }),
            None => Err(CommandError::Usage("/budget <amount|off>")),
        },
        "help" | "h" | "?" => Ok(ParsedCommand::Help),
        "quit" | "q" | "exit" => Ok(ParsedCommand::Quit),
        _ => Err(CommandError::Unknown(cmd)),
    }
}

/// `<name...> <price> [qty]`. A trailing whole number after a price is the
/// quantity; otherwise the last token is the price.
fn parse_add(args: &[&str]) -> Result<ParsedCommand, CommandError> {
    const USAGE: &str = "/add <name> <price> [qty]";
    let n = args.len();
    if n >= 3 && is_whole(args[n - 1]) && is_number(args[n - 2]) {
        return Ok(ParsedCommand::Add {
            name: args[..n - 2].join(" "),
            price: args[n - 2].to_string(),
            quantity: Some(args[n - 1].to_string()),
        });
    }
    if n >= 2 {
        return Ok(ParsedCommand::Add {
            name: args[..n - 1].join(" "),
            price: args[n - 1].to_string(),
            quantity: None,
        });
    }
    Err(CommandError::Usage(USAGE))
}

/// `<n> [name=..] [price=..] [qty=..]`. Words after `name=` that are not
/// themselves `key=value` pairs belong to the name.
fn parse_edit(args: &[&str]) -> Result<ParsedCommand, CommandError> {
    const USAGE: &str = "/edit <n> [name=..] [price=..] [qty=..]";
    let index = parse_index(args.first().copied(), USAGE)?;

    let mut name: Option<String> = None;
    let mut price = None;
    let mut quantity = None;
    let mut in_name = false;

    for arg in &args[1..] {
        match arg.split_once('=') {
            Some((key, value)) => {
                in_name = false;
                match key.to_lowercase().as_str() {
                    "name" => {
                        name = Some(value.to_string());
                        in_name = true;
                    }
                    "price" => price = Some(value.to_string()),
                    "qty" | "quantity" => quantity = Some(value.to_string()),
                    _ => return Err(CommandError::Usage(USAGE)),
                }
            }
            None if in_name => {
                if let Some(n) = name.as_mut() {
                    n.push(' ');
                    n.push_str(arg);
                }
            }
            None => return Err(CommandError::Usage(USAGE)),
        }
    }

    if name.is_none() && price.is_none() && quantity.is_none() {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(ParsedCommand::Edit { index, name, price, quantity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_with_and_without_quantity() {
        assert_eq!(
            parse_command("/add Milk 3.50 2").unwrap(),
            ParsedCommand::Add { name: "Milk".into(), price: "3.50".into(), quantity: Some("2".into()) }
        );
        assert_eq!(
            parse_command(":ADD Whole wheat bread 2.99").unwrap(),
            ParsedCommand::Add { name: "Whole wheat bread".into(), price: "2.99".into(), quantity: None }
        );
    }

    #[test]
    fn add_keeps_numeric_words_in_name() {
        assert_eq!(
            parse_command("/add Eggs 12 3.50").unwrap(),
            ParsedCommand::Add { name: "Eggs 12".into(), price: "3.50".into(), quantity: None }
        );
        assert_eq!(
            parse_command("/add 2% milk $1.99 3").unwrap(),
            ParsedCommand::Add { name: "2% milk".into(), price: "$1.99".into(), quantity: Some("3".into()) }
        );
    }

    #[test]
    fn add_needs_name_and_price() {
        assert!(matches!(parse_command("/add Milk"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("/add"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn edit_pairs() {
        assert_eq!(
            parse_command("/edit 2 name=Oat milk qty=3").unwrap(),
            ParsedCommand::Edit {
                index: 2,
                name: Some("Oat milk".into()),
                price: None,
                quantity: Some("3".into()),
            }
        );
        assert!(matches!(parse_command("/edit 2"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("/edit 0 qty=1"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("/edit 1 colour=red"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("/rm 3").unwrap(), ParsedCommand::Remove { index: 3 });
        assert_eq!(parse_command("/load 1").unwrap(), ParsedCommand::Load { index: 1 });
        assert_eq!(parse_command("/clear").unwrap(), ParsedCommand::Clear);
        assert_eq!(parse_command("/save").unwrap(), ParsedCommand::Save);
        assert_eq!(parse_command("/tax 8").unwrap(), ParsedCommand::Tax { rate: "8".into() });
        assert_eq!(parse_command("/budget off").unwrap(), ParsedCommand::Budget { amount: None });
        assert_eq!(
            parse_command("/budget 40").unwrap(),
            ParsedCommand::Budget { amount: Some("40".into()) }
        );
        assert_eq!(parse_command("/quit").unwrap(), ParsedCommand::Quit);
    }

    #[test]
    fn rejects_unknown_and_bare_text() {
        assert_eq!(parse_command("hello"), Err(CommandError::NotACommand));
        assert_eq!(parse_command("/frobnicate"), Err(CommandError::Unknown("frobnicate".into())));
        assert_eq!(
            CommandError::Unknown("x".into()).to_string(),
            "Unknown command 'x'. Try /help"
        );
    }
}
