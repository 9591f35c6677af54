//! Line-oriented console front end.
//!
//! Presentation glue only: parses commands, tracks the signed-in user, gates
//! admin commands, and renders outcomes as text. All banking semantics live
//! in [`Bank`]; nothing here touches balances or the transaction log
//! directly.

use thiserror::Error;
use tokio_stream::{Stream, StreamExt};

use crate::Amount;
use crate::amount::ParseAmountError;
use crate::bank::Bank;
use crate::model::{AccountId, AccountStatus, AccountType, NewUser, Role, User, UserId};
use crate::statement;

const USAGE_LOGIN: &str = "login <username> <password>";
const USAGE_CREATE_USER: &str = "create-user <username> <password> <admin|customer> [name..]";
const USAGE_OPEN_ACCOUNT: &str = "open-account [user-id] <savings|current>";
const USAGE_DEPOSIT: &str = "deposit <account-id> <amount> [description..]";
const USAGE_WITHDRAW: &str = "withdraw <account-id> <amount> [description..]";
const USAGE_FREEZE: &str = "freeze <account-id>";
const USAGE_UNFREEZE: &str = "unfreeze <account-id>";
const USAGE_ACCOUNTS: &str = "accounts [user-id]";
const USAGE_HISTORY: &str = "history <account-id>";
const USAGE_STATEMENT: &str = "statement <account-id>";

const HELP: &str = "\
commands:
  login <username> <password>
  logout
  whoami
  open-account [user-id] <savings|current>
  deposit <account-id> <amount> [description..]
  withdraw <account-id> <amount> [description..]
  accounts [user-id]
  history <account-id>
  statement <account-id>
admin:
  create-user <username> <password> <admin|customer> [name..]
  users
  freeze <account-id>
  unfreeze <account-id>
  totals
other:
  help
  quit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    Logout,
    Whoami,
    CreateUser {
        username: String,
        password: String,
        role: Role,
        name: Option<String>,
    },
    Users,
    OpenAccount {
        owner: Option<UserId>,
        kind: AccountType,
    },
    Deposit {
        account: AccountId,
        amount: Amount,
        description: Option<String>,
    },
    Withdraw {
        account: AccountId,
        amount: Amount,
        description: Option<String>,
    },
    Freeze { account: AccountId },
    Unfreeze { account: AccountId },
    Accounts { owner: Option<UserId> },
    History { account: AccountId },
    Statement { account: AccountId },
    Totals,
    Help,
    Quit,
}

/// Errors that can occur when parsing a console line.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Amount(#[from] ParseAmountError),

    #[error("'{0}' is not a numeric id")]
    Id(String),

    #[error("'{0}' is not a role (admin or customer)")]
    Role(String),

    #[error("'{0}' is not an account type (savings or current)")]
    AccountType(String),
}

fn user_id(token: &str) -> Result<UserId, ParseError> {
    token
        .parse()
        .map(UserId)
        .map_err(|_| ParseError::Id(token.to_string()))
}

fn account_id(token: &str) -> Result<AccountId, ParseError> {
    token
        .parse()
        .map(AccountId)
        .map_err(|_| ParseError::Id(token.to_string()))
}

fn role(token: &str) -> Result<Role, ParseError> {
    match token {
        "admin" => Ok(Role::Admin),
        "customer" => Ok(Role::Customer),
        other => Err(ParseError::Role(other.to_string())),
    }
}

fn account_type(token: &str) -> Result<AccountType, ParseError> {
    match token {
        "savings" => Ok(AccountType::Savings),
        "current" => Ok(AccountType::Current),
        other => Err(ParseError::AccountType(other.to_string())),
    }
}

fn remainder<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<String> {
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() { None } else { Some(rest.join(" ")) }
}

impl Command {
    /// Parse one console line. Blank lines and `#` comments parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        if head.starts_with('#') {
            return Ok(None);
        }

        let command = match head {
            "login" => match (tokens.next(), tokens.next()) {
                (Some(username), Some(password)) => Command::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(ParseError::Usage(USAGE_LOGIN)),
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "create-user" => match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(username), Some(password), Some(role_token)) => Command::CreateUser {
                    username: username.to_string(),
                    password: password.to_string(),
                    role: role(role_token)?,
                    name: remainder(tokens),
                },
                _ => return Err(ParseError::Usage(USAGE_CREATE_USER)),
            },
            "users" => Command::Users,
            "open-account" => {
                let args: Vec<&str> = tokens.collect();
                match args.as_slice() {
                    [kind] => Command::OpenAccount {
                        owner: None,
                        kind: account_type(kind)?,
                    },
                    [owner, kind] => Command::OpenAccount {
                        owner: Some(user_id(owner)?),
                        kind: account_type(kind)?,
                    },
                    _ => return Err(ParseError::Usage(USAGE_OPEN_ACCOUNT)),
                }
            }
            "deposit" => match (tokens.next(), tokens.next()) {
                (Some(account), Some(amount)) => Command::Deposit {
                    account: account_id(account)?,
                    amount: amount.parse::<Amount>()?,
                    description: remainder(tokens),
                },
                _ => return Err(ParseError::Usage(USAGE_DEPOSIT)),
            },
            "withdraw" => match (tokens.next(), tokens.next()) {
                (Some(account), Some(amount)) => Command::Withdraw {
                    account: account_id(account)?,
                    amount: amount.parse::<Amount>()?,
                    description: remainder(tokens),
                },
                _ => return Err(ParseError::Usage(USAGE_WITHDRAW)),
            },
            "freeze" => match tokens.next() {
                Some(account) => Command::Freeze {
                    account: account_id(account)?,
                },
                None => return Err(ParseError::Usage(USAGE_FREEZE)),
            },
            "unfreeze" => match tokens.next() {
                Some(account) => Command::Unfreeze {
                    account: account_id(account)?,
                },
                None => return Err(ParseError::Usage(USAGE_UNFREEZE)),
            },
            "accounts" => {
                let args: Vec<&str> = tokens.collect();
                match args.as_slice() {
                    [] => Command::Accounts { owner: None },
                    [owner] => Command::Accounts {
                        owner: Some(user_id(owner)?),
                    },
                    _ => return Err(ParseError::Usage(USAGE_ACCOUNTS)),
                }
            }
            "history" => match tokens.next() {
                Some(account) => Command::History {
                    account: account_id(account)?,
                },
                None => return Err(ParseError::Usage(USAGE_HISTORY)),
            },
            "statement" => match tokens.next() {
                Some(account) => Command::Statement {
                    account: account_id(account)?,
                },
                None => return Err(ParseError::Usage(USAGE_STATEMENT)),
            },
            "totals" => Command::Totals,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Signed-in state, console-local. The core has no session concept.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    fn signed_in(&self) -> Result<&User, &'static str> {
        self.user.as_ref().ok_or("sign in first")
    }

    fn admin(&self) -> Result<&User, &'static str> {
        let user = self.signed_in()?;
        match user.role {
            Role::Admin => Ok(user),
            Role::Customer => Err("admin only"),
        }
    }
}

fn err(e: impl std::fmt::Display) -> String {
    format!("error: {e}")
}

/// Execute one command against the bank and render the outcome.
pub fn execute(bank: &Bank, session: &mut Session, command: Command) -> String {
    match command {
        Command::Login { username, password } => match bank.authenticate(&username, &password) {
            Ok(user) => {
                let line = format!("signed in as {} ({})", user.name, user.role);
                session.user = Some(user);
                line
            }
            Err(e) => err(e),
        },
        Command::Logout => {
            session.user = None;
            "signed out".to_string()
        }
        Command::Whoami => match &session.user {
            Some(user) => format!("{} ({})", user.username, user.role),
            None => "not signed in".to_string(),
        },
        Command::CreateUser {
            username,
            password,
            role,
            name,
        } => match session.admin() {
            Ok(_) => {
                let profile = NewUser {
                    name: name.unwrap_or_else(|| username.clone()),
                    username,
                    password,
                    role,
                    email: String::new(),
                    phone: String::new(),
                    address: String::new(),
                };
                match bank.create_user(profile) {
                    Ok(user) => format!("created user {} ({})", user.id, user.username),
                    Err(e) => err(e),
                }
            }
            Err(msg) => err(msg),
        },
        Command::Users => match session.admin() {
            Ok(_) => {
                let rows: Vec<String> = bank
                    .users()
                    .iter()
                    .map(|u| format!("{}  {}  {}  {}", u.id, u.username, u.role, u.name))
                    .collect();
                rows.join("\n")
            }
            Err(msg) => err(msg),
        },
        Command::OpenAccount { owner, kind } => match session.signed_in() {
            Ok(user) => {
                let owner = owner.unwrap_or(user.id);
                if owner != user.id && user.role != Role::Admin {
                    err("admin only")
                } else {
                    match bank.create_account(owner, kind) {
                        Ok(account) => format!(
                            "opened {} account {} ({}) for user {}",
                            account.kind, account.id, account.account_number, account.user_id
                        ),
                        Err(e) => err(e),
                    }
                }
            }
            Err(msg) => err(msg),
        },
        Command::Deposit {
            account,
            amount,
            description,
        } => match session.signed_in() {
            Ok(_) => match bank.deposit(account, amount, description.as_deref()) {
                Ok(tx) => format!(
                    "deposited {} into account {}, balance {}",
                    tx.amount, account, tx.balance_after
                ),
                Err(e) => err(e),
            },
            Err(msg) => err(msg),
        },
        Command::Withdraw {
            account,
            amount,
            description,
        } => match session.signed_in() {
            Ok(_) => match bank.withdraw(account, amount, description.as_deref()) {
                Ok(tx) => format!(
                    "withdrew {} from account {}, balance {}",
                    tx.amount, account, tx.balance_after
                ),
                Err(e) => err(e),
            },
            Err(msg) => err(msg),
        },
        Command::Freeze { account } => match session.admin() {
            Ok(_) => match bank.set_status(account, AccountStatus::Frozen) {
                Ok(account) => format!("account {} frozen", account.id),
                Err(e) => err(e),
            },
            Err(msg) => err(msg),
        },
        Command::Unfreeze { account } => match session.admin() {
            Ok(_) => match bank.set_status(account, AccountStatus::Active) {
                Ok(account) => format!("account {} active", account.id),
                Err(e) => err(e),
            },
            Err(msg) => err(msg),
        },
        Command::Accounts { owner } => match session.signed_in() {
            Ok(user) => {
                let owner = owner.unwrap_or(user.id);
                if owner != user.id && user.role != Role::Admin {
                    err("admin only")
                } else {
                    let accounts = bank.accounts_of(owner);
                    if accounts.is_empty() {
                        "no accounts".to_string()
                    } else {
                        let rows: Vec<String> = accounts
                            .iter()
                            .map(|a| {
                                format!(
                                    "{}  {}  {}  {}  {}",
                                    a.id, a.account_number, a.kind, a.status, a.balance
                                )
                            })
                            .collect();
                        rows.join("\n")
                    }
                }
            }
            Err(msg) => err(msg),
        },
        Command::History { account } => match session.signed_in() {
            Ok(_) => {
                let history = bank.transactions_of(account);
                if history.is_empty() {
                    "no transactions".to_string()
                } else {
                    let rows: Vec<String> = history
                        .iter()
                        .map(|t| {
                            format!(
                                "{}  {}  {}  balance {}  {}",
                                t.timestamp.to_rfc3339(),
                                t.kind,
                                t.amount,
                                t.balance_after,
                                t.description
                            )
                        })
                        .collect();
                    rows.join("\n")
                }
            }
            Err(msg) => err(msg),
        },
        Command::Statement { account } => match session.signed_in() {
            Ok(_) => {
                let history = bank.transactions_of(account);
                let mut out = Vec::new();
                match statement::write_statement(&mut out, &history) {
                    Ok(()) => String::from_utf8_lossy(&out).trim_end().to_string(),
                    Err(e) => err(e),
                }
            }
            Err(msg) => err(msg),
        },
        Command::Totals => match session.admin() {
            Ok(_) => {
                let totals = bank.totals();
                format!(
                    "accounts: {}, transactions: {}, total balance: {}",
                    totals.account_count, totals.transaction_count, totals.total_balance
                )
            }
            Err(msg) => err(msg),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => "bye".to_string(),
    }
}

/// Drain `lines`, executing each command until `quit` or end of input.
pub async fn run(bank: &Bank, mut lines: impl Stream<Item = String> + Unpin) {
    let mut session = Session::default();
    while let Some(line) = lines.next().await {
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => {
                println!("bye");
                break;
            }
            Ok(Some(command)) => println!("{}", execute(bank, &mut session, command)),
            Err(e) => println!("error: {e}"),
        }
    }
}
