// server/src/cli/interactive.rs
//! The interactive console: a login prompt, then a role specific command
//! loop until the user logs out or exits.

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use log::{debug, error, info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use clinic_lib::commands::{
    AdminCommand, AdminLine, DoctorCommand, DoctorLine, PatientCommand, PatientLine, PharmacistCommand,
    PharmacistLine,
};
use clinic_lib::config::ClinicConfig;
use clinic_lib::{AuthService, StorageEngine};
use medical_knowledge::ClinicWorkflow;
use models::{ClinicResult, Role, SlotReleasePolicy};

use crate::cli::handlers_admin::handle_admin_command;
use crate::cli::handlers_doctor::handle_doctor_command;
use crate::cli::handlers_patient::handle_patient_command;
use crate::cli::handlers_pharmacist::handle_pharmacist_command;
use crate::cli::handlers_user::{command_names, handle_password_change, help_text, whoami};
use crate::cli::handlers_utils::{clear_terminal_screen, print_welcome_screen, Reply};

const FUZZY_MATCH_THRESHOLD: usize = 2;

/// Parsed form of one console line.
#[derive(Debug, PartialEq, Clone)]
pub enum CommandType {
    Help,
    WhoAmI,
    Password { old: String, new: String },
    Clear,
    Logout,
    Exit,
    Patient(PatientCommand),
    Doctor(DoctorCommand),
    Pharmacist(PharmacistCommand),
    Admin(AdminCommand),
    /// Not a command; the message explains why.
    Unknown(String),
}

/// What the console does after a command.
#[derive(Debug, PartialEq, Clone)]
pub enum Flow {
    Continue(String),
    Logout,
    Exit,
}

// === Levenshtein distance for fuzzy matching ===
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let (m, n) = (s1_chars.len(), s2_chars.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];
    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

fn suggest(role: Role, word: &str) -> Option<String> {
    command_names(role)
        .into_iter()
        .map(|name| (levenshtein_distance(word, &name), name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= FUZZY_MATCH_THRESHOLD)
        .map(|(_, name)| name)
}

fn parse_role_line(role: Role, parts: &[String]) -> Result<CommandType, clap::Error> {
    Ok(match role {
        Role::Patient => CommandType::Patient(PatientLine::try_parse_from(parts)?.command),
        Role::Doctor => CommandType::Doctor(DoctorLine::try_parse_from(parts)?.command),
        Role::Pharmacist => CommandType::Pharmacist(PharmacistLine::try_parse_from(parts)?.command),
        Role::Administrator => CommandType::Admin(AdminLine::try_parse_from(parts)?.command),
    })
}

/// Maps the words of one line to a command for a user of `role`.
pub fn parse_command(role: Role, parts: &[String]) -> CommandType {
    let Some(first) = parts.first() else {
        return CommandType::Unknown(String::new());
    };
    match (first.to_lowercase().as_str(), parts.len()) {
        ("help" | "?", 1) => return CommandType::Help,
        ("whoami", 1) => return CommandType::WhoAmI,
        ("clear" | "clean", 1) => return CommandType::Clear,
        ("logout", 1) => return CommandType::Logout,
        ("exit" | "quit" | "q", 1) => return CommandType::Exit,
        ("password", 3) => {
            return CommandType::Password {
                old: parts[1].clone(),
                new: parts[2].clone(),
            }
        }
        ("password", _) => return CommandType::Unknown("Usage: password <OLD> <NEW>".to_string()),
        _ => {}
    }

    match parse_role_line(role, parts) {
        Ok(command) => command,
        Err(e) if e.kind() == ClapErrorKind::InvalidSubcommand => {
            let message = match suggest(role, first) {
                Some(suggestion) => format!("Unknown command '{}'. Did you mean '{}'?", first, suggestion),
                None => format!("Unknown command '{}'. Type 'help' for your commands.", first),
            };
            CommandType::Unknown(message)
        }
        Err(e) => CommandType::Unknown(e.render().to_string().trim_end().to_string()),
    }
}

/// A loaded clinic plus the login state of the console.
pub struct Session {
    pub workflow: ClinicWorkflow,
    pub auth: AuthService,
    storage: Box<dyn StorageEngine>,
    default_password: String,
}

impl Session {
    pub fn open(storage: Box<dyn StorageEngine>, policy: SlotReleasePolicy, default_password: &str) -> ClinicResult<Self> {
        let store = storage.load()?;
        info!("Opened {} storage: {}", storage.get_type(), store.summary());
        Ok(Session {
            workflow: ClinicWorkflow::new(store, policy),
            auth: AuthService::new(default_password),
            storage,
            default_password: default_password.to_string(),
        })
    }

    pub fn save(&self) -> ClinicResult<()> {
        self.storage.save(self.workflow.store())
    }

    pub fn login(&mut self, user_id: &str, password: &str) -> ClinicResult<Role> {
        Ok(self.auth.login(self.workflow.users(), user_id, password)?.role())
    }

    pub fn requires_password_change(&self) -> bool {
        self.auth.requires_password_change(self.workflow.users())
    }

    pub fn current_role(&self) -> ClinicResult<Role> {
        Ok(self.auth.current_user(self.workflow.users())?.role())
    }

    fn dispatch(&mut self, user_id: &str, command: CommandType) -> ClinicResult<Reply> {
        let wf = &mut self.workflow;
        match command {
            CommandType::Help => Ok(Reply::view(help_text(self.auth.current_user(wf.users())?.role()))),
            CommandType::WhoAmI => Ok(Reply::view(whoami(wf.users().find(user_id)?))),
            CommandType::Password { old, new } => handle_password_change(&self.auth, wf, &old, &new),
            CommandType::Patient(action) => handle_patient_command(wf, user_id, action),
            CommandType::Doctor(action) => handle_doctor_command(wf, user_id, action),
            CommandType::Pharmacist(action) => handle_pharmacist_command(wf, user_id, action),
            CommandType::Admin(action) => handle_admin_command(wf, user_id, action, &self.default_password),
            CommandType::Unknown(message) => Ok(Reply::view(message)),
            CommandType::Clear | CommandType::Logout | CommandType::Exit => Ok(Reply::view("")),
        }
    }

    /// Runs one command for the signed-in user and saves the store when the
    /// command changed it.
    pub fn execute(&mut self, command: CommandType) -> Flow {
        match command {
            CommandType::Logout => return Flow::Logout,
            CommandType::Exit => return Flow::Exit,
            CommandType::Clear => {
                if let Err(e) = clear_terminal_screen() {
                    warn!("Failed to clear screen: {}", e);
                }
                return Flow::Continue(String::new());
            }
            _ => {}
        }
        let Some(user_id) = self.auth.current_user_id().map(str::to_string) else {
            return Flow::Continue("Error: not logged in".to_string());
        };
        debug!("{} runs {:?}", user_id, command);
        match self.dispatch(&user_id, command) {
            Ok(reply) if reply.changed => match self.save() {
                Ok(()) => Flow::Continue(reply.text),
                Err(e) => {
                    error!("Failed to save after command by {}: {}", user_id, e);
                    Flow::Continue(format!("{}\nError: changes could not be saved: {}", reply.text, e))
                }
            },
            Ok(reply) => Flow::Continue(reply.text),
            Err(e) => {
                debug!("Command by {} failed: {:?}", user_id, e);
                Flow::Continue(format!("Error: {}", e))
            }
        }
    }

    /// Splits and runs one console line.
    pub fn execute_line(&mut self, line: &str) -> Flow {
        let Some(args) = shlex::split(line) else {
            return Flow::Continue("Error: Malformed input. Please check quoting.".to_string());
        };
        if args.is_empty() {
            return Flow::Continue(String::new());
        }
        let role = match self.current_role() {
            Ok(role) => role,
            Err(e) => return Flow::Continue(format!("Error: {}", e)),
        };
        self.execute(parse_command(role, &args))
    }
}

enum Prompted {
    Line(String),
    Quit,
}

fn prompt(rl: &mut DefaultEditor, text: &str) -> Result<Prompted> {
    match rl.readline(text) {
        Ok(line) => Ok(Prompted::Line(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Prompted::Quit),
        Err(err) => Err(err).context("Failed to read from terminal"),
    }
}

/// Forces a user still on the default password to choose a new one.
/// Returns false if they gave up, which logs them out.
fn force_password_change(rl: &mut DefaultEditor, session: &mut Session, current: &str) -> Result<bool> {
    println!("You are using the default password and must choose a new one.");
    loop {
        let Prompted::Line(new) = prompt(rl, "New password: ")? else {
            return Ok(false);
        };
        let Prompted::Line(confirm) = prompt(rl, "Confirm new password: ")? else {
            return Ok(false);
        };
        if new != confirm {
            eprintln!("Passwords do not match.");
            continue;
        }
        match handle_password_change(&session.auth, &mut session.workflow, current, &new) {
            Ok(reply) => {
                session.save().context("Failed to save new password")?;
                println!("{}", reply.text);
                return Ok(true);
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

pub fn run_cli_interactive(config: &ClinicConfig, storage: Box<dyn StorageEngine>) -> Result<()> {
    let mut session = Session::open(
        storage,
        config.workflow.slot_release_policy,
        &config.cli.default_password,
    )
    .context("Failed to load clinic data")?;
    if session.workflow.users().is_empty() {
        warn!("No users loaded; run `clinic seed` to create sample accounts");
    }

    let mut rl = DefaultEditor::new()?;
    let history_path = &config.cli.history_file;
    if rl.load_history(history_path).is_err() {
        debug!("No history at {}", history_path.display());
    }
    print_welcome_screen();

    'login: loop {
        let Prompted::Line(user_id) = prompt(&mut rl, "User ID: ")? else {
            break;
        };
        if user_id.is_empty() {
            continue;
        }
        if matches!(user_id.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }
        let Prompted::Line(password) = prompt(&mut rl, "Password: ")? else {
            break;
        };
        let role = match session.login(&user_id, &password) {
            Ok(role) => role,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        if session.requires_password_change() && !force_password_change(&mut rl, &mut session, &password)? {
            session.auth.logout();
            continue;
        }
        if let Ok(user) = session.auth.current_user(session.workflow.users()) {
            println!("Welcome, {}. Type 'help' for your commands.", whoami(user));
        }

        let prompt_text = format!("{}@{}> ", user_id, role.as_str().to_lowercase());
        loop {
            let line = match rl.readline(&prompt_text) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("Ctrl-C received. Type 'exit' to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Ctrl-D received. Goodbye!");
                    break 'login;
                }
                Err(err) => {
                    eprintln!("Readline error: {:?}", err);
                    break 'login;
                }
            };
            let line_trim = line.trim();
            if line_trim.is_empty() {
                continue;
            }
            rl.add_history_entry(line_trim).ok();

            match session.execute_line(line_trim) {
                Flow::Continue(text) if text.is_empty() => {}
                Flow::Continue(text) if text.starts_with("Error:") => eprintln!("{}", text),
                Flow::Continue(text) => println!("{}", text),
                Flow::Logout => {
                    session.auth.logout();
                    println!("Logged out.");
                    continue 'login;
                }
                Flow::Exit => break 'login,
            }
        }
    }

    session.save().context("Failed to save clinic data on exit")?;
    rl.save_history(history_path).context("Failed to save history")?;
    println!("Goodbye!");
    Ok(())
}
