//! Terminal front end: drives a registration wizard from stdin.
//!
//! Lines are read on a background task and fed to the wizard one at a time;
//! notices and the terminal signal arrive on the `ChannelHost` receiver.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::registration::{
    HostEvent, Notice, RegistrationField, RegistrationWizard, StepOutcome, SubmissionOutcome,
    TerminalSignal, WizardState, WizardStep,
};

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Register,
    Track(String),
    Settings(Vec<String>),
    Contact(Vec<String>),
}

/// Parse the process arguments (without the program name). `None` for an
/// unknown mode.
pub fn parse_mode(args: &[String]) -> Option<Mode> {
    let rest = || args.get(1..).unwrap_or_default().to_vec();
    match args.first().map(String::as_str) {
        None | Some("register") => Some(Mode::Register),
        Some("track") => Some(Mode::Track(args.get(1).cloned().unwrap_or_default())),
        Some("settings") => Some(Mode::Settings(rest())),
        Some("contact") => Some(Mode::Contact(rest())),
        Some(_) => None,
    }
}

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(RegistrationField, String),
    Next,
    Back,
    Show,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. `field=value` edits a field.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        return match RegistrationField::from_key(key.trim()) {
            Some(field) => Command::Set(field, value.trim().to_string()),
            None => Command::Unknown(line.to_string()),
        };
    }

    match line.to_ascii_lowercase().as_str() {
        "next" | "n" | "submit" => Command::Next,
        "back" | "b" | "previous" => Command::Back,
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Render the current step with values and inline errors.
pub fn render_step(wizard: &RegistrationWizard, state: &WizardState) -> String {
    let step = state.current_step;
    let mut out = format!(
        "── Step {}/{}: {} ──\n",
        step.number(),
        WizardStep::TOTAL,
        step.title()
    );

    if step == WizardStep::Review {
        out.push_str(&wizard.review_summary().to_string());
        out.push_str("By submitting, you agree to our terms and conditions.\n");
    } else {
        for field in step.fields() {
            let marker = if field.is_required() { "*" } else { " " };
            out.push_str(&format!(
                "{marker} {:<24} [{}] {}\n",
                field.label(),
                field.key(),
                wizard.application().get(*field)
            ));
            if let Some(err) = state.error_for(*field) {
                out.push_str(&format!("    ! {err}\n"));
            }
        }
    }

    // Errors from full-form validation may name fields of earlier steps.
    for (field, err) in &state.errors {
        if !step.fields().contains(field) {
            out.push_str(&format!("  ! {}: {err}\n", field.label()));
        }
    }

    out
}

fn render_notice(notice: &Notice) -> String {
    let buttons: Vec<&str> = notice.buttons.iter().map(|b| b.label).collect();
    format!("{}\n{}\n[{}]", notice.title, notice.body, buttons.join("] ["))
}

const HELP: &str = "Commands:
  <field>=<value>   edit a field (e.g. restaurantName=Bella)
  next              validate this step and continue (submits on review)
  back              previous step (leaves the wizard on step 1)
  show              print the current step
  quit              leave without submitting (draft is kept)";

/// Run the wizard REPL until the session ends or stdin closes.
pub async fn run_wizard(
    mut wizard: RegistrationWizard,
    mut events: mpsc::UnboundedReceiver<HostEvent>,
) -> Option<TerminalSignal> {
    let (tx, mut lines) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin).lines();
        loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    println!("{}", render_step(&wizard, &wizard.state()));
    eprint!("> ");

    loop {
        tokio::select! {
            Some(event) = events.recv() => match event {
                HostEvent::Notice(notice) => println!("\n{}\n", render_notice(&notice)),
                HostEvent::Terminal(signal) => {
                    wizard.flush_draft().await;
                    return Some(signal);
                }
            },
            line = lines.recv() => {
                let Some(line) = line else {
                    wizard.flush_draft().await;
                    return None;
                };
                if line.trim().is_empty() {
                    eprint!("> ");
                    continue;
                }
                match parse_command(&line) {
                    Command::Set(field, value) => wizard.update_field(field, value),
                    Command::Next => {
                        if wizard.current_step().is_last() {
                            eprintln!("⏳ Submitting application...");
                        }
                        match wizard.next().await {
                            StepOutcome::Submission(SubmissionOutcome::Submitted) => continue,
                            StepOutcome::Submission(SubmissionOutcome::AlreadyInFlight) => {
                                eprintln!("Submission already in progress");
                            }
                            _ => println!("{}", render_step(&wizard, &wizard.state())),
                        }
                    }
                    Command::Back => {
                        if wizard.back() == StepOutcome::Exited {
                            continue;
                        }
                        println!("{}", render_step(&wizard, &wizard.state()));
                    }
                    Command::Show => println!("{}", render_step(&wizard, &wizard.state())),
                    Command::Help => println!("{HELP}"),
                    Command::Quit => {
                        wizard.flush_draft().await;
                        return None;
                    }
                    Command::Unknown(input) => eprintln!("Unknown command: {input} (try 'help')"),
                }
                eprint!("> ");
            }
        }
    }
}
