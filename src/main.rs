use std::sync::Arc;

use partner_onboard::cli::{self, Mode};
use partner_onboard::config::AppConfig;
use partner_onboard::contact::{ContactForm, support};
use partner_onboard::registration::{
    ChannelHost, RegistrationWizard, SimulatedSubmitter, TerminalSignal, WizardDeps,
};
use partner_onboard::settings::{Language, SettingsContext, Theme};
use partner_onboard::store::{KeyValueStore, LibSqlStore, MemoryStore};
use partner_onboard::tracking::TrackingService;

const USAGE: &str = "usage: partner-onboard [register | track <ID> | settings [theme light|dark | toggle-theme | language en|ar | auto-save on|off | notifications on|off] | contact <name> <email> <message...>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config);

    let store: Arc<dyn KeyValueStore> = match LibSqlStore::new_local(&config.db_path).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                path = %config.db_path.display(),
                error = %e,
                "Falling back to in-memory store; drafts will not survive restart"
            );
            Arc::new(MemoryStore::new())
        }
    };

    let settings = SettingsContext::load(Arc::clone(&store)).await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(mode) = cli::parse_mode(&args) else {
        anyhow::bail!("unknown mode {:?}\n{USAGE}", args.join(" "));
    };

    match mode {
        Mode::Register => register(&config, store, &settings).await,
        Mode::Track(id) => {
            track(store, &id).await;
            Ok(())
        }
        Mode::Settings(rest) => update_settings(&settings, &rest).await,
        Mode::Contact(rest) => {
            contact(&rest);
            Ok(())
        }
    }
}

fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "partner-onboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

async fn register(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
    settings: &SettingsContext,
) -> anyhow::Result<()> {
    let prefs = settings.current().await;
    let (host, events) = ChannelHost::new();
    let host = Arc::new(host);

    let wizard = RegistrationWizard::mount(WizardDeps {
        store,
        submitter: Arc::new(SimulatedSubmitter::new(
            config.submit_latency,
            config.submit_failure_rate,
        )),
        host: host.clone(),
        notifier: host,
        auto_save: prefs.auto_save,
    })
    .await;

    eprintln!("🍽  Restaurant Registration");
    eprintln!("   Type 'help' for commands.\n");

    match cli::run_wizard(wizard, events).await {
        Some(TerminalSignal::Submitted(app)) => {
            println!(
                "Application for {} submitted. Run `partner-onboard track <ID>` to follow it.",
                app.restaurant_name
            );
        }
        Some(TerminalSignal::Exited) => eprintln!("Registration left; your draft is saved."),
        None => eprintln!("Bye. Your draft is saved."),
    }
    Ok(())
}

async fn track(store: Arc<dyn KeyValueStore>, id: &str) {
    let service = TrackingService::new(store);
    let Some(app) = service.lookup(id).await else {
        eprintln!("Enter a tracking ID, e.g. `partner-onboard track KD2024001`");
        let history = service.history().await;
        if !history.is_empty() {
            eprintln!("Recently tracked: {}", history.join(", "));
        }
        return;
    };

    let progress = app.progress();
    println!("{} — {}", app.restaurant_name, app.status.label());
    println!("Application ID: {}", app.id);
    println!("Submitted: {}", app.submitted_date);
    println!("Last Update: {}", app.last_update);
    println!(
        "Progress: {} of {} steps completed ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    );
    for step in &app.steps {
        let mark = if step.completed { "✔" } else { "·" };
        match step.date {
            Some(date) => println!("  {mark} {} ({date})", step.name),
            None => println!("  {mark} {}", step.name),
        }
    }
}

fn parse_switch(value: Option<&String>) -> anyhow::Result<bool> {
    match value.map(String::as_str) {
        Some("on") | Some("true") => Ok(true),
        Some("off") | Some("false") => Ok(false),
        other => anyhow::bail!("expected on|off, got {other:?}"),
    }
}

async fn update_settings(settings: &SettingsContext, args: &[String]) -> anyhow::Result<()> {
    let result = match args.first().map(String::as_str) {
        None => {
            let current = settings.current().await;
            println!("{}", serde_json::to_string_pretty(&current)?);
            return Ok(());
        }
        Some("toggle-theme") => settings.toggle_theme().await,
        Some("theme") => {
            let theme = match args.get(1).map(String::as_str) {
                Some("light") => Theme::Light,
                Some("dark") => Theme::Dark,
                other => anyhow::bail!("expected light|dark, got {other:?}"),
            };
            settings.set_theme(theme).await
        }
        Some("language") => {
            let language = match args.get(1).map(String::as_str) {
                Some("en") => Language::En,
                Some("ar") => Language::Ar,
                other => anyhow::bail!("expected en|ar, got {other:?}"),
            };
            settings.update(|s| s.language = language).await
        }
        Some("auto-save") => {
            let on = parse_switch(args.get(1))?;
            settings.update(|s| s.auto_save = on).await
        }
        Some("notifications") => {
            let on = parse_switch(args.get(1))?;
            settings.update(|s| s.notifications = on).await
        }
        Some(other) => anyhow::bail!("unknown setting {other:?}\n{USAGE}"),
    };

    match result {
        Ok(updated) => println!("{}", serde_json::to_string_pretty(&updated)?),
        Err(e) => {
            tracing::warn!(error = %e, "Error saving settings");
            eprintln!("Settings not saved: {e}");
        }
    }
    Ok(())
}

fn contact(args: &[String]) {
    let mut form = ContactForm {
        name: args.first().cloned().unwrap_or_default(),
        email: args.get(1).cloned().unwrap_or_default(),
        message: args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default(),
    };

    match form.send() {
        Ok(sent) => {
            println!("Message Sent!");
            println!("Thank you for your message. Our team will get back to you within 24 hours.");
            println!("Reference: {}", sent.id);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "You can also reach us at {} or {} ({}).",
                support::PHONE,
                support::EMAIL,
                support::ADDRESS
            );
        }
    }
}
