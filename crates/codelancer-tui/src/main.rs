use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod handler;
mod logging;
mod register;
mod tui;
mod ui;

use app::App;
use codelancer_core::{ChatBot, Config, ContactForm};
use register::RegisterArgs;
use tui::{EventHandler, Session};

#[derive(Parser)]
#[command(name = "codelancer")]
#[command(about = "Chat assistant for thecodelancer project services", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log file for the chat screen
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat widget (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// List the canned questions
    Faq,
    /// Write a default config file
    Init,
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        university: String,
        #[arg(long, default_value = "")]
        year: String,
        #[arg(long, default_value = "General Inquiry")]
        service_type: String,
    },
    /// Register for project assistance, one wizard step at a time
    Register(RegisterArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            Ok(config)
        }
        None => Config::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let log_path = match cli.log_file {
                Some(path) => path,
                None => logging::default_log_path()?,
            };
            logging::init_file(&log_path)?;
            let config = load_config(cli.config.as_ref())?;
            run_chat(config).await
        }
        Commands::Ask { question } => {
            logging::init_stderr()?;
            let config = load_config(cli.config.as_ref())?;
            ask(config, &question).await
        }
        Commands::Faq => {
            let config = load_config(cli.config.as_ref())?;
            for (i, question) in config.faqs()?.questions().enumerate() {
                println!("{:>2}. {}", i + 1, question);
            }
            Ok(())
        }
        Commands::Init => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::get_config_path()?,
            };
            Config::new().save_to(&path)?;
            println!("Wrote {}", path.display());
            println!("Set {} to enable AI answers.", codelancer_core::config::API_KEY_ENV);
            Ok(())
        }
        Commands::Contact {
            name,
            email,
            subject,
            message,
            phone,
            university,
            year,
            service_type,
        } => {
            logging::init_stderr()?;
            let config = load_config(cli.config.as_ref())?;
            let form = ContactForm {
                name,
                email,
                phone,
                university,
                year,
                subject,
                message,
                service_type,
            };
            if let Err(errors) = form.validate() {
                for e in &errors {
                    eprintln!("✗ {}", e);
                }
                anyhow::bail!("Contact form has {} invalid field(s)", errors.len());
            }
            config.form_client()?.submit_contact(&form).await?;
            println!("✓ Thanks! We'll get back to you within 24 hours.");
            Ok(())
        }
        Commands::Register(args) => {
            logging::init_stderr()?;
            let config = load_config(cli.config.as_ref())?;
            register::run(&args, &config.form_client()?).await?;
            println!("✓ Registration received. We'll contact you soon.");
            Ok(())
        }
    }
}

async fn ask(mut config: Config, question: &str) -> Result<()> {
    // No typing pause outside the widget
    config.typing_delay_ms = 0;

    let mut bot = ChatBot::new(config.responder()?);
    match bot.ask(question).await {
        Some(answer) => println!("{}", answer),
        None => anyhow::bail!("Question is empty"),
    }
    Ok(())
}

async fn run_chat(config: Config) -> Result<()> {
    let responder = config.responder()?;
    tracing::info!(
        faqs = responder.faqs().len(),
        model = %config.model,
        fallback = config.gemini_api_key.is_some(),
        "Starting chat widget"
    );

    let mut app = App::new(responder);

    let mut session = Session::enter()?;
    let mut events = EventHandler::new();

    while !app.should_quit {
        session
            .terminal()
            .draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event).await?,
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_applies_env_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::new().save_to(&path).unwrap();

        std::env::set_var(codelancer_core::config::API_KEY_ENV, "key-from-env");
        let config = load_config(Some(&path)).unwrap();
        std::env::remove_var(codelancer_core::config::API_KEY_ENV);

        assert_eq!(config.gemini_api_key.as_deref(), Some("key-from-env"));
        assert_eq!(Config::load_from(&path).unwrap().gemini_api_key, None);
    }
}
