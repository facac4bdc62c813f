use std::sync::Arc;

use anyhow::Context;
use engace_api::{ApiClient, Notifier, RequestTracker};

use notify::TerminalNotifier;
use settings::Settings;
use utilities::input;

mod consultation;
mod dictionary;
mod exercises;
mod logger;
mod notify;
mod samples;
mod settings;
mod utilities;
mod writing;

pub struct App {
    pub client: ApiClient,
    pub use_samples: bool,
    notifier: Arc<dyn Notifier>,
}

impl App {
    fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = ApiClient::from_config(&settings.client_config())
            .context("failed to load auth token")?;
        Ok(Self {
            client,
            use_samples: settings.use_sample_data,
            notifier: Arc::new(TerminalNotifier),
        })
    }

    pub fn tracker<T>(&self) -> RequestTracker<T> {
        RequestTracker::new(Arc::clone(&self.notifier))
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    logger::init_logging(&settings.log_level);
    let app = App::new(&settings)?;
    tracing::info!(
        api_url = %settings.api_url,
        sample_data = settings.use_sample_data,
        "starting EngAce"
    );

    println!("EngAce - type `help` to see what you can do.");
    loop {
        let line = input(">> ")?;
        if line.is_empty() {
            // end of input
            break;
        }
        let mut command_parts = line.trim().split_ascii_whitespace();
        if let Some(command) = command_parts.next() {
            let rest = command_parts.collect::<Vec<&str>>().join(" ");
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "search" | "define" | "find" => {
                    dictionary::search(&app, &rest).await?;
                }
                "history" => {
                    dictionary::history(&app).await;
                }
                "favorites" => {
                    dictionary::favorites(&app).await;
                }
                "favorite" => {
                    dictionary::add_favorite(&app, &rest).await;
                }
                "unfavorite" => {
                    dictionary::remove_favorite(&app, &rest).await;
                }
                "suggest" => {
                    dictionary::suggest(&app).await;
                }
                "exercise" | "practice" => {
                    exercises::run(&app).await?;
                }
                "write" => {
                    writing::run(&app).await?;
                }
                "drafts" => {
                    writing::list_drafts(&app).await;
                }
                "draft" => {
                    writing::draft(&app, &rest).await?;
                }
                "chat" => {
                    consultation::run(&app).await?;
                }
                "login" => {
                    login(&app, &rest);
                }
                "logout" => {
                    logout(&app);
                }
                "help" => {
                    print_help();
                }
                _ => {
                    println!("Unknown command {command}.");
                }
            }
        }
    }
    Ok(())
}

fn login(app: &App, token: &str) {
    match app.client.token().set(token) {
        Ok(()) => println!("Signed in."),
        Err(error) => app.notifier().error(engace_api::ERROR_TITLE, &error.to_string()),
    }
}

fn logout(app: &App) {
    match app.client.token().clear() {
        Ok(()) => println!("Signed out."),
        Err(error) => app.notifier().error(engace_api::ERROR_TITLE, &error.to_string()),
    }
}

fn print_help() {
    println!(
        "\
Dictionary
  search <word>        look up a word or phrase
  history              recent searches
  favorites            saved words
  favorite <word>      save a word
  unfavorite <word>    remove a saved word
  suggest              search suggestions
Exercises
  exercise             create and take a multiple-choice exercise
Writing
  write                get feedback on a piece of writing
  drafts               list saved drafts
  draft <id>           show a draft
  draft edit <id>      rewrite a draft
  draft delete <id>    delete a draft
Consultation
  chat                 talk to the assistant
Account
  login <token>        store an access token
  logout               forget the access token
  exit                 leave"
    );
}
