//! Application wiring for the command-line client.
//!
//! `App` owns the configuration and the board client and carries out one
//! parsed command per run.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use corkboard_core::api::Attachment;
use corkboard_core::models::{BoardDraft, SignUpForm};
use corkboard_core::{BoardClient, Config, Error, SessionStore, SignInRedirect};
use tracing::{debug, info, warn};

use crate::commands::{Command, USAGE};
use crate::render;

const SIGN_IN_HINT: &str = "You are not signed in. Run `corkboard signin` to continue.";

/// Tells the user to sign in when the session is gone.
///
/// Silent while a sign-in or sign-up command is running, where the user is
/// already doing exactly that.
#[derive(Debug, Default)]
struct TerminalRedirect {
    authenticating: AtomicBool,
}

impl TerminalRedirect {
    fn set_authenticating(&self, value: bool) {
        self.authenticating.store(value, Ordering::SeqCst);
    }

    fn hint(&self) -> Option<&'static str> {
        if self.authenticating.load(Ordering::SeqCst) {
            None
        } else {
            Some(SIGN_IN_HINT)
        }
    }
}

impl SignInRedirect for TerminalRedirect {
    fn redirect_to_sign_in(&self, route: &str) {
        debug!(route, "Redirecting to sign-in");
        if let Some(hint) = self.hint() {
            eprintln!("{}", hint);
        }
    }
}

pub struct App {
    config: Config,
    client: BoardClient,
    redirect: Arc<TerminalRedirect>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        });
        let base_url = config.base_url();
        let session = SessionStore::open(config.session_dir()?);
        let redirect = Arc::new(TerminalRedirect::default());
        let client = BoardClient::new(&base_url, session, redirect.clone())
            .context("Failed to create HTTP client")?;

        info!(base_url = %base_url, "Board client ready");
        Ok(Self {
            config,
            client,
            redirect,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SignIn { username } => self.sign_in(username).await,
            Command::SignUp => self.sign_up().await,
            Command::SignOut => {
                self.client.sign_out();
                if self.config.pending_display_name.is_some() {
                    self.config.forget_sign_up_name();
                    self.save_config();
                }
                println!("Signed out.");
                Ok(())
            }
            Command::WhoAmI => {
                render::print_identity(&self.client.session().read());
                Ok(())
            }
            Command::List { category, page } => {
                let page = self
                    .client
                    .list_boards(category.as_ref(), page)
                    .await
                    .map_err(|e| report(e, "Could not load the post list"))?;
                render::print_page(&page, category.as_ref());
                Ok(())
            }
            Command::Show { id } => {
                let board = self
                    .client
                    .get_board(id)
                    .await
                    .map_err(|e| report_lookup(e, "Could not load the post"))?;
                let image = board.image_url.as_deref().map(|p| self.client.image_url(p));
                render::print_detail(&board, image.as_deref());
                Ok(())
            }
            Command::Write {
                title,
                content,
                category,
                file,
            } => {
                let draft = BoardDraft::new(title, content, category);
                let attachment = file.as_deref().map(load_attachment).transpose()?;
                let created = self
                    .client
                    .create_board(&draft, attachment)
                    .await
                    .map_err(|e| report(e, "Failed to publish the post"))?;
                match created.get("id").and_then(|v| v.as_i64()) {
                    Some(id) => println!("Published post #{}.", id),
                    None => println!("Published."),
                }
                Ok(())
            }
            Command::Edit {
                id,
                title,
                content,
                category,
                file,
            } => {
                let current = self
                    .client
                    .get_board(id)
                    .await
                    .map_err(|e| report_lookup(e, "Could not load the post"))?;

                let mut draft = BoardDraft::from(&current);
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(content) = content {
                    draft.content = content;
                }
                if let Some(category) = category {
                    draft.category = category;
                }
                let attachment = file.as_deref().map(load_attachment).transpose()?;

                self.client
                    .update_board(id, &draft, attachment)
                    .await
                    .map_err(|e| report(e, "Failed to update the post"))?;
                println!("Updated post #{}.", id);
                Ok(())
            }
            Command::Delete { id, yes } => {
                if !yes && !confirm(&format!("Delete post #{}?", id))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                self.client
                    .delete_board(id)
                    .await
                    .map_err(|e| report_lookup(e, "Failed to delete the post"))?;
                println!("Deleted post #{}.", id);
                Ok(())
            }
            Command::Help => {
                println!("{}", USAGE);
                Ok(())
            }
        }
    }

    async fn sign_in(&mut self, username: Option<String>) -> Result<()> {
        let username = match username {
            Some(u) => u,
            None => prompt_with_default("Email", self.config.last_username.as_deref())?,
        };
        let password = rpassword::prompt_password("Password: ")?;
        let name_hint = self.config.name_hint_for(&username).map(str::to_string);

        self.redirect.set_authenticating(true);
        let result = self
            .client
            .sign_in(&username, &password, name_hint.as_deref())
            .await;
        self.redirect.set_authenticating(false);
        let session = result.map_err(|e| report(e, "Incorrect email or password"))?;

        self.config.last_username = Some(username);
        self.config.forget_sign_up_name();
        self.save_config();

        println!("Welcome, {}!", session.display_name().unwrap_or("there"));
        Ok(())
    }

    async fn sign_up(&mut self) -> Result<()> {
        let form = SignUpForm {
            username: prompt("Email")?,
            name: prompt("Name")?,
            password: rpassword::prompt_password("Password: ")?,
            confirm_password: rpassword::prompt_password("Confirm password: ")?,
        };

        self.redirect.set_authenticating(true);
        let result = self.client.sign_up(&form).await;
        self.redirect.set_authenticating(false);
        result.map_err(|e| match e {
            Error::Validation(ref v) => anyhow!("{:?}: {}", v.field(), v),
            other => report(other, "Sign-up failed"),
        })?;

        self.config.last_username = Some(form.username.trim().to_string());
        self.config.remember_sign_up_name(&form.username, &form.name);
        self.save_config();

        println!("Account created. Run `corkboard signin` to sign in.");
        Ok(())
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
}

/// Turn a failed board operation into the message shown to the user
fn report(error: Error, fallback: &str) -> anyhow::Error {
    debug!(error = ?error, "Operation failed");
    anyhow!(error.user_message(fallback))
}

/// Like `report`, but a missing post gets its own message
fn report_lookup(error: Error, fallback: &str) -> anyhow::Error {
    if error.is_not_found() {
        report(error, "The post does not exist")
    } else {
        report(error, fallback)
    }
}

fn load_attachment(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(Attachment {
        mime_type: guess_mime(&file_name).to_string(),
        file_name,
        bytes,
    })
}

fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => {
            let input = prompt(&format!("{} [{}]", label, default))?;
            Ok(if input.is_empty() { default.to_string() } else { input })
        }
        None => prompt(label),
    }
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N]", question))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
