//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use corkboard_core::models::BoardCategory;

pub const USAGE: &str = "\
Usage: corkboard <command> [options]

Commands:
  signin [USERNAME]                 Sign in (prompts for the password)
  signup                            Create an account
  signout                           Forget the stored session
  whoami                            Show who is signed in
  list [--category C] [--page N]    List posts (C: NOTICE, FREE, QNA, ETC)
  show ID                           Show a post
  write --title T --content C [--category C] [--file PATH]
                                    Publish a post with an optional image
  edit ID [--title T] [--content C] [--category C] [--file PATH]
                                    Edit a post; omitted fields are kept
  delete ID [--yes]                 Delete a post
  help                              Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn {
        username: Option<String>,
    },
    SignUp,
    SignOut,
    WhoAmI,
    List {
        category: Option<BoardCategory>,
        /// Zero-based
        page: usize,
    },
    Show {
        id: i64,
    },
    Write {
        title: String,
        content: String,
        category: BoardCategory,
        file: Option<PathBuf>,
    },
    Edit {
        id: i64,
        title: Option<String>,
        content: Option<String>,
        category: Option<BoardCategory>,
        file: Option<PathBuf>,
    },
    Delete {
        id: i64,
        yes: bool,
    },
    Help,
}

/// Options shared by the commands, collected in one pass
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    title: Option<String>,
    content: Option<String>,
    category: Option<BoardCategory>,
    page: Option<usize>,
    file: Option<PathBuf>,
    yes: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("Missing value for {}", name))
            };
            match arg.as_str() {
                "--title" | "-t" => options.title = Some(value("--title")?),
                "--content" | "-c" => options.content = Some(value("--content")?),
                "--category" => {
                    let raw = value("--category")?;
                    options.category = Some(raw.parse().map_err(|e: String| anyhow!(e))?);
                }
                "--page" | "-p" => {
                    let raw = value("--page")?;
                    let page: usize = raw
                        .parse()
                        .with_context(|| format!("Invalid page number '{}'", raw))?;
                    if page == 0 {
                        bail!("Pages are numbered from 1");
                    }
                    options.page = Some(page - 1);
                }
                "--file" | "-f" => options.file = Some(PathBuf::from(value("--file")?)),
                "--yes" | "-y" => options.yes = true,
                flag if flag.starts_with("--") => bail!("Unknown option '{}'", flag),
                _ => options.positional.push(arg.clone()),
            }
        }
        Ok(options)
    }

    fn id(&self) -> Result<i64> {
        let raw = self
            .positional
            .first()
            .ok_or_else(|| anyhow!("Missing post id"))?;
        raw.parse()
            .with_context(|| format!("Invalid post id '{}'", raw))
    }
}

/// Parse the arguments after the program name
pub fn parse(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };
    let options = Options::parse(rest)?;

    let command = match name.as_str() {
        "signin" | "login" => Command::SignIn {
            username: options.positional.first().cloned(),
        },
        "signup" => Command::SignUp,
        "signout" | "logout" => Command::SignOut,
        "whoami" => Command::WhoAmI,
        "list" | "ls" => Command::List {
            category: options.category,
            page: options.page.unwrap_or(0),
        },
        "show" => Command::Show { id: options.id()? },
        "write" => Command::Write {
            title: options.title.unwrap_or_default(),
            content: options.content.unwrap_or_default(),
            category: options.category.unwrap_or_default(),
            file: options.file,
        },
        "edit" => Command::Edit {
            id: options.id()?,
            title: options.title,
            content: options.content,
            category: options.category,
            file: options.file,
        },
        "delete" | "rm" => Command::Delete {
            id: options.id()?,
            yes: options.yes,
        },
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    };
    Ok(command)
}
