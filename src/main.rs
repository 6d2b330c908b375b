//! storybook - inspect, author and play `.storybook` files

use std::error::Error as StdError;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use storybook::{ChoiceSlot, Page, Story, read_story, write_story};

type CliResult = Result<(), Box<dyn StdError>>;

#[derive(Parser)]
#[command(name = "storybook")]
#[command(version, about = "Choose-your-own-adventure storybook tool", long_about = None)]
#[command(after_help = "EXAMPLES:
    storybook new cave.storybook -t \"The Cave\" -a Ann --pages 3
    storybook add-page cave.storybook --text \"It is dark.\" --choice1 1
    storybook info cave.storybook
    storybook read cave.storybook")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log decoder and encoder activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show title, author and page statistics
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the whole story as JSON (images as base64)
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Fail if any choice points past the last page
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Create a new story
    New {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        author: String,
        /// Number of placeholder pages to start with
        #[arg(long, default_value_t = 0)]
        pages: u16,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Append a page to an existing story
    AddPage {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        text: Option<String>,
        /// Already-encoded image file (PNG, JPEG, ...) stored as-is
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        choice1: u16,
        #[arg(long, default_value_t = 0)]
        choice2: u16,
    },
    /// Play a story interactively on the terminal
    Read {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Info { file } => show_info(&file),
        Command::Dump { file } => dump(&file),
        Command::Check { file } => check(&file, cli.quiet),
        Command::New {
            file,
            title,
            author,
            pages,
            force,
        } => create(&file, &title, &author, pages, force, cli.quiet),
        Command::AddPage {
            file,
            text,
            image,
            choice1,
            choice2,
        } => add_page(&file, text, image.as_deref(), choice1, choice2, cli.quiet),
        Command::Read { file } => play(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "storybook=debug"
    } else if quiet {
        "storybook=error"
    } else {
        "storybook=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn show_info(path: &Path) -> CliResult {
    let story = read_story(path)?;

    println!("File: {}", path.display());
    println!("Title: {}", story.title());
    println!("Author: {}", story.author());
    println!("Pages: {}", story.len());
    println!(
        "Images: {}",
        story.pages().iter().filter(|p| p.has_image()).count()
    );
    println!(
        "Endings: {}",
        story.pages().iter().filter(|p| p.is_ending()).count()
    );
    let dangling = story.dangling_choices().len();
    if dangling > 0 {
        println!("Dangling choices: {dangling}");
    }

    Ok(())
}

#[derive(Serialize)]
struct StoryJson<'a> {
    title: &'a str,
    author: &'a str,
    pages: Vec<PageJson<'a>>,
}

#[derive(Serialize)]
struct PageJson<'a> {
    number: usize,
    text: &'a str,
    image: Option<String>,
    choice1: u16,
    choice2: u16,
}

fn dump(path: &Path) -> CliResult {
    let story = read_story(path)?;
    let json = StoryJson {
        title: story.title(),
        author: story.author(),
        pages: story
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| PageJson {
                number: i + 1,
                text: page.text(),
                image: page.image().map(|bytes| BASE64.encode(bytes)),
                choice1: page.choice1(),
                choice2: page.choice2(),
            })
            .collect(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &json)?;
    writeln!(out)?;
    Ok(())
}

fn check(path: &Path, quiet: bool) -> CliResult {
    let story = read_story(path)?;
    let dangling = story.dangling_choices();

    if dangling.is_empty() {
        if !quiet {
            println!("{}: {} pages, all choices in bounds", path.display(), story.len());
        }
        return Ok(());
    }

    for d in &dangling {
        println!(
            "page {}: {} -> page {} (story has {} pages)",
            d.page + 1,
            d.slot,
            d.target,
            story.len()
        );
    }
    Err(format!("{} choice(s) out of bounds", dangling.len()).into())
}

fn create(path: &Path, title: &str, author: &str, pages: u16, force: bool, quiet: bool) -> CliResult {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }

    let mut story = Story::new_or_default(title, author);
    for _ in 0..pages {
        story.add_placeholder_page();
    }
    write_story(&story, path)?;

    if !quiet {
        println!(
            "Created {} - By: {} ({} pages)",
            story.title(),
            story.author(),
            story.len()
        );
    }
    Ok(())
}

fn add_page(
    path: &Path,
    text: Option<String>,
    image: Option<&Path>,
    choice1: u16,
    choice2: u16,
    quiet: bool,
) -> CliResult {
    let mut story = read_story(path)?;

    let mut page = match text {
        Some(text) => Page::new(text),
        None => Page::placeholder(),
    }
    .with_choices(choice1, choice2);
    if let Some(image) = image {
        page.set_image(std::fs::read(image)?);
    }

    let index = story.add_page(page);
    for slot in ChoiceSlot::ALL {
        let value = story.page(index)?.choice(slot);
        if value != 0 && !story.is_choice_in_bounds(value) {
            tracing::warn!(page = index + 1, %slot, value, "choice points past the last page");
        }
    }
    write_story(&story, path)?;

    if !quiet {
        println!("Added page {} to {}", index + 1, path.display());
    }
    Ok(())
}

fn play(path: &Path) -> CliResult {
    let mut story = read_story(path)?;
    if story.is_empty() {
        return Err("story has no pages".into());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{} - By: {}", story.title(), story.author())?;
    story.restart()?;

    loop {
        show_page(&story, &mut out)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let outcome = match line?.trim() {
            "1" => story.follow(ChoiceSlot::First).map(drop),
            "2" => story.follow(ChoiceSlot::Second).map(drop),
            "r" => story.restart().map(drop),
            "q" => return Ok(()),
            _ => {
                writeln!(out, "Enter 1, 2, r or q.")?;
                continue;
            }
        };
        if let Err(e) = outcome {
            writeln!(out, "Can't go there: {e}")?;
        }
    }
}

fn show_page<W: Write>(story: &Story, out: &mut W) -> io::Result<()> {
    let index = story.current_page_index();
    let Ok(page) = story.current_page() else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(out, "Page: {}", index + 1)?;
    if let Some(image) = page.image() {
        writeln!(out, "[image, {} bytes]", image.len())?;
    }
    writeln!(out, "{}", page.text())?;
    writeln!(out)?;

    if page.is_ending() {
        writeln!(out, "The End. (r)estart or (q)uit")?;
    } else {
        for (slot, target) in page.choices() {
            let key = match slot {
                ChoiceSlot::First => 1,
                ChoiceSlot::Second => 2,
            };
            writeln!(out, "({key}) Turn to page: {target}")?;
        }
    }
    Ok(())
}
