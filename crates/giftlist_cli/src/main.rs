//! Command-line front end for the gift list store.
//!
//! # Responsibility
//! - Drive every `PeopleRepository` operation against a SQLite file.
//! - Layer command-line flags over `CoreConfig::from_env()`, after loading
//!   an optional `.env` file.

use clap::{Parser, Subcommand};
use giftlist_core::{
    init_logging, normalize_date_input, CoreConfig, DateInputFormat, IdeaId, LogLevel,
    PeopleRepository, Person, PersonId, SqliteKvStore,
};
use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(name = "giftlist", version, about = "Track birthdays and gift ideas")]
struct Args {
    /// SQLite file holding the people blob (overrides GIFTLIST_DB_PATH)
    #[clap(long)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides GIFTLIST_LOG_LEVEL)
    #[clap(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling logs (overrides GIFTLIST_LOG_DIR)
    #[clap(long)]
    log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List people, ordered by birthday unless --insertion-order is set
    People {
        #[clap(long)]
        insertion_order: bool,
    },
    /// Add a person; the birthday is YYYY-MM-DD unless --date-format says otherwise
    AddPerson {
        name: String,
        date_of_birth: String,
        #[clap(long, value_enum, default_value_t = DateFormatArg::Iso)]
        date_format: DateFormatArg,
    },
    /// Delete a person and all of their ideas
    DeletePerson { person_id: PersonId },
    /// List one person's ideas in the order they were added
    Ideas { person_id: PersonId },
    /// Add a gift idea with its photo reference and pixel size
    AddIdea {
        person_id: PersonId,
        text: String,
        image_ref: String,
        width: u32,
        height: u32,
    },
    /// Delete one idea
    DeleteIdea {
        person_id: PersonId,
        idea_id: IdeaId,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DateFormatArg {
    /// YYYY-MM-DD
    Iso,
    /// YYYY/MM/DD
    Picker,
    /// DD/MM/YYYY
    DayFirst,
}

impl From<DateFormatArg> for DateInputFormat {
    fn from(value: DateFormatArg) -> Self {
        match value {
            DateFormatArg::Iso => Self::Iso,
            DateFormatArg::Picker => Self::Picker,
            DateFormatArg::DayFirst => Self::DayFirst,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(level) = args.log_level {
        config.log_level = level.parse::<LogLevel>()?;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, dir)?;
    }

    let loaded = PeopleRepository::load(SqliteKvStore::open(&config.db_path)?)?;
    if let Some(warning) = &loaded.warning {
        warn!("event=cli_load module=cli status=degraded error_code={}", warning.code());
        eprintln!("warning: {warning}");
    }
    let repo = loaded.repository;

    match args.command {
        Command::People { insertion_order } => {
            let people = if insertion_order {
                repo.list_people()
            } else {
                repo.people_by_birthday()
            };
            if people.is_empty() {
                println!("no people yet; add your first person with `add-person`");
            }
            for person in &people {
                print_person(person);
            }
        }
        Command::AddPerson {
            name,
            date_of_birth,
            date_format,
        } => {
            let date_of_birth = normalize_date_input(&date_of_birth, date_format.into())?;
            let person = repo.add_person(&name, &date_of_birth)?;
            print_person(&person);
        }
        Command::DeletePerson { person_id } => {
            repo.delete_person(person_id)?;
            println!("deleted person {person_id}");
        }
        Command::Ideas { person_id } => {
            let person = repo.get_person(person_id)?;
            println!("gift ideas for {}", person.name);
            for idea in repo.get_ideas_for(person_id)? {
                println!(
                    "{}\t{}\t{}\t{}x{}",
                    idea.id, idea.text, idea.image_ref, idea.width, idea.height
                );
            }
        }
        Command::AddIdea {
            person_id,
            text,
            image_ref,
            width,
            height,
        } => {
            let idea = repo.add_idea(person_id, &text, &image_ref, width, height)?;
            println!("{}\t{}", idea.id, idea.text);
        }
        Command::DeleteIdea { person_id, idea_id } => {
            repo.delete_idea(person_id, idea_id)?;
            println!("deleted idea {idea_id}");
        }
    }

    Ok(())
}

fn print_person(person: &Person) {
    println!(
        "{}\t{}\t{}\t{} idea(s)",
        person.id,
        person.name,
        person.birthday_label(),
        person.ideas.len()
    );
}
