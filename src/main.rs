extern crate clap;
extern crate pretty_env_logger;
extern crate termcolor;
extern crate tokio;

use clap::{crate_description, crate_name, Arg, Command};
use leet_tracker::{
    options::Options,
    storage::{FileStore, KeyValueStore, MemoryStore},
    store::ProblemStore,
};
use pretty_env_logger::init_timed;
use std::{io::Write, sync::Arc};
use termcolor::{Color, ColorChoice, StandardStream, WriteColor};

#[macro_use]
mod color;
mod command {
    pub mod records;
    pub mod watch;
}
mod read;
mod write;

use command::{
    records::{list, reconcile, settings},
    watch::watch,
};
use read::read_options;

fn open_store(options: &Options) -> ProblemStore {
    let fast: Arc<dyn KeyValueStore> = match &options.fast_path {
        Some(p) => Arc::new(FileStore::new(p)),
        None => Arc::new(MemoryStore::new()),
    };
    ProblemStore::new(fast, Arc::new(FileStore::new(&options.durable_path)))
}

#[allow(unused_must_use)]
#[tokio::main]
async fn main() {
    init_timed();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let app = Command::new(crate_name!())
        .about(crate_description!())
        .version(get_version!("version"))
        .long_version(get_version!("long_version"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .help("Path to options file"),
        )
        .subcommand(Command::new("watch").about("Track submissions from events on stdin"))
        .subcommand(Command::new("list").about("Show tracked problems and their status"))
        .subcommand(
            Command::new("reconcile")
                .about("Sync the local tier with the synchronized tier")
                .arg(
                    Arg::new("rebuild")
                        .long("rebuild")
                        .help("Clear the local tier first"),
                ),
        )
        .subcommand(Command::new("settings").about("Show the forgetting curve"))
        .get_matches();

    let options = match read_options(app.value_of("config")) {
        Ok(v) => v,
        Err(e) => {
            write_error!(&mut stdout, "Error", "load options: {}", e);
            stdout.reset();
            return;
        }
    };
    let store = Arc::new(open_store(&options));
    let rebuild = match app.subcommand() {
        Some(("reconcile", sub)) => sub.is_present("rebuild"),
        _ => false,
    };
    reconcile(&mut stdout, &store, rebuild).await;
    match app.subcommand() {
        Some(("watch", _)) => watch(&mut stdout, &options, store).await,
        Some(("list", _)) | None => list(&mut stdout, &store).await,
        Some(("settings", _)) => settings(&mut stdout, &store).await,
        Some(("reconcile", _)) => (),
        Some((unknown, _)) => write_error!(
            &mut stdout,
            "Error",
            r#"leet-tracker: unknown command "{}""#,
            unknown
        ),
    }
    stdout.reset();
}
