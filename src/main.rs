use clap::{
    crate_description, crate_name, crate_version, error::ErrorKind, value_parser, Arg, ArgAction,
    Command,
};
use colored::Colorize;
use new_node_app::{config, GenerationError};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .disable_version_flag(true)
        .after_help("Example:\n  $ create-node-app my-new-app")
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print version")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .env(config::TEMPLATE_DIR_ENV)
                .value_parser(value_parser!(PathBuf))
                .help("Directory to copy the project skeleton from (defaults to the bundled templates)"),
        )
        .arg(
            Arg::new("name")
                .help("Name of the project directory to create")
                .required_unless_present("version"),
        )
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() {
    // a template dir from the environment must not count as an argument here
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", cli().render_help());
        std::process::exit(1);
    }

    let command = cli();

    let matches = match command.try_get_matches() {
        Ok(matches) => matches,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    if matches.get_flag("version") {
        println!("{}", crate_version!());
        return;
    }

    let is_verbose = matches.get_flag("verbose");

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if is_verbose { "debug" } else { "warn" }),
    )
    .init();

    let name = matches
        .get_one::<String>("name")
        .expect("name is required by clap");

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(error) => {
            eprintln!("{}", format!("Error creating project: {error}").red());
            std::process::exit(1);
        }
    };

    let settings = config::Settings::new(matches.get_one::<PathBuf>("template").cloned(), cwd);

    log::debug!("running with {:?}", settings);

    if let Err(error) = new_node_app::generate(name, &settings.template_directory, &settings.cwd) {
        report(error, is_verbose);
        std::process::exit(1);
    }
}

fn report(error: GenerationError, is_verbose: bool) {
    let msg = match &error {
        GenerationError::AlreadyExists { .. } => format!("Error: {error}"),
        _ => format!("Error creating project: {error}"),
    };

    eprintln!("{}", msg.red());

    if is_verbose {
        eprintln!("{:?}", miette::Report::new(error));
    }
}
