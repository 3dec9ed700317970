use activity_cli::cli::{Cli, Command, collect_config_overrides};
use activity_cli::form::{FlagForm, LineConfirm};
use activity_cli::render::{self, View};
use activity_core::board::{Action, ActivityBoard, Change};
use activity_core::config::{
    Config, ConfigOverrides, Palette, load_config_with_fallback, merge_overrides,
    palette_for_theme,
};
use activity_core::display::display_offset;
use activity_core::error::AppError;
use activity_core::filter::parse_filter_value;
use activity_core::model::{ActivityPriority, ActivityStatus, ActivityType};
use activity_core::seed::{self, Directory};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, IsTerminal, Write};
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "ACTIVITYAPP_LOG";

/// Board plus the lookups and settings it was started with. Lives for one
/// command, or for the whole interactive session.
struct Session {
    board: ActivityBoard,
    directory: Directory,
    config: Config,
}

impl Session {
    fn start(overrides: &ConfigOverrides) -> Result<Self, AppError> {
        let loaded = load_config_with_fallback();
        let config = merge_overrides(&loaded.config, overrides);
        let seed_path = seed::seed_path(config.seed_path.as_deref());
        let mut directory = seed::load_directory(seed_path.as_deref())?;
        let activities = std::mem::take(&mut directory.activities);
        info!(activities = activities.len(), "board seeded");

        Ok(Self {
            board: ActivityBoard::new(activities),
            directory,
            config,
        })
    }

    fn appearance(&self, raw_overrides: &[String]) -> Result<(Palette, UtcOffset), AppError> {
        let overrides = collect_config_overrides(raw_overrides)?;
        if overrides.seed_path.is_some() {
            debug!("seed_path override only applies when the board is seeded");
        }
        let config = merge_overrides(&self.config, &overrides);
        Ok((
            palette_for_theme(config.theme.as_deref()),
            display_offset(config.utc_offset_hours),
        ))
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

fn report_change(change: Change, json: bool, view: &View<'_>, cancelled: &str) {
    let (verb, activity) = match change {
        Change::Created(activity) => ("Created", activity),
        Change::Updated(activity) => ("Updated", activity),
        Change::Deleted(activity) => ("Deleted", activity),
        _ => {
            if json {
                print_json(&serde_json::json!({ "cancelled": true }));
            } else {
                println!("{cancelled}");
            }
            return;
        }
    };

    if json {
        print_json(&render::activity_json(&activity, view));
    } else {
        println!("{verb} activity: {} ({})", activity.title, activity.id);
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(session: &mut Session, cli: Cli, input: &mut dyn BufRead) -> Result<(), AppError> {
    let (palette, offset) = session.appearance(&cli.config_override)?;
    let now = OffsetDateTime::now_utc();
    let json = cli.json;

    match cli.command {
        Command::List {
            search,
            status,
            kind,
            priority,
        } => {
            let status = status
                .as_deref()
                .map(parse_filter_value::<ActivityStatus>)
                .transpose()?;
            let kind = kind
                .as_deref()
                .map(parse_filter_value::<ActivityType>)
                .transpose()?;
            let priority = priority
                .as_deref()
                .map(parse_filter_value::<ActivityPriority>)
                .transpose()?;

            let board = &mut session.board;
            if let Some(search) = search {
                board.apply(Action::SetSearch(search));
            }
            if let Some(status) = status {
                board.apply(Action::SetStatusFilter(status));
            }
            if let Some(kind) = kind {
                board.apply(Action::SetTypeFilter(kind));
            }
            if let Some(priority) = priority {
                board.apply(Action::SetPriorityFilter(priority));
            }

            let view = View::new(&session.directory, &palette, offset, now);
            if json {
                print_json(&render::render_list_json(&session.board, &view));
            } else {
                println!("{}", render::render_list(&session.board, &view));
            }
        }
        Command::ClearFilters => {
            session.board.apply(Action::ClearFilters);
            if json {
                print_json(&serde_json::json!({ "filters_cleared": true }));
            } else {
                println!("Filters cleared");
            }
        }
        Command::Show { id } => {
            let activity = session
                .board
                .get(&id)
                .ok_or_else(|| AppError::activity_not_found(&id))?;
            let view = View::new(&session.directory, &palette, offset, now);
            if json {
                print_json(&render::activity_json(activity, &view));
            } else {
                println!("{}", render::render_card(activity, &view));
            }
        }
        Command::New { fields } => {
            let mut form = FlagForm::new(fields);
            let change = session.board.create_activity(&mut form, now)?;
            let view = View::new(&session.directory, &palette, offset, now);
            report_change(change, json, &view, "Creation cancelled");
        }
        Command::Edit { id, fields } => {
            let mut form = FlagForm::new(fields);
            let change = session.board.edit_activity(&id, &mut form, now)?;
            let view = View::new(&session.directory, &palette, offset, now);
            report_change(change, json, &view, "No fields given; edit cancelled");
        }
        Command::Delete { id, yes } => {
            let prompt_output: Box<dyn Write> = if json {
                Box::new(io::stderr())
            } else {
                Box::new(io::stdout())
            };
            let mut confirm = LineConfirm::new(input, prompt_output, yes);
            let change = session.board.delete_activity(&id, &mut confirm)?;
            let view = View::new(&session.directory, &palette, offset, now);
            report_change(change, json, &view, "Deletion cancelled");
        }
        Command::Employees => {
            if json {
                print_json(&serde_json::json!(session.directory.employees));
            } else {
                println!("{}", render::render_employees(&session.directory.employees));
            }
        }
        Command::Equipment => {
            if json {
                print_json(&serde_json::json!(session.directory.equipment));
            } else {
                println!("{}", render::render_equipment(&session.directory.equipment));
            }
        }
    }

    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("activities".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_informational(&err) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(session, cli, &mut stdin_lock) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        init_tracing(0);
        let result = Session::start(&ConfigOverrides::default())
            .and_then(|mut session| run_interactive(&mut session));
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);
    let result = collect_config_overrides(&cli.config_override)
        .and_then(|overrides| Session::start(&overrides))
        .and_then(|mut session| {
            let stdin = io::stdin();
            let mut stdin_lock = stdin.lock();
            run_command(&mut session, cli, &mut stdin_lock)
        });

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
