use std::fmt;
use std::sync::Arc;

use quiz_core::model::{AppSettingsDraft, QuizRef};
use services::{AppServices, Clock, QuizLoopService, SyncOutcome};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::render::{render_catalog, render_page};
use ui::vm::{CatalogVm, KeyInput, QuizPageVm, Screen};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    MissingQuiz,
    InvalidQuizRef { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::MissingQuiz => write!(f, "quiz requires <category>/<quiz>"),
            ArgsError::InvalidQuizRef { raw } => {
                write!(f, "invalid quiz reference (expected <category>/<quiz>): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct UsageError(&'static str);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for UsageError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- catalog [--root <dir|url>] [--timeout-secs <n>]");
    eprintln!("  cargo run -p app -- quiz <category>/<quiz> [--root <dir|url>] [--questions <n>]");
    eprintln!("  cargo run -p app -- sync [--root <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --root .  --questions 10  --timeout-secs 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_ROOT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Catalog,
    Quiz,
    Sync,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "catalog" => Some(Self::Catalog),
            "quiz" => Some(Self::Quiz),
            "sync" => Some(Self::Sync),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    root: Option<String>,
    questions: Option<usize>,
    timeout_secs: Option<u64>,
    quiz: Option<QuizRef>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            root: std::env::var("QUIZ_ROOT")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => parsed.root = Some(require_value(args, "--root")?),
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    parsed.questions = Some(parse_number(value, "--questions")?);
                }
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    parsed.timeout_secs = Some(parse_number(value, "--timeout-secs")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Quiz && parsed.quiz.is_none() && !arg.starts_with("--") => {
                    let quiz =
                        QuizRef::parse(&arg).ok_or(ArgsError::InvalidQuizRef { raw: arg.clone() })?;
                    parsed.quiz = Some(quiz);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Quiz && parsed.quiz.is_none() {
            return Err(ArgsError::MissingQuiz);
        }
        Ok(parsed)
    }

    fn settings_draft(&self) -> AppSettingsDraft {
        AppSettingsDraft {
            question_count: self.questions,
            fetch_timeout_secs: self.timeout_secs,
            source_location: self.root.clone(),
        }
    }
}

type InputLines = Lines<BufReader<Stdin>>;

fn input_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

async fn run_catalog(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = services.catalog().load_catalog().await?;
    for failure in catalog.failures() {
        eprintln!("⚠ {failure}");
    }
    let mut vm = CatalogVm::new(&catalog);
    let mut lines = input_lines();

    loop {
        println!("{}", render_catalog(&vm));
        println!("[Kategorie] auf-/zuklappen · [Nummer] Quiz öffnen · [q] beenden");
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let input = line.trim();
        if input == "q" {
            return Ok(());
        }

        if let Ok(position) = input.parse::<usize>() {
            let Some(card) = vm.card_at(position) else {
                eprintln!("Kein Quiz an Position {position}");
                continue;
            };
            let Some(reference) = QuizRef::parse(&card.path) else {
                continue;
            };
            run_quiz_page(services.quiz_loop(), &reference, &mut lines).await?;
            continue;
        }

        let key = catalog
            .categories()
            .iter()
            .find(|entry| entry.key == input || entry.name.eq_ignore_ascii_case(input))
            .map(|entry| entry.key.clone());
        match key {
            Some(key) => {
                let expanded = vm.toggle(&key);
                debug!(category = %key, ?expanded, "category toggled");
            }
            None => eprintln!("Unbekannte Eingabe: {input}"),
        }
    }
}

async fn run_quiz_page(
    quiz_loop: Arc<QuizLoopService>,
    reference: &QuizRef,
    lines: &mut InputLines,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = QuizPageVm::load(quiz_loop, reference)
        .await
        .map_err(|err| UsageError(err.message()))?;

    loop {
        println!("{}", render_page(&page));
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        match line.trim() {
            "q" => return Ok(()),
            "p" if page.screen() == Screen::Start => {
                if !page.show_pdf() {
                    eprintln!("Für dieses Quiz gibt es kein PDF.");
                }
                continue;
            }
            _ if page.screen() == Screen::Pdf => {
                page.close_pdf();
                continue;
            }
            _ => {}
        }

        let Some(key) = KeyInput::from_line(&line) else {
            continue;
        };
        if let Err(err) = page.handle_key(key) {
            eprintln!("{}", err.message());
        }
    }
}

fn run_sync(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let sync = services
        .config_sync()
        .ok_or(UsageError("sync needs a local catalog directory"))?;

    match sync.run()? {
        SyncOutcome::UpToDate => println!("config.json ist bereits korrekt."),
        SyncOutcome::NoCategories => println!("Keine Quiz-Kategorien gefunden."),
        SyncOutcome::Updated(report) => {
            println!("config.json aktualisiert: {}", report.config_path.display());
            println!(
                "Kategorien: {} · Quiz gesamt: {}",
                report.stats.category_count(),
                report.stats.quiz_count()
            );
            for category in &report.stats.categories {
                println!("  {} {}: {} Quiz", category.icon, category.name, category.quizzes.len());
                if category.quizzes.len() <= 5 {
                    for quiz in &category.quizzes {
                        println!("    • {quiz}");
                    }
                }
            }
            for fix in &report.fixes {
                println!("  • {fix}");
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            UsageError("unknown subcommand")
        })?,
    };

    let parsed = Args::parse(cmd, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = AppServices::from_draft(parsed.settings_draft(), Clock::system())?;
    info!(location = services.location(), ?cmd, "starting");

    match cmd {
        Command::Catalog => run_catalog(&services).await,
        Command::Quiz => {
            let reference = parsed.quiz.ok_or(ArgsError::MissingQuiz)?;
            let mut lines = input_lines();
            run_quiz_page(services.quiz_loop(), &reference, &mut lines).await
        }
        Command::Sync => run_sync(&services),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
