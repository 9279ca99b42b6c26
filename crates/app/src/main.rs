use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;
use quiz_core::Clock;
use quiz_core::model::{QuestionBank, QuizSettings};
use quiz_core::rank::{RankThresholds, compute_rank};
use services::{
    HistoryService, InMemoryHistory, QuizHistory, QuizLoopService, QuizPhase, QuizRun, QuizView,
    catalog,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    seed: Option<u64>,
    delay_ms: u32,
    max_incorrect: u32,
    bank_path: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--seed <u64>] [--delay-ms <n>] [--max-incorrect <n>] [--bank <path.json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --delay-ms 1500       feedback display interval");
    eprintln!("  --max-incorrect 10    wrong answers before the quiz fails");
    eprintln!("  --bank (built-in)     20-question wig knowledge bank");
    eprintln!();
    eprintln!("During the quiz: type an option number, 'p' to pause, 'q' to quit.");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            seed: None,
            delay_ms: 1_500,
            max_incorrect: 10,
            bank_path: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    parsed.seed = Some(parse_number("--seed", value)?);
                }
                "--delay-ms" => {
                    let value = require_value(args, "--delay-ms")?;
                    parsed.delay_ms = parse_number("--delay-ms", value)?;
                }
                "--max-incorrect" => {
                    let value = require_value(args, "--max-incorrect")?;
                    parsed.max_incorrect = parse_number("--max-incorrect", value)?;
                }
                "--bank" => {
                    parsed.bank_path = Some(require_value(args, "--bank")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn main() {
    pretty_env_logger::init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    let bank = load_bank(args.bank_path.as_deref())?;
    let settings = QuizSettings::new(args.delay_ms, args.max_incorrect, RankThresholds::thirds())?;
    let history: Arc<dyn QuizHistory> = Arc::new(InMemoryHistory::new());
    let mut service = QuizLoopService::new(Clock::default(), settings, Arc::clone(&history));
    if let Some(seed) = args.seed {
        service = service.with_rng_seed(seed);
    }
    let stats = HistoryService::new(history);

    println!("Wig Wisdom — test your wig knowledge!");
    println!("{} questions. No time limit.", bank.len());
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'sessions: loop {
        let mut quiz = service.start(&bank);

        loop {
            match quiz.session().phase() {
                QuizPhase::AwaitingAnswer => {
                    if !prompt_for_answer(&service, &mut quiz, &mut lines)? {
                        break 'sessions;
                    }
                }
                QuizPhase::ShowingFeedback => {
                    // Let the feedback sit on screen for the configured
                    // interval, then fire the scheduled advance.
                    thread::sleep(Duration::from_millis(u64::from(args.delay_ms)));
                    service.tick(&mut quiz)?;
                }
                QuizPhase::Failed => {
                    println!();
                    println!(
                        "Too many wrong answers ({}). Quiz over!",
                        quiz.session().incorrect_count()
                    );
                    if !ask_yes_no("Start over with a fresh shuffle? [y/n] ", &mut lines)? {
                        break 'sessions;
                    }
                    service.restart_after_failure(&mut quiz);
                    println!();
                }
                QuizPhase::Completed => {
                    print_results(&service, &quiz, &stats)?;
                    if !ask_yes_no("Try again? [y/n] ", &mut lines)? {
                        break 'sessions;
                    }
                    service.restart_fresh(&mut quiz);
                    println!();
                }
            }
        }
    }

    print_goodbye(&stats)?;
    Ok(())
}

fn load_bank(path: Option<&str>) -> Result<QuestionBank, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            debug!("loading question bank from {path}");
            Ok(catalog::bank_from_json(&raw)?)
        }
        None => Ok(catalog::builtin_bank()),
    }
}

/// Shows the current question and handles one line of input.
///
/// Returns false when the user quits.
fn prompt_for_answer(
    service: &QuizLoopService,
    quiz: &mut QuizRun,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let view = QuizView::from_run(quiz);

    println!("Question {} of {}", view.number, view.total);
    println!("{}", view.prompt);
    for (i, option) in view.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    print!("> ");
    io::stdout().flush()?;

    let Some(line) = lines.next().transpose()? else {
        return Ok(false);
    };

    match line.trim() {
        "q" | "quit" => return Ok(false),
        "p" | "pause" => {
            service.pause(quiz);
            println!("[paused] press enter to resume");
            let _ = lines.next().transpose()?;
            service.resume(quiz);
        }
        input => match input.parse::<usize>() {
            Ok(number) if number >= 1 => {
                if let Some(feedback) = service.select_answer(quiz, number - 1) {
                    if feedback.is_correct {
                        println!("Correct!");
                    } else {
                        println!(
                            "Not quite! The answer was: {}",
                            QuizView::from_run(quiz).options[feedback.correct_index]
                        );
                    }
                    let explanation = quiz.session().current_question().explanation();
                    if !explanation.is_empty() {
                        println!("{explanation}");
                    }
                    println!();
                }
            }
            _ => println!("Enter an option number, 'p' to pause or 'q' to quit."),
        },
    }

    Ok(true)
}

fn print_results(
    service: &QuizLoopService,
    quiz: &QuizRun,
    stats: &HistoryService,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(final_score) = quiz.session().final_score() else {
        return Ok(());
    };
    let tier = compute_rank(
        final_score.score,
        final_score.total,
        &service.settings().thresholds(),
    )?;

    println!();
    println!("Quiz complete! {}/{}", final_score.score, final_score.total);
    println!(
        "Your rank: {} {} ({}-{} correct)",
        tier.name.emoji(),
        tier.name,
        tier.lower_bound,
        tier.upper_bound
    );
    println!("{}", tier.message);

    let player = stats.stats()?;
    println!(
        "Quizzes this session: {} | best {} | average {}",
        player.total_quizzes, player.best_score, player.average_score
    );
    println!();
    Ok(())
}

fn print_goodbye(stats: &HistoryService) -> Result<(), Box<dyn std::error::Error>> {
    let player = stats.stats()?;
    if player.total_quizzes > 0 {
        println!(
            "Thanks for playing! {} correct out of {} across {} quizzes.",
            player.total_correct, player.total_questions, player.total_quizzes
        );
    } else {
        println!("Thanks for playing!");
    }
    Ok(())
}

fn ask_yes_no(
    prompt: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let Some(line) = lines.next().transpose()? else {
        return Ok(false);
    };
    Ok(matches!(line.trim(), "y" | "yes" | "Y"))
}
