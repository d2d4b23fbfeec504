use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::Subcommand;
use log::info;

use kbc_knuth_bendix::CompletionState;
use kbc_knuth_bendix::KnuthBendix;
use kbc_knuth_bendix::KnuthBendixOptions;
use kbc_knuth_bendix::OverlapPolicy;
use kbc_knuth_bendix::Presentation;
use kbc_knuth_bendix::RewriteFromLeft;
use kbc_knuth_bendix::RewriteTrie;
use kbc_knuth_bendix::Rewriter;
use kbc_knuth_bendix::RewriterKind;
use kbc_knuth_bendix::by_overlap_length;
use kbc_knuth_bendix::normal_forms;
use kbc_knuth_bendix::parse_relation;
use kbc_knuth_bendix::redundant_rule;
use kbc_knuth_bendix::word_to_string;
use kbc_utilities::KbcError;
use kbc_utilities::Limit;
use kbc_utilities::Timing;

use version::Version;
use version::VersionFlag;
use verbosity::VerbosityFlag;

mod verbosity;
mod version;

#[derive(clap::Parser, Debug)]
#[command(name = "kbc", about = "Knuth-Bendix completion of string rewriting systems")]
struct Cli {
    #[command(flatten)]
    version: VersionFlag,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[command(subcommand)]
    commands: Option<Commands>,

    #[arg(long, global = true)]
    timings: bool,
}

/// Defines the subcommands for this tool.
#[derive(Debug, Subcommand)]
enum Commands {
    Complete(CompleteArgs),
    NormalForms(NormalFormsArgs),
    Redundant(RedundantArgs),
}

/// A presentation given as an alphabet and a list of relations.
#[derive(clap::Args, Debug)]
struct PresentationArgs {
    /// The letters of the alphabet, the i-th character is letter i.
    alphabet: String,

    /// The relations of the form lhs=rhs, an empty side is the empty word.
    relations: Vec<String>,

    #[arg(long, help = "Exclude the empty word, yielding a semigroup presentation")]
    semigroup: bool,
}

impl PresentationArgs {
    fn presentation(&self) -> Result<Presentation, KbcError> {
        let mut presentation = Presentation::new(self.alphabet.chars().count());
        for relation in &self.relations {
            let (lhs, rhs) = parse_relation(&self.alphabet, relation)?;
            presentation.add_rule(lhs, rhs)?;
        }

        if self.semigroup {
            presentation.set_contains_empty_word(false)?;
        }

        Ok(presentation)
    }
}

/// The options of the completion.
#[derive(clap::Args, Debug)]
struct CompletionArgs {
    #[arg(long, value_enum, default_value_t, help = "The rewriter used to reduce words")]
    rewriter: RewriterKind,

    #[arg(long, value_enum, default_value_t, help = "The measure of overlap lengths")]
    overlap_policy: OverlapPolicy,

    #[arg(long, help = "Ignore overlaps longer than this length")]
    max_overlap: Option<usize>,

    #[arg(long, help = "Stop the completion once this many rules are active")]
    max_rules: Option<usize>,

    #[arg(long, default_value_t = 128, help = "The number of pending rules that triggers their insertion")]
    max_pending_rules: usize,

    #[arg(long, help = "Check confluence after this many overlaps, 0 disables the check")]
    check_confluence_interval: Option<usize>,

    #[arg(long, help = "Stop the completion after this many seconds")]
    time_limit: Option<f64>,

    #[arg(long, help = "Consider overlaps of increasing length")]
    by_overlap_length: bool,
}

impl CompletionArgs {
    fn options(&self) -> KnuthBendixOptions {
        let defaults = KnuthBendixOptions::default();
        KnuthBendixOptions {
            max_pending_rules: self.max_pending_rules,
            check_confluence_interval: match self.check_confluence_interval {
                Some(0) => Limit::Unbounded,
                Some(interval) => Limit::Bounded(interval),
                None => defaults.check_confluence_interval,
            },
            max_overlap: self.max_overlap.map_or(Limit::Unbounded, Limit::Bounded),
            max_rules: self.max_rules.map_or(Limit::Unbounded, Limit::Bounded),
            overlap_policy: self.overlap_policy,
        }
    }
}

#[derive(clap::Args, Debug)]
#[command(about = "Completes the presentation and prints the resulting rules")]
struct CompleteArgs {
    #[command(flatten)]
    presentation: PresentationArgs,

    #[command(flatten)]
    completion: CompletionArgs,
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints the normal forms of the completed presentation in shortlex order")]
struct NormalFormsArgs {
    #[command(flatten)]
    presentation: PresentationArgs,

    #[command(flatten)]
    completion: CompletionArgs,

    #[arg(long, default_value_t = 0, help = "The minimum length of the normal forms")]
    min: usize,

    #[arg(long, default_value_t = 4, help = "The maximum length of the normal forms")]
    max: usize,
}

#[derive(clap::Args, Debug)]
#[command(about = "Finds a relation that follows from the other relations")]
struct RedundantArgs {
    #[command(flatten)]
    presentation: PresentationArgs,

    #[arg(long, default_value_t = 1.0, help = "The time in seconds spent per relation")]
    time_limit: f64,
}

fn main() -> Result<ExitCode, KbcError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if cli.version.into() {
        eprintln!("{}", Version);
        return Ok(ExitCode::SUCCESS);
    }

    let mut timing = Timing::new();

    if let Some(command) = cli.commands {
        match command {
            Commands::Complete(args) => {
                let presentation = args.presentation.presentation()?;
                match args.completion.rewriter {
                    RewriterKind::Trie => complete::<RewriteTrie>(&args, presentation, &mut timing)?,
                    RewriterKind::FromLeft => complete::<RewriteFromLeft>(&args, presentation, &mut timing)?,
                }
            }
            Commands::NormalForms(args) => {
                let presentation = args.presentation.presentation()?;
                match args.completion.rewriter {
                    RewriterKind::Trie => print_normal_forms::<RewriteTrie>(&args, presentation, &mut timing)?,
                    RewriterKind::FromLeft => {
                        print_normal_forms::<RewriteFromLeft>(&args, presentation, &mut timing)?
                    }
                }
            }
            Commands::Redundant(args) => {
                let presentation = args.presentation.presentation()?;

                let mut timer = timing.start("redundant");
                let redundant = redundant_rule(&presentation, Duration::from_secs_f64(args.time_limit))?;
                timer.finish();

                match redundant {
                    Some((lhs, rhs)) => println!(
                        "{}={}",
                        word_to_string(&args.presentation.alphabet, &lhs),
                        word_to_string(&args.presentation.alphabet, &rhs)
                    ),
                    None => println!("No redundant relation found"),
                }
            }
        }
    }

    if cli.timings {
        timing.print();
    }

    Ok(ExitCode::SUCCESS)
}

/// Creates the completion and runs it according to the given options.
fn run_completion<R: Rewriter>(
    presentation: Presentation,
    args: &CompletionArgs,
    timing: &mut Timing,
) -> Result<KnuthBendix<R>, KbcError> {
    let mut kb: KnuthBendix<R> = KnuthBendix::with_options(presentation, args.options())?;

    let mut timer = timing.start("completion");
    if args.by_overlap_length {
        by_overlap_length(&mut kb)?;
    } else if let Some(seconds) = args.time_limit {
        kb.run_for(Duration::from_secs_f64(seconds));
    } else {
        kb.run();
    }
    timer.finish();

    info!("{kb}");
    Ok(kb)
}

fn complete<R: Rewriter>(args: &CompleteArgs, presentation: Presentation, timing: &mut Timing) -> Result<(), KbcError> {
    let kb = run_completion::<R>(presentation, &args.completion, timing)?;

    let alphabet = &args.presentation.alphabet;
    for (lhs, rhs) in kb.active_rules() {
        println!("{}={}", word_to_string(alphabet, &lhs), word_to_string(alphabet, &rhs));
    }

    match kb.state() {
        CompletionState::Confluent => eprintln!("Confluent with {} rules", kb.number_of_active_rules()),
        state => eprintln!(
            "Completion ended {:?} with {} rules, confluent: {}",
            state,
            kb.number_of_active_rules(),
            kb.confluent()
        ),
    }

    Ok(())
}

fn print_normal_forms<R: Rewriter>(
    args: &NormalFormsArgs,
    presentation: Presentation,
    timing: &mut Timing,
) -> Result<(), KbcError> {
    let mut kb = run_completion::<R>(presentation, &args.completion, timing)?;
    if !kb.finished() {
        return Err("The completion did not finish, so the normal forms are not known".into());
    }

    let mut timer = timing.start("normal forms");
    let range = normal_forms(&mut kb)?.min(args.min).max(args.max);
    eprintln!("Number of normal forms: {}", range.count());

    let alphabet = &args.presentation.alphabet;
    for word in range {
        println!("{}", word_to_string(alphabet, &word));
    }
    timer.finish();

    Ok(())
}
