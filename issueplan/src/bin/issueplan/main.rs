mod commands;
mod output;
mod theme;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
    error::ErrorKind,
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use log::LevelFilter;
use std::fmt::Write;
use std::io;

use commands::{
    ExampleGroup, examples_for,
    fields::{FieldsArgs, handle_fields},
    plan::{PlanArgs, handle_plan},
    validate::{ValidateArgs, handle_validate},
};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{GLYPHS, PALETTE};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("GITHUB_TOKEN", "Token used for GitHub GraphQL requests (required)"),
    ("GITHUB_API_URL", "GitHub API base url (default https://api.github.com)"),
    ("ISSUEPLAN_CONFIG", "Default for --config"),
    ("RUST_LOG", "Log filter, overridden by --debug"),
];

#[derive(Parser)]
#[command(name = "issueplan")]
#[command(version)]
#[command(
    about = "Plan scheduled GitHub issues and resolve their project fields",
    long_about = r#"Plan scheduled GitHub issues from a declarative configuration:

• Select the issues scheduled for a month
• Validate every issue against its GitHub project's fields
• Resolve field names and option names to ids
• Emit a JSON creation payload for a downstream job

Commands:
  plan      Build creation payloads for a month
  validate  Check a configuration without building payloads
  fields    List the fields of a project
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format for command results
    #[arg(long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Suppress status lines (results and errors are still printed)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parses arguments with themed help. A missing subcommand prints the full
    /// long help instead of clap's one-line usage.
    fn parse_styled() -> Self {
        let matches = match build_command().try_get_matches() {
            Ok(matches) => matches,
            Err(err) if err.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let mut command = build_command();
                let _ = command.write_long_help(&mut io::stderr());
                std::process::exit(err.exit_code());
            }
            Err(err) => err.exit(),
        };
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn build_command() -> Command {
    let color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(help_styles())
        .color(if color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(environment_appendix(color));

    for subcommand in command.get_subcommands_mut() {
        let groups = examples_for(subcommand.get_name());
        if !groups.is_empty() {
            *subcommand = subcommand.clone().after_long_help(render_examples(groups, color));
        }
    }
    command
}

fn paint(text: &str, color: ThemeColor, bold: bool, enabled: bool) -> String {
    match (enabled, bold) {
        (false, _) => text.to_string(),
        (true, true) => text.color(color).bold().to_string(),
        (true, false) => text.color(color).to_string(),
    }
}

fn render_examples(groups: &[ExampleGroup], color: bool) -> String {
    let mut help = String::new();
    let _ = writeln!(help, "{}", paint("Examples:", PALETTE.heading, true, color));

    for (position, group) in groups.iter().enumerate() {
        if position > 0 {
            help.push('\n');
        }
        let _ = writeln!(help, "  {}", paint(group.title, PALETTE.accent, true, color));
        for line in group.commands {
            let arrow = paint(GLYPHS.arrow, PALETTE.command, false, color);
            let _ = writeln!(help, "    {arrow} {}", paint(line, PALETTE.command, false, color));
        }
    }
    help
}

fn environment_appendix(color: bool) -> String {
    let mut help = String::new();
    let _ = writeln!(help, "{}", paint("Environment Variables:", PALETTE.heading, true, color));
    for (name, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            help,
            "  {}  {}",
            paint(name, PALETTE.env_name, true, color),
            paint(description, PALETTE.env_text, false, color)
        );
    }
    let _ = writeln!(
        help,
        "\n{} {}",
        paint("Tip:", PALETTE.heading, true, color),
        paint("Run 'issueplan <command> --help' for examples.", PALETTE.command, false, color)
    );
    help
}

fn help_styles() -> Styles {
    let style = |color: ThemeColor| Style::new().fg_color(Some(clap_color(color)));
    Styles::styled()
        .usage(style(PALETTE.accent).bold())
        .header(style(PALETTE.heading).bold())
        .literal(style(PALETTE.command))
        .placeholder(style(PALETTE.dim))
        .valid(style(PALETTE.ok))
        .invalid(style(PALETTE.caution))
        .error(style(PALETTE.failure).bold())
}

/// Maps the palette's colors onto clap's; anything else falls back to white.
fn clap_color(color: ThemeColor) -> ClapColor {
    let ansi = match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        ThemeColor::TrueColor { r, g, b } => return ClapColor::Rgb(RgbColor(r, g, b)),
        _ => AnsiColor::White,
    };
    ClapColor::Ansi(ansi)
}

#[derive(Subcommand)]
enum Commands {
    /// Build creation payloads for the issues scheduled in a month
    Plan(PlanArgs),

    /// Validate a configuration against its projects' fields
    Validate(ValidateArgs),

    /// List the fields of a GitHub project
    Fields(FieldsArgs),
}

/// `--debug` wins; otherwise `RUST_LOG`, falling back to info (warn when quiet).
fn init_logging(debug: bool, quiet: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if quiet { LevelFilter::Warn } else { LevelFilter::Info });
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_target(false).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_styled();
    init_logging(cli.debug, cli.quiet);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let global_options = GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        debug: cli.debug,
        no_color: cli.no_color,
    };
    let output = OutputManager::new(global_options);

    if let Err(err) = execute(cli.command, &output).await {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

async fn execute(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Plan(args) => handle_plan(args, output).await,
        Commands::Validate(args) => handle_validate(args, output).await,
        Commands::Fields(args) => handle_fields(args, output).await,
    }
}
