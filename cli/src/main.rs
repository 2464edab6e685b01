//! officekit CLI - create Office files from text and CSV input

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use officekit::{
    detect_output_from_path, BackendKind, CellValue, Family, Office, OutputKind, ResolveOptions,
    SlideLayout,
};

#[derive(Parser)]
#[command(name = "officekit")]
#[command(version)]
#[command(about = "Create Word, Excel and PowerPoint files", long_about = None)]
struct Cli {
    /// JSON file with resolve options, e.g. {"disabled": ["excel"]}
    #[arg(long, global = true, value_name = "FILE", env = "OFFICEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Force a family to the dummy backend (repeatable)
    #[arg(long, global = true, value_name = "FAMILY")]
    dummy: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which backend serves each document family
    Info {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a Word document, one paragraph per line
    #[command(alias = "docx")]
    Word {
        /// Output file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Text file to read paragraphs from
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Heading placed before the paragraphs
        #[arg(short, long)]
        title: Option<String>,

        /// Paragraph text (used when no input file is given)
        #[arg(value_name = "TEXT")]
        text: Vec<String>,
    },

    /// Create an Excel workbook from delimited text
    #[command(alias = "xlsx")]
    Excel {
        /// Output file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Delimited text file, one row per line
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Worksheet name
        #[arg(long, default_value = "Sheet1")]
        sheet: String,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Create a PowerPoint presentation, one slide per "Title: body" line
    #[command(alias = "pptx")]
    Powerpoint {
        /// Output file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Title slide heading
        #[arg(short, long)]
        title: Option<String>,

        /// Content slides as "Title: body"
        #[arg(value_name = "SLIDE")]
        slides: Vec<String>,
    },

    /// Tell whether a saved file is a real package or a placeholder
    Inspect {
        /// File to inspect
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Info { json }) => {
            build_office(cli.config.as_deref(), &cli.dummy).and_then(|office| cmd_info(&office, json))
        }
        Some(Commands::Word {
            output,
            input,
            title,
            text,
        }) => build_office(cli.config.as_deref(), &cli.dummy).and_then(|office| {
            cmd_word(&office, &output, input.as_deref(), title.as_deref(), &text)
        }),
        Some(Commands::Excel {
            output,
            input,
            sheet,
            delimiter,
        }) => build_office(cli.config.as_deref(), &cli.dummy)
            .and_then(|office| cmd_excel(&office, &output, &input, &sheet, delimiter)),
        Some(Commands::Powerpoint {
            output,
            title,
            slides,
        }) => build_office(cli.config.as_deref(), &cli.dummy)
            .and_then(|office| cmd_powerpoint(&office, &output, title.as_deref(), &slides)),
        Some(Commands::Inspect { input }) => cmd_inspect(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: officekit <COMMAND>".yellow());
            println!("       officekit --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolve backends from the environment, the config file and `--dummy` flags.
fn build_office(
    config: Option<&Path>,
    dummy: &[String],
) -> Result<Office, Box<dyn std::error::Error>> {
    let mut options = ResolveOptions::from_env();
    if let Some(path) = config {
        log::debug!("loading resolve options from {}", path.display());
        options = options.merge(ResolveOptions::from_file(path)?);
    }
    for name in dummy {
        let family = name.parse::<Family>()?;
        log::debug!("--dummy forces {} to the placeholder backend", family);
        options = options.disable(family);
    }
    Ok(Office::with_options(options))
}

fn cmd_info(office: &Office, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = office.info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Backends".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (family, module) in &info.modules {
        let backend = match module.backend {
            BackendKind::Real => "real".green(),
            BackendKind::Dummy => "dummy".yellow(),
        };
        let note = if module.compiled { "" } else { " (not compiled)" };
        println!(
            "{:<12} {}{}",
            format!("{}:", family).bold(),
            backend,
            note.dimmed()
        );
    }

    for notice in office.notices() {
        println!("{} {}", "!".yellow().bold(), notice);
    }

    println!();
    println!("{}: {}", "Version".bold(), info.version);
    Ok(())
}

fn cmd_word(
    office: &Office,
    output: &Path,
    input: Option<&Path>,
    title: Option<&str>,
    text: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let body = match input {
        Some(path) => fs::read_to_string(path)?,
        None => text.join("\n"),
    };

    let mut doc = office.word().create_document();
    if let Some(title) = title {
        doc.add_heading(title, 1)?;
    }
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        doc.add_paragraph(line);
    }
    doc.save(output)?;

    report_saved(output, doc.backend_kind());
    Ok(())
}

fn cmd_excel(
    office: &Office,
    output: &Path,
    input: &Path,
    sheet: &str,
    delimiter: char,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;
    let rows = parse_rows(&text, delimiter);

    let mut wb = office.excel().create_workbook();
    wb.add_worksheet(sheet)?.add_table(rows, 1, 1)?;
    wb.save(output)?;

    report_saved(output, wb.backend_kind());
    Ok(())
}

fn cmd_powerpoint(
    office: &Office,
    output: &Path,
    title: Option<&str>,
    slides: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pres = office.powerpoint().create_presentation();
    if let Some(title) = title {
        pres.add_slide(SlideLayout::Title).set_title(title);
    }
    for entry in slides {
        let (heading, body) = split_slide(entry);
        let slide = pres.add_slide(SlideLayout::TitleAndContent);
        slide.set_title(heading);
        if let Some(body) = body {
            slide.add_body(body);
        }
    }
    pres.save(output)?;

    report_saved(output, pres.backend_kind());
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let kind = detect_output_from_path(input)?;
    let size = fs::metadata(input)?.len();

    let label = match kind {
        OutputKind::Container => kind.to_string().green(),
        OutputKind::Placeholder => kind.to_string().yellow(),
    };
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Kind".bold(), label);
    println!("{}: {} bytes", "Size".bold(), size);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "officekit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word, Excel and PowerPoint file creation tool");
    println!();
    for family in Family::ALL {
        let state = if family.is_compiled() {
            "compiled".green()
        } else {
            "not compiled".yellow()
        };
        println!("{} backend: {}", family, state);
    }
    println!("License: MIT");
}

fn report_saved(path: &Path, kind: BackendKind) {
    match kind {
        BackendKind::Real => println!("{} {}", "Saved to".green(), path.display()),
        BackendKind::Dummy => println!(
            "{} {} {}",
            "Saved to".green(),
            path.display(),
            "(placeholder, backend unavailable)".yellow()
        ),
    }
}

/// Split delimited text into rows; numeric fields become numbers.
fn parse_rows(text: &str, delimiter: char) -> Vec<Vec<CellValue>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(delimiter).map(parse_field).collect())
        .collect()
}

fn parse_field(field: &str) -> CellValue {
    let field = field.trim();
    if field.is_empty() {
        return CellValue::Empty;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::from(field),
    }
}

fn split_slide(entry: &str) -> (&str, Option<&str>) {
    match entry.split_once(':') {
        Some((title, body)) if !body.trim().is_empty() => (title.trim(), Some(body.trim())),
        Some((title, _)) => (title.trim(), None),
        None => (entry.trim(), None),
    }
}
