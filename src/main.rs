//! Purpose: `menuforge` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, prints reports on stdout.
//! Invariants: Errors are emitted as a single JSON object on stderr.
//! Invariants: Process exit code is derived from `core::error::to_exit_code`.
//! Invariants: All transcoding goes through the pure `core` codecs; this layer
//! only does file I/O and reporting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use menuforge::core::catalog::MaterialCatalog;
use menuforge::core::deserialize::{parse_menu_outcome, ParseOutcome};
use menuforge::core::error::{to_exit_code, Error, ErrorKind};
use menuforge::core::material::MaterialTag;
use menuforge::core::serialize::generate_menu;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        emit_error(&err);
        std::process::exit(to_exit_code(err.kind()));
    }
}

#[derive(Parser)]
#[command(
    name = "menuforge",
    version,
    about = "Validate and regenerate DeluxeMenus-style menu configurations",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    after_help = r#"EXAMPLES
  $ menuforge check shop.yml
  $ menuforge check shop.yml --json --catalog materials.yml --platform 1.21
  $ menuforge fmt shop.yml --write
  $ menuforge roundtrip shop.yml

  $ menuforge <command> --help"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Parse a menu file and report its contents")]
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long, help = "Emit the report as JSON on stdout")]
        json: bool,
        #[arg(
            long,
            value_hint = ValueHint::FilePath,
            requires = "platform",
            help = "Material catalog file (version: [names]) to validate against"
        )]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Platform version to look up in the catalog")]
        platform: Option<String>,
    },
    #[command(about = "Parse a menu file and print (or rewrite) its canonical form")]
    Fmt {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long, help = "Rewrite the file in place instead of printing")]
        write: bool,
    },
    #[command(about = "Verify that parse -> generate -> parse is stable for a file")]
    Roundtrip {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    #[command(about = "Generate shell completions")]
    Completions { shell: Shell },
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    title: String,
    inventory_type: String,
    size: u32,
    items: usize,
    args: usize,
    dropped_items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unknown_materials: Vec<String>,
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Check {
            file,
            json,
            catalog,
            platform,
        } => check(&file, json, catalog.as_deref(), platform.as_deref()),
        Command::Fmt { file, write } => fmt(&file, write),
        Command::Roundtrip { file } => roundtrip(&file),
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "menuforge", &mut io::stdout());
            Ok(())
        }
    }
}

fn check(
    file: &Path,
    json: bool,
    catalog: Option<&Path>,
    platform: Option<&str>,
) -> Result<(), Error> {
    let text = read_file(file)?;
    let outcome = parse_menu_outcome(&text)?;
    warn_dropped(&outcome);

    let unknown_materials = match (catalog, platform) {
        (Some(catalog_path), Some(platform)) => {
            let catalog = MaterialCatalog::from_yaml(&read_file(catalog_path)?)?;
            if catalog.lookup(platform).is_none() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("unknown platform version {platform}"))
                    .with_hint(format!(
                        "Catalog versions: {}",
                        catalog.versions().collect::<Vec<_>>().join(", ")
                    )));
            }
            unknown_vanilla_materials(&outcome, &catalog, platform)
        }
        _ => Vec::new(),
    };

    let settings = &outcome.settings;
    let report = CheckReport {
        file: file.display().to_string(),
        title: settings.title.clone(),
        inventory_type: settings.menu_type.as_str().to_string(),
        size: settings.size,
        items: settings.items.len(),
        args: settings.args.len(),
        dropped_items: outcome.dropped_items.clone(),
        unknown_materials,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("cannot render report")
                .with_source(err)
        })?;
        println!("{rendered}");
    } else {
        println!(
            "{}: \"{}\" ({} {} slots), {} item(s), {} arg(s)",
            report.file, report.title, report.inventory_type, report.size, report.items, report.args
        );
        for id in &report.dropped_items {
            println!("  dropped (no slots): {id}");
        }
        for material in &report.unknown_materials {
            println!("  unknown material: {material}");
        }
    }
    Ok(())
}

fn unknown_vanilla_materials(
    outcome: &ParseOutcome,
    catalog: &MaterialCatalog,
    platform: &str,
) -> Vec<String> {
    let mut unknown = Vec::new();
    for item in &outcome.settings.items {
        if let Some(name) = MaterialTag::parse(&item.material).vanilla_name() {
            if !catalog.contains(platform, name) && !unknown.iter().any(|seen| seen == name) {
                unknown.push(name.to_string());
            }
        }
    }
    unknown
}

fn fmt(file: &Path, write: bool) -> Result<(), Error> {
    let text = read_file(file)?;
    let outcome = parse_menu_outcome(&text)?;
    warn_dropped(&outcome);
    let canonical = generate_menu(&outcome.settings)?;

    if write {
        fs::write(file, &canonical).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("cannot write {}", file.display()))
                .with_source(err)
        })?;
    } else {
        print!("{canonical}");
    }
    Ok(())
}

fn roundtrip(file: &Path) -> Result<(), Error> {
    let text = read_file(file)?;
    let first = parse_menu_outcome(&text)?;
    warn_dropped(&first);
    let canonical = generate_menu(&first.settings)?;

    let reparsed = parse_menu_outcome(&canonical).map_err(|err| {
        Error::new(ErrorKind::Generate)
            .with_message("generated configuration does not parse back")
            .with_source(err)
    })?;
    let canonical_again = generate_menu(&reparsed.settings)?;

    if canonical != canonical_again {
        return Err(Error::new(ErrorKind::Generate)
            .with_message(format!("round-trip drift detected for {}", file.display()))
            .with_hint(
                "Re-serializing the parsed output produced different text. \
                 This is a transcoder bug; please report the input file.",
            ));
    }

    println!(
        "round-trip stable: {} ({} item(s))",
        file.display(),
        reparsed.settings.items.len()
    );
    Ok(())
}

fn warn_dropped(outcome: &ParseOutcome) {
    for id in &outcome.dropped_items {
        warn!(item = %id, "item has no usable slots; dropped");
    }
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message(format!("cannot read {}", path.display()))
            .with_source(err)
    })
}

fn emit_error(err: &Error) {
    let mut body = json!({
        "kind": format!("{:?}", err.kind()),
        "message": err.message().unwrap_or("unexpected failure"),
    });
    if let Some(hint) = err.hint() {
        body["hint"] = json!(hint);
    }
    if let Some(source) = std::error::Error::source(err) {
        body["detail"] = json!(source.to_string());
    }
    eprintln!("{}", json!({ "error": body }));
}
