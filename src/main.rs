//! SimpleDB - command-line entry point.
//!
//! Opens the database context and optionally loads a catalog file, printing
//! the registered tables.

use std::path::PathBuf;
use std::process::ExitCode;

use simpledb::db::{Database, DatabaseConfig};
use simpledb::debug::{LogConfig, LogSink, Verbosity};
use simpledb::schema::SchemaDescriptor;

/// What the command line asked for.
#[derive(Debug)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Debug)]
struct Options {
    config: DatabaseConfig,
    catalog_file: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut config = DatabaseConfig::default();
    let mut verbose: u8 = 0;
    let mut catalog_file: Option<PathBuf> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-l" | "--log" => {
                i += 1;
                let path = args.get(i).ok_or("--log expects a path")?;
                config = config.log_path(path);
            }
            "-p" | "--pages" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<usize>()) {
                    Some(Ok(pages)) => config = config.buffer_pool_pages(pages),
                    _ => return Err("--pages expects a number".to_string()),
                }
            }
            "-v" | "--verbose" => {
                verbose = verbose.saturating_add(1);
            }
            "--json" => {
                json = true;
            }
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            arg => {
                if !arg.starts_with('-') {
                    catalog_file = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unknown option: {}", arg));
                }
            }
        }
        i += 1;
    }

    let config = config.logging(LogConfig::new(Verbosity::from_count(verbose), LogSink::Stderr));
    Ok(Command::Run(Options {
        config,
        catalog_file,
        json,
    }))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("SimpleDB v{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let Options {
        config,
        catalog_file,
        json,
    } = options;

    // The binary owns the process-wide subscriber.
    config.logging.init();
    let db = Database::open_or_exit(config);

    if let Some(path) = catalog_file {
        if let Err(e) = db.catalog().load_heap_files(&path) {
            eprintln!("Error loading catalog {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    if json {
        print_tables_json(&db);
    } else {
        print_tables(&db);
    }
    ExitCode::SUCCESS
}

fn print_help() {
    println!("SimpleDB - tuple schemas and table catalog");
    println!();
    println!("Usage: simpledb [OPTIONS] [CATALOG]");
    println!();
    println!("Options:");
    println!("  -l, --log PATH     Path to the log file (default: log)");
    println!("  -p, --pages N      Buffer pool size in pages (default: 50)");
    println!("  -v, --verbose      More diagnostic output (repeatable)");
    println!("  --json             Print the catalog as JSON");
    println!("  -h, --help         Show this help message");
    println!("  --version          Show version");
    println!();
    println!("Catalog files list one table per line:");
    println!("  users (id int pk, name string)");
}

fn collect_tables(db: &Database) -> Vec<(String, SchemaDescriptor, String)> {
    let catalog = db.catalog();
    let mut rows = Vec::new();
    for id in catalog.table_ids() {
        let (Ok(name), Ok(schema), Ok(pk)) = (
            catalog.table_name(id),
            catalog.schema_of(id),
            catalog.primary_key_of(id),
        ) else {
            continue;
        };
        rows.push((name, schema, pk));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

fn print_tables(db: &Database) {
    let rows = collect_tables(db);
    for (name, schema, pk) in &rows {
        let pk = if pk.is_empty() { "-" } else { pk.as_str() };
        println!("{}\t[{}]\t{} bytes\tpk: {}", name, schema, schema.byte_size(), pk);
    }
    println!("({} tables, buffer pool: {} pages)", rows.len(), db.buffer_pool().num_pages());
}

fn print_tables_json(db: &Database) {
    let tables: Vec<serde_json::Value> = collect_tables(db)
        .into_iter()
        .map(|(name, schema, pk)| {
            serde_json::json!({
                "name": name,
                "primary_key": pk,
                "byte_size": schema.byte_size(),
                "fields": schema,
            })
        })
        .collect();

    let out = serde_json::json!({
        "tables": tables,
        "buffer_pool_pages": db.buffer_pool().num_pages(),
    });
    match serde_json::to_string_pretty(&out) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}
