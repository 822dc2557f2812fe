///
/// jsbind CLI - Inspect the builtin binding layer
///
/// Provides commands for looking at how builtins translate:
/// - jsbind ops: List every builtin operator and its resolution
/// - jsbind key <KEY>: Show how a connected key resolves
/// - jsbind expand <OP> [ARGS..]: Render one operator call and its imports
/// - jsbind host: Check node and npm against the configured versions
///

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jsbind::js::{Expr, Tree, render_expression, render_statements};
use jsbind::{
    BackendConfig, BackendError, BuiltinOperatorId, DiagnosticReporter, ExternalReferenceRegistry, Genre,
    SourceFile, Span, collect_invalid, connected, host, operators,
};

#[derive(Parser)]
#[command(name = "jsbind")]
#[command(author, version, about = "Builtin bindings for the JavaScript backend", long_about = None)]
struct Cli {
    /// Generation mode; overrides the config file
    #[arg(long, global = true, value_enum)]
    genre: Option<GenreArg>,

    /// Backend config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenreArg {
    Library,
    Documentation,
}

impl From<GenreArg> for Genre {
    fn from(arg: GenreArg) -> Self {
        match arg {
            GenreArg::Library => Genre::Library,
            GenreArg::Documentation => Genre::Documentation,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every builtin operator with its resolution
    Ops,

    /// Show how a connected key resolves
    Key {
        /// Connected key, e.g. String::slice
        key: String,
    },

    /// Render one operator call
    Expand {
        /// Operator name, e.g. PlusIntInt
        operator: String,

        /// Arguments: integers, floats, "strings" or identifiers
        args: Vec<String>,
    },

    /// Check host tools against the configured versions
    Host,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match BackendConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BackendConfig::default(),
    };
    if let Some(genre) = cli.genre {
        config.genre = genre.into();
    }

    let result = match cli.command {
        Commands::Ops => {
            list_operators(&config);
            Ok(())
        }
        Commands::Key { key } => show_key(&key, &config),
        Commands::Expand { operator, args } => expand_operator(&operator, &args, &config),
        Commands::Host => check_host(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn list_operators(config: &BackendConfig) {
    for &id in BuiltinOperatorId::ALL {
        match operators::resolve(id, config.genre, config.coroutine_strategy) {
            Some(code) => println!("{:<22} {:<8} {}", id, code.kind_name(), code.stable_name()),
            None => println!("{:<22} absent", id),
        }
    }
}

fn show_key(key: &str, config: &BackendConfig) -> Result<(), BackendError> {
    let code = connected::resolve_value_strict(key, config.genre, Span::dummy())?;
    println!("{} {}", code.kind_name(), code.stable_name());
    println!("{}", code.render_standalone());
    Ok(())
}

fn offset(len: usize) -> Result<u32, BackendError> {
    u32::try_from(len).map_err(|_| BackendError::Config(format!("arguments too long: {} bytes", len)))
}

/// Lays the arguments out as `a, b, c` so each gets a real span.
fn parse_args(args: &[String]) -> Result<(SourceFile, Vec<Tree>), BackendError> {
    let mut text = String::new();
    let mut trees = Vec::with_capacity(args.len());
    for arg in args {
        if !text.is_empty() {
            text.push_str(", ");
        }
        let start = offset(text.len())?;
        text.push_str(arg);
        let span = Span::new(start, offset(text.len())?, 0);

        let expr = if let Ok(n) = arg.parse::<i64>() {
            Expr::int(span, n)
        } else if let Ok(f) = arg.parse::<f64>() {
            Expr::float(span, f)
        } else if let Some(s) = arg.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            Expr::string(span, s)
        } else {
            Expr::ident(span, arg.as_str())
        };
        trees.push(Tree::Expr(expr));
    }
    Ok((SourceFile::new("<args>", text), trees))
}

fn expand_operator(name: &str, args: &[String], config: &BackendConfig) -> Result<(), BackendError> {
    let id: BuiltinOperatorId = name.parse().map_err(|e| BackendError::Config(format!("{}", e)))?;
    let code = operators::resolve_strict(id, config.genre, config.coroutine_strategy)?;

    let (source, trees) = parse_args(args)?;
    let registry = ExternalReferenceRegistry::new();
    let call_span = Span::new(0, offset(source.source.len())?, 0);
    let expr = code.invoke(call_span, &trees, config.genre, Some(&registry));

    let invalid = collect_invalid(&expr);
    if !invalid.is_empty() {
        DiagnosticReporter::new(&source).report_invalid(&invalid);
        std::process::exit(1);
    }

    let imports = registry.imports(config);
    if !imports.is_empty() {
        println!("{}", render_statements(&imports));
    }
    println!("{}", render_expression(&expr));
    Ok(())
}

fn check_host(config: &BackendConfig) -> Result<(), BackendError> {
    for (tool, version) in host::check_host(config)? {
        println!("{} {}", tool, version);
    }
    Ok(())
}
