mod debug_report;

use eliza::{Script, Session, TransformDetails, repl, repl_with};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing();

    let loaded;
    let script = match &config.script {
        Some(path) => match Script::from_path(path) {
            Ok(script) => {
                loaded = script;
                &loaded
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        },
        None => Script::doctor(),
    };

    if config.print_script {
        print!("{script}");
        return;
    }

    let mut session = Session::new(script);
    let mut rng = rand::thread_rng();
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    let result = if config.debug {
        let color = config.color;
        let mut report = |input: &str, details: &TransformDetails| debug_report::print_transform(input, details, color);
        repl_with(&mut session, &mut rng, stdin, stdout, Some(&mut report))
    } else {
        repl(&mut session, &mut rng, stdin, stdout)
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Log events go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    script: Option<PathBuf>,
    debug: bool,
    print_script: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut script: Option<PathBuf> = None;
    let mut debug = false;
    let mut print_script = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("eliza {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-d" | "--debug-print" => debug = true,
            "--print-script" => print_script = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "-s" | "--script" => {
                let value = args.next().ok_or_else(|| "error: --script expects a path".to_string())?;
                if script.is_some() {
                    return Err("error: script provided multiple times".to_string());
                }
                script = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--script=") => {
                let value = arg.trim_start_matches("--script=");
                if script.is_some() {
                    return Err("error: script provided multiple times".to_string());
                }
                script = Some(PathBuf::from(value));
            }
            _ => {
                return Err(format!("error: unknown option '{arg}'\n\n{}", help_text()));
            }
        }
    }

    Ok(CliConfig { script, debug, print_script, color })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "eliza {version}

Rule-driven conversation engine in the style of ELIZA.
Reads lines from stdin and answers each one until a quit phrase or EOF.

Usage:
  eliza [OPTIONS]

Options:
  -s, --script <path>        Script file to load. Default: the bundled DOCTOR script.
  -d, --debug-print          Print a trace of every transform to stderr.
  --print-script             Print the loaded script and exit.
  --color                    Force ANSI color in the debug trace.
  --no-color                 Disable ANSI color in the debug trace.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter for engine events, e.g. eliza=debug.

Exit codes:
  0  Success.
  1  Invalid script or I/O error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
