use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zpretty::{decode, encode, Dialect, DialectKind, Error, Prettifier};

const STDIN: &str = "-";

#[derive(Parser)]
#[command(name = "zpretty")]
#[command(about = "An opinionated HTML/XML soup formatter")]
struct Args {
    /// The file encoding
    #[arg(long, default_value = "utf8")]
    encoding: String,

    /// Format files in place (overwrite existing file)
    #[arg(short, long)]
    inplace: bool,

    /// Treat the input file(s) as XML
    #[arg(short, long)]
    xml: bool,

    /// Treat the input file(s) as XML, following the ZCML style guide
    #[arg(short, long)]
    zcml: bool,

    /// Do not write anything, report the files that would be reformatted
    #[arg(long)]
    check: bool,

    /// Keep CDATA sections verbatim
    #[arg(long)]
    preserve_cdata: bool,

    /// Log repairs and parser fallbacks to standard error
    #[arg(short, long)]
    verbose: bool,

    /// The files to prettify, `-` reads standard input
    #[arg(default_value = STDIN)]
    files: Vec<PathBuf>,
}

impl Args {
    fn dialect(&self, path: &Path) -> Dialect {
        let mut dialect = if self.zcml {
            Dialect::from_kind(DialectKind::Zcml)
        } else if self.xml {
            Dialect::from_kind(DialectKind::Xml)
        } else {
            Dialect::for_path(path)
        };
        if self.preserve_cdata {
            dialect.preserve_cdata = true;
        }
        dialect
    }

    // --verbose shows debug records, otherwise RUST_LOG decides
    fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::from_default_env()
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    if path == Path::new(STDIN) {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        Ok(fs::read(path)?)
    }
}

// returns whether the file is already pretty
fn process(args: &Args, path: &Path) -> Result<bool, Error> {
    let source = decode(&read(path)?, Some(&args.encoding))?;
    let prettifier = Prettifier::new(source, args.dialect(path));
    if args.check {
        let pretty = prettifier.check();
        if !pretty {
            println!("{} would be reformatted", path.display());
        }
        return Ok(pretty);
    }
    let prettified = encode(&prettifier.render(), &args.encoding)?;
    if args.inplace && path != Path::new(STDIN) {
        fs::write(path, prettified)?;
    } else {
        io::stdout().write_all(&prettified)?;
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(io::stderr)
        .init();
    let mut status = ExitCode::SUCCESS;
    for path in &args.files {
        match process(&args, path) {
            Ok(true) => {}
            Ok(false) => status = ExitCode::FAILURE,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
