//! jproxy command-line tool
//!
//! Generates the Java source of a reflective forwarding proxy for a JVM
//! interface and writes it to `<output-dir>/Proxy<Name>.java`.

mod logging;
mod output;
mod writer;

use anyhow::Context;
use clap::Parser;
use jproxy_core::{
    Config, CoreSurface, Generator, GeneratorOptions, LookupKeys, MethodOrder, PackageName,
};
use output::{resolve_color_choice, StyledOutput};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "jproxy")]
#[command(about = "Generate reflective proxy classes for JVM interfaces", long_about = None)]
#[command(version)]
struct Cli {
    /// Interface to proxy (e.g. com.acme.Sized)
    #[arg(short = 'c', long = "class", value_name = "NAME")]
    class: String,

    /// Jar, zip or class directory to load the interface from
    #[arg(short = 'i', long, value_name = "PATH")]
    archive: Option<PathBuf>,

    /// Package clause for the generated class
    #[arg(short, long)]
    package: Option<String>,

    /// Directory the generated file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Config file (defaults to ./jproxy.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Package treated as core runtime surface; replaces the configured list
    #[arg(long = "core-package", value_name = "PREFIX")]
    core_packages: Vec<String>,

    /// Extra host class path entry, searched before configured ones
    #[arg(long = "host-classpath", value_name = "PATH")]
    host_classpath: Vec<PathBuf>,

    /// Use primitive class literals (int.class) in method lookups
    #[arg(long)]
    primitive_lookup: bool,

    /// Emit methods sorted by name and parameter types
    #[arg(long)]
    sort_methods: bool,

    /// Do not check foreign types for toDelegateForm/fromDelegateForm
    #[arg(long)]
    no_verify_bridge: bool,

    /// Print the class name and source instead of writing a file
    #[arg(long)]
    print: bool,

    /// Debug logging (JPROXY_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    /// Colored output: auto, always, never
    #[arg(long, value_name = "WHEN")]
    color: Option<String>,
}

impl Cli {
    /// Config values overridden by flags
    fn generator_options(&self, config: &Config) -> GeneratorOptions {
        let mut options = config.generator_options();
        options.package = PackageName::from_option(self.package.clone());
        if !self.host_classpath.is_empty() {
            let configured = std::mem::take(&mut options.host_classpath);
            options.host_classpath = self.host_classpath.iter().cloned().chain(configured).collect();
        }
        if !self.core_packages.is_empty() {
            options.surface = CoreSurface::new(&self.core_packages);
        }
        if self.primitive_lookup {
            options.lookup_keys = LookupKeys::Primitive;
        }
        if self.sort_methods {
            options.method_order = MethodOrder::Sorted;
        }
        if self.no_verify_bridge {
            options.verify_bridges = false;
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders usage along with the message
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(cli.verbose);
    let mut out = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));

    let code = match run(&cli, &mut out) {
        Ok(code) => code,
        Err(err) => {
            out.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    };
    out.flush();
    code
}

fn run(cli: &Cli, out: &mut StyledOutput) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let config = Config::locate(cli.config.as_deref(), &cwd)?;
    let options = cli.generator_options(&config);

    let generator = match &cli.archive {
        Some(archive) => Generator::with_archive(archive, &cli.class, options),
        None => Generator::new(&cli.class, options),
    };
    let result = generator
        .generate()
        .with_context(|| format!("cannot generate a proxy for {}", cli.class))?;

    if cli.print {
        out.plain(&format!("{}\n{}", result.class_name(), result.class_body()));
        return Ok(ExitCode::SUCCESS);
    }

    let path = result.output_path(&cli.output_dir);
    match writer::persist(&path, result.class_body()) {
        Ok(()) => {
            out.success("SUCCESS");
            out.plain(&format!(", saved to: {}\n", path.display()));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to write proxy source");
            Ok(ExitCode::FAILURE)
        }
    }
}
