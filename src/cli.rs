//! CLI implementation.
mod config;
mod source;

pub use crate::cli::config::{Config, CONFIG_FILE};
pub use crate::cli::source::{open_source, SourceType};
use crate::backend::{Identity, TextBackend};
use crate::error::{Error, Result};
use crate::logs::{LogEvent, Logger};
use crate::pipeline::{ParallelismOptions, Pipeline, Report, Visitor};

use clap::Parser;
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::num::NonZero;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bind card data to the areas of printable card layouts
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[cfg(not(target_os = "windows"))]
    /// Project name, corresponding to a folder in ~/.cardlay,
    /// or the current folder if omitted.
    pub project: Option<String>,

    #[cfg(target_os = "windows")]
    /// Project name, corresponding to a folder in %APPDATA%/cardlay,
    /// or the current folder if omitted.
    pub project: Option<String>,

    /// Config file path, overriding the project lookup
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data source type
    #[arg(short, long, value_enum)]
    pub source: Option<SourceType>,

    /// Input data path, or a folder of card data files
    #[arg(short, long, required_unless_present = "check")]
    pub input: Option<PathBuf>,

    /// Output sheet path, standard output if omitted; with a folder as input,
    /// the folder receiving one sheet per file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = NonZero::<usize>::MIN)]
    pub workers: NonZero<usize>,

    /// Only validate the layout documents
    #[arg(long)]
    pub check: bool,

    /// Fail cards missing any layout field
    #[arg(long)]
    pub require_all: bool,

    /// Log every card
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run() {
        let cli = Self::parse();
        let logger = Logger::new_stderr().verbose(cli.verbose);
        if let Err(e) = cli.execute(&logger) {
            let _ = logger.log(LogEvent::Error(0, e.to_string()));
            std::process::exit(1);
        }
    }

    pub fn execute<W: Write + Send>(&self, logger: &Logger<W>) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::open(path)?,
            None => Config::find(self.project.as_deref())?,
        };
        let registry = config.load_registry()?;
        logger.log(LogEvent::Info(0, format!("{} layouts loaded", registry.len())))?;
        if self.check {
            return Ok(());
        }

        let input = self
            .input
            .as_ref()
            .ok_or_else(|| Error::source_open(&"<input>", "no input path given"))?;
        let pipeline = Pipeline::new(Arc::new(registry), Arc::new(config.resolver()?))
            .require_all(self.require_all || config.render.require_all)
            .with_visitor(logger);

        let placed = if input.is_dir() {
            let folder = self.output.as_ref().ok_or_else(|| {
                Error::backend("an output folder is required when the input is a folder")
            })?;
            fs::create_dir_all(folder)
                .map_err(|e| Error::backend(format!("{}: {e}", folder.display())))?;
            let mut placed = 0;
            for path in self.batch_inputs(input)? {
                let stem = path.file_stem().unwrap_or(path.as_os_str()).to_string_lossy();
                let output = folder.join(format!("{stem}.txt"));
                placed += self.render(&pipeline, &config, &path, Some(&output))?.placed;
                logger.log(LogEvent::Info(0, format!("sheet written to {}", output.display())))?;
            }
            placed
        } else {
            self.render(&pipeline, &config, input, self.output.as_deref())?.placed
        };
        if placed > 0 {
            logger.summary()?;
        }
        Ok(())
    }

    /// Card data files of a folder, sorted by name. Only files whose type is
    /// known from the extension are taken, and only of the requested type
    /// when one is given.
    fn batch_inputs(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(folder).map_err(|e| Error::source_open(&folder, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::source_open(&folder, e))?.path();
            let Some(src_type) = SourceType::infer(&path) else {
                continue;
            };
            if path.is_file() && self.source.map_or(true, |s| s == src_type) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(Error::source_open(&folder, "no card data files found"));
        }
        paths.sort();
        Ok(paths)
    }

    /// Renders one data file into one sheet.
    fn render<V: Visitor>(
        &self,
        pipeline: &Pipeline<V>,
        config: &Config,
        input: &Path,
        output: Option<&Path>,
    ) -> Result<Report> {
        let mut source = open_source(self.source, input, &config.source)?;
        let out: Box<dyn Write> = match output {
            Some(path) => {
                let file = File::create(path)
                    .map_err(|e| Error::backend(format!("{}: {e}", path.display())))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(stdout().lock()),
        };
        let mut backend = TextBackend::new(out, config.sheet.columns, config.sheet.rows)
            .with_identity(Identity::new(config.project.identity.clone()));
        if config.sheet.backs {
            backend = backend.with_backs(config.icon_table()?);
        }

        let opt = ParallelismOptions::new(self.workers);
        if opt.n_workers() > 1 {
            pipeline.run_parallel(source.as_mut(), &mut backend, opt)
        } else {
            pipeline.run(source.as_mut(), &mut backend)
        }
    }
}
