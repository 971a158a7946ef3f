//! Generate command implementation.
//!
//! Builds one size-class table, renders it and writes the header. The table
//! is assembled, checked and rendered entirely in memory first; the
//! destination is only touched once the full text exists.

use std::path::{Path, PathBuf};

use spangen_core::{SizeClassTable, TableAssembler, TableSummary, Variant};
use spangen_emit::{HeaderWriter, RenderOptions, RenderStyle};
use tracing::{debug, info};

use crate::commands::common::{error_messages, write_atomic};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, SpantError};

/// Arguments for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Which table to build.
    pub variant: Variant,
    /// Output path overriding the configured one.
    pub output: Option<PathBuf>,
    /// Render every field as an integer.
    pub literal: bool,
    /// Print the class summary after writing.
    pub summary: bool,
}

/// Generate command handler.
pub struct GenerateCommand {
    args: GenerateArgs,
    config: Config,
}

impl GenerateCommand {
    /// Create a command that uses `config` instead of the defaults.
    pub fn with_config(args: GenerateArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command, returning the path written.
    pub fn run(&self) -> Result<PathBuf> {
        let output_path = self.output_path();
        let file_name = self.validate_output_path(&output_path)?;

        let table = self.build_table()?;
        let text = self.render(&table, file_name)?;
        write_atomic(&output_path, &text)?;

        info!(
            path = %output_path.display(),
            variant = %table.variant(),
            classes = table.len(),
            "wrote size-class table"
        );

        if self.args.summary {
            let summary = TableSummary::new(&table);
            print!("{}", summary);
            println!("total slack: {} B", summary.total_slack());
        }

        Ok(output_path)
    }

    /// Assemble and check the requested table.
    fn build_table(&self) -> Result<SizeClassTable> {
        let assembler = TableAssembler::new(&self.config.classes, &self.config.huge);
        let table = assembler.assemble(self.args.variant)?;
        debug!(
            variant = %table.variant(),
            largest = table.max_object_size(),
            "assembled table"
        );
        Ok(table)
    }

    /// Render the header text for `table`.
    fn render(&self, table: &SizeClassTable, file_name: &str) -> Result<String> {
        let options = self.render_options();
        let text = HeaderWriter::new(&options)
            .with_command(self.command_line())
            .render(table, file_name)?;
        Ok(text)
    }

    /// Configured render options with command-line overrides applied.
    fn render_options(&self) -> RenderOptions {
        let mut options = self.config.render.clone();
        if self.args.literal {
            options.style = RenderStyle::Literal;
        }
        options
    }

    /// The invocation that regenerates this file.
    fn command_line(&self) -> String {
        match self.args.variant.keyword() {
            Some(keyword) => format!("{} {}", Self::name(), keyword),
            None => Self::name().to_string(),
        }
    }

    /// Get the output path.
    fn output_path(&self) -> PathBuf {
        match &self.args.output {
            Some(path) => path.clone(),
            None => self.config.output.path_for(self.args.variant).to_path_buf(),
        }
    }

    /// The output must be a file path; returns its file name.
    fn validate_output_path<'p>(&self, output_path: &'p Path) -> Result<&'p str> {
        if output_path.is_dir() {
            return Err(SpantError::Validation(format!(
                "{} {}",
                error_messages::OUTPUT_PATH_IS_DIR,
                output_path.display()
            )));
        }

        output_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SpantError::Validation(format!(
                    "{} {}",
                    error_messages::INVALID_OUTPUT_PATH,
                    output_path.display()
                ))
            })
    }
}

impl Command for GenerateCommand {
    type Args = GenerateArgs;
    type Output = PathBuf;

    fn new(args: Self::Args) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "spant"
    }
}

impl CommandDescription for GenerateCommand {
    fn description() -> &'static str {
        "Generate a size-class table header"
    }

    fn help() -> &'static str {
        "Builds the default fine + coarse table, or the huge-page table when \
         given `huge`, and writes it as a header-guarded macro definition."
    }
}

/// Generate and write the table selected by `args` using `config`.
pub fn run_generate(args: GenerateArgs, config: Config) -> Result<PathBuf> {
    GenerateCommand::with_config(args, config).execute()
}
