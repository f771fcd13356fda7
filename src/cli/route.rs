//! CLI route: single route table and run context. Dispatches to the pipeline and snapshot modules.

use crate::cli::output::{
    format_comparison_json, format_comparison_text, format_tree_json, format_tree_text,
};
use crate::cli::parse::{Commands, OutputFormat};
use crate::config::{ConfigLoader, MerkleprintConfig};
use crate::error::ApiError;
use crate::pipeline::{Pipeline, PipelineInput};
use crate::scheduler::SchedulerConfig;
use crate::snapshot::{self, TreeComparison};
use crate::tree::builder::MerkleTree;
use crate::tree::hasher::HashAlgorithm;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Flag overrides for one `build` invocation
#[derive(Debug, Default, Clone)]
pub struct BuildOverrides {
    pub timeout: Option<u64>,
    pub workers: Option<usize>,
    pub algorithm: Option<HashAlgorithm>,
}

/// Runtime context for CLI execution: workspace and loaded configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: MerkleprintConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::with_config(workspace_root, config))
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: MerkleprintConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &MerkleprintConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Build {
                paths,
                save,
                compare,
                timeout,
                workers,
                algorithm,
                format,
            } => {
                let overrides = BuildOverrides {
                    timeout: *timeout,
                    workers: *workers,
                    algorithm: *algorithm,
                };
                self.handle_build(
                    paths.clone(),
                    save.as_deref(),
                    compare.as_deref(),
                    &overrides,
                    *format,
                )
            }
            Commands::Show { snapshot, format } => self.handle_show(snapshot, *format),
            Commands::Compare {
                previous,
                current,
                format,
            } => self.handle_compare(previous, current, *format),
        };
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    /// Scheduler configuration after applying flag overrides to the loaded config.
    pub fn scheduler_config(&self, overrides: &BuildOverrides) -> Result<SchedulerConfig, ApiError> {
        let mut config = self.config.hashing.to_scheduler_config();
        if let Some(secs) = overrides.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(workers) = overrides.workers {
            config = config.with_max_workers(workers);
        }
        if let Some(algorithm) = overrides.algorithm {
            config = config.with_algorithm(algorithm);
        }
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }

    fn handle_build(
        &self,
        paths: Vec<PathBuf>,
        save: Option<&Path>,
        compare: Option<&Path>,
        overrides: &BuildOverrides,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let pipeline = Pipeline::new(self.scheduler_config(overrides)?)
            .with_walker_config(self.config.walker.clone());
        let input = PipelineInput::from_args(paths)?;
        let tree = pipeline.build_blocking(input)?;

        let mut sections = vec![render_tree("New Merkle Tree", &tree, format)?];

        if let Some(path) = save {
            snapshot::save_to_file(&tree, path)?;
            if format == OutputFormat::Text {
                sections.push(format!("Tree saved to {}", path.display()));
            }
        }

        if let Some(path) = compare {
            let previous = match snapshot::load_from_file(path) {
                Ok(previous) => previous,
                Err(source) => {
                    return Err(ApiError::ComparisonUnavailable {
                        rendered: sections.join("\n\n"),
                        source: Box::new(source),
                    })
                }
            };
            let comparison = TreeComparison::new(&tree, &previous);
            sections.push(render_comparison(&comparison, format)?);
        }

        Ok(sections.join("\n\n"))
    }

    fn handle_show(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let tree = snapshot::load_from_file(path)?;
        render_tree("Saved Merkle Tree", &tree, format)
    }

    fn handle_compare(
        &self,
        previous: &Path,
        current: &Path,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let previous = snapshot::load_from_file(previous)?;
        let current = snapshot::load_from_file(current)?;
        render_comparison(&TreeComparison::new(&current, &previous), format)
    }
}

fn render_tree(title: &str, tree: &MerkleTree, format: OutputFormat) -> Result<String, ApiError> {
    match format {
        OutputFormat::Text => Ok(format_tree_text(title, tree)),
        OutputFormat::Json => format_tree_json(tree),
    }
}

fn render_comparison(
    comparison: &TreeComparison,
    format: OutputFormat,
) -> Result<String, ApiError> {
    match format {
        OutputFormat::Text => Ok(format_comparison_text(comparison)),
        OutputFormat::Json => format_comparison_json(comparison),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Build { .. } => "build",
        Commands::Show { .. } => "show",
        Commands::Compare { .. } => "compare",
    }
}
