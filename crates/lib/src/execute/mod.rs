//! Build execution.
//!
//! [`Builder`] is the main entry point. One `build` invocation walks through
//! these phases:
//! - selecting the requested assets
//! - filtering out assets that are up to date (unless forced)
//! - pulling in stale asset inputs, transitively
//! - leveling the result into [`BuildStages`]
//! - executing stages in order, sequentially or with bounded parallelism
//!
//! Per-asset failures are recorded in the [`BuildReport`] and never stop
//! sibling assets or later stages.

pub mod cmd;
pub mod dag;
pub mod stages;
pub mod types;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::asset::{Asset, BuildAction, BuildOptions, RebuildCache};
use crate::project::{Project, ReleaseCommands};

pub use cmd::{Command, CommandRunner, CommandSubject, ShellRunner};
pub use dag::DependencyGraph;
pub use stages::BuildStages;
pub use types::{BuildError, BuildReport, CheckReport, CleanReport, ExecuteConfig};

/// Options used when building the assets a linter or tester requires.
const REQUIRED_BUILD: BuildOptions = BuildOptions {
  force: false,
  release: true,
  parallel: false,
};

/// Orchestrates builds, checks and release helpers for a project.
pub struct Builder<R: CommandRunner = ShellRunner> {
  project: Arc<Project>,
  runner: Arc<R>,
  config: ExecuteConfig,
}

impl Builder<ShellRunner> {
  /// Create a builder that runs commands through the platform shell.
  pub fn new(project: Arc<Project>, config: ExecuteConfig) -> Self {
    let runner = ShellRunner::new(config.shell.clone());
    Self::with_runner(project, runner, config)
  }
}

impl<R: CommandRunner> Builder<R> {
  pub fn with_runner(project: Arc<Project>, runner: R, config: ExecuteConfig) -> Self {
    Self {
      project,
      runner: Arc::new(runner),
      config,
    }
  }

  pub fn project(&self) -> &Project {
    &self.project
  }

  /// Resolve asset names.
  ///
  /// With no names, every asset is selected except release-only assets
  /// outside release mode. Named assets are always selected.
  ///
  /// # Errors
  ///
  /// Returns `NoSuchAsset` for the first name that is not defined.
  pub fn select_assets(&self, names: &[String], release: bool) -> Result<Vec<&Asset>, BuildError> {
    let catalog = self.project.catalog();

    if names.is_empty() {
      return Ok(
        catalog
          .iter()
          .filter(|asset| release || !asset.is_release_only())
          .collect(),
      );
    }

    names
      .iter()
      .map(|name| catalog.get(name).ok_or_else(|| BuildError::NoSuchAsset(name.clone())))
      .collect()
  }

  /// Drop assets that do not need building, unless `force` is set.
  pub fn filter_assets<'a>(&self, assets: Vec<&'a Asset>, options: &BuildOptions) -> Vec<&'a Asset> {
    if options.force {
      return assets;
    }

    let catalog = self.project.catalog();
    assets
      .into_iter()
      .filter(|asset| asset.needs_building(catalog, options))
      .collect()
  }

  /// Add every asset input that needs a rebuild, recursively.
  ///
  /// The result keeps first-seen order and contains each asset once.
  pub fn add_dependencies<'a>(&'a self, assets: &[&'a Asset]) -> Vec<&'a Asset> {
    let mut walk = DependencyWalk::default();
    for asset in assets {
      self.collect_dependencies(asset, &mut walk);
    }
    walk.expanded
  }

  fn collect_dependencies<'a>(&'a self, asset: &'a Asset, walk: &mut DependencyWalk<'a>) {
    if !walk.seen.insert(asset.name()) {
      return;
    }
    walk.expanded.push(asset);

    let catalog = self.project.catalog();
    for name in asset.asset_inputs() {
      if let Some(input) = catalog.get(name)
        && input.needs_rebuild_cached(catalog, &mut walk.stale)
      {
        debug!(asset = %asset.name(), dependency = %name, "pulling in stale dependency");
        self.collect_dependencies(input, walk);
      }
    }
  }

  /// Build the named assets (all assets when `names` is empty).
  ///
  /// # Errors
  ///
  /// Returns `NoSuchAsset` or `CycleDetected` before anything is built.
  /// Build-step failures are recorded in the returned report.
  pub async fn build(&self, names: &[String], options: BuildOptions) -> Result<BuildReport, BuildError> {
    let selected = self.select_assets(names, options.release)?;
    let needed = self.filter_assets(selected, &options);
    let expanded = self.add_dependencies(&needed);

    DependencyGraph::new(&expanded).verify_acyclic()?;
    let stages = BuildStages::compute(&expanded)?;

    info!(
      assets = expanded.len(),
      stages = stages.len(),
      parallel = options.parallel,
      "starting build"
    );

    let mut report = BuildReport {
      stages: stages.stages().to_vec(),
      ..Default::default()
    };

    for (idx, stage) in stages.iter().enumerate() {
      let span = info_span!("stage", stage = idx + 1);
      if options.parallel {
        self.run_stage_parallel(stage, options, &mut report).instrument(span).await;
      } else {
        self.run_stage(stage, options, &mut report).instrument(span).await;
      }
    }

    info!(built = report.built.len(), failed = report.failed.len(), "build finished");
    Ok(report)
  }

  /// Build the stage one asset at a time, in list order.
  ///
  /// Each asset still runs on its own task so a panicking build function
  /// fails that asset only, as in parallel stages.
  async fn run_stage(&self, stage: &[String], options: BuildOptions, report: &mut BuildReport) {
    debug!(assets = stage.len(), "executing stage sequentially");
    for name in stage {
      let project = Arc::clone(&self.project);
      let runner = Arc::clone(&self.runner);
      let asset = name.clone();

      let handle = tokio::spawn(
        async move { build_named(&project, runner.as_ref(), &asset, options).await }.in_current_span(),
      );
      let result = match handle.await {
        Ok(result) => result,
        Err(e) => Err(task_failure(name, &e)),
      };
      record(report, name.clone(), result);
    }
  }

  async fn run_stage_parallel(&self, stage: &[String], options: BuildOptions, report: &mut BuildReport) {
    debug!(assets = stage.len(), parallelism = self.config.parallelism, "executing stage in parallel");

    let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
    let mut join_set = JoinSet::new();
    let mut task_assets = HashMap::new();

    for name in stage {
      let project = Arc::clone(&self.project);
      let runner = Arc::clone(&self.runner);
      let semaphore = Arc::clone(&semaphore);
      let asset = name.clone();

      let handle = join_set.spawn(
        async move {
          let result = match semaphore.acquire().await {
            Ok(_permit) => build_named(&project, runner.as_ref(), &asset, options).await,
            Err(e) => Err(BuildError::Task {
              asset: asset.clone(),
              message: e.to_string(),
            }),
          };
          (asset, result)
        }
        .in_current_span(),
      );
      task_assets.insert(handle.id(), name.clone());
    }

    while let Some(joined) = join_set.join_next_with_id().await {
      match joined {
        Ok((_, (name, result))) => record(report, name, result),
        Err(e) => {
          let asset = task_assets.remove(&e.id()).unwrap_or_default();
          let failure = task_failure(&asset, &e);
          record(report, asset, Err(failure));
        }
      }
    }
  }

  /// Build a single asset, ignoring staleness.
  pub async fn build_asset(&self, asset: &Asset, options: BuildOptions) -> Result<(), BuildError> {
    build_one(&self.project, self.runner.as_ref(), asset, options).await
  }

  /// Run every linter, building its required assets first.
  ///
  /// When `fix` is set, linters with an autofix command run that instead.
  pub async fn lint(&self, fix: bool) -> Result<CheckReport, BuildError> {
    let mut report = CheckReport::default();
    info!(linters = self.project.linters().len(), fix, "linting");

    for linter in self.project.linters() {
      let span = info_span!("linter", name = %linter.name);
      self
        .run_check(&linter.requires, linter.command_for(fix), linter.command_subject(), &mut report)
        .instrument(span)
        .await?;
    }

    Ok(report)
  }

  /// Run every tester, building its required assets first.
  pub async fn test(&self) -> Result<CheckReport, BuildError> {
    let mut report = CheckReport::default();
    info!(testers = self.project.testers().len(), "testing");

    for tester in self.project.testers() {
      let span = info_span!("tester", name = %tester.name);
      self
        .run_check(&tester.requires, &tester.command, tester.command_subject(), &mut report)
        .instrument(span)
        .await?;
    }

    Ok(report)
  }

  async fn run_check(
    &self,
    requires: &[String],
    command: &Command,
    subject: CommandSubject,
    report: &mut CheckReport,
  ) -> Result<(), BuildError> {
    if !requires.is_empty() {
      info!(requires = ?requires, "building required assets");
      let builds = self.build(requires, REQUIRED_BUILD).await?;
      report.builds.merge(builds);
    }

    let result = match command.render(&subject) {
      Ok(cmd) => self.runner.run(&cmd).await,
      Err(e) => Err(e),
    };

    match result {
      Ok(_) => {
        info!(check = %subject.name, "check passed");
        report.passed.push(subject.name);
      }
      Err(e) => {
        error!(check = %subject.name, error = %e, "check failed");
        report.failed.push((subject.name, e));
      }
    }
    Ok(())
  }

  /// Remove the outputs of the named assets (all assets when empty).
  ///
  /// # Errors
  ///
  /// Returns `NoSuchAsset` for unknown names and `Io` when a removal fails.
  pub async fn clean(&self, names: &[String]) -> Result<CleanReport, BuildError> {
    let mut report = CleanReport::default();

    for asset in self.select_assets(names, true)? {
      let outfile = asset.outfile();
      if outfile.exists() {
        info!(asset = %asset.name(), path = %outfile, "removing output");
        outfile.remove().await.map_err(|source| BuildError::Io {
          path: outfile.path().to_path_buf(),
          source,
        })?;
        report.removed.push(outfile.path().to_path_buf());
      } else {
        debug!(asset = %asset.name(), path = %outfile, "output not found");
        report.missing.push(outfile.path().to_path_buf());
      }
    }

    Ok(report)
  }

  /// Run the version bump command for `version`.
  pub async fn bump(&self, version: &str) -> Result<(), BuildError> {
    let subject = ReleaseCommands::bump_subject(version);
    let cmd = self.project.release().bump.render(&subject)?.replace("{version}", version);
    info!(version, "bumping version");
    self.runner.run(&cmd).await?;
    Ok(())
  }

  /// Push commits and tags.
  pub async fn push(&self) -> Result<(), BuildError> {
    let cmd = self.project.release().push.render(&CommandSubject::default())?;
    info!("pushing release");
    self.runner.run(&cmd).await?;
    Ok(())
  }

  /// Publish the package.
  pub async fn publish(&self) -> Result<(), BuildError> {
    let cmd = self.project.release().publish.render(&CommandSubject::default())?;
    info!("publishing");
    self.runner.run(&cmd).await?;
    Ok(())
  }
}

/// Accumulator for [`Builder::add_dependencies`].
#[derive(Default)]
struct DependencyWalk<'a> {
  seen: HashSet<&'a str>,
  expanded: Vec<&'a Asset>,
  stale: RebuildCache<'a>,
}

/// A build task that panicked or was cancelled.
fn task_failure(asset: &str, error: &JoinError) -> BuildError {
  error!(asset = %asset, error = %error, "build task did not complete");
  BuildError::Task {
    asset: asset.to_string(),
    message: error.to_string(),
  }
}

fn record(report: &mut BuildReport, name: String, result: Result<(), BuildError>) {
  match result {
    Ok(()) => {
      info!(asset = %name, "built");
      report.built.push(name);
    }
    Err(e) => {
      error!(asset = %name, error = %e, "build failed");
      report.failed.push((name, e));
    }
  }
}

async fn build_named<R: CommandRunner>(
  project: &Project,
  runner: &R,
  name: &str,
  options: BuildOptions,
) -> Result<(), BuildError> {
  let asset = project
    .catalog()
    .get(name)
    .ok_or_else(|| BuildError::NoSuchAsset(name.to_string()))?;
  build_one(project, runner, asset, options).await
}

async fn build_one<R: CommandRunner>(
  project: &Project,
  runner: &R,
  asset: &Asset,
  options: BuildOptions,
) -> Result<(), BuildError> {
  info!(asset = %asset.name(), "building");

  match asset.action() {
    Some(BuildAction::Function(build)) => {
      let mut inputs = Vec::with_capacity(asset.inputs().len());
      for input in asset.inputs() {
        let buildable = project.catalog().resolve(input).ok_or_else(|| {
          BuildError::NoSuchAsset(input.asset_name().unwrap_or_default().to_string())
        })?;

        if buildable.is_file() {
          debug!(path = %buildable.path().display(), "reading input");
          let contents = buildable.read().await.map_err(|source| BuildError::Io {
            path: buildable.path().to_path_buf(),
            source,
          })?;
          inputs.push(contents);
        } else {
          debug!(path = %buildable.path().display(), "input is not a file, passing its path");
          inputs.push(buildable.path().display().to_string());
        }
      }

      let output = build(&options, &inputs).map_err(|e| BuildError::Function {
        asset: asset.name().to_string(),
        message: format!("{:#}", e),
      })?;

      let outfile = asset.outfile();
      debug!(path = %outfile, bytes = output.len(), "writing output");
      outfile.write(&output).await.map_err(|source| BuildError::Io {
        path: outfile.path().to_path_buf(),
        source,
      })?;
    }
    Some(BuildAction::Command(command)) => {
      let cmd = command.render(&asset.command_subject())?;
      runner.run(&cmd).await?;
    }
    None => {
      warn!(asset = %asset.name(), "asset has neither a build function nor a command");
    }
  }

  Ok(())
}
