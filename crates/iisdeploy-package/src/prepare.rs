use crate::{
    extract_archive, locate_config, prune_parameters, Environment, LogProgress, ProgressSink,
    Result, TemplateConfigurer, PARAMETERS_FILE_NAME,
};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Template file expected in the web project directory.
pub const TEMPLATE_FILE_NAME: &str = "web.template.config";

const TEMP_PREFIX: &str = "iisdeploy-";

/// Extracts a package and specialises it for one environment.
pub struct ArchivePreparer<T> {
    configurer: T,
    progress: Box<dyn ProgressSink + Send + Sync>,
    temp_root: Option<PathBuf>,
}

impl<T: TemplateConfigurer> ArchivePreparer<T> {
    /// Create a preparer rendering configuration with `configurer`.
    pub fn new(configurer: T) -> Self {
        Self {
            configurer,
            progress: Box::new(LogProgress),
            temp_root: None,
        }
    }

    /// Set where per-entry extraction messages go when preparing verbosely.
    pub fn with_progress(mut self, progress: impl ProgressSink + Send + Sync + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Create archive directories under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Extract `package`, render `web.template.config` from `project_dir`
    /// over the package's `Web.config`, then drop the `XmlFile` parameters.
    ///
    /// The returned archive owns its temporary directory. Any failure removes
    /// the directory before returning.
    pub fn prepare(
        &self,
        package: &Path,
        project_dir: &Path,
        environment: &Environment,
        verbose: bool,
    ) -> Result<PreparedArchive> {
        let dir = self.create_dir()?;
        debug!("extracting {} to {}", package.display(), dir.path().display());

        let progress = verbose.then_some(self.progress.as_ref() as &dyn ProgressSink);
        let entries = extract_archive(package, dir.path(), progress)?;
        debug!("extracted {} entries", entries);

        let config_file = locate_config(dir.path())?;
        let template = project_dir.join(TEMPLATE_FILE_NAME);
        info!(
            "configuring {} from {}",
            config_file.display(),
            template.display()
        );
        self.configurer
            .configure(&template, environment, &config_file)?;

        let removed_parameters = prune_parameters(&dir.path().join(PARAMETERS_FILE_NAME))?;

        Ok(PreparedArchive {
            dir,
            config_file,
            removed_parameters,
        })
    }

    fn create_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

/// An extracted, configured package ready to be synchronised.
///
/// The directory is deleted when this value is dropped unless [`keep`] is
/// called.
///
/// [`keep`]: PreparedArchive::keep
#[derive(Debug)]
pub struct PreparedArchive {
    dir: TempDir,
    config_file: PathBuf,
    removed_parameters: Vec<String>,
}

impl PreparedArchive {
    /// Root of the extracted package.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The rendered `Web.config`.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Names of the parameters removed from `parameters.xml`.
    pub fn removed_parameters(&self) -> &[String] {
        &self.removed_parameters
    }

    /// Keep the directory on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.into_path()
    }
}
