//! Config file search path

use std::path::{Path, PathBuf};

/// Ordered list of directories searched for the config file.
///
/// Built as: explicit paths (in order), the application directory, the home
/// directory, then the directory named by an environment variable. Earlier
/// entries win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn build<I, P>(explicit: I, cwd: &Path, home: Option<&Path>, env_var: Option<&str>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut search = Self::default();

        for path in explicit {
            search.push(path.into());
        }
        search.push(cwd.to_path_buf());
        match home {
            Some(home) => search.push(home.to_path_buf()),
            None => tracing::debug!("no home directory, skipping it in the search path"),
        }

        if let Some(name) = env_var {
            match std::env::var_os(name) {
                Some(value) if !value.is_empty() => search.push(PathBuf::from(value)),
                Some(_) => tracing::debug!("${} is empty, skipping it in the search path", name),
                None => {}
            }
        }

        search
    }

    /// [`Self::build`] with the user's real home directory.
    pub fn with_user_home<I, P>(explicit: I, cwd: &Path, env_var: Option<&str>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let home = dirs::home_dir();
        Self::build(explicit, cwd, home.as_deref(), env_var)
    }

    fn push(&mut self, dir: PathBuf) {
        tracing::debug!("adding {} to the search path", dir.display());
        self.dirs.push(dir);
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First `dir/filename` that is a regular file.
    ///
    /// An absolute `filename` resolves to itself in the first directory.
    pub fn find(&self, filename: impl AsRef<Path>) -> Option<PathBuf> {
        let filename = filename.as_ref();
        let found = self.dirs.iter().map(|dir| dir.join(filename)).find(|candidate| candidate.is_file());

        match &found {
            Some(path) => tracing::debug!("configuration file found: {}", path.display()),
            None => tracing::info!(
                "configuration file {} not found in {} search directories",
                filename.display(),
                self.dirs.len()
            ),
        }
        found
    }
}

/// Search for `filename` across explicit paths, `cwd`, home and `$env_var`.
pub fn find_config_file<I, P>(
    filename: impl AsRef<Path>,
    explicit: I,
    cwd: &Path,
    env_var: Option<&str>,
) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    SearchPath::with_user_home(explicit, cwd, env_var).find(filename)
}
