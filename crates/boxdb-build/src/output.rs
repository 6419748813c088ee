use crate::{GenerationError, HEADER};
use std::{
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

///
/// GeneratedUnit
///
/// One generated source file: its name and the code below the header.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedUnit {
    pub file_name: String,
    pub code: String,
}

impl GeneratedUnit {
    #[must_use]
    pub const fn new(file_name: String, code: String) -> Self {
        Self { file_name, code }
    }

    /// Full file contents, header first.
    #[must_use]
    pub fn contents(&self) -> String {
        format!("{HEADER}\n\n{}\n", self.code)
    }
}

///
/// GeneratedSource
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedSource {
    pub units: Vec<GeneratedUnit>,
    suffix: String,
}

impl GeneratedSource {
    #[must_use]
    pub const fn new(units: Vec<GeneratedUnit>, suffix: String) -> Self {
        Self { units, suffix }
    }

    #[must_use]
    pub fn unit(&self, file_name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.file_name == file_name)
    }

    /// Every unit concatenated under a single header, the form `include!`
    /// consumes.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{HEADER}\n");
        for unit in &self.units {
            out.push('\n');
            out.push_str(&unit.code);
            out.push('\n');
        }

        out
    }

    /// Write each unit to `dir`, first removing every previously generated
    /// unit found there. Files are only removed when their name carries the
    /// generated suffix and their first line is the header.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, GenerationError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

        for stale in self.stale_units(dir)? {
            tracing::debug!(path = %stale.display(), "removing generated unit");
            fs::remove_file(&stale).map_err(|source| io_error(&stale, source))?;
        }

        let mut written = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let path = dir.join(&unit.file_name);
            fs::write(&path, unit.contents()).map_err(|source| io_error(&path, source))?;
            written.push(path);
        }

        Ok(written)
    }

    fn stale_units(&self, dir: &Path) -> Result<Vec<PathBuf>, GenerationError> {
        let entries = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;
        let mut stale = Vec::new();

        for entry in entries {
            let path = entry.map_err(|source| io_error(dir, source))?.path();
            let suffixed = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&self.suffix));

            if suffixed && path.is_file() && starts_with_header(&path)? {
                stale.push(path);
            }
        }

        Ok(stale)
    }
}

fn starts_with_header(path: &Path) -> Result<bool, GenerationError> {
    let file = fs::File::open(path).map_err(|source| io_error(path, source))?;
    let mut first = String::new();

    // non-utf8 content cannot be ours
    match BufReader::new(file).read_line(&mut first) {
        Ok(_) => Ok(first.trim_end() == HEADER),
        Err(err) if err.kind() == std::io::ErrorKind::InvalidData => Ok(false),
        Err(source) => Err(io_error(path, source)),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GenerationError {
    GenerationError::Io {
        path: path.display().to_string(),
        source,
    }
}
