//! Process-wide PDF engine setup.
//!
//! pdfium is a native library; locating it is done once per process and the
//! outcome is cached. Each extraction then binds a fresh [`Pdfium`] handle
//! on its blocking thread. There is no teardown.
//!
//! Lookup order (first hit wins):
//!
//! 1. `PDFIUM_LIB_PATH`: an explicit library file
//! 2. the platform library name next to the current executable
//! 3. the platform library name in `./.pdfium/` and `./`
//! 4. the system library search path

use crate::error::ParseError;
use pdfium_render::prelude::Pdfium;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Where the pdfium library was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    Path(PathBuf),
    System,
}

static RESOLVED: OnceLock<Result<LibrarySource, String>> = OnceLock::new();

/// Locate the pdfium library. Idempotent; later calls return the cached
/// outcome, including a cached failure.
pub fn init() -> Result<LibrarySource, ParseError> {
    RESOLVED
        .get_or_init(resolve)
        .clone()
        .map_err(ParseError::EngineUnavailable)
}

/// Bind a pdfium handle, initialising the engine first if needed.
///
/// Call from a blocking context: binding loads a shared library.
pub fn bind() -> Result<Pdfium, ParseError> {
    let bindings = match init()? {
        LibrarySource::Path(path) => Pdfium::bind_to_library(&path),
        LibrarySource::System => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| ParseError::EngineUnavailable(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

fn resolve() -> Result<LibrarySource, String> {
    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        let path = PathBuf::from(p);
        return match Pdfium::bind_to_library(&path) {
            Ok(_) => {
                info!("Using pdfium from PDFIUM_LIB_PATH: {}", path.display());
                Ok(LibrarySource::Path(path))
            }
            Err(e) => Err(format!(
                "{e} (PDFIUM_LIB_PATH={})",
                path.display()
            )),
        };
    }

    for path in candidate_paths() {
        if !path.is_file() {
            continue;
        }
        if Pdfium::bind_to_library(&path).is_ok() {
            info!("Using pdfium at {}", path.display());
            return Ok(LibrarySource::Path(path));
        }
        debug!("pdfium candidate {} failed to bind", path.display());
    }

    Pdfium::bind_to_system_library()
        .map(|_| {
            info!("Using system pdfium");
            LibrarySource::System
        })
        .map_err(|e| {
            format!(
                "{e}; {} not found next to the executable, in ./.pdfium or ./",
                Pdfium::pdfium_platform_library_name().to_string_lossy()
            )
        })
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(Pdfium::pdfium_platform_library_name_at_path(dir));
        }
    }
    candidates.push(Pdfium::pdfium_platform_library_name_at_path(Path::new(
        ".pdfium",
    )));
    candidates.push(Pdfium::pdfium_platform_library_name_at_path(Path::new(".")));
    candidates
}
