//! Dynamic loading of the vendor shared libraries.

use std::ffi::OsString;
use std::path::Path;

use libloading::{Library as SharedLibrary, Symbol};
use tracing::{debug, info};

use crate::error::{Error, Library, Result};

/// Platform default file names for a library, most specific first.
fn default_names(library: Library) -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        match library {
            Library::CudaRuntime => &["cudart64_12.dll", "cudart64_110.dll"],
            Library::Cusolver => &["cusolver64_11.dll"],
            Library::Cusparse => &["cusparse64_12.dll", "cusparse64_11.dll"],
            Library::Nvjpeg => &["nvjpeg64_12.dll", "nvjpeg64_11.dll"],
        }
    }

    #[cfg(target_os = "macos")]
    {
        match library {
            Library::CudaRuntime => &["libcudart.dylib"],
            Library::Cusolver => &["libcusolver.dylib"],
            Library::Cusparse => &["libcusparse.dylib"],
            Library::Nvjpeg => &["libnvjpeg.dylib"],
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match library {
            Library::CudaRuntime => &["libcudart.so.12", "libcudart.so.11.0", "libcudart.so"],
            Library::Cusolver => &["libcusolver.so.11", "libcusolver.so"],
            Library::Cusparse => &["libcusparse.so.12", "libcusparse.so.11", "libcusparse.so"],
            Library::Nvjpeg => &["libnvjpeg.so.12", "libnvjpeg.so.11", "libnvjpeg.so"],
        }
    }
}

/// Candidate paths to try, with an explicit override first.
pub fn candidates(library: Library, override_path: Option<OsString>) -> Vec<OsString> {
    let mut out: Vec<OsString> = override_path.into_iter().filter(|p| !p.is_empty()).collect();
    out.extend(default_names(library).iter().map(OsString::from));
    out
}

/// Open a library, honouring its `NVLIBS_*_PATH` override.
pub fn open(library: Library) -> Result<SharedLibrary> {
    let names = candidates(library, std::env::var_os(library.path_env_var()));
    open_any(library, &names)
}

/// Open a library from an explicit path.
pub fn open_path(library: Library, path: &Path) -> Result<SharedLibrary> {
    open_any(library, &[path.as_os_str().to_os_string()])
}

fn open_any(library: Library, names: &[OsString]) -> Result<SharedLibrary> {
    let mut failures = Vec::new();
    for name in names {
        match unsafe { SharedLibrary::new(name) } {
            Ok(lib) => {
                info!(%library, path = ?name, "loaded native library");
                return Ok(lib);
            }
            Err(e) => {
                debug!(%library, path = ?name, error = %e, "failed to load candidate");
                failures.push(format!("{}: {}", name.to_string_lossy(), e));
            }
        }
    }

    Err(Error::LibraryLoad {
        library,
        message: if failures.is_empty() {
            "no candidate paths".to_string()
        } else {
            failures.join("; ")
        },
    })
}

/// Resolve an entry point to a function pointer.
///
/// # Safety
///
/// `F` must be the exact `extern "C"` signature of `name`.
pub unsafe fn symbol<F: Copy>(lib: &SharedLibrary, library: Library, name: &str) -> Result<F> {
    let sym: Symbol<F> = lib.get(name.as_bytes()).map_err(|_| Error::MissingSymbol {
        library,
        symbol: name.to_string(),
    })?;
    Ok(*sym)
}
