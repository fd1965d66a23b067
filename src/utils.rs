use std::io;
use std::path::PathBuf;

const CACHE_DIR_NAME: &str = "nrel_rs_cache";

/// The default cache folder inside the platform cache directory. Not created here.
pub fn get_cache_dir() -> io::Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine system cache directory",
            )
        })
        .map(|p| p.join(CACHE_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_name() {
        if let Ok(dir) = get_cache_dir() {
            assert!(dir.ends_with(CACHE_DIR_NAME));
        }
    }
}
