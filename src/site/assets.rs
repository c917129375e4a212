//! Image and stylesheet copying.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{CSS_DIR, IMAGES_DIR};
use crate::epub::sorted_files;
use crate::error::Result;
use crate::extract::IMAGE_EXTENSIONS;
use crate::util::has_extension;

/// Copy every image under `root` into `output/images/`, flattened.
///
/// Article bodies refer to images by file name only, so when two images
/// share a name the first one in walk order wins.
pub fn copy_images(root: &Path, output: &Path) -> Result<usize> {
    let images_dir = output.join(IMAGES_DIR);
    fs::create_dir_all(&images_dir)?;

    let mut copied = 0;
    for path in sorted_files(root).filter(|p| has_extension(p, IMAGE_EXTENSIONS)) {
        let Some(name) = path.file_name() else {
            continue;
        };
        let dest = images_dir.join(name);
        if dest.exists() {
            debug!(image = %path.display(), "duplicate image name, keeping first");
            continue;
        }
        fs::copy(&path, &dest)?;
        copied += 1;
    }
    Ok(copied)
}

/// Copy the first stylesheet under `root` into `output/css/`.
///
/// Returns its site-relative path, or `None` when the package has none.
pub fn copy_stylesheet(root: &Path, output: &Path) -> Result<Option<String>> {
    let Some(source) = sorted_files(root).find(|p| has_extension(p, &["css"])) else {
        return Ok(None);
    };
    let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };

    let css_dir = output.join(CSS_DIR);
    fs::create_dir_all(&css_dir)?;
    fs::copy(&source, css_dir.join(name))?;
    debug!(stylesheet = %source.display(), "copied stylesheet");
    Ok(Some(format!("{CSS_DIR}/{name}")))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_images_are_flattened_first_wins() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(src.path(), "a/chart.png", b"first");
        touch(src.path(), "b/chart.png", b"second");
        touch(src.path(), "b/photo.JPG", b"photo");
        touch(src.path(), "text/ch1.html", b"<p/>");

        assert_eq!(copy_images(src.path(), out.path()).unwrap(), 2);
        let images = out.path().join(IMAGES_DIR);
        assert_eq!(fs::read(images.join("chart.png")).unwrap(), b"first");
        assert!(images.join("photo.JPG").exists());
        assert!(!images.join("ch1.html").exists());
    }

    #[test]
    fn test_first_stylesheet_is_copied() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(src.path(), "styles/b.css", b"p{}");
        touch(src.path(), "styles/a.css", b"h1{}");

        let href = copy_stylesheet(src.path(), out.path()).unwrap();
        assert_eq!(href.as_deref(), Some("css/a.css"));
        assert_eq!(fs::read(out.path().join("css/a.css")).unwrap(), b"h1{}");
        assert!(!out.path().join("css/b.css").exists());
    }

    #[test]
    fn test_no_stylesheet() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        assert_eq!(copy_stylesheet(src.path(), out.path()).unwrap(), None);
        assert!(!out.path().join(CSS_DIR).exists());
    }
}
