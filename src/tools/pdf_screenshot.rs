use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use crate::config::ScreenshotConfig;
use super::schema::SCREENSHOT_FILE;
use super::Tool;

/// Arguments of a `screenshot_file` call.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotArgs {
    pub filepath: String,
    pub output_image: String,
}

/// A page image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedScreenshot {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Renders the first page of a PDF with poppler's `pdftoppm` and saves it as PNG.
pub struct PdfScreenshot {
    pdftoppm: PathBuf,
    dpi: u32,
    temp_dir: PathBuf,
}

impl PdfScreenshot {
    pub fn new(config: &ScreenshotConfig) -> Self {
        Self {
            pdftoppm: PathBuf::from(&config.pdftoppm_path),
            dpi: config.dpi,
            temp_dir: PathBuf::from(&config.temp_dir),
        }
    }

    /// Rasterize page 1 of `pdf` into an in-memory image.
    fn render_first_page(&self, pdf: &Path) -> Result<DynamicImage> {
        std::fs::create_dir_all(&self.temp_dir)
            .context("Failed to create temp directory")?;

        // pdftoppm appends the extension itself
        let prefix = self.temp_dir.join(format!("page_{}", uuid::Uuid::new_v4()));
        let ppm_path = prefix.with_extension("ppm");

        log::info!("Rendering page 1 of {} with {}", pdf.display(), self.pdftoppm.display());

        let output = Command::new(&self.pdftoppm)
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-singlefile")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .with_context(|| {
                format!("Failed to run {}. Is poppler installed?", self.pdftoppm.display())
            })?;

        let page = check_status(&output).and_then(|()| {
            image::open(&ppm_path)
                .with_context(|| format!("Failed to decode rendered page {}", ppm_path.display()))
        });

        // a failed run may still leave a partial page behind
        if ppm_path.exists() {
            if let Err(e) = std::fs::remove_file(&ppm_path) {
                log::warn!("Failed to remove temporary page image: {}", e);
            }
        }

        page
    }
}

fn check_status(output: &Output) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pdftoppm conversion failed: {}", stderr.trim());
    }
    Ok(())
}

#[async_trait::async_trait]
impl Tool for PdfScreenshot {
    const NAME: &'static str = SCREENSHOT_FILE;

    type Input = ScreenshotArgs;
    type Output = SavedScreenshot;

    async fn run(&self, args: ScreenshotArgs) -> Result<SavedScreenshot> {
        let page = self.render_first_page(Path::new(&args.filepath))?;
        let path = PathBuf::from(&args.output_image);

        page.save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to save {}", path.display()))?;

        log::info!(
            "PdfScreenshot: saved {}x{} page to {}",
            page.width(),
            page.height(),
            path.display()
        );
        Ok(SavedScreenshot {
            path,
            width: page.width(),
            height: page.height(),
        })
    }
}

/// Stand-in for pdftoppm: records its arguments, writes a 2x1 PPM and exits
/// with `exit_code`.
#[cfg(all(test, unix))]
pub(crate) fn install_stub_renderer(dir: &Path, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("pdftoppm");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             echo \"$@\" > \"$(dirname \"$0\")/args.txt\"\n\
             for last; do :; done\n\
             printf 'P3\\n2 1\\n255\\n255 0 0 0 0 255\\n' > \"$last.ppm\"\n\
             exit {}\n",
            exit_code
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_renderer(renderer: &Path, temp_dir: &Path) -> ScreenshotConfig {
        ScreenshotConfig {
            pdftoppm_path: renderer.to_string_lossy().to_string(),
            dpi: 96,
            temp_dir: temp_dir.to_string_lossy().to_string(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_renders_only_first_page_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = install_stub_renderer(dir.path(), 0);
        let temp_dir = dir.path().join("tmp");
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        let output = dir.path().join("shot.png");

        let tool = PdfScreenshot::new(&config_with_renderer(&renderer, &temp_dir));
        let saved = tool
            .run(ScreenshotArgs {
                filepath: pdf.to_string_lossy().to_string(),
                output_image: output.to_string_lossy().to_string(),
            })
            .await
            .unwrap();

        assert_eq!(saved, SavedScreenshot { path: output.clone(), width: 2, height: 1 });

        let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert!(args.starts_with("-f 1 -l 1 -r 96 -singlefile"), "unexpected args: {}", args);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        let img = image::open(&output).unwrap();
        assert_eq!((img.width(), img.height()), (2, 1));

        // intermediate PPM is cleaned up
        assert_eq!(std::fs::read_dir(&temp_dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_render_removes_partial_page() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = install_stub_renderer(dir.path(), 1);
        let temp_dir = dir.path().join("tmp");
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        let output = dir.path().join("shot.png");

        let tool = PdfScreenshot::new(&config_with_renderer(&renderer, &temp_dir));
        let err = tool
            .run(ScreenshotArgs {
                filepath: pdf.to_string_lossy().to_string(),
                output_image: output.to_string_lossy().to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("pdftoppm conversion failed"), "{}", err);
        assert_eq!(std::fs::read_dir(&temp_dir).unwrap().count(), 0);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_renderer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("report.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        let output = dir.path().join("shot.png");

        let tool = PdfScreenshot::new(&config_with_renderer(
            &dir.path().join("no-such-pdftoppm"),
            dir.path(),
        ));
        let err = tool
            .run(ScreenshotArgs {
                filepath: pdf.to_string_lossy().to_string(),
                output_image: output.to_string_lossy().to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Is poppler installed?"));
        assert!(!output.exists());
    }
}
