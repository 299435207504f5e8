pub mod file_writer;
pub mod pdf_screenshot;
pub mod schema;

pub use file_writer::{FileWriter, WriteFileArgs};
pub use pdf_screenshot::{PdfScreenshot, ScreenshotArgs};

use anyhow::Result;

/// A local effect offered to the model under `NAME`.
///
/// `Input` is the decoded argument object of the call and `Output` describes
/// what ended up on disk, which the dispatcher turns into the status notice.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Function name advertised in [`schema::registry`].
    const NAME: &'static str;

    type Input: Send;
    type Output: Send;

    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}
