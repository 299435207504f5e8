use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use super::schema::WRITE_FILE;
use super::Tool;

/// Arguments of a `write_file` call.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteFileArgs {
    pub filename: String,
    pub content: String,
}

/// The file as it was left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub content: String,
    pub bytes: usize,
}

/// Creates or overwrites a text file with exactly the given content.
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Tool for FileWriter {
    const NAME: &'static str = WRITE_FILE;

    type Input = WriteFileArgs;
    type Output = WrittenFile;

    async fn run(&self, args: WriteFileArgs) -> Result<WrittenFile> {
        let path = PathBuf::from(&args.filename);

        std::fs::write(&path, args.content.as_bytes())
            .with_context(|| format!("Failed to write file '{}'", args.filename))?;

        log::info!("FileWriter: wrote {} bytes to {}", args.content.len(), path.display());
        Ok(WrittenFile {
            path,
            bytes: args.content.len(),
            content: args.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_is_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        let content = "ciao, mondo — senza newline";

        let written = FileWriter::new()
            .run(WriteFileArgs {
                filename: path.to_string_lossy().to_string(),
                content: content.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(written.path, path);
        assert_eq!(written.bytes, content.len());
        assert_eq!(std::fs::read(&path).unwrap(), content.as_bytes());
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let filename = path.to_string_lossy().to_string();
        let writer = FileWriter::new();

        writer
            .run(WriteFileArgs { filename: filename.clone(), content: "first version, longer".to_string() })
            .await
            .unwrap();
        let written = writer
            .run(WriteFileArgs { filename, content: "second".to_string() })
            .await
            .unwrap();

        assert_eq!(written.bytes, 6);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file.txt");

        let err = FileWriter::new()
            .run(WriteFileArgs {
                filename: path.to_string_lossy().to_string(),
                content: "x".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to write file"));
    }
}
