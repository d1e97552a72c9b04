use std::path::PathBuf;
use thiserror::Error;

/// Position of a CSS parse failure inside the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssLocation {
    pub path: PathBuf,
    /// 1-based line
    pub line: usize,
    pub column: usize,
    /// The offending source line, when it could be recovered
    pub line_text: Option<String>,
}

#[derive(Error, Debug)]
pub enum CssBundleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {}: {message}", path.display())]
    Parse {
        message: String,
        path: PathBuf,
        location: Option<CssLocation>,
    },

    #[error("CSS generation error: {0}")]
    Print(String),

    #[error("Source map error: {0}")]
    SourceMap(String),

    #[error("File is not valid UTF-8: {}", path.display())]
    InvalidEncoding { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CssBundleError {
    pub fn source_map(message: String) -> Self {
        Self::SourceMap(message)
    }

    /// Create a configuration error
    pub fn config(message: String) -> Self {
        Self::Config(message)
    }

    /// Compiler-style rendering: `path:line:column` followed by the line and
    /// a caret under the reported column.
    pub fn format_detailed(&self) -> String {
        let CssBundleError::Parse {
            message,
            path,
            location,
        } = self
        else {
            return self.to_string();
        };

        let Some(location) = location else {
            return format!("❌ {}: {}", path.display(), message);
        };

        let mut output = format!(
            "❌ {}:{}:{}: {}",
            path.display(),
            location.line,
            location.column,
            message
        );
        if let Some(text) = &location.line_text {
            let gutter = location.line.to_string().len();
            output.push_str(&format!("\n{} | {}", location.line, text));
            output.push_str(&format!(
                "\n{} | {}^",
                " ".repeat(gutter),
                " ".repeat(location.column.saturating_sub(1))
            ));
        }
        output
    }
}

pub type Result<T> = std::result::Result<T, CssBundleError>;

impl From<anyhow::Error> for CssBundleError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<std::io::Error>() {
            Ok(io) => CssBundleError::Io(io),
            Err(other) => CssBundleError::Print(other.to_string()),
        }
    }
}
