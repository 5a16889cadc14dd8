use std::fmt;
use std::path::Path;

/// Supported data formats for screen-document input/output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            #[cfg(feature = "yaml")]
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extensions_default_to_json() {
        assert_eq!(DocumentFormat::from_path("screen.cfg"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path("screen.json"), DocumentFormat::Json);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_extensions_are_detected() {
        assert_eq!(DocumentFormat::from_path("screen.yml"), DocumentFormat::Yaml);
    }
}
