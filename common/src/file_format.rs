use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Extension(#[from] FileExtensionError),
    #[error("Failed to access '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Text formats accepted for configuration and report files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerdeFormat {
    Yaml,
    Json,
}

impl SerdeFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let ext = get_file_extension(file_name).ok_or(FileExtensionError::MissingFileExtension)?;

        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            ))
        }
    }

    pub fn serialize<T: Serialize>(self, value: &T) -> SerdeFormatResult<String> {
        Ok(match self {
            Self::Yaml => serde_yml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
        })
    }

    pub fn deserialize<T: DeserializeOwned>(self, serialized: &str) -> SerdeFormatResult<T> {
        Ok(match self {
            Self::Yaml => serde_yml::from_str(serialized)?,
            Self::Json => serde_json::from_str(serialized)?,
        })
    }
}

/// Reads `path` and deserializes it in the format implied by its extension.
pub fn load_file<T: DeserializeOwned>(path: &str) -> SerdeFormatResult<T> {
    let format = SerdeFormat::from_file_name(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SerdeFormatError::Io {
        path: path.to_string(),
        source,
    })?;
    format.deserialize(&text)
}

/// Serializes `value` in the format implied by the extension of `path` and writes it.
pub fn save_file<T: Serialize>(path: &str, value: &T) -> SerdeFormatResult<()> {
    let format = SerdeFormat::from_file_name(path)?;
    let text = format.serialize(value)?;
    std::fs::write(path, text).map_err(|source| SerdeFormatError::Io {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Sample {
        name: String,
        values: Vec<f64>,
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SerdeFormat::from_file_name("config.YML").unwrap(),
            SerdeFormat::Yaml
        );
        assert_eq!(
            SerdeFormat::from_file_name("stats.json").unwrap(),
            SerdeFormat::Json
        );
        assert!(matches!(
            SerdeFormat::from_file_name("config"),
            Err(FileExtensionError::MissingFileExtension)
        ));
        assert!(matches!(
            SerdeFormat::from_file_name("config.toml"),
            Err(FileExtensionError::UnsupportedFileExtension(_))
        ));
    }

    #[test]
    fn yaml_and_json_agree() {
        let sample = Sample {
            name: "field".to_string(),
            values: vec![1.5, -2.0],
        };

        for format in [SerdeFormat::Yaml, SerdeFormat::Json] {
            let text = format.serialize(&sample).unwrap();
            let parsed: Sample = format.deserialize(&text).unwrap();
            assert_eq!(parsed, sample, "format {:?}", format);
        }
    }
}
