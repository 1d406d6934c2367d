use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), LoadError>;
}

pub fn load_from_file<T>(path: &Path) -> Result<T, LoadError>
where
    T: DeserializeOwned + Validate,
{
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str<T>(yaml: &str) -> Result<T, LoadError>
where
    T: DeserializeOwned + Validate,
{
    let cfg: T = serde_yaml::from_str(yaml)?;
    cfg.validate()?;
    Ok(cfg)
}
