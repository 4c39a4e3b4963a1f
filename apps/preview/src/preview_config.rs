use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crmdesk_core::AppError;

/// What the preview renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    Detail,
    List,
    Validate,
}

impl PreviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::List => "list",
            Self::Validate => "validate",
        }
    }
}

impl FromStr for PreviewMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "detail" => Ok(Self::Detail),
            "list" => Ok(Self::List),
            "validate" => Ok(Self::Validate),
            other => Err(AppError::Validation(format!(
                "PREVIEW_MODE must be one of detail, list, validate (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub snapshot_dir: PathBuf,
    pub entity_type: String,
    pub mode: PreviewMode,
    pub record_path: Option<PathBuf>,
    pub form_path: Option<PathBuf>,
}

impl PreviewConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let snapshot_dir = PathBuf::from(required_non_empty(&lookup, "PREVIEW_SNAPSHOT_DIR")?);
        let entity_type = required_non_empty(&lookup, "PREVIEW_ENTITY")?;
        let mode = lookup("PREVIEW_MODE")
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse::<PreviewMode>())
            .transpose()?
            .unwrap_or(PreviewMode::Detail);

        Ok(Self {
            snapshot_dir,
            entity_type: entity_type.trim().to_owned(),
            mode,
            record_path: optional_path(&lookup, "PREVIEW_RECORD_PATH"),
            form_path: optional_path(&lookup, "PREVIEW_FORM_PATH"),
        })
    }
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_path(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<PathBuf> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
