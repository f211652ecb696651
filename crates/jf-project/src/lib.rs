//! jf-project: engine definition file format, validation and construction.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{BuiltEngine, build_system};
pub use schema::*;
pub use validate::{SCHEMA_VERSION, ValidationError, validate_engine};

use jf_components::ComponentError;
use jf_engine::EngineError;
use jf_fluids::FluidError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Component '{id}': {source}")]
    Component { id: String, source: ComponentError },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<EngineDef> {
    let content = std::fs::read_to_string(path)?;
    let def: EngineDef = serde_yaml::from_str(&content)?;
    validate_engine(&def)?;
    Ok(def)
}

pub fn save_yaml(path: &std::path::Path, def: &EngineDef) -> ProjectResult<()> {
    validate_engine(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<EngineDef> {
    let content = std::fs::read_to_string(path)?;
    let def: EngineDef = serde_json::from_str(&content)?;
    validate_engine(&def)?;
    Ok(def)
}

pub fn save_json(path: &std::path::Path, def: &EngineDef) -> ProjectResult<()> {
    validate_engine(def)?;
    let content = serde_json::to_string_pretty(def)?;
    std::fs::write(path, content)?;
    Ok(())
}
