//! Config validation
//!
//! Rules:
//! - field rules declared on the config types (`validator` derive)
//! - worker ids unique
//! - json_file storage has a non-empty path
//! - registry path non-empty when a registry is configured

use std::collections::HashSet;

use contracts::{ContractError, ServiceConfig, StorageBackend};
use ::validator::Validate;

/// Validate a ServiceConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ServiceConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_worker_ids(config)?;
    validate_storage(config)?;
    validate_registry(config)?;
    Ok(())
}

fn validate_fields(config: &ServiceConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let field = errors
            .errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        ContractError::config_validation(field, errors.to_string())
    })
}

/// Worker ids must be unique across the inline list
fn validate_worker_ids(config: &ServiceConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for worker in &config.workers {
        if !seen.insert(worker.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("workers[id={}]", worker.id),
                "duplicate worker id",
            ));
        }
    }
    Ok(())
}

fn validate_storage(config: &ServiceConfig) -> Result<(), ContractError> {
    if config.storage.backend == StorageBackend::JsonFile
        && config.storage.path.as_os_str().is_empty()
    {
        return Err(ContractError::config_validation(
            "storage.path",
            "json_file backend requires a path",
        ));
    }
    Ok(())
}

fn validate_registry(config: &ServiceConfig) -> Result<(), ContractError> {
    if let Some(registry) = &config.registry {
        if registry.path.as_os_str().is_empty() {
            return Err(ContractError::config_validation(
                "registry.path",
                "registry path cannot be empty",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{RegistryConfig, WorkerConfig};
    use std::path::PathBuf;

    fn worker(id: &str, name: &str) -> WorkerConfig {
        WorkerConfig {
            id: id.into(),
            name: name.into(),
            email: None,
            mobile: None,
        }
    }

    fn minimal_config() -> ServiceConfig {
        ServiceConfig {
            workers: vec![worker("w1", "Asha"), worker("w2", "Ben")],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_duplicate_worker_id() {
        let mut config = minimal_config();
        config.workers.push(worker("w1", "Cara"));
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("duplicate worker id"), "got: {err}");
    }

    #[test]
    fn test_empty_worker_name() {
        let mut config = minimal_config();
        config.workers[0].name = String::new();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    #[test]
    fn test_zero_upload_limit() {
        let mut config = minimal_config();
        config.ingestion.max_upload_bytes = 0;
        match validate(&config) {
            Err(ContractError::ConfigValidation { field, .. }) => assert_eq!(field, "ingestion"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_json_file_backend_needs_path() {
        let mut config = minimal_config();
        config.storage.path = PathBuf::new();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("requires a path"), "got: {err}");
    }

    #[test]
    fn test_empty_registry_path() {
        let mut config = minimal_config();
        config.registry = Some(RegistryConfig {
            path: PathBuf::new(),
        });
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }
}
