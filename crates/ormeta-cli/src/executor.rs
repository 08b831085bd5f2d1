//! Command execution.

use std::path::Path;
use std::sync::Arc;

use ormeta_core::{
    DescriptorEngine, EntityContext, ManagerFactories, RegistryConfig, ScopeClause,
};
use thiserror::Error;

use crate::formatter::Formatter;
use crate::Command;

/// Execution errors.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The configuration file could not be loaded.
    #[error("failed to load {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ormeta_core::Error,
    },

    /// A lookup or derivation failed.
    #[error(transparent)]
    Core(#[from] ormeta_core::Error),
}

/// Load the configuration at `path` and run a command against it.
pub fn execute(
    path: &Path,
    command: &Command,
    formatter: &dyn Formatter,
) -> Result<String, ExecuteError> {
    let ctx = load_context(path)?;

    match command {
        Command::Entities => Ok(formatter.format_entities(ctx.registry())),

        Command::Schema { entity } => {
            let schema = ctx.schema(entity)?;
            Ok(formatter.format_schema(entity, &schema))
        }

        Command::Rewrite { entity, columns } => {
            let mut clauses: Vec<ScopeClause> =
                columns.iter().map(ScopeClause::is_null).collect();
            let unresolved = ctx.rewrite_in_place(entity, &mut clauses)?;

            let rewrites: Vec<(String, String)> = columns
                .iter()
                .cloned()
                .zip(clauses.into_iter().map(|clause| clause.column))
                .collect();
            Ok(formatter.format_rewrites(&rewrites, &unresolved))
        }

        Command::MorphKey { entity, attribute } => {
            let key = ctx.governor().config_key_for(entity, attribute)?;
            Ok(formatter.format_morph_key(entity, attribute, &key))
        }
    }
}

fn load_context(path: &Path) -> Result<EntityContext, ExecuteError> {
    let config_error = |source| ExecuteError::Config {
        path: path.display().to_string(),
        source,
    };

    let config = RegistryConfig::from_path(path).map_err(config_error)?;
    let ctx = EntityContext::from_config(
        &config,
        &ManagerFactories::new(),
        Arc::new(DescriptorEngine::new()),
    )
    .map_err(config_error)?;

    tracing::debug!(
        path = %path.display(),
        entities = ctx.registry().len(),
        "configuration loaded"
    );
    Ok(ctx)
}
