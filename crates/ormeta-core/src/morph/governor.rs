//! Governance of polymorphic relations.

use std::sync::Arc;

use parking_lot::RwLock;

use super::allow_list::{MorphAllowList, MorphCandidate};
use crate::error::{Error, Result};
use crate::registry::{EntityRegistry, ManagerType, ModelType};
use crate::relation::{QueryEngine, Relation, RelationKind, RelationParam, RelationRequest};

/// Decides which entities may take part in which polymorphic relations.
///
/// Each morph attribute of an entity has its own bucket of allowed aliases.
/// A registration checks the bucket, maps the alias in the engine and appends
/// it to the bucket under one write lock, so concurrent registrations of the
/// same alias register it once.
pub struct MorphGovernor {
    registry: Arc<EntityRegistry>,
    engine: Arc<dyn QueryEngine>,
    allow_list: RwLock<MorphAllowList>,
}

impl MorphGovernor {
    /// Create a governor with an empty allow-list.
    pub fn new(registry: Arc<EntityRegistry>, engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            registry,
            engine,
            allow_list: RwLock::new(MorphAllowList::new()),
        }
    }

    /// Registry used for name and type resolution.
    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    /// Engine receiving alias registrations and relation requests.
    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        &self.engine
    }

    /// Allow-list bucket key: `<package>.<entity>.attributes.<attribute>.options`.
    pub fn config_key_for(&self, entity: &str, attribute: &str) -> Result<String> {
        let package = self.registry.package_of(entity)?;
        Ok(format!("{package}.{entity}.attributes.{attribute}.options"))
    }

    /// Check if a candidate alias is allowed on the entity's morph attribute.
    ///
    /// Unknown entities have nothing allowed.
    pub fn is_allowed(&self, entity: &str, attribute: &str, candidate: &str) -> bool {
        match self.config_key_for(entity, attribute) {
            Ok(key) => self.allow_list.read().contains(&key, candidate),
            Err(_) => false,
        }
    }

    /// Aliases allowed on the entity's morph attribute, in registration order.
    pub fn allowed_aliases(&self, entity: &str, attribute: &str) -> Result<Vec<String>> {
        let key = self.config_key_for(entity, attribute)?;
        Ok(self.allow_list.read().aliases(&key).to_vec())
    }

    /// Allowed aliases paired with the manager type of the entity each names.
    ///
    /// Aliases that do not name a registered entity are skipped.
    pub fn allowed_candidates(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<Vec<(String, ManagerType)>> {
        Ok(self
            .allowed_aliases(entity, attribute)?
            .into_iter()
            .filter_map(|alias| {
                let manager = self.registry.find_by_name(&alias).ok()?.manager_type().clone();
                Some((alias, manager))
            })
            .collect())
    }

    /// Allow a candidate on the entity's morph attribute under its own name.
    pub fn register(
        &self,
        entity: &str,
        attribute: &str,
        candidate: impl Into<MorphCandidate>,
    ) -> Result<bool> {
        let candidate = candidate.into();
        let alias = candidate.as_str().to_string();
        self.register_as(entity, attribute, candidate, &alias)
    }

    /// Allow a candidate on the entity's morph attribute under an alias.
    ///
    /// Returns `Ok(false)` without side effects when the candidate or alias is
    /// already allowed, or when an entity-name candidate does not resolve.
    /// Fails only if `entity` itself is unknown.
    ///
    /// Model handles are trusted as given. A handle that backs no registered
    /// entity is still allowed and mapped in the engine, with a debug event.
    pub fn register_as(
        &self,
        entity: &str,
        attribute: &str,
        candidate: impl Into<MorphCandidate>,
        alias: &str,
    ) -> Result<bool> {
        let candidate = candidate.into();
        let key = self.config_key_for(entity, attribute)?;

        let mut allow_list = self.allow_list.write();
        if allow_list.contains(&key, candidate.as_str()) || allow_list.contains(&key, alias) {
            return Ok(false);
        }

        let model = match candidate {
            MorphCandidate::Model(model) => {
                if self.registry.find_by_model_type(&model).is_err() {
                    tracing::debug!(
                        entity,
                        attribute,
                        model = %model,
                        "morph candidate model backs no registered entity"
                    );
                }
                model
            }
            MorphCandidate::Entity(name) => match self.registry.model_of(&name) {
                Ok(model) => model.clone(),
                Err(_) => {
                    tracing::debug!(
                        entity,
                        attribute,
                        candidate = %name,
                        "morph candidate not registered, skipping"
                    );
                    return Ok(false);
                }
            },
        };

        self.engine.register_alias(alias, &model);
        allow_list.insert(&key, alias);

        tracing::debug!(entity, attribute, alias, model = %model, "morph candidate allowed");
        Ok(true)
    }

    /// Check that `parent` may hold `relation` to `related` through the
    /// related entity's morph attribute.
    pub fn check_relation(
        &self,
        parent: &ModelType,
        related: &ModelType,
        relation: &str,
        attribute: &str,
    ) -> Result<()> {
        let owner = self.registry.morph_name_of(related)?;
        let candidate = self.registry.morph_name_of(parent)?;

        if self.is_allowed(owner, attribute, candidate) {
            return Ok(());
        }

        tracing::debug!(
            parent = %parent,
            relation,
            entity = owner,
            attribute,
            "polymorphic relation rejected"
        );
        Err(Error::UnsupportedRelation {
            parent: parent.to_string(),
            relation: relation.to_string(),
            entity: owner.to_string(),
            attribute: attribute.to_string(),
            candidate: candidate.to_string(),
        })
    }

    /// Validate and construct a polymorphic relation from `parent` to `related`.
    ///
    /// The engine is not called when validation fails.
    pub fn build_relation(
        &self,
        parent: &ModelType,
        related: &ModelType,
        kind: RelationKind,
        relation: &str,
        attribute: &str,
    ) -> Result<Relation> {
        self.check_relation(parent, related, relation, attribute)?;

        self.engine.build_relation(RelationRequest {
            parent: parent.clone(),
            kind,
            name: relation.to_string(),
            params: vec![
                RelationParam::Model(related.clone()),
                RelationParam::Ident(attribute.to_string()),
            ],
        })
    }
}

impl std::fmt::Debug for MorphGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphGovernor")
            .field("entities", &self.registry.len())
            .field("allow_list", &*self.allow_list.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupKind;
    use crate::testing::{sample_registry, RecordingEngine};

    fn governor() -> (MorphGovernor, Arc<RecordingEngine>) {
        let engine = Arc::new(RecordingEngine::new());
        let governor = MorphGovernor::new(sample_registry(), engine.clone());
        (governor, engine)
    }

    #[test]
    fn test_config_key() {
        let (governor, _) = governor();

        let key = governor.config_key_for("comment", "commentable").unwrap();
        assert_eq!(key, "social.comment.attributes.commentable.options");
        assert_eq!(key, governor.config_key_for("comment", "commentable").unwrap());

        assert!(matches!(
            governor.config_key_for("ghost", "commentable").unwrap_err(),
            Error::NotFound {
                kind: LookupKind::Entity,
                ..
            }
        ));
    }

    #[test]
    fn test_register_twice() {
        let (governor, engine) = governor();

        assert!(governor.register("comment", "commentable", "post").unwrap());
        assert!(!governor.register("comment", "commentable", "post").unwrap());

        assert!(governor.is_allowed("comment", "commentable", "post"));
        let candidates = governor.allowed_candidates("comment", "commentable").unwrap();
        assert_eq!(
            candidates,
            vec![("post".to_string(), ManagerType::from("blog::PostManager"))]
        );
        assert_eq!(engine.alias_registrations(), 1);
    }

    #[test]
    fn test_register_alias_roundtrip() {
        let (governor, engine) = governor();

        assert!(governor
            .register_as(
                "comment",
                "commentable",
                ModelType::from("blog::Video"),
                "clip"
            )
            .unwrap());

        assert_eq!(engine.resolve_alias("clip"), Some(ModelType::from("blog::Video")));
        assert!(governor.is_allowed("comment", "commentable", "clip"));
        // "clip" names no entity, so it has no manager to report.
        assert!(governor
            .allowed_candidates("comment", "commentable")
            .unwrap()
            .is_empty());
        assert_eq!(
            governor.allowed_aliases("comment", "commentable").unwrap(),
            vec!["clip".to_string()]
        );
    }

    #[test]
    fn test_register_unknown_candidate_is_noop() {
        let (governor, engine) = governor();

        assert!(!governor.register("comment", "commentable", "podcast").unwrap());
        assert!(!governor.is_allowed("comment", "commentable", "podcast"));
        assert_eq!(engine.alias_registrations(), 0);
    }

    #[test]
    fn test_register_unregistered_model_handle() {
        let (governor, engine) = governor();
        let handle = ModelType::from("media::Podcast");

        assert!(governor.register("comment", "commentable", &handle).unwrap());
        assert_eq!(engine.resolve_alias("media::Podcast"), Some(handle));
        assert!(governor.is_allowed("comment", "commentable", "media::Podcast"));
        // No entity backs the handle, so no manager is reported for it.
        assert!(governor
            .allowed_candidates("comment", "commentable")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_register_unknown_entity_fails() {
        let (governor, engine) = governor();

        assert!(governor.register("ghost", "commentable", "post").unwrap_err().is_not_found());
        assert_eq!(engine.alias_registrations(), 0);
    }

    #[test]
    fn test_buckets_per_attribute() {
        let (governor, _) = governor();
        governor.register("comment", "commentable", "post").unwrap();

        assert!(!governor.is_allowed("comment", "subject", "post"));
        assert!(!governor.is_allowed("order", "commentable", "post"));
        assert!(!governor.is_allowed("ghost", "commentable", "post"));
        assert!(governor.allowed_aliases("comment", "subject").unwrap().is_empty());
    }

    #[test]
    fn test_build_allowed_relation() {
        let (governor, engine) = governor();
        governor.register("comment", "commentable", "post").unwrap();

        let relation = governor
            .build_relation(
                &ModelType::from("blog::Post"),
                &ModelType::from("social::Comment"),
                RelationKind::MorphMany,
                "comments",
                "commentable",
            )
            .unwrap();

        assert_eq!(relation.parent, ModelType::from("blog::Post"));
        assert_eq!(relation.related, Some(ModelType::from("social::Comment")));
        assert_eq!(relation.morph_attribute.as_deref(), Some("commentable"));
        assert_eq!(engine.relation_builds(), 1);
    }

    #[test]
    fn test_build_unsupported_relation() {
        let (governor, engine) = governor();
        governor.register("comment", "commentable", "post").unwrap();
        let registrations = engine.alias_registrations();

        let err = governor
            .build_relation(
                &ModelType::from("blog::Video"),
                &ModelType::from("social::Comment"),
                RelationKind::MorphMany,
                "comments",
                "commentable",
            )
            .unwrap_err();

        match err {
            Error::UnsupportedRelation {
                parent,
                relation,
                entity,
                attribute,
                candidate,
            } => {
                assert_eq!(parent, "blog::Video");
                assert_eq!(relation, "comments");
                assert_eq!(entity, "comment");
                assert_eq!(attribute, "commentable");
                assert_eq!(candidate, "video");
            }
            other => panic!("Expected UnsupportedRelation, got {other:?}"),
        }
        assert_eq!(engine.relation_builds(), 0);
        assert_eq!(engine.alias_registrations(), registrations);
    }

    #[test]
    fn test_build_with_unregistered_model() {
        let (governor, engine) = governor();

        let err = governor
            .build_relation(
                &ModelType::from("blog::Post"),
                &ModelType::from("social::Ghost"),
                RelationKind::MorphOne,
                "ghost",
                "ghostable",
            )
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(engine.relation_builds(), 0);
    }

    #[test]
    fn test_concurrent_registration_registers_once() {
        let (governor, engine) = governor();
        let governor = Arc::new(governor);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let governor = Arc::clone(&governor);
                std::thread::spawn(move || {
                    governor.register("comment", "commentable", "post").unwrap()
                })
            })
            .collect();
        let added = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();

        assert_eq!(added, 1);
        assert_eq!(engine.alias_registrations(), 1);
        assert_eq!(
            governor.allowed_aliases("comment", "commentable").unwrap().len(),
            1
        );
    }
}
