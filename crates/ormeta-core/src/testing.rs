//! Fixtures shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::{EntityConfig, PackageConfig, RegistryConfig};
use crate::error::Result;
use crate::registry::{
    AttributeDescriptor, AttributeKind, EntityRegistry, ManagerFactories, ModelType,
};
use crate::relation::{DescriptorEngine, QueryEngine, Relation, RelationRequest};

/// Engine double that counts calls before delegating to a [`DescriptorEngine`].
#[derive(Debug, Default)]
pub struct RecordingEngine {
    inner: DescriptorEngine,
    alias_registrations: AtomicUsize,
    relation_builds: AtomicUsize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias_registrations(&self) -> usize {
        self.alias_registrations.load(Ordering::SeqCst)
    }

    pub fn relation_builds(&self) -> usize {
        self.relation_builds.load(Ordering::SeqCst)
    }
}

impl QueryEngine for RecordingEngine {
    fn register_alias(&self, alias: &str, model: &ModelType) {
        self.alias_registrations.fetch_add(1, Ordering::SeqCst);
        self.inner.register_alias(alias, model);
    }

    fn resolve_alias(&self, alias: &str) -> Option<ModelType> {
        self.inner.resolve_alias(alias)
    }

    fn build_relation(&self, request: RelationRequest) -> Result<Relation> {
        self.relation_builds.fetch_add(1, Ordering::SeqCst);
        self.inner.build_relation(request)
    }
}

/// Shop, blog and social packages with orders, customers, posts, videos and comments.
pub fn sample_config() -> RegistryConfig {
    RegistryConfig::new()
        .with_package(
            PackageConfig::new("shop")
                .with_entity(
                    EntityConfig::new("order", "shop::Order", "orders", "shop::OrderManager")
                        .with_attributes([
                            AttributeDescriptor::number("total").fillable(),
                            AttributeDescriptor::date_time("placed_at", "Y-m-d H:i:s"),
                            AttributeDescriptor::new("customer_id", AttributeKind::Other)
                                .fillable(),
                        ]),
                )
                .with_entity(
                    EntityConfig::new(
                        "customer",
                        "shop::Customer",
                        "customers",
                        "shop::CustomerManager",
                    )
                    .with_attributes([
                        AttributeDescriptor::text("name").fillable(),
                        AttributeDescriptor::text("password").hidden(),
                    ]),
                ),
        )
        .with_package(
            PackageConfig::new("blog")
                .with_entity(
                    EntityConfig::new("post", "blog::Post", "posts", "blog::PostManager")
                        .with_attribute(AttributeDescriptor::text("title").fillable()),
                )
                .with_entity(
                    EntityConfig::new("video", "blog::Video", "videos", "blog::VideoManager")
                        .with_attribute(AttributeDescriptor::text("url").fillable()),
                ),
        )
        .with_package(
            PackageConfig::new("social").with_entity(
                EntityConfig::new(
                    "comment",
                    "social::Comment",
                    "comments",
                    "social::CommentManager",
                )
                .with_attributes([
                    AttributeDescriptor::text("body").fillable(),
                    AttributeDescriptor::new("commentable", AttributeKind::Other),
                ]),
            ),
        )
}

pub fn sample_registry() -> Arc<EntityRegistry> {
    Arc::new(EntityRegistry::from_config(&sample_config(), &ManagerFactories::new()).unwrap())
}
