//! Components - 컴포넌트별 도구 모듈
//!
//! 각 모듈은 네이티브 API 객체 하나의 패밀리를 감싼다. 모든 도구는 같은
//! 모양이다: 인자 존재 검사 → 네이티브 호출 하나 → 결과/에러 포장.

mod color_group;
mod folder;
mod gallery;
mod gallery_still_album;
mod graph;
mod media_pool;
mod media_pool_item;
mod media_storage;
mod project;
mod project_manager;
mod resolve;
mod timeline;
mod timeline_item;

use crate::registry::ToolRegistry;

/// 전체 컴포넌트 도구 등록
pub fn register_all(registry: &mut ToolRegistry) {
    resolve::register(registry);
    project_manager::register(registry);
    project::register(registry);
    media_storage::register(registry);
    media_pool::register(registry);
    media_pool_item::register(registry);
    timeline::register(registry);
    timeline_item::register(registry);
    folder::register(registry);
    gallery::register(registry);
    gallery_still_album::register(registry);
    graph::register(registry);
    color_group::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use davinci_foundation::Component;

    #[test]
    fn test_register_all_is_collision_free() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        let report = registry.validate();
        assert!(report.passed(), "critical errors: {:?}", report.critical);
    }

    #[test]
    fn test_component_counts() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        let by_component = registry.by_component();
        let count = |component: Component| by_component.get(&component).map(Vec::len).unwrap_or(0);

        assert_eq!(count(Component::Resolve), 9);
        assert_eq!(count(Component::ProjectManager), 24);
        assert_eq!(count(Component::Project), 40);
        assert_eq!(count(Component::MediaStorage), 7);
        assert_eq!(count(Component::MediaPool), 30);
        assert_eq!(count(Component::MediaPoolItem), 32);
        assert_eq!(count(Component::Timeline), 41);
        assert_eq!(count(Component::TimelineItem), 28);
        assert_eq!(count(Component::Folder), 8);
        assert_eq!(count(Component::Gallery), 8);
        assert_eq!(count(Component::GalleryStillAlbum), 6);
        assert_eq!(count(Component::Graph), 11);
        assert_eq!(count(Component::ColorGroup), 5);
    }

    #[test]
    fn test_every_schema_is_complete() {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);

        for schema in registry.schemas() {
            assert!(schema["name"].is_string());
            assert!(!schema["description"].as_str().unwrap().is_empty());
            assert_eq!(schema["inputSchema"]["type"], "object");
        }
    }
}
