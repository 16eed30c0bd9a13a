//! Bridge - 객체 그래프 탐색과 ID 조회
//!
//! 컴포넌트 핸들러가 쓰는 진입점. Resolve → ProjectManager → Project →
//! MediaPool/Timeline/Gallery로 내려가는 탐색과, 패스스루 식별자(클립 ID,
//! 폴더 ID, 타임라인 아이템 ID)를 실제 객체로 해석하는 조회를 제공한다.
//!
//! 조회는 ID를 키로 하는 전수 탐색이다. 식별자에는 독립적인 수명이 없다.

use super::remote::Remote;
use crate::bridge::ScriptTransport;
use crate::script_args;
use davinci_foundation::constants::TRACK_TYPES;
use davinci_foundation::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// 스크립팅 호스트로의 공유 진입점
#[derive(Clone)]
pub struct Bridge {
    transport: Arc<dyn ScriptTransport>,
}

impl Bridge {
    pub fn new(transport: Arc<dyn ScriptTransport>) -> Self {
        Self { transport }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Resolve 애플리케이션 객체
    pub fn resolve(&self) -> Remote {
        Remote::root(Arc::clone(&self.transport))
    }

    /// Project Manager
    pub async fn project_manager(&self) -> Result<Remote> {
        self.resolve()
            .call_object("GetProjectManager", script_args![])
            .await
    }

    /// 현재 열린 프로젝트
    pub async fn current_project(&self) -> Result<Remote> {
        let manager = self.project_manager().await?;
        manager
            .call_opt_object("GetCurrentProject", script_args![])
            .await?
            .ok_or_else(|| Error::ObjectNotFound("No project is currently open".to_string()))
    }

    /// 현재 프로젝트의 미디어 풀
    pub async fn media_pool(&self) -> Result<Remote> {
        self.current_project()
            .await?
            .call_object("GetMediaPool", script_args![])
            .await
    }

    /// Media Storage
    pub async fn media_storage(&self) -> Result<Remote> {
        self.resolve()
            .call_object("GetMediaStorage", script_args![])
            .await
    }

    /// 현재 타임라인
    pub async fn current_timeline(&self) -> Result<Remote> {
        self.current_project()
            .await?
            .call_opt_object("GetCurrentTimeline", script_args![])
            .await?
            .ok_or_else(|| Error::ObjectNotFound("No timeline is currently open".to_string()))
    }

    /// 현재 프로젝트의 갤러리
    pub async fn gallery(&self) -> Result<Remote> {
        self.current_project()
            .await?
            .call_object("GetGallery", script_args![])
            .await
    }

    /// 현재 노드 그래프 (컬러 페이지의 현재 비디오 아이템 기준)
    pub async fn current_graph(&self) -> Result<Remote> {
        let timeline = self.current_timeline().await?;
        let item = timeline
            .call_opt_object("GetCurrentVideoItem", script_args![])
            .await?
            .ok_or_else(|| {
                Error::ObjectNotFound("No current video item in the timeline".to_string())
            })?;
        item.call_object("GetNodeGraph", script_args![]).await
    }

    // ========================================================================
    // ID lookups
    // ========================================================================

    /// 폴더 ID로 미디어 풀 폴더 조회 (루트 우선, 이후 재귀 탐색)
    pub async fn find_folder(&self, folder_id: &str) -> Result<Remote> {
        let media_pool = self.media_pool().await?;
        let root = media_pool.call_object("GetRootFolder", script_args![]).await?;

        if let Ok(uid) = root.call_str("GetUniqueId", script_args![]).await {
            if uid == folder_id {
                return Ok(root);
            }
        }

        let mut stack = vec![root];
        while let Some(folder) = stack.pop() {
            for subfolder in folder
                .call_objects("GetSubFolderList", script_args![])
                .await
                .unwrap_or_default()
            {
                if let Ok(uid) = subfolder.call_str("GetUniqueId", script_args![]).await {
                    if uid == folder_id {
                        return Ok(subfolder);
                    }
                }
                stack.push(subfolder);
            }
        }

        Err(Error::ObjectNotFound(format!(
            "Folder not found: {}",
            folder_id
        )))
    }

    /// 클립 ID로 미디어 풀 아이템 조회
    ///
    /// 현재 폴더 → 루트부터 전체 폴더 트리 → 현재 타임라인의 비디오 트랙
    /// 순서로 찾는다.
    pub async fn find_media_pool_item(&self, item_id: &str) -> Result<Remote> {
        let project = self.current_project().await?;
        let media_pool = project.call_object("GetMediaPool", script_args![]).await?;

        // 현재 폴더 먼저
        if let Ok(Some(current)) = media_pool
            .call_opt_object("GetCurrentFolder", script_args![])
            .await
        {
            if let Some(clip) = Self::scan_folder_clips(&current, item_id).await {
                return Ok(clip);
            }
        }

        // 루트부터 전체 트리
        let root = media_pool.call_object("GetRootFolder", script_args![]).await?;
        let mut stack = vec![root];
        while let Some(folder) = stack.pop() {
            if let Some(clip) = Self::scan_folder_clips(&folder, item_id).await {
                debug!("Found clip {} in folder walk", item_id);
                return Ok(clip);
            }
            for subfolder in folder
                .call_objects("GetSubFolderList", script_args![])
                .await
                .unwrap_or_default()
            {
                stack.push(subfolder);
            }
        }

        // 타임라인 폴백: 비디오 트랙 아이템에서 원본 클립을 역참조
        if let Ok(Some(timeline)) = project
            .call_opt_object("GetCurrentTimeline", script_args![])
            .await
        {
            let track_count = timeline
                .call_i64("GetTrackCount", script_args!["video"])
                .await
                .unwrap_or(0);
            for index in 1..=track_count {
                let items = timeline
                    .call_objects("GetItemListInTrack", script_args!["video", index])
                    .await
                    .unwrap_or_default();
                for item in items {
                    if let Ok(Some(clip)) = item
                        .call_opt_object("GetMediaPoolItem", script_args![])
                        .await
                    {
                        if let Ok(uid) = clip.call_str("GetUniqueId", script_args![]).await {
                            if uid == item_id {
                                return Ok(clip);
                            }
                        }
                    }
                }
            }
        }

        Err(Error::ObjectNotFound(format!(
            "Media pool item not found: {}",
            item_id
        )))
    }

    /// 타임라인 ID로 타임라인 조회 (1-based 인덱스 스캔)
    pub async fn find_timeline(&self, timeline_id: &str) -> Result<Remote> {
        let project = self.current_project().await?;
        let count = project.call_i64("GetTimelineCount", script_args![]).await?;

        for index in 1..=count {
            let timeline = match project
                .call_opt_object("GetTimelineByIndex", script_args![index])
                .await?
            {
                Some(timeline) => timeline,
                None => continue,
            };
            if let Ok(uid) = timeline.call_str("GetUniqueId", script_args![]).await {
                if uid == timeline_id {
                    return Ok(timeline);
                }
            }
        }

        Err(Error::ObjectNotFound(format!(
            "Timeline not found: {}",
            timeline_id
        )))
    }

    /// 타임라인 이름으로 조회
    pub async fn find_timeline_by_name(&self, name: &str) -> Result<Remote> {
        let project = self.current_project().await?;
        let count = project.call_i64("GetTimelineCount", script_args![]).await?;

        for index in 1..=count {
            let timeline = match project
                .call_opt_object("GetTimelineByIndex", script_args![index])
                .await?
            {
                Some(timeline) => timeline,
                None => continue,
            };
            if let Ok(timeline_name) = timeline.call_str("GetName", script_args![]).await {
                if timeline_name == name {
                    return Ok(timeline);
                }
            }
        }

        Err(Error::ObjectNotFound(format!("Timeline not found: {}", name)))
    }

    /// 타임라인 아이템 ID로 조회
    ///
    /// 현재 타임라인의 모든 트랙을 먼저 보고, 없으면 다른 타임라인들을
    /// 차례로 현재 타임라인으로 바꿔가며 탐색한 뒤 원래 타임라인을 복원한다.
    pub async fn find_timeline_item(&self, item_id: &str) -> Result<Remote> {
        let project = self.current_project().await?;
        let current = self.current_timeline().await?;

        if let Some(item) = Self::scan_timeline_for_item(&current, item_id).await? {
            return Ok(item);
        }

        let current_uid = current.call_str("GetUniqueId", script_args![]).await.ok();
        let count = project.call_i64("GetTimelineCount", script_args![]).await?;

        for index in 1..=count {
            let timeline = match project
                .call_opt_object("GetTimelineByIndex", script_args![index])
                .await?
            {
                Some(timeline) => timeline,
                None => continue,
            };

            // 현재 타임라인은 이미 봤다
            if let (Some(current_uid), Ok(uid)) = (
                current_uid.as_deref(),
                timeline.call_str("GetUniqueId", script_args![]).await,
            ) {
                if uid == current_uid {
                    continue;
                }
            }

            if !project
                .call_bool("SetCurrentTimeline", script_args![&timeline])
                .await
                .unwrap_or(false)
            {
                continue;
            }

            if let Some(item) = Self::scan_timeline_for_item(&timeline, item_id).await? {
                let _ = project
                    .call_bool("SetCurrentTimeline", script_args![&current])
                    .await;
                return Ok(item);
            }
        }

        let _ = project
            .call_bool("SetCurrentTimeline", script_args![&current])
            .await;

        Err(Error::ObjectNotFound(format!(
            "Timeline item not found: {}",
            item_id
        )))
    }

    /// 갤러리 스틸 앨범을 라벨로 조회
    pub async fn find_still_album(&self, album_name: &str) -> Result<Remote> {
        let gallery = self.gallery().await?;
        for album in gallery
            .call_objects("GetGalleryStillAlbums", script_args![])
            .await?
        {
            if let Ok(label) = gallery
                .call_str("GetAlbumName", script_args![&album])
                .await
            {
                if label == album_name {
                    return Ok(album);
                }
            }
        }
        Err(Error::ObjectNotFound(format!(
            "Gallery still album not found: {}",
            album_name
        )))
    }

    /// 컬러 그룹을 이름으로 조회
    pub async fn find_color_group(&self, group_name: &str) -> Result<Remote> {
        let project = self.current_project().await?;
        for group in project
            .call_objects("GetColorGroupsList", script_args![])
            .await?
        {
            if let Ok(name) = group.call_str("GetName", script_args![]).await {
                if name == group_name {
                    return Ok(group);
                }
            }
        }
        Err(Error::ObjectNotFound(format!(
            "Color group not found: {}",
            group_name
        )))
    }

    // ========================================================================
    // Scan helpers
    // ========================================================================

    /// 폴더의 클립 목록에서 ID 매칭
    async fn scan_folder_clips(folder: &Remote, item_id: &str) -> Option<Remote> {
        let clips = folder
            .call_objects("GetClipList", script_args![])
            .await
            .unwrap_or_default();
        for clip in clips {
            if let Ok(uid) = clip.call_str("GetUniqueId", script_args![]).await {
                if uid == item_id {
                    return Some(clip);
                }
            }
        }
        None
    }

    /// 타임라인의 전 트랙에서 아이템 ID 매칭
    async fn scan_timeline_for_item(timeline: &Remote, item_id: &str) -> Result<Option<Remote>> {
        for track_type in TRACK_TYPES {
            let count = timeline
                .call_i64("GetTrackCount", script_args![track_type])
                .await
                .unwrap_or(0);
            for index in 1..=count {
                let items = timeline
                    .call_objects("GetItemListInTrack", script_args![track_type, index])
                    .await
                    .unwrap_or_default();
                for item in items {
                    if let Ok(uid) = item.call_str("GetUniqueId", script_args![]).await {
                        if uid == item_id {
                            return Ok(Some(item));
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}
