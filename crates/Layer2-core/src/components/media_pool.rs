//! MediaPool component - 미디어 풀 도구
//!
//! 폴더 구조, 클립 가져오기/삭제/이동, 타임라인 생성/삭제, 매트, 오디오
//! 싱크 등 MediaPool 객체의 포워딩.

use crate::api::{Bridge, Remote};
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use futures::future::BoxFuture;
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "list_media_pool_items",
            "List items in the current media pool folder",
            Component::MediaPool,
        ),
        wrap(list_media_pool_items),
    );
    reg.register(
        ToolSpec::new(
            "get_folder_structure",
            "Get the media pool folder structure",
            Component::MediaPool,
        ),
        wrap(get_folder_structure),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_root_folder",
            "Get the root folder of the media pool",
            Component::MediaPool,
        ),
        wrap(get_media_pool_root_folder),
    );
    reg.register(
        ToolSpec::new(
            "add_subfolder",
            "Add a new subfolder to the media pool",
            Component::MediaPool,
        )
        .required("folder_name", ParamKind::String, "Name of the new folder")
        .optional("parent_folder_id", ParamKind::String, "Optional ID of parent folder"),
        wrap(add_subfolder),
    );
    reg.register(
        ToolSpec::new(
            "refresh_folders",
            "Refresh folders in the media pool (useful in collaboration mode)",
            Component::MediaPool,
        ),
        wrap(refresh_folders),
    );
    reg.register(
        ToolSpec::new(
            "create_empty_timeline",
            "Create a new empty timeline",
            Component::MediaPool,
        )
        .required("timeline_name", ParamKind::String, "Name for the new timeline"),
        wrap(create_empty_timeline),
    );
    reg.register(
        ToolSpec::new(
            "append_to_timeline",
            "Append clips to the current timeline",
            Component::MediaPool,
        )
        .required(
            "clips",
            ParamKind::Array,
            "List of clip IDs or clip info dictionaries",
        ),
        wrap(append_to_timeline),
    );
    reg.register(
        ToolSpec::new(
            "append_all_clips_to_timeline",
            "Append all clips from the current media pool folder to the current timeline",
            Component::MediaPool,
        ),
        wrap(append_all_clips_to_timeline),
    );
    reg.register(
        ToolSpec::new(
            "create_timeline_from_clips",
            "Create a new timeline and add the specified clips to it",
            Component::MediaPool,
        )
        .required("timeline_name", ParamKind::String, "Name for the new timeline")
        .required(
            "clips",
            ParamKind::Array,
            "List of clip IDs or clip info dictionaries",
        ),
        wrap(create_timeline_from_clips),
    );
    reg.register(
        ToolSpec::new(
            "import_timeline_from_file",
            "Import a timeline from a file (AAF, EDL, XML, etc.)",
            Component::MediaPool,
        )
        .required("file_path", ParamKind::String, "Path to the timeline file to import")
        .optional(
            "import_options",
            ParamKind::Object,
            "Optional dictionary of import options",
        ),
        wrap(import_timeline_from_file),
    );
    reg.register(
        ToolSpec::new(
            "import_media",
            "Import media files into the current media pool folder",
            Component::MediaPool,
        )
        .required("paths", ParamKind::Array, "List of file or folder paths to import"),
        wrap(import_media),
    );
    reg.register(
        ToolSpec::new(
            "delete_clips",
            "Delete clips from the media pool",
            Component::MediaPool,
        )
        .required("clip_ids", ParamKind::Array, "List of clip IDs to delete"),
        wrap(delete_clips),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_current_folder",
            "Get the current folder in the media pool",
            Component::MediaPool,
        ),
        wrap(get_media_pool_current_folder),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_current_folder",
            "Set the current folder in the media pool",
            Component::MediaPool,
        )
        .required("folder_id", ParamKind::String, "ID of the folder to set as current"),
        wrap(set_media_pool_current_folder),
    );
    reg.register(
        ToolSpec::new(
            "delete_timelines",
            "Delete timelines from the current project",
            Component::MediaPool,
        )
        .required(
            "timeline_names",
            ParamKind::Array,
            "List of timeline names to delete",
        ),
        wrap(delete_timelines),
    );
    reg.register(
        ToolSpec::new(
            "delete_folders",
            "Delete folders from the media pool",
            Component::MediaPool,
        )
        .required("folder_names", ParamKind::Array, "List of folder names to delete"),
        wrap(delete_folders),
    );
    reg.register(
        ToolSpec::new(
            "auto_sync_audio",
            "Sync audio for specified media pool items",
            Component::MediaPool,
        )
        .required(
            "clip_ids",
            ParamKind::Array,
            "List of clip IDs to sync (at least one video and one audio clip)",
        )
        .optional(
            "audio_sync_settings",
            ParamKind::Object,
            "Optional dictionary with audio sync settings (timecodeAccuracy, audioSyncAccuracy, handleLength, appendSyncedAudio)",
        ),
        wrap(auto_sync_audio),
    );
    reg.register(
        ToolSpec::new(
            "get_selected_clips",
            "Get currently selected clips in the media pool",
            Component::MediaPool,
        ),
        wrap(get_selected_clips),
    );
    reg.register(
        ToolSpec::new(
            "set_selected_clip",
            "Set a specified clip as selected in the media pool",
            Component::MediaPool,
        )
        .required("clip_id", ParamKind::String, "ID of the clip to set as selected"),
        wrap(set_selected_clip),
    );
    reg.register(
        ToolSpec::new(
            "import_folder_from_file",
            "Import a folder from a DRB file",
            Component::MediaPool,
        )
        .required("file_path", ParamKind::String, "Path to the DRB file to import")
        .optional(
            "source_clips_path",
            ParamKind::String,
            "Optional path to search for source clips if they're not in their original location",
        ),
        wrap(import_folder_from_file),
    );
    reg.register(
        ToolSpec::new(
            "move_clips",
            "Move specified clips to a target folder",
            Component::MediaPool,
        )
        .required("clip_ids", ParamKind::Array, "List of clip IDs to move")
        .required("target_folder_id", ParamKind::String, "ID of the target folder"),
        wrap(move_clips),
    );
    reg.register(
        ToolSpec::new(
            "move_folders",
            "Move specified folders to a target folder",
            Component::MediaPool,
        )
        .required("folder_ids", ParamKind::Array, "List of folder IDs to move")
        .required("target_folder_id", ParamKind::String, "ID of the target folder"),
        wrap(move_folders),
    );
    reg.register(
        ToolSpec::new(
            "get_clip_matte_list",
            "Get the list of mattes for a specified clip",
            Component::MediaPool,
        )
        .required("clip_id", ParamKind::String, "ID of the clip to get mattes for"),
        wrap(get_clip_matte_list),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_matte_list",
            "Get the list of timeline mattes in a specified folder",
            Component::MediaPool,
        )
        .required("folder_id", ParamKind::String, "ID of the folder to get mattes from"),
        wrap(get_timeline_matte_list),
    );
    reg.register(
        ToolSpec::new(
            "delete_clip_mattes",
            "Delete mattes for a specified clip",
            Component::MediaPool,
        )
        .required("clip_id", ParamKind::String, "ID of the clip to delete mattes from")
        .required(
            "matte_paths",
            ParamKind::Array,
            "List of paths to the matte files to delete",
        ),
        wrap(delete_clip_mattes),
    );
    reg.register(
        ToolSpec::new(
            "relink_clips",
            "Update the folder location of specified media pool clips",
            Component::MediaPool,
        )
        .required("clip_ids", ParamKind::Array, "List of clip IDs to relink")
        .required(
            "folder_path",
            ParamKind::String,
            "Path to the folder where the media is located",
        ),
        wrap(relink_clips),
    );
    reg.register(
        ToolSpec::new(
            "unlink_clips",
            "Unlink specified media pool clips",
            Component::MediaPool,
        )
        .required("clip_ids", ParamKind::Array, "List of clip IDs to unlink"),
        wrap(unlink_clips),
    );
    reg.register(
        ToolSpec::new(
            "export_metadata",
            "Export metadata of clips to CSV format",
            Component::MediaPool,
        )
        .required("file_path", ParamKind::String, "Path to save the CSV file")
        .optional(
            "clip_ids",
            ParamKind::Array,
            "Optional list of clip IDs to export metadata for",
        ),
        wrap(export_metadata),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_unique_id",
            "Get a unique ID for the media pool",
            Component::MediaPool,
        ),
        wrap(get_media_pool_unique_id),
    );
    reg.register(
        ToolSpec::new(
            "create_stereo_clip",
            "Creates a new 3D stereoscopic media pool entry from two existing media pool items",
            Component::MediaPool,
        )
        .required("left_clip_id", ParamKind::String, "ID of the clip to use for the left eye")
        .required("right_clip_id", ParamKind::String, "ID of the clip to use for the right eye"),
        wrap(create_stereo_clip),
    );
}

// ============================================================================
// Helpers
// ============================================================================

/// 클립 요약 {name, id}
async fn clip_summary(clip: &Remote) -> Value {
    json!({
        "name": clip.call_str("GetName", script_args![]).await.ok(),
        "id": clip.call_str("GetUniqueId", script_args![]).await.ok(),
    })
}

/// 타임라인 아이템 요약 (append 결과용)
async fn timeline_item_summary(item: &Remote) -> Value {
    json!({
        "name": item.call_str("GetName", script_args![]).await.ok(),
        "start_frame": item.call_i64("GetStart", script_args![]).await.ok(),
        "end_frame": item.call_i64("GetEnd", script_args![]).await.ok(),
        "duration": item.call_i64("GetDuration", script_args![]).await.ok(),
        "id": item.call_str("GetUniqueId", script_args![]).await.ok(),
    })
}

/// 클립 ID 목록을 객체 핸들 인자로 변환
async fn resolve_clip_ids(ctx: &Bridge, clip_ids: &[String]) -> Result<Vec<ScriptValue>> {
    let mut clips = Vec::with_capacity(clip_ids.len());
    for clip_id in clip_ids {
        let clip = ctx.find_media_pool_item(clip_id).await?;
        clips.push(ScriptValue::from(&clip));
    }
    Ok(clips)
}

/// append/create용 클립 항목 해석
///
/// 문자열은 클립 ID, 객체는 clip info dict로 보고 mediaPoolItem 키의 ID를
/// 핸들로 치환한다.
async fn resolve_clip_entries(ctx: &Bridge, entries: &[Value]) -> Result<Vec<ScriptValue>> {
    let mut resolved = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::String(clip_id) => {
                let clip = ctx.find_media_pool_item(clip_id).await?;
                resolved.push(ScriptValue::from(&clip));
            }
            Value::Object(info) => {
                let clip_id = info
                    .get("mediaPoolItem")
                    .or_else(|| info.get("media_pool_item"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::invalid_param(
                            "clips",
                            "clip info dictionaries need a mediaPoolItem ID",
                        )
                    })?;
                let clip = ctx.find_media_pool_item(clip_id).await?;

                let mut converted: std::collections::BTreeMap<String, ScriptValue> = info
                    .iter()
                    .map(|(key, value)| (key.clone(), ScriptValue::from(value)))
                    .collect();
                converted.remove("media_pool_item");
                converted.insert("mediaPoolItem".to_string(), ScriptValue::from(&clip));
                resolved.push(ScriptValue::Map(converted));
            }
            _ => {
                return Err(Error::invalid_param(
                    "clips",
                    "expected clip IDs or clip info dictionaries",
                ))
            }
        }
    }
    Ok(resolved)
}

/// 폴더 트리 재귀 구성
fn folder_tree(folder: Remote) -> BoxFuture<'static, Result<Value>> {
    Box::pin(async move {
        let name = folder.call_str("GetName", script_args![]).await?;
        let id = folder.call_str("GetUniqueId", script_args![]).await.ok();

        let clips = folder
            .call_objects("GetClipList", script_args![])
            .await
            .unwrap_or_default();

        let mut subfolders = Vec::new();
        for subfolder in folder
            .call_objects("GetSubFolderList", script_args![])
            .await
            .unwrap_or_default()
        {
            subfolders.push(folder_tree(subfolder).await?);
        }

        Ok(json!({
            "name": name,
            "id": id,
            "clip_count": clips.len(),
            "subfolders": subfolders,
        }))
    })
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_media_pool_items(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let folder = media_pool
        .call_opt_object("GetCurrentFolder", script_args![])
        .await?
        .ok_or_else(|| Error::ObjectNotFound("Failed to get current folder".to_string()))?;

    let folder_name = folder.call_str("GetName", script_args![]).await?;
    let clips = folder
        .call_objects("GetClipList", script_args![])
        .await
        .unwrap_or_default();

    let mut items = Vec::new();
    for clip in &clips {
        items.push(clip_summary(clip).await);
    }
    Ok(json!({ "folder": folder_name, "items": items, "count": items.len() }))
}

async fn get_folder_structure(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let root = media_pool.call_object("GetRootFolder", script_args![]).await?;
    folder_tree(root).await
}

async fn get_media_pool_root_folder(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let root = media_pool.call_object("GetRootFolder", script_args![]).await?;

    Ok(json!({
        "name": root.call_str("GetName", script_args![]).await?,
        "id": root.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

async fn add_subfolder(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_name: String = args::required(&args, "folder_name")?;
    let parent_folder_id: Option<String> = args::optional(&args, "parent_folder_id")?;
    let media_pool = ctx.media_pool().await?;

    let parent = match &parent_folder_id {
        Some(folder_id) => ctx.find_folder(folder_id).await?,
        None => media_pool.call_object("GetRootFolder", script_args![]).await?,
    };

    let folder = media_pool
        .call_opt_object("AddSubFolder", script_args![&parent, &folder_name])
        .await?
        .ok_or_else(|| {
            Error::Validation(format!("Failed to add subfolder '{}'", folder_name))
        })?;

    Ok(json!({
        "added": true,
        "name": folder_name,
        "id": folder.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

async fn refresh_folders(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let refreshed = media_pool.call_bool("RefreshFolders", script_args![]).await?;
    Ok(json!({ "refreshed": refreshed }))
}

async fn create_empty_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_name: String = args::required(&args, "timeline_name")?;
    let media_pool = ctx.media_pool().await?;

    let timeline = media_pool
        .call_opt_object("CreateEmptyTimeline", script_args![&timeline_name])
        .await?;
    if timeline.is_none() {
        return Err(Error::Validation(format!(
            "Failed to create timeline '{}' (a timeline with this name may already exist)",
            timeline_name
        )));
    }
    Ok(json!({ "created": true, "timeline_name": timeline_name }))
}

async fn append_to_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let clips: Vec<Value> = args::required(&args, "clips")?;
    let media_pool = ctx.media_pool().await?;

    // 현재 타임라인이 있어야 붙일 수 있다
    ctx.current_timeline().await?;

    // "all" 단일 항목은 현재 폴더 전체를 의미한다
    let resolved = if clips.len() == 1 && clips[0] == json!("all") {
        let folder = media_pool
            .call_opt_object("GetCurrentFolder", script_args![])
            .await?
            .ok_or_else(|| Error::ObjectNotFound("Failed to get current folder".to_string()))?;
        let all_clips = folder.call_objects("GetClipList", script_args![]).await?;
        if all_clips.is_empty() {
            return Err(Error::ObjectNotFound(
                "No clips found in current folder".to_string(),
            ));
        }
        all_clips.iter().map(ScriptValue::from).collect()
    } else {
        resolve_clip_entries(&ctx, &clips).await?
    };

    let items = media_pool
        .call_objects("AppendToTimeline", vec![ScriptValue::List(resolved)])
        .await?;
    if items.is_empty() {
        return Err(Error::Validation(
            "Failed to append clips to timeline".to_string(),
        ));
    }

    let mut item_info = Vec::new();
    for item in &items {
        item_info.push(timeline_item_summary(item).await);
    }
    Ok(json!({ "count": item_info.len(), "items": item_info }))
}

async fn append_all_clips_to_timeline(ctx: Bridge, _args: Value) -> Result<Value> {
    append_to_timeline(ctx, json!({ "clips": ["all"] })).await
}

async fn create_timeline_from_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_name: String = args::required(&args, "timeline_name")?;
    let clips: Vec<Value> = args::required(&args, "clips")?;
    let media_pool = ctx.media_pool().await?;

    let resolved = resolve_clip_entries(&ctx, &clips).await?;
    let timeline = media_pool
        .call_opt_object(
            "CreateTimelineFromClips",
            vec![
                ScriptValue::from(timeline_name.as_str()),
                ScriptValue::List(resolved),
            ],
        )
        .await?;
    if timeline.is_none() {
        return Err(Error::Validation(format!(
            "Failed to create timeline '{}' from clips",
            timeline_name
        )));
    }
    Ok(json!({ "created": true, "timeline_name": timeline_name, "clip_count": clips.len() }))
}

async fn import_timeline_from_file(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let import_options: Option<Value> = args::optional(&args, "import_options")?;
    let media_pool = ctx.media_pool().await?;

    let timeline = match &import_options {
        Some(options) => {
            media_pool
                .call_opt_object(
                    "ImportTimelineFromFile",
                    script_args![file_path.as_str(), options.clone()],
                )
                .await?
        }
        None => {
            media_pool
                .call_opt_object("ImportTimelineFromFile", script_args![&file_path])
                .await?
        }
    };

    let timeline = timeline.ok_or_else(|| {
        Error::Validation(format!("Failed to import timeline from '{}'", file_path))
    })?;
    Ok(json!({
        "imported": true,
        "file_path": file_path,
        "timeline_name": timeline.call_str("GetName", script_args![]).await.ok(),
    }))
}

async fn import_media(ctx: Bridge, args: Value) -> Result<Value> {
    let paths: Vec<String> = args::required(&args, "paths")?;
    let media_pool = ctx.media_pool().await?;

    let clips = media_pool
        .call_objects("ImportMedia", script_args![paths.clone()])
        .await?;

    let mut items = Vec::new();
    for clip in &clips {
        items.push(clip_summary(clip).await);
    }
    Ok(json!({ "imported": items.len(), "items": items }))
}

async fn delete_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let media_pool = ctx.media_pool().await?;

    let clips = resolve_clip_ids(&ctx, &clip_ids).await?;
    let deleted = media_pool
        .call_bool("DeleteClips", vec![ScriptValue::List(clips)])
        .await?;
    Ok(json!({ "deleted": deleted, "clip_count": clip_ids.len() }))
}

async fn get_media_pool_current_folder(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let folder = media_pool
        .call_opt_object("GetCurrentFolder", script_args![])
        .await?
        .ok_or_else(|| Error::ObjectNotFound("Failed to get current folder".to_string()))?;

    Ok(json!({
        "name": folder.call_str("GetName", script_args![]).await?,
        "id": folder.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

async fn set_media_pool_current_folder(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_id: String = args::required(&args, "folder_id")?;
    let media_pool = ctx.media_pool().await?;
    let folder = ctx.find_folder(&folder_id).await?;

    let set = media_pool
        .call_bool("SetCurrentFolder", script_args![&folder])
        .await?;
    Ok(json!({ "set": set, "folder_id": folder_id }))
}

async fn delete_timelines(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_names: Vec<String> = args::required(&args, "timeline_names")?;
    let media_pool = ctx.media_pool().await?;

    let mut timelines = Vec::with_capacity(timeline_names.len());
    for name in &timeline_names {
        let timeline = ctx.find_timeline_by_name(name).await?;
        timelines.push(ScriptValue::from(&timeline));
    }

    let deleted = media_pool
        .call_bool("DeleteTimelines", vec![ScriptValue::List(timelines)])
        .await?;
    Ok(json!({ "deleted": deleted, "timeline_names": timeline_names }))
}

async fn delete_folders(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_names: Vec<String> = args::required(&args, "folder_names")?;
    let media_pool = ctx.media_pool().await?;
    let root = media_pool.call_object("GetRootFolder", script_args![]).await?;

    // 이름으로 폴더 탐색 (트리 전체, 이름당 첫 매칭)
    let mut found: Vec<ScriptValue> = Vec::new();
    let mut remaining: Vec<String> = folder_names.clone();
    let mut stack = vec![root];
    while let Some(folder) = stack.pop() {
        if remaining.is_empty() {
            break;
        }
        for subfolder in folder
            .call_objects("GetSubFolderList", script_args![])
            .await
            .unwrap_or_default()
        {
            if let Ok(name) = subfolder.call_str("GetName", script_args![]).await {
                if let Some(position) = remaining.iter().position(|n| *n == name) {
                    remaining.remove(position);
                    found.push(ScriptValue::from(&subfolder));
                }
            }
            stack.push(subfolder);
        }
    }

    if !remaining.is_empty() {
        return Err(Error::ObjectNotFound(format!(
            "Folders not found: {}",
            remaining.join(", ")
        )));
    }

    let deleted = media_pool
        .call_bool("DeleteFolders", vec![ScriptValue::List(found)])
        .await?;
    Ok(json!({ "deleted": deleted, "folder_names": folder_names }))
}

async fn auto_sync_audio(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let settings: Option<Value> = args::optional(&args, "audio_sync_settings")?;
    if clip_ids.len() < 2 {
        return Err(Error::Validation(
            "Audio sync requires at least one video and one audio clip".to_string(),
        ));
    }
    let media_pool = ctx.media_pool().await?;

    let clips = resolve_clip_ids(&ctx, &clip_ids).await?;
    let synced = match settings {
        Some(settings) => {
            media_pool
                .call_bool(
                    "AutoSyncAudio",
                    vec![ScriptValue::List(clips), ScriptValue::from(settings)],
                )
                .await?
        }
        None => {
            media_pool
                .call_bool("AutoSyncAudio", vec![ScriptValue::List(clips)])
                .await?
        }
    };
    Ok(json!({ "synced": synced, "clip_count": clip_ids.len() }))
}

async fn get_selected_clips(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let clips = media_pool
        .call_objects("GetSelectedClips", script_args![])
        .await?;

    let mut items = Vec::new();
    for clip in &clips {
        items.push(clip_summary(clip).await);
    }
    Ok(json!({ "clips": items, "count": items.len() }))
}

async fn set_selected_clip(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_id: String = args::required(&args, "clip_id")?;
    let media_pool = ctx.media_pool().await?;
    let clip = ctx.find_media_pool_item(&clip_id).await?;

    let selected = media_pool
        .call_bool("SetSelectedClip", script_args![&clip])
        .await?;
    Ok(json!({ "selected": selected, "clip_id": clip_id }))
}

async fn import_folder_from_file(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let source_clips_path: Option<String> = args::optional(&args, "source_clips_path")?;
    let media_pool = ctx.media_pool().await?;

    let imported = match &source_clips_path {
        Some(source) => {
            media_pool
                .call_bool("ImportFolderFromFile", script_args![&file_path, source])
                .await?
        }
        None => {
            media_pool
                .call_bool("ImportFolderFromFile", script_args![&file_path])
                .await?
        }
    };
    if !imported {
        return Err(Error::Validation(format!(
            "Failed to import folder from '{}'",
            file_path
        )));
    }
    Ok(json!({ "imported": true, "file_path": file_path }))
}

async fn move_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let target_folder_id: String = args::required(&args, "target_folder_id")?;
    let media_pool = ctx.media_pool().await?;

    let clips = resolve_clip_ids(&ctx, &clip_ids).await?;
    let target = ctx.find_folder(&target_folder_id).await?;

    let moved = media_pool
        .call_bool(
            "MoveClips",
            vec![ScriptValue::List(clips), ScriptValue::from(&target)],
        )
        .await?;
    Ok(json!({ "moved": moved, "clip_count": clip_ids.len(), "target_folder_id": target_folder_id }))
}

async fn move_folders(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_ids: Vec<String> = args::required(&args, "folder_ids")?;
    let target_folder_id: String = args::required(&args, "target_folder_id")?;
    let media_pool = ctx.media_pool().await?;

    let mut folders = Vec::with_capacity(folder_ids.len());
    for folder_id in &folder_ids {
        let folder = ctx.find_folder(folder_id).await?;
        folders.push(ScriptValue::from(&folder));
    }
    let target = ctx.find_folder(&target_folder_id).await?;

    let moved = media_pool
        .call_bool(
            "MoveFolders",
            vec![ScriptValue::List(folders), ScriptValue::from(&target)],
        )
        .await?;
    Ok(json!({ "moved": moved, "folder_count": folder_ids.len(), "target_folder_id": target_folder_id }))
}

async fn get_clip_matte_list(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_id: String = args::required(&args, "clip_id")?;
    let media_pool = ctx.media_pool().await?;
    let clip = ctx.find_media_pool_item(&clip_id).await?;

    let mattes = media_pool
        .call_value("GetClipMatteList", script_args![&clip])
        .await?;
    let count = mattes.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "clip_id": clip_id, "mattes": mattes, "count": count }))
}

async fn get_timeline_matte_list(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_id: String = args::required(&args, "folder_id")?;
    let media_pool = ctx.media_pool().await?;
    let folder = ctx.find_folder(&folder_id).await?;

    let mattes = media_pool
        .call_objects("GetTimelineMatteList", script_args![&folder])
        .await?;

    let mut items = Vec::new();
    for matte in &mattes {
        items.push(clip_summary(matte).await);
    }
    Ok(json!({ "folder_id": folder_id, "mattes": items, "count": items.len() }))
}

async fn delete_clip_mattes(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_id: String = args::required(&args, "clip_id")?;
    let matte_paths: Vec<String> = args::required(&args, "matte_paths")?;
    let media_pool = ctx.media_pool().await?;
    let clip = ctx.find_media_pool_item(&clip_id).await?;

    let deleted = media_pool
        .call_bool(
            "DeleteClipMattes",
            script_args![&clip, matte_paths.clone()],
        )
        .await?;
    Ok(json!({ "deleted": deleted, "clip_id": clip_id, "matte_count": matte_paths.len() }))
}

async fn relink_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let folder_path: String = args::required(&args, "folder_path")?;
    let media_pool = ctx.media_pool().await?;

    let clips = resolve_clip_ids(&ctx, &clip_ids).await?;
    let relinked = media_pool
        .call_bool(
            "RelinkClips",
            vec![
                ScriptValue::List(clips),
                ScriptValue::from(folder_path.as_str()),
            ],
        )
        .await?;
    Ok(json!({ "relinked": relinked, "clip_count": clip_ids.len(), "folder_path": folder_path }))
}

async fn unlink_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let media_pool = ctx.media_pool().await?;

    let clips = resolve_clip_ids(&ctx, &clip_ids).await?;
    let unlinked = media_pool
        .call_bool("UnlinkClips", vec![ScriptValue::List(clips)])
        .await?;
    Ok(json!({ "unlinked": unlinked, "clip_count": clip_ids.len() }))
}

async fn export_metadata(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let clip_ids: Option<Vec<String>> = args::optional(&args, "clip_ids")?;
    let media_pool = ctx.media_pool().await?;

    let exported = match &clip_ids {
        Some(ids) => {
            let clips = resolve_clip_ids(&ctx, ids).await?;
            media_pool
                .call_bool(
                    "ExportMetadata",
                    vec![
                        ScriptValue::from(file_path.as_str()),
                        ScriptValue::List(clips),
                    ],
                )
                .await?
        }
        None => {
            media_pool
                .call_bool("ExportMetadata", script_args![&file_path])
                .await?
        }
    };
    if !exported {
        return Err(Error::Validation("Failed to export metadata".to_string()));
    }
    Ok(json!({
        "exported": true,
        "file_path": file_path,
        "clip_count": clip_ids.map(|ids| json!(ids.len())).unwrap_or(json!("all")),
    }))
}

async fn get_media_pool_unique_id(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    let unique_id = media_pool.call_str("GetUniqueId", script_args![]).await?;
    Ok(json!({ "unique_id": unique_id }))
}

async fn create_stereo_clip(ctx: Bridge, args: Value) -> Result<Value> {
    let left_clip_id: String = args::required(&args, "left_clip_id")?;
    let right_clip_id: String = args::required(&args, "right_clip_id")?;
    let media_pool = ctx.media_pool().await?;

    let left = ctx.find_media_pool_item(&left_clip_id).await?;
    let right = ctx.find_media_pool_item(&right_clip_id).await?;

    let stereo = media_pool
        .call_opt_object("CreateStereoClip", script_args![&left, &right])
        .await?
        .ok_or_else(|| Error::Validation("Failed to create stereo clip".to_string()))?;

    Ok(json!({
        "created": true,
        "name": stereo.call_str("GetName", script_args![]).await.ok(),
        "id": stereo.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use std::sync::Arc;

    /// project → media pool → 현재/루트 폴더가 있는 기본 목
    fn pool_transport() -> Arc<MockTransport> {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "GetCurrentProject", 2, "Project");
        transport.on_object(2, "GetMediaPool", 3, "MediaPool");
        transport
    }

    #[tokio::test]
    async fn test_list_media_pool_items() {
        let transport = pool_transport();
        transport.on_object(3, "GetCurrentFolder", 4, "Folder");
        transport.on(4, "GetName", ScriptValue::from("Master"));
        transport.on(
            4,
            "GetClipList",
            ScriptValue::List(vec![ScriptValue::Object(crate::bridge::ObjectHandle {
                id: 5,
                class: "MediaPoolItem".into(),
            })]),
        );
        transport.on(5, "GetName", ScriptValue::from("interview.mov"));
        transport.on(5, "GetUniqueId", ScriptValue::from("clip-1"));
        let bridge = Bridge::new(transport);

        let result = list_media_pool_items(bridge, json!({})).await.unwrap();
        assert_eq!(result["folder"], "Master");
        assert_eq!(result["count"], 1);
        assert_eq!(result["items"][0]["id"], "clip-1");
    }

    #[tokio::test]
    async fn test_folder_structure_recurses() {
        let transport = pool_transport();
        transport.on_object(3, "GetRootFolder", 4, "Folder");
        transport.on(4, "GetName", ScriptValue::from("Master"));
        transport.on(4, "GetUniqueId", ScriptValue::from("root-id"));
        transport.on(4, "GetClipList", ScriptValue::List(vec![]));
        transport.on(
            4,
            "GetSubFolderList",
            ScriptValue::List(vec![ScriptValue::Object(crate::bridge::ObjectHandle {
                id: 6,
                class: "Folder".into(),
            })]),
        );
        transport.on(6, "GetName", ScriptValue::from("B-Roll"));
        transport.on(6, "GetUniqueId", ScriptValue::from("sub-id"));
        transport.on(6, "GetClipList", ScriptValue::List(vec![]));
        transport.on(6, "GetSubFolderList", ScriptValue::List(vec![]));
        let bridge = Bridge::new(transport);

        let tree = get_folder_structure(bridge, json!({})).await.unwrap();
        assert_eq!(tree["name"], "Master");
        assert_eq!(tree["subfolders"][0]["name"], "B-Roll");
        assert_eq!(tree["subfolders"][0]["subfolders"], json!([]));
    }

    #[tokio::test]
    async fn test_auto_sync_audio_requires_two_clips() {
        let bridge = Bridge::new(MockTransport::new());
        let err = auto_sync_audio(bridge, json!({ "clip_ids": ["only-one"] }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least one video and one audio"));
    }

    #[tokio::test]
    async fn test_resolve_clip_entries_rejects_bad_entry() {
        let transport = pool_transport();
        let bridge = Bridge::new(transport);
        let err = resolve_clip_entries(&bridge, &[json!(42)]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParam { .. }));
    }
}
