//! MediaStorage component - 스토리지 브라우징 및 미디어 풀 추가

use crate::api::Bridge;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_mounted_volumes",
            "Get a list of mounted volumes/drives",
            Component::MediaStorage,
        ),
        wrap(get_mounted_volumes),
    );
    reg.register(
        ToolSpec::new(
            "get_subfolder_list",
            "Get a list of subfolders in the specified folder",
            Component::MediaStorage,
        )
        .required(
            "folder_path",
            ParamKind::String,
            "Path to folder to list subfolders from",
        ),
        wrap(get_subfolder_list),
    );
    reg.register(
        ToolSpec::new(
            "get_file_list",
            "Get a list of files in the specified folder",
            Component::MediaStorage,
        )
        .required("folder_path", ParamKind::String, "Path to folder to list files from"),
        wrap(get_file_list),
    );
    reg.register(
        ToolSpec::new(
            "reveal_in_storage",
            "Reveal a file or folder in the OS file browser",
            Component::MediaStorage,
        )
        .required("file_path", ParamKind::String, "Path to file or folder to reveal"),
        wrap(reveal_in_storage),
    );
    reg.register(
        ToolSpec::new(
            "add_items_to_media_pool",
            "Add items to media pool",
            Component::MediaStorage,
        )
        .required("file_paths", ParamKind::Array, "List of file paths to add")
        .optional("folder_id", ParamKind::String, "Optional ID of folder to add items to"),
        wrap(add_items_to_media_pool),
    );
    reg.register(
        ToolSpec::new(
            "add_clip_mattes_to_media_pool",
            "Add clip mattes to a media pool item",
            Component::MediaStorage,
        )
        .required(
            "media_pool_item_id",
            ParamKind::String,
            "ID of the media pool item to add mattes to",
        )
        .required("file_paths", ParamKind::Array, "List of matte file paths to add"),
        wrap(add_clip_mattes_to_media_pool),
    );
    reg.register(
        ToolSpec::new(
            "add_timeline_mattes_to_media_pool",
            "Add timeline mattes to media pool",
            Component::MediaStorage,
        )
        .required("file_paths", ParamKind::Array, "List of matte file paths to add")
        .optional("folder_id", ParamKind::String, "Optional ID of folder to add mattes to"),
        wrap(add_timeline_mattes_to_media_pool),
    );
}

async fn get_mounted_volumes(ctx: Bridge, _args: Value) -> Result<Value> {
    let storage = ctx.media_storage().await?;
    let volumes = storage
        .call_value("GetMountedVolumeList", script_args![])
        .await?;
    let count = volumes.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "volumes": volumes, "count": count }))
}

async fn get_subfolder_list(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_path: String = args::required(&args, "folder_path")?;
    let storage = ctx.media_storage().await?;

    let folders = storage
        .call_value("GetSubFolderList", script_args![&folder_path])
        .await?;
    let count = folders.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "folder_path": folder_path, "folders": folders, "count": count }))
}

async fn get_file_list(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_path: String = args::required(&args, "folder_path")?;
    let storage = ctx.media_storage().await?;

    let files = storage
        .call_value("GetFileList", script_args![&folder_path])
        .await?;
    let count = files.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "folder_path": folder_path, "files": files, "count": count }))
}

async fn reveal_in_storage(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let storage = ctx.media_storage().await?;

    let revealed = storage
        .call_bool("RevealInStorage", script_args![&file_path])
        .await?;
    Ok(json!({ "revealed": revealed, "file_path": file_path }))
}

/// folder_id가 있으면 해당 폴더를 현재 폴더로 바꾼 뒤 추가
async fn add_items_to_media_pool(ctx: Bridge, args: Value) -> Result<Value> {
    let file_paths: Vec<String> = args::required(&args, "file_paths")?;
    let folder_id: Option<String> = args::optional(&args, "folder_id")?;

    if let Some(folder_id) = &folder_id {
        let media_pool = ctx.media_pool().await?;
        let folder = ctx.find_folder(folder_id).await?;
        media_pool
            .call_bool("SetCurrentFolder", script_args![&folder])
            .await?;
    }

    let storage = ctx.media_storage().await?;
    let clips = storage
        .call_objects("AddItemListToMediaPool", script_args![file_paths.clone()])
        .await?;

    let mut items = Vec::new();
    for clip in &clips {
        items.push(json!({
            "name": clip.call_str("GetName", script_args![]).await.ok(),
            "id": clip.call_str("GetUniqueId", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "added": items.len(), "items": items }))
}

async fn add_clip_mattes_to_media_pool(ctx: Bridge, args: Value) -> Result<Value> {
    let media_pool_item_id: String = args::required(&args, "media_pool_item_id")?;
    let file_paths: Vec<String> = args::required(&args, "file_paths")?;

    let clip = ctx.find_media_pool_item(&media_pool_item_id).await?;
    let storage = ctx.media_storage().await?;

    let added = storage
        .call_bool(
            "AddClipMattesToMediaPool",
            script_args![&clip, file_paths.clone()],
        )
        .await?;
    if !added {
        return Err(Error::Validation(format!(
            "Failed to add clip mattes to item '{}'",
            media_pool_item_id
        )));
    }
    Ok(json!({ "added": true, "media_pool_item_id": media_pool_item_id, "matte_count": file_paths.len() }))
}

async fn add_timeline_mattes_to_media_pool(ctx: Bridge, args: Value) -> Result<Value> {
    let file_paths: Vec<String> = args::required(&args, "file_paths")?;
    let folder_id: Option<String> = args::optional(&args, "folder_id")?;

    if let Some(folder_id) = &folder_id {
        let media_pool = ctx.media_pool().await?;
        let folder = ctx.find_folder(folder_id).await?;
        media_pool
            .call_bool("SetCurrentFolder", script_args![&folder])
            .await?;
    }

    let storage = ctx.media_storage().await?;
    let mattes = storage
        .call_objects(
            "AddTimelineMattesToMediaPool",
            script_args![file_paths.clone()],
        )
        .await?;

    let mut items = Vec::new();
    for matte in &mattes {
        items.push(json!({
            "name": matte.call_str("GetName", script_args![]).await.ok(),
            "id": matte.call_str("GetUniqueId", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "added": items.len(), "mattes": items }))
}
