//! Folder component - 미디어 풀 폴더 도구

use crate::api::{Bridge, Remote};
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_folder_clip_list",
            "Get the list of clips in a folder",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(get_clip_list),
    );
    reg.register(
        ToolSpec::new("get_folder_name", "Get the name of a folder", Component::Folder)
            .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(get_name),
    );
    reg.register(
        ToolSpec::new(
            "get_folder_subfolders",
            "Get the list of subfolders in a folder",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(get_subfolder_list),
    );
    reg.register(
        ToolSpec::new(
            "get_is_folder_stale",
            "Check if a folder's content is stale and needs to be refreshed",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(get_is_folder_stale),
    );
    reg.register(
        ToolSpec::new(
            "get_folder_unique_id",
            "Get the unique ID of a folder",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(get_unique_id),
    );
    reg.register(
        ToolSpec::new(
            "export_folder",
            "Export a folder to a specified file path",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder")
        .required("file_path", ParamKind::String, "Path where the folder will be exported"),
        wrap(export_folder),
    );
    reg.register(
        ToolSpec::new(
            "transcribe_folder_audio",
            "Transcribe audio content in a folder",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(transcribe_audio),
    );
    reg.register(
        ToolSpec::new(
            "clear_folder_transcription",
            "Clear transcription data for a folder",
            Component::Folder,
        )
        .required("folder_id", ParamKind::String, "ID of the folder"),
        wrap(clear_transcription),
    );
}

async fn folder(ctx: &Bridge, args: &Value) -> Result<(String, Remote)> {
    let folder_id: String = args::required(args, "folder_id")?;
    let folder = ctx.find_folder(&folder_id).await?;
    Ok((folder_id, folder))
}

async fn get_clip_list(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let clips = folder
        .call_objects("GetClipList", script_args![])
        .await
        .unwrap_or_default();

    let mut items = Vec::new();
    for clip in &clips {
        items.push(json!({
            "name": clip.call_str("GetName", script_args![]).await.ok(),
            "id": clip.call_str("GetUniqueId", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "folder_id": folder_id, "clips": items, "count": items.len() }))
}

async fn get_name(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let name = folder.call_str("GetName", script_args![]).await?;
    Ok(json!({ "folder_id": folder_id, "name": name }))
}

async fn get_subfolder_list(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let subfolders = folder
        .call_objects("GetSubFolderList", script_args![])
        .await
        .unwrap_or_default();

    let mut folders = Vec::new();
    for subfolder in &subfolders {
        folders.push(json!({
            "name": subfolder.call_str("GetName", script_args![]).await.ok(),
            "id": subfolder.call_str("GetUniqueId", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "folder_id": folder_id, "subfolders": folders, "count": folders.len() }))
}

async fn get_is_folder_stale(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let stale = folder.call_bool("GetIsFolderStale", script_args![]).await?;
    Ok(json!({ "folder_id": folder_id, "stale": stale }))
}

async fn get_unique_id(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let unique_id = folder.call_str("GetUniqueId", script_args![]).await?;
    Ok(json!({ "folder_id": folder_id, "unique_id": unique_id }))
}

/// DRB 형식으로 내보낸다
async fn export_folder(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let file_path: String = args::required(&args, "file_path")?;

    let exported = folder.call_bool("Export", script_args![&file_path]).await?;
    if !exported {
        return Err(Error::Validation(format!(
            "Failed to export folder to '{}'",
            file_path
        )));
    }
    Ok(json!({ "exported": true, "folder_id": folder_id, "file_path": file_path }))
}

async fn transcribe_audio(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let transcribed = folder.call_bool("TranscribeAudio", script_args![]).await?;
    Ok(json!({ "transcribed": transcribed, "folder_id": folder_id }))
}

async fn clear_transcription(ctx: Bridge, args: Value) -> Result<Value> {
    let (folder_id, folder) = folder(&ctx, &args).await?;
    let cleared = folder.call_bool("ClearTranscription", script_args![]).await?;
    Ok(json!({ "cleared": cleared, "folder_id": folder_id }))
}
