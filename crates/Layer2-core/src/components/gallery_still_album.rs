//! GalleryStillAlbum component - 스틸 앨범 도구
//!
//! 앨범은 라벨로 조회한다. 스틸 선택은 앨범 스틸 목록의 0-based 인덱스.

use crate::api::{Bridge, Remote};
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_stills",
            "Get all stills from a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album"),
        wrap(get_stills),
    );
    reg.register(
        ToolSpec::new(
            "get_label",
            "Get label for a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album"),
        wrap(get_label),
    );
    reg.register(
        ToolSpec::new(
            "set_label",
            "Set label for a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album")
        .required("label", ParamKind::String, "New label for the album"),
        wrap(set_label),
    );
    reg.register(
        ToolSpec::new(
            "import_stills",
            "Import stills into a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album")
        .required(
            "still_paths",
            ParamKind::Array,
            "List of paths to still files to import",
        ),
        wrap(import_stills),
    );
    reg.register(
        ToolSpec::new(
            "export_stills",
            "Export stills from a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album")
        .required(
            "still_indices",
            ParamKind::Array,
            "List of indices of stills to export",
        )
        .required("export_dir", ParamKind::String, "Directory to export stills to")
        .optional("file_prefix", ParamKind::String, "Prefix for exported still filenames"),
        wrap(export_stills),
    );
    reg.register(
        ToolSpec::new(
            "delete_stills",
            "Delete stills from a gallery still album",
            Component::GalleryStillAlbum,
        )
        .required("album_name", ParamKind::String, "Name of the gallery still album")
        .required(
            "still_indices",
            ParamKind::Array,
            "List of indices of stills to delete",
        ),
        wrap(delete_stills),
    );
}

async fn album(ctx: &Bridge, args: &Value) -> Result<(String, Remote)> {
    let album_name: String = args::required(args, "album_name")?;
    let album = ctx.find_still_album(&album_name).await?;
    Ok((album_name, album))
}

/// 인덱스 목록을 스틸 핸들 목록으로 변환
async fn select_stills(album: &Remote, indices: &[i64]) -> Result<Vec<ScriptValue>> {
    let stills = album.call_objects("GetStills", script_args![]).await?;

    let mut selected = Vec::with_capacity(indices.len());
    for &index in indices {
        let still = usize::try_from(index)
            .ok()
            .and_then(|index| stills.get(index))
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Invalid still index: {} (album has {} stills)",
                    index,
                    stills.len()
                ))
            })?;
        selected.push(ScriptValue::from(still));
    }
    Ok(selected)
}

async fn get_stills(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let stills = album.call_objects("GetStills", script_args![]).await?;

    let mut items = Vec::new();
    for (index, still) in stills.iter().enumerate() {
        items.push(json!({
            "index": index,
            "label": still.call_str("GetLabel", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "album_name": album_name, "stills": items, "count": items.len() }))
}

async fn get_label(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let label = album.call_str("GetLabel", script_args![]).await?;
    Ok(json!({ "album_name": album_name, "label": label }))
}

async fn set_label(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let label: String = args::required(&args, "label")?;

    let set = album.call_bool("SetLabel", script_args![&label]).await?;
    Ok(json!({ "set": set, "album_name": album_name, "label": label }))
}

async fn import_stills(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let still_paths: Vec<String> = args::required(&args, "still_paths")?;

    let imported = album
        .call_bool("ImportStills", script_args![still_paths.clone()])
        .await?;
    if !imported {
        return Err(Error::Validation(format!(
            "Failed to import stills into album '{}'",
            album_name
        )));
    }
    Ok(json!({ "imported": true, "album_name": album_name, "still_count": still_paths.len() }))
}

async fn export_stills(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let still_indices: Vec<i64> = args::required(&args, "still_indices")?;
    let export_dir: String = args::required(&args, "export_dir")?;
    let file_prefix: String = args::optional_or(&args, "file_prefix", String::new())?;

    let stills = select_stills(&album, &still_indices).await?;
    let exported = album
        .call_bool(
            "ExportStills",
            vec![
                ScriptValue::List(stills),
                ScriptValue::from(export_dir.as_str()),
                ScriptValue::from(file_prefix.as_str()),
            ],
        )
        .await?;
    Ok(json!({
        "exported": exported,
        "album_name": album_name,
        "export_dir": export_dir,
        "still_count": still_indices.len(),
    }))
}

async fn delete_stills(ctx: Bridge, args: Value) -> Result<Value> {
    let (album_name, album) = album(&ctx, &args).await?;
    let still_indices: Vec<i64> = args::required(&args, "still_indices")?;

    let stills = select_stills(&album, &still_indices).await?;
    let deleted = album
        .call_bool("DeleteStills", vec![ScriptValue::List(stills)])
        .await?;
    Ok(json!({ "deleted": deleted, "album_name": album_name, "still_count": still_indices.len() }))
}
