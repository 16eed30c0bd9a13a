//! Gallery component - 갤러리 앨범 도구

use crate::api::Bridge;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_album_name",
            "Get the name of a gallery album",
            Component::Gallery,
        )
        .required("album_name", ParamKind::String, "Name of the album to get information about"),
        wrap(get_album_name),
    );
    reg.register(
        ToolSpec::new(
            "set_album_name",
            "Set the name of a gallery album",
            Component::Gallery,
        )
        .required("album_name", ParamKind::String, "Current name of the album")
        .required("new_name", ParamKind::String, "New name for the album"),
        wrap(set_album_name),
    );
    reg.register(
        ToolSpec::new(
            "get_current_still_album",
            "Get information about the current still album",
            Component::Gallery,
        ),
        wrap(get_current_still_album),
    );
    reg.register(
        ToolSpec::new(
            "set_current_still_album",
            "Set the current still album",
            Component::Gallery,
        )
        .required("album_name", ParamKind::String, "Name of the album to set as current"),
        wrap(set_current_still_album),
    );
    reg.register(
        ToolSpec::new(
            "get_gallery_still_albums",
            "Get a list of all gallery still albums",
            Component::Gallery,
        ),
        wrap(get_gallery_still_albums),
    );
    reg.register(
        ToolSpec::new(
            "get_gallery_power_grade_albums",
            "Get a list of all gallery power grade albums",
            Component::Gallery,
        ),
        wrap(get_gallery_power_grade_albums),
    );
    reg.register(
        ToolSpec::new(
            "create_gallery_still_album",
            "Create a new gallery still album",
            Component::Gallery,
        )
        .required("album_name", ParamKind::String, "Name for the new album"),
        wrap(create_gallery_still_album),
    );
    reg.register(
        ToolSpec::new(
            "create_gallery_power_grade_album",
            "Create a new gallery power grade album",
            Component::Gallery,
        )
        .required("album_name", ParamKind::String, "Name for the new power grade album"),
        wrap(create_gallery_power_grade_album),
    );
}

async fn get_album_name(ctx: Bridge, args: Value) -> Result<Value> {
    let album_name: String = args::required(&args, "album_name")?;
    let gallery = ctx.gallery().await?;
    let album = ctx.find_still_album(&album_name).await?;

    let name = gallery
        .call_str("GetAlbumName", script_args![&album])
        .await?;
    Ok(json!({ "album_name": name }))
}

async fn set_album_name(ctx: Bridge, args: Value) -> Result<Value> {
    let album_name: String = args::required(&args, "album_name")?;
    let new_name: String = args::required(&args, "new_name")?;
    let gallery = ctx.gallery().await?;
    let album = ctx.find_still_album(&album_name).await?;

    let renamed = gallery
        .call_bool("SetAlbumName", script_args![&album, &new_name])
        .await?;
    Ok(json!({ "renamed": renamed, "old_name": album_name, "new_name": new_name }))
}

async fn get_current_still_album(ctx: Bridge, _args: Value) -> Result<Value> {
    let gallery = ctx.gallery().await?;
    let album = gallery
        .call_opt_object("GetCurrentStillAlbum", script_args![])
        .await?
        .ok_or_else(|| Error::ObjectNotFound("No current still album".to_string()))?;

    let name = gallery
        .call_str("GetAlbumName", script_args![&album])
        .await
        .ok();
    let stills = album
        .call_objects("GetStills", script_args![])
        .await
        .unwrap_or_default();
    Ok(json!({ "album_name": name, "still_count": stills.len() }))
}

async fn set_current_still_album(ctx: Bridge, args: Value) -> Result<Value> {
    let album_name: String = args::required(&args, "album_name")?;
    let gallery = ctx.gallery().await?;
    let album = ctx.find_still_album(&album_name).await?;

    let set = gallery
        .call_bool("SetCurrentStillAlbum", script_args![&album])
        .await?;
    Ok(json!({ "set": set, "album_name": album_name }))
}

async fn get_gallery_still_albums(ctx: Bridge, _args: Value) -> Result<Value> {
    let gallery = ctx.gallery().await?;
    let albums = gallery
        .call_objects("GetGalleryStillAlbums", script_args![])
        .await?;

    let mut names = Vec::new();
    for album in &albums {
        names.push(json!(gallery
            .call_str("GetAlbumName", script_args![album])
            .await
            .ok()));
    }
    Ok(json!({ "albums": names, "count": names.len() }))
}

async fn get_gallery_power_grade_albums(ctx: Bridge, _args: Value) -> Result<Value> {
    let gallery = ctx.gallery().await?;
    let albums = gallery
        .call_objects("GetGalleryPowerGradeAlbums", script_args![])
        .await?;

    let mut names = Vec::new();
    for album in &albums {
        names.push(json!(gallery
            .call_str("GetAlbumName", script_args![album])
            .await
            .ok()));
    }
    Ok(json!({ "albums": names, "count": names.len() }))
}

async fn create_gallery_still_album(ctx: Bridge, args: Value) -> Result<Value> {
    create_album(ctx, args, "CreateGalleryStillAlbum").await
}

async fn create_gallery_power_grade_album(ctx: Bridge, args: Value) -> Result<Value> {
    create_album(ctx, args, "CreateGalleryPowerGradeAlbum").await
}

/// 앨범을 만들고 요청한 이름으로 바꾼다
async fn create_album(ctx: Bridge, args: Value, member: &str) -> Result<Value> {
    let album_name: String = args::required(&args, "album_name")?;
    let gallery = ctx.gallery().await?;

    let album = gallery
        .call_opt_object(member, script_args![])
        .await?
        .ok_or_else(|| {
            Error::Validation(format!("Failed to create album '{}'", album_name))
        })?;

    let renamed = gallery
        .call_bool("SetAlbumName", script_args![&album, &album_name])
        .await?;
    Ok(json!({ "created": true, "album_name": album_name, "renamed": renamed }))
}
