//! MediaPoolItem component - 미디어 풀 아이템 도구
//!
//! 모든 도구는 clip_id 조회 후 해당 객체에 1:1 포워딩한다.

use crate::api::{Bridge, Remote};
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, constants, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_name",
            "Get the name of a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_name),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_metadata",
            "Get metadata for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .optional("metadata_type", ParamKind::String, "Specific metadata type to retrieve"),
        wrap(get_metadata),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_item_metadata",
            "Set metadata for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("metadata", ParamKind::StringOrObject, "Metadata dictionary or key")
        .optional(
            "metadata_value",
            ParamKind::String,
            "Metadata value (only used if metadata is a string key)",
        ),
        wrap(set_metadata),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_third_party_metadata",
            "Get third-party metadata for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .optional("metadata_type", ParamKind::String, "Specific metadata type to retrieve"),
        wrap(get_third_party_metadata),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_item_third_party_metadata",
            "Set third-party metadata for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("metadata", ParamKind::StringOrObject, "Metadata dictionary or key")
        .optional(
            "metadata_value",
            ParamKind::String,
            "Metadata value (only used if metadata is a string key)",
        ),
        wrap(set_third_party_metadata),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_media_id",
            "Get the media ID for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_media_id),
    );
    reg.register(
        ToolSpec::new(
            "add_media_pool_item_marker",
            "Add a marker to a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("frame_id", ParamKind::Number, "Frame position for the marker")
        .required("color", ParamKind::String, "Color name for the marker")
        .required("name", ParamKind::String, "Name of the marker")
        .required("note", ParamKind::String, "Note text for the marker")
        .required("duration", ParamKind::Number, "Duration of the marker in frames")
        .optional("custom_data", ParamKind::String, "Custom data to attach to the marker"),
        wrap(add_marker),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_markers",
            "Get all markers for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_markers),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_marker_by_custom_data",
            "Get marker information by custom data",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("custom_data", ParamKind::String, "Custom data string to search for"),
        wrap(get_marker_by_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "update_media_pool_item_marker_custom_data",
            "Update custom data for a marker at a specific frame",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("frame_id", ParamKind::Number, "Frame position of the marker")
        .required("custom_data", ParamKind::String, "New custom data to set"),
        wrap(update_marker_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_marker_custom_data",
            "Get custom data for a marker at a specific frame",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("frame_id", ParamKind::Number, "Frame position of the marker"),
        wrap(get_marker_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "delete_media_pool_item_markers_by_color",
            "Delete all markers of a specific color",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required(
            "color",
            ParamKind::String,
            "Color of markers to delete, or 'All' to delete all markers",
        ),
        wrap(delete_markers_by_color),
    );
    reg.register(
        ToolSpec::new(
            "delete_media_pool_item_marker_at_frame",
            "Delete a marker at a specific frame",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("frame_num", ParamKind::Number, "Frame number where the marker is located"),
        wrap(delete_marker_at_frame),
    );
    reg.register(
        ToolSpec::new(
            "delete_media_pool_item_marker_by_custom_data",
            "Delete a marker by its custom data",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("custom_data", ParamKind::String, "Custom data string to search for"),
        wrap(delete_marker_by_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "add_media_pool_item_flag",
            "Add a flag to a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("color", ParamKind::String, "Color name for the flag"),
        wrap(add_flag),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_flag_list",
            "Get all flags for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_flag_list),
    );
    reg.register(
        ToolSpec::new(
            "clear_media_pool_item_flags",
            "Clear flags from a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("color", ParamKind::String, "Color of flags to clear, or 'All'"),
        wrap(clear_flags),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_color",
            "Get the color assigned to a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_clip_color),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_item_color",
            "Set the color for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("color_name", ParamKind::String, "Name of the color to set"),
        wrap(set_clip_color),
    );
    reg.register(
        ToolSpec::new(
            "clear_media_pool_item_color",
            "Clear the color assigned to a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(clear_clip_color),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_property",
            "Get clip properties for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .optional("property_name", ParamKind::String, "Specific property to retrieve"),
        wrap(get_clip_property),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_item_property",
            "Set a clip property for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("property_name", ParamKind::String, "Name of the property to set")
        .required("property_value", ParamKind::String, "Value to set"),
        wrap(set_clip_property),
    );
    reg.register(
        ToolSpec::new(
            "link_media_pool_item_proxy_media",
            "Link proxy media to a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required(
            "proxy_media_file_path",
            ParamKind::String,
            "Path to the proxy media file",
        ),
        wrap(link_proxy_media),
    );
    reg.register(
        ToolSpec::new(
            "unlink_media_pool_item_proxy_media",
            "Unlink proxy media from a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(unlink_proxy_media),
    );
    reg.register(
        ToolSpec::new(
            "replace_media_pool_item",
            "Replace a media pool item with another file",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("file_path", ParamKind::String, "Path to the replacement file"),
        wrap(replace_clip),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_unique_id",
            "Get the unique ID of a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_unique_id),
    );
    reg.register(
        ToolSpec::new(
            "transcribe_media_pool_item_audio",
            "Transcribe audio for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(transcribe_audio),
    );
    reg.register(
        ToolSpec::new(
            "clear_media_pool_item_transcription",
            "Clear audio transcription for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(clear_transcription),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_audio_mapping",
            "Get audio mapping information for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_audio_mapping),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool_item_mark_in_out",
            "Get in and out point information for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item"),
        wrap(get_mark_in_out),
    );
    reg.register(
        ToolSpec::new(
            "set_media_pool_item_mark_in_out",
            "Set in and out points for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .required("mark_in", ParamKind::Integer, "Mark in frame")
        .required("mark_out", ParamKind::Integer, "Mark out frame")
        .optional("mark_type", ParamKind::String, "Mark type (video, audio or all)"),
        wrap(set_mark_in_out),
    );
    reg.register(
        ToolSpec::new(
            "clear_media_pool_item_mark_in_out",
            "Clear in and out points for a media pool item",
            Component::MediaPoolItem,
        )
        .required("clip_id", ParamKind::String, "ID of the media pool item")
        .optional("mark_type", ParamKind::String, "Mark type (video, audio or all)"),
        wrap(clear_mark_in_out),
    );
}

/// clip_id 추출 + 객체 조회
async fn clip(ctx: &Bridge, args: &Value) -> Result<(String, Remote)> {
    let clip_id: String = args::required(args, "clip_id")?;
    let clip = ctx.find_media_pool_item(&clip_id).await?;
    Ok((clip_id, clip))
}

async fn get_name(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let name = clip.call_str("GetName", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "name": name }))
}

async fn get_metadata(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let metadata_type: Option<String> = args::optional(&args, "metadata_type")?;

    let metadata = match &metadata_type {
        Some(metadata_type) => {
            clip.call_value("GetMetadata", script_args![metadata_type])
                .await?
        }
        None => clip.call_value("GetMetadata", script_args![]).await?,
    };
    Ok(json!({ "clip_id": clip_id, "metadata": metadata }))
}

/// metadata가 문자열이면 (키, 값) 호출, 객체면 dict 호출
async fn set_metadata(ctx: Bridge, args: Value) -> Result<Value> {
    set_metadata_member(ctx, args, "SetMetadata").await
}

async fn get_third_party_metadata(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let metadata_type: Option<String> = args::optional(&args, "metadata_type")?;

    let metadata = match &metadata_type {
        Some(metadata_type) => {
            clip.call_value("GetThirdPartyMetadata", script_args![metadata_type])
                .await?
        }
        None => {
            clip.call_value("GetThirdPartyMetadata", script_args![])
                .await?
        }
    };
    Ok(json!({ "clip_id": clip_id, "metadata": metadata }))
}

async fn set_third_party_metadata(ctx: Bridge, args: Value) -> Result<Value> {
    set_metadata_member(ctx, args, "SetThirdPartyMetadata").await
}

async fn set_metadata_member(ctx: Bridge, args: Value, member: &str) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;

    let set = match args.get("metadata") {
        Some(Value::Object(_)) => {
            let metadata = args.get("metadata").cloned().unwrap();
            clip.call_bool(member, script_args![metadata]).await?
        }
        Some(Value::String(key)) => {
            let value: String = args::required(&args, "metadata_value")?;
            clip.call_bool(member, script_args![key.as_str(), value.as_str()])
                .await?
        }
        _ => {
            return Err(Error::invalid_param(
                "metadata",
                "expected object or string key",
            ))
        }
    };
    Ok(json!({ "set": set, "clip_id": clip_id }))
}

async fn get_media_id(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let media_id = clip.call_value("GetMediaId", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "media_id": media_id }))
}

async fn add_marker(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let frame_id: f64 = args::required(&args, "frame_id")?;
    let color: String = args::required(&args, "color")?;
    let name: String = args::required(&args, "name")?;
    let note: String = args::required(&args, "note")?;
    let duration: f64 = args::required(&args, "duration")?;
    let custom_data: String = args::optional_or(&args, "custom_data", String::new())?;

    constants::validate_marker_color(&color)?;

    let added = clip
        .call_bool(
            "AddMarker",
            script_args![frame_id, &color, &name, &note, duration, &custom_data],
        )
        .await?;
    if !added {
        return Err(Error::Validation(format!(
            "Failed to add marker at frame {}",
            frame_id
        )));
    }
    Ok(json!({
        "added": true,
        "clip_id": clip_id,
        "frame_id": frame_id,
        "color": color,
        "name": name,
    }))
}

async fn get_markers(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let markers = clip.call_value("GetMarkers", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "markers": markers }))
}

async fn get_marker_by_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let custom_data: String = args::required(&args, "custom_data")?;

    let marker = clip
        .call_value("GetMarkerByCustomData", script_args![&custom_data])
        .await?;
    Ok(json!({ "clip_id": clip_id, "marker": marker }))
}

async fn update_marker_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let frame_id: f64 = args::required(&args, "frame_id")?;
    let custom_data: String = args::required(&args, "custom_data")?;

    let updated = clip
        .call_bool(
            "UpdateMarkerCustomData",
            script_args![frame_id, &custom_data],
        )
        .await?;
    Ok(json!({ "updated": updated, "clip_id": clip_id, "frame_id": frame_id }))
}

async fn get_marker_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let frame_id: f64 = args::required(&args, "frame_id")?;

    let custom_data = clip
        .call_value("GetMarkerCustomData", script_args![frame_id])
        .await?;
    Ok(json!({ "clip_id": clip_id, "frame_id": frame_id, "custom_data": custom_data }))
}

async fn delete_markers_by_color(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let color: String = args::required(&args, "color")?;
    if color != "All" {
        constants::validate_marker_color(&color)?;
    }

    let deleted = clip
        .call_bool("DeleteMarkersByColor", script_args![&color])
        .await?;
    Ok(json!({ "deleted": deleted, "clip_id": clip_id, "color": color }))
}

async fn delete_marker_at_frame(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let frame_num: f64 = args::required(&args, "frame_num")?;

    let deleted = clip
        .call_bool("DeleteMarkerAtFrame", script_args![frame_num])
        .await?;
    Ok(json!({ "deleted": deleted, "clip_id": clip_id, "frame_num": frame_num }))
}

async fn delete_marker_by_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let custom_data: String = args::required(&args, "custom_data")?;

    let deleted = clip
        .call_bool("DeleteMarkerByCustomData", script_args![&custom_data])
        .await?;
    Ok(json!({ "deleted": deleted, "clip_id": clip_id }))
}

async fn add_flag(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let color: String = args::required(&args, "color")?;

    let added = clip.call_bool("AddFlag", script_args![&color]).await?;
    Ok(json!({ "added": added, "clip_id": clip_id, "color": color }))
}

async fn get_flag_list(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let flags = clip.call_value("GetFlagList", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "flags": flags }))
}

async fn clear_flags(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let color: String = args::required(&args, "color")?;

    let cleared = clip.call_bool("ClearFlags", script_args![&color]).await?;
    Ok(json!({ "cleared": cleared, "clip_id": clip_id, "color": color }))
}

async fn get_clip_color(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let color = clip.call_value("GetClipColor", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "color": color }))
}

async fn set_clip_color(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let color_name: String = args::required(&args, "color_name")?;

    let set = clip.call_bool("SetClipColor", script_args![&color_name]).await?;
    if !set {
        return Err(Error::Validation(format!(
            "Failed to set color '{}'",
            color_name
        )));
    }
    Ok(json!({ "set": true, "clip_id": clip_id, "color": color_name }))
}

async fn clear_clip_color(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let cleared = clip.call_bool("ClearClipColor", script_args![]).await?;
    Ok(json!({ "cleared": cleared, "clip_id": clip_id }))
}

async fn get_clip_property(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let property_name: Option<String> = args::optional(&args, "property_name")?;

    let properties = match &property_name {
        Some(name) => clip.call_value("GetClipProperty", script_args![name]).await?,
        None => clip.call_value("GetClipProperty", script_args![]).await?,
    };
    Ok(json!({ "clip_id": clip_id, "properties": properties }))
}

async fn set_clip_property(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let property_name: String = args::required(&args, "property_name")?;
    let property_value: String = args::required(&args, "property_value")?;

    let set = clip
        .call_bool(
            "SetClipProperty",
            script_args![&property_name, &property_value],
        )
        .await?;
    Ok(json!({ "set": set, "clip_id": clip_id, "property_name": property_name }))
}

async fn link_proxy_media(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let proxy_path: String = args::required(&args, "proxy_media_file_path")?;

    let linked = clip
        .call_bool("LinkProxyMedia", script_args![&proxy_path])
        .await?;
    Ok(json!({ "linked": linked, "clip_id": clip_id, "proxy_media_file_path": proxy_path }))
}

async fn unlink_proxy_media(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let unlinked = clip.call_bool("UnlinkProxyMedia", script_args![]).await?;
    Ok(json!({ "unlinked": unlinked, "clip_id": clip_id }))
}

async fn replace_clip(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let file_path: String = args::required(&args, "file_path")?;

    let replaced = clip.call_bool("ReplaceClip", script_args![&file_path]).await?;
    Ok(json!({ "replaced": replaced, "clip_id": clip_id, "file_path": file_path }))
}

async fn get_unique_id(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let unique_id = clip.call_str("GetUniqueId", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "unique_id": unique_id }))
}

async fn transcribe_audio(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let transcribed = clip.call_bool("TranscribeAudio", script_args![]).await?;
    Ok(json!({ "transcribed": transcribed, "clip_id": clip_id }))
}

async fn clear_transcription(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let cleared = clip.call_bool("ClearTranscription", script_args![]).await?;
    Ok(json!({ "cleared": cleared, "clip_id": clip_id }))
}

async fn get_audio_mapping(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let mapping = clip.call_value("GetAudioMapping", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "audio_mapping": mapping }))
}

async fn get_mark_in_out(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let mark_in_out = clip.call_value("GetMarkInOut", script_args![]).await?;
    Ok(json!({ "clip_id": clip_id, "mark_in_out": mark_in_out }))
}

async fn set_mark_in_out(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let mark_in: i64 = args::required(&args, "mark_in")?;
    let mark_out: i64 = args::required(&args, "mark_out")?;
    let mark_type: String = args::optional_or(&args, "mark_type", "all".to_string())?;

    let set = clip
        .call_bool(
            "SetMarkInOut",
            script_args![mark_in, mark_out, &mark_type],
        )
        .await?;
    Ok(json!({ "set": set, "clip_id": clip_id, "mark_in": mark_in, "mark_out": mark_out }))
}

async fn clear_mark_in_out(ctx: Bridge, args: Value) -> Result<Value> {
    let (clip_id, clip) = clip(&ctx, &args).await?;
    let mark_type: String = args::optional_or(&args, "mark_type", "all".to_string())?;

    let cleared = clip
        .call_bool("ClearMarkInOut", script_args![&mark_type])
        .await?;
    Ok(json!({ "cleared": cleared, "clip_id": clip_id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ScriptValue;
    use crate::testing::MockTransport;
    use std::sync::Arc;

    /// 현재 폴더에 clip-1이 있는 목
    fn clip_transport() -> Arc<MockTransport> {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "GetCurrentProject", 2, "Project");
        transport.on_object(2, "GetMediaPool", 3, "MediaPool");
        transport.on_object(3, "GetCurrentFolder", 4, "Folder");
        transport.on(
            4,
            "GetClipList",
            ScriptValue::List(vec![ScriptValue::Object(crate::bridge::ObjectHandle {
                id: 5,
                class: "MediaPoolItem".into(),
            })]),
        );
        transport.on(5, "GetUniqueId", ScriptValue::from("clip-1"));
        transport
    }

    #[tokio::test]
    async fn test_get_name_resolves_clip_by_id() {
        let transport = clip_transport();
        transport.on(5, "GetName", ScriptValue::from("interview.mov"));
        let bridge = Bridge::new(transport);

        let result = get_name(bridge, json!({ "clip_id": "clip-1" })).await.unwrap();
        assert_eq!(result, json!({ "clip_id": "clip-1", "name": "interview.mov" }));
    }

    #[tokio::test]
    async fn test_add_marker_validates_color() {
        let transport = clip_transport();
        let bridge = Bridge::new(transport.clone());

        let err = add_marker(
            bridge,
            json!({
                "clip_id": "clip-1",
                "frame_id": 10,
                "color": "magenta",
                "name": "m",
                "note": "",
                "duration": 1,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!transport.called("AddMarker"));
    }

    #[tokio::test]
    async fn test_add_marker_forwards_argument_order() {
        let transport = clip_transport();
        transport.on(5, "AddMarker", ScriptValue::Bool(true));
        let bridge = Bridge::new(transport.clone());

        add_marker(
            bridge,
            json!({
                "clip_id": "clip-1",
                "frame_id": 10,
                "color": "Blue",
                "name": "Review",
                "note": "check exposure",
                "duration": 5,
            }),
        )
        .await
        .unwrap();

        let marker_call = transport
            .calls()
            .into_iter()
            .find(|(_, member, _)| member == "AddMarker")
            .unwrap();
        assert_eq!(marker_call.2[0], ScriptValue::Float(10.0));
        assert_eq!(marker_call.2[1], ScriptValue::from("Blue"));
        assert_eq!(marker_call.2[2], ScriptValue::from("Review"));
        assert_eq!(marker_call.2[4], ScriptValue::Float(5.0));
        assert_eq!(marker_call.2[5], ScriptValue::from(""));
    }

    #[tokio::test]
    async fn test_set_metadata_accepts_dict_or_key_value() {
        let transport = clip_transport();
        transport.on(5, "SetMetadata", ScriptValue::Bool(true));
        let bridge = Bridge::new(transport.clone());

        set_metadata(
            bridge.clone(),
            json!({ "clip_id": "clip-1", "metadata": { "Scene": "12" } }),
        )
        .await
        .unwrap();
        set_metadata(
            bridge.clone(),
            json!({ "clip_id": "clip-1", "metadata": "Scene", "metadata_value": "12" }),
        )
        .await
        .unwrap();

        let err = set_metadata(bridge, json!({ "clip_id": "clip-1", "metadata": 3 }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParam { .. }));
    }
}
