//! Timeline component - 현재 타임라인 도구
//!
//! 트랙, 마커, 타임코드, 제너레이터/타이틀 삽입, 내보내기, 스틸 캡처까지
//! 현재 타임라인 객체의 포워딩.

use crate::api::{Bridge, Remote};
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::constants::TRACK_TYPES;
use davinci_foundation::{args, constants, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_timeline_details",
            "Get details about the current timeline",
            Component::Timeline,
        ),
        wrap(get_timeline_details),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_tracks",
            "Get details about all tracks in the current timeline",
            Component::Timeline,
        ),
        wrap(get_timeline_tracks),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_items",
            "Get details about items in the current timeline",
            Component::Timeline,
        ),
        wrap(get_timeline_items),
    );
    reg.register(
        ToolSpec::new("add_track", "Add a track to the current timeline", Component::Timeline)
            .required(
                "track_type",
                ParamKind::String,
                "Type of track to add ('video', 'audio', or 'subtitle')",
            ),
        wrap(add_track),
    );
    reg.register(
        ToolSpec::new(
            "delete_track",
            "Delete a track from the current timeline",
            Component::Timeline,
        )
        .required(
            "track_type",
            ParamKind::String,
            "Type of track to delete ('video', 'audio', or 'subtitle')",
        )
        .required(
            "track_index",
            ParamKind::Integer,
            "Index of the track to delete (1-based index)",
        ),
        wrap(delete_track),
    );
    reg.register(
        ToolSpec::new(
            "delete_timeline_clips",
            "Delete clips from the current timeline",
            Component::Timeline,
        )
        .required("clip_ids", ParamKind::Array, "List of timeline clip IDs to delete"),
        wrap(delete_timeline_clips),
    );
    reg.register(
        ToolSpec::new(
            "set_current_timecode",
            "Set the current timecode for the timeline",
            Component::Timeline,
        )
        .required("timecode", ParamKind::String, "Timecode string to set (format: HH:MM:SS:FF)"),
        wrap(set_current_timecode),
    );
    reg.register(
        ToolSpec::new(
            "set_track_enable",
            "Enable or disable a track in the timeline",
            Component::Timeline,
        )
        .required(
            "track_type",
            ParamKind::String,
            "Type of track ('video', 'audio', or 'subtitle')",
        )
        .required("track_index", ParamKind::Integer, "Index of the track (1-based index)")
        .required("enable", ParamKind::Boolean, "True to enable the track, False to disable"),
        wrap(set_track_enable),
    );
    reg.register(
        ToolSpec::new(
            "set_track_lock",
            "Lock or unlock a track in the timeline",
            Component::Timeline,
        )
        .required(
            "track_type",
            ParamKind::String,
            "Type of track ('video', 'audio', or 'subtitle')",
        )
        .required("track_index", ParamKind::Integer, "Index of the track (1-based index)")
        .required("lock", ParamKind::Boolean, "True to lock the track, False to unlock"),
        wrap(set_track_lock),
    );
    reg.register(
        ToolSpec::new("add_marker", "Add a marker to the timeline", Component::Timeline)
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
            "get_markers",
            "Get all markers from the timeline",
            Component::Timeline,
        ),
        wrap(get_markers),
    );
    reg.register(
        ToolSpec::new(
            "get_marker_by_custom_data",
            "Get a marker by its custom data",
            Component::Timeline,
        )
        .required("custom_data", ParamKind::String, "Custom data string to search for"),
        wrap(get_marker_by_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "update_marker_custom_data",
            "Update custom data for a marker at a specific frame",
            Component::Timeline,
        )
        .required("frame_id", ParamKind::Number, "Frame position of the marker")
        .required("custom_data", ParamKind::String, "New custom data to set"),
        wrap(update_marker_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "get_marker_custom_data",
            "Get custom data for a marker at a specific frame",
            Component::Timeline,
        )
        .required("frame_id", ParamKind::Number, "Frame position of the marker"),
        wrap(get_marker_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "delete_markers_by_color",
            "Delete all markers of a specific color from the timeline",
            Component::Timeline,
        )
        .required(
            "color",
            ParamKind::String,
            "Color of markers to delete, or 'All' to delete all markers",
        ),
        wrap(delete_markers_by_color),
    );
    reg.register(
        ToolSpec::new(
            "delete_marker_at_frame",
            "Delete a marker at a specific frame",
            Component::Timeline,
        )
        .required("frame_num", ParamKind::Number, "Frame number where the marker is located"),
        wrap(delete_marker_at_frame),
    );
    reg.register(
        ToolSpec::new(
            "delete_marker_by_custom_data",
            "Delete a marker by its custom data",
            Component::Timeline,
        )
        .required("custom_data", ParamKind::String, "Custom data string to search for"),
        wrap(delete_marker_by_custom_data),
    );
    reg.register(
        ToolSpec::new(
            "set_timeline_name",
            "Set the name of the current timeline",
            Component::Timeline,
        )
        .required("timeline_name", ParamKind::String, "New name for the timeline"),
        wrap(set_timeline_name),
    );
    reg.register(
        ToolSpec::new(
            "get_track_name",
            "Get the name of a track in the timeline",
            Component::Timeline,
        )
        .required(
            "track_type",
            ParamKind::String,
            "Type of track ('video', 'audio', or 'subtitle')",
        )
        .required("track_index", ParamKind::Integer, "Index of the track (1-based index)"),
        wrap(get_track_name),
    );
    reg.register(
        ToolSpec::new(
            "set_track_name",
            "Set the name of a track in the timeline",
            Component::Timeline,
        )
        .required(
            "track_type",
            ParamKind::String,
            "Type of track ('video', 'audio', or 'subtitle')",
        )
        .required("track_index", ParamKind::Integer, "Index of the track (1-based index)")
        .required("name", ParamKind::String, "New name for the track"),
        wrap(set_track_name),
    );
    reg.register(
        ToolSpec::new(
            "create_compound_clip",
            "Create a compound clip from timeline items",
            Component::Timeline,
        )
        .required(
            "timeline_items",
            ParamKind::Array,
            "List of timeline item IDs to include in the compound clip",
        )
        .optional(
            "clip_info",
            ParamKind::Object,
            "Optional dictionary with clip info (keys: 'startTimecode', 'name')",
        ),
        wrap(create_compound_clip),
    );
    reg.register(
        ToolSpec::new(
            "get_current_timecode",
            "Get the current timecode of the timeline",
            Component::Timeline,
        ),
        wrap(get_current_timecode),
    );
    reg.register(
        ToolSpec::new(
            "duplicate_timeline",
            "Duplicate the current timeline with an optional new name",
            Component::Timeline,
        )
        .optional("timeline_name", ParamKind::String, "Optional name for the duplicated timeline"),
        wrap(duplicate_timeline),
    );
    reg.register(
        ToolSpec::new(
            "export_timeline",
            "Export the current timeline to a file in the specified format",
            Component::Timeline,
        )
        .required("file_path", ParamKind::String, "Path where the exported file will be saved")
        .required("export_type", ParamKind::String, "Type of export (AAF, DRT, EDL, etc.)")
        .optional(
            "export_subtype",
            ParamKind::String,
            "Subtype of export (optional, used for certain export types)",
        ),
        wrap(export_timeline),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_setting",
            "Get the value of a timeline setting or all settings",
            Component::Timeline,
        )
        .optional("setting_name", ParamKind::String, "Optional name of the setting to retrieve"),
        wrap(get_timeline_setting),
    );
    reg.register(
        ToolSpec::new(
            "set_timeline_setting",
            "Set the value of a timeline setting",
            Component::Timeline,
        )
        .required("setting_name", ParamKind::String, "Name of the setting to set")
        .required("setting_value", ParamKind::String, "Value to set for the setting"),
        wrap(set_timeline_setting),
    );
    reg.register(
        ToolSpec::new(
            "insert_generator_into_timeline",
            "Insert a generator into the current timeline",
            Component::Timeline,
        )
        .required("generator_name", ParamKind::String, "Name of the generator to insert"),
        wrap(insert_generator_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "insert_fusion_generator_into_timeline",
            "Insert a Fusion generator into the current timeline",
            Component::Timeline,
        )
        .required("generator_name", ParamKind::String, "Name of the Fusion generator to insert"),
        wrap(insert_fusion_generator_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "insert_fusion_composition_into_timeline",
            "Insert a Fusion composition into the current timeline",
            Component::Timeline,
        ),
        wrap(insert_fusion_composition_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "insert_ofx_generator_into_timeline",
            "Insert an OFX generator into the current timeline",
            Component::Timeline,
        )
        .required("generator_name", ParamKind::String, "Name of the OFX generator to insert"),
        wrap(insert_ofx_generator_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "insert_title_into_timeline",
            "Insert a title into the current timeline",
            Component::Timeline,
        )
        .required("title_name", ParamKind::String, "Name of the title to insert"),
        wrap(insert_title_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "insert_fusion_title_into_timeline",
            "Insert a Fusion title into the current timeline",
            Component::Timeline,
        )
        .required("title_name", ParamKind::String, "Name of the Fusion title to insert"),
        wrap(insert_fusion_title_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "grab_still",
            "Grab a still from the current video clip in the timeline",
            Component::Timeline,
        ),
        wrap(grab_still),
    );
    reg.register(
        ToolSpec::new(
            "grab_all_stills",
            "Grab stills from all clips in the timeline at the specified source frame",
            Component::Timeline,
        )
        .required(
            "still_frame_source",
            ParamKind::Integer,
            "Source frame for stills (1 - First frame, 2 - Middle frame)",
        ),
        wrap(grab_all_stills),
    );
    reg.register(
        ToolSpec::new(
            "get_current_video_item",
            "Get the current video item at the playhead position",
            Component::Timeline,
        ),
        wrap(get_current_video_item),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_items_in_range",
            "Get all timeline items within a frame range",
            Component::Timeline,
        )
        .optional("start_frame", ParamKind::Integer, "Start frame of the range")
        .optional("end_frame", ParamKind::Integer, "End frame of the range"),
        wrap(get_timeline_items_in_range),
    );
    reg.register(
        ToolSpec::new(
            "get_current_clip_thumbnail_image",
            "Get a thumbnail image of the current clip at the playhead position",
            Component::Timeline,
        )
        .optional("width", ParamKind::Integer, "Thumbnail width")
        .optional("height", ParamKind::Integer, "Thumbnail height"),
        wrap(get_current_clip_thumbnail_image),
    );
    reg.register(
        ToolSpec::new(
            "create_fusion_clip",
            "Create a Fusion clip from the specified timeline items",
            Component::Timeline,
        )
        .required(
            "timeline_items",
            ParamKind::Array,
            "List of timeline item IDs to include in the Fusion clip",
        )
        .optional(
            "clip_info",
            ParamKind::Object,
            "Optional dictionary with additional clip information (e.g., name)",
        ),
        wrap(create_fusion_clip),
    );
    reg.register(
        ToolSpec::new(
            "import_into_timeline",
            "Import media or AAF/XML/EDL/etc. into the current timeline",
            Component::Timeline,
        )
        .required("file_path", ParamKind::String, "Path to the file to import")
        .optional(
            "import_options",
            ParamKind::Object,
            "Optional dictionary with import options specific to the file type",
        ),
        wrap(import_into_timeline),
    );
    reg.register(
        ToolSpec::new(
            "set_start_timecode",
            "Set the start timecode of the current timeline",
            Component::Timeline,
        )
        .required("timecode", ParamKind::String, "Start timecode to set (format: HH:MM:SS:FF)"),
        wrap(set_start_timecode),
    );
    reg.register(
        ToolSpec::new(
            "set_clips_linked",
            "Set clips to be linked or unlinked",
            Component::Timeline,
        )
        .required("clip_ids", ParamKind::Array, "List of timeline item IDs")
        .required("linked", ParamKind::Boolean, "True to link the clips, False to unlink"),
        wrap(set_clips_linked),
    );
}

// ============================================================================
// Helpers
// ============================================================================

/// 트랙 타입 + 인덱스 검증 (1-based, 존재하는 트랙이어야 함)
async fn checked_track(
    timeline: &Remote,
    track_type: &str,
    track_index: i64,
) -> Result<()> {
    constants::validate_track_type(track_type)?;
    let count = timeline
        .call_i64("GetTrackCount", script_args![track_type])
        .await?;
    if track_index < 1 || track_index > count {
        return Err(Error::Validation(format!(
            "Invalid track index: {}. The timeline has {} {} track(s)",
            track_index, count, track_type
        )));
    }
    Ok(())
}

/// 타임라인 아이템 ID 목록을 핸들 인자로 변환
async fn resolve_item_ids(ctx: &Bridge, item_ids: &[String]) -> Result<Vec<ScriptValue>> {
    let mut items = Vec::with_capacity(item_ids.len());
    for item_id in item_ids {
        let item = ctx.find_timeline_item(item_id).await?;
        items.push(ScriptValue::from(&item));
    }
    Ok(items)
}

async fn item_summary(item: &Remote, track_type: &str, track_index: i64) -> Value {
    json!({
        "name": item.call_str("GetName", script_args![]).await.ok(),
        "id": item.call_str("GetUniqueId", script_args![]).await.ok(),
        "track_type": track_type,
        "track_index": track_index,
        "start_frame": item.call_i64("GetStart", script_args![]).await.ok(),
        "end_frame": item.call_i64("GetEnd", script_args![]).await.ok(),
        "duration": item.call_i64("GetDuration", script_args![]).await.ok(),
    })
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_timeline_details(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;

    let start_frame = timeline.call_i64("GetStartFrame", script_args![]).await?;
    let end_frame = timeline.call_i64("GetEndFrame", script_args![]).await?;

    Ok(json!({
        "name": timeline.call_str("GetName", script_args![]).await?,
        "track_count": {
            "video": timeline.call_i64("GetTrackCount", script_args!["video"]).await?,
            "audio": timeline.call_i64("GetTrackCount", script_args!["audio"]).await?,
            "subtitle": timeline.call_i64("GetTrackCount", script_args!["subtitle"]).await?,
        },
        "start_frame": start_frame,
        "end_frame": end_frame,
        "duration_frames": end_frame - start_frame + 1,
        "timecode": timeline.call_str("GetCurrentTimecode", script_args![]).await.ok(),
    }))
}

async fn get_timeline_tracks(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;

    let mut tracks = Vec::new();
    for track_type in TRACK_TYPES {
        let count = timeline
            .call_i64("GetTrackCount", script_args![track_type])
            .await?;
        for index in 1..=count {
            let name = timeline
                .call_str("GetTrackName", script_args![track_type, index])
                .await
                .unwrap_or_else(|_| format!("{} {}", track_type, index));
            tracks.push(json!({ "type": track_type, "index": index, "name": name }));
        }
    }
    Ok(json!({ "tracks": tracks, "count": tracks.len() }))
}

async fn get_timeline_items(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;

    let mut items = Vec::new();
    for track_type in TRACK_TYPES {
        let count = timeline
            .call_i64("GetTrackCount", script_args![track_type])
            .await?;
        for index in 1..=count {
            for item in timeline
                .call_objects("GetItemListInTrack", script_args![track_type, index])
                .await
                .unwrap_or_default()
            {
                items.push(item_summary(&item, track_type, index).await);
            }
        }
    }
    Ok(json!({ "items": items, "count": items.len() }))
}

async fn add_track(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    constants::validate_track_type(&track_type)?;
    let timeline = ctx.current_timeline().await?;

    let added = timeline
        .call_bool("AddTrack", script_args![track_type.to_lowercase().as_str()])
        .await?;
    Ok(json!({ "added": added, "track_type": track_type }))
}

async fn delete_track(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    let track_index: i64 = args::required(&args, "track_index")?;
    let timeline = ctx.current_timeline().await?;
    checked_track(&timeline, &track_type, track_index).await?;

    let deleted = timeline
        .call_bool(
            "DeleteTrack",
            script_args![track_type.to_lowercase().as_str(), track_index],
        )
        .await?;
    Ok(json!({ "deleted": deleted, "track_type": track_type, "track_index": track_index }))
}

async fn delete_timeline_clips(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let timeline = ctx.current_timeline().await?;

    let items = resolve_item_ids(&ctx, &clip_ids).await?;
    let deleted = timeline
        .call_bool("DeleteClips", vec![ScriptValue::List(items)])
        .await?;
    Ok(json!({ "deleted": deleted, "clip_count": clip_ids.len() }))
}

async fn set_current_timecode(ctx: Bridge, args: Value) -> Result<Value> {
    let timecode: String = args::required(&args, "timecode")?;
    let timeline = ctx.current_timeline().await?;

    let set = timeline
        .call_bool("SetCurrentTimecode", script_args![&timecode])
        .await?;
    Ok(json!({ "set": set, "timecode": timecode }))
}

async fn set_track_enable(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    let track_index: i64 = args::required(&args, "track_index")?;
    let enable: bool = args::required(&args, "enable")?;
    let timeline = ctx.current_timeline().await?;
    checked_track(&timeline, &track_type, track_index).await?;

    let set = timeline
        .call_bool(
            "SetTrackEnable",
            script_args![track_type.to_lowercase().as_str(), track_index, enable],
        )
        .await?;
    Ok(json!({ "set": set, "track_type": track_type, "track_index": track_index, "enabled": enable }))
}

async fn set_track_lock(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    let track_index: i64 = args::required(&args, "track_index")?;
    let lock: bool = args::required(&args, "lock")?;
    let timeline = ctx.current_timeline().await?;
    checked_track(&timeline, &track_type, track_index).await?;

    let set = timeline
        .call_bool(
            "SetTrackLock",
            script_args![track_type.to_lowercase().as_str(), track_index, lock],
        )
        .await?;
    Ok(json!({ "set": set, "track_type": track_type, "track_index": track_index, "locked": lock }))
}

async fn add_marker(ctx: Bridge, args: Value) -> Result<Value> {
    let frame_id: f64 = args::required(&args, "frame_id")?;
    let color: String = args::required(&args, "color")?;
    let name: String = args::required(&args, "name")?;
    let note: String = args::required(&args, "note")?;
    let duration: f64 = args::required(&args, "duration")?;
    let custom_data: String = args::optional_or(&args, "custom_data", String::new())?;

    constants::validate_marker_color(&color)?;
    let timeline = ctx.current_timeline().await?;

    let added = timeline
        .call_bool(
            "AddMarker",
            script_args![frame_id, &color, &name, &note, duration, &custom_data],
        )
        .await?;
    if !added {
        return Err(Error::Validation(format!(
            "Failed to add marker at frame {} (frame may be outside the timeline or already marked)",
            frame_id
        )));
    }
    Ok(json!({
        "added": true,
        "frame_id": frame_id,
        "color": color,
        "name": name,
    }))
}

async fn get_markers(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let markers = timeline.call_value("GetMarkers", script_args![]).await?;
    Ok(json!({ "markers": markers }))
}

async fn get_marker_by_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let custom_data: String = args::required(&args, "custom_data")?;
    let timeline = ctx.current_timeline().await?;

    let marker = timeline
        .call_value("GetMarkerByCustomData", script_args![&custom_data])
        .await?;
    Ok(json!({ "marker": marker }))
}

async fn update_marker_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let frame_id: f64 = args::required(&args, "frame_id")?;
    let custom_data: String = args::required(&args, "custom_data")?;
    let timeline = ctx.current_timeline().await?;

    let updated = timeline
        .call_bool(
            "UpdateMarkerCustomData",
            script_args![frame_id, &custom_data],
        )
        .await?;
    Ok(json!({ "updated": updated, "frame_id": frame_id }))
}

async fn get_marker_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let frame_id: f64 = args::required(&args, "frame_id")?;
    let timeline = ctx.current_timeline().await?;

    let custom_data = timeline
        .call_value("GetMarkerCustomData", script_args![frame_id])
        .await?;
    Ok(json!({ "frame_id": frame_id, "custom_data": custom_data }))
}

async fn delete_markers_by_color(ctx: Bridge, args: Value) -> Result<Value> {
    let color: String = args::required(&args, "color")?;
    if color != "All" {
        constants::validate_marker_color(&color)?;
    }
    let timeline = ctx.current_timeline().await?;

    let deleted = timeline
        .call_bool("DeleteMarkersByColor", script_args![&color])
        .await?;
    Ok(json!({ "deleted": deleted, "color": color }))
}

async fn delete_marker_at_frame(ctx: Bridge, args: Value) -> Result<Value> {
    let frame_num: f64 = args::required(&args, "frame_num")?;
    let timeline = ctx.current_timeline().await?;

    let deleted = timeline
        .call_bool("DeleteMarkerAtFrame", script_args![frame_num])
        .await?;
    Ok(json!({ "deleted": deleted, "frame_num": frame_num }))
}

async fn delete_marker_by_custom_data(ctx: Bridge, args: Value) -> Result<Value> {
    let custom_data: String = args::required(&args, "custom_data")?;
    let timeline = ctx.current_timeline().await?;

    let deleted = timeline
        .call_bool("DeleteMarkerByCustomData", script_args![&custom_data])
        .await?;
    Ok(json!({ "deleted": deleted }))
}

async fn set_timeline_name(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_name: String = args::required(&args, "timeline_name")?;
    let timeline = ctx.current_timeline().await?;

    let renamed = timeline.call_bool("SetName", script_args![&timeline_name]).await?;
    Ok(json!({ "renamed": renamed, "timeline_name": timeline_name }))
}

async fn get_track_name(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    let track_index: i64 = args::required(&args, "track_index")?;
    let timeline = ctx.current_timeline().await?;
    checked_track(&timeline, &track_type, track_index).await?;

    let name = timeline
        .call_str(
            "GetTrackName",
            script_args![track_type.to_lowercase().as_str(), track_index],
        )
        .await?;
    Ok(json!({ "track_type": track_type, "track_index": track_index, "name": name }))
}

async fn set_track_name(ctx: Bridge, args: Value) -> Result<Value> {
    let track_type: String = args::required(&args, "track_type")?;
    let track_index: i64 = args::required(&args, "track_index")?;
    let name: String = args::required(&args, "name")?;
    let timeline = ctx.current_timeline().await?;
    checked_track(&timeline, &track_type, track_index).await?;

    let set = timeline
        .call_bool(
            "SetTrackName",
            script_args![track_type.to_lowercase().as_str(), track_index, &name],
        )
        .await?;
    Ok(json!({ "set": set, "track_type": track_type, "track_index": track_index, "name": name }))
}

async fn create_compound_clip(ctx: Bridge, args: Value) -> Result<Value> {
    let item_ids: Vec<String> = args::required(&args, "timeline_items")?;
    let clip_info: Option<Value> = args::optional(&args, "clip_info")?;
    let timeline = ctx.current_timeline().await?;

    let items = resolve_item_ids(&ctx, &item_ids).await?;
    let compound = match clip_info {
        Some(info) => {
            timeline
                .call_opt_object(
                    "CreateCompoundClip",
                    vec![ScriptValue::List(items), ScriptValue::from(info)],
                )
                .await?
        }
        None => {
            timeline
                .call_opt_object("CreateCompoundClip", vec![ScriptValue::List(items)])
                .await?
        }
    };

    let compound = compound
        .ok_or_else(|| Error::Validation("Failed to create compound clip".to_string()))?;
    Ok(json!({
        "created": true,
        "name": compound.call_str("GetName", script_args![]).await.ok(),
        "item_count": item_ids.len(),
    }))
}

async fn get_current_timecode(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let timecode = timeline.call_str("GetCurrentTimecode", script_args![]).await?;
    Ok(json!({ "timecode": timecode }))
}

async fn duplicate_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_name: Option<String> = args::optional(&args, "timeline_name")?;
    let timeline = ctx.current_timeline().await?;

    let duplicate = match &timeline_name {
        Some(name) => {
            timeline
                .call_opt_object("DuplicateTimeline", script_args![name])
                .await?
        }
        None => {
            timeline
                .call_opt_object("DuplicateTimeline", script_args![])
                .await?
        }
    };

    let duplicate = duplicate
        .ok_or_else(|| Error::Validation("Failed to duplicate timeline".to_string()))?;
    Ok(json!({
        "duplicated": true,
        "timeline_name": duplicate.call_str("GetName", script_args![]).await.ok(),
    }))
}

/// 내보내기 타입 문자열은 검증 후 그대로 전달된다
async fn export_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let export_type: String = args::required(&args, "export_type")?;
    let export_subtype: Option<String> = args::optional(&args, "export_subtype")?;

    constants::validate_export_type(&export_type)?;
    if let Some(subtype) = &export_subtype {
        let upper_type = export_type.to_uppercase();
        let upper_subtype = subtype.to_uppercase();
        if upper_type == "AAF"
            && !constants::AAF_EXPORT_SUBTYPES.contains(&upper_subtype.as_str())
        {
            return Err(Error::Validation(
                "For AAF export, subtype must be either 'NEW' or 'EXISTING'".to_string(),
            ));
        }
        if upper_type == "EDL"
            && !constants::EDL_EXPORT_SUBTYPES.contains(&upper_subtype.as_str())
        {
            return Err(Error::Validation(
                "For EDL export, subtype must be one of: 'CDL', 'SDL', 'MISSING_CLIPS', 'NONE'"
                    .to_string(),
            ));
        }
    }

    let timeline = ctx.current_timeline().await?;
    let exported = match &export_subtype {
        Some(subtype) => {
            timeline
                .call_bool("Export", script_args![&file_path, &export_type, subtype])
                .await?
        }
        None => {
            timeline
                .call_bool("Export", script_args![&file_path, &export_type])
                .await?
        }
    };
    if !exported {
        return Err(Error::Validation(format!(
            "Failed to export timeline to {}",
            file_path
        )));
    }
    Ok(json!({ "exported": true, "file_path": file_path, "export_type": export_type }))
}

async fn get_timeline_setting(ctx: Bridge, args: Value) -> Result<Value> {
    let setting_name: Option<String> = args::optional(&args, "setting_name")?;
    let timeline = ctx.current_timeline().await?;

    let settings = match &setting_name {
        Some(name) => timeline.call_value("GetSetting", script_args![name]).await?,
        None => timeline.call_value("GetSetting", script_args![]).await?,
    };
    Ok(json!({ "settings": settings }))
}

async fn set_timeline_setting(ctx: Bridge, args: Value) -> Result<Value> {
    let setting_name: String = args::required(&args, "setting_name")?;
    let setting_value: String = args::required(&args, "setting_value")?;
    let timeline = ctx.current_timeline().await?;

    let set = timeline
        .call_bool("SetSetting", script_args![&setting_name, &setting_value])
        .await?;
    Ok(json!({ "set": set, "setting_name": setting_name, "setting_value": setting_value }))
}

/// 삽입 계열 공통: 성공 시 생성된 타임라인 아이템을 돌려준다
async fn insert_named(
    ctx: Bridge,
    member: &'static str,
    value: String,
) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let item = timeline
        .call_opt_object(member, script_args![value.as_str()])
        .await?
        .ok_or_else(|| Error::Validation(format!("Failed to insert '{}'", value)))?;

    Ok(json!({
        "inserted": true,
        "name": value,
        "item_id": item.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

async fn insert_generator_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let generator_name: String = args::required(&args, "generator_name")?;
    insert_named(ctx, "InsertGeneratorIntoTimeline", generator_name).await
}

async fn insert_fusion_generator_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let generator_name: String = args::required(&args, "generator_name")?;
    insert_named(ctx, "InsertFusionGeneratorIntoTimeline", generator_name).await
}

async fn insert_fusion_composition_into_timeline(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let item = timeline
        .call_opt_object("InsertFusionCompositionIntoTimeline", script_args![])
        .await?
        .ok_or_else(|| {
            Error::Validation("Failed to insert Fusion composition".to_string())
        })?;

    Ok(json!({
        "inserted": true,
        "item_id": item.call_str("GetUniqueId", script_args![]).await.ok(),
    }))
}

async fn insert_ofx_generator_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let generator_name: String = args::required(&args, "generator_name")?;
    insert_named(ctx, "InsertOFXGeneratorIntoTimeline", generator_name).await
}

async fn insert_title_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let title_name: String = args::required(&args, "title_name")?;
    insert_named(ctx, "InsertTitleIntoTimeline", title_name).await
}

async fn insert_fusion_title_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let title_name: String = args::required(&args, "title_name")?;
    insert_named(ctx, "InsertFusionTitleIntoTimeline", title_name).await
}

async fn grab_still(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let still = timeline
        .call_opt_object("GrabStill", script_args![])
        .await?
        .ok_or_else(|| Error::Validation("Failed to grab still".to_string()))?;
    Ok(json!({ "grabbed": true, "still": still.to_json() }))
}

async fn grab_all_stills(ctx: Bridge, args: Value) -> Result<Value> {
    let still_frame_source: i64 = args::required(&args, "still_frame_source")?;
    if !constants::STILL_FRAME_SOURCES.contains(&still_frame_source) {
        return Err(Error::Validation(format!(
            "Invalid still frame source: {}. Must be 1 (First frame) or 2 (Middle frame)",
            still_frame_source
        )));
    }
    let timeline = ctx.current_timeline().await?;

    let stills = timeline
        .call_objects("GrabAllStills", script_args![still_frame_source])
        .await?;
    Ok(json!({ "grabbed": stills.len(), "still_frame_source": still_frame_source }))
}

async fn get_current_video_item(ctx: Bridge, _args: Value) -> Result<Value> {
    let timeline = ctx.current_timeline().await?;
    let item = timeline
        .call_opt_object("GetCurrentVideoItem", script_args![])
        .await?
        .ok_or_else(|| {
            Error::ObjectNotFound("No current video item in the timeline".to_string())
        })?;

    Ok(json!({
        "name": item.call_str("GetName", script_args![]).await.ok(),
        "id": item.call_str("GetUniqueId", script_args![]).await.ok(),
        "start_frame": item.call_i64("GetStart", script_args![]).await.ok(),
        "end_frame": item.call_i64("GetEnd", script_args![]).await.ok(),
    }))
}

/// 범위를 지정하지 않으면 타임라인 전체를 본다
async fn get_timeline_items_in_range(ctx: Bridge, args: Value) -> Result<Value> {
    let start_frame: Option<i64> = args::optional(&args, "start_frame")?;
    let end_frame: Option<i64> = args::optional(&args, "end_frame")?;
    let timeline = ctx.current_timeline().await?;

    let range_start = match start_frame {
        Some(frame) => frame,
        None => timeline.call_i64("GetStartFrame", script_args![]).await?,
    };
    let range_end = match end_frame {
        Some(frame) => frame,
        None => timeline.call_i64("GetEndFrame", script_args![]).await?,
    };

    let mut items = Vec::new();
    for track_type in TRACK_TYPES {
        let count = timeline
            .call_i64("GetTrackCount", script_args![track_type])
            .await?;
        for index in 1..=count {
            for item in timeline
                .call_objects("GetItemListInTrack", script_args![track_type, index])
                .await
                .unwrap_or_default()
            {
                let start = item.call_i64("GetStart", script_args![]).await.unwrap_or(0);
                let end = item.call_i64("GetEnd", script_args![]).await.unwrap_or(0);
                if start <= range_end && end >= range_start {
                    items.push(item_summary(&item, track_type, index).await);
                }
            }
        }
    }

    Ok(json!({
        "start_frame": range_start,
        "end_frame": range_end,
        "items": items,
        "count": items.len(),
    }))
}

async fn get_current_clip_thumbnail_image(ctx: Bridge, args: Value) -> Result<Value> {
    let width: Option<i64> = args::optional(&args, "width")?;
    let height: Option<i64> = args::optional(&args, "height")?;
    let timeline = ctx.current_timeline().await?;

    // 네이티브 호출은 base64 데이터와 크기 정보를 담은 dict를 돌려준다
    let thumbnail = match (width, height) {
        (Some(width), Some(height)) => {
            timeline
                .call_value("GetCurrentClipThumbnailImage", script_args![width, height])
                .await?
        }
        _ => {
            timeline
                .call_value("GetCurrentClipThumbnailImage", script_args![])
                .await?
        }
    };
    if thumbnail.is_null() {
        return Err(Error::ObjectNotFound(
            "No thumbnail available at the playhead position".to_string(),
        ));
    }
    Ok(json!({ "thumbnail": thumbnail }))
}

async fn create_fusion_clip(ctx: Bridge, args: Value) -> Result<Value> {
    let item_ids: Vec<String> = args::required(&args, "timeline_items")?;
    let clip_info: Option<Value> = args::optional(&args, "clip_info")?;
    let timeline = ctx.current_timeline().await?;

    let items = resolve_item_ids(&ctx, &item_ids).await?;
    let fusion_clip = match clip_info {
        Some(info) => {
            timeline
                .call_opt_object(
                    "CreateFusionClip",
                    vec![ScriptValue::List(items), ScriptValue::from(info)],
                )
                .await?
        }
        None => {
            timeline
                .call_opt_object("CreateFusionClip", vec![ScriptValue::List(items)])
                .await?
        }
    };

    let fusion_clip = fusion_clip
        .ok_or_else(|| Error::Validation("Failed to create Fusion clip".to_string()))?;
    Ok(json!({
        "created": true,
        "name": fusion_clip.call_str("GetName", script_args![]).await.ok(),
        "item_count": item_ids.len(),
    }))
}

async fn import_into_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let import_options: Option<Value> = args::optional(&args, "import_options")?;
    let timeline = ctx.current_timeline().await?;

    let imported = match import_options {
        Some(options) => {
            timeline
                .call_bool(
                    "ImportIntoTimeline",
                    script_args![file_path.as_str(), options],
                )
                .await?
        }
        None => {
            timeline
                .call_bool("ImportIntoTimeline", script_args![&file_path])
                .await?
        }
    };
    if !imported {
        return Err(Error::Validation(format!(
            "Failed to import '{}' into timeline",
            file_path
        )));
    }
    Ok(json!({ "imported": true, "file_path": file_path }))
}

async fn set_start_timecode(ctx: Bridge, args: Value) -> Result<Value> {
    let timecode: String = args::required(&args, "timecode")?;
    let timeline = ctx.current_timeline().await?;

    let set = timeline
        .call_bool("SetStartTimecode", script_args![&timecode])
        .await?;
    Ok(json!({ "set": set, "timecode": timecode }))
}

async fn set_clips_linked(ctx: Bridge, args: Value) -> Result<Value> {
    let clip_ids: Vec<String> = args::required(&args, "clip_ids")?;
    let linked: bool = args::required(&args, "linked")?;
    let timeline = ctx.current_timeline().await?;

    let items = resolve_item_ids(&ctx, &clip_ids).await?;
    let set = timeline
        .call_bool(
            "SetClipsLinked",
            vec![ScriptValue::List(items), ScriptValue::from(linked)],
        )
        .await?;
    Ok(json!({ "set": set, "linked": linked, "clip_count": clip_ids.len() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use std::sync::Arc;

    /// project → 현재 타임라인이 있는 목
    fn timeline_transport() -> Arc<MockTransport> {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "GetCurrentProject", 2, "Project");
        transport.on_object(2, "GetCurrentTimeline", 3, "Timeline");
        transport
    }

    #[tokio::test]
    async fn test_add_track_validates_type() {
        let transport = timeline_transport();
        let bridge = Bridge::new(transport.clone());

        let err = add_track(bridge, json!({ "track_type": "still" })).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!transport.called("AddTrack"));
    }

    #[tokio::test]
    async fn test_delete_track_rejects_out_of_range_index() {
        let transport = timeline_transport();
        transport.on(3, "GetTrackCount", ScriptValue::Int(2));
        let bridge = Bridge::new(transport.clone());

        let err = delete_track(bridge, json!({ "track_type": "video", "track_index": 3 }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid track index"));
        assert!(!transport.called("DeleteTrack"));
    }

    #[tokio::test]
    async fn test_export_timeline_validates_subtype() {
        let bridge = Bridge::new(MockTransport::new());
        let err = export_timeline(
            bridge,
            json!({ "file_path": "/tmp/cut.aaf", "export_type": "AAF", "export_subtype": "BOTH" }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("'NEW' or 'EXISTING'"));
    }

    #[tokio::test]
    async fn test_get_timeline_details() {
        let transport = timeline_transport();
        transport.on(3, "GetName", ScriptValue::from("Reel 1"));
        transport.on(3, "GetStartFrame", ScriptValue::Int(1000));
        transport.on(3, "GetEndFrame", ScriptValue::Int(1499));
        transport.on(3, "GetTrackCount", ScriptValue::Int(2));
        transport.on(3, "GetCurrentTimecode", ScriptValue::from("01:00:00:00"));
        let bridge = Bridge::new(transport);

        let details = get_timeline_details(bridge, json!({})).await.unwrap();
        assert_eq!(details["name"], "Reel 1");
        assert_eq!(details["duration_frames"], 500);
        assert_eq!(details["track_count"]["video"], 2);
    }

    #[tokio::test]
    async fn test_grab_all_stills_validates_source() {
        let bridge = Bridge::new(MockTransport::new());
        let err = grab_all_stills(bridge, json!({ "still_frame_source": 3 }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
