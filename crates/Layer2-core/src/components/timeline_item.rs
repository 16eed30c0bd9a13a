//! TimelineItem component - 타임라인 아이템 도구
//!
//! timeline_item_id 조회 후 해당 객체에 포워딩. 속성, 오프셋, Fusion 컴포지션,
//! 테이크, 이펙트 질의를 다룬다.

use crate::api::{Bridge, Remote};
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_timeline_item",
            "Retrieve a timeline item by its ID",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item"),
        wrap(get_timeline_item),
    );
    reg.register(
        ToolSpec::new("set_property", "Set a property on a timeline item", Component::TimelineItem)
            .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
            .required("property_key", ParamKind::String, "Name of the property to set")
            .required("property_value", ParamKind::String, "New value for the property"),
        wrap(set_property),
    );
    reg.register(
        ToolSpec::new(
            "get_property",
            "Get the value of a property from a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("property_key", ParamKind::String, "Name of the property to get"),
        wrap(get_property),
    );
    reg.register(
        ToolSpec::new(
            "set_start",
            "Set the start frame of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("frame_num", ParamKind::Integer, "Frame number for the new start position"),
        wrap(set_start),
    );
    reg.register(
        ToolSpec::new(
            "set_end",
            "Set the end frame of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("frame_num", ParamKind::Integer, "Frame number for the new end position"),
        wrap(set_end),
    );
    reg.register(
        ToolSpec::new(
            "set_left_offset",
            "Set the left offset of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("offset", ParamKind::Integer, "New left offset value in frames"),
        wrap(set_left_offset),
    );
    reg.register(
        ToolSpec::new(
            "set_right_offset",
            "Set the right offset of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("offset", ParamKind::Integer, "New right offset value in frames"),
        wrap(set_right_offset),
    );
    reg.register(
        ToolSpec::new(
            "add_fusion_comp",
            "Add a new Fusion composition to a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("comp_name", ParamKind::String, "Name for the new Fusion composition"),
        wrap(add_fusion_comp),
    );
    reg.register(
        ToolSpec::new(
            "rename_fusion_comp",
            "Rename a Fusion composition in a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "Unique ID of the timeline item")
        .required("old_name", ParamKind::String, "Current name of the Fusion composition")
        .required("new_name", ParamKind::String, "New name for the Fusion composition"),
        wrap(rename_fusion_comp),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_scale",
            "Gets the scale (playback speed) of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_scale),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_is_filler",
            "Checks if a timeline item is a filler item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_is_filler),
    );
    reg.register(
        ToolSpec::new(
            "has_video_effect",
            "Checks if a timeline item has a video effect",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(has_video_effect),
    );
    reg.register(
        ToolSpec::new(
            "has_audio_effect",
            "Checks if a timeline item has an audio effect",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(has_audio_effect),
    );
    reg.register(
        ToolSpec::new(
            "has_video_effect_at_offset",
            "Checks if a timeline item has a video effect at a specific offset",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("offset", ParamKind::Number, "Frame offset to check"),
        wrap(has_video_effect_at_offset),
    );
    reg.register(
        ToolSpec::new(
            "has_audio_effect_at_offset",
            "Checks if a timeline item has an audio effect at a specific offset",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("offset", ParamKind::Number, "Frame offset to check"),
        wrap(has_audio_effect_at_offset),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_flag_list",
            "Get flags assigned to a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_flag_list),
    );
    reg.register(
        ToolSpec::new(
            "add_timeline_item_take",
            "Add a media pool item as a new take to a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required(
            "media_pool_item_id",
            ParamKind::String,
            "ID of the media pool item to add as a take",
        )
        .optional("start_frame", ParamKind::Integer, "Optional start frame of the take")
        .optional("end_frame", ParamKind::Integer, "Optional end frame of the take"),
        wrap(add_take),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_selected_take_index",
            "Get the index of the currently selected take",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_selected_take_index),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_takes_count",
            "Get the number of takes in a take selector",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_takes_count),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_take_by_index",
            "Get information about a take by its index",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("take_index", ParamKind::Integer, "Index of the take (1-based)"),
        wrap(get_take_by_index),
    );
    reg.register(
        ToolSpec::new(
            "delete_timeline_item_take_by_index",
            "Delete a take by its index",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("take_index", ParamKind::Integer, "Index of the take (1-based)"),
        wrap(delete_take_by_index),
    );
    reg.register(
        ToolSpec::new(
            "select_timeline_item_take_by_index",
            "Select a take by its index",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("take_index", ParamKind::Integer, "Index of the take (1-based)"),
        wrap(select_take_by_index),
    );
    reg.register(
        ToolSpec::new(
            "finalize_timeline_item_take",
            "Finalize take selection for a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(finalize_take),
    );
    reg.register(
        ToolSpec::new(
            "set_timeline_item_enabled",
            "Enable or disable a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item")
        .required("enabled", ParamKind::Boolean, "True to enable, False to disable"),
        wrap(set_clip_enabled),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_enabled",
            "Get the enabled status of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_clip_enabled),
    );
    reg.register(
        ToolSpec::new(
            "update_timeline_item_sidecar",
            "Update sidecar file for BRAW clips or RMD file for R3D clips",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(update_sidecar),
    );
    reg.register(
        ToolSpec::new(
            "get_timeline_item_unique_id",
            "Get the unique ID of a timeline item",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the timeline item"),
        wrap(get_unique_id),
    );
    reg.register(
        ToolSpec::new(
            "copy_timeline_item_grades",
            "Copy grades from one timeline item to others",
            Component::TimelineItem,
        )
        .required("timeline_item_id", ParamKind::String, "ID of the source timeline item")
        .required(
            "target_timeline_items",
            ParamKind::Array,
            "List of target timeline item IDs",
        ),
        wrap(copy_grades),
    );
}

/// timeline_item_id 추출 + 객체 조회
async fn item(ctx: &Bridge, args: &Value) -> Result<(String, Remote)> {
    let item_id: String = args::required(args, "timeline_item_id")?;
    let item = ctx.find_timeline_item(&item_id).await?;
    Ok((item_id, item))
}

async fn get_timeline_item(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;

    Ok(json!({
        "id": item_id,
        "name": item.call_str("GetName", script_args![]).await.ok(),
        "start_frame": item.call_i64("GetStart", script_args![]).await.ok(),
        "end_frame": item.call_i64("GetEnd", script_args![]).await.ok(),
        "duration": item.call_i64("GetDuration", script_args![]).await.ok(),
        "left_offset": item.call_i64("GetLeftOffset", script_args![]).await.ok(),
        "right_offset": item.call_i64("GetRightOffset", script_args![]).await.ok(),
        "enabled": item.invoke("GetClipEnabled", script_args![]).await.ok().map(|v| v.is_truthy()),
    }))
}

/// 속성 값은 타입을 그대로 통과시킨다 (문자열/숫자 모두 유효)
async fn set_property(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let property_key: String = args::required(&args, "property_key")?;
    let property_value: Value = args::required(&args, "property_value")?;

    let set = item
        .call_bool(
            "SetProperty",
            script_args![property_key.as_str(), property_value],
        )
        .await?;
    Ok(json!({ "set": set, "timeline_item_id": item_id, "property_key": property_key }))
}

async fn get_property(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let property_key: String = args::required(&args, "property_key")?;

    let value = item
        .call_value("GetProperty", script_args![&property_key])
        .await?;
    Ok(json!({ "timeline_item_id": item_id, "property_key": property_key, "value": value }))
}

async fn set_start(ctx: Bridge, args: Value) -> Result<Value> {
    set_frame_member(ctx, args, "SetStart").await
}

async fn set_end(ctx: Bridge, args: Value) -> Result<Value> {
    set_frame_member(ctx, args, "SetEnd").await
}

async fn set_frame_member(ctx: Bridge, args: Value, member: &str) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let frame_num: i64 = args::required(&args, "frame_num")?;

    let set = item.call_bool(member, script_args![frame_num]).await?;
    Ok(json!({ "set": set, "timeline_item_id": item_id, "frame_num": frame_num }))
}

async fn set_left_offset(ctx: Bridge, args: Value) -> Result<Value> {
    set_offset_member(ctx, args, "SetLeftOffset").await
}

async fn set_right_offset(ctx: Bridge, args: Value) -> Result<Value> {
    set_offset_member(ctx, args, "SetRightOffset").await
}

async fn set_offset_member(ctx: Bridge, args: Value, member: &str) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let offset: i64 = args::required(&args, "offset")?;

    let set = item.call_bool(member, script_args![offset]).await?;
    Ok(json!({ "set": set, "timeline_item_id": item_id, "offset": offset }))
}

async fn add_fusion_comp(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let comp_name: String = args::required(&args, "comp_name")?;

    let comp = item.invoke("AddFusionComp", script_args![]).await?;
    if !comp.is_truthy() {
        return Err(Error::Validation("Failed to add Fusion composition".to_string()));
    }

    // 생성된 컴포지션은 기본 이름을 받는다; 요청 이름으로 변경
    let current_names = item
        .call_value("GetFusionCompNameList", script_args![])
        .await?;
    let default_name = current_names
        .as_array()
        .and_then(|names| names.last())
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(default_name) = default_name {
        if default_name != comp_name {
            item.call_bool(
                "RenameFusionCompByName",
                script_args![default_name.as_str(), comp_name.as_str()],
            )
            .await?;
        }
    }

    Ok(json!({ "added": true, "timeline_item_id": item_id, "comp_name": comp_name }))
}

async fn rename_fusion_comp(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let old_name: String = args::required(&args, "old_name")?;
    let new_name: String = args::required(&args, "new_name")?;

    let renamed = item
        .call_bool(
            "RenameFusionCompByName",
            script_args![&old_name, &new_name],
        )
        .await?;
    Ok(json!({ "renamed": renamed, "timeline_item_id": item_id, "old_name": old_name, "new_name": new_name }))
}

async fn get_scale(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let scale = item.call_value("GetScale", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "scale": scale }))
}

async fn get_is_filler(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let is_filler = item.call_bool("GetIsFiller", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "is_filler": is_filler }))
}

async fn has_video_effect(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let has_effect = item.call_bool("HasVideoEffect", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "has_video_effect": has_effect }))
}

async fn has_audio_effect(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let has_effect = item.call_bool("HasAudioEffect", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "has_audio_effect": has_effect }))
}

async fn has_video_effect_at_offset(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let offset: f64 = args::required(&args, "offset")?;

    let has_effect = item
        .call_bool("HasVideoEffectAtOffset", script_args![offset])
        .await?;
    Ok(json!({ "timeline_item_id": item_id, "offset": offset, "has_video_effect": has_effect }))
}

async fn has_audio_effect_at_offset(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let offset: f64 = args::required(&args, "offset")?;

    let has_effect = item
        .call_bool("HasAudioEffectAtOffset", script_args![offset])
        .await?;
    Ok(json!({ "timeline_item_id": item_id, "offset": offset, "has_audio_effect": has_effect }))
}

async fn get_flag_list(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let flags = item.call_value("GetFlagList", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "flags": flags }))
}

async fn add_take(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let media_pool_item_id: String = args::required(&args, "media_pool_item_id")?;
    let start_frame: Option<i64> = args::optional(&args, "start_frame")?;
    let end_frame: Option<i64> = args::optional(&args, "end_frame")?;

    let clip = ctx.find_media_pool_item(&media_pool_item_id).await?;

    let added = match (start_frame, end_frame) {
        (Some(start), Some(end)) => {
            item.call_bool("AddTake", script_args![&clip, start, end]).await?
        }
        _ => item.call_bool("AddTake", script_args![&clip]).await?,
    };
    Ok(json!({ "added": added, "timeline_item_id": item_id, "media_pool_item_id": media_pool_item_id }))
}

async fn get_selected_take_index(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let index = item.call_i64("GetSelectedTakeIndex", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "selected_take_index": index }))
}

async fn get_takes_count(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let count = item.call_i64("GetTakesCount", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "takes_count": count }))
}

async fn get_take_by_index(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let take_index: i64 = args::required(&args, "take_index")?;

    let take = item
        .call_value("GetTakeByIndex", script_args![take_index])
        .await?;
    Ok(json!({ "timeline_item_id": item_id, "take_index": take_index, "take": take }))
}

async fn delete_take_by_index(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let take_index: i64 = args::required(&args, "take_index")?;

    let deleted = item
        .call_bool("DeleteTakeByIndex", script_args![take_index])
        .await?;
    Ok(json!({ "deleted": deleted, "timeline_item_id": item_id, "take_index": take_index }))
}

async fn select_take_by_index(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let take_index: i64 = args::required(&args, "take_index")?;

    let selected = item
        .call_bool("SelectTakeByIndex", script_args![take_index])
        .await?;
    Ok(json!({ "selected": selected, "timeline_item_id": item_id, "take_index": take_index }))
}

async fn finalize_take(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let finalized = item.call_bool("FinalizeTake", script_args![]).await?;
    Ok(json!({ "finalized": finalized, "timeline_item_id": item_id }))
}

async fn set_clip_enabled(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let enabled: bool = args::required(&args, "enabled")?;

    let set = item.call_bool("SetClipEnabled", script_args![enabled]).await?;
    Ok(json!({ "set": set, "timeline_item_id": item_id, "enabled": enabled }))
}

async fn get_clip_enabled(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let enabled = item.call_bool("GetClipEnabled", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "enabled": enabled }))
}

async fn update_sidecar(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let updated = item.call_bool("UpdateSidecar", script_args![]).await?;
    Ok(json!({ "updated": updated, "timeline_item_id": item_id }))
}

async fn get_unique_id(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let unique_id = item.call_str("GetUniqueId", script_args![]).await?;
    Ok(json!({ "timeline_item_id": item_id, "unique_id": unique_id }))
}

async fn copy_grades(ctx: Bridge, args: Value) -> Result<Value> {
    let (item_id, item) = item(&ctx, &args).await?;
    let target_ids: Vec<String> = args::required(&args, "target_timeline_items")?;

    let mut targets = Vec::with_capacity(target_ids.len());
    for target_id in &target_ids {
        let target = ctx.find_timeline_item(target_id).await?;
        targets.push(ScriptValue::from(&target));
    }

    let copied = item
        .call_bool("CopyGrades", vec![ScriptValue::List(targets)])
        .await?;
    Ok(json!({ "copied": copied, "source": item_id, "target_count": target_ids.len() }))
}
