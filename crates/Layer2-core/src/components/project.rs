//! Project component - 현재 프로젝트 도구
//!
//! 프로젝트 정보/설정, 타임라인 목록, 렌더 큐 전체 표면, 컬러 그룹,
//! Fairlight 오디오 삽입까지 Project 객체의 1:1 포워딩.

use crate::api::Bridge;
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

/// get_project_settings가 조회하는 공통 설정 키
const COMMON_SETTINGS: [&str; 8] = [
    "timelineFrameRate",
    "timelineResolutionWidth",
    "timelineResolutionHeight",
    "timelineOutputResolutionWidth",
    "timelineOutputResolutionHeight",
    "videoMonitorFormat",
    "colorScienceMode",
    "timelinePlaybackFrameRate",
];

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_project_info",
            "Get information about the current project",
            Component::Project,
        ),
        wrap(get_project_info),
    );
    reg.register(
        ToolSpec::new(
            "get_project_settings",
            "Get all settings for the current project",
            Component::Project,
        ),
        wrap(get_project_settings),
    );
    reg.register(
        ToolSpec::new(
            "get_all_timelines",
            "Get a list of all timelines in the current project",
            Component::Project,
        ),
        wrap(get_all_timelines),
    );
    reg.register(
        ToolSpec::new(
            "get_media_pool",
            "Get the media pool for the current project",
            Component::Project,
        ),
        wrap(get_media_pool),
    );
    reg.register(
        ToolSpec::new(
            "set_current_timeline",
            "Set a timeline as the current timeline",
            Component::Project,
        )
        .required(
            "timeline_name",
            ParamKind::String,
            "Name of the timeline to set as current",
        ),
        wrap(set_current_timeline),
    );
    reg.register(
        ToolSpec::new(
            "get_gallery",
            "Get the gallery for the current project",
            Component::Project,
        ),
        wrap(get_gallery),
    );
    reg.register(
        ToolSpec::new(
            "set_project_name",
            "Set the name of the current project",
            Component::Project,
        )
        .required("project_name", ParamKind::String, "New name for the project"),
        wrap(set_project_name),
    );
    reg.register(
        ToolSpec::new(
            "save_project_as",
            "Save the current project with a new name",
            Component::Project,
        )
        .required("project_name", ParamKind::String, "New name to save the project as"),
        wrap(save_project_as),
    );
    reg.register(
        ToolSpec::new(
            "get_preset_list",
            "Get the list of available presets for the current project",
            Component::Project,
        ),
        wrap(get_preset_list),
    );
    reg.register(
        ToolSpec::new("set_preset", "Apply a preset to the current project", Component::Project)
            .required("preset_name", ParamKind::String, "Name of the preset to apply"),
        wrap(set_preset),
    );
    reg.register(
        ToolSpec::new(
            "add_render_job",
            "Add a render job to the render queue",
            Component::Project,
        ),
        wrap(add_render_job),
    );
    reg.register(
        ToolSpec::new(
            "delete_render_job",
            "Delete a render job from the render queue",
            Component::Project,
        )
        .required("job_id", ParamKind::String, "ID of the render job to delete"),
        wrap(delete_render_job),
    );
    reg.register(
        ToolSpec::new(
            "delete_all_render_jobs",
            "Delete all render jobs from the render queue",
            Component::Project,
        ),
        wrap(delete_all_render_jobs),
    );
    reg.register(
        ToolSpec::new(
            "get_render_job_list",
            "Get list of render jobs in the render queue",
            Component::Project,
        ),
        wrap(get_render_job_list),
    );
    reg.register(
        ToolSpec::new(
            "get_render_preset_list",
            "Get list of available render presets",
            Component::Project,
        ),
        wrap(get_render_preset_list),
    );
    reg.register(
        ToolSpec::new(
            "start_rendering",
            "Start rendering specified jobs or all jobs",
            Component::Project,
        )
        .optional("job_ids", ParamKind::Array, "List of job IDs to render (optional)")
        .optional(
            "is_interactive_mode",
            ParamKind::Boolean,
            "Enable error feedback in UI during rendering",
        ),
        wrap(start_rendering),
    );
    reg.register(
        ToolSpec::new(
            "stop_rendering",
            "Stop any current rendering processes",
            Component::Project,
        ),
        wrap(stop_rendering),
    );
    reg.register(
        ToolSpec::new(
            "is_rendering_in_progress",
            "Check if rendering is currently in progress",
            Component::Project,
        ),
        wrap(is_rendering_in_progress),
    );
    reg.register(
        ToolSpec::new(
            "load_render_preset",
            "Load a render preset as the current render preset",
            Component::Project,
        )
        .required("preset_name", ParamKind::String, "Name of the render preset to load"),
        wrap(load_render_preset),
    );
    reg.register(
        ToolSpec::new(
            "save_as_new_render_preset",
            "Save current render settings as a new render preset",
            Component::Project,
        )
        .required("preset_name", ParamKind::String, "Name for the new render preset"),
        wrap(save_as_new_render_preset),
    );
    reg.register(
        ToolSpec::new(
            "delete_render_preset",
            "Delete a render preset",
            Component::Project,
        )
        .required("preset_name", ParamKind::String, "Name of the render preset to delete"),
        wrap(delete_render_preset),
    );
    reg.register(
        ToolSpec::new(
            "set_render_settings",
            "Set render settings for the current project",
            Component::Project,
        )
        .required("settings", ParamKind::Object, "Dictionary of render settings to apply"),
        wrap(set_render_settings),
    );
    reg.register(
        ToolSpec::new(
            "get_render_job_status",
            "Get the status of a render job",
            Component::Project,
        )
        .required("job_id", ParamKind::String, "ID of the render job to check"),
        wrap(get_render_job_status),
    );
    reg.register(
        ToolSpec::new(
            "get_quick_export_render_presets",
            "Get list of available quick export render presets",
            Component::Project,
        ),
        wrap(get_quick_export_render_presets),
    );
    reg.register(
        ToolSpec::new(
            "render_with_quick_export",
            "Render current timeline using quick export with specified preset",
            Component::Project,
        )
        .required("preset_name", ParamKind::String, "Name of the quick export preset to use")
        .optional(
            "params",
            ParamKind::Object,
            "Parameters for the quick export (TargetDir, CustomName, VideoQuality, EnableUpload)",
        ),
        wrap(render_with_quick_export),
    );
    reg.register(
        ToolSpec::new(
            "get_render_formats",
            "Get list of available render formats",
            Component::Project,
        ),
        wrap(get_render_formats),
    );
    reg.register(
        ToolSpec::new(
            "get_render_codecs",
            "Get list of available render codecs for the specified format",
            Component::Project,
        )
        .required("render_format", ParamKind::String, "Render format to get codecs for"),
        wrap(get_render_codecs),
    );
    reg.register(
        ToolSpec::new(
            "get_current_render_format_and_codec",
            "Get currently selected render format and codec",
            Component::Project,
        ),
        wrap(get_current_render_format_and_codec),
    );
    reg.register(
        ToolSpec::new(
            "set_current_render_format_and_codec",
            "Set render format and codec",
            Component::Project,
        )
        .required("format_name", ParamKind::String, "Name of the render format")
        .required("codec_name", ParamKind::String, "Name of the render codec"),
        wrap(set_current_render_format_and_codec),
    );
    reg.register(
        ToolSpec::new(
            "get_current_render_mode",
            "Get current render mode (0 for Individual clips, 1 for Single clip)",
            Component::Project,
        ),
        wrap(get_current_render_mode),
    );
    reg.register(
        ToolSpec::new(
            "set_current_render_mode",
            "Set render mode (0 for Individual clips, 1 for Single clip)",
            Component::Project,
        )
        .required(
            "render_mode",
            ParamKind::Integer,
            "Render mode (0 for Individual clips, 1 for Single clip)",
        ),
        wrap(set_current_render_mode),
    );
    reg.register(
        ToolSpec::new(
            "get_render_resolutions",
            "Get available render resolutions for the specified format and codec",
            Component::Project,
        )
        .optional("format_name", ParamKind::String, "Render format (optional)")
        .optional("codec_name", ParamKind::String, "Render codec (optional)"),
        wrap(get_render_resolutions),
    );
    reg.register(
        ToolSpec::new("refresh_lut_list", "Refresh the LUT list", Component::Project),
        wrap(refresh_lut_list),
    );
    reg.register(
        ToolSpec::new(
            "insert_audio_to_current_track_at_playhead",
            "Insert audio file to current track at playhead on Fairlight page",
            Component::Project,
        )
        .required("media_path", ParamKind::String, "Path to the audio file")
        .required(
            "start_offset_in_samples",
            ParamKind::Integer,
            "Start offset in samples",
        )
        .required("duration_in_samples", ParamKind::Integer, "Duration in samples"),
        wrap(insert_audio_to_current_track_at_playhead),
    );
    reg.register(
        ToolSpec::new(
            "load_burn_in_preset",
            "Load burn-in preset for the project",
            Component::Project,
        )
        .required("preset_name", ParamKind::String, "Name of the burn-in preset to load"),
        wrap(load_burn_in_preset),
    );
    reg.register(
        ToolSpec::new(
            "export_current_frame_as_still",
            "Export current frame as still image",
            Component::Project,
        )
        .required("file_path", ParamKind::String, "Path to save the still image"),
        wrap(export_current_frame_as_still),
    );
    reg.register(
        ToolSpec::new(
            "get_color_groups_list",
            "Get list of color groups in the project",
            Component::Project,
        ),
        wrap(get_color_groups_list),
    );
    reg.register(
        ToolSpec::new(
            "add_color_group",
            "Add a new color group to the project",
            Component::Project,
        )
        .required("group_name", ParamKind::String, "Name for the new color group"),
        wrap(add_color_group),
    );
    reg.register(
        ToolSpec::new(
            "delete_color_group",
            "Delete a color group by name",
            Component::Project,
        )
        .required("group_name", ParamKind::String, "Name of the color group to delete"),
        wrap(delete_color_group),
    );
    reg.register(
        ToolSpec::new("set_setting", "Set a project setting value", Component::Project)
            .required("setting_name", ParamKind::String, "Name of the setting to change")
            .required("setting_value", ParamKind::String, "New value for the setting"),
        wrap(set_setting),
    );
}

/// 이름, 타임라인 수, 현재 타임라인, 해상도/프레임레이트 요약
async fn get_project_info(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;

    let name = project.call_str("GetName", script_args![]).await?;
    let timeline_count = project.call_i64("GetTimelineCount", script_args![]).await?;
    let current_timeline = match project
        .call_opt_object("GetCurrentTimeline", script_args![])
        .await?
    {
        Some(timeline) => json!(timeline.call_str("GetName", script_args![]).await.ok()),
        None => Value::Null,
    };

    Ok(json!({
        "name": name,
        "timeline_count": timeline_count,
        "current_timeline": current_timeline,
        "fps": project.call_value("GetSetting", script_args!["timelineFrameRate"]).await?,
        "width": project.call_value("GetSetting", script_args!["timelineResolutionWidth"]).await?,
        "height": project.call_value("GetSetting", script_args!["timelineResolutionHeight"]).await?,
    }))
}

async fn get_project_settings(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;

    let mut settings = serde_json::Map::new();
    for setting in COMMON_SETTINGS {
        let value = project.call_value("GetSetting", script_args![setting]).await?;
        settings.insert(setting.to_string(), value);
    }
    Ok(Value::Object(settings))
}

async fn get_all_timelines(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let count = project.call_i64("GetTimelineCount", script_args![]).await?;

    let current_uid = match project
        .call_opt_object("GetCurrentTimeline", script_args![])
        .await?
    {
        Some(current) => current.call_str("GetUniqueId", script_args![]).await.ok(),
        None => None,
    };

    let mut timelines = Vec::new();
    for index in 1..=count {
        let timeline = match project
            .call_opt_object("GetTimelineByIndex", script_args![index])
            .await?
        {
            Some(timeline) => timeline,
            None => continue,
        };
        let name = timeline.call_str("GetName", script_args![]).await?;
        let uid = timeline.call_str("GetUniqueId", script_args![]).await.ok();
        timelines.push(json!({
            "name": name,
            "index": index,
            "is_current": uid.is_some() && uid == current_uid,
        }));
    }

    Ok(json!({ "count": count, "timelines": timelines }))
}

async fn get_media_pool(ctx: Bridge, _args: Value) -> Result<Value> {
    let media_pool = ctx.media_pool().await?;
    Ok(media_pool.to_json())
}

async fn set_current_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let timeline_name: String = args::required(&args, "timeline_name")?;
    let project = ctx.current_project().await?;
    let timeline = ctx.find_timeline_by_name(&timeline_name).await?;

    let set = project
        .call_bool("SetCurrentTimeline", script_args![&timeline])
        .await?;
    if !set {
        return Err(Error::Validation(format!(
            "Failed to set current timeline to '{}'",
            timeline_name
        )));
    }
    Ok(json!({ "set": true, "timeline_name": timeline_name }))
}

async fn get_gallery(ctx: Bridge, _args: Value) -> Result<Value> {
    let gallery = ctx.gallery().await?;
    Ok(gallery.to_json())
}

async fn set_project_name(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let project = ctx.current_project().await?;

    let renamed = project.call_bool("SetName", script_args![&project_name]).await?;
    Ok(json!({ "renamed": renamed, "project_name": project_name }))
}

async fn save_project_as(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let saved = manager
        .call_bool("SaveProjectAs", script_args![&project_name])
        .await?;
    Ok(json!({ "saved": saved, "project_name": project_name }))
}

async fn get_preset_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let presets = project.call_value("GetPresetList", script_args![]).await?;
    Ok(json!({ "presets": presets }))
}

async fn set_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let project = ctx.current_project().await?;

    let applied = project.call_bool("SetPreset", script_args![&preset_name]).await?;
    Ok(json!({ "applied": applied, "preset_name": preset_name }))
}

// ============================================================================
// Render queue
// ============================================================================

async fn add_render_job(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let job_id = project.call_str("AddRenderJob", script_args![]).await?;
    Ok(json!({ "job_id": job_id }))
}

async fn delete_render_job(ctx: Bridge, args: Value) -> Result<Value> {
    let job_id: String = args::required(&args, "job_id")?;
    let project = ctx.current_project().await?;

    let deleted = project.call_bool("DeleteRenderJob", script_args![&job_id]).await?;
    Ok(json!({ "deleted": deleted, "job_id": job_id }))
}

async fn delete_all_render_jobs(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let deleted = project.call_bool("DeleteAllRenderJobs", script_args![]).await?;
    Ok(json!({ "deleted": deleted }))
}

async fn get_render_job_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let jobs = project.call_value("GetRenderJobList", script_args![]).await?;
    let count = jobs.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "jobs": jobs, "count": count }))
}

async fn get_render_preset_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let presets = project.call_value("GetRenderPresetList", script_args![]).await?;
    Ok(json!({ "presets": presets }))
}

async fn start_rendering(ctx: Bridge, args: Value) -> Result<Value> {
    let job_ids: Vec<String> = args::optional(&args, "job_ids")?.unwrap_or_default();
    let is_interactive = args::optional_or(&args, "is_interactive_mode", false)?;
    let project = ctx.current_project().await?;

    // 빈 목록은 큐 전체 렌더링
    let started = project
        .call_bool(
            "StartRendering",
            vec![
                ScriptValue::from(job_ids.clone()),
                ScriptValue::from(is_interactive),
            ],
        )
        .await?;
    Ok(json!({ "started": started, "job_ids": job_ids }))
}

async fn stop_rendering(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    project.invoke("StopRendering", script_args![]).await?;
    Ok(json!({ "stopped": true }))
}

async fn is_rendering_in_progress(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let rendering = project
        .call_bool("IsRenderingInProgress", script_args![])
        .await?;
    Ok(json!({ "rendering": rendering }))
}

async fn load_render_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let project = ctx.current_project().await?;

    let loaded = project
        .call_bool("LoadRenderPreset", script_args![&preset_name])
        .await?;
    Ok(json!({ "loaded": loaded, "preset_name": preset_name }))
}

async fn save_as_new_render_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let project = ctx.current_project().await?;

    let saved = project
        .call_bool("SaveAsNewRenderPreset", script_args![&preset_name])
        .await?;
    Ok(json!({ "saved": saved, "preset_name": preset_name }))
}

async fn delete_render_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let project = ctx.current_project().await?;

    let deleted = project
        .call_bool("DeleteRenderPreset", script_args![&preset_name])
        .await?;
    Ok(json!({ "deleted": deleted, "preset_name": preset_name }))
}

async fn set_render_settings(ctx: Bridge, args: Value) -> Result<Value> {
    let settings: Value = args::required(&args, "settings")?;
    if !settings.is_object() {
        return Err(Error::invalid_param("settings", "expected object"));
    }
    let project = ctx.current_project().await?;

    let set = project
        .call_bool("SetRenderSettings", script_args![settings])
        .await?;
    Ok(json!({ "set": set }))
}

async fn get_render_job_status(ctx: Bridge, args: Value) -> Result<Value> {
    let job_id: String = args::required(&args, "job_id")?;
    let project = ctx.current_project().await?;

    let status = project
        .call_value("GetRenderJobStatus", script_args![&job_id])
        .await?;
    Ok(json!({ "job_id": job_id, "status": status }))
}

async fn get_quick_export_render_presets(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let presets = project
        .call_value("GetQuickExportRenderPresets", script_args![])
        .await?;
    Ok(json!({ "presets": presets }))
}

async fn render_with_quick_export(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let params: Value = args::optional(&args, "params")?.unwrap_or_else(|| json!({}));
    let project = ctx.current_project().await?;

    let result = project
        .call_value(
            "RenderWithQuickExport",
            script_args![preset_name.as_str(), params],
        )
        .await?;
    Ok(json!({ "preset_name": preset_name, "result": result }))
}

async fn get_render_formats(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let formats = project.call_value("GetRenderFormats", script_args![]).await?;
    Ok(json!({ "formats": formats }))
}

async fn get_render_codecs(ctx: Bridge, args: Value) -> Result<Value> {
    let render_format: String = args::required(&args, "render_format")?;
    let project = ctx.current_project().await?;

    let codecs = project
        .call_value("GetRenderCodecs", script_args![&render_format])
        .await?;
    Ok(json!({ "render_format": render_format, "codecs": codecs }))
}

async fn get_current_render_format_and_codec(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let format_codec = project
        .call_value("GetCurrentRenderFormatAndCodec", script_args![])
        .await?;
    Ok(format_codec)
}

async fn set_current_render_format_and_codec(ctx: Bridge, args: Value) -> Result<Value> {
    let format_name: String = args::required(&args, "format_name")?;
    let codec_name: String = args::required(&args, "codec_name")?;
    let project = ctx.current_project().await?;

    let set = project
        .call_bool(
            "SetCurrentRenderFormatAndCodec",
            script_args![&format_name, &codec_name],
        )
        .await?;
    Ok(json!({ "set": set, "format_name": format_name, "codec_name": codec_name }))
}

async fn get_current_render_mode(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let mode = project.call_i64("GetCurrentRenderMode", script_args![]).await?;
    Ok(json!({
        "render_mode": mode,
        "description": if mode == 0 { "Individual clips" } else { "Single clip" },
    }))
}

async fn set_current_render_mode(ctx: Bridge, args: Value) -> Result<Value> {
    let render_mode: i64 = args::required(&args, "render_mode")?;
    if render_mode != 0 && render_mode != 1 {
        return Err(Error::Validation(format!(
            "Invalid render mode: {}. Must be 0 (Individual clips) or 1 (Single clip)",
            render_mode
        )));
    }
    let project = ctx.current_project().await?;

    let set = project
        .call_bool("SetCurrentRenderMode", script_args![render_mode])
        .await?;
    Ok(json!({ "set": set, "render_mode": render_mode }))
}

async fn get_render_resolutions(ctx: Bridge, args: Value) -> Result<Value> {
    let format_name: Option<String> = args::optional(&args, "format_name")?;
    let codec_name: Option<String> = args::optional(&args, "codec_name")?;
    let project = ctx.current_project().await?;

    let resolutions = match (&format_name, &codec_name) {
        (Some(format), Some(codec)) => {
            project
                .call_value("GetRenderResolutions", script_args![format, codec])
                .await?
        }
        _ => {
            project
                .call_value("GetRenderResolutions", script_args![])
                .await?
        }
    };
    Ok(json!({ "resolutions": resolutions }))
}

async fn refresh_lut_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let refreshed = project.call_bool("RefreshLUTList", script_args![]).await?;
    Ok(json!({ "refreshed": refreshed }))
}

async fn insert_audio_to_current_track_at_playhead(ctx: Bridge, args: Value) -> Result<Value> {
    let media_path: String = args::required(&args, "media_path")?;
    let start_offset: i64 = args::required(&args, "start_offset_in_samples")?;
    let duration: i64 = args::required(&args, "duration_in_samples")?;
    let project = ctx.current_project().await?;

    let inserted = project
        .call_bool(
            "InsertAudioToCurrentTrackAtPlayhead",
            script_args![&media_path, start_offset, duration],
        )
        .await?;
    Ok(json!({ "inserted": inserted, "media_path": media_path }))
}

async fn load_burn_in_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let preset_name: String = args::required(&args, "preset_name")?;
    let project = ctx.current_project().await?;

    let loaded = project
        .call_bool("LoadBurnInPreset", script_args![&preset_name])
        .await?;
    Ok(json!({ "loaded": loaded, "preset_name": preset_name }))
}

async fn export_current_frame_as_still(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let project = ctx.current_project().await?;

    let exported = project
        .call_bool("ExportCurrentFrameAsStill", script_args![&file_path])
        .await?;
    Ok(json!({ "exported": exported, "file_path": file_path }))
}

// ============================================================================
// Color groups
// ============================================================================

async fn get_color_groups_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let groups = project
        .call_objects("GetColorGroupsList", script_args![])
        .await?;

    let mut names = Vec::new();
    for group in &groups {
        names.push(json!(group.call_str("GetName", script_args![]).await.ok()));
    }
    Ok(json!({ "groups": names, "count": names.len() }))
}

async fn add_color_group(ctx: Bridge, args: Value) -> Result<Value> {
    let group_name: String = args::required(&args, "group_name")?;
    let project = ctx.current_project().await?;

    let group = project
        .call_opt_object("AddColorGroup", script_args![&group_name])
        .await?;
    if group.is_none() {
        return Err(Error::Validation(format!(
            "Failed to add color group '{}'",
            group_name
        )));
    }
    Ok(json!({ "added": true, "group_name": group_name }))
}

async fn delete_color_group(ctx: Bridge, args: Value) -> Result<Value> {
    let group_name: String = args::required(&args, "group_name")?;
    let project = ctx.current_project().await?;
    let group = ctx.find_color_group(&group_name).await?;

    let deleted = project
        .call_bool("DeleteColorGroup", script_args![&group])
        .await?;
    Ok(json!({ "deleted": deleted, "group_name": group_name }))
}

async fn set_setting(ctx: Bridge, args: Value) -> Result<Value> {
    let setting_name: String = args::required(&args, "setting_name")?;
    let setting_value: String = args::required(&args, "setting_value")?;
    let project = ctx.current_project().await?;

    let old_value = project
        .call_value("GetSetting", script_args![&setting_name])
        .await?;
    let set = project
        .call_bool("SetSetting", script_args![&setting_name, &setting_value])
        .await?;
    if !set {
        return Err(Error::Validation(format!(
            "Failed to set setting '{}'",
            setting_name
        )));
    }
    let new_value = project
        .call_value("GetSetting", script_args![&setting_name])
        .await?;

    Ok(json!({
        "setting_name": setting_name,
        "old_value": old_value,
        "new_value": new_value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    fn project_transport() -> std::sync::Arc<MockTransport> {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "GetCurrentProject", 2, "Project");
        transport
    }

    #[tokio::test]
    async fn test_get_project_info() {
        let transport = project_transport();
        transport.on(2, "GetName", ScriptValue::from("Doc Edit"));
        transport.on(2, "GetTimelineCount", ScriptValue::Int(2));
        transport.on_object(2, "GetCurrentTimeline", 3, "Timeline");
        transport.on(3, "GetName", ScriptValue::from("Reel 1"));
        transport.on(2, "GetSetting", ScriptValue::from("24"));
        let bridge = Bridge::new(transport);

        let info = get_project_info(bridge, json!({})).await.unwrap();
        assert_eq!(info["name"], "Doc Edit");
        assert_eq!(info["timeline_count"], 2);
        assert_eq!(info["current_timeline"], "Reel 1");
        assert_eq!(info["fps"], "24");
    }

    #[tokio::test]
    async fn test_no_project_open() {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on(1, "GetCurrentProject", ScriptValue::Null);
        let bridge = Bridge::new(transport);

        let err = get_project_info(bridge, json!({})).await.unwrap_err();
        assert!(err.to_string().contains("No project is currently open"));
    }

    #[tokio::test]
    async fn test_set_current_render_mode_validates_range() {
        let bridge = Bridge::new(MockTransport::new());
        let err = set_current_render_mode(bridge, json!({ "render_mode": 2 }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_project_settings_collects_common_keys() {
        let transport = project_transport();
        transport.on(2, "GetSetting", ScriptValue::from("value"));
        let bridge = Bridge::new(transport);

        let settings = get_project_settings(bridge, json!({})).await.unwrap();
        let map = settings.as_object().unwrap();
        assert_eq!(map.len(), COMMON_SETTINGS.len());
        assert_eq!(map["timelineFrameRate"], "value");
    }
}
