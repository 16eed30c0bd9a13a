//! ColorGroup component - 컬러 그룹 도구

use crate::api::{Bridge, Remote};
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_color_group_name",
            "Get the name of a color group",
            Component::ColorGroup,
        )
        .required("group_name", ParamKind::String, "Name of the color group"),
        wrap(get_name),
    );
    reg.register(
        ToolSpec::new(
            "set_color_group_name",
            "Set the name of a color group",
            Component::ColorGroup,
        )
        .required("group_name", ParamKind::String, "Name of the color group")
        .required("new_name", ParamKind::String, "New name for the color group"),
        wrap(set_name),
    );
    reg.register(
        ToolSpec::new(
            "get_color_group_clips_in_timeline",
            "Get the clips in the timeline that belong to a color group",
            Component::ColorGroup,
        )
        .required("group_name", ParamKind::String, "Name of the color group"),
        wrap(get_clips_in_timeline),
    );
    reg.register(
        ToolSpec::new(
            "get_color_group_pre_clip_node_graph",
            "Get the pre-clip node graph of a color group",
            Component::ColorGroup,
        )
        .required("group_name", ParamKind::String, "Name of the color group"),
        wrap(get_pre_clip_node_graph),
    );
    reg.register(
        ToolSpec::new(
            "get_color_group_post_clip_node_graph",
            "Get the post-clip node graph of a color group",
            Component::ColorGroup,
        )
        .required("group_name", ParamKind::String, "Name of the color group"),
        wrap(get_post_clip_node_graph),
    );
}

async fn group(ctx: &Bridge, args: &Value) -> Result<(String, Remote)> {
    let group_name: String = args::required(args, "group_name")?;
    let group = ctx.find_color_group(&group_name).await?;
    Ok((group_name, group))
}

async fn get_name(ctx: Bridge, args: Value) -> Result<Value> {
    let (_, group) = group(&ctx, &args).await?;
    let name = group.call_str("GetName", script_args![]).await?;
    Ok(json!({ "group_name": name }))
}

async fn set_name(ctx: Bridge, args: Value) -> Result<Value> {
    let (group_name, group) = group(&ctx, &args).await?;
    let new_name: String = args::required(&args, "new_name")?;

    let renamed = group.call_bool("SetName", script_args![&new_name]).await?;
    Ok(json!({ "renamed": renamed, "old_name": group_name, "new_name": new_name }))
}

async fn get_clips_in_timeline(ctx: Bridge, args: Value) -> Result<Value> {
    let (group_name, group) = group(&ctx, &args).await?;
    let clips = group
        .call_objects("GetClipsInTimeline", script_args![])
        .await?;

    let mut items = Vec::new();
    for clip in &clips {
        items.push(json!({
            "name": clip.call_str("GetName", script_args![]).await.ok(),
            "id": clip.call_str("GetUniqueId", script_args![]).await.ok(),
        }));
    }
    Ok(json!({ "group_name": group_name, "clips": items, "count": items.len() }))
}

async fn get_pre_clip_node_graph(ctx: Bridge, args: Value) -> Result<Value> {
    let (group_name, group) = group(&ctx, &args).await?;
    let graph = group
        .call_object("GetPreClipNodeGraph", script_args![])
        .await?;

    let num_nodes = graph.call_i64("GetNumNodes", script_args![]).await.ok();
    Ok(json!({ "group_name": group_name, "graph": graph.to_json(), "num_nodes": num_nodes }))
}

async fn get_post_clip_node_graph(ctx: Bridge, args: Value) -> Result<Value> {
    let (group_name, group) = group(&ctx, &args).await?;
    let graph = group
        .call_object("GetPostClipNodeGraph", script_args![])
        .await?;

    let num_nodes = graph.call_i64("GetNumNodes", script_args![]).await.ok();
    Ok(json!({ "group_name": group_name, "graph": graph.to_json(), "num_nodes": num_nodes }))
}
