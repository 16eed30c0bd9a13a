//! Graph component - 현재 노드 그래프 도구
//!
//! 현재 노드 그래프는 컬러 페이지의 현재 비디오 아이템에서 얻는다.

use crate::api::Bridge;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_num_nodes",
            "Get the number of nodes in the current node graph",
            Component::Graph,
        ),
        wrap(get_num_nodes),
    );
    reg.register(
        ToolSpec::new(
            "set_lut",
            "Set LUT for a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)")
        .required("lut_path", ParamKind::String, "Path to the LUT file"),
        wrap(set_lut),
    );
    reg.register(
        ToolSpec::new(
            "get_lut",
            "Get LUT information for a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)"),
        wrap(get_lut),
    );
    reg.register(
        ToolSpec::new(
            "set_node_cache_mode",
            "Set cache mode for a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)")
        .required("cache_mode", ParamKind::String, "Cache mode (auto, on, off)"),
        wrap(set_node_cache_mode),
    );
    reg.register(
        ToolSpec::new(
            "get_node_cache_mode",
            "Get cache mode for a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)"),
        wrap(get_node_cache_mode),
    );
    reg.register(
        ToolSpec::new(
            "get_node_label",
            "Get the label of a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)"),
        wrap(get_node_label),
    );
    reg.register(
        ToolSpec::new(
            "get_tools_in_node",
            "Get the list of tools in a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)"),
        wrap(get_tools_in_node),
    );
    reg.register(
        ToolSpec::new(
            "set_node_enabled",
            "Enable or disable a specific node in the current node graph",
            Component::Graph,
        )
        .required("node_index", ParamKind::Integer, "Index of the node (1-based)")
        .required("enabled", ParamKind::Boolean, "True to enable, False to disable"),
        wrap(set_node_enabled),
    );
    reg.register(
        ToolSpec::new(
            "apply_grade_from_drx",
            "Apply a grade from a DRX file to the current node graph",
            Component::Graph,
        )
        .required("drx_path", ParamKind::String, "Path to the DRX file")
        .optional("node_index", ParamKind::Integer, "Optional node index to apply the grade to")
        .optional("still_offset", ParamKind::Integer, "Optional still offset"),
        wrap(apply_grade_from_drx),
    );
    reg.register(
        ToolSpec::new(
            "apply_arri_cdl_lut",
            "Apply an ARRI CDL LUT to the current node graph",
            Component::Graph,
        )
        .required("cdl_path", ParamKind::String, "Path to the CDL file"),
        wrap(apply_arri_cdl_lut),
    );
    reg.register(
        ToolSpec::new(
            "reset_all_grades",
            "Reset all grades in the current node graph",
            Component::Graph,
        ),
        wrap(reset_all_grades),
    );
}

/// 노드 인덱스 검증 (1-based)
async fn checked_node_index(ctx: &Bridge, node_index: i64) -> Result<crate::api::Remote> {
    let graph = ctx.current_graph().await?;
    let num_nodes = graph.call_i64("GetNumNodes", script_args![]).await?;
    if node_index < 1 || node_index > num_nodes {
        return Err(Error::Validation(format!(
            "Invalid node index: {}. The graph has {} node(s)",
            node_index, num_nodes
        )));
    }
    Ok(graph)
}

async fn get_num_nodes(ctx: Bridge, _args: Value) -> Result<Value> {
    let graph = ctx.current_graph().await?;
    let num_nodes = graph.call_i64("GetNumNodes", script_args![]).await?;
    Ok(json!({ "num_nodes": num_nodes }))
}

async fn set_lut(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let lut_path: String = args::required(&args, "lut_path")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let set = graph
        .call_bool("SetLUT", script_args![node_index, &lut_path])
        .await?;
    Ok(json!({ "set": set, "node_index": node_index, "lut_path": lut_path }))
}

async fn get_lut(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let lut = graph.call_value("GetLUT", script_args![node_index]).await?;
    Ok(json!({ "node_index": node_index, "lut": lut }))
}

async fn set_node_cache_mode(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let cache_mode: String = args::required(&args, "cache_mode")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let set = graph
        .call_bool("SetNodeCacheMode", script_args![node_index, &cache_mode])
        .await?;
    Ok(json!({ "set": set, "node_index": node_index, "cache_mode": cache_mode }))
}

async fn get_node_cache_mode(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let cache_mode = graph
        .call_value("GetNodeCacheMode", script_args![node_index])
        .await?;
    Ok(json!({ "node_index": node_index, "cache_mode": cache_mode }))
}

async fn get_node_label(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let label = graph
        .call_value("GetNodeLabel", script_args![node_index])
        .await?;
    Ok(json!({ "node_index": node_index, "label": label }))
}

async fn get_tools_in_node(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let tools = graph
        .call_value("GetToolsInNode", script_args![node_index])
        .await?;
    Ok(json!({ "node_index": node_index, "tools": tools }))
}

async fn set_node_enabled(ctx: Bridge, args: Value) -> Result<Value> {
    let node_index: i64 = args::required(&args, "node_index")?;
    let enabled: bool = args::required(&args, "enabled")?;
    let graph = checked_node_index(&ctx, node_index).await?;

    let set = graph
        .call_bool("SetNodeEnabled", script_args![node_index, enabled])
        .await?;
    Ok(json!({ "set": set, "node_index": node_index, "enabled": enabled }))
}

async fn apply_grade_from_drx(ctx: Bridge, args: Value) -> Result<Value> {
    let drx_path: String = args::required(&args, "drx_path")?;
    let node_index: Option<i64> = args::optional(&args, "node_index")?;
    let still_offset: i64 = args::optional_or(&args, "still_offset", 0)?;
    let graph = ctx.current_graph().await?;

    let applied = match node_index {
        Some(index) => {
            graph
                .call_bool(
                    "ApplyGradeFromDRX",
                    script_args![drx_path.as_str(), index, still_offset],
                )
                .await?
        }
        None => {
            graph
                .call_bool(
                    "ApplyGradeFromDRX",
                    script_args![drx_path.as_str(), still_offset],
                )
                .await?
        }
    };
    Ok(json!({ "applied": applied, "drx_path": drx_path }))
}

async fn apply_arri_cdl_lut(ctx: Bridge, args: Value) -> Result<Value> {
    let cdl_path: String = args::required(&args, "cdl_path")?;
    let graph = ctx.current_graph().await?;

    let applied = graph
        .call_bool("ApplyArriCdlLut", script_args![&cdl_path])
        .await?;
    Ok(json!({ "applied": applied, "cdl_path": cdl_path }))
}

async fn reset_all_grades(ctx: Bridge, _args: Value) -> Result<Value> {
    let graph = ctx.current_graph().await?;
    let reset = graph.call_bool("ResetAllGrades", script_args![]).await?;
    Ok(json!({ "reset": reset }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ScriptValue;
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_node_index_validation() {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "GetCurrentProject", 2, "Project");
        transport.on_object(2, "GetCurrentTimeline", 3, "Timeline");
        transport.on_object(3, "GetCurrentVideoItem", 4, "TimelineItem");
        transport.on_object(4, "GetNodeGraph", 5, "Graph");
        transport.on(5, "GetNumNodes", ScriptValue::Int(2));
        let bridge = Bridge::new(transport.clone());

        let err = set_lut(
            bridge,
            json!({ "node_index": 5, "lut_path": "/tmp/look.cube" }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Invalid node index"));
        assert!(!transport.called("SetLUT"));
    }
}
