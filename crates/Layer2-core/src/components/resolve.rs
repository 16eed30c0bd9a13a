//! Resolve component - 애플리케이션 수준 도구
//!
//! Resolve 객체에서 직접 호출 가능한 일반 기능 (페이지 전환, 제품 정보,
//! 키프레임 모드, 레이아웃/렌더/번인 프리셋 관리)

use crate::api::Bridge;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, constants, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "get_product_info",
            "Get DaVinci Resolve product information (name and version)",
            Component::Resolve,
        ),
        wrap(get_product_info),
    );
    reg.register(
        ToolSpec::new(
            "get_current_page",
            "Get the current page displayed in DaVinci Resolve",
            Component::Resolve,
        ),
        wrap(get_current_page),
    );
    reg.register(
        ToolSpec::new(
            "open_page",
            "Switch to the specified page in DaVinci Resolve",
            Component::Resolve,
        )
        .required(
            "page_name",
            ParamKind::String,
            "Page name (media, cut, edit, fusion, color, fairlight, deliver)",
        ),
        wrap(open_page),
    );
    reg.register(
        ToolSpec::new(
            "get_keyframe_mode",
            "Get the current keyframe mode",
            Component::Resolve,
        ),
        wrap(get_keyframe_mode),
    );
    reg.register(
        ToolSpec::new("set_keyframe_mode", "Set the keyframe mode", Component::Resolve).required(
            "mode",
            ParamKind::StringOrInteger,
            "Keyframe mode (0-3 or 'All', 'All+Dynamic', 'Selected', 'Selected+Dynamic')",
        ),
        wrap(set_keyframe_mode),
    );
    reg.register(
        ToolSpec::new(
            "manage_layout_preset",
            "Manage layout presets (load, save, update, delete, import, export)",
            Component::Resolve,
        )
        .required(
            "action",
            ParamKind::String,
            "Action to perform (load, save, update, delete, import, export)",
        )
        .required("preset_name", ParamKind::String, "Name of the preset")
        .optional(
            "file_path",
            ParamKind::String,
            "File path for import/export operations",
        ),
        wrap(manage_layout_preset),
    );
    reg.register(
        ToolSpec::new(
            "manage_render_preset",
            "Manage render presets (import, export)",
            Component::Resolve,
        )
        .required("action", ParamKind::String, "Action to perform (import, export)")
        .optional("preset_path", ParamKind::String, "Path for import operation")
        .optional("preset_name", ParamKind::String, "Name of the preset for export")
        .optional("export_path", ParamKind::String, "Path for export operation"),
        wrap(manage_render_preset),
    );
    reg.register(
        ToolSpec::new(
            "manage_burn_in_preset",
            "Manage burn-in presets (import, export)",
            Component::Resolve,
        )
        .required("action", ParamKind::String, "Action to perform (import, export)")
        .optional("preset_path", ParamKind::String, "Path for import operation")
        .optional("preset_name", ParamKind::String, "Name of the preset for export")
        .optional("export_path", ParamKind::String, "Path for export operation"),
        wrap(manage_burn_in_preset),
    );
    reg.register(
        ToolSpec::new(
            "quit_resolve",
            "Quit DaVinci Resolve application",
            Component::Resolve,
        ),
        wrap(quit_resolve),
    );
}

/// 제품 이름과 버전 필드
async fn get_product_info(ctx: Bridge, _args: Value) -> Result<Value> {
    let resolve = ctx.resolve();
    let product_name = resolve.call_str("GetProductName", script_args![]).await?;
    let version = resolve.invoke("GetVersion", script_args![]).await?;
    let version_string = resolve.call_str("GetVersionString", script_args![]).await?;

    let empty = [];
    let fields = version.as_list().unwrap_or(&empty);
    let field = |index: usize| fields.get(index).map(|v| v.to_json()).unwrap_or(Value::Null);

    Ok(json!({
        "product_name": product_name,
        "version": {
            "major": field(0),
            "minor": field(1),
            "patch": field(2),
            "build": field(3),
            "suffix": field(4),
        },
        "version_string": version_string,
    }))
}

async fn get_current_page(ctx: Bridge, _args: Value) -> Result<Value> {
    let page = ctx.resolve().call_value("GetCurrentPage", script_args![]).await?;
    Ok(json!({ "page": page }))
}

async fn open_page(ctx: Bridge, args: Value) -> Result<Value> {
    let page_name: String = args::required(&args, "page_name")?;
    constants::validate_page(&page_name)?;

    let switched = ctx
        .resolve()
        .call_bool("OpenPage", script_args![page_name.as_str()])
        .await?;
    Ok(json!({ "switched": switched }))
}

async fn get_keyframe_mode(ctx: Bridge, _args: Value) -> Result<Value> {
    let mode = ctx.resolve().call_i64("GetKeyframeMode", script_args![]).await?;
    Ok(json!({
        "keyframe_mode": mode,
        "keyframe_mode_name": constants::keyframe_mode_name(mode).unwrap_or("Unknown"),
    }))
}

/// 문자열 모드는 정수로 변환한 뒤 전달
async fn set_keyframe_mode(ctx: Bridge, args: Value) -> Result<Value> {
    let mode = match args.get("mode") {
        None | Some(Value::Null) => return Err(Error::MissingParam("mode".to_string())),
        Some(Value::String(name)) => constants::keyframe_mode_from_name(name)?,
        Some(Value::Number(n)) => {
            let mode = n
                .as_i64()
                .ok_or_else(|| Error::invalid_param("mode", "expected integer"))?;
            constants::validate_keyframe_mode(mode)?;
            mode
        }
        Some(_) => return Err(Error::invalid_param("mode", "expected string or integer")),
    };

    let set = ctx
        .resolve()
        .call_bool("SetKeyframeMode", script_args![mode])
        .await?;
    Ok(json!({ "set": set }))
}

async fn manage_layout_preset(ctx: Bridge, args: Value) -> Result<Value> {
    let action: String = args::required(&args, "action")?;
    let preset_name: String = args::required(&args, "preset_name")?;
    let file_path: Option<String> = args::optional(&args, "file_path")?;
    let resolve = ctx.resolve();

    match action.as_str() {
        "load" => {
            let loaded = resolve
                .call_bool("LoadLayoutPreset", script_args![&preset_name])
                .await?;
            Ok(json!({ "loaded": loaded }))
        }
        "save" => {
            let saved = resolve
                .call_bool("SaveLayoutPreset", script_args![&preset_name])
                .await?;
            Ok(json!({ "saved": saved }))
        }
        "update" => {
            let updated = resolve
                .call_bool("UpdateLayoutPreset", script_args![&preset_name])
                .await?;
            Ok(json!({ "updated": updated }))
        }
        "delete" => {
            let deleted = resolve
                .call_bool("DeleteLayoutPreset", script_args![&preset_name])
                .await?;
            Ok(json!({ "deleted": deleted }))
        }
        "export" => {
            let file_path = file_path.ok_or_else(|| {
                Error::Validation("File path is required for export operation".to_string())
            })?;
            let exported = resolve
                .call_bool("ExportLayoutPreset", script_args![&preset_name, &file_path])
                .await?;
            Ok(json!({ "exported": exported }))
        }
        "import" => {
            let file_path = file_path.ok_or_else(|| {
                Error::Validation("File path is required for import operation".to_string())
            })?;
            let imported = if preset_name.is_empty() {
                resolve
                    .call_bool("ImportLayoutPreset", script_args![&file_path])
                    .await?
            } else {
                resolve
                    .call_bool("ImportLayoutPreset", script_args![&file_path, &preset_name])
                    .await?
            };
            Ok(json!({ "imported": imported }))
        }
        other => Err(Error::Validation(format!(
            "Invalid action: {}. Must be one of {}",
            other,
            constants::LAYOUT_PRESET_ACTIONS.join(", ")
        ))),
    }
}

async fn manage_render_preset(ctx: Bridge, args: Value) -> Result<Value> {
    manage_preset_io(ctx, args, "ImportRenderPreset", "ExportRenderPreset").await
}

async fn manage_burn_in_preset(ctx: Bridge, args: Value) -> Result<Value> {
    manage_preset_io(ctx, args, "ImportBurnInPreset", "ExportBurnInPreset").await
}

/// 렌더/번인 프리셋 공통 import/export 처리
async fn manage_preset_io(
    ctx: Bridge,
    args: Value,
    import_member: &str,
    export_member: &str,
) -> Result<Value> {
    let action: String = args::required(&args, "action")?;
    let resolve = ctx.resolve();

    match action.as_str() {
        "import" => {
            let preset_path: String = args::optional(&args, "preset_path")?.ok_or_else(|| {
                Error::Validation("Preset path is required for import operation".to_string())
            })?;
            let imported = resolve
                .call_bool(import_member, script_args![&preset_path])
                .await?;
            Ok(json!({ "imported": imported }))
        }
        "export" => {
            let preset_name: Option<String> = args::optional(&args, "preset_name")?;
            let export_path: Option<String> = args::optional(&args, "export_path")?;
            let (preset_name, export_path) = match (preset_name, export_path) {
                (Some(name), Some(path)) => (name, path),
                _ => {
                    return Err(Error::Validation(
                        "Preset name and export path are required for export operation"
                            .to_string(),
                    ))
                }
            };
            let exported = resolve
                .call_bool(export_member, script_args![&preset_name, &export_path])
                .await?;
            Ok(json!({ "exported": exported }))
        }
        other => Err(Error::Validation(format!(
            "Invalid action: {}. Must be one of {}",
            other,
            constants::PRESET_IO_ACTIONS.join(", ")
        ))),
    }
}

async fn quit_resolve(ctx: Bridge, _args: Value) -> Result<Value> {
    let result = ctx.resolve().invoke("Quit", script_args![]).await?;
    Ok(json!({ "quit": result.is_null() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ScriptValue;
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_open_page_valid() {
        let transport = MockTransport::new();
        transport.on(0, "OpenPage", ScriptValue::Bool(true));
        let bridge = Bridge::new(transport.clone());

        let result = open_page(bridge, json!({ "page_name": "color" })).await.unwrap();
        assert_eq!(result, json!({ "switched": true }));
        assert!(transport.called("OpenPage"));
    }

    #[tokio::test]
    async fn test_open_page_rejects_invalid_page_without_calling() {
        let transport = MockTransport::new();
        let bridge = Bridge::new(transport.clone());

        let err = open_page(bridge, json!({ "page_name": "render" })).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!transport.called("OpenPage"));
    }

    #[tokio::test]
    async fn test_set_keyframe_mode_accepts_name_and_int() {
        let transport = MockTransport::new();
        transport.on(0, "SetKeyframeMode", ScriptValue::Bool(true));
        let bridge = Bridge::new(transport.clone());

        let by_name = set_keyframe_mode(bridge.clone(), json!({ "mode": "Selected" }))
            .await
            .unwrap();
        assert_eq!(by_name, json!({ "set": true }));

        let by_int = set_keyframe_mode(bridge.clone(), json!({ "mode": 1 })).await.unwrap();
        assert_eq!(by_int, json!({ "set": true }));

        assert!(set_keyframe_mode(bridge, json!({ "mode": 9 })).await.is_err());

        // 첫 호출 인자는 변환된 정수여야 한다
        let calls = transport.calls();
        assert_eq!(calls[0].2[0], ScriptValue::Int(2));
    }

    #[tokio::test]
    async fn test_manage_render_preset_requires_paths() {
        let bridge = Bridge::new(MockTransport::new());
        let err = manage_render_preset(bridge, json!({ "action": "import" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Preset path is required"));
    }

    #[tokio::test]
    async fn test_get_product_info_shape() {
        let transport = MockTransport::new();
        transport.on(0, "GetProductName", ScriptValue::from("DaVinci Resolve"));
        transport.on(
            0,
            "GetVersion",
            ScriptValue::List(vec![
                ScriptValue::Int(19),
                ScriptValue::Int(1),
                ScriptValue::Int(0),
                ScriptValue::Int(13),
                ScriptValue::from("b"),
            ]),
        );
        transport.on(0, "GetVersionString", ScriptValue::from("19.1.0b13"));
        let bridge = Bridge::new(transport);

        let info = get_product_info(bridge, json!({})).await.unwrap();
        assert_eq!(info["product_name"], "DaVinci Resolve");
        assert_eq!(info["version"]["major"], 19);
        assert_eq!(info["version"]["suffix"], "b");
        assert_eq!(info["version_string"], "19.1.0b13");
    }
}
