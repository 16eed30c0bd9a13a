//! ProjectManager component - 프로젝트/폴더/데이터베이스 관리 도구

use crate::api::Bridge;
use crate::bridge::ScriptValue;
use crate::registry::{wrap, ToolRegistry};
use crate::script_args;
use davinci_foundation::{args, Component, Error, ParamKind, Result, ToolSpec};
use serde_json::{json, Value};

pub fn register(reg: &mut ToolRegistry) {
    reg.register(
        ToolSpec::new(
            "create_project",
            "Create a new project with the specified name",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name for the new project"),
        wrap(create_project),
    );
    reg.register(
        ToolSpec::new(
            "load_project",
            "Load an existing project with the specified name",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the project to load"),
        wrap(load_project),
    );
    reg.register(
        ToolSpec::new(
            "save_project",
            "Save the currently loaded project",
            Component::ProjectManager,
        ),
        wrap(save_project),
    );
    reg.register(
        ToolSpec::new(
            "close_project",
            "Close the currently loaded project without saving",
            Component::ProjectManager,
        ),
        wrap(close_project),
    );
    reg.register(
        ToolSpec::new(
            "get_project_list",
            "Get a list of all projects in the current folder",
            Component::ProjectManager,
        ),
        wrap(get_project_list),
    );
    reg.register(
        ToolSpec::new(
            "get_folder_list",
            "Get a list of all folders in the current folder",
            Component::ProjectManager,
        ),
        wrap(get_folder_list),
    );
    reg.register(
        ToolSpec::new(
            "get_current_folder",
            "Get the name of the current folder in the project manager",
            Component::ProjectManager,
        ),
        wrap(get_current_folder),
    );
    reg.register(
        ToolSpec::new(
            "create_folder",
            "Create a new folder in the current location",
            Component::ProjectManager,
        )
        .required("folder_name", ParamKind::String, "Name for the new folder"),
        wrap(create_folder),
    );
    reg.register(
        ToolSpec::new(
            "open_folder",
            "Open a folder with the specified name",
            Component::ProjectManager,
        )
        .required("folder_name", ParamKind::String, "Name of the folder to open"),
        wrap(open_folder),
    );
    reg.register(
        ToolSpec::new(
            "goto_root_folder",
            "Navigate to the root folder in the database",
            Component::ProjectManager,
        ),
        wrap(goto_root_folder),
    );
    reg.register(
        ToolSpec::new(
            "goto_parent_folder",
            "Navigate to the parent folder of the current folder",
            Component::ProjectManager,
        ),
        wrap(goto_parent_folder),
    );
    reg.register(
        ToolSpec::new(
            "delete_project",
            "Delete a project with the specified name",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the project to delete"),
        wrap(delete_project),
    );
    reg.register(
        ToolSpec::new(
            "archive_project",
            "Archive a project to a file",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the project to archive")
        .required("file_path", ParamKind::String, "Path to save the archive")
        .optional("archive_src_media", ParamKind::Boolean, "Include source media")
        .optional("archive_render_cache", ParamKind::Boolean, "Include render cache")
        .optional("archive_proxy_media", ParamKind::Boolean, "Include proxy media"),
        wrap(archive_project),
    );
    reg.register(
        ToolSpec::new(
            "delete_folder",
            "Delete a folder with the specified name",
            Component::ProjectManager,
        )
        .required("folder_name", ParamKind::String, "Name of the folder to delete"),
        wrap(delete_folder),
    );
    reg.register(
        ToolSpec::new(
            "import_project",
            "Import a project from a file",
            Component::ProjectManager,
        )
        .required("file_path", ParamKind::String, "Path to the project file")
        .optional("project_name", ParamKind::String, "New name for the imported project"),
        wrap(import_project),
    );
    reg.register(
        ToolSpec::new(
            "export_project",
            "Export a project to a file",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the project to export")
        .required("file_path", ParamKind::String, "Path to save the exported project")
        .optional("with_stills_and_luts", ParamKind::Boolean, "Include stills and LUTs"),
        wrap(export_project),
    );
    reg.register(
        ToolSpec::new(
            "restore_project",
            "Restore a project from a backup",
            Component::ProjectManager,
        )
        .required("backup_path", ParamKind::String, "Path to the backup file")
        .optional("project_name", ParamKind::String, "Name for the restored project"),
        wrap(restore_project),
    );
    reg.register(
        ToolSpec::new(
            "get_current_database",
            "Get the name of the current database",
            Component::ProjectManager,
        ),
        wrap(get_current_database),
    );
    reg.register(
        ToolSpec::new(
            "get_database_list",
            "Get a list of all available databases",
            Component::ProjectManager,
        ),
        wrap(get_database_list),
    );
    reg.register(
        ToolSpec::new(
            "set_current_database",
            "Set the current database by name",
            Component::ProjectManager,
        )
        .required(
            "db_info",
            ParamKind::Object,
            "Database info object with DbType and DbName keys",
        ),
        wrap(set_current_database),
    );
    reg.register(
        ToolSpec::new(
            "create_cloud_project",
            "Create a new project in DaVinci Resolve cloud database",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name for the new cloud project")
        .required("location_path", ParamKind::String, "Cloud location path"),
        wrap(create_cloud_project),
    );
    reg.register(
        ToolSpec::new(
            "load_cloud_project",
            "Load a project from DaVinci Resolve cloud database",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the cloud project to load")
        .required("location_path", ParamKind::String, "Cloud location path"),
        wrap(load_cloud_project),
    );
    reg.register(
        ToolSpec::new(
            "import_cloud_project",
            "Import a project from DaVinci Resolve cloud database to local database",
            Component::ProjectManager,
        )
        .required("project_name", ParamKind::String, "Name of the cloud project to import")
        .required("location_path", ParamKind::String, "Cloud location path")
        .required("local_folder_path", ParamKind::String, "Local folder path"),
        wrap(import_cloud_project),
    );
    reg.register(
        ToolSpec::new(
            "restore_cloud_project",
            "Restore a project from DaVinci Resolve cloud database",
            Component::ProjectManager,
        )
        .required("backup_id", ParamKind::String, "ID of the backup to restore")
        .required("location_path", ParamKind::String, "Cloud location path"),
        wrap(restore_cloud_project),
    );
}

async fn create_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let project = manager
        .call_opt_object("CreateProject", script_args![&project_name])
        .await?
        .ok_or_else(|| {
            Error::Validation(format!(
                "Failed to create project '{}' (a project with this name may already exist)",
                project_name
            ))
        })?;

    let name = project
        .call_str("GetName", script_args![])
        .await
        .unwrap_or(project_name);
    Ok(json!({ "name": name, "created": true }))
}

async fn load_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let project = manager
        .call_opt_object("LoadProject", script_args![&project_name])
        .await?
        .ok_or_else(|| Error::ObjectNotFound(format!("Failed to load project '{}'", project_name)))?;

    let name = project
        .call_str("GetName", script_args![])
        .await
        .unwrap_or(project_name);
    Ok(json!({ "name": name, "loaded": true }))
}

async fn save_project(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let project_name = project.call_str("GetName", script_args![]).await?;

    let manager = ctx.project_manager().await?;
    let saved = manager.call_bool("SaveProject", script_args![]).await?;
    Ok(json!({ "saved": saved, "project_name": project_name }))
}

async fn close_project(ctx: Bridge, _args: Value) -> Result<Value> {
    let project = ctx.current_project().await?;
    let project_name = project.call_str("GetName", script_args![]).await?;

    let manager = ctx.project_manager().await?;
    let closed = manager.call_bool("CloseProject", script_args![&project]).await?;
    Ok(json!({ "closed": closed, "project_name": project_name }))
}

async fn get_project_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let projects = manager
        .call_value("GetProjectListInCurrentFolder", script_args![])
        .await?;
    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;

    let count = projects.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "projects": projects, "count": count, "current_folder": current_folder }))
}

async fn get_folder_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let folders = manager
        .call_value("GetFolderListInCurrentFolder", script_args![])
        .await?;
    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;

    let count = folders.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "folders": folders, "count": count, "current_folder": current_folder }))
}

async fn get_current_folder(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "current_folder": current_folder }))
}

async fn create_folder(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_name: String = args::required(&args, "folder_name")?;
    let manager = ctx.project_manager().await?;

    let created = manager
        .call_bool("CreateFolder", script_args![&folder_name])
        .await?;
    if !created {
        return Err(Error::Validation(format!(
            "Failed to create folder '{}'",
            folder_name
        )));
    }

    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "created": true, "folder_name": folder_name, "current_folder": current_folder }))
}

async fn open_folder(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_name: String = args::required(&args, "folder_name")?;
    let manager = ctx.project_manager().await?;

    let opened = manager.call_bool("OpenFolder", script_args![&folder_name]).await?;
    if !opened {
        return Err(Error::ObjectNotFound(format!(
            "Failed to open folder '{}'",
            folder_name
        )));
    }

    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "opened": true, "folder_name": folder_name, "current_folder": current_folder }))
}

async fn goto_root_folder(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let moved = manager.call_bool("GotoRootFolder", script_args![]).await?;
    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "moved": moved, "current_folder": current_folder }))
}

async fn goto_parent_folder(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let moved = manager.call_bool("GotoParentFolder", script_args![]).await?;
    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "moved": moved, "current_folder": current_folder }))
}

async fn delete_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let deleted = manager
        .call_bool("DeleteProject", script_args![&project_name])
        .await?;
    if !deleted {
        return Err(Error::ObjectNotFound(format!(
            "Failed to delete project '{}'",
            project_name
        )));
    }
    Ok(json!({ "deleted": true, "project_name": project_name }))
}

async fn archive_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let file_path: String = args::required(&args, "file_path")?;
    // 네이티브 API 기본값과 동일
    let src_media = args::optional_or(&args, "archive_src_media", true)?;
    let render_cache = args::optional_or(&args, "archive_render_cache", true)?;
    let proxy_media = args::optional_or(&args, "archive_proxy_media", false)?;

    let manager = ctx.project_manager().await?;
    let archived = manager
        .call_bool(
            "ArchiveProject",
            script_args![&project_name, &file_path, src_media, render_cache, proxy_media],
        )
        .await?;
    if !archived {
        return Err(Error::Validation(format!(
            "Failed to archive project '{}'",
            project_name
        )));
    }
    Ok(json!({
        "archived": true,
        "project_name": project_name,
        "archive_path": file_path,
    }))
}

async fn delete_folder(ctx: Bridge, args: Value) -> Result<Value> {
    let folder_name: String = args::required(&args, "folder_name")?;
    let manager = ctx.project_manager().await?;

    let deleted = manager
        .call_bool("DeleteFolder", script_args![&folder_name])
        .await?;
    if !deleted {
        return Err(Error::ObjectNotFound(format!(
            "Failed to delete folder '{}'",
            folder_name
        )));
    }

    let current_folder = manager.call_value("GetCurrentFolder", script_args![]).await?;
    Ok(json!({ "deleted": true, "folder_name": folder_name, "current_folder": current_folder }))
}

async fn import_project(ctx: Bridge, args: Value) -> Result<Value> {
    let file_path: String = args::required(&args, "file_path")?;
    let project_name: Option<String> = args::optional(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let imported = match &project_name {
        Some(name) => {
            manager
                .call_bool("ImportProject", script_args![&file_path, name])
                .await?
        }
        None => manager.call_bool("ImportProject", script_args![&file_path]).await?,
    };
    if !imported {
        return Err(Error::Validation(format!(
            "Failed to import project from '{}'",
            file_path
        )));
    }
    Ok(json!({ "imported": true, "file_path": file_path, "project_name": project_name }))
}

async fn export_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let file_path: String = args::required(&args, "file_path")?;
    let with_stills_and_luts = args::optional_or(&args, "with_stills_and_luts", true)?;

    let manager = ctx.project_manager().await?;
    let exported = manager
        .call_bool(
            "ExportProject",
            script_args![&project_name, &file_path, with_stills_and_luts],
        )
        .await?;
    if !exported {
        return Err(Error::Validation(format!(
            "Failed to export project '{}'",
            project_name
        )));
    }
    Ok(json!({ "exported": true, "project_name": project_name, "export_path": file_path }))
}

async fn restore_project(ctx: Bridge, args: Value) -> Result<Value> {
    let backup_path: String = args::required(&args, "backup_path")?;
    let project_name: Option<String> = args::optional(&args, "project_name")?;
    let manager = ctx.project_manager().await?;

    let restored = match &project_name {
        Some(name) => {
            manager
                .call_bool("RestoreProject", script_args![&backup_path, name])
                .await?
        }
        None => {
            manager
                .call_bool("RestoreProject", script_args![&backup_path])
                .await?
        }
    };
    if !restored {
        return Err(Error::Validation(format!(
            "Failed to restore project from '{}'",
            backup_path
        )));
    }
    Ok(json!({ "restored": true, "file_path": backup_path, "project_name": project_name }))
}

async fn get_current_database(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let database = manager.call_value("GetCurrentDatabase", script_args![]).await?;
    Ok(json!({ "database": database }))
}

async fn get_database_list(ctx: Bridge, _args: Value) -> Result<Value> {
    let manager = ctx.project_manager().await?;
    let databases = manager.call_value("GetDatabaseList", script_args![]).await?;
    let count = databases.as_array().map(Vec::len).unwrap_or(0);
    Ok(json!({ "databases": databases, "count": count }))
}

async fn set_current_database(ctx: Bridge, args: Value) -> Result<Value> {
    let db_info: Value = args::required(&args, "db_info")?;
    if !db_info.is_object() {
        return Err(Error::invalid_param("db_info", "expected object"));
    }

    let manager = ctx.project_manager().await?;
    let set = manager
        .call_bool("SetCurrentDatabase", script_args![db_info])
        .await?;
    Ok(json!({ "set": set }))
}

/// 클라우드 프로젝트 설정 dict 구성
fn cloud_settings(project_name: &str, location_path: &str) -> ScriptValue {
    ScriptValue::from(json!({
        "project_name": project_name,
        "location_path": location_path,
    }))
}

async fn create_cloud_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let location_path: String = args::required(&args, "location_path")?;
    let manager = ctx.project_manager().await?;

    let project = manager
        .call_opt_object(
            "CreateCloudProject",
            vec![cloud_settings(&project_name, &location_path)],
        )
        .await?
        .ok_or_else(|| {
            Error::Validation(format!("Failed to create cloud project '{}'", project_name))
        })?;

    let name = project
        .call_str("GetName", script_args![])
        .await
        .unwrap_or(project_name);
    Ok(json!({ "created": true, "name": name, "location_path": location_path }))
}

async fn load_cloud_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let location_path: String = args::required(&args, "location_path")?;
    let manager = ctx.project_manager().await?;

    let project = manager
        .call_opt_object(
            "LoadCloudProject",
            vec![cloud_settings(&project_name, &location_path)],
        )
        .await?
        .ok_or_else(|| {
            Error::ObjectNotFound(format!("Failed to load cloud project '{}'", project_name))
        })?;

    let name = project
        .call_str("GetName", script_args![])
        .await
        .unwrap_or(project_name);
    Ok(json!({ "loaded": true, "name": name, "location_path": location_path }))
}

async fn import_cloud_project(ctx: Bridge, args: Value) -> Result<Value> {
    let project_name: String = args::required(&args, "project_name")?;
    let location_path: String = args::required(&args, "location_path")?;
    let local_folder_path: String = args::required(&args, "local_folder_path")?;
    let manager = ctx.project_manager().await?;

    let imported = manager
        .call_bool(
            "ImportCloudProject",
            vec![
                ScriptValue::from(local_folder_path.as_str()),
                cloud_settings(&project_name, &location_path),
            ],
        )
        .await?;
    if !imported {
        return Err(Error::Validation(format!(
            "Failed to import cloud project '{}'",
            project_name
        )));
    }
    Ok(json!({
        "imported": true,
        "project_name": project_name,
        "local_folder_path": local_folder_path,
    }))
}

async fn restore_cloud_project(ctx: Bridge, args: Value) -> Result<Value> {
    let backup_id: String = args::required(&args, "backup_id")?;
    let location_path: String = args::required(&args, "location_path")?;
    let manager = ctx.project_manager().await?;

    let restored = manager
        .call_bool(
            "RestoreCloudProject",
            vec![
                ScriptValue::from(location_path.as_str()),
                ScriptValue::from(json!({ "backup_id": backup_id })),
            ],
        )
        .await?;
    if !restored {
        return Err(Error::Validation(format!(
            "Failed to restore cloud project backup '{}'",
            backup_id
        )));
    }
    Ok(json!({ "restored": true, "backup_id": backup_id, "location_path": location_path }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[tokio::test]
    async fn test_create_project_failure_is_validation_error() {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on(1, "CreateProject", ScriptValue::Null);
        let bridge = Bridge::new(transport);

        let err = create_project(bridge, json!({ "project_name": "My Project" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("My Project"));
    }

    #[tokio::test]
    async fn test_load_project_returns_name() {
        let transport = MockTransport::new();
        transport.on_object(0, "GetProjectManager", 1, "ProjectManager");
        transport.on_object(1, "LoadProject", 2, "Project");
        transport.on(2, "GetName", ScriptValue::from("Feature Cut"));
        let bridge = Bridge::new(transport);

        let result = load_project(bridge, json!({ "project_name": "Feature Cut" }))
            .await
            .unwrap();
        assert_eq!(result, json!({ "name": "Feature Cut", "loaded": true }));
    }

    #[tokio::test]
    async fn test_set_current_database_rejects_non_object() {
        let bridge = Bridge::new(MockTransport::new());
        let err = set_current_database(bridge, json!({ "db_info": "Local" }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParam { .. }));
    }
}
