//! Tool declarations offered to the reasoner.

use serde::{Deserialize, Serialize};

/// Function declaration shape submitted with every chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// The tool catalogue. `process_file` is offered only when multimedia
/// support is enabled in settings.
pub fn tool_descriptors(multimedia: bool) -> Vec<ToolDescriptor> {
    let mut tools = vec![
        ToolDescriptor {
            name: "read_file".into(),
            description: "Read the text content of a file.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Path to the file, absolute or relative to the current directory"}
                },
                "required": ["path"]
            }),
        },
        ToolDescriptor {
            name: "write_file".into(),
            description: "Write text content to a file, creating parent directories as needed and overwriting any existing content.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["path", "content"]
            }),
        },
        ToolDescriptor {
            name: "read_directory".into(),
            description: "List the folders and files inside a directory.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }),
        },
        ToolDescriptor {
            name: "get_tree".into(),
            description: "Render the recursive tree of a directory, folders before files.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }),
        },
        ToolDescriptor {
            name: "create_directory".into(),
            description: "Create a new directory with the given name inside an existing directory.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Existing parent directory"},
                    "name": {"type": "string", "description": "Name of the directory to create"}
                },
                "required": ["path", "name"]
            }),
        },
        ToolDescriptor {
            name: "move_item".into(),
            description: "Move a file or directory. If the destination is an existing directory the item is placed inside it.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "sourcePath": {"type": "string"},
                    "destinationPath": {"type": "string"}
                },
                "required": ["sourcePath", "destinationPath"]
            }),
        },
        ToolDescriptor {
            name: "rename_file".into(),
            description: "Rename a file or directory in place.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "newName": {"type": "string", "description": "New base name, without any path separators"}
                },
                "required": ["path", "newName"]
            }),
        },
        ToolDescriptor {
            name: "delete_item".into(),
            description: "Delete a file, or a directory together with its contents.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }),
        },
        ToolDescriptor {
            name: "copy_file".into(),
            description: "Copy a file or directory. If the destination is an existing directory the copy is placed inside it.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "destinationPath": {"type": "string"}
                },
                "required": ["path", "destinationPath"]
            }),
        },
        ToolDescriptor {
            name: "navigate_user".into(),
            description: "Open a directory in the user's file view and make it the current directory.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }),
        },
    ];

    if multimedia {
        tools.push(ToolDescriptor {
            name: "process_file".into(),
            description: "Attach an image, audio, video, or document file so its content can be analyzed.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"}
                },
                "required": ["path"]
            }),
        });
    }

    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_tool_is_conditional() {
        let with = tool_descriptors(true);
        let without = tool_descriptors(false);
        assert!(with.iter().any(|t| t.name == "process_file"));
        assert!(!without.iter().any(|t| t.name == "process_file"));
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn every_declaration_has_an_object_schema() {
        for tool in tool_descriptors(true) {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
        }
    }
}
