//! MCP protocol adapter.
//!
//! Serves the skill registry over the Model Context Protocol: `tools/list`
//! refreshes the registry and returns one tool descriptor per skill,
//! `tools/call` dispatches to the skill's instructions or its first script.

use crate::registry::{RegisteredSkill, SkillRegistry};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use skillrouter_skills::{Executor, SkillError, skill_body};
use std::sync::Arc;
use tracing::{debug, warn};

/// MCP server handler exposing every registered skill as a callable tool.
#[derive(Clone)]
pub struct SkillsServer {
    registry: Arc<SkillRegistry>,
    executor: Executor,
}

/// Outcome of dispatching a call to a known skill. Execution failures are
/// ordinary text (the executor already folds them into its result string);
/// only a failure to read a prompt-only skill's instructions is flagged.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Text(String),
    Failed(String),
}

impl SkillsServer {
    pub fn new(registry: Arc<SkillRegistry>, executor: Executor) -> Self {
        Self { registry, executor }
    }

    /// The registry this server reads from.
    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Resolve a call against the current registry snapshot, without
    /// refreshing it.
    async fn invoke(
        &self,
        name: &str,
        args: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Invocation, McpError> {
        let Some(skill) = self.registry.get(name) else {
            warn!(tool = name, "call for unregistered skill");
            let err = SkillError::NotFound(name.to_string());
            return Err(McpError::invalid_params(err.to_string(), Some(serde_json::json!({ "tool": name }))));
        };

        // Prompt-only skill: serve the instructional text instead of running
        // anything.
        let Some(script) = skill.meta.scripts.first().cloned() else {
            debug!(tool = name, "serving prompt-only skill body");
            return Ok(match skill_body(&skill.skill_md_path()) {
                Ok(body) => Invocation::Text(body),
                Err(err) => Invocation::Failed(format!("Failed to read skill instructions: {err}")),
            });
        };

        let executor = self.executor.clone();
        let dir = skill.path.clone();
        let output = tokio::task::spawn_blocking(move || executor.run(&dir, &script, &args))
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(Invocation::Text(output))
    }
}

impl ServerHandler for SkillsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "skillrouter".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Serves filesystem-defined skills as callable tools. Each skill is a directory \
                 holding a SKILL.md with a frontmatter header; calling one either returns its \
                 instructions or runs its first script with arguments bound to SKILL_ARG_* \
                 environment variables."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        self.registry.refresh();

        let snapshot = self.registry.snapshot();
        let mut tools: Vec<Tool> = snapshot.values().map(tool_descriptor).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(ListToolsResult { tools, next_cursor: None })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        match self.invoke(&request.name, args).await? {
            Invocation::Text(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Invocation::Failed(message) => Ok(CallToolResult::error(vec![Content::text(message)])),
        }
    }
}

/// Build the protocol tool descriptor for one registered skill.
fn tool_descriptor(skill: &RegisteredSkill) -> Tool {
    Tool::new(skill.meta.name.clone(), skill.meta.description.clone(), Arc::new(input_schema(skill)))
}

/// Synthesize the tool input schema: an object whose properties are exactly
/// the skill's parameter mapping and whose required list is every parameter
/// key. Optional parameters do not exist in the skill header format.
fn input_schema(skill: &RegisteredSkill) -> serde_json::Map<String, serde_json::Value> {
    let required: Vec<serde_json::Value> =
        skill.meta.parameters.keys().cloned().map(serde_json::Value::String).collect();

    let mut schema = serde_json::Map::new();
    schema.insert("type".to_string(), serde_json::Value::String("object".to_string()));
    schema.insert("properties".to_string(), serde_json::Value::Object(skill.meta.parameters.clone()));
    schema.insert("required".to_string(), serde_json::Value::Array(required));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skillrouter_skills::{EXECUTION_FAILED, SKILL_FILE};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_skill(root: &Path, dir_name: &str, skill_md: &str) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SKILL_FILE), skill_md).unwrap();
    }

    fn server_for(root: &Path) -> SkillsServer {
        let registry = Arc::new(SkillRegistry::new(root));
        registry.refresh();
        SkillsServer::new(registry, Executor::new())
    }

    fn registered(root: &Path, name: &str) -> RegisteredSkill {
        let registry = SkillRegistry::new(root);
        registry.refresh();
        registry.get(name).unwrap()
    }

    #[test]
    fn test_input_schema_requires_every_parameter() {
        let temp = TempDir::new().unwrap();
        write_skill(
            temp.path(),
            "cap",
            "---\nname: cap\ndescription: d\nparameters:\n  who:\n    type: string\n  count:\n    type: integer\n---\n",
        );

        let skill = registered(temp.path(), "cap");
        let schema = input_schema(&skill);

        assert_eq!(schema.get("type").unwrap(), "object");

        let properties = schema.get("properties").unwrap().as_object().unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("who").unwrap().get("type").unwrap(), "string");

        let required = schema.get("required").unwrap().as_array().unwrap();
        let mut required: Vec<_> = required.iter().map(|v| v.as_str().unwrap()).collect();
        required.sort_unstable();
        assert_eq!(required, vec!["count", "who"]);
    }

    #[test]
    fn test_input_schema_empty_parameters() {
        let temp = TempDir::new().unwrap();
        write_skill(temp.path(), "cap", "---\nname: cap\ndescription: d\n---\n");

        let schema = input_schema(&registered(temp.path(), "cap"));
        assert!(schema.get("properties").unwrap().as_object().unwrap().is_empty());
        assert!(schema.get("required").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn test_tool_descriptor_carries_name_and_description() {
        let temp = TempDir::new().unwrap();
        write_skill(temp.path(), "greet", "---\nname: greet\ndescription: says hi\n---\n");

        let tool = tool_descriptor(&registered(temp.path(), "greet"));
        assert_eq!(tool.name.as_ref(), "greet");
        assert_eq!(tool.description.as_deref(), Some("says hi"));
    }

    #[tokio::test]
    async fn test_invoke_prompt_only_returns_trimmed_body() {
        let temp = TempDir::new().unwrap();
        write_skill(
            temp.path(),
            "greet",
            "---\nname: greet\ndescription: says hi\n---\n\nWhen greeting, be polite.\n\n",
        );

        let server = server_for(temp.path());
        let outcome = server.invoke("greet", serde_json::Map::new()).await.unwrap();
        assert_eq!(outcome, Invocation::Text("When greeting, be polite.".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_runs_first_script_with_bound_args() {
        let temp = TempDir::new().unwrap();
        write_skill(
            temp.path(),
            "cap2",
            "---\nname: cap2\ndescription: echoes\nparameters:\n  who:\n    type: string\nscripts:\n  - run.sh\n---\n",
        );
        fs::write(temp.path().join("cap2/run.sh"), "echo \"$SKILL_ARG_WHO\"\n").unwrap();

        let server = server_for(temp.path());
        let mut args = serde_json::Map::new();
        args.insert("who".to_string(), json!("Ada"));

        let outcome = server.invoke("cap2", args).await.unwrap();
        assert_eq!(outcome, Invocation::Text("Ada\n".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_execution_failure_is_ordinary_text() {
        let temp = TempDir::new().unwrap();
        write_skill(
            temp.path(),
            "flaky",
            "---\nname: flaky\ndescription: fails\nscripts:\n  - exit 7\n---\n",
        );

        let server = server_for(temp.path());
        let outcome = server.invoke("flaky", serde_json::Map::new()).await.unwrap();
        match outcome {
            Invocation::Text(text) => assert!(text.starts_with(EXECUTION_FAILED)),
            Invocation::Failed(_) => panic!("execution failures are not error-flagged"),
        }
    }

    #[tokio::test]
    async fn test_invoke_unknown_skill_is_protocol_error() {
        let temp = TempDir::new().unwrap();
        let server = server_for(temp.path());

        let err = server.invoke("nonexistent", serde_json::Map::new()).await.unwrap_err();
        assert!(err.message.contains("skill not found: nonexistent"));
    }

    #[tokio::test]
    async fn test_invoke_does_not_refresh() {
        let temp = TempDir::new().unwrap();
        let server = server_for(temp.path());

        // Added after the last refresh, so a call cannot see it yet.
        write_skill(temp.path(), "late", "---\nname: late\ndescription: d\n---\nlate body\n");
        assert!(server.invoke("late", serde_json::Map::new()).await.is_err());

        server.registry().refresh();
        let outcome = server.invoke("late", serde_json::Map::new()).await.unwrap();
        assert_eq!(outcome, Invocation::Text("late body".to_string()));
    }
}
