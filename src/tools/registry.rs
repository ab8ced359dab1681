use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::ArgsError;
use crate::core::tool::{Tool, ToolCallError, ToolSpec};
use crate::tools::emi::{EmiTool, EmiTools};

/// One named EMI tool bound to the shared handlers.
#[derive(Clone)]
pub struct EmiToolEntry {
    tool: EmiTool,
    tools: EmiTools,
}

impl ToolSpec for EmiToolEntry {
    fn name(&self) -> &'static str {
        self.tool.name()
    }
    fn description(&self) -> &'static str {
        self.tool.description()
    }
    fn input_schema(&self) -> serde_json::Value {
        self.tool.input_schema()
    }
}

#[async_trait]
impl Tool for EmiToolEntry {
    async fn call(&self, args: &serde_json::Value) -> Result<serde_json::Value, ArgsError> {
        self.tools.call_json(self.tool, args).await
    }
}

#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<HashMap<&'static str, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let map: HashMap<&'static str, Arc<dyn Tool>> =
            iter.into_iter().map(|t| (t.name(), t)).collect();
        Self { by_name: Arc::new(map) }
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        let mut metas: Vec<ToolMeta> = self
            .by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub async fn call(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolCallError> {
        let t = self
            .by_name
            .get(name)
            .ok_or_else(|| ToolCallError::UnknownTool(name.to_string()))?;
        Ok(t.call(args).await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

/// Build the startup registry: every EMI tool, keyed by its stable name.
pub fn build_registry(tools: EmiTools) -> ToolRegistry {
    ToolRegistry::with_tools(EmiTool::ALL.into_iter().map(|tool| {
        Arc::new(EmiToolEntry { tool, tools: tools.clone() }) as Arc<dyn Tool>
    }))
}
