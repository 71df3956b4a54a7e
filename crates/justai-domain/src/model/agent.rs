//! Agent - A named persona with a system prompt
//!
//! Agent has no numeric identity: its name is the natural key.
//! Two agents with the same name cannot coexist in a store.

/// Agent - system prompt plus the prompts used to generate datasets from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Unique name (natural key)
    name: String,
    /// Prompt injected as the `system` message of every conversation
    system_prompt: String,
    /// Ordered prompts used for dataset generation
    dataset_generation_prompts: Vec<String>,
}

impl Agent {
    /// Create a new Agent
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        dataset_generation_prompts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            dataset_generation_prompts: dataset_generation_prompts
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Builder: append a dataset generation prompt
    pub fn with_generation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.dataset_generation_prompts.push(prompt.into());
        self
    }

    /// Builder: rename
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: replace the system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    // ========== Getters ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn dataset_generation_prompts(&self) -> &[String] {
        &self.dataset_generation_prompts
    }
}
