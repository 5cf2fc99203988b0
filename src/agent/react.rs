//! REACT Orchestration Loop
//!
//! The control loop at the center of the system:
//! Planning -> Reasoning <-> Acting -> Generating -> Fixing-URLs -> Done | Failed.
//!
//! One execution owns its session context, its iteration counter, and its
//! model-call counter. Both counters are checked before every reasoning step
//! and only ever grow; one model call stays reserved for generation so the
//! call budget holds at termination. Guardrails override a premature finish
//! decision until enough grounding research exists. Every failure path
//! returns a structured report with the accumulated context, never an
//! unwound error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use relief_forge_core::{
    tool_names, ActionRecord, AgentConfig, ImplementationPlan, PageContent, SessionContext,
    SourceCatalog, TemplateCatalog, ToolRegistry,
};
use relief_forge_llm::{parse_json_response, CompletionRequest, LlmClient};

use crate::agent::decision::{decode_decision, normalize_parameters, Decision};
use crate::agent::digest::{context_summary, intelligence_summary};
use crate::agent::prompts;
use crate::agent::repair::{RepairAgent, RepairOutcome};
use crate::session::{MessageKind, SessionLog};

/// Caller-facing result of one execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Whether the execution produced content
    pub success: bool,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The generated five-field content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<PageContent>,
    /// Number of tool results that informed generation
    pub intelligence_used: usize,
    /// Iterations the loop ran
    pub iterations_completed: u32,
    /// Model calls the loop made
    pub llm_calls_made: u32,
    /// Validation and repair outcome for the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_validation: Option<RepairOutcome>,
    /// URL extraction/validation outcome for the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_validation: Option<Value>,
    /// The accumulated session context, for diagnosis
    pub context: SessionContext,
}

/// Everything the success path produces beyond the context.
struct GenerationOutcome {
    content: PageContent,
    html_validation: RepairOutcome,
    url_validation: Value,
}

/// The REACT agent. Owns one execution at a time; counters reset only by
/// constructing a new agent.
pub struct ReactAgent {
    session_id: String,
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    log: Arc<dyn SessionLog>,
    data_sources_reference: String,
    templates_reference: String,
    iterations_completed: u32,
    llm_calls_made: u32,
}

impl ReactAgent {
    /// Create an agent wired to its collaborators.
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        registry: ToolRegistry,
        sources: &SourceCatalog,
        templates: &TemplateCatalog,
        log: Arc<dyn SessionLog>,
    ) -> Self {
        Self {
            session_id: format!("agent-{}", Uuid::new_v4()),
            config,
            llm,
            registry,
            log,
            data_sources_reference: sources.data_sources_reference(),
            templates_reference: templates.reference(),
            iterations_completed: 0,
            llm_calls_made: 0,
        }
    }

    /// The session identifier for this agent.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Iterations completed so far.
    pub fn iterations_completed(&self) -> u32 {
        self.iterations_completed
    }

    /// Model calls made so far.
    pub fn llm_calls_made(&self) -> u32 {
        self.llm_calls_made
    }

    /// Run the full loop for one user request.
    pub async fn execute(&mut self, user_request: &str) -> ExecutionReport {
        let mut context = SessionContext::new(
            user_request,
            self.data_sources_reference.clone(),
            self.templates_reference.clone(),
        );

        self.log
            .append(MessageKind::User, user_request, Value::Null);
        tracing::info!(session_id = %self.session_id, "starting execution");

        match self.run(&mut context).await {
            Ok(outcome) => ExecutionReport {
                success: true,
                error: None,
                html_content: Some(outcome.content),
                intelligence_used: context.tool_results().len(),
                iterations_completed: self.iterations_completed,
                llm_calls_made: self.llm_calls_made,
                html_validation: Some(outcome.html_validation),
                url_validation: Some(outcome.url_validation),
                context: context.clone(),
            },
            Err(error) => {
                tracing::error!(session_id = %self.session_id, %error, "execution failed");
                self.log
                    .append(MessageKind::System, &error, Value::Null);
                ExecutionReport {
                    success: false,
                    error: Some(error),
                    html_content: None,
                    intelligence_used: context.tool_results().len(),
                    iterations_completed: self.iterations_completed,
                    llm_calls_made: self.llm_calls_made,
                    html_validation: None,
                    url_validation: None,
                    context: context.clone(),
                }
            }
        }
    }

    /// Planning, the research loop, generation, and URL fixing.
    async fn run(&mut self, context: &mut SessionContext) -> Result<GenerationOutcome, String> {
        // Planning phase, once per execution
        if context.implementation_plan.is_none() {
            let plan = self
                .create_implementation_plan(context)
                .await
                .map_err(|e| format!("Planning failed: {}", e))?;
            self.log.append(
                MessageKind::Agent,
                &format!("Created implementation plan: {}", plan.summary),
                Value::Null,
            );
            context.set_plan(plan);
        }

        // Research loop. One model call stays reserved for generation so the
        // call budget holds at termination.
        while self.iterations_completed < self.config.max_iterations
            && self.llm_calls_made + 1 < self.config.max_llm_calls
            && !context.ready_to_generate()
        {
            self.iterations_completed += 1;
            tracing::info!(iteration = self.iterations_completed, "reason/act iteration");

            let decision = self.reason_about_next_step(context).await;

            match decision {
                Decision::Finish { .. } => {
                    context.mark_ready();
                    break;
                }
                Decision::Act {
                    tool,
                    parameters,
                    reasoning,
                } => {
                    self.act(context, &tool, parameters, &reasoning).await;
                }
                Decision::Skip { .. } => {}
            }
        }

        self.generate_final_content(context).await
    }

    /// One reasoning step: ask the model what to do next, then apply the
    /// guardrails before accepting a finish decision.
    async fn reason_about_next_step(&mut self, context: &mut SessionContext) -> Decision {
        if self.llm_calls_made + 1 >= self.config.max_llm_calls {
            return Decision::finish("Model call budget exhausted");
        }

        let system = prompts::reasoning_system_prompt(context, &self.registry.catalog_text());
        let user = prompts::reasoning_user_prompt(&context_summary(context));
        let request =
            CompletionRequest::new(system, user, 0.3, self.config.reasoning_max_tokens);

        self.llm_calls_made += 1;
        let raw = match self.llm.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "reasoning step failed");
                return Decision::finish(format!("Error in reasoning: {}", e));
            }
        };

        let mut decision = decode_decision(&raw);

        // Guardrails: block premature generation without grounding data.
        // This is policy, logged as an agent message rather than an error.
        if matches!(decision, Decision::Finish { .. }) {
            let successful_calls = context.successful_tool_calls();
            let stac_fetches = context.successful_stac_fetches();

            if successful_calls < 2 {
                self.log.append(
                    MessageKind::Agent,
                    &format!(
                        "Blocked early HTML generation - only {} successful tool calls",
                        successful_calls
                    ),
                    Value::Null,
                );
                decision = Decision::skip(format!(
                    "Insufficient research completed ({} successful tool calls). Must gather more intelligence using available tools before generating HTML.",
                    successful_calls
                ));
            } else if stac_fetches == 0 {
                self.log.append(
                    MessageKind::Agent,
                    "Blocked HTML generation - must fetch STAC data from configured sources first",
                    Value::Null,
                );
                decision = Decision::skip(
                    "Must fetch sample data from configured STAC sources before generating HTML. Use 'fetch_stac_sample_data' tool first to understand available data structure.",
                );
            }
        }

        self.log.append(
            MessageKind::Agent,
            &format!("Reasoning: {}", decision.reasoning()),
            Value::Null,
        );
        context.record_reasoning(
            self.iterations_completed,
            decision.reasoning(),
            decision.action_name(),
        );

        decision
    }

    /// Execute the chosen tool and fold the observation into context.
    async fn act(
        &mut self,
        context: &mut SessionContext,
        tool: &str,
        parameters: Value,
        reasoning: &str,
    ) {
        let (parameters, result) = match normalize_parameters(tool, parameters) {
            Ok(normalized) => {
                let output = self.registry.execute(tool, &normalized).await;
                (normalized, output)
            }
            Err(rejection) => {
                tracing::warn!(tool, "tool call had malformed parameters");
                (Value::Null, rejection)
            }
        };

        self.log.append(
            MessageKind::Tool,
            &if result.success {
                format!("Executed {}", tool)
            } else {
                format!(
                    "Tool {} failed: {}",
                    tool,
                    result.error.as_deref().unwrap_or("Unknown error")
                )
            },
            serde_json::json!({ "parameters": parameters, "result": result.to_value() }),
        );

        context.record_tool_result(
            self.iterations_completed,
            ActionRecord {
                reasoning: reasoning.to_string(),
                action: tool.to_string(),
                parameters,
            },
            result,
        );
    }

    /// Planning phase: ask the model for a structured implementation plan.
    async fn create_implementation_plan(
        &mut self,
        context: &SessionContext,
    ) -> Result<ImplementationPlan, String> {
        if self.llm_calls_made >= self.config.max_llm_calls {
            return Err("model call budget exhausted".to_string());
        }

        let system = prompts::planning_system_prompt(&context.data_sources_reference);
        let user = prompts::planning_user_prompt(&context.user_request);
        let request = CompletionRequest::new(system, user, 0.1, self.config.planning_max_tokens);

        self.llm_calls_made += 1;
        let raw = self.llm.complete(&request).await.map_err(|e| e.to_string())?;

        parse_json_response::<ImplementationPlan>(&raw).map_err(|e| e.to_string())
    }

    /// Generation phase plus validation, repair, and URL fixing.
    async fn generate_final_content(
        &mut self,
        context: &SessionContext,
    ) -> Result<GenerationOutcome, String> {
        let system = prompts::generation_system_prompt(context, &intelligence_summary(context));
        let user = prompts::generation_user_prompt(&context.user_request);
        let request =
            CompletionRequest::new(system, user, 0.7, self.config.generation_max_tokens);

        self.llm_calls_made += 1;
        let raw = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| format!("Final HTML generation failed: {}", e))?;

        let mut content: PageContent = parse_json_response(&raw)
            .map_err(|e| format!("Final HTML generation failed: {}", e))?;

        self.log
            .append(MessageKind::Agent, "Generated final HTML content", Value::Null);

        // Validate and repair the content
        let repair = RepairAgent::new(
            Arc::clone(&self.llm),
            Arc::clone(&self.log),
            self.config.generation_max_tokens,
        );
        let html_validation = repair.validate_and_fix(&content).await;
        if html_validation.content_fixed {
            content = html_validation.content.clone();
            self.log.append(
                MessageKind::Agent,
                &format!("Applied validation fixes: {}", html_validation.message),
                Value::Null,
            );
        }

        // Validate the URLs the content actually calls
        let url_validation = self.validate_generated_urls(&content).await;
        let invalid_urls = collect_invalid_urls(&url_validation);

        if !invalid_urls.is_empty() && self.llm_calls_made < self.config.max_llm_calls {
            self.log.append(
                MessageKind::Agent,
                &format!(
                    "Found {} invalid URLs, attempting to fix",
                    invalid_urls.len()
                ),
                Value::Null,
            );
            if let Some(fixed) = self.fix_invalid_urls(context, &content, &invalid_urls).await {
                content = fixed;
                self.log.append(
                    MessageKind::Agent,
                    "Applied URL fixes to generated content",
                    Value::Null,
                );
            }
        }

        Ok(GenerationOutcome {
            content,
            html_validation,
            url_validation,
        })
    }

    /// Run the HTML endpoint validator over the combined generated content.
    async fn validate_generated_urls(&self, content: &PageContent) -> Value {
        let combined = content.combined_markup();
        let output = self
            .registry
            .execute(
                tool_names::VALIDATE_HTML_ENDPOINTS,
                &serde_json::json!({ "html_content": combined }),
            )
            .await;

        self.log.append(
            MessageKind::Tool,
            &format!(
                "URL validation completed: found {} URLs",
                output
                    .get("urls_found")
                    .and_then(|u| u.as_u64())
                    .unwrap_or(0)
            ),
            Value::Null,
        );

        output.to_value()
    }

    /// One model call to replace invalid URLs with researched ones.
    async fn fix_invalid_urls(
        &mut self,
        context: &SessionContext,
        content: &PageContent,
        invalid_urls: &[Value],
    ) -> Option<PageContent> {
        let invalid_info: Vec<String> = invalid_urls
            .iter()
            .map(|entry| {
                let mut line = format!("- {}", entry["url"].as_str().unwrap_or(""));
                if let Some(status) = entry["status"].as_u64() {
                    line.push_str(&format!(" (Status: {})", status));
                }
                if let Some(error) = entry["error"].as_str() {
                    line.push_str(&format!(" - {}", error));
                }
                line
            })
            .collect();

        let researched = researched_urls(context);
        let content_json = serde_json::to_string_pretty(content).ok()?;

        let request = CompletionRequest::new(
            prompts::url_fix_system_prompt(),
            prompts::url_fix_user_prompt(&invalid_info, &researched, &content_json),
            0.3,
            self.config.generation_max_tokens,
        );

        self.llm_calls_made += 1;
        let raw = match self.llm.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "URL fixing failed");
                return None;
            }
        };

        let mut fixed: PageContent = match parse_json_response(&raw) {
            Ok(fixed) => fixed,
            Err(e) => {
                tracing::error!(error = %e, "URL fix response could not be decoded");
                return None;
            }
        };
        fixed.fill_missing_from(content);
        Some(fixed)
    }
}

/// Invalid URL entries from the URL validation output, reduced to the
/// url/status/error triple the fix prompt consumes.
fn collect_invalid_urls(url_validation: &Value) -> Vec<Value> {
    url_validation
        .get("invalid_urls")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "url": entry.get("url").cloned().unwrap_or(Value::Null),
                        "status": entry.get("status_code").cloned().unwrap_or(Value::Null),
                        "error": entry.get("error").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// URLs confirmed during research, usable as replacements.
fn researched_urls(context: &SessionContext) -> Vec<String> {
    let mut urls = Vec::new();
    for record in context.tool_results() {
        let result = &record.result;
        if !result.success {
            continue;
        }
        let accessible = result
            .get("is_accessible")
            .and_then(|a| a.as_bool())
            .unwrap_or(false);
        if accessible {
            if let Some(url) = result.get_str("url") {
                urls.push(format!("- {} - Validated API endpoint", url));
            }
        }
        if let Some(search_url) = result.get_str("search_url") {
            urls.push(format!("- {} - Validated STAC search endpoint", search_url));
        }
    }
    urls
}
