//! Prompt Builders
//!
//! All model-facing prompt text for the planning, reasoning, generation, and
//! URL-fix phases. Prompts carry three contracts the rest of the pipeline
//! depends on: decisions come back as JSON with reasoning/action/parameters,
//! generated content comes back as the five-field structure, and content is
//! body-level only because the page template supplies the document shell.

use relief_forge_core::SessionContext;

/// The template skeleton generated content is injected into. Shown to the
/// model so it understands why outer document tags and library script tags
/// are forbidden.
pub const PAGE_TEMPLATE_CONTRACT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    <link href="https://unpkg.com/leaflet/dist/leaflet.css" rel="stylesheet">
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css" rel="stylesheet">
    <style>{{ custom_css }}</style>
</head>
<body>
    {{ main_content }}
    <script src="https://unpkg.com/leaflet/dist/leaflet.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <script>{{ custom_js }}</script>
</body>
</html>"#;

/// Render a bullet list, with a fallback line when the list is empty.
fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        format!("- {}", empty)
    } else {
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// System prompt for the planning phase.
pub fn planning_system_prompt(data_sources_reference: &str) -> String {
    format!(
        r#"You are an expert disaster response application planner. Your job is to analyze user requests and create detailed implementation plans.

{data_sources_reference}

PLANNING REQUIREMENTS:
1. Parse the user request to understand exactly what they want
2. Define specific functional requirements
3. Identify what data sources and APIs are needed
4. Plan the user interface and interaction design
5. Outline the technical implementation approach

Create a comprehensive plan that will guide the research and implementation phases.

Return ONLY a valid JSON object with this structure:
{{
  "summary": "Brief summary of what will be built",
  "user_intent": "Clear interpretation of what the user wants",
  "functional_requirements": ["Specific requirement 1", "Specific requirement 2"],
  "data_requirements": ["Data source 1 needed", "Data source 2 needed"],
  "ui_components": ["UI component 1 (e.g., interactive map)", "UI component 2 (e.g., data filters)"],
  "research_tasks": ["Research task 1 to validate data availability", "Research task 2 to find current information"],
  "success_criteria": ["Criteria 1 for successful implementation", "Criteria 2 for successful implementation"]
}}"#
    )
}

/// User prompt for the planning phase.
pub fn planning_user_prompt(user_request: &str) -> String {
    format!(
        r#"User Request: {user_request}

Analyze this request and create a detailed implementation plan. Focus on:
1. What exactly does the user want to accomplish?
2. What specific features and functionality are needed?
3. What data sources from our configured options should be used?
4. What research is needed to ensure accurate, current information?
5. How should the interface be designed for the best user experience?

Be specific and actionable in your plan."#
    )
}

/// System prompt for one reasoning step.
pub fn reasoning_system_prompt(context: &SessionContext, tools_text: &str) -> String {
    let plan = context.implementation_plan.clone().unwrap_or_default();
    let data_requirements = bullet_list(
        &plan.data_requirements,
        "No specific requirements identified",
    );
    let research_tasks = bullet_list(
        &plan.research_tasks,
        "No specific research tasks identified",
    );
    let plan_summary = if plan.summary.is_empty() {
        "No plan available".to_string()
    } else {
        plan.summary
    };

    format!(
        r#"You are a research agent executing a planned disaster response application implementation.

IMPLEMENTATION PLAN:
{plan_summary}

DATA REQUIREMENTS:
{data_requirements}

RESEARCH TASKS TO COMPLETE:
{research_tasks}

Current task: {user_request}

Available tools:
{tools_text}

{data_sources}

{templates}

PLAN-DRIVEN APPROACH:
- Follow the implementation plan to guide your research
- Complete the specific research tasks identified in the plan
- Gather the data sources specified in the data requirements
- Validate that you can fulfill the planned functional requirements
- ONLY generate HTML once you have completed the planned research

RESEARCH PRIORITY (based on plan):
1. FIRST: Complete research tasks from implementation plan
2. SECOND: Validate data requirements can be met with available sources
3. THIRD: Gather any supplementary information needed

ONLY decide to "generate_final_html" if you have:
1. Completed the research tasks from your implementation plan
2. Validated that data requirements can be satisfied
3. At least 3 successful tool calls completed
4. Confidence that the plan can be executed with gathered intelligence

Return a JSON object with:
- "reasoning": Your detailed thought process (reference the implementation plan)
- "action": Tool name to use (web_search, validate_api_endpoint, fetch_stac_sample_data, etc.)
- "parameters": Parameters for the tool
- "continue": true (always true until plan research is complete)"#,
        user_request = context.user_request,
        data_sources = context.data_sources_reference,
        templates = context.templates_reference,
    )
}

/// User prompt for one reasoning step.
pub fn reasoning_user_prompt(context_summary: &str) -> String {
    format!(
        r#"Context so far:
{context_summary}

Based on the implementation plan, what should I do next to complete the research phase?

Review the implementation plan and consider:
1. Which research tasks from the plan have I completed?
2. Which data requirements do I still need to validate?
3. What specific information is still missing to execute the plan?
4. Am I ready to generate the application based on the plan and gathered intelligence?

Focus on completing the planned research systematically rather than random exploration.

Respond with valid JSON only."#
    )
}

/// System prompt for the generation phase.
pub fn generation_system_prompt(context: &SessionContext, intelligence_summary: &str) -> String {
    let plan = context.implementation_plan.clone().unwrap_or_default();
    let plan_summary = if plan.summary.is_empty() {
        "Application based on user request".to_string()
    } else {
        plan.summary
    };
    let functional_requirements = bullet_list(
        &plan.functional_requirements,
        "No specific requirements specified",
    );
    let ui_components = bullet_list(&plan.ui_components, "Components as needed for functionality");
    let success_criteria = bullet_list(&plan.success_criteria, "Functional application with real data");

    format!(
        r#"You are an expert web application developer implementing a planned application.

IMPLEMENTATION PLAN TO EXECUTE:
Summary: {plan_summary}

FUNCTIONAL REQUIREMENTS TO IMPLEMENT:
{functional_requirements}

UI COMPONENTS TO INCLUDE:
{ui_components}

SUCCESS CRITERIA:
{success_criteria}

{data_sources}

GATHERED INTELLIGENCE:
{intelligence_summary}

Create a complete, functional webpage that IMPLEMENTS THE PLAN:
1. Fulfills ALL functional requirements from the implementation plan
2. Includes ALL specified UI components
3. Uses the ACTUAL information you've gathered through research
4. Integrates with verified data sources and APIs
5. Meets the success criteria defined in the plan

CRITICAL URL REQUIREMENTS:
- ONLY use EXACT API endpoints discovered through your research
- DO NOT modify, construct, or assume URL patterns
- Copy URLs EXACTLY from your tool results
- Add comments in JavaScript showing which research result provided each URL
- Include comprehensive error handling for all API calls

CRITICAL GEOJSON/MAP HANDLING:
- STAC GeoJSON often contains complex polygon geometries, not simple points
- For polygons: extract centroid or first coordinate pair for markers
- Always validate coordinates exist before creating markers

CRITICAL TEMPLATE INJECTION UNDERSTANDING:
Your generated content will be injected into this template structure:

{template}

DO NOT generate <html>, <head>, or <body> tags - only the content that goes inside!

Return ONLY a valid JSON object (no markdown, no explanations) with these exact fields:
{{
  "title": "Specific, actionable page title based on research",
  "description": "Clear description incorporating gathered intelligence",
  "main_content": "HTML body content ONLY (no html/head/body tags) with Bootstrap containers",
  "custom_css": "CSS rules ONLY (no <style> tags)",
  "custom_js": "JavaScript code ONLY (no <script> tags) with EXACT URLs from research"
}}

CRITICAL JSON FORMATTING:
- Escape all backslashes in strings (use \\ for single \)
- Escape all quotes in strings (use \" for ")
- No line breaks inside JSON string values - use \n instead
- Ensure all braces and brackets are properly matched"#,
        data_sources = context.data_sources_reference,
        template = PAGE_TEMPLATE_CONTRACT,
    )
}

/// User prompt for the generation phase.
pub fn generation_user_prompt(user_request: &str) -> String {
    format!(
        r#"CREATE A COMPREHENSIVE DISASTER RESPONSE APPLICATION FOR: {user_request}

Use the intelligence I've gathered to create an accurate, functional application that incorporates:
- Current news and events from web research
- Validated API endpoints and data sources
- Real data structures and sample content
- Specific geographic information and coordinates
- Recent developments and current situation

URL VALIDATION REQUIREMENTS:
- Every API call must reference a URL from your research results
- Add JavaScript comments like: "// URL from STAC validation tool result"
- Include the exact collection names and parameters you discovered
- Use error handling: try/catch blocks with fallback messages
- No invented endpoints - only researched ones

LIBRARY USAGE (all libraries are PRE-LOADED, never add script or link tags):
- Maps: const map = L.map('mapId').setView([lat, lng], zoom); always add an OpenStreetMap tile layer with attribution
- Charts: const ctx = document.getElementById('chartId').getContext('2d'); const chart = new Chart(ctx, config);
- Styling: Bootstrap classes (container, card, btn) are available directly

Make this a production-ready application that provides real value for disaster response."#
    )
}

/// System prompt for the URL-fix pass.
pub fn url_fix_system_prompt() -> String {
    r#"You are fixing invalid URLs in disaster response application code. The user has provided you with:
1. HTML content that contains invalid/inaccessible URLs
2. A list of the specific URLs that are failing
3. A list of valid URLs that were confirmed during research

Your task:
- Replace invalid URLs with valid alternatives from the research
- Remove or comment out API calls that can't be fixed
- Add proper error handling and fallback messages
- Keep all other content exactly the same

Return ONLY the corrected JSON with the same structure (title, description, main_content, custom_css, custom_js)."#
        .to_string()
}

/// User prompt for the URL-fix pass.
pub fn url_fix_user_prompt(
    invalid_urls_info: &[String],
    valid_urls_from_research: &[String],
    content_json: &str,
) -> String {
    let valid_block = if valid_urls_from_research.is_empty() {
        "No confirmed valid URLs found in research".to_string()
    } else {
        valid_urls_from_research.join("\n")
    };

    format!(
        r#"INVALID URLs DETECTED:
{invalid}

VALID URLs FROM RESEARCH:
{valid_block}

CURRENT HTML CONTENT TO FIX:
{content_json}

Please fix the invalid URLs by:
1. Replacing them with valid alternatives from research if available
2. Adding proper error handling with try/catch blocks
3. Including fallback messages like "Data source temporarily unavailable"
4. Commenting out or removing calls that cannot be fixed

Keep the title, description, and overall structure identical. Only fix the URL issues."#,
        invalid = invalid_urls_info.join("\n"),
    )
}
