//! The structural contract for generated project plans.
//!
//! The same types serve two purposes: they derive the response schema the
//! provider is constrained to, and they validate the accumulated stream
//! output at completion. A plan that fails to parse here failed schema
//! validation and is never persisted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A generated technology blueprint for a project idea.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPlan {
    /// The identifier assigned to this plan before generation started.
    pub id: String,
    /// Short project name.
    pub name: String,
    /// Clear description of what the project does.
    pub description: String,
    /// Most appropriate category, e.g. Web App, Mobile App, API, CLI Tool.
    pub category: String,
    /// Overall complexity assessment.
    pub complexity: Complexity,
    /// Assumptions about the team building the project.
    pub context: ProjectContext,
    /// Technology choices with reasoning, one per required role.
    pub tech_stack: Vec<TechChoice>,
    /// System design and component breakdown.
    pub architecture: Architecture,
    /// Key development phases with deliverables.
    pub phases: Vec<Phase>,
    /// What to learn, and in which order, before building.
    pub learning_path: LearningPath,
    /// Practices specific to the chosen technologies.
    pub best_practices: BestPractices,
    /// Key technical risks with mitigation strategies.
    pub risks: Vec<Risk>,
    /// Official documentation resources for the chosen technologies.
    pub resources: Vec<Resource>,
    /// Implementation roadmap from setup to deployment.
    pub roadmap: Roadmap,
}

/// Complexity rating of the whole project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Complexity {
    /// Buildable by a single developer in days.
    Simple,
    /// A few subsystems, weeks of work.
    Moderate,
    /// Many interacting subsystems or unusual scale.
    Complex,
}

/// Assumptions about who is building the project and under which constraints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectContext {
    /// Assumed team size.
    pub team_size: String,
    /// Assumed developer experience level.
    pub experience_level: String,
    /// Assumed project timeline.
    pub timeline: String,
    /// Assumed budget constraints.
    pub budget: String,
}

/// A single technology decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TechChoice {
    /// Specific technology name, e.g. "React", "PostgreSQL".
    pub name: String,
    /// The role this technology fills, e.g. frontend, backend, database,
    /// deployment, AI integration.
    pub role: String,
    /// Why this technology is the best choice.
    pub reasoning: String,
    /// Alternatives considered and why they were not chosen.
    pub alternatives: Vec<String>,
    /// Difficulty level for the assumed team.
    pub difficulty: Difficulty,
    /// Key benefits this technology brings to the project.
    pub benefits: Vec<String>,
    /// Community support and ecosystem health.
    pub community: String,
    /// Cost implications: licensing, infrastructure.
    pub cost: String,
}

/// How hard a technology is to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Difficulty {
    /// Productive within days.
    #[serde(rename = "Beginner-friendly")]
    BeginnerFriendly,
    /// Requires prior exposure to similar tools.
    Intermediate,
    /// Expect a steep learning curve.
    Advanced,
}

/// System design for the project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Architecture {
    /// Architecture pattern, e.g. "MVC", "Microservices", "JAMstack".
    pub pattern: String,
    /// Detailed description of system design and components.
    pub description: String,
    /// Integration strategy with existing systems or third-party services.
    pub integrations: String,
}

/// A development phase.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Phase {
    /// Phase name.
    pub name: String,
    /// Deliverables of this phase.
    pub description: String,
}

/// Recommended learning path for the team.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LearningPath {
    /// Knowledge needed before starting.
    pub prerequisites: Vec<String>,
    /// Recommended study order for the chosen technologies.
    pub study_order: Vec<String>,
    /// Estimated learning curve for the assumed experience level.
    pub learning_curve: String,
}

/// Practices and strategies specific to the chosen stack.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BestPractices {
    /// Development practices for the chosen technologies.
    pub development: Vec<String>,
    /// Security considerations with recommended tools.
    pub security: Vec<String>,
    /// Testing strategy with specific frameworks.
    pub testing: Vec<String>,
    /// Performance optimization strategies.
    pub performance: Vec<String>,
}

/// A technical risk and how to handle it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Risk {
    /// The risk associated with the recommended stack.
    pub risk: String,
    /// A practical mitigation strategy.
    pub mitigation: String,
}

/// An official documentation resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Resource {
    /// Descriptive name of the documentation.
    pub title: String,
    /// What the documentation covers and why it matters for the project.
    pub description: String,
    /// URL of the official documentation.
    pub url: String,
}

/// Implementation roadmap from first setup to production.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Roadmap {
    /// Initial setup and first steps.
    pub getting_started: String,
    /// Basic project structure and core infrastructure.
    pub foundation: String,
    /// Main feature development with the selected stack.
    pub core_development: String,
    /// Connecting components and third-party services.
    pub integration: String,
    /// Testing strategy implementation.
    pub testing: String,
    /// Production deployment and monitoring.
    pub deployment: String,
    /// Common challenges with this stack and their solutions.
    pub challenges: Vec<String>,
    /// Future enhancement and scaling possibilities.
    pub enhancements: Vec<String>,
}

/// Derive the provider-side response schema from [`ProjectPlan`].
///
/// Subschemas are inlined and JSON Schema keywords the Gemini API rejects
/// are stripped.
pub(crate) fn response_schema() -> serde_json::Value {
    let mut settings = schemars::generate::SchemaSettings::default();
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<ProjectPlan>();

    let mut value = serde_json::to_value(schema).expect("a derived schema always serializes");
    sanitize_for_gemini(&mut value);

    value
}

/// Recursively removes JSON Schema keywords the Gemini API does not accept,
/// and rewrites `"type": [T, "null"]` unions into `nullable`.
fn sanitize_for_gemini(value: &mut serde_json::Value) {
    let Some(obj) = value.as_object_mut() else {
        if let Some(items) = value.as_array_mut() {
            for item in items {
                sanitize_for_gemini(item);
            }
        }
        return;
    };

    obj.remove("$schema");
    obj.remove("title");
    obj.remove("additionalProperties");
    obj.remove("format");

    if let Some(serde_json::Value::Array(types)) = obj.get("type") {
        let concrete = types
            .iter()
            .find(|t| t.as_str() != Some("null"))
            .cloned()
            .unwrap_or(serde_json::Value::String("string".to_string()));

        let nullable = types.iter().any(|t| t.as_str() == Some("null"));

        obj.insert("type".to_string(), concrete);

        if nullable {
            obj.insert("nullable".to_string(), serde_json::Value::Bool(true));
        }
    }

    for child in obj.values_mut() {
        sanitize_for_gemini(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> serde_json::Value {
        serde_json::json!({
            "id": "5d2c9f5e-18ad-41a9-9bbd-9c2c247fd2a4",
            "name": "DishSwap",
            "description": "A mobile app for sharing and discovering recipes.",
            "category": "Mobile App",
            "complexity": "Moderate",
            "context": {
                "teamSize": "2-3 developers",
                "experienceLevel": "Intermediate",
                "timeline": "3-4 months",
                "budget": "Low, open-source preferred"
            },
            "techStack": [{
                "name": "React Native",
                "role": "frontend",
                "reasoning": "One codebase for iOS and Android.",
                "alternatives": ["Flutter"],
                "difficulty": "Intermediate",
                "benefits": ["Large ecosystem"],
                "community": "Very active",
                "cost": "Free and open source"
            }],
            "architecture": {
                "pattern": "Client-server",
                "description": "Mobile client talking to a REST API.",
                "integrations": "None required initially."
            },
            "phases": [{"name": "MVP", "description": "Recipe feed and upload."}],
            "learningPath": {
                "prerequisites": ["JavaScript"],
                "studyOrder": ["React", "React Native"],
                "learningCurve": "A few weeks for an intermediate team."
            },
            "bestPractices": {
                "development": ["Use TypeScript"],
                "security": ["Validate uploads"],
                "testing": ["Jest"],
                "performance": ["Image compression"]
            },
            "risks": [{"risk": "App store review delays", "mitigation": "Submit early."}],
            "resources": [{
                "title": "React Native docs",
                "description": "Official getting started guide.",
                "url": "https://reactnative.dev/docs/getting-started"
            }],
            "roadmap": {
                "gettingStarted": "Scaffold with Expo.",
                "foundation": "Navigation and auth screens.",
                "coreDevelopment": "Recipe CRUD and feed.",
                "integration": "Push notifications.",
                "testing": "Component and e2e tests.",
                "deployment": "App store releases.",
                "challenges": ["Offline support"],
                "enhancements": ["Social features"]
            }
        })
    }

    #[test]
    fn schema_valid_plan_parses() {
        let plan: ProjectPlan = serde_json::from_value(sample_plan()).unwrap();

        assert_eq!(plan.name, "DishSwap");
        assert_eq!(plan.category, "Mobile App");
        assert_eq!(plan.complexity, Complexity::Moderate);
        assert_eq!(plan.tech_stack.len(), 1);
        assert_eq!(plan.id, "5d2c9f5e-18ad-41a9-9bbd-9c2c247fd2a4");
    }

    #[test]
    fn missing_required_field_fails_validation() {
        let mut plan = sample_plan();
        plan.as_object_mut().unwrap().remove("techStack");

        let result: Result<ProjectPlan, _> = serde_json::from_value(plan);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_difficulty_fails_validation() {
        let mut plan = sample_plan();
        plan["techStack"][0]["difficulty"] = serde_json::json!("Wizard");

        let result: Result<ProjectPlan, _> = serde_json::from_value(plan);
        assert!(result.is_err());
    }

    #[test]
    fn response_schema_has_no_unsupported_keywords() {
        let schema = response_schema();
        let rendered = schema.to_string();

        assert!(!rendered.contains("$schema"));
        assert!(!rendered.contains("$ref"));
        assert!(!rendered.contains("additionalProperties"));

        // Spot-check that nesting survived inlining.
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["techStack"]["type"], "array");
        assert_eq!(
            schema["properties"]["complexity"]["enum"],
            serde_json::json!(["Simple", "Moderate", "Complex"])
        );
    }

    #[test]
    fn plan_round_trips_through_serialization() {
        let plan: ProjectPlan = serde_json::from_value(sample_plan()).unwrap();
        let value = serde_json::to_value(&plan).unwrap();

        assert_eq!(value["techStack"][0]["difficulty"], "Intermediate");
        assert_eq!(value["roadmap"]["gettingStarted"], "Scaffold with Expo.");
    }
}
