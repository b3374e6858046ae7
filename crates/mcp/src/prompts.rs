// Prompt templates offered to clients

use crate::protocol::{GetPromptResult, Prompt, PromptArgument, PromptMessage};
use crate::render;
use crate::workspace::Workspace;
use atelier_core::analysis::{
    analyze_dependencies, analyze_structure, DependencyOptions, StructureOptions,
};
use std::collections::HashMap;

const REVIEW_FOCUS: &[&str] = &["general", "security", "performance", "style"];
const EXPLAIN_LEVELS: &[&str] = &["beginner", "intermediate", "expert"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid value '{value}' for '{name}', expected one of: {expected}")]
    InvalidChoice {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("{0}")]
    Denied(String),
}

/// Builds prompt messages from arguments
pub struct PromptRegistry {
    workspace: Workspace,
}

impl PromptRegistry {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn list(&self) -> Vec<Prompt> {
        vec![
            Prompt {
                name: "code_review".to_string(),
                description: Some("Ask for a review of a code snippet".to_string()),
                arguments: vec![
                    argument("code", "The code to review", true),
                    argument("language", "Programming language of the snippet", false),
                    argument("focus", "general, security, performance or style", false),
                ],
            },
            Prompt {
                name: "explain_concept".to_string(),
                description: Some("Ask for an explanation of a programming concept".to_string()),
                arguments: vec![
                    argument("concept", "The concept to explain", true),
                    argument("level", "beginner, intermediate or expert", false),
                ],
            },
            Prompt {
                name: "project_overview".to_string(),
                description: Some(
                    "Summarize a project using its directory layout and dependencies".to_string(),
                ),
                arguments: vec![argument(
                    "path",
                    "Project directory relative to the workspace root",
                    true,
                )],
            },
        ]
    }

    pub fn get(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<GetPromptResult, PromptError> {
        match name {
            "code_review" => code_review(arguments),
            "explain_concept" => explain_concept(arguments),
            "project_overview" => self.project_overview(arguments),
            other => Err(PromptError::UnknownPrompt(other.to_string())),
        }
    }

    fn project_overview(
        &self,
        arguments: &HashMap<String, String>,
    ) -> Result<GetPromptResult, PromptError> {
        let path = required(arguments, "path")?;
        let root = self
            .workspace
            .resolve(path)
            .map_err(|e| PromptError::Denied(e.to_string()))?;

        let structure = analyze_structure(
            &root,
            &StructureOptions {
                max_depth: Some(2),
                show_hidden: false,
                budget: self.workspace.budget(),
            },
        );
        let dependencies = analyze_dependencies(&root, &DependencyOptions::default());

        let text = format!(
            "Give an overview of the project at `{path}`: what it does, how it is organised, \
             and which dependencies matter most.\n\n\
             Directory structure:\n```\n{}```\n\nDependencies:\n```\n{}```",
            render::structure(&structure),
            render::dependencies(&dependencies),
        );

        Ok(GetPromptResult {
            description: Some(format!("Project overview for {}", path)),
            messages: vec![PromptMessage::user(text)],
        })
    }
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: Some(description.to_string()),
        required,
    }
}

fn required<'a>(
    arguments: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, PromptError> {
    arguments
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(PromptError::MissingArgument(name))
}

fn choice<'a>(
    arguments: &'a HashMap<String, String>,
    name: &'static str,
    allowed: &[&'static str],
) -> Result<&'a str, PromptError> {
    match arguments.get(name).map(String::as_str) {
        None | Some("") => Ok(allowed[0]),
        Some(value) if allowed.contains(&value) => Ok(value),
        Some(value) => Err(PromptError::InvalidChoice {
            name,
            value: value.to_string(),
            expected: allowed.join(", "),
        }),
    }
}

fn code_review(arguments: &HashMap<String, String>) -> Result<GetPromptResult, PromptError> {
    let code = required(arguments, "code")?;
    let language = arguments
        .get("language")
        .map(String::as_str)
        .filter(|l| !l.is_empty());
    let focus = choice(arguments, "focus", REVIEW_FOCUS)?;

    let focus_line = match focus {
        "security" => "Concentrate on security issues such as injection, unsafe input handling and secrets.",
        "performance" => "Concentrate on performance: algorithmic complexity, allocations and I/O.",
        "style" => "Concentrate on readability, naming and idiomatic style.",
        _ => "Point out bugs, design problems and readability issues.",
    };

    let text = format!(
        "Please review the following {} code. {}\n\n```{}\n{}\n```",
        language.unwrap_or("source"),
        focus_line,
        language.unwrap_or_default(),
        code
    );

    Ok(GetPromptResult {
        description: Some(format!("Code review ({} focus)", focus)),
        messages: vec![PromptMessage::user(text)],
    })
}

fn explain_concept(arguments: &HashMap<String, String>) -> Result<GetPromptResult, PromptError> {
    let concept = required(arguments, "concept")?;
    let level = choice(arguments, "level", EXPLAIN_LEVELS)?;

    let audience = match level {
        "expert" => "an experienced engineer; be precise and cover trade-offs and edge cases",
        "intermediate" => "a developer who knows the basics; include a short example",
        _ => "someone new to programming; use plain language and an analogy",
    };

    Ok(GetPromptResult {
        description: Some(format!("Explain {} ({})", concept, level)),
        messages: vec![PromptMessage::user(format!(
            "Explain the concept of \"{}\" for {}.",
            concept, audience
        ))],
    })
}
