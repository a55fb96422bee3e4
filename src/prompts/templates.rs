/*!
 * Prompt templates for the draft, refine and term-suggestion stages.
 *
 * Templates are plain strings with named placeholders. Rendering is string
 * substitution only; validation makes sure each stage's template carries the
 * placeholders that stage needs.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;

/// Placeholder for the source chunk text
pub const ENGLISH_CHUNK: &str = "{english_chunk}";

/// Placeholder for the draft translation
pub const KOREAN_DRAFT: &str = "{korean_draft}";

/// Placeholder for the final translation
pub const FINAL_KOREAN_TEXT: &str = "{final_korean_text}";

/// Regex matching any known placeholder
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(?:english_chunk|korean_draft|final_korean_text)\}")
        .expect("Invalid placeholder regex")
});

/// Prompt-producing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// First-pass translation
    Draft,
    /// Improvement of a draft translation
    Refine,
    /// Extraction of new glossary terms
    Suggestion,
}

impl Stage {
    /// Placeholders a template for this stage must contain.
    pub fn required_placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::Draft => &[ENGLISH_CHUNK],
            Self::Refine => &[ENGLISH_CHUNK, KOREAN_DRAFT],
            Self::Suggestion => &[ENGLISH_CHUNK, FINAL_KOREAN_TEXT],
        }
    }

    /// Built-in template for this stage.
    pub fn default_template(&self) -> &'static str {
        match self {
            Self::Draft => PromptTemplate::DRAFT,
            Self::Refine => PromptTemplate::REFINE,
            Self::Suggestion => PromptTemplate::SUGGESTION,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Refine => "refine",
            Self::Suggestion => "suggestion",
        };
        f.write_str(name)
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PromptVars<'a> {
    /// Source chunk text
    pub english_chunk: &'a str,
    /// Draft translation
    pub korean_draft: &'a str,
    /// Final translation
    pub final_korean_text: &'a str,
}

impl<'a> PromptVars<'a> {
    /// Variables for the given chunk text.
    pub fn for_chunk(english_chunk: &'a str) -> Self {
        Self {
            english_chunk,
            ..Default::default()
        }
    }

    /// Add the draft translation.
    pub fn with_draft(mut self, korean_draft: &'a str) -> Self {
        self.korean_draft = korean_draft;
        self
    }

    /// Add the final translation.
    pub fn with_final_text(mut self, final_korean_text: &'a str) -> Self {
        self.final_korean_text = final_korean_text;
        self
    }
}

/// A validated template for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Default first-pass translation prompt.
    pub const DRAFT: &'static str = r#"너는 전문 번역가야.
직전의 문맥을 파악하여 아래 영문 원본을 한국어로 번역해 줘.
용어 번역시 'Translation glossary.txt' 파일의 용어에 맞추어 번역해줘.
법률/규정 문서에 사용될 수 있도록, 전문적이고 격식 있는 톤을 유지해야 해.

[영어 원본]
{english_chunk}
[/영어 원본]"#;

    /// Default refinement prompt. Asks for the marker-delimited answer format.
    pub const REFINE: &'static str = r#"너는 최고의 한국어 법률 번역 전문가야.
직전의 문맥을 파악하여 아래의 <영어 원문>과 AI가 번역한 <초벌 번역문>을 비교해서, 번역이 어색하거나 오역된 부분을 찾아 수정하고, 더 자연스럽고 전문적인 한국어 법률 문서로 개선해 줘.
용어 번역시 'Translation glossary.txt' 파일의 번역용어에 맞추어 번역해줘.

[영어 원문]
{english_chunk}
[/영어 원본]

[초벌 번역문]
{korean_draft}
[/초벌 번역문]


결과물은 아래 형식에 맞춰서, 개선된 번역문과 수정 이유를 명확히 구분해서 작성해줘.

---번역문 시작---
[여기에 개선된 번역문만 작성]
---번역문 끝---

---수정 이유 시작---
[여기에 수정 이유만 작성]
---수정 이유 끝---"#;

    /// Default term-suggestion prompt. Asks for `[source] - [target]` lines.
    pub const SUGGESTION: &'static str = r#"너는 용어 추출 전문가야.
아래 <영어 원문>과 <최종 한국어 번역문>을 비교 분석해서, 'Translation glossary.txt' 파일에 추가할 만한 핵심 용어들을 추출해 줘.
결과는 반드시 '[원문 용어] - [번역 용어]' 형식으로, 한 줄에 하나씩만 정리해서 보여줘. 다른 설명은 필요 없어.

[영어 원본]
{english_chunk}
[/영어 원본]

[최종 한국어 번역문]
{final_korean_text}
[/최종 한국어 번역문]"#;

    /// Validate and create a template. Surrounding whitespace is trimmed.
    pub fn new(stage: Stage, template: &str) -> Result<Self, ConfigError> {
        Self::validate(stage, template)?;
        Ok(Self {
            template: template.trim().to_string(),
        })
    }

    /// The built-in template for a stage.
    pub fn builtin(stage: Stage) -> Self {
        Self {
            template: stage.default_template().to_string(),
        }
    }

    /// Check that `template` contains every placeholder `stage` requires.
    pub fn validate(stage: Stage, template: &str) -> Result<(), ConfigError> {
        match stage
            .required_placeholders()
            .iter()
            .copied()
            .find(|placeholder| !template.contains(*placeholder))
        {
            Some(placeholder) => Err(ConfigError::MissingPlaceholder {
                stage,
                placeholder,
            }),
            None => Ok(()),
        }
    }

    /// Raw template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute the placeholders in a single pass, so substituted text is
    /// never scanned for placeholders again.
    pub fn render(&self, vars: &PromptVars<'_>) -> String {
        PLACEHOLDER_REGEX
            .replace_all(&self.template, |caps: &Captures<'_>| {
                match caps.get(0).map_or("", |m| m.as_str()) {
                    ENGLISH_CHUNK => vars.english_chunk.to_string(),
                    KOREAN_DRAFT => vars.korean_draft.to_string(),
                    FINAL_KOREAN_TEXT => vars.final_korean_text.to_string(),
                    other => other.to_string(),
                }
            })
            .into_owned()
    }
}

/// The three templates a session renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// First-pass translation template
    pub draft: PromptTemplate,
    /// Refinement template
    pub refine: PromptTemplate,
    /// Term-suggestion template
    pub suggestion: PromptTemplate,
}

impl PromptSet {
    /// Validate three template strings.
    pub fn new(draft: &str, refine: &str, suggestion: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            draft: PromptTemplate::new(Stage::Draft, draft)?,
            refine: PromptTemplate::new(Stage::Refine, refine)?,
            suggestion: PromptTemplate::new(Stage::Suggestion, suggestion)?,
        })
    }

    /// Render the draft-stage prompt.
    pub fn draft_prompt(&self, chunk_text: &str) -> String {
        self.draft.render(&PromptVars::for_chunk(chunk_text))
    }

    /// Render the refine-stage prompt.
    pub fn refine_prompt(&self, chunk_text: &str, draft: &str) -> String {
        self.refine
            .render(&PromptVars::for_chunk(chunk_text).with_draft(draft))
    }

    /// Render the term-suggestion prompt.
    pub fn suggestion_prompt(&self, chunk_text: &str, final_text: &str) -> String {
        self.suggestion
            .render(&PromptVars::for_chunk(chunk_text).with_final_text(final_text))
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            draft: PromptTemplate::builtin(Stage::Draft),
            refine: PromptTemplate::builtin(Stage::Refine),
            suggestion: PromptTemplate::builtin(Stage::Suggestion),
        }
    }
}
