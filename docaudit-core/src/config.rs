use crate::error::AuditError;
use crate::rules::validation::validate_schema;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;

// Default value functions for serde
fn default_section_boundary() -> String {
    "## ".to_string()
}

fn default_prefix() -> String {
    "## ".to_string()
}

fn default_number_pattern() -> String {
    r"^(\d+)".to_string()
}

fn default_part_pattern() -> String {
    r"Part\d+".to_string()
}

fn default_high_coverage_threshold() -> u32 {
    10
}

/// Decorative tokens that commonly precede category headings.
const CATEGORY_DECORATIONS: &[&str] = &[
    "📚", "🤔", "🔍", "🌟", "💡", "🔧", "🏢", "👨\u{200D}💻", "🚀", "❓", "📝", "🎯", "👉",
];

/// Heading prefix used by category rules: any heading level or a blockquote,
/// optionally numbered ("## 3. ", "### 3.1 ").
const CATEGORY_PREFIX: &str = r"(?:#{1,6} |> )(?:\d+(?:\.\d+)*\.? )?";

/// The checklist schema and the conventions the audit runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Regex fragment, anchored at line start, for the generic top-level
    /// heading that ends a section span
    #[serde(default = "default_section_boundary")]
    pub section_boundary: String,
    /// Rules every document must satisfy to be fully compliant
    #[serde(default = "default_checklist")]
    pub checklist: Vec<RuleConfig>,
    /// Structural categories counted for chapter coverage
    #[serde(default = "default_categories")]
    pub categories: Vec<RuleConfig>,
    #[serde(default)]
    pub chapter: ChapterConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Count nested items between the marker and the next top-level heading
    #[default]
    Section,
    /// Count nested items anywhere in the document (still 0 when the marker is absent)
    Document,
}

/// One declarative checklist rule.
///
/// The marker compiles to `^(?:<prefix>)(?:<decoration>\s*)?(?:<text>|<alias>...)`.
/// `prefix`, `text` and `aliases` are regex fragments; `decorations` are literal
/// tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    /// Human-readable name used in missing-item entries (falls back to `id`)
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<String>,
    /// Nested-item regex fragment, anchored at line start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    /// Minimum number of nested items; absent means presence-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<i64>,
    #[serde(default)]
    pub scope: RuleScope,
    /// Informational sub-counts inside the same scope, name -> regex fragment
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tallies: BTreeMap<String, String>,
}

impl RuleConfig {
    /// Presence-only rule for a `## ` heading
    pub fn section(id: &str, label: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            prefix: default_prefix(),
            text: text.to_string(),
            aliases: Vec::new(),
            decorations: Vec::new(),
            items: None,
            min_count: None,
            scope: RuleScope::Section,
            tallies: BTreeMap::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_decorations(mut self, decorations: &[&str]) -> Self {
        self.decorations = decorations.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Require at least `min_count` lines matching `items` inside the section
    pub fn counting(mut self, items: &str, min_count: i64) -> Self {
        self.items = Some(items.to_string());
        self.min_count = Some(min_count);
        self
    }

    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_tally(mut self, name: &str, pattern: &str) -> Self {
        self.tallies.insert(name.to_string(), pattern.to_string());
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    pub fn is_count_rule(&self) -> bool {
        self.min_count.is_some()
    }
}

/// Filename conventions and the coverage policy for chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Regex whose first capture group is the chapter number
    #[serde(default = "default_number_pattern")]
    pub number_pattern: String,
    /// Regex that marks a file as one part of a split chapter
    #[serde(default = "default_part_pattern")]
    pub part_pattern: String,
    /// Satisfied categories needed for a unified chapter to be high-coverage
    #[serde(default = "default_high_coverage_threshold")]
    pub high_coverage_threshold: u32,
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            number_pattern: default_number_pattern(),
            part_pattern: default_part_pattern(),
            high_coverage_threshold: default_high_coverage_threshold(),
        }
    }
}

/// Learning-document checklist: front matter lines plus the required sections,
/// four of which need a minimum number of numbered entries.
fn default_checklist() -> Vec<RuleConfig> {
    vec![
        RuleConfig::section("learning_goal", "학습목표", r"\*\*학습 목표\*\*:").with_prefix("> "),
        RuleConfig::section("time_estimate", "예상시간", r"예상 학습 시간\*\*:")
            .with_prefix(r"\*\*")
            .with_decorations(&["\u{23F1}\u{FE0F}", "\u{23F1}"]),
        RuleConfig::section("difficulty", "난이도", r"\*\*난이도\*\*:").with_prefix(""),
        RuleConfig::section("toc", "목차", "목차").with_decorations(&["📚"]),
        RuleConfig::section("why", "왜필요", "왜"),
        RuleConfig::section("analogies", "비유", "실생활 비유")
            .with_decorations(&["🔍", "🌟"])
            .counting(r"### 비유 \d+", 2),
        RuleConfig::section("scenarios", "주니어시나리오", "주니어 시나리오")
            .with_decorations(&["👨\u{200D}💻"])
            .counting(r"### 시나리오 \d+", 3),
        RuleConfig::section("faq", "FAQ", "FAQ")
            .with_decorations(&["❓"])
            .counting("### [Q❓]", 3),
        RuleConfig::section("interview", "면접질문", "면접 질문")
            .with_decorations(&["📝"])
            .counting(r"\*\*Q\d+\*\*:|#### [Q❓]\d+", 5)
            .with_tally("junior", "#### 주니어")
            .with_tally("mid", "#### 중급"),
    ]
}

fn category(id: &str, label: &str, text: &str) -> RuleConfig {
    RuleConfig::section(id, label, text)
        .with_prefix(CATEGORY_PREFIX)
        .with_decorations(CATEGORY_DECORATIONS)
}

/// The twelve structural categories of a unified chapter.
fn default_categories() -> Vec<RuleConfig> {
    vec![
        category("learning_goal", "학습목표", r"(?:\*\*)?학습 목표"),
        category("why_needed", "왜필요한가", "왜 필요한가"),
        category("analogy", "비유", "비유로 이해하기").with_aliases(&["실생활 비유"]),
        category("core_concepts", "핵심개념", "핵심 개념"),
        category("basic_practice", "기본실습", "기본 실습"),
        category("real_world", "실무활용", "실무 활용").with_aliases(&["기업 사례"]),
        category("junior_scenario", "주니어시나리오", "주니어"),
        category("project", "실전프로젝트", "실전 프로젝트"),
        category("faq", "FAQ", "FAQ").with_aliases(&["자주 묻는 질문"]),
        category("interview", "면접질문", "면접 질문"),
        category("summary", "핵심정리", "핵심 정리").with_aliases(&["핵심 내용 정리"]),
        category("next_steps", "다음단계", "다음 단계"),
    ]
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            section_boundary: default_section_boundary(),
            checklist: default_checklist(),
            categories: default_categories(),
            chapter: ChapterConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Load config from a YAML file and check it against the schema contract
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {path}"))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid schema file {path}"))?;
        Ok(config)
    }

    /// Parse and validate a schema. Malformed YAML, unknown values and missing
    /// fields are all reported as `AuditError::SchemaConfig`.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AuditConfig = serde_yaml::from_str(content)
            .map_err(|e| AuditError::schema("<schema>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in schema when no path is given. A path that fails to load is an
    /// error, never a silent fallback.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        validate_schema(self)
    }

    /// SHA-256 of the serialized schema, stamped on reports
    pub fn fingerprint(&self) -> Result<String> {
        let config_json = serde_json::to_string(self)
            .context("Failed to serialize schema for fingerprinting")?;

        let mut hasher = Sha256::new();
        hasher.update(config_json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
