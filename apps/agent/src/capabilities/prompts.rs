// Prompt constants for the LLM-backed analysis capabilities.

/// Skill validation prompt. Replace `{required_skills}` and `{current_skills}`.
pub const SKILL_VALIDATION_PROMPT: &str = r#"Analyze these skills from a validation perspective:

REQUIRED SKILLS: {required_skills}
CURRENT SKILLS: {current_skills}

For each required skill, provide:
1. Is it current/relevant today?
2. What are prerequisite skills?
3. How rare/valuable is this skill?
4. Market demand (high/medium/low)

Format as structured analysis."#;

/// Market research prompt. Replace `{job_title}`, `{location}`, `{required_skills}`.
pub const MARKET_RESEARCH_PROMPT: &str = r#"Research the job market for:
JOB TITLE: {job_title}
LOCATION: {location}
REQUIRED SKILLS: {required_skills}

Provide:
1. Typical salary range for this role
2. Most in-demand skills for this role
3. Career progression path
4. Market demand level (high/medium/low)
5. Top competitors' skill profile
6. Emerging skills to watch

Format as structured analysis."#;

/// First gap-analysis step: name the gaps.
/// Replace `{required_skills}` and `{current_skills}`.
pub const GAP_LIST_PROMPT: &str = r#"Compare the skill sets below and list the skills the candidate is missing.

REQUIRED SKILLS: {required_skills}
CURRENT SKILLS: {current_skills}

Return ONLY the missing skills as a comma-separated list, nothing else."#;

/// Second gap-analysis step: detail each gap. Replace `{gaps}`.
pub const GAP_DETAIL_PROMPT: &str = r#"For these skill gaps, provide:
GAPS: {gaps}

For each gap:
1. Learning difficulty (1-10)
2. Time to learn (days/weeks/months)
3. Priority level (critical/important/nice-to-have)
4. Dependencies on other skills
5. Best learning approach

Format as a prioritized learning roadmap."#;

/// Learning-path drafting prompt. Replace `{job_title}` and `{gaps}`.
pub const LEARNING_PATH_PROMPT: &str = r#"Create a personalized learning path toward the role of {job_title}.

SKILL GAPS TO CLOSE: {gaps}

Order the skills by dependency, give a timeline for each, and suggest one
concrete resource or practice project per skill."#;
