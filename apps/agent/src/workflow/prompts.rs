//! Prompt templates for the workflow nodes. Placeholders are filled with
//! `str::replace` at the call site.

pub const EXTRACT_SKILLS_PROMPT: &str = r#"Extract all required technical and soft skills from this job description:

JOB TITLE: {job_title}
LOCATION: {location}

DESCRIPTION:
{job_description}

Return skills as a comma-separated list. Be specific and include both hard and soft skills."#;

pub const THINK_PROMPT: &str = r#"You are a career development agent analyzing a job opportunity.

JOB: {job_title} at {location}
REQUIRED SKILLS: {required_skills}
CURRENT SKILLS: {current_skills}
SKILL GAPS: {skill_gaps}
GITHUB PROFILE: {github_profile}

AVAILABLE TOOLS:
1. rag_query - Deep dive into learning resources and advanced insights
2. skill_validator - Validate skills, check relevance, prerequisites
3. market_research - Research salary, trends, competitor skills
4. gap_analyzer - Detailed gap analysis with difficulty and priority
5. learning_path_generator - Create personalized learning plan
6. github_analyzer - Analyze GitHub profile for proven skills and projects ({github_tool_availability})

Previous tool calls: {tools_used} / {max_tool_calls}

Decide which tools you need to call NEXT to build a comprehensive analysis.
Think about what information you still need.

Return JSON with:
{
    "reasoning": "why you're choosing these tools",
    "selected_tools": ["tool_name1", "tool_name2"],
    "should_continue": true/false,
    "next_action": "brief description of next action"
}"#;

pub const REFLECT_PROMPT: &str = r#"Reflect on the analysis results gathered so far:

Gap Analysis: {has_gap_analysis}
RAG Insights: {has_rag_results}
Skill Validation: {has_skill_validation}
GitHub Analysis: {has_github_analysis}

Information Quality Score: {info_quality}
Tools Used: {tools_used}

Is the information sufficient to generate a high-quality learning plan?
Do we need to gather more insights?

Respond with JSON:
{
    "quality_assessment": "score 0-1",
    "information_sufficient": true/false,
    "missing_insights": ["list of missing insights"],
    "confidence_in_plan": 0.0-1.0
}"#;

pub const GENERATE_PLAN_PROMPT: &str = r#"Based on comprehensive analysis, create a detailed learning plan:

JOB TARGET: {job_title} at {location}

{insights}

Generate a prioritized, actionable learning plan with:
1. Phase-based approach (short-term, medium-term, long-term)
2. Specific skills to learn in order
3. Estimated time for each skill
4. Learning resources and approaches
5. Milestones and checkpoints
6. Success metrics

Make it practical and achievable."#;
