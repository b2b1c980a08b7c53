// Prompt templates for resume generation, scoring, and feedback.
// Every system instruction is: preamble + sample document + task.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NUMBER_ONLY_INSTRUCTION};

const PREAMBLE: &str = "\
You write resumes for a living and know what recruiters in many industries look for. \
You produce resume content as JSON, one key per section, following the sample below exactly. \
Write in a professional voice: start bullet points with strong action verbs, \
quantify results where the input supports it, and use the vocabulary of the candidate's field. \
Never invent employers, schools, dates, or credentials the input does not mention.

Sections:
- title: a short name for the resume
- personal: name and contact details
- summary: two to four sentences about the candidate
- experience: jobs, most recent first
- education: degrees and schools
- skills: one entry per skill, grouped by category, proficiency 1 to 5
- projects, certifications, languages, awards, publications, references: as shown

Formatting rules:
1. Dates are YYYY-MM-DD. Leave end_date empty for a current position.
2. Keep every key from the sample; use an empty list for sections with no content.
3. Descriptions are plain text; separate bullet points with new lines.

Sample:
";

const SAMPLE_RESUME_JSON: &str = r#"{
  "title": "Senior Backend Engineer",
  "personal": {
    "full_name": "Alex Morgan",
    "email": "alex.morgan@example.com",
    "phone": "+1 555 010 2030",
    "location": "Austin, TX",
    "website": "https://alexmorgan.dev"
  },
  "summary": "Backend engineer with eight years of experience building payment and data platforms.",
  "experience": [
    {
      "company": "Northwind Payments",
      "position": "Senior Software Engineer",
      "start_date": "2020-03-01",
      "end_date": "",
      "is_current": true,
      "location": "Austin, TX",
      "description": "Led the migration of the settlement service to an event-driven design.\nCut batch reconciliation time from 6 hours to 40 minutes.",
      "technologies": "Rust, PostgreSQL, Kafka",
      "achievements": "Engineering excellence award 2022"
    }
  ],
  "education": [
    {
      "institution": "University of Texas",
      "degree": "Bachelor of Science",
      "field_of_study": "Computer Science",
      "start_date": "2012-09-01",
      "end_date": "2016-05-31",
      "location": "Austin, TX",
      "gpa": 3.7,
      "description": "Teaching assistant for Operating Systems"
    }
  ],
  "skills": [
    { "name": "Rust", "category": "Languages", "proficiency_level": 5, "years_of_experience": 4 },
    { "name": "PostgreSQL", "category": "Databases", "proficiency_level": 4, "years_of_experience": 7 }
  ],
  "projects": [
    {
      "name": "Ledger CLI",
      "description": "Open-source double-entry bookkeeping tool.",
      "role": "Maintainer",
      "technologies": "Rust",
      "link": "https://github.com/example/ledger",
      "start_date": "2021-01-01",
      "end_date": "",
      "is_ongoing": true
    }
  ],
  "certifications": [
    {
      "name": "AWS Certified Solutions Architect",
      "issuing_organization": "Amazon Web Services",
      "issue_date": "2022-02-01",
      "expiry_date": "2025-02-01",
      "credential_id": "AWS-000-111"
    }
  ],
  "languages": [
    { "name": "English", "proficiency_level": "Native", "speaking": 5, "writing": 5, "reading": 5, "listening": 5 }
  ],
  "awards": [
    {
      "title": "Hackathon Winner",
      "issuing_organization": "Austin Tech Week",
      "date_received": "2019-10-12",
      "description": "First place out of 60 teams"
    }
  ],
  "publications": [
    {
      "title": "Idempotent Payment Pipelines",
      "publisher": "ACM Queue",
      "publication_date": "2023-04-01",
      "authors": "Alex Morgan",
      "type": "Article"
    }
  ],
  "references": [
    { "name": "Sam Lee", "company": "Northwind Payments", "position": "VP Engineering", "relationship": "Manager" }
  ]
}
"#;

const BUILD_RESUME_TASK: &str = "
Task: write a complete resume from the user's prompt, using every section of the sample. \
Fill sections the prompt says nothing about with empty lists.";

const BUILD_SECTION_TASK: &str = "
Task: write content for the one section named in the prompt, consistent with the current resume \
that follows it. Return a JSON object in the sample format that contains the title and that section only.";

const BUILD_FROM_JOBS_TASK: &str = "
Task: tailor the current resume to the job descriptions in the prompt. \
Bring forward the skills and experience that match the requirements and add the keywords recruiters \
will search for. When 'Use current resume info' is true, keep every fact from the current resume \
and improve only the wording. When it is false, write a new, realistic profile for the jobs. \
Return the complete resume.";

const SCORE_TASK: &str = "
Task: rate the resume in the prompt from 0 to 100, considering presentation, relevance and quality of content, \
use of action verbs and measurable results, how well the skills match industry expectations, and completeness.";

const FEEDBACK_TASK: &str = r#"
Task: review the resume in the prompt and reply in this JSON format:
{
  "improvements": {
    "summary": ["suggestion", "..."],
    "experience": ["suggestion", "..."]
  },
  "missing_keywords": ["keyword", "..."],
  "insights": "overall assessment and the most important next steps"
}
Include an improvements entry for every section that needs work."#;

fn compose(task: &str, closing: &str) -> String {
    format!("{PREAMBLE}{SAMPLE_RESUME_JSON}{task}\n{closing}")
}

pub fn build_resume_instruction() -> String {
    compose(BUILD_RESUME_TASK, JSON_ONLY_INSTRUCTION)
}

pub fn build_section_instruction() -> String {
    compose(BUILD_SECTION_TASK, JSON_ONLY_INSTRUCTION)
}

pub fn build_from_jobs_instruction() -> String {
    compose(BUILD_FROM_JOBS_TASK, JSON_ONLY_INSTRUCTION)
}

pub fn score_instruction() -> String {
    compose(SCORE_TASK, NUMBER_ONLY_INSTRUCTION)
}

pub fn feedback_instruction() -> String {
    compose(FEEDBACK_TASK, JSON_ONLY_INSTRUCTION)
}

// ── user prompts ────────────────────────────────────────────────────────────

pub fn from_jobs_prompt(resume_json: &str, job_descriptions: &[String], use_current: bool) -> String {
    format!(
        "Current resume: {resume_json}\nJob descriptions:\n{}\nUse current resume info: {use_current}",
        job_descriptions.join("\n---\n")
    )
}

pub fn section_prompt(section_title: &str, resume_json: &str) -> String {
    format!("Section: {section_title}\nCurrent resume: {resume_json}")
}

pub fn review_prompt(resume_json: &str) -> String {
    format!("Resume content: {resume_json}")
}
