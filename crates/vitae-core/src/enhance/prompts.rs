//! Section-specific instruction templates for the generation backend.

use crate::resume::Resume;

/// Build the instructional prompt for a single section. Unknown sections
/// get the generic template.
#[must_use]
pub fn section_prompt(section: &str, content: &str) -> String {
    match section.to_lowercase().as_str() {
        "summary" => format!(
            "You are a professional resume writer. Enhance the following professional summary \
             to be more impactful and showcase achievements and skills effectively. Use concrete \
             metrics where possible. Keep the enhanced version professional and concise. Don't \
             add fictional details.\n\nOriginal summary: \"{content}\"\n\nEnhanced summary:"
        ),
        "experience" => format!(
            "You are a professional resume writer. Enhance the following work experience \
             description to focus on achievements and impact using strong action verbs and \
             quantifiable results. Make it more concise and professional. Don't add fictional \
             details.\n\nOriginal description: \"{content}\"\n\nEnhanced description:"
        ),
        "education" => format!(
            "You are a professional resume writer. Enhance the following education description \
             to highlight academic achievements, relevant coursework, or projects that \
             demonstrate skills. Don't add fictional details.\n\nOriginal description: \
             \"{content}\"\n\nEnhanced description:"
        ),
        "skills" => format!(
            "You are a professional resume writer. Enhance the following skills list to be more \
             specific about proficiency levels and application contexts. Don't add fictional \
             details.\n\nOriginal skills: \"{content}\"\n\nEnhanced skills:"
        ),
        _ => format!(
            "You are a professional resume writer. Enhance the following resume content to be \
             more impactful, professional, and achievement-oriented. Use industry-standard \
             terminology. Don't add fictional details.\n\nOriginal content: \"{content}\"\n\n\
             Enhanced content:"
        ),
    }
}

/// Short context block fed to the summary-generation prompt: at most the
/// first three experience entries, two education entries, and ten skills.
#[must_use]
pub fn summary_context(resume: &Resume) -> String {
    let name = resume.personal_info.name.as_deref().unwrap_or("Professional");
    let mut context = format!("Resume for {name}.\n");

    if !resume.experience.is_empty() {
        context.push_str("Experience:\n");
        for exp in resume.experience.iter().take(3) {
            context.push_str(&format!(
                "- {} at {}\n",
                exp.position.as_deref().unwrap_or_default(),
                exp.company.as_deref().unwrap_or_default()
            ));
        }
    }

    if !resume.education.is_empty() {
        context.push_str("Education:\n");
        for edu in resume.education.iter().take(2) {
            context.push_str(&format!(
                "- {} from {}\n",
                edu.degree.as_deref().unwrap_or_default(),
                edu.institution.as_deref().unwrap_or_default()
            ));
        }
    }

    if !resume.skills.is_empty() {
        let names: Vec<&str> = resume
            .skills
            .iter()
            .take(10)
            .map(|s| s.name.as_str())
            .collect();
        context.push_str(&format!("Key skills: {}\n", names.join(", ")));
    }

    context
}

#[must_use]
pub fn summary_prompt(context: &str) -> String {
    format!(
        "You are a professional resume writer. Based on the following resume information, \
         create a compelling professional summary that highlights key achievements, skills, and \
         career progression. The summary should be 3-4 sentences long, use strong action words, \
         and focus on value proposition.\n\n{context}\n\nProfessional Summary:"
    )
}
