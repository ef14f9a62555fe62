//! Canned question/answer catalog and the matcher that picks an entry for free text.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::FaqError;

/// A fixed question and its canned answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

const DEFAULT_FAQS: &[(&str, &str)] = &[
    ("What services do you offer?", "We offer project development, documentation, research paper writing, and mentoring for CS students."),
    ("How do I start my project?", "Click the 'Start Your Project' button or contact us via the contact form."),
    ("Can you help with IEEE papers?", "Yes, we provide support for IEEE standard documentation and publication."),
    ("Where are you located?", "We are based in Vijayawada, Andhra Pradesh, India, but serve students everywhere."),
    ("How can I contact you?", "You can reach us through the contact form on our website or via email or contact number provided in the below footer."),
    ("Do you offer mentoring?", "Yes, we provide mentoring for B.Tech and M.Tech students in their projects."),
    ("Can you help with project documentation?", "Absolutely! We assist with complete project documentation, including IEEE standards."),
    ("What is your response time?", "We typically respond within 24 hours on business days."),
    ("Do you have any ongoing projects?", "Yes, we regularly update our project portfolio. Check the 'Projects' section for details."),
    ("Can I see examples of your work?", "Yes, you can view our past projects and papers in the 'Projects' and 'Papers' sections."),
    ("What is the cost of your services?", "Our pricing varies based on the project scope. Please contact us for a detailed quote."),
    ("Do you provide online consultations?", "Yes, we offer online consultations via calls or chat."),
    ("How do I submit my project requirements?", "You can submit your requirements through the contact form or by emailing us directly."),
    ("What technologies do you work with?", "We work with various technologies including Python, Java, C++, and web development frameworks."),
    ("Can you help with final year projects?", "Yes, we specialize in final year projects for B.Tech and M.Tech students."),
    ("Do you offer any discounts for students?", "Yes, we offer special discounts for students. Please inquire for more details and contact to Program director- Mr.Dheeraj Donepudi"),
    ("How can I provide feedback on your services?", "We welcome feedback! You can share your thoughts via email or through our contact form."),
];

/// Ordered, immutable list of FAQ entries.
///
/// Declaration order matters: when several entries satisfy the same matching
/// rule, the earliest one wins.
#[derive(Debug, Clone)]
pub struct FaqList {
    entries: Arc<[FaqEntry]>,
    // Lowercased questions, parallel to `entries`
    folded: Arc<[String]>,
}

impl FaqList {
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        let folded: Vec<String> = entries.iter().map(|e| e.question.to_lowercase()).collect();
        Self {
            entries: entries.into(),
            folded: folded.into(),
        }
    }

    /// Load a catalog from a JSON array of `{question, answer}` objects
    pub fn load(path: &Path) -> Result<Self, FaqError> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<FaqEntry> = serde_json::from_str(&content)?;

        if entries.is_empty() {
            return Err(FaqError::Empty);
        }
        if let Some(idx) = entries.iter().position(|e| e.question.trim().is_empty()) {
            return Err(FaqError::BlankQuestion(idx));
        }

        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Questions offered as clickable shortcuts
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.question.as_str())
    }

    /// Find the entry answering `query`, if any.
    ///
    /// Rules, tried in order over the whole list (case-insensitive):
    /// 1. the query equals a question;
    /// 2. the query contains a question, or a question contains the query;
    /// 3. some word of the query equals the first word of a question.
    pub fn find(&self, query: &str) -> Option<&FaqEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let idx = self
            .folded
            .iter()
            .position(|q| *q == query)
            .or_else(|| {
                self.folded
                    .iter()
                    .position(|q| query.contains(q.as_str()) || q.contains(query.as_str()))
            })
            .or_else(|| {
                let words: Vec<&str> = query.split_whitespace().map(strip_punctuation).collect();
                self.folded.iter().position(|q| {
                    q.split_whitespace()
                        .next()
                        .map(strip_punctuation)
                        .filter(|first| !first.is_empty())
                        .is_some_and(|first| words.contains(&first))
                })
            })?;

        Some(&self.entries[idx])
    }
}

impl Default for FaqList {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_FAQS
                .iter()
                .map(|(q, a)| FaqEntry::new(q, a))
                .collect(),
        )
    }
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_order() {
        let faqs = FaqList::default();
        assert_eq!(faqs.len(), 17);
        assert_eq!(faqs.entries()[0].question, "What services do you offer?");
        assert_eq!(
            faqs.questions().last(),
            Some("How can I provide feedback on your services?")
        );
    }

    #[test]
    fn test_every_question_matches_itself() {
        let faqs = FaqList::default();
        for entry in faqs.entries() {
            assert_eq!(faqs.find(&entry.question), Some(entry));
            assert_eq!(faqs.find(&entry.question.to_uppercase()), Some(entry));
        }
    }

    #[test]
    fn test_exact_match_beats_earlier_token_match() {
        // Rule 1 runs over the whole list before rule 3 gets a chance
        let faqs = FaqList::default();
        let found = faqs.find("what is your response time?").unwrap();
        assert_eq!(found.answer, "We typically respond within 24 hours on business days.");
    }

    #[test]
    fn test_query_contained_in_question() {
        let faqs = FaqList::default();
        let found = faqs.find("can you help with IEEE papers").unwrap();
        assert_eq!(
            found.answer,
            "Yes, we provide support for IEEE standard documentation and publication."
        );
    }

    #[test]
    fn test_question_contained_in_query() {
        let faqs = FaqList::default();
        let found = faqs
            .find("hello! where are you located? I might visit")
            .unwrap();
        assert_eq!(found.question, "Where are you located?");
    }

    #[test]
    fn test_first_word_match_takes_first_in_order() {
        let faqs = FaqList::default();
        // "how" is the first word of several questions; the earliest wins
        let found = faqs.find("how are you").unwrap();
        assert_eq!(found.question, "How do I start my project?");
    }

    #[test]
    fn test_first_word_must_be_whole_word() {
        let faqs = FaqList::default();
        assert!(faqs.find("What's the weather today?").is_none());
    }

    #[test]
    fn test_blank_query_has_no_match() {
        let faqs = FaqList::default();
        assert!(faqs.find("").is_none());
        assert!(faqs.find("   \t\n").is_none());
    }

    #[test]
    fn test_no_match() {
        let faqs = FaqList::default();
        assert!(faqs.find("tell me a joke").is_none());
    }

    #[test]
    fn test_load_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "Are you open on Sunday?", "answer": "Yes, 12 PM to 5 PM."}}]"#
        )
        .unwrap();

        let faqs = FaqList::load(file.path()).unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs.find("are you open on sunday?").unwrap().answer, "Yes, 12 PM to 5 PM.");
    }

    #[test]
    fn test_load_rejects_empty_and_blank() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(matches!(FaqList::load(empty.path()), Err(FaqError::Empty)));

        let mut blank = tempfile::NamedTempFile::new().unwrap();
        write!(blank, r#"[{{"question": "  ", "answer": "x"}}]"#).unwrap();
        assert!(matches!(FaqList::load(blank.path()), Err(FaqError::BlankQuestion(0))));
    }
}
