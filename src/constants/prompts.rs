pub const SUMMARIZE_DOCUMENT_PROMPT: &str = "You are an expert summarizer. Please provide {{length}} summary of the following document.
Where appropriate, use **bullet points** to list key information, steps, or components described in the document.
Ensure the summary is comprehensive and captures the main arguments, findings, and conclusions.
{{focus}}
Document:
{{documentText}}

Additionally, if the document is sufficiently long (more than 500 words), provide a section-by-section summary of the document as well, also using detailed explanations and bullet points where suitable.

Respond with a JSON object with a 'summary' field and an optional 'sectionSummaries' field.";

pub const SUMMARY_FOCUS_LINE: &str = "Pay particular attention to: {{focus}}
";

pub const GENERATE_QUIZ_PROMPT: &str = "You are an expert in generating quizzes from text.

Given the following summary of a document, generate a quiz with at least 10 multiple-choice questions, and up to 15 if the content is rich enough, to test the user's understanding of the material.
Each question should have exactly 4 options, one of which is the correct answer.
For each question, provide the question text, the 4 options, the correct answer (which must exactly match one of the options), and a detailed and comprehensive reason explaining why that answer is correct and clarifying the underlying concept.

Summary: {{summary}}

Format your response as a JSON object with a 'questions' field. Each item in the 'questions' array should be an object with 'question', 'options', 'answer', and 'reason' fields.
The 'options' field should be an array of 4 strings.";

pub const GENERATE_CUSTOM_QUIZ_PROMPT: &str = "You are an expert in generating educational quizzes.

Given the following topic and desired number of questions, generate a multiple-choice quiz.
Topic: \"{{topic}}\"
Number of Questions: {{numQuestions}}

Each question must:
1. Be relevant to the provided topic.
2. Have exactly 4 multiple-choice options.
3. Have one clearly correct answer among the options.
4. Include a detailed and comprehensive reason explaining why the answer is correct and clarifying the underlying concept.

Format your response as a JSON object with a 'questions' field. Each item in the 'questions' array should be an object with 'question', 'options', 'answer', and 'reason' fields.
The 'options' field should be an array of 4 strings.
Ensure you generate exactly {{numQuestions}} questions.";

pub const GENERATE_FLASHCARDS_PROMPT: &str = "You are an expert in creating educational study aids.
Given the following document summary, please extract key terms, concepts, and important facts to create a set of flashcards.
Each flashcard should have a \"term\" (the front of the card) and a \"definition\" (the back of the card).
Aim to generate meaningful and concise flashcards that would be helpful for studying the material.
Generate up to {{maxFlashcards}} flashcards.

Document Summary:
{{summaryText}}

Format your response as a JSON object with a 'flashcards' field. Each item in the 'flashcards' array should be an object with 'term' and 'definition' fields.
Ensure the definitions are explanatory and accurate based on the summary provided.";

pub const GENERATE_QUIZ_HINT_PROMPT: &str = "You are an expert quiz assistant.
Given the following quiz question and the summary of the document it's based on, provide a concise and helpful hint.
The hint should guide the user towards the correct answer without giving the answer away directly.

Document Summary:
{{documentSummary}}

Quiz Question:
\"{{questionText}}\"

Provide a hint that points the user to the relevant part of the summary or a key concept, or rephrases the question in a simpler way.
Respond with a JSON object with a single 'hint' field.";

pub const CHAT_PROMPT: &str = "You are StudySmarts, a friendly study assistant for students and teachers.
Answer the user's message clearly and concisely. If the question is about a subject, explain the underlying concept.

User: {{userInput}}

Respond with a JSON object with a single 'botResponse' field.";

/// Replaces every `{{name}}` with its value. Unknown placeholders are left
/// in place.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{{{}}}}}", name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_every_occurrence() {
        let prompt = render(
            GENERATE_CUSTOM_QUIZ_PROMPT,
            &[("topic", "Volcanoes"), ("numQuestions", "7")],
        );
        assert!(prompt.contains("Topic: \"Volcanoes\""));
        assert!(prompt.contains("Number of Questions: 7"));
        assert!(prompt.contains("exactly 7 questions"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} {{b}}", &[("a", "x")]), "x {{b}}");
    }
}
