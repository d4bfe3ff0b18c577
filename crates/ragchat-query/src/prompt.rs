//! Context and system prompt assembly.

use ragchat_core::QueryMatch;

/// Build the context block from retrieved matches.
///
/// Each match with metadata contributes a `Source:`-headed section;
/// matches without metadata are skipped. Returns the context together with
/// the unique source filenames in first-seen order.
pub fn build_context(matches: &[QueryMatch]) -> (String, Vec<String>) {
    let mut context = String::new();
    let mut sources: Vec<String> = Vec::new();

    for m in matches {
        let Some(metadata) = &m.metadata else {
            continue;
        };

        context.push_str(&format!(
            "\n---\nSource: {}\n{}\n",
            metadata.filename, metadata.text
        ));

        if !sources.iter().any(|s| s == &metadata.filename) {
            sources.push(metadata.filename.clone());
        }
    }

    (context, sources)
}

/// Build the system prompt for a retrieval-augmented answer.
///
/// When a persona is configured the assistant answers in the first person
/// as that persona; otherwise it answers as a neutral assistant over the
/// uploaded documents.
pub fn system_prompt(persona: Option<&str>, context: &str) -> String {
    let mut prompt = String::new();

    match persona {
        Some(name) => {
            prompt.push_str(&format!(
                "You are a professional and enthusiastic AI assistant representing {}. \
                 You answer on behalf of {}, so refer to yourself as \"I\".\n\n",
                name, name
            ));
            prompt.push_str("CORE INSTRUCTIONS:\n");
            prompt.push_str("1. Always be professional and enthusiastic.\n");
            prompt.push_str(&format!(
                "2. Speak about {}'s work and background in the first person \
                 (e.g., \"I worked on this project...\").\n",
                name
            ));
        }
        None => {
            prompt.push_str(
                "You are a professional and enthusiastic AI assistant answering \
                 questions about an uploaded document collection.\n\n",
            );
            prompt.push_str("CORE INSTRUCTIONS:\n");
            prompt.push_str("1. Always be professional and enthusiastic.\n");
            prompt.push_str("2. Base your answers on the context below.\n");
        }
    }

    prompt.push_str(
        "3. Keep your answers concise (around 100 words), but feel free to \
         extend them if the explanation demands it.\n",
    );
    prompt.push_str(
        "4. If the answer is not in the context, say you don't know based on \
         the available information.\n\n",
    );

    prompt.push_str("PRIVACY & GUARDRAILS:\n");
    prompt.push_str(
        "- You ARE AUTHORIZED to provide personal contact information (like \
         address, phone number, email) ONLY IF the user SPECIFICALLY asks for it.\n",
    );
    prompt.push_str(
        "- Do NOT volunteer personal private information in general summaries \
         or unprompted.\n",
    );
    prompt.push_str(
        "- You strictly DO NOT support or discuss: sexual content, harmful \
         messages, medical advice, or criminal activity.\n",
    );

    prompt.push_str(&format!("\nContext:\n{}\n", context));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::VectorMetadata;

    fn query_match(filename: &str, text: &str, score: f32) -> QueryMatch {
        QueryMatch {
            id: format!("{}-0", filename),
            score,
            metadata: Some(VectorMetadata {
                text: text.to_string(),
                filename: filename.to_string(),
            }),
        }
    }

    #[test]
    fn test_context_format() {
        let matches = [query_match("resume.txt", "Worked on distributed systems.", 0.9)];
        let (context, sources) = build_context(&matches);

        assert_eq!(
            context,
            "\n---\nSource: resume.txt\nWorked on distributed systems.\n"
        );
        assert_eq!(sources, vec!["resume.txt"]);
    }

    #[test]
    fn test_sources_are_unique_in_first_seen_order() {
        let matches = [
            query_match("b.txt", "one", 0.9),
            query_match("a.txt", "two", 0.8),
            query_match("b.txt", "three", 0.7),
        ];
        let (context, sources) = build_context(&matches);

        assert_eq!(sources, vec!["b.txt", "a.txt"]);
        assert_eq!(context.matches("Source: b.txt").count(), 2);
    }

    #[test]
    fn test_matches_without_metadata_are_skipped() {
        let matches = [QueryMatch {
            id: "x-0".to_string(),
            score: 0.5,
            metadata: None,
        }];
        let (context, sources) = build_context(&matches);
        assert!(context.is_empty());
        assert!(sources.is_empty());
    }

    #[test]
    fn test_system_prompt_with_persona() {
        let prompt = system_prompt(Some("Alex"), "\n---\nSource: a.txt\ntext\n");
        assert!(prompt.contains("representing Alex"));
        assert!(prompt.contains("first person"));
        assert!(prompt.contains("Context:"));
        assert!(prompt.contains("Source: a.txt"));
    }

    #[test]
    fn test_system_prompt_without_persona() {
        let prompt = system_prompt(None, "");
        assert!(prompt.contains("document collection"));
        assert!(!prompt.contains("first person"));
        assert!(prompt.contains("say you don't know"));
    }
}
