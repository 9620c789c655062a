//! HTML served to the browser.
//!
//! The ids here are the ones the submission gate keys on: `form`, `text-input`,
//! and the `answer` prefix. The answer slot carries `hx-sse` so that inserting it
//! does not reopen the gate; only the streamed `answer-<id>` node does.
//!
//! Templates are compiled into the binary and rendered with autoescaping, so
//! questions never reach the page as markup.
use tera::{Context, Tera};

use crate::answer::Answer;

const INDEX: &str = "index.html";
const SNIPPET: &str = "snippet.html";
const ANSWER: &str = "answer.html";

pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INDEX, include_str!("../templates/index.html")),
            (SNIPPET, include_str!("../templates/snippet.html")),
            (ANSWER, include_str!("../templates/answer.html")),
        ])?;

        Ok(Self { tera })
    }

    pub fn index(&self) -> Result<String, tera::Error> {
        self.tera.render(INDEX, &Context::new())
    }

    pub fn snippet(&self, question: &str, id: u64) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("question", question);
        context.insert("id", &id);

        self.tera.render(SNIPPET, &context)
    }

    /// The answer node pushed to the page, `<p id='answer-<id>'>…</p>`.
    pub fn answer(&self, answer: &Answer) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("id", &answer.id);
        context.insert("text", &answer.text);

        self.tera.render(ANSWER, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_ids() {
        let html = Templates::new().unwrap().index().unwrap();

        assert!(html.contains(r#"id="form""#));
        assert!(html.contains(r#"id="text-input""#));
        assert!(html.contains(r#"name="input_text""#));
    }

    #[test]
    fn test_snippet_slot() {
        let html = Templates::new()
            .unwrap()
            .snippet("You have entered: hi", 7)
            .unwrap();

        assert!(html.contains("<p class=\"question\">You have entered: hi</p>"));
        assert!(html.contains(r#"id="answer-stream-7" hx-sse="connect:/processed swap:message""#));
    }

    #[test]
    fn test_snippet_escapes_question() {
        let html = Templates::new()
            .unwrap()
            .snippet(r#"<script>alert("x" & 'y')"#, 0)
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)"));
    }

    #[test]
    fn test_answer_node() {
        let answer = Answer {
            id: 4,
            text: "a < b".to_string(),
        };

        assert_eq!(
            Templates::new().unwrap().answer(&answer).unwrap(),
            "<p id='answer-4'>a &lt; b</p>"
        );
    }
}
