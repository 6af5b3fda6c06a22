//! Instruction text for the generative model.
//!
//! The prompt asks for a strict JSON graph: seed books, their recommendations,
//! and labelled edges naming the shared attribute behind each connection.

use crate::error::{NextChapterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three user-supplied book titles, in the order they were entered.
///
/// Titles are trimmed and must be non-empty. The ordered triple is also the
/// cache key, so `["A", "B", "C"]` and `["B", "A", "C"]` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedTitles([String; 3]);

impl SeedTitles {
    pub fn new(first: &str, second: &str, third: &str) -> Result<Self> {
        let titles = [first, second, third].map(|t| t.trim().to_string());
        if let Some(pos) = titles.iter().position(|t| t.is_empty()) {
            return Err(NextChapterError::InvalidInput(format!(
                "book title {} is empty",
                pos + 1
            )));
        }
        Ok(Self(titles))
    }

    /// Build from a slice that must hold exactly three titles.
    pub fn from_slice(titles: &[String]) -> Result<Self> {
        match titles {
            [a, b, c] => Self::new(a, b, c),
            _ => Err(NextChapterError::InvalidInput(format!(
                "expected exactly 3 book titles, got {}",
                titles.len()
            ))),
        }
    }

    pub fn as_array(&self) -> &[String; 3] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for SeedTitles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\", \"{}\", \"{}\"", self.0[0], self.0[1], self.0[2])
    }
}

/// Build the instruction text for one analysis.
///
/// Pure and deterministic: the same titles always produce the same bytes.
pub fn build_prompt(titles: &SeedTitles) -> String {
    let [first, second, third] = titles.as_array();
    format!(
        r#"[Role]
You are a literary curator who analyzes books by their style, philosophy, and mood to draw a precise reading map.

[Input Books (Seeds)]
The user has provided these 3 books as seeds:
1. {first}
2. {second}
3. {third}

[Core Constraints]
1. Real books only: recommend only books that genuinely exist and can be verified. Never invent titles.
2. Accuracy over quantity: do not force recommendations. If only one book qualifies for a seed, recommend one.
3. Correct attribution: match author names to book titles accurately.

[Reasoning Process]
1. Extract the core attribute keywords, shared or unique, across the 3 seed books.
2. Select recommended books that strongly embody those keywords.
3. Connect each recommended book to its parent seed book, and connect recommended books to each other when they share strong commonalities.

[Data Rules]
1. Groups (the "group" field must be exactly one of these values):
   - Seed: the 3 books provided by the user.
   - Recommended: primary recommendations, 1-4 per seed.
   - Level2: derived recommendations, 0-3 in total.
2. Edges:
   - Every recommended book must be connected to its source seed book.
   - "label" is a specific shared keyword linking the two books.
   - "source" and "target" must be node ids.
3. Text content:
   - "summary": the core plot in 2-3 sentences.
   - "reason": why this book connects to the input books.

[JSON Format]
{{
  "nodes": [
    {{"id": "The Stranger", "title": "The Stranger", "author": "Albert Camus", "group": "Seed", "summary": "...", "reason": "..."}},
    {{"id": "Nausea", "title": "Nausea", "author": "Jean-Paul Sartre", "group": "Recommended", "summary": "...", "reason": "..."}}
  ],
  "edges": [
    {{"source": "The Stranger", "target": "Nausea", "label": "Existential Absurdity"}}
  ]
}}

Output only valid JSON in exactly this format. Do not include markdown code fences or any explanatory text.
"#
    )
}
