// Post text → fixed-width integer matrix for the text model.
//
// The vocabulary is fitted on the batch being normalized and discarded
// afterwards, so token ids are only meaningful within one call. This matches
// how the text model is fed in production and is kept as a known limitation.

use std::collections::HashMap;

use moodsignal_common::PostBatch;
use serde::Serialize;
use tracing::{info, warn};

/// Ids at or above this map to [`OOV_ID`].
pub const VOCAB_SIZE: usize = 10_282;

/// Every row is padded or truncated to this width.
pub const MAX_LENGTH: usize = 100;

pub const PAD_ID: u32 = 0;
pub const OOV_ID: u32 = 1;

/// Characters replaced by a space before splitting.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Rows of token ids, each exactly [`MAX_LENGTH`] wide. Zero rows means
/// there was no usable text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureMatrix {
    rows: Vec<Vec<u32>>,
}

impl FeatureMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, width)`; width is zero for an empty matrix.
    pub fn shape(&self) -> (usize, usize) {
        if self.rows.is_empty() {
            (0, 0)
        } else {
            (self.rows.len(), MAX_LENGTH)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    vocab_size: usize,
    max_length: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            vocab_size: VOCAB_SIZE,
            max_length: MAX_LENGTH,
        }
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&self, posts: &PostBatch) -> FeatureMatrix {
        if posts.is_empty() {
            warn!("No posts to normalize");
            return FeatureMatrix::empty();
        }

        let tokenized: Vec<Vec<String>> = posts.iter().map(tokenize).collect();
        let vocabulary = Vocabulary::fit(&tokenized, self.vocab_size);

        let rows: Vec<Vec<u32>> = tokenized
            .iter()
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| {
                let mut row: Vec<u32> = tokens
                    .iter()
                    .take(self.max_length)
                    .map(|t| vocabulary.id(t))
                    .collect();
                row.resize(self.max_length, PAD_ID);
                row
            })
            .collect();

        if rows.is_empty() {
            warn!(posts = posts.len(), "No usable sequences after tokenization");
            return FeatureMatrix::empty();
        }

        info!(
            posts = posts.len(),
            rows = rows.len(),
            vocabulary = vocabulary.len(),
            "Normalized posts"
        );
        FeatureMatrix { rows }
    }
}

/// Lowercase, replace filtered punctuation with spaces, split on spaces.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if FILTERS.contains(c) { ' ' } else { c })
        .collect::<String>()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word → id, most frequent first (ties keep first-seen order). Id 1 is the
/// out-of-vocabulary id, so words start at 2.
struct Vocabulary {
    index: HashMap<String, u32>,
    vocab_size: usize,
}

impl Vocabulary {
    fn fit(docs: &[Vec<String>], vocab_size: usize) -> Self {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();

        for token in docs.iter().flatten() {
            match position.get(token.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    position.insert(token.as_str(), counts.len());
                    counts.push((token.as_str(), 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let index = counts
            .into_iter()
            .enumerate()
            .map(|(i, (word, _))| (word.to_string(), i as u32 + 2))
            .collect();

        Self { index, vocab_size }
    }

    fn id(&self, token: &str) -> u32 {
        match self.index.get(token) {
            Some(&id) if (id as usize) < self.vocab_size => id,
            _ => OOV_ID,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
